use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::outcome::{ApiVerdict, ExchangeOutcome, IndeterminateCause, Reply};
use crate::audit::truncate_body;
use crate::config::ClassifierConfig;
use crate::signal::SignalSet;

/// Status codes the decision service counts as a delivered verdict.
pub const SUCCESS_CODES: [u16; 4] = [200, 201, 204, 206];

/// Seam between the gate flow and the outbound decision service, so the
/// HTTP layer can be exercised against a stub.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Consult the decision service for one signal set. Single attempt,
    /// bounded by the configured timeout, and never an `Err`: every
    /// transport or protocol problem is normalized into the outcome.
    async fn classify(&self, signals: &SignalSet) -> ExchangeOutcome;

    /// Endpoint URL, for the exchange audit record.
    fn endpoint(&self) -> &str;
}

pub struct HttpClassifier {
    endpoint: String,
    label: String,
    http: reqwest::Client,
}

impl HttpClassifier {
    pub fn new(cfg: &ClassifierConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .danger_accept_invalid_certs(!cfg.verify_tls)
            .build()?;
        Ok(Self {
            endpoint: cfg.endpoint.clone(),
            label: cfg.label.clone(),
            http,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, signals: &SignalSet) -> ExchangeOutcome {
        let form = [
            ("label", self.label.as_str()),
            ("user_agent", signals.user_agent.as_str()),
            ("referer", signals.referer.as_str()),
            ("query", signals.query_string.as_str()),
            ("lang", signals.accept_language.as_str()),
            ("ip_address", signals.client_ip.as_str()),
        ];

        tracing::debug!(
            target: "cloakgate.classify",
            stage = "classify.in",
            url = %self.endpoint,
            ip = %signals.client_ip
        );

        let started = Instant::now();
        let resp = self.http.post(&self.endpoint).form(&form).send().await;
        let outcome = match resp {
            Ok(resp) => read_response(resp, started).await,
            Err(err) => transport_failure(err, started),
        };

        tracing::debug!(
            target: "cloakgate.classify",
            stage = "classify.out",
            status = ?outcome.status,
            elapsed_ms = outcome.elapsed_ms,
            reply = reply_tag(&outcome.reply)
        );

        outcome
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

async fn read_response(resp: reqwest::Response, started: Instant) -> ExchangeOutcome {
    let status = resp.status().as_u16();
    let body = match resp.text().await {
        Ok(body) => body,
        Err(err) => {
            let mut outcome = transport_failure(err, started);
            outcome.status = Some(status);
            return outcome;
        }
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let excerpt = truncate_body(&body);

    let reply = if SUCCESS_CODES.contains(&status) {
        parse_verdict(&body)
    } else {
        Reply::Failed(IndeterminateCause::NonSuccessStatus)
    };

    ExchangeOutcome {
        status: Some(status),
        elapsed_ms,
        response_size: body.len(),
        error: None,
        body_excerpt: excerpt,
        reply,
    }
}

/// A 204 arrives with no body at all; that is still a delivered verdict
/// with every field absent, not a malformed one.
fn parse_verdict(body: &str) -> Reply {
    if body.trim().is_empty() {
        return Reply::Verdict(ApiVerdict::default());
    }
    match serde_json::from_str::<ApiVerdict>(body) {
        Ok(verdict) => Reply::Verdict(verdict),
        Err(_) => Reply::Failed(IndeterminateCause::MalformedBody),
    }
}

fn transport_failure(err: reqwest::Error, started: Instant) -> ExchangeOutcome {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else {
        "transport"
    };
    ExchangeOutcome {
        status: None,
        elapsed_ms: started.elapsed().as_millis() as u64,
        response_size: 0,
        error: Some(format!("{kind}: {err}")),
        body_excerpt: String::new(),
        reply: Reply::failed_transport(),
    }
}

fn reply_tag(reply: &Reply) -> &'static str {
    match reply {
        Reply::Verdict(_) => "verdict",
        Reply::Failed(cause) => cause.as_str(),
    }
}
