use cloakgate_core::api::{
    collect, ClassifierConfig, Classifier, ExchangeOutcome, HttpClassifier, RawRequest, SignalSet,
};
use mockito::{Mock, ServerGuard};

/// Request as it arrives through an edge proxy: private hop first, the real
/// client behind it.
pub fn signals_from_edge() -> RawRequest {
    RawRequest {
        remote_addr: Some("10.0.0.1".parse().unwrap()),
        method: "GET".to_string(),
        uri: "/?utm_source=ad".to_string(),
        query: "utm_source=ad".to_string(),
        headers: vec![
            ("host".to_string(), "vpn.example.com".to_string()),
            ("user-agent".to_string(), "Mozilla/5.0".to_string()),
            (
                "x-forwarded-for".to_string(),
                "192.168.1.9, 203.0.113.50".to_string(),
            ),
            ("accept-language".to_string(), "en-US".to_string()),
        ],
    }
}

pub fn classifier_for(base_url: &str) -> HttpClassifier {
    classifier_with_timeout(base_url, 5)
}

pub fn classifier_with_timeout(base_url: &str, timeout_secs: u64) -> HttpClassifier {
    HttpClassifier::new(&ClassifierConfig {
        endpoint: format!("{base_url}/api/v1/check"),
        label: "test-label".to_string(),
        timeout_secs,
        verify_tls: true,
    })
    .unwrap()
}

pub async fn spawn_check_mock(server: &mut ServerGuard, status: usize, body: &str) -> Mock {
    server
        .mock("POST", "/api/v1/check")
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Run collect + classify for one synthetic page view.
pub async fn outcome_for(
    base_url: &str,
    raw: Option<RawRequest>,
) -> (ExchangeOutcome, SignalSet) {
    let signals = collect(&raw.unwrap_or_else(signals_from_edge));
    let classifier = classifier_for(base_url);
    let outcome = classifier.classify(&signals).await;
    (outcome, signals)
}
