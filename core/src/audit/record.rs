use chrono::{DateTime, Local};
use serde::Serialize;

use crate::classify::ExchangeOutcome;

/// Captured response bodies are cut to this many characters before they hit
/// the exchange log. Truncation is lossy and not reversible.
pub const BODY_EXCERPT_LIMIT: usize = 500;

/// The two record streams, each with its own daily file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Request,
    Exchange,
}

impl RecordKind {
    pub fn file_prefix(self) -> &'static str {
        match self {
            Self::Request => "requests",
            Self::Exchange => "api_responses",
        }
    }
}

/// One classifier exchange as it lands in `api_responses_<date>.log`.
/// Field order is the serialization order; keep it stable so the files stay
/// human-diffable.
#[derive(Debug, Clone, Serialize)]
pub struct ExchangeRecord {
    pub timestamp: DateTime<Local>,
    pub api_url: String,
    pub http_code: Option<u16>,
    pub response_time_ms: u64,
    pub response_size: usize,
    pub error: String,
    pub request_ip: String,
    pub response_body: String,
}

impl ExchangeRecord {
    pub fn from_outcome(outcome: &ExchangeOutcome, api_url: &str, request_ip: &str) -> Self {
        Self {
            timestamp: Local::now(),
            api_url: api_url.to_string(),
            http_code: outcome.status,
            response_time_ms: outcome.elapsed_ms,
            response_size: outcome.response_size,
            error: outcome.error.clone().unwrap_or_else(|| "none".to_string()),
            request_ip: request_ip.to_string(),
            response_body: if outcome.body_excerpt.is_empty() {
                "empty".to_string()
            } else {
                outcome.body_excerpt.clone()
            },
        }
    }
}

/// Cut a body to at most [`BODY_EXCERPT_LIMIT`] characters, on a char
/// boundary.
pub fn truncate_body(body: &str) -> String {
    body.chars().take(BODY_EXCERPT_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{ExchangeOutcome, Reply};

    #[test]
    fn test_truncate_body_short_is_unchanged() {
        assert_eq!(truncate_body("abc"), "abc");
    }

    #[test]
    fn test_truncate_body_caps_at_limit() {
        let body = "x".repeat(BODY_EXCERPT_LIMIT + 100);
        assert_eq!(truncate_body(&body).chars().count(), BODY_EXCERPT_LIMIT);
    }

    #[test]
    fn test_truncate_body_respects_char_boundaries() {
        let body = "é".repeat(BODY_EXCERPT_LIMIT + 5);
        let cut = truncate_body(&body);
        assert_eq!(cut.chars().count(), BODY_EXCERPT_LIMIT);
        assert!(cut.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_exchange_record_marks_empty_body_and_error() {
        let outcome = ExchangeOutcome {
            status: None,
            elapsed_ms: 12,
            response_size: 0,
            error: Some("connect refused".to_string()),
            body_excerpt: String::new(),
            reply: Reply::failed_transport(),
        };
        let rec = ExchangeRecord::from_outcome(&outcome, "https://api.example/check", "1.2.3.4");
        assert_eq!(rec.response_body, "empty");
        assert_eq!(rec.error, "connect refused");
        assert_eq!(rec.http_code, None);

        let json = serde_json::to_string(&rec).unwrap();
        assert!(json.contains("\"api_url\":\"https://api.example/check\""));
        assert!(json.contains("\"request_ip\":\"1.2.3.4\""));
    }
}
