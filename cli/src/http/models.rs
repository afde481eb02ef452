//! HTTP API数据模型

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

// ============= Health =============

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub session_id: String,
    pub uptime_seconds: f64,
    pub requests_handled: u64,
    pub timestamp: String,
}

// ============= Log Viewer =============

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    #[serde(rename = "type", default = "default_log_type")]
    pub log_type: String,
    #[serde(default)]
    pub date: Option<String>,
}

fn default_log_type() -> String {
    "requests".to_string()
}

#[derive(Debug, Serialize)]
pub struct LogsResponse {
    pub log_type: String,
    pub date: String,
    /// Dates that have a file for this log type, newest first.
    pub available_dates: Vec<String>,
    /// One element per line of the selected file. Lines that are not valid
    /// JSON come back as `{"raw": "<line>"}` instead of being dropped.
    pub entries: Vec<serde_json::Value>,
}

// ============= Error Handling =============

#[derive(Debug)]
pub enum HttpServerError {
    InvalidRequest(String),
    NotFound(String),
    Forbidden(String),
    Internal(String),
}

impl IntoResponse for HttpServerError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST", msg),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
        };

        let body = serde_json::json!({
            "success": false,
            "error": message,
            "error_code": error_code,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_query_defaults() {
        let q: LogsQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.log_type, "requests");
        assert_eq!(q.date, None);
    }

    #[test]
    fn test_logs_query_type_rename() {
        let q: LogsQuery =
            serde_json::from_str(r#"{"type":"api_responses","date":"2026-08-06"}"#).unwrap();
        assert_eq!(q.log_type, "api_responses");
        assert_eq!(q.date.as_deref(), Some("2026-08-06"));
    }

    #[test]
    fn test_logs_response_serialize() {
        let resp = LogsResponse {
            log_type: "requests".to_string(),
            date: "2026-08-06".to_string(),
            available_dates: vec!["2026-08-06".to_string()],
            entries: vec![serde_json::json!({"ip_address": "1.2.3.4"})],
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"available_dates\":[\"2026-08-06\"]"));
        assert!(json.contains("\"ip_address\":\"1.2.3.4\""));
    }

    #[test]
    fn test_error_status_codes() {
        let resp = HttpServerError::NotFound("missing".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let resp = HttpServerError::Forbidden("no".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let resp = HttpServerError::InvalidRequest("bad".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
