use serde::Deserialize;

/// Decision-service response body, every field optional. Unknown fields are
/// ignored, unknown values inside known fields are handled downstream by
/// the decision engine.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ApiVerdict {
    #[serde(default)]
    pub filter_type: Option<String>,
    #[serde(default)]
    pub filter_page: Option<String>,
    #[serde(default)]
    pub url_white_page: Option<String>,
    #[serde(default)]
    pub url_offer_page: Option<String>,
}

/// Why an exchange produced no usable verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndeterminateCause {
    NonSuccessStatus,
    TransportError,
    MalformedBody,
}

impl IndeterminateCause {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NonSuccessStatus => "non_success_status",
            Self::TransportError => "transport_error",
            Self::MalformedBody => "malformed_body",
        }
    }
}

/// What the exchange yielded: a parsed verdict on a success status, or the
/// reason there is none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Verdict(ApiVerdict),
    Failed(IndeterminateCause),
}

impl Reply {
    pub fn failed_transport() -> Self {
        Self::Failed(IndeterminateCause::TransportError)
    }
}

/// The full result of one classifier exchange: the reply the decision
/// engine consumes plus the metadata the exchange audit record captures.
/// Exactly one of these exists per inbound page view.
#[derive(Debug, Clone)]
pub struct ExchangeOutcome {
    pub status: Option<u16>,
    pub elapsed_ms: u64,
    pub response_size: usize,
    pub error: Option<String>,
    /// Response body cut to the audit excerpt limit.
    pub body_excerpt: String,
    pub reply: Reply,
}
