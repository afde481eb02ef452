//! Stable re-exports for consumers (`cli` and external crates).
//!
//! Prefer importing from `cloakgate_core::api` instead of reaching into internal modules.

pub use crate::audit::{truncate_body, AuditLog, ExchangeRecord, RecordKind, BODY_EXCERPT_LIMIT};
pub use crate::classify::{
    ApiVerdict, Classifier, ExchangeOutcome, HttpClassifier, IndeterminateCause, Reply,
    SUCCESS_CODES,
};
pub use crate::config::{
    get_data_dir, load_default, AppConfig, AuditConfig, ClassifierConfig, DownloadConfig,
    LoggingConfig, ServerConfig,
};
pub use crate::error::CliError;
pub use crate::gate::{
    decide, verdict_for, ClassificationVerdict, DenialReason, RenderDecision, VariantChoice,
    TARGETS_NOT_FOUND,
};
pub use crate::signal::{collect, resolve_client_ip, RawRequest, Scheme, SignalSet};
