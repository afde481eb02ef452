pub mod log;
pub mod record;

pub use log::AuditLog;
pub use record::{truncate_body, ExchangeRecord, RecordKind, BODY_EXCERPT_LIMIT};
