pub mod collect;
pub mod ip;
pub mod types;

pub use collect::collect;
pub use ip::resolve_client_ip;
pub use types::{RawRequest, Scheme, SignalSet};
