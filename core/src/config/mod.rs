pub mod load;
pub mod types;

pub use load::{get_data_dir, load_default};
pub use types::{
    AppConfig, AuditConfig, ClassifierConfig, DownloadConfig, LoggingConfig, ServerConfig,
};
