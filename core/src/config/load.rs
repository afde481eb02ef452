use std::path::{Path, PathBuf};

use super::types::AppConfig;

/// Get the default cloakgate data directory: ~/.cloakgate
pub fn get_data_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(PathBuf::from(home).join(".cloakgate"))
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.cloakgate/config.toml (highest)
    let data_dir = get_data_dir()?;
    let home_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml (current directory)
    let local_config = Path::new("config.toml");

    let mut cfg: AppConfig = if home_config.exists() {
        let s = std::fs::read_to_string(&home_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else if local_config.exists() {
        let s = std::fs::read_to_string(local_config)?;
        toml::from_str::<AppConfig>(&s)?
    } else {
        AppConfig::default()
    };

    apply_env_overrides(&mut cfg);

    Ok(cfg)
}

/// Environment variable overrides (Priority 0: highest)
fn apply_env_overrides(cfg: &mut AppConfig) {
    if let Ok(v) = std::env::var("CLOAKGATE_ENDPOINT") {
        if !v.trim().is_empty() {
            cfg.classifier.endpoint = v;
        }
    }
    if let Ok(v) = std::env::var("CLOAKGATE_LABEL") {
        if !v.trim().is_empty() {
            cfg.classifier.label = v;
        }
    }
    if let Ok(v) = std::env::var("CLOAKGATE_AUDIT_DIR") {
        if !v.trim().is_empty() {
            cfg.audit.directory = v;
        }
    }
    if let Ok(v) = std::env::var("CLOAKGATE_VERIFY_TLS") {
        if !v.trim().is_empty() {
            cfg.classifier.verify_tls = !v.eq_ignore_ascii_case("false");
        }
    }
}
