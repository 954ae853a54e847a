//! Global configuration loader for Asintel.
//!
//! Reads `config.toml` from the data directory (`~/.asintel/` in
//! production) and deserializes it into [`GlobalConfig`]. Falls back to
//! defaults when the file is missing or malformed. The provider API key
//! is never stored in the config file; it comes from the environment.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use asintel_types::config::GlobalConfig;

/// Environment variable holding the Keepa API key.
pub const API_KEY_ENV: &str = "KEEPA_API_KEY";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "ASINTEL_DATA_DIR";

/// Resolve the data directory: `$ASINTEL_DATA_DIR` or `~/.asintel`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".asintel")
}

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to read or parse, logs a warning and
///   returns the default.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GlobalConfig::default()
        }
    }
}

/// Read the provider API key from the environment into a secret.
///
/// Returns `None` when the variable is unset or blank; callers decide
/// whether that is fatal for their command.
pub fn resolve_api_key() -> Option<SecretString> {
    match std::env::var(API_KEY_ENV) {
        Ok(value) if !value.trim().is_empty() => Some(SecretString::from(value)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asintel_types::retrieval::{Domain, RequestedField};
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_global_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.default_domain, Domain::Us);
        assert_eq!(config.request_timeout_secs, 60);
    }

    #[tokio::test]
    async fn load_global_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
default_domain = "DE"
default_fields = ["title", "sales_rank"]
request_timeout_secs = 90
"#,
        )
        .await
        .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.default_domain, Domain::De);
        assert_eq!(
            config.default_fields,
            vec![RequestedField::Title, RequestedField::SalesRank]
        );
        assert_eq!(config.request_timeout_secs, 90);
    }

    #[tokio::test]
    async fn load_global_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_global_config(tmp.path()).await;
        assert_eq!(config.default_domain, Domain::Us);
    }
}
