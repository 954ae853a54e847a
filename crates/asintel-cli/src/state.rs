//! Application state wiring configuration and the provider together.
//!
//! AppState holds what every command needs: the loaded global config
//! and the data directory. The Keepa provider is built on demand so
//! commands that never call the provider (like `extract`) work without
//! an API key.

use std::path::PathBuf;

use asintel_infra::config::{load_global_config, resolve_api_key, resolve_data_dir, API_KEY_ENV};
use asintel_infra::keepa::KeepaProvider;
use asintel_types::config::GlobalConfig;

/// Shared application state for CLI commands.
pub struct AppState {
    pub config: GlobalConfig,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Load configuration from the data directory.
    pub async fn init() -> Self {
        let data_dir = resolve_data_dir();
        let config = load_global_config(&data_dir).await;
        Self { config, data_dir }
    }

    /// Build a Keepa provider from the environment's API key.
    pub fn provider(&self) -> anyhow::Result<KeepaProvider> {
        let api_key = resolve_api_key().ok_or_else(|| {
            anyhow::anyhow!("{API_KEY_ENV} not set. Export your Keepa API key first.")
        })?;
        Ok(KeepaProvider::new(api_key, self.config.request_timeout_secs))
    }
}
