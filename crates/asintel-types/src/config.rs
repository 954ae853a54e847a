//! Global configuration types.
//!
//! Deserialized from `config.toml` in the data directory. Every field
//! has a default so a missing or partial file still yields a usable
//! configuration.

use serde::{Deserialize, Serialize};

use crate::retrieval::{Domain, RequestedField};

/// Global configuration for the agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    /// Marketplace used when the user doesn't pick one.
    #[serde(default)]
    pub default_domain: Domain,

    /// Fields retrieved when an utterance names none.
    #[serde(default = "default_fields")]
    pub default_fields: Vec<RequestedField>,

    /// Timeout for provider HTTP requests, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_fields() -> Vec<RequestedField> {
    vec![
        RequestedField::Title,
        RequestedField::Brand,
        RequestedField::Rating,
        RequestedField::Price,
    ]
}

fn default_request_timeout_secs() -> u64 {
    60
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_domain: Domain::default(),
            default_fields: default_fields(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GlobalConfig::default();
        assert_eq!(config.default_domain, Domain::Us);
        assert_eq!(config.request_timeout_secs, 60);
        assert!(config.default_fields.contains(&RequestedField::Title));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: GlobalConfig = toml::from_str("request_timeout_secs = 30").unwrap();
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.default_domain, Domain::Us);
        assert_eq!(config.default_fields.len(), 4);
    }

    #[test]
    fn test_full_toml() {
        let config: GlobalConfig = toml::from_str(
            r#"
default_domain = "GB"
default_fields = ["title", "monthly_sold"]
request_timeout_secs = 120
"#,
        )
        .unwrap();
        assert_eq!(config.default_domain, Domain::Gb);
        assert_eq!(
            config.default_fields,
            vec![RequestedField::Title, RequestedField::MonthlySold]
        );
        assert_eq!(config.request_timeout_secs, 120);
    }
}
