//! Gateway configuration.

use serde::Deserialize;

/// Where the Nullam server lives.
///
/// `base_url` is used verbatim as the prefix of every endpoint, so
/// `"http://localhost:8080"` plus `"/events/pastEvents"` is the full target.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl GatewayConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Parse a configuration object such as `{"baseUrl": "http://host:8080"}`.
    /// Missing fields fall back to their defaults.
    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
