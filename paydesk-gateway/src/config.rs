//! Configuration for gateway clients.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for one gateway API client.
///
/// The same shape serves both protocol versions; only the base URL differs.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// API base URL (e.g. `https://api.gateway.example/v2`).
    pub base_url: String,

    /// CA bundle (PEM) used to verify the gateway's TLS certificate.
    ///
    /// When unset, the platform trust store is used.
    #[serde(default)]
    pub ca_cert_file: Option<PathBuf>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

impl GatewayConfig {
    /// Create a new configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ca_cert_file: None,
            timeout_secs: default_timeout(),
        }
    }

    /// Set the CA certificate bundle path.
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_file = Some(path.into());
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
