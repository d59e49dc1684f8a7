//! Bot configuration.
//!
//! Loaded once at process start and treated as an immutable value from then
//! on; every Commander gets a reference to the same `BotConfig`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use paydesk_gateway::GatewayConfig;

use crate::talker::TalkerKind;
use crate::{BotError, Result};

/// Process-level configuration for the orchestration core.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BotConfig {
    /// Base URL of the gateway's v2 API.
    pub api_v2_url: String,

    /// Base URL of the gateway's v3 API.
    pub api_v3_url: String,

    /// CA bundle (PEM) for the gateway's TLS certificate, shared by both
    /// protocol versions.
    #[serde(default)]
    pub ca_cert_file: Option<PathBuf>,

    /// Gateway request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Talker variants in dispatch priority order. The first variant with a
    /// pending question wins.
    #[serde(default = "default_talkers")]
    pub talkers: Vec<TalkerKind>,
}

fn default_timeout() -> u64 {
    30
}

fn default_talkers() -> Vec<TalkerKind> {
    vec![TalkerKind::Auth, TalkerKind::ReturnDeposit]
}

impl BotConfig {
    /// Create a configuration with default timeout and talker order.
    pub fn new(api_v2_url: impl Into<String>, api_v3_url: impl Into<String>) -> Self {
        Self {
            api_v2_url: api_v2_url.into(),
            api_v3_url: api_v3_url.into(),
            ca_cert_file: None,
            timeout_secs: default_timeout(),
            talkers: default_talkers(),
        }
    }

    /// Set the CA certificate bundle path.
    pub fn with_ca_cert(mut self, path: impl Into<PathBuf>) -> Self {
        self.ca_cert_file = Some(path.into());
        self
    }

    /// Override the talker dispatch order.
    pub fn with_talkers(mut self, talkers: Vec<TalkerKind>) -> Self {
        self.talkers = talkers;
        self
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            BotError::Configuration(format!("cannot read config {}: {e}", path.display()))
        })?;
        serde_json::from_str(&json).map_err(|e| {
            BotError::Configuration(format!("malformed config {}: {e}", path.display()))
        })
    }

    /// Gateway configuration for the v2 client.
    pub(crate) fn v2_gateway_config(&self) -> GatewayConfig {
        self.gateway_config(&self.api_v2_url)
    }

    /// Gateway configuration for the v3 client.
    pub(crate) fn v3_gateway_config(&self) -> GatewayConfig {
        self.gateway_config(&self.api_v3_url)
    }

    fn gateway_config(&self, base_url: &str) -> GatewayConfig {
        let mut config = GatewayConfig::new(base_url).with_timeout(self.timeout_secs);
        if let Some(path) = &self.ca_cert_file {
            config = config.with_ca_cert(path.clone());
        }
        config
    }
}
