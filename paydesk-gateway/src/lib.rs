//! Typed clients for the payment gateway REST API.
//!
//! The gateway exposes two protocol versions that a support desk needs at the
//! same time: v2 carries the order lookup surface, v3 carries return-of-deposit
//! creation. Both clients authenticate every request with the same credential
//! triple (key, passphrase, secret) and an HMAC signature over the request.
//!
//! Clients are cheap to construct and hold no connection state beyond the
//! underlying `reqwest` pool; build one per unit of work and drop it when done.
//!
//! # Example
//!
//! ```rust,ignore
//! use paydesk_gateway::{ApiCredentials, ApiV2Client, GatewayConfig};
//!
//! let credentials = ApiCredentials::new("key", "passphrase", "secret");
//! let client = ApiV2Client::new(credentials, GatewayConfig::new("https://api.gateway.example/v2"))?;
//!
//! let order = client.order_fetch("ORD-1001", true).await?;
//! println!("order {} is {}", order.order_id, order.status);
//! ```

pub mod config;
pub mod credentials;
mod http;
pub mod sign;
pub mod v2;
pub mod v3;

pub use config::GatewayConfig;
pub use credentials::ApiCredentials;
pub use v2::{ApiV2Client, Deposit, Order};
pub use v3::{ApiV3Client, ReturnDeposit};

/// Result alias for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Error type for gateway API calls.
///
/// `NotFound` is the one variant callers are expected to branch on: it is the
/// signal that an identifier does not resolve under the attempted namespace,
/// as opposed to the request itself failing.
#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    /// The identifier does not resolve under the attempted namespace.
    #[error("{resource} not found: {identifier}")]
    NotFound {
        /// Kind of resource looked up (e.g. "order").
        resource: &'static str,
        /// The identifier that failed to resolve.
        identifier: String,
    },

    /// The gateway rejected the request credentials or signature.
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The gateway rejected the request payload as invalid.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The gateway asked us to back off.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited {
        /// Suggested delay before retrying.
        retry_after_ms: u64,
    },

    /// The request did not complete within the configured timeout.
    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout {
        /// Operation that timed out.
        operation: &'static str,
        /// Configured timeout in milliseconds.
        timeout_ms: u64,
    },

    /// A TCP/TLS connection to the gateway could not be established.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target base URL.
        target: String,
        /// Underlying error message.
        reason: String,
    },

    /// Any other network or protocol failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The gateway returned a body this client could not decode.
    #[error("malformed gateway response: {0}")]
    Serialization(String),

    /// The client could not be built from the supplied configuration.
    #[error("invalid client configuration: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Create a not-found error.
    pub fn not_found(resource: &'static str, identifier: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            identifier: identifier.into(),
        }
    }

    /// True when the failure means "this identifier does not exist", as
    /// opposed to the call itself failing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
