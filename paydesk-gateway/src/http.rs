//! Shared HTTP plumbing for the v2 and v3 clients.

use std::time::Duration;

use crate::{GatewayConfig, GatewayError, Result};

/// Build the reqwest client both protocol clients share the shape of.
///
/// Fails only on structurally invalid configuration: an unreadable or
/// malformed CA bundle, or a client builder rejection. No network traffic
/// happens here.
pub(crate) fn build_client(config: &GatewayConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder().timeout(Duration::from_secs(config.timeout_secs));

    if let Some(path) = &config.ca_cert_file {
        let pem = std::fs::read(path).map_err(|e| {
            GatewayError::Configuration(format!("cannot read CA bundle {}: {e}", path.display()))
        })?;
        let cert = reqwest::Certificate::from_pem(&pem)
            .map_err(|e| GatewayError::Configuration(format!("invalid CA certificate: {e}")))?;
        builder = builder.add_root_certificate(cert);
    }

    builder
        .build()
        .map_err(|e| GatewayError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Map an HTTP error status to the gateway error taxonomy.
///
/// 404 is the one status with dedicated structure: it becomes `NotFound` for
/// the resource/identifier pair the caller was resolving, so lookup fallbacks
/// can branch on it.
pub(crate) fn map_status_error(
    status: u16,
    body: &str,
    resource: &'static str,
    identifier: &str,
) -> GatewayError {
    match status {
        400 => GatewayError::InvalidRequest(body.to_string()),
        401 | 403 => GatewayError::Auth(body.to_string()),
        404 => GatewayError::not_found(resource, identifier),
        429 => GatewayError::RateLimited {
            retry_after_ms: 5000,
        },
        _ => GatewayError::Transport(format!("gateway request failed ({status}): {body}")),
    }
}

/// Map a reqwest transport failure to the gateway error taxonomy.
pub(crate) fn map_reqwest_error(
    e: reqwest::Error,
    target: &str,
    timeout_secs: u64,
    operation: &'static str,
) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout {
            operation,
            timeout_ms: timeout_secs * 1000,
        }
    } else if e.is_connect() {
        GatewayError::ConnectionFailed {
            target: target.to_string(),
            reason: e.to_string(),
        }
    } else {
        GatewayError::Transport(format!("gateway request failed: {e}"))
    }
}
