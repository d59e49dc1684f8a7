//! API credential triple used by both protocol versions.

use serde::{Deserialize, Serialize};

/// The credential triple the gateway issues per merchant account.
///
/// Empty strings are a legal value: a client built with empty credentials
/// still signs and sends requests, and the gateway answers them with an
/// authentication failure. That is the degraded mode an unauthenticated chat
/// session operates in.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiCredentials {
    /// API key identifying the merchant account.
    pub key: String,
    /// Passphrase chosen when the key was issued.
    pub passphrase: String,
    /// Shared secret used to sign requests.
    pub secret: String,
}

impl ApiCredentials {
    /// Create a credential triple.
    pub fn new(
        key: impl Into<String>,
        passphrase: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            passphrase: passphrase.into(),
            secret: secret.into(),
        }
    }

    /// The empty triple used when a chat has not authorized yet.
    pub fn empty() -> Self {
        Self::default()
    }

    /// True when all three fields are present.
    pub fn is_complete(&self) -> bool {
        !self.key.is_empty() && !self.passphrase.is_empty() && !self.secret.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_legal_but_incomplete() {
        let creds = ApiCredentials::empty();
        assert!(!creds.is_complete());
        assert_eq!(creds.key, "");
    }

    #[test]
    fn complete_requires_all_three() {
        assert!(ApiCredentials::new("k", "p", "s").is_complete());
        assert!(!ApiCredentials::new("k", "", "s").is_complete());
    }
}
