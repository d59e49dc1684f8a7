//! Request signing for gateway API calls.
//!
//! Every request carries four headers: the API key, the passphrase, a unix
//! timestamp, and an HMAC-SHA256 signature over
//! `timestamp + method + path + body`, base64-encoded. The path is signed
//! without its query string.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the API key.
pub const HEADER_KEY: &str = "X-ACCESS-KEY";
/// Header carrying the base64 HMAC signature.
pub const HEADER_SIGN: &str = "X-ACCESS-SIGN";
/// Header carrying the unix timestamp the signature covers.
pub const HEADER_TIMESTAMP: &str = "X-ACCESS-TIMESTAMP";
/// Header carrying the passphrase.
pub const HEADER_PASSPHRASE: &str = "X-ACCESS-PASSPHRASE";

/// Sign one request.
///
/// `method` is the uppercase HTTP verb, `path` the request path starting with
/// `/`, `body` the exact bytes sent (empty string for GET). The secret is used
/// as raw key material; any length is accepted.
pub fn sign_request(secret: &str, timestamp: &str, method: &str, path: &str, body: &str) -> String {
    let prehash = format!("{timestamp}{method}{path}{body}");
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(prehash.as_bytes());
    BASE64.encode(mac.finalize().into_bytes())
}

/// Current unix timestamp as the string the signature covers.
pub fn current_timestamp() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .to_string()
}
