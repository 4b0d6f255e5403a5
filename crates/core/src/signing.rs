//! HMAC-SHA256 signing and verification of inbound provider webhooks.
//!
//! The provider (or the relay in front of it) signs the raw request body with
//! a shared secret and sends `sha256=<hex digest>` in
//! [`WEBHOOK_SIGNATURE_HEADER`]. Verification runs over the exact bytes
//! received, before any JSON parsing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::CoreError;

/// Header carrying the webhook signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-photoai-signature";

/// Scheme prefix of the signature header value.
const SIGNATURE_PREFIX: &str = "sha256=";

type HmacSha256 = Hmac<Sha256>;

/// Compute the signature header value for a webhook body.
pub fn compute_webhook_signature(secret: &str, body: &[u8]) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    format!(
        "{SIGNATURE_PREFIX}{}",
        hex::encode(mac.finalize().into_bytes())
    )
}

/// Verify a signature header value against the raw body.
///
/// The digest comparison is constant-time (`Mac::verify_slice`).
pub fn verify_webhook_signature(
    secret: &str,
    body: &[u8],
    header_value: Option<&str>,
) -> Result<(), CoreError> {
    let header_value = header_value
        .ok_or_else(|| CoreError::Unauthorized("Missing webhook signature".into()))?;

    let digest = header_value
        .strip_prefix(SIGNATURE_PREFIX)
        .and_then(hex::decode)
        .ok_or_else(|| CoreError::Unauthorized("Malformed webhook signature".into()))?;

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(body);
    mac.verify_slice(&digest)
        .map_err(|_| CoreError::Unauthorized("Webhook signature mismatch".into()))
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    /// Decode a hex string; `None` on odd length or non-hex characters.
    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
            .collect()
    }
}
