//! HMAC-SHA256 signing and verification of webhook bodies.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a hex-encoded SHA-256 HMAC.
pub const SIGNATURE_HEX_LEN: usize = 64;

/// Optional scheme prefix some senders put in front of the digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// Compute the hex-encoded HMAC-SHA256 of `payload` under `secret`.
///
/// # Errors
///
/// Returns [`WebhookError::InvalidSecret`] if `secret` is empty, since a
/// signature made with it could never be verified.
pub fn compute_signature(payload: &[u8], secret: &str) -> Result<String, WebhookError> {
    if secret.is_empty() {
        return Err(WebhookError::InvalidSecret);
    }

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check that `signature` is the HMAC-SHA256 of `payload` under `secret`.
///
/// Returns `false`, never an error, when any input is empty, when the
/// signature is not 64 hex characters (after stripping an optional
/// `sha256=` prefix), or when it does not match. The final comparison runs in
/// constant time.
pub fn verify_signature(payload: &[u8], signature: &str, secret: &str) -> bool {
    if payload.is_empty() || signature.is_empty() || secret.is_empty() {
        return false;
    }

    let candidate = strip_prefix(signature.trim());
    if candidate.len() != SIGNATURE_HEX_LEN {
        return false;
    }
    let Ok(candidate) = hex::decode(candidate) else {
        return false;
    };

    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    expected.as_slice().ct_eq(&candidate).into()
}

fn strip_prefix(signature: &str) -> &str {
    match signature.get(..SIGNATURE_PREFIX.len()) {
        Some(prefix) if prefix.eq_ignore_ascii_case(SIGNATURE_PREFIX) => {
            &signature[SIGNATURE_PREFIX.len()..]
        }
        _ => signature,
    }
}
