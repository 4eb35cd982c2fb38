//! HMAC signature generation and verification.
//!
//! A webhook is signed as `HMAC-SHA256(secret, "<timestamp>.<raw body>")` and
//! delivered with the hex digest in [`SIGNATURE_HEADER`] (optionally prefixed
//! with `sha256=`) and the epoch-millisecond timestamp in [`TIMESTAMP_HEADER`].
//! Binding the timestamp into the MAC means neither half can be replayed with
//! the other swapped out.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::{VerificationFailure, WebhookError, WebhookResult};

type HmacSha256 = Hmac<Sha256>;

/// Maximum allowed `|now - timestamp|`, in milliseconds.
pub const MAX_TIMESTAMP_AGE_MS: u64 = 5 * 60 * 1000;

/// Header carrying the signature.
pub const SIGNATURE_HEADER: &str = "X-CG-Signature";

/// Header carrying the signing timestamp.
pub const TIMESTAMP_HEADER: &str = "X-CG-Timestamp";

/// Algorithm tag accepted in front of the hex digest.
pub const SIGNATURE_PREFIX: &str = "sha256=";

/// SHA-256 output size.
const DIGEST_LEN: usize = 32;

/// Verifies a webhook signature at time `now_ms`.
///
/// `payload` must be the exact bytes received; any re-encoding (for example
/// pretty-printing the JSON) changes the MAC. `timestamp` is the header value
/// as received and is signed verbatim.
///
/// Checks run in a fixed order and stop at the first failure:
/// timestamp format, freshness, signature format, then the constant-time
/// comparison.
pub fn verify_webhook(
    payload: &[u8],
    signature: &str,
    timestamp: &str,
    secret: &[u8],
    now_ms: i64,
) -> WebhookResult<()> {
    let sent_at: i64 = timestamp
        .parse()
        .map_err(|_| VerificationFailure::MalformedTimestamp)?;

    // Symmetric: future timestamps are as suspect as stale ones.
    let age_ms = now_ms.abs_diff(sent_at);
    if age_ms > MAX_TIMESTAMP_AGE_MS {
        return Err(VerificationFailure::TimestampExpired { age_ms }.into());
    }

    let digest = signature.strip_prefix(SIGNATURE_PREFIX).unwrap_or(signature);
    let provided = hex::decode(digest).map_err(|_| VerificationFailure::MalformedSignature)?;
    if provided.len() != DIGEST_LEN {
        return Err(VerificationFailure::MalformedSignature.into());
    }

    // verify_slice compares in constant time.
    signed_mac(secret, timestamp, payload)?
        .verify_slice(&provided)
        .map_err(|_| VerificationFailure::SignatureMismatch)?;

    Ok(())
}

/// Computes the lowercase hex signature for `payload` at `timestamp`.
pub fn sign_webhook(payload: &[u8], timestamp: &str, secret: &[u8]) -> WebhookResult<String> {
    let mac = signed_mac(secret, timestamp, payload)?;
    Ok(hex::encode(mac.finalize().into_bytes()))
}

fn signed_mac(secret: &[u8], timestamp: &str, payload: &[u8]) -> WebhookResult<HmacSha256> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| WebhookError::Internal(format!("HMAC key rejected: {}", e)))?;

    // Sign: timestamp.payload
    mac.update(timestamp.as_bytes());
    mac.update(b".");
    mac.update(payload);

    Ok(mac)
}

/// Webhook signer holding a shared secret.
#[derive(Clone)]
pub struct WebhookSigner {
    secret: String,
}

impl WebhookSigner {
    /// Creates a new signer with the given secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Generates a hex signature for the given payload and timestamp.
    pub fn sign(&self, timestamp: &str, payload: &[u8]) -> WebhookResult<String> {
        sign_webhook(payload, timestamp, self.secret.as_bytes())
    }

    /// Generates a full signature header value (`sha256=<hex>`).
    pub fn sign_header(&self, timestamp: &str, payload: &[u8]) -> WebhookResult<String> {
        let signature = self.sign(timestamp, payload)?;
        Ok(format!("{}{}", SIGNATURE_PREFIX, signature))
    }

    /// Verifies a signature against the current wall clock.
    pub fn verify(&self, payload: &[u8], signature: &str, timestamp: &str) -> WebhookResult<()> {
        self.verify_at(payload, signature, timestamp, chrono::Utc::now().timestamp_millis())
    }

    /// Verifies a signature as of `now_ms` milliseconds since the epoch.
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature: &str,
        timestamp: &str,
        now_ms: i64,
    ) -> WebhookResult<()> {
        let result = verify_webhook(payload, signature, timestamp, self.secret.as_bytes(), now_ms);

        match &result {
            Ok(()) => tracing::trace!(timestamp, "Webhook signature verified"),
            Err(WebhookError::Verification(failure)) => {
                tracing::debug!(reason = failure.code(), "Webhook signature rejected")
            }
            Err(e) => tracing::error!("Webhook verification error: {}", e),
        }

        result
    }
}

impl std::fmt::Debug for WebhookSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookSigner")
            .field("secret", &"[redacted]")
            .finish()
    }
}
