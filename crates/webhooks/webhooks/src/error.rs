//! Webhook error types.

use thiserror::Error;

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

/// Why a webhook failed verification.
///
/// Every variant is terminal for the request: a failed verification is never
/// transient, so none of these should be retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationFailure {
    /// The timestamp is not a base-10 integer.
    #[error("Malformed timestamp")]
    MalformedTimestamp,

    /// The timestamp is outside the freshness window.
    #[error("Timestamp expired (age {age_ms} ms)")]
    TimestampExpired {
        /// Observed `|now - timestamp|` in milliseconds.
        age_ms: u64,
    },

    /// The signature is not hex or has the wrong digest length.
    #[error("Malformed signature")]
    MalformedSignature,

    /// The signature does not match the payload.
    #[error("Signature mismatch")]
    SignatureMismatch,
}

impl VerificationFailure {
    /// Stable machine-readable code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            VerificationFailure::MalformedTimestamp => "MALFORMED_TIMESTAMP",
            VerificationFailure::TimestampExpired { .. } => "TIMESTAMP_EXPIRED",
            VerificationFailure::MalformedSignature => "MALFORMED_SIGNATURE",
            VerificationFailure::SignatureMismatch => "SIGNATURE_MISMATCH",
        }
    }
}

/// Error type for webhook operations.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// Verification failed.
    #[error("Verification failed: {0}")]
    Verification(#[from] VerificationFailure),

    /// The payload verified but could not be deserialized.
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl WebhookError {
    /// Returns the verification failure, if this is one.
    pub fn verification_failure(&self) -> Option<VerificationFailure> {
        match self {
            WebhookError::Verification(failure) => Some(*failure),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for WebhookError {
    fn from(err: serde_json::Error) -> Self {
        WebhookError::InvalidPayload(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_codes() {
        assert_eq!(VerificationFailure::MalformedTimestamp.code(), "MALFORMED_TIMESTAMP");
        assert_eq!(
            VerificationFailure::TimestampExpired { age_ms: 1 }.code(),
            "TIMESTAMP_EXPIRED"
        );
        assert_eq!(VerificationFailure::MalformedSignature.code(), "MALFORMED_SIGNATURE");
        assert_eq!(VerificationFailure::SignatureMismatch.code(), "SIGNATURE_MISMATCH");
    }

    #[test]
    fn test_expired_message_carries_age() {
        let err = WebhookError::from(VerificationFailure::TimestampExpired { age_ms: 600_001 });
        assert!(err.to_string().contains("600001"));
        assert_eq!(
            err.verification_failure(),
            Some(VerificationFailure::TimestampExpired { age_ms: 600_001 })
        );
    }
}
