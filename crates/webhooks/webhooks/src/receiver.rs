//! Webhook receiver for verifying and parsing incoming webhooks.

use serde::de::DeserializeOwned;

use crate::error::WebhookResult;
use crate::event::WebhookEvent;
use crate::signature::{verify_webhook, WebhookSigner};

/// Verifies a webhook at `now_ms` and, only if that succeeds, parses it.
///
/// A verification failure is returned as-is and the payload is never
/// deserialized.
pub fn parse_webhook(
    payload: &[u8],
    signature: &str,
    timestamp: &str,
    secret: &[u8],
    now_ms: i64,
) -> WebhookResult<WebhookEvent> {
    verify_webhook(payload, signature, timestamp, secret, now_ms)?;
    Ok(serde_json::from_slice(payload)?)
}

/// Webhook receiver for verifying incoming webhooks.
#[derive(Debug, Clone)]
pub struct WebhookReceiver {
    signer: WebhookSigner,
}

impl WebhookReceiver {
    /// Creates a new webhook receiver.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            signer: WebhookSigner::new(secret),
        }
    }

    /// Verifies a webhook against the wall clock and parses the event.
    pub fn parse(&self, payload: &[u8], signature: &str, timestamp: &str) -> WebhookResult<WebhookEvent> {
        self.parse_as(payload, signature, timestamp, chrono::Utc::now().timestamp_millis())
    }

    /// Verifies a webhook as of `now_ms` and parses the event.
    pub fn parse_at(
        &self,
        payload: &[u8],
        signature: &str,
        timestamp: &str,
        now_ms: i64,
    ) -> WebhookResult<WebhookEvent> {
        self.parse_as(payload, signature, timestamp, now_ms)
    }

    /// Verifies a webhook as of `now_ms` and parses it into any type.
    pub fn parse_as<T: DeserializeOwned>(
        &self,
        payload: &[u8],
        signature: &str,
        timestamp: &str,
        now_ms: i64,
    ) -> WebhookResult<T> {
        self.signer.verify_at(payload, signature, timestamp, now_ms)?;
        Ok(serde_json::from_slice(payload)?)
    }

    /// Verifies only the signature without parsing.
    pub fn verify_signature(&self, payload: &[u8], signature: &str, timestamp: &str) -> WebhookResult<()> {
        self.signer.verify(payload, signature, timestamp)
    }

    /// Returns the signer.
    pub fn signer(&self) -> &WebhookSigner {
        &self.signer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{VerificationFailure, WebhookError};
    use crate::event::WebhookEventType;

    const EVENT: &str = r#"{"type":"message.created","community":{"id":"c_1"},"channel":{"id":"ch_1"},"message":{"id":"m_1","body":{"text":"hi"},"createdAt":"2024-01-01T00:00:00Z"},"sender":{"id":"u_1"}}"#;
    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_parse_verified_event() {
        let receiver = WebhookReceiver::new("secret");
        let timestamp = NOW.to_string();
        let signature = receiver.signer().sign_header(&timestamp, EVENT.as_bytes()).unwrap();

        let event = receiver
            .parse_at(EVENT.as_bytes(), &signature, &timestamp, NOW)
            .unwrap();
        assert_eq!(event.event_type, WebhookEventType::MessageCreated);
        assert_eq!(event.message.body.text, "hi");
    }

    #[test]
    fn test_parse_rejects_before_deserializing() {
        let receiver = WebhookReceiver::new("secret");

        // Not JSON at all: a verification failure must win over a parse error
        let err = receiver
            .parse_at(b"not json", "sha256=00", &NOW.to_string(), NOW)
            .unwrap_err();
        assert_eq!(
            err.verification_failure(),
            Some(VerificationFailure::MalformedSignature)
        );
    }

    #[test]
    fn test_verified_but_invalid_payload() {
        let receiver = WebhookReceiver::new("secret");
        let timestamp = NOW.to_string();
        let signature = receiver.signer().sign(&timestamp, b"[1,2,3]").unwrap();

        let err = receiver
            .parse_at(b"[1,2,3]", &signature, &timestamp, NOW)
            .unwrap_err();
        assert!(matches!(err, WebhookError::InvalidPayload(_)));
    }

    #[test]
    fn test_parse_as_raw_value() {
        let receiver = WebhookReceiver::new("secret");
        let timestamp = NOW.to_string();
        let signature = receiver.signer().sign(&timestamp, br#"{"a":1}"#).unwrap();

        let value: serde_json::Value = receiver
            .parse_as(br#"{"a":1}"#, &signature, &timestamp, NOW)
            .unwrap();
        assert_eq!(value["a"], 1);
    }
}
