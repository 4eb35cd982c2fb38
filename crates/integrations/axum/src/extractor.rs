//! Extractors for verified webhooks.

use axum::body::Bytes;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use cg_webhooks::WebhookEvent;
use serde::de::DeserializeOwned;

use crate::WebhookRejection;

/// The exact request body bytes, as verified by [`WebhookLayer`](crate::WebhookLayer).
///
/// Only present on requests that passed verification. Handlers on routes
/// without the layer are rejected with `MISSING_RAW_BODY`.
#[derive(Debug, Clone)]
pub struct RawBody(pub Bytes);

impl<S> FromRequestParts<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = WebhookRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RawBody>()
            .cloned()
            .ok_or(WebhookRejection::MissingRawBody)
    }
}

/// Extractor for a verified, parsed webhook event.
///
/// Parsing happens only after the layer has verified the signature.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(VerifiedWebhook(event): VerifiedWebhook) -> String {
///     format!("{} said {}", event.sender.id, event.message.body.text)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct VerifiedWebhook<T = WebhookEvent>(pub T);

impl<S, T> FromRequestParts<S> for VerifiedWebhook<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = WebhookRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RawBody(raw) = RawBody::from_request_parts(parts, state).await?;

        serde_json::from_slice(&raw)
            .map(VerifiedWebhook)
            .map_err(|e| WebhookRejection::InvalidPayload(e.to_string()))
    }
}
