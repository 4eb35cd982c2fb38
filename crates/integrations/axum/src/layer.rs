//! Webhook verification middleware layer for Axum.

use axum::body::{Body, Bytes};
use axum::http::{Request, Response};
use axum::response::IntoResponse;
use cg_webhooks::{WebhookError, WebhookSigner, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use http::header::CONTENT_LENGTH;
use http::HeaderMap;
use http_body_util::LengthLimitError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::extractor::RawBody;
use crate::WebhookRejection;

/// Configuration for the webhook layer.
#[derive(Debug, Clone)]
pub struct WebhookLayerConfig {
    /// Largest body the layer will buffer for verification.
    pub max_body_bytes: usize,
}

impl Default for WebhookLayerConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024,
        }
    }
}

impl WebhookLayerConfig {
    /// Creates a new config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the body size limit.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }
}

/// Layer that verifies CG webhook signatures before the handler runs.
#[derive(Debug, Clone)]
pub struct WebhookLayer {
    signer: Arc<WebhookSigner>,
    config: WebhookLayerConfig,
}

impl WebhookLayer {
    /// Creates a new layer with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self::with_config(secret, WebhookLayerConfig::default())
    }

    /// Creates a new layer with custom configuration.
    pub fn with_config(secret: impl Into<String>, config: WebhookLayerConfig) -> Self {
        Self {
            signer: Arc::new(WebhookSigner::new(secret)),
            config,
        }
    }
}

impl<S> Layer<S> for WebhookLayer {
    type Service = WebhookMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        WebhookMiddleware {
            inner,
            signer: self.signer.clone(),
            max_body_bytes: self.config.max_body_bytes,
        }
    }
}

/// Middleware service that rejects unsigned, stale or tampered webhooks.
///
/// Verified requests reach the inner service with the same body bytes and a
/// [`RawBody`] extension.
#[derive(Debug, Clone)]
pub struct WebhookMiddleware<S> {
    inner: S,
    signer: Arc<WebhookSigner>,
    max_body_bytes: usize,
}

impl<S> Service<Request<Body>> for WebhookMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        let signer = self.signer.clone();
        let max_body_bytes = self.max_body_bytes;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let (parts, body) = req.into_parts();

            let Some((signature, timestamp)) = extract_headers(&parts.headers) else {
                tracing::warn!(path = %parts.uri.path(), "Webhook missing signature headers");
                return Ok(WebhookRejection::MissingHeaders.into_response());
            };

            let raw = match read_raw_body(&parts.headers, body, max_body_bytes).await {
                Ok(raw) => raw,
                Err(BodyError::TooLarge) => {
                    tracing::warn!(path = %parts.uri.path(), limit = max_body_bytes, "Webhook body too large");
                    return Ok(WebhookRejection::PayloadTooLarge.into_response());
                }
                Err(BodyError::Unavailable) => {
                    tracing::error!(path = %parts.uri.path(), "Webhook raw body unavailable");
                    return Ok(WebhookRejection::MissingRawBody.into_response());
                }
            };

            match signer.verify(&raw, &signature, &timestamp) {
                Ok(()) => {}
                Err(WebhookError::Verification(failure)) => {
                    tracing::warn!(reason = failure.code(), "Webhook rejected");
                    return Ok(WebhookRejection::InvalidSignature(failure).into_response());
                }
                Err(e) => {
                    tracing::error!("Webhook verification error: {}", e);
                    return Ok(WebhookRejection::VerificationError.into_response());
                }
            }

            let mut req = Request::from_parts(parts, Body::from(raw.clone()));
            req.extensions_mut().insert(RawBody(raw));

            inner.call(req).await
        })
    }
}

/// Extracts the signature and timestamp header values.
fn extract_headers(headers: &HeaderMap) -> Option<(String, String)> {
    let value = |name: &str| {
        headers
            .get(name)
            .and_then(|h| h.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string())
    };

    Some((value(SIGNATURE_HEADER)?, value(TIMESTAMP_HEADER)?))
}

/// Why the raw body could not be buffered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyError {
    /// The client sent more than the configured limit.
    TooLarge,
    /// The body stream failed.
    Unavailable,
}

/// Buffers the request body exactly as received.
async fn read_raw_body(headers: &HeaderMap, body: Body, limit: usize) -> Result<Bytes, BodyError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    if declared.is_some_and(|len| len > limit as u64) {
        return Err(BodyError::TooLarge);
    }

    axum::body::to_bytes(body, limit).await.map_err(|e| {
        if is_length_limit(&e) {
            BodyError::TooLarge
        } else {
            tracing::debug!("Failed to buffer webhook body: {}", e);
            BodyError::Unavailable
        }
    })
}

/// Walks the error chain looking for the body length limit.
fn is_length_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.is::<LengthLimitError>() {
            return true;
        }
        current = e.source();
    }
    false
}
