//! # CG Axum Integration
//!
//! This crate provides Axum integration for CG webhooks, including:
//! - A verification layer that checks `X-CG-Signature` / `X-CG-Timestamp`
//!   against the exact raw request body
//! - Extractors for the verified raw body and the parsed event
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use axum::{Router, routing::post};
//! use cg_axum::{VerifiedWebhook, WebhookLayer};
//!
//! async fn on_event(VerifiedWebhook(event): VerifiedWebhook) -> &'static str {
//!     println!("{:?}", event.event_type);
//!     "ok"
//! }
//!
//! let app = Router::new()
//!     .route("/webhook", post(on_event))
//!     .layer(WebhookLayer::new(webhook_secret));
//! ```

mod extractor;
mod layer;

pub use extractor::{RawBody, VerifiedWebhook};
pub use layer::{WebhookLayer, WebhookLayerConfig, WebhookMiddleware};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cg_webhooks::VerificationFailure;

/// Reasons the webhook pipeline rejects a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookRejection {
    /// Signature or timestamp header is absent.
    MissingHeaders,
    /// The body exceeds the configured size limit.
    PayloadTooLarge,
    /// The raw body could not be obtained. This is a server setup fault.
    MissingRawBody,
    /// The signature did not verify.
    InvalidSignature(VerificationFailure),
    /// Verification could not run.
    VerificationError,
    /// The verified body is not a valid event.
    InvalidPayload(String),
}

impl WebhookRejection {
    /// Stable error code sent in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            WebhookRejection::MissingHeaders => "MISSING_HEADERS",
            WebhookRejection::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            WebhookRejection::MissingRawBody => "MISSING_RAW_BODY",
            WebhookRejection::InvalidSignature(_) => "INVALID_SIGNATURE",
            WebhookRejection::VerificationError => "VERIFICATION_ERROR",
            WebhookRejection::InvalidPayload(_) => "INVALID_PAYLOAD",
        }
    }

    /// HTTP status for this rejection.
    pub fn status(&self) -> StatusCode {
        match self {
            WebhookRejection::MissingHeaders | WebhookRejection::InvalidSignature(_) => {
                StatusCode::UNAUTHORIZED
            }
            WebhookRejection::InvalidPayload(_) => StatusCode::BAD_REQUEST,
            WebhookRejection::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            WebhookRejection::MissingRawBody | WebhookRejection::VerificationError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn message(&self) -> String {
        match self {
            WebhookRejection::MissingHeaders => "Missing signature or timestamp header".to_string(),
            WebhookRejection::PayloadTooLarge => "Webhook body exceeds the size limit".to_string(),
            WebhookRejection::MissingRawBody => "Raw request body is not available".to_string(),
            WebhookRejection::InvalidSignature(failure) => failure.to_string(),
            WebhookRejection::VerificationError => "Webhook verification failed to run".to_string(),
            WebhookRejection::InvalidPayload(e) => format!("Invalid webhook payload: {}", e),
        }
    }
}

impl IntoResponse for WebhookRejection {
    fn into_response(self) -> Response {
        let status = self.status();
        let mut body = serde_json::json!({
            "error": self.code(),
            "message": self.message(),
            "code": status.as_u16()
        });
        if let WebhookRejection::InvalidSignature(failure) = &self {
            body["reason"] = serde_json::Value::from(failure.code());
        }

        (status, axum::Json(body)).into_response()
    }
}
