//! # CG Webhooks
//!
//! Inbound webhook handling for CG bots:
//! - HMAC-SHA256 signature verification bound to a timestamp
//! - Replay protection with a fixed freshness window
//! - Parse-and-verify for typed webhook events
//!
//! ## Example
//!
//! ```rust,ignore
//! use cg_webhooks::WebhookReceiver;
//!
//! let receiver = WebhookReceiver::new(webhook_secret);
//!
//! // `body` must be the raw bytes read off the wire.
//! let event = receiver.parse(&body, signature_header, timestamp_header)?;
//! println!("{:?} in {}", event.event_type, event.channel.id);
//! ```

mod error;
mod event;
mod receiver;
mod signature;

pub use error::{VerificationFailure, WebhookError, WebhookResult};
pub use event::{WebhookEvent, WebhookEventType, WebhookMessage};
pub use receiver::{parse_webhook, WebhookReceiver};
pub use signature::{
    sign_webhook, verify_webhook, WebhookSigner, MAX_TIMESTAMP_AGE_MS, SIGNATURE_HEADER,
    SIGNATURE_PREFIX, TIMESTAMP_HEADER,
};
