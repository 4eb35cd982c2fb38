//! # CG Client
//!
//! Bot API client for posting messages to CG communities.
//!
//! ## Example
//!
//! ```rust,ignore
//! use cg_client::{BotClient, ClientConfig, SendMessageRequest};
//! use cg_core::MessageBody;
//!
//! let client = BotClient::new(ClientConfig::new(bot_token).timeout_ms(5_000))?;
//!
//! let message = client
//!     .send_message(&SendMessageRequest::new("community", "channel", MessageBody::text("gm")))
//!     .await?;
//! ```

mod client;
mod config;
mod error;
mod request;

pub use client::{BotClient, SEND_MESSAGE_PATH};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_MS};
pub use error::{ClientError, ClientResult};
pub use request::SendMessageRequest;

// Re-export the message schema for convenience
pub use cg_core::{Attachment, Message, MessageBody};
