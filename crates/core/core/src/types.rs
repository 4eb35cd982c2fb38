//! Core data types for CG messages.
//!
//! This module defines the message body and attachment schema shared by the
//! outbound client and the webhook event payloads, plus the lightweight
//! reference structs that identify communities, channels, users and bots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The content of a message.
///
/// # Example
///
/// ```rust
/// use cg_core::MessageBody;
///
/// let body = MessageBody::text("gm");
/// assert_eq!(body.text, "gm");
/// assert!(body.mentions.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageBody {
    /// Plain message text.
    pub text: String,

    /// User mentions contained in `text`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mentions: Vec<Mention>,
}

impl MessageBody {
    /// Creates a body holding only text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            mentions: Vec::new(),
        }
    }

    /// Adds a mention of `user_id` spanning `length` characters at `offset`.
    pub fn with_mention(mut self, user_id: impl Into<String>, offset: usize, length: usize) -> Self {
        self.mentions.push(Mention {
            user_id: user_id.into(),
            offset,
            length,
        });
        self
    }
}

/// A mention of a user inside a message body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mention {
    /// ID of the mentioned user.
    pub user_id: String,
    /// Character offset of the mention in the text.
    pub offset: usize,
    /// Length of the mention in characters.
    pub length: usize,
}

/// A message attachment, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Attachment {
    /// An image.
    #[serde(rename_all = "camelCase")]
    Image {
        /// Image URL.
        url: String,
        /// Width in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        /// Height in pixels.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
        /// Alt text.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// An arbitrary file.
    #[serde(rename_all = "camelCase")]
    File {
        /// Download URL.
        url: String,
        /// File name.
        name: String,
        /// MIME type.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        mime_type: Option<String>,
        /// Size in bytes.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<u64>,
    },
    /// A link preview.
    #[serde(rename_all = "camelCase")]
    Link {
        /// Target URL.
        url: String,
        /// Page title.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        /// Page description.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl Attachment {
    /// Creates an image attachment.
    pub fn image(url: impl Into<String>) -> Self {
        Attachment::Image {
            url: url.into(),
            width: None,
            height: None,
            alt: None,
        }
    }

    /// Creates a link attachment.
    pub fn link(url: impl Into<String>) -> Self {
        Attachment::Link {
            url: url.into(),
            title: None,
            description: None,
        }
    }

    /// Returns the attachment URL.
    pub fn url(&self) -> &str {
        match self {
            Attachment::Image { url, .. } | Attachment::File { url, .. } | Attachment::Link { url, .. } => url,
        }
    }
}

/// Reference to a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunityRef {
    /// Community ID.
    pub id: String,
    /// Community title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Reference to a channel inside a community.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelRef {
    /// Channel ID.
    pub id: String,
    /// Channel title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Reference to a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    /// User ID.
    pub id: String,
    /// Name shown in the community.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Wallet address linked to the account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_address: Option<String>,
}

/// Reference to a bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotRef {
    /// Bot ID.
    pub id: String,
    /// Bot name.
    pub name: String,
}

/// A message as stored by the platform.
///
/// Returned by `sendMessage` on success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Community the message was posted in.
    pub community_id: String,
    /// Channel the message was posted in.
    pub channel_id: String,
    /// Author of the message.
    pub creator_id: String,
    /// Message content.
    pub body: MessageBody,
    /// Attachments.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// The message this one replies to.
    #[serde(default)]
    pub reply_to_message_id: Option<String>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}
