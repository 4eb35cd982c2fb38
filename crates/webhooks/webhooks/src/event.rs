//! Webhook event schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cg_core::{Attachment, BotRef, ChannelRef, CommunityRef, MessageBody, UserRef};

/// Kind of webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WebhookEventType {
    /// A message was posted in a channel the bot can read.
    #[serde(rename = "message.created")]
    MessageCreated,
    /// The bot was mentioned in a message.
    #[serde(rename = "bot.mentioned")]
    BotMentioned,
    /// An event type this version does not know about.
    #[serde(other)]
    Unknown,
}

/// Parsed webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookEvent {
    /// Event type.
    #[serde(rename = "type")]
    pub event_type: WebhookEventType,
    /// Community the event happened in.
    pub community: CommunityRef,
    /// Channel the event happened in.
    pub channel: ChannelRef,
    /// The message that triggered the event.
    pub message: WebhookMessage,
    /// Author of the message.
    pub sender: UserRef,
    /// The bot that was mentioned, for mention events.
    #[serde(default)]
    pub mentioned_bot: Option<BotRef>,
}

impl WebhookEvent {
    /// Returns true if this event mentions the bot with the given ID.
    pub fn mentions_bot(&self, bot_id: &str) -> bool {
        self.mentioned_bot.as_ref().is_some_and(|bot| bot.id == bot_id)
    }
}

/// Message carried in a webhook event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookMessage {
    /// Message ID.
    pub id: String,
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_event_parsing() {
        let json = r#"{
            "type": "bot.mentioned",
            "community": {"id": "c_1", "title": "Builders"},
            "channel": {"id": "ch_1"},
            "message": {
                "id": "m_1",
                "body": {"text": "@helper ping"},
                "attachments": [{"type": "link", "url": "https://example.com"}],
                "createdAt": "2024-01-01T00:00:00Z"
            },
            "sender": {"id": "u_1", "displayName": "alice"},
            "mentionedBot": {"id": "bot_1", "name": "helper"}
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, WebhookEventType::BotMentioned);
        assert_eq!(event.community.title.as_deref(), Some("Builders"));
        assert_eq!(event.message.attachments.len(), 1);
        assert!(event.mentions_bot("bot_1"));
        assert!(!event.mentions_bot("bot_2"));
    }

    #[test]
    fn test_unknown_event_type() {
        let json = r#"{
            "type": "reaction.added",
            "community": {"id": "c_1"},
            "channel": {"id": "ch_1"},
            "message": {"id": "m_1", "body": {"text": ""}, "createdAt": "2024-01-01T00:00:00Z"},
            "sender": {"id": "u_1"}
        }"#;

        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, WebhookEventType::Unknown);
        assert!(event.mentioned_bot.is_none());
    }
}
