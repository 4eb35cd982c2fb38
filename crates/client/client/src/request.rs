//! Request bodies for the bot API.

use serde::{Deserialize, Serialize};

use cg_core::{Attachment, MessageBody};

/// Body of a `sendMessage` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessageRequest {
    /// Target community.
    pub community_id: String,
    /// Target channel.
    pub channel_id: String,
    /// Message content.
    pub body: MessageBody,
    /// Attachments, sent as `[]` when empty.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    /// Message to reply to, sent as `null` when absent.
    #[serde(default)]
    pub reply_to_message_id: Option<String>,
}

impl SendMessageRequest {
    /// Creates a request with no attachments that is not a reply.
    pub fn new(community_id: impl Into<String>, channel_id: impl Into<String>, body: MessageBody) -> Self {
        Self {
            community_id: community_id.into(),
            channel_id: channel_id.into(),
            body,
            attachments: Vec::new(),
            reply_to_message_id: None,
        }
    }

    /// Adds an attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Marks the message as a reply.
    pub fn reply_to(mut self, message_id: impl Into<String>) -> Self {
        self.reply_to_message_id = Some(message_id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let request = SendMessageRequest::new("c_1", "ch_1", MessageBody::text("hello"));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "communityId": "c_1",
                "channelId": "ch_1",
                "body": {"text": "hello"},
                "attachments": [],
                "replyToMessageId": null
            })
        );
    }

    #[test]
    fn test_reply_with_attachment() {
        let request = SendMessageRequest::new("c_1", "ch_1", MessageBody::text("look"))
            .with_attachment(Attachment::link("https://example.com"))
            .reply_to("m_9");
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["replyToMessageId"], "m_9");
        assert_eq!(json["attachments"][0]["type"], "link");
    }
}
