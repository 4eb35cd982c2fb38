//! Bot API client.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use serde_json::Value;

use cg_core::Message;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::request::SendMessageRequest;

/// Path of the send-message endpoint.
pub const SEND_MESSAGE_PATH: &str = "/api/v2/Bot/sendMessage";

/// Client for the CG bot API.
#[derive(Debug, Clone)]
pub struct BotClient {
    config: ClientConfig,
    http: reqwest::Client,
}

impl BotClient {
    /// Creates a new client.
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        if config.token.is_empty() {
            return Err(ClientError::Config("bot token is empty".to_string()));
        }
        if config.base_url.is_empty() {
            return Err(ClientError::Config("base URL is empty".to_string()));
        }

        let http = reqwest::Client::builder().build()?;
        Ok(Self { config, http })
    }

    /// Posts a message and returns the created message.
    ///
    /// The response body is inspected even on a 2xx status, since the API may
    /// report errors in-body.
    pub async fn send_message(&self, request: &SendMessageRequest) -> ClientResult<Message> {
        let url = self.endpoint(SEND_MESSAGE_PATH);
        tracing::debug!(
            community_id = %request.community_id,
            channel_id = %request.channel_id,
            "Sending message"
        );

        let result = self.post(&url, request).await;
        match &result {
            Ok(message) => tracing::info!(message_id = %message.id, "Message sent"),
            Err(e) => tracing::warn!("sendMessage failed: {}", e),
        }
        result
    }

    async fn post(&self, url: &str, request: &SendMessageRequest) -> ClientResult<Message> {
        let response = self
            .http
            .post(url)
            .header(AUTHORIZATION, format!("Bot {}", self.config.token))
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .json(request)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        decode_response(status, &body)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Gets the configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Maps a status and body to the created message or a classified error.
fn decode_response(status: u16, body: &str) -> ClientResult<Message> {
    if !(200..300).contains(&status) {
        let (code, message) = serde_json::from_str::<Value>(body)
            .ok()
            .as_ref()
            .and_then(error_fields)
            .unwrap_or_else(|| (format!("HTTP_{}", status), body.to_string()));
        return Err(ClientError::Api {
            status,
            code,
            message,
        });
    }

    let value: Value = serde_json::from_str(body)?;
    if let Some((code, message)) = error_fields(&value) {
        return Err(ClientError::Application { code, message });
    }

    Ok(serde_json::from_value(value)?)
}

/// Extracts `{error, message}` from an error-shaped body.
fn error_fields(value: &Value) -> Option<(String, String)> {
    let error = value.get("error").filter(|e| !e.is_null())?;
    let code = match error {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some((code, message))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MESSAGE: &str = r#"{"id":"m_1","communityId":"c","channelId":"ch","creatorId":"bot","body":{"text":"hi"},"createdAt":"2024-01-01T00:00:00Z"}"#;

    #[test]
    fn test_decode_success() {
        let message = decode_response(200, MESSAGE).unwrap();
        assert_eq!(message.id, "m_1");
    }

    #[test]
    fn test_decode_in_body_error() {
        let err = decode_response(200, r#"{"error":"CHANNEL_NOT_FOUND","message":"no such channel"}"#).unwrap_err();
        match err {
            ClientError::Application { code, message } => {
                assert_eq!(code, "CHANNEL_NOT_FOUND");
                assert_eq!(message, "no such channel");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_api_error() {
        let err = decode_response(403, r#"{"error":"FORBIDDEN","message":"bot not in community"}"#).unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 403, ref code, .. } if code == "FORBIDDEN"
        ));

        let err = decode_response(502, "<html>bad gateway</html>").unwrap_err();
        match err {
            ClientError::Api { status, code, message } => {
                assert_eq!(status, 502);
                assert_eq!(code, "HTTP_502");
                assert_eq!(message, "<html>bad gateway</html>");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_decode_invalid_json() {
        assert!(matches!(decode_response(200, "ok"), Err(ClientError::InvalidJson(_))));
        assert!(matches!(decode_response(200, r#"{"id":1}"#), Err(ClientError::InvalidJson(_))));
    }

    #[test]
    fn test_endpoint_trims_slash() {
        let client = BotClient::new(ClientConfig::new("tok").base_url("http://localhost:1/")).unwrap();
        assert_eq!(
            client.endpoint(SEND_MESSAGE_PATH),
            "http://localhost:1/api/v2/Bot/sendMessage"
        );
    }

    #[test]
    fn test_empty_token_rejected() {
        assert!(matches!(BotClient::new(ClientConfig::new("")), Err(ClientError::Config(_))));
    }
}
