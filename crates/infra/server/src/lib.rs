//! # CG Bot Server
//!
//! Standalone webhook receiver for a CG bot. Incoming webhooks are verified
//! by [`cg_axum::WebhookLayer`]; when the bot is mentioned it answers in the
//! same channel through [`cg_client::BotClient`].

mod config;

pub use config::{load_config, resolve_config, AppConfig, BotFileConfig, ConfigError, FileConfig, ServerConfig};

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use cg_axum::{VerifiedWebhook, WebhookLayer, WebhookLayerConfig};
use cg_client::{BotClient, ClientError, SendMessageRequest};
use cg_core::MessageBody;
use cg_webhooks::{WebhookEvent, WebhookEventType};

/// Path the platform delivers webhooks to.
pub const WEBHOOK_PATH: &str = "/webhook";

/// Server error.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The bot server.
pub struct BotServer {
    /// Resolved configuration.
    pub config: AppConfig,
    client: Arc<BotClient>,
}

impl BotServer {
    /// Creates a new bot server.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let client = Arc::new(BotClient::new(config.client.clone())?);
        Ok(Self { config, client })
    }

    /// Builds the HTTP router.
    pub fn router(&self) -> Router {
        let webhook_layer = WebhookLayer::with_config(
            self.config.webhook_secret.clone(),
            WebhookLayerConfig::new().max_body_bytes(self.config.server.max_body_bytes),
        );

        let webhooks = Router::new()
            .route(WEBHOOK_PATH, post(webhook_handler))
            .layer(webhook_layer)
            .with_state(self.client.clone());

        Router::new()
            .route("/health", get(health_handler))
            .merge(webhooks)
    }

    /// Starts the server.
    pub async fn run(&self) -> Result<(), ServerError> {
        let addr = format!("{}:{}", self.config.server.host, self.config.server.port);
        let listener = tokio::net::TcpListener::bind(&addr).await?;

        tracing::info!("Starting CG bot server on {}", addr);
        axum::serve(listener, self.router()).await?;

        Ok(())
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

async fn webhook_handler(
    State(client): State<Arc<BotClient>>,
    VerifiedWebhook(event): VerifiedWebhook,
) -> Response {
    tracing::info!(
        event_type = ?event.event_type,
        community_id = %event.community.id,
        channel_id = %event.channel.id,
        "Webhook received"
    );

    let Some(request) = reply_for(&event) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    match client.send_message(&request).await {
        Ok(message) => Json(serde_json::json!({ "replied": message.id })).into_response(),
        Err(e) => {
            tracing::error!("Failed to reply to {}: {}", event.message.id, e);
            let body = serde_json::json!({
                "error": "REPLY_FAILED",
                "message": e.to_string(),
                "code": 502
            });
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    }
}

/// Builds the reply for an event, if the bot should answer it.
fn reply_for(event: &WebhookEvent) -> Option<SendMessageRequest> {
    if event.event_type != WebhookEventType::BotMentioned {
        return None;
    }
    let bot = event.mentioned_bot.as_ref()?;

    let who = event.sender.display_name.as_deref().unwrap_or(&event.sender.id);
    let text = format!("Hi {}, {} is listening.", who, bot.name);

    Some(
        SendMessageRequest::new(&event.community.id, &event.channel.id, MessageBody::text(text))
            .reply_to(&event.message.id),
    )
}
