//! CG bot server binary.

use cg_server::{load_config, BotServer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let path = std::env::args().nth(1).or_else(|| std::env::var("CG_CONFIG").ok());
    let config = load_config(path.as_deref())?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Create and run server
    let server = BotServer::new(config)?;
    server.run().await?;

    Ok(())
}
