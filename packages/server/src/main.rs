//! Event Planner HTTP Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (0.0.0.0:8000, ./data/event-planner.db)
//! cargo run -p event-planner-server
//!
//! # Custom port and database
//! PORT=9000 DATABASE_PATH=/tmp/events.db cargo run -p event-planner-server
//! ```
//!
//! # Environment Variables
//!
//! - `HOST`, `PORT`: bind address
//! - `DATABASE_PATH`: libsql database file
//! - `CORS_ORIGIN`: allowed browser origin
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use event_planner_server::{start_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    tracing::info!("Event Planner API");
    tracing::info!("Database: {}", config.database_path.display());

    start_server(config).await
}
