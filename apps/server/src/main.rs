//! Stockroom server binary.
//!
//! ```bash
//! STOCKROOM_PORT=5000 STOCKROOM_DB_PATH=./inventory.db stockroom-server
//! ```

use anyhow::Context;
use stockroom_db::Database;
use stockroom_server::{serve, shutdown_signal, AppState, ServerConfig};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    info!("Starting stockroom server...");

    let config = ServerConfig::load(None).context("Failed to load configuration")?;
    info!(
        host = %config.host,
        port = config.port,
        database = %config.database_path.display(),
        "Configuration loaded"
    );

    let db = Database::new(config.db_config())
        .await
        .context("Failed to open item store")?;

    let addr = config.bind_address().await?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    serve(listener, AppState::new(db.clone()), shutdown_signal()).await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,stockroom=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}
