//! # Stockroom Server
//!
//! REST API over the item store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockroom Server                                 │
//! │                                                                         │
//! │  Browser / InventoryClient                                              │
//! │         │                                                               │
//! │         ▼  HTTP (5000)                                                  │
//! │  ┌─────────────┐    ┌──────────────────┐    ┌───────────────────────┐  │
//! │  │ cors layer  │───►│ routes::items    │───►│ stockroom-db          │  │
//! │  └─────────────┘    │ routes::health   │    │  ItemRepository       │  │
//! │                     └──────────────────┘    │  (SQLite, items)      │  │
//! │                              │              └───────────────────────┘  │
//! │                              ▼                                          │
//! │                     stockroom-core validation                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Routes
//! | Method | Path          | Body            | Response          |
//! |--------|---------------|-----------------|-------------------|
//! | GET    | `/items`      |                 | `Item[]`          |
//! | POST   | `/items`      | full item       | created `Item`    |
//! | GET    | `/items/{id}` |                 | `Item`            |
//! | PUT    | `/items/{id}` | partial item    | merged `Item`     |
//! | DELETE | `/items/{id}` |                 | `Deleted`         |
//! | GET    | `/health`     |                 | `Health`          |

use std::future::Future;

use axum::routing::get;
use axum::Router;
use stockroom_db::Database;
use tokio::net::TcpListener;
use tracing::info;

pub mod config;
pub mod cors;
pub mod error;
pub mod routes;

pub use config::{ConfigError, ServerConfig};
pub use error::{ApiError, ApiResult};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState { db }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/items",
            get(routes::items::list_items).post(routes::items::create_item),
        )
        .route(
            "/items/{id}",
            get(routes::items::get_item)
                .put(routes::items::update_item)
                .delete(routes::items::delete_item),
        )
        .route("/health", get(routes::health::health))
        .layer(cors::cors_layer())
        .with_state(state)
}

/// Serves the API on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "Stockroom server listening");
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Graceful shutdown signal handler.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
