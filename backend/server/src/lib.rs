//! Documentation of the Codexx dashboard notification service.
//!
//! # General Infrastructure
//! - Browser talks to the public reverse proxy, which owns login and sessions
//! - Proxy forwards dashboard API calls here with the viewer in `X-Viewer` / `X-Viewer-Admin`
//! - This service never sees passwords or cookies, a request without `X-Viewer` is anonymous
//!
//!
//!
//! # Endpoints
//!
//! - `GET /dashboard/notifications/latest`: unread top-level messages for the viewer, see [`store`]
//! - `GET /dashboard/api/backups`: backup metadata, newest first, see [`backups`]
//!
//! Both always answer with a JSON array. Anonymous viewers get `[]` with a 200, failures
//! get `[]` with a 500 so the notification bell degrades to a stale list.
//!
//!
//!
//! # Notes
//!
//! ## Polling
//! The dashboard polls the notification endpoint every 5 seconds while the tab is visible.
//! The inbox is read from a snapshot held in memory, so a poll is one filter over at most a
//! few thousand messages and never touches the disk.
//!
//!
//!
//! # Setup
//!
//! Run the server.
//! ```sh
//! STORE_PATH=data/messages.json BACKUPS_DIR=backups RUST_LOG=info cargo run --bin codexx
//! ```
//!
//! Watch the feed from a terminal.
//! ```sh
//! cargo run --bin poller -- --viewer admin --admin --feed-out feed.html
//! ```
use std::{sync::Arc, time::Duration};

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::get,
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::CorsLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

pub mod backups;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod store;
pub mod viewer;

use config::Config;
use error::AppError;
use routes::{backups_handler, notifications_handler};
use state::AppState;

pub async fn start_server() -> Result<(), AppError> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = AppState::new(Config::load()?).await?;

    info!("Starting server...");

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([
            CONTENT_TYPE,
            HeaderName::from_static(feed::VIEWER_HEADER),
            HeaderName::from_static(feed::VIEWER_ADMIN_HEADER),
        ])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route(feed::NOTIFICATIONS_PATH, get(notifications_handler))
        .route(feed::BACKUPS_PATH, get(backups_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
