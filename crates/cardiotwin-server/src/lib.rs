//! # cardiotwin-server
//!
//! The HTTP query surface over a shared [`StateStore`], plus the TOML
//! application configuration the `cardiotwin` binary starts from.
//!
//! The server only reads and mutates the store; it never samples or
//! classifies. Pair it with a `cardiotwin_core::Simulator` running on its own
//! thread against the same store.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use cardiotwin_core::StateStore;
//! use cardiotwin_server::{serve, AppConfig};
//!
//! let config = AppConfig::from_file(Path::new("cardiotwin.toml"))?;
//! let store = Arc::new(StateStore::new(config.thresholds));
//! serve(store, config.bind_addr()?).await?;
//! ```

pub mod config;
pub mod error;
pub mod routes;

use std::{net::SocketAddr, sync::Arc};

use tokio::net::TcpListener;
use tracing::info;

use cardiotwin_contracts::error::{CardioError, CardioResult};
use cardiotwin_core::StateStore;

pub use config::AppConfig;
pub use error::ApiError;
pub use routes::router;

/// Bind `addr` and serve the API until the process exits.
pub async fn serve(store: Arc<StateStore>, addr: SocketAddr) -> CardioResult<()> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| CardioError::ConfigError {
            reason: format!("failed to bind {}: {}", addr, e),
        })?;
    info!(%addr, "HTTP API listening");

    axum::serve(listener, router(store))
        .await
        .map_err(|e| CardioError::ConfigError {
            reason: format!("HTTP server stopped: {}", e),
        })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
