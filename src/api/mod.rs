//! REST API for quote projections.
//!
//! Provides two endpoints:
//! - `POST /projection`: project a JSON quote request over 30 years
//! - `GET /catalog`: kit prices and battery offers used for pricing

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::pricing::PriceCatalog;

pub use types::{CatalogResponse, ErrorResponse};

/// Immutable application state shared across all request handlers.
///
/// Built once at startup and wrapped in `Arc`; handlers only read it.
pub struct AppState {
    /// Catalog every projection is priced against.
    pub catalog: PriceCatalog,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/projection", post(handlers::post_projection))
        .route("/catalog", get(handlers::get_catalog))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind to `addr` or the
/// server stops on an I/O failure.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
