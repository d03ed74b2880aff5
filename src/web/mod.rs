mod error;
pub mod extractors;
mod handlers;
mod routes;
pub mod security;
mod state;

pub use error::{AppError, AppResult};
pub use state::AppState;

use crate::{Config, Database};
use anyhow::Result;
use axum::middleware;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

/// Builds the full application router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(routes::public_routes())
        .merge(routes::media_routes(&state.media_dir))
        .fallback(handlers::public::fallback)
        .layer(middleware::from_fn(security::apply_security_headers))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(config: Config, db: Database, addr: &str) -> Result<()> {
    let state = Arc::new(AppState::new(config, db)?);
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
