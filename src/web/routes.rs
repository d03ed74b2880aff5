use super::handlers;
use super::state::AppState;
use axum::routing::get;
use axum::Router;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

pub fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::public::home))
        .route("/posts", get(handlers::public::post_list))
        .route("/posts/", get(handlers::public::post_list))
        .route("/posts/:slug", get(handlers::public::post_detail))
        .route("/posts/:slug/", get(handlers::public::post_detail))
        .route("/projects", get(handlers::public::project_index))
        .route("/projects/", get(handlers::public::project_index))
        .route("/health", get(handlers::public::health))
}

pub fn media_routes(media_dir: &Path) -> Router<Arc<AppState>> {
    Router::new().nest_service("/media", ServeDir::new(media_dir))
}
