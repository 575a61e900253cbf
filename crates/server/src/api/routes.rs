use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::{handlers, llm, middleware::metrics_middleware, video};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let static_dir = state.config().server.static_dir.clone();

    // API routes
    let api_routes = Router::new()
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        // Chat relay
        .route("/llm", post(llm::ask))
        // Video generation
        .route("/video/generate", post(video::generate));

    // Landing page with index.html for unknown paths
    let index_path = static_dir.join("index.html");
    let serve_dir = ServeDir::new(&static_dir).fallback(ServeFile::new(index_path));

    Router::new()
        .nest("/api/v1", api_routes)
        .route("/video", get(video::serve))
        .route("/generate-video", get(video::generate_default))
        .route("/metrics", get(handlers::metrics))
        .with_state(state)
        .fallback_service(serve_dir)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
}
