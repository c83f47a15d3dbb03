use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/recommendations", recommendation_routes())
        .with_state(state)
        .layer(
            // Request ids are assigned before the trace span is built
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

fn recommendation_routes() -> Router<AppState> {
    Router::new()
        .route("/content-based/:song_title", get(handlers::content_based))
        .route("/genre-artist", post(handlers::genre_artist))
        .route("/collaborative/:user_id", get(handlers::collaborative))
        .route("/hybrid", post(handlers::hybrid))
        .route("/popular", get(handlers::popular))
}
