use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/recommendations",
            get(handlers::get_recommendations).post(handlers::submit_search),
        )
        .route("/movies", get(handlers::find_movie))
        .route("/movies/:id", get(handlers::get_movie))
}
