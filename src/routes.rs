//! HTTP route definitions.

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::docs;
use crate::handlers::{
    create_ad, create_ad_method_not_allowed, health, health_method_not_allowed, AppState,
};

/// Ad payloads are a few kilobytes at most.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the application router.
///
/// API routes answer both at the root and under `/api`.
/// OPTIONS requests are answered by the CORS layer before routing.
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health).fallback(health_method_not_allowed))
        .route(
            "/create-ad",
            post(create_ad).fallback(create_ad_method_not_allowed),
        );

    Router::new()
        .route("/", get(docs::index))
        .merge(api.clone())
        .nest("/api", api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}
