//! Permissive CORS for the browser client.
//!
//! Any origin may call the API. Preflight `OPTIONS` requests are answered by
//! the layer and never reach a handler.

use axum::http::header::CONTENT_TYPE;
use axum::http::Method;
use tower_http::cors::{Any, CorsLayer};

/// Methods the item routes answer.
pub const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// CORS layer applied to every route.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([CONTENT_TYPE])
}
