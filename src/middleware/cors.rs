use axum::http::{header, Method};
use tower_http::cors::{Any, CorsLayer};

/// The ranking API is consumed by browser dashboards on other origins.
pub fn permissive_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
        .expose_headers([header::CONTENT_DISPOSITION])
        .allow_origin(Any)
}
