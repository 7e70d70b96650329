//! Web API router construction and shared response utilities.

use axum::{
    Router,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use std::time::Duration;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{recipes, status};

/// Cache-Control presets for API responses.
pub mod cache {
    /// Popular batch; upstream refreshes it hourly.
    pub const POPULAR: &str = "public, max-age=300";
    /// Ingredient search results.
    pub const SEARCH: &str = "public, max-age=60";
    /// Single recipe detail.
    pub const DETAIL: &str = "public, max-age=3600";
    /// Quota counters change with every upstream call.
    pub const NO_STORE: &str = "no-store";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Requests still running after this long are answered with 408.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

fn request_timeout() -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, REQUEST_TIMEOUT)
}

/// Creates the web server router.
///
/// `cors_origin` is the single browser origin allowed to call the API with
/// credentials; `None` disables the CORS layer.
pub fn create_router(app_state: AppState, cors_origin: Option<HeaderValue>) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/recipes/popular", get(recipes::popular))
        .route("/recipes/quota", get(recipes::quota))
        .route("/recipes/search", post(recipes::search))
        .route("/recipes/{id}", get(recipes::get_recipe))
        .with_state(app_state);

    let router = Router::new().nest("/api", api_router);

    let router = match cors_origin {
        Some(origin) => router.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
                .allow_credentials(true)
                .max_age(Duration::from_secs(60 * 60)),
        ),
        None => router,
    };

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        request_timeout(),
    ))
}
