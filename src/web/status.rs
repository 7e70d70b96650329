//! Health and status handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::trace;
use ts_rs::TS;

use crate::state::AppState;

#[derive(Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CacheStatus {
    cached_recipes: usize,
    popular_cached: bool,
    #[ts(type = "number | null")]
    popular_age_secs: Option<u64>,
}

#[derive(Serialize, TS)]
#[ts(export)]
pub struct StatusResponse {
    version: String,
    commit: String,
    cache: CacheStatus,
}

/// Health check endpoint
pub(super) async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Build info and cache occupancy
pub(super) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let stats = state.recipes.stats().await;

    Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("GIT_COMMIT_HASH").to_string(),
        cache: CacheStatus {
            cached_recipes: stats.cached_recipes,
            popular_cached: stats.popular_age.is_some(),
            popular_age_secs: stats.popular_age.map(|age| age.as_secs()),
        },
    })
}
