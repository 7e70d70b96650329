//! Recipe proxy handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::{Json, Response};
use serde::Serialize;
use ts_rs::TS;

use crate::recipes::SearchRequest;
use crate::spoonacular::Quota;
use crate::state::AppState;
use crate::web::error::ApiError;
use crate::web::routes::{cache, with_cache_control};

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct QuotaResponse {
    pub used: Option<String>,
    pub remaining: Option<String>,
}

impl From<Quota> for QuotaResponse {
    fn from(quota: Quota) -> Self {
        Self {
            used: quota.used,
            remaining: quota.remaining,
        }
    }
}

/// `GET /api/recipes/popular`
pub(super) async fn popular(State(state): State<AppState>) -> Result<Response, ApiError> {
    let recipes = state.recipes.popular().await?;
    Ok(with_cache_control(recipes.as_slice(), cache::POPULAR))
}

/// `GET /api/recipes/{id}`
pub(super) async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let recipe = state.recipes.recipe(&id).await?;
    Ok(with_cache_control(&*recipe, cache::DETAIL))
}

/// `POST /api/recipes/search`
pub(super) async fn search(
    State(state): State<AppState>,
    body: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let recipes = state.recipes.search(request).await?;
    Ok(with_cache_control(recipes, cache::SEARCH))
}

/// `GET /api/recipes/quota`
pub(super) async fn quota(State(state): State<AppState>) -> Result<Response, ApiError> {
    let quota = state.recipes.quota().await?;
    Ok(with_cache_control(QuotaResponse::from(quota), cache::NO_STORE))
}
