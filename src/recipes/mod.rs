//! Recipe proxy core: canonical recipe shape, caches, and the service tying
//! them to the upstream provider.

pub mod cache;
pub mod models;
pub mod normalize;
pub mod service;

pub use models::{Instruction, Recipe, SearchRequest};
pub use service::{CacheSettings, CacheStats, EndpointPolicy, RecipeService};

use crate::spoonacular::UpstreamError;

#[derive(Debug, thiserror::Error)]
pub enum RecipeError {
    /// The request was rejected before contacting upstream.
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}
