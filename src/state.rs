//! Application state shared across request handlers.

use crate::recipes::{CacheSettings, RecipeService};
use crate::spoonacular::RecipeSource;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<RecipeService>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecipeSource>, cache_settings: CacheSettings) -> Self {
        Self {
            recipes: Arc::new(RecipeService::new(source, cache_settings)),
        }
    }
}
