//! Spoonacular recipe API client.

pub mod api;
pub mod errors;
pub mod json;
pub mod middleware;
pub mod models;

pub use api::SpoonacularApi;
pub use errors::UpstreamError;
pub use models::{Instructions, InstructionStep, Quota, UpstreamRecipe};

/// Upstream ranking directive for ingredient search; passed through verbatim.
pub const MAX_USED_INGREDIENTS: &str = "max-used-ingredients";

/// The upstream operations the recipe service depends on.
///
/// [`SpoonacularApi`] is the production implementation; tests substitute
/// scripted sources.
#[async_trait::async_trait]
pub trait RecipeSource: Send + Sync {
    /// A batch of `count` randomly selected recipes with full information.
    async fn random_recipes(&self, count: u32) -> Result<Vec<UpstreamRecipe>, UpstreamError>;

    /// Full detail for a single recipe.
    async fn recipe_information(&self, id: u64) -> Result<UpstreamRecipe, UpstreamError>;

    /// Ranked ingredient search.
    async fn complex_search(&self, query: &SearchQuery)
    -> Result<Vec<UpstreamRecipe>, UpstreamError>;

    /// Current daily quota counters.
    async fn quota(&self) -> Result<Quota, UpstreamError>;
}

/// Parameters for `/recipes/complexSearch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub include_ingredients: Vec<String>,
    pub diet: Option<String>,
    pub intolerances: Option<String>,
    pub cuisine: Option<String>,
    pub meal_type: Option<String>,
    pub max_ready_time: Option<u32>,
    pub number: u32,
}

impl SearchQuery {
    /// Query parameters in upstream naming, absent filters omitted.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("includeIngredients", self.include_ingredients.join(",")),
            ("addRecipeInformation", "true".to_owned()),
            ("instructionsRequired", "true".to_owned()),
            ("fillIngredients", "true".to_owned()),
            ("number", self.number.to_string()),
            ("sort", MAX_USED_INGREDIENTS.to_owned()),
        ];

        let filters = [
            ("diet", &self.diet),
            ("intolerances", &self.intolerances),
            ("cuisine", &self.cuisine),
            ("type", &self.meal_type),
        ];
        for (name, value) in filters {
            if let Some(value) = value {
                params.push((name, value.clone()));
            }
        }
        if let Some(minutes) = self.max_ready_time {
            params.push(("maxReadyTime", minutes.to_string()));
        }

        params
    }
}
