//! Cache-fronted access to popular recipes, recipe detail and ingredient search.

use crate::recipes::RecipeError;
use crate::recipes::cache::{CacheEntry, CacheSlot, RecipeCache};
use crate::recipes::models::{Recipe, SearchRequest};
use crate::recipes::normalize::normalize_recipe;
use crate::spoonacular::{Quota, RecipeSource, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Size of the random batch behind the popular listing.
pub const POPULAR_BATCH_SIZE: u32 = 6;
/// Maximum number of ingredient-search results.
pub const SEARCH_RESULT_LIMIT: u32 = 6;

pub const DEFAULT_POPULAR_TTL: Duration = Duration::from_secs(60 * 60);
pub const DEFAULT_RECIPE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// How an endpoint treats its cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EndpointPolicy {
    /// Entries younger than this are served without contacting upstream.
    pub ttl: Duration,
    /// Serve the last cached payload, however old, when the refresh fails.
    pub fallback_to_stale_on_error: bool,
}

impl EndpointPolicy {
    pub const fn popular(ttl: Duration) -> Self {
        Self {
            ttl,
            fallback_to_stale_on_error: true,
        }
    }

    pub const fn detail(ttl: Duration) -> Self {
        Self {
            ttl,
            fallback_to_stale_on_error: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub popular: EndpointPolicy,
    pub detail: EndpointPolicy,
    pub recipe_capacity: Option<usize>,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            popular: EndpointPolicy::popular(DEFAULT_POPULAR_TTL),
            detail: EndpointPolicy::detail(DEFAULT_RECIPE_TTL),
            recipe_capacity: None,
        }
    }
}

/// Snapshot of cache occupancy for the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub cached_recipes: usize,
    pub popular_age: Option<Duration>,
}

/// Proxy over a [`RecipeSource`] with a popular-batch slot and a per-recipe cache.
pub struct RecipeService {
    source: Arc<dyn RecipeSource>,
    popular: CacheSlot<Vec<Recipe>>,
    recipes: RecipeCache,
    settings: CacheSettings,
}

impl RecipeService {
    pub fn new(source: Arc<dyn RecipeSource>, settings: CacheSettings) -> Self {
        Self {
            source,
            popular: CacheSlot::new(),
            recipes: RecipeCache::new(settings.recipe_capacity),
            settings,
        }
    }

    /// The per-recipe cache, exposed for inspection and pre-seeding.
    pub fn recipe_cache(&self) -> &RecipeCache {
        &self.recipes
    }

    /// Current popular batch: fresh cache, else upstream, else (on failure) the stale batch.
    pub async fn popular(&self) -> Result<Arc<Vec<Recipe>>, RecipeError> {
        let policy = self.settings.popular;
        let cached = self.popular.get().await;
        if let Some(entry) = &cached
            && entry.is_fresh(policy.ttl)
        {
            debug!(count = entry.payload.len(), "serving popular recipes from cache");
            return Ok(entry.payload.clone());
        }

        match self.source.random_recipes(POPULAR_BATCH_SIZE).await {
            Ok(batch) => {
                let recipes: Vec<Recipe> = batch.into_iter().map(normalize_recipe).collect();
                info!(count = recipes.len(), "refreshed popular recipes");
                Ok(self.popular.set(recipes).await)
            }
            Err(e) => recover(e, cached, policy, "popular recipes"),
        }
    }

    /// A single recipe by its upstream id.
    pub async fn recipe(&self, id: &str) -> Result<Arc<Recipe>, RecipeError> {
        let id = parse_recipe_id(id)?;
        let key = id.to_string();
        let policy = self.settings.detail;

        let cached = self.recipes.get(&key);
        if let Some(entry) = &cached
            && entry.is_fresh(policy.ttl)
        {
            debug!(recipe_id = id, "serving recipe from cache");
            return Ok(entry.payload.clone());
        }

        match self.source.recipe_information(id).await {
            Ok(upstream) => {
                let recipe = normalize_recipe(upstream);
                debug!(recipe_id = id, "cached recipe detail");
                Ok(self.recipes.set(key, recipe))
            }
            Err(e) => recover(e, cached, policy, "recipe detail"),
        }
    }

    /// Ingredient search, ranked upstream by how many given ingredients each recipe uses.
    ///
    /// Results are written into the recipe cache only for ids not already
    /// cached, so a search never replaces an entry fetched through detail.
    pub async fn search(&self, request: SearchRequest) -> Result<Vec<Recipe>, RecipeError> {
        let query = request.into_query(SEARCH_RESULT_LIMIT)?;

        let results = self.source.complex_search(&query).await.map_err(|e| {
            warn!(error = %e, ingredients = ?query.include_ingredients, "ingredient search failed");
            RecipeError::from(e)
        })?;

        let recipes: Vec<Recipe> = results
            .into_iter()
            .take(SEARCH_RESULT_LIMIT as usize)
            .map(normalize_recipe)
            .collect();

        let mut inserted = 0;
        for recipe in &recipes {
            if self
                .recipes
                .set_if_absent(recipe.id.to_string(), recipe.clone())
            {
                inserted += 1;
            }
        }
        debug!(
            count = recipes.len(),
            newly_cached = inserted,
            "ingredient search complete"
        );

        Ok(recipes)
    }

    /// Upstream daily quota usage. Never cached.
    pub async fn quota(&self) -> Result<Quota, RecipeError> {
        self.source.quota().await.map_err(|e| {
            warn!(error = %e, "quota check failed");
            RecipeError::from(e)
        })
    }

    pub async fn stats(&self) -> CacheStats {
        CacheStats {
            cached_recipes: self.recipes.len(),
            popular_age: self.popular.get().await.map(|entry| entry.age()),
        }
    }
}

/// Apply `policy` to a failed refresh: hand back the previous payload when
/// allowed and available, otherwise surface the upstream error.
fn recover<T>(
    err: UpstreamError,
    cached: Option<CacheEntry<T>>,
    policy: EndpointPolicy,
    what: &str,
) -> Result<Arc<T>, RecipeError> {
    match cached {
        Some(entry) if policy.fallback_to_stale_on_error => {
            warn!(
                error = %err,
                age_secs = entry.age().as_secs(),
                "serving stale {what} after upstream failure"
            );
            Ok(entry.payload)
        }
        _ => {
            if err.is_transient() {
                warn!(error = %err, "failed to fetch {what}");
            } else {
                debug!(error = %err, "upstream refused {what}");
            }
            Err(err.into())
        }
    }
}

/// Recipe ids are upstream's positive integers.
fn parse_recipe_id(raw: &str) -> Result<u64, RecipeError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|&id| id > 0)
        .ok_or_else(|| RecipeError::Validation(format!("Invalid recipe id '{raw}'")))
}
