//! Scripted upstream for exercising the recipe service without network access.
#![allow(dead_code)]

use recipe_proxy::spoonacular::{Quota, RecipeSource, SearchQuery, UpstreamError, UpstreamRecipe};
use serde_json::json;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// How the fake should fail its next calls.
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Unavailable,
    Rejected(u16),
}

impl Failure {
    fn to_error(self) -> UpstreamError {
        match self {
            Failure::Unavailable => UpstreamError::Unavailable("connection refused".into()),
            Failure::Rejected(status) => UpstreamError::Rejected {
                status,
                message: "Your daily points limit of 150 has been reached.".into(),
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct Calls {
    pub random: AtomicUsize,
    pub detail: AtomicUsize,
    pub search: AtomicUsize,
    pub quota: AtomicUsize,
}

impl Calls {
    pub fn random(&self) -> usize {
        self.random.load(Ordering::SeqCst)
    }
    pub fn detail(&self) -> usize {
        self.detail.load(Ordering::SeqCst)
    }
    pub fn search(&self) -> usize {
        self.search.load(Ordering::SeqCst)
    }
    pub fn quota(&self) -> usize {
        self.quota.load(Ordering::SeqCst)
    }
}

/// Serves a fixed catalog: `random_recipes` returns its head, detail looks
/// ids up, search returns it whole.
#[derive(Default)]
pub struct FakeSource {
    pub calls: Calls,
    catalog: Mutex<Vec<UpstreamRecipe>>,
    failure: Mutex<Option<Failure>>,
    last_query: Mutex<Option<SearchQuery>>,
}

impl FakeSource {
    pub fn with_catalog(catalog: Vec<UpstreamRecipe>) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            ..Default::default()
        }
    }

    pub fn fail_with(&self, failure: Failure) {
        *self.failure.lock().unwrap() = Some(failure);
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn set_catalog(&self, catalog: Vec<UpstreamRecipe>) {
        *self.catalog.lock().unwrap() = catalog;
    }

    pub fn last_query(&self) -> Option<SearchQuery> {
        self.last_query.lock().unwrap().clone()
    }

    fn check(&self) -> Result<(), UpstreamError> {
        match *self.failure.lock().unwrap() {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl RecipeSource for FakeSource {
    async fn random_recipes(&self, count: u32) -> Result<Vec<UpstreamRecipe>, UpstreamError> {
        self.calls.random.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let catalog = self.catalog.lock().unwrap();
        Ok(catalog.iter().take(count as usize).cloned().collect())
    }

    async fn recipe_information(&self, id: u64) -> Result<UpstreamRecipe, UpstreamError> {
        self.calls.detail.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        let catalog = self.catalog.lock().unwrap();
        catalog
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(UpstreamError::NotFound(id))
    }

    async fn complex_search(
        &self,
        query: &SearchQuery,
    ) -> Result<Vec<UpstreamRecipe>, UpstreamError> {
        self.calls.search.fetch_add(1, Ordering::SeqCst);
        *self.last_query.lock().unwrap() = Some(query.clone());
        self.check()?;
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn quota(&self) -> Result<Quota, UpstreamError> {
        self.calls.quota.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(Quota {
            used: Some("12.5".into()),
            remaining: Some("137.5".into()),
        })
    }
}

/// An upstream record whose instructions arrive as newline-delimited text.
pub fn text_recipe(id: u64, title: &str) -> UpstreamRecipe {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "image": format!("https://img.spoonacular.com/recipes/{id}-556x370.jpg"),
        "readyInMinutes": 30,
        "servings": 4,
        "sourceUrl": format!("https://example.com/recipes/{id}"),
        "summary": format!("<b>{title}</b> is easy."),
        "instructions": "Rinse the rice.\n\n  Brown the chicken.  \nSimmer together.\n",
        "usedIngredientCount": 2,
        "missedIngredientCount": 3
    }))
    .unwrap()
}

/// An upstream record whose instructions arrive as analyzed steps.
pub fn structured_recipe(id: u64, title: &str) -> UpstreamRecipe {
    serde_json::from_value(json!({
        "id": id,
        "title": title,
        "readyInMinutes": 15,
        "servings": 2,
        "analyzedInstructions": [
            {"name": "", "steps": [
                {"number": 1, "step": "Whisk eggs.", "ingredients": [], "equipment": []},
                {"number": 2, "step": "Cook gently.", "ingredients": [], "equipment": []}
            ]}
        ]
    }))
    .unwrap()
}

/// A record with no instructions at all.
pub fn bare_recipe(id: u64, title: &str) -> UpstreamRecipe {
    serde_json::from_value(json!({ "id": id, "title": title, "instructions": null })).unwrap()
}
