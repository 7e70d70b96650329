//! Client-facing recipe shapes and the ingredient-search request body.

use crate::recipes::RecipeError;
use crate::spoonacular::SearchQuery;
use serde::{Deserialize, Deserializer, Serialize};
use ts_rs::TS;

/// One numbered preparation step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Instruction {
    pub number: u32,
    pub step: String,
}

/// A recipe in the canonical shape served by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Recipe {
    #[ts(type = "number")]
    pub id: u64,
    pub title: String,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
    pub summary: Option<String>,
    pub instructions: Vec<Instruction>,
    /// Present on search results only.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub used_ingredient_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub missed_ingredient_count: Option<u32>,
}

/// `POST /api/recipes/search` body.
///
/// Filter fields accept the empty string as "not set", matching what the
/// search form sends for unselected options.
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SearchRequest {
    #[serde(default)]
    pub ingredients: Vec<String>,
    pub diet: Option<String>,
    #[serde(default, deserialize_with = "comma_list")]
    #[ts(type = "string | Array<string> | null")]
    pub intolerances: Option<String>,
    pub cuisine: Option<String>,
    #[serde(rename = "type")]
    pub meal_type: Option<String>,
    #[serde(default, deserialize_with = "minutes")]
    #[ts(type = "number | string | null")]
    pub max_ready_time: Option<u32>,
}

impl SearchRequest {
    /// Validate and convert into an upstream query returning at most `limit` results.
    ///
    /// Ingredients are trimmed and de-duplicated case-insensitively, keeping
    /// the first spelling; at least one is required.
    pub fn into_query(self, limit: u32) -> Result<SearchQuery, RecipeError> {
        let mut ingredients: Vec<String> = Vec::with_capacity(self.ingredients.len());
        for raw in self.ingredients {
            let name = raw.trim();
            if name.is_empty() {
                continue;
            }
            if !ingredients.iter().any(|seen| seen.eq_ignore_ascii_case(name)) {
                ingredients.push(name.to_owned());
            }
        }

        if ingredients.is_empty() {
            return Err(RecipeError::Validation(
                "At least one ingredient is required".to_owned(),
            ));
        }
        if self.max_ready_time == Some(0) {
            return Err(RecipeError::Validation(
                "maxReadyTime must be a positive number of minutes".to_owned(),
            ));
        }

        Ok(SearchQuery {
            include_ingredients: ingredients,
            diet: non_empty(self.diet),
            intolerances: non_empty(self.intolerances),
            cuisine: non_empty(self.cuisine),
            meal_type: non_empty(self.meal_type),
            max_ready_time: self.max_ready_time,
            number: limit,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// Accepts `"gluten,dairy"` or `["gluten", "dairy"]`.
fn comma_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Raw>::deserialize(deserializer)? {
        None => None,
        Some(Raw::One(s)) => Some(s),
        Some(Raw::Many(items)) => Some(
            items
                .iter()
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(","),
        ),
    })
}

/// Accepts `30`, `"30"`, `""` or `null`.
fn minutes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u32>, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Number(n)) => Ok(Some(n)),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(Raw::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("invalid maxReadyTime '{s}'"))),
    }
}
