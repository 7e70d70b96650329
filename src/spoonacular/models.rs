//! Wire types for Spoonacular responses.
//!
//! Only the fields the proxy consumes are modelled; everything else in the
//! upstream payload is ignored during decoding.

use serde::Deserialize;

/// One numbered instruction step, as Spoonacular emits it inside
/// `analyzedInstructions[].steps`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstructionStep {
    pub number: u32,
    pub step: String,
}

/// The two encodings upstream uses for a recipe's `instructions` field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Instructions {
    Structured(Vec<InstructionStep>),
    Text(String),
}

/// A named block of steps from `analyzedInstructions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzedInstruction {
    #[serde(default)]
    pub steps: Vec<InstructionStep>,
}

/// A recipe record as returned by `/recipes/random`, `/recipes/{id}/information`
/// and `/recipes/complexSearch` (with `addRecipeInformation=true`).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamRecipe {
    pub id: u64,
    pub title: Option<String>,
    pub image: Option<String>,
    pub ready_in_minutes: Option<u32>,
    pub servings: Option<u32>,
    pub source_url: Option<String>,
    pub summary: Option<String>,
    #[serde(default)]
    pub instructions: Option<Instructions>,
    #[serde(default)]
    pub analyzed_instructions: Vec<AnalyzedInstruction>,
    pub used_ingredient_count: Option<u32>,
    pub missed_ingredient_count: Option<u32>,
}

impl UpstreamRecipe {
    /// Resolve whichever instruction encoding upstream sent.
    ///
    /// Non-empty `analyzedInstructions` win over the free-form field; their
    /// sections are flattened in order.
    pub fn raw_instructions(&self) -> Option<Instructions> {
        let steps: Vec<InstructionStep> = self
            .analyzed_instructions
            .iter()
            .flat_map(|section| section.steps.iter().cloned())
            .collect();

        if !steps.is_empty() {
            return Some(Instructions::Structured(steps));
        }
        self.instructions.clone()
    }
}

/// Body of `/recipes/random`.
#[derive(Debug, Deserialize)]
pub struct RandomRecipes {
    #[serde(default)]
    pub recipes: Vec<UpstreamRecipe>,
}

/// Body of `/recipes/complexSearch`.
#[derive(Debug, Deserialize)]
pub struct ComplexSearchResults {
    #[serde(default)]
    pub results: Vec<UpstreamRecipe>,
}

/// Daily quota counters reported through response headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quota {
    pub used: Option<String>,
    pub remaining: Option<String>,
}
