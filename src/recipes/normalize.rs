//! Conversion of upstream recipe records into the canonical [`Recipe`] shape.

use crate::recipes::models::{Instruction, Recipe};
use crate::spoonacular::{Instructions, UpstreamRecipe};

/// Resolve either instruction encoding into an ordered list of steps.
///
/// Structured steps pass through untouched. Free text is split into lines,
/// each trimmed, blank lines dropped, and the rest numbered from 1.
pub fn normalize_instructions(raw: Option<Instructions>) -> Vec<Instruction> {
    match raw {
        None => Vec::new(),
        Some(Instructions::Structured(steps)) => steps
            .into_iter()
            .map(|s| Instruction {
                number: s.number,
                step: s.step,
            })
            .collect(),
        Some(Instructions::Text(text)) => text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .zip(1..)
            .map(|(line, number)| Instruction {
                number,
                step: line.to_owned(),
            })
            .collect(),
    }
}

pub fn normalize_recipe(upstream: UpstreamRecipe) -> Recipe {
    let instructions = normalize_instructions(upstream.raw_instructions());
    Recipe {
        id: upstream.id,
        title: upstream.title.unwrap_or_default(),
        image: upstream.image,
        ready_in_minutes: upstream.ready_in_minutes,
        servings: upstream.servings,
        source_url: upstream.source_url,
        summary: upstream.summary,
        instructions,
        used_ingredient_count: upstream.used_ingredient_count,
        missed_ingredient_count: upstream.missed_ingredient_count,
    }
}
