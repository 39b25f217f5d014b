//! The concrete ingredient kind used by recipe books.

use crate::recipe::{IngredientAmount, IngredientKind};
use brewery_common::{BreweryError, BreweryResult, IngredientId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An ingredient identified by a normalized string id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ingredient {
    id: IngredientId,
}

impl Ingredient {
    /// Creates an ingredient from an id.
    #[must_use]
    pub fn new(id: impl Into<IngredientId>) -> Self {
        Self { id: id.into() }
    }

    /// The ingredient id.
    #[must_use]
    pub const fn id(&self) -> &IngredientId {
        &self.id
    }

    /// Parses `"id"` or `"id/amount"`. A missing amount means 1.
    pub fn parse(input: &str) -> BreweryResult<IngredientAmount<Self>> {
        let (id, amount) = match input.split_once('/') {
            Some((id, amount)) => {
                let amount = amount.trim().parse::<u32>().map_err(|_| {
                    BreweryError::InvalidInput(format!("invalid ingredient amount in '{input}'"))
                })?;
                (id, amount)
            },
            None => (input, 1),
        };

        let ingredient = Self::new(id);
        if ingredient.id.is_empty() {
            return Err(BreweryError::InvalidInput(format!(
                "missing ingredient id in '{input}'"
            )));
        }
        if amount == 0 {
            return Err(BreweryError::InvalidInput(format!(
                "ingredient amount must be positive in '{input}'"
            )));
        }
        Ok(IngredientAmount::new(ingredient, amount))
    }
}

impl IngredientKind for Ingredient {
    fn matches(&self, other: &Self) -> bool {
        self.id == other.id
    }

    fn debug_id(&self) -> String {
        self.id.to_string()
    }
}

impl From<&str> for Ingredient {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for Ingredient {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.id, f)
    }
}
