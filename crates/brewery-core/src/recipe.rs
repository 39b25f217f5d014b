//! Recipe definitions.
//!
//! The engine is generic over [`IngredientKind`] and [`Recipe`], so hosts can
//! plug in their own item recognition and recipe storage. [`BrewRecipe`] is
//! the concrete recipe loaded from recipe book files.

use crate::ingredient::Ingredient;
use crate::material::WoodType;
use brewery_common::{BookError, BookResult, RecipeId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A distinguishable ingredient type.
pub trait IngredientKind: Clone + fmt::Debug {
    /// Whether `self` and `other` are the same kind of ingredient.
    fn matches(&self, other: &Self) -> bool;

    /// Short identifier used in logs and defect messages.
    fn debug_id(&self) -> String;
}

/// An ingredient kind together with an amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientAmount<K> {
    /// The ingredient kind
    pub ingredient: K,
    /// How many units
    pub amount: u32,
}

impl<K> IngredientAmount<K> {
    /// Creates a new ingredient amount.
    #[must_use]
    pub const fn new(ingredient: K, amount: u32) -> Self {
        Self { ingredient, amount }
    }
}

/// A recipe the engine can score a brew against.
pub trait Recipe {
    /// Ingredient kind the recipe is made from.
    type Ingredient: IngredientKind;

    /// Display name, also used for lookups.
    fn name(&self) -> &str;

    /// Required ingredients. Each kind appears at most once.
    fn ingredients(&self) -> &[IngredientAmount<Self::Ingredient>];

    /// Difficulty from 1 (forgiving) to 10 (strict).
    fn difficulty(&self) -> u32;

    /// Minutes the brew must cook.
    fn cooking_time(&self) -> u32;

    /// Distillation runs needed; 0 means no distilling.
    fn distill_runs(&self) -> u32;

    /// Ageing duration needed; 0 means no ageing.
    fn age(&self) -> f32;

    /// Barrel wood needed for ageing.
    fn wood(&self) -> WoodType;

    /// Alcohol content of a perfect brew.
    fn alcohol(&self) -> i32 {
        0
    }

    /// How far an ingredient count may deviate from `amount` before the
    /// ingredient score reaches 0.
    fn allowed_count_diff(&self, amount: u32) -> u32;

    /// How far the cooking time may deviate from `time` before the cooking
    /// score reaches 0.
    fn allowed_time_diff(&self, time: u32) -> u32;

    /// Whether the recipe must be distilled.
    fn needs_distilling(&self) -> bool {
        self.distill_runs() > 0
    }

    /// Whether the recipe must age in a barrel.
    fn needs_to_age(&self) -> bool {
        self.age() > 0.0
    }

    /// Whether any barrel wood is acceptable.
    fn uses_any_wood(&self) -> bool {
        !self.wood().is_specific()
    }

    /// Whether the brew is done once it leaves the cauldron.
    fn is_cooking_only(&self) -> bool {
        !self.needs_distilling() && !self.needs_to_age()
    }

    /// Amount of `kind` the recipe requires, 0 if it is not part of it.
    fn amount_of(&self, kind: &Self::Ingredient) -> u32 {
        self.ingredients()
            .iter()
            .find(|required| required.ingredient.matches(kind))
            .map_or(0, |required| required.amount)
    }

    /// Required ingredients absent from `present`.
    fn missing_ingredients<'a>(
        &'a self,
        present: &[IngredientAmount<Self::Ingredient>],
    ) -> Vec<&'a IngredientAmount<Self::Ingredient>> {
        self.ingredients()
            .iter()
            .filter(|required| {
                !present
                    .iter()
                    .any(|entry| entry.ingredient.matches(&required.ingredient))
            })
            .collect()
    }
}

const fn default_difficulty() -> u32 {
    1
}

/// A recipe as stored in a recipe book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrewRecipe {
    /// Unique recipe ID
    pub id: RecipeId,
    /// Display name
    pub name: String,
    /// Required ingredients
    pub ingredients: Vec<IngredientAmount<Ingredient>>,
    /// Difficulty from 1 to 10
    #[serde(default = "default_difficulty")]
    pub difficulty: u32,
    /// Minutes to cook
    #[serde(default)]
    pub cooking_time: u32,
    /// Distillation runs
    #[serde(default)]
    pub distill_runs: u32,
    /// Ageing duration
    #[serde(default)]
    pub age: f32,
    /// Barrel wood
    #[serde(default = "default_wood")]
    pub wood: WoodType,
    /// Alcohol of a perfect brew
    #[serde(default)]
    pub alcohol: i32,
}

const fn default_wood() -> WoodType {
    WoodType::Any
}

impl BrewRecipe {
    /// Creates a recipe builder.
    pub fn builder(id: RecipeId, name: impl Into<String>) -> RecipeBuilder {
        RecipeBuilder::new(id, name)
    }

    /// Checks that the recipe can be scored.
    pub fn validate(&self) -> BookResult<()> {
        let invalid = |reason: &str| BookError::InvalidRecipe {
            recipe: self.name.clone(),
            reason: reason.to_string(),
        };

        if self.name.trim().is_empty() {
            return Err(invalid("name is empty"));
        }
        if self.ingredients.is_empty() {
            return Err(invalid("no ingredients"));
        }
        if !(1..=10).contains(&self.difficulty) {
            return Err(invalid("difficulty must be between 1 and 10"));
        }
        if !self.age.is_finite() || self.age < 0.0 {
            return Err(invalid("age must be a non-negative number"));
        }
        if self.wood == WoodType::None {
            return Err(invalid("wood cannot be none"));
        }
        for (i, required) in self.ingredients.iter().enumerate() {
            if required.ingredient.id().is_empty() {
                return Err(invalid("ingredient id is empty"));
            }
            if required.amount == 0 {
                return Err(invalid("ingredient amount must be positive"));
            }
            if self.ingredients[..i]
                .iter()
                .any(|other| other.ingredient.matches(&required.ingredient))
            {
                return Err(BookError::InvalidRecipe {
                    recipe: self.name.clone(),
                    reason: format!("ingredient '{}' listed twice", required.ingredient),
                });
            }
        }
        Ok(())
    }

    fn clamped_difficulty(&self) -> f32 {
        self.difficulty.clamp(1, 10) as f32
    }
}

fn tolerance(target: u32, difficulty: f32, divisor: f32) -> u32 {
    let base = target.max(8) as f32;
    let allowed = (base * ((11.0 - difficulty) / divisor)).round() as u32;
    allowed.max(1)
}

impl Recipe for BrewRecipe {
    type Ingredient = Ingredient;

    fn name(&self) -> &str {
        &self.name
    }

    fn ingredients(&self) -> &[IngredientAmount<Ingredient>] {
        &self.ingredients
    }

    fn difficulty(&self) -> u32 {
        self.difficulty
    }

    fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    fn distill_runs(&self) -> u32 {
        self.distill_runs
    }

    fn age(&self) -> f32 {
        self.age
    }

    fn wood(&self) -> WoodType {
        self.wood
    }

    fn alcohol(&self) -> i32 {
        self.alcohol
    }

    fn allowed_count_diff(&self, amount: u32) -> u32 {
        tolerance(amount, self.clamped_difficulty(), 20.0)
    }

    fn allowed_time_diff(&self, time: u32) -> u32 {
        tolerance(time, self.clamped_difficulty(), 10.0)
    }
}

impl fmt::Display for BrewRecipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// Builder for creating recipes.
#[derive(Debug)]
pub struct RecipeBuilder {
    recipe: BrewRecipe,
}

impl RecipeBuilder {
    fn new(id: RecipeId, name: impl Into<String>) -> Self {
        Self {
            recipe: BrewRecipe {
                id,
                name: name.into(),
                ingredients: Vec::new(),
                difficulty: default_difficulty(),
                cooking_time: 0,
                distill_runs: 0,
                age: 0.0,
                wood: WoodType::Any,
                alcohol: 0,
            },
        }
    }

    /// Adds an ingredient requirement.
    #[must_use]
    pub fn ingredient(mut self, ingredient: impl Into<Ingredient>, amount: u32) -> Self {
        self.recipe
            .ingredients
            .push(IngredientAmount::new(ingredient.into(), amount));
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub const fn difficulty(mut self, difficulty: u32) -> Self {
        self.recipe.difficulty = difficulty;
        self
    }

    /// Sets the cooking time in minutes.
    #[must_use]
    pub const fn cooking_time(mut self, minutes: u32) -> Self {
        self.recipe.cooking_time = minutes;
        self
    }

    /// Sets the number of distillation runs.
    #[must_use]
    pub const fn distill_runs(mut self, runs: u32) -> Self {
        self.recipe.distill_runs = runs;
        self
    }

    /// Sets the ageing duration and barrel wood.
    #[must_use]
    pub fn aged(mut self, age: f32, wood: WoodType) -> Self {
        self.recipe.age = age;
        self.recipe.wood = wood;
        self
    }

    /// Sets the alcohol content.
    #[must_use]
    pub const fn alcohol(mut self, alcohol: i32) -> Self {
        self.recipe.alcohol = alcohol;
        self
    }

    /// Builds the recipe.
    ///
    /// # Errors
    /// Returns an error if the recipe fails [`BrewRecipe::validate`].
    pub fn build(self) -> BookResult<BrewRecipe> {
        self.recipe.validate()?;
        Ok(self.recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beer() -> BrewRecipe {
        BrewRecipe::builder(RecipeId::new(1), "Wheat Beer")
            .ingredient("wheat", 3)
            .ingredient("hops", 1)
            .difficulty(1)
            .cooking_time(8)
            .aged(2.0, WoodType::Birch)
            .alcohol(5)
            .build()
            .expect("valid recipe")
    }

    #[test]
    fn test_builder() {
        let recipe = beer();
        assert_eq!(recipe.name(), "Wheat Beer");
        assert_eq!(recipe.ingredients().len(), 2);
        assert!(recipe.needs_to_age());
        assert!(!recipe.needs_distilling());
        assert!(!recipe.is_cooking_only());
        assert!(!recipe.uses_any_wood());
    }

    #[test]
    fn test_amount_of() {
        let recipe = beer();
        assert_eq!(recipe.amount_of(&Ingredient::new("wheat")), 3);
        assert_eq!(recipe.amount_of(&Ingredient::new("Hops")), 1);
        assert_eq!(recipe.amount_of(&Ingredient::new("sugar")), 0);
    }

    #[test]
    fn test_missing_ingredients() {
        let recipe = beer();
        let present = vec![IngredientAmount::new(Ingredient::new("wheat"), 2)];
        let missing = recipe.missing_ingredients(&present);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].ingredient, Ingredient::new("hops"));
    }

    #[test]
    fn test_tolerances() {
        let recipe = beer();
        // difficulty 1: max(a, 8) * 10 / 20
        assert_eq!(recipe.allowed_count_diff(3), 4);
        assert_eq!(recipe.allowed_count_diff(20), 10);
        assert_eq!(recipe.allowed_time_diff(8), 8);

        let strict = BrewRecipe::builder(RecipeId::new(2), "Strict")
            .ingredient("wheat", 1)
            .difficulty(10)
            .build()
            .expect("valid recipe");
        assert_eq!(strict.allowed_count_diff(3), 1);
        assert_eq!(strict.allowed_time_diff(3), 1);
    }

    #[test]
    fn test_validation() {
        let err = BrewRecipe::builder(RecipeId::new(1), "Empty").build();
        assert!(matches!(err, Err(BookError::InvalidRecipe { .. })));

        let err = BrewRecipe::builder(RecipeId::new(1), "Hard")
            .ingredient("wheat", 1)
            .difficulty(11)
            .build();
        assert!(err.is_err());

        let err = BrewRecipe::builder(RecipeId::new(1), "Twice")
            .ingredient("wheat", 1)
            .ingredient("WHEAT", 2)
            .build();
        assert!(err.is_err());

        let err = BrewRecipe::builder(RecipeId::new(1), "Nothing")
            .ingredient("wheat", 0)
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(beer().to_string(), "Wheat Beer (#1)");
    }
}
