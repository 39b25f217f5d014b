//! The ingredient aggregate: what is in the cauldron, and how well it fits a
//! recipe.
//!
//! Each scoring function looks at one dimension of a brew (ingredients,
//! cooking, barrel wood, age) and returns a [`RecipeEvaluation`] for it. The
//! plain variants return only the rounded quality.

use crate::config::MaterialAlgorithm;
use crate::defect::{is_close, Defect};
use crate::evaluation::{RecipeEvaluation, MAX_QUALITY};
use crate::material::WoodType;
use crate::recipe::{IngredientAmount, IngredientKind, Recipe};
use std::fmt;
use tracing::warn;

/// Ingredient kinds with their counts, plus how long they were cooked.
///
/// Entries keep insertion order and every count is at least 1.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientAggregate<K> {
    entries: Vec<IngredientAmount<K>>,
    cooked_time: u32,
}

impl<K> Default for IngredientAggregate<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> IngredientAggregate<K> {
    /// Creates an empty, uncooked aggregate.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            cooked_time: 0,
        }
    }

    /// The entries in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[IngredientAmount<K>] {
        &self.entries
    }

    /// Total number of ingredient units.
    #[must_use]
    pub fn ingredient_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0, |total, entry| total.saturating_add(entry.amount))
    }

    /// Minutes the ingredients have cooked.
    #[must_use]
    pub const fn cooked_time(&self) -> u32 {
        self.cooked_time
    }

    /// Records how many minutes the ingredients have cooked.
    pub fn set_cooked_time(&mut self, minutes: u32) {
        self.cooked_time = minutes;
    }

    /// Whether nothing has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: IngredientKind> IngredientAggregate<K> {
    /// Rebuilds an aggregate from stored parts.
    ///
    /// Zero amounts are dropped and entries of the same kind are merged.
    pub fn from_parts(entries: impl IntoIterator<Item = IngredientAmount<K>>, cooked_time: u32) -> Self {
        let mut aggregate = Self {
            entries: Vec::new(),
            cooked_time,
        };
        for entry in entries {
            aggregate.add_amount(entry.ingredient, entry.amount);
        }
        aggregate
    }

    /// Adds one unit of `ingredient`.
    pub fn add_ingredient(&mut self, ingredient: K) {
        self.add_amount(ingredient, 1);
    }

    /// Adds one unit of the generic form of a recipe ingredient.
    pub fn add_generic(&mut self, ingredient: &K) {
        self.add_amount(ingredient.clone(), 1);
    }

    fn add_amount(&mut self, ingredient: K, amount: u32) {
        if amount == 0 {
            return;
        }
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.ingredient.matches(&ingredient))
        {
            Some(existing) => existing.amount = existing.amount.saturating_add(amount),
            None => self.entries.push(IngredientAmount::new(ingredient, amount)),
        }
    }

    /// Ingredient quality against `recipe`; -1 if no recipe is near.
    pub fn ingredient_quality<R>(&self, recipe: &R) -> i32
    where
        R: Recipe<Ingredient = K>,
    {
        self.ingredient_quality_full(recipe).quality()
    }

    /// Scores the ingredients against `recipe`.
    ///
    /// Missing ingredients are fatal. An extraneous ingredient costs
    /// `count * difficulty / 2`, unless it makes up more than half of the
    /// brew or nothing else is present, which is fatal. Wrong counts cost
    /// up to 10 per ingredient, relative to the recipe's tolerance.
    pub fn ingredient_quality_full<R>(&self, recipe: &R) -> RecipeEvaluation<K>
    where
        R: Recipe<Ingredient = K>,
    {
        let mut eval = RecipeEvaluation::new();

        for missing in recipe.missing_ingredients(&self.entries) {
            eval.fatal(Defect::MissingIngredient {
                ingredient: missing.ingredient.clone(),
                amount_needed: missing.amount,
            });
        }

        let total = self.ingredient_count();
        let difficulty = recipe.difficulty() as f32;
        let mut bad_stuff = 0;
        for entry in &self.entries {
            let needed = recipe.amount_of(&entry.ingredient);
            let count = entry.amount;
            if needed == 0 {
                bad_stuff += 1;
                let defect = Defect::WrongIngredient {
                    ingredient: entry.ingredient.clone(),
                };
                if count > total / 2 || bad_stuff >= self.entries.len() {
                    eval.fatal(defect);
                } else {
                    eval.deduct(defect, count as f32 * (difficulty / 2.0));
                }
            } else if count != needed {
                let allowed = recipe.allowed_count_diff(needed).max(1);
                let deduction = (count.abs_diff(needed) as f32 / allowed as f32) * MAX_QUALITY;
                eval.deduct(
                    Defect::WrongCount {
                        ingredient: entry.ingredient.clone(),
                        actual: count,
                        needed,
                    },
                    deduction,
                );
            }
        }
        eval
    }

    /// Cooking quality against `recipe`.
    pub fn cooking_quality<R>(&self, recipe: &R, distilled: bool) -> i32
    where
        R: Recipe<Ingredient = K>,
    {
        self.cooking_quality_full(recipe, distilled).quality()
    }

    /// Scores the cooking time and the distillation state against `recipe`.
    ///
    /// A distillation mismatch is fatal. An uncooked brew loses the full 10
    /// quality without being fatal.
    pub fn cooking_quality_full<R>(&self, recipe: &R, distilled: bool) -> RecipeEvaluation<K>
    where
        R: Recipe<Ingredient = K>,
    {
        let mut eval = RecipeEvaluation::new();
        if recipe.needs_distilling() != distilled {
            eval.fatal(Defect::DistillMismatch {
                actual: distilled,
                needed: recipe.needs_distilling(),
            });
        }

        let needed = recipe.cooking_time();
        if self.cooked_time == needed {
            return eval;
        }
        if self.cooked_time < 1 {
            eval.deduct(Defect::CookTimeMismatch { actual: 0, needed }, MAX_QUALITY);
        } else {
            let allowed = recipe.allowed_time_diff(needed).max(1);
            let deduction =
                (self.cooked_time.abs_diff(needed) as f32 / allowed as f32) * MAX_QUALITY;
            eval.deduct(
                Defect::CookTimeMismatch {
                    actual: self.cooked_time,
                    needed,
                },
                deduction,
            );
        }
        eval
    }

    /// Pseudo quality of distilling `runs` times.
    ///
    /// 0 if the brew's distilling does not match the recipe's need, else 10
    /// minus the difference in runs.
    pub fn distill_quality<R>(&self, recipe: &R, runs: u32) -> i32
    where
        R: Recipe<Ingredient = K>,
    {
        if recipe.needs_distilling() != (runs > 0) {
            return 0;
        }
        10 - recipe.distill_runs().abs_diff(runs) as i32
    }

    /// Barrel wood quality against `recipe`.
    pub fn wood_quality<R>(&self, recipe: &R, wood: WoodType, algorithm: MaterialAlgorithm) -> i32
    where
        R: Recipe<Ingredient = K>,
    {
        self.wood_quality_full(recipe, wood, algorithm).quality()
    }

    /// Scores the barrel wood against `recipe`.
    pub fn wood_quality_full<R>(
        &self,
        recipe: &R,
        wood: WoodType,
        algorithm: MaterialAlgorithm,
    ) -> RecipeEvaluation<K>
    where
        R: Recipe<Ingredient = K>,
    {
        let mut eval = RecipeEvaluation::new();
        if recipe.uses_any_wood() || wood == recipe.wood() {
            return eval;
        }

        let distance = recipe.wood().distance(wood);
        let difficulty = recipe.difficulty() as f32;
        let deduction = match algorithm {
            MaterialAlgorithm::Legacy => {
                distance.unwrap_or(WoodType::MAX_DISTANCE) as f32 * difficulty
            },
            MaterialAlgorithm::Curve => MAX_QUALITY - curve_quality(distance, difficulty) as f32,
        };
        eval.deduct(
            Defect::WrongWood {
                actual: wood,
                needed: recipe.wood(),
            },
            deduction,
        );
        eval
    }

    /// Age quality against `recipe`.
    pub fn age_quality<R>(&self, recipe: &R, time: f32) -> i32
    where
        R: Recipe<Ingredient = K>,
    {
        self.age_quality_full(recipe, time).quality()
    }

    /// Scores the ageing time against `recipe`.
    ///
    /// Every unit of time off costs `difficulty / 2` quality, saturating at
    /// the largest finite deduction. Negative or non-finite times count as
    /// not aged at all.
    pub fn age_quality_full<R>(&self, recipe: &R, time: f32) -> RecipeEvaluation<K>
    where
        R: Recipe<Ingredient = K>,
    {
        let mut eval = RecipeEvaluation::new();
        let time = sanitize_age(time);
        let needed = recipe.age();
        if !is_close(time, needed) {
            let deduction =
                ((time - needed).abs() * (recipe.difficulty() as f32 / 2.0)).min(f32::MAX);
            eval.deduct(
                Defect::AgeMismatch {
                    actual: time,
                    needed,
                },
                deduction,
            );
        }
        eval
    }
}

/// Maps an ageing time to a usable, finite, non-negative value.
pub(crate) fn sanitize_age(time: f32) -> f32 {
    if time.is_finite() && time >= 0.0 {
        time
    } else {
        warn!("Ignoring invalid ageing time {time}");
        0.0
    }
}

/// Wood quality on the nonlinear curve.
///
/// At difficulty 1 distances 0 to 5 give 10, 10, 9, 8, 7, 6. At difficulty 10
/// they give 10, 5, 0, 0, 0, 0.
fn curve_quality(distance: Option<u32>, difficulty: f32) -> i32 {
    let base = match distance {
        Some(0) => 10.0,
        Some(1) => 9.0,
        Some(2) => 7.75,
        Some(3) => 6.25,
        Some(4) => 4.5,
        Some(5) => 2.5,
        _ => 0.0,
    };
    if base == 0.0 {
        return 0;
    }
    let quality: f32 = MAX_QUALITY - (MAX_QUALITY - base) * 0.5 * difficulty;
    (quality.round() as i32).max(0)
}

impl<K: IngredientKind> fmt::Display for IngredientAggregate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IngredientAggregate{{cookedTime={}, ingredients=[", self.cooked_time)?;
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}x {}", entry.amount, entry.ingredient.debug_id())?;
        }
        f.write_str("]}")
    }
}
