//! Best-recipe search over a [`RecipeBook`].
//!
//! Every recipe is scored on ingredients and cooking, plus age and barrel wood
//! when the recipe ages or the brew has been aged. Two trackers run in the
//! same pass:
//!
//! - the legacy tracker averages the rounded per-dimension qualities and
//!   keeps the first non-fatal recipe with the strictly highest average. This
//!   decides which recipe is brewed, exactly as older versions did.
//! - the exact tracker keeps the first least complex combined evaluation. It
//!   is only reported as the best guess when nothing can be brewed.

use crate::book::RecipeBook;
use crate::defect::{is_close, Defect};
use crate::evaluation::RecipeEvaluation;
use crate::ingredients::{sanitize_age, IngredientAggregate};
use crate::material::WoodType;
use crate::recipe::{IngredientKind, Recipe};
use std::cmp::Ordering;
use std::fmt;
use tracing::debug;

/// Outcome of a best-recipe search.
#[derive(Debug, Clone)]
pub enum BestRecipeResult<'a, R: Recipe> {
    /// A recipe can be brewed.
    Found {
        /// The recipe
        recipe: &'a R,
        /// Its combined evaluation
        evaluation: RecipeEvaluation<R::Ingredient>,
    },
    /// Nothing can be brewed; `guess` is the most plausible intent.
    Error {
        /// The recipe the brewer most likely attempted
        guess: &'a R,
        /// Its combined evaluation
        evaluation: RecipeEvaluation<R::Ingredient>,
    },
    /// The recipe book is empty.
    NoRecipesRegistered,
}

impl<'a, R: Recipe> BestRecipeResult<'a, R> {
    /// The recipe if one was found.
    #[must_use]
    pub fn success_recipe(&self) -> Option<&'a R> {
        match self {
            Self::Found { recipe, .. } => Some(*recipe),
            Self::Error { .. } | Self::NoRecipesRegistered => None,
        }
    }

    /// The found recipe or the best guess.
    #[must_use]
    pub fn recipe(&self) -> Option<&'a R> {
        match self {
            Self::Found { recipe, .. } => Some(*recipe),
            Self::Error { guess, .. } => Some(*guess),
            Self::NoRecipesRegistered => None,
        }
    }

    /// The evaluation of the found recipe or the best guess.
    #[must_use]
    pub fn evaluation(&self) -> Option<&RecipeEvaluation<R::Ingredient>> {
        match self {
            Self::Found { evaluation, .. } | Self::Error { evaluation, .. } => Some(evaluation),
            Self::NoRecipesRegistered => None,
        }
    }

    /// Whether a recipe was found.
    #[must_use]
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    /// All defects tied for worst, as owned values.
    ///
    /// `NoRecipesRegistered` reports its own defect.
    #[must_use]
    pub fn worst_defects(&self) -> Vec<Defect<R::Ingredient>> {
        match self {
            Self::Found { evaluation, .. } | Self::Error { evaluation, .. } => {
                evaluation.worst_defects().into_iter().cloned().collect()
            },
            Self::NoRecipesRegistered => vec![Defect::NoRecipesRegistered],
        }
    }

    /// The first of the worst defects, or `None` for a flawless brew.
    #[must_use]
    pub fn worst_defect(&self) -> Option<Defect<R::Ingredient>> {
        self.worst_defects().into_iter().next()
    }
}

impl<R: Recipe> fmt::Display for BestRecipeResult<'_, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { recipe, evaluation } => {
                write!(f, "Found{{{}, {evaluation}}}", recipe.name())
            },
            Self::Error { guess, evaluation } => {
                write!(f, "Error{{{}, {evaluation}}}", guess.name())
            },
            Self::NoRecipesRegistered => f.write_str("NoRecipesRegistered"),
        }
    }
}

/// Result of cooking the contents of a cauldron.
#[derive(Debug, Clone)]
pub struct CookedBrew<'a, R: Recipe> {
    /// The cooking-only search result
    pub result: BestRecipeResult<'a, R>,
    /// Quality of the brew, 0 when no recipe was found
    pub quality: i32,
    /// Alcohol of the brew, 0 when no recipe was found
    pub alcohol: i32,
}

impl<'a, R: Recipe> CookedBrew<'a, R> {
    /// The recipe that was cooked, if any.
    #[must_use]
    pub fn recipe(&self) -> Option<&'a R> {
        self.result.success_recipe()
    }
}

struct Candidate<'a, R: Recipe> {
    recipe: &'a R,
    evaluation: RecipeEvaluation<R::Ingredient>,
}

/// Rounds half up, like the legacy scoring did.
fn round_half_up(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl<K: IngredientKind> IngredientAggregate<K> {
    /// The recipe that can be brewed from the current state, if any.
    pub fn best_recipe<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
        distilled: bool,
    ) -> Option<&'a R>
    where
        R: Recipe<Ingredient = K>,
    {
        self.best_recipe_full(book, wood, time, distilled)
            .success_recipe()
    }

    /// Searches `book` for the recipe matching the current state.
    ///
    /// `wood` is the barrel the brew aged in, `time` how long it aged and
    /// `distilled` whether it went through a still.
    pub fn best_recipe_full<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
        distilled: bool,
    ) -> BestRecipeResult<'a, R>
    where
        R: Recipe<Ingredient = K>,
    {
        if book.is_empty() {
            return BestRecipeResult::NoRecipesRegistered;
        }

        let config = book.config();
        let time = sanitize_age(time);

        let mut exact: Option<Candidate<'a, R>> = None;
        let mut legacy: Option<Candidate<'a, R>> = None;
        let mut legacy_quality = 0.0_f32;

        for recipe in book {
            let ingredient_eval = self.ingredient_quality_full(recipe);
            let cooking_eval = self.cooking_quality_full(recipe, distilled);
            let ingredient_quality = ingredient_eval.quality();
            let cooking_quality = cooking_eval.quality();

            // Age and wood are never fatal.
            let is_fatal = ingredient_eval.has_fatal_defect() || cooking_eval.has_fatal_defect();

            let (evaluation, average) = if recipe.needs_to_age() || time > config.age_threshold {
                let age_eval = self.age_quality_full(recipe, time);
                let wood_eval = self.wood_quality_full(recipe, wood, config.material_algorithm);
                let age_quality = age_eval.quality();
                let wood_quality = wood_eval.quality();
                debug!(
                    recipe = recipe.name(),
                    ingredient_quality,
                    cooking_quality,
                    wood_quality,
                    age_quality,
                    "Scored aged recipe"
                );
                let average =
                    (ingredient_quality + cooking_quality + wood_quality + age_quality) as f32 / 4.0;
                (
                    RecipeEvaluation::combine(&[&ingredient_eval, &cooking_eval, &age_eval, &wood_eval]),
                    average,
                )
            } else {
                debug!(
                    recipe = recipe.name(),
                    ingredient_quality,
                    cooking_quality,
                    "Scored unaged recipe"
                );
                let average = (ingredient_quality + cooking_quality) as f32 / 2.0;
                (
                    RecipeEvaluation::combine(&[&ingredient_eval, &cooking_eval]),
                    average,
                )
            };

            if !is_fatal && average > legacy_quality {
                legacy_quality = average;
                legacy = Some(Candidate {
                    recipe,
                    evaluation: evaluation.clone(),
                });
            }

            let replaces_guess = exact.as_ref().map_or(true, |best| {
                evaluation.compare_most_to_least_complexity(&best.evaluation) == Ordering::Greater
            });
            if replaces_guess {
                exact = Some(Candidate { recipe, evaluation });
            }
        }

        if let Some(Candidate { recipe, evaluation }) = legacy {
            debug!(recipe = recipe.name(), quality = legacy_quality, "Best recipe found");
            return BestRecipeResult::Found { recipe, evaluation };
        }
        match exact {
            Some(Candidate { recipe, evaluation }) => {
                debug!(recipe = recipe.name(), "No usable recipe, best guess");
                BestRecipeResult::Error {
                    guess: recipe,
                    evaluation,
                }
            },
            None => BestRecipeResult::NoRecipesRegistered,
        }
    }

    /// The cooking-only recipe matching the ingredients and cooking time.
    pub fn cook_recipe<'a, R>(&self, book: &'a RecipeBook<R>) -> Option<&'a R>
    where
        R: Recipe<Ingredient = K>,
    {
        self.cook_recipe_full(book).success_recipe()
    }

    /// Like [`Self::best_recipe_full`] for an unaged, undistilled brew, but
    /// fails if the winner needs more than cooking.
    pub fn cook_recipe_full<'a, R>(&self, book: &'a RecipeBook<R>) -> BestRecipeResult<'a, R>
    where
        R: Recipe<Ingredient = K>,
    {
        let threshold = book.config().age_threshold;
        match self.best_recipe_full(book, WoodType::Any, 0.0, false) {
            BestRecipeResult::Found { recipe, evaluation } if !recipe.is_cooking_only() => {
                let defect = if recipe.needs_distilling() {
                    Defect::DistillMismatch {
                        actual: false,
                        needed: true,
                    }
                } else {
                    age_mismatch(0.0, recipe.age(), threshold)
                };
                reject(recipe, evaluation, defect)
            },
            result => result,
        }
    }

    /// The recipe to distill into, if any.
    pub fn distill_recipe<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
    ) -> Option<&'a R>
    where
        R: Recipe<Ingredient = K>,
    {
        self.distill_recipe_full(book, wood, time).success_recipe()
    }

    /// Like [`Self::best_recipe_full`] for a distilled brew, but fails if the
    /// winner does not need distilling.
    pub fn distill_recipe_full<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
    ) -> BestRecipeResult<'a, R>
    where
        R: Recipe<Ingredient = K>,
    {
        match self.best_recipe_full(book, wood, time, true) {
            BestRecipeResult::Found { recipe, evaluation } if !recipe.needs_distilling() => reject(
                recipe,
                evaluation,
                Defect::DistillMismatch {
                    actual: true,
                    needed: false,
                },
            ),
            result => result,
        }
    }

    /// The recipe the brew ages into, if any.
    pub fn age_recipe<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
        distilled: bool,
    ) -> Option<&'a R>
    where
        R: Recipe<Ingredient = K>,
    {
        self.age_recipe_full(book, wood, time, distilled)
            .success_recipe()
    }

    /// Like [`Self::best_recipe_full`], but fails if the winner does not need
    /// ageing.
    pub fn age_recipe_full<'a, R>(
        &self,
        book: &'a RecipeBook<R>,
        wood: WoodType,
        time: f32,
        distilled: bool,
    ) -> BestRecipeResult<'a, R>
    where
        R: Recipe<Ingredient = K>,
    {
        let threshold = book.config().age_threshold;
        match self.best_recipe_full(book, wood, time, distilled) {
            BestRecipeResult::Found { recipe, evaluation } if !recipe.needs_to_age() => {
                let defect = age_mismatch(sanitize_age(time), recipe.age(), threshold);
                reject(recipe, evaluation, defect)
            },
            result => result,
        }
    }

    /// Cooks the ingredients for `minutes` and scores the result.
    ///
    /// The quality is the rounded mean of the ingredient and cooking
    /// qualities of the cooking-only recipe, and the alcohol scales with it.
    pub fn cook<'a, R>(&mut self, book: &'a RecipeBook<R>, minutes: u32) -> CookedBrew<'a, R>
    where
        R: Recipe<Ingredient = K>,
    {
        self.set_cooked_time(minutes);
        let result = self.cook_recipe_full(book);
        let (quality, alcohol) = match result.success_recipe() {
            Some(recipe) => {
                let sum = self.ingredient_quality(recipe) + self.cooking_quality(recipe, false);
                let quality = (sum + 1).div_euclid(2);
                let alcohol = round_half_up(recipe.alcohol() as f32 * (quality as f32 / 10.0));
                debug!(recipe = recipe.name(), quality, alcohol, "Cooked brew");
                (quality, alcohol)
            },
            None => (0, 0),
        };
        CookedBrew {
            result,
            quality,
            alcohol,
        }
    }
}

/// An age defect whose sides always differ.
///
/// When `needed` is indistinguishable from `actual`, the ageing threshold is
/// reported instead, and failing that one more unit than `actual`.
fn age_mismatch<K>(actual: f32, needed: f32, threshold: f32) -> Defect<K> {
    let mut needed = needed;
    if is_close(actual, needed) {
        needed = threshold;
    }
    if is_close(actual, needed) {
        needed = actual + 1.0;
    }
    Defect::AgeMismatch { actual, needed }
}

fn reject<'a, R: Recipe>(
    recipe: &'a R,
    mut evaluation: RecipeEvaluation<R::Ingredient>,
    defect: Defect<R::Ingredient>,
) -> BestRecipeResult<'a, R> {
    debug!(recipe = recipe.name(), %defect, "Rejected best recipe");
    evaluation.fatal(defect);
    BestRecipeResult::Error {
        guess: recipe,
        evaluation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::ingredient::Ingredient;
    use crate::recipe::{BrewRecipe, IngredientAmount};
    use brewery_common::RecipeId;

    fn aggregate(items: &[(&str, u32)], cooked_time: u32) -> IngredientAggregate<Ingredient> {
        IngredientAggregate::from_parts(
            items
                .iter()
                .map(|(id, amount)| IngredientAmount::new(Ingredient::new(*id), *amount)),
            cooked_time,
        )
    }

    fn book(recipes: Vec<BrewRecipe>) -> RecipeBook<BrewRecipe> {
        let mut book = RecipeBook::with_config(ScoringConfig::default());
        for recipe in recipes {
            book.register(recipe).expect("register");
        }
        book
    }

    fn simple(id: u32, name: &str, items: &[(&str, u32)]) -> BrewRecipe {
        let mut builder = BrewRecipe::builder(RecipeId::new(id), name).cooking_time(5);
        for (ingredient, amount) in items {
            builder = builder.ingredient(*ingredient, *amount);
        }
        builder.build().expect("valid recipe")
    }

    #[test]
    fn test_empty_book() {
        let book: RecipeBook<BrewRecipe> = RecipeBook::new();
        let result = aggregate(&[("a", 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert!(matches!(result, BestRecipeResult::NoRecipesRegistered));
        assert_eq!(result.worst_defect(), Some(Defect::NoRecipesRegistered));
        assert!(result.evaluation().is_none());
    }

    #[test]
    fn test_exact_match_is_found() {
        let book = book(vec![simple(1, "Ab", &[("a", 1), ("b", 1)])]);
        let result = aggregate(&[("a", 1), ("b", 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert_eq!(result.success_recipe().map(Recipe::name), Some("Ab"));
        let eval = result.evaluation().expect("evaluation");
        assert_eq!(eval.quality(), 10);
        assert_eq!(result.worst_defect(), None);
    }

    #[test]
    fn test_missing_ingredient_is_error() {
        let book = book(vec![simple(1, "Ab", &[("a", 1), ("b", 1)])]);
        let result = aggregate(&[("a", 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert!(matches!(result, BestRecipeResult::Error { .. }));
        assert_eq!(result.recipe().map(Recipe::name), Some("Ab"));
        assert_eq!(
            result.worst_defect(),
            Some(Defect::MissingIngredient {
                ingredient: Ingredient::new("b"),
                amount_needed: 1
            })
        );
    }

    #[test]
    fn test_legacy_ties_go_to_first() {
        let book = book(vec![
            simple(1, "First", &[("a", 2)]),
            simple(2, "Second", &[("a", 2)]),
        ]);
        let result = aggregate(&[("a", 2)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert_eq!(result.success_recipe().map(Recipe::name), Some("First"));
    }

    #[test]
    fn test_higher_average_wins() {
        let book = book(vec![
            simple(1, "Loose", &[("a", 3)]),
            simple(2, "Exact", &[("a", 2)]),
        ]);
        let result = aggregate(&[("a", 2)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert_eq!(result.success_recipe().map(Recipe::name), Some("Exact"));
    }

    #[test]
    fn test_best_guess_prefers_fewest_defects() {
        let book = book(vec![
            simple(1, "Many", &[("x", 1), ("y", 1), ("z", 1)]),
            simple(2, "Few", &[("a", 1), ("c", 1)]),
        ]);
        let result = aggregate(&[("a", 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
        assert!(!result.is_found());
        assert_eq!(result.recipe().map(Recipe::name), Some("Few"));
    }

    #[test]
    fn test_aged_brew_scores_wood_and_age() {
        let aged = BrewRecipe::builder(RecipeId::new(1), "Aged")
            .ingredient("a", 1)
            .cooking_time(5)
            .aged(2.0, WoodType::Oak)
            .build()
            .expect("valid recipe");
        let book = book(vec![aged]);
        let agg = aggregate(&[("a", 1)], 5);

        let perfect = agg.best_recipe_full(&book, WoodType::Oak, 2.0, false);
        assert_eq!(perfect.evaluation().map(RecipeEvaluation::quality), Some(10));

        let wrong_wood = agg.best_recipe_full(&book, WoodType::Spruce, 2.0, false);
        assert!(wrong_wood.is_found());
        assert!(matches!(
            wrong_wood.worst_defect(),
            Some(Defect::WrongWood { .. })
        ));
    }

    #[test]
    fn test_cook_recipe_rejects_aged_winner() {
        let aged = BrewRecipe::builder(RecipeId::new(1), "Aged")
            .ingredient("a", 1)
            .cooking_time(5)
            .aged(2.0, WoodType::Oak)
            .build()
            .expect("valid recipe");
        let book = book(vec![aged]);
        let result = aggregate(&[("a", 1)], 5).cook_recipe_full(&book);
        assert!(matches!(result, BestRecipeResult::Error { .. }));
        assert!(matches!(
            result.worst_defect(),
            Some(Defect::AgeMismatch { .. })
        ));
    }

    #[test]
    fn test_distill_recipe_rejects_plain_winner() {
        let book = book(vec![simple(1, "Plain", &[("a", 1)])]);
        let result = aggregate(&[("a", 1)], 5).distill_recipe_full(&book, WoodType::Any, 0.0);
        assert!(result.success_recipe().is_none());
    }

    #[test]
    fn test_distill_recipe_accepts_spirit() {
        let spirit = BrewRecipe::builder(RecipeId::new(1), "Spirit")
            .ingredient("a", 1)
            .cooking_time(5)
            .distill_runs(2)
            .build()
            .expect("valid recipe");
        let book = book(vec![spirit]);
        let agg = aggregate(&[("a", 1)], 5);
        assert_eq!(
            agg.distill_recipe(&book, WoodType::Any, 0.0).map(Recipe::name),
            Some("Spirit")
        );
        // Not distilled yet: the distill mismatch is fatal.
        assert!(agg.best_recipe(&book, WoodType::Any, 0.0, false).is_none());
    }

    #[test]
    fn test_age_recipe_rejects_unaged_winner() {
        let book = book(vec![simple(1, "Plain", &[("a", 1)])]);
        let agg = aggregate(&[("a", 1)], 5);
        let result = agg.age_recipe_full(&book, WoodType::Oak, 0.0, false);
        assert_eq!(
            result.worst_defect(),
            Some(Defect::AgeMismatch {
                actual: 0.0,
                needed: 0.5
            })
        );
    }

    #[test]
    fn test_cook_scales_alcohol() {
        let beer = BrewRecipe::builder(RecipeId::new(1), "Beer")
            .ingredient("wheat", 3)
            .cooking_time(8)
            .alcohol(6)
            .build()
            .expect("valid recipe");
        let book = book(vec![beer]);

        let mut agg = aggregate(&[("wheat", 3)], 0);
        let brew = agg.cook(&book, 8);
        assert_eq!(brew.recipe().map(Recipe::name), Some("Beer"));
        assert_eq!(brew.quality, 10);
        assert_eq!(brew.alcohol, 6);
        assert_eq!(agg.cooked_time(), 8);

        // 4 minutes late: allowed diff 8, so cooking quality is 5 and the
        // brew is (10 + 5) / 2 rounded up.
        let brew = agg.cook(&book, 12);
        assert_eq!(brew.quality, 8);
        assert_eq!(brew.alcohol, 5);
    }

    #[test]
    fn test_cook_without_recipe() {
        let book = book(vec![simple(1, "Plain", &[("a", 1)])]);
        let mut agg = aggregate(&[("z", 1)], 0);
        let brew = agg.cook(&book, 5);
        assert!(brew.recipe().is_none());
        assert_eq!((brew.quality, brew.alcohol), (0, 0));
    }

    #[test]
    fn test_cook_recipe_with_negligible_age() {
        let barely = BrewRecipe::builder(RecipeId::new(1), "Barely Aged")
            .ingredient("a", 1)
            .cooking_time(5)
            .aged(0.000_05, WoodType::Any)
            .build()
            .expect("valid recipe");
        let book = book(vec![barely]);
        let mut agg = aggregate(&[("a", 1)], 5);

        let result = agg.cook_recipe_full(&book);
        assert_eq!(
            result.worst_defect(),
            Some(Defect::AgeMismatch {
                actual: 0.0,
                needed: 0.5
            })
        );
        assert!(agg.cook(&book, 5).recipe().is_none());
    }

    #[test]
    fn test_age_recipe_at_threshold() {
        let book = book(vec![simple(1, "Plain", &[("a", 1)])]);
        let agg = aggregate(&[("a", 1)], 5);
        let result = agg.age_recipe_full(&book, WoodType::Oak, 0.5, false);
        if let Some(Defect::AgeMismatch { actual, needed }) = result.worst_defect() {
            assert!(!is_close(actual, needed));
        }

        let mut book = book;
        book.set_config(ScoringConfig {
            age_threshold: 0.0,
            ..ScoringConfig::default()
        });
        let result = agg.age_recipe_full(&book, WoodType::Oak, 0.0, false);
        assert_eq!(
            result.worst_defect(),
            Some(Defect::AgeMismatch {
                actual: 0.0,
                needed: 1.0
            })
        );
    }

    #[test]
    fn test_huge_ageing_time_saturates() {
        let aged = BrewRecipe::builder(RecipeId::new(1), "Aged")
            .ingredient("a", 1)
            .difficulty(10)
            .cooking_time(5)
            .aged(2.0, WoodType::Oak)
            .build()
            .expect("valid recipe");
        let book = book(vec![aged]);
        let agg = aggregate(&[("a", 1)], 5);

        // The legacy average still picks the recipe; the exact score is ruined.
        for time in [1.0e38, f32::MAX] {
            let result = agg.age_recipe_full(&book, WoodType::Oak, time, false);
            assert_eq!(result.recipe().map(Recipe::name), Some("Aged"));
            let eval = result.evaluation().expect("evaluation");
            assert_eq!(eval.quality(), -1);
            assert!(eval.true_quality().is_finite());
        }
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let book = book(vec![simple(1, "Pair", &[("a", 1), ("b", 1)])]);
        let agg = aggregate(&[("a", u32::MAX - 1), ("b", u32::MAX - 1), ("z", 3)], 5);
        assert_eq!(agg.ingredient_count(), u32::MAX);

        let result = agg.cook_recipe_full(&book);
        assert_eq!(result.recipe().map(Recipe::name), Some("Pair"));
        assert_eq!(result.evaluation().map(RecipeEvaluation::quality), Some(-1));
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(4.5), 5);
        assert_eq!(round_half_up(-0.5), 0);
        assert_eq!(round_half_up(4.49), 4);
    }
}
