//! End-to-end checks of the search against hand-written recipe types.

use brewery_core::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Herb {
    A,
    B,
    C,
}

impl IngredientKind for Herb {
    fn matches(&self, other: &Self) -> bool {
        self == other
    }

    fn debug_id(&self) -> String {
        format!("{self:?}")
    }
}

struct Potion {
    name: &'static str,
    ingredients: Vec<IngredientAmount<Herb>>,
    cooking_time: u32,
    age: f32,
    wood: WoodType,
}

impl Potion {
    fn cooked(name: &'static str, ingredients: &[(Herb, u32)], cooking_time: u32) -> Self {
        Self {
            name,
            ingredients: ingredients
                .iter()
                .map(|&(herb, amount)| IngredientAmount::new(herb, amount))
                .collect(),
            cooking_time,
            age: 0.0,
            wood: WoodType::Any,
        }
    }
}

impl Recipe for Potion {
    type Ingredient = Herb;

    fn name(&self) -> &str {
        self.name
    }

    fn ingredients(&self) -> &[IngredientAmount<Herb>] {
        &self.ingredients
    }

    fn difficulty(&self) -> u32 {
        2
    }

    fn cooking_time(&self) -> u32 {
        self.cooking_time
    }

    fn distill_runs(&self) -> u32 {
        0
    }

    fn age(&self) -> f32 {
        self.age
    }

    fn wood(&self) -> WoodType {
        self.wood
    }

    fn allowed_count_diff(&self, _amount: u32) -> u32 {
        4
    }

    fn allowed_time_diff(&self, _time: u32) -> u32 {
        5
    }
}

fn cauldron(herbs: &[(Herb, u32)], cooked_time: u32) -> IngredientAggregate<Herb> {
    IngredientAggregate::from_parts(
        herbs
            .iter()
            .map(|&(herb, amount)| IngredientAmount::new(herb, amount)),
        cooked_time,
    )
}

fn book(potions: Vec<Potion>) -> RecipeBook<Potion> {
    let mut book = RecipeBook::new();
    for potion in potions {
        book.register(potion).expect("unique names");
    }
    book
}

#[test]
fn exact_match_then_missing_ingredient() {
    let book = book(vec![Potion::cooked("Ab", &[(Herb::A, 1), (Herb::B, 1)], 5)]);

    let found = cauldron(&[(Herb::A, 1), (Herb::B, 1)], 5).best_recipe_full(
        &book,
        WoodType::Any,
        0.0,
        false,
    );
    match &found {
        BestRecipeResult::Found { recipe, evaluation } => {
            assert_eq!(recipe.name(), "Ab");
            assert_eq!(evaluation.quality(), 10);
        },
        other => panic!("expected a match, got {other}"),
    }

    let error = cauldron(&[(Herb::A, 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
    assert!(matches!(error, BestRecipeResult::Error { .. }));
    assert_eq!(
        error.worst_defect(),
        Some(Defect::MissingIngredient {
            ingredient: Herb::B,
            amount_needed: 1
        })
    );
}

#[test]
fn empty_book_reports_no_recipes() {
    let book: RecipeBook<Potion> = RecipeBook::new();
    let result = cauldron(&[(Herb::A, 1)], 5).best_recipe_full(&book, WoodType::Any, 0.0, false);
    assert!(matches!(result, BestRecipeResult::NoRecipesRegistered));
    assert_eq!(result.worst_defect(), Some(Defect::NoRecipesRegistered));
    assert_eq!(result.to_string(), "NoRecipesRegistered");
}

#[test]
fn wrong_count_is_a_single_finite_deduction() {
    let potion = Potion::cooked("Triple", &[(Herb::C, 3)], 5);
    let eval = cauldron(&[(Herb::C, 5)], 5).ingredient_quality_full(&potion);

    assert_eq!(eval.deductions().len(), 1);
    let deduction = &eval.deductions()[0];
    assert!(!deduction.is_fatal());
    assert_eq!(deduction.amount(), Some(2.0 / 4.0 * 10.0));
    assert_eq!(eval.to_string(), "{quality=5.000, deductions=[-5.000 WrongCount{5/3 C}]}");
}

#[test]
fn missing_kind_is_fatal_once() {
    let potion = Potion::cooked("Pair", &[(Herb::A, 2), (Herb::B, 1)], 5);
    let eval = cauldron(&[(Herb::B, 1)], 5).ingredient_quality_full(&potion);

    assert_eq!(eval.deductions().len(), 1);
    assert!(eval.deductions()[0].is_fatal());
    assert_eq!(
        eval.worst_defects(),
        vec![&Defect::MissingIngredient {
            ingredient: Herb::A,
            amount_needed: 2
        }]
    );
    assert_eq!(eval.quality(), -1);
}

#[test]
fn unaged_recipes_ignore_barrels() {
    let book = book(vec![Potion::cooked("Plain", &[(Herb::A, 1)], 5)]);
    let brew = cauldron(&[(Herb::A, 1)], 5);

    // Below the ageing threshold the barrel does not matter.
    let result = brew.best_recipe_full(&book, WoodType::CutCopper, 0.4, false);
    assert_eq!(result.evaluation().map(RecipeEvaluation::quality), Some(10));

    // Past it, age counts against a recipe that never ages.
    let result = brew.best_recipe_full(&book, WoodType::CutCopper, 3.0, false);
    let eval = result.evaluation().expect("evaluation");
    assert!(eval.true_quality() < 10.0);
    assert!(matches!(result.worst_defect(), Some(Defect::AgeMismatch { .. })));
}

#[test]
fn curve_algorithm_is_configurable() {
    let mut aged = Potion::cooked("Aged", &[(Herb::A, 1)], 5);
    aged.age = 2.0;
    aged.wood = WoodType::Birch;

    let mut book = book(vec![aged]);
    let brew = cauldron(&[(Herb::A, 1)], 5);

    let legacy = brew.best_recipe_full(&book, WoodType::Crimson, 2.0, false);
    let legacy_quality = legacy.evaluation().map(RecipeEvaluation::true_quality);
    book.set_config(ScoringConfig {
        material_algorithm: MaterialAlgorithm::Curve,
        ..ScoringConfig::default()
    });
    let curve = brew.best_recipe_full(&book, WoodType::Crimson, 2.0, false);

    let curve_quality = curve.evaluation().map(RecipeEvaluation::true_quality);
    assert_ne!(legacy_quality, curve_quality);
}

#[test]
fn search_order_breaks_ties() {
    let book = book(vec![
        Potion::cooked("First", &[(Herb::A, 2)], 5),
        Potion::cooked("Second", &[(Herb::A, 2)], 5),
    ]);
    let brew = cauldron(&[(Herb::A, 2)], 5);
    assert_eq!(
        brew.best_recipe(&book, WoodType::Any, 0.0, false).map(Recipe::name),
        Some("First")
    );
}
