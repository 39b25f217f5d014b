//! # brewsim
//!
//! Runs brewing simulations against a recipe book from the command line.
//!
//! ```text
//! brewsim --book recipes.toml simulate wheat/3 hops --cook 8 --age 2 --wood birch
//! brewsim --book recipes.toml simulate --recipe "Wheat Beer"
//! brewsim --book recipes.toml debug wheat/3 hops --cook 8
//! ```

use anyhow::{bail, Context, Result};
use brewery_common::{BreweryError, BreweryResult};
use brewery_core::prelude::*;
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Brewing simulator.
#[derive(Debug, Parser)]
#[command(name = "brewsim", version, about = "Simulate brews against a recipe book")]
struct Cli {
    /// Recipe book file (.toml or .ron)
    #[arg(long, short = 'b')]
    book: PathBuf,

    /// Scoring configuration file [default: brewery.toml]
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Cook, distill and age a brew, reporting each stage
    Simulate(SimulateArgs),
    /// Score the brew against every recipe
    Debug(DebugArgs),
}

#[derive(Debug, Args)]
struct BrewArgs {
    /// Ingredients as `id` or `id/amount`
    ingredients: Vec<String>,

    /// Start from this recipe's ingredients and process
    #[arg(long, short = 'r')]
    recipe: Option<String>,

    /// Minutes cooked
    #[arg(long)]
    cook: Option<u32>,

    /// Distillation runs
    #[arg(long)]
    distill: Option<u32>,

    /// Ageing duration
    #[arg(long)]
    age: Option<f32>,

    /// Barrel wood, by name or index
    #[arg(long)]
    wood: Option<WoodType>,
}

#[derive(Debug, Args)]
struct SimulateArgs {
    #[command(flatten)]
    brew: BrewArgs,

    /// Write the cooked ingredients to this file
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct DebugArgs {
    #[command(flatten)]
    brew: BrewArgs,

    /// Only show this recipe
    #[arg(long)]
    only: Option<String>,
}

/// A fully resolved brew to simulate.
#[derive(Debug)]
struct Brew {
    ingredients: IngredientAggregate<Ingredient>,
    cook: u32,
    distill: u32,
    age: f32,
    wood: WoodType,
}

impl BrewArgs {
    fn resolve(&self, book: &RecipeBook<BrewRecipe>) -> BreweryResult<Brew> {
        let base = match &self.recipe {
            Some(name) => Some(book.get(name).ok_or_else(|| {
                BreweryError::InvalidInput(format!("unknown recipe '{name}'"))
            })?),
            None => None,
        };

        let mut ingredients = IngredientAggregate::new();
        let listed = if self.ingredients.is_empty() {
            base.map(|recipe| recipe.ingredients().to_vec())
                .unwrap_or_default()
        } else {
            self.ingredients
                .iter()
                .map(|arg| Ingredient::parse(arg))
                .collect::<BreweryResult<Vec<_>>>()?
        };
        for entry in &listed {
            for _ in 0..entry.amount {
                ingredients.add_generic(&entry.ingredient);
            }
        }
        if ingredients.is_empty() {
            return Err(BreweryError::InvalidInput(
                "no ingredients given; list some or pass --recipe".to_string(),
            ));
        }

        let cook = self
            .cook
            .or_else(|| base.map(Recipe::cooking_time))
            .ok_or_else(|| BreweryError::InvalidInput("--cook is required".to_string()))?;
        let distill = self
            .distill
            .or_else(|| base.map(Recipe::distill_runs))
            .unwrap_or(0);
        let age = self.age.or_else(|| base.map(Recipe::age)).unwrap_or(0.0);
        if !age.is_finite() || age < 0.0 {
            return Err(BreweryError::InvalidInput(format!("invalid age {age}")));
        }
        let wood = self
            .wood
            .or_else(|| base.map(|recipe| default_barrel(recipe.wood())))
            .unwrap_or(WoodType::Oak);

        Ok(Brew {
            ingredients,
            cook,
            distill,
            age,
            wood,
        })
    }
}

/// A recipe accepting any wood still needs some barrel.
fn default_barrel(wood: WoodType) -> WoodType {
    if wood.is_specific() {
        wood
    } else {
        WoodType::Oak
    }
}

fn report(stage: &str, result: &BestRecipeResult<'_, BrewRecipe>) {
    match result {
        BestRecipeResult::Found { recipe, evaluation } => {
            println!("{stage}: {} (quality {})", recipe.name, evaluation.quality());
        },
        BestRecipeResult::Error { guess, evaluation } => {
            println!(
                "{stage}: no recipe, closest is {} (quality {})",
                guess.name,
                evaluation.quality()
            );
        },
        BestRecipeResult::NoRecipesRegistered => {
            println!("{stage}: the recipe book is empty");
        },
    }
    for defect in result.worst_defects() {
        let area = if defect.is_ingredient_defect() {
            "ingredients"
        } else {
            "process"
        };
        println!("  [{area}] {} {defect}", defect.message_key());
    }
}

fn simulate(book: &RecipeBook<BrewRecipe>, args: &SimulateArgs) -> BreweryResult<()> {
    let Brew {
        mut ingredients,
        cook,
        distill,
        age,
        wood,
    } = args.brew.resolve(book)?;
    debug!("simulate: ingredients={ingredients}");

    let cooked = ingredients.cook(book, cook);
    report(&format!("Cooked {cook} min"), &cooked.result);
    if cooked.recipe().is_some() {
        println!("  quality {}, alcohol {}", cooked.quality, cooked.alcohol);
    }

    if let Some(path) = &args.save {
        let bytes = ingredients.to_bytes()?;
        fs::write(path, bytes)?;
        info!("Saved ingredients to {}", path.display());
    }

    let distilled = distill > 0;
    if distilled {
        let result = ingredients.distill_recipe_full(book, WoodType::Any, 0.0);
        report(&format!("Distilled {distill}x"), &result);
        match result.success_recipe() {
            Some(recipe) => println!(
                "  distilling quality {}",
                ingredients.distill_quality(recipe, distill)
            ),
            None => {
                println!("  distilling ruined the brew");
                return Ok(());
            },
        }
    }

    if age > 0.0 {
        let result = ingredients.age_recipe_full(book, wood, age, distilled);
        report(&format!("Aged {age:.2} in {wood}"), &result);
        if result.success_recipe().is_none() {
            println!("  ageing ruined the brew");
        }
    }
    Ok(())
}

fn debug_info(book: &RecipeBook<BrewRecipe>, args: &DebugArgs) -> BreweryResult<()> {
    let brew = args.brew.resolve(book)?;
    let mut ingredients = brew.ingredients;
    ingredients.set_cooked_time(brew.cook);
    let distilled = brew.distill > 0;
    let algorithm = book.config().material_algorithm;

    println!("{ingredients}");
    for recipe in book {
        if let Some(only) = &args.only {
            if !recipe.name.eq_ignore_ascii_case(only) {
                continue;
            }
        }
        println!("{recipe}");
        println!(
            "  ingredients {}",
            ingredients.ingredient_quality_full(recipe)
        );
        println!(
            "  cooking     {}",
            ingredients.cooking_quality_full(recipe, distilled)
        );
        println!(
            "  wood        {}",
            ingredients.wood_quality_full(recipe, brew.wood, algorithm)
        );
        println!(
            "  age         {}",
            ingredients.age_quality_full(recipe, brew.age)
        );
    }

    let best = ingredients.best_recipe_full(book, brew.wood, brew.age, distilled);
    report("Best recipe", &best);
    Ok(())
}

fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ScoringConfig::load_from(path),
        None => ScoringConfig::load(),
    };
    let book = RecipeBook::load_from(&cli.book, config)
        .with_context(|| format!("loading recipe book {}", cli.book.display()))?;
    if book.is_empty() {
        bail!("recipe book {} has no recipes", cli.book.display());
    }

    match &cli.command {
        Command::Simulate(args) => simulate(&book, args)?,
        Command::Debug(args) => debug_info(&book, args)?,
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("brewery=info".parse()?))
        .init();

    let cli = Cli::parse();
    run(&cli)
}
