//! The recipe book: the ordered catalogue searched for the best recipe.
//!
//! Registration order is iteration order, and ties in the search go to the
//! recipe registered first.

use crate::config::ScoringConfig;
use crate::recipe::{BrewRecipe, Recipe};
use ahash::AHashMap;
use brewery_common::{BookError, BookResult, SchemaVersion};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// An ordered, read-only catalogue of recipes.
#[derive(Debug, Clone)]
pub struct RecipeBook<R> {
    recipes: Vec<R>,
    by_name: AHashMap<String, usize>,
    config: ScoringConfig,
}

impl<R> Default for RecipeBook<R> {
    fn default() -> Self {
        Self::with_config(ScoringConfig::default())
    }
}

impl<R> RecipeBook<R> {
    /// Creates an empty book with default scoring.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty book with the given scoring configuration.
    #[must_use]
    pub fn with_config(config: ScoringConfig) -> Self {
        Self {
            recipes: Vec::new(),
            by_name: AHashMap::new(),
            config,
        }
    }

    /// All recipes, in registration order.
    #[must_use]
    pub fn recipes(&self) -> &[R] {
        &self.recipes
    }

    /// Iterates over the recipes in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.recipes.iter()
    }

    /// Number of recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Whether the book has no recipes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Scoring configuration used when searching this book.
    #[must_use]
    pub const fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Replaces the scoring configuration.
    pub fn set_config(&mut self, config: ScoringConfig) {
        self.config = config;
    }
}

impl<R: Recipe> RecipeBook<R> {
    /// Adds a recipe at the end of the book.
    ///
    /// # Errors
    /// Returns an error if a recipe with the same name (ignoring case) is
    /// already registered.
    pub fn register(&mut self, recipe: R) -> BookResult<()> {
        let key = recipe.name().to_lowercase();
        if self.by_name.contains_key(&key) {
            return Err(BookError::DuplicateRecipe(recipe.name().to_string()));
        }
        debug!("Registered recipe {}", recipe.name());
        self.by_name.insert(key, self.recipes.len());
        self.recipes.push(recipe);
        Ok(())
    }

    /// Looks a recipe up by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&R> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|&index| self.recipes.get(index))
    }
}

impl<'a, R> IntoIterator for &'a RecipeBook<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.recipes.iter()
    }
}

/// On-disk layout of a recipe book.
#[derive(Debug, Serialize, Deserialize)]
struct BookFile {
    #[serde(default)]
    version: SchemaVersion,
    #[serde(default)]
    recipes: Vec<BrewRecipe>,
}

impl RecipeBook<BrewRecipe> {
    /// Loads recipes from a `.toml` or `.ron` file.
    pub fn load_from<P: AsRef<Path>>(path: P, config: ScoringConfig) -> BookResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let book = match extension.as_deref() {
            Some("toml") => Self::from_toml_str(&contents, config)?,
            Some("ron") => Self::from_ron_str(&contents, config)?,
            _ => return Err(BookError::UnsupportedFormat(path.display().to_string())),
        };
        info!("Loaded {} recipes from {}", book.len(), path.display());
        Ok(book)
    }

    /// Parses a TOML recipe book.
    pub fn from_toml_str(contents: &str, config: ScoringConfig) -> BookResult<Self> {
        let file: BookFile = toml::from_str(contents).map_err(|e| BookError::Parse(e.to_string()))?;
        Self::from_file(file, config)
    }

    /// Parses a RON recipe book.
    pub fn from_ron_str(contents: &str, config: ScoringConfig) -> BookResult<Self> {
        let file: BookFile = ron::from_str(contents).map_err(|e| BookError::Parse(e.to_string()))?;
        Self::from_file(file, config)
    }

    fn from_file(file: BookFile, config: ScoringConfig) -> BookResult<Self> {
        let current = SchemaVersion::RECIPE_BOOK;
        if !current.can_read(&file.version) {
            return Err(BookError::VersionMismatch {
                expected: current,
                found: file.version,
            });
        }

        let mut book = Self::with_config(config);
        for recipe in file.recipes {
            recipe.validate()?;
            book.register(recipe)?;
        }
        Ok(book)
    }
}
