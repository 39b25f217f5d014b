//! # Brewery Core
//!
//! Recipe matching and quality evaluation for brewing simulations.
//!
//! Given what went into a cauldron and how it was processed, this crate
//! decides which recipe is being brewed, how good it is, and what is wrong
//! with it when nothing fits:
//! - Barrel wood types and the distance between them
//! - Defects and quality deductions
//! - Recipe evaluations and how they are ranked
//! - The ingredient aggregate and its scoring functions
//! - Best-recipe search over a recipe book
//! - Recipe books, scoring configuration and the persisted aggregate format

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod book;
pub mod codec;
pub mod config;
pub mod deduction;
pub mod defect;
pub mod evaluation;
pub mod ingredient;
pub mod ingredients;
pub mod material;
pub mod recipe;
pub mod search;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::book::*;
    pub use crate::codec::*;
    pub use crate::config::*;
    pub use crate::deduction::*;
    pub use crate::defect::*;
    pub use crate::evaluation::*;
    pub use crate::ingredient::*;
    pub use crate::ingredients::*;
    pub use crate::material::*;
    pub use crate::recipe::*;
    pub use crate::search::*;
}

pub use prelude::*;
