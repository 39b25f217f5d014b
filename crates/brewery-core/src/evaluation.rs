//! Recipe evaluations: the quality a brew reaches against one recipe.
//!
//! Quality starts at 10 and every [`QualityDeduction`] lowers it. A fatal
//! deduction disqualifies the recipe outright.

use crate::deduction::{DeductionError, Magnitude, QualityDeduction};
use crate::defect::Defect;
use crate::recipe::IngredientKind;
use std::cmp::Ordering;
use std::fmt;

/// Quality of a flawless brew.
pub const MAX_QUALITY: f32 = 10.0;

/// Accumulated deductions for one recipe candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeEvaluation<K> {
    deductions: Vec<QualityDeduction<K>>,
}

impl<K> Default for RecipeEvaluation<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> RecipeEvaluation<K> {
    /// Creates an evaluation with no deductions (quality 10).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            deductions: Vec::new(),
        }
    }

    /// Deducts `amount` quality for `defect`.
    pub fn try_deduct(&mut self, defect: Defect<K>, amount: f32) -> Result<(), DeductionError> {
        self.deductions
            .push(QualityDeduction::finite(defect, amount)?);
        Ok(())
    }

    /// Deducts `amount` quality for `defect`.
    ///
    /// # Panics
    /// Panics if `amount` is negative or not finite, or if the defect breaks
    /// its own invariant. Both are logic errors in the caller.
    pub fn deduct(&mut self, defect: Defect<K>, amount: f32) {
        if let Err(err) = self.try_deduct(defect, amount) {
            panic!("rejected quality deduction: {err}");
        }
    }

    /// Adds a fatal defect that prevents the recipe from being used.
    pub fn try_fatal(&mut self, defect: Defect<K>) -> Result<(), DeductionError> {
        self.deductions.push(QualityDeduction::fatal(defect)?);
        Ok(())
    }

    /// Adds a fatal defect that prevents the recipe from being used.
    ///
    /// # Panics
    /// Panics if the defect breaks its own invariant.
    pub fn fatal(&mut self, defect: Defect<K>) {
        if let Err(err) = self.try_fatal(defect) {
            panic!("rejected fatal defect: {err}");
        }
    }

    /// Combines several evaluations into one.
    ///
    /// With `n` inputs every deduction is scaled by `1/n`, so each input
    /// contributes a `1/n` share of the overall quality.
    #[must_use]
    pub fn combine(evals: &[&Self]) -> Self
    where
        K: Clone,
    {
        if evals.is_empty() {
            return Self::new();
        }
        let factor = 1.0 / evals.len() as f32;
        let deductions = evals
            .iter()
            .flat_map(|eval| eval.deductions.iter())
            .map(|deduction| deduction.scaled_by(factor))
            .collect();
        Self { deductions }
    }

    /// All deductions, in the order they were added.
    #[must_use]
    pub fn deductions(&self) -> &[QualityDeduction<K>] {
        &self.deductions
    }

    /// Whether [`Self::quality`] is greater than 0.
    #[must_use]
    pub fn is_usable(&self) -> bool {
        self.quality() > 0
    }

    /// Whether any deduction is fatal.
    #[must_use]
    pub fn has_fatal_defect(&self) -> bool {
        self.deductions.iter().any(QualityDeduction::is_fatal)
    }

    fn fatal_count(&self) -> usize {
        self.deductions.iter().filter(|d| d.is_fatal()).count()
    }

    /// Rounded quality between 0 and 10, or -1 when disqualified.
    ///
    /// Fatal defects, and deductions that push quality below 0, both report
    /// -1.
    #[must_use]
    pub fn quality(&self) -> i32 {
        let quality = self.true_quality();
        if quality < 0.0 {
            return -1;
        }
        quality.round() as i32
    }

    /// Unrounded, unbounded quality; negative infinity when fatal.
    #[must_use]
    pub fn true_quality(&self) -> f32 {
        if self.has_fatal_defect() {
            return f32::NEG_INFINITY;
        }
        self.deductions
            .iter()
            .filter_map(QualityDeduction::amount)
            .fold(MAX_QUALITY, |quality, amount| quality - amount)
    }

    /// The defects that cost the most quality.
    ///
    /// If anything is fatal, every fatal defect is returned. Otherwise all
    /// defects tied for the largest deduction are returned. Empty when there
    /// are no deductions.
    #[must_use]
    pub fn worst_defects(&self) -> Vec<&Defect<K>> {
        if self.has_fatal_defect() {
            return self
                .deductions
                .iter()
                .filter(|d| d.is_fatal())
                .map(QualityDeduction::defect)
                .collect();
        }

        let worst = self
            .deductions
            .iter()
            .map(|d| d.magnitude().severity())
            .fold(None, |max: Option<f32>, amount| {
                Some(max.map_or(amount, |m| m.max(amount)))
            });
        let Some(worst) = worst else {
            return Vec::new();
        };
        self.deductions
            .iter()
            .filter(|d| d.magnitude() == Magnitude::Finite(worst))
            .map(QualityDeduction::defect)
            .collect()
    }

    /// Orders evaluations from most to least complex.
    ///
    /// `Less` means `self` is more complex, judged in order by:
    /// - number of deductions, more first
    /// - number of fatal deductions, more first
    /// - [`Self::true_quality`], lowest first
    ///
    /// The greatest evaluation is therefore the least broken candidate.
    #[must_use]
    pub fn compare_most_to_least_complexity(&self, other: &Self) -> Ordering {
        other
            .deductions
            .len()
            .cmp(&self.deductions.len())
            .then_with(|| other.fatal_count().cmp(&self.fatal_count()))
            .then_with(|| self.true_quality().total_cmp(&other.true_quality()))
    }
}

impl<K: IngredientKind> fmt::Display for RecipeEvaluation<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quality = self.true_quality();
        if quality == f32::NEG_INFINITY {
            write!(f, "{{quality=fatal, deductions=[")?;
        } else {
            write!(f, "{{quality={quality:.3}, deductions=[")?;
        }
        for (i, deduction) in self.deductions.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{deduction}")?;
        }
        f.write_str("]}")
    }
}
