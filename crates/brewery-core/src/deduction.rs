//! Quality deductions: a defect paired with how much quality it costs.

use crate::defect::{Defect, DefectError};
use crate::recipe::IngredientKind;
use std::fmt;
use thiserror::Error;

/// A quality deduction broke its contract.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeductionError {
    /// Deducted amounts must not be negative.
    #[error("quality deduction cannot be negative: {0}")]
    Negative(f32),
    /// Deducted amounts must be finite.
    #[error("quality deduction must be finite: {0}")]
    NonFinite(f32),
    /// Scale factors must be finite and non-negative.
    #[error("scale factor must be finite and non-negative: {0}")]
    InvalidScale(f32),
    /// The defect itself is malformed.
    #[error("invalid defect: {0}")]
    Defect(#[from] DefectError),
}

/// How much quality a deduction removes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Magnitude {
    /// A finite, non-negative amount.
    Finite(f32),
    /// Disqualifies the recipe regardless of anything else.
    Fatal,
}

impl Magnitude {
    /// Amount as a sortable number; fatal sorts above every finite amount.
    #[must_use]
    pub fn severity(self) -> f32 {
        match self {
            Self::Finite(amount) => amount,
            Self::Fatal => f32::INFINITY,
        }
    }
}

/// A deduction of quality caused by a [`Defect`].
#[derive(Debug, Clone, PartialEq)]
pub struct QualityDeduction<K> {
    defect: Defect<K>,
    magnitude: Magnitude,
}

impl<K> QualityDeduction<K> {
    /// Creates a deduction of `amount` quality.
    pub fn finite(defect: Defect<K>, amount: f32) -> Result<Self, DeductionError> {
        if !amount.is_finite() {
            return Err(DeductionError::NonFinite(amount));
        }
        if amount < 0.0 {
            return Err(DeductionError::Negative(amount));
        }
        defect.validate()?;
        Ok(Self {
            defect,
            magnitude: Magnitude::Finite(amount),
        })
    }

    /// Creates a fatal deduction, which prevents the recipe from being used.
    pub fn fatal(defect: Defect<K>) -> Result<Self, DeductionError> {
        defect.validate()?;
        Ok(Self {
            defect,
            magnitude: Magnitude::Fatal,
        })
    }

    /// The reason for this deduction.
    #[must_use]
    pub const fn defect(&self) -> &Defect<K> {
        &self.defect
    }

    /// How much this deduction costs.
    #[must_use]
    pub const fn magnitude(&self) -> Magnitude {
        self.magnitude
    }

    /// The finite amount, or `None` when fatal.
    #[must_use]
    pub fn amount(&self) -> Option<f32> {
        match self.magnitude {
            Magnitude::Finite(amount) => Some(amount),
            Magnitude::Fatal => None,
        }
    }

    /// Whether this deduction disqualifies the recipe.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self.magnitude, Magnitude::Fatal)
    }

    /// Scales the amount by `factor`. Fatal deductions stay fatal.
    pub fn scale(&self, factor: f32) -> Result<Self, DeductionError>
    where
        K: Clone,
    {
        if !factor.is_finite() || factor < 0.0 {
            return Err(DeductionError::InvalidScale(factor));
        }
        Ok(self.scaled_by(factor))
    }

    pub(crate) fn scaled_by(&self, factor: f32) -> Self
    where
        K: Clone,
    {
        let magnitude = match self.magnitude {
            Magnitude::Finite(amount) => Magnitude::Finite(amount * factor),
            Magnitude::Fatal => Magnitude::Fatal,
        };
        Self {
            defect: self.defect.clone(),
            magnitude,
        }
    }
}

impl<K: IngredientKind> fmt::Display for QualityDeduction<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.magnitude {
            Magnitude::Finite(amount) => write!(f, "-{amount:.3} {}", self.defect),
            Magnitude::Fatal => write!(f, "FATAL {}", self.defect),
        }
    }
}
