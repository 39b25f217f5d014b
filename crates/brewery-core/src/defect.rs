//! Defects: the specific ways a brew can differ from a recipe.

use crate::material::WoodType;
use crate::recipe::IngredientKind;
use std::fmt;
use thiserror::Error;

/// Two ageing durations closer than this are treated as equal.
pub const AGE_EPSILON: f32 = 1.0e-4;

/// Compares two ageing durations with [`AGE_EPSILON`] tolerance.
#[must_use]
pub fn is_close(a: f32, b: f32) -> bool {
    (a - b).abs() <= AGE_EPSILON
}

/// A defect violated its own invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefectError {
    /// A mismatch defect was built from two equal sides.
    #[error("{0} actual and needed were equal")]
    EqualSides(&'static str),
}

/// An imperfection of a brew, given the recipe it is attempting.
///
/// `K` is the ingredient kind the recipe and the brew are built from.
#[derive(Debug, Clone, PartialEq)]
pub enum Defect<K> {
    /// An ingredient the recipe does not use.
    WrongIngredient {
        /// The offending ingredient
        ingredient: K,
    },
    /// A required ingredient is absent.
    MissingIngredient {
        /// The missing ingredient
        ingredient: K,
        /// Amount the recipe requires
        amount_needed: u32,
    },
    /// A required ingredient is present in the wrong amount.
    WrongCount {
        /// The ingredient
        ingredient: K,
        /// Amount in the brew
        actual: u32,
        /// Amount the recipe requires
        needed: u32,
    },
    /// The brew was distilled when it should not have been, or the reverse.
    DistillMismatch {
        /// Whether the brew was distilled
        actual: bool,
        /// Whether the recipe needs distilling
        needed: bool,
    },
    /// Cooked for the wrong number of minutes.
    CookTimeMismatch {
        /// Minutes cooked
        actual: u32,
        /// Minutes the recipe needs
        needed: u32,
    },
    /// Aged for the wrong duration.
    AgeMismatch {
        /// Duration aged
        actual: f32,
        /// Duration the recipe needs
        needed: f32,
    },
    /// Aged in a barrel of the wrong wood.
    WrongWood {
        /// Wood the brew aged in
        actual: WoodType,
        /// Wood the recipe needs
        needed: WoodType,
    },
    /// There are no recipes at all.
    NoRecipesRegistered,
}

impl<K> Defect<K> {
    /// Checks the defect's own invariant: both sides of a mismatch differ.
    pub fn validate(&self) -> Result<(), DefectError> {
        let equal = match self {
            Self::WrongCount { actual, needed, .. } | Self::CookTimeMismatch { actual, needed } => {
                actual == needed
            },
            Self::DistillMismatch { actual, needed } => actual == needed,
            Self::AgeMismatch { actual, needed } => is_close(*actual, *needed),
            Self::WrongWood { actual, needed } => actual == needed,
            Self::WrongIngredient { .. }
            | Self::MissingIngredient { .. }
            | Self::NoRecipesRegistered => false,
        };
        if equal {
            Err(DefectError::EqualSides(self.kind_name()))
        } else {
            Ok(())
        }
    }

    /// Name of the variant, for diagnostics.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::WrongIngredient { .. } => "WrongIngredient",
            Self::MissingIngredient { .. } => "MissingIngredient",
            Self::WrongCount { .. } => "WrongCount",
            Self::DistillMismatch { .. } => "DistillMismatch",
            Self::CookTimeMismatch { .. } => "CookTimeMismatch",
            Self::AgeMismatch { .. } => "AgeMismatch",
            Self::WrongWood { .. } => "WrongWood",
            Self::NoRecipesRegistered => "NoRecipesRegistered",
        }
    }

    /// Translation key of the message shown to the brewer.
    #[must_use]
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::WrongIngredient { .. } => "Defect_WrongIngredient",
            Self::MissingIngredient { .. } => "Defect_MissingIngredient",
            Self::WrongCount { actual, needed, .. } => {
                if actual < needed {
                    "Defect_LowCount"
                } else {
                    "Defect_HighCount"
                }
            },
            Self::DistillMismatch { needed, .. } => {
                if *needed {
                    "Defect_NeedsDistill"
                } else {
                    "Defect_BadDistill"
                }
            },
            Self::CookTimeMismatch { actual, needed } => {
                if actual < needed {
                    "Defect_Uncooked"
                } else {
                    "Defect_Overcooked"
                }
            },
            Self::AgeMismatch { actual, needed } => {
                if *needed == 0.0 {
                    "Defect_BadAged"
                } else if actual < needed {
                    "Defect_UnderAged"
                } else {
                    "Defect_OverAged"
                }
            },
            Self::WrongWood { .. } => "Defect_WrongWood",
            Self::NoRecipesRegistered => "Defect_NoRecipesRegistered",
        }
    }

    /// Placeholder values for the translated message.
    #[must_use]
    pub fn message_args(&self) -> Vec<String> {
        match self {
            Self::WrongWood { actual, .. } => vec![actual.formatted_name().to_lowercase()],
            _ => Vec::new(),
        }
    }

    /// Whether the defect concerns the ingredients rather than the process.
    #[must_use]
    pub const fn is_ingredient_defect(&self) -> bool {
        matches!(
            self,
            Self::WrongIngredient { .. } | Self::MissingIngredient { .. } | Self::WrongCount { .. }
        )
    }
}

impl<K: IngredientKind> fmt::Display for Defect<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongIngredient { ingredient } => {
                write!(f, "WrongIngredient{{{}}}", ingredient.debug_id())
            },
            Self::MissingIngredient {
                ingredient,
                amount_needed,
            } => write!(
                f,
                "MissingIngredient{{{amount_needed}x {}}}",
                ingredient.debug_id()
            ),
            Self::WrongCount {
                ingredient,
                actual,
                needed,
            } => write!(f, "WrongCount{{{actual}/{needed} {}}}", ingredient.debug_id()),
            Self::DistillMismatch { needed, .. } => {
                f.write_str(if *needed {
                    "DistillNeeded"
                } else {
                    "DistillUnnecessary"
                })
            },
            Self::CookTimeMismatch { actual, needed } => {
                write!(f, "CookTimeMismatch{{{actual}/{needed}}}")
            },
            Self::AgeMismatch { actual, needed } => {
                write!(f, "AgeMismatch{{{actual:.3}/{needed:.3}}}")
            },
            Self::WrongWood { actual, needed } => {
                write!(f, "WrongWood{{was {actual}, needs {needed}}}")
            },
            Self::NoRecipesRegistered => f.write_str("NoRecipesRegistered{}"),
        }
    }
}
