//! # Planning Error Types
//!
//! Hard failures raised by the planning engine. Soft compromises
//! (relaxations, spacing violations, swap warnings) are returned as data on
//! the relevant result types, never as errors, so batch operations can
//! finish with an inventory of compromises instead of halting.

use crate::plan_model::MealSlot;

/// Hard planning failures.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanError {
    /// No recipe satisfies a slot even after the relaxation pass.
    /// Carries the slot and a description of the constraints attempted so
    /// the caller can explain the failure to the user.
    NoSuitableRecipe {
        slot: MealSlot,
        constraints: String,
    },
    /// A plan references a recipe id absent from the current catalog
    /// snapshot; indicates stale data.
    UnresolvedRecipeReference(String),
    /// The catalog has no recipes at all for a required category.
    EmptyCategory(String),
}

impl std::fmt::Display for PlanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlanError::NoSuitableRecipe { slot, constraints } => write!(
                f,
                "No suitable recipe for {slot} (constraints attempted: {constraints})"
            ),
            PlanError::UnresolvedRecipeReference(id) => {
                write!(f, "Recipe '{id}' not found in catalog snapshot")
            }
            PlanError::EmptyCategory(category) => {
                write!(f, "Catalog has no recipes in category '{category}'")
            }
        }
    }
}

impl std::error::Error for PlanError {}
