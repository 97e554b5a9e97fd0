//! # Nutrition Value Type
//!
//! This module defines the nutrition value object used throughout the
//! planning engine. Every aggregation step (meal, day, week, rotation
//! summary) works by field-wise addition of `NutritionInfo` values, so the
//! arithmetic here must be exact: a day's total is always the literal sum
//! of its non-empty assignments.
//!
//! ## Usage
//!
//! ```rust
//! use mealplanner::nutrition::NutritionInfo;
//!
//! let breakfast = NutritionInfo::new(320.0, 32.0, 14.0, 12.0, 5.0);
//! let snack = NutritionInfo::new(150.0, 18.0, 6.0, 5.0, 3.0);
//!
//! let total = breakfast.add(&snack);
//! assert_eq!(total.carbohydrates, 50.0);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nutrition facts for one recipe serving, one meal, or an aggregate.
///
/// All macro values are grams; calories are kcal. Sugar and sodium are
/// optional because large parts of the recipe catalog were scraped from
/// sources that do not publish them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionInfo {
    /// Energy in kcal
    pub calories: f64,
    /// Carbohydrates in grams (the primary GD planning signal)
    pub carbohydrates: f64,
    /// Protein in grams
    pub protein: f64,
    /// Fat in grams
    pub fat: f64,
    /// Dietary fiber in grams
    pub fiber: f64,
    /// Sugars in grams, when the source published them
    pub sugar: Option<f64>,
    /// Sodium in milligrams, when the source published it
    pub sodium: Option<f64>,
}

impl NutritionInfo {
    /// Create a nutrition record from the five macro values every catalog
    /// recipe is required to carry.
    pub fn new(calories: f64, carbohydrates: f64, protein: f64, fat: f64, fiber: f64) -> Self {
        Self {
            calories,
            carbohydrates,
            protein,
            fat,
            fiber,
            sugar: None,
            sodium: None,
        }
    }

    /// A zero-valued record. Skipped meal slots contribute this instead of
    /// being absent, which keeps day-level summation total.
    pub fn zero() -> Self {
        Self::default()
    }

    /// Attach a sugar value
    pub fn with_sugar(mut self, sugar: f64) -> Self {
        self.sugar = Some(sugar);
        self
    }

    /// Attach a sodium value
    pub fn with_sodium(mut self, sodium: f64) -> Self {
        self.sodium = Some(sodium);
        self
    }

    /// Field-wise sum of two records.
    ///
    /// Optional fields follow the aggregation rule used by the catalog
    /// importer: a present value is added to the running total, an absent
    /// value leaves the total unchanged (absent + absent stays absent).
    pub fn add(&self, other: &NutritionInfo) -> NutritionInfo {
        NutritionInfo {
            calories: self.calories + other.calories,
            carbohydrates: self.carbohydrates + other.carbohydrates,
            protein: self.protein + other.protein,
            fat: self.fat + other.fat,
            fiber: self.fiber + other.fiber,
            sugar: add_optional(self.sugar, other.sugar),
            sodium: add_optional(self.sodium, other.sodium),
        }
    }

    /// Scale every field by a servings multiplier.
    pub fn scale(&self, factor: f64) -> NutritionInfo {
        NutritionInfo {
            calories: self.calories * factor,
            carbohydrates: self.carbohydrates * factor,
            protein: self.protein * factor,
            fat: self.fat * factor,
            fiber: self.fiber * factor,
            sugar: self.sugar.map(|s| s * factor),
            sodium: self.sodium.map(|s| s * factor),
        }
    }

    /// Sum an iterator of records, starting from zero.
    pub fn sum<'a, I>(records: I) -> NutritionInfo
    where
        I: IntoIterator<Item = &'a NutritionInfo>,
    {
        records
            .into_iter()
            .fold(NutritionInfo::zero(), |acc, n| acc.add(n))
    }
}

fn add_optional(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0.0) + b.unwrap_or(0.0)),
    }
}

impl fmt::Display for NutritionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.0} kcal | {:.1}g carbs | {:.1}g protein | {:.1}g fat | {:.1}g fiber",
            self.calories, self.carbohydrates, self.protein, self.fat, self.fiber
        )
    }
}
