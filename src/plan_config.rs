//! # Planning Configuration
//!
//! All tunables of the generation engine in one place: scoring weights,
//! relaxation steps, rotation spacing, and per-run generation options.
//! The weights are design choices, not physical constants; they are
//! configurable so product experiments do not require code changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// Defaults for the generation options
pub const DEFAULT_DAYS_TO_GENERATE: u32 = 7;
pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_MAX_RECIPE_REPEATS: u32 = 2;

// Relaxation defaults
pub const DEFAULT_CARB_WIDEN_STEP: f64 = 10.0;
pub const DEFAULT_REPEAT_CAP_RAISE: u32 = 2;

// Rotation defaults
pub const DEFAULT_MIN_SPACING_WEEKS: u32 = 8;
pub const DEFAULT_ROTATION_RETRIES: u32 = 5;

/// Relative weights of the scoring signals.
///
/// Roughly: nutrition fit half of the signal, preference a quarter,
/// variety and prep-time the remainder. See `slot_scorer` for how each
/// term is computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the carb-deviation and protein/fiber terms
    pub nutrition_fit: f64,
    /// Weight of the favorite / preferred-tag bonus
    pub preference: f64,
    /// Weight of the recency and overuse penalties
    pub variety: f64,
    /// Weight of the under-the-ceiling prep-time bonus
    pub prep_time: f64,
    /// Flat penalty when a hard protein floor is missed (evening snack)
    pub hard_protein_floor_penalty: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            nutrition_fit: 0.5,
            preference: 0.25,
            variety: 0.15,
            prep_time: 0.1,
            hard_protein_floor_penalty: 40.0,
        }
    }
}

/// Constraint relaxation applied when a slot has zero candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationConfig {
    /// Grams added to each side of the slot's carb window
    pub carb_widen_step: f64,
    /// Amount the per-recipe repeat cap is raised by
    pub repeat_cap_raise: u32,
}

impl Default for RelaxationConfig {
    fn default() -> Self {
        Self {
            carb_widen_step: DEFAULT_CARB_WIDEN_STEP,
            repeat_cap_raise: DEFAULT_REPEAT_CAP_RAISE,
        }
    }
}

/// Rotation-library build settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationConfig {
    /// Minimum weeks before a recipe may repeat within a track
    pub min_spacing_weeks: u32,
    /// Bounded regeneration attempts per week before accepting a
    /// violation (the violation is then reported, not dropped)
    pub max_retries: u32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_spacing_weeks: DEFAULT_MIN_SPACING_WEEKS,
            max_retries: DEFAULT_ROTATION_RETRIES,
        }
    }
}

/// Per-run generation options.
///
/// The seed is the only source of non-determinism in the engine: two runs
/// with the same catalog snapshot, preferences, start date and seed produce
/// identical plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationOptions {
    pub start_date: NaiveDate,
    pub days_to_generate: u32,
    /// Seed for the top-k sampling RNG
    pub random_seed: u64,
    /// Bonus for recipes with zero recorded uses
    pub prioritize_new: bool,
    /// Times a recipe may appear in one generation run before being
    /// screened out of candidate lists
    pub max_recipe_repeats: u32,
    /// Size of the top-k pool sampled for each slot
    pub top_k: usize,
}

impl GenerationOptions {
    pub fn new(start_date: NaiveDate) -> Self {
        Self {
            start_date,
            days_to_generate: DEFAULT_DAYS_TO_GENERATE,
            random_seed: 0,
            prioritize_new: false,
            max_recipe_repeats: DEFAULT_MAX_RECIPE_REPEATS,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_days(mut self, days: u32) -> Self {
        self.days_to_generate = days;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = seed;
        self
    }

    pub fn with_prioritize_new(mut self, prioritize: bool) -> Self {
        self.prioritize_new = prioritize;
        self
    }

    pub fn with_max_repeats(mut self, max_repeats: u32) -> Self {
        self.max_recipe_repeats = max_repeats;
        self
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }
}
