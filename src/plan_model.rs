//! # Plan Data Model
//!
//! Slot definitions, per-slot nutrition targets, and the assembled plan
//! types (meal assignment, daily plan, weekly plan, rotation entry).
//!
//! A day always carries all six slots in display order. Slots the user
//! skips are kept as zero-nutrition placeholders rather than being removed,
//! so day-level aggregation is a plain sum over the assignment list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::nutrition::NutritionInfo;
use crate::preferences::Preferences;
use crate::recipe_model::MealCategory;

/// One of the six meal positions in a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MealSlot {
    Breakfast,
    MorningSnack,
    Lunch,
    AfternoonSnack,
    Dinner,
    EveningSnack,
}

impl MealSlot {
    /// All six slots in display order (the order they appear in a day).
    pub fn display_order() -> [MealSlot; 6] {
        [
            MealSlot::Breakfast,
            MealSlot::MorningSnack,
            MealSlot::Lunch,
            MealSlot::AfternoonSnack,
            MealSlot::Dinner,
            MealSlot::EveningSnack,
        ]
    }

    /// Fill order used by the assembler: anchor meals first, then the
    /// balance snacks that absorb the remaining carb budget.
    pub fn fill_order() -> [MealSlot; 6] {
        [
            MealSlot::Breakfast,
            MealSlot::Lunch,
            MealSlot::Dinner,
            MealSlot::MorningSnack,
            MealSlot::AfternoonSnack,
            MealSlot::EveningSnack,
        ]
    }

    /// Whether this slot is one of the three anchor meals.
    pub fn is_anchor(&self) -> bool {
        matches!(
            self,
            MealSlot::Breakfast | MealSlot::Lunch | MealSlot::Dinner
        )
    }

    /// Catalog category recipes for this slot are drawn from.
    pub fn category(&self) -> MealCategory {
        match self {
            MealSlot::Breakfast => MealCategory::Breakfast,
            MealSlot::Lunch => MealCategory::Lunch,
            MealSlot::Dinner => MealCategory::Dinner,
            MealSlot::MorningSnack | MealSlot::AfternoonSnack | MealSlot::EveningSnack => {
                MealCategory::Snack
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::MorningSnack => "morning snack",
            MealSlot::Lunch => "lunch",
            MealSlot::AfternoonSnack => "afternoon snack",
            MealSlot::Dinner => "dinner",
            MealSlot::EveningSnack => "evening snack",
        }
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Nutrition target for one meal slot.
///
/// Carb windows are configuration data following GD guidelines, not derived
/// values. The evening snack carries a hard protein floor (overnight
/// glucose stability); failing it is a heavy scoring penalty, never a
/// disqualification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealSlotSpec {
    pub slot: MealSlot,
    /// Preferred carbohydrate grams
    pub target_carbs: f64,
    /// Lower bound of the acceptable carb window
    pub min_carbs: f64,
    /// Upper bound of the acceptable carb window
    pub max_carbs: f64,
    /// Minimum protein grams, if the slot has one
    pub min_protein: Option<f64>,
    /// Minimum fiber grams, if the slot has one
    pub min_fiber: Option<f64>,
    /// Treat `min_protein` as a hard floor (heavy penalty when missed)
    pub protein_floor_hard: bool,
}

impl MealSlotSpec {
    /// GD default spec for a single slot.
    pub fn gd_default(slot: MealSlot) -> Self {
        match slot {
            MealSlot::Breakfast => Self {
                slot,
                target_carbs: 35.0,
                min_carbs: 25.0,
                max_carbs: 45.0,
                min_protein: Some(10.0),
                min_fiber: Some(3.0),
                protein_floor_hard: false,
            },
            MealSlot::Lunch => Self {
                slot,
                target_carbs: 40.0,
                min_carbs: 30.0,
                max_carbs: 50.0,
                min_protein: Some(15.0),
                min_fiber: Some(4.0),
                protein_floor_hard: false,
            },
            MealSlot::Dinner => Self {
                slot,
                target_carbs: 40.0,
                min_carbs: 30.0,
                max_carbs: 50.0,
                min_protein: Some(20.0),
                min_fiber: Some(4.0),
                protein_floor_hard: false,
            },
            MealSlot::MorningSnack | MealSlot::AfternoonSnack => Self {
                slot,
                target_carbs: 15.0,
                min_carbs: 10.0,
                max_carbs: 25.0,
                min_protein: Some(5.0),
                min_fiber: Some(2.0),
                protein_floor_hard: false,
            },
            MealSlot::EveningSnack => Self {
                slot,
                target_carbs: 15.0,
                min_carbs: 10.0,
                max_carbs: 25.0,
                min_protein: Some(5.0),
                min_fiber: Some(2.0),
                protein_floor_hard: true,
            },
        }
    }

    /// The full six-slot GD default table, in display order.
    pub fn gd_defaults() -> Vec<MealSlotSpec> {
        MealSlot::display_order()
            .iter()
            .map(|s| MealSlotSpec::gd_default(*s))
            .collect()
    }

    /// Spec with the carb window widened by `step` on both sides,
    /// floored at zero. Used by the selector's relaxation pass.
    pub fn widened(&self, step: f64) -> Self {
        let mut spec = self.clone();
        spec.min_carbs = (spec.min_carbs - step).max(0.0);
        spec.max_carbs += step;
        spec
    }

    /// Whether a carb value falls inside the window.
    pub fn carbs_in_range(&self, carbs: f64) -> bool {
        carbs >= self.min_carbs && carbs <= self.max_carbs
    }
}

/// Constraint relaxation applied while filling one slot. Recorded on the
/// generated day so callers can see every compromise that was made.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaxationEvent {
    pub slot: MealSlot,
    /// Widened carb window, if the carb tolerance was relaxed
    pub widened_carb_range: Option<(f64, f64)>,
    /// New repeat cap, if the usage cap was raised
    pub raised_repeat_cap: Option<u32>,
}

/// One selected recipe bound to one slot on one day.
///
/// A skipped slot is represented by an assignment with no recipe id and
/// zero nutrition, never by a missing entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealAssignment {
    pub slot: MealSlot,
    /// Catalog recipe id, or `None` for a skipped slot
    pub recipe_id: Option<String>,
    /// Cached recipe title for display and shopping-list provenance
    pub recipe_title: Option<String>,
    /// Servings multiplier applied to the recipe's per-serving values
    pub servings: f64,
    /// Recipe nutrition scaled by `servings` (zero for skipped slots)
    pub nutrition: NutritionInfo,
}

impl MealAssignment {
    pub fn new(
        slot: MealSlot,
        recipe_id: &str,
        recipe_title: &str,
        servings: f64,
        nutrition: NutritionInfo,
    ) -> Self {
        Self {
            slot,
            recipe_id: Some(recipe_id.to_string()),
            recipe_title: Some(recipe_title.to_string()),
            servings,
            nutrition,
        }
    }

    /// Zero-nutrition placeholder for a slot the user skips.
    pub fn skipped(slot: MealSlot) -> Self {
        Self {
            slot,
            recipe_id: None,
            recipe_title: None,
            servings: 0.0,
            nutrition: NutritionInfo::zero(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.recipe_id.is_none()
    }
}

/// One planned day: date, six ordered assignments, aggregated nutrition,
/// and any relaxations that were needed to fill it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPlan {
    pub date: NaiveDate,
    /// All six slots in display order
    pub assignments: Vec<MealAssignment>,
    /// Exact sum over `assignments` (skipped slots contribute zero)
    pub total_nutrition: NutritionInfo,
    /// Free-text prep notes
    pub prep_notes: String,
    /// Relaxations applied while filling this day
    pub relaxations: Vec<RelaxationEvent>,
}

impl DailyPlan {
    pub fn new(date: NaiveDate, assignments: Vec<MealAssignment>) -> Self {
        let total_nutrition = NutritionInfo::sum(assignments.iter().map(|a| &a.nutrition));
        Self {
            date,
            assignments,
            total_nutrition,
            prep_notes: String::new(),
            relaxations: Vec::new(),
        }
    }

    /// Assignment for a specific slot.
    pub fn assignment(&self, slot: MealSlot) -> Option<&MealAssignment> {
        self.assignments.iter().find(|a| a.slot == slot)
    }

    /// Recompute the aggregated nutrition after an in-place mutation
    /// (e.g. a swap). Keeps the sum invariant intact.
    pub fn recompute_total(&mut self) {
        self.total_nutrition = NutritionInfo::sum(self.assignments.iter().map(|a| &a.nutrition));
    }

    /// Distinct recipe ids used on this day.
    pub fn recipe_ids(&self) -> Vec<&str> {
        self.assignments
            .iter()
            .filter_map(|a| a.recipe_id.as_deref())
            .collect()
    }
}

/// Week-level nutrition and effort summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySummary {
    /// Daily averages across the generated days
    pub avg_daily_nutrition: NutritionInfo,
    /// Distinct recipes used across the whole plan
    pub unique_recipe_count: usize,
    /// Sum of recipe total times across all non-empty assignments, minutes
    pub total_prep_time_minutes: u32,
}

/// A generated multi-day plan with its preference snapshot.
///
/// The version counter starts at 1 and increments on every post-hoc
/// mutation (swap, single-day regeneration); persistence uses it for
/// optimistic concurrency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPlan {
    pub user_id: String,
    pub start_date: NaiveDate,
    pub days: Vec<DailyPlan>,
    /// Preferences in force when the plan was generated
    pub preferences: Preferences,
    pub summary: WeeklySummary,
    pub version: u32,
}

impl WeeklyPlan {
    /// Distinct recipe ids used anywhere in the plan.
    pub fn recipe_ids(&self) -> HashSet<String> {
        self.days
            .iter()
            .flat_map(|d| d.recipe_ids())
            .map(|id| id.to_string())
            .collect()
    }

    /// Record a post-hoc mutation.
    pub fn bump_version(&mut self) {
        self.version += 1;
    }
}

/// One week of a long-running rotation library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RotationEntry {
    /// 1-based week number within the track
    pub week_number: u32,
    /// Track identifier ("standard", "vegetarian", "quick", "family", ...)
    pub track: String,
    pub plan: WeeklyPlan,
}
