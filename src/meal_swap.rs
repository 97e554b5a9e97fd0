//! # Meal Swap Scoring and Validation
//!
//! Ad-hoc substitution of one meal in an existing plan. Candidates are
//! scored with the same nutrition/variety/prep-time signals as slot
//! selection, but re-weighted so closeness to the *current meal's*
//! nutrition dominates: the user asked for "something like this", not a
//! fresh pick. A candidate from the wrong category (or outside the slot's
//! carb window) keeps half its score instead of being disqualified, so a
//! thin catalog still yields fallback suggestions.
//!
//! The validator recomputes the day's totals post-swap and returns
//! warnings, never failures: a swap outside the day's carb window, under
//! a protein/fiber floor, or moving a single meal's carbs by more than
//! 15 g (a blood-sugar-stability heuristic) is permitted but flagged.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::nutrition::NutritionInfo;
use crate::plan_errors::PlanError;
use crate::plan_model::{DailyPlan, MealAssignment, MealSlot, MealSlotSpec, WeeklyPlan};
use crate::preference_filter::{filter_recipes, FilterKeywords};
use crate::preferences::Preferences;
use crate::recipe_model::{Recipe, RecipeCatalog};
use crate::usage_ledger::UsageLedger;

/// Single-meal carb shift beyond which a swap is flagged.
pub const CARB_DELTA_WARN_GRAMS: f64 = 15.0;

/// Score multiplier when the category/carb-window compatibility check fails.
const CATEGORY_MISMATCH_FACTOR: f64 = 0.5;

// Swap-specific signal magnitudes; carb closeness dominates
const SWAP_CARB_BASE: f64 = 60.0;
const SWAP_CARB_PENALTY_PER_GRAM: f64 = 3.0;
const SWAP_PROTEIN_CLOSENESS_SCALE: f64 = 10.0;
const SWAP_FAVORITE_BONUS: f64 = 8.0;
const SWAP_UNUSED_BONUS: f64 = 6.0;
const SWAP_QUICK_BONUS: f64 = 4.0;

/// Per-signal breakdown for one swap candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwapScoreBreakdown {
    pub carb_closeness: f64,
    pub protein_closeness: f64,
    pub preference: f64,
    pub variety: f64,
    pub prep_time: f64,
    /// True when the category/carb-window compatibility check failed and
    /// the half-score penalty was applied
    pub category_penalized: bool,
    pub total: f64,
}

/// One ranked substitution candidate.
#[derive(Debug, Clone)]
pub struct SwapCandidate {
    pub recipe: Recipe,
    pub score: f64,
    pub breakdown: SwapScoreBreakdown,
}

/// Non-fatal issues a proposed swap would introduce.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwapWarning {
    /// Day total would leave the summed slot carb windows
    DayCarbsOutOfRange {
        total: f64,
        min: f64,
        max: f64,
    },
    /// Day total would fall under the summed protein floors
    DayProteinBelowFloor { total: f64, floor: f64 },
    /// Day total would fall under the summed fiber floors
    DayFiberBelowFloor { total: f64, floor: f64 },
    /// The swapped meal's carbs move more than the stability threshold
    CarbDeltaExceedsThreshold { delta: f64 },
}

/// Validation outcome. `valid` means the swap introduces no warnings; a
/// flagged swap is still permitted, the caller decides how to present it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapValidation {
    pub valid: bool,
    pub warnings: Vec<SwapWarning>,
}

/// Rank substitution candidates for `current` in `slot`.
///
/// `exclusions` holds recipe ids already used this week; they and the
/// current recipe are never offered. Candidates are preference-filtered
/// before scoring. Ordering is deterministic (score descending, id
/// ascending on ties).
pub fn score_swap_candidates(
    current: &MealAssignment,
    spec: &MealSlotSpec,
    catalog: &dyn RecipeCatalog,
    prefs: &Preferences,
    ledger: &UsageLedger,
    exclusions: &HashSet<String>,
) -> Vec<SwapCandidate> {
    let outcome = filter_recipes(&catalog.get_all(), prefs, &FilterKeywords::default());

    let mut candidates: Vec<SwapCandidate> = outcome
        .suitable
        .into_iter()
        .filter(|r| Some(r.id.as_str()) != current.recipe_id.as_deref())
        .filter(|r| !exclusions.contains(&r.id))
        .map(|recipe| {
            let breakdown = score_one(&recipe, current, spec, prefs, ledger);
            SwapCandidate {
                score: breakdown.total,
                breakdown,
                recipe,
            }
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.recipe.id.cmp(&b.recipe.id))
    });

    debug!(
        "Ranked {} swap candidates for {} (current: {:?})",
        candidates.len(),
        spec.slot,
        current.recipe_id
    );
    candidates
}

fn score_one(
    recipe: &Recipe,
    current: &MealAssignment,
    spec: &MealSlotSpec,
    prefs: &Preferences,
    ledger: &UsageLedger,
) -> SwapScoreBreakdown {
    // Dominant term: carbohydrate distance to the meal being replaced
    let carb_delta = (recipe.nutrition.carbohydrates - current.nutrition.carbohydrates).abs();
    let carb_closeness = SWAP_CARB_BASE - SWAP_CARB_PENALTY_PER_GRAM * carb_delta;

    let protein_delta = (recipe.nutrition.protein - current.nutrition.protein).abs();
    let protein_closeness = (SWAP_PROTEIN_CLOSENESS_SCALE - protein_delta / 2.0).max(0.0);

    let preference = if prefs.is_favorite(&recipe.id) {
        SWAP_FAVORITE_BONUS
    } else {
        0.0
    };

    let variety = if ledger.use_count(&recipe.id) == 0 {
        SWAP_UNUSED_BONUS
    } else {
        -SWAP_UNUSED_BONUS * f64::from(ledger.use_count(&recipe.id))
    };

    let prep_time = match prefs.max_cook_time {
        Some(ceiling) if recipe.total_time <= ceiling => SWAP_QUICK_BONUS,
        Some(_) => 0.0,
        None if recipe.total_time <= 30 => SWAP_QUICK_BONUS,
        None => 0.0,
    };

    let mut total = carb_closeness + protein_closeness + preference + variety + prep_time;

    // Category compatibility: right category, or at least inside the
    // slot's carb window. Failing costs half the score, keeping a
    // fallback available instead of disqualifying.
    let compatible = recipe.category == spec.slot.category()
        || spec.carbs_in_range(recipe.nutrition.carbohydrates);
    if !compatible {
        total *= CATEGORY_MISMATCH_FACTOR;
    }

    SwapScoreBreakdown {
        carb_closeness,
        protein_closeness,
        preference,
        variety,
        prep_time,
        category_penalized: !compatible,
        total,
    }
}

/// Check what a swap would do to the day's totals.
///
/// `specs` is the slot-spec table the plan was generated under; the day
/// bounds are the sums of the individual slot windows and floors.
pub fn validate_swap(
    day: &DailyPlan,
    slot: MealSlot,
    replacement: &Recipe,
    specs: &[MealSlotSpec],
) -> SwapValidation {
    let mut warnings = Vec::new();

    let current = day.assignment(slot);
    let current_nutrition = current
        .map(|a| a.nutrition)
        .unwrap_or_else(NutritionInfo::zero);

    // Day totals with the replacement applied (remove current, add new)
    let new_total = day
        .total_nutrition
        .add(&current_nutrition.scale(-1.0))
        .add(&replacement.nutrition);

    let (day_min_carbs, day_max_carbs) = day_carb_bounds(day, specs);
    if new_total.carbohydrates < day_min_carbs || new_total.carbohydrates > day_max_carbs {
        warnings.push(SwapWarning::DayCarbsOutOfRange {
            total: new_total.carbohydrates,
            min: day_min_carbs,
            max: day_max_carbs,
        });
    }

    let protein_floor = floor_sum(day, specs, |s| s.min_protein);
    if new_total.protein < protein_floor {
        warnings.push(SwapWarning::DayProteinBelowFloor {
            total: new_total.protein,
            floor: protein_floor,
        });
    }

    let fiber_floor = floor_sum(day, specs, |s| s.min_fiber);
    if new_total.fiber < fiber_floor {
        warnings.push(SwapWarning::DayFiberBelowFloor {
            total: new_total.fiber,
            floor: fiber_floor,
        });
    }

    let delta =
        (replacement.nutrition.carbohydrates - current_nutrition.carbohydrates).abs();
    if delta > CARB_DELTA_WARN_GRAMS {
        warnings.push(SwapWarning::CarbDeltaExceedsThreshold { delta });
    }

    SwapValidation {
        valid: warnings.is_empty(),
        warnings,
    }
}

/// Apply a swap to a plan: replace the assignment, recompute the day
/// total, bump the plan version. Returns the validation so callers can
/// surface warnings alongside the applied change.
pub fn apply_swap(
    plan: &mut WeeklyPlan,
    day_index: usize,
    slot: MealSlot,
    catalog: &dyn RecipeCatalog,
    recipe_id: &str,
    specs: &[MealSlotSpec],
) -> Result<SwapValidation, PlanError> {
    let replacement = catalog
        .get_by_id(recipe_id)
        .ok_or_else(|| PlanError::UnresolvedRecipeReference(recipe_id.to_string()))?;

    let validation = validate_swap(&plan.days[day_index], slot, &replacement, specs);

    let day = &mut plan.days[day_index];
    if let Some(assignment) = day.assignments.iter_mut().find(|a| a.slot == slot) {
        *assignment = MealAssignment::new(
            slot,
            &replacement.id,
            &replacement.title,
            1.0,
            replacement.nutrition,
        );
    }
    day.recompute_total();
    plan.bump_version();

    Ok(validation)
}

/// Sum the carb windows over the day's non-empty slots.
fn day_carb_bounds(day: &DailyPlan, specs: &[MealSlotSpec]) -> (f64, f64) {
    let mut min = 0.0;
    let mut max = 0.0;
    for assignment in &day.assignments {
        if assignment.is_empty() {
            continue;
        }
        if let Some(spec) = specs.iter().find(|s| s.slot == assignment.slot) {
            min += spec.min_carbs;
            max += spec.max_carbs;
        }
    }
    (min, max)
}

fn floor_sum(
    day: &DailyPlan,
    specs: &[MealSlotSpec],
    floor: impl Fn(&MealSlotSpec) -> Option<f64>,
) -> f64 {
    day.assignments
        .iter()
        .filter(|a| !a.is_empty())
        .filter_map(|a| specs.iter().find(|s| s.slot == a.slot).and_then(&floor))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_model::{InMemoryCatalog, MealCategory};
    use chrono::NaiveDate;

    fn snack(id: &str, carbs: f64, protein: f64) -> Recipe {
        Recipe::new(id, id, MealCategory::Snack)
            .with_nutrition(NutritionInfo::new(carbs * 8.0, carbs, protein, 5.0, 3.0))
            .with_total_time(10)
            .with_ingredient("snack base", 1.0, "cup")
    }

    fn dinner(id: &str, carbs: f64) -> Recipe {
        Recipe::new(id, id, MealCategory::Dinner)
            .with_nutrition(NutritionInfo::new(carbs * 8.0, carbs, 24.0, 12.0, 6.0))
            .with_total_time(40)
            .with_ingredient("dinner base", 1.0, "cup")
    }

    fn full_day() -> DailyPlan {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        DailyPlan::new(
            date,
            vec![
                MealAssignment::new(
                    MealSlot::Breakfast,
                    "b1",
                    "Oats",
                    1.0,
                    NutritionInfo::new(300.0, 35.0, 14.0, 8.0, 5.0),
                ),
                MealAssignment::new(
                    MealSlot::MorningSnack,
                    "s1",
                    "Yogurt",
                    1.0,
                    NutritionInfo::new(120.0, 15.0, 8.0, 3.0, 2.0),
                ),
                MealAssignment::new(
                    MealSlot::Lunch,
                    "l1",
                    "Grain Bowl",
                    1.0,
                    NutritionInfo::new(450.0, 40.0, 20.0, 14.0, 7.0),
                ),
                MealAssignment::new(
                    MealSlot::AfternoonSnack,
                    "s2",
                    "Hummus",
                    1.0,
                    NutritionInfo::new(140.0, 14.0, 6.0, 6.0, 3.0),
                ),
                MealAssignment::new(
                    MealSlot::Dinner,
                    "d1",
                    "Salmon Plate",
                    1.0,
                    NutritionInfo::new(520.0, 38.0, 28.0, 18.0, 6.0),
                ),
                MealAssignment::new(
                    MealSlot::EveningSnack,
                    "s3",
                    "Cottage Cheese",
                    1.0,
                    NutritionInfo::new(110.0, 12.0, 11.0, 3.0, 2.0),
                ),
            ],
        )
    }

    #[test]
    fn test_candidates_ranked_by_carb_closeness() {
        let current = full_day().assignment(MealSlot::EveningSnack).unwrap().clone();
        let catalog = InMemoryCatalog::new(vec![
            snack("close", 13.0, 9.0),
            snack("far", 24.0, 9.0),
            snack("exact", 12.0, 11.0),
        ]);
        let spec = MealSlotSpec::gd_default(MealSlot::EveningSnack);

        let ranked = score_swap_candidates(
            &current,
            &spec,
            &catalog,
            &Preferences::default(),
            &UsageLedger::new(),
            &HashSet::new(),
        );

        assert_eq!(ranked[0].recipe.id, "exact");
        assert_eq!(ranked.last().unwrap().recipe.id, "far");
    }

    #[test]
    fn test_exclusions_and_current_recipe_removed() {
        let current = full_day().assignment(MealSlot::EveningSnack).unwrap().clone();
        let catalog = InMemoryCatalog::new(vec![
            snack("s3", 12.0, 11.0), // the current recipe
            snack("used", 13.0, 9.0),
            snack("open", 14.0, 8.0),
        ]);
        let spec = MealSlotSpec::gd_default(MealSlot::EveningSnack);
        let exclusions: HashSet<String> = ["used".to_string()].into();

        let ranked = score_swap_candidates(
            &current,
            &spec,
            &catalog,
            &Preferences::default(),
            &UsageLedger::new(),
            &exclusions,
        );

        let ids: Vec<&str> = ranked.iter().map(|c| c.recipe.id.as_str()).collect();
        assert_eq!(ids, vec!["open"]);
    }

    #[test]
    fn test_wrong_category_halves_score_not_disqualifies() {
        let current = full_day().assignment(MealSlot::EveningSnack).unwrap().clone();
        // A dinner recipe with carbs far outside the snack window
        let catalog = InMemoryCatalog::new(vec![dinner("d9", 45.0)]);
        let spec = MealSlotSpec::gd_default(MealSlot::EveningSnack);

        let ranked = score_swap_candidates(
            &current,
            &spec,
            &catalog,
            &Preferences::default(),
            &UsageLedger::new(),
            &HashSet::new(),
        );

        assert_eq!(ranked.len(), 1);
        assert!(ranked[0].breakdown.category_penalized);
    }

    #[test]
    fn test_validate_flags_large_carb_delta() {
        let day = full_day();
        let replacement = snack("big", 30.0, 8.0); // +18g over the 12g current
        let specs = MealSlotSpec::gd_defaults();

        let validation = validate_swap(&day, MealSlot::EveningSnack, &replacement, &specs);
        assert!(!validation.valid);
        assert!(validation
            .warnings
            .iter()
            .any(|w| matches!(w, SwapWarning::CarbDeltaExceedsThreshold { delta } if *delta == 18.0)));
    }

    #[test]
    fn test_validate_clean_swap_has_no_warnings() {
        let day = full_day();
        let replacement = snack("gentle", 14.0, 10.0);
        let specs = MealSlotSpec::gd_defaults();

        let validation = validate_swap(&day, MealSlot::EveningSnack, &replacement, &specs);
        assert!(validation.valid, "warnings: {:?}", validation.warnings);
    }

    #[test]
    fn test_apply_swap_updates_day_and_version() {
        let mut plan = WeeklyPlan {
            user_id: "u".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            days: vec![full_day()],
            preferences: Preferences::default(),
            summary: crate::plan_model::WeeklySummary {
                avg_daily_nutrition: NutritionInfo::zero(),
                unique_recipe_count: 6,
                total_prep_time_minutes: 0,
            },
            version: 1,
        };
        let catalog = InMemoryCatalog::new(vec![snack("new-snack", 14.0, 10.0)]);
        let specs = MealSlotSpec::gd_defaults();

        let validation = apply_swap(
            &mut plan,
            0,
            MealSlot::EveningSnack,
            &catalog,
            "new-snack",
            &specs,
        )
        .unwrap();

        assert!(validation.valid);
        assert_eq!(plan.version, 2);
        let assignment = plan.days[0].assignment(MealSlot::EveningSnack).unwrap();
        assert_eq!(assignment.recipe_id.as_deref(), Some("new-snack"));
        // Day total reflects the replacement exactly
        let expected: f64 = plan.days[0]
            .assignments
            .iter()
            .map(|a| a.nutrition.carbohydrates)
            .sum();
        assert_eq!(plan.days[0].total_nutrition.carbohydrates, expected);
    }

    #[test]
    fn test_apply_swap_unknown_recipe_errors() {
        let mut plan = WeeklyPlan {
            user_id: "u".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 10).unwrap(),
            days: vec![full_day()],
            preferences: Preferences::default(),
            summary: crate::plan_model::WeeklySummary {
                avg_daily_nutrition: NutritionInfo::zero(),
                unique_recipe_count: 6,
                total_prep_time_minutes: 0,
            },
            version: 1,
        };
        let catalog = InMemoryCatalog::new(vec![]);
        let specs = MealSlotSpec::gd_defaults();

        let err = apply_swap(&mut plan, 0, MealSlot::Dinner, &catalog, "ghost", &specs).unwrap_err();
        assert_eq!(err, PlanError::UnresolvedRecipeReference("ghost".to_string()));
        assert_eq!(plan.version, 1);
    }
}
