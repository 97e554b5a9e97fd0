//! # Slot Scorer
//!
//! Scores a single candidate recipe against a meal slot's nutrition
//! target, the run's usage history, and user preferences. Scores are
//! real-valued and unbounded; only comparisons between candidates for the
//! same slot are meaningful.
//!
//! The composite is a weighted sum of four signals:
//!
//! - **Nutrition fit** (dominant): linear penalty on absolute carb
//!   deviation from the slot target, bonuses for meeting the slot's
//!   protein/fiber minimums. A hard protein floor (evening snack) that is
//!   missed costs a flat heavy penalty; disqualification only happens in
//!   the preference filter and hard feasibility checks, never here.
//! - **Preference**: favorite-recipe and preferred-tag bonuses, plus a
//!   batch-friendly bonus in meal-prep mode.
//! - **Variety**: strong bonus for no use inside the recency window, a
//!   per-recent-use penalty, and an independent overall-use penalty that
//!   discourages plan-wide overuse even outside the window. Scaled by the
//!   user's variety level.
//! - **Prep-time fit**: bonus scaled to how far under the cook-time
//!   ceiling the recipe sits.

use chrono::NaiveDate;
use log::trace;
use serde::{Deserialize, Serialize};

use crate::plan_config::{GenerationOptions, ScoringWeights};
use crate::plan_model::MealSlotSpec;
use crate::preferences::Preferences;
use crate::recipe_model::Recipe;
use crate::usage_ledger::UsageLedger;

// Raw signal magnitudes before weighting
const CARB_FIT_BASE: f64 = 50.0;
const CARB_DEVIATION_PENALTY_PER_GRAM: f64 = 2.0;
const PROTEIN_MET_BONUS: f64 = 10.0;
const FIBER_MET_BONUS: f64 = 5.0;
const FAVORITE_BONUS: f64 = 30.0;
const PREFERRED_TAG_BONUS: f64 = 15.0;
const MEAL_PREP_BONUS: f64 = 10.0;
const UNUSED_IN_WINDOW_BONUS: f64 = 20.0;
const RECENT_USE_PENALTY: f64 = 12.0;
const OVERALL_USE_PENALTY: f64 = 4.0;
const NEVER_USED_BONUS: f64 = 15.0;
const PREP_FIT_SCALE: f64 = 20.0;
// Reference ceiling when the user has no cook-time limit
const DEFAULT_TIME_REFERENCE: u32 = 60;

/// Tags that mark a recipe as batch-friendly for meal-prep mode.
const BATCH_TAGS: [&str; 3] = ["meal-prep", "batch", "freezer-friendly"];

/// Per-signal score components plus the weighted total.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub nutrition_fit: f64,
    pub preference: f64,
    pub variety: f64,
    pub prep_time: f64,
    pub total: f64,
}

/// Score one candidate recipe for one slot.
///
/// `date` anchors the recency window; `ledger` holds this run's usage so
/// far. Pure function of its inputs.
pub fn score_recipe(
    recipe: &Recipe,
    spec: &MealSlotSpec,
    ledger: &UsageLedger,
    date: NaiveDate,
    prefs: &Preferences,
    options: &GenerationOptions,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let nutrition_fit = nutrition_fit_signal(recipe, spec, weights);
    let preference = preference_signal(recipe, prefs);
    let variety = variety_signal(recipe, ledger, date, prefs, options);
    let prep_time = prep_time_signal(recipe, prefs);

    let total = weights.nutrition_fit * nutrition_fit
        + weights.preference * preference
        + weights.variety * variety
        + weights.prep_time * prep_time;

    trace!(
        "Scored '{}' for {}: nutrition={:.1} preference={:.1} variety={:.1} prep={:.1} total={:.2}",
        recipe.title,
        spec.slot,
        nutrition_fit,
        preference,
        variety,
        prep_time,
        total
    );

    ScoreBreakdown {
        nutrition_fit,
        preference,
        variety,
        prep_time,
        total,
    }
}

fn nutrition_fit_signal(recipe: &Recipe, spec: &MealSlotSpec, weights: &ScoringWeights) -> f64 {
    let carbs = recipe.nutrition.carbohydrates;
    let mut signal = CARB_FIT_BASE - CARB_DEVIATION_PENALTY_PER_GRAM * (carbs - spec.target_carbs).abs();

    if let Some(min_protein) = spec.min_protein {
        if recipe.nutrition.protein >= min_protein {
            signal += PROTEIN_MET_BONUS;
        } else if spec.protein_floor_hard {
            signal -= weights.hard_protein_floor_penalty;
        }
    }

    if let Some(min_fiber) = spec.min_fiber {
        if recipe.nutrition.fiber >= min_fiber {
            signal += FIBER_MET_BONUS;
        }
    }

    signal
}

fn preference_signal(recipe: &Recipe, prefs: &Preferences) -> f64 {
    let mut signal = 0.0;

    if prefs.is_favorite(&recipe.id) {
        signal += FAVORITE_BONUS;
    }
    if prefs.preferred_tags.iter().any(|t| recipe.has_tag(t)) {
        signal += PREFERRED_TAG_BONUS;
    }
    if prefs.meal_prep_mode && BATCH_TAGS.iter().any(|t| recipe.has_tag(t)) {
        signal += MEAL_PREP_BONUS;
    }

    signal
}

fn variety_signal(
    recipe: &Recipe,
    ledger: &UsageLedger,
    date: NaiveDate,
    prefs: &Preferences,
    options: &GenerationOptions,
) -> f64 {
    let total_uses = ledger.use_count(&recipe.id);
    let recently_used = ledger.used_within(&recipe.id, date, prefs.avoid_repeat_days);

    let mut signal = if !recently_used {
        UNUSED_IN_WINDOW_BONUS
    } else {
        // Every use inside the window costs; the count makes the penalty
        // escalate on each repeat within the same window.
        -RECENT_USE_PENALTY * f64::from(total_uses.max(1))
    };

    // Plan-wide overuse penalty, independent of the recency window
    signal -= OVERALL_USE_PENALTY * f64::from(total_uses);

    if options.prioritize_new && total_uses == 0 {
        signal += NEVER_USED_BONUS;
    }

    signal * prefs.variety.weight_factor()
}

fn prep_time_signal(recipe: &Recipe, prefs: &Preferences) -> f64 {
    let reference = f64::from(prefs.max_cook_time.unwrap_or(DEFAULT_TIME_REFERENCE));
    if reference <= 0.0 {
        return 0.0;
    }
    let headroom = (reference - f64::from(recipe.total_time)) / reference;
    headroom.clamp(0.0, 1.0) * PREP_FIT_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::NutritionInfo;
    use crate::plan_model::MealSlot;
    use crate::recipe_model::MealCategory;

    fn breakfast(id: &str, carbs: f64) -> Recipe {
        Recipe::new(id, id, MealCategory::Breakfast)
            .with_nutrition(NutritionInfo::new(300.0, carbs, 12.0, 10.0, 4.0))
            .with_total_time(20)
    }

    fn score_simple(recipe: &Recipe, ledger: &UsageLedger) -> ScoreBreakdown {
        let spec = MealSlotSpec::gd_default(MealSlot::Breakfast);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let options = GenerationOptions::new(date);
        score_recipe(
            recipe,
            &spec,
            ledger,
            date,
            &Preferences::default(),
            &options,
            &ScoringWeights::default(),
        )
    }

    #[test]
    fn test_closer_carbs_score_higher() {
        let ledger = UsageLedger::new();
        let near = score_simple(&breakfast("near", 34.0), &ledger);
        let far = score_simple(&breakfast("far", 20.0), &ledger);
        assert!(near.total > far.total);
    }

    #[test]
    fn test_protein_and_fiber_bonuses() {
        let ledger = UsageLedger::new();
        let spec = MealSlotSpec::gd_default(MealSlot::Breakfast);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let options = GenerationOptions::new(date);

        let meets = breakfast("meets", 35.0); // protein 12 >= 10, fiber 4 >= 3
        let lacks = Recipe::new("lacks", "lacks", MealCategory::Breakfast)
            .with_nutrition(NutritionInfo::new(300.0, 35.0, 4.0, 10.0, 1.0))
            .with_total_time(20);

        let s_meets = score_recipe(
            &meets,
            &spec,
            &ledger,
            date,
            &Preferences::default(),
            &options,
            &ScoringWeights::default(),
        );
        let s_lacks = score_recipe(
            &lacks,
            &spec,
            &ledger,
            date,
            &Preferences::default(),
            &options,
            &ScoringWeights::default(),
        );
        assert!(s_meets.nutrition_fit > s_lacks.nutrition_fit);
    }

    #[test]
    fn test_hard_protein_floor_is_penalty_not_disqualification() {
        let ledger = UsageLedger::new();
        let spec = MealSlotSpec::gd_default(MealSlot::EveningSnack);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let options = GenerationOptions::new(date);

        let low_protein = Recipe::new("s1", "Apple Slices", MealCategory::Snack)
            .with_nutrition(NutritionInfo::new(90.0, 15.0, 0.5, 0.3, 3.0))
            .with_total_time(2);

        let breakdown = score_recipe(
            &low_protein,
            &spec,
            &ledger,
            date,
            &Preferences::default(),
            &options,
            &ScoringWeights::default(),
        );

        // Heavily penalized but still a finite, comparable score
        assert!(breakdown.nutrition_fit < 20.0);
        assert!(breakdown.total.is_finite());
    }

    #[test]
    fn test_favorite_bonus() {
        let ledger = UsageLedger::new();
        let spec = MealSlotSpec::gd_default(MealSlot::Breakfast);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let options = GenerationOptions::new(date);
        let recipe = breakfast("b1", 35.0);

        let plain = score_recipe(
            &recipe,
            &spec,
            &ledger,
            date,
            &Preferences::default(),
            &options,
            &ScoringWeights::default(),
        );
        let favored = score_recipe(
            &recipe,
            &spec,
            &ledger,
            date,
            &Preferences::new().with_favorite("b1"),
            &options,
            &ScoringWeights::default(),
        );
        assert!(favored.total > plain.total);
        assert_eq!(favored.preference, FAVORITE_BONUS);
    }

    #[test]
    fn test_recent_use_penalized() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let recipe = breakfast("b1", 35.0);

        let fresh_ledger = UsageLedger::new();
        let mut used_ledger = UsageLedger::new();
        used_ledger.record_use("b1", date.pred_opt().unwrap());

        let fresh = score_simple(&recipe, &fresh_ledger);
        let used = score_simple(&recipe, &used_ledger);
        assert!(fresh.variety > used.variety);
    }

    #[test]
    fn test_overall_use_penalty_outside_window() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        let recipe = breakfast("b1", 35.0);

        // Used long before the window, several times
        let mut stale_ledger = UsageLedger::new();
        for day in 1..=4 {
            stale_ledger.record_use("b1", NaiveDate::from_ymd_opt(2024, 6, day).unwrap());
        }

        let fresh = score_simple(&recipe, &UsageLedger::new());
        let stale = score_simple(&recipe, &stale_ledger);
        // Still gets the in-window bonus, but loses the overuse penalty
        assert!(stale.variety < fresh.variety);
        assert!(stale.variety > 0.0);
    }

    #[test]
    fn test_prep_time_headroom() {
        let ledger = UsageLedger::new();
        let spec = MealSlotSpec::gd_default(MealSlot::Breakfast);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let options = GenerationOptions::new(date);
        let prefs = Preferences::new().with_max_cook_time(60);

        let quick = breakfast("quick", 35.0); // 20 min
        let slow = Recipe::new("slow", "slow", MealCategory::Breakfast)
            .with_nutrition(NutritionInfo::new(300.0, 35.0, 12.0, 10.0, 4.0))
            .with_total_time(55);

        let s_quick = score_recipe(&quick, &spec, &ledger, date, &prefs, &options, &ScoringWeights::default());
        let s_slow = score_recipe(&slow, &spec, &ledger, date, &prefs, &options, &ScoringWeights::default());
        assert!(s_quick.prep_time > s_slow.prep_time);
    }

    #[test]
    fn test_prioritize_new_bonus() {
        let ledger = UsageLedger::new();
        let spec = MealSlotSpec::gd_default(MealSlot::Breakfast);
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let recipe = breakfast("b1", 35.0);

        let plain_opts = GenerationOptions::new(date);
        let new_opts = GenerationOptions::new(date).with_prioritize_new(true);

        let plain = score_recipe(&recipe, &spec, &ledger, date, &Preferences::default(), &plain_opts, &ScoringWeights::default());
        let boosted = score_recipe(&recipe, &spec, &ledger, date, &Preferences::default(), &new_opts, &ScoringWeights::default());
        assert!(boosted.variety > plain.variety);
    }
}
