//! # Meal Slot Selector
//!
//! Picks one recipe for one meal slot. The selection pipeline is
//! filtering → scoring → top-k sampling → selected, with a single bounded
//! relaxation branch on infeasibility:
//!
//! - **Filtering**: candidates must sit inside the slot's carb window and
//!   under the run's repeat cap (the dietary preference filter has already
//!   run upstream).
//! - **Relaxed**: if no candidate survives, the carb window widens by a
//!   fixed step and the repeat cap is raised, then filtering runs once
//!   more. The relaxation is recorded on the result, never silent.
//! - **Failure**: if the relaxed pass is still empty the slot is
//!   infeasible and the error names the slot and the constraints attempted.
//!   An empty slot must propagate; swallowing it would corrupt downstream
//!   nutrition aggregation.
//!
//! Selection samples uniformly from the top-k scored candidates instead of
//! always taking the best, so repeated generations differ. The RNG is
//! injected by the caller; a fixed seed reproduces the plan exactly.

use chrono::NaiveDate;
use log::{debug, warn};
use rand::Rng;

use crate::plan_config::{GenerationOptions, RelaxationConfig, ScoringWeights};
use crate::plan_errors::PlanError;
use crate::plan_model::{MealAssignment, MealSlotSpec, RelaxationEvent};
use crate::preferences::Preferences;
use crate::recipe_model::Recipe;
use crate::slot_scorer::{score_recipe, ScoreBreakdown};
use crate::usage_ledger::UsageLedger;

/// Outcome of filling one slot.
#[derive(Debug, Clone)]
pub struct SlotSelection {
    pub assignment: MealAssignment,
    pub score: ScoreBreakdown,
    /// Present when the slot could only be filled after relaxation
    pub relaxation: Option<RelaxationEvent>,
}

/// Slot selection engine bound to one generation run's configuration.
pub struct SlotSelector<'a> {
    pub prefs: &'a Preferences,
    pub options: &'a GenerationOptions,
    pub weights: &'a ScoringWeights,
    pub relaxation: &'a RelaxationConfig,
}

impl<'a> SlotSelector<'a> {
    pub fn new(
        prefs: &'a Preferences,
        options: &'a GenerationOptions,
        weights: &'a ScoringWeights,
        relaxation: &'a RelaxationConfig,
    ) -> Self {
        Self {
            prefs,
            options,
            weights,
            relaxation,
        }
    }

    /// Select a recipe for `spec` from `candidates` (already
    /// preference-filtered and category-appropriate).
    pub fn select<R: Rng>(
        &self,
        candidates: &[Recipe],
        spec: &MealSlotSpec,
        ledger: &UsageLedger,
        date: NaiveDate,
        rng: &mut R,
    ) -> Result<SlotSelection, PlanError> {
        let repeat_cap = self.options.max_recipe_repeats;

        // First pass with the configured constraints
        let eligible = self.screen(candidates, spec, ledger, repeat_cap);
        if !eligible.is_empty() {
            let (recipe, score) = self.sample_top_k(&eligible, spec, ledger, date, rng);
            return Ok(SlotSelection {
                assignment: assignment_for(spec, recipe),
                score,
                relaxation: None,
            });
        }

        // Relaxed pass: widen the carb window, raise the repeat cap
        let relaxed_spec = spec.widened(self.relaxation.carb_widen_step);
        let relaxed_cap = repeat_cap + self.relaxation.repeat_cap_raise;
        warn!(
            "No candidates for {} in carb range {:.0}-{:.0}g; relaxing to {:.0}-{:.0}g, repeat cap {}",
            spec.slot, spec.min_carbs, spec.max_carbs,
            relaxed_spec.min_carbs, relaxed_spec.max_carbs, relaxed_cap
        );

        let eligible = self.screen(candidates, &relaxed_spec, ledger, relaxed_cap);
        if !eligible.is_empty() {
            let (recipe, score) = self.sample_top_k(&eligible, &relaxed_spec, ledger, date, rng);
            return Ok(SlotSelection {
                assignment: assignment_for(spec, recipe),
                score,
                relaxation: Some(RelaxationEvent {
                    slot: spec.slot,
                    widened_carb_range: Some((relaxed_spec.min_carbs, relaxed_spec.max_carbs)),
                    raised_repeat_cap: Some(relaxed_cap),
                }),
            });
        }

        Err(PlanError::NoSuitableRecipe {
            slot: spec.slot,
            constraints: format!(
                "carbs {:.0}-{:.0}g (relaxed to {:.0}-{:.0}g), repeat cap {} (raised to {}), {} candidates after preference filter",
                spec.min_carbs,
                spec.max_carbs,
                relaxed_spec.min_carbs,
                relaxed_spec.max_carbs,
                repeat_cap,
                relaxed_cap,
                candidates.len()
            ),
        })
    }

    /// Hard feasibility screen: carb window and repeat cap. The cap
    /// counts uses since the generation window started, so a rotation
    /// ledger's older history never starves a fresh week.
    fn screen<'r>(
        &self,
        candidates: &'r [Recipe],
        spec: &MealSlotSpec,
        ledger: &UsageLedger,
        repeat_cap: u32,
    ) -> Vec<&'r Recipe> {
        candidates
            .iter()
            .filter(|r| spec.carbs_in_range(r.nutrition.carbohydrates))
            .filter(|r| ledger.uses_since(&r.id, self.options.start_date) < repeat_cap)
            .collect()
    }

    /// Score all eligible candidates, order them deterministically, and
    /// sample uniformly from the top k.
    fn sample_top_k<'r, R: Rng>(
        &self,
        eligible: &[&'r Recipe],
        spec: &MealSlotSpec,
        ledger: &UsageLedger,
        date: NaiveDate,
        rng: &mut R,
    ) -> (&'r Recipe, ScoreBreakdown) {
        let mut scored: Vec<(&Recipe, ScoreBreakdown)> = eligible
            .iter()
            .map(|r| {
                let breakdown = score_recipe(
                    r,
                    spec,
                    ledger,
                    date,
                    self.prefs,
                    self.options,
                    self.weights,
                );
                (*r, breakdown)
            })
            .collect();

        // Descending by score; ties broken by id so ordering is
        // reproducible across runs with the same seed
        scored.sort_by(|a, b| {
            b.1.total
                .partial_cmp(&a.1.total)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });

        let k = self.options.top_k.min(scored.len()).max(1);
        let pick = rng.gen_range(0..k);
        let (recipe, breakdown) = scored[pick];
        debug!(
            "Selected '{}' for {} (rank {}/{} in top-{}, score {:.2})",
            recipe.title,
            spec.slot,
            pick + 1,
            scored.len(),
            k,
            breakdown.total
        );
        (recipe, breakdown)
    }
}

fn assignment_for(spec: &MealSlotSpec, recipe: &Recipe) -> MealAssignment {
    MealAssignment::new(
        spec.slot,
        &recipe.id,
        &recipe.title,
        1.0,
        recipe.nutrition,
    )
}
