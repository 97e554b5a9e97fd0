//! # Daily Plan Assembler
//!
//! Fills all six slots for one date. Anchor meals (breakfast, lunch,
//! dinner) are selected first against their configured targets; the three
//! balance snacks are then selected against an *adjusted* carb target —
//! the remaining daily carb budget divided by the remaining unfilled
//! slots, clamped to the slot's window. Greedy snack selection can
//! therefore never starve an anchor meal of carb budget.
//!
//! Skipped slots (e.g. the skip-morning-snack preference) are kept in the
//! day as zero-nutrition placeholders so the day total stays a plain sum.

use chrono::NaiveDate;
use log::{debug, info};
use rand::Rng;

use crate::plan_errors::PlanError;
use crate::plan_model::{DailyPlan, MealAssignment, MealSlot, MealSlotSpec};
use crate::recipe_model::{MealCategory, Recipe};
use crate::slot_selector::SlotSelector;
use crate::usage_ledger::UsageLedger;

/// Preference-filtered candidates partitioned by catalog category.
/// Built once per generation run and shared across days.
#[derive(Debug, Clone, Default)]
pub struct CategoryCandidates {
    breakfast: Vec<Recipe>,
    lunch: Vec<Recipe>,
    dinner: Vec<Recipe>,
    snack: Vec<Recipe>,
}

impl CategoryCandidates {
    /// Partition a suitable-recipe list by category.
    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let mut candidates = Self::default();
        for recipe in recipes {
            match recipe.category {
                MealCategory::Breakfast => candidates.breakfast.push(recipe),
                MealCategory::Lunch => candidates.lunch.push(recipe),
                MealCategory::Dinner => candidates.dinner.push(recipe),
                MealCategory::Snack => candidates.snack.push(recipe),
            }
        }
        candidates
    }

    pub fn for_category(&self, category: MealCategory) -> &[Recipe] {
        match category {
            MealCategory::Breakfast => &self.breakfast,
            MealCategory::Lunch => &self.lunch,
            MealCategory::Dinner => &self.dinner,
            MealCategory::Snack => &self.snack,
        }
    }

    pub fn is_category_empty(&self, category: MealCategory) -> bool {
        self.for_category(category).is_empty()
    }
}

/// Assembles one day at a time from a fixed candidate pool.
pub struct DailyPlanAssembler<'a> {
    candidates: &'a CategoryCandidates,
    specs: &'a [MealSlotSpec],
    selector: &'a SlotSelector<'a>,
}

impl<'a> DailyPlanAssembler<'a> {
    pub fn new(
        candidates: &'a CategoryCandidates,
        specs: &'a [MealSlotSpec],
        selector: &'a SlotSelector<'a>,
    ) -> Self {
        Self {
            candidates,
            specs,
            selector,
        }
    }

    /// Fill all six slots for `date`, recording every selection in the
    /// ledger so later days see this day's usage.
    pub fn assemble<R: Rng>(
        &self,
        date: NaiveDate,
        ledger: &mut UsageLedger,
        rng: &mut R,
    ) -> Result<DailyPlan, PlanError> {
        debug!("Assembling daily plan for {date}");

        let mut filled: Vec<MealAssignment> = Vec::with_capacity(6);
        let mut relaxations = Vec::new();

        // Total carb budget across the slots this day will actually fill
        let mut remaining_budget: f64 = self
            .specs
            .iter()
            .filter(|s| !self.slot_skipped(s.slot))
            .map(|s| s.target_carbs)
            .sum();
        let mut remaining_slots = self
            .specs
            .iter()
            .filter(|s| !self.slot_skipped(s.slot))
            .count();

        for slot in MealSlot::fill_order() {
            if self.slot_skipped(slot) {
                filled.push(MealAssignment::skipped(slot));
                continue;
            }

            let spec = self.spec_for(slot)?;
            let effective_spec = if slot.is_anchor() {
                spec.clone()
            } else {
                adjusted_snack_spec(spec, remaining_budget, remaining_slots)
            };

            let candidates = self.candidates.for_category(slot.category());
            if candidates.is_empty() {
                return Err(PlanError::EmptyCategory(slot.category().to_string()));
            }

            let selection = self
                .selector
                .select(candidates, &effective_spec, ledger, date, rng)?;

            if let Some(event) = selection.relaxation {
                relaxations.push(event);
            }

            if let Some(id) = selection.assignment.recipe_id.as_deref() {
                ledger.record_use(id, date);
            }
            remaining_budget -= selection.assignment.nutrition.carbohydrates;
            remaining_slots = remaining_slots.saturating_sub(1);
            filled.push(selection.assignment);
        }

        // Reorder from fill order into display order
        filled.sort_by_key(|a| {
            MealSlot::display_order()
                .iter()
                .position(|s| *s == a.slot)
                .unwrap_or(usize::MAX)
        });

        let mut day = DailyPlan::new(date, filled);
        day.relaxations = relaxations;
        info!(
            "Assembled {date}: {:.0}g carbs, {} relaxation(s)",
            day.total_nutrition.carbohydrates,
            day.relaxations.len()
        );
        Ok(day)
    }

    fn slot_skipped(&self, slot: MealSlot) -> bool {
        slot == MealSlot::MorningSnack && self.selector.prefs.skip_morning_snack
    }

    fn spec_for(&self, slot: MealSlot) -> Result<&MealSlotSpec, PlanError> {
        self.specs
            .iter()
            .find(|s| s.slot == slot)
            .ok_or(PlanError::NoSuitableRecipe {
                slot,
                constraints: "no slot spec configured".to_string(),
            })
    }
}

/// Balance-slot target: remaining budget split across remaining slots,
/// clamped into the slot's own window.
fn adjusted_snack_spec(
    spec: &MealSlotSpec,
    remaining_budget: f64,
    remaining_slots: usize,
) -> MealSlotSpec {
    if remaining_slots == 0 {
        return spec.clone();
    }
    let share = (remaining_budget / remaining_slots as f64).max(0.0);
    let mut adjusted = spec.clone();
    adjusted.target_carbs = share.clamp(spec.min_carbs, spec.max_carbs);
    adjusted
}
