//! # Weekly Plan Assembler
//!
//! Runs the daily assembler once per date in the requested range,
//! threading one shared usage ledger across days so the variety score sees
//! cross-day repetition, not just within-day. Computes the week-level
//! summary and snapshots the preferences the plan was generated under.
//!
//! Generation is idempotent given the same catalog snapshot, preferences,
//! start date and random seed. It is NOT idempotent across catalog
//! changes: newly imported recipes can (and should) change outcomes, which
//! is what lets users refresh a stale plan against a grown catalog.

use chrono::Duration;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::daily_assembler::{CategoryCandidates, DailyPlanAssembler};
use crate::nutrition::NutritionInfo;
use crate::plan_config::{GenerationOptions, RelaxationConfig, ScoringWeights};
use crate::plan_errors::PlanError;
use crate::plan_model::{DailyPlan, MealSlotSpec, WeeklyPlan, WeeklySummary};
use crate::preference_filter::{filter_recipes, FilterKeywords};
use crate::preferences::Preferences;
use crate::recipe_model::RecipeCatalog;
use crate::slot_selector::SlotSelector;
use crate::usage_ledger::UsageLedger;

/// Weekly (or N-day) plan generator.
pub struct WeeklyPlanAssembler<'a> {
    catalog: &'a dyn RecipeCatalog,
    prefs: &'a Preferences,
    specs: Vec<MealSlotSpec>,
    weights: ScoringWeights,
    relaxation: RelaxationConfig,
    keywords: FilterKeywords,
}

impl<'a> WeeklyPlanAssembler<'a> {
    /// Assembler with GD default slot specs and default tunables.
    pub fn new(catalog: &'a dyn RecipeCatalog, prefs: &'a Preferences) -> Self {
        Self {
            catalog,
            prefs,
            specs: MealSlotSpec::gd_defaults(),
            weights: ScoringWeights::default(),
            relaxation: RelaxationConfig::default(),
            keywords: FilterKeywords::default(),
        }
    }

    /// Override the slot spec table.
    pub fn with_specs(mut self, specs: Vec<MealSlotSpec>) -> Self {
        self.specs = specs;
        self
    }

    /// Override the scoring weights.
    pub fn with_weights(mut self, weights: ScoringWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Generate a plan with a fresh ledger and a seed-derived RNG.
    pub fn generate(
        &self,
        user_id: &str,
        options: &GenerationOptions,
    ) -> Result<WeeklyPlan, PlanError> {
        let mut ledger = UsageLedger::new();
        let mut rng = StdRng::seed_from_u64(options.random_seed);
        self.generate_with(user_id, options, &mut ledger, &mut rng)
    }

    /// Generate a plan against an existing ledger and RNG. Used by the
    /// rotation builder so week N+1 sees weeks 1..N's usage.
    pub fn generate_with<R: Rng>(
        &self,
        user_id: &str,
        options: &GenerationOptions,
        ledger: &mut UsageLedger,
        rng: &mut R,
    ) -> Result<WeeklyPlan, PlanError> {
        let outcome = filter_recipes(&self.catalog.get_all(), self.prefs, &self.keywords);
        let candidates = CategoryCandidates::from_recipes(outcome.suitable);

        let selector = SlotSelector::new(self.prefs, options, &self.weights, &self.relaxation);
        let assembler = DailyPlanAssembler::new(&candidates, &self.specs, &selector);

        let mut days = Vec::with_capacity(options.days_to_generate as usize);
        for offset in 0..options.days_to_generate {
            let date = options.start_date + Duration::days(i64::from(offset));
            let day = assembler.assemble(date, ledger, rng)?;
            days.push(day);
        }

        let summary = self.summarize(&days)?;
        info!(
            "Generated {}-day plan for {user_id}: {} unique recipes, avg {:.0}g carbs/day",
            days.len(),
            summary.unique_recipe_count,
            summary.avg_daily_nutrition.carbohydrates
        );

        Ok(WeeklyPlan {
            user_id: user_id.to_string(),
            start_date: options.start_date,
            days,
            preferences: self.prefs.clone(),
            summary,
            version: 1,
        })
    }

    /// Regenerate a single day of an existing plan in place.
    ///
    /// The ledger for the regeneration is rebuilt from the plan's *other*
    /// days, so the new day avoids recipes the rest of the week already
    /// uses. Bumps the plan version.
    pub fn regenerate_day(
        &self,
        plan: &mut WeeklyPlan,
        day_index: usize,
        seed: u64,
    ) -> Result<(), PlanError> {
        let date = plan.days[day_index].date;

        let mut ledger = UsageLedger::new();
        for (i, day) in plan.days.iter().enumerate() {
            if i == day_index {
                continue;
            }
            for id in day.recipe_ids() {
                ledger.record_use(id, day.date);
            }
        }

        let outcome = filter_recipes(&self.catalog.get_all(), self.prefs, &self.keywords);
        let candidates = CategoryCandidates::from_recipes(outcome.suitable);

        let options = GenerationOptions::new(date).with_seed(seed);
        let selector = SlotSelector::new(self.prefs, &options, &self.weights, &self.relaxation);
        let assembler = DailyPlanAssembler::new(&candidates, &self.specs, &selector);

        let mut rng = StdRng::seed_from_u64(seed);
        let new_day = assembler.assemble(date, &mut ledger, &mut rng)?;

        plan.days[day_index] = new_day;
        plan.summary = self.summarize(&plan.days)?;
        plan.bump_version();
        Ok(())
    }

    /// Week-level summary: daily averages, unique recipe count, total
    /// estimated prep time across all non-empty assignments.
    fn summarize(&self, days: &[DailyPlan]) -> Result<WeeklySummary, PlanError> {
        let day_count = days.len().max(1) as f64;
        let total = NutritionInfo::sum(days.iter().map(|d| &d.total_nutrition));
        let avg_daily_nutrition = total.scale(1.0 / day_count);

        let mut unique = std::collections::HashSet::new();
        let mut total_prep_time_minutes = 0u32;
        for day in days {
            for assignment in &day.assignments {
                if let Some(id) = assignment.recipe_id.as_deref() {
                    unique.insert(id.to_string());
                    let recipe = self
                        .catalog
                        .get_by_id(id)
                        .ok_or_else(|| PlanError::UnresolvedRecipeReference(id.to_string()))?;
                    total_prep_time_minutes += recipe.total_time;
                }
            }
        }

        Ok(WeeklySummary {
            avg_daily_nutrition,
            unique_recipe_count: unique.len(),
            total_prep_time_minutes,
        })
    }
}
