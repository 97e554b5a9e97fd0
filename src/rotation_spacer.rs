//! # Rotation Spacer
//!
//! Builds a long-running library of weekly plans ("rotation") per track —
//! standard, vegetarian, quick, family — while enforcing a minimum gap in
//! weeks before any recipe may repeat within a track.
//!
//! The spacing constraint is a soft SLA, not a hard invariant: when a
//! freshly generated week reuses a recipe too soon, the week is
//! regenerated with a different derived seed up to a bounded number of
//! retries, after which it is accepted and every remaining violation is
//! reported (and logged), never silently dropped. Tracks share nothing —
//! each owns its ledger — so a caller may build tracks concurrently;
//! weeks *within* a track are strictly sequential because each week's
//! spacing decision depends on all prior weeks.

use chrono::{Duration, NaiveDate};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::plan_config::{GenerationOptions, RotationConfig};
use crate::plan_errors::PlanError;
use crate::plan_model::RotationEntry;
use crate::preferences::{DietaryRestriction, Preferences};
use crate::recipe_model::RecipeCatalog;
use crate::usage_ledger::UsageLedger;
use crate::weekly_assembler::WeeklyPlanAssembler;

/// One rotation track: an identifier plus the preferences its plans are
/// generated under.
#[derive(Debug, Clone)]
pub struct TrackSpec {
    pub id: String,
    pub preferences: Preferences,
}

impl TrackSpec {
    pub fn new(id: &str, preferences: Preferences) -> Self {
        Self {
            id: id.to_string(),
            preferences,
        }
    }

    /// The four built-in tracks.
    pub fn presets() -> Vec<TrackSpec> {
        let quick = Preferences::new().with_max_cook_time(30);
        let mut family = Preferences::default();
        family.meal_prep_mode = true;
        vec![
            TrackSpec::new("standard", Preferences::default()),
            TrackSpec::new(
                "vegetarian",
                Preferences::new().with_restriction(DietaryRestriction::Vegetarian),
            ),
            TrackSpec::new("quick", quick),
            TrackSpec::new("family", family),
        ]
    }
}

/// A recipe reused closer than the configured spacing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpacingViolation {
    pub track: String,
    pub week_number: u32,
    pub recipe_id: String,
    /// Most recent earlier week that used the recipe
    pub previous_week: u32,
    /// `week_number - previous_week`
    pub gap: u32,
}

/// Result of building one or more tracks.
#[derive(Debug, Clone, Default)]
pub struct RotationLibrary {
    pub entries: Vec<RotationEntry>,
    /// Violations accepted after retries were exhausted
    pub violations: Vec<SpacingViolation>,
}

/// Rotation-library builder.
pub struct RotationSpacer<'a> {
    catalog: &'a dyn RecipeCatalog,
    config: RotationConfig,
}

impl<'a> RotationSpacer<'a> {
    pub fn new(catalog: &'a dyn RecipeCatalog, config: RotationConfig) -> Self {
        Self { catalog, config }
    }

    /// Build `weeks` weekly plans for every track, starting at
    /// `start_date`. `base_seed` makes the whole library reproducible.
    pub fn build_library(
        &self,
        tracks: &[TrackSpec],
        weeks: u32,
        start_date: NaiveDate,
        base_seed: u64,
    ) -> Result<RotationLibrary, PlanError> {
        let mut library = RotationLibrary::default();

        for (track_index, track) in tracks.iter().enumerate() {
            self.build_track(
                track,
                track_index as u64,
                weeks,
                start_date,
                base_seed,
                &mut library,
            )?;
        }

        info!(
            "Rotation library complete: {} entries, {} spacing violation(s)",
            library.entries.len(),
            library.violations.len()
        );
        Ok(library)
    }

    /// Build one track sequentially. Each week's acceptance depends on the
    /// ledger state left by all prior weeks, so there is no safe way to
    /// parallelize inside this loop.
    fn build_track(
        &self,
        track: &TrackSpec,
        track_index: u64,
        weeks: u32,
        start_date: NaiveDate,
        base_seed: u64,
        library: &mut RotationLibrary,
    ) -> Result<(), PlanError> {
        let assembler = WeeklyPlanAssembler::new(self.catalog, &track.preferences);
        let mut ledger = UsageLedger::new();

        for week_number in 1..=weeks {
            let week_start = start_date + Duration::days(i64::from(week_number - 1) * 7);

            let mut accepted = None;
            let mut last_violations = Vec::new();

            for attempt in 0..=self.config.max_retries {
                let seed = derive_seed(base_seed, track_index, week_number, attempt);
                // Library builds favor never-used recipes so the catalog
                // spreads across the rotation instead of thrashing retries
                let options = GenerationOptions::new(week_start)
                    .with_seed(seed)
                    .with_prioritize_new(true);

                // Each attempt scores against the track ledger but only the
                // accepted attempt is recorded into it
                let mut attempt_ledger = ledger.clone();
                let mut rng = StdRng::seed_from_u64(seed);
                let plan = assembler.generate_with(
                    &track.id,
                    &options,
                    &mut attempt_ledger,
                    &mut rng,
                )?;

                let violations = self.spacing_violations(&track.id, week_number, &ledger, &plan);
                if violations.is_empty() {
                    accepted = Some(plan);
                    last_violations.clear();
                    break;
                }

                warn!(
                    "Track '{}' week {}: {} spacing violation(s) on attempt {}",
                    track.id,
                    week_number,
                    violations.len(),
                    attempt + 1
                );
                accepted = Some(plan);
                last_violations = violations;
            }

            let plan = accepted.expect("retry loop always produces a plan");

            // Record the accepted week into the track ledger
            for id in plan.recipe_ids() {
                ledger.record_week(&id, week_number);
            }
            for day in &plan.days {
                for id in day.recipe_ids() {
                    ledger.record_use(id, day.date);
                }
            }

            library.violations.append(&mut last_violations);
            library.entries.push(RotationEntry {
                week_number,
                track: track.id.clone(),
                plan,
            });
        }
        Ok(())
    }

    /// Violations a candidate week would introduce against the ledger.
    fn spacing_violations(
        &self,
        track: &str,
        week_number: u32,
        ledger: &UsageLedger,
        plan: &crate::plan_model::WeeklyPlan,
    ) -> Vec<SpacingViolation> {
        let mut violations = Vec::new();
        for recipe_id in plan.recipe_ids() {
            if let Some(previous_week) = ledger.last_week_used(&recipe_id) {
                let gap = week_number.saturating_sub(previous_week);
                if gap < self.config.min_spacing_weeks {
                    violations.push(SpacingViolation {
                        track: track.to_string(),
                        week_number,
                        recipe_id,
                        previous_week,
                        gap,
                    });
                }
            }
        }
        violations.sort_by(|a, b| a.recipe_id.cmp(&b.recipe_id));
        violations
    }
}

/// Deterministic per-attempt seed so the whole library reproduces from one
/// base seed.
fn derive_seed(base_seed: u64, track_index: u64, week_number: u32, attempt: u32) -> u64 {
    base_seed
        .wrapping_add(track_index.wrapping_mul(1_000_000))
        .wrapping_add(u64::from(week_number).wrapping_mul(1_000))
        .wrapping_add(u64::from(attempt))
}
