//! # Usage Ledger
//!
//! Explicit, run-scoped record of which recipes a generation pass has
//! already used. The ledger is created by the caller (or the weekly
//! assembler), threaded by mutable reference through one generation run,
//! and discarded afterwards; it is never process-global state.
//!
//! Two timescales are tracked: dated uses (driving the variety score and
//! the per-generation repeat cap) and rotation week numbers (driving
//! spacing checks across a library build).

use chrono::NaiveDate;
use std::collections::HashMap;

/// Usage history for recipes within one generation run.
#[derive(Debug, Clone, Default)]
pub struct UsageLedger {
    use_dates: HashMap<String, Vec<NaiveDate>>,
    weeks_used: HashMap<String, Vec<u32>>,
}

impl UsageLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one use of a recipe on a date.
    pub fn record_use(&mut self, recipe_id: &str, date: NaiveDate) {
        self.use_dates
            .entry(recipe_id.to_string())
            .or_default()
            .push(date);
    }

    /// Record a recipe appearing in a rotation week.
    pub fn record_week(&mut self, recipe_id: &str, week_number: u32) {
        self.weeks_used
            .entry(recipe_id.to_string())
            .or_default()
            .push(week_number);
    }

    /// Total recorded uses of a recipe.
    pub fn use_count(&self, recipe_id: &str) -> u32 {
        self.use_dates
            .get(recipe_id)
            .map(|d| d.len() as u32)
            .unwrap_or(0)
    }

    /// Uses recorded on or after `since`. This is what the repeat cap
    /// screens against: a rotation ledger carries months of history, but
    /// the cap only concerns the generation window currently being filled.
    pub fn uses_since(&self, recipe_id: &str, since: NaiveDate) -> u32 {
        self.use_dates
            .get(recipe_id)
            .map(|dates| dates.iter().filter(|d| **d >= since).count() as u32)
            .unwrap_or(0)
    }

    /// Most recent recorded use date.
    pub fn last_used(&self, recipe_id: &str) -> Option<NaiveDate> {
        self.use_dates
            .get(recipe_id)
            .and_then(|dates| dates.iter().max())
            .copied()
    }

    /// Days since the recipe was last used, relative to `today`.
    /// `None` if the recipe has never been used.
    pub fn days_since_use(&self, recipe_id: &str, today: NaiveDate) -> Option<i64> {
        self.last_used(recipe_id).map(|d| (today - d).num_days())
    }

    /// Uses recorded within the trailing `window_days` ending at `today`.
    pub fn used_within(&self, recipe_id: &str, today: NaiveDate, window_days: u32) -> bool {
        match self.days_since_use(recipe_id, today) {
            Some(days) => days >= 0 && days < i64::from(window_days),
            None => false,
        }
    }

    /// Week numbers the recipe appeared in, ascending insertion order.
    pub fn weeks_for(&self, recipe_id: &str) -> &[u32] {
        self.weeks_used
            .get(recipe_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Most recent week the recipe appeared in, if any.
    pub fn last_week_used(&self, recipe_id: &str) -> Option<u32> {
        self.weeks_for(recipe_id).iter().max().copied()
    }

    /// Number of distinct recipes the ledger has seen.
    pub fn tracked_recipes(&self) -> usize {
        self.use_dates.len().max(self.weeks_used.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    #[test]
    fn test_counts_accumulate() {
        let mut ledger = UsageLedger::new();
        ledger.record_use("r1", d(1));
        ledger.record_use("r1", d(3));
        ledger.record_use("r2", d(2));

        assert_eq!(ledger.use_count("r1"), 2);
        assert_eq!(ledger.use_count("r2"), 1);
        assert_eq!(ledger.use_count("r3"), 0);
    }

    #[test]
    fn test_uses_since_only_counts_window() {
        let mut ledger = UsageLedger::new();
        ledger.record_use("r1", d(1));
        ledger.record_use("r1", d(5));
        ledger.record_use("r1", d(9));

        assert_eq!(ledger.uses_since("r1", d(5)), 2);
        assert_eq!(ledger.uses_since("r1", d(10)), 0);
        assert_eq!(ledger.uses_since("r1", d(1)), 3);
        assert_eq!(ledger.uses_since("ghost", d(1)), 0);
    }

    #[test]
    fn test_last_used_is_latest_date() {
        let mut ledger = UsageLedger::new();
        ledger.record_use("r1", d(5));
        ledger.record_use("r1", d(2)); // out of order

        assert_eq!(ledger.last_used("r1"), Some(d(5)));
        assert_eq!(ledger.days_since_use("r1", d(8)), Some(3));
    }

    #[test]
    fn test_used_within_window() {
        let mut ledger = UsageLedger::new();
        ledger.record_use("r1", d(1));

        assert!(ledger.used_within("r1", d(3), 3)); // 2 days ago, window 3
        assert!(!ledger.used_within("r1", d(5), 3)); // 4 days ago
        assert!(!ledger.used_within("unknown", d(5), 3));
    }

    #[test]
    fn test_week_tracking() {
        let mut ledger = UsageLedger::new();
        ledger.record_week("r1", 3);
        ledger.record_week("r1", 11);

        assert_eq!(ledger.weeks_for("r1"), &[3, 11]);
        assert_eq!(ledger.last_week_used("r1"), Some(11));
        assert_eq!(ledger.last_week_used("r2"), None);
    }
}
