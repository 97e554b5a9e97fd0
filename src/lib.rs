//! # GD Meal Planner
//!
//! Meal-plan generation and shopping-list aggregation engine for
//! gestational-diabetes meal planning. Given a read-only recipe catalog
//! and a user's nutritional and dietary constraints, the engine selects
//! and scores recipes per meal slot against per-meal carbohydrate,
//! protein and fiber targets, assembles multi-day plans with recipe-reuse
//! spacing, supports constrained meal substitution, and aggregates plan
//! ingredients into a deduplicated, unit-normalized, store-organized
//! shopping list.
//!
//! The engine is computation-only: no network or disk I/O, no global
//! state. Randomness (top-k candidate sampling) sits behind an injected
//! seeded RNG, so identical inputs reproduce identical plans.

pub mod nutrition;
pub mod recipe_model;
pub mod preferences;
pub mod plan_model;
pub mod plan_errors;
pub mod plan_config;
pub mod preference_filter;
pub mod usage_ledger;
pub mod slot_scorer;
pub mod slot_selector;
pub mod daily_assembler;
pub mod weekly_assembler;
pub mod rotation_spacer;
pub mod meal_swap;
pub mod ingredient_normalizer;
pub mod unit_conversion;
pub mod shopping_list;
