//! # Recipe Data Model
//!
//! Catalog-side entities: recipes, their ingredient lines, and the
//! read-only catalog the planner consumes. The planner never mutates a
//! recipe; a catalog is treated as an immutable snapshot for the duration
//! of one generation call.
//!
//! ## Usage
//!
//! ```rust
//! use mealplanner::recipe_model::{InMemoryCatalog, MealCategory, Recipe, RecipeCatalog};
//! use mealplanner::nutrition::NutritionInfo;
//!
//! let recipe = Recipe::new("oat-001", "Overnight Oats", MealCategory::Breakfast)
//!     .with_nutrition(NutritionInfo::new(310.0, 38.0, 12.0, 9.0, 6.0))
//!     .with_total_time(10)
//!     .with_ingredient("rolled oats", 0.5, "cup")
//!     .with_tag("vegetarian");
//!
//! let catalog = InMemoryCatalog::new(vec![recipe]);
//! assert_eq!(catalog.get_by_category(MealCategory::Breakfast).len(), 1);
//! ```

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::nutrition::NutritionInfo;

/// Meal category a recipe was authored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MealCategory {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealCategory {
    /// Stable lowercase name, matching the catalog's serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            MealCategory::Breakfast => "breakfast",
            MealCategory::Lunch => "lunch",
            MealCategory::Dinner => "dinner",
            MealCategory::Snack => "snack",
        }
    }
}

impl fmt::Display for MealCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One ingredient line as authored in the catalog: amount, unit, name.
///
/// Units are free text at this layer ("cup", "tbsp", "large"); the
/// shopping-list aggregator owns normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// Ingredient name as authored (e.g. "fresh spinach, chopped")
    pub name: String,
    /// Amount in the authored unit
    pub amount: f64,
    /// Authored unit, free text
    pub unit: String,
}

/// Immutable catalog recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Catalog-unique identifier
    pub id: String,
    /// Display title
    pub title: String,
    /// Category the recipe was authored for
    pub category: MealCategory,
    /// Ordered ingredient lines
    pub ingredients: Vec<RecipeIngredient>,
    /// Per-serving nutrition facts
    pub nutrition: NutritionInfo,
    /// Prep plus cook time in minutes
    pub total_time: u32,
    /// Free-form tags ("vegetarian", "gluten-free", "quick", ...)
    pub tags: HashSet<String>,
}

impl Recipe {
    /// Create a recipe with empty ingredients, zero nutrition and no tags.
    pub fn new(id: &str, title: &str, category: MealCategory) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            category,
            ingredients: Vec::new(),
            nutrition: NutritionInfo::zero(),
            total_time: 0,
            tags: HashSet::new(),
        }
    }

    /// Set the per-serving nutrition facts
    pub fn with_nutrition(mut self, nutrition: NutritionInfo) -> Self {
        self.nutrition = nutrition;
        self
    }

    /// Set prep + cook time in minutes
    pub fn with_total_time(mut self, minutes: u32) -> Self {
        self.total_time = minutes;
        self
    }

    /// Append an ingredient line
    pub fn with_ingredient(mut self, name: &str, amount: f64, unit: &str) -> Self {
        self.ingredients.push(RecipeIngredient {
            name: name.to_string(),
            amount,
            unit: unit.to_string(),
        });
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tags.insert(tag.to_string());
        self
    }

    /// Case-insensitive tag check
    pub fn has_tag(&self, tag: &str) -> bool {
        let tag = tag.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == tag)
    }
}

/// Read-only recipe provider the planner generates against.
///
/// Implementations must return stable results for the duration of one
/// generation call; the engine treats them as a snapshot.
pub trait RecipeCatalog {
    /// All recipes in the snapshot
    fn get_all(&self) -> Vec<Recipe>;

    /// Recipes authored for the given category
    fn get_by_category(&self, category: MealCategory) -> Vec<Recipe>;

    /// Resolve a single recipe by id
    fn get_by_id(&self, id: &str) -> Option<Recipe>;
}

/// Catalog backed by an in-memory vector. Used by tests and demos; the
/// production catalog lives behind the same trait in the persistence layer.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    recipes: Vec<Recipe>,
}

impl InMemoryCatalog {
    pub fn new(recipes: Vec<Recipe>) -> Self {
        Self { recipes }
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }
}

impl RecipeCatalog for InMemoryCatalog {
    fn get_all(&self) -> Vec<Recipe> {
        self.recipes.clone()
    }

    fn get_by_category(&self, category: MealCategory) -> Vec<Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.category == category)
            .cloned()
            .collect()
    }

    fn get_by_id(&self, id: &str) -> Option<Recipe> {
        self.recipes.iter().find(|r| r.id == id).cloned()
    }
}

/// Category-level nutrition windows used to sanity-check catalog recipes.
///
/// These mirror the GD compliance thresholds the catalog importer applies;
/// the planner only reports violations, it never rejects a recipe here.
#[derive(Debug, Clone)]
pub struct CategoryRequirements {
    pub min_carbs: f64,
    pub max_carbs: f64,
    pub min_fiber: f64,
    pub min_protein: f64,
}

impl CategoryRequirements {
    /// Importer thresholds per category.
    pub fn for_category(category: MealCategory) -> Self {
        match category {
            MealCategory::Breakfast => Self {
                min_carbs: 25.0,
                max_carbs: 45.0,
                min_fiber: 3.0,
                min_protein: 10.0,
            },
            MealCategory::Lunch => Self {
                min_carbs: 30.0,
                max_carbs: 50.0,
                min_fiber: 4.0,
                min_protein: 15.0,
            },
            MealCategory::Dinner => Self {
                min_carbs: 30.0,
                max_carbs: 50.0,
                min_fiber: 4.0,
                min_protein: 20.0,
            },
            MealCategory::Snack => Self {
                min_carbs: 10.0,
                max_carbs: 25.0,
                min_fiber: 2.0,
                min_protein: 5.0,
            },
        }
    }
}

/// Report quality issues for a single catalog recipe.
///
/// Returns an empty vector for a compliant recipe. Missing ingredients,
/// zero timing and out-of-window nutrition are reported as human-readable
/// strings so catalog owners can triage imports.
pub fn validate_recipe(recipe: &Recipe) -> Vec<String> {
    let mut issues = Vec::new();
    let req = CategoryRequirements::for_category(recipe.category);

    if recipe.title.trim().is_empty() {
        issues.push("Missing title".to_string());
    }
    if recipe.ingredients.is_empty() {
        issues.push("No ingredients listed".to_string());
    }
    if recipe.total_time == 0 {
        issues.push("Missing total time".to_string());
    }

    let carbs = recipe.nutrition.carbohydrates;
    if carbs < req.min_carbs {
        issues.push(format!(
            "Carbs too low: {carbs}g (min: {}g)",
            req.min_carbs
        ));
    } else if carbs > req.max_carbs {
        issues.push(format!(
            "Carbs too high: {carbs}g (max: {}g)",
            req.max_carbs
        ));
    }
    if recipe.nutrition.fiber < req.min_fiber {
        issues.push(format!(
            "Fiber too low: {}g (min: {}g)",
            recipe.nutrition.fiber, req.min_fiber
        ));
    }
    if recipe.nutrition.protein < req.min_protein {
        issues.push(format!(
            "Protein too low: {}g (min: {}g)",
            recipe.nutrition.protein, req.min_protein
        ));
    }

    if !issues.is_empty() {
        warn!(
            "Recipe '{}' ({}) failed validation: {}",
            recipe.title,
            recipe.id,
            issues.join("; ")
        );
    }
    issues
}
