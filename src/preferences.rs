//! # User Preferences
//!
//! Per-user dietary preferences consumed by the filter and scorer. This is
//! a plain value object; a snapshot of it is stored on every generated plan
//! so regeneration can reproduce the constraints that were in force.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Enumerated dietary restrictions with curated keyword support in the
/// preference filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    GlutenFree,
    DairyFree,
    NutFree,
    Pescatarian,
    LowSodium,
}

impl DietaryRestriction {
    /// Tag a recipe may carry to declare itself compliant, bypassing
    /// keyword screening for this restriction.
    pub fn compliance_tag(&self) -> &'static str {
        match self {
            DietaryRestriction::Vegetarian => "vegetarian",
            DietaryRestriction::Vegan => "vegan",
            DietaryRestriction::GlutenFree => "gluten-free",
            DietaryRestriction::DairyFree => "dairy-free",
            DietaryRestriction::NutFree => "nut-free",
            DietaryRestriction::Pescatarian => "pescatarian",
            DietaryRestriction::LowSodium => "low-sodium",
        }
    }
}

/// How aggressively the variety score penalizes repetition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarietyLevel {
    Low,
    Medium,
    High,
}

impl VarietyLevel {
    /// Multiplier applied to the variety term of the score.
    pub fn weight_factor(&self) -> f64 {
        match self {
            VarietyLevel::Low => 0.5,
            VarietyLevel::Medium => 1.0,
            VarietyLevel::High => 1.8,
        }
    }
}

/// Cook-time ceiling in minutes; `None` means any duration is fine.
pub type CookTimeCeiling = Option<u32>;

/// Per-user planning preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preferences {
    /// Active dietary restrictions
    pub restrictions: HashSet<DietaryRestriction>,
    /// Allergen names matched against ingredient text ("peanut", "shellfish")
    pub allergens: HashSet<String>,
    /// Disliked-ingredient substrings, matched case-insensitively
    pub disliked_ingredients: HashSet<String>,
    /// Recipe ids the user marked as favorites
    pub favorite_recipes: HashSet<String>,
    /// Cuisine/style tags the user prefers ("mediterranean", "quick", ...)
    pub preferred_tags: HashSet<String>,
    /// Maximum acceptable total (prep + cook) time, minutes
    pub max_cook_time: CookTimeCeiling,
    /// Variety aggressiveness
    pub variety: VarietyLevel,
    /// Meal-prep mode: bias toward batch-friendly recipes
    pub meal_prep_mode: bool,
    /// Skip the morning snack slot entirely
    pub skip_morning_snack: bool,
    /// Days before a recipe may repeat without a variety penalty
    pub avoid_repeat_days: u32,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            restrictions: HashSet::new(),
            allergens: HashSet::new(),
            disliked_ingredients: HashSet::new(),
            favorite_recipes: HashSet::new(),
            preferred_tags: HashSet::new(),
            max_cook_time: None,
            variety: VarietyLevel::Medium,
            meal_prep_mode: false,
            skip_morning_snack: false,
            avoid_repeat_days: 3,
        }
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a dietary restriction
    pub fn with_restriction(mut self, restriction: DietaryRestriction) -> Self {
        self.restrictions.insert(restriction);
        self
    }

    /// Add an allergen keyword
    pub fn with_allergen(mut self, allergen: &str) -> Self {
        self.allergens.insert(allergen.to_lowercase());
        self
    }

    /// Add a disliked-ingredient substring
    pub fn with_dislike(mut self, ingredient: &str) -> Self {
        self.disliked_ingredients.insert(ingredient.to_lowercase());
        self
    }

    /// Mark a recipe id as a favorite
    pub fn with_favorite(mut self, recipe_id: &str) -> Self {
        self.favorite_recipes.insert(recipe_id.to_string());
        self
    }

    /// Add a preferred cuisine/style tag
    pub fn with_preferred_tag(mut self, tag: &str) -> Self {
        self.preferred_tags.insert(tag.to_lowercase());
        self
    }

    /// Set the cook-time ceiling in minutes
    pub fn with_max_cook_time(mut self, minutes: u32) -> Self {
        self.max_cook_time = Some(minutes);
        self
    }

    /// Set the variety level
    pub fn with_variety(mut self, variety: VarietyLevel) -> Self {
        self.variety = variety;
        self
    }

    pub fn is_favorite(&self, recipe_id: &str) -> bool {
        self.favorite_recipes.contains(recipe_id)
    }
}
