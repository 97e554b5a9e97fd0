//! # Preference Filter
//!
//! Reduces a recipe list to the subset compatible with a user's dietary
//! restrictions, allergens, disliked ingredients and cook-time ceiling.
//! Every excluded recipe carries a human-readable reason naming the
//! triggering rule and keyword.
//!
//! Matching is case-insensitive substring matching against curated keyword
//! lists per restriction/allergen category. This is a practical heuristic,
//! not a nutrition ontology: compound names can false-positive (e.g.
//! "vegetable broth" contains "vegetable"), which matches the behavior the
//! recipe catalog was curated against. A recipe tagged with a restriction's
//! compliance tag bypasses keyword screening for that restriction.
//!
//! Rules are applied in a fixed order and the first hit wins:
//! restriction conflict, allergen, disliked ingredient, cook time.

use lazy_static::lazy_static;
use log::{debug, info};
use std::collections::HashMap;

use crate::preferences::{DietaryRestriction, Preferences};
use crate::recipe_model::Recipe;

lazy_static! {
    /// Default keyword table: restriction -> ingredient keywords that
    /// conflict with it. Versioned configuration; product can ship an
    /// updated table without engine changes.
    static ref DEFAULT_RESTRICTION_KEYWORDS: HashMap<DietaryRestriction, Vec<&'static str>> = {
        let mut map = HashMap::new();
        map.insert(
            DietaryRestriction::Vegetarian,
            vec![
                "chicken", "beef", "pork", "turkey", "lamb", "bacon", "ham",
                "sausage", "fish", "salmon", "tuna", "shrimp", "anchovy",
                "prosciutto", "chorizo", "gelatin",
            ],
        );
        map.insert(
            DietaryRestriction::Vegan,
            vec![
                "chicken", "beef", "pork", "turkey", "lamb", "bacon", "ham",
                "sausage", "fish", "salmon", "tuna", "shrimp", "anchovy",
                "egg", "milk", "cream", "butter", "cheese", "yogurt", "honey",
                "gelatin", "whey",
            ],
        );
        map.insert(
            DietaryRestriction::GlutenFree,
            vec![
                "wheat", "flour", "bread", "pasta", "couscous", "barley",
                "rye", "semolina", "panko", "soy sauce", "cracker", "tortilla",
            ],
        );
        map.insert(
            DietaryRestriction::DairyFree,
            vec![
                "milk", "cream", "butter", "cheese", "yogurt", "whey",
                "ricotta", "mozzarella", "parmesan", "ghee",
            ],
        );
        map.insert(
            DietaryRestriction::NutFree,
            vec![
                "almond", "walnut", "pecan", "cashew", "pistachio", "hazelnut",
                "peanut", "macadamia", "pine nut", "nut butter",
            ],
        );
        map.insert(
            DietaryRestriction::Pescatarian,
            vec![
                "chicken", "beef", "pork", "turkey", "lamb", "bacon", "ham",
                "sausage", "prosciutto", "chorizo",
            ],
        );
        map.insert(
            DietaryRestriction::LowSodium,
            vec![
                "soy sauce", "fish sauce", "bouillon", "brined", "cured",
                "pickled", "salami",
            ],
        );
        map
    };
}

/// Keyword configuration the filter matches against.
///
/// Substring matching against these lists is heuristic; see the module
/// docs for the known compound-name limitation.
#[derive(Debug, Clone)]
pub struct FilterKeywords {
    /// Restriction -> conflicting ingredient keywords
    pub restriction_keywords: HashMap<DietaryRestriction, Vec<String>>,
}

impl Default for FilterKeywords {
    fn default() -> Self {
        let restriction_keywords = DEFAULT_RESTRICTION_KEYWORDS
            .iter()
            .map(|(k, v)| (*k, v.iter().map(|s| s.to_string()).collect()))
            .collect();
        Self {
            restriction_keywords,
        }
    }
}

/// A recipe rejected by the filter, with the reason it was rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcludedRecipe {
    pub recipe: Recipe,
    pub reason: String,
}

/// Result of filtering a recipe list against user preferences.
#[derive(Debug, Clone, Default)]
pub struct FilterOutcome {
    pub suitable: Vec<Recipe>,
    pub excluded: Vec<ExcludedRecipe>,
}

/// Partition `recipes` into suitable and excluded sets for `prefs`.
///
/// Pure function of its inputs; the catalog is never mutated.
pub fn filter_recipes(
    recipes: &[Recipe],
    prefs: &Preferences,
    keywords: &FilterKeywords,
) -> FilterOutcome {
    let mut outcome = FilterOutcome::default();

    for recipe in recipes {
        match exclusion_reason(recipe, prefs, keywords) {
            Some(reason) => {
                debug!("Excluding '{}': {}", recipe.title, reason);
                outcome.excluded.push(ExcludedRecipe {
                    recipe: recipe.clone(),
                    reason,
                });
            }
            None => outcome.suitable.push(recipe.clone()),
        }
    }

    info!(
        "Filtered {} recipes: {} suitable, {} excluded",
        recipes.len(),
        outcome.suitable.len(),
        outcome.excluded.len()
    );
    outcome
}

/// First exclusion rule the recipe trips, or `None` if it is suitable.
fn exclusion_reason(
    recipe: &Recipe,
    prefs: &Preferences,
    keywords: &FilterKeywords,
) -> Option<String> {
    // Rule 1: dietary restriction conflicts, unless the recipe declares
    // itself compliant via tag. Restrictions are checked in a stable
    // order so the reported reason is reproducible.
    let mut restrictions: Vec<_> = prefs.restrictions.iter().collect();
    restrictions.sort_by_key(|r| r.compliance_tag());
    for restriction in restrictions {
        if recipe.has_tag(restriction.compliance_tag()) {
            continue;
        }
        if let Some(conflict_keywords) = keywords.restriction_keywords.get(restriction) {
            for keyword in conflict_keywords {
                if let Some(ingredient) = matching_ingredient(recipe, keyword) {
                    return Some(format!(
                        "Contains {ingredient} (conflicts with {} restriction)",
                        restriction.compliance_tag()
                    ));
                }
            }
        }
    }

    // Rule 2: allergens
    let mut allergens: Vec<_> = prefs.allergens.iter().collect();
    allergens.sort();
    for allergen in allergens {
        if let Some(ingredient) = matching_ingredient(recipe, allergen) {
            return Some(format!("Contains {ingredient} (allergen: {allergen})"));
        }
    }

    // Rule 3: disliked ingredients
    let mut dislikes: Vec<_> = prefs.disliked_ingredients.iter().collect();
    dislikes.sort();
    for dislike in dislikes {
        if let Some(ingredient) = matching_ingredient(recipe, dislike) {
            return Some(format!("Contains disliked ingredient: {ingredient}"));
        }
    }

    // Rule 4: cook-time ceiling
    if let Some(ceiling) = prefs.max_cook_time {
        if recipe.total_time > ceiling {
            return Some(format!(
                "Takes {} minutes (limit: {ceiling} minutes)",
                recipe.total_time
            ));
        }
    }

    None
}

/// First ingredient name containing `keyword`, case-insensitively.
fn matching_ingredient<'a>(recipe: &'a Recipe, keyword: &str) -> Option<&'a str> {
    let keyword = keyword.to_lowercase();
    recipe
        .ingredients
        .iter()
        .find(|i| i.name.to_lowercase().contains(&keyword))
        .map(|i| i.name.as_str())
}
