//! # Shopping List Aggregator
//!
//! Turns a finished plan into a store-organized shopping list: every
//! assignment's ingredients are scaled by servings, names are normalized,
//! units are canonicalized, same-item amounts are summed (converting
//! within a unit family via the fixed table), and the result is bucketed
//! into store sections and rendered as text or CSV.
//!
//! Amounts in unrelated units are never combined: "2 cups spinach" and
//! "1 bunch spinach" stay separate line items. Aggregation is a pure
//! function of the plan and catalog, so re-running it never accumulates.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use crate::ingredient_normalizer::normalize_name;
use crate::plan_errors::PlanError;
use crate::plan_model::WeeklyPlan;
use crate::recipe_model::RecipeCatalog;
use crate::unit_conversion::{ShoppingUnit, UnitFamily};

/// Store sections in store-walk order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StoreSection {
    Produce,
    Proteins,
    Dairy,
    GrainsBread,
    Pantry,
    Frozen,
    Snacks,
    Beverages,
    Other,
}

impl StoreSection {
    /// Deterministic render order matching a typical store walk.
    pub fn walk_order() -> [StoreSection; 9] {
        [
            StoreSection::Produce,
            StoreSection::Proteins,
            StoreSection::Dairy,
            StoreSection::GrainsBread,
            StoreSection::Pantry,
            StoreSection::Frozen,
            StoreSection::Snacks,
            StoreSection::Beverages,
            StoreSection::Other,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            StoreSection::Produce => "Produce",
            StoreSection::Proteins => "Proteins",
            StoreSection::Dairy => "Dairy",
            StoreSection::GrainsBread => "Grains & Bread",
            StoreSection::Pantry => "Pantry",
            StoreSection::Frozen => "Frozen",
            StoreSection::Snacks => "Snacks",
            StoreSection::Beverages => "Beverages",
            StoreSection::Other => "Other",
        }
    }
}

impl fmt::Display for StoreSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Ordered section keyword table; the first section whose keyword appears
/// in the normalized name wins. Match order differs from walk order so
/// specific phrases ("chicken broth" → pantry) win over broad ones
/// ("chicken" → proteins).
const SECTION_KEYWORDS: &[(StoreSection, &[&str])] = &[
    (StoreSection::Frozen, &["frozen"]),
    (
        StoreSection::Beverages,
        &["juice", "coffee", "tea", "sparkling water", "seltzer", "kombucha"],
    ),
    (
        StoreSection::Pantry,
        &[
            "broth", "stock", "oil", "vinegar", "flour", "sugar", "honey", "maple syrup",
            "soy sauce", "mustard", "mayonnaise", "salsa", "tomato paste", "canned", "salt",
            "black pepper", "cinnamon", "cumin", "paprika", "oregano", "basil", "thyme",
            "vanilla", "baking powder", "baking soda", "almond", "walnut", "pecan", "cashew",
            "peanut butter", "tahini", "chia", "flaxseed",
        ],
    ),
    (
        StoreSection::Dairy,
        &["milk", "yogurt", "cheese", "butter", "cream", "cottage", "kefir", "egg"],
    ),
    (
        StoreSection::Proteins,
        &[
            "chicken", "beef", "turkey", "pork", "lamb", "fish", "salmon", "tuna", "shrimp",
            "tofu", "tempeh", "beans", "lentils", "chickpeas", "edamame",
        ],
    ),
    (
        StoreSection::GrainsBread,
        &[
            "bread", "tortilla", "rice", "pasta", "oats", "quinoa", "barley", "cereal", "bagel",
            "pita", "muffin", "couscous", "noodle",
        ],
    ),
    (
        StoreSection::Snacks,
        &["crackers", "popcorn", "chips", "granola", "pretzel", "rice cake"],
    ),
    (
        StoreSection::Produce,
        &[
            "spinach", "lettuce", "kale", "arugula", "tomato", "onion", "garlic", "carrot",
            "celery", "cucumber", "zucchini", "broccoli", "cauliflower", "bell pepper",
            "mushroom", "avocado", "potato", "sweet potato", "apple", "banana", "berries",
            "blueberr", "strawberr", "raspberr", "orange", "lemon", "lime", "pear", "peach",
            "grape", "melon", "cilantro", "parsley", "ginger", "scallion",
            "green bean", "asparagus", "cabbage", "squash",
        ],
    ),
];

/// Bucket a normalized ingredient name into a store section.
pub fn section_for(normalized_name: &str) -> StoreSection {
    for (section, keywords) in SECTION_KEYWORDS {
        if keywords.iter().any(|k| normalized_name.contains(k)) {
            return *section;
        }
    }
    StoreSection::Other
}

/// One aggregated shopping-list line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Normalized ingredient name
    pub name: String,
    /// Aggregated amount in `unit`, already rounded by the list policy
    pub amount: f64,
    /// Display unit: the largest unit of the family that appeared
    pub unit: ShoppingUnit,
    pub section: StoreSection,
    /// Titles of the recipes that contributed to this line
    pub sources: Vec<String>,
    pub checked: bool,
}

/// Store-organized shopping list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ShoppingList {
    /// Items ordered by section walk order, then alphabetically by name
    pub items: Vec<ShoppingListItem>,
}

/// Rounding policy: amounts under 1 keep two decimals, under 10 one
/// decimal, and 10 or more round to whole units.
pub fn round_amount(amount: f64) -> f64 {
    if amount < 1.0 {
        (amount * 100.0).round() / 100.0
    } else if amount < 10.0 {
        (amount * 10.0).round() / 10.0
    } else {
        amount.round()
    }
}

/// Render a rounded amount with no trailing noise: "0.38", "2.5", "12".
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{}", amount as i64)
    } else if amount < 1.0 {
        format!("{amount:.2}")
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        format!("{amount:.1}")
    }
}

struct Accumulated {
    base_amount: f64,
    display_unit: ShoppingUnit,
    sources: BTreeSet<String>,
}

/// Aggregate every assignment of `plan` into a shopping list.
///
/// Fails with `UnresolvedRecipeReference` if the plan references a recipe
/// missing from the catalog snapshot (stale plan against a newer catalog).
pub fn aggregate_plan(
    plan: &WeeklyPlan,
    catalog: &dyn RecipeCatalog,
) -> Result<ShoppingList, PlanError> {
    let mut entries: HashMap<(String, UnitFamily), Accumulated> = HashMap::new();

    for day in &plan.days {
        for assignment in &day.assignments {
            let Some(recipe_id) = assignment.recipe_id.as_deref() else {
                continue;
            };
            let recipe = catalog
                .get_by_id(recipe_id)
                .ok_or_else(|| PlanError::UnresolvedRecipeReference(recipe_id.to_string()))?;

            for ingredient in &recipe.ingredients {
                let name = normalize_name(&ingredient.name);
                let unit = ShoppingUnit::parse(&ingredient.unit);
                let amount = ingredient.amount * assignment.servings;
                let key = (name, unit.family());

                let entry = entries.entry(key).or_insert_with(|| Accumulated {
                    base_amount: 0.0,
                    display_unit: unit.clone(),
                    sources: BTreeSet::new(),
                });
                entry.base_amount += amount * unit.base_factor();
                if unit.rank() > entry.display_unit.rank() {
                    entry.display_unit = unit;
                }
                entry.sources.insert(recipe.title.clone());
            }
        }
    }

    let mut items: Vec<ShoppingListItem> = entries
        .into_iter()
        .map(|((name, _family), acc)| {
            let display_amount = acc.base_amount / acc.display_unit.base_factor();
            let section = section_for(&name);
            debug!(
                "Aggregated '{name}': {display_amount} {} -> {section}",
                acc.display_unit
            );
            ShoppingListItem {
                name,
                amount: round_amount(display_amount),
                unit: acc.display_unit,
                section,
                sources: acc.sources.into_iter().collect(),
                checked: false,
            }
        })
        .collect();

    items.sort_by(|a, b| {
        let a_pos = StoreSection::walk_order()
            .iter()
            .position(|s| *s == a.section);
        let b_pos = StoreSection::walk_order()
            .iter()
            .position(|s| *s == b.section);
        a_pos
            .cmp(&b_pos)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.unit.display_name().cmp(b.unit.display_name()))
    });

    info!(
        "Aggregated shopping list: {} items from {} days",
        items.len(),
        plan.days.len()
    );
    Ok(ShoppingList { items })
}

impl ShoppingList {
    /// Items in one section, already alphabetized.
    pub fn section_items(&self, section: StoreSection) -> Vec<&ShoppingListItem> {
        self.items.iter().filter(|i| i.section == section).collect()
    }

    /// Plain-text rendering, one section header per non-empty section.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for section in StoreSection::walk_order() {
            let items = self.section_items(section);
            if items.is_empty() {
                continue;
            }
            out.push_str(&format!("{}\n", section.display_name().to_uppercase()));
            for item in items {
                out.push_str(&format!(
                    "  [ ] {} {} {}\n",
                    format_amount(item.amount),
                    item.unit,
                    item.name
                ));
            }
            out.push('\n');
        }
        out
    }

    /// CSV rendering with a header row. Fields containing commas or
    /// quotes are quoted.
    pub fn to_csv(&self) -> String {
        let mut out = String::from("section,item,quantity,unit,recipes\n");
        for item in &self.items {
            out.push_str(&format!(
                "{},{},{},{},{}\n",
                csv_field(item.section.display_name()),
                csv_field(&item.name),
                format_amount(item.amount),
                csv_field(item.unit.display_name()),
                csv_field(&item.sources.join("; "))
            ));
        }
        out
    }
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
