//! Integration tests for shopping-list aggregation over generated plans:
//! normalization, unit reconciliation, unit safety, and rendering.

use chrono::NaiveDate;
use mealplanner::nutrition::NutritionInfo;
use mealplanner::plan_config::GenerationOptions;
use mealplanner::preferences::Preferences;
use mealplanner::recipe_model::{InMemoryCatalog, MealCategory, Recipe};
use mealplanner::shopping_list::{aggregate_plan, StoreSection};
use mealplanner::unit_conversion::{ShoppingUnit, UnitFamily};
use mealplanner::weekly_assembler::WeeklyPlanAssembler;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

/// Catalog whose recipes deliberately share ingredients under different
/// spellings and units.
fn overlapping_catalog() -> InMemoryCatalog {
    let mut recipes = vec![
        Recipe::new("b0", "Spinach Omelette", MealCategory::Breakfast)
            .with_nutrition(NutritionInfo::new(300.0, 30.0, 16.0, 12.0, 4.0))
            .with_total_time(15)
            .with_ingredient("eggs", 2.0, "piece")
            .with_ingredient("Fresh spinach (washed)", 1.0, "cup")
            .with_ingredient("olive oil", 2.0, "tbsp"),
        Recipe::new("l0", "Chicken Spinach Salad", MealCategory::Lunch)
            .with_nutrition(NutritionInfo::new(420.0, 35.0, 26.0, 14.0, 6.0))
            .with_total_time(20)
            .with_ingredient("chicken breast", 8.0, "oz")
            .with_ingredient("spinach, chopped", 2.0, "cup")
            .with_ingredient("olive oil", 0.25, "cup"),
        Recipe::new("d0", "Garlic Salmon", MealCategory::Dinner)
            .with_nutrition(NutritionInfo::new(500.0, 34.0, 32.0, 18.0, 5.0))
            .with_total_time(30)
            .with_ingredient("salmon fillet", 1.0, "lb")
            .with_ingredient("garlic", 3.0, "clove")
            .with_ingredient("olive oil", 1.0, "tbsp"),
        Recipe::new("s0", "Yogurt Cup", MealCategory::Snack)
            .with_nutrition(NutritionInfo::new(140.0, 14.0, 9.0, 4.0, 2.0))
            .with_total_time(2)
            .with_ingredient("greek yogurt", 1.0, "cup")
            .with_ingredient("frozen blueberries", 0.5, "cup"),
    ];
    // Padding so each category has alternatives
    for i in 1..4 {
        recipes.push(
            Recipe::new(&format!("s{i}"), &format!("Snack {i}"), MealCategory::Snack)
                .with_nutrition(NutritionInfo::new(130.0, 12.0 + i as f64, 6.0, 5.0, 2.0))
                .with_total_time(5)
                .with_ingredient("almonds", 0.25, "cup"),
        );
    }
    InMemoryCatalog::new(recipes)
}

fn generated_plan(catalog: &InMemoryCatalog) -> mealplanner::plan_model::WeeklyPlan {
    let prefs = Preferences::default();
    let assembler = WeeklyPlanAssembler::new(catalog, &prefs);
    let options = GenerationOptions::new(start()).with_days(2).with_seed(17);
    assembler.generate("u", &options).unwrap()
}

#[test]
fn aggregates_generated_plan_without_duplicates() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    // No two items may share both normalized name and unit family
    for (i, a) in list.items.iter().enumerate() {
        for b in &list.items[i + 1..] {
            assert!(
                !(a.name == b.name && a.unit.family() == b.unit.family()),
                "duplicate aggregation entry for '{}'",
                a.name
            );
        }
    }
}

#[test]
fn olive_oil_merges_across_recipes_into_cups() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    let oil: Vec<_> = list
        .items
        .iter()
        .filter(|i| i.name == "olive oil")
        .collect();
    assert_eq!(oil.len(), 1, "olive oil split across entries");
    // tbsp and cup entries contributed, so the display unit is cup
    assert_eq!(oil[0].unit, ShoppingUnit::Cup);
    assert!(oil[0].sources.len() >= 2);
}

#[test]
fn spinach_variants_normalize_to_one_name() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    assert!(list.items.iter().any(|i| i.name == "spinach"));
    assert!(!list.items.iter().any(|i| i.name.contains("fresh spinach")));
    assert!(!list.items.iter().any(|i| i.name.contains("chopped")));
}

#[test]
fn unit_safety_no_unrelated_units_combined() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    for item in &list.items {
        match item.unit.family() {
            UnitFamily::Count(label) => {
                // A count entry renders in exactly its own unit
                assert_eq!(item.unit.display_name(), label);
            }
            _ => {}
        }
    }

    // Piece-unit eggs never merge into a volume or weight entry
    let eggs: Vec<_> = list.items.iter().filter(|i| i.name == "eggs").collect();
    for entry in eggs {
        assert_eq!(entry.unit, ShoppingUnit::Piece);
    }
}

#[test]
fn reaggregation_of_same_plan_is_identical() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);

    let first = aggregate_plan(&plan, &catalog).unwrap();
    let second = aggregate_plan(&plan, &catalog).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_text(), second.to_text());
    assert_eq!(first.to_csv(), second.to_csv());
}

#[test]
fn sections_render_in_walk_order_and_alphabetized() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    // Items arrive sorted: section walk order, then name
    let positions: Vec<usize> = list
        .items
        .iter()
        .map(|i| {
            StoreSection::walk_order()
                .iter()
                .position(|s| *s == i.section)
                .unwrap()
        })
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);

    for section in StoreSection::walk_order() {
        let names: Vec<&str> = list
            .section_items(section)
            .iter()
            .map(|i| i.name.as_str())
            .collect();
        let mut alpha = names.clone();
        alpha.sort_unstable();
        assert_eq!(names, alpha, "section {section} not alphabetized");
    }
}

#[test]
fn csv_has_header_and_one_row_per_item() {
    let catalog = overlapping_catalog();
    let plan = generated_plan(&catalog);
    let list = aggregate_plan(&plan, &catalog).unwrap();

    let csv = list.to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "section,item,quantity,unit,recipes");
    assert_eq!(lines.len(), list.items.len() + 1);
}
