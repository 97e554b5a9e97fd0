//! # Shopping List Aggregation Example
//!
//! Builds a short plan by hand and shows how overlapping ingredients are
//! normalized, unit-converted, bucketed into store sections and rendered
//! as text and CSV.

use anyhow::Result;
use chrono::NaiveDate;
use mealplanner::nutrition::NutritionInfo;
use mealplanner::plan_model::{
    DailyPlan, MealAssignment, MealSlot, WeeklyPlan, WeeklySummary,
};
use mealplanner::preferences::Preferences;
use mealplanner::recipe_model::{InMemoryCatalog, MealCategory, Recipe};
use mealplanner::shopping_list::aggregate_plan;

fn main() -> Result<()> {
    env_logger::init();

    println!("🛒 Shopping List Aggregation Example");
    println!("====================================\n");

    let salad = Recipe::new("r-salad", "Greek Salad", MealCategory::Lunch)
        .with_nutrition(NutritionInfo::new(380.0, 32.0, 14.0, 18.0, 6.0))
        .with_total_time(15)
        .with_ingredient("olive oil", 2.0, "tbsp")
        .with_ingredient("Fresh spinach (washed)", 2.0, "cup")
        .with_ingredient("cucumber", 1.0, "piece")
        .with_ingredient("feta cheese", 0.5, "cup");

    let marinade = Recipe::new("r-chicken", "Lemon Chicken", MealCategory::Dinner)
        .with_nutrition(NutritionInfo::new(520.0, 38.0, 34.0, 16.0, 5.0))
        .with_total_time(40)
        .with_ingredient("olive oil", 0.25, "cup")
        .with_ingredient("chicken breast", 1.0, "lb")
        .with_ingredient("lemon", 2.0, "piece")
        .with_ingredient("spinach, chopped", 1.0, "cup");

    let oats = Recipe::new("r-oats", "Overnight Oats", MealCategory::Breakfast)
        .with_nutrition(NutritionInfo::new(310.0, 36.0, 12.0, 9.0, 6.0))
        .with_total_time(10)
        .with_ingredient("rolled oats", 0.5, "cup")
        .with_ingredient("milk", 1.0, "cup")
        .with_ingredient("frozen blueberries", 0.5, "cup");

    let catalog = InMemoryCatalog::new(vec![salad, marinade, oats]);

    let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let day = DailyPlan::new(
        date,
        vec![
            MealAssignment::new(
                MealSlot::Breakfast,
                "r-oats",
                "Overnight Oats",
                1.0,
                NutritionInfo::new(310.0, 36.0, 12.0, 9.0, 6.0),
            ),
            MealAssignment::new(
                MealSlot::Lunch,
                "r-salad",
                "Greek Salad",
                1.0,
                NutritionInfo::new(380.0, 32.0, 14.0, 18.0, 6.0),
            ),
            MealAssignment::new(
                MealSlot::Dinner,
                "r-chicken",
                "Lemon Chicken",
                1.0,
                NutritionInfo::new(520.0, 38.0, 34.0, 16.0, 5.0),
            ),
        ],
    );
    let plan = WeeklyPlan {
        user_id: "demo-user".to_string(),
        start_date: date,
        days: vec![day],
        preferences: Preferences::default(),
        summary: WeeklySummary {
            avg_daily_nutrition: NutritionInfo::zero(),
            unique_recipe_count: 3,
            total_prep_time_minutes: 65,
        },
        version: 1,
    };

    let list = aggregate_plan(&plan, &catalog)?;

    // The two olive oil entries (2 tbsp + 1/4 cup) merge into one line in
    // cups; the two spinach entries merge after name normalization
    println!("{}", list.to_text());

    println!("CSV");
    println!("---");
    println!("{}", list.to_csv());

    Ok(())
}
