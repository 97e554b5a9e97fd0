//! # Weekly Plan Generation Example
//!
//! Demonstrates generating a seven-day GD meal plan from a small in-memory
//! catalog, including dietary filtering, seeded reproducibility, and a
//! single-day regeneration.

use anyhow::Result;
use chrono::NaiveDate;
use mealplanner::nutrition::NutritionInfo;
use mealplanner::plan_config::GenerationOptions;
use mealplanner::preferences::{DietaryRestriction, Preferences};
use mealplanner::recipe_model::{InMemoryCatalog, MealCategory, Recipe};
use mealplanner::weekly_assembler::WeeklyPlanAssembler;

fn sample_catalog() -> InMemoryCatalog {
    let mut recipes = Vec::new();

    let breakfasts = [
        ("bf-oats", "Overnight Oats with Berries", 36.0, 12.0, 10),
        ("bf-omelette", "Veggie Omelette with Toast", 30.0, 18.0, 20),
        ("bf-yogurt", "Greek Yogurt Parfait", 28.0, 15.0, 5),
        ("bf-toast", "Avocado Toast with Egg", 33.0, 14.0, 15),
        ("bf-pancakes", "Whole Wheat Pancakes", 40.0, 11.0, 25),
    ];
    for (id, title, carbs, protein, time) in breakfasts {
        recipes.push(
            Recipe::new(id, title, MealCategory::Breakfast)
                .with_nutrition(NutritionInfo::new(carbs * 9.0, carbs, protein, 10.0, 5.0))
                .with_total_time(time)
                .with_ingredient("rolled oats", 0.5, "cup")
                .with_ingredient("eggs", 2.0, "piece")
                .with_tag("vegetarian"),
        );
    }

    // (id, title, category, carbs, protein, time, signature ingredient)
    let mains = [
        ("ln-bowl", "Quinoa Power Bowl", MealCategory::Lunch, 42.0, 18.0, 25, "quinoa"),
        ("ln-wrap", "Turkey Lettuce Wraps", MealCategory::Lunch, 32.0, 24.0, 15, "ground turkey"),
        ("ln-soup", "Lentil Vegetable Soup", MealCategory::Lunch, 38.0, 16.0, 40, "green lentils"),
        ("ln-salad", "Chicken Caesar Salad", MealCategory::Lunch, 30.0, 28.0, 20, "chicken breast"),
        ("ln-falafel", "Falafel Pita Pocket", MealCategory::Lunch, 44.0, 15.0, 30, "chickpeas"),
        ("dn-salmon", "Baked Salmon with Rice", MealCategory::Dinner, 40.0, 32.0, 35, "salmon fillet"),
        ("dn-stirfry", "Tofu Vegetable Stir-Fry", MealCategory::Dinner, 38.0, 20.0, 25, "tofu"),
        ("dn-chili", "Turkey Chili", MealCategory::Dinner, 35.0, 28.0, 50, "ground turkey"),
        ("dn-pasta", "Whole Wheat Pasta Primavera", MealCategory::Dinner, 46.0, 18.0, 30, "whole wheat pasta"),
        ("dn-curry", "Chickpea Spinach Curry", MealCategory::Dinner, 42.0, 17.0, 35, "chickpeas"),
    ];
    for (id, title, category, carbs, protein, time, signature) in mains {
        let mut recipe = Recipe::new(id, title, category)
            .with_nutrition(NutritionInfo::new(carbs * 10.0, carbs, protein, 14.0, 6.0))
            .with_total_time(time)
            .with_ingredient(signature, 1.0, "cup")
            .with_ingredient("olive oil", 1.0, "tbsp")
            .with_ingredient("garlic", 2.0, "clove");
        if matches!(id, "ln-bowl" | "ln-soup" | "ln-falafel" | "dn-stirfry" | "dn-pasta" | "dn-curry") {
            recipe = recipe.with_tag("vegetarian");
        }
        recipes.push(recipe);
    }

    let snacks = [
        ("sn-apple", "Apple with Peanut Butter", 18.0, 5.0),
        ("sn-hummus", "Hummus and Veggies", 14.0, 6.0),
        ("sn-cottage", "Cottage Cheese Bowl", 12.0, 13.0),
        ("sn-trail", "Trail Mix", 16.0, 6.0),
        ("sn-cheese", "Cheese and Crackers", 15.0, 8.0),
        ("sn-yogurt", "Greek Yogurt with Berries", 13.0, 11.0),
        ("sn-edamame", "Steamed Edamame", 11.0, 9.0),
        ("sn-toast", "Rice Cake with Almond Butter", 17.0, 6.0),
    ];
    for (id, title, carbs, protein) in snacks {
        recipes.push(
            Recipe::new(id, title, MealCategory::Snack)
                .with_nutrition(NutritionInfo::new(carbs * 9.0, carbs, protein, 7.0, 3.0))
                .with_total_time(5)
                .with_ingredient("mixed nuts", 0.25, "cup")
                .with_tag("vegetarian"),
        );
    }

    InMemoryCatalog::new(recipes)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("🗓️  Weekly Plan Generation Example");
    println!("==================================\n");

    let catalog = sample_catalog();
    let prefs = Preferences::new()
        .with_restriction(DietaryRestriction::Vegetarian)
        .with_favorite("bf-oats")
        .with_max_cook_time(45);

    let start = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
    let options = GenerationOptions::new(start).with_days(7).with_seed(42);

    let assembler = WeeklyPlanAssembler::new(&catalog, &prefs);
    let mut plan = assembler.generate("demo-user", &options)?;

    for day in &plan.days {
        println!("{}", day.date.format("%A %Y-%m-%d"));
        for assignment in &day.assignments {
            match &assignment.recipe_title {
                Some(title) => println!(
                    "  {:<16} {} ({:.0}g carbs)",
                    assignment.slot.to_string(),
                    title,
                    assignment.nutrition.carbohydrates
                ),
                None => println!("  {:<16} (skipped)", assignment.slot.to_string()),
            }
        }
        println!("  day total: {}\n", day.total_nutrition);
    }

    println!("Summary");
    println!("-------");
    println!("unique recipes:  {}", plan.summary.unique_recipe_count);
    println!(
        "avg carbs/day:   {:.0}g",
        plan.summary.avg_daily_nutrition.carbohydrates
    );
    println!(
        "total prep time: {} minutes",
        plan.summary.total_prep_time_minutes
    );

    // Determinism: the same options regenerate the identical plan
    let replay = assembler.generate("demo-user", &options)?;
    println!("\nreplay identical: {}", replay == plan);

    // Regenerate one day in place
    assembler.regenerate_day(&mut plan, 2, 777)?;
    println!("regenerated day 3; plan version is now {}", plan.version);

    Ok(())
}
