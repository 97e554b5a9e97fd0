//! # Rotation Library Example
//!
//! Generates a multi-week rotation library across the built-in tracks and
//! reports any recipe-spacing compromises the builder had to accept.

use anyhow::Result;
use chrono::NaiveDate;
use mealplanner::nutrition::NutritionInfo;
use mealplanner::plan_config::RotationConfig;
use mealplanner::recipe_model::{InMemoryCatalog, MealCategory, Recipe};
use mealplanner::rotation_spacer::{RotationSpacer, TrackSpec};

fn sample_catalog() -> InMemoryCatalog {
    let mut recipes = Vec::new();
    // A moderately sized catalog; small enough that some spacing
    // violations are expected and reported
    for i in 0..15 {
        let spread = (i % 6) as f64 * 2.5;
        recipes.push(
            Recipe::new(
                &format!("bf-{i}"),
                &format!("Breakfast Option {i}"),
                MealCategory::Breakfast,
            )
            .with_nutrition(NutritionInfo::new(290.0, 27.0 + spread, 13.0, 9.0, 4.0))
            .with_total_time(10 + i % 3 * 10)
            .with_ingredient("eggs", 2.0, "piece")
            .with_tag("vegetarian"),
        );
        let mut lunch = Recipe::new(
            &format!("ln-{i}"),
            &format!("Lunch Option {i}"),
            MealCategory::Lunch,
        )
        .with_nutrition(NutritionInfo::new(420.0, 31.0 + spread, 19.0, 13.0, 5.0))
        .with_total_time(20 + i % 3 * 10)
        .with_ingredient("brown rice", 0.75, "cup");
        lunch = if i % 2 == 0 {
            lunch.with_tag("vegetarian")
        } else {
            lunch.with_ingredient("chicken breast", 6.0, "oz").with_tag("quick")
        };
        recipes.push(lunch);

        let mut dinner = Recipe::new(
            &format!("dn-{i}"),
            &format!("Dinner Option {i}"),
            MealCategory::Dinner,
        )
        .with_nutrition(NutritionInfo::new(510.0, 31.0 + spread, 25.0, 16.0, 6.0))
        .with_total_time(25 + i % 3 * 10)
        .with_ingredient("olive oil", 1.0, "tbsp");
        dinner = if i % 3 == 0 {
            dinner.with_tag("vegetarian")
        } else {
            dinner.with_ingredient("ground beef", 0.5, "lb").with_tag("family")
        };
        recipes.push(dinner);
        recipes.push(
            Recipe::new(
                &format!("sn-{i}"),
                &format!("Snack Option {i}"),
                MealCategory::Snack,
            )
            .with_nutrition(NutritionInfo::new(140.0, 11.0 + spread, 6.0, 6.0, 2.0))
            .with_total_time(5)
            .with_ingredient("almonds", 0.25, "cup")
            .with_tag("vegetarian"),
        );
    }
    InMemoryCatalog::new(recipes)
}

fn main() -> Result<()> {
    env_logger::init();

    println!("🔁 Rotation Library Example");
    println!("===========================\n");

    let catalog = sample_catalog();
    let config = RotationConfig {
        min_spacing_weeks: 4,
        max_retries: 3,
    };
    let spacer = RotationSpacer::new(&catalog, config);

    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let library = spacer.build_library(&TrackSpec::presets(), 8, start, 2024)?;

    for track in ["standard", "vegetarian", "quick", "family"] {
        let weeks = library
            .entries
            .iter()
            .filter(|e| e.track == track)
            .count();
        println!("track '{track}': {weeks} weeks generated");
    }

    println!("\nSpacing compromises: {}", library.violations.len());
    for violation in library.violations.iter().take(10) {
        println!(
            "  [{}] week {} reuses '{}' from week {} (gap {})",
            violation.track,
            violation.week_number,
            violation.recipe_id,
            violation.previous_week,
            violation.gap
        );
    }

    Ok(())
}
