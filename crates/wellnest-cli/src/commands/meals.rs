use chrono::{Local, NaiveDate, Timelike};
use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::{MealCategory, MealTracker};
use wellnest_core::Config;

use super::{print_json, today};

#[derive(Subcommand)]
pub enum MealsAction {
    /// Log a meal eaten now
    Add {
        name: String,
        calories: u32,
        /// Veg, Non-Veg, Fruit or Dry Fruits
        #[arg(long, default_value = "Veg")]
        category: MealCategory,
    },
    /// Meals for a day with the calorie budget
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Delete a meal by id
    Delete {
        id: String,
    },
    /// Suggest a meal that fits what is left of today's budget
    Suggest {
        #[arg(long, default_value = "Veg")]
        category: MealCategory,
    },
}

pub fn run(action: MealsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let meals = MealTracker::new(&db);
    let goal = config.meals.calorie_goal;

    match action {
        MealsAction::Add {
            name,
            calories,
            category,
        } => {
            let now = Local::now();
            let time = now.time().with_nanosecond(0).unwrap_or_else(|| now.time());
            let meal = meals.add(now.date_naive(), time, &name, calories, category)?;
            print_json(&meal)?;
        }
        MealsAction::List { date } => {
            let date = date.unwrap_or_else(today);
            print_json(&json!({
                "date": date,
                "goal": goal,
                "total": meals.total_calories(date)?,
                "remaining": meals.remaining_calories(date, goal)?,
                "meals": meals.for_date(date)?,
            }))?;
        }
        MealsAction::Delete { id } => {
            meals.delete(&id)?;
            println!("deleted {id}");
        }
        MealsAction::Suggest { category } => {
            let date = today();
            print_json(&json!({
                "remaining": meals.remaining_calories(date, goal)?,
                "suggestion": meals.suggest_for(date, goal, category)?,
            }))?;
        }
    }
    Ok(())
}
