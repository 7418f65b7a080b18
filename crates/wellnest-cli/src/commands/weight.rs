use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::WeightTracker;

use super::{print_chart, print_json, today};

#[derive(Subcommand)]
pub enum WeightAction {
    /// Log a weight in kilograms
    Add {
        kg: f64,
        #[arg(long, default_value = "")]
        note: String,
        /// Day to log against (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Show the goal, or set it when a value is given
    Goal {
        kg: Option<f64>,
    },
    /// All entries with the overall change
    List,
    /// Delete an entry by id
    Delete {
        id: String,
    },
    /// Weight over time
    Chart,
}

pub fn run(action: WeightAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let weight = WeightTracker::new(&db);

    match action {
        WeightAction::Add { kg, note, date } => {
            let entry = weight.add(date.unwrap_or_else(today), kg, &note)?;
            print_json(&entry)?;
        }
        WeightAction::Goal { kg } => {
            if let Some(kg) = kg {
                weight.set_goal(kg)?;
            }
            print_json(&json!({
                "goal": weight.goal()?,
                "latest": weight.latest()?,
                "to_goal": weight.to_goal()?,
            }))?;
        }
        WeightAction::List => {
            print_json(&json!({
                "change": weight.change()?,
                "entries": weight.entries()?,
            }))?;
        }
        WeightAction::Delete { id } => {
            weight.delete(&id)?;
            println!("deleted {id}");
        }
        WeightAction::Chart => {
            print_chart("Weight (kg)", &weight.chart()?);
        }
    }
    Ok(())
}
