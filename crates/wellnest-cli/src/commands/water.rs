use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::{CupSize, WaterTracker};
use wellnest_core::Config;

use super::{print_chart, print_json, today};

#[derive(Subcommand)]
pub enum WaterAction {
    /// Log a drink: millilitres or small, medium, large
    Add {
        amount: String,
        /// Day to log against (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Today's intake, the last week and a chart
    Show,
}

fn parse_amount(amount: &str) -> Result<u32, Box<dyn std::error::Error>> {
    if let Ok(ml) = amount.parse::<u32>() {
        return Ok(ml);
    }
    Ok(amount.parse::<CupSize>()?.ml())
}

pub fn run(action: WaterAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;
    let water = WaterTracker::new(&db);
    let goal = config.water.daily_goal_ml;

    match action {
        WaterAction::Add { amount, date } => {
            let date = date.unwrap_or_else(today);
            let total = water.add(date, parse_amount(&amount)?)?;
            print_json(&json!({
                "date": date,
                "total_ml": total,
                "goal_ml": goal,
                "progress_pct": water.progress_pct(date, goal)?,
            }))?;
        }
        WaterAction::Show => {
            let date = today();
            let recent: Vec<_> = water
                .recent(7)?
                .into_iter()
                .map(|(date, ml)| json!({ "date": date, "ml": ml }))
                .collect();
            print_json(&json!({
                "date": date,
                "total_ml": water.intake(date)?,
                "goal_ml": goal,
                "progress_pct": water.progress_pct(date, goal)?,
                "recent": recent,
            }))?;
            print_chart("Water (ml)", &water.chart(7)?);
        }
    }
    Ok(())
}
