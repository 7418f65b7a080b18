use chrono::{NaiveDate, NaiveTime};
use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::SleepTracker;

use super::{parse_time, print_chart, print_json, today};

#[derive(Subcommand)]
pub enum SleepAction {
    /// Log a night: bedtime and wake time as HH:MM
    Add {
        #[arg(value_parser = parse_time)]
        bedtime: NaiveTime,
        #[arg(value_parser = parse_time)]
        wake: NaiveTime,
        /// Night to log against (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// All entries and the average
    List,
    /// Delete an entry by id
    Delete {
        id: String,
    },
    /// Hours per night for the last seven entries
    Chart,
}

pub fn run(action: SleepAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let sleep = SleepTracker::new(&db);

    match action {
        SleepAction::Add {
            bedtime,
            wake,
            date,
        } => {
            let entry = sleep.add(date.unwrap_or_else(today), bedtime, wake)?;
            print_json(&entry)?;
        }
        SleepAction::List => {
            print_json(&json!({
                "average_hours": sleep.average_hours()?,
                "entries": sleep.entries()?,
            }))?;
        }
        SleepAction::Delete { id } => {
            sleep.delete(&id)?;
            println!("deleted {id}");
        }
        SleepAction::Chart => {
            print_chart("Sleep (hours)", &sleep.chart()?);
        }
    }
    Ok(())
}
