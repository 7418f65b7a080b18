use chrono::NaiveDate;
use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::trackers::{Mood, MoodTracker};

use super::{print_json, today};

#[derive(Subcommand)]
pub enum MoodAction {
    /// Record today's mood (happy, calm, neutral, sad, angry, anxious)
    Set {
        mood: Mood,
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Recorded moods, newest first
    History,
}

pub fn run(action: MoodAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let tracker = MoodTracker::new(&db);

    match action {
        MoodAction::Set { mood, date } => {
            let date = date.unwrap_or_else(today);
            tracker.record(date, mood)?;
            print_json(&json!({ "date": date, "mood": mood, "emoji": mood.emoji() }))?;
        }
        MoodAction::History => {
            let history: Vec<_> = tracker
                .history()?
                .into_iter()
                .map(|(date, mood)| json!({ "date": date, "mood": mood, "emoji": mood.emoji() }))
                .collect();
            print_json(&history)?;
        }
    }
    Ok(())
}
