use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;

use super::print_json;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's stats
    Today,
    /// All-time stats with the latest sessions
    All {
        /// How many recent sessions to include
        #[arg(long, default_value_t = 10)]
        recent: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        StatsAction::Today => {
            let stats = db.stats_today()?;
            print_json(&stats)?;
        }
        StatsAction::All { recent } => {
            let stats = db.stats_all()?;
            let sessions = db.recent_sessions(recent)?;
            print_json(&json!({ "stats": stats, "recent": sessions }))?;
        }
    }
    Ok(())
}
