use clap::Subcommand;
use serde_json::json;
use wellnest_core::storage::Database;
use wellnest_core::{Config, Sequence};

use super::{live, print_json, tick_period};

#[derive(Subcommand)]
pub enum BreatheAction {
    /// Run the breathing exercise in real time
    Run {
        /// Stop after this many full cycles
        #[arg(long, default_value_t = 4)]
        cycles: u64,
        /// Override the tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Print the configured pattern
    Pattern,
}

pub fn run(action: BreatheAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let sequence = Sequence::breathing(config.breathing_pattern());

    match action {
        BreatheAction::Run { cycles, tick_ms } => {
            if cycles == 0 {
                return Err("cycles must be at least 1".into());
            }
            let db = Database::open()?;
            let finished = live::play(&db, sequence, tick_period(&config, tick_ms), Some(cycles))?;
            print_json(&finished.snapshot())?;
        }
        BreatheAction::Pattern => {
            print_json(&json!({
                "pattern": config.breathing_pattern(),
                "cycle_secs": sequence.total_duration_secs(),
                "phases": sequence.phases,
            }))?;
        }
    }
    Ok(())
}
