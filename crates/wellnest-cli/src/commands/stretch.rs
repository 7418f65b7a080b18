use clap::Subcommand;
use serde_json::json;
use tracing::warn;
use wellnest_core::storage::{load_json, save_json, Database};
use wellnest_core::trackers::keys;
use wellnest_core::{Config, PhaseSequencer, Sequence};

use super::{live, print_json, tick_period};

#[derive(Subcommand)]
pub enum StretchAction {
    /// List the routine in its saved order
    List,
    /// Save a new order, naming every stretch id once
    Reorder {
        /// Stretch ids in the new order
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Run the routine in real time
    Run {
        /// Override the tick period in milliseconds
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Forget the saved order
    ResetOrder,
}

/// The configured routine with the user's saved order applied.
///
/// A saved order that no longer matches the routine is ignored.
pub(crate) fn ordered_routine(
    db: &Database,
    config: &Config,
) -> Result<Sequence, Box<dyn std::error::Error>> {
    let sequence = config.stretch_sequence();
    let order: Vec<String> = load_json(db, keys::STRETCH_ORDER)?;
    if order.is_empty() {
        return Ok(sequence);
    }
    let mut sequencer = PhaseSequencer::from_sequence(sequence.clone())?;
    match sequencer.reorder(&order) {
        Ok(_) => Ok(sequencer.sequence().clone()),
        Err(e) => {
            warn!(error = %e, "saved stretch order no longer fits the routine");
            Ok(sequence)
        }
    }
}

pub fn run(action: StretchAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load()?;

    match action {
        StretchAction::List => {
            let routine = ordered_routine(&db, &config)?;
            print_json(&json!({
                "total_secs": routine.total_duration_secs(),
                "phases": routine.phases,
            }))?;
        }
        StretchAction::Reorder { ids } => {
            let mut sequencer = PhaseSequencer::from_sequence(ordered_routine(&db, &config)?)?;
            let event = sequencer.reorder(&ids)?;
            save_json(&db, keys::STRETCH_ORDER, &sequencer.sequence().ids())?;
            print_json(&event)?;
        }
        StretchAction::Run { tick_ms } => {
            let routine = ordered_routine(&db, &config)?;
            let finished = live::play(&db, routine, tick_period(&config, tick_ms), None)?;
            print_json(&finished.snapshot())?;
        }
        StretchAction::ResetOrder => {
            db.kv_delete(keys::STRETCH_ORDER)?;
            println!("stretch order reset");
        }
    }
    Ok(())
}
