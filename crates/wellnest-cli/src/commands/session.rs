use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use tracing::warn;
use wellnest_core::storage::{load_json, save_json, Database};
use wellnest_core::trackers::{keys, FocusArea};
use wellnest_core::{Config, PhaseSequencer, Sequence};

use super::print_json;
use super::stretch::ordered_routine;

#[derive(Subcommand)]
pub enum SessionAction {
    /// Start a routine: breathing, stretch or workout:<area>
    Start {
        routine: String,
    },
    /// Advance the active routine by N seconds
    Tick {
        #[arg(default_value_t = 1)]
        count: u64,
    },
    /// Pause the active routine
    Pause,
    /// Resume a paused routine
    Resume,
    /// Reorder the active routine's phases
    Reorder {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Print the active routine's state as JSON
    Status,
    /// Return the routine to idle
    Reset,
}

#[derive(Serialize, Deserialize)]
struct ActiveSession {
    sequencer: PhaseSequencer,
    started_at: DateTime<Utc>,
}

fn sequence_for(
    routine: &str,
    db: &Database,
    config: &Config,
) -> Result<Sequence, Box<dyn std::error::Error>> {
    match routine {
        "breathing" => Ok(Sequence::breathing(config.breathing_pattern())),
        "stretch" => ordered_routine(db, config),
        other => match other.strip_prefix("workout:") {
            Some(area) => {
                let area: FocusArea = area.parse()?;
                Ok(area.template().timed_sequence()?)
            }
            None => Err(format!(
                "unknown routine '{other}' (expected breathing, stretch or workout:<area>)"
            )
            .into()),
        },
    }
}

/// The stored session, if it can be read and its state is coherent.
fn load_session(db: &Database) -> Option<ActiveSession> {
    let session: Option<ActiveSession> = load_json(db, keys::SESSION).unwrap_or_else(|e| {
        warn!(error = %e, "discarding unreadable session");
        None
    });
    session.filter(|s| {
        let ok = s.sequencer.is_consistent();
        if !ok {
            warn!("discarding inconsistent session");
        }
        ok
    })
}

fn save_session(
    db: &Database,
    session: &ActiveSession,
) -> Result<(), Box<dyn std::error::Error>> {
    save_json(db, keys::SESSION, session)?;
    Ok(())
}

fn start(db: &Database, routine: &str) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let mut sequencer = PhaseSequencer::from_sequence(sequence_for(routine, db, &config)?)?;
    if let Some(event) = sequencer.start() {
        print_json(&event)?;
    }
    save_session(
        db,
        &ActiveSession {
            sequencer,
            started_at: Utc::now(),
        },
    )
}

/// Load the active session, apply `f` and store the result.
fn with_session(
    db: &Database,
    f: impl FnOnce(&mut ActiveSession) -> Result<(), Box<dyn std::error::Error>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = load_session(db).ok_or("no active session; run `session start` first")?;
    f(&mut session)?;
    save_session(db, &session)
}

pub fn run(action: SessionAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        SessionAction::Start { routine } => start(&db, &routine),
        SessionAction::Tick { count } => with_session(&db, |session| {
            let seq = &mut session.sequencer;
            for _ in 0..count {
                let result = seq.tick();
                if let Some(event) = seq.event_for(&result) {
                    print_json(&event)?;
                }
                if result.is_finished() {
                    let sequence = seq.sequence();
                    db.record_session(
                        &sequence.name,
                        sequence.phases.len() as u64,
                        sequence.total_duration_secs(),
                        session.started_at,
                        Utc::now(),
                    )?;
                    break;
                }
            }
            print_json(&seq.snapshot())
        }),
        SessionAction::Pause => with_session(&db, |session| {
            let seq = &mut session.sequencer;
            match seq.pause() {
                Some(event) => print_json(&event),
                None => print_json(&seq.snapshot()),
            }
        }),
        SessionAction::Resume => with_session(&db, |session| {
            let seq = &mut session.sequencer;
            match seq.resume() {
                Some(event) => print_json(&event),
                None => print_json(&seq.snapshot()),
            }
        }),
        SessionAction::Reorder { ids } => with_session(&db, |session| {
            let event = session.sequencer.reorder(&ids)?;
            print_json(&event)
        }),
        SessionAction::Status => {
            with_session(&db, |session| print_json(&session.sequencer.snapshot()))
        }
        SessionAction::Reset => {
            with_session(&db, |session| print_json(&session.sequencer.reset()))
        }
    }
}
