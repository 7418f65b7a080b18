use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sequencer::SequencerState;

/// Every sequencer state change produces an Event.
/// The CLI prints them; the tick driver forwards them to its listener.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    SequenceStarted {
        sequence: String,
        phase_id: String,
        phase_label: String,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseAdvanced {
        phase_index: usize,
        phase_id: String,
        phase_label: String,
        duration_secs: u64,
        /// The sequence restarted from its first phase.
        wrapped: bool,
        at: DateTime<Utc>,
    },
    SequenceFinished {
        sequence: String,
        phases: usize,
        at: DateTime<Utc>,
    },
    SequencerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SequencerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    SequenceReordered {
        order: Vec<String>,
        /// Index of the active phase after the remap, if any.
        phase_index: Option<usize>,
        at: DateTime<Utc>,
    },
    SequencerReset {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        sequence: String,
        state: SequencerState,
        phase_index: Option<usize>,
        phase_id: Option<String>,
        phase_label: Option<String>,
        remaining_secs: u64,
        total_secs: u64,
        sequence_progress_pct: f64,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::SequenceStarted { at, .. }
            | Event::PhaseAdvanced { at, .. }
            | Event::SequenceFinished { at, .. }
            | Event::SequencerPaused { at, .. }
            | Event::SequencerResumed { at, .. }
            | Event::SequenceReordered { at, .. }
            | Event::SequencerReset { at }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
