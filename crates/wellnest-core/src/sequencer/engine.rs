//! Phase sequencer implementation.
//!
//! The sequencer is a tick-driven state machine. It does not use internal
//! threads or read the clock - the caller invokes `tick()` once per nominal
//! second (see [`super::SequencerDriver`] for a tokio host).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!            |
//!            +-> Finished (non-cyclic only) -> Running (restart)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches())?;
//! seq.start();
//! // Once per second:
//! let result = seq.tick();
//! ```

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::phase::{validate_phases, Phase, Sequence};
use crate::error::SequencerError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SequencerState {
    /// Created or reset; no phase is active.
    Idle,
    Running,
    Paused,
    /// A non-cyclic sequence played past its last phase.
    Finished,
}

/// What a single tick did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickResult {
    /// Not running; nothing changed.
    Idle,
    /// Same phase, one second less.
    Counted { remaining_secs: u64 },
    /// A new phase became active.
    Advanced {
        index: usize,
        phase: Phase,
        /// The sequence restarted from index 0.
        wrapped: bool,
    },
    /// The last phase of a non-cyclic sequence expired.
    Finished,
}

impl TickResult {
    pub fn phase_changed(&self) -> bool {
        matches!(self, TickResult::Advanced { .. } | TickResult::Finished)
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, TickResult::Finished)
    }

    pub fn new_phase(&self) -> Option<&Phase> {
        match self {
            TickResult::Advanced { phase, .. } => Some(phase),
            _ => None,
        }
    }
}

/// Timed phase sequencer.
///
/// Owns its sequence exclusively. `current_index` is `Some` exactly when the
/// state is `Running` or `Paused`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseSequencer {
    sequence: Sequence,
    state: SequencerState,
    current_index: Option<usize>,
    /// Seconds left in the active phase.
    remaining_secs: u64,
    #[serde(default)]
    cycles_completed: u64,
}

impl PhaseSequencer {
    /// Create an idle sequencer over `phases`.
    ///
    /// # Errors
    /// `InvalidSequence` if `phases` is empty or ids repeat.
    pub fn new(phases: Vec<Phase>, cyclic: bool) -> Result<Self, SequencerError> {
        Self::from_sequence(Sequence::new("custom", phases, cyclic)?)
    }

    /// Create an idle sequencer from a named sequence.
    ///
    /// # Errors
    /// `InvalidSequence` if the sequence has no phases or ids repeat.
    pub fn from_sequence(sequence: Sequence) -> Result<Self, SequencerError> {
        validate_phases(&sequence.phases)?;
        Ok(Self {
            sequence,
            state: SequencerState::Idle,
            current_index: None,
            remaining_secs: 0,
            cycles_completed: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SequencerState::Running
    }

    pub fn is_finished(&self) -> bool {
        self.state == SequencerState::Finished
    }

    pub fn is_cyclic(&self) -> bool {
        self.sequence.cyclic
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn current_phase(&self) -> Option<&Phase> {
        self.current_index.and_then(|i| self.sequence.phases.get(i))
    }

    pub fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    pub fn phases(&self) -> &[Phase] {
        &self.sequence.phases
    }

    /// Number of times a cyclic sequence wrapped back to its first phase.
    pub fn cycles_completed(&self) -> u64 {
        self.cycles_completed
    }

    /// 0.0 .. 1.0 progress within the active phase.
    pub fn phase_progress(&self) -> f64 {
        match self.current_phase() {
            Some(phase) if phase.duration_secs > 0 => {
                1.0 - (self.remaining_secs as f64 / phase.duration_secs as f64)
            }
            _ => 0.0,
        }
    }

    /// 0.0 .. 100.0 progress through one pass of the sequence.
    pub fn sequence_progress_pct(&self) -> f64 {
        if self.is_finished() {
            return 100.0;
        }
        let (Some(index), Some(phase)) = (self.current_index, self.current_phase()) else {
            return 0.0;
        };
        let total = self.sequence.total_ticks() as f64;
        let done = self.sequence.cumulative_ticks(index) as f64;
        let elapsed = phase.duration_secs.saturating_sub(self.remaining_secs) as f64;
        ((done + elapsed) / total * 100.0).min(100.0)
    }

    /// True when the fields agree with each other.
    ///
    /// Deserialized sequencers come from the kv store and may have been
    /// edited by hand; callers should discard inconsistent ones.
    pub fn is_consistent(&self) -> bool {
        if validate_phases(&self.sequence.phases).is_err() {
            return false;
        }
        match (self.state, self.current_index) {
            (SequencerState::Running | SequencerState::Paused, Some(i)) => self
                .sequence
                .phases
                .get(i)
                .is_some_and(|p| self.remaining_secs <= p.duration_secs),
            (SequencerState::Idle | SequencerState::Finished, None) => true,
            _ => false,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let phase = self.current_phase();
        Event::StateSnapshot {
            sequence: self.sequence.name.clone(),
            state: self.state,
            phase_index: self.current_index,
            phase_id: phase.map(|p| p.id.clone()),
            phase_label: phase.map(|p| p.label.clone()),
            remaining_secs: self.remaining_secs,
            total_secs: phase.map(|p| p.duration_secs).unwrap_or(0),
            sequence_progress_pct: self.sequence_progress_pct(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Enter the first phase. Allowed from `Idle` and `Finished`.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            SequencerState::Idle | SequencerState::Finished => {
                let first = self.sequence.phases.first()?;
                self.current_index = Some(0);
                self.remaining_secs = first.duration_secs;
                self.cycles_completed = 0;
                self.state = SequencerState::Running;
                info!(sequence = %self.sequence.name, phase = %first.id, "sequence started");
                Some(Event::SequenceStarted {
                    sequence: self.sequence.name.clone(),
                    phase_id: first.id.clone(),
                    phase_label: first.label.clone(),
                    duration_secs: first.duration_secs,
                    at: Utc::now(),
                })
            }
            SequencerState::Running | SequencerState::Paused => None,
        }
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> TickResult {
        if self.state != SequencerState::Running {
            return TickResult::Idle;
        }
        let Some(index) = self.current_index else {
            return TickResult::Idle;
        };
        if self.remaining_secs > 0 {
            self.remaining_secs -= 1;
            if self.remaining_secs > 0 {
                return TickResult::Counted {
                    remaining_secs: self.remaining_secs,
                };
            }
        }
        self.advance(index)
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state != SequencerState::Running {
            return None;
        }
        self.state = SequencerState::Paused;
        debug!(remaining = self.remaining_secs, "sequencer paused");
        Some(Event::SequencerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state != SequencerState::Paused {
            return None;
        }
        self.state = SequencerState::Running;
        debug!(remaining = self.remaining_secs, "sequencer resumed");
        Some(Event::SequencerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Rewrite the phase order.
    ///
    /// `order` must name every current phase id exactly once. The active
    /// phase, if any, keeps its remaining time and only its index moves.
    ///
    /// # Errors
    /// `InvalidReorder` if `order` adds, drops or repeats an id. State is
    /// left untouched.
    pub fn reorder<S: AsRef<str>>(&mut self, order: &[S]) -> Result<Event, SequencerError> {
        if let Err(err) = self.check_permutation(order) {
            warn!(%err, "reorder rejected");
            return Err(err);
        }

        let mut by_id: HashMap<&str, &Phase> = self
            .sequence
            .phases
            .iter()
            .map(|p| (p.id.as_str(), p))
            .collect();
        let phases: Vec<Phase> = order
            .iter()
            .filter_map(|id| by_id.remove(id.as_ref()).cloned())
            .collect();

        let active_id = self.current_phase().map(|p| p.id.clone());
        self.sequence.phases = phases;
        if let Some(id) = active_id {
            self.current_index = self.sequence.position(&id);
        }

        let order = self.sequence.ids();
        debug!(?order, index = ?self.current_index, "sequence reordered");
        Ok(Event::SequenceReordered {
            order,
            phase_index: self.current_index,
            at: Utc::now(),
        })
    }

    /// Return to `Idle`. Always allowed.
    pub fn reset(&mut self) -> Event {
        self.state = SequencerState::Idle;
        self.current_index = None;
        self.remaining_secs = 0;
        self.cycles_completed = 0;
        Event::SequencerReset { at: Utc::now() }
    }

    /// Describe a tick as an event, for listeners that only want changes.
    pub fn event_for(&self, result: &TickResult) -> Option<Event> {
        match result {
            TickResult::Advanced {
                index,
                phase,
                wrapped,
            } => Some(Event::PhaseAdvanced {
                phase_index: *index,
                phase_id: phase.id.clone(),
                phase_label: phase.label.clone(),
                duration_secs: phase.duration_secs,
                wrapped: *wrapped,
                at: Utc::now(),
            }),
            TickResult::Finished => Some(Event::SequenceFinished {
                sequence: self.sequence.name.clone(),
                phases: self.sequence.phases.len(),
                at: Utc::now(),
            }),
            TickResult::Idle | TickResult::Counted { .. } => None,
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self, index: usize) -> TickResult {
        let len = self.sequence.phases.len();
        let (next, wrapped) = if index + 1 < len {
            (index + 1, false)
        } else if self.sequence.cyclic {
            self.cycles_completed += 1;
            (0, true)
        } else {
            self.state = SequencerState::Finished;
            self.current_index = None;
            self.remaining_secs = 0;
            info!(sequence = %self.sequence.name, "sequence finished");
            return TickResult::Finished;
        };

        let phase = self.sequence.phases[next].clone();
        self.current_index = Some(next);
        self.remaining_secs = phase.duration_secs;
        debug!(index = next, phase = %phase.id, wrapped, "phase advanced");
        TickResult::Advanced {
            index: next,
            phase,
            wrapped,
        }
    }

    fn check_permutation<S: AsRef<str>>(&self, order: &[S]) -> Result<(), SequencerError> {
        let phases = &self.sequence.phases;
        if order.len() != phases.len() {
            return Err(SequencerError::InvalidReorder(format!(
                "expected {} ids, got {}",
                phases.len(),
                order.len()
            )));
        }
        let known: HashSet<&str> = phases.iter().map(|p| p.id.as_str()).collect();
        let mut seen: HashSet<&str> = HashSet::with_capacity(order.len());
        for id in order {
            let id = id.as_ref();
            if !known.contains(id) {
                return Err(SequencerError::InvalidReorder(format!("unknown phase id '{id}'")));
            }
            if !seen.insert(id) {
                return Err(SequencerError::InvalidReorder(format!("phase id '{id}' repeated")));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequencer::BreathingPattern;

    fn breathing() -> PhaseSequencer {
        PhaseSequencer::from_sequence(Sequence::breathing(BreathingPattern::default())).unwrap()
    }

    fn ticks(seq: &mut PhaseSequencer, n: u64) {
        for _ in 0..n {
            seq.tick();
        }
    }

    #[test]
    fn new_sequencer_is_idle() {
        let seq = breathing();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(!seq.is_running());
        assert!(seq.current_phase().is_none());
        assert_eq!(seq.remaining_secs(), 0);
    }

    #[test]
    fn empty_phase_list_rejected() {
        let err = PhaseSequencer::new(vec![], true).unwrap_err();
        assert!(matches!(err, SequencerError::InvalidSequence(_)));
    }

    #[test]
    fn start_enters_first_phase() {
        let mut seq = breathing();
        assert!(seq.start().is_some());
        assert!(seq.is_running());
        assert_eq!(seq.current_index(), Some(0));
        assert_eq!(seq.current_phase().unwrap().id, "inhale");
        assert_eq!(seq.remaining_secs(), 4);
    }

    #[test]
    fn start_while_active_is_noop() {
        let mut seq = breathing();
        seq.start();
        ticks(&mut seq, 2);
        assert!(seq.start().is_none());
        assert_eq!(seq.remaining_secs(), 2);
        seq.pause();
        assert!(seq.start().is_none());
        assert_eq!(seq.state(), SequencerState::Paused);
    }

    #[test]
    fn tick_before_start_does_nothing() {
        let mut seq = breathing();
        assert_eq!(seq.tick(), TickResult::Idle);
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn countdown_then_advance() {
        let mut seq = breathing();
        seq.start();
        assert_eq!(seq.tick(), TickResult::Counted { remaining_secs: 3 });
        ticks(&mut seq, 2);
        let result = seq.tick();
        assert!(result.phase_changed());
        assert_eq!(result.new_phase().unwrap().id, "hold");
        assert_eq!(seq.remaining_secs(), 7);
    }

    #[test]
    fn zero_phase_lasts_one_tick() {
        let mut seq = breathing();
        seq.start();
        ticks(&mut seq, 4 + 7 + 8);
        assert_eq!(seq.current_phase().unwrap().id, "rest");
        assert_eq!(seq.remaining_secs(), 0);

        let result = seq.tick();
        assert_eq!(
            result,
            TickResult::Advanced {
                index: 0,
                phase: seq.phases()[0].clone(),
                wrapped: true,
            }
        );
        assert_eq!(seq.remaining_secs(), 4);
        assert_eq!(seq.cycles_completed(), 1);
    }

    #[test]
    fn pause_and_resume_are_idempotent() {
        let mut seq = breathing();
        seq.start();
        ticks(&mut seq, 1);
        assert!(seq.pause().is_some());
        let once = seq.clone();
        assert!(seq.pause().is_none());
        assert_eq!(seq, once);

        assert_eq!(seq.tick(), TickResult::Idle);
        assert_eq!(seq.remaining_secs(), 3);

        assert!(seq.resume().is_some());
        let once = seq.clone();
        assert!(seq.resume().is_none());
        assert_eq!(seq, once);
    }

    #[test]
    fn pause_before_start_is_noop() {
        let mut seq = breathing();
        assert!(seq.pause().is_none());
        assert!(seq.resume().is_none());
        assert_eq!(seq.state(), SequencerState::Idle);
    }

    #[test]
    fn reorder_keeps_active_phase() {
        let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
        seq.start();
        ticks(&mut seq, 30 + 12);
        assert_eq!(seq.current_phase().unwrap().id, "2");
        assert_eq!(seq.remaining_secs(), 18);

        seq.reorder(&["5", "4", "3", "2", "1"]).unwrap();
        assert_eq!(seq.current_index(), Some(3));
        assert_eq!(seq.current_phase().unwrap().id, "2");
        assert_eq!(seq.remaining_secs(), 18);

        // Playback continues from the new position.
        ticks(&mut seq, 18);
        assert_eq!(seq.current_phase().unwrap().id, "1");
    }

    #[test]
    fn reorder_rejects_bad_permutations() {
        let mut seq = breathing();
        seq.start();
        let before = seq.clone();

        for order in [
            vec!["inhale", "hold", "exhale"],
            vec!["inhale", "hold", "exhale", "rest", "extra"],
            vec!["inhale", "inhale", "exhale", "rest"],
            vec!["inhale", "hold", "exhale", "sleep"],
        ] {
            let err = seq.reorder(&order).unwrap_err();
            assert!(matches!(err, SequencerError::InvalidReorder(_)));
            assert_eq!(seq, before);
        }
    }

    #[test]
    fn reorder_when_idle_only_changes_order() {
        let mut seq = breathing();
        seq.reorder(&["rest", "exhale", "hold", "inhale"]).unwrap();
        assert_eq!(seq.current_index(), None);
        seq.start();
        assert_eq!(seq.current_phase().unwrap().id, "rest");
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut seq = breathing();
        seq.start();
        ticks(&mut seq, 5);
        seq.reset();
        assert_eq!(seq.state(), SequencerState::Idle);
        assert!(seq.current_phase().is_none());
        assert!(seq.start().is_some());
    }

    #[test]
    fn progress_tracks_ticks() {
        let mut seq = PhaseSequencer::new(
            vec![Phase::new("a", "A", 10), Phase::new("b", "B", 10)],
            false,
        )
        .unwrap();
        assert_eq!(seq.sequence_progress_pct(), 0.0);
        seq.start();
        ticks(&mut seq, 5);
        assert!((seq.phase_progress() - 0.5).abs() < f64::EPSILON);
        assert!((seq.sequence_progress_pct() - 25.0).abs() < 1e-9);
        ticks(&mut seq, 15);
        assert!(seq.is_finished());
        assert_eq!(seq.sequence_progress_pct(), 100.0);
    }

    #[test]
    fn snapshot_reports_active_phase() {
        let mut seq = breathing();
        seq.start();
        match seq.snapshot() {
            Event::StateSnapshot {
                state,
                phase_index,
                phase_id,
                remaining_secs,
                total_secs,
                ..
            } => {
                assert_eq!(state, SequencerState::Running);
                assert_eq!(phase_index, Some(0));
                assert_eq!(phase_id.as_deref(), Some("inhale"));
                assert_eq!(remaining_secs, 4);
                assert_eq!(total_secs, 4);
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn serde_roundtrip_keeps_position() {
        let mut seq = breathing();
        seq.start();
        ticks(&mut seq, 6);
        let json = serde_json::to_string(&seq).unwrap();
        let restored: PhaseSequencer = serde_json::from_str(&json).unwrap();
        assert!(restored.is_consistent());
        assert_eq!(restored, seq);
    }

    #[test]
    fn inconsistent_state_detected() {
        let json = r#"{
            "sequence": {"name": "x", "cyclic": false,
                         "phases": [{"id": "a", "label": "A", "duration_secs": 3}]},
            "state": "running",
            "current_index": 4,
            "remaining_secs": 1
        }"#;
        let seq: PhaseSequencer = serde_json::from_str(json).unwrap();
        assert!(!seq.is_consistent());
    }
}
