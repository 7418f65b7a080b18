//! End-to-end runs of the built-in routines through the public API.

use wellnest_core::events::Event;
use wellnest_core::sequencer::{
    BreathingPattern, Phase, PhaseSequencer, Sequence, SequencerState, TickResult,
};

fn run(seq: &mut PhaseSequencer, ticks: u64) -> Vec<TickResult> {
    (0..ticks).map(|_| seq.tick()).collect()
}

#[test]
fn test_breathing_cycle_takes_twenty_ticks() {
    let mut seq =
        PhaseSequencer::from_sequence(Sequence::breathing(BreathingPattern::default())).unwrap();
    seq.start().unwrap();

    let results = run(&mut seq, 20);
    let labels: Vec<&str> = results
        .iter()
        .filter_map(|r| r.new_phase().map(|p| p.label.as_str()))
        .collect();
    assert_eq!(labels, vec!["Hold", "Breathe Out", "Rest", "Breathe In"]);

    // The zero-second rest phase is active for exactly one tick.
    assert!(matches!(
        results[19],
        TickResult::Advanced { index: 0, wrapped: true, .. }
    ));
    assert_eq!(seq.current_index(), Some(0));
    assert_eq!(seq.remaining_secs(), 4);
    assert_eq!(seq.cycles_completed(), 1);
    assert!(seq.is_running());
}

#[test]
fn test_breathing_never_finishes() {
    let mut seq =
        PhaseSequencer::from_sequence(Sequence::breathing(BreathingPattern::default())).unwrap();
    seq.start();
    let results = run(&mut seq, 20 * 50);
    assert!(results.iter().all(|r| !r.is_finished()));
    assert_eq!(seq.cycles_completed(), 50);
}

#[test]
fn test_stretch_routine_finishes_after_180_ticks() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    assert_eq!(seq.sequence().total_duration_secs(), 180);
    seq.start();

    let results = run(&mut seq, 179);
    assert!(results.iter().all(|r| !r.is_finished()));
    assert_eq!(seq.current_phase().unwrap().label, "Hamstring Stretch");
    assert_eq!(seq.remaining_secs(), 1);

    assert_eq!(seq.tick(), TickResult::Finished);
    assert_eq!(seq.state(), SequencerState::Finished);
    assert!(!seq.is_running());
    assert_eq!(seq.current_index(), None);
    assert_eq!(seq.tick(), TickResult::Idle);
    assert_eq!(seq.sequence_progress_pct(), 100.0);
}

#[test]
fn test_finished_sequence_can_restart() {
    let mut seq = PhaseSequencer::new(vec![Phase::new("only", "Only", 2)], false).unwrap();
    seq.start();
    run(&mut seq, 2);
    assert!(seq.is_finished());
    assert!(seq.start().is_some());
    assert_eq!(seq.remaining_secs(), 2);
}

#[test]
fn test_reorder_mid_stretch_keeps_active_phase() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    seq.start();
    run(&mut seq, 40); // 30s neck, then 10s into shoulder rolls
    assert_eq!(seq.current_phase().unwrap().id, "2");
    assert_eq!(seq.remaining_secs(), 20);

    let event = seq.reorder(&["5", "4", "3", "2", "1"]).unwrap();
    match event {
        Event::SequenceReordered {
            order, phase_index, ..
        } => {
            assert_eq!(order, vec!["5", "4", "3", "2", "1"]);
            assert_eq!(phase_index, Some(3));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(seq.remaining_secs(), 20);

    // Shoulder rolls is now second to last: 20 + 30 (neck) ticks remain.
    let results = run(&mut seq, 50);
    assert!(results[49].is_finished());
}

#[test]
fn test_identity_reorder_changes_nothing() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    seq.start();
    run(&mut seq, 12);
    let before = seq.clone();
    seq.reorder(&before.sequence().ids()).unwrap();
    assert_eq!(seq, before);
}

#[test]
fn test_rejected_reorders_leave_state_alone() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    seq.start();
    let before = seq.clone();
    assert!(seq.reorder(&["1", "2", "3", "4"]).is_err());
    assert!(seq.reorder(&["1", "2", "3", "4", "9"]).is_err());
    assert!(seq.reorder(&["1", "2", "3", "4", "4"]).is_err());
    assert_eq!(seq, before);
}

#[test]
fn test_pause_freezes_countdown() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    seq.start();
    run(&mut seq, 5);
    seq.pause().unwrap();
    assert!(run(&mut seq, 100).iter().all(|r| *r == TickResult::Idle));
    assert_eq!(seq.remaining_secs(), 25);
    seq.resume().unwrap();
    assert_eq!(seq.tick(), TickResult::Counted { remaining_secs: 24 });
}

#[test]
fn test_sequencer_survives_json_roundtrip() {
    let mut seq = PhaseSequencer::from_sequence(Sequence::default_stretches()).unwrap();
    seq.start();
    run(&mut seq, 33);
    let json = serde_json::to_string(&seq).unwrap();
    let restored: PhaseSequencer = serde_json::from_str(&json).unwrap();
    assert!(restored.is_consistent());
    assert_eq!(restored, seq);
}
