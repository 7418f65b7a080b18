//! Real-time playback of a sequence on a tokio interval.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::{debug, info};
use wellnest_core::events::Event;
use wellnest_core::storage::Database;
use wellnest_core::{PhaseSequencer, Sequence, SequencerDriver};

/// Play `sequence` until it finishes, or for `cycles` passes when it is
/// cyclic. Each event is printed as one JSON line. A completed run is
/// recorded in the session log.
pub(crate) fn play(
    db: &Database,
    sequence: Sequence,
    period: Duration,
    cycles: Option<u64>,
) -> Result<PhaseSequencer, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let routine = sequence.name.clone();
    let phases = sequence.phases.len() as u64;
    let pass_secs = sequence.total_duration_secs();
    let cyclic = sequence.cyclic;
    let started_at = Utc::now();

    let mut sequencer = PhaseSequencer::from_sequence(sequence)?;
    if let Some(event) = sequencer.start() {
        emit(&event)?;
    }

    let finished = runtime.block_on(async {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut driver = SequencerDriver::spawn(sequencer, period, tx);

        while let Some(event) = rx.recv().await {
            emit(&event)?;
            if let (Event::PhaseAdvanced { wrapped: true, .. }, Some(limit)) = (&event, cycles) {
                let done = driver.with(|s| s.cycles_completed()).unwrap_or(limit);
                debug!(done, limit, "cycle completed");
                if done >= limit {
                    driver.teardown();
                    break;
                }
            }
        }
        Ok::<_, Box<dyn std::error::Error>>(driver.finish().await)
    })?;

    let completed_passes = if cyclic {
        cycles.filter(|&limit| finished.cycles_completed() >= limit)
    } else {
        finished.is_finished().then_some(1)
    };
    if let Some(passes) = completed_passes {
        let id = db.record_session(
            &routine,
            phases,
            pass_secs * passes,
            started_at,
            Utc::now(),
        )?;
        info!(id, routine = %routine, "session recorded");
    }
    Ok(finished)
}

fn emit(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}
