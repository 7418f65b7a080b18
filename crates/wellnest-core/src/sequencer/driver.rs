//! Tokio host for a [`PhaseSequencer`].
//!
//! The driver supplies the one-tick-per-period cadence. Ticks and commands
//! share one mutex, so they never overlap. The liveness flag is cleared
//! under that mutex during teardown, which makes any tick that was already
//! scheduled a no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::engine::PhaseSequencer;
use crate::events::Event;

/// Default tick period.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct SequencerDriver {
    shared: Arc<Mutex<PhaseSequencer>>,
    alive: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SequencerDriver {
    /// Spawn the tick task on the current tokio runtime.
    ///
    /// The first tick fires one `period` after this call. Events produced by
    /// ticks are sent to `events`; the task keeps ticking if the receiver is
    /// dropped and stops once a non-cyclic sequence finishes.
    pub fn spawn(
        sequencer: PhaseSequencer,
        period: Duration,
        events: UnboundedSender<Event>,
    ) -> Self {
        let shared = Arc::new(Mutex::new(sequencer));
        let alive = Arc::new(AtomicBool::new(true));

        let task_shared = Arc::clone(&shared);
        let task_alive = Arc::clone(&alive);
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut seq = lock(&task_shared);
                if !task_alive.load(Ordering::Acquire) {
                    debug!("tick after teardown ignored");
                    break;
                }
                let result = seq.tick();
                if let Some(event) = seq.event_for(&result) {
                    let _ = events.send(event);
                }
                if result.is_finished() {
                    break;
                }
            }
        });

        Self {
            shared,
            alive,
            handle: Some(handle),
        }
    }

    /// Run a command against the sequencer between ticks.
    ///
    /// Returns `None` once the driver has been torn down.
    pub fn with<R>(&self, f: impl FnOnce(&mut PhaseSequencer) -> R) -> Option<R> {
        let mut seq = lock(&self.shared);
        if !self.alive.load(Ordering::Acquire) {
            return None;
        }
        Some(f(&mut seq))
    }

    /// Clone of the current sequencer state.
    pub fn snapshot(&self) -> PhaseSequencer {
        lock(&self.shared).clone()
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Stop the cadence. Idempotent.
    pub fn teardown(&mut self) {
        {
            let _guard = lock(&self.shared);
            if !self.alive.swap(false, Ordering::AcqRel) {
                return;
            }
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
        info!("sequencer driver torn down");
    }

    /// Wait for the tick task to end (non-cyclic sequence finished or
    /// teardown), then hand back the final state.
    pub async fn finish(mut self) -> PhaseSequencer {
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
        self.alive.store(false, Ordering::Release);
        lock(&self.shared).clone()
    }
}

impl Drop for SequencerDriver {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn lock(shared: &Mutex<PhaseSequencer>) -> MutexGuard<'_, PhaseSequencer> {
    // Commands never panic mid-mutation, so a poisoned guard still holds a
    // consistent sequencer.
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
