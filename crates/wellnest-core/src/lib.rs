//! # Wellnest Core Library
//!
//! Core logic for the Wellnest wellness tracker: a timed phase sequencer that
//! drives breathing and stretch routines, plus the daily trackers (water,
//! sleep, weight, mood, journal, meals, fitness) that sit beside it. The CLI
//! is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Sequencer**: a tick-driven state machine. One call to
//!   [`PhaseSequencer::tick`] is one second of routine time; the
//!   [`SequencerDriver`] calls it from a tokio interval.
//! - **Storage**: SQLite session log and key-value table, TOML configuration.
//! - **Trackers**: JSON documents in the key-value table, one key per tracker.
//!
//! ## Key Components
//!
//! - [`PhaseSequencer`]: sequencer state machine
//! - [`Sequence`]: validated list of phases
//! - [`Database`]: session log and key-value persistence
//! - [`Config`]: application configuration

pub mod chart;
pub mod error;
pub mod events;
pub mod sequencer;
pub mod storage;
pub mod trackers;

pub use chart::{ChartPoint, ChartRenderer, SparklineRenderer};
pub use error::{ConfigError, CoreError, DatabaseError, SequencerError, ValidationError};
pub use events::Event;
pub use sequencer::{
    BreathingPattern, Phase, PhaseSequencer, Sequence, SequencerDriver, SequencerState,
    TickResult,
};
pub use storage::{Config, Database, KvStore, MemoryStore};
