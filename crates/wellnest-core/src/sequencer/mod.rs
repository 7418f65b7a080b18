mod driver;
mod engine;
mod phase;

pub use driver::{SequencerDriver, TICK_PERIOD};
pub use engine::{PhaseSequencer, SequencerState, TickResult};
pub use phase::{BreathingPattern, Phase, Sequence};
