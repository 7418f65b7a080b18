use serde::{Deserialize, Serialize};

use crate::error::SequencerError;

/// One timed step of a sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Stable key used for lookups and reordering.
    pub id: String,
    pub label: String,
    /// 0 means the phase is left on the tick after it is entered.
    pub duration_secs: u64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: Option<String>,
}

impl Phase {
    pub fn new(id: impl Into<String>, label: impl Into<String>, duration_secs: u64) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            duration_secs,
            description: String::new(),
            icon: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Number of ticks this phase occupies during playback.
    pub fn ticks(&self) -> u64 {
        self.duration_secs.max(1)
    }
}

/// Breathing pattern durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPattern {
    pub inhale: u64,
    pub hold: u64,
    pub exhale: u64,
    pub rest: u64,
}

impl Default for BreathingPattern {
    /// The 4-7-8 pattern.
    fn default() -> Self {
        Self {
            inhale: 4,
            hold: 7,
            exhale: 8,
            rest: 0,
        }
    }
}

/// A named, ordered list of phases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    /// Restart at the first phase after the last one instead of finishing.
    pub cyclic: bool,
    pub phases: Vec<Phase>,
}

impl Sequence {
    /// Build a sequence, rejecting inputs no sequencer could play.
    ///
    /// # Errors
    /// `InvalidSequence` if `phases` is empty or two phases share an id.
    pub fn new(
        name: impl Into<String>,
        phases: Vec<Phase>,
        cyclic: bool,
    ) -> Result<Self, SequencerError> {
        validate_phases(&phases)?;
        Ok(Self {
            name: name.into(),
            cyclic,
            phases,
        })
    }

    pub fn breathing(pattern: BreathingPattern) -> Self {
        Self {
            name: "breathing".into(),
            cyclic: true,
            phases: vec![
                Phase::new("inhale", "Breathe In", pattern.inhale),
                Phase::new("hold", "Hold", pattern.hold),
                Phase::new("exhale", "Breathe Out", pattern.exhale),
                Phase::new("rest", "Rest", pattern.rest),
            ],
        }
    }

    /// The built-in five-stretch routine.
    pub fn default_stretches() -> Self {
        Self {
            name: "stretch".into(),
            cyclic: false,
            phases: vec![
                Phase::new("1", "Neck Stretch", 30)
                    .with_description("Gently tilt your head from side to side")
                    .with_icon("🧘‍♂️"),
                Phase::new("2", "Shoulder Rolls", 30)
                    .with_description("Roll your shoulders forward and backward")
                    .with_icon("💪"),
                Phase::new("3", "Cat-Cow Stretch", 45)
                    .with_description("Alternate between arching and rounding your back")
                    .with_icon("🐱"),
                Phase::new("4", "Hip Flexor Stretch", 40)
                    .with_description(
                        "Lunge forward with one leg while keeping the other straight",
                    )
                    .with_icon("🦵"),
                Phase::new("5", "Hamstring Stretch", 35)
                    .with_description("Sit on the floor and reach for your toes")
                    .with_icon("🧘‍♀️"),
            ],
        }
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.phases.iter().map(|p| p.duration_secs).sum()
    }

    /// Ticks needed to play the whole sequence once.
    pub fn total_ticks(&self) -> u64 {
        self.phases.iter().map(Phase::ticks).sum()
    }

    /// Ticks spent before reaching `index`.
    pub fn cumulative_ticks(&self, index: usize) -> u64 {
        self.phases.iter().take(index).map(Phase::ticks).sum()
    }

    pub fn ids(&self) -> Vec<String> {
        self.phases.iter().map(|p| p.id.clone()).collect()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.phases.iter().position(|p| p.id == id)
    }
}

pub(crate) fn validate_phases(phases: &[Phase]) -> Result<(), SequencerError> {
    if phases.is_empty() {
        return Err(SequencerError::InvalidSequence(
            "a sequence needs at least one phase".into(),
        ));
    }
    for (i, phase) in phases.iter().enumerate() {
        if phases[..i].iter().any(|p| p.id == phase.id) {
            return Err(SequencerError::InvalidSequence(format!(
                "duplicate phase id '{}'",
                phase.id
            )));
        }
    }
    Ok(())
}
