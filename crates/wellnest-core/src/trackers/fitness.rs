use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keys;
use crate::error::{CoreError, SequencerError, ValidationError};
use crate::sequencer::{Phase, Sequence};
use crate::storage::{load_json, save_json, KvStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusArea {
    #[serde(rename = "Full Body")]
    FullBody,
    #[serde(rename = "Upper Body")]
    UpperBody,
    #[serde(rename = "Lower Body")]
    LowerBody,
    Core,
    Cardio,
}

impl FocusArea {
    pub const ALL: [FocusArea; 5] = [
        FocusArea::FullBody,
        FocusArea::UpperBody,
        FocusArea::LowerBody,
        FocusArea::Core,
        FocusArea::Cardio,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FocusArea::FullBody => "Full Body",
            FocusArea::UpperBody => "Upper Body",
            FocusArea::LowerBody => "Lower Body",
            FocusArea::Core => "Core",
            FocusArea::Cardio => "Cardio",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            FocusArea::FullBody => "🏋️",
            FocusArea::UpperBody => "💪",
            FocusArea::LowerBody => "🦵",
            FocusArea::Core => "🧘",
            FocusArea::Cardio => "🏃",
        }
    }

    pub fn template(self) -> WorkoutTemplate {
        let ex = Exercise::new;
        match self {
            FocusArea::FullBody => WorkoutTemplate {
                area: self,
                exercises: vec![
                    ex("Push-ups", 3, 12, 0),
                    ex("Squats", 3, 15, 0),
                    ex("Plank", 3, 1, 45),
                    ex("Jumping Jacks", 3, 20, 0),
                ],
                calories: 180,
                steps: 9500,
            },
            FocusArea::UpperBody => WorkoutTemplate {
                area: self,
                exercises: vec![
                    ex("Push-ups", 4, 12, 0),
                    ex("Diamond Push-ups", 3, 10, 0),
                    ex("Plank", 3, 1, 60),
                    ex("Arm Circles", 3, 20, 0),
                ],
                calories: 150,
                steps: 8000,
            },
            FocusArea::LowerBody => WorkoutTemplate {
                area: self,
                exercises: vec![
                    ex("Squats", 4, 15, 0),
                    ex("Lunges", 3, 12, 0),
                    ex("Jumping Jacks", 3, 25, 0),
                    ex("Wall Sit", 3, 1, 45),
                ],
                calories: 200,
                steps: 10000,
            },
            FocusArea::Core => WorkoutTemplate {
                area: self,
                exercises: vec![
                    ex("Plank", 3, 1, 60),
                    ex("Crunches", 3, 20, 0),
                    ex("Mountain Climbers", 3, 30, 0),
                    ex("Russian Twists", 3, 20, 0),
                ],
                calories: 120,
                steps: 7000,
            },
            FocusArea::Cardio => WorkoutTemplate {
                area: self,
                exercises: vec![
                    ex("Jump Rope", 3, 100, 0),
                    ex("High Knees", 3, 40, 0),
                    ex("Burpees", 3, 15, 0),
                    ex("Mountain Climbers", 3, 30, 0),
                ],
                calories: 220,
                steps: 12000,
            },
        }
    }
}

impl fmt::Display for FocusArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FocusArea {
    type Err = ValidationError;

    /// Accepts "Full Body", "full-body", "fullbody" and so on.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let squash = |v: &str| -> String {
            v.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .collect::<String>()
                .to_ascii_lowercase()
        };
        let wanted = squash(s);
        FocusArea::ALL
            .into_iter()
            .find(|a| squash(a.name()) == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "focus".into(),
                message: format!("unknown focus area '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    /// Seconds per set for held exercises, 0 for counted ones.
    pub duration_secs: u64,
}

impl Exercise {
    pub fn new(name: &str, sets: u32, reps: u32, duration_secs: u64) -> Self {
        Self {
            name: name.to_string(),
            sets,
            reps,
            duration_secs,
        }
    }

    pub fn is_timed(&self) -> bool {
        self.duration_secs > 0
    }

    /// "3 sets × 12 reps" or "3 sets × 45 sec".
    pub fn summary(&self) -> String {
        if self.is_timed() {
            format!("{} sets × {} sec", self.sets, self.duration_secs)
        } else {
            format!("{} sets × {} reps", self.sets, self.reps)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutTemplate {
    pub area: FocusArea,
    pub exercises: Vec<Exercise>,
    pub calories: u32,
    pub steps: u32,
}

impl WorkoutTemplate {
    /// One phase per set of every held exercise.
    ///
    /// # Errors
    /// `InvalidSequence` when the template has no held exercises.
    pub fn timed_sequence(&self) -> Result<Sequence, SequencerError> {
        let phases: Vec<Phase> = self
            .exercises
            .iter()
            .filter(|e| e.is_timed())
            .flat_map(|e| {
                let slug = slug(&e.name);
                (1..=e.sets).map(move |set| {
                    Phase::new(
                        format!("{slug}-{set}"),
                        format!("{} (set {set}/{})", e.name, e.sets),
                        e.duration_secs,
                    )
                })
            })
            .collect();
        if phases.is_empty() {
            return Err(SequencerError::InvalidSequence(format!(
                "{} has no timed exercises",
                self.area
            )));
        }
        Sequence::new(format!("workout:{}", self.area), phases, false)
    }
}

fn slug(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Answers collected by the plan questionnaire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FitnessGoals {
    pub goal: String,
    pub experience: String,
    /// Sessions per week, as entered.
    pub frequency: String,
    /// Minutes per session, as entered.
    pub duration: String,
    #[serde(default)]
    pub focus: Vec<FocusArea>,
}

pub struct FitnessPlanner<'a> {
    store: &'a dyn KvStore,
}

impl<'a> FitnessPlanner<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn save(&self, goals: &FitnessGoals) -> Result<(), CoreError> {
        if goals.focus.is_empty() {
            return Err(ValidationError::Empty("focus".into()).into());
        }
        save_json(self.store, keys::FITNESS_PLAN, goals)?;
        debug!(focus = goals.focus.len(), "fitness plan saved");
        Ok(())
    }

    pub fn load(&self) -> Result<Option<FitnessGoals>, CoreError> {
        Ok(load_json(self.store, keys::FITNESS_PLAN)?)
    }

    /// Templates for each focus area in the stored plan, in plan order.
    pub fn workouts(&self) -> Result<Vec<WorkoutTemplate>, CoreError> {
        let Some(goals) = self.load()? else {
            return Ok(Vec::new());
        };
        let mut seen = Vec::new();
        Ok(goals
            .focus
            .into_iter()
            .filter(|area| {
                if seen.contains(area) {
                    false
                } else {
                    seen.push(*area);
                    true
                }
            })
            .map(FocusArea::template)
            .collect())
    }

    pub fn timed_sequence(&self, area: FocusArea) -> Result<Sequence, SequencerError> {
        area.template().timed_sequence()
    }
}
