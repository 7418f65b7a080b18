//! Daily health trackers.
//!
//! Each tracker is a thin view over a [`KvStore`](crate::storage::KvStore):
//! it loads one JSON value, applies a change and writes it back. Keys are
//! listed in [`keys`].

pub mod dashboard;
pub mod fitness;
pub mod journal;
pub mod meals;
pub mod mood;
pub mod sleep;
pub mod water;
pub mod weight;

pub use dashboard::{Dashboard, DashboardSummary};
pub use fitness::{Exercise, FitnessGoals, FitnessPlanner, FocusArea, WorkoutTemplate};
pub use journal::{JournalEntry, JournalTracker, MoodLevel};
pub use meals::{Meal, MealCategory, MealSuggestion, MealTracker};
pub use mood::{Mood, MoodTracker};
pub use sleep::{SleepEntry, SleepTracker};
pub use water::{CupSize, WaterTracker};
pub use weight::{WeightEntry, WeightTracker};

/// Storage keys, one per tracker.
pub mod keys {
    pub const WATER: &str = "waterIntake";
    pub const SLEEP: &str = "sleepEntries";
    pub const WEIGHT: &str = "weightEntries";
    pub const WEIGHT_GOAL: &str = "weightGoal";
    pub const MOOD: &str = "moodHistory";
    pub const JOURNAL: &str = "journalEntries";
    pub const MEALS: &str = "meals";
    pub const FITNESS_PLAN: &str = "fitnessPlan";
    pub const STRETCH_ORDER: &str = "stretchOrder";
    pub const SESSION: &str = "activeSession";
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
