use chrono::NaiveDate;
use serde::Serialize;

use super::{JournalTracker, Mood, MoodTracker, SleepTracker, WaterTracker, WeightTracker};
use crate::error::CoreError;
use crate::storage::KvStore;

/// One-day overview across all trackers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub date: NaiveDate,
    pub mood: Mood,
    pub mood_emoji: &'static str,
    /// Mean over every sleep entry, one decimal.
    pub average_sleep_hours: f64,
    pub latest_weight: Option<f64>,
    pub water_ml: u32,
    /// Capped at 100.
    pub water_progress_pct: f64,
    pub journal_entries: usize,
}

pub struct Dashboard<'a> {
    store: &'a dyn KvStore,
}

impl<'a> Dashboard<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn summary(&self, date: NaiveDate, water_goal_ml: u32) -> Result<DashboardSummary, CoreError> {
        let mood = MoodTracker::new(self.store).on(date)?.unwrap_or(Mood::Neutral);
        let average = SleepTracker::new(self.store).average_hours()?;
        let water = WaterTracker::new(self.store);

        Ok(DashboardSummary {
            date,
            mood,
            mood_emoji: mood.emoji(),
            average_sleep_hours: (average * 10.0).round() / 10.0,
            latest_weight: WeightTracker::new(self.store).latest()?,
            water_ml: water.intake(date)?,
            water_progress_pct: water.progress_pct(date, water_goal_ml)?.min(100.0),
            journal_entries: JournalTracker::new(self.store).entries()?.len(),
        })
    }
}
