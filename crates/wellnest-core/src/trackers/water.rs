use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keys;
use crate::chart::ChartPoint;
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

pub const DEFAULT_DAILY_GOAL_ML: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CupSize {
    Small,
    Medium,
    Large,
}

impl CupSize {
    pub const ALL: [CupSize; 3] = [CupSize::Small, CupSize::Medium, CupSize::Large];

    pub fn ml(self) -> u32 {
        match self {
            CupSize::Small => 250,
            CupSize::Medium => 350,
            CupSize::Large => 500,
        }
    }
}

impl FromStr for CupSize {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "small" => Ok(CupSize::Small),
            "medium" => Ok(CupSize::Medium),
            "large" => Ok(CupSize::Large),
            other => Err(ValidationError::InvalidValue {
                field: "cup".into(),
                message: format!("'{other}' is not small, medium or large"),
            }),
        }
    }
}

type Intake = BTreeMap<NaiveDate, u32>;

/// Millilitres drunk per day.
pub struct WaterTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> WaterTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<Intake, CoreError> {
        Ok(load_json(self.store, keys::WATER)?)
    }

    /// Add `ml` to the day's total and return the new total.
    pub fn add(&self, date: NaiveDate, ml: u32) -> Result<u32, CoreError> {
        if ml == 0 {
            return Err(ValidationError::Empty("ml".into()).into());
        }
        let mut intake = self.load()?;
        let total = intake.entry(date).or_insert(0);
        *total = total.saturating_add(ml);
        let total = *total;
        save_json(self.store, keys::WATER, &intake)?;
        debug!(%date, ml, total, "water added");
        Ok(total)
    }

    pub fn intake(&self, date: NaiveDate) -> Result<u32, CoreError> {
        Ok(self.load()?.get(&date).copied().unwrap_or(0))
    }

    /// Percentage of `goal_ml` reached; may exceed 100.
    pub fn progress_pct(&self, date: NaiveDate, goal_ml: u32) -> Result<f64, CoreError> {
        if goal_ml == 0 {
            return Ok(0.0);
        }
        Ok(self.intake(date)? as f64 / goal_ml as f64 * 100.0)
    }

    /// The `n` most recent days, newest first.
    pub fn recent(&self, n: usize) -> Result<Vec<(NaiveDate, u32)>, CoreError> {
        Ok(self.load()?.into_iter().rev().take(n).collect())
    }

    /// Last `n` days in date order, for charting.
    pub fn chart(&self, n: usize) -> Result<Vec<ChartPoint>, CoreError> {
        let mut recent = self.recent(n)?;
        recent.reverse();
        Ok(recent
            .into_iter()
            .map(|(date, ml)| ChartPoint::new(date.format("%a").to_string(), ml as f64))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn add_accumulates_per_day() {
        let store = MemoryStore::new();
        let water = WaterTracker::new(&store);
        assert_eq!(water.add(day(1), CupSize::Small.ml()).unwrap(), 250);
        assert_eq!(water.add(day(1), CupSize::Large.ml()).unwrap(), 750);
        assert_eq!(water.add(day(2), 100).unwrap(), 100);
        assert_eq!(water.intake(day(1)).unwrap(), 750);
        assert_eq!(water.intake(day(3)).unwrap(), 0);
    }

    #[test]
    fn zero_ml_rejected() {
        let store = MemoryStore::new();
        assert!(WaterTracker::new(&store).add(day(1), 0).is_err());
    }

    #[test]
    fn progress_is_uncapped() {
        let store = MemoryStore::new();
        let water = WaterTracker::new(&store);
        water.add(day(1), 3000).unwrap();
        assert_eq!(water.progress_pct(day(1), 2000).unwrap(), 150.0);
        assert_eq!(water.progress_pct(day(1), 0).unwrap(), 0.0);
    }

    #[test]
    fn recent_is_newest_first() {
        let store = MemoryStore::new();
        let water = WaterTracker::new(&store);
        for d in 1..=9 {
            water.add(day(d), d * 100).unwrap();
        }
        let recent = water.recent(7).unwrap();
        assert_eq!(recent.len(), 7);
        assert_eq!(recent[0], (day(9), 900));
        assert_eq!(recent[6], (day(3), 300));

        let chart = water.chart(2).unwrap();
        assert_eq!(chart[0].value, 800.0);
        assert_eq!(chart[1].value, 900.0);
    }

    #[test]
    fn cup_size_parses_case_insensitively() {
        assert_eq!("Medium".parse::<CupSize>().unwrap(), CupSize::Medium);
        assert!("huge".parse::<CupSize>().is_err());
    }
}
