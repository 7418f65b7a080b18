use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

use super::{keys, new_id};
use crate::chart::ChartPoint;
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepEntry {
    pub id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Hours, rounded to one decimal.
    pub duration: f64,
}

/// Hours between bedtime and wake time; a wake time earlier than bedtime
/// is taken to be the next morning.
pub fn sleep_hours(bedtime: NaiveTime, wake: NaiveTime) -> f64 {
    let start = bedtime.num_seconds_from_midnight() as i64;
    let mut end = wake.num_seconds_from_midnight() as i64;
    if end < start {
        end += 24 * 3600;
    }
    let hours = (end - start) as f64 / 3600.0;
    (hours * 10.0).round() / 10.0
}

pub struct SleepTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> SleepTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> Result<Vec<SleepEntry>, CoreError> {
        Ok(load_json(self.store, keys::SLEEP)?)
    }

    pub fn add(
        &self,
        date: NaiveDate,
        bedtime: NaiveTime,
        wake: NaiveTime,
    ) -> Result<SleepEntry, CoreError> {
        let entry = SleepEntry {
            id: new_id(),
            date,
            start_time: bedtime,
            end_time: wake,
            duration: sleep_hours(bedtime, wake),
        };
        let mut entries = self.entries()?;
        entries.push(entry.clone());
        save_json(self.store, keys::SLEEP, &entries)?;
        Ok(entry)
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(ValidationError::NotFound(id.to_string()).into());
        }
        save_json(self.store, keys::SLEEP, &entries)?;
        Ok(())
    }

    /// Mean hours across all entries, 0 when there are none.
    pub fn average_hours(&self) -> Result<f64, CoreError> {
        let entries = self.entries()?;
        if entries.is_empty() {
            return Ok(0.0);
        }
        let total: f64 = entries.iter().map(|e| e.duration).sum();
        Ok(total / entries.len() as f64)
    }

    /// The seven most recent entries by date, oldest first.
    pub fn chart(&self) -> Result<Vec<ChartPoint>, CoreError> {
        let mut entries = self.entries()?;
        entries.sort_by_key(|e| e.date);
        let skip = entries.len().saturating_sub(7);
        Ok(entries
            .into_iter()
            .skip(skip)
            .map(|e| ChartPoint::new(e.date.format("%a").to_string(), e.duration))
            .collect())
    }
}
