use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{keys, new_id};
use crate::chart::ChartPoint;
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub id: String,
    pub date: NaiveDate,
    /// Kilograms.
    pub weight: f64,
    #[serde(default)]
    pub note: String,
}

pub struct WeightTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> WeightTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    /// Entries in the order they were logged.
    pub fn entries(&self) -> Result<Vec<WeightEntry>, CoreError> {
        Ok(load_json(self.store, keys::WEIGHT)?)
    }

    pub fn add(&self, date: NaiveDate, kg: f64, note: &str) -> Result<WeightEntry, CoreError> {
        validate_kg("weight", kg)?;
        let entry = WeightEntry {
            id: new_id(),
            date,
            weight: kg,
            note: note.trim().to_string(),
        };
        let mut entries = self.entries()?;
        entries.push(entry.clone());
        save_json(self.store, keys::WEIGHT, &entries)?;
        Ok(entry)
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(ValidationError::NotFound(id.to_string()).into());
        }
        save_json(self.store, keys::WEIGHT, &entries)?;
        Ok(())
    }

    pub fn goal(&self) -> Result<Option<f64>, CoreError> {
        Ok(load_json(self.store, keys::WEIGHT_GOAL)?)
    }

    pub fn set_goal(&self, kg: f64) -> Result<(), CoreError> {
        validate_kg("goal", kg)?;
        save_json(self.store, keys::WEIGHT_GOAL, &kg)?;
        Ok(())
    }

    pub fn latest(&self) -> Result<Option<f64>, CoreError> {
        Ok(self.entries()?.last().map(|e| e.weight))
    }

    /// Latest minus first logged weight; 0 with fewer than two entries.
    pub fn change(&self) -> Result<f64, CoreError> {
        let entries = self.entries()?;
        match (entries.first(), entries.last()) {
            (Some(first), Some(last)) if entries.len() >= 2 => Ok(last.weight - first.weight),
            _ => Ok(0.0),
        }
    }

    /// How far the latest weight is from the goal, if both are known.
    pub fn to_goal(&self) -> Result<Option<f64>, CoreError> {
        Ok(match (self.latest()?, self.goal()?) {
            (Some(latest), Some(goal)) => Some(latest - goal),
            _ => None,
        })
    }

    pub fn chart(&self) -> Result<Vec<ChartPoint>, CoreError> {
        let mut entries = self.entries()?;
        entries.sort_by_key(|e| e.date);
        Ok(entries
            .into_iter()
            .map(|e| ChartPoint::new(e.date.format("%a").to_string(), e.weight))
            .collect())
    }
}

fn validate_kg(field: &str, kg: f64) -> Result<(), ValidationError> {
    if !kg.is_finite() || kg <= 0.0 || kg > 1000.0 {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            value: kg,
            min: 0.0,
            max: 1000.0,
        });
    }
    Ok(())
}
