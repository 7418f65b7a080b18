use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{keys, new_id};
use crate::chart::ChartPoint;
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

/// Tags offered by the journal form.
pub const COMMON_TAGS: [&str; 10] = [
    "Anxiety",
    "Stress",
    "Gratitude",
    "Exercise",
    "Work",
    "Family",
    "Friends",
    "Health",
    "Sleep",
    "Hobbies",
];

/// Mood rating attached to a journal entry, 1 (Very Low) to 5 (Great).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const NEUTRAL: MoodLevel = MoodLevel(3);

    pub fn new(value: u8) -> Result<Self, ValidationError> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ValidationError::OutOfRange {
                field: "mood".into(),
                value: value as f64,
                min: 1.0,
                max: 5.0,
            })
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Very Low",
            2 => "Low",
            3 => "Neutral",
            4 => "Good",
            _ => "Great",
        }
    }
}

impl Default for MoodLevel {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

impl TryFrom<u8> for MoodLevel {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: String,
    pub date: NaiveDate,
    pub mood: MoodLevel,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

pub struct JournalTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> JournalTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    pub fn entries(&self) -> Result<Vec<JournalEntry>, CoreError> {
        Ok(load_json(self.store, keys::JOURNAL)?)
    }

    /// Add an entry. Empty content is rejected; repeated tags are dropped.
    pub fn add(
        &self,
        date: NaiveDate,
        mood: MoodLevel,
        content: &str,
        tags: &[String],
    ) -> Result<JournalEntry, CoreError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ValidationError::Empty("content".into()).into());
        }
        let mut unique: Vec<String> = Vec::with_capacity(tags.len());
        for tag in tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !unique.iter().any(|u| u.eq_ignore_ascii_case(tag)) {
                unique.push(tag.to_string());
            }
        }

        let entry = JournalEntry {
            id: new_id(),
            date,
            mood,
            content: content.to_string(),
            tags: unique,
        };
        let mut entries = self.entries()?;
        entries.push(entry.clone());
        save_json(self.store, keys::JOURNAL, &entries)?;
        Ok(entry)
    }

    pub fn delete(&self, id: &str) -> Result<(), CoreError> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Err(ValidationError::NotFound(id.to_string()).into());
        }
        save_json(self.store, keys::JOURNAL, &entries)?;
        Ok(())
    }

    pub fn with_tag(&self, tag: &str) -> Result<Vec<JournalEntry>, CoreError> {
        Ok(self
            .entries()?
            .into_iter()
            .filter(|e| e.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)))
            .collect())
    }

    /// Mood level per entry in date order.
    pub fn mood_chart(&self) -> Result<Vec<ChartPoint>, CoreError> {
        let mut entries = self.entries()?;
        entries.sort_by_key(|e| e.date);
        Ok(entries
            .into_iter()
            .map(|e| ChartPoint::new(e.date.format("%b %d").to_string(), e.mood.value() as f64))
            .collect())
    }
}
