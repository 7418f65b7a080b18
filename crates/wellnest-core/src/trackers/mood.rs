use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::keys;
use crate::error::{CoreError, ValidationError};
use crate::storage::{load_json, save_json, KvStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Calm,
    Neutral,
    Sad,
    Angry,
    Anxious,
}

impl Mood {
    pub const ALL: [Mood; 6] = [
        Mood::Happy,
        Mood::Calm,
        Mood::Neutral,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
    ];

    pub fn emoji(self) -> &'static str {
        match self {
            Mood::Happy => "😊",
            Mood::Calm => "😌",
            Mood::Neutral => "😐",
            Mood::Sad => "😔",
            Mood::Angry => "😡",
            Mood::Anxious => "😰",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl FromStr for Mood {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .into_iter()
            .find(|m| m.to_string().eq_ignore_ascii_case(s.trim()) || m.emoji() == s.trim())
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "mood".into(),
                message: format!("unknown mood '{s}'"),
            })
    }
}

/// One mood per day.
pub struct MoodTracker<'a> {
    store: &'a dyn KvStore,
}

impl<'a> MoodTracker<'a> {
    pub fn new(store: &'a dyn KvStore) -> Self {
        Self { store }
    }

    fn load(&self) -> Result<BTreeMap<NaiveDate, Mood>, CoreError> {
        Ok(load_json(self.store, keys::MOOD)?)
    }

    /// Record the day's mood, replacing any earlier choice.
    pub fn record(&self, date: NaiveDate, mood: Mood) -> Result<(), CoreError> {
        let mut history = self.load()?;
        history.insert(date, mood);
        save_json(self.store, keys::MOOD, &history)?;
        Ok(())
    }

    pub fn on(&self, date: NaiveDate) -> Result<Option<Mood>, CoreError> {
        Ok(self.load()?.get(&date).copied())
    }

    /// All recorded days, newest first.
    pub fn history(&self) -> Result<Vec<(NaiveDate, Mood)>, CoreError> {
        Ok(self.load()?.into_iter().rev().collect())
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
    fn parses_names_and_emoji() {
        assert_eq!("calm".parse::<Mood>().unwrap(), Mood::Calm);
        assert_eq!(" ANXIOUS ".parse::<Mood>().unwrap(), Mood::Anxious);
        assert_eq!("😡".parse::<Mood>().unwrap(), Mood::Angry);
        assert!("meh".parse::<Mood>().is_err());
    }

    #[test]
    fn recording_again_overwrites() {
        let store = MemoryStore::new();
        let mood = MoodTracker::new(&store);
        mood.record(day(1), Mood::Sad).unwrap();
        mood.record(day(1), Mood::Happy).unwrap();
        mood.record(day(2), Mood::Calm).unwrap();
        assert_eq!(mood.on(day(1)).unwrap(), Some(Mood::Happy));
        assert_eq!(
            mood.history().unwrap(),
            vec![(day(2), Mood::Calm), (day(1), Mood::Happy)]
        );
    }
}
