//! Key-value persistence used by the trackers.
//!
//! Values are JSON strings stored under fixed keys, one key per tracker.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::DatabaseError;

/// Minimal string store: the only persistence trackers rely on.
pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError>;
}

/// In-process store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Decode the JSON value under `key`, or `T::default()` when absent.
///
/// # Errors
/// `DatabaseError::Corrupt` if the stored text is not valid JSON for `T`.
pub fn load_json<T>(store: &dyn KvStore, key: &str) -> Result<T, DatabaseError>
where
    T: DeserializeOwned + Default,
{
    match store.get(key)? {
        Some(json) => serde_json::from_str(&json).map_err(|e| {
            warn!(key, error = %e, "stored value is not valid JSON");
            DatabaseError::Corrupt {
                key: key.to_string(),
                message: e.to_string(),
            }
        }),
        None => Ok(T::default()),
    }
}

/// Encode `value` as JSON under `key`.
pub fn save_json<T: Serialize + ?Sized>(
    store: &dyn KvStore,
    key: &str,
    value: &T,
) -> Result<(), DatabaseError> {
    let json = serde_json::to_string(value).map_err(|e| DatabaseError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set(key, &json)
}
