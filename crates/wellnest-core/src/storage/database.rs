//! SQLite-based storage.
//!
//! Provides persistent storage for:
//! - Finished guided sessions (stretch routines, workouts, breathing runs)
//! - Session statistics (daily and all-time)
//! - Key-value store for tracker data and the persisted sequencer

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::data_dir;
use super::kv::KvStore;
use crate::error::DatabaseError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    /// Sequence name, e.g. "stretch" or "workout:Core".
    pub routine: String,
    pub phases: u64,
    pub duration_secs: u64,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Stats {
    pub total_sessions: u64,
    pub total_secs: u64,
    pub today_sessions: u64,
    pub today_secs: u64,
    pub sessions_by_routine: BTreeMap<String, u64>,
}

/// SQLite database for sessions and key-value data.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/wellnest/wellnest.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, DatabaseError> {
        let dir = data_dir().map_err(|e| DatabaseError::DataDir(e.to_string()))?;
        Self::open_at(&dir.join("wellnest.db"))
    }

    /// Open (or create) a database file at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS sessions (
                id            INTEGER PRIMARY KEY AUTOINCREMENT,
                routine       TEXT NOT NULL,
                phases        INTEGER NOT NULL,
                duration_secs INTEGER NOT NULL,
                started_at    TEXT NOT NULL,
                completed_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_sessions_completed_at ON sessions(completed_at);",
        )?;
        Ok(())
    }

    /// Record a finished session.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_session(
        &self,
        routine: &str,
        phases: u64,
        duration_secs: u64,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    ) -> Result<i64, DatabaseError> {
        self.conn.execute(
            "INSERT INTO sessions (routine, phases, duration_secs, started_at, completed_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                routine,
                phases,
                duration_secs,
                started_at.to_rfc3339(),
                completed_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Most recent sessions first.
    pub fn recent_sessions(&self, limit: usize) -> Result<Vec<SessionRecord>, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, routine, phases, duration_secs, started_at, completed_at
             FROM sessions
             ORDER BY completed_at DESC, id DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, u64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;

        let mut sessions = Vec::new();
        for row in rows {
            let (id, routine, phases, duration_secs, started, completed) = row?;
            sessions.push(SessionRecord {
                id,
                routine,
                phases,
                duration_secs,
                started_at: parse_ts("started_at", &started)?,
                completed_at: parse_ts("completed_at", &completed)?,
            });
        }
        Ok(sessions)
    }

    pub fn stats_today(&self) -> Result<Stats, DatabaseError> {
        self.stats_since(Some(today_start()))
    }

    pub fn stats_all(&self) -> Result<Stats, DatabaseError> {
        let mut stats = self.stats_since(None)?;
        let today = self.stats_since(Some(today_start()))?;
        stats.today_sessions = today.total_sessions;
        stats.today_secs = today.total_secs;
        Ok(stats)
    }

    fn stats_since(&self, since: Option<String>) -> Result<Stats, DatabaseError> {
        let mut stmt = self.conn.prepare(
            "SELECT routine, COUNT(*), COALESCE(SUM(duration_secs), 0)
             FROM sessions
             WHERE ?1 IS NULL OR completed_at >= ?1
             GROUP BY routine",
        )?;
        let rows = stmt.query_map(params![since], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, u64>(1)?,
                row.get::<_, u64>(2)?,
            ))
        })?;

        let is_today = since.is_some();
        let mut stats = Stats::default();
        for row in rows {
            let (routine, count, secs) = row?;
            stats.total_sessions += count;
            stats.total_secs += secs;
            if is_today {
                stats.today_sessions += count;
                stats.today_secs += secs;
            }
            stats.sessions_by_routine.insert(routine, count);
        }
        Ok(stats)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    /// Remove a key from the kv store.
    pub fn kv_delete(&self, key: &str) -> Result<(), DatabaseError> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError> {
        self.kv_get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.kv_set(key, value)
    }
}

fn today_start() -> String {
    format!("{}T00:00:00+00:00", Utc::now().format("%Y-%m-%d"))
}

fn parse_ts(column: &str, raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| DatabaseError::Corrupt {
            key: column.to_string(),
            message: e.to_string(),
        })
}
