//! SQLite-backed key/value cache for API payloads.
//!
//! Entries never expire and are never evicted; staleness is surfaced to the
//! user as a timestamp, not enforced as a TTL. A write always replaces the
//! previous entry for its key.

use anyhow::Result;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde_json::Value;
use std::path::Path;

/// A cached payload and the instant it was written.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub cached_at: DateTime<Utc>,
    pub value: Value,
}

/// Durable cache keyed by composite resource keys (see [`crate::keys`]).
pub struct CacheStore {
    conn: Mutex<Connection>,
}

impl CacheStore {
    /// Open (or create) the cache database at the given path.
    ///
    /// # Errors
    /// Fails if the database cannot be opened or the schema created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory store for tests and ephemeral sessions.
    ///
    /// # Errors
    /// Fails if the database cannot be opened or the schema created.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.lock().execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS cache_entries (
                key TEXT PRIMARY KEY,
                value_json TEXT NOT NULL,
                cached_at INTEGER NOT NULL
            );
            "#,
        )?;
        Ok(())
    }

    /// Overwrite the entry for `key`, stamped with the current time.
    ///
    /// Best-effort: a storage failure is logged and dropped so it can never
    /// block fresh data from being surfaced.
    pub fn put(&self, key: &str, value: &Value) {
        if let Err(e) = self.try_put(key, value) {
            tracing::warn!("cache write for {} dropped: {}", key, e);
        }
    }

    fn try_put(&self, key: &str, value: &Value) -> Result<()> {
        let value_json = serde_json::to_string(value)?;
        let now = Utc::now().timestamp_millis();
        self.conn.lock().execute(
            "INSERT OR REPLACE INTO cache_entries (key, value_json, cached_at) VALUES (?1, ?2, ?3)",
            params![key, value_json, now],
        )?;
        Ok(())
    }

    /// Read an entry with its timestamp. Malformed rows read as absent.
    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let conn = self.conn.lock();
        let (value_json, cached_at_ms) = conn
            .query_row(
                "SELECT value_json, cached_at FROM cache_entries WHERE key = ?1",
                params![key],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)),
            )
            .ok()?;

        let value: Value = serde_json::from_str(&value_json).ok()?;
        let cached_at = DateTime::from_timestamp_millis(cached_at_ms)?;
        Some(CacheEntry { cached_at, value })
    }

    /// Read just the payload for `key`.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.get(key).map(|entry| entry.value)
    }
}
