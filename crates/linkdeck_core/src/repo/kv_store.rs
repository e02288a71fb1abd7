//! Key-value storage contract and backends.
//!
//! # Responsibility
//! - Provide string get/set/remove over a durable or in-memory backend.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - `set` replaces the whole value for a key in one statement.
//! - Backends never interpret stored values.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::rc::Rc;

pub type KvResult<T> = Result<T, KvError>;

/// Storage failure from a key-value backend.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
    /// Backend refused the operation (e.g. quota exceeded, storage disabled).
    Unavailable(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Unavailable(message) => write!(f, "storage not available: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Unavailable(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String key-value persistence contract.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&self, key: &str) -> KvResult<()>;
}

/// SQLite-backed store over the migrated `kv_entries` table.
#[derive(Debug, Clone, Copy)]
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// Clones share the same entries, so a test can keep a handle while a
/// repository owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryKeyValueStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
    reject_writes: Rc<Cell<bool>>,
    reject_reads: Rc<Cell<bool>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent `set`/`remove` calls fail like a full browser quota.
    pub fn set_reject_writes(&self, reject: bool) {
        self.reject_writes.set(reject);
    }

    /// Makes subsequent `get` calls fail like a locked or disabled backend.
    pub fn set_reject_reads(&self, reject: bool) {
        self.reject_reads.set(reject);
    }

    /// Returns a copy of the raw value for `key`.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }

    fn ensure_writable(&self) -> KvResult<()> {
        if self.reject_writes.get() {
            return Err(KvError::Unavailable("quota exceeded".to_string()));
        }
        Ok(())
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        if self.reject_reads.get() {
            return Err(KvError::Unavailable("storage locked".to_string()));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.ensure_writable()?;
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.ensure_writable()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, KvError, MemoryKeyValueStore};

    #[test]
    fn memory_clones_share_entries() {
        let store = MemoryKeyValueStore::new();
        let handle = store.clone();
        store.set("k", "v").unwrap();
        assert_eq!(handle.get("k").unwrap().as_deref(), Some("v"));
        handle.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn rejected_writes_leave_previous_value() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "old").unwrap();
        store.set_reject_writes(true);
        let err = store.set("k", "new").unwrap_err();
        assert!(matches!(err, KvError::Unavailable(_)));
        assert_eq!(store.raw("k").as_deref(), Some("old"));
    }

    #[test]
    fn rejected_reads_keep_entries() {
        let store = MemoryKeyValueStore::new();
        store.set("k", "v").unwrap();
        store.set_reject_reads(true);
        assert!(matches!(store.get("k"), Err(KvError::Unavailable(_))));
        assert_eq!(store.raw("k").as_deref(), Some("v"));
    }
}
