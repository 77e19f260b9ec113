use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension};
use std::path::Path;

use crate::error::StorageError;
use crate::state::DbPool;

pub const MIGRATIONS: &[(&str, &str)] = &[(
    "001_local_storage",
    include_str!("../../migrations/001_local_storage.sql"),
)];

pub fn create_pool(db_path: &Path) -> anyhow::Result<DbPool> {
    // Ensure parent directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let manager = SqliteConnectionManager::file(db_path);
    let pool = Pool::builder().max_size(4).build(manager)?;

    let conn = pool.get()?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA busy_timeout = 5000;
        ",
    )?;

    Ok(pool)
}

pub fn run_migrations(pool: &DbPool) -> anyhow::Result<()> {
    let conn = pool.get()?;

    // Create migrations tracking table
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            name TEXT PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    for (name, sql) in MIGRATIONS {
        let already_applied: bool = conn.query_row(
            "SELECT COUNT(*) > 0 FROM schema_version WHERE name = ?1",
            params![name],
            |row| row.get(0),
        )?;

        if !already_applied {
            tracing::info!("Applying migration: {}", name);
            conn.execute_batch(sql)?;
            conn.execute(
                "INSERT INTO schema_version (name) VALUES (?1)",
                params![name],
            )?;
        }
    }

    tracing::debug!("Local storage migrations complete");
    Ok(())
}

/// Which keys a batch write removes before inserting.
#[derive(Debug, Clone, Copy)]
pub enum ClearScope<'a> {
    Nothing,
    Keys(&'a [&'a str]),
    All,
}

/// Persistent key/value store playing the part of the browser's
/// `localStorage`: string keys, string values, process-wide.
#[derive(Clone)]
pub struct LocalStorage {
    pool: DbPool,
}

impl LocalStorage {
    /// Open (or create) the store at `path` and bring its schema up to date.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let pool = create_pool(path)?;
        run_migrations(&pool)?;
        Ok(Self { pool })
    }

    /// A private in-memory store. The pool is capped at one connection so
    /// every caller sees the same database.
    pub fn in_memory() -> anyhow::Result<Self> {
        let manager = SqliteConnectionManager::memory();
        let pool = Pool::builder().max_size(1).build(manager)?;
        run_migrations(&pool)?;
        Ok(Self { pool })
    }

    pub fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let conn = self.pool.get()?;
        let value = conn
            .query_row(
                "SELECT value FROM local_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    pub fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute(
            "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
               value = excluded.value,
               updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        let conn = self.pool.get()?;
        conn.execute("DELETE FROM local_storage", [])?;
        Ok(())
    }

    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let conn = self.pool.get()?;
        let mut stmt = conn.prepare("SELECT key FROM local_storage ORDER BY key")?;
        let keys = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }

    /// Clear according to `scope`, then write every pair, in one transaction.
    /// Either the whole batch lands or nothing changes.
    pub fn write_batch(
        &self,
        scope: ClearScope<'_>,
        writes: &[(&str, String)],
    ) -> Result<(), StorageError> {
        let mut conn = self.pool.get()?;
        let tx = conn.transaction()?;

        match scope {
            ClearScope::Nothing => {}
            ClearScope::Keys(keys) => {
                for key in keys {
                    tx.execute("DELETE FROM local_storage WHERE key = ?1", params![key])?;
                }
            }
            ClearScope::All => {
                tx.execute("DELETE FROM local_storage", [])?;
            }
        }

        for (key, value) in writes {
            tx.execute(
                "INSERT INTO local_storage (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                   value = excluded.value,
                   updated_at = datetime('now')",
                params![key, value],
            )?;
        }

        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_pool_creates_db_file() {
        let tmp = tempfile::tempdir().unwrap();
        let db_path = tmp.path().join("sub/dir/test.db");
        let pool = create_pool(&db_path).unwrap();
        assert!(db_path.exists());
        let conn = pool.get().unwrap();
        let mode: String = conn
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode, "wal");
    }

    #[test]
    fn migrations_are_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let pool = create_pool(&tmp.path().join("test.db")).unwrap();
        run_migrations(&pool).unwrap();
        run_migrations(&pool).unwrap();

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, MIGRATIONS.len() as i64);
    }

    #[test]
    fn set_get_remove_roundtrip() {
        let storage = LocalStorage::in_memory().unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);

        storage.set_item("token", "abc").unwrap();
        storage.set_item("token", "def").unwrap();
        assert_eq!(storage.get_item("token").unwrap().as_deref(), Some("def"));

        storage.remove_item("token").unwrap();
        assert_eq!(storage.get_item("token").unwrap(), None);
    }

    #[test]
    fn clear_removes_everything() {
        let storage = LocalStorage::in_memory().unwrap();
        storage.set_item("a", "1").unwrap();
        storage.set_item("b", "2").unwrap();
        storage.clear().unwrap();
        assert!(storage.keys().unwrap().is_empty());
    }

    #[test]
    fn write_batch_scoped_clear_keeps_other_keys() {
        let storage = LocalStorage::in_memory().unwrap();
        storage.set_item("access", "old").unwrap();
        storage.set_item("siteContent", "{}").unwrap();

        storage
            .write_batch(ClearScope::Keys(&["access"]), &[("refresh", "r".to_string())])
            .unwrap();

        assert_eq!(storage.get_item("access").unwrap(), None);
        assert_eq!(storage.get_item("refresh").unwrap().as_deref(), Some("r"));
        assert_eq!(storage.get_item("siteContent").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn write_batch_all_clears_unrelated_keys() {
        let storage = LocalStorage::in_memory().unwrap();
        storage.set_item("siteContent", "{}").unwrap();

        storage
            .write_batch(ClearScope::All, &[("access", "a".to_string())])
            .unwrap();

        assert_eq!(storage.keys().unwrap(), vec!["access".to_string()]);
    }

    #[test]
    fn data_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("store.db");
        {
            let storage = LocalStorage::open(&path).unwrap();
            storage.set_item("refresh", "r1").unwrap();
        }
        let storage = LocalStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("refresh").unwrap().as_deref(), Some("r1"));
    }
}
