//! Engine Module
//!
//! Blocking adapter over the embedded SQL engine (SQLite).
//!
//! ## Responsibilities
//! - Open the database file (or an in-memory database) for a database name
//! - Apply connection settings (busy timeout, journal mode)
//! - Run exactly one statement per transaction, atomically
//!
//! ## Concurrency
//! The connection sits behind `Arc<Mutex<_>>`. Cloning a `Database` shares
//! the connection; the mutex is how concurrent transactions against the
//! same database are serialized. Callers add no locking of their own.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rusqlite::{params_from_iter, Connection};

use crate::config::Config;
use crate::error::{KvError, Result};
use crate::scalar::{Row, RowSet, Scalar};

/// What a transaction hands back on success
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expect {
    /// Collect the result rows
    Rows,

    /// Run for effect only
    Nothing,
}

/// An open connection to one named database
#[derive(Clone)]
pub struct Database {
    /// Shared connection (exclusive access per transaction)
    conn: Arc<Mutex<Connection>>,

    /// Where the database lives (":memory:" for in-memory databases)
    path: PathBuf,
}

impl Database {
    /// Open or create the database `db_name` as described by `config`
    ///
    /// Any failure to reach the engine is reported as `StorageUnavailable`.
    pub fn open(config: &Config, db_name: &str) -> Result<Self> {
        let (conn, path) = if config.in_memory {
            let path = PathBuf::from(":memory:");
            let conn = Connection::open_in_memory().map_err(|e| unavailable(&path, e))?;
            (conn, path)
        } else {
            fs::create_dir_all(&config.data_dir).map_err(|e| unavailable(&config.data_dir, e))?;
            let path = config.database_path(db_name);
            let conn = Connection::open(&path).map_err(|e| unavailable(&path, e))?;
            (conn, path)
        };

        conn.busy_timeout(Duration::from_millis(config.busy_timeout_ms))
            .map_err(|e| unavailable(&path, e))?;

        // In-memory databases only support MEMORY journaling
        if !config.in_memory {
            let mode: String = conn
                .pragma_update_and_check(None, "journal_mode", config.journal_mode.as_pragma(), |row| row.get(0))
                .map_err(|e| unavailable(&path, e))?;
            tracing::trace!("journal_mode={}", mode);
        }

        tracing::debug!("Opened database {} at {}", db_name, path.display());

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path,
        })
    }

    /// Run one statement inside its own transaction
    ///
    /// Steps:
    /// 1. Begin a transaction
    /// 2. Prepare the statement and check the parameter count
    /// 3. Bind parameters, step through all rows (collecting them if asked)
    /// 4. Commit
    ///
    /// An error at any step drops the transaction, which rolls it back.
    pub fn transaction(&self, sql: &str, params: &[Scalar], expect: Expect) -> Result<Option<RowSet>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;

        let outcome = {
            let mut stmt = tx.prepare(sql)?;

            let expected = stmt.parameter_count();
            if expected != params.len() {
                return Err(KvError::InvalidArgument(format!(
                    "statement expects {} parameters, got {}",
                    expected,
                    params.len()
                )));
            }

            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let mut rows = stmt.query(params_from_iter(params.iter()))?;

            match expect {
                Expect::Rows => {
                    let mut collected = Vec::new();
                    while let Some(row) = rows.next()? {
                        let mut cells = Vec::with_capacity(columns.len());
                        for (idx, name) in columns.iter().enumerate() {
                            cells.push((name.clone(), row.get::<_, Scalar>(idx)?));
                        }
                        collected.push(Row::new(cells));
                    }
                    Some(RowSet::new(collected))
                }
                Expect::Nothing => {
                    while rows.next()?.is_some() {}
                    None
                }
            }
        };

        tx.commit()?;
        Ok(outcome)
    }

    /// Where the database lives
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database").field("path", &self.path).finish()
    }
}

fn unavailable(path: &std::path::Path, err: impl std::fmt::Display) -> KvError {
    KvError::StorageUnavailable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}
