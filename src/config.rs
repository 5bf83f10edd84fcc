//! Configuration for kvsql
//!
//! Centralized configuration with sensible defaults.

use std::path::{Path, PathBuf};

/// Main configuration for a kvsql store
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Root directory for database files
    /// Internal structure:
    ///   {data_dir}/
    ///     └── {db_name}.db     (one SQLite file per database name)
    pub data_dir: PathBuf,

    /// Use a private in-memory database instead of a file under `data_dir`.
    /// Contents are lost when the store is closed.
    pub in_memory: bool,

    // -------------------------------------------------------------------------
    // Engine Configuration
    // -------------------------------------------------------------------------
    /// How long a statement waits on a locked database file (milliseconds)
    pub busy_timeout_ms: u64,

    /// SQLite journal mode applied when the connection opens
    pub journal_mode: JournalMode,
}

/// SQLite journaling strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Rollback journal, deleted at the end of each transaction
    Delete,

    /// Write-ahead log (readers don't block the writer)
    Wal,
}

impl JournalMode {
    /// Value for `PRAGMA journal_mode`
    pub fn as_pragma(&self) -> &'static str {
        match self {
            JournalMode::Delete => "DELETE",
            JournalMode::Wal => "WAL",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./kvsql_data"),
            in_memory: false,
            busy_timeout_ms: 5000,
            journal_mode: JournalMode::Wal,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Config for a throwaway in-memory database
    pub fn in_memory() -> Self {
        Self::builder().in_memory(true).build()
    }

    /// Path of the database file for `db_name`
    pub fn database_path(&self, db_name: &str) -> PathBuf {
        self.data_dir.join(format!("{}.db", db_name))
    }

    /// Root directory for database files
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory (root for all database files)
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_dir = path.into();
        self
    }

    /// Keep the database in memory only
    pub fn in_memory(mut self, in_memory: bool) -> Self {
        self.config.in_memory = in_memory;
        self
    }

    /// Set the busy timeout (in milliseconds)
    pub fn busy_timeout_ms(mut self, ms: u64) -> Self {
        self.config.busy_timeout_ms = ms;
        self
    }

    /// Set the journal mode
    pub fn journal_mode(mut self, mode: JournalMode) -> Self {
        self.config.journal_mode = mode;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
