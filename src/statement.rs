//! Statement definitions
//!
//! The fixed set of statements a store issues. Only the table name is ever
//! spliced into statement text, and it is always quoted as an identifier;
//! keys and values travel as bound parameters.
//!
//! ## Statements
//! ```text
//! Upsert          INSERT OR REPLACE INTO t (key, value) VALUES (?, ?)
//! SelectEntry     SELECT key, value FROM t WHERE key = ?
//! DeleteKey       DELETE FROM t WHERE key = ?
//! SelectKey       SELECT key FROM t WHERE key = ?
//! DeleteAll       DELETE FROM t
//! Count           SELECT COUNT(*) AS size FROM t
//! SelectKeys      SELECT key FROM t
//! SelectValues    SELECT value FROM t
//! SelectEntries   SELECT key, value FROM t
//! SelectFirstKey  SELECT key FROM t LIMIT 1
//! CreateTable     CREATE TABLE IF NOT EXISTS t (key unique, value)
//! DropTable       DROP TABLE t
//! ```

/// Column holding serialized keys
pub const KEY_COLUMN: &str = "key";

/// Column holding serialized values
pub const VALUE_COLUMN: &str = "value";

/// Alias of the row count column
pub const SIZE_COLUMN: &str = "size";

/// Statement kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statement {
    Upsert,
    SelectEntry,
    DeleteKey,
    SelectKey,
    DeleteAll,
    Count,
    SelectKeys,
    SelectValues,
    SelectEntries,
    SelectFirstKey,
    CreateTable,
    DropTable,
}

impl Statement {
    /// Render the statement text for `table`
    pub fn sql(&self, table: &str) -> String {
        let t = quote_identifier(table);
        match self {
            Statement::Upsert => format!("INSERT OR REPLACE INTO {} (key, value) VALUES (?, ?)", t),
            Statement::SelectEntry => format!("SELECT key, value FROM {} WHERE key = ?", t),
            Statement::DeleteKey => format!("DELETE FROM {} WHERE key = ?", t),
            Statement::SelectKey => format!("SELECT key FROM {} WHERE key = ?", t),
            Statement::DeleteAll => format!("DELETE FROM {}", t),
            Statement::Count => format!("SELECT COUNT(*) AS size FROM {}", t),
            Statement::SelectKeys => format!("SELECT key FROM {}", t),
            Statement::SelectValues => format!("SELECT value FROM {}", t),
            Statement::SelectEntries => format!("SELECT key, value FROM {}", t),
            Statement::SelectFirstKey => format!("SELECT key FROM {} LIMIT 1", t),
            Statement::CreateTable => format!("CREATE TABLE IF NOT EXISTS {} (key unique, value)", t),
            Statement::DropTable => format!("DROP TABLE {}", t),
        }
    }

    /// Number of positional parameters the statement binds
    pub fn parameter_count(&self) -> usize {
        match self {
            Statement::Upsert => 2,
            Statement::SelectEntry | Statement::DeleteKey | Statement::SelectKey => 1,
            _ => 0,
        }
    }

    /// Whether the caller needs the result rows
    pub fn returns_rows(&self) -> bool {
        matches!(
            self,
            Statement::SelectEntry
                | Statement::SelectKey
                | Statement::Count
                | Statement::SelectKeys
                | Statement::SelectValues
                | Statement::SelectEntries
                | Statement::SelectFirstKey
        )
    }
}

/// Quote a table name as an SQL identifier (`"name"`, inner quotes doubled)
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
