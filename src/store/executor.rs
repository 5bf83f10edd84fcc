//! Transaction executor
//!
//! Turns one blocking engine transaction into a future that settles exactly
//! once, with rows, with nothing, or with an error.

use tokio::task;

use crate::engine::Expect;
use crate::error::{KvError, Result};
use crate::scalar::{RowSet, Scalar};

use super::Store;

impl<K, V> Store<K, V> {
    /// Execute a single parameterized statement in its own transaction
    ///
    /// Fails with `NotOpen` before anything is submitted if the handle is
    /// closed. The statement runs on tokio's blocking pool; once submitted
    /// it runs to completion or failure and cannot be cancelled.
    ///
    /// Returns `Some(rows)` for `Expect::Rows` and `None` for
    /// `Expect::Nothing`.
    pub async fn execute(&self, sql: &str, params: Vec<Scalar>, expect: Expect) -> Result<Option<RowSet>> {
        let db = match &self.db {
            Some(db) => db.clone(),
            None => {
                return Err(KvError::NotOpen {
                    table: self.table_name.clone(),
                })
            }
        };

        tracing::trace!("Executing on {}: {} ({} params)", self.table_name, sql, params.len());

        let sql_owned = sql.to_string();
        let outcome = task::spawn_blocking(move || db.transaction(&sql_owned, &params, expect))
            .await
            .map_err(|e| KvError::TaskFailed(e.to_string()))?;

        if let Err(e) = &outcome {
            tracing::warn!("Statement on {} failed: {}", self.table_name, e);
        }

        outcome
    }
}
