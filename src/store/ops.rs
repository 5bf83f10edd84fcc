//! Point operations
//!
//! Each operation serializes its arguments through the active codecs, runs
//! one statement, and decodes whatever comes back.

use crate::error::{CodecError, KvError, Result};
use crate::scalar::{RowSet, Scalar};
use crate::statement::{Statement, SIZE_COLUMN, VALUE_COLUMN};

use super::Store;

impl<K, V> Store<K, V> {
    /// Insert or overwrite the value for `key`
    pub async fn put(&self, key: &K, value: &V) -> Result<()> {
        let params = vec![self.encode_key(key)?, self.encode_value(value)?];
        self.run(Statement::Upsert, params).await?;
        Ok(())
    }

    /// Value stored under `key`, or `None` if there is no such row
    ///
    /// `None` only ever means "absent": a stored value that itself decodes
    /// to something empty comes back as `Some`.
    pub async fn get(&self, key: &K) -> Result<Option<V>> {
        let params = vec![self.encode_key(key)?];
        let rows = self.query(Statement::SelectEntry, params).await?;

        match rows.into_iter().next() {
            Some(mut row) => {
                let value = row.take(VALUE_COLUMN).unwrap_or(Scalar::Null);
                Ok(Some(self.decode_value(value)?))
            }
            None => Ok(None),
        }
    }

    /// Delete the row for `key`; absent keys are a no-op
    pub async fn remove(&self, key: &K) -> Result<()> {
        let params = vec![self.encode_key(key)?];
        self.run(Statement::DeleteKey, params).await?;
        Ok(())
    }

    pub async fn contains_key(&self, key: &K) -> Result<bool> {
        let params = vec![self.encode_key(key)?];
        let rows = self.query(Statement::SelectKey, params).await?;
        Ok(!rows.is_empty())
    }

    /// Number of rows in the table
    pub async fn size(&self) -> Result<usize> {
        let rows = self.query(Statement::Count, Vec::new()).await?;
        let count = rows
            .first()
            .and_then(|row| row.get(SIZE_COLUMN))
            .and_then(Scalar::as_integer)
            .ok_or_else(|| CodecError::new("row count is not an integer"))?;

        usize::try_from(count).map_err(|e| KvError::Codec(CodecError::new(e)))
    }

    /// Delete every row
    pub async fn clear(&self) -> Result<()> {
        self.run(Statement::DeleteAll, Vec::new()).await?;
        Ok(())
    }

    pub async fn is_empty(&self) -> Result<bool> {
        let rows = self.query(Statement::SelectFirstKey, Vec::new()).await?;
        Ok(rows.is_empty())
    }

    /// Run a row-returning statement
    pub(super) async fn query(&self, statement: Statement, params: Vec<Scalar>) -> Result<RowSet> {
        Ok(self.run(statement, params).await?.unwrap_or_default())
    }
}
