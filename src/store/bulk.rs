//! Bulk materializers
//!
//! Read the whole table and reshape it into a container. Every row goes
//! through the active codecs; the first row that fails to decode aborts the
//! whole read.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use crate::error::Result;
use crate::scalar::{Row, Scalar};
use crate::statement::{Statement, KEY_COLUMN, VALUE_COLUMN};

use super::Store;

impl<K, V> Store<K, V> {
    /// All keys, in the engine's row order
    pub async fn keys(&self) -> Result<Vec<K>> {
        self.collect_keys().await
    }

    /// All keys as a set (deduplicated after decoding)
    pub async fn key_set(&self) -> Result<HashSet<K>>
    where
        K: Eq + Hash,
    {
        self.collect_keys().await
    }

    /// All values, in the engine's row order
    pub async fn values(&self) -> Result<Vec<V>> {
        let rows = self.query(Statement::SelectValues, Vec::new()).await?;
        rows.into_iter()
            .map(|mut row| self.decode_value(take(&mut row, VALUE_COLUMN)))
            .collect()
    }

    /// All entries as a map
    ///
    /// If two rows decode to equal keys the row read later wins.
    pub async fn entries(&self) -> Result<HashMap<K, V>>
    where
        K: Eq + Hash,
    {
        let rows = self.query(Statement::SelectEntries, Vec::new()).await?;
        rows.into_iter()
            .map(|mut row| {
                let key = self.decode_key(take(&mut row, KEY_COLUMN))?;
                let value = self.decode_value(take(&mut row, VALUE_COLUMN))?;
                Ok((key, value))
            })
            .collect()
    }

    async fn collect_keys<C>(&self) -> Result<C>
    where
        C: FromIterator<K>,
    {
        let rows = self.query(Statement::SelectKeys, Vec::new()).await?;
        rows.into_iter()
            .map(|mut row| self.decode_key(take(&mut row, KEY_COLUMN)))
            .collect()
    }
}

fn take(row: &mut Row, column: &str) -> Scalar {
    row.take(column).unwrap_or(Scalar::Null)
}
