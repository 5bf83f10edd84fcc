//! Store Module
//!
//! The map-like handle over one table of one database.
//!
//! ## Responsibilities
//! - Validate names and own the open/closed lifecycle
//! - Hold the key and value codecs
//! - Wrap every statement in its own transaction (`executor`)
//! - Point operations (`ops`) and bulk reads (`bulk`)
//!
//! ## Lifecycle
//! ```text
//!   new() ──► closed ──initialize()──► open ──close()──► closed
//!                        connect()  ──►
//! ```
//! Every storage operation on a closed handle fails with `NotOpen`.
//! `initialize`, `close` and the codec setters take `&mut self`; operations
//! take `&self`, so independent operations may overlap.

mod bulk;
mod executor;
mod ops;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::codec::Codec;
use crate::config::Config;
use crate::engine::{Database, Expect};
use crate::error::{CodecError, KvError, Result};
use crate::scalar::{NativeScalar, RowSet, Scalar};
use crate::statement::Statement;

/// A key-value store backed by one SQL table
///
/// `K` and `V` are the domain key and value types. By default keys are
/// stored as native scalars and values as JSON text; both codecs can be
/// replaced at any time.
pub struct Store<K, V> {
    /// Engine configuration
    config: Config,

    /// Database name (file stem under `config.data_dir`)
    db_name: String,

    /// Table holding the rows
    table_name: String,

    /// Open connection, `None` while closed
    db: Option<Database>,

    key_codec: Codec<K>,
    value_codec: Codec<V>,
}

impl<K, V> Store<K, V>
where
    K: NativeScalar + 'static,
    V: Serialize + DeserializeOwned + 'static,
{
    /// Create a closed store with the default config and codecs
    pub fn new(db_name: impl Into<String>, table_name: impl Into<String>) -> Result<Self> {
        Self::with_config(Config::default(), db_name, table_name)
    }

    /// Create a closed store with default codecs
    pub fn with_config(config: Config, db_name: impl Into<String>, table_name: impl Into<String>) -> Result<Self> {
        Self::with_codecs(config, db_name, table_name, Codec::identity(), Codec::json())
    }

    /// Create and initialize a store with the default config and codecs
    pub async fn open_default(db_name: impl Into<String>, table_name: impl Into<String>) -> Result<Self> {
        Self::open_with_config(Config::default(), db_name, table_name).await
    }

    /// Create and initialize a store with default codecs
    pub async fn open_with_config(
        config: Config,
        db_name: impl Into<String>,
        table_name: impl Into<String>,
    ) -> Result<Self> {
        let mut store = Self::with_config(config, db_name, table_name)?;
        store.initialize().await?;
        Ok(store)
    }
}

impl<K, V> Store<K, V> {
    /// Create a closed store with explicit codecs
    ///
    /// Fails with `InvalidArgument` if either name is empty.
    pub fn with_codecs(
        config: Config,
        db_name: impl Into<String>,
        table_name: impl Into<String>,
        key_codec: Codec<K>,
        value_codec: Codec<V>,
    ) -> Result<Self> {
        let db_name = db_name.into();
        let table_name = table_name.into();

        if db_name.is_empty() {
            return Err(KvError::InvalidArgument("database name must not be empty".to_string()));
        }
        if table_name.is_empty() {
            return Err(KvError::InvalidArgument("table name must not be empty".to_string()));
        }

        Ok(Self {
            config,
            db_name,
            table_name,
            db: None,
            key_codec,
            value_codec,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Open the connection without touching the table
    ///
    /// Replaces any connection already held.
    pub fn connect(&mut self) -> Result<()> {
        let db = Database::open(&self.config, &self.db_name)?;
        self.db = Some(db);
        tracing::debug!("Store {}/{} connected", self.db_name, self.table_name);
        Ok(())
    }

    /// Open the connection and create the table if it does not exist
    ///
    /// If the table cannot be created the connection is released again, so
    /// the handle stays closed.
    pub async fn initialize(&mut self) -> Result<()> {
        self.connect()?;
        if let Err(e) = self.create_table().await {
            self.db = None;
            return Err(e);
        }
        tracing::debug!("Store {}/{} initialized", self.db_name, self.table_name);
        Ok(())
    }

    /// Release the connection; later operations fail with `NotOpen`
    pub fn close(&mut self) {
        if self.db.take().is_some() {
            tracing::debug!("Store {}/{} closed", self.db_name, self.table_name);
        }
    }

    pub fn is_open(&self) -> bool {
        self.db.is_some()
    }

    /// Create the table (no-op if it already exists)
    pub async fn create_table(&self) -> Result<()> {
        self.run(Statement::CreateTable, Vec::new()).await?;
        tracing::debug!("Table {} ready", self.table_name);
        Ok(())
    }

    /// Drop the table; fails if it does not exist
    pub async fn remove_table(&self) -> Result<()> {
        self.run(Statement::DropTable, Vec::new()).await?;
        tracing::debug!("Table {} dropped", self.table_name);
        Ok(())
    }

    // =========================================================================
    // Codec Configuration
    // =========================================================================

    pub fn set_key_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&K) -> std::result::Result<Scalar, CodecError> + Send + Sync + 'static,
    {
        self.key_codec.set_serializer(serializer);
    }

    pub fn set_key_deserializer<F>(&mut self, deserializer: F)
    where
        F: Fn(Scalar) -> std::result::Result<K, CodecError> + Send + Sync + 'static,
    {
        self.key_codec.set_deserializer(deserializer);
    }

    pub fn set_value_serializer<F>(&mut self, serializer: F)
    where
        F: Fn(&V) -> std::result::Result<Scalar, CodecError> + Send + Sync + 'static,
    {
        self.value_codec.set_serializer(serializer);
    }

    pub fn set_value_deserializer<F>(&mut self, deserializer: F)
    where
        F: Fn(Scalar) -> std::result::Result<V, CodecError> + Send + Sync + 'static,
    {
        self.value_codec.set_deserializer(deserializer);
    }

    /// Replace both halves of the key codec
    pub fn set_key_codec(&mut self, codec: Codec<K>) {
        self.key_codec = codec;
    }

    /// Replace both halves of the value codec
    pub fn set_value_codec(&mut self, codec: Codec<V>) {
        self.value_codec = codec;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn db_name(&self) -> &str {
        &self.db_name
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Run one of the fixed statements against this store's table
    async fn run(&self, statement: Statement, params: Vec<Scalar>) -> Result<Option<RowSet>> {
        debug_assert_eq!(params.len(), statement.parameter_count(), "{:?}", statement);
        let expect = if statement.returns_rows() {
            Expect::Rows
        } else {
            Expect::Nothing
        };
        self.execute(&statement.sql(&self.table_name), params, expect).await
    }

    /// Serialize a key, rejecting scalars the unique key column can't match
    ///
    /// SQLite admits many NULLs under a unique constraint and `key = NULL`
    /// never matches; NaN is bound as NULL.
    fn encode_key(&self, key: &K) -> Result<Scalar> {
        match self.key_codec.serialize(key)? {
            Scalar::Null => Err(CodecError::new("key serialized to NULL").into()),
            Scalar::Real(f) if f.is_nan() => Err(CodecError::new("key serialized to NaN").into()),
            scalar => Ok(scalar),
        }
    }

    fn encode_value(&self, value: &V) -> Result<Scalar> {
        Ok(self.value_codec.serialize(value)?)
    }

    fn decode_key(&self, scalar: Scalar) -> Result<K> {
        Ok(self.key_codec.deserialize(scalar)?)
    }

    fn decode_value(&self, scalar: Scalar) -> Result<V> {
        Ok(self.value_codec.deserialize(scalar)?)
    }
}

impl<K, V> std::fmt::Debug for Store<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("db_name", &self.db_name)
            .field("table_name", &self.table_name)
            .field("open", &self.is_open())
            .finish()
    }
}
