//! # kvsql
//!
//! A map-like key-value store layered over one table of an embedded SQL
//! database (SQLite), with:
//! - get/put/remove/contains and whole-table reads (keys, values, entries)
//! - Pluggable key and value codecs (identity and JSON by default)
//! - One transaction per statement, awaited asynchronously
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Store<K, V>                              │
//! │     put / get / remove / keys / values / entries ...         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  encode args (key codec, value codec)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                Transaction Executor                          │
//! │        (open check, spawn_blocking, one statement)           │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                    Database                                  │
//! │          (SQLite connection, BEGIN ... COMMIT)               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use kvsql::{Config, Store};
//!
//! let mut store: Store<String, serde_json::Value> =
//!     Store::with_config(Config::in_memory(), "cache", "kv")?;
//! store.initialize().await?;
//!
//! store.put(&"a".to_string(), &serde_json::json!({"x": 1})).await?;
//! assert_eq!(store.size().await?, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod scalar;
pub mod codec;
pub mod statement;
pub mod engine;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CodecError, KvError, Result};
pub use config::{Config, JournalMode};
pub use codec::Codec;
pub use engine::Expect;
pub use scalar::{NativeScalar, Row, RowSet, Scalar};
pub use store::Store;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvsql
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
