//! Codec Module
//!
//! Pluggable serialization between domain values and stored scalars.
//!
//! A store holds two independent codecs: one for keys, one for values. Each
//! codec is a (serialize, deserialize) pair of plain functions, and either
//! half can be swapped at runtime. Nothing re-encodes rows that were written
//! under a previous codec.
//!
//! ## Defaults
//! - keys:   identity (the key is stored as the engine's native scalar)
//! - values: JSON text

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CodecError;
use crate::scalar::{NativeScalar, Scalar};

/// Serializer half of a codec
pub type Serializer<T> = Arc<dyn Fn(&T) -> Result<Scalar, CodecError> + Send + Sync>;

/// Deserializer half of a codec
pub type Deserializer<T> = Arc<dyn Fn(Scalar) -> Result<T, CodecError> + Send + Sync>;

/// A (serialize, deserialize) pair for one domain type
pub struct Codec<T> {
    serialize: Serializer<T>,
    deserialize: Deserializer<T>,
}

impl<T> Codec<T> {
    /// Build a codec from two functions
    pub fn new<S, D>(serialize: S, deserialize: D) -> Self
    where
        S: Fn(&T) -> Result<Scalar, CodecError> + Send + Sync + 'static,
        D: Fn(Scalar) -> Result<T, CodecError> + Send + Sync + 'static,
    {
        Self {
            serialize: Arc::new(serialize),
            deserialize: Arc::new(deserialize),
        }
    }

    pub fn serialize(&self, value: &T) -> Result<Scalar, CodecError> {
        (self.serialize)(value)
    }

    pub fn deserialize(&self, scalar: Scalar) -> Result<T, CodecError> {
        (self.deserialize)(scalar)
    }

    /// Replace the serializer, keeping the deserializer
    pub fn set_serializer<S>(&mut self, serialize: S)
    where
        S: Fn(&T) -> Result<Scalar, CodecError> + Send + Sync + 'static,
    {
        self.serialize = Arc::new(serialize);
    }

    /// Replace the deserializer, keeping the serializer
    pub fn set_deserializer<D>(&mut self, deserialize: D)
    where
        D: Fn(Scalar) -> Result<T, CodecError> + Send + Sync + 'static,
    {
        self.deserialize = Arc::new(deserialize);
    }
}

impl<T: NativeScalar + 'static> Codec<T> {
    /// Store values as the engine's native scalar, unchanged
    pub fn identity() -> Self {
        Self::new(identity_serialize::<T>, identity_deserialize::<T>)
    }
}

impl<T: Serialize + DeserializeOwned + 'static> Codec<T> {
    /// Store values as JSON text
    pub fn json() -> Self {
        Self::new(json_serialize::<T>, json_deserialize::<T>)
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            serialize: Arc::clone(&self.serialize),
            deserialize: Arc::clone(&self.deserialize),
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec").finish_non_exhaustive()
    }
}

// =============================================================================
// Default Codec Functions
// =============================================================================

pub fn identity_serialize<T: NativeScalar>(value: &T) -> Result<Scalar, CodecError> {
    Ok(value.to_scalar())
}

pub fn identity_deserialize<T: NativeScalar>(scalar: Scalar) -> Result<T, CodecError> {
    T::from_scalar(scalar)
}

pub fn json_serialize<T: Serialize>(value: &T) -> Result<Scalar, CodecError> {
    Ok(Scalar::Text(serde_json::to_string(value)?))
}

/// Decode a JSON-encoded value
///
/// Text and blob cells are parsed as JSON documents. Integer, real and null
/// cells (written by some other codec or by hand) are read as the matching
/// JSON number or null.
pub fn json_deserialize<T: DeserializeOwned>(scalar: Scalar) -> Result<T, CodecError> {
    let value = match scalar {
        Scalar::Text(text) => return Ok(serde_json::from_str(&text)?),
        Scalar::Blob(bytes) => return Ok(serde_json::from_slice(&bytes)?),
        Scalar::Null => serde_json::Value::Null,
        Scalar::Integer(i) => serde_json::Value::from(i),
        Scalar::Real(f) => serde_json::Value::from(f),
    };
    Ok(serde_json::from_value(value)?)
}
