//! Additional information attached to environment steps.
//!
//! [`Info`] is a key-value map carried by every [`Step`](crate::Step).
//! Wrappers in a pipeline may add entries to it, but an entry written by an
//! inner layer is never overwritten by an outer one: see [`Info::append`].
use crate::error::EnvPipeError;
use anyhow::Result;
use std::collections::{
    hash_map::{Iter, Keys},
    HashMap,
};

/// Represents possible types of values that can be stored in an [`Info`].
#[derive(Debug, Clone, PartialEq)]
pub enum InfoValue {
    /// A single floating-point value.
    Scalar(f64),

    /// An integer value, e.g., the number of remaining lives.
    Int(i64),

    /// A flag.
    Bool(bool),

    /// A 1-dimensional array of floating-point values.
    Array1(Vec<f64>),

    /// A text value.
    String(String),
}

/// A container for storing key-value pairs emitted by an environment.
///
/// # Examples
///
/// ```rust
/// use envpipe_core::{Info, InfoValue};
///
/// let mut info = Info::empty();
/// assert!(info.append("lives", InfoValue::Int(3)));
///
/// // The first value wins.
/// assert!(!info.append("lives", InfoValue::Int(2)));
/// assert_eq!(info.get_int("lives").unwrap(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Info(HashMap<String, InfoValue>);

impl Info {
    /// Creates an empty info.
    pub fn empty() -> Self {
        Self(HashMap::new())
    }

    /// Creates an info from a slice of key-value pairs.
    pub fn from_slice<K: Into<String> + Clone>(s: &[(K, InfoValue)]) -> Self {
        Self(
            s.iter()
                .map(|(k, v)| (k.clone().into(), v.clone()))
                .collect(),
        )
    }

    /// Adds a key-value pair if the key is not present yet.
    ///
    /// Returns `false` and leaves the existing value untouched otherwise.
    pub fn append(&mut self, k: impl Into<String>, v: InfoValue) -> bool {
        let k = k.into();
        if self.0.contains_key(&k) {
            log::trace!("Info key {:?} already exists, keeping the inner value", k);
            false
        } else {
            self.0.insert(k, v);
            true
        }
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> Keys<String, InfoValue> {
        self.0.keys()
    }

    /// Returns an iterator over the key-value pairs.
    pub fn iter(&self) -> Iter<'_, String, InfoValue> {
        self.0.iter()
    }

    /// Gets a reference to the value associated with the given key.
    pub fn get(&self, k: &str) -> Option<&InfoValue> {
        self.0.get(k)
    }

    /// Returns `true` if the info has no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Gets a scalar value.
    pub fn get_scalar(&self, k: &str) -> Result<f64> {
        match self.0.get(k) {
            Some(InfoValue::Scalar(v)) => Ok(*v),
            Some(_) => Err(EnvPipeError::InfoValueTypeError("Scalar".to_string()).into()),
            None => Err(EnvPipeError::InfoKeyError(k.to_string()).into()),
        }
    }

    /// Gets an integer value.
    pub fn get_int(&self, k: &str) -> Result<i64> {
        match self.0.get(k) {
            Some(InfoValue::Int(v)) => Ok(*v),
            Some(_) => Err(EnvPipeError::InfoValueTypeError("Int".to_string()).into()),
            None => Err(EnvPipeError::InfoKeyError(k.to_string()).into()),
        }
    }

    /// Gets a flag.
    pub fn get_bool(&self, k: &str) -> Result<bool> {
        match self.0.get(k) {
            Some(InfoValue::Bool(v)) => Ok(*v),
            Some(_) => Err(EnvPipeError::InfoValueTypeError("Bool".to_string()).into()),
            None => Err(EnvPipeError::InfoKeyError(k.to_string()).into()),
        }
    }
}
