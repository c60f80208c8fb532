// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Cached thermostat state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::oid::Field;

use super::value::{Value, parse_integer};

/// Cache key for the host-derived correct device time.
pub const ACTUAL_TIME: &str = "ActualTime";

/// Raw values last read from the thermostat, keyed by field name.
///
/// Values are kept exactly as the device sent them and only decoded on
/// access. A missing key means the value was never read, which is distinct
/// from any real reading (a temperature of `0.0` is plausible).
///
/// # Examples
///
/// ```
/// use proliphix_lib::oid::Field;
/// use proliphix_lib::state::DeviceState;
///
/// let mut state = DeviceState::new();
/// assert!(state.raw(Field::AverageTemp).is_none());
///
/// state.set(Field::AverageTemp, "715");
/// assert_eq!(state.raw(Field::AverageTemp), Some("715"));
/// assert!((state.temperature(Field::AverageTemp).unwrap() - 71.5).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    values: BTreeMap<String, String>,
}

impl DeviceState {
    /// Creates a new empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a state from `(field, raw value)` pairs.
    ///
    /// Later pairs win when a field repeats.
    #[must_use]
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Field, String)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(field, value)| (field.name().to_string(), value))
            .collect();
        Self { values }
    }

    /// Returns the raw value for a registered field.
    #[must_use]
    pub fn raw(&self, field: Field) -> Option<&str> {
        self.get(field.name())
    }

    /// Returns the raw value stored under any key, including `ActualTime`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Stores a raw value for a registered field.
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.insert(field.name(), value);
    }

    /// Stores a raw value under any key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Removes a key, returning its previous raw value.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Returns `true` if a value is cached for the field.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(field.name())
    }

    /// Returns the number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, raw value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the registered fields the cache has no value for.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| !self.contains(*f))
            .collect()
    }

    // ========== Decoding ==========

    /// Returns the raw value or `Error::FieldNotPresent`.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn require(&self, field: Field) -> Result<&str> {
        self.require_key(field.name())
    }

    fn require_key(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| Error::FieldNotPresent(key.to_string()))
    }

    /// Decodes a field through its registered rule.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read, or
    /// `Error::Parse` if the raw value does not decode.
    pub fn value(&self, field: Field) -> Result<Value> {
        let raw = self.require(field)?;
        Ok(Value::decode(field, raw)?)
    }

    /// Decodes a field as an integer.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn integer(&self, field: Field) -> Result<i64> {
        self.integer_key(field.name())
    }

    /// Decodes any cached key as an integer.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn integer_key(&self, key: &str) -> Result<i64> {
        let raw = self.require_key(key)?;
        Ok(parse_integer(key, raw)?)
    }

    /// Decodes a decidegree field into degrees.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn temperature(&self, field: Field) -> Result<f64> {
        let raw = self.require(field)?;
        Ok(crate::types::decidegrees_to_degrees(parse_integer(
            field.name(),
            raw,
        )?))
    }

    /// Returns a text field.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn text(&self, field: Field) -> Result<&str> {
        self.require(field)
    }
}
