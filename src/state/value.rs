// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-field decode and encode rules.
//!
//! Raw values stay strings in the cache. This table is the single place
//! that says how each registered field turns into a typed value and back.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ValueError};
use crate::oid::Field;
use crate::types::{FanState, decidegrees_to_degrees, degrees_to_decidegrees};

/// How a field's raw string is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, returned as-is.
    Text,
    /// Integer value (enumerations, counters, epoch seconds).
    Integer,
    /// Temperature in decidegrees.
    Decidegrees,
    /// Fan running flag.
    Fan,
}

impl FieldKind {
    /// Returns a short name for error messages.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decidegrees => "temperature",
            Self::Fan => "fan state",
        }
    }
}

impl Field {
    /// Returns the decode rule for this field.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::DevName | Self::SerialNum | Self::SiteName | Self::ModelName => FieldKind::Text,
            Self::AverageTemp | Self::SetbackHeat | Self::SetbackCool => FieldKind::Decidegrees,
            Self::FanState => FieldKind::Fan,
            Self::Time
            | Self::HvacMode
            | Self::HvacState
            | Self::FanMode
            | Self::CurrentClass
            | Self::RelHumidity
            | Self::Heat1Usage
            | Self::Cool1Usage
            | Self::FanUsage
            | Self::LastUsageReset => FieldKind::Integer,
        }
    }
}

/// A decoded field value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Text value.
    Text(String),
    /// Integer value.
    Integer(i64),
    /// Temperature in degrees.
    Temperature(f64),
    /// Fan state.
    Fan(FanState),
}

impl Value {
    /// Decodes a raw device string according to the field's rule.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::InvalidValue` if the raw string does not match
    /// the field's expected representation.
    pub fn decode(field: Field, raw: &str) -> Result<Self, ParseError> {
        match field.kind() {
            FieldKind::Text => Ok(Self::Text(raw.to_string())),
            FieldKind::Integer => parse_integer(field.name(), raw).map(Self::Integer),
            FieldKind::Decidegrees => {
                parse_integer(field.name(), raw).map(|d| Self::Temperature(decidegrees_to_degrees(d)))
            }
            FieldKind::Fan => Ok(Self::Fan(FanState::from_raw(raw))),
        }
    }

    /// Returns the kind of field this value can be written to.
    #[must_use]
    pub const fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Integer(_) => FieldKind::Integer,
            Self::Temperature(_) => FieldKind::Decidegrees,
            Self::Fan(_) => FieldKind::Fan,
        }
    }

    /// Encodes this value into the raw string the device expects for
    /// `field`.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::ReadOnly` for the fan state,
    /// `ValueError::KindMismatch` when the value does not match the field's
    /// rule, and `ValueError::NotFinite` for a non-finite temperature.
    pub fn encode_for(&self, field: Field) -> Result<String, ValueError> {
        match (field.kind(), self) {
            (FieldKind::Fan, _) => Err(ValueError::ReadOnly(field.name().to_string())),
            (FieldKind::Text, Self::Text(s)) => Ok(s.clone()),
            (FieldKind::Integer, Self::Integer(i)) => Ok(i.to_string()),
            (FieldKind::Decidegrees, Self::Temperature(t)) => {
                degrees_to_decidegrees(*t).map(|d| d.to_string())
            }
            (expected, value) => Err(ValueError::KindMismatch {
                field: field.name().to_string(),
                expected: expected.as_str(),
                actual: value.kind().as_str(),
            }),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Temperature(t) => write!(f, "{t:.1}"),
            Self::Fan(state) => write!(f, "{state}"),
        }
    }
}

/// Parses a raw integer, tolerating surrounding whitespace.
pub(crate) fn parse_integer(field: &str, raw: &str) -> Result<i64, ParseError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|e| ParseError::InvalidValue {
            field: field.to_string(),
            message: format!("{e} (raw value {raw:?})"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_temperature() {
        let value = Value::decode(Field::AverageTemp, "725").unwrap();
        assert_eq!(value, Value::Temperature(72.5));
    }

    #[test]
    fn decode_integer() {
        assert_eq!(
            Value::decode(Field::HvacMode, "3").unwrap(),
            Value::Integer(3)
        );
        assert_eq!(
            Value::decode(Field::Time, "1466035200").unwrap(),
            Value::Integer(1_466_035_200)
        );
    }

    #[test]
    fn decode_fan() {
        assert_eq!(
            Value::decode(Field::FanState, "2").unwrap(),
            Value::Fan(FanState::On)
        );
        assert_eq!(
            Value::decode(Field::FanState, "1").unwrap(),
            Value::Fan(FanState::Off)
        );
    }

    #[test]
    fn decode_text_keeps_raw() {
        assert_eq!(
            Value::decode(Field::DevName, "Living Room").unwrap(),
            Value::Text("Living Room".to_string())
        );
    }

    #[test]
    fn decode_invalid_integer() {
        let err = Value::decode(Field::SetbackHeat, "warm").unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "SetbackHeat"));
    }

    #[test]
    fn encode_matching_values() {
        assert_eq!(
            Value::Temperature(69.1).encode_for(Field::SetbackHeat).unwrap(),
            "691"
        );
        assert_eq!(Value::Integer(4).encode_for(Field::HvacMode).unwrap(), "4");
        assert_eq!(
            Value::Text("Den".to_string()).encode_for(Field::DevName).unwrap(),
            "Den"
        );
        assert!(matches!(
            Value::Temperature(f64::NAN).encode_for(Field::SetbackCool),
            Err(ValueError::NotFinite(_))
        ));
    }

    #[test]
    fn encode_rejects_temperature_for_integer_field() {
        assert_eq!(
            Value::Temperature(3.0).encode_for(Field::HvacMode),
            Err(ValueError::KindMismatch {
                field: "HvacMode".to_string(),
                expected: "integer",
                actual: "temperature",
            })
        );
    }

    #[test]
    fn encode_rejects_integer_for_temperature_field() {
        assert_eq!(
            Value::Integer(70).encode_for(Field::SetbackHeat),
            Err(ValueError::KindMismatch {
                field: "SetbackHeat".to_string(),
                expected: "temperature",
                actual: "integer",
            })
        );
    }

    #[test]
    fn encode_rejects_text_for_integer_field() {
        assert_eq!(
            Value::Text("noon".to_string()).encode_for(Field::Time),
            Err(ValueError::KindMismatch {
                field: "Time".to_string(),
                expected: "integer",
                actual: "text",
            })
        );
    }

    #[test]
    fn fan_state_is_read_only() {
        for state in [FanState::On, FanState::Off] {
            assert_eq!(
                Value::Fan(state).encode_for(Field::FanState),
                Err(ValueError::ReadOnly("FanState".to_string()))
            );
        }
        assert!(matches!(
            Value::Integer(2).encode_for(Field::FanState),
            Err(ValueError::ReadOnly(_))
        ));
    }

    #[test]
    fn every_field_has_a_kind() {
        let temps: Vec<_> = Field::ALL
            .into_iter()
            .filter(|f| f.kind() == FieldKind::Decidegrees)
            .collect();
        assert_eq!(
            temps,
            vec![Field::SetbackHeat, Field::SetbackCool, Field::AverageTemp]
        );
    }
}
