// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Proliphix library.
//!
//! Failures fall into four groups: transport problems talking to the
//! thermostat, malformed data coming back from it, invalid values supplied
//! by the caller, and reads of fields the cache does not hold.

use std::time::Duration;

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred during value validation.
    #[error("value error: {0}")]
    Value(#[from] ValueError),

    /// Error occurred during protocol communication.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Error occurred while parsing a response or a cached value.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The requested field has not been read from the device.
    ///
    /// Returned before the first successful update, or when the device
    /// firmware does not report the field at all.
    #[error("field not present: {0}")]
    FieldNotPresent(String),

    /// An update was requested before the configured minimum interval
    /// elapsed.
    #[error("update throttled, retry in {} ms", .remaining.as_millis())]
    UpdateThrottled {
        /// Time left until the next update is allowed.
        remaining: Duration,
    },
}

/// Errors related to value validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValueError {
    /// A temperature was NaN or infinite.
    #[error("temperature {0} is not a finite number")]
    NotFinite(f64),

    /// An HVAC mode code outside the known enumeration.
    #[error("unknown HVAC mode: {0}")]
    UnknownHvacMode(i64),

    /// A name that is not in the OID registry.
    #[error("unknown field: '{0}'")]
    UnknownField(String),

    /// A value whose type does not match the field it is written to.
    #[error("{field} expects {expected}, got {actual}")]
    KindMismatch {
        /// The field being written.
        field: String,
        /// The kind of value the field holds.
        expected: &'static str,
        /// The kind of value that was supplied.
        actual: &'static str,
    },

    /// The field is reported by the device but cannot be written.
    #[error("{0} is read-only")]
    ReadOnly(String),
}

/// Errors related to protocol communication.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// HTTP request failed.
    #[cfg(feature = "http")]
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Connection to the device failed or it answered with an error status.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out.
    #[error("request timed out after {0} ms")]
    Timeout(u64),

    /// Invalid URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Authentication failed.
    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Errors related to parsing device data.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// A response segment had no `=` separator.
    #[error("malformed response segment: {0:?}")]
    MalformedSegment(String),

    /// Failed to decode a specific value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_not_present_display() {
        let err = Error::FieldNotPresent("AverageTemp".to_string());
        assert_eq!(err.to_string(), "field not present: AverageTemp");
    }

    #[test]
    fn malformed_segment_display() {
        let err = ParseError::MalformedSegment("OID4.1.13".to_string());
        assert_eq!(
            err.to_string(),
            "malformed response segment: \"OID4.1.13\""
        );
    }

    #[test]
    fn error_from_parse_error() {
        let parse = ParseError::InvalidValue {
            field: "HvacMode".to_string(),
            message: "invalid digit found in string".to_string(),
        };
        let err: Error = parse.into();
        assert!(matches!(err, Error::Parse(ParseError::InvalidValue { .. })));
    }

    #[test]
    fn kind_mismatch_display() {
        let err = ValueError::KindMismatch {
            field: "HvacMode".to_string(),
            expected: "integer",
            actual: "temperature",
        };
        assert_eq!(err.to_string(), "HvacMode expects integer, got temperature");
    }

    #[test]
    fn throttled_display() {
        let err = Error::UpdateThrottled {
            remaining: Duration::from_millis(1500),
        };
        assert_eq!(err.to_string(), "update throttled, retry in 1500 ms");
    }
}
