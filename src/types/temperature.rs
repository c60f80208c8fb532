// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Temperature encoding.
//!
//! The thermostat transmits temperatures as integer decidegrees (tenths of
//! a degree). Reading divides by ten; writing multiplies by ten and
//! truncates toward zero.

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Converts a decidegree reading into degrees.
///
/// # Examples
///
/// ```
/// use proliphix_lib::types::decidegrees_to_degrees;
///
/// assert!((decidegrees_to_degrees(691) - 69.1).abs() < f64::EPSILON);
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn decidegrees_to_degrees(decidegrees: i64) -> f64 {
    decidegrees as f64 / 10.0
}

/// Converts degrees into device decidegrees, truncating toward zero.
///
/// # Errors
///
/// Returns `ValueError::NotFinite` for NaN or infinite input.
///
/// # Examples
///
/// ```
/// use proliphix_lib::types::degrees_to_decidegrees;
///
/// assert_eq!(degrees_to_decidegrees(69.1).unwrap(), 691);
/// assert_eq!(degrees_to_decidegrees(72.59).unwrap(), 725);
/// ```
pub fn degrees_to_decidegrees(degrees: f64) -> Result<i64, ValueError> {
    if !degrees.is_finite() {
        return Err(ValueError::NotFinite(degrees));
    }
    #[allow(clippy::cast_possible_truncation)]
    let raw = (degrees * 10.0).trunc() as i64;
    Ok(raw)
}

/// Result of reading or writing the mode-dependent setback.
///
/// The active setback is the cooling setpoint while cooling and the
/// heating setpoint while heating. In any other mode there is no single
/// setback, which is reported as [`Setback::NotApplicable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Setback {
    /// Heating setpoint in degrees.
    Heat(f64),
    /// Cooling setpoint in degrees.
    Cool(f64),
    /// Neither heating nor cooling is configured.
    NotApplicable,
}

impl Setback {
    /// Returns the temperature, if a setback applies.
    #[must_use]
    pub fn degrees(&self) -> Option<f64> {
        match self {
            Self::Heat(t) | Self::Cool(t) => Some(*t),
            Self::NotApplicable => None,
        }
    }

    /// Returns `true` unless this is [`Setback::NotApplicable`].
    #[must_use]
    pub fn is_applicable(&self) -> bool {
        !matches!(self, Self::NotApplicable)
    }
}
