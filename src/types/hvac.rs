// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HVAC and fan enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValueError;

/// Configured HVAC mode of the thermostat.
///
/// # Examples
///
/// ```
/// use proliphix_lib::types::HvacMode;
///
/// assert_eq!(HvacMode::Heat.code(), 2);
/// assert_eq!(HvacMode::try_from(3_i64).unwrap(), HvacMode::Cool);
/// assert!(HvacMode::try_from(7_i64).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HvacMode {
    /// System off.
    Off,
    /// Heating.
    Heat,
    /// Cooling.
    Cool,
    /// Automatic heat/cool changeover.
    Auto,
}

impl HvacMode {
    /// Returns the integer code the device uses.
    #[must_use]
    pub const fn code(&self) -> i64 {
        match self {
            Self::Off => 1,
            Self::Heat => 2,
            Self::Cool => 3,
            Self::Auto => 4,
        }
    }

    /// Returns a human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::Heat => "Heat",
            Self::Cool => "Cool",
            Self::Auto => "Auto",
        }
    }
}

impl TryFrom<i64> for HvacMode {
    type Error = ValueError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Off),
            2 => Ok(Self::Heat),
            3 => Ok(Self::Cool),
            4 => Ok(Self::Auto),
            other => Err(ValueError::UnknownHvacMode(other)),
        }
    }
}

impl From<HvacMode> for i64 {
    fn from(mode: HvacMode) -> Self {
        mode.code()
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether the fan is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FanState {
    /// Fan is stopped.
    Off,
    /// Fan is running.
    On,
}

impl FanState {
    /// Raw device value meaning the fan is running.
    pub const RAW_ON: &'static str = "2";

    /// Decodes the raw device value. Only `"2"` means on.
    #[must_use]
    pub fn from_raw(raw: &str) -> Self {
        if raw == Self::RAW_ON { Self::On } else { Self::Off }
    }

    /// Returns `"On"` or `"Off"`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
        }
    }
}

impl fmt::Display for FanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
