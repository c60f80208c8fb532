// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OID registry for Proliphix thermostats.
//!
//! The thermostat addresses every value by a dotted numeric object
//! identifier. This module holds the fixed subset of OIDs the library
//! reads, together with the human-readable field names used by the cache.
//!
//! # Examples
//!
//! ```
//! use proliphix_lib::oid::{Field, OidRegistry};
//!
//! assert_eq!(OidRegistry::name_to_oid("DevName"), Some("1.2"));
//! assert_eq!(OidRegistry::oid_to_name("4.1.13"), Some("AverageTemp"));
//! assert_eq!(Field::SetbackHeat.oid(), "4.1.5");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ValueError;

/// A value exposed by the thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    /// Device name.
    DevName,
    /// Serial number.
    SerialNum,
    /// Site name configured on the device.
    SiteName,
    /// Device clock, epoch seconds in standard local time.
    Time,
    /// Hardware model name.
    ModelName,
    /// Configured HVAC mode (see [`HvacMode`](crate::types::HvacMode)).
    HvacMode,
    /// What the HVAC system is currently doing.
    HvacState,
    /// Configured fan mode.
    FanMode,
    /// Fan state (`2` means running).
    FanState,
    /// Heating setpoint in decidegrees.
    SetbackHeat,
    /// Cooling setpoint in decidegrees.
    SetbackCool,
    /// Active schedule class.
    CurrentClass,
    /// Averaged temperature reading in decidegrees.
    AverageTemp,
    /// Relative humidity in percent.
    RelHumidity,
    /// Heating stage 1 usage counter.
    Heat1Usage,
    /// Cooling stage 1 usage counter.
    Cool1Usage,
    /// Fan usage counter.
    FanUsage,
    /// When the usage counters were last reset.
    LastUsageReset,
}

impl Field {
    /// Every registered field.
    pub const ALL: [Field; 18] = [
        Self::DevName,
        Self::SerialNum,
        Self::SiteName,
        Self::Time,
        Self::ModelName,
        Self::HvacMode,
        Self::HvacState,
        Self::FanMode,
        Self::FanState,
        Self::SetbackHeat,
        Self::SetbackCool,
        Self::CurrentClass,
        Self::AverageTemp,
        Self::RelHumidity,
        Self::Heat1Usage,
        Self::Cool1Usage,
        Self::FanUsage,
        Self::LastUsageReset,
    ];

    /// Returns the field name used as the cache key.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::DevName => "DevName",
            Self::SerialNum => "SerialNum",
            Self::SiteName => "SiteName",
            Self::Time => "Time",
            Self::ModelName => "ModelName",
            Self::HvacMode => "HvacMode",
            Self::HvacState => "HvacState",
            Self::FanMode => "FanMode",
            Self::FanState => "FanState",
            Self::SetbackHeat => "SetbackHeat",
            Self::SetbackCool => "SetbackCool",
            Self::CurrentClass => "CurrentClass",
            Self::AverageTemp => "AverageTemp",
            Self::RelHumidity => "RelHumidity",
            Self::Heat1Usage => "Heat1Usage",
            Self::Cool1Usage => "Cool1Usage",
            Self::FanUsage => "FanUsage",
            Self::LastUsageReset => "LastUsageReset",
        }
    }

    /// Returns the dotted OID of the field.
    #[must_use]
    pub const fn oid(&self) -> &'static str {
        match self {
            Self::DevName => "1.2",
            Self::SerialNum => "1.8",
            Self::SiteName => "1.10.9",
            Self::Time => "2.5.1",
            Self::ModelName => "2.7.1",
            Self::HvacMode => "4.1.1",
            Self::HvacState => "4.1.2",
            Self::FanMode => "4.1.3",
            Self::FanState => "4.1.4",
            Self::SetbackHeat => "4.1.5",
            Self::SetbackCool => "4.1.6",
            Self::CurrentClass => "4.1.11",
            Self::AverageTemp => "4.1.13",
            Self::RelHumidity => "4.1.14",
            Self::Heat1Usage => "4.5.1",
            Self::Cool1Usage => "4.5.3",
            Self::FanUsage => "4.5.5",
            Self::LastUsageReset => "4.5.6",
        }
    }

    /// Looks up a field by its dotted OID.
    #[must_use]
    pub fn from_oid(oid: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.oid() == oid)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| ValueError::UnknownField(s.to_string()))
    }
}

/// Bidirectional lookup between field names and OIDs.
///
/// The registry is a compile-time table; both directions are total over
/// the registered fields and return `None` for anything else.
#[derive(Debug, Clone, Copy, Default)]
pub struct OidRegistry;

impl OidRegistry {
    /// Resolves a field name to its dotted OID.
    #[must_use]
    pub fn name_to_oid(name: &str) -> Option<&'static str> {
        name.parse::<Field>().ok().map(|f| f.oid())
    }

    /// Resolves a dotted OID to its field name.
    #[must_use]
    pub fn oid_to_name(oid: &str) -> Option<&'static str> {
        Field::from_oid(oid).map(|f| f.name())
    }

    /// Returns all registered OIDs in ascending string order.
    ///
    /// The order is lexicographic on the dotted string, so `4.1.11` sorts
    /// before `4.1.2`. The device expects exactly this ordering.
    #[must_use]
    pub fn sorted_oids() -> Vec<&'static str> {
        let mut oids: Vec<&'static str> = Field::ALL.iter().map(Field::oid).collect();
        oids.sort_unstable();
        oids
    }

    /// Builds the body of a bulk read request covering every OID.
    #[must_use]
    pub fn query_payload() -> String {
        Self::sorted_oids()
            .into_iter()
            .map(|oid| format!("OID{oid}="))
            .collect::<Vec<_>>()
            .join("&")
    }
}
