// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for thermostat control.
//!
//! # Types
//!
//! - [`HvacMode`] - Off/Heat/Cool/Auto mode codes
//! - [`FanState`] - Whether the fan is running
//! - [`Setback`] - Mode-dependent setpoint, or not applicable

mod hvac;
mod temperature;

pub use hvac::{FanState, HvacMode};
pub use temperature::{Setback, decidegrees_to_degrees, degrees_to_decidegrees};
