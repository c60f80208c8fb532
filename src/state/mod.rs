// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat state cache.
//!
//! [`DeviceState`] holds the raw strings last read from the thermostat.
//! [`Value`] and [`FieldKind`] describe how each registered field decodes.
//!
//! # Examples
//!
//! ```
//! use proliphix_lib::oid::Field;
//! use proliphix_lib::state::{DeviceState, Value};
//!
//! let mut state = DeviceState::new();
//! state.set(Field::SetbackCool, "760");
//!
//! assert_eq!(state.value(Field::SetbackCool).unwrap(), Value::Temperature(76.0));
//! ```

mod device_state;
mod value;

pub use device_state::{ACTUAL_TIME, DeviceState};
pub use value::{FieldKind, Value};
