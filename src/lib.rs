// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Proliphix Lib - A Rust library to control Proliphix network thermostats.
//!
//! Proliphix thermostats (NT10e and relatives) expose their state through a
//! local HTTP interface that reads and writes values addressed by dotted
//! object identifiers (OIDs). This library reads a fixed set of OIDs in one
//! request, caches them, and offers typed accessors on top.
//!
//! # Supported Features
//!
//! - **Readings**: Temperature, humidity, HVAC and fan state
//! - **Setpoints**: Heating/cooling setbacks, HVAC and fan modes
//! - **Usage counters**: Heating, cooling and fan usage
//! - **Clock correction**: Detects device clock drift and resets it
//!
//! # Quick Start
//!
//! ```no_run
//! use proliphix_lib::{Setback, Thermostat};
//!
//! #[tokio::main]
//! async fn main() -> proliphix_lib::Result<()> {
//!     let thermostat = Thermostat::http("192.168.1.20")
//!         .with_credentials("admin", "admin")
//!         .build()?;
//!
//!     // One request fetches everything; getters read the cache
//!     thermostat.update().await?;
//!     println!("{}: {:.1}°", thermostat.name()?, thermostat.cur_temp()?);
//!
//!     match thermostat.set_setback(70.0).await? {
//!         Setback::Heat(t) => println!("heating to {t}"),
//!         Setback::Cool(t) => println!("cooling to {t}"),
//!         Setback::NotApplicable => println!("system is off"),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod clock;
pub mod error;
pub mod oid;
pub mod protocol;
pub mod state;
mod thermostat;
pub mod types;

pub use clock::{ClockDrift, FixedClock, HostClock, SystemClock, UtcOffsets};
pub use error::{Error, ParseError, ProtocolError, Result, ValueError};
pub use oid::{Field, OidRegistry};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::Protocol;
pub use state::{DeviceState, Value};
#[cfg(feature = "http")]
pub use thermostat::HttpThermostatBuilder;
pub use thermostat::Thermostat;
pub use types::{FanState, HvacMode, Setback};
