// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! High-level client for a Proliphix thermostat.
//!
//! [`Thermostat`] reads every registered OID in one request on
//! [`update`](Thermostat::update), caches the raw values, and serves typed
//! getters from that cache without touching the network. Setters update
//! the cache and push exactly one field to the device.
//!
//! The vendor asks clients not to poll more than once a minute for long
//! periods. Pacing is up to the caller; an optional minimum interval makes
//! early updates fail with [`Error::UpdateThrottled`] instead of being
//! silently skipped.
//!
//! ```no_run
//! use proliphix_lib::Thermostat;
//!
//! # async fn example() -> proliphix_lib::Result<()> {
//! let thermostat = Thermostat::http("192.168.1.20")
//!     .with_credentials("admin", "admin")
//!     .build()?;
//!
//! thermostat.update().await?;
//! println!("{} reads {:.1}", thermostat.name()?, thermostat.cur_temp()?);
//!
//! if thermostat.is_heating()? {
//!     thermostat.set_setback_heat(68.5).await?;
//! }
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "http")]
mod http_builder;

#[cfg(feature = "http")]
pub use http_builder::HttpThermostatBuilder;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::time::Instant;

use crate::clock::{ClockDrift, HostClock, SystemClock};
use crate::error::{Error, Result};
use crate::oid::{Field, OidRegistry};
use crate::protocol::{Protocol, encode_write_form, parse_read_response};
use crate::state::{ACTUAL_TIME, DeviceState, Value};
use crate::types::{FanState, HvacMode, Setback, degrees_to_decidegrees};

#[cfg(feature = "http")]
use crate::protocol::{HttpClient, HttpConfig};

/// A Proliphix network thermostat.
///
/// The cache sits behind a lock, so a `Thermostat` can be shared between
/// tasks. Setters are read-modify-write against that cache and are not
/// serialized with each other; callers that issue concurrent writes should
/// coordinate them.
#[derive(Debug)]
pub struct Thermostat<P: Protocol> {
    protocol: P,
    state: RwLock<DeviceState>,
    clock: Arc<dyn HostClock>,
    clock_correction: bool,
    min_update_interval: Option<Duration>,
    last_update: Mutex<Option<Instant>>,
}

#[cfg(feature = "http")]
impl Thermostat<HttpClient> {
    /// Starts building an HTTP thermostat client for `host`.
    #[must_use]
    pub fn http(host: impl Into<String>) -> HttpThermostatBuilder {
        HttpThermostatBuilder::new(HttpConfig::new(host))
    }

    /// Starts building an HTTP thermostat client from a full configuration.
    #[must_use]
    pub fn http_config(config: HttpConfig) -> HttpThermostatBuilder {
        HttpThermostatBuilder::new(config)
    }
}

impl<P: Protocol> Thermostat<P> {
    /// Creates a client over the given transport.
    ///
    /// Uses the system clock, corrects drift, and applies no update
    /// interval.
    pub fn new(protocol: P) -> Self {
        Self {
            protocol,
            state: RwLock::new(DeviceState::new()),
            clock: Arc::new(SystemClock),
            clock_correction: true,
            min_update_interval: None,
            last_update: Mutex::new(None),
        }
    }

    /// Replaces the host clock used for drift detection.
    #[must_use]
    pub fn with_clock(mut self, clock: impl HostClock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub(crate) fn with_shared_clock(mut self, clock: Arc<dyn HostClock>) -> Self {
        self.clock = clock;
        self
    }

    /// Enables or disables writing a corrected time after each update.
    #[must_use]
    pub fn with_clock_correction(mut self, enabled: bool) -> Self {
        self.clock_correction = enabled;
        self
    }

    /// Rejects updates issued sooner than `interval` after the previous one.
    #[must_use]
    pub fn with_min_update_interval(mut self, interval: Duration) -> Self {
        self.min_update_interval = Some(interval);
        self
    }

    /// Returns the underlying transport.
    #[must_use]
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// Returns a snapshot of the cached state.
    #[must_use]
    pub fn state(&self) -> DeviceState {
        self.state.read().clone()
    }

    // ========== Read path ==========

    /// Reads every registered OID from the device and refreshes the cache.
    ///
    /// The response is parsed completely before the cache is replaced, so a
    /// failed update leaves the previous state untouched. A device that
    /// does not report `Time` is treated as reporting `0`, which forces a
    /// clock correction.
    ///
    /// # Errors
    ///
    /// Returns error if the update is throttled, the request fails, or the
    /// response is malformed. A failed clock correction is reported after
    /// the cache has been refreshed.
    pub async fn update(&self) -> Result<()> {
        self.check_update_interval()?;

        let query = OidRegistry::query_payload();
        let body = self.protocol.read(&query).await?;
        *self.last_update.lock() = Some(Instant::now());

        let mut snapshot = DeviceState::from_pairs(parse_read_response(&body)?);
        if !snapshot.contains(Field::Time) {
            snapshot.set(Field::Time, "0");
        }

        let drift = ClockDrift::measure(self.clock.as_ref(), snapshot.integer(Field::Time)?);
        snapshot.insert(ACTUAL_TIME, drift.actual_time().to_string());

        let missing = snapshot.missing_fields();
        if !missing.is_empty() {
            tracing::debug!(?missing, "Thermostat did not report some fields");
        }
        tracing::debug!(state = ?snapshot, "Thermostat state collected");

        *self.state.write() = snapshot;

        if drift.needs_correction() {
            if self.clock_correction {
                tracing::warn!(
                    drift = drift.seconds(),
                    "Thermostat clock drifted, resetting"
                );
                self.write([(Field::Time.name(), drift.set_time().to_string())])
                    .await?;
            } else {
                tracing::debug!(
                    drift = drift.seconds(),
                    "Thermostat clock drifted, correction disabled"
                );
            }
        }

        Ok(())
    }

    fn check_update_interval(&self) -> Result<()> {
        let (Some(interval), Some(last)) = (self.min_update_interval, *self.last_update.lock())
        else {
            return Ok(());
        };
        let elapsed = last.elapsed();
        if elapsed < interval {
            return Err(Error::UpdateThrottled {
                remaining: interval - elapsed,
            });
        }
        Ok(())
    }

    /// Recomputes the clock drift from the cached device time.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` before the first update.
    pub fn clock_drift(&self) -> Result<ClockDrift> {
        let device_time = self.state.read().integer(Field::Time)?;
        Ok(ClockDrift::measure(self.clock.as_ref(), device_time))
    }

    // ========== Write path ==========

    /// Writes raw values to the device by field name.
    ///
    /// Unknown names are dropped. The cache is not modified.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn write<'a, I, V>(&self, fields: I) -> Result<()>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: AsRef<str>,
    {
        let form = encode_write_form(fields);
        self.protocol.write(&form).await?;
        Ok(())
    }

    /// Caches `raw` for `field` and writes it, restoring the previous
    /// cached value if the write fails.
    async fn push(&self, field: Field, raw: String) -> Result<()> {
        let previous = {
            let mut state = self.state.write();
            let previous = state.raw(field).map(str::to_string);
            state.set(field, raw.as_str());
            previous
        };

        let result = self.write([(field.name(), raw.as_str())]).await;
        if result.is_err() {
            let mut state = self.state.write();
            match previous {
                Some(value) => state.set(field, value),
                None => {
                    state.remove(field.name());
                }
            }
        }
        result
    }

    /// Encodes and writes a typed value for any field.
    ///
    /// The value is checked against the field's rule before the cache is
    /// touched, so a rejected value leaves both the cache and the device
    /// alone.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the value does not fit the field or the
    /// field is read-only, or a protocol error if the request fails.
    pub async fn set(&self, field: Field, value: &Value) -> Result<()> {
        let raw = value.encode_for(field)?;
        self.push(field, raw).await
    }

    /// Decodes any cached field.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn get(&self, field: Field) -> Result<Value> {
        self.state.read().value(field)
    }

    // ========== Temperatures ==========

    /// Current averaged temperature in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn cur_temp(&self) -> Result<f64> {
        self.state.read().temperature(Field::AverageTemp)
    }

    /// Heating setpoint in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn setback_heat(&self) -> Result<f64> {
        self.state.read().temperature(Field::SetbackHeat)
    }

    /// Cooling setpoint in degrees.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn setback_cool(&self) -> Result<f64> {
        self.state.read().temperature(Field::SetbackCool)
    }

    /// Sets the heating setpoint. Degrees are truncated to tenths.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not finite or the request fails.
    pub async fn set_setback_heat(&self, degrees: f64) -> Result<()> {
        let raw = degrees_to_decidegrees(degrees)?;
        self.push(Field::SetbackHeat, raw.to_string()).await
    }

    /// Sets the cooling setpoint. Degrees are truncated to tenths.
    ///
    /// # Errors
    ///
    /// Returns error if the value is not finite or the request fails.
    pub async fn set_setback_cool(&self, degrees: f64) -> Result<()> {
        let raw = degrees_to_decidegrees(degrees)?;
        self.push(Field::SetbackCool, raw.to_string()).await
    }

    /// The setpoint for the active mode.
    ///
    /// Returns [`Setback::NotApplicable`] when the thermostat is neither
    /// heating nor cooling.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn setback(&self) -> Result<Setback> {
        if self.is_cooling()? {
            Ok(Setback::Cool(self.setback_cool()?))
        } else if self.is_heating()? {
            Ok(Setback::Heat(self.setback_heat()?))
        } else {
            Ok(Setback::NotApplicable)
        }
    }

    /// Sets the setpoint for the active mode.
    ///
    /// Nothing is written when the thermostat is neither heating nor
    /// cooling; [`Setback::NotApplicable`] is returned instead.
    ///
    /// # Errors
    ///
    /// Returns error if the mode is unknown, the value is not finite, or
    /// the request fails.
    pub async fn set_setback(&self, degrees: f64) -> Result<Setback> {
        if self.is_cooling()? {
            self.set_setback_cool(degrees).await?;
            Ok(Setback::Cool(self.setback_cool()?))
        } else if self.is_heating()? {
            self.set_setback_heat(degrees).await?;
            Ok(Setback::Heat(self.setback_heat()?))
        } else {
            tracing::debug!("No active heat or cool mode, setback not written");
            Ok(Setback::NotApplicable)
        }
    }

    // ========== Modes ==========

    /// Raw HVAC mode code (see [`HvacMode`]).
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn hvac_mode(&self) -> Result<i64> {
        self.state.read().integer(Field::HvacMode)
    }

    /// Returns `true` when the HVAC mode is Heat.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn is_heating(&self) -> Result<bool> {
        Ok(self.hvac_mode()? == HvacMode::Heat.code())
    }

    /// Returns `true` when the HVAC mode is Cool.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn is_cooling(&self) -> Result<bool> {
        Ok(self.hvac_mode()? == HvacMode::Cool.code())
    }

    /// Sets the HVAC mode.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_hvac_mode(&self, mode: impl Into<i64>) -> Result<()> {
        let code: i64 = mode.into();
        self.push(Field::HvacMode, code.to_string()).await
    }

    /// Raw HVAC state code.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn hvac_state(&self) -> Result<i64> {
        self.state.read().integer(Field::HvacState)
    }

    /// Sets the HVAC state code.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_hvac_state(&self, state: i64) -> Result<()> {
        self.push(Field::HvacState, state.to_string()).await
    }

    /// Raw fan mode code.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn fan_mode(&self) -> Result<i64> {
        self.state.read().integer(Field::FanMode)
    }

    /// Sets the fan mode code.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    pub async fn set_fan_mode(&self, mode: i64) -> Result<()> {
        self.push(Field::FanMode, mode.to_string()).await
    }

    /// Whether the fan is running.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn fan_state(&self) -> Result<FanState> {
        Ok(FanState::from_raw(self.state.read().require(Field::FanState)?))
    }

    /// Active schedule class.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn current_class(&self) -> Result<i64> {
        self.state.read().integer(Field::CurrentClass)
    }

    /// Relative humidity in percent.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn relative_humidity(&self) -> Result<i64> {
        self.state.read().integer(Field::RelHumidity)
    }

    // ========== Identity ==========

    /// Display name, `SiteName:DevName`.
    ///
    /// Older clients returned the device name alone; use
    /// [`device_name`](Self::device_name) for that.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if either part was never read.
    pub fn name(&self) -> Result<String> {
        let state = self.state.read();
        Ok(format!(
            "{}:{}",
            state.text(Field::SiteName)?,
            state.text(Field::DevName)?
        ))
    }

    fn text(&self, field: Field) -> Result<String> {
        self.state.read().text(field).map(str::to_string)
    }

    /// Device name.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn device_name(&self) -> Result<String> {
        self.text(Field::DevName)
    }

    /// Site name.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn site_name(&self) -> Result<String> {
        self.text(Field::SiteName)
    }

    /// Hardware model name.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn model_name(&self) -> Result<String> {
        self.text(Field::ModelName)
    }

    /// Serial number.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` if the field was never read.
    pub fn serial_number(&self) -> Result<String> {
        self.text(Field::SerialNum)
    }

    // ========== Usage and time ==========

    /// Heating stage 1 usage counter.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn heat1_usage(&self) -> Result<i64> {
        self.state.read().integer(Field::Heat1Usage)
    }

    /// Cooling stage 1 usage counter.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn cool1_usage(&self) -> Result<i64> {
        self.state.read().integer(Field::Cool1Usage)
    }

    /// Fan usage counter.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn fan_usage(&self) -> Result<i64> {
        self.state.read().integer(Field::FanUsage)
    }

    /// When the usage counters were last reset, in device time.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn last_usage_reset(&self) -> Result<i64> {
        self.state.read().integer(Field::LastUsageReset)
    }

    /// Device clock as last read.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` or `Error::Parse`.
    pub fn device_time(&self) -> Result<i64> {
        self.state.read().integer(Field::Time)
    }

    /// Host-derived time the device should have shown at the last update.
    ///
    /// # Errors
    ///
    /// Returns `Error::FieldNotPresent` before the first update.
    pub fn actual_time(&self) -> Result<i64> {
        self.state.read().integer_key(ACTUAL_TIME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{FixedClock, UtcOffsets};
    use crate::error::{ParseError, ProtocolError, ValueError};

    const NOW: i64 = 1_466_035_200;
    const EST: i32 = -5 * 3600;
    const EDT: i32 = -4 * 3600;

    /// Transport double that records every request.
    #[derive(Debug, Default)]
    struct MockProtocol {
        response: String,
        fail: bool,
        reads: Mutex<Vec<String>>,
        writes: Mutex<Vec<String>>,
    }

    impl MockProtocol {
        fn responding(body: &str) -> Self {
            Self {
                response: body.to_string(),
                ..Self::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl Protocol for MockProtocol {
        async fn read(&self, query: &str) -> std::result::Result<String, ProtocolError> {
            self.reads.lock().push(query.to_string());
            if self.fail {
                return Err(ProtocolError::ConnectionFailed("unreachable".to_string()));
            }
            Ok(self.response.clone())
        }

        async fn write(&self, form: &str) -> std::result::Result<(), ProtocolError> {
            self.writes.lock().push(form.to_string());
            if self.fail {
                return Err(ProtocolError::ConnectionFailed("unreachable".to_string()));
            }
            Ok(())
        }
    }

    fn standard_clock() -> FixedClock {
        FixedClock::new(NOW, UtcOffsets::fixed(EST))
    }

    fn in_sync_response() -> String {
        format!(
            "OID1.2=Thermostat&OID1.10.9=Home&OID4.1.1=2&OID4.1.4=2\
             &OID4.1.5=680&OID4.1.6=760&OID4.1.13=702&OID2.5.1={}",
            NOW + i64::from(EST)
        )
    }

    fn thermostat(protocol: MockProtocol) -> Thermostat<MockProtocol> {
        Thermostat::new(protocol).with_clock(standard_clock())
    }

    fn cached(pairs: &[(Field, &str)]) -> Thermostat<MockProtocol> {
        let t = thermostat(MockProtocol::default());
        {
            let mut state = t.state.write();
            for (field, value) in pairs {
                state.set(*field, *value);
            }
        }
        t
    }

    #[tokio::test]
    async fn update_sends_full_query_once() {
        let t = thermostat(MockProtocol::responding("")).with_clock_correction(false);
        t.update().await.unwrap();

        let reads = t.protocol().reads.lock().clone();
        assert_eq!(reads, vec![OidRegistry::query_payload()]);
        assert!(t.protocol().writes.lock().is_empty());
    }

    #[tokio::test]
    async fn update_populates_cache() {
        let t = thermostat(MockProtocol::responding(&in_sync_response()));
        t.update().await.unwrap();

        assert!((t.cur_temp().unwrap() - 70.2).abs() < 1e-9);
        assert!((t.setback_heat().unwrap() - 68.0).abs() < 1e-9);
        assert_eq!(t.fan_state().unwrap(), FanState::On);
        assert_eq!(t.name().unwrap(), "Home:Thermostat");
        assert_eq!(t.device_name().unwrap(), "Thermostat");
        assert!(t.is_heating().unwrap());
        assert!(!t.is_cooling().unwrap());
        assert_eq!(t.actual_time().unwrap(), NOW + i64::from(EST));
        assert!(t.protocol().writes.lock().is_empty());
    }

    #[tokio::test]
    async fn update_without_time_forces_correction() {
        let t = thermostat(MockProtocol::responding("OID4.1.13=700"));
        t.update().await.unwrap();

        assert_eq!(t.device_time().unwrap(), 0);
        let writes = t.protocol().writes.lock().clone();
        assert_eq!(
            writes,
            vec![format!("OID2.5.1={}&submit=Submit", NOW + i64::from(EST))]
        );
    }

    #[tokio::test]
    async fn correction_during_dst_writes_standard_time() {
        let t = Thermostat::new(MockProtocol::responding("OID2.5.1=0"))
            .with_clock(FixedClock::new(NOW, UtcOffsets::new(EST, EDT)));
        t.update().await.unwrap();

        assert_eq!(t.actual_time().unwrap(), NOW + i64::from(EDT));
        let writes = t.protocol().writes.lock().clone();
        assert_eq!(
            writes,
            vec![format!("OID2.5.1={}&submit=Submit", NOW + i64::from(EST))]
        );
    }

    #[tokio::test]
    async fn correction_can_be_disabled() {
        let t = thermostat(MockProtocol::responding("OID2.5.1=0")).with_clock_correction(false);
        t.update().await.unwrap();
        assert!(t.protocol().writes.lock().is_empty());
        assert!(t.clock_drift().unwrap().needs_correction());
    }

    #[tokio::test]
    async fn malformed_response_keeps_previous_cache() {
        let t = cached(&[(Field::AverageTemp, "701")]);
        let t = Thermostat {
            protocol: MockProtocol::responding("OID4.1.13=702&garbage"),
            ..t
        };

        let err = t.update().await.unwrap_err();
        assert!(matches!(err, Error::Parse(ParseError::MalformedSegment(_))));
        assert!((t.cur_temp().unwrap() - 70.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn transport_failure_keeps_previous_cache() {
        let t = cached(&[(Field::AverageTemp, "701")]);
        let t = Thermostat {
            protocol: MockProtocol::failing(),
            ..t
        };

        let err = t.update().await.unwrap_err();
        assert!(matches!(err, Error::Protocol(ProtocolError::ConnectionFailed(_))));
        assert!((t.cur_temp().unwrap() - 70.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn update_replaces_fields_missing_from_response() {
        let t = cached(&[(Field::RelHumidity, "40")]);
        let t = Thermostat {
            protocol: MockProtocol::responding(&in_sync_response()),
            ..t
        };
        t.update().await.unwrap();
        assert!(matches!(t.relative_humidity(), Err(Error::FieldNotPresent(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn min_update_interval_fails_loudly() {
        let t = thermostat(MockProtocol::responding(&in_sync_response()))
            .with_min_update_interval(Duration::from_secs(60));

        t.update().await.unwrap();
        let err = t.update().await.unwrap_err();
        assert!(matches!(err, Error::UpdateThrottled { .. }));

        tokio::time::advance(Duration::from_secs(61)).await;
        t.update().await.unwrap();
        assert_eq!(t.protocol().reads.lock().len(), 2);
    }

    #[test]
    fn accessors_fail_before_update() {
        let t = thermostat(MockProtocol::default());
        assert!(matches!(t.cur_temp(), Err(Error::FieldNotPresent(_))));
        assert!(matches!(t.setback(), Err(Error::FieldNotPresent(_))));
        assert!(matches!(t.name(), Err(Error::FieldNotPresent(_))));
        assert!(matches!(t.actual_time(), Err(Error::FieldNotPresent(_))));
    }

    #[tokio::test]
    async fn set_setback_heat_writes_single_field() {
        let t = thermostat(MockProtocol::default());
        t.set_setback_heat(69.1).await.unwrap();

        let writes = t.protocol().writes.lock().clone();
        assert_eq!(writes, vec!["OID4.1.5=691&submit=Submit".to_string()]);
        assert!((t.setback_heat().unwrap() - 69.1).abs() < 1e-9);
        assert!(t.protocol().reads.lock().is_empty());
    }

    #[tokio::test]
    async fn failed_write_restores_cache() {
        let t = cached(&[(Field::SetbackCool, "760")]);
        let t = Thermostat {
            protocol: MockProtocol::failing(),
            ..t
        };

        assert!(t.set_setback_cool(72.0).await.is_err());
        assert!((t.setback_cool().unwrap() - 76.0).abs() < 1e-9);

        assert!(t.set_fan_mode(2).await.is_err());
        assert!(matches!(t.fan_mode(), Err(Error::FieldNotPresent(_))));
    }

    #[tokio::test]
    async fn set_modes_pass_integers_through() {
        let t = thermostat(MockProtocol::default());
        t.set_hvac_mode(HvacMode::Cool).await.unwrap();
        t.set_hvac_state(5).await.unwrap();
        t.set_fan_mode(1).await.unwrap();

        let writes = t.protocol().writes.lock().clone();
        assert_eq!(
            writes,
            vec![
                "OID4.1.1=3&submit=Submit".to_string(),
                "OID4.1.2=5&submit=Submit".to_string(),
                "OID4.1.3=1&submit=Submit".to_string(),
            ]
        );
        assert!(t.is_cooling().unwrap());
        assert_eq!(t.hvac_state().unwrap(), 5);
        assert_eq!(t.fan_mode().unwrap(), 1);
    }

    #[tokio::test]
    async fn setback_follows_mode() {
        let t = cached(&[
            (Field::HvacMode, "3"),
            (Field::SetbackHeat, "680"),
            (Field::SetbackCool, "760"),
        ]);
        assert_eq!(t.setback().unwrap(), Setback::Cool(76.0));

        assert_eq!(t.set_setback(74.5).await.unwrap(), Setback::Cool(74.5));
        let writes = t.protocol().writes.lock().clone();
        assert_eq!(writes, vec!["OID4.1.6=745&submit=Submit".to_string()]);

        t.set_hvac_mode(HvacMode::Heat).await.unwrap();
        assert_eq!(t.setback().unwrap(), Setback::Heat(68.0));
    }

    #[tokio::test]
    async fn setback_not_applicable_when_off() {
        let t = cached(&[
            (Field::HvacMode, "1"),
            (Field::SetbackHeat, "680"),
            (Field::SetbackCool, "760"),
        ]);
        assert_eq!(t.setback().unwrap(), Setback::NotApplicable);
        assert_eq!(t.set_setback(70.0).await.unwrap(), Setback::NotApplicable);
        assert!(t.protocol().writes.lock().is_empty());
    }

    #[test]
    fn fan_state_decoding() {
        assert_eq!(cached(&[(Field::FanState, "2")]).fan_state().unwrap(), FanState::On);
        assert_eq!(cached(&[(Field::FanState, "1")]).fan_state().unwrap(), FanState::Off);
        assert_eq!(cached(&[(Field::FanState, "0")]).fan_state().unwrap(), FanState::Off);
    }

    #[test]
    fn usage_counters_and_identity() {
        let t = cached(&[
            (Field::Heat1Usage, "120"),
            (Field::Cool1Usage, "45"),
            (Field::FanUsage, "300"),
            (Field::LastUsageReset, "1464739200"),
            (Field::ModelName, "NT10e"),
            (Field::SerialNum, "0123456789"),
            (Field::RelHumidity, "41"),
            (Field::CurrentClass, "2"),
        ]);
        assert_eq!(t.heat1_usage().unwrap(), 120);
        assert_eq!(t.cool1_usage().unwrap(), 45);
        assert_eq!(t.fan_usage().unwrap(), 300);
        assert_eq!(t.last_usage_reset().unwrap(), 1_464_739_200);
        assert_eq!(t.model_name().unwrap(), "NT10e");
        assert_eq!(t.serial_number().unwrap(), "0123456789");
        assert_eq!(t.relative_humidity().unwrap(), 41);
        assert_eq!(t.current_class().unwrap(), 2);
    }

    #[tokio::test]
    async fn generic_get_and_set() {
        let t = thermostat(MockProtocol::default());
        t.set(Field::SetbackCool, &Value::Temperature(75.0))
            .await
            .unwrap();
        assert_eq!(t.get(Field::SetbackCool).unwrap(), Value::Temperature(75.0));
        assert_eq!(
            t.protocol().writes.lock().clone(),
            vec!["OID4.1.6=750&submit=Submit".to_string()]
        );
    }

    #[tokio::test]
    async fn set_rejects_mismatched_kinds_without_writing() {
        let t = cached(&[
            (Field::HvacMode, "2"),
            (Field::SetbackHeat, "680"),
            (Field::Time, "1466017200"),
        ]);
        let before = t.state();

        let cases = [
            (Field::HvacMode, Value::Temperature(3.0)),
            (Field::SetbackHeat, Value::Integer(70)),
            (Field::Time, Value::Text("noon".to_string())),
        ];
        for (field, value) in &cases {
            let err = t.set(*field, value).await.unwrap_err();
            assert!(
                matches!(err, Error::Value(ValueError::KindMismatch { .. })),
                "{field}: {err}"
            );
        }

        assert!(t.protocol().writes.lock().is_empty());
        assert_eq!(t.state(), before);
    }

    #[tokio::test]
    async fn set_rejects_fan_state() {
        let t = cached(&[(Field::FanState, "2")]);
        let err = t
            .set(Field::FanState, &Value::Fan(FanState::Off))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::ReadOnly(ref name)) if name == "FanState"));
        assert!(t.protocol().writes.lock().is_empty());
        assert_eq!(t.fan_state().unwrap(), FanState::On);
    }

    #[tokio::test]
    async fn write_drops_unknown_names() {
        let t = thermostat(MockProtocol::default());
        t.write([("SetbackHeat", "700"), ("NotARealField", "1")])
            .await
            .unwrap();
        assert_eq!(
            t.protocol().writes.lock().clone(),
            vec!["OID4.1.5=700&submit=Submit".to_string()]
        );
        assert!(t.state().is_empty());
    }
}
