// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP thermostat builder.

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{HostClock, SystemClock};
use crate::error::Error;
use crate::protocol::{HttpClient, HttpConfig};
use crate::thermostat::Thermostat;

/// Builder for HTTP thermostat clients.
///
/// Created with `Thermostat::http("host")` or
/// `Thermostat::http_config(HttpConfig::new("host").with_port(8080))`.
///
/// # Examples
///
/// ```no_run
/// use std::time::Duration;
/// use proliphix_lib::Thermostat;
///
/// # fn example() -> proliphix_lib::Result<()> {
/// let thermostat = Thermostat::http("192.168.1.20")
///     .with_credentials("admin", "admin")
///     .with_timeout(Duration::from_secs(5))
///     .with_min_update_interval(Duration::from_secs(60))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct HttpThermostatBuilder {
    config: HttpConfig,
    clock: Arc<dyn HostClock>,
    clock_correction: bool,
    min_update_interval: Option<Duration>,
}

impl HttpThermostatBuilder {
    /// Creates a new builder with the specified HTTP configuration.
    pub(crate) fn new(config: HttpConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            clock_correction: true,
            min_update_interval: None,
        }
    }

    /// Sets HTTP basic authentication credentials.
    #[must_use]
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.config = self.config.with_credentials(username, password);
        self
    }

    /// Sets a custom port.
    #[must_use]
    pub fn with_port(mut self, port: u16) -> Self {
        self.config = self.config.with_port(port);
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.with_timeout(timeout);
        self
    }

    /// Rejects updates issued sooner than `interval` after the previous one.
    #[must_use]
    pub fn with_min_update_interval(mut self, interval: Duration) -> Self {
        self.min_update_interval = Some(interval);
        self
    }

    /// Enables or disables device clock correction (enabled by default).
    #[must_use]
    pub fn with_clock_correction(mut self, enabled: bool) -> Self {
        self.clock_correction = enabled;
        self
    }

    /// Replaces the host clock used for drift detection.
    #[must_use]
    pub fn with_clock(mut self, clock: impl HostClock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the HTTP configuration.
    #[must_use]
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Builds the thermostat client. No request is made.
    ///
    /// # Errors
    ///
    /// Returns error if the host is empty or the HTTP client cannot be
    /// created.
    pub fn build(self) -> Result<Thermostat<HttpClient>, Error> {
        let client = self.config.into_client().map_err(Error::Protocol)?;
        let mut thermostat = Thermostat::new(client)
            .with_shared_clock(self.clock)
            .with_clock_correction(self.clock_correction);
        if let Some(interval) = self.min_update_interval {
            thermostat = thermostat.with_min_update_interval(interval);
        }
        Ok(thermostat)
    }
}
