// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device clock drift detection.
//!
//! The thermostat clock free-runs and drifts. Its firmware keeps the
//! hardware clock in *standard* local time and tracks daylight saving time
//! in a separate bit, so the value it reports during DST is compared
//! against the DST-adjusted host time, while the value written back is
//! always the standard-time one.
//!
//! # Examples
//!
//! ```
//! use proliphix_lib::clock::{ClockDrift, UtcOffsets};
//!
//! // Host in US Eastern daylight time: standard -5h, current -4h.
//! let offsets = UtcOffsets::new(-5 * 3600, -4 * 3600);
//! let drift = ClockDrift::compute(1_000_000, offsets, 0);
//!
//! assert_eq!(drift.actual_time(), 1_000_000 - 4 * 3600);
//! assert_eq!(drift.set_time(), 1_000_000 - 5 * 3600);
//! assert!(drift.needs_correction());
//! ```

use std::fmt;

use chrono::{DateTime, Datelike, Local, NaiveDate, TimeZone, Utc};

/// UTC offsets of the host, in seconds east of UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UtcOffsets {
    standard: i32,
    current: i32,
}

impl UtcOffsets {
    /// Creates offsets from the standard-time offset and the offset in
    /// effect right now.
    #[must_use]
    pub const fn new(standard: i32, current: i32) -> Self {
        Self { standard, current }
    }

    /// Offsets for a host whose zone never observes DST.
    #[must_use]
    pub const fn fixed(offset: i32) -> Self {
        Self::new(offset, offset)
    }

    /// Standard-time offset, ignoring DST.
    #[must_use]
    pub const fn standard(&self) -> i32 {
        self.standard
    }

    /// Offset currently in effect.
    #[must_use]
    pub const fn current(&self) -> i32 {
        self.current
    }

    /// Returns `true` when daylight saving time is in effect.
    #[must_use]
    pub const fn is_dst(&self) -> bool {
        self.current != self.standard
    }
}

/// Source of host time and timezone information.
pub trait HostClock: fmt::Debug + Send + Sync {
    /// Current host time in epoch seconds.
    fn now(&self) -> i64;

    /// Host UTC offsets at the given epoch second.
    fn offsets(&self, at: i64) -> UtcOffsets;
}

/// Host clock backed by the system time and local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl SystemClock {
    fn offset_at(naive_utc: Option<chrono::NaiveDateTime>) -> Option<i32> {
        naive_utc.map(|n| Local.offset_from_utc_datetime(&n).local_minus_utc())
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> i64 {
        Utc::now().timestamp()
    }

    fn offsets(&self, at: i64) -> UtcOffsets {
        let Some(utc) = DateTime::<Utc>::from_timestamp(at, 0) else {
            return UtcOffsets::fixed(0);
        };
        let current = utc.with_timezone(&Local).offset().local_minus_utc();

        // Standard time is the smaller of the midwinter and midsummer
        // offsets in either hemisphere.
        let year = utc.year();
        let january = Self::offset_at(
            NaiveDate::from_ymd_opt(year, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        );
        let july = Self::offset_at(
            NaiveDate::from_ymd_opt(year, 7, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
        );
        let standard = match (january, july) {
            (Some(j), Some(k)) => j.min(k),
            _ => current,
        };

        UtcOffsets::new(standard, current)
    }
}

/// Host clock frozen at a given instant, for tests and replays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: i64,
    offsets: UtcOffsets,
}

impl FixedClock {
    /// Creates a clock that always reports `now` with the given offsets.
    #[must_use]
    pub const fn new(now: i64, offsets: UtcOffsets) -> Self {
        Self { now, offsets }
    }
}

impl HostClock for FixedClock {
    fn now(&self) -> i64 {
        self.now
    }

    fn offsets(&self, _at: i64) -> UtcOffsets {
        self.offsets
    }
}

/// Drift between the device clock and the host's notion of device time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDrift {
    device_time: i64,
    actual_time: i64,
    set_time: i64,
}

impl ClockDrift {
    /// Drift beyond this many seconds triggers a correction.
    pub const THRESHOLD_SECS: i64 = 60;

    /// Computes the drift for a device reporting `device_time`.
    #[must_use]
    pub fn compute(now: i64, offsets: UtcOffsets, device_time: i64) -> Self {
        let set_time = now + i64::from(offsets.standard());
        let actual_time = if offsets.is_dst() {
            now + i64::from(offsets.current())
        } else {
            set_time
        };
        Self {
            device_time,
            actual_time,
            set_time,
        }
    }

    /// Computes the drift using a host clock.
    #[must_use]
    pub fn measure(clock: &dyn HostClock, device_time: i64) -> Self {
        let now = clock.now();
        Self::compute(now, clock.offsets(now), device_time)
    }

    /// Time the device reported.
    #[must_use]
    pub const fn device_time(&self) -> i64 {
        self.device_time
    }

    /// Time the device should be showing, DST-adjusted.
    #[must_use]
    pub const fn actual_time(&self) -> i64 {
        self.actual_time
    }

    /// Standard-time value to write back when correcting.
    #[must_use]
    pub const fn set_time(&self) -> i64 {
        self.set_time
    }

    /// Signed drift in seconds, `actual_time - device_time`.
    #[must_use]
    pub const fn seconds(&self) -> i64 {
        self.actual_time - self.device_time
    }

    /// Returns `true` when the drift exceeds [`Self::THRESHOLD_SECS`].
    #[must_use]
    pub const fn needs_correction(&self) -> bool {
        self.seconds().abs() > Self::THRESHOLD_SECS
    }
}
