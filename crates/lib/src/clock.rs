//! Time provider abstraction
//!
//! This module provides a [`Clock`] trait that abstracts over time sources,
//! allowing production code to use real system time while tests can use
//! controllable mock time. Stores read their clock once, when their
//! time-based identifier is first requested.
//!
//! # Example
//!
//! ```
//! use propbag::{Clock, SystemClock};
//!
//! let clock = SystemClock;
//! let millis = clock.now_millis();
//! assert!(clock.now_utc().timestamp_millis() >= millis as i64);
//! ```

use std::fmt::Debug;
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(any(test, feature = "testing"))]
use std::cell::Cell;

use chrono::{DateTime, FixedOffset, Local, Utc};

/// A time provider for getting current timestamps.
pub trait Clock: Debug {
    /// Returns the current time as milliseconds since Unix epoch.
    fn now_millis(&self) -> u64;

    /// Returns the current time as a UTC calendar date-time.
    ///
    /// Derived from [`Clock::now_millis`], so both views of a clock agree.
    fn now_utc(&self) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp_millis(self.now_millis() as i64).unwrap_or_default()
    }

    /// Returns the current time in the clock's local time zone.
    ///
    /// Reads the clock once; defaults to the system's local offset.
    fn now_local(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&Local).fixed_offset()
    }
}

/// Production clock using real system time.
///
/// This is the default clock for every [`crate::Store`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Test clock with auto-advancing time.
///
/// Each `now_millis()` call returns the current value and then advances it by
/// one millisecond, so consecutive readings are strictly increasing.
/// Only available in unit tests or with the `testing` feature.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug)]
pub struct FixedClock {
    millis: Cell<u64>,
    offset: FixedOffset,
}

#[cfg(any(test, feature = "testing"))]
impl FixedClock {
    /// Create a new fixed clock with the given initial time in milliseconds.
    ///
    /// Its local time zone is UTC until changed with [`FixedClock::with_offset`].
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Cell::new(millis),
            offset: chrono::Offset::fix(&Utc),
        }
    }

    /// Use `offset` as the clock's local time zone.
    pub fn with_offset(mut self, offset: FixedOffset) -> Self {
        self.offset = offset;
        self
    }

    /// Advance the clock by the given number of milliseconds.
    pub fn advance(&self, ms: u64) {
        self.millis.set(self.millis.get() + ms);
    }

    /// Get the current time without advancing.
    pub fn get(&self) -> u64 {
        self.millis.get()
    }
}

#[cfg(any(test, feature = "testing"))]
impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        let t = self.millis.get();
        self.millis.set(t + 1);
        t
    }

    fn now_local(&self) -> DateTime<FixedOffset> {
        self.now_utc().with_timezone(&self.offset)
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for FixedClock {
    fn default() -> Self {
        // 2024-01-01 00:00:00 UTC
        Self::new(1704067200000)
    }
}
