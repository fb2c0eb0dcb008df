//! Local-time handling for decisioning checks
//!
//! Claims are stored with UTC timestamps, but two pieces of decisioning
//! logic care about the wall clock where the business operates: the
//! business-hours condition field and the timing-anomaly fraud factor.
//! This module provides the timezone wrapper and hour-window types both use.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Timezone wrapper for the operating jurisdiction
///
/// Wraps chrono_tz::Tz with custom serialization support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timezone(pub Tz);

impl Serialize for Timezone {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.0.name())
    }
}

impl<'de> Deserialize<'de> for Timezone {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Tz::from_str(&s)
            .map(Timezone)
            .map_err(|_| serde::de::Error::custom(format!("Invalid timezone: {}", s)))
    }
}

impl Timezone {
    pub fn new(tz: Tz) -> Self {
        Self(tz)
    }

    /// Converts a UTC datetime to the local timezone
    pub fn to_local(&self, utc: DateTime<Utc>) -> DateTime<Tz> {
        utc.with_timezone(&self.0)
    }

    /// Local hour of day (0-23) for a UTC timestamp
    pub fn local_hour(&self, utc: DateTime<Utc>) -> u32 {
        self.to_local(utc).hour()
    }
}

impl Default for Timezone {
    fn default() -> Self {
        Self(chrono_tz::UTC)
    }
}

/// An inclusive window of local hours, possibly wrapping midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalTimeWindow {
    /// First hour inside the window (inclusive)
    pub start_hour: u32,
    /// Last hour inside the window (inclusive)
    pub end_hour: u32,
}

impl LocalTimeWindow {
    pub const fn between(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether the given local hour falls inside the window
    pub fn contains_hour(&self, hour: u32) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour <= self.end_hour
        } else {
            // Window wraps midnight
            hour >= self.start_hour || hour <= self.end_hour
        }
    }

    /// Whether a UTC timestamp falls inside the window in the given timezone
    pub fn contains(&self, tz: Timezone, utc: DateTime<Utc>) -> bool {
        self.contains_hour(tz.local_hour(utc))
    }
}

/// Business hours: 09:00-17:59 local, hour-granular and inclusive
pub const BUSINESS_HOURS: LocalTimeWindow = LocalTimeWindow::between(9, 17);

/// Overnight quiet hours: before 06:00 or after 22:00 local
pub const OVERNIGHT_QUIET_HOURS: LocalTimeWindow = LocalTimeWindow::between(23, 5);
