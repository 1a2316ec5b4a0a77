//! Closed time-of-day intervals.
//!
//! An [`Interval`] is `[start, end]` over [`NaiveTime`], inclusive at both
//! ends. Intervals are totally ordered by `start`, then `end`, which is
//! the key order of the interval tree.
//!
//! # Containment
//! `a.contains(b)` iff `a.start <= b.start && b.end <= a.end`. Availability
//! and candidate lookup are containment tests, not overlap tests: an
//! employee available 09:00-12:00 can take a 10:00-11:00 block, but not
//! an 11:00-13:00 one.

use std::fmt;

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::IntervalError;

/// An immutable closed time range within a day.
///
/// Construction rejects `start > end`, so every `Interval` in existence
/// is well-formed. Zero-length intervals are allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawInterval")]
pub struct Interval {
    // Field order drives the derived ordering: start, then end.
    start: NaiveTime,
    end: NaiveTime,
}

#[derive(Deserialize)]
struct RawInterval {
    start: NaiveTime,
    end: NaiveTime,
}

impl TryFrom<RawInterval> for Interval {
    type Error = IntervalError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        Interval::new(raw.start, raw.end)
    }
}

impl Interval {
    /// Creates an interval, rejecting `start > end`.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, IntervalError> {
        if start > end {
            return Err(IntervalError::Inverted { start, end });
        }
        Ok(Self { start, end })
    }

    /// Creates an interval from hour/minute pairs (24-hour clock).
    ///
    /// ```
    /// use u_assign::models::Interval;
    ///
    /// let morning = Interval::from_hm(9, 0, 12, 0).unwrap();
    /// let meeting = Interval::from_hm(10, 0, 11, 0).unwrap();
    /// assert!(morning.contains(&meeting));
    /// assert!(Interval::from_hm(12, 0, 9, 0).is_err());
    /// ```
    pub fn from_hm(
        start_hour: u32,
        start_minute: u32,
        end_hour: u32,
        end_minute: u32,
    ) -> Result<Self, IntervalError> {
        Self::new(
            time_of_day(start_hour, start_minute)?,
            time_of_day(end_hour, end_minute)?,
        )
    }

    /// Interval start (inclusive).
    #[inline]
    pub fn start(&self) -> NaiveTime {
        self.start
    }

    /// Interval end (inclusive).
    #[inline]
    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether `other` lies entirely within this interval.
    #[inline]
    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Length of the interval.
    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Length of the interval in fractional hours.
    pub fn hours(&self) -> f64 {
        self.duration().num_seconds() as f64 / 3600.0
    }
}

fn time_of_day(hour: u32, minute: u32) -> Result<NaiveTime, IntervalError> {
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(IntervalError::InvalidTime { hour, minute })
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{} - {}]",
            self.start.format("%H:%M"),
            self.end.format("%H:%M")
        )
    }
}
