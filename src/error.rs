//! Fatal error types.
//!
//! Configuration gaps and unsatisfiable demand are not errors: they are
//! reported as [`ValidationError`](crate::validation::ValidationError)
//! diagnostics or as [`AssignEvent`](crate::scheduler::AssignEvent)s and
//! the run continues. The types here cover precondition violations that
//! must stop the caller.

use chrono::NaiveTime;
use thiserror::Error;

use crate::config::AssignMode;

/// A malformed interval was rejected at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IntervalError {
    /// `start` is later than `end`.
    #[error("interval start {start} is after end {end}")]
    Inverted { start: NaiveTime, end: NaiveTime },
    /// Hour/minute pair is not a valid time of day.
    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTime { hour: u32, minute: u32 },
}

/// The assignment engine refused to run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssignError {
    /// The requested mode has no algorithm behind it.
    #[error("assignment mode {0:?} is not yet implemented")]
    NotImplemented(AssignMode),
}
