//! Scheduling domain models.
//!
//! | Type | Role |
//! |------|------|
//! | [`Interval`] | Closed time-of-day range; the interval tree key |
//! | [`QualificationCode`] | Normalized qualification identifier |
//! | [`QualificationTally`] | Registered codes and qualified-employee counts |
//! | [`Employee`] | Qualified, availability-constrained person with a budget |
//! | [`TimeBlock`] | Fixed-weekday, fixed-interval unit of work |

mod employee;
mod interval;
mod qualification;
mod time_block;
mod weekday;

pub use employee::{AssignedSlot, CandidateKey, Employee, EmployeeId};
pub use interval::Interval;
pub use qualification::{QualificationCode, QualificationTally};
pub use time_block::{BlockId, BlockState, TimeBlock};
pub use weekday::{weekday_code, weekday_from_code, WEEKDAYS};
