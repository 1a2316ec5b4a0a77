//! Assignment engine and run reporting.
//!
//! # Algorithm
//!
//! [`QuickAssigner`] is a greedy, single-pass matcher. It is a heuristic:
//! fast and deterministic, with no optimality guarantee. Qualifications are
//! processed scarcest first, blocks longest first, and candidates from the
//! highest priority value down. Paired blocks go to one employee together
//! or not at all.
//!
//! Matching is strictly sequential. Each block's decision is final before
//! the next block is considered.
//!
//! # Reporting
//!
//! Each run returns an [`AssignOutcome`] with structured [`AssignEvent`]s.
//! [`AssignmentSummary`] turns the final roster into report rows.

mod events;
mod quick;
mod summary;

pub use events::AssignEvent;
pub use quick::{AssignOutcome, QuickAssigner};
pub use summary::{AssignmentSummary, BlockRow, EmployeeRow, UNASSIGNED};
