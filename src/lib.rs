//! Qualification-aware greedy shift assignment.
//!
//! Assigns time blocks (fixed-weekday, fixed-interval work sessions) to
//! qualified employees under per-employee workload budgets. Candidate
//! lookup runs against augmented AVL interval trees, one per weekday and
//! qualification.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Interval`, `Employee`, `TimeBlock`,
//!   `QualificationCode`, `QualificationTally`
//! - **`index`**: `IntervalTree` (augmented AVL, containment queries) and
//!   `BucketIndex` (weekday → qualification → tree)
//! - **`roster`**: `Roster` dataset and `RosterBuilder` loader with diagnostics
//! - **`scheduler`**: `QuickAssigner` greedy matcher, `AssignEvent`s,
//!   `AssignmentSummary`
//! - **`validation`**: Diagnostics type and assignment bookkeeping checks
//! - **`config`**: `AssignConfig` run settings
//! - **`error`**: Fatal error types
//!
//! # Architecture
//!
//! Loading spreadsheets and rendering reports are left to the caller: this
//! crate takes normalized records and hands back the final roster state.
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 13 & 14.3
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod config;
pub mod error;
pub mod index;
pub mod models;
pub mod roster;
pub mod scheduler;
pub mod validation;
