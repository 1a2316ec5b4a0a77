//! Interval indices for availability and block lookup.
//!
//! - **`tree`**: [`IntervalTree`], an augmented AVL tree keyed by
//!   [`Interval`](crate::models::Interval) with containment queries.
//! - **`buckets`**: [`BucketIndex`], one tree per (weekday, qualification).
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 14.3 (Interval Trees)

mod buckets;
mod tree;

pub use buckets::BucketIndex;
pub use tree::{IntervalTree, NodeRef};
