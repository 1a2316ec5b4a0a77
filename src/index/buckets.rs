//! Two-level (weekday → qualification) map of interval trees.
//!
//! Built once before matching and read-only afterwards.

use std::collections::{BTreeSet, HashMap};

use chrono::Weekday;

use super::IntervalTree;
use crate::models::{Interval, QualificationCode};

/// Interval trees bucketed by weekday and qualification.
#[derive(Debug, Clone)]
pub struct BucketIndex<T> {
    buckets: HashMap<Weekday, HashMap<QualificationCode, IntervalTree<T>>>,
}

impl<T: Ord + Clone> BucketIndex<T> {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self {
            buckets: HashMap::new(),
        }
    }

    /// Inserts a payload into the `(day, code)` bucket, creating it on demand.
    pub fn insert(&mut self, day: Weekday, code: &QualificationCode, interval: Interval, payload: T) {
        self.buckets
            .entry(day)
            .or_default()
            .entry(code.clone())
            .or_default()
            .insert(interval, payload);
    }

    /// The tree for `(day, code)`, if anything was ever inserted there.
    pub fn get(&self, day: Weekday, code: &QualificationCode) -> Option<&IntervalTree<T>> {
        self.buckets.get(&day)?.get(code)
    }

    /// Containment query against one bucket. Missing buckets yield an empty set.
    pub fn query(
        &self,
        day: Weekday,
        code: &QualificationCode,
        interval: &Interval,
        prune: bool,
    ) -> BTreeSet<T> {
        match self.get(day, code) {
            Some(tree) if prune => tree.query_pruned(interval),
            Some(tree) => tree.query(interval),
            None => BTreeSet::new(),
        }
    }

    /// Number of non-empty buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.values().map(HashMap::len).sum()
    }
}

impl<T: Ord + Clone> Default for BucketIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
