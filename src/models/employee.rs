//! Employee model.
//!
//! Employees carry qualifications, a requested workload budget, per-weekday
//! availability, and the blocks assigned to them so far. The running total
//! `assigned_time_metric` always equals the sum of the assigned blocks'
//! time metrics.
//!
//! # Ordering
//! Employees compare by `priority` alone. Two different employees with
//! the same priority are *equal* under `Ord`/`Eq`, and so are their
//! [`CandidateKey`]s: a candidate set keeps only the first one the index
//! query reaches in its node, left, right walk.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{BlockId, Interval, QualificationCode, TimeBlock};

/// Unique employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub u32);

impl fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A block held by an employee, as recorded at assignment time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssignedSlot {
    /// The assigned block.
    pub block_id: BlockId,
    /// Its weekday.
    pub weekday: Weekday,
    /// Its interval.
    pub interval: Interval,
    /// Its time metric.
    pub time_metric: f64,
}

/// Interval-tree payload identifying an employee.
///
/// Ordered (and equal) by priority only, mirroring [`Employee`]'s ordering.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CandidateKey {
    /// Employee priority; the ordering key.
    pub priority: i32,
    /// The employee this key stands for.
    pub employee: EmployeeId,
}

impl PartialEq for CandidateKey {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for CandidateKey {}

impl PartialOrd for CandidateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CandidateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

/// A person who can be assigned time blocks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier.
    pub id: EmployeeId,
    /// Ordering key. Larger values are offered blocks first.
    pub priority: i32,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Held qualifications.
    pub qualifications: BTreeSet<QualificationCode>,
    /// Workload budget in time-metric units.
    pub requested_time_metric: f64,
    #[serde(default, skip_deserializing)]
    assigned_time_metric: f64,
    #[serde(default, skip_deserializing)]
    assigned_blocks: Vec<AssignedSlot>,
    #[serde(default)]
    availability: HashMap<Weekday, Vec<Interval>>,
}

impl Employee {
    /// Creates an employee with no qualifications, budget, or availability.
    pub fn new(id: EmployeeId, priority: i32) -> Self {
        Self {
            id,
            priority,
            first_name: String::new(),
            last_name: String::new(),
            qualifications: BTreeSet::new(),
            requested_time_metric: 0.0,
            assigned_time_metric: 0.0,
            assigned_blocks: Vec::new(),
            availability: HashMap::new(),
        }
    }

    /// Sets first and last name.
    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.first_name = first.into();
        self.last_name = last.into();
        self
    }

    /// Sets the workload budget.
    pub fn with_requested_time(mut self, requested: f64) -> Self {
        self.requested_time_metric = requested;
        self
    }

    /// Adds a qualification.
    pub fn with_qualification(mut self, code: impl Into<QualificationCode>) -> Self {
        self.qualifications.insert(code.into());
        self
    }

    /// Adds an availability window.
    pub fn with_availability(mut self, day: Weekday, interval: Interval) -> Self {
        self.add_availability(day, interval);
        self
    }

    /// Appends an availability window for a weekday.
    pub fn add_availability(&mut self, day: Weekday, interval: Interval) {
        self.availability.entry(day).or_default().push(interval);
    }

    /// Availability windows for a weekday, in insertion order.
    pub fn availability_on(&self, day: Weekday) -> &[Interval] {
        self.availability.get(&day).map_or(&[], Vec::as_slice)
    }

    /// Whether the employee holds a qualification.
    pub fn has_qualification(&self, code: &QualificationCode) -> bool {
        self.qualifications.contains(code)
    }

    /// Key used in the availability interval index.
    pub fn candidate_key(&self) -> CandidateKey {
        CandidateKey {
            priority: self.priority,
            employee: self.id,
        }
    }

    /// Total time metric assigned so far.
    #[inline]
    pub fn assigned_time_metric(&self) -> f64 {
        self.assigned_time_metric
    }

    /// Budget left before reaching the requested time metric.
    pub fn remaining_time_metric(&self) -> f64 {
        self.requested_time_metric - self.assigned_time_metric
    }

    /// Assigned blocks in assignment order.
    pub fn assigned_blocks(&self) -> &[AssignedSlot] {
        &self.assigned_blocks
    }

    /// Whether taking `block` keeps the employee within budget.
    pub fn has_remaining_budget(&self, block: &TimeBlock) -> bool {
        self.assigned_time_metric + block.time_metric <= self.requested_time_metric
    }

    /// Whether some availability window on the block's weekday contains it.
    pub fn is_available_for(&self, block: &TimeBlock) -> bool {
        self.availability_on(block.weekday)
            .iter()
            .any(|window| window.contains(&block.interval))
    }

    /// Whether a block already held on the same weekday contains `block`.
    pub fn has_conflict(&self, block: &TimeBlock) -> bool {
        self.assigned_blocks
            .iter()
            .any(|slot| slot.weekday == block.weekday && slot.interval.contains(&block.interval))
    }

    /// Assigns a block and points its back-reference at this employee.
    ///
    /// Performs no checks; callers validate budget, availability, and
    /// conflicts first.
    pub fn assign(&mut self, block: &mut TimeBlock) {
        block.set_assigned_employee(self.id);
        self.assigned_time_metric += block.time_metric;
        self.assigned_blocks.push(AssignedSlot {
            block_id: block.id,
            weekday: block.weekday,
            interval: block.interval,
            time_metric: block.time_metric,
        });
    }

    /// Drops all assignments and zeroes the running total.
    ///
    /// Block back-references are owned by the blocks; see
    /// [`Roster::reset_assignments`](crate::roster::Roster::reset_assignments).
    pub fn reset(&mut self) {
        self.assigned_blocks.clear();
        self.assigned_time_metric = 0.0;
    }
}

impl PartialEq for Employee {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority
    }
}

impl Eq for Employee {}

impl PartialOrd for Employee {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Employee {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority.cmp(&other.priority)
    }
}

impl fmt::Display for Employee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {} [@id = {}; @priority = {}; @assigned = {:.2} / {:.2}]",
            self.last_name,
            self.first_name,
            self.id,
            self.priority,
            self.assigned_time_metric,
            self.requested_time_metric
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
        Interval::from_hm(sh, sm, eh, em).unwrap()
    }

    fn block(id: u32, day: Weekday, interval: Interval, metric: f64) -> TimeBlock {
        TimeBlock::new(BlockId(id), format!("B{id}"), "LG", day, interval).with_time_metric(metric)
    }

    fn employee() -> Employee {
        Employee::new(EmployeeId(1), 10)
            .with_name("Ada", "Lovelace")
            .with_requested_time(4.0)
            .with_qualification("lg")
            .with_availability(Weekday::Mon, iv(8, 0, 12, 0))
            .with_availability(Weekday::Mon, iv(13, 0, 17, 0))
    }

    #[test]
    fn test_employee_builder() {
        let e = employee();
        assert_eq!(e.id, EmployeeId(1));
        assert!(e.has_qualification(&"LG".into()));
        assert_eq!(e.availability_on(Weekday::Mon).len(), 2);
        assert!(e.availability_on(Weekday::Tue).is_empty());
        assert_eq!(e.assigned_time_metric(), 0.0);
        assert_eq!(e.to_string(), "Lovelace, Ada [@id = 1; @priority = 10; @assigned = 0.00 / 4.00]");
    }

    #[test]
    fn test_deserialize_without_assignment_state() {
        let json = r#"{
            "id": 3,
            "priority": 8,
            "first_name": "Ada",
            "last_name": "Lovelace",
            "qualifications": ["lg"],
            "requested_time_metric": 6.0,
            "assigned_time_metric": 99.0
        }"#;
        let e: Employee = serde_json::from_str(json).unwrap();

        assert_eq!(e.id, EmployeeId(3));
        assert!(e.has_qualification(&"LG".into()));
        assert_eq!(e.assigned_time_metric(), 0.0);
        assert!(e.assigned_blocks().is_empty());
        assert!(e.availability_on(Weekday::Mon).is_empty());

        let with_windows = r#"{
            "id": 4,
            "priority": 1,
            "first_name": "",
            "last_name": "",
            "qualifications": [],
            "requested_time_metric": 2.0,
            "availability": { "Tue": [{ "start": "08:00:00", "end": "12:00:00" }] }
        }"#;
        let e: Employee = serde_json::from_str(with_windows).unwrap();
        assert_eq!(e.availability_on(Weekday::Tue), &[iv(8, 0, 12, 0)]);
    }

    #[test]
    fn test_assign_updates_both_sides() {
        let mut e = employee();
        let mut b = block(1, Weekday::Mon, iv(9, 0, 10, 0), 1.0);
        e.assign(&mut b);

        assert_eq!(b.assigned_employee(), Some(EmployeeId(1)));
        assert_eq!(e.assigned_blocks().len(), 1);
        assert_eq!(e.assigned_blocks()[0].block_id, BlockId(1));
        assert!((e.assigned_time_metric() - 1.0).abs() < 1e-10);
        assert!((e.remaining_time_metric() - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_assigned_blocks_keep_order() {
        let mut e = employee();
        let mut b1 = block(1, Weekday::Mon, iv(9, 0, 10, 0), 1.0);
        let mut b2 = block(2, Weekday::Mon, iv(14, 0, 15, 0), 1.5);
        e.assign(&mut b2);
        e.assign(&mut b1);

        let ids: Vec<BlockId> = e.assigned_blocks().iter().map(|s| s.block_id).collect();
        assert_eq!(ids, vec![BlockId(2), BlockId(1)]);
        assert!((e.assigned_time_metric() - 2.5).abs() < 1e-10);
        assert_eq!(b1.assigned_employee(), Some(EmployeeId(1)));
        assert_eq!(b2.assigned_employee(), Some(EmployeeId(1)));
    }

    #[test]
    fn test_budget_is_inclusive() {
        let mut e = employee();
        let mut first = block(1, Weekday::Mon, iv(8, 0, 11, 0), 3.0);
        e.assign(&mut first);

        assert!(e.has_remaining_budget(&block(2, Weekday::Mon, iv(13, 0, 14, 0), 1.0)));
        assert!(!e.has_remaining_budget(&block(3, Weekday::Mon, iv(13, 0, 14, 0), 1.25)));
    }

    #[test]
    fn test_availability_is_containment() {
        let e = employee();
        assert!(e.is_available_for(&block(1, Weekday::Mon, iv(9, 0, 10, 0), 1.0)));
        assert!(e.is_available_for(&block(2, Weekday::Mon, iv(13, 0, 17, 0), 1.0)));
        // spans the lunch gap
        assert!(!e.is_available_for(&block(3, Weekday::Mon, iv(11, 0, 14, 0), 1.0)));
        assert!(!e.is_available_for(&block(4, Weekday::Tue, iv(9, 0, 10, 0), 1.0)));
    }

    #[test]
    fn test_conflict_same_day_containment() {
        let mut e = employee();
        let mut held = block(1, Weekday::Mon, iv(9, 0, 10, 0), 1.0);
        e.assign(&mut held);

        assert!(e.has_conflict(&block(2, Weekday::Mon, iv(9, 30, 9, 45), 0.25)));
        assert!(!e.has_conflict(&block(3, Weekday::Tue, iv(9, 30, 9, 45), 0.25)));
        assert!(!e.has_conflict(&block(4, Weekday::Mon, iv(10, 30, 11, 0), 0.5)));
    }

    #[test]
    fn test_reset() {
        let mut e = employee();
        let mut b = block(1, Weekday::Mon, iv(9, 0, 10, 0), 1.0);
        e.assign(&mut b);
        e.reset();
        assert!(e.assigned_blocks().is_empty());
        assert_eq!(e.assigned_time_metric(), 0.0);
    }

    #[test]
    fn test_equality_by_priority_only() {
        let a = Employee::new(EmployeeId(1), 5).with_name("A", "A");
        let b = Employee::new(EmployeeId(2), 5).with_name("B", "B");
        let c = Employee::new(EmployeeId(3), 6);
        assert_eq!(a, b);
        assert!(a < c);
        assert_eq!(a.candidate_key(), b.candidate_key());

        let mut keys = BTreeSet::new();
        assert!(keys.insert(a.candidate_key()));
        assert!(!keys.insert(b.candidate_key()));
        assert_eq!(keys.len(), 1);
        assert_eq!(keys.iter().next().unwrap().employee, EmployeeId(1));
    }
}
