//! Time block model.
//!
//! A time block is one fixed-weekday, fixed-interval session of work that
//! requires a single qualification. Blocks are created at load time; only
//! the assignment back-reference changes while matching.
//!
//! # Status
//! `status == 0` marks a block open for automatic assignment. Any other
//! value means the block was assigned by hand upstream and the engine
//! must leave it alone.
//!
//! # Pairing
//! `paired_block_ids` couples sessions: when the engine picks an employee
//! for this block, every listed block must go to the same employee in the
//! same step, or none of them do.

use std::fmt;

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::{weekday_code, EmployeeId, Interval, QualificationCode};

/// Unique time block identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-run lifecycle of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockState {
    /// Manually handled upstream; never touched by the engine.
    Excluded,
    /// Open and not yet assigned.
    Unassigned,
    /// Assigned to an employee. Terminal for the run.
    Assigned,
}

/// A discrete unit of work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeBlock {
    /// Unique block identifier.
    pub id: BlockId,
    /// Human-readable label.
    pub label: String,
    /// Where the work happens.
    #[serde(default)]
    pub location: String,
    /// Required qualification.
    pub qualification: QualificationCode,
    /// Day of the week.
    pub weekday: Weekday,
    /// Time of day.
    pub interval: Interval,
    /// Weight consumed against an employee's requested budget.
    /// Defaults to the interval length in hours.
    pub time_metric: f64,
    /// 0 = open for automatic assignment; non-zero = excluded.
    #[serde(default)]
    pub status: i32,
    /// Blocks that must be assigned together with this one, in order.
    #[serde(default)]
    pub paired_block_ids: Vec<BlockId>,
    #[serde(default, skip_deserializing)]
    assigned_employee: Option<EmployeeId>,
}

impl TimeBlock {
    /// Creates an open, unpaired block.
    pub fn new(
        id: BlockId,
        label: impl Into<String>,
        qualification: impl Into<QualificationCode>,
        weekday: Weekday,
        interval: Interval,
    ) -> Self {
        Self {
            id,
            label: label.into(),
            location: String::new(),
            qualification: qualification.into(),
            weekday,
            interval,
            time_metric: interval.hours(),
            status: 0,
            paired_block_ids: Vec::new(),
            assigned_employee: None,
        }
    }

    /// Sets the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the time metric.
    pub fn with_time_metric(mut self, time_metric: f64) -> Self {
        self.time_metric = time_metric;
        self
    }

    /// Sets the status flag.
    pub fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Couples this block with others.
    pub fn with_pairs(mut self, ids: impl IntoIterator<Item = BlockId>) -> Self {
        self.paired_block_ids.extend(ids);
        self
    }

    /// Whether the block is open for automatic assignment.
    #[inline]
    pub fn is_automatic(&self) -> bool {
        self.status == 0
    }

    /// Whether the block is coupled with other blocks.
    #[inline]
    pub fn is_paired(&self) -> bool {
        !self.paired_block_ids.is_empty()
    }

    /// The employee holding this block, if any.
    #[inline]
    pub fn assigned_employee(&self) -> Option<EmployeeId> {
        self.assigned_employee
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BlockState {
        if !self.is_automatic() {
            BlockState::Excluded
        } else if self.assigned_employee.is_some() {
            BlockState::Assigned
        } else {
            BlockState::Unassigned
        }
    }

    pub(crate) fn set_assigned_employee(&mut self, employee: EmployeeId) {
        self.assigned_employee = Some(employee);
    }

    pub(crate) fn clear_assignment(&mut self) {
        self.assigned_employee = None;
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[@id = {}; @label = {}; @time_metric = {}; @day = {}]",
            self.id,
            self.label,
            self.time_metric,
            weekday_code(self.weekday)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block() -> TimeBlock {
        TimeBlock::new(
            BlockId(7),
            "Swim Lessons",
            "wsi",
            Weekday::Mon,
            Interval::from_hm(9, 0, 10, 30).unwrap(),
        )
    }

    #[test]
    fn test_block_builder() {
        let b = block()
            .with_location("Pool B")
            .with_time_metric(2.0)
            .with_pairs([BlockId(8), BlockId(9)]);

        assert_eq!(b.id, BlockId(7));
        assert_eq!(b.location, "Pool B");
        assert_eq!(b.qualification.as_str(), "WSI");
        assert!((b.time_metric - 2.0).abs() < 1e-10);
        assert!(b.is_paired());
        assert_eq!(b.paired_block_ids, vec![BlockId(8), BlockId(9)]);
    }

    #[test]
    fn test_default_metric_is_hours() {
        assert!((block().time_metric - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_state() {
        let mut b = block();
        assert_eq!(b.state(), BlockState::Unassigned);

        b.set_assigned_employee(EmployeeId(1));
        assert_eq!(b.state(), BlockState::Assigned);
        assert_eq!(b.assigned_employee(), Some(EmployeeId(1)));

        b.clear_assignment();
        assert_eq!(b.state(), BlockState::Unassigned);

        let manual = block().with_status(2);
        assert!(!manual.is_automatic());
        assert_eq!(manual.state(), BlockState::Excluded);
    }

    #[test]
    fn test_deserialize_without_assignment_state() {
        let json = r#"{
            "id": 7,
            "label": "Swim Lessons",
            "qualification": "wsi",
            "weekday": "Mon",
            "interval": { "start": "09:00:00", "end": "10:30:00" },
            "time_metric": 1.5,
            "assigned_employee": 4
        }"#;
        let b: TimeBlock = serde_json::from_str(json).unwrap();

        assert_eq!(b.id, BlockId(7));
        assert_eq!(b.qualification.as_str(), "WSI");
        assert!(b.location.is_empty());
        assert!(b.is_automatic());
        assert!(!b.is_paired());
        assert_eq!(b.assigned_employee(), None);
        assert_eq!(b.state(), BlockState::Unassigned);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            block().to_string(),
            "[@id = 7; @label = Swim Lessons; @time_metric = 1.5; @day = M]"
        );
    }
}
