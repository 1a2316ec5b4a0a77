//! Reporter-facing view of a finished run.
//!
//! Collects what an external reporter renders after matching: each
//! block's holder, each employee's assigned vs requested time metric, and
//! the qualification tally.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Coverage | Assigned open blocks / open blocks |
//! | Utilization | assigned / requested per employee (0 when nothing requested) |
//! | Avg Utilization | Mean utilization over employees |

use serde::Serialize;

use crate::models::{weekday_code, BlockId, EmployeeId, QualificationCode};
use crate::roster::Roster;

/// Placeholder shown in place of an employee for unassigned blocks.
pub const UNASSIGNED: &str = "--";

/// One row of the block assignment report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockRow {
    pub block_id: BlockId,
    pub label: String,
    pub location: String,
    pub qualification: QualificationCode,
    /// Weekday code (`U M T W R F S`).
    pub day: char,
    pub start: String,
    pub end: String,
    pub time_metric: f64,
    pub status: i32,
    pub employee_id: Option<EmployeeId>,
    /// `"Last, First"`, or [`UNASSIGNED`].
    pub employee_name: String,
}

/// One row of the employee time metric report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeRow {
    pub employee_id: EmployeeId,
    pub last_name: String,
    pub first_name: String,
    pub priority: i32,
    pub assigned_time_metric: f64,
    pub requested_time_metric: f64,
    pub blocks: usize,
}

/// Final state of a roster, ready for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSummary {
    /// Every block in load order.
    pub blocks: Vec<BlockRow>,
    /// Every employee in load order.
    pub employees: Vec<EmployeeRow>,
    /// Registered qualifications with qualified-employee counts.
    pub qualification_tally: Vec<(QualificationCode, usize)>,
    /// Open blocks without an employee.
    pub unassigned: Vec<BlockId>,
    /// Fraction of open blocks that were assigned (1.0 when none are open).
    pub coverage: f64,
    /// Mean of per-employee assigned / requested.
    pub avg_utilization: f64,
}

impl AssignmentSummary {
    /// Builds the summary from a roster's current state.
    pub fn calculate(roster: &Roster) -> Self {
        let mut open = 0usize;
        let mut unassigned = Vec::new();

        let blocks: Vec<BlockRow> = roster
            .blocks()
            .iter()
            .map(|block| {
                let holder = block
                    .assigned_employee()
                    .and_then(|id| roster.employee(id));

                if block.is_automatic() {
                    open += 1;
                    if holder.is_none() {
                        unassigned.push(block.id);
                    }
                }

                BlockRow {
                    block_id: block.id,
                    label: block.label.clone(),
                    location: block.location.clone(),
                    qualification: block.qualification.clone(),
                    day: weekday_code(block.weekday),
                    start: block.interval.start().format("%H:%M").to_string(),
                    end: block.interval.end().format("%H:%M").to_string(),
                    time_metric: block.time_metric,
                    status: block.status,
                    employee_id: holder.map(|e| e.id),
                    employee_name: holder.map_or_else(
                        || UNASSIGNED.to_string(),
                        |e| format!("{}, {}", e.last_name, e.first_name),
                    ),
                }
            })
            .collect();

        let employees: Vec<EmployeeRow> = roster
            .employees()
            .iter()
            .map(|e| EmployeeRow {
                employee_id: e.id,
                last_name: e.last_name.clone(),
                first_name: e.first_name.clone(),
                priority: e.priority,
                assigned_time_metric: e.assigned_time_metric(),
                requested_time_metric: e.requested_time_metric,
                blocks: e.assigned_blocks().len(),
            })
            .collect();

        let coverage = if open == 0 {
            1.0
        } else {
            (open - unassigned.len()) as f64 / open as f64
        };

        let avg_utilization = if employees.is_empty() {
            0.0
        } else {
            let sum: f64 = employees.iter().map(EmployeeRow::utilization).sum();
            sum / employees.len() as f64
        };

        Self {
            blocks,
            employees,
            qualification_tally: roster
                .tally()
                .iter()
                .map(|(code, count)| (code.clone(), count))
                .collect(),
            unassigned,
            coverage,
            avg_utilization,
        }
    }
}

impl EmployeeRow {
    /// assigned / requested, or 0 when nothing was requested.
    pub fn utilization(&self) -> f64 {
        if self.requested_time_metric > 0.0 {
            self.assigned_time_metric / self.requested_time_metric
        } else {
            0.0
        }
    }
}
