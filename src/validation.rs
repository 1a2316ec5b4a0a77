//! Input diagnostics and assignment-state integrity checks.
//!
//! Two uses share one error type:
//! - [`RosterBuilder`](crate::roster::RosterBuilder) records a
//!   [`ValidationError`] for every record it skips or repairs while
//!   loading (unregistered qualifications, unknown employee ids, dangling
//!   pairings). Loading continues past all of them.
//! - [`validate_roster`] checks a roster's assignment state against the
//!   bookkeeping invariants:
//!   - every employee's running total equals the sum of its blocks
//!   - no employee exceeds its requested budget
//!   - a block's back-reference is set iff the block is in that
//!     employee's list, and no block is held twice

use std::collections::HashMap;

use crate::models::{BlockId, EmployeeId};
use crate::roster::Roster;

const EPSILON: f64 = 1e-9;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A qualification code was used without being registered.
    UnregisteredQualification,
    /// A record references an employee that doesn't exist.
    UnknownEmployee,
    /// A pairing list references a block that doesn't exist.
    UnknownPairedBlock,
    /// A block lists itself as a paired session.
    SelfPairing,
    /// A block's time metric is zero, negative, or not a number.
    NonPositiveTimeMetric,
    /// An employee's running total disagrees with its assigned blocks.
    BudgetMismatch,
    /// An employee holds more than its requested budget.
    BudgetExceeded,
    /// A block and its employee disagree about the assignment.
    InconsistentAssignment,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks a roster's assignment bookkeeping.
///
/// Checks:
/// 1. Every block has a positive time metric
/// 2. Each employee's assigned total equals the sum of its blocks
/// 3. No employee exceeds its requested time metric
/// 4. Every held block points back at its holder, and nobody else holds it
/// 5. Every assigned block appears in its employee's list
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_roster(roster: &Roster) -> ValidationResult {
    let mut errors = Vec::new();

    for block in roster.blocks() {
        if block.time_metric.is_nan() || block.time_metric <= 0.0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveTimeMetric,
                format!("Time block {} has time metric {}", block.id, block.time_metric),
            ));
        }
    }

    let mut holders: HashMap<BlockId, EmployeeId> = HashMap::new();

    for employee in roster.employees() {
        let sum: f64 = employee.assigned_blocks().iter().map(|s| s.time_metric).sum();
        if (sum - employee.assigned_time_metric()).abs() > EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::BudgetMismatch,
                format!(
                    "Employee {} records {} assigned but holds blocks totalling {}",
                    employee.id,
                    employee.assigned_time_metric(),
                    sum
                ),
            ));
        }

        if employee.assigned_time_metric() > employee.requested_time_metric + EPSILON {
            errors.push(ValidationError::new(
                ValidationErrorKind::BudgetExceeded,
                format!(
                    "Employee {} holds {} of {} requested",
                    employee.id,
                    employee.assigned_time_metric(),
                    employee.requested_time_metric
                ),
            ));
        }

        for slot in employee.assigned_blocks() {
            if let Some(previous) = holders.insert(slot.block_id, employee.id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentAssignment,
                    format!(
                        "Time block {} is held by both employee {} and employee {}",
                        slot.block_id, previous, employee.id
                    ),
                ));
            }

            let points_back = roster
                .block(slot.block_id)
                .and_then(|block| block.assigned_employee())
                == Some(employee.id);
            if !points_back {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentAssignment,
                    format!(
                        "Employee {} holds time block {} which does not point back",
                        employee.id, slot.block_id
                    ),
                ));
            }
        }
    }

    for block in roster.blocks() {
        if let Some(employee) = block.assigned_employee() {
            if holders.get(&block.id) != Some(&employee) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InconsistentAssignment,
                    format!(
                        "Time block {} points at employee {} which does not hold it",
                        block.id, employee
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
