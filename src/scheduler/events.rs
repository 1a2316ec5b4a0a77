//! Structured assignment events.
//!
//! The engine reports every decision as an [`AssignEvent`] and traces it
//! with structured fields. Formatting for humans is left to the consumer.

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::models::{BlockId, EmployeeId, QualificationCode};

/// One decision taken during an assignment run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignEvent {
    /// Nobody holds the qualification; its blocks are not attempted.
    QualificationSkipped {
        qualification: QualificationCode,
    },
    /// Matching started for a qualification.
    QualificationStarted {
        qualification: QualificationCode,
        qualified_employees: usize,
        blocks: usize,
    },
    /// The block is manually handled and was left alone.
    BlockExcluded { block_id: BlockId },
    /// The block was already assigned earlier in the run.
    BlockAlreadyAssigned { block_id: BlockId },
    /// No employee holding the qualification has availability that day.
    NoQualifiedEmployees {
        block_id: BlockId,
        qualification: QualificationCode,
    },
    /// Candidates whose availability contains the block.
    CandidatesFound { block_id: BlockId, count: usize },
    /// The candidate's remaining budget is too small for the block.
    BudgetExhausted {
        block_id: BlockId,
        employee_id: EmployeeId,
    },
    /// The candidate already holds a same-day block containing this one.
    ConflictSkipped {
        block_id: BlockId,
        employee_id: EmployeeId,
    },
    /// A paired group could not be given to the candidate as a whole.
    PairingRejected {
        block_id: BlockId,
        employee_id: EmployeeId,
        failed_block_id: BlockId,
    },
    /// The block (with any paired blocks) went to the employee.
    BlockAssigned {
        block_id: BlockId,
        employee_id: EmployeeId,
        paired: Vec<BlockId>,
    },
    /// Every candidate was rejected.
    BlockLeftUnassigned { block_id: BlockId },
}

impl AssignEvent {
    /// The block this event concerns, if any.
    pub fn block_id(&self) -> Option<BlockId> {
        match self {
            Self::QualificationSkipped { .. } | Self::QualificationStarted { .. } => None,
            Self::BlockExcluded { block_id }
            | Self::BlockAlreadyAssigned { block_id }
            | Self::NoQualifiedEmployees { block_id, .. }
            | Self::CandidatesFound { block_id, .. }
            | Self::BudgetExhausted { block_id, .. }
            | Self::ConflictSkipped { block_id, .. }
            | Self::PairingRejected { block_id, .. }
            | Self::BlockAssigned { block_id, .. }
            | Self::BlockLeftUnassigned { block_id } => Some(*block_id),
        }
    }

    /// Emits the event through `tracing`.
    pub(crate) fn trace(&self) {
        match self {
            Self::QualificationSkipped { qualification } => {
                warn!(%qualification, "qualification has no qualified employees")
            }
            Self::QualificationStarted {
                qualification,
                qualified_employees,
                blocks,
            } => info!(%qualification, qualified_employees, blocks, "assigning qualification"),
            Self::BlockExcluded { block_id } => {
                warn!(%block_id, "time block marked as manually assigned")
            }
            Self::BlockAlreadyAssigned { block_id } => {
                debug!(%block_id, "time block already assigned")
            }
            Self::NoQualifiedEmployees {
                block_id,
                qualification,
            } => info!(%block_id, %qualification, "no qualified employees for time block"),
            Self::CandidatesFound { block_id, count } => {
                debug!(%block_id, count, "found available employees")
            }
            Self::BudgetExhausted {
                block_id,
                employee_id,
            } => debug!(%block_id, %employee_id, "employee has a full schedule"),
            Self::ConflictSkipped {
                block_id,
                employee_id,
            } => debug!(%block_id, %employee_id, "employee has a conflicting block"),
            Self::PairingRejected {
                block_id,
                employee_id,
                failed_block_id,
            } => debug!(%block_id, %employee_id, %failed_block_id, "paired sessions rejected"),
            Self::BlockAssigned {
                block_id,
                employee_id,
                paired,
            } => info!(%block_id, %employee_id, ?paired, "time block assigned"),
            Self::BlockLeftUnassigned { block_id } => {
                info!(%block_id, "time block left unassigned")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_id() {
        let started = AssignEvent::QualificationStarted {
            qualification: "LG".into(),
            qualified_employees: 2,
            blocks: 3,
        };
        assert_eq!(started.block_id(), None);

        let assigned = AssignEvent::BlockAssigned {
            block_id: BlockId(4),
            employee_id: EmployeeId(1),
            paired: vec![BlockId(5)],
        };
        assert_eq!(assigned.block_id(), Some(BlockId(4)));
    }

    #[test]
    fn test_serializes_with_fields() {
        let event = AssignEvent::ConflictSkipped {
            block_id: BlockId(3),
            employee_id: EmployeeId(9),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["ConflictSkipped"]["block_id"], 3);
        assert_eq!(json["ConflictSkipped"]["employee_id"], 9);
    }
}
