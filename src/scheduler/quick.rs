//! Quick-assign greedy matcher.
//!
//! # Algorithm
//!
//! 1. Order registered qualifications by ascending qualified-employee
//!    count (ties: registration order). Qualifications nobody holds are
//!    skipped.
//! 2. For each qualification, order its blocks by descending time metric
//!    (stable, so ties keep load order).
//! 3. For each open, unassigned block, query the availability index for
//!    `(weekday, qualification)` with the block's interval. Candidates are
//!    employees whose availability window contains the block.
//! 4. Walk candidates from the highest priority value down and commit the
//!    block to the first one that has budget left and no conflict. Paired
//!    blocks are committed as a group to one employee or not at all.
//!
//! Every block is decided before the next is looked at; the order above
//! is what makes the result fair and deterministic.
//!
//! # Complexity
//! O(b * (n + c * (p * a))) where b = blocks, n = index nodes per bucket,
//! c = candidates per block, p = paired group size, a = blocks held per
//! employee.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use tracing::{info, warn};

use crate::config::{AssignConfig, AssignMode};
use crate::error::AssignError;
use crate::models::{BlockId, BlockState, Employee, QualificationCode};
use crate::roster::Roster;

use super::AssignEvent;

/// Result of one assignment run.
#[derive(Debug, Clone, Default)]
pub struct AssignOutcome {
    /// Blocks assigned during this run (paired blocks counted individually).
    pub assigned: usize,
    /// Open blocks attempted but left without an employee, in attempt order.
    pub unassigned: Vec<BlockId>,
    /// Decisions in the order they were taken (empty if the event log is off).
    pub events: Vec<AssignEvent>,
}

impl AssignOutcome {
    /// Events concerning one block.
    pub fn events_for(&self, block_id: BlockId) -> impl Iterator<Item = &AssignEvent> {
        self.events
            .iter()
            .filter(move |event| event.block_id() == Some(block_id))
    }
}

/// Greedy, scarcity-first assignment engine.
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use u_assign::models::{BlockId, Employee, EmployeeId, Interval, TimeBlock};
/// use u_assign::roster::RosterBuilder;
/// use u_assign::scheduler::QuickAssigner;
///
/// let mut builder = RosterBuilder::new();
/// builder
///     .register_qualification("LG")
///     .add_employee(
///         Employee::new(EmployeeId(1), 10)
///             .with_requested_time(8.0)
///             .with_qualification("LG"),
///     )
///     .add_availability(EmployeeId(1), Weekday::Mon, Interval::from_hm(8, 0, 16, 0).unwrap())
///     .add_block(TimeBlock::new(
///         BlockId(1),
///         "Guard",
///         "LG",
///         Weekday::Mon,
///         Interval::from_hm(9, 0, 11, 0).unwrap(),
///     ));
/// let mut roster = builder.build();
///
/// let outcome = QuickAssigner::new().assign(&mut roster).unwrap();
/// assert_eq!(outcome.assigned, 1);
/// assert_eq!(roster.block(BlockId(1)).unwrap().assigned_employee(), Some(EmployeeId(1)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QuickAssigner {
    config: AssignConfig,
}

/// Why a candidate could not take a paired group.
struct GroupRejection {
    failed: usize,
}

impl QuickAssigner {
    /// Creates an engine with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the run configuration.
    pub fn with_config(mut self, config: AssignConfig) -> Self {
        self.config = config;
        self
    }

    /// The run configuration.
    pub fn config(&self) -> &AssignConfig {
        &self.config
    }

    /// Runs one assignment pass over the roster.
    ///
    /// Already assigned blocks stay as they are; call
    /// [`Roster::reset_assignments`] first to start from scratch.
    ///
    /// # Errors
    /// [`AssignError::NotImplemented`] for [`AssignMode::MultiAssign`].
    pub fn assign(&self, roster: &mut Roster) -> Result<AssignOutcome, AssignError> {
        match self.config.mode {
            AssignMode::Quick => {}
            mode => return Err(AssignError::NotImplemented(mode)),
        }

        info!("making quick assignments");
        let mut run = Run {
            outcome: AssignOutcome::default(),
            record: self.config.record_events,
        };

        for (code, qualified) in roster.tally.by_scarcity() {
            if qualified == 0 {
                run.emit(AssignEvent::QualificationSkipped {
                    qualification: code,
                });
                continue;
            }

            let order = longest_first(roster, &code);
            run.emit(AssignEvent::QualificationStarted {
                qualification: code.clone(),
                qualified_employees: qualified,
                blocks: order.len(),
            });

            for block in order {
                self.assign_block(roster, &code, block, &mut run);
            }
        }

        info!(
            assigned = run.outcome.assigned,
            unassigned = run.outcome.unassigned.len(),
            "finished quick assignments"
        );
        Ok(run.outcome)
    }

    fn assign_block(&self, roster: &mut Roster, code: &QualificationCode, pos: usize, run: &mut Run) {
        let block = &roster.blocks[pos];
        let block_id = block.id;

        match block.state() {
            BlockState::Excluded => {
                run.emit(AssignEvent::BlockExcluded { block_id });
                return;
            }
            BlockState::Assigned => {
                run.emit(AssignEvent::BlockAlreadyAssigned { block_id });
                return;
            }
            BlockState::Unassigned => {}
        }

        let Some(tree) = roster.availability.get(block.weekday, code) else {
            run.emit(AssignEvent::NoQualifiedEmployees {
                block_id,
                qualification: code.clone(),
            });
            run.outcome.unassigned.push(block_id);
            return;
        };

        let candidates = if self.config.prune_queries {
            tree.query_pruned(&block.interval)
        } else {
            tree.query(&block.interval)
        };
        run.emit(AssignEvent::CandidatesFound {
            block_id,
            count: candidates.len(),
        });

        let group = pairing_group(roster, pos);

        for candidate in candidates.iter().rev() {
            let Some(employee_pos) = roster.employee_position(candidate.employee) else {
                warn!(employee_id = %candidate.employee, "indexed employee missing from roster");
                continue;
            };
            let employee = &roster.employees[employee_pos];
            let employee_id = employee.id;
            let block = &roster.blocks[pos];

            if !employee.has_remaining_budget(block) {
                run.emit(AssignEvent::BudgetExhausted {
                    block_id,
                    employee_id,
                });
                continue;
            }

            if group.len() > 1 {
                if let Err(rejection) = check_group(roster, employee, &group) {
                    run.emit(AssignEvent::PairingRejected {
                        block_id,
                        employee_id,
                        failed_block_id: roster.blocks[rejection.failed].id,
                    });
                    continue;
                }
            } else if employee.has_conflict(block) {
                run.emit(AssignEvent::ConflictSkipped {
                    block_id,
                    employee_id,
                });
                continue;
            }

            roster.commit(employee_pos, &group);
            run.outcome.assigned += group.len();
            run.emit(AssignEvent::BlockAssigned {
                block_id,
                employee_id,
                paired: group[1..].iter().map(|&g| roster.blocks[g].id).collect(),
            });
            return;
        }

        run.emit(AssignEvent::BlockLeftUnassigned { block_id });
        run.outcome.unassigned.push(block_id);
    }
}

struct Run {
    outcome: AssignOutcome,
    record: bool,
}

impl Run {
    fn emit(&mut self, event: AssignEvent) {
        event.trace();
        if self.record {
            self.outcome.events.push(event);
        }
    }
}

/// Positions of the blocks requiring `code`, longest time metric first.
fn longest_first(roster: &Roster, code: &QualificationCode) -> Vec<usize> {
    let mut order: Vec<usize> = roster
        .blocks_requiring(code)
        .iter()
        .filter_map(|&id| roster.block_position(id))
        .collect();
    order.sort_by(|&a, &b| {
        roster.blocks[b]
            .time_metric
            .total_cmp(&roster.blocks[a].time_metric)
    });
    order
}

/// The block at `pos` followed by its paired blocks in declared order.
fn pairing_group(roster: &Roster, pos: usize) -> Vec<usize> {
    let mut group = vec![pos];
    for &id in &roster.blocks[pos].paired_block_ids {
        if let Some(sibling) = roster.block_position(id) {
            if !group.contains(&sibling) {
                group.push(sibling);
            }
        }
    }
    group
}

/// Checks that `employee` can take every block of `group` at once.
///
/// Walks the group in order with a running projected total. Each block
/// must fit the budget, lie inside the employee's availability, and not be
/// contained in a block the employee holds or would take earlier in the
/// group. Siblings must still be open and unassigned.
fn check_group(roster: &Roster, employee: &Employee, group: &[usize]) -> Result<(), GroupRejection> {
    let mut projected = employee.assigned_time_metric();

    for (i, &pos) in group.iter().enumerate() {
        let block = &roster.blocks[pos];
        projected += block.time_metric;

        let open = i == 0 || block.state() == BlockState::Unassigned;
        let clashes_within_group = group[..i].iter().any(|&earlier| {
            let earlier = &roster.blocks[earlier];
            earlier.weekday == block.weekday && earlier.interval.contains(&block.interval)
        });

        if !open
            || projected > employee.requested_time_metric
            || !employee.is_available_for(block)
            || employee.has_conflict(block)
            || clashes_within_group
        {
            return Err(GroupRejection { failed: pos });
        }
    }

    Ok(())
}
