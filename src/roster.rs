//! The assembled scheduling dataset.
//!
//! A [`Roster`] owns every employee and time block for one run together
//! with the derived state the engine reads:
//! - the qualification tally (qualified-employee counts),
//! - the availability index: per (weekday, qualification), an interval
//!   tree from availability windows to the employees holding them,
//! - the block index: per (weekday, qualification), an interval tree of
//!   time blocks,
//! - per-qualification block lists in load order.
//!
//! Rosters are built with [`RosterBuilder`], which mirrors the loader's
//! order: register qualifications, add employees, add availability, add
//! blocks. Records that reference missing data are skipped or repaired
//! and reported as diagnostics; building never fails.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::Weekday;
use tracing::{debug, warn};

use crate::index::BucketIndex;
use crate::models::{
    BlockId, CandidateKey, Employee, EmployeeId, Interval, QualificationCode,
    QualificationTally, TimeBlock, WEEKDAYS,
};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Employees, time blocks, and their lookup indices.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub(crate) tally: QualificationTally,
    pub(crate) employees: Vec<Employee>,
    employee_positions: HashMap<EmployeeId, usize>,
    pub(crate) blocks: Vec<TimeBlock>,
    block_positions: HashMap<BlockId, usize>,
    blocks_by_qualification: HashMap<QualificationCode, Vec<BlockId>>,
    pub(crate) availability: BucketIndex<CandidateKey>,
    block_index: BucketIndex<BlockId>,
    diagnostics: Vec<ValidationError>,
}

impl Roster {
    /// Employees in load order.
    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Looks up an employee by ID.
    pub fn employee(&self, id: EmployeeId) -> Option<&Employee> {
        self.employee_positions.get(&id).map(|&i| &self.employees[i])
    }

    /// Time blocks in load order.
    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    /// Looks up a time block by ID.
    pub fn block(&self, id: BlockId) -> Option<&TimeBlock> {
        self.block_positions.get(&id).map(|&i| &self.blocks[i])
    }

    /// Registered qualifications and their qualified-employee counts.
    pub fn tally(&self) -> &QualificationTally {
        &self.tally
    }

    /// Blocks requiring a qualification, in load order.
    pub fn blocks_requiring(&self, code: &QualificationCode) -> &[BlockId] {
        self.blocks_by_qualification
            .get(code)
            .map_or(&[], Vec::as_slice)
    }

    /// Availability index: (weekday, qualification) → employees.
    pub fn availability_index(&self) -> &BucketIndex<CandidateKey> {
        &self.availability
    }

    /// Block index: (weekday, qualification) → time blocks.
    pub fn block_index(&self) -> &BucketIndex<BlockId> {
        &self.block_index
    }

    /// Employees qualified for `code` whose availability on `day` contains
    /// `interval`, highest priority value first.
    pub fn candidates_for(
        &self,
        day: Weekday,
        code: &QualificationCode,
        interval: &Interval,
    ) -> Vec<EmployeeId> {
        self.availability
            .query(day, code, interval, false)
            .into_iter()
            .rev()
            .map(|key| key.employee)
            .collect()
    }

    /// Blocks requiring `code` on `day` that run throughout `interval`.
    pub fn blocks_covering(
        &self,
        day: Weekday,
        code: &QualificationCode,
        interval: &Interval,
    ) -> BTreeSet<BlockId> {
        self.block_index.query(day, code, interval, false)
    }

    /// Everything the builder skipped or repaired.
    pub fn diagnostics(&self) -> &[ValidationError] {
        &self.diagnostics
    }

    /// Clears every assignment on both employees and blocks.
    ///
    /// Re-running the engine afterwards reproduces the same outcome.
    pub fn reset_assignments(&mut self) {
        for employee in &mut self.employees {
            employee.reset();
        }
        for block in &mut self.blocks {
            block.clear_assignment();
        }
    }

    pub(crate) fn employee_position(&self, id: EmployeeId) -> Option<usize> {
        self.employee_positions.get(&id).copied()
    }

    pub(crate) fn block_position(&self, id: BlockId) -> Option<usize> {
        self.block_positions.get(&id).copied()
    }

    /// Assigns the blocks at `group` (positions, in order) to one employee.
    ///
    /// No checks: the engine validates the whole group first.
    pub(crate) fn commit(&mut self, employee: usize, group: &[usize]) {
        let employee = &mut self.employees[employee];
        for &pos in group {
            employee.assign(&mut self.blocks[pos]);
        }
    }
}

/// Incrementally assembles a [`Roster`].
///
/// # Example
///
/// ```
/// use chrono::Weekday;
/// use u_assign::models::{BlockId, Employee, EmployeeId, Interval, TimeBlock};
/// use u_assign::roster::RosterBuilder;
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
/// let roster = builder.build();
///
/// assert_eq!(roster.tally().count(&"LG".into()), Some(1));
/// assert!(roster.diagnostics().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct RosterBuilder {
    roster: Roster,
}

impl RosterBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a qualification code. Re-registering is a no-op.
    pub fn register_qualification(&mut self, code: impl Into<QualificationCode>) -> &mut Self {
        self.roster.tally.register(code.into());
        self
    }

    /// Adds an employee.
    ///
    /// Registered qualifications are counted; unregistered ones stay on
    /// the employee but are reported and never matched. Availability
    /// already attached to the employee is indexed. Any assignment state
    /// is cleared. A duplicate ID is reported and the employee skipped.
    pub fn add_employee(&mut self, mut employee: Employee) -> &mut Self {
        if self.roster.employee_positions.contains_key(&employee.id) {
            self.diagnose(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate employee ID: {}", employee.id),
            );
            return self;
        }

        for code in &employee.qualifications {
            if !self.roster.tally.increment(code) {
                let message = format!(
                    "Employee [@id = {}] contains unregistered qualification [ {} ]",
                    employee.id, code
                );
                self.diagnose(ValidationErrorKind::UnregisteredQualification, message);
            }
        }

        employee.reset();
        let key = employee.candidate_key();
        for day in WEEKDAYS {
            for window in employee.availability_on(day) {
                for code in &employee.qualifications {
                    self.roster.availability.insert(day, code, *window, key);
                }
            }
        }

        debug!(employee_id = %employee.id, priority = employee.priority, "registered employee");
        self.roster
            .employee_positions
            .insert(employee.id, self.roster.employees.len());
        self.roster.employees.push(employee);
        self
    }

    /// Adds an availability window for a registered employee.
    ///
    /// The window is indexed once per qualification the employee holds.
    /// Unknown employee IDs are reported and skipped.
    pub fn add_availability(
        &mut self,
        employee: EmployeeId,
        day: Weekday,
        interval: Interval,
    ) -> &mut Self {
        let Some(pos) = self.roster.employee_position(employee) else {
            self.diagnose(
                ValidationErrorKind::UnknownEmployee,
                format!("Availability entry references unregistered employee {employee}"),
            );
            return self;
        };

        let employee = &mut self.roster.employees[pos];
        employee.add_availability(day, interval);
        let key = employee.candidate_key();
        for code in &employee.qualifications {
            self.roster.availability.insert(day, code, interval, key);
        }
        self
    }

    /// Adds a time block.
    ///
    /// Duplicate IDs and non-positive time metrics are reported and the
    /// block skipped. A block requiring an unregistered qualification is
    /// kept (so it shows up unassigned) but reported; it is never matched.
    pub fn add_block(&mut self, mut block: TimeBlock) -> &mut Self {
        if self.roster.block_positions.contains_key(&block.id) {
            self.diagnose(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate time block ID: {}", block.id),
            );
            return self;
        }
        if block.time_metric.is_nan() || block.time_metric <= 0.0 {
            self.diagnose(
                ValidationErrorKind::NonPositiveTimeMetric,
                format!("Time block {} has time metric {}", block.id, block.time_metric),
            );
            return self;
        }
        if !self.roster.tally.is_registered(&block.qualification) {
            let message = format!(
                "Time block {} requires unregistered qualification [ {} ]",
                block.id, block.qualification
            );
            self.diagnose(ValidationErrorKind::UnregisteredQualification, message);
        }

        block.clear_assignment();
        self.roster
            .block_index
            .insert(block.weekday, &block.qualification, block.interval, block.id);
        self.roster
            .blocks_by_qualification
            .entry(block.qualification.clone())
            .or_default()
            .push(block.id);

        debug!(block_id = %block.id, interval = %block.interval, "registered time block");
        self.roster
            .block_positions
            .insert(block.id, self.roster.blocks.len());
        self.roster.blocks.push(block);
        self
    }

    /// Resolves pairings and returns the roster.
    ///
    /// Pairing lists lose self references, repeated IDs, and IDs of blocks
    /// that were never added; each drop except repeats is reported.
    pub fn build(mut self) -> Roster {
        let known: HashSet<BlockId> = self.roster.block_positions.keys().copied().collect();
        let mut findings = Vec::new();

        for block in &mut self.roster.blocks {
            if !block.is_paired() {
                continue;
            }
            let mut seen = HashSet::new();
            let own = block.id;
            block.paired_block_ids.retain(|&id| {
                if id == own {
                    findings.push((
                        ValidationErrorKind::SelfPairing,
                        format!("Time block {own} lists itself as a paired session"),
                    ));
                    false
                } else if !known.contains(&id) {
                    findings.push((
                        ValidationErrorKind::UnknownPairedBlock,
                        format!("Time block {own} is paired with unknown time block {id}"),
                    ));
                    false
                } else {
                    seen.insert(id)
                }
            });
        }

        for (kind, message) in findings {
            self.diagnose(kind, message);
        }
        self.roster
    }

    fn diagnose(&mut self, kind: ValidationErrorKind, message: String) {
        warn!(?kind, "{message}");
        self.roster
            .diagnostics
            .push(ValidationError::new(kind, message));
    }
}
