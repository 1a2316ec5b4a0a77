//! Assignment run configuration.
//!
//! All settings have defaults that reproduce the plain quick-assign pass:
//! full-traversal containment queries and a recorded event log.

use serde::{Deserialize, Serialize};

/// Which assignment algorithm to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssignMode {
    /// Single greedy pass: scarcest qualification first, longest block
    /// first, highest priority value first.
    #[default]
    Quick,
    /// Assign every feasible schedule per employee. Reserved; running it
    /// returns [`AssignError::NotImplemented`](crate::error::AssignError).
    MultiAssign,
}

/// Settings for one assignment run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssignConfig {
    /// Algorithm to run.
    pub mode: AssignMode,
    /// Use the subtree min/max bounds to skip subtrees during candidate
    /// queries. Results are identical either way.
    pub prune_queries: bool,
    /// Keep every [`AssignEvent`](crate::scheduler::AssignEvent) in the
    /// run outcome. Events are traced regardless.
    pub record_events: bool,
}

impl AssignConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self {
            mode: AssignMode::Quick,
            prune_queries: false,
            record_events: true,
        }
    }

    /// Sets the assignment mode.
    pub fn with_mode(mut self, mode: AssignMode) -> Self {
        self.mode = mode;
        self
    }

    /// Enables or disables bound-pruned candidate queries.
    pub fn with_pruned_queries(mut self, prune: bool) -> Self {
        self.prune_queries = prune;
        self
    }

    /// Enables or disables the recorded event log.
    pub fn with_event_log(mut self, record: bool) -> Self {
        self.record_events = record;
        self
    }
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self::new()
    }
}
