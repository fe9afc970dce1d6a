//! Task (Gantt bar) model.
//!
//! A task is a schedulable unit of work occupying a calendar date range,
//! linked to other tasks by finish-to-start precedence edges with
//! optional lag.
//!
//! # Time Representation
//! All temporal fields are calendar dates (`chrono::NaiveDate`) with no
//! time-of-day component. Durations are whole days, derived as
//! `end_date - start_date` and never stored separately.
//!
//! # Edge Representation
//! Precedence edges are stored symmetrically: `B.predecessors` holds
//! `A → lag_days` iff `A.successors` contains `B`. The per-edge lag is
//! kept on the successor side only, so there is a single authoritative
//! copy. [`crate::store::TaskStore`] maintains this mirror invariant on
//! every mutation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Task identifier. Opaque and stable for the lifetime of a session.
pub type TaskId = String;

/// A schedulable task on the Gantt chart.
///
/// Dates satisfy `end_date >= start_date` when constructed through
/// [`Task::new`] or mutated through [`crate::store::TaskStore::set_dates`].
/// Payload fields (`name`, `category`, `attributes`) are opaque to the
/// scheduling algorithms — read for display, never consulted for dates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: TaskId,
    /// Human-readable name.
    pub name: String,
    /// Task category (grouping/coloring only).
    pub category: String,
    /// First day of work (inclusive).
    pub start_date: NaiveDate,
    /// Last day of work (inclusive). Invariant: `end_date >= start_date`.
    pub end_date: NaiveDate,
    /// Predecessor id → lag in days for that edge (negative = lead time).
    pub predecessors: BTreeMap<TaskId, i64>,
    /// Mirror direction of the precedence edges.
    pub successors: BTreeSet<TaskId>,
    /// Manually pinned critical flag. OR'ed into the computed set,
    /// never cleared by the analyzer.
    #[serde(default)]
    pub critical_override: bool,
    /// Computed criticality. Volatile — rewritten on every analyzer
    /// pass, never authoritative schedule data.
    #[serde(default)]
    pub is_critical: bool,
    /// Domain-specific key-value metadata (status, progress, color, ...).
    pub attributes: HashMap<String, String>,
}

impl Task {
    /// Creates a new task spanning `[start, end]`.
    ///
    /// An inverted range is normalized to a zero-length task at `start`;
    /// callers that need rejection semantics go through
    /// [`crate::store::TaskStore::set_dates`].
    pub fn new(id: impl Into<TaskId>, start: NaiveDate, end: NaiveDate) -> Self {
        let end = end.max(start);
        Self {
            id: id.into(),
            name: String::new(),
            category: String::new(),
            start_date: start,
            end_date: end,
            predecessors: BTreeMap::new(),
            successors: BTreeSet::new(),
            critical_override: false,
            is_critical: false,
            attributes: HashMap::new(),
        }
    }

    /// Sets the task name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the task category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Pins the manual critical flag.
    pub fn with_critical_override(mut self) -> Self {
        self.critical_override = true;
        self
    }

    /// Adds a domain-specific attribute.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Duration in whole days (`end_date - start_date`). Zero for a
    /// single-day task.
    #[inline]
    pub fn duration_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    /// The task's date pair shifted by `delta_days`, duration preserved.
    pub fn shifted(&self, delta_days: i64) -> (NaiveDate, NaiveDate) {
        let delta = chrono::Duration::days(delta_days);
        (self.start_date + delta, self.end_date + delta)
    }

    /// Lag of the incoming edge from `pred`, if such an edge exists.
    #[inline]
    pub fn lag_from(&self, pred: &str) -> Option<i64> {
        self.predecessors.get(pred).copied()
    }

    /// Whether this task has no successors (a sink of the graph).
    #[inline]
    pub fn is_sink(&self) -> bool {
        self.successors.is_empty()
    }
}
