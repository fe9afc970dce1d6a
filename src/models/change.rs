//! Propagation result model.
//!
//! A propagation pass produces a [`ChangeSet`]: the delta map of every
//! task whose dates changed, keyed by task id. The engine never mutates
//! the store directly — callers commit the ChangeSet when ready, which
//! keeps undo trivial (retain the pre-pass snapshot) and lets the
//! persistence layer batch the writes.
//!
//! [`DateChange`] carries both old and new dates, so a single entry also
//! serves as the "task dates changed" notification payload handed to
//! external consumers (QA rules, audit log).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TaskId;

/// One task's date movement within a propagation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateChange {
    /// Affected task.
    pub task_id: TaskId,
    /// Start date before the pass.
    pub old_start: NaiveDate,
    /// End date before the pass.
    pub old_end: NaiveDate,
    /// Start date after the pass.
    pub new_start: NaiveDate,
    /// End date after the pass.
    pub new_end: NaiveDate,
}

impl DateChange {
    /// Creates a date change record.
    pub fn new(
        task_id: impl Into<TaskId>,
        old_start: NaiveDate,
        old_end: NaiveDate,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> Self {
        Self {
            task_id: task_id.into(),
            old_start,
            old_end,
            new_start,
            new_end,
        }
    }

    /// Whether the new dates differ from the old ones.
    #[inline]
    pub fn is_moved(&self) -> bool {
        self.new_start != self.old_start || self.new_end != self.old_end
    }

    /// Whole-day shift of the start date (negative = moved earlier).
    #[inline]
    pub fn start_shift_days(&self) -> i64 {
        (self.new_start - self.old_start).num_days()
    }
}

/// The full result of one propagation pass.
///
/// Ordered by task id (`BTreeMap`) so iteration is deterministic for
/// logging, diffing, and batch persistence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    changes: BTreeMap<TaskId, DateChange>,
}

impl ChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a change, replacing any earlier entry for the same task.
    pub fn insert(&mut self, change: DateChange) {
        self.changes.insert(change.task_id.clone(), change);
    }

    /// Change for a specific task, if it moved in this pass.
    pub fn get(&self, task_id: &str) -> Option<&DateChange> {
        self.changes.get(task_id)
    }

    /// Whether the pass touched the given task.
    pub fn contains(&self, task_id: &str) -> bool {
        self.changes.contains_key(task_id)
    }

    /// Number of affected tasks.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Whether the pass produced no changes (rejected input or no-op).
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Iterates over changes in task-id order.
    pub fn iter(&self) -> impl Iterator<Item = &DateChange> {
        self.changes.values()
    }

    /// Affected task ids in order.
    pub fn task_ids(&self) -> impl Iterator<Item = &TaskId> {
        self.changes.keys()
    }
}

impl<'a> IntoIterator for &'a ChangeSet {
    type Item = &'a DateChange;
    type IntoIter = std::collections::btree_map::Values<'a, TaskId, DateChange>;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_change_set_basics() {
        let mut cs = ChangeSet::new();
        assert!(cs.is_empty());

        cs.insert(DateChange::new(
            "B",
            d(2024, 1, 4),
            d(2024, 1, 6),
            d(2024, 1, 8),
            d(2024, 1, 10),
        ));
        cs.insert(DateChange::new(
            "A",
            d(2024, 1, 1),
            d(2024, 1, 3),
            d(2024, 1, 5),
            d(2024, 1, 7),
        ));

        assert_eq!(cs.len(), 2);
        assert!(cs.contains("A"));
        assert!(!cs.contains("C"));

        // BTreeMap ordering: A before B regardless of insertion order.
        let ids: Vec<_> = cs.task_ids().cloned().collect();
        assert_eq!(ids, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn test_date_change_shift() {
        let c = DateChange::new("A", d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 5), d(2024, 1, 7));
        assert!(c.is_moved());
        assert_eq!(c.start_shift_days(), 4);

        let noop = DateChange::new("A", d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 1), d(2024, 1, 3));
        assert!(!noop.is_moved());
        assert_eq!(noop.start_shift_days(), 0);
    }

    #[test]
    fn test_insert_replaces() {
        let mut cs = ChangeSet::new();
        cs.insert(DateChange::new("A", d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 2), d(2024, 1, 4)));
        cs.insert(DateChange::new("A", d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 5), d(2024, 1, 7)));
        assert_eq!(cs.len(), 1);
        assert_eq!(cs.get("A").unwrap().new_start, d(2024, 1, 5));
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut cs = ChangeSet::new();
        cs.insert(DateChange::new("A", d(2024, 1, 1), d(2024, 1, 3), d(2024, 1, 5), d(2024, 1, 7)));
        let json = serde_json::to_string(&cs).unwrap();
        let back: ChangeSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cs);
    }
}
