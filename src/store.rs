//! In-memory task store.
//!
//! The single source of truth the engine reads and writes: all tasks of
//! the active project plus their precedence edges. The store computes
//! nothing itself — the propagator reads it as an immutable snapshot and
//! returns a [`ChangeSet`] which the caller commits back via
//! [`TaskStore::apply`].
//!
//! # Edge Symmetry
//! Every `link`/`unlink`/`remove` keeps both edge directions consistent:
//! `B.predecessors` contains `A` iff `A.successors` contains `B`. Lag is
//! stored once, on the successor side.
//!
//! # Persistence
//! Remote persistence is the caller's concern and may complete
//! asynchronously per task. Committed dates stay applied optimistically;
//! tasks whose write later fails are flagged via [`TaskStore::mark_unsynced`]
//! rather than rolled back, since other tasks in the same batch may have
//! persisted successfully.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use crate::engine::CriticalPathAnalyzer;
use crate::error::EngineError;
use crate::models::{ChangeSet, Task, TaskId};

/// In-memory collection of tasks and precedence edges for one project.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: BTreeMap<TaskId, Task>,
    unsynced: BTreeSet<TaskId>,
}

impl TaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store from a task listing, rejecting duplicate ids.
    pub fn from_tasks(tasks: Vec<Task>) -> Result<Self, EngineError> {
        let mut store = Self::new();
        for task in tasks {
            store.insert(task)?;
        }
        Ok(store)
    }

    /// Adds a task. Fails on a duplicate id.
    pub fn insert(&mut self, task: Task) -> Result<(), EngineError> {
        if self.tasks.contains_key(&task.id) {
            return Err(EngineError::DuplicateTask(task.id));
        }
        self.tasks.insert(task.id.clone(), task);
        Ok(())
    }

    /// Removes a task, unlinking it from every neighbor on both sides.
    pub fn remove(&mut self, task_id: &str) -> Option<Task> {
        let task = self.tasks.remove(task_id)?;
        for pred in task.predecessors.keys() {
            if let Some(p) = self.tasks.get_mut(pred) {
                p.successors.remove(task_id);
            }
        }
        for succ in &task.successors {
            if let Some(s) = self.tasks.get_mut(succ) {
                s.predecessors.remove(task_id);
            }
        }
        self.unsynced.remove(task_id);
        Some(task)
    }

    /// Task by id.
    pub fn get(&self, task_id: &str) -> Option<&Task> {
        self.tasks.get(task_id)
    }

    /// Mutable task access for payload edits (name, attributes).
    /// Date and edge mutations go through the dedicated operations.
    pub fn get_mut(&mut self, task_id: &str) -> Option<&mut Task> {
        self.tasks.get_mut(task_id)
    }

    /// Whether a task exists.
    pub fn contains(&self, task_id: &str) -> bool {
        self.tasks.contains_key(task_id)
    }

    /// All tasks, in id order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.values()
    }

    /// Number of tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the store holds no tasks.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Creates a finish-to-start edge `pred → succ` with the given lag
    /// (negative = lead time), maintaining both directions.
    ///
    /// Self-loops and unknown ids are rejected. Longer cycles are not
    /// checked here — edge editing is free-form and the propagator's
    /// visited-set guard keeps traversal safe; run
    /// [`crate::validation::validate_store`] for diagnostics.
    pub fn link(&mut self, pred: &str, succ: &str, lag_days: i64) -> Result<(), EngineError> {
        if pred == succ {
            return Err(EngineError::SelfDependency(pred.to_string()));
        }
        if !self.tasks.contains_key(pred) {
            return Err(EngineError::UnknownTask(pred.to_string()));
        }
        match self.tasks.get_mut(succ) {
            Some(s) => {
                s.predecessors.insert(pred.to_string(), lag_days);
            }
            None => return Err(EngineError::UnknownTask(succ.to_string())),
        }
        if let Some(p) = self.tasks.get_mut(pred) {
            p.successors.insert(succ.to_string());
        }
        Ok(())
    }

    /// Removes the edge `pred → succ` from both sides. Unknown ids or a
    /// missing edge are a no-op.
    pub fn unlink(&mut self, pred: &str, succ: &str) {
        if let Some(s) = self.tasks.get_mut(succ) {
            s.predecessors.remove(pred);
        }
        if let Some(p) = self.tasks.get_mut(pred) {
            p.successors.remove(succ);
        }
    }

    /// Updates one task's dates directly, rejecting an inverted range.
    pub fn set_dates(
        &mut self,
        task_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<(), EngineError> {
        if end < start {
            return Err(EngineError::InvalidDateRange {
                task_id: task_id.to_string(),
                start,
                end,
            });
        }
        let task = self
            .tasks
            .get_mut(task_id)
            .ok_or_else(|| EngineError::UnknownTask(task_id.to_string()))?;
        task.start_date = start;
        task.end_date = end;
        Ok(())
    }

    /// Commits a propagation result. In-memory application is atomic from
    /// the engine's viewpoint; entries whose task has since been removed
    /// are skipped. Committed tasks are marked unsynced until persistence
    /// confirms them.
    pub fn apply(&mut self, changes: &ChangeSet) {
        for change in changes {
            if let Some(task) = self.tasks.get_mut(&change.task_id) {
                task.start_date = change.new_start;
                task.end_date = change.new_end;
                self.unsynced.insert(change.task_id.clone());
            }
        }
    }

    /// Flags a task as not yet confirmed by the persistence layer.
    pub fn mark_unsynced(&mut self, task_id: &str) {
        if self.tasks.contains_key(task_id) {
            self.unsynced.insert(task_id.to_string());
        }
    }

    /// Clears the unsynced flag after a confirmed write.
    pub fn mark_synced(&mut self, task_id: &str) {
        self.unsynced.remove(task_id);
    }

    /// Tasks whose in-memory dates have not been confirmed remotely.
    pub fn unsynced(&self) -> &BTreeSet<TaskId> {
        &self.unsynced
    }

    /// Recomputes the volatile `is_critical` flag on every task from the
    /// current date assignment. Manual overrides stay set.
    pub fn refresh_critical(&mut self) {
        let critical = CriticalPathAnalyzer::new().mark_critical(self);
        for task in self.tasks.values_mut() {
            task.is_critical = critical.contains(&task.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DateChange;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn store_ab() -> TaskStore {
        let mut store = TaskStore::new();
        store
            .insert(Task::new("A", d(2024, 1, 1), d(2024, 1, 3)))
            .unwrap();
        store
            .insert(Task::new("B", d(2024, 1, 4), d(2024, 1, 6)))
            .unwrap();
        store.link("A", "B", 0).unwrap();
        store
    }

    #[test]
    fn test_insert_and_duplicate() {
        let mut store = TaskStore::new();
        store
            .insert(Task::new("A", d(2024, 1, 1), d(2024, 1, 2)))
            .unwrap();
        let err = store
            .insert(Task::new("A", d(2024, 2, 1), d(2024, 2, 2)))
            .unwrap_err();
        assert_eq!(err, EngineError::DuplicateTask("A".into()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_link_is_symmetric() {
        let store = store_ab();
        let a = store.get("A").unwrap();
        let b = store.get("B").unwrap();
        assert!(a.successors.contains("B"));
        assert_eq!(b.lag_from("A"), Some(0));
    }

    #[test]
    fn test_link_rejects_self_loop() {
        let mut store = store_ab();
        let err = store.link("A", "A", 0).unwrap_err();
        assert_eq!(err, EngineError::SelfDependency("A".into()));
    }

    #[test]
    fn test_link_rejects_unknown() {
        let mut store = store_ab();
        assert_eq!(
            store.link("A", "Z", 0).unwrap_err(),
            EngineError::UnknownTask("Z".into())
        );
        assert_eq!(
            store.link("Z", "A", 0).unwrap_err(),
            EngineError::UnknownTask("Z".into())
        );
    }

    #[test]
    fn test_link_permits_longer_cycle() {
        // X → Y → X is tolerated at creation time; the propagator's
        // visited-set guard handles it at traversal time.
        let mut store = TaskStore::new();
        store
            .insert(Task::new("X", d(2024, 1, 1), d(2024, 1, 2)))
            .unwrap();
        store
            .insert(Task::new("Y", d(2024, 1, 3), d(2024, 1, 4)))
            .unwrap();
        store.link("X", "Y", 0).unwrap();
        store.link("Y", "X", 0).unwrap();
    }

    #[test]
    fn test_unlink_both_sides() {
        let mut store = store_ab();
        store.unlink("A", "B");
        assert!(store.get("A").unwrap().successors.is_empty());
        assert!(store.get("B").unwrap().predecessors.is_empty());
    }

    #[test]
    fn test_remove_unlinks_neighbors() {
        let mut store = store_ab();
        store
            .insert(Task::new("C", d(2024, 1, 7), d(2024, 1, 8)))
            .unwrap();
        store.link("B", "C", 2).unwrap();

        let removed = store.remove("B").unwrap();
        assert_eq!(removed.id, "B");
        assert!(store.get("A").unwrap().successors.is_empty());
        assert!(store.get("C").unwrap().predecessors.is_empty());
    }

    #[test]
    fn test_set_dates_rejects_inverted() {
        let mut store = store_ab();
        let err = store
            .set_dates("A", d(2024, 1, 10), d(2024, 1, 5))
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidDateRange { .. }));
        // Unchanged after rejection.
        assert_eq!(store.get("A").unwrap().start_date, d(2024, 1, 1));
    }

    #[test]
    fn test_apply_marks_unsynced_and_sync_lifecycle() {
        let mut store = store_ab();
        let mut cs = ChangeSet::new();
        cs.insert(DateChange::new(
            "B",
            d(2024, 1, 4),
            d(2024, 1, 6),
            d(2024, 1, 8),
            d(2024, 1, 10),
        ));
        store.apply(&cs);

        assert_eq!(store.get("B").unwrap().start_date, d(2024, 1, 8));
        assert!(store.unsynced().contains("B"));

        store.mark_synced("B");
        assert!(store.unsynced().is_empty());
    }

    #[test]
    fn test_apply_skips_removed_task() {
        let mut store = store_ab();
        let mut cs = ChangeSet::new();
        cs.insert(DateChange::new(
            "GONE",
            d(2024, 1, 1),
            d(2024, 1, 2),
            d(2024, 1, 3),
            d(2024, 1, 4),
        ));
        store.apply(&cs);
        assert!(store.unsynced().is_empty());
    }

    #[test]
    fn test_refresh_critical() {
        let mut store = store_ab();
        // B starts the day after A ends: a gap of zero working days is
        // still a gap under the adjacency rule, so nothing is critical.
        store.refresh_critical();
        assert!(!store.get("A").unwrap().is_critical);

        // Close the gap: B starts on A's end date.
        store.set_dates("B", d(2024, 1, 3), d(2024, 1, 5)).unwrap();
        store.refresh_critical();
        assert!(store.get("A").unwrap().is_critical);
        assert!(store.get("B").unwrap().is_critical);
    }
}
