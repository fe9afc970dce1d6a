//! Critical-task marking.
//!
//! A lightweight zero-slack heuristic, not full CPM: no forward/backward
//! float passes are computed. For every edge `P → S`, if `S` starts at or
//! before `P` finishes (`S.start_date <= P.end_date`) there is no
//! observable gap between the two bars, so any delay to `P` delays `S` —
//! both ends of the edge are marked. Tasks with no successors are never
//! marked by this rule alone.
//!
//! Manually pinned tasks ([`crate::models::Task::critical_override`]) are
//! always included; the override is additive and never cleared here.
//!
//! The result is advisory (drives bar highlighting) and recomputed fresh
//! on every call — it is never treated as schedule data.

use std::collections::BTreeSet;

use crate::models::TaskId;
use crate::store::TaskStore;

/// Derives the set of zero-slack (critical) tasks.
#[derive(Debug, Clone, Default)]
pub struct CriticalPathAnalyzer;

impl CriticalPathAnalyzer {
    /// Creates an analyzer.
    pub fn new() -> Self {
        Self
    }

    /// Returns the ids of all critical tasks under the current date
    /// assignment, plus every manually pinned task.
    pub fn mark_critical(&self, store: &TaskStore) -> BTreeSet<TaskId> {
        let mut critical = BTreeSet::new();

        for task in store.tasks() {
            if task.critical_override {
                critical.insert(task.id.clone());
            }
            for succ_id in &task.successors {
                let Some(succ) = store.get(succ_id) else {
                    continue;
                };
                if succ.start_date <= task.end_date {
                    critical.insert(task.id.clone());
                    critical.insert(succ_id.clone());
                }
            }
        }

        critical
    }
}
