//! Schedule propagation (dependency cascade).
//!
//! # Algorithm
//!
//! 1. Apply the new dates to the moved task and collect the subgraph
//!    reachable from it through successor edges (BFS, visited set).
//! 2. Process that subgraph in topological order (Kahn's algorithm,
//!    in-degrees counted over in-subgraph edges only). A successor is
//!    finalized exactly once, after every predecessor reachable from the
//!    moved task has been finalized.
//! 3. A finalized successor's start is the maximum of
//!    `P.end_date + lag(P, S)` over **all** of its predecessors — using
//!    the updated end date for predecessors finalized this pass and the
//!    snapshot date otherwise. Its end is `start + duration`: position
//!    shifts, duration never does. A successor none of whose
//!    predecessors moved this pass keeps its snapshot dates: traversal
//!    continues through it, but a no-op upstream never repacks slack
//!    that was already there.
//! 4. If the queue drains with subgraph nodes left, those nodes sit on a
//!    cycle; they keep their snapshot dates and the pass ends.
//!
//! Arrival-order recomputation (updating a multi-predecessor successor
//! from whichever edge happened to trigger the visit) is deliberately
//! not used: it produces traversal-order-dependent schedules.
//!
//! # Complexity
//! O(V + E) over the reachable subgraph, plus O(E log V) for the ordered
//! edge sets.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
//! (Topological Sort); Kahn (1962), "Topological sorting of large networks"

use chrono::{Duration, NaiveDate};
use log::{debug, warn};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

use crate::models::{ChangeSet, DateChange, TaskId};
use crate::store::TaskStore;

/// Recomputes dependent task dates after one task moves.
///
/// The propagator reads the store as an immutable snapshot and returns a
/// [`ChangeSet`]; it never mutates. Callers commit the result with
/// [`TaskStore::apply`] when ready.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_gantt::engine::Propagator;
/// use u_gantt::models::Task;
/// use u_gantt::store::TaskStore;
///
/// let d = |day| NaiveDate::from_ymd_opt(2024, 1, day).unwrap();
/// let mut store = TaskStore::new();
/// store.insert(Task::new("A", d(1), d(3))).unwrap();
/// store.insert(Task::new("B", d(4), d(6))).unwrap();
/// store.link("A", "B", 0).unwrap();
///
/// // Move A forward four days; B is pushed to A.end + lag.
/// let changes = Propagator::new().propagate(&store, "A", d(5), d(7));
/// assert_eq!(changes.get("B").unwrap().new_start, d(7));
/// assert_eq!(changes.get("B").unwrap().new_end, d(9));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Propagator;

impl Propagator {
    /// Creates a propagator.
    pub fn new() -> Self {
        Self
    }

    /// Applies `new_start`/`new_end` to `moved_id` and recomputes every
    /// transitively dependent task.
    ///
    /// Returns the delta map of every task whose dates changed, always
    /// including the moved task itself. Rejected inputs (unknown id,
    /// `new_end < new_start`) return an empty map without mutating
    /// anything — the engine degrades rather than aborts the host UI.
    pub fn propagate(
        &self,
        store: &TaskStore,
        moved_id: &str,
        new_start: NaiveDate,
        new_end: NaiveDate,
    ) -> ChangeSet {
        let mut changes = ChangeSet::new();

        let Some(moved) = store.get(moved_id) else {
            warn!("propagate: unknown task id {moved_id:?}, ignoring");
            return changes;
        };
        if new_end < new_start {
            warn!("propagate: rejected inverted range {new_start}..{new_end} for {moved_id:?}");
            return changes;
        }

        // The moved task is always reported, even on a no-op move.
        changes.insert(DateChange::new(
            moved_id,
            moved.start_date,
            moved.end_date,
            new_start,
            new_end,
        ));

        let reachable = self.reachable_from(store, moved_id);

        // In-degree per subgraph node over in-subgraph edges. The moved
        // task is the root of the pass: its dates are the caller's, and
        // back edges into it are never followed.
        let mut in_degree: HashMap<&str, usize> = HashMap::new();
        for id in &reachable {
            if id == moved_id {
                continue;
            }
            if let Some(task) = store.get(id) {
                let n = task
                    .predecessors
                    .keys()
                    .filter(|p| reachable.contains(p.as_str()))
                    .count();
                in_degree.insert(id.as_str(), n);
            }
        }

        // Dates finalized this pass, consulted ahead of the snapshot.
        let mut finalized: BTreeMap<TaskId, (NaiveDate, NaiveDate)> = BTreeMap::new();
        finalized.insert(moved_id.to_string(), (new_start, new_end));

        let mut queue: VecDeque<TaskId> = VecDeque::new();
        queue.push_back(moved_id.to_string());

        while let Some(current) = queue.pop_front() {
            let Some(task) = store.get(&current) else {
                continue;
            };
            for succ_id in &task.successors {
                if !reachable.contains(succ_id) || finalized.contains_key(succ_id) {
                    continue;
                }
                let Some(degree) = in_degree.get_mut(succ_id.as_str()) else {
                    continue;
                };
                *degree = degree.saturating_sub(1);
                if *degree > 0 {
                    continue;
                }

                let Some(succ) = store.get(succ_id) else {
                    continue;
                };
                // Recompute only when something upstream actually moved
                // this pass. Otherwise the successor is already
                // constraint-consistent and its snapshot dates stand —
                // a no-op move must not churn descendants.
                let upstream_moved = succ.predecessors.keys().any(|pred_id| {
                    match (finalized.get(pred_id), store.get(pred_id)) {
                        (Some(&(start, end)), Some(snap)) => {
                            start != snap.start_date || end != snap.end_date
                        }
                        _ => false,
                    }
                });
                if !upstream_moved {
                    finalized.insert(succ_id.clone(), (succ.start_date, succ.end_date));
                    queue.push_back(succ_id.clone());
                    continue;
                }

                // Max over all incoming edges, not just the triggering one.
                let start = succ
                    .predecessors
                    .iter()
                    .map(|(pred_id, lag)| {
                        let pred_end = finalized
                            .get(pred_id)
                            .map(|(_, end)| *end)
                            .or_else(|| store.get(pred_id).map(|p| p.end_date));
                        (pred_end, *lag)
                    })
                    .filter_map(|(end, lag)| Some(end? + Duration::days(lag)))
                    .max()
                    .unwrap_or(succ.start_date);
                let end = start + Duration::days(succ.duration_days());

                finalized.insert(succ_id.clone(), (start, end));
                if start != succ.start_date || end != succ.end_date {
                    changes.insert(DateChange::new(
                        succ_id,
                        succ.start_date,
                        succ.end_date,
                        start,
                        end,
                    ));
                }
                queue.push_back(succ_id.clone());
            }
        }

        let unresolved = reachable.len() - finalized.len();
        if unresolved > 0 {
            debug!(
                "propagate: {unresolved} task(s) on a dependency cycle kept their dates \
                 (pass from {moved_id:?})"
            );
        }
        debug!(
            "propagate: moved {moved_id:?} to {new_start}..{new_end}, {} task(s) changed",
            changes.len()
        );

        changes
    }

    /// Ids reachable from `root` through successor edges, `root` included.
    /// The visited set doubles as the cycle guard: a task is expanded at
    /// most once no matter how the edges loop.
    fn reachable_from(&self, store: &TaskStore, root: &str) -> BTreeSet<TaskId> {
        let mut visited: BTreeSet<TaskId> = BTreeSet::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        visited.insert(root.to_string());
        queue.push_back(root);

        while let Some(current) = queue.pop_front() {
            let Some(task) = store.get(current) else {
                continue;
            };
            for succ in &task.successors {
                if visited.insert(succ.clone()) {
                    if let Some(s) = store.get(succ) {
                        queue.push_back(&s.id);
                    }
                }
            }
        }
        visited
    }
}
