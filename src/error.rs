//! Engine error types.
//!
//! These cover store mutations only. The propagation pass itself never
//! fails: rejected inputs degrade to an empty [`crate::models::ChangeSet`]
//! so a malformed gesture or stale id cannot crash an interactive UI.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::TaskId;

/// Errors returned by [`crate::store::TaskStore`] mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A task with this id already exists in the store.
    #[error("duplicate task id: {0}")]
    DuplicateTask(TaskId),

    /// The referenced task does not exist.
    #[error("unknown task id: {0}")]
    UnknownTask(TaskId),

    /// A task may not depend on itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// `end` precedes `start`.
    #[error("invalid date range for task {task_id}: end {end} precedes start {start}")]
    InvalidDateRange {
        task_id: TaskId,
        start: NaiveDate,
        end: NaiveDate,
    },
}
