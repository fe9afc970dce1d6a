//! Gantt scheduling domain models.
//!
//! Provides the core data types the engine reads and produces. The graph
//! itself is not a separate entity: precedence edges live as symmetric
//! predecessor/successor set membership on [`Task`], with per-edge lag
//! on the successor side.
//!
//! | Type | Role |
//! |------|------|
//! | [`Task`] | Schedulable unit: date range + precedence edges + payload |
//! | [`DateChange`] | One task's old/new dates; change-event payload |
//! | [`ChangeSet`] | Delta map returned by a propagation pass |

mod change;
mod task;

pub use change::{ChangeSet, DateChange};
pub use task::{Task, TaskId};
