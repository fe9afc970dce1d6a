//! Gantt-chart scheduling engine.
//!
//! Maintains a consistent set of task start/end dates under a network of
//! finish-to-start precedence constraints, propagates the effect of
//! moving one task to every transitively dependent task, and marks the
//! zero-slack (critical) tasks. Persistence, rendering, and notification
//! delivery are external collaborators — this crate is pure in-process
//! computation.
//!
//! # Modules
//!
//! - **`models`**: Domain types — `Task`, `DateChange`, `ChangeSet`
//! - **`store`**: In-memory task collection with symmetric edge bookkeeping
//! - **`engine`**: `Propagator` (dependency cascade, topological order)
//!   and `CriticalPathAnalyzer` (zero-slack heuristic)
//! - **`interact`**: Drag gesture → whole-day delta quantization
//! - **`validation`**: Structural integrity diagnostics (cycles, dangling
//!   references, broken edge mirrors)
//!
//! # Control Flow
//!
//! A drag gesture ends → [`interact::DragAdapter`] quantizes the pixel
//! offset to a day delta and runs [`engine::Propagator`] over the store
//! snapshot → the caller commits the returned [`models::ChangeSet`] with
//! [`store::TaskStore::apply`] and refreshes criticality → the resolved
//! task list is handed to the renderer, the change entries to the
//! persistence and notification collaborators.
//!
//! # References
//!
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4

pub mod engine;
pub mod error;
pub mod interact;
pub mod models;
pub mod store;
pub mod validation;
