//! Scheduling algorithms: dependency propagation and criticality.
//!
//! # Algorithm
//!
//! [`Propagator`] recomputes dependent task dates after one task moves,
//! processing the reachable subgraph in topological order so a
//! multi-predecessor task is finalized once, from the maximum over all
//! of its incoming constraints. [`CriticalPathAnalyzer`] then derives the
//! zero-slack task set from the updated date assignment.
//!
//! Both run synchronously to completion within the caller's event
//! handler: pure, bounded, in-memory traversal with no suspension
//! points. Callers serialize passes — each reads a consistent store
//! snapshot and its result is committed before the next pass begins.
//!
//! # References
//!
//! - Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
//! - Kelley & Walker (1959), "Critical-Path Planning and Scheduling"

mod critical;
mod propagate;

pub use critical::CriticalPathAnalyzer;
pub use propagate::Propagator;
