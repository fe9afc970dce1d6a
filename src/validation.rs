//! Structural validation of the task graph.
//!
//! Checks integrity of tasks and precedence edges before or after
//! external edits. Detects:
//! - Self-dependencies
//! - Dangling predecessor/successor references
//! - Broken edge mirrors (one direction present, the other missing)
//! - Inverted date ranges
//! - Circular precedence dependencies (DAG validation)
//!
//! These are diagnostics, not gates: the engine tolerates a cyclic or
//! partially broken graph at runtime (the propagator's visited-set guard
//! keeps traversal safe) and leaves repair to the editing UI.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use crate::store::TaskStore;
use std::collections::{HashMap, HashSet};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// A task lists itself as predecessor or successor.
    SelfDependency,
    /// A predecessor reference points to a missing task.
    UnknownPredecessor,
    /// A successor reference points to a missing task.
    UnknownSuccessor,
    /// An edge exists in one direction but its mirror is missing.
    AsymmetricLink,
    /// `end_date` precedes `start_date`.
    InvalidDateRange,
    /// Precedence graph contains a cycle.
    CyclicDependency,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the structural integrity of a task store.
///
/// Checks:
/// 1. No task depends on itself
/// 2. All predecessor/successor references resolve
/// 3. Every edge is mirrored in both directions
/// 4. Every task satisfies `end_date >= start_date`
/// 5. No circular precedence dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_store(store: &TaskStore) -> ValidationResult {
    let mut errors = Vec::new();

    for task in store.tasks() {
        if task.end_date < task.start_date {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidDateRange,
                format!(
                    "Task '{}' ends {} before it starts {}",
                    task.id, task.end_date, task.start_date
                ),
            ));
        }

        for pred_id in task.predecessors.keys() {
            if pred_id == &task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' lists itself as a predecessor", task.id),
                ));
                continue;
            }
            match store.get(pred_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownPredecessor,
                    format!("Task '{}' references unknown predecessor '{pred_id}'", task.id),
                )),
                Some(pred) if !pred.successors.contains(&task.id) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::AsymmetricLink,
                        format!(
                            "Edge '{pred_id}' → '{}' has no successor mirror",
                            task.id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }

        for succ_id in &task.successors {
            if succ_id == &task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' lists itself as a successor", task.id),
                ));
                continue;
            }
            match store.get(succ_id) {
                None => errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownSuccessor,
                    format!("Task '{}' references unknown successor '{succ_id}'", task.id),
                )),
                Some(succ) if !succ.predecessors.contains_key(&task.id) => {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::AsymmetricLink,
                        format!(
                            "Edge '{}' → '{succ_id}' has no predecessor mirror",
                            task.id
                        ),
                    ));
                }
                Some(_) => {}
            }
        }
    }

    if let Some(cycle_err) = detect_cycles(store) {
        errors.push(cycle_err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Detects cycles in the precedence graph using DFS.
///
/// # Algorithm
/// Topological sort via DFS. If a back-edge is found (visiting a node
/// currently in the recursion stack), a cycle exists.
///
/// # Reference
/// Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4
fn detect_cycles(store: &TaskStore) -> Option<ValidationError> {
    // Adjacency list: task id → successors present in the store.
    let mut adj: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in store.tasks() {
        let succs: Vec<&str> = task
            .successors
            .iter()
            .filter(|s| store.contains(s))
            .map(|s| s.as_str())
            .collect();
        adj.insert(task.id.as_str(), succs);
    }

    let mut visited = HashSet::new();
    let mut in_stack = HashSet::new();

    for task in store.tasks() {
        let node = task.id.as_str();
        if !visited.contains(node) && has_cycle_dfs(node, &adj, &mut visited, &mut in_stack) {
            return Some(ValidationError::new(
                ValidationErrorKind::CyclicDependency,
                format!("Circular dependency detected involving task '{node}'"),
            ));
        }
    }

    None
}

fn has_cycle_dfs<'a>(
    node: &'a str,
    adj: &HashMap<&'a str, Vec<&'a str>>,
    visited: &mut HashSet<&'a str>,
    in_stack: &mut HashSet<&'a str>,
) -> bool {
    visited.insert(node);
    in_stack.insert(node);

    if let Some(neighbors) = adj.get(node) {
        for &next in neighbors {
            if in_stack.contains(next) {
                return true; // Back edge → cycle
            }
            if !visited.contains(next) && has_cycle_dfs(next, adj, visited, in_stack) {
                return true;
            }
        }
    }

    in_stack.remove(node);
    false
}
