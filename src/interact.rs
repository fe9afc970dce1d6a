//! Drag interaction adapter.
//!
//! Converts a pointer-drag gesture on a task bar into a whole-day date
//! delta and runs one propagation pass. The adapter owns the commit
//! discipline: dates change exactly once, on pointer release, from the
//! final accumulated pixel offset — never incrementally during motion.
//! A cancelled gesture never reaches the propagator, not even with a
//! zero delta.
//!
//! Pixel geometry stops here: the engine below this module only ever
//! sees quantized day deltas.

use log::debug;

use crate::engine::Propagator;
use crate::models::{ChangeSet, TaskId};
use crate::store::TaskStore;

/// Zoom level of the chart, fixing the width of one day in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomLevel {
    /// One column per day.
    Day,
    /// One column per week.
    Week,
    /// One column per month.
    Month,
}

impl ZoomLevel {
    /// Width of a single day at this zoom level.
    pub fn day_width_px(self) -> f64 {
        match self {
            ZoomLevel::Day => 32.0,
            ZoomLevel::Week => 12.0,
            ZoomLevel::Month => 4.0,
        }
    }
}

/// An in-progress drag of one task bar.
///
/// Tracks the latest accumulated pixel offset. Consumed by
/// [`DragAdapter::release`] or [`DragAdapter::cancel`], so a session
/// cannot commit twice.
#[derive(Debug, Clone)]
pub struct DragSession {
    task_id: TaskId,
    offset_px: f64,
}

impl DragSession {
    /// Task being dragged.
    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Records the latest accumulated offset from the drag origin.
    /// Replaces, not adds: the caller reports totals.
    pub fn move_to(&mut self, offset_px: f64) {
        self.offset_px = offset_px;
    }

    /// Current accumulated offset.
    pub fn offset_px(&self) -> f64 {
        self.offset_px
    }
}

/// Translates drag gestures into propagation passes.
#[derive(Debug, Clone)]
pub struct DragAdapter {
    day_width_px: f64,
    propagator: Propagator,
}

impl DragAdapter {
    /// Creates an adapter for the given zoom level.
    pub fn new(zoom: ZoomLevel) -> Self {
        Self::with_day_width(zoom.day_width_px())
    }

    /// Creates an adapter with an explicit day width.
    pub fn with_day_width(day_width_px: f64) -> Self {
        Self {
            day_width_px,
            propagator: Propagator::new(),
        }
    }

    /// Starts a drag on the given task bar.
    pub fn begin(&self, task_id: impl Into<TaskId>) -> DragSession {
        DragSession {
            task_id: task_id.into(),
            offset_px: 0.0,
        }
    }

    /// Quantizes a pixel offset to a whole-day delta:
    /// `round(px / day_width)`.
    pub fn quantize(&self, offset_px: f64) -> i64 {
        (offset_px / self.day_width_px).round() as i64
    }

    /// Commits the gesture: quantizes the final offset, shifts the
    /// dragged task by that many days (duration preserved) and runs one
    /// propagation pass over the store snapshot.
    ///
    /// A zero-day delta short-circuits to an empty [`ChangeSet`] without
    /// invoking the propagator, as does a task no longer in the store.
    /// The returned changes are not applied; commit via
    /// [`TaskStore::apply`].
    pub fn release(&self, session: DragSession, store: &TaskStore) -> ChangeSet {
        let delta_days = self.quantize(session.offset_px);
        if delta_days == 0 {
            debug!("drag on {:?} released below one day, no-op", session.task_id);
            return ChangeSet::new();
        }
        let Some(task) = store.get(&session.task_id) else {
            debug!("drag released on missing task {:?}, no-op", session.task_id);
            return ChangeSet::new();
        };

        let (new_start, new_end) = task.shifted(delta_days);
        debug!(
            "drag on {:?} released: {:.1}px → {delta_days} day(s)",
            session.task_id, session.offset_px
        );
        self.propagator
            .propagate(store, &session.task_id, new_start, new_end)
    }

    /// Abandons the gesture. The propagator is never invoked.
    pub fn cancel(&self, session: DragSession) {
        debug!("drag on {:?} cancelled", session.task_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use chrono::NaiveDate;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn store_ab() -> TaskStore {
        let mut store = TaskStore::new();
        store.insert(Task::new("A", jan(1), jan(3))).unwrap();
        store.insert(Task::new("B", jan(4), jan(6))).unwrap();
        store.link("A", "B", 0).unwrap();
        store
    }

    #[test]
    fn test_quantize_rounds_to_nearest_day() {
        let adapter = DragAdapter::with_day_width(32.0);
        assert_eq!(adapter.quantize(0.0), 0);
        assert_eq!(adapter.quantize(15.0), 0); // under half a day
        assert_eq!(adapter.quantize(16.0), 1); // half rounds away from zero
        assert_eq!(adapter.quantize(95.0), 3);
        assert_eq!(adapter.quantize(-48.0), -2);
    }

    #[test]
    fn test_zoom_levels_quantize_differently() {
        let px = 40.0;
        assert_eq!(DragAdapter::new(ZoomLevel::Day).quantize(px), 1);
        assert_eq!(DragAdapter::new(ZoomLevel::Week).quantize(px), 3);
        assert_eq!(DragAdapter::new(ZoomLevel::Month).quantize(px), 10);
    }

    #[test]
    fn test_release_shifts_and_cascades() {
        let store = store_ab();
        let adapter = DragAdapter::with_day_width(10.0);

        let mut session = adapter.begin("A");
        session.move_to(12.0);
        session.move_to(41.0); // totals, not increments: final offset wins

        let changes = adapter.release(session, &store);
        let a = changes.get("A").unwrap();
        assert_eq!(a.new_start, jan(5)); // +4 days
        assert_eq!(a.new_end, jan(7));
        assert!(changes.contains("B"));
    }

    #[test]
    fn test_release_preserves_duration() {
        let store = store_ab();
        let adapter = DragAdapter::with_day_width(10.0);

        let mut session = adapter.begin("A");
        session.move_to(-20.0);
        let changes = adapter.release(session, &store);
        let a = changes.get("A").unwrap();
        assert_eq!((a.new_end - a.new_start).num_days(), 2);
        assert_eq!(a.new_start, jan(1) - chrono::Duration::days(2));
    }

    #[test]
    fn test_subday_release_is_noop() {
        let store = store_ab();
        let adapter = DragAdapter::with_day_width(32.0);

        let mut session = adapter.begin("A");
        session.move_to(9.0);
        let changes = adapter.release(session, &store);
        assert!(changes.is_empty());
    }

    #[test]
    fn test_release_on_missing_task_is_noop() {
        let store = store_ab();
        let adapter = DragAdapter::with_day_width(10.0);

        let mut session = adapter.begin("GONE");
        session.move_to(50.0);
        assert!(adapter.release(session, &store).is_empty());
    }

    #[test]
    fn test_cancel_consumes_session() {
        let adapter = DragAdapter::with_day_width(10.0);
        let mut session = adapter.begin("A");
        session.move_to(100.0);
        adapter.cancel(session);
        // Session moved into cancel: a cancelled drag cannot be released.
    }
}
