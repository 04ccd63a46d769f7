//! Drag/resize gesture handling for the crop selection.
//!
//! Deltas are incremental: every update measures the pointer movement
//! since the previous update, so the result does not depend on how often
//! pointer events arrive.

use facesnap_region_model::region::{NormalizedRegion, Point2D};
use serde::{Deserialize, Serialize};

/// What a drag gesture does to the region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragMode {
    /// Translate the region, keeping its size.
    Move,
    /// Change the region's size from the bottom-right handle.
    Resize,
}

/// On-screen size of the element the frame is displayed in (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    fn is_usable(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy)]
struct DragState {
    mode: DragMode,
    last_pointer: Point2D,
}

/// Owns the crop region and applies gesture deltas to it.
#[derive(Debug, Clone)]
pub struct SelectionController {
    region: NormalizedRegion,
    drag: Option<DragState>,
}

impl SelectionController {
    /// Controller holding the initial editor selection.
    pub fn new() -> Self {
        Self::with_region(NormalizedRegion::INITIAL)
    }

    /// Controller holding `region` (re-clamped).
    pub fn with_region(region: NormalizedRegion) -> Self {
        Self {
            region: region.clamped(),
            drag: None,
        }
    }

    /// The current region.
    pub fn region(&self) -> NormalizedRegion {
        self.region
    }

    /// Mode of the active drag, if any.
    pub fn active_drag(&self) -> Option<DragMode> {
        self.drag.map(|d| d.mode)
    }

    /// Start a gesture at `pointer`. Does not touch the region.
    ///
    /// Starting a new gesture while one is active replaces it.
    pub fn begin_drag(&mut self, mode: DragMode, pointer: Point2D) {
        self.drag = Some(DragState {
            mode,
            last_pointer: pointer,
        });
    }

    /// Apply pointer movement since the last update.
    ///
    /// Returns `false` (and changes nothing) when no drag is active. An
    /// unusable container size or non-finite pointer leaves the region as
    /// is; the pointer is still recorded when it is finite.
    pub fn update_drag(&mut self, pointer: Point2D, container: ContainerSize) -> bool {
        let Some(state) = self.drag.as_mut() else {
            return false;
        };

        if !pointer.x.is_finite() || !pointer.y.is_finite() {
            return true;
        }

        let last = std::mem::replace(&mut state.last_pointer, pointer);
        if !container.is_usable() {
            tracing::debug!(?container, "Ignoring drag update for empty container");
            return true;
        }

        let dx = (pointer.x - last.x) / container.width;
        let dy = (pointer.y - last.y) / container.height;

        self.region = match state.mode {
            DragMode::Move => self.region.translated(dx, dy),
            DragMode::Resize => self.region.resized(dx, dy),
        };
        true
    }

    /// Finish the gesture. The region keeps its last value.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Replace the region wholesale (e.g. with a detector proposal).
    pub fn set_region(&mut self, region: NormalizedRegion) {
        self.region = region.clamped();
    }
}

impl Default for SelectionController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTAINER: ContainerSize = ContainerSize {
        width: 1000.0,
        height: 500.0,
    };

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let mut ctrl = SelectionController::new();
        assert!(!ctrl.update_drag(Point2D::new(500.0, 250.0), CONTAINER));
        assert_eq!(ctrl.region(), NormalizedRegion::INITIAL);
    }

    #[test]
    fn test_begin_drag_does_not_mutate() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Move, Point2D::new(10.0, 10.0));
        assert_eq!(ctrl.region(), NormalizedRegion::INITIAL);
        assert_eq!(ctrl.active_drag(), Some(DragMode::Move));
    }

    #[test]
    fn test_move_applies_normalized_delta() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Move, Point2D::new(100.0, 100.0));
        ctrl.update_drag(Point2D::new(200.0, 150.0), CONTAINER);
        let region = ctrl.region();
        assert!(approx(region.x, 0.45));
        assert!(approx(region.y, 0.35));
        assert!(approx(region.width, 0.3));
    }

    #[test]
    fn test_incremental_updates_accumulate() {
        let mut one_step = SelectionController::new();
        one_step.begin_drag(DragMode::Move, Point2D::new(0.0, 0.0));
        one_step.update_drag(Point2D::new(100.0, 50.0), CONTAINER);

        let mut many_steps = SelectionController::new();
        many_steps.begin_drag(DragMode::Move, Point2D::new(0.0, 0.0));
        for i in 1..=10 {
            many_steps.update_drag(Point2D::new(i as f64 * 10.0, i as f64 * 5.0), CONTAINER);
        }

        assert!(approx(one_step.region().x, many_steps.region().x));
        assert!(approx(one_step.region().y, many_steps.region().y));
    }

    #[test]
    fn test_move_clamps_at_frame_edge() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Move, Point2D::new(0.0, 0.0));
        ctrl.update_drag(Point2D::new(5000.0, -5000.0), CONTAINER);
        let region = ctrl.region();
        assert!(approx(region.x, 0.7));
        assert!(approx(region.y, 0.0));
    }

    #[test]
    fn test_resize_cannot_invert() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Resize, Point2D::new(500.0, 500.0));
        ctrl.update_drag(Point2D::new(-5000.0, -5000.0), CONTAINER);
        let region = ctrl.region();
        assert!(approx(region.width, 0.05));
        assert!(approx(region.height, 0.05));
        assert!(approx(region.x, 0.35));
    }

    #[test]
    fn test_resize_grows_to_frame_edge() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Resize, Point2D::new(0.0, 0.0));
        ctrl.update_drag(Point2D::new(5000.0, 5000.0), CONTAINER);
        let region = ctrl.region();
        assert!(approx(region.right(), 1.0));
        assert!(approx(region.bottom(), 1.0));
    }

    #[test]
    fn test_end_drag_stops_motion() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Move, Point2D::new(0.0, 0.0));
        ctrl.update_drag(Point2D::new(100.0, 0.0), CONTAINER);
        ctrl.end_drag();
        let after_drag = ctrl.region();
        assert!(!ctrl.update_drag(Point2D::new(400.0, 0.0), CONTAINER));
        assert_eq!(ctrl.region(), after_drag);
        assert_eq!(ctrl.active_drag(), None);
    }

    #[test]
    fn test_zero_container_is_ignored() {
        let mut ctrl = SelectionController::new();
        ctrl.begin_drag(DragMode::Move, Point2D::new(0.0, 0.0));
        assert!(ctrl.update_drag(Point2D::new(10.0, 10.0), ContainerSize::new(0.0, 0.0)));
        assert_eq!(ctrl.region(), NormalizedRegion::INITIAL);

        // The pointer was still recorded, so the next delta starts from it.
        ctrl.update_drag(Point2D::new(110.0, 10.0), CONTAINER);
        assert!(approx(ctrl.region().x, 0.45));
    }

    #[test]
    fn test_set_region_reclamps() {
        let mut ctrl = SelectionController::new();
        ctrl.set_region(NormalizedRegion {
            x: 0.9,
            y: 0.9,
            width: 0.5,
            height: 0.01,
        });
        assert!(ctrl.region().is_valid());
    }
}
