//! Component drag state machine
//!
//! One controller per rendered component. A press on the title bar starts a
//! drag, pointer moves accumulate relative deltas, and the release (or the
//! component disappearing) commits the final position exactly once.

use crate::action::{ActionSink, CircuitAction};
use crate::capture::PointerGrab;
use crate::model::ComponentId;
use glam::Vec2;
use tracing::debug;

/// Observable drag state, used as part of a component's render key
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    /// No drag in progress
    #[default]
    Idle,
    /// Dragging, currently at `position`
    Dragging {
        /// In-progress position relative to the canvas origin
        position: Vec2,
    },
}

#[derive(Debug)]
struct DragSession {
    position: Vec2,
    last_pointer: Option<Vec2>,
    _grab: PointerGrab,
}

/// Drag state of one component
#[derive(Debug, Default)]
pub struct DragController {
    session: Option<DragSession>,
}

impl DragController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Start dragging from the component's current position.
    ///
    /// `grab` routes global pointer events to this component until the drag
    /// ends.
    pub fn begin(&mut self, origin: Vec2, grab: PointerGrab) {
        debug!(component = grab.component(), x = origin.x, y = origin.y, "drag started");
        self.session = Some(DragSession {
            position: origin,
            last_pointer: None,
            _grab: grab,
        });
    }

    /// Feed a pointer sample in canvas coordinates.
    ///
    /// The first sample after [`begin`](Self::begin) only establishes the
    /// baseline; later samples move the drag position by their delta.
    /// Returns `true` if the drag position changed.
    pub fn pointer_moved(&mut self, pointer: Vec2) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let moved = match session.last_pointer {
            Some(last) => {
                let delta = pointer - last;
                session.position += delta;
                delta != Vec2::ZERO
            }
            None => false,
        };
        session.last_pointer = Some(pointer);
        moved
    }

    /// Finish the drag on release or unmount.
    ///
    /// Commits the final position as a single `set_component_coordinates`
    /// request and releases the pointer capture. Returns `false` if no drag
    /// was in progress.
    pub fn end(&mut self, component_id: ComponentId, sink: &mut dyn ActionSink) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        debug!(
            component = component_id,
            x = session.position.x,
            y = session.position.y,
            "drag finished"
        );
        sink.act(CircuitAction::SetComponentCoordinates {
            component_id,
            rel_x: session.position.x,
            rel_y: session.position.y,
        });
        true
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// In-progress drag position
    pub fn drag_position(&self) -> Option<Vec2> {
        self.session.as_ref().map(|s| s.position)
    }

    /// Position to render: the drag position while dragging, else `authoritative`
    pub fn render_position(&self, authoritative: Vec2) -> Vec2 {
        self.drag_position().unwrap_or(authoritative)
    }

    /// Observable state
    pub fn phase(&self) -> DragPhase {
        match self.drag_position() {
            Some(position) => DragPhase::Dragging { position },
            None => DragPhase::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::PointerSurface;

    #[test]
    fn test_idle_controller_ignores_events() {
        let mut drag = DragController::new();
        let mut sent: Vec<CircuitAction> = Vec::new();
        assert!(!drag.pointer_moved(Vec2::new(5.0, 5.0)));
        assert!(!drag.end(1, &mut sent));
        assert!(sent.is_empty());
        assert_eq!(drag.render_position(Vec2::new(1.0, 2.0)), Vec2::new(1.0, 2.0));
        assert_eq!(drag.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_end_releases_capture() {
        let surface = PointerSurface::new();
        let mut drag = DragController::new();
        drag.begin(Vec2::ZERO, surface.grab(3));
        assert_eq!(surface.holder(), Some(3));
        drag.end(3, &mut Vec::<CircuitAction>::new());
        assert!(!surface.is_captured());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_dropping_controller_releases_capture() {
        let surface = PointerSurface::new();
        let mut drag = DragController::new();
        drag.begin(Vec2::ZERO, surface.grab(3));
        drop(drag);
        assert!(!surface.is_captured());
    }

    #[test]
    fn test_render_position_follows_drag() {
        let surface = PointerSurface::new();
        let mut drag = DragController::new();
        drag.begin(Vec2::new(10.0, 10.0), surface.grab(1));
        drag.pointer_moved(Vec2::new(100.0, 100.0));
        assert!(drag.pointer_moved(Vec2::new(103.0, 98.0)));
        assert_eq!(drag.render_position(Vec2::ZERO), Vec2::new(13.0, 8.0));
        assert_eq!(
            drag.phase(),
            DragPhase::Dragging {
                position: Vec2::new(13.0, 8.0)
            }
        );
    }
}
