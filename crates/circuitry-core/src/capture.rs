//! Global pointer capture
//!
//! While a component is being dragged it receives pointer moves and releases
//! from the whole canvas, not only from its own bounds. The capture is held
//! through a guard so it is released on every exit path.

use crate::model::ComponentId;
use std::cell::Cell;
use std::rc::Rc;
use tracing::trace;

#[derive(Debug, Default)]
struct CaptureState {
    holder: Cell<Option<ComponentId>>,
    generation: Cell<u64>,
}

/// The shared input surface of the editor.
///
/// Cheap to clone; all clones observe the same capture. Single-threaded.
#[derive(Debug, Clone, Default)]
pub struct PointerSurface {
    state: Rc<CaptureState>,
}

impl PointerSurface {
    /// Create a surface with no capture
    pub fn new() -> Self {
        Self::default()
    }

    /// Route all pointer events to `component` until the guard is dropped.
    ///
    /// A newer grab replaces the previous holder; the older guard then
    /// releases nothing.
    pub fn grab(&self, component: ComponentId) -> PointerGrab {
        let generation = self.state.generation.get().wrapping_add(1);
        self.state.generation.set(generation);
        self.state.holder.set(Some(component));
        trace!(component, "pointer captured");
        PointerGrab {
            state: Rc::clone(&self.state),
            component,
            generation,
        }
    }

    /// Component currently receiving global pointer events
    pub fn holder(&self) -> Option<ComponentId> {
        self.state.holder.get()
    }

    /// Whether any component holds the capture
    pub fn is_captured(&self) -> bool {
        self.holder().is_some()
    }
}

/// Capture guard; releases the pointer when dropped
#[derive(Debug)]
pub struct PointerGrab {
    state: Rc<CaptureState>,
    component: ComponentId,
    generation: u64,
}

impl PointerGrab {
    /// Component holding this capture
    pub fn component(&self) -> ComponentId {
        self.component
    }

    /// Whether this guard is still the active capture
    pub fn is_active(&self) -> bool {
        self.state.generation.get() == self.generation
    }
}

impl Drop for PointerGrab {
    fn drop(&mut self) {
        if self.is_active() {
            self.state.holder.set(None);
            trace!(component = self.component, "pointer released");
        }
    }
}
