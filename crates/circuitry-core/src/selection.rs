//! Port selection and linking
//!
//! A single selected port is shared by the whole editor. Left clicks select,
//! toggle off, or complete a link; right clicks unlink.

use crate::action::CircuitAction;
use crate::model::{ComponentId, PortDirection, PortIndex, PortRef};
use tracing::debug;

/// Identifies a clicked port
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortHandle {
    /// Owning component
    pub component_id: ComponentId,
    /// 1-based index within the component's list for `direction`
    pub index: PortIndex,
    /// Input or output
    pub direction: PortDirection,
    /// Reference of the port in the current snapshot
    pub port_ref: PortRef,
}

/// Content of the selection slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedPort {
    /// 1-based index within the owning component
    pub index: PortIndex,
    /// Owning component
    pub component_id: ComponentId,
    /// Whether the selected port is an output
    pub is_output: bool,
    /// Reference of the selected port
    pub port_ref: PortRef,
}

impl From<&PortHandle> for SelectedPort {
    fn from(handle: &PortHandle) -> Self {
        Self {
            index: handle.index,
            component_id: handle.component_id,
            is_output: handle.direction.is_output(),
            port_ref: handle.port_ref.clone(),
        }
    }
}

/// The editor-wide selection slot
#[derive(Debug, Clone, Default)]
pub struct PortSelection {
    selected: Option<SelectedPort>,
}

impl PortSelection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected port
    pub fn selected(&self) -> Option<&SelectedPort> {
        self.selected.as_ref()
    }

    /// Whether the port with `port_ref` is the selected one
    pub fn is_selected(&self, port_ref: &PortRef) -> bool {
        self.selected
            .as_ref()
            .is_some_and(|s| &s.port_ref == port_ref)
    }

    /// Drop the selection
    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Handle a left click on `target`.
    ///
    /// Returns the `add_connection` request when the click completes a link
    /// between an output and an input of two different components.
    pub fn click(&mut self, target: &PortHandle) -> Option<CircuitAction> {
        let Some(selected) = self.selected.take() else {
            debug!(component = target.component_id, port = target.index, "port selected");
            self.selected = Some(SelectedPort::from(target));
            return None;
        };

        if selected.port_ref == target.port_ref {
            debug!("port deselected");
            return None;
        }
        if selected.component_id == target.component_id {
            debug!("ports of the same component cannot be linked");
            return None;
        }
        if selected.is_output == target.direction.is_output() {
            debug!("ports of the same direction cannot be linked");
            return None;
        }

        let action = if target.direction.is_output() {
            CircuitAction::AddConnection {
                input_component_id: selected.component_id,
                input_port_id: selected.index,
                output_component_id: target.component_id,
                output_port_id: target.index,
            }
        } else {
            CircuitAction::AddConnection {
                input_component_id: target.component_id,
                input_port_id: target.index,
                output_component_id: selected.component_id,
                output_port_id: selected.index,
            }
        };
        Some(action)
    }

    /// Handle a right click on `target`: always unlink, selection untouched
    pub fn right_click(&self, target: &PortHandle) -> CircuitAction {
        CircuitAction::RemoveConnection {
            component_id: target.component_id,
            is_input: !target.direction.is_output(),
            port_id: target.index,
        }
    }
}
