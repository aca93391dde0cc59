//! Requests sent to the remote circuit state
//!
//! Every mutating interaction ends in one of these. They are fire-and-forget:
//! the editor never waits for an answer and relies on the next snapshot to
//! reconcile its optimistic local state.

use crate::model::{ComponentId, PortIndex};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// A request to the remote circuit state.
///
/// Serialized as `{"action": "<name>", ...params}` with the parameter names
/// the remote side expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CircuitAction {
    /// Move a component to its final drag position
    SetComponentCoordinates {
        /// Target component
        component_id: ComponentId,
        /// New x, relative to the canvas origin
        rel_x: f32,
        /// New y, relative to the canvas origin
        rel_y: f32,
    },
    /// Pick one of the component's dropdown options
    SetComponentOption {
        /// Target component
        component_id: ComponentId,
        /// Chosen option
        option: String,
    },
    /// Remove a component from the circuit
    DetachComponent {
        /// Target component
        component_id: ComponentId,
    },
    /// Set the literal value of an unconnected input port
    SetComponentInput {
        /// Owning component
        component_id: ComponentId,
        /// 1-based input port index
        port_id: PortIndex,
        /// New literal value
        input: serde_json::Value,
    },
    /// Wire an output port into an input port
    AddConnection {
        /// Component owning the input port
        input_component_id: ComponentId,
        /// 1-based input port index
        input_port_id: PortIndex,
        /// Component owning the output port
        output_component_id: ComponentId,
        /// 1-based output port index
        output_port_id: PortIndex,
    },
    /// Remove every connection of a port
    RemoveConnection {
        /// Owning component
        component_id: ComponentId,
        /// Whether the port is an input
        is_input: bool,
        /// 1-based port index
        port_id: PortIndex,
    },
}

impl CircuitAction {
    /// Wire name of the action
    pub fn name(&self) -> &'static str {
        match self {
            Self::SetComponentCoordinates { .. } => "set_component_coordinates",
            Self::SetComponentOption { .. } => "set_component_option",
            Self::DetachComponent { .. } => "detach_component",
            Self::SetComponentInput { .. } => "set_component_input",
            Self::AddConnection { .. } => "add_connection",
            Self::RemoveConnection { .. } => "remove_connection",
        }
    }
}

/// Destination for circuit actions.
///
/// Implementations must not block; delivery failures are the remote side's
/// concern and are only logged here.
pub trait ActionSink {
    /// Send one action
    fn act(&mut self, action: CircuitAction);
}

/// Records actions in order, used by hosts that drain them once per frame.
impl ActionSink for Vec<CircuitAction> {
    fn act(&mut self, action: CircuitAction) {
        debug!(action = action.name(), "queued circuit action");
        self.push(action);
    }
}

impl ActionSink for crossbeam_channel::Sender<CircuitAction> {
    fn act(&mut self, action: CircuitAction) {
        let name = action.name();
        if let Err(e) = self.send(action) {
            warn!("Dropping circuit action '{}': {}", name, e);
        } else {
            debug!(action = name, "sent circuit action");
        }
    }
}
