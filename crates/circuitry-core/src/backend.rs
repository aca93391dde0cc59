//! In-memory circuit state
//!
//! Applies circuit actions to a snapshot the way the remote state does,
//! resolving components and ports by their 1-based position. Hosts without a
//! remote state and the test suite use it as the action sink.

use crate::action::{ActionSink, CircuitAction};
use crate::model::{CircuitSnapshot, ComponentId, PortData, PortDirection, PortIndex, PortRef};
use tracing::{debug, warn};

/// A circuit that applies actions locally
#[derive(Debug, Clone, Default)]
pub struct LocalCircuit {
    snapshot: CircuitSnapshot,
    revision: u64,
}

impl LocalCircuit {
    /// Wrap an initial snapshot
    pub fn new(snapshot: CircuitSnapshot) -> Self {
        Self {
            snapshot,
            revision: 0,
        }
    }

    /// Current state
    pub fn snapshot(&self) -> &CircuitSnapshot {
        &self.snapshot
    }

    /// Number of actions applied so far
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply one action. Returns `false` when its target does not exist.
    pub fn apply(&mut self, action: &CircuitAction) -> bool {
        let applied = match action {
            CircuitAction::SetComponentCoordinates {
                component_id,
                rel_x,
                rel_y,
            } => self
                .snapshot
                .component_mut(*component_id)
                .map(|c| {
                    c.x = *rel_x;
                    c.y = *rel_y;
                })
                .is_some(),
            CircuitAction::SetComponentOption {
                component_id,
                option,
            } => self
                .snapshot
                .component_mut(*component_id)
                .map(|c| c.option = Some(option.clone()))
                .is_some(),
            CircuitAction::DetachComponent { component_id } => self.detach(*component_id),
            CircuitAction::SetComponentInput {
                component_id,
                port_id,
                input,
            } => self
                .port_mut(*component_id, PortDirection::Input, *port_id)
                .map(|p| p.current_data = input.clone())
                .is_some(),
            CircuitAction::AddConnection {
                input_component_id,
                input_port_id,
                output_component_id,
                output_port_id,
            } => self.connect(
                *input_component_id,
                *input_port_id,
                *output_component_id,
                *output_port_id,
            ),
            CircuitAction::RemoveConnection {
                component_id,
                is_input,
                port_id,
            } => self.disconnect(*component_id, *is_input, *port_id),
        };

        if applied {
            self.revision += 1;
            debug!(action = action.name(), revision = self.revision, "applied circuit action");
        } else {
            warn!("Ignoring circuit action with unknown target: {:?}", action);
        }
        applied
    }

    fn port_mut(
        &mut self,
        component_id: ComponentId,
        direction: PortDirection,
        index: PortIndex,
    ) -> Option<&mut PortData> {
        let i = index.checked_sub(1)?;
        self.snapshot
            .component_mut(component_id)?
            .ports_mut(direction)
            .get_mut(i)
    }

    fn port_ref(
        &self,
        component_id: ComponentId,
        direction: PortDirection,
        index: PortIndex,
    ) -> Option<PortRef> {
        self.snapshot
            .component(component_id)?
            .port(direction, index)
            .map(|p| p.port_ref.clone())
    }

    fn connect(
        &mut self,
        input_component_id: ComponentId,
        input_port_id: PortIndex,
        output_component_id: ComponentId,
        output_port_id: PortIndex,
    ) -> bool {
        let Some(source) = self.port_ref(output_component_id, PortDirection::Output, output_port_id)
        else {
            return false;
        };
        match self.port_mut(input_component_id, PortDirection::Input, input_port_id) {
            Some(input) => {
                input.connected_to = source;
                true
            }
            None => false,
        }
    }

    fn disconnect(&mut self, component_id: ComponentId, is_input: bool, port_id: PortIndex) -> bool {
        if is_input {
            return match self.port_mut(component_id, PortDirection::Input, port_id) {
                Some(input) => {
                    input.connected_to = PortRef::null();
                    true
                }
                None => false,
            };
        }
        let Some(source) = self.port_ref(component_id, PortDirection::Output, port_id) else {
            return false;
        };
        self.unlink_all(&source);
        true
    }

    fn unlink_all(&mut self, source: &PortRef) {
        for input in self
            .snapshot
            .components
            .iter_mut()
            .flat_map(|c| c.input_ports.iter_mut())
            .filter(|p| &p.connected_to == source)
        {
            input.connected_to = PortRef::null();
        }
    }

    fn detach(&mut self, component_id: ComponentId) -> bool {
        let Some(component) = self.snapshot.component(component_id) else {
            return false;
        };
        if !component.removable {
            warn!("Component {} is not removable", component_id);
            return false;
        }
        let outputs: Vec<PortRef> = component
            .output_ports
            .iter()
            .map(|p| p.port_ref.clone())
            .collect();
        self.snapshot.components.remove(component_id - 1);
        for output in &outputs {
            self.unlink_all(output);
        }
        true
    }
}

impl ActionSink for LocalCircuit {
    fn act(&mut self, action: CircuitAction) {
        self.apply(&action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ComponentData;

    fn circuit() -> LocalCircuit {
        let mut source = ComponentData::new("Source", 0.0, 0.0)
            .with_output(PortData::new("[0x10]", "Out").with_type("number"));
        source.removable = true;
        let sink = ComponentData::new("Sink", 200.0, 0.0)
            .with_input(PortData::new("[0x20]", "A").with_type("number"))
            .with_input(PortData::new("[0x21]", "B").with_type("number"));
        LocalCircuit::new(CircuitSnapshot {
            components: vec![source, sink],
        })
    }

    #[test]
    fn test_connect_and_disconnect_input() {
        let mut circuit = circuit();
        assert!(circuit.apply(&CircuitAction::AddConnection {
            input_component_id: 2,
            input_port_id: 2,
            output_component_id: 1,
            output_port_id: 1,
        }));
        let b = &circuit.snapshot().components[1].input_ports[1];
        assert_eq!(b.connected_to, PortRef::new("[0x10]"));

        assert!(circuit.apply(&CircuitAction::RemoveConnection {
            component_id: 2,
            is_input: true,
            port_id: 2,
        }));
        assert!(!circuit.snapshot().components[1].input_ports[1].is_connected());
        assert_eq!(circuit.revision(), 2);
    }

    #[test]
    fn test_remove_output_unlinks_every_input() {
        let mut circuit = circuit();
        for port in 1..=2 {
            circuit.act(CircuitAction::AddConnection {
                input_component_id: 2,
                input_port_id: port,
                output_component_id: 1,
                output_port_id: 1,
            });
        }
        circuit.act(CircuitAction::RemoveConnection {
            component_id: 1,
            is_input: false,
            port_id: 1,
        });
        assert!(circuit.snapshot().components[1]
            .input_ports
            .iter()
            .all(|p| !p.is_connected()));
    }

    #[test]
    fn test_detach_reindexes_and_unlinks() {
        let mut circuit = circuit();
        circuit.act(CircuitAction::AddConnection {
            input_component_id: 2,
            input_port_id: 1,
            output_component_id: 1,
            output_port_id: 1,
        });
        assert!(circuit.apply(&CircuitAction::DetachComponent { component_id: 1 }));
        let snapshot = circuit.snapshot();
        assert_eq!(snapshot.components.len(), 1);
        // The sink is now component 1.
        assert_eq!(snapshot.component(1).unwrap().name, "Sink");
        assert!(!snapshot.components[0].input_ports[0].is_connected());
    }

    #[test]
    fn test_non_removable_component_stays() {
        let mut circuit = circuit();
        assert!(!circuit.apply(&CircuitAction::DetachComponent { component_id: 2 }));
        assert_eq!(circuit.snapshot().components.len(), 2);
    }

    #[test]
    fn test_unknown_targets_are_ignored() {
        let mut circuit = circuit();
        assert!(!circuit.apply(&CircuitAction::SetComponentCoordinates {
            component_id: 9,
            rel_x: 1.0,
            rel_y: 1.0,
        }));
        assert!(!circuit.apply(&CircuitAction::SetComponentInput {
            component_id: 2,
            port_id: 0,
            input: serde_json::json!(1),
        }));
        assert_eq!(circuit.revision(), 0);
    }

    #[test]
    fn test_option_and_input() {
        let mut circuit = circuit();
        circuit.act(CircuitAction::SetComponentOption {
            component_id: 1,
            option: "Fast".to_string(),
        });
        circuit.act(CircuitAction::SetComponentInput {
            component_id: 2,
            port_id: 1,
            input: serde_json::json!(42.0),
        });
        assert_eq!(circuit.snapshot().components[0].option.as_deref(), Some("Fast"));
        assert_eq!(
            circuit.snapshot().components[1].input_ports[0].current_data,
            serde_json::json!(42.0)
        );
    }
}
