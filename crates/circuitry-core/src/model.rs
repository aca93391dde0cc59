//! Circuit snapshot model
//!
//! The remote circuit state sends a fresh snapshot every update. Components are
//! addressed by their 1-based position in that snapshot, ports by their 1-based
//! position inside the owning component's input or output list.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 1-based render-order index of a component in the current snapshot.
///
/// This is not a stable identity: reordering the component list changes which
/// component an index refers to. The remote state resolves indices with the
/// same convention, so the two sides agree for the duration of one snapshot.
pub type ComponentId = usize;

/// 1-based index of a port within its component's input or output list
pub type PortIndex = usize;

/// Data type tag used when a port does not declare one
pub const DEFAULT_PORT_TYPE: &str = "any";

/// Color used for components and port icons that do not declare one
pub const DEFAULT_COLOR: &str = "blue";

/// Opaque port reference, unique within one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortRef(String);

impl PortRef {
    /// Reference value meaning "no connection".
    pub const NULL_STR: &'static str = "[0x0]";

    /// Create a reference from its string form
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The null reference
    pub fn null() -> Self {
        Self(Self::NULL_STR.to_string())
    }

    /// Whether this is the null reference (compared by value)
    pub fn is_null(&self) -> bool {
        self.0 == Self::NULL_STR
    }

    /// String form of the reference
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PortRef {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PortRef {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Which list of its component a port lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PortDirection {
    /// Receives a connection
    Input,
    /// Feeds connections
    Output,
}

impl PortDirection {
    /// Whether this is an output port
    pub fn is_output(self) -> bool {
        matches!(self, PortDirection::Output)
    }
}

/// A port as described by the remote state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortData {
    /// Opaque reference of this port
    #[serde(rename = "ref")]
    pub port_ref: PortRef,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Declared data type tag (`"string"`, `"number"`, `"any"`, ...)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub data_type: Option<String>,
    /// Literal value, only meaningful while the port is unconnected
    #[serde(default)]
    pub current_data: serde_json::Value,
    /// Reference of the output port this input is wired from
    #[serde(default)]
    pub connected_to: PortRef,
    /// Icon and wire color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl PortData {
    /// Create an unconnected port without a declared type
    pub fn new(port_ref: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            port_ref: PortRef::new(port_ref),
            name: name.into(),
            data_type: None,
            current_data: serde_json::Value::Null,
            connected_to: PortRef::null(),
            color: None,
        }
    }

    /// Builder: set the declared type
    pub fn with_type(mut self, data_type: impl Into<String>) -> Self {
        self.data_type = Some(data_type.into());
        self
    }

    /// Builder: wire this port from `source`
    pub fn connected_to(mut self, source: impl Into<String>) -> Self {
        self.connected_to = PortRef::new(source);
        self
    }

    /// Builder: set the icon and wire color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Declared type tag, `"any"` when absent
    pub fn type_tag(&self) -> &str {
        self.data_type.as_deref().unwrap_or(DEFAULT_PORT_TYPE)
    }

    /// Whether an incoming connection exists
    pub fn is_connected(&self) -> bool {
        !self.connected_to.is_null()
    }

    /// Icon color, falling back to the default
    pub fn icon_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }
}

/// A component as described by the remote state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentData {
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Title bar color
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// X position relative to the canvas origin, in pixels
    #[serde(default)]
    pub x: f32,
    /// Y position relative to the canvas origin, in pixels
    #[serde(default)]
    pub y: f32,
    /// Ordered input ports
    #[serde(default)]
    pub input_ports: Vec<PortData>,
    /// Ordered output ports
    #[serde(default)]
    pub output_ports: Vec<PortData>,
    /// Choices offered in the title bar dropdown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Currently chosen option
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
    /// Whether the component can be detached from the circuit
    #[serde(default)]
    pub removable: bool,
}

impl ComponentData {
    /// Create an empty component at `(x, y)`
    pub fn new(name: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            name: name.into(),
            color: None,
            x,
            y,
            input_ports: Vec::new(),
            output_ports: Vec::new(),
            options: None,
            option: None,
            removable: false,
        }
    }

    /// Builder: append an input port
    pub fn with_input(mut self, port: PortData) -> Self {
        self.input_ports.push(port);
        self
    }

    /// Builder: append an output port
    pub fn with_output(mut self, port: PortData) -> Self {
        self.output_ports.push(port);
        self
    }

    /// Authoritative position
    pub fn position(&self) -> glam::Vec2 {
        glam::Vec2::new(self.x, self.y)
    }

    /// Title bar color, falling back to the default
    pub fn title_color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    /// Port list for one direction
    pub fn ports(&self, direction: PortDirection) -> &[PortData] {
        match direction {
            PortDirection::Input => &self.input_ports,
            PortDirection::Output => &self.output_ports,
        }
    }

    /// Mutable port list for one direction
    pub fn ports_mut(&mut self, direction: PortDirection) -> &mut Vec<PortData> {
        match direction {
            PortDirection::Input => &mut self.input_ports,
            PortDirection::Output => &mut self.output_ports,
        }
    }

    /// Port by 1-based index
    pub fn port(&self, direction: PortDirection, index: PortIndex) -> Option<&PortData> {
        index
            .checked_sub(1)
            .and_then(|i| self.ports(direction).get(i))
    }
}

/// The full circuit as last sent by the remote state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitSnapshot {
    /// Components in render order
    #[serde(default)]
    pub components: Vec<ComponentData>,
}

impl CircuitSnapshot {
    /// Decode a snapshot from its JSON form
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the snapshot as JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Components paired with their 1-based render-order index
    pub fn indexed(&self) -> impl Iterator<Item = (ComponentId, &ComponentData)> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, component)| (i + 1, component))
    }

    /// Component by 1-based index
    pub fn component(&self, id: ComponentId) -> Option<&ComponentData> {
        id.checked_sub(1).and_then(|i| self.components.get(i))
    }

    /// Mutable component by 1-based index
    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentData> {
        id.checked_sub(1).and_then(|i| self.components.get_mut(i))
    }

    /// Find a port anywhere in the snapshot by reference
    pub fn find_port(&self, port_ref: &PortRef) -> Option<&PortData> {
        self.components
            .iter()
            .flat_map(|c| c.input_ports.iter().chain(c.output_ports.iter()))
            .find(|p| &p.port_ref == port_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_ref_compared_by_value() {
        let parsed: PortRef = serde_json::from_str("\"[0x0]\"").unwrap();
        assert!(parsed.is_null());
        assert!(PortRef::default().is_null());
        assert!(!PortRef::new("[0x1a2b]").is_null());
    }

    #[test]
    fn test_port_defaults() {
        let port: PortData = serde_json::from_str(r#"{"ref": "[0x10]", "name": "A"}"#).unwrap();
        assert_eq!(port.type_tag(), "any");
        assert!(!port.is_connected());
        assert_eq!(port.icon_color(), "blue");
        assert!(port.current_data.is_null());
    }

    #[test]
    fn test_snapshot_decoding() {
        let json = r#"{
            "components": [
                {
                    "name": "Adder",
                    "x": 10, "y": 20,
                    "input_ports": [
                        {"ref": "[0x1]", "name": "A", "type": "number", "current_data": 4, "connected_to": "[0x0]"}
                    ],
                    "output_ports": [
                        {"ref": "[0x2]", "name": "Sum", "type": "number", "connected_to": "[0x0]", "color": "green"}
                    ],
                    "removable": true
                }
            ]
        }"#;
        let snapshot = CircuitSnapshot::from_json(json).unwrap();
        let (id, adder) = snapshot.indexed().next().unwrap();
        assert_eq!(id, 1);
        assert_eq!(adder.position(), glam::Vec2::new(10.0, 20.0));
        assert_eq!(adder.port(PortDirection::Input, 1).unwrap().type_tag(), "number");
        assert!(adder.port(PortDirection::Input, 0).is_none());
        assert!(adder.port(PortDirection::Output, 2).is_none());
        assert!(adder.removable);
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(CircuitSnapshot::from_json("{\"components\": 5}").is_err());
    }

    #[test]
    fn test_component_lookup_is_one_based() {
        let snapshot = CircuitSnapshot {
            components: vec![ComponentData::new("A", 0.0, 0.0), ComponentData::new("B", 0.0, 0.0)],
        };
        assert!(snapshot.component(0).is_none());
        assert_eq!(snapshot.component(2).unwrap().name, "B");
        assert!(snapshot.component(3).is_none());
    }
}
