//! Literal value editors for unconnected input ports
//!
//! Maps a port's declared type to the kind of editor shown next to it. Ports
//! without an editor, connected inputs and outputs show their name instead.

use crate::action::CircuitAction;
use crate::model::{ComponentId, PortData, PortDirection, PortIndex};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Lower bound of the number editor
pub const NUMBER_MIN: f64 = -1000.0;
/// Upper bound of the number editor
pub const NUMBER_MAX: f64 = 1000.0;

static DEFAULT_REGISTRY: Lazy<ValueEditorRegistry> = Lazy::new(ValueEditorRegistry::builtin);

/// Kind of editor for a data type
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EditorKind {
    /// Free text input
    Text,
    /// Bounded numeric stepper
    Number {
        /// Smallest accepted value
        min: f64,
        /// Largest accepted value
        max: f64,
    },
}

impl EditorKind {
    /// Convert an edited value into the literal sent to the remote state
    pub fn literal(&self, edited: EditedValue) -> serde_json::Value {
        match (self, edited) {
            (EditorKind::Number { min, max }, EditedValue::Number(n)) => {
                serde_json::json!(bounded(n, *min, *max))
            }
            (EditorKind::Number { min, max }, EditedValue::Text(text)) => {
                let n = text.trim().parse::<f64>().unwrap_or(0.0);
                serde_json::json!(bounded(n, *min, *max))
            }
            (EditorKind::Text, EditedValue::Text(text)) => serde_json::Value::String(text),
            (EditorKind::Text, EditedValue::Number(n)) => serde_json::Value::String(n.to_string()),
        }
    }
}

/// Non-finite input counts as `0`
fn bounded(n: f64, min: f64, max: f64) -> f64 {
    let n = if n.is_finite() { n } else { 0.0 };
    n.clamp(min, max)
}

/// A value produced by an editor widget
#[derive(Debug, Clone, PartialEq)]
pub enum EditedValue {
    /// Text field content
    Text(String),
    /// Stepper value
    Number(f64),
}

/// Data type tag to editor kind
#[derive(Debug, Clone, Default)]
pub struct ValueEditorRegistry {
    editors: HashMap<String, EditorKind>,
}

impl ValueEditorRegistry {
    /// Registry without any editors
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in editors for `string`, `any` and `number`
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("string", EditorKind::Text);
        registry.register("any", EditorKind::Text);
        registry.register(
            "number",
            EditorKind::Number {
                min: NUMBER_MIN,
                max: NUMBER_MAX,
            },
        );
        registry
    }

    /// Shared built-in registry
    pub fn shared() -> &'static ValueEditorRegistry {
        &DEFAULT_REGISTRY
    }

    /// Register or replace the editor of a data type
    pub fn register(&mut self, data_type: impl Into<String>, kind: EditorKind) {
        self.editors.insert(data_type.into(), kind);
    }

    /// Editor for a data type tag
    pub fn get(&self, data_type: &str) -> Option<EditorKind> {
        self.editors.get(data_type).copied()
    }
}

/// What to show next to a port icon
#[derive(Debug, Clone, PartialEq)]
pub enum PortLabel {
    /// Editable literal value
    Editor {
        /// Editor to show
        kind: EditorKind,
        /// Type caption shown below the editor
        caption: String,
    },
    /// Read-only port name
    Name {
        /// Port name
        name: String,
        /// Type caption shown below the name
        caption: String,
    },
}

impl PortLabel {
    /// Decide between an editor and the plain name
    pub fn resolve(
        port: &PortData,
        direction: PortDirection,
        registry: &ValueEditorRegistry,
    ) -> Self {
        let caption = port.type_tag().to_string();
        let editor = match direction {
            PortDirection::Input if !port.is_connected() => registry.get(port.type_tag()),
            _ => None,
        };
        match editor {
            Some(kind) => PortLabel::Editor { kind, caption },
            None => PortLabel::Name {
                name: port.name.clone(),
                caption,
            },
        }
    }

    /// Type caption
    pub fn caption(&self) -> &str {
        match self {
            PortLabel::Editor { caption, .. } | PortLabel::Name { caption, .. } => caption,
        }
    }
}

/// Current numeric value of a port, `0` when absent or not a number
pub fn current_number(port: &PortData) -> f64 {
    port.current_data.as_f64().unwrap_or(0.0)
}

/// Current text value of a port, empty when absent
pub fn current_text(port: &PortData) -> String {
    match &port.current_data {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Request committing an edited literal
pub fn commit(
    component_id: ComponentId,
    port_id: PortIndex,
    kind: EditorKind,
    edited: EditedValue,
) -> CircuitAction {
    CircuitAction::SetComponentInput {
        component_id,
        port_id,
        input: kind.literal(edited),
    }
}
