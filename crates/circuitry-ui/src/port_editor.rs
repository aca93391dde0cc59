//! Inline literal editors for unconnected input ports

use circuitry_core::value_editor::{self, current_number, current_text};
use circuitry_core::{ActionSink, ComponentId, EditedValue, EditorKind, PortData, PortIndex};
use egui::{DragValue, Response, TextEdit, Ui};

const TEXT_WIDTH: f32 = 90.0;

/// Show the editor for `port` and commit every change right away
pub fn port_value_editor(
    ui: &mut Ui,
    component_id: ComponentId,
    port_id: PortIndex,
    port: &PortData,
    kind: EditorKind,
    sink: &mut dyn ActionSink,
) -> Response {
    let (response, edited) = match kind {
        EditorKind::Text => {
            let mut text = current_text(port);
            let response = ui.add(
                TextEdit::singleline(&mut text)
                    .hint_text(port.name.as_str())
                    .desired_width(TEXT_WIDTH),
            );
            (response, EditedValue::Text(text))
        }
        EditorKind::Number { min, max } => {
            let mut value = current_number(port);
            let response = ui.add(
                DragValue::new(&mut value)
                    .range(min..=max)
                    .suffix(format!(" {}", port.name)),
            );
            (response, EditedValue::Number(value))
        }
    };

    if response.changed() {
        tracing::debug!("Port {}:{} edited", component_id, port_id);
        sink.act(value_editor::commit(component_id, port_id, kind, edited));
    }
    response
}
