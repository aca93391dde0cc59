//! A single port row: the clickable icon plus its label or value editor

use crate::port_editor::port_value_editor;
use crate::theme;
use circuitry_core::{
    ActionSink, ComponentId, PortData, PortDirection, PortHandle, PortIndex, PortLabel,
    PortSelection, ValueEditorRegistry,
};
use egui::{Color32, Pos2, Rect, RichText, Sense, Stroke, Ui, Vec2};

/// Diameter of a port icon; half of it is the default anchor bias
pub const ICON_SIZE: f32 = 14.0;

/// Where a port's icon ended up on screen
#[derive(Debug, Clone, Copy)]
pub struct PortRowLayout {
    /// Screen rect of the icon
    pub icon_rect: Rect,
}

impl PortRowLayout {
    /// Anchor point relative to `frame_min`: icon center horizontally, icon top vertically
    pub fn anchor_offset(&self, frame_min: Pos2) -> circuitry_core::Vec2 {
        circuitry_core::Vec2::new(
            self.icon_rect.center().x - frame_min.x,
            self.icon_rect.top() - frame_min.y,
        )
    }
}

/// Everything a port row needs besides the port itself
pub struct PortRowContext<'a> {
    /// Pending link selection
    pub selection: &'a mut PortSelection,
    /// Editors for unconnected inputs
    pub registry: &'a ValueEditorRegistry,
    /// Receives link and value actions
    pub sink: &'a mut dyn ActionSink,
}

/// Paint the port icon: a filled dot, or a ringed dot while selected
pub fn paint_port_icon(ui: &Ui, rect: Rect, color: Color32, selected: bool, hovered: bool) {
    let painter = ui.painter();
    let center = rect.center();
    let radius = rect.width() * 0.5;
    if selected {
        painter.circle_stroke(center, radius - 1.0, Stroke::new(2.0, color));
        painter.circle_filled(center, radius * 0.45, color);
    } else {
        painter.circle_filled(center, radius, color);
    }
    if hovered {
        painter.circle_stroke(center, radius + 1.5, Stroke::new(1.0, Color32::WHITE));
    }
}

/// Lay out one port row and route its clicks.
///
/// Inputs read icon then label, outputs read label then icon.
pub fn port_row(
    ui: &mut Ui,
    ctx: &mut PortRowContext<'_>,
    component_id: ComponentId,
    index: PortIndex,
    direction: PortDirection,
    port: &PortData,
) -> PortRowLayout {
    let label = PortLabel::resolve(port, direction, ctx.registry);
    let icon_rect = match direction {
        PortDirection::Input => {
            ui.horizontal(|ui| {
                let rect = port_icon(ui, ctx, component_id, index, direction, port);
                port_label(ui, ctx, component_id, index, port, &label);
                rect
            })
            .inner
        }
        PortDirection::Output => {
            ui.horizontal(|ui| {
                port_label(ui, ctx, component_id, index, port, &label);
                port_icon(ui, ctx, component_id, index, direction, port)
            })
            .inner
        }
    };
    PortRowLayout { icon_rect }
}

fn port_icon(
    ui: &mut Ui,
    ctx: &mut PortRowContext<'_>,
    component_id: ComponentId,
    index: PortIndex,
    direction: PortDirection,
    port: &PortData,
) -> Rect {
    let (rect, response) = ui.allocate_exact_size(Vec2::splat(ICON_SIZE), Sense::click());
    let color = theme::color_or(port.icon_color(), theme::colors::BODY_STROKE);
    let selected = ctx.selection.is_selected(&port.port_ref);
    paint_port_icon(ui, rect, color, selected, response.hovered());

    let handle = PortHandle {
        component_id,
        index,
        direction,
        port_ref: port.port_ref.clone(),
    };
    if response.clicked() {
        if let Some(action) = ctx.selection.click(&handle) {
            ctx.sink.act(action);
        }
    }
    if response.secondary_clicked() {
        ctx.sink.act(ctx.selection.right_click(&handle));
    }
    response.on_hover_text(port.name.as_str());
    rect
}

fn port_label(
    ui: &mut Ui,
    ctx: &mut PortRowContext<'_>,
    component_id: ComponentId,
    index: PortIndex,
    port: &PortData,
    label: &PortLabel,
) {
    ui.vertical(|ui| {
        ui.spacing_mut().item_spacing.y = 0.0;
        match label {
            PortLabel::Editor { kind, .. } => {
                port_value_editor(ui, component_id, index, port, *kind, ctx.sink);
            }
            PortLabel::Name { name, .. } => {
                ui.add(egui::Label::new(name.as_str()).selectable(false));
            }
        }
        ui.add(
            egui::Label::new(
                RichText::new(label.caption())
                    .size(9.0)
                    .color(ui.visuals().weak_text_color()),
            )
            .selectable(false),
        );
    });
}
