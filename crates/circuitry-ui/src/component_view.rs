//! One draggable component frame on the canvas
//!
//! The frame owns the component's drag controller and reports the anchor of
//! every port icon to the shared [`PortLocations`] whenever the component's
//! render key changes.

use crate::port_view::{port_row, PortRowContext, PortRowLayout};
use crate::theme::{self, colors};
use circuitry_core::{
    ActionSink, CircuitAction, ComponentData, ComponentId, DragController, DragPhase, Memo,
    OffsetChain, PointerSurface, PortDirection, PortLocations, PortSelection,
    ValueEditorRegistry, Viewport,
};
use egui::{Pos2, Rect, RichText, Sense, Stroke, Ui, UiBuilder};

const MAX_SIZE: egui::Vec2 = egui::vec2(420.0, 600.0);
const COLUMN_GAP: f32 = 16.0;

/// Inputs that decide whether port anchors have to be re-reported
#[derive(Debug, Clone, PartialEq)]
struct RenderKey {
    component: ComponentData,
    phase: DragPhase,
    frame_size: egui::Vec2,
}

/// Shared editor state lent to a component frame for one frame
pub struct FrameContext<'a> {
    /// Port anchor cache
    pub locations: &'a mut PortLocations,
    /// Pending link selection
    pub selection: &'a mut PortSelection,
    /// Pointer capture shared by all frames
    pub surface: &'a PointerSurface,
    /// Editors for unconnected inputs
    pub registry: &'a ValueEditorRegistry,
    /// Receives every action issued by the frame
    pub sink: &'a mut dyn ActionSink,
    /// Current pan of the canvas
    pub viewport: Viewport,
    /// Visible canvas area on screen
    pub clip: Rect,
}

impl FrameContext<'_> {
    /// Canvas coordinates of a screen position
    pub fn to_canvas(&self, screen: Pos2) -> circuitry_core::Vec2 {
        self.viewport.to_canvas(to_vec(self.clip.min), to_vec(screen))
    }

    /// Screen position of canvas coordinates
    pub fn to_screen(&self, canvas: circuitry_core::Vec2) -> Pos2 {
        to_pos(self.viewport.to_screen(to_vec(self.clip.min), canvas))
    }
}

/// egui screen position as a canvas vector
pub fn to_vec(p: Pos2) -> circuitry_core::Vec2 {
    circuitry_core::Vec2::new(p.x, p.y)
}

/// Canvas vector as an egui screen position
pub fn to_pos(v: circuitry_core::Vec2) -> Pos2 {
    Pos2::new(v.x, v.y)
}

/// What a frame reported back after being shown
#[derive(Debug, Clone, Copy)]
pub struct FrameOutput {
    /// Screen rect covered by the frame
    pub rect: Rect,
    /// A port anchor moved; the wires need another pass
    pub anchors_moved: bool,
}

/// Per-component view state that survives across frames
#[derive(Debug, Default)]
pub struct ComponentView {
    drag: DragController,
    memo: Memo<RenderKey>,
    /// Title bar rect relative to the frame's top-left, from the previous frame
    title_rect: Option<Rect>,
    /// Title widgets that must not start a drag, relative to the frame's top-left
    title_widgets: Vec<Rect>,
}

impl ComponentView {
    /// Create a view for a newly mounted component
    pub fn new() -> Self {
        Self::default()
    }

    /// Drag controller of this component
    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    /// Mutable drag controller, used to route pointer moves and releases
    pub fn drag_mut(&mut self) -> &mut DragController {
        &mut self.drag
    }

    /// Title widget rects relative to the frame's top-left
    #[cfg(test)]
    pub(crate) fn title_widget_rects(&self) -> &[Rect] {
        &self.title_widgets
    }

    /// Tear the view down, committing an in-progress drag
    pub fn unmount(&mut self, id: ComponentId, sink: &mut dyn ActionSink) {
        if self.drag.end(id, sink) {
            tracing::debug!("Component {} unmounted mid-drag", id);
        }
        self.memo.invalidate();
    }

    /// Show the frame of component `id`
    pub fn show(
        &mut self,
        ui: &mut Ui,
        ctx: &mut FrameContext<'_>,
        id: ComponentId,
        component: &ComponentData,
    ) -> FrameOutput {
        let position = self.drag.render_position(component.position());
        let frame_min = ctx.to_screen(position);

        self.handle_title_drag(ui, ctx, id, position, frame_min);

        let max_rect = Rect::from_min_size(frame_min, MAX_SIZE);
        let clip = ctx.clip;
        let shown = ui.scope_builder(
            UiBuilder::new().max_rect(max_rect).id_salt(("component", id)),
            |ui| {
                ui.set_clip_rect(clip);
                egui::Frame::default()
                    .fill(colors::BODY_FILL)
                    .stroke(Stroke::new(1.0, colors::BODY_STROKE))
                    .corner_radius(4)
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing = egui::vec2(4.0, 2.0);
                        let title = self.title_bar(ui, ctx.sink, id, component, frame_min);
                        let ports = Self::port_columns(ui, ctx, id, component);
                        (title, ports)
                    })
            },
        );
        let frame = shown.inner;
        let rect = frame.response.rect;
        let (title_rect, ports) = frame.inner;
        self.title_rect = Some(title_rect.translate(-frame_min.to_vec2()));

        let key = RenderKey {
            component: component.clone(),
            phase: self.drag.phase(),
            frame_size: rect.size().round(),
        };
        let mut anchors_moved = false;
        if self.memo.changed(&key) {
            for (direction, index, layout) in &ports {
                let Some(port) = component.port(*direction, *index) else {
                    continue;
                };
                let anchor = OffsetChain::new()
                    .then(position)
                    .then(layout.anchor_offset(frame_min));
                anchors_moved |= ctx.locations.record(port, &anchor);
            }
        }

        FrameOutput {
            rect,
            anchors_moved,
        }
    }

    fn handle_title_drag(
        &mut self,
        ui: &mut Ui,
        ctx: &mut FrameContext<'_>,
        id: ComponentId,
        position: circuitry_core::Vec2,
        frame_min: Pos2,
    ) {
        let Some(title) = self.title_rect else {
            return;
        };
        let response = ui.interact(
            title.translate(frame_min.to_vec2()),
            ui.id().with(("component_title", id)),
            Sense::drag(),
        );
        let pressed =
            response.is_pointer_button_down_on() && ui.input(|i| i.pointer.primary_down());
        if !pressed || self.drag.is_dragging() {
            return;
        }
        let Some(press) = ui.input(|i| i.pointer.press_origin()) else {
            return;
        };
        let local = press - frame_min.to_vec2();
        if self.title_widgets.iter().any(|r| r.contains(local)) {
            return;
        }
        tracing::debug!("Component {} drag started", id);
        self.drag.begin(position, ctx.surface.grab(id));
        // The press point is the baseline.
        self.drag.pointer_moved(ctx.to_canvas(press));
    }

    /// Title bar with name, option picker and close button; returns the bar's rect
    fn title_bar(
        &mut self,
        ui: &mut Ui,
        sink: &mut dyn ActionSink,
        id: ComponentId,
        component: &ComponentData,
        frame_min: Pos2,
    ) -> Rect {
        let fill = theme::color_or(component.title_color(), colors::BODY_STROKE);
        let bar = egui::Frame::NONE
            .fill(fill)
            .inner_margin(egui::Margin::symmetric(6, 3))
            .corner_radius(4)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let mut widgets = Vec::new();
                    ui.add(
                        egui::Label::new(
                            RichText::new(component.name.as_str())
                                .strong()
                                .color(colors::TITLE_TEXT),
                        )
                        .selectable(false),
                    );
                    if let Some(options) = &component.options {
                        let current = component.option.as_deref().unwrap_or_default();
                        let mut chosen = None;
                        let combo = egui::ComboBox::from_id_salt(("component_option", id))
                            .selected_text(format!("Option: {}", current))
                            .show_ui(ui, |ui| {
                                for option in options {
                                    if ui
                                        .selectable_label(option == current, option.as_str())
                                        .clicked()
                                    {
                                        chosen = Some(option.clone());
                                    }
                                }
                            });
                        widgets.push(combo.response.rect);
                        if let Some(option) = chosen {
                            sink.act(CircuitAction::SetComponentOption {
                                component_id: id,
                                option,
                            });
                        }
                    }
                    if component.removable {
                        let close = ui.small_button("✖").on_hover_text("Remove component");
                        widgets.push(close.rect);
                        if close.clicked() {
                            sink.act(CircuitAction::DetachComponent { component_id: id });
                        }
                    }
                    widgets
                })
                .inner
            });
        self.title_widgets = bar
            .inner
            .into_iter()
            .map(|r| r.translate(-frame_min.to_vec2()))
            .collect();
        bar.response.rect
    }

    /// Input column on the left, output column on the right
    fn port_columns(
        ui: &mut Ui,
        ctx: &mut FrameContext<'_>,
        id: ComponentId,
        component: &ComponentData,
    ) -> Vec<(PortDirection, usize, PortRowLayout)> {
        let mut rows = PortRowContext {
            selection: ctx.selection,
            registry: ctx.registry,
            sink: ctx.sink,
        };
        let mut layouts = Vec::new();
        ui.horizontal_top(|ui| {
            ui.vertical(|ui| {
                for (i, port) in component.input_ports.iter().enumerate() {
                    let layout = port_row(ui, &mut rows, id, i + 1, PortDirection::Input, port);
                    layouts.push((PortDirection::Input, i + 1, layout));
                }
            });
            ui.add_space(COLUMN_GAP);
            ui.vertical(|ui| {
                for (i, port) in component.output_ports.iter().enumerate() {
                    let layout = port_row(ui, &mut rows, id, i + 1, PortDirection::Output, port);
                    layouts.push((PortDirection::Output, i + 1, layout));
                }
            });
        });
        layouts
    }
}
