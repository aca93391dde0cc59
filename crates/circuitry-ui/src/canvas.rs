//! The circuit canvas
//!
//! [`CircuitEditor`] owns all view state of the editor: per-component drag
//! controllers, the port anchor cache, the pending link selection, the
//! pointer capture and the pan. The circuit itself is never mutated here;
//! every user intent leaves through the [`ActionSink`].

use crate::component_view::{to_pos, to_vec, ComponentView, FrameContext};
use crate::config::EditorConfig;
use crate::theme::colors;
use crate::wire_painter;
use circuitry_core::{
    wires, ActionSink, CircuitSnapshot, ComponentId, PointerSurface, PortLocations,
    PortSelection, ValueEditorRegistry, Viewport,
};
use egui::{Painter, Pos2, Rect, Response, Sense, Stroke, Ui};

/// Interactive editor for one circuit
pub struct CircuitEditor {
    config: EditorConfig,
    registry: ValueEditorRegistry,
    locations: PortLocations,
    selection: PortSelection,
    surface: PointerSurface,
    viewport: Viewport,
    views: Vec<ComponentView>,
    /// Screen rects of the component frames from the last frame
    frame_rects: Vec<Rect>,
    /// Screen position of the canvas origin in the last frame
    origin: Pos2,
    panning: bool,
}

impl Default for CircuitEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl CircuitEditor {
    /// Create an editor with the built-in value editors
    pub fn new(config: EditorConfig) -> Self {
        Self {
            locations: PortLocations::new(config.geometry),
            config,
            registry: ValueEditorRegistry::shared().clone(),
            selection: PortSelection::new(),
            surface: PointerSurface::new(),
            viewport: Viewport::new(),
            views: Vec::new(),
            frame_rects: Vec::new(),
            origin: Pos2::ZERO,
            panning: false,
        }
    }

    /// Replace the value editor registry
    pub fn with_registry(mut self, registry: ValueEditorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Current settings
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Mutable settings
    pub fn config_mut(&mut self) -> &mut EditorConfig {
        &mut self.config
    }

    /// Port anchor cache
    pub fn locations(&self) -> &PortLocations {
        &self.locations
    }

    /// Pending link selection
    pub fn selection(&self) -> &PortSelection {
        &self.selection
    }

    /// Current pan
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Component holding the pointer capture, if a drag is in progress
    pub fn dragging(&self) -> Option<ComponentId> {
        self.surface.holder()
    }

    /// Component frames of the last frame, in canvas coordinates
    pub fn component_rects(&self) -> impl Iterator<Item = Rect> + '_ {
        let origin = self.origin.to_vec2();
        self.frame_rects.iter().map(move |r| r.translate(-origin))
    }

    /// Return to the initial view
    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    /// Forget all view state, e.g. when the editor is attached to another circuit
    pub fn reset(&mut self, sink: &mut dyn ActionSink) {
        self.sync(0, sink);
        self.locations.clear();
        self.selection.clear();
        self.viewport.reset();
        self.frame_rects.clear();
    }

    /// Mount or unmount component views to match `count` components.
    ///
    /// Unmounted components commit an in-progress drag first.
    pub fn sync(&mut self, count: usize, sink: &mut dyn ActionSink) {
        while self.views.len() > count {
            let id = self.views.len();
            if let Some(mut view) = self.views.pop() {
                view.unmount(id, sink);
            }
        }
        if self.views.len() < count {
            tracing::debug!("Mounting {} component views", count - self.views.len());
            self.views.resize_with(count, ComponentView::new);
        }
    }

    /// Render the circuit and route interaction into `sink`
    pub fn ui(
        &mut self,
        ui: &mut Ui,
        snapshot: &CircuitSnapshot,
        sink: &mut dyn ActionSink,
    ) -> Response {
        self.sync(snapshot.components.len(), sink);

        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let canvas_rect = response.rect;
        painter.rect_filled(canvas_rect, 0.0, colors::CANVAS_BG);

        self.handle_pan(ui, &response);
        if self.config.show_grid {
            self.draw_grid(&painter, canvas_rect);
        }
        if self.route_pointer(ui, canvas_rect) {
            ui.ctx().request_repaint();
        }

        let mut anchors_moved = false;
        {
            let mut ctx = FrameContext {
                locations: &mut self.locations,
                selection: &mut self.selection,
                surface: &self.surface,
                registry: &self.registry,
                sink: &mut *sink,
                viewport: self.viewport,
                clip: canvas_rect,
            };
            self.frame_rects.clear();
            for ((id, component), view) in snapshot.indexed().zip(self.views.iter_mut()) {
                let output = view.show(ui, &mut ctx, id, component);
                self.frame_rects.push(output.rect);
                anchors_moved |= output.anchors_moved;
            }
        }

        if ui.input(|i| i.pointer.any_released()) {
            self.release_pointer(sink);
        }

        let viewport = self.viewport;
        let to_screen =
            |p: circuitry_core::Vec2| to_pos(viewport.to_screen(to_vec(canvas_rect.min), p));
        self.origin = to_screen(circuitry_core::Vec2::ZERO);
        let drawn = wire_painter::paint_wires(
            &painter,
            wires(&self.locations, &snapshot.components, &self.config.wire_style),
            &to_screen,
        );
        if anchors_moved {
            tracing::trace!("Port anchors moved, {} wires drawn", drawn);
            ui.ctx().request_repaint();
        }

        response
    }

    /// Pan on drags that start on empty canvas
    fn handle_pan(&mut self, ui: &Ui, response: &Response) {
        if response.drag_started() {
            let press = ui.input(|i| i.pointer.press_origin());
            self.panning = !self.surface.is_captured()
                && press.is_some_and(|p| !self.frame_rects.iter().any(|r| r.contains(p)));
        }
        if self.panning && response.dragged() {
            let delta = response.drag_delta();
            self.viewport.pan_by(circuitry_core::Vec2::new(delta.x, delta.y));
        }
        if response.drag_stopped() {
            self.panning = false;
        }
    }

    /// Forward the pointer to the component holding the capture
    fn route_pointer(&mut self, ui: &Ui, canvas_rect: Rect) -> bool {
        let Some(holder) = self.surface.holder() else {
            return false;
        };
        let Some(pointer) = ui.input(|i| i.pointer.latest_pos()) else {
            return false;
        };
        let canvas = self.viewport.to_canvas(to_vec(canvas_rect.min), to_vec(pointer));
        match holder.checked_sub(1).and_then(|i| self.views.get_mut(i)) {
            Some(view) => view.drag_mut().pointer_moved(canvas),
            None => false,
        }
    }

    /// Commit the drag of the capture holder
    fn release_pointer(&mut self, sink: &mut dyn ActionSink) {
        let Some(holder) = self.surface.holder() else {
            return;
        };
        if let Some(view) = holder.checked_sub(1).and_then(|i| self.views.get_mut(i)) {
            view.drag_mut().end(holder, sink);
        }
    }

    fn draw_grid(&self, painter: &Painter, rect: Rect) {
        let spacing = self.config.grid_spacing.max(4.0);
        let stroke = Stroke::new(1.0, colors::GRID);
        let offset = self.viewport.pan;

        let mut x = rect.left() + offset.x.rem_euclid(spacing);
        while x < rect.right() {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
            x += spacing;
        }
        let mut y = rect.top() + offset.y.rem_euclid(spacing);
        while y < rect.bottom() {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
            y += spacing;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::HeadlessEditor;
    use circuitry_core::{CircuitAction, ComponentData, PortData};
    use egui::{Event, Modifiers, PointerButton};

    fn snapshot() -> CircuitSnapshot {
        let mut display = ComponentData::new("Display", 250.0, 40.0)
            .with_input(PortData::new("[0x2]", "In").connected_to("[0x1]"))
            .with_input(PortData::new("[0x3]", "Label").with_type("string"))
            .with_input(PortData::new("[0x4]", "Level").with_type("number"));
        display.removable = true;
        CircuitSnapshot {
            components: vec![
                ComponentData::new("Constant", 10.0, 20.0)
                    .with_output(PortData::new("[0x1]", "Value").with_type("number")),
                display,
            ],
        }
    }

    fn run_frame(
        editor: &mut CircuitEditor,
        ctx: &egui::Context,
        snapshot: &CircuitSnapshot,
    ) -> Vec<CircuitAction> {
        let mut sent: Vec<CircuitAction> = Vec::new();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                editor.ui(ui, snapshot, &mut sent);
            });
        });
        sent
    }

    /// Drives the editor with synthetic pointer input, one frame per call
    struct Session {
        headless: HeadlessEditor,
        snapshot: CircuitSnapshot,
        sent: Vec<CircuitAction>,
    }

    impl Session {
        fn new() -> Self {
            let mut session = Self {
                headless: HeadlessEditor::new(EditorConfig::default()),
                snapshot: snapshot(),
                sent: Vec::new(),
            };
            // Title drag regions exist from the second frame on.
            session.frame(Vec::new());
            session.frame(Vec::new());
            session
        }

        fn editor(&self) -> &CircuitEditor {
            self.headless.editor()
        }

        fn frame(&mut self, events: Vec<Event>) {
            self.headless.run_frame(&self.snapshot, events, &mut self.sent);
        }

        fn press(&mut self, pos: Pos2, button: PointerButton) {
            self.frame(vec![
                Event::PointerMoved(pos),
                Event::PointerButton {
                    pos,
                    button,
                    pressed: true,
                    modifiers: Modifiers::NONE,
                },
            ]);
        }

        fn release(&mut self, pos: Pos2, button: PointerButton) {
            self.frame(vec![Event::PointerButton {
                pos,
                button,
                pressed: false,
                modifiers: Modifiers::NONE,
            }]);
        }

        fn click(&mut self, pos: Pos2, button: PointerButton) {
            self.press(pos, button);
            self.release(pos, button);
        }

        /// Press at `from`, move by `step` for `steps` frames, release; returns the end point
        fn drag(&mut self, from: Pos2, step: egui::Vec2, steps: usize) -> Pos2 {
            self.press(from, PointerButton::Primary);
            let mut pos = from;
            for _ in 0..steps {
                pos += step;
                self.frame(vec![Event::PointerMoved(pos)]);
            }
            self.release(pos, PointerButton::Primary);
            pos
        }

        fn screen(&self, canvas: circuitry_core::Vec2) -> Pos2 {
            self.editor().origin + egui::vec2(canvas.x, canvas.y)
        }

        /// Screen center of a port icon
        fn port_icon(&self, port: &str) -> Pos2 {
            let anchor = self
                .editor()
                .locations()
                .get(&port.into())
                .expect("port measured");
            self.screen(anchor)
        }

        /// A point on the title bar of component `id`, clear of its widgets
        fn title(&self, id: ComponentId) -> Pos2 {
            self.editor().frame_rects[id - 1].min + egui::vec2(8.0, 8.0)
        }

        fn close_button(&self, id: ComponentId) -> Pos2 {
            let close = self.editor().views[id - 1].title_widget_rects()[0];
            self.editor().frame_rects[id - 1].min + close.center().to_vec2()
        }
    }

    #[test]
    fn test_first_frame_measures_every_port() {
        let ctx = egui::Context::default();
        let mut editor = CircuitEditor::default();
        let snapshot = snapshot();

        let sent = run_frame(&mut editor, &ctx, &snapshot);

        assert!(sent.is_empty());
        assert_eq!(editor.locations().len(), 4);
        let style = editor.config().wire_style.clone();
        assert_eq!(wires(editor.locations(), &snapshot.components, &style).count(), 1);
    }

    #[test]
    fn test_anchors_are_canvas_relative() {
        let ctx = egui::Context::default();
        let mut editor = CircuitEditor::default();
        let snapshot = snapshot();
        run_frame(&mut editor, &ctx, &snapshot);

        let output = editor.locations().get(&"[0x1]".into()).unwrap();
        let input = editor.locations().get(&"[0x2]".into()).unwrap();
        // Anchors sit inside their component frames.
        assert!(output.x > 10.0 && output.y > 20.0);
        assert!(input.x >= 250.0 && input.y > 40.0);
    }

    #[test]
    fn test_title_drag_commits_once() {
        let mut session = Session::new();
        let start = session.title(1);

        let end = session.drag(start, egui::vec2(5.0, 3.0), 10);

        assert_eq!(end - start, egui::vec2(50.0, 30.0));
        assert_eq!(
            session.sent,
            vec![CircuitAction::SetComponentCoordinates {
                component_id: 1,
                rel_x: 60.0,
                rel_y: 50.0,
            }]
        );
        assert_eq!(session.editor().dragging(), None);
        assert_eq!(session.editor().viewport().pan, circuitry_core::Vec2::ZERO);
    }

    #[test]
    fn test_title_press_without_motion_commits_origin() {
        let mut session = Session::new();
        let title = session.title(1);

        session.press(title, PointerButton::Primary);
        assert_eq!(session.editor().dragging(), Some(1));
        session.release(title, PointerButton::Primary);

        assert_eq!(
            session.sent,
            vec![CircuitAction::SetComponentCoordinates {
                component_id: 1,
                rel_x: 10.0,
                rel_y: 20.0,
            }]
        );
        assert_eq!(session.editor().dragging(), None);
    }

    #[test]
    fn test_output_then_input_click_links() {
        let mut session = Session::new();
        let output = session.port_icon("[0x1]");
        let input = session.port_icon("[0x2]");

        session.click(output, PointerButton::Primary);
        assert!(session.sent.is_empty());
        assert!(session.editor().selection().selected().is_some());
        session.click(input, PointerButton::Primary);

        assert_eq!(
            session.sent,
            vec![CircuitAction::AddConnection {
                input_component_id: 2,
                input_port_id: 1,
                output_component_id: 1,
                output_port_id: 1,
            }]
        );
        assert!(session.editor().selection().selected().is_none());
    }

    #[test]
    fn test_secondary_click_unlinks() {
        let mut session = Session::new();
        let input = session.port_icon("[0x2]");

        session.click(input, PointerButton::Secondary);

        assert_eq!(
            session.sent,
            vec![CircuitAction::RemoveConnection {
                component_id: 2,
                is_input: true,
                port_id: 1,
            }]
        );
    }

    #[test]
    fn test_number_editor_drag_edits_value_only() {
        let mut session = Session::new();
        // The editor sits right of the icon, level with its center.
        let editor = session.port_icon("[0x4]") + egui::vec2(26.0, 0.0);

        session.drag(editor, egui::vec2(5.0, 0.0), 10);

        assert!(!session.sent.is_empty());
        assert!(session.sent.iter().all(|action| matches!(
            action,
            CircuitAction::SetComponentInput {
                component_id: 2,
                port_id: 3,
                ..
            }
        )));
        assert_eq!(session.editor().viewport().pan, circuitry_core::Vec2::ZERO);
        assert_eq!(session.editor().dragging(), None);
    }

    #[test]
    fn test_close_button_detaches() {
        let mut session = Session::new();
        let close = session.close_button(2);

        session.click(close, PointerButton::Primary);

        assert_eq!(
            session.sent,
            vec![CircuitAction::DetachComponent { component_id: 2 }]
        );
        assert_eq!(session.editor().dragging(), None);
    }

    #[test]
    fn test_background_drag_pans() {
        let mut session = Session::new();
        // Below both components.
        let empty = session.screen(circuitry_core::Vec2::new(100.0, 400.0));

        session.drag(empty, egui::vec2(4.0, 2.0), 10);

        assert!(session.sent.is_empty());
        assert_ne!(session.editor().viewport().pan, circuitry_core::Vec2::ZERO);
    }

    #[test]
    fn test_sync_unmounts_dragging_component() {
        let mut editor = CircuitEditor::default();
        let mut sent: Vec<CircuitAction> = Vec::new();
        editor.sync(2, &mut sent);

        let grab = editor.surface.grab(2);
        editor.views[1]
            .drag_mut()
            .begin(circuitry_core::Vec2::new(4.0, 2.0), grab);
        assert_eq!(editor.dragging(), Some(2));

        editor.sync(1, &mut sent);
        assert_eq!(
            sent,
            vec![CircuitAction::SetComponentCoordinates {
                component_id: 2,
                rel_x: 4.0,
                rel_y: 2.0,
            }]
        );
        assert_eq!(editor.dragging(), None);
    }

    #[test]
    fn test_reset_clears_view_state() {
        let ctx = egui::Context::default();
        let mut editor = CircuitEditor::default();
        run_frame(&mut editor, &ctx, &snapshot());
        assert!(!editor.locations().is_empty());

        let mut sent: Vec<CircuitAction> = Vec::new();
        editor.reset(&mut sent);
        assert!(editor.locations().is_empty());
        assert!(editor.selection().selected().is_none());
        assert!(sent.is_empty());
    }
}
