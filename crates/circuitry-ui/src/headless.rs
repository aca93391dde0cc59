//! Windowless editor runs
//!
//! Drives a [`CircuitEditor`] inside a bare egui context sized from the
//! [`EditorConfig`]. Hosts use it to measure port anchors without a window
//! and export the laid out circuit as SVG.

use crate::canvas::CircuitEditor;
use crate::config::EditorConfig;
use crate::theme::colors;
use crate::wire_painter;
use circuitry_core::{wires, ActionSink, CircuitSnapshot};
use egui::{Color32, Event, Pos2, Rect, ViewportId};
use std::fmt::Write;
use std::time::Duration;

/// Upper bound of frames spent waiting for port anchors to settle
pub const MAX_LAYOUT_FRAMES: usize = 8;

const FRAME_TIME: f64 = 1.0 / 60.0;

/// Editor plus the egui context it renders into
pub struct HeadlessEditor {
    ctx: egui::Context,
    editor: CircuitEditor,
    time: f64,
}

impl HeadlessEditor {
    /// Create a run with the screen sized to `canvas_width` x `canvas_height`
    pub fn new(config: EditorConfig) -> Self {
        Self {
            ctx: egui::Context::default(),
            editor: CircuitEditor::new(config),
            time: 0.0,
        }
    }

    /// The driven editor
    pub fn editor(&self) -> &CircuitEditor {
        &self.editor
    }

    /// Mutable access to the driven editor
    pub fn editor_mut(&mut self) -> &mut CircuitEditor {
        &mut self.editor
    }

    /// Run one frame with `events` as input; returns whether egui wants another frame right away
    pub fn run_frame(
        &mut self,
        snapshot: &CircuitSnapshot,
        events: Vec<Event>,
        sink: &mut dyn ActionSink,
    ) -> bool {
        self.time += FRAME_TIME;
        let config = self.editor.config();
        let screen = Rect::from_min_size(
            Pos2::ZERO,
            egui::vec2(config.canvas_width, config.canvas_height),
        );
        let input = egui::RawInput {
            screen_rect: Some(screen),
            time: Some(self.time),
            events,
            ..Default::default()
        };

        let editor = &mut self.editor;
        let output = self.ctx.run(input, |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                editor.ui(ui, snapshot, &mut *sink);
            });
        });
        output
            .viewport_output
            .get(&ViewportId::ROOT)
            .is_some_and(|viewport| viewport.repaint_delay == Duration::ZERO)
    }

    /// Run passive frames until the port anchors stop moving; returns the frame count
    pub fn settle(&mut self, snapshot: &CircuitSnapshot, sink: &mut dyn ActionSink) -> usize {
        for frame in 1..=MAX_LAYOUT_FRAMES {
            if !self.run_frame(snapshot, Vec::new(), sink) && frame > 1 {
                return frame;
            }
        }
        tracing::warn!("Port anchors still moving after {} frames", MAX_LAYOUT_FRAMES);
        MAX_LAYOUT_FRAMES
    }

    /// Render grid, component frames and wires in canvas coordinates
    pub fn to_svg(&self, snapshot: &CircuitSnapshot) -> String {
        let config = self.editor.config();
        let width = config.canvas_width;
        let height = config.canvas_height;
        let mut svg = String::new();

        let _ = write!(
            svg,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">"
        );
        let _ = write!(
            svg,
            "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
            svg_color(colors::CANVAS_BG)
        );

        if config.show_grid {
            let spacing = config.grid_spacing.max(4.0);
            let mut d = String::new();
            let mut x = 0.0;
            while x < width {
                let _ = write!(d, "M {x} 0 V {height} ");
                x += spacing;
            }
            let mut y = 0.0;
            while y < height {
                let _ = write!(d, "M 0 {y} H {width} ");
                y += spacing;
            }
            let _ = write!(
                svg,
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"1\"/>",
                d.trim_end(),
                svg_color(colors::GRID)
            );
        }

        for (rect, component) in self.editor.component_rects().zip(&snapshot.components) {
            let _ = write!(
                svg,
                "<rect x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"4\" ry=\"4\" fill=\"{}\" stroke=\"{}\" stroke-width=\"1\"><title>{}</title></rect>",
                rect.min.x,
                rect.min.y,
                rect.width(),
                rect.height(),
                svg_color(colors::BODY_FILL),
                svg_color(colors::BODY_STROKE),
                escape_text(&component.name)
            );
        }

        for wire in wires(
            self.editor.locations(),
            &snapshot.components,
            &config.wire_style,
        ) {
            let stroke = wire_painter::wire_stroke(&wire);
            let _ = write!(
                svg,
                "<path d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\"/>",
                wire.path.to_svg_path(),
                svg_color(stroke.color),
                stroke.width
            );
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn svg_color(color: Color32) -> String {
    if color.a() == 0 {
        return "none".to_string();
    }
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
