//! Wire painting
//!
//! A wire is a short straight lead out of the output, a cubic curve, and a
//! short straight lead into the input.

use crate::theme::{self, colors};
use circuitry_core::Wire;
use egui::epaint::CubicBezierShape;
use egui::{Color32, Painter, Pos2, Stroke};

/// Resolve the stroke of a wire
pub fn wire_stroke(wire: &Wire) -> Stroke {
    let color = theme::color_or(&wire.stroke.color, colors::WIRE_FALLBACK);
    Stroke::new(wire.stroke.width, color)
}

/// Paint one wire, `to_screen` maps canvas coordinates to screen positions
pub fn paint_wire<F>(painter: &Painter, wire: &Wire, to_screen: &F)
where
    F: Fn(circuitry_core::Vec2) -> Pos2,
{
    let stroke = wire_stroke(wire);
    let path = &wire.path;
    let [start, ctrl1, ctrl2, end] = path.bezier_points().map(to_screen);

    painter.line_segment([to_screen(path.from), start], stroke);
    painter.add(CubicBezierShape::from_points_stroke(
        [start, ctrl1, ctrl2, end],
        false,
        Color32::TRANSPARENT,
        stroke,
    ));
    painter.line_segment([end, to_screen(path.to)], stroke);
}

/// Paint all wires and return how many were drawn
pub fn paint_wires<F>(
    painter: &Painter,
    wires: impl IntoIterator<Item = Wire>,
    to_screen: &F,
) -> usize
where
    F: Fn(circuitry_core::Vec2) -> Pos2,
{
    let mut count = 0;
    for wire in wires {
        paint_wire(painter, &wire, to_screen);
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use circuitry_core::{Vec2, WirePath, WireStroke};

    fn wire(color: &str) -> Wire {
        Wire {
            component_id: 1,
            port_index: 1,
            path: WirePath::new(Vec2::ZERO, Vec2::new(100.0, 50.0), 16.0),
            stroke: WireStroke {
                color: color.to_string(),
                width: 2.0,
            },
        }
    }

    #[test]
    fn test_stroke_from_named_color() {
        let stroke = wire_stroke(&wire("blue"));
        assert_eq!(stroke.width, 2.0);
        assert_eq!(stroke.color, theme::parse_color("blue").unwrap());
    }

    #[test]
    fn test_unknown_color_falls_back() {
        assert_eq!(wire_stroke(&wire("mauve-ish")).color, colors::WIRE_FALLBACK);
    }
}
