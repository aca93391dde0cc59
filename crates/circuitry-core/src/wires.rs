//! Wire path construction
//!
//! Turns the port geometry cache and the snapshot into a draw list of
//! S-shaped cubic Bezier wires, one per connected input port.

use crate::geometry::PortLocations;
use crate::model::{ComponentData, ComponentId, PortIndex};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Wire color used when the input port declares none
pub const DEFAULT_WIRE_COLOR: &str = "#ff00a8";

/// Wire appearance settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireStyle {
    /// Length of the straight lead-out and lead-in segments
    pub curve_offset: f32,
    /// Stroke width in pixels
    pub width: f32,
    /// Stroke color when the port declares none
    pub default_color: String,
}

impl Default for WireStyle {
    fn default() -> Self {
        Self {
            curve_offset: 16.0,
            width: 2.0,
            default_color: DEFAULT_WIRE_COLOR.to_string(),
        }
    }
}

/// Stroke of one wire; wires are never filled
#[derive(Debug, Clone, PartialEq)]
pub struct WireStroke {
    /// Color string as declared by the port (named or `#rrggbb`)
    pub color: String,
    /// Width in pixels
    pub width: f32,
}

/// Geometry of one wire: line, cubic Bezier, line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WirePath {
    /// Source port position
    pub from: Vec2,
    /// End of the lead-out segment, start of the curve
    pub curve_start: Vec2,
    /// First control point
    pub ctrl1: Vec2,
    /// Second control point
    pub ctrl2: Vec2,
    /// End of the curve, start of the lead-in segment
    pub curve_end: Vec2,
    /// Destination port position
    pub to: Vec2,
}

impl WirePath {
    /// Build the S-curve from an output anchor to an input anchor.
    ///
    /// The control points swap the endpoints' coordinates so the curve leaves
    /// and enters horizontally.
    pub fn new(from: Vec2, to: Vec2, curve_offset: f32) -> Self {
        Self {
            from,
            curve_start: Vec2::new(from.x + curve_offset, from.y),
            ctrl1: Vec2::new(to.x, from.y),
            ctrl2: Vec2::new(from.x, to.y),
            curve_end: Vec2::new(to.x - curve_offset, to.y),
            to,
        }
    }

    /// Control polygon of the Bezier section
    pub fn bezier_points(&self) -> [Vec2; 4] {
        [self.curve_start, self.ctrl1, self.ctrl2, self.curve_end]
    }

    /// SVG path data of the whole wire
    pub fn to_svg_path(&self) -> String {
        let mut d = String::new();
        let _ = write!(d, "M {} {}", self.from.x, self.from.y);
        let _ = write!(d, " L {} {}", self.curve_start.x, self.curve_start.y);
        let _ = write!(
            d,
            " C {} {}, {} {}, {} {}",
            self.ctrl1.x, self.ctrl1.y, self.ctrl2.x, self.ctrl2.y, self.curve_end.x, self.curve_end.y
        );
        let _ = write!(d, " L {} {}", self.to.x, self.to.y);
        d
    }
}

/// One drawable connection
#[derive(Debug, Clone, PartialEq)]
pub struct Wire {
    /// Component owning the input port
    pub component_id: ComponentId,
    /// 1-based index of the input port
    pub port_index: PortIndex,
    /// Path geometry in canvas coordinates
    pub path: WirePath,
    /// Stroke
    pub stroke: WireStroke,
}

/// Lazily derive the wires to draw.
///
/// Order is component order, then input port order. Connections with an
/// endpoint that has not been measured yet are skipped.
pub fn wires<'a>(
    locations: &'a PortLocations,
    components: &'a [ComponentData],
    style: &'a WireStyle,
) -> impl Iterator<Item = Wire> + 'a {
    components
        .iter()
        .enumerate()
        .flat_map(|(i, component)| {
            component
                .input_ports
                .iter()
                .enumerate()
                .map(move |(p, port)| (i + 1, p + 1, port))
        })
        .filter(|(_, _, port)| port.is_connected())
        .filter_map(move |(component_id, port_index, port)| {
            let from = locations.get(&port.connected_to)?;
            let to = locations.get(&port.port_ref)?;
            Some(Wire {
                component_id,
                port_index,
                path: WirePath::new(from, to, style.curve_offset),
                stroke: WireStroke {
                    color: port
                        .color
                        .clone()
                        .unwrap_or_else(|| style.default_color.clone()),
                    width: style.width,
                },
            })
        })
}
