//! Port geometry tracking
//!
//! Every rendered port reports its anchor whenever it is laid out. The tracker
//! keeps the last known canvas position of each port, keyed by port reference,
//! and tells the caller when something actually moved so it can re-render.

use crate::model::{PortData, PortRef};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::trace;

/// Default vertical bias added to every measured anchor (half a port icon)
pub const DEFAULT_ANCHOR_Y_BIAS: f32 = 7.0;

/// Geometry tracking settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Added to the measured y so wires attach at the icon's center
    pub anchor_y_bias: f32,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            anchor_y_bias: DEFAULT_ANCHOR_Y_BIAS,
        }
    }
}

/// A measurable port anchor.
pub trait Anchor {
    /// Position of the anchor relative to the canvas origin.
    ///
    /// Not viewport-relative and not scroll-adjusted. May contain NaN while the
    /// anchor has not been laid out yet.
    fn measure(&self) -> Vec2;
}

/// Offsets-within-parent from an anchor up to the canvas origin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OffsetChain {
    offsets: Vec<Vec2>,
}

impl OffsetChain {
    /// Empty chain, measuring to the canvas origin
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: append the offset of the next ancestor level
    pub fn then(mut self, offset: Vec2) -> Self {
        self.offsets.push(offset);
        self
    }

    /// Append the offset of the next ancestor level
    pub fn push(&mut self, offset: Vec2) {
        self.offsets.push(offset);
    }
}

impl FromIterator<Vec2> for OffsetChain {
    fn from_iter<I: IntoIterator<Item = Vec2>>(iter: I) -> Self {
        Self {
            offsets: iter.into_iter().collect(),
        }
    }
}

impl Anchor for OffsetChain {
    fn measure(&self) -> Vec2 {
        self.offsets.iter().copied().sum()
    }
}

impl Anchor for Vec2 {
    fn measure(&self) -> Vec2 {
        *self
    }
}

/// Last known canvas position of every reported port
#[derive(Debug, Clone, Default)]
pub struct PortLocations {
    locations: HashMap<PortRef, Vec2>,
    config: GeometryConfig,
}

impl PortLocations {
    /// Create an empty cache
    pub fn new(config: GeometryConfig) -> Self {
        Self {
            locations: HashMap::new(),
            config,
        }
    }

    /// Absolute position of an anchor including the vertical bias
    pub fn absolute_position(&self, anchor: &dyn Anchor) -> Vec2 {
        anchor.measure() + Vec2::new(0.0, self.config.anchor_y_bias)
    }

    /// Report the anchor of `port`.
    ///
    /// Returns `true` when the cached position changed and the owning view
    /// has to re-render. Unmeasurable anchors and unchanged positions are
    /// ignored.
    pub fn record(&mut self, port: &PortData, anchor: &dyn Anchor) -> bool {
        let position = self.absolute_position(anchor);
        if !position.is_finite() {
            return false;
        }
        if self.locations.get(&port.port_ref) == Some(&position) {
            return false;
        }
        trace!(port = %port.port_ref, x = position.x, y = position.y, "port moved");
        self.locations.insert(port.port_ref.clone(), position);
        true
    }

    /// Last known position of a port, `None` if it was never measured
    pub fn get(&self, port_ref: &PortRef) -> Option<Vec2> {
        self.locations.get(port_ref).copied()
    }

    /// Number of cached ports
    pub fn len(&self) -> usize {
        self.locations.len()
    }

    /// Whether nothing has been measured yet
    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Current settings
    pub fn config(&self) -> GeometryConfig {
        self.config
    }

    /// Forget every cached position
    pub fn clear(&mut self) {
        self.locations.clear();
    }
}
