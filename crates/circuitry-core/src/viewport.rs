//! Infinite plane viewport
//!
//! Canvas coordinates are fixed relative to the canvas origin; the viewport
//! only shifts them on screen. Pointer samples are converted into canvas
//! space before they reach the drag controllers.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Pan state of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen offset of the canvas origin from the canvas rect's top-left
    pub pan: Vec2,
}

impl Viewport {
    /// Viewport with the canvas origin at the rect's top-left
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the plane by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    /// Screen position to canvas position, given the canvas rect's top-left
    pub fn to_canvas(&self, rect_min: Vec2, screen: Vec2) -> Vec2 {
        screen - rect_min - self.pan
    }

    /// Canvas position to screen position, given the canvas rect's top-left
    pub fn to_screen(&self, rect_min: Vec2, canvas: Vec2) -> Vec2 {
        canvas + rect_min + self.pan
    }

    /// Return to the initial view
    pub fn reset(&mut self) {
        self.pan = Vec2::ZERO;
    }
}
