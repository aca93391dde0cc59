//! Circuitry UI - egui front end for the circuit editor
//!
//! This crate draws a [`circuitry_core::CircuitSnapshot`] as draggable
//! component frames connected by wires, and turns user input into
//! [`circuitry_core::CircuitAction`]s:
//! - Canvas with pan and background grid
//! - Component frames with title bar, option picker and close button
//! - Port rows with link selection and inline value editors
//! - Wire painting
//! - Windowless runs with SVG export

#![warn(missing_docs)]

pub mod canvas;
pub mod component_view;
pub mod config;
pub mod headless;
pub mod port_editor;
pub mod port_view;
pub mod theme;
pub mod wire_painter;

pub use canvas::CircuitEditor;
pub use config::EditorConfig;
pub use headless::HeadlessEditor;
