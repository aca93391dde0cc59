//! Circuitry Core - Circuit Model and Interaction State
//!
//! This crate contains everything of the circuit editor that does not need a
//! widget toolkit:
//! - Snapshot model (components, ports, derived connections)
//! - Actions sent to the remote circuit state
//! - Port geometry tracking and wire path construction
//! - Drag, pointer capture and port selection state machines
//! - Value editor registry for unconnected inputs
//! - Logging setup

#![warn(missing_docs)]

pub use glam::Vec2;
use thiserror::Error;

pub mod action;
pub mod backend;
pub mod capture;
pub mod drag;
pub mod geometry;
pub mod logging;
pub mod memo;
pub mod model;
pub mod selection;
pub mod value_editor;
pub mod viewport;
pub mod wires;

// --- Re-exports grouped by category ---

// Model
pub use model::{
    CircuitSnapshot, ComponentData, ComponentId, PortData, PortDirection, PortIndex, PortRef,
};

// Actions & Backend
pub use action::{ActionSink, CircuitAction};
pub use backend::LocalCircuit;

// Geometry & Wires
pub use geometry::{Anchor, GeometryConfig, OffsetChain, PortLocations};
pub use viewport::Viewport;
pub use wires::{wires, Wire, WirePath, WireStroke, WireStyle};

// Interaction
pub use capture::{PointerGrab, PointerSurface};
pub use drag::{DragController, DragPhase};
pub use memo::Memo;
pub use selection::{PortHandle, PortSelection, SelectedPort};
pub use value_editor::{EditedValue, EditorKind, PortLabel, ValueEditorRegistry};

// Logging
pub use logging::LogConfig;

/// Core error types
#[derive(Error, Debug)]
pub enum CircuitError {
    /// The circuit snapshot could not be decoded
    #[error("Invalid circuit snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// Filesystem access failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The logging backend could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CircuitError>;
