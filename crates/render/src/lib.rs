//! Rendering adapter: retained scene graph plus a renderer-agnostic interface.
//!
//! # Invariants
//! - Renderers read the scene graph; they never write to it.
//! - Scene nodes are render-only. Simulation state lives in the physics
//!   kernel and is copied in by the scene layer after each step.
//!
//! A [`DebugTextRenderer`] is provided for headless hosts and tests. The
//! trait is stable; GPU backends implement it without changing consumers.

mod graph;
mod renderer;

pub use graph::{NodeId, SceneGraph, SceneGraphError, SceneNode};
pub use renderer::{DebugOverlay, DebugTextRenderer, RenderView, Renderer};

pub fn crate_info() -> &'static str {
    concat!("rollway-render v", env!("CARGO_PKG_VERSION"))
}
