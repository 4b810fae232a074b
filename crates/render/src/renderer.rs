use glam::{EulerRot, Vec3};
use rollway_common::DebugLine;
use std::fmt::Write;

use crate::graph::SceneGraph;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(-50.0, -25.0, 150.0),
            target: Vec3::ZERO,
            fov_degrees: 15.0,
        }
    }
}

/// Physics debug wireframe for one frame.
#[derive(Debug, Clone, Default)]
pub struct DebugOverlay {
    pub lines: Vec<DebugLine>,
}

impl DebugOverlay {
    pub fn new(lines: Vec<DebugLine>) -> Self {
        Self { lines }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene graph, a view and an optional debug overlay,
/// then produces output. It never mutates the graph.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame.
    fn render(
        &self,
        graph: &SceneGraph,
        view: &RenderView,
        overlay: Option<&DebugOverlay>,
    ) -> Self::Output;
}

/// Text renderer for headless hosts.
///
/// Produces a human-readable listing of every node's world transform.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(
        &self,
        graph: &SceneGraph,
        view: &RenderView,
        overlay: Option<&DebugOverlay>,
    ) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} nodes) ===", graph.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees
        );

        for (id, node) in graph.iter() {
            let Ok(world) = graph.world_transform(id) else {
                continue;
            };
            let p = world.position;
            let (rx, ry, rz) = world.rotation.to_euler(EulerRot::XYZ);
            let _ = writeln!(
                out,
                "  [{id}] {:<12} pos=({:.2}, {:.2}, {:.2}) rot=({:.2}, {:.2}, {:.2})",
                node.name, p.x, p.y, p.z, rx, ry, rz
            );
        }

        if let Some(overlay) = overlay {
            let _ = writeln!(out, "Debug overlay: {} lines", overlay.lines.len());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::SceneNode;
    use rollway_common::Transform;

    #[test]
    fn debug_renderer_empty_graph() {
        let output = DebugTextRenderer::new().render(&SceneGraph::new(), &RenderView::default(), None);
        assert!(output.contains("0 nodes"));
        assert!(!output.contains("Debug overlay"));
    }

    #[test]
    fn debug_renderer_lists_world_positions() {
        let mut graph = SceneGraph::new();
        let group = graph.add_root(SceneNode::new("group", Transform::from_position(Vec3::new(2.0, 3.0, 0.0))));
        graph
            .add_child(group, SceneNode::new("sphere", Transform::from_position(Vec3::new(-12.0, 15.0, 0.0))))
            .unwrap();

        let output = DebugTextRenderer::new().render(&graph, &RenderView::default(), None);
        assert!(output.contains("2 nodes"));
        assert!(output.contains("pos=(-10.00, 18.00, 0.00)"));
    }

    #[test]
    fn overlay_is_reported_when_present() {
        let overlay = DebugOverlay::new(vec![DebugLine {
            a: Vec3::ZERO,
            b: Vec3::X,
            color: [1.0; 4],
        }]);
        let output = DebugTextRenderer::new().render(&SceneGraph::new(), &RenderView::default(), Some(&overlay));
        assert!(output.contains("Debug overlay: 1 lines"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.fov_degrees, 15.0);
        assert_eq!(view.eye, Vec3::new(-50.0, -25.0, 150.0));
    }
}
