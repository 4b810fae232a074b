//! Physics → render transform copy.

use rollway_common::Transform;
use rollway_kernel::{BodyHandle, PhysicsWorld};
use rollway_render::{NodeId, SceneGraph};

/// Pairs one physics body with the render node that shows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyMeshBinding {
    pub body: BodyHandle,
    pub node: NodeId,
}

/// Outcome of one [`BindingSet::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub synced: usize,
    pub skipped: usize,
}

/// Every binding of a scene. Bound nodes are graph roots, so the body's
/// world transform is written straight into the node's transform.
#[derive(Debug, Clone, Default)]
pub struct BindingSet {
    bindings: Vec<BodyMeshBinding>,
}

impl BindingSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, body: BodyHandle, node: NodeId) {
        self.bindings.push(BodyMeshBinding { body, node });
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BodyMeshBinding> {
        self.bindings.iter()
    }

    pub fn node_for(&self, body: BodyHandle) -> Option<NodeId> {
        self.bindings.iter().find(|b| b.body == body).map(|b| b.node)
    }

    /// Copy each body's position and rotation into its node. Node scale is
    /// kept. Bindings whose body or node is gone are logged and skipped.
    pub fn sync(&self, world: &PhysicsWorld, graph: &mut SceneGraph) -> SyncReport {
        let mut report = SyncReport::default();
        for binding in &self.bindings {
            let body_transform = match world.query_transform(binding.body) {
                Ok(t) => t,
                Err(err) => {
                    tracing::warn!(body = %binding.body, node = %binding.node, %err, "skipping binding");
                    report.skipped += 1;
                    continue;
                }
            };
            match graph.get_mut(binding.node) {
                Ok(node) => {
                    node.transform = Transform {
                        scale: node.transform.scale,
                        ..body_transform
                    };
                    report.synced += 1;
                }
                Err(err) => {
                    tracing::warn!(body = %binding.body, node = %binding.node, %err, "skipping binding");
                    report.skipped += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rollway_kernel::{BodyDesc, BodySpec, ColliderShape};
    use rollway_render::SceneNode;

    fn ball_world() -> (PhysicsWorld, BodyHandle) {
        let mut world = PhysicsWorld::default();
        let h = world
            .add_body(BodySpec::Dynamic(
                BodyDesc::new("ball", ColliderShape::Ball { radius: 0.5 })
                    .with_transform(Transform::from_position(Vec3::new(0.0, 5.0, 0.0))),
            ))
            .unwrap();
        (world, h)
    }

    #[test]
    fn node_matches_body_after_every_step() {
        let (mut world, h) = ball_world();
        let mut graph = SceneGraph::new();
        let node = graph.add_root(SceneNode::new("ball", Transform::default()));
        let mut bindings = BindingSet::new();
        bindings.bind(h, node);

        for _ in 0..30 {
            world.step(1.0 / 60.0);
            let report = bindings.sync(&world, &mut graph);
            assert_eq!(report, SyncReport { synced: 1, skipped: 0 });
            assert_eq!(graph.get(node).unwrap().transform, world.query_transform(h).unwrap());
        }
    }

    #[test]
    fn sync_keeps_node_scale() {
        let (world, h) = ball_world();
        let mut graph = SceneGraph::new();
        let node = graph.add_root(SceneNode::new(
            "ball",
            Transform {
                scale: Vec3::splat(2.0),
                ..Transform::default()
            },
        ));
        let mut bindings = BindingSet::new();
        bindings.bind(h, node);
        bindings.sync(&world, &mut graph);

        let t = graph.get(node).unwrap().transform;
        assert_eq!(t.scale, Vec3::splat(2.0));
        assert_eq!(t.position, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn removed_body_is_skipped() {
        let (mut world, h) = ball_world();
        let mut graph = SceneGraph::new();
        let node = graph.add_root(SceneNode::new("ball", Transform::default()));
        let mut bindings = BindingSet::new();
        bindings.bind(h, node);
        bindings.bind(h, NodeId(99));

        world.remove_body(h).unwrap();
        let report = bindings.sync(&world, &mut graph);
        assert_eq!(report, SyncReport { synced: 0, skipped: 2 });
        assert_eq!(graph.get(node).unwrap().transform, Transform::default());
    }

    #[test]
    fn node_lookup_by_body() {
        let mut bindings = BindingSet::new();
        bindings.bind(BodyHandle(4), NodeId(2));
        assert_eq!(bindings.node_for(BodyHandle(4)), Some(NodeId(2)));
        assert_eq!(bindings.node_for(BodyHandle(5)), None);
    }
}
