use rollway_assets::AssetId;
use rollway_common::Transform;
use std::fmt;

/// Index of a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SceneGraphError {
    #[error("{0} not found")]
    NodeNotFound(NodeId),
}

/// A render node: local transform plus optional geometry and material.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    pub name: String,
    /// Transform relative to the parent, or to the world for roots.
    pub transform: Transform,
    pub geometry: Option<AssetId>,
    pub material: Option<AssetId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>, transform: Transform) -> Self {
        Self {
            name: name.into(),
            transform,
            geometry: None,
            material: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_geometry(mut self, geometry: AssetId) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_material(mut self, material: AssetId) -> Self {
        self.material = Some(material);
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena of scene nodes. Nodes are only added during composition and the
/// whole graph is dropped at teardown, so ids stay valid for its lifetime.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a top-level node.
    pub fn add_root(&mut self, node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(SceneNode {
            parent: None,
            ..node
        });
        id
    }

    /// Add `node` under `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> Result<NodeId, SceneGraphError> {
        let id = NodeId(self.nodes.len() as u32);
        self.get_mut(parent)?.children.push(id);
        self.nodes.push(SceneNode {
            parent: Some(parent),
            ..node
        });
        Ok(id)
    }

    pub fn get(&self, id: NodeId) -> Result<&SceneNode, SceneGraphError> {
        self.nodes
            .get(id.0 as usize)
            .ok_or(SceneGraphError::NodeNotFound(id))
    }

    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut SceneNode, SceneGraphError> {
        self.nodes
            .get_mut(id.0 as usize)
            .ok_or(SceneGraphError::NodeNotFound(id))
    }

    /// Overwrite a node's local transform.
    pub fn set_transform(&mut self, id: NodeId, transform: Transform) -> Result<(), SceneGraphError> {
        self.get_mut(id)?.transform = transform;
        Ok(())
    }

    /// Node transform composed with every ancestor.
    pub fn world_transform(&self, id: NodeId) -> Result<Transform, SceneGraphError> {
        let node = self.get(id)?;
        let mut world = node.transform;
        let mut cursor = node.parent;
        while let Some(parent) = cursor {
            let p = self.get(parent)?;
            world = p.transform.compose(&world);
            cursor = p.parent;
        }
        Ok(world)
    }

    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter().filter(|(_, n)| n.parent.is_none()).map(|(id, _)| id)
    }

    /// All nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &SceneNode)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }
}
