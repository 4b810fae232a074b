use glam::Vec3;
use rollway_common::Transform;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a body registered in a [`PhysicsWorld`](crate::PhysicsWorld).
///
/// Handles are never reused, so a handle to a removed body stays invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

impl fmt::Display for BodyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionType {
    Fixed,
    Dynamic,
    KinematicPosition,
}

/// Collision approximation for a body, in the body's local frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColliderShape {
    /// Convex hull of a point cloud. Cheap and robust for rotated convex props.
    Hull { points: Vec<Vec3> },
    /// Exact triangle mesh. Reserved for static geometry.
    Trimesh {
        vertices: Vec<Vec3>,
        indices: Vec<[u32; 3]>,
    },
    Ball { radius: f32 },
    Cuboid { half_extents: Vec3 },
}

/// Payload-free tag of a [`ColliderShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColliderKind {
    Hull,
    Trimesh,
    Ball,
    Cuboid,
}

impl ColliderShape {
    pub fn kind(&self) -> ColliderKind {
        match self {
            Self::Hull { .. } => ColliderKind::Hull,
            Self::Trimesh { .. } => ColliderKind::Trimesh,
            Self::Ball { .. } => ColliderKind::Ball,
            Self::Cuboid { .. } => ColliderKind::Cuboid,
        }
    }
}

/// Surface response parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Material {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.5,
            density: 1.0,
        }
    }
}

impl Material {
    pub fn with_restitution(restitution: f32) -> Self {
        Self {
            restitution,
            ..Self::default()
        }
    }
}

/// Everything needed to register one body, independent of its motion type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Human-readable name, used to identify the body in errors and logs.
    pub name: String,
    pub collider: ColliderShape,
    /// Initial world transform. Scale is baked into the collider.
    pub transform: Transform,
    pub material: Material,
    /// Continuous collision detection. Only meaningful for dynamic bodies.
    pub ccd: bool,
}

impl BodyDesc {
    pub fn new(name: impl Into<String>, collider: ColliderShape) -> Self {
        Self {
            name: name.into(),
            collider,
            transform: Transform::default(),
            material: Material::default(),
            ccd: false,
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn with_ccd(mut self, ccd: bool) -> Self {
        self.ccd = ccd;
        self
    }
}

/// A body to register, tagged by who writes its transform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BodySpec {
    /// Immovable.
    Fixed(BodyDesc),
    /// Integrated under gravity and contacts.
    Dynamic(BodyDesc),
    /// Pose authored externally through kinematic targets.
    Kinematic(BodyDesc),
}

impl BodySpec {
    pub fn motion_type(&self) -> MotionType {
        match self {
            Self::Fixed(_) => MotionType::Fixed,
            Self::Dynamic(_) => MotionType::Dynamic,
            Self::Kinematic(_) => MotionType::KinematicPosition,
        }
    }

    pub fn desc(&self) -> &BodyDesc {
        match self {
            Self::Fixed(d) | Self::Dynamic(d) | Self::Kinematic(d) => d,
        }
    }

    pub fn desc_mut(&mut self) -> &mut BodyDesc {
        match self {
            Self::Fixed(d) | Self::Dynamic(d) | Self::Kinematic(d) => d,
        }
    }

    pub fn name(&self) -> &str {
        &self.desc().name
    }
}
