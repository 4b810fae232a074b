//! Prop constructors: each pairs a body spec with its render geometry.
//!
//! Collider approximations follow the course's shape policy: convex hulls
//! for cylinders, a triangle mesh only for the static track, analytic
//! primitives for boxes, spheres and the actor.

use glam::Vec3;
use rollway_assets::{GeometryBuffer, RenderMaterial, procedural};
use rollway_common::Transform;
use rollway_kernel::{BodyDesc, BodySpec, ColliderShape, Material};

pub const CYLINDER_RADIUS: f32 = 0.25;
pub const CYLINDER_HEIGHT: f32 = 4.0;
pub const DEFAULT_BOX_LENGTH: f32 = 4.0;
pub const BOX_THICKNESS: f32 = 0.4;
pub const BOX_DEPTH: f32 = 4.0;

const CYLINDER_SEGMENTS: u32 = 16;
const SPHERE_SEGMENTS: u32 = 32;

/// A body spec plus what the renderer needs to draw it.
#[derive(Debug, Clone, PartialEq)]
pub struct Prop {
    pub spec: BodySpec,
    pub geometry: GeometryBuffer,
    pub material: RenderMaterial,
}

impl Prop {
    pub fn name(&self) -> &str {
        self.spec.name()
    }

    /// Transform relative to the enclosing group until composed.
    pub fn transform(&self) -> Transform {
        self.spec.desc().transform
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.spec.desc_mut().transform = transform;
    }
}

/// Fixed post of radius 0.25 and height 4 with a convex-hull collider.
pub fn cylinder(name: &str, local: Transform) -> Prop {
    let geometry = procedural::cylinder(name, CYLINDER_RADIUS, CYLINDER_HEIGHT, CYLINDER_SEGMENTS);
    let collider = ColliderShape::Hull {
        points: geometry.vertices.clone(),
    };
    Prop {
        spec: BodySpec::Fixed(BodyDesc::new(name, collider).with_transform(local)),
        geometry,
        material: RenderMaterial::default(),
    }
}

/// Fixed slab `length` wide, 0.4 thick and 4 deep.
pub fn slab(name: &str, local: Transform, length: f32) -> Prop {
    let size = Vec3::new(length, BOX_THICKNESS, BOX_DEPTH);
    Prop {
        spec: BodySpec::Fixed(
            BodyDesc::new(
                name,
                ColliderShape::Cuboid {
                    half_extents: size * 0.5,
                },
            )
            .with_transform(local),
        ),
        geometry: procedural::cuboid(name, size),
        material: RenderMaterial::white(),
    }
}

/// Dynamic ball with continuous collision detection.
pub fn sphere(name: &str, local: Transform, radius: f32, restitution: f32) -> Prop {
    Prop {
        spec: BodySpec::Dynamic(
            BodyDesc::new(name, ColliderShape::Ball { radius })
                .with_transform(local)
                .with_material(Material::with_restitution(restitution))
                .with_ccd(true),
        ),
        geometry: procedural::uv_sphere(name, radius, SPHERE_SEGMENTS, SPHERE_SEGMENTS),
        material: RenderMaterial::default(),
    }
}

/// Fixed track with an exact triangle-mesh collider.
pub fn track(name: &str, local: Transform, geometry: GeometryBuffer) -> Prop {
    let collider = ColliderShape::Trimesh {
        vertices: geometry.vertices.clone(),
        indices: geometry.indices.clone(),
    };
    Prop {
        spec: BodySpec::Fixed(BodyDesc::new(name, collider).with_transform(local)),
        geometry,
        material: RenderMaterial::track_glass(),
    }
}

/// Built-in track used when no geometry buffer is configured.
pub fn default_track_geometry() -> GeometryBuffer {
    procedural::trough("track", 24.0, 1.5, 3.0, 48, 16)
}

/// The kinematic actor: a cuboid whose pose is written by the driver.
pub fn actor(name: &str, local: Transform, half_extents: Vec3) -> Prop {
    Prop {
        spec: BodySpec::Kinematic(
            BodyDesc::new(name, ColliderShape::Cuboid { half_extents }).with_transform(local),
        ),
        geometry: procedural::cuboid(name, half_extents * 2.0),
        material: RenderMaterial::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rollway_kernel::{ColliderKind, MotionType};

    #[test]
    fn default_box_half_extents() {
        let prop = slab("box", Transform::default(), DEFAULT_BOX_LENGTH);
        assert_eq!(prop.spec.motion_type(), MotionType::Fixed);
        assert_eq!(
            prop.spec.desc().collider,
            ColliderShape::Cuboid {
                half_extents: Vec3::new(2.0, 0.2, 2.0)
            }
        );
    }

    #[test]
    fn long_box_half_extents() {
        let prop = slab("box", Transform::default(), 8.0);
        assert!(matches!(
            prop.spec.desc().collider,
            ColliderShape::Cuboid { half_extents } if half_extents == Vec3::new(4.0, 0.2, 2.0)
        ));
    }

    #[test]
    fn cylinder_uses_hull_of_its_mesh() {
        let prop = cylinder("post", Transform::default());
        assert_eq!(prop.spec.desc().collider.kind(), ColliderKind::Hull);
        let ColliderShape::Hull { points } = &prop.spec.desc().collider else {
            unreachable!()
        };
        assert_eq!(points, &prop.geometry.vertices);
    }

    #[test]
    fn sphere_is_dynamic_with_ccd() {
        let prop = sphere("ball", Transform::default(), 0.5, 0.7);
        assert_eq!(prop.spec.motion_type(), MotionType::Dynamic);
        assert!(prop.spec.desc().ccd);
        assert_eq!(prop.spec.desc().material.restitution, 0.7);
    }

    #[test]
    fn track_is_fixed_trimesh() {
        let prop = track("track", Transform::default(), default_track_geometry());
        assert_eq!(prop.spec.motion_type(), MotionType::Fixed);
        assert_eq!(prop.spec.desc().collider.kind(), ColliderKind::Trimesh);
        assert_eq!(prop.material.transmission, 1.0);
    }

    #[test]
    fn actor_is_kinematic_cuboid() {
        let prop = actor("actor", Transform::default(), Vec3::new(1.5, 0.25, 1.5));
        assert_eq!(prop.spec.motion_type(), MotionType::KinematicPosition);
        assert_eq!(prop.spec.desc().collider.kind(), ColliderKind::Cuboid);
    }
}
