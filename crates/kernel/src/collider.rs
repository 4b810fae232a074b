//! Collider construction from [`ColliderShape`], with geometry validation.
//!
//! rapier panics on some degenerate inputs (an empty triangle mesh, for
//! instance), so every shape is checked before it reaches the builder.

use glam::Vec3;
use rapier3d::prelude::ColliderBuilder;

use crate::body::{BodyDesc, ColliderShape};
use crate::convert::to_point;
use crate::error::PhysicsError;

/// Extents, areas and volumes at or below this are treated as zero.
const DEGENERATE_EPS: f32 = 1e-6;

/// Validate the material and transform of `desc`.
pub(crate) fn validate_desc(desc: &BodyDesc) -> Result<(), PhysicsError> {
    let m = &desc.material;
    if !(m.restitution.is_finite() && m.restitution >= 0.0) {
        return Err(PhysicsError::spec(
            &desc.name,
            format!("restitution must be finite and >= 0, got {}", m.restitution),
        ));
    }
    if !(m.friction.is_finite() && m.friction >= 0.0) {
        return Err(PhysicsError::spec(
            &desc.name,
            format!("friction must be finite and >= 0, got {}", m.friction),
        ));
    }
    if !(m.density.is_finite() && m.density > 0.0) {
        return Err(PhysicsError::spec(
            &desc.name,
            format!("density must be finite and > 0, got {}", m.density),
        ));
    }
    if !desc.transform.is_finite() {
        return Err(PhysicsError::spec(&desc.name, "initial transform is not finite"));
    }
    Ok(())
}

/// Build the rapier collider for `desc`, baking the transform's scale into
/// the geometry.
pub(crate) fn build_collider(desc: &BodyDesc) -> Result<ColliderBuilder, PhysicsError> {
    let name = desc.name.as_str();
    let scale = desc.transform.scale;
    if scale.abs().min_element() <= DEGENERATE_EPS {
        return Err(PhysicsError::geometry(name, format!("zero scale {scale}")));
    }

    let builder = match &desc.collider {
        ColliderShape::Ball { radius } => {
            let r = radius * scale.abs().max_element();
            if !(r.is_finite() && r > DEGENERATE_EPS) {
                return Err(PhysicsError::geometry(name, format!("ball radius {radius}")));
            }
            ColliderBuilder::ball(r)
        }
        ColliderShape::Cuboid { half_extents } => {
            let he = *half_extents * scale.abs();
            if !he.is_finite() || he.min_element() <= DEGENERATE_EPS {
                return Err(PhysicsError::geometry(
                    name,
                    format!("cuboid half-extents {half_extents}"),
                ));
            }
            ColliderBuilder::cuboid(he.x, he.y, he.z)
        }
        ColliderShape::Hull { points } => {
            let scaled: Vec<Vec3> = points.iter().map(|p| *p * scale).collect();
            validate_hull(name, &scaled)?;
            let pts: Vec<_> = scaled.iter().copied().map(to_point).collect();
            ColliderBuilder::convex_hull(&pts)
                .ok_or_else(|| PhysicsError::geometry(name, "convex hull computation failed"))?
        }
        ColliderShape::Trimesh { vertices, indices } => {
            let scaled: Vec<Vec3> = vertices.iter().map(|v| *v * scale).collect();
            let triangles = validate_trimesh(name, &scaled, indices)?;
            let pts = scaled.into_iter().map(to_point).collect();
            ColliderBuilder::trimesh(pts, triangles)
        }
    };

    Ok(builder
        .restitution(desc.material.restitution)
        .friction(desc.material.friction)
        .density(desc.material.density))
}

fn validate_hull(name: &str, points: &[Vec3]) -> Result<(), PhysicsError> {
    if points.len() < 4 {
        return Err(PhysicsError::geometry(
            name,
            format!("hull needs at least 4 points, got {}", points.len()),
        ));
    }
    if points.iter().any(|p| !p.is_finite()) {
        return Err(PhysicsError::geometry(name, "hull point is not finite"));
    }
    if spanned_volume(points) <= DEGENERATE_EPS {
        return Err(PhysicsError::geometry(name, "hull points are coplanar"));
    }
    Ok(())
}

/// Check the mesh and return its non-degenerate triangles.
fn validate_trimesh(
    name: &str,
    vertices: &[Vec3],
    indices: &[[u32; 3]],
) -> Result<Vec<[u32; 3]>, PhysicsError> {
    if vertices.len() < 3 || indices.is_empty() {
        return Err(PhysicsError::geometry(
            name,
            format!(
                "trimesh needs vertices and triangles, got {} vertices and {} triangles",
                vertices.len(),
                indices.len()
            ),
        ));
    }
    if vertices.iter().any(|v| !v.is_finite()) {
        return Err(PhysicsError::geometry(name, "trimesh vertex is not finite"));
    }

    let mut kept = Vec::with_capacity(indices.len());
    for tri in indices {
        if let Some(&bad) = tri.iter().find(|&&i| i as usize >= vertices.len()) {
            return Err(PhysicsError::geometry(
                name,
                format!("triangle index {bad} out of range for {} vertices", vertices.len()),
            ));
        }
        let [a, b, c] = tri.map(|i| vertices[i as usize]);
        if (b - a).cross(c - a).length() > DEGENERATE_EPS {
            kept.push(*tri);
        }
    }
    if kept.is_empty() {
        return Err(PhysicsError::geometry(name, "every trimesh triangle has zero area"));
    }
    if kept.len() < indices.len() {
        tracing::debug!(
            body = name,
            dropped = indices.len() - kept.len(),
            "dropped zero-area triangles"
        );
    }
    Ok(kept)
}

/// Volume (times six) of the largest tetrahedron found greedily among
/// `points`. Zero when the points are coplanar.
fn spanned_volume(points: &[Vec3]) -> f32 {
    let a = points[0];
    let b = max_by(points, |p| (*p - a).length_squared());
    let c = max_by(points, |p| (b - a).cross(*p - a).length_squared());
    let normal = (b - a).cross(c - a);
    let d = max_by(points, |p| normal.dot(*p - a).abs());
    normal.dot(d - a).abs()
}

fn max_by(points: &[Vec3], key: impl Fn(&Vec3) -> f32) -> Vec3 {
    points
        .iter()
        .copied()
        .fold((points[0], f32::MIN), |(best, best_k), p| {
            let k = key(&p);
            if k > best_k { (p, k) } else { (best, best_k) }
        })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Material;
    use rollway_common::Transform;

    fn unit_cube_points() -> Vec<Vec3> {
        let mut pts = Vec::new();
        for x in [-0.5, 0.5] {
            for y in [-0.5, 0.5] {
                for z in [-0.5, 0.5] {
                    pts.push(Vec3::new(x, y, z));
                }
            }
        }
        pts
    }

    fn desc(shape: ColliderShape) -> BodyDesc {
        BodyDesc::new("sample", shape)
    }

    #[test]
    fn valid_primitives_build() {
        assert!(build_collider(&desc(ColliderShape::Ball { radius: 0.5 })).is_ok());
        assert!(
            build_collider(&desc(ColliderShape::Cuboid {
                half_extents: Vec3::new(2.0, 0.2, 2.0)
            }))
            .is_ok()
        );
        assert!(
            build_collider(&desc(ColliderShape::Hull {
                points: unit_cube_points()
            }))
            .is_ok()
        );
    }

    #[test]
    fn zero_radius_ball_rejected() {
        let err = build_collider(&desc(ColliderShape::Ball { radius: 0.0 })).err().unwrap();
        assert!(matches!(err, PhysicsError::InvalidGeometry { ref body, .. } if body == "sample"));
    }

    #[test]
    fn flat_cuboid_rejected() {
        let err = build_collider(&desc(ColliderShape::Cuboid {
            half_extents: Vec3::new(1.0, 0.0, 1.0),
        }))
        .err().unwrap();
        assert!(matches!(err, PhysicsError::InvalidGeometry { .. }));
    }

    #[test]
    fn coplanar_hull_rejected() {
        let points = vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.5, 0.5, 0.0),
        ];
        let err = build_collider(&desc(ColliderShape::Hull { points })).err().unwrap();
        assert!(err.to_string().contains("coplanar"));
    }

    #[test]
    fn short_hull_rejected() {
        let points = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(build_collider(&desc(ColliderShape::Hull { points })).is_err());
    }

    #[test]
    fn trimesh_index_out_of_range_rejected() {
        let shape = ColliderShape::Trimesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::Z],
            indices: vec![[0, 1, 3]],
        };
        let err = build_collider(&desc(shape)).err().unwrap();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn empty_trimesh_rejected() {
        let shape = ColliderShape::Trimesh {
            vertices: vec![],
            indices: vec![],
        };
        assert!(build_collider(&desc(shape)).is_err());
    }

    #[test]
    fn zero_area_triangles_are_dropped() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::Z, Vec3::new(2.0, 0.0, 0.0)];
        let kept = validate_trimesh("t", &vertices, &[[0, 1, 2], [0, 1, 3]]).unwrap();
        assert_eq!(kept, vec![[0, 1, 2]]);
    }

    #[test]
    fn all_degenerate_trimesh_rejected() {
        let vertices = vec![Vec3::ZERO, Vec3::X, Vec3::new(2.0, 0.0, 0.0)];
        assert!(validate_trimesh("t", &vertices, &[[0, 1, 2]]).is_err());
    }

    #[test]
    fn zero_scale_rejected() {
        let d = desc(ColliderShape::Ball { radius: 1.0 }).with_transform(Transform {
            scale: Vec3::new(1.0, 0.0, 1.0),
            ..Transform::default()
        });
        assert!(build_collider(&d).is_err());
    }

    #[test]
    fn bad_material_rejected() {
        let d = desc(ColliderShape::Ball { radius: 1.0 })
            .with_material(Material::with_restitution(-0.1));
        assert!(matches!(
            validate_desc(&d),
            Err(PhysicsError::InvalidBodySpec { .. })
        ));

        let d = desc(ColliderShape::Ball { radius: 1.0 }).with_material(Material {
            density: 0.0,
            ..Material::default()
        });
        assert!(validate_desc(&d).is_err());
    }

    #[test]
    fn non_finite_transform_rejected() {
        let d = desc(ColliderShape::Ball { radius: 1.0 })
            .with_transform(Transform::from_position(Vec3::splat(f32::INFINITY)));
        assert!(validate_desc(&d).is_err());
    }

    #[test]
    fn spanned_volume_of_cube_is_positive() {
        assert!(spanned_volume(&unit_cube_points()) > 0.1);
    }
}
