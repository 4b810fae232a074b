use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Convert an XYZ Euler vector (radians) into a rotation.
///
/// The order matches the scene-authoring convention: the X rotation is
/// applied outermost, Z innermost.
pub fn euler_to_quat(euler: Vec3) -> Quat {
    Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z)
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    /// Build a transform from a position and an XYZ Euler rotation.
    pub fn from_position_euler(position: Vec3, euler: Vec3) -> Self {
        Self {
            position,
            rotation: euler_to_quat(euler),
            scale: Vec3::ONE,
        }
    }

    /// Place `child` (expressed in this transform's local frame) into the
    /// parent frame.
    ///
    /// For a parent without rotation or scale this is a plain translation
    /// offset: `parent.position + child.position`.
    pub fn compose(&self, child: &Transform) -> Transform {
        Transform {
            position: self.position + self.rotation * (self.scale * child.position),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    /// True when every component is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }

    /// Compare position and orientation within `eps`. Scale is ignored.
    ///
    /// `q` and `-q` describe the same orientation, so the rotation check uses
    /// the absolute quaternion dot product.
    pub fn approx_eq_pose(&self, other: &Transform, eps: f32) -> bool {
        self.position.abs_diff_eq(other.position, eps)
            && self.rotation.dot(other.rotation).abs() >= 1.0 - eps
    }
}

/// A target pose produced by a driver: translation plus XYZ Euler rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Pose {
    pub translation: Vec3,
    /// Euler angles in radians, XYZ order.
    pub rotation: Vec3,
}

impl Pose {
    pub fn new(translation: Vec3, rotation: Vec3) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn rotation_quat(&self) -> Quat {
        euler_to_quat(self.rotation)
    }

    pub fn to_transform(&self) -> Transform {
        Transform::from_position_euler(self.translation, self.rotation)
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite()
    }
}

/// One segment of a physics debug overlay, in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugLine {
    pub a: Vec3,
    pub b: Vec3,
    /// HSLA color as emitted by the physics debug pipeline.
    pub color: [f32; 4],
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn compose_translation_only_parent_is_additive() {
        let group = Transform::from_position(Vec3::new(2.0, 3.0, 0.0));
        let child = Transform::from_position_euler(Vec3::new(-0.85, 4.0, 0.0), Vec3::new(FRAC_PI_2, 0.0, 0.0));
        let world = group.compose(&child);
        assert!(world.position.abs_diff_eq(Vec3::new(1.15, 7.0, 0.0), 1e-6));
        assert!(world.rotation.abs_diff_eq(child.rotation, 1e-6));
    }

    #[test]
    fn compose_applies_parent_rotation() {
        let parent = Transform::from_position_euler(Vec3::ZERO, Vec3::new(0.0, FRAC_PI_2, 0.0));
        let child = Transform::from_position(Vec3::X);
        let world = parent.compose(&child);
        // +X rotated a quarter turn about +Y lands on -Z.
        assert!(world.position.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-6));
    }

    #[test]
    fn euler_order_is_xyz() {
        let e = Vec3::new(0.3, -0.2, 0.7);
        let expected =
            Quat::from_rotation_x(e.x) * Quat::from_rotation_y(e.y) * Quat::from_rotation_z(e.z);
        assert!(euler_to_quat(e).abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn approx_eq_pose_ignores_quaternion_sign() {
        let a = Transform::from_position_euler(Vec3::ONE, Vec3::new(0.1, 0.2, 0.3));
        let b = Transform {
            rotation: -a.rotation,
            ..a
        };
        assert!(a.approx_eq_pose(&b, 1e-6));
    }

    #[test]
    fn non_finite_transform_detected() {
        let t = Transform::from_position(Vec3::new(f32::NAN, 0.0, 0.0));
        assert!(!t.is_finite());
        assert!(Transform::default().is_finite());
    }
}
