//! glam <-> nalgebra conversions at the rapier boundary.

use glam::{Quat, Vec3};
use rapier3d::math::{Isometry, Point, Real, Vector};
use rapier3d::na::{Quaternion, Translation3, UnitQuaternion};
use rollway_common::{Pose, Transform};

pub(crate) fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

pub(crate) fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

pub(crate) fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

pub(crate) fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

fn to_rotation(q: Quat) -> UnitQuaternion<Real> {
    UnitQuaternion::from_quaternion(Quaternion::new(q.w, q.x, q.y, q.z))
}

pub(crate) fn to_isometry(t: &Transform) -> Isometry<Real> {
    Isometry::from_parts(
        Translation3::new(t.position.x, t.position.y, t.position.z),
        to_rotation(t.rotation),
    )
}

pub(crate) fn pose_to_isometry(p: &Pose) -> Isometry<Real> {
    to_isometry(&p.to_transform())
}

/// Rapier isometries carry no scale; the result has unit scale.
pub(crate) fn from_isometry(iso: &Isometry<Real>) -> Transform {
    let r = iso.rotation;
    Transform {
        position: from_vector(&iso.translation.vector),
        rotation: Quat::from_xyzw(r.i, r.j, r.k, r.w),
        scale: Vec3::ONE,
    }
}

pub(crate) fn isometry_is_finite(iso: &Isometry<Real>) -> bool {
    iso.translation.vector.iter().all(|c| c.is_finite())
        && iso.rotation.coords.iter().all(|c| c.is_finite())
}
