//! Physics kernel: authoritative body state, simulation stepping, kinematic targets.
//!
//! # Invariants
//! - The kernel owns every rigid body. Callers hold opaque [`BodyHandle`]s.
//! - Each body has exactly one transform writer: the integrator for fixed and
//!   dynamic bodies, the kinematic target for kinematic bodies.
//! - A kinematic target stays in effect until overwritten.
//! - A body whose transform goes non-finite is restored to its last valid
//!   transform without disturbing other bodies.

pub mod body;
pub mod clock;
mod collider;
mod convert;
mod debug;
pub mod error;
pub mod world;

pub use body::{BodyDesc, BodyHandle, BodySpec, ColliderKind, ColliderShape, Material, MotionType};
pub use clock::Clock;
pub use error::PhysicsError;
pub use world::{DEFAULT_GRAVITY, PhysicsEvent, PhysicsWorld};

pub fn crate_info() -> &'static str {
    concat!("rollway-kernel v", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().starts_with("rollway-kernel v"));
    }
}
