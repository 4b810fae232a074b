//! Kinematic actor driver: a pure function of elapsed time producing a pose.
//!
//! # Invariants
//! - Stateless: the same `t` always yields a bit-identical pose.
//! - Restarting the clock replays the exact same motion.
//! - The driver never touches physics state; the scene tick hands its output
//!   to the physics world before stepping.

pub mod actor;

pub use actor::{AxisWaves, KinematicDriver, PoseDriver, Wave, WaveKind};

pub fn crate_info() -> &'static str {
    concat!("rollway-driver v", env!("CARGO_PKG_VERSION"))
}
