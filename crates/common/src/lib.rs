//! Shared value types for the rollway workspace.
//!
//! Everything here is plain data: transforms, poses, debug line segments.
//! Physics and render crates both depend on these so neither has to depend on
//! the other.

mod types;

pub use types::{DebugLine, Pose, Transform, euler_to_quat};
