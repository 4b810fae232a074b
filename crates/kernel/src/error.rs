use crate::body::{BodyHandle, MotionType};

/// Errors from physics world operations.
///
/// `InvalidGeometry` and `InvalidBodySpec` are composition-time failures and
/// name the offending spec. The handle errors indicate caller bugs.
#[derive(Debug, thiserror::Error)]
pub enum PhysicsError {
    #[error("body `{body}`: invalid geometry: {reason}")]
    InvalidGeometry { body: String, reason: String },
    #[error("body `{body}`: invalid body spec: {reason}")]
    InvalidBodySpec { body: String, reason: String },
    #[error("body {0} not found")]
    BodyNotFound(BodyHandle),
    #[error("body {handle} is {actual:?}; kinematic targets need KinematicPosition")]
    WrongMotionType {
        handle: BodyHandle,
        actual: MotionType,
    },
    #[error("non-finite kinematic target for body {0}")]
    NonFiniteTarget(BodyHandle),
}

impl PhysicsError {
    pub(crate) fn geometry(body: &str, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            body: body.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn spec(body: &str, reason: impl Into<String>) -> Self {
        Self::InvalidBodySpec {
            body: body.to_string(),
            reason: reason.into(),
        }
    }
}
