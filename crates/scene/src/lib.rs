//! Scene layer: composes the course, binds bodies to render nodes and runs
//! the per-frame tick.
//!
//! # Frame order
//! [`SceneContext::tick`] is the only place a frame advances:
//! clock, then driver target into the kinematic slot, then physics step,
//! then body-to-node sync, then the optional debug overlay.
//!
//! # Invariants
//! - After every tick each bound node's transform equals its body's.
//! - The binding pass only reads physics state.

pub mod binding;
pub mod composition;
pub mod config;
mod context;
mod error;
mod host;
pub mod props;
mod timer;

pub use binding::{BindingSet, BodyMeshBinding, SyncReport};
pub use composition::{Composition, Group, default_course};
pub use config::{ActorConfig, ConfigError, SceneConfig, SphereConfig};
pub use context::{FrameReport, SceneContext};
pub use error::SceneError;
pub use host::{FrameStats, SceneHost};
pub use props::Prop;
pub use timer::FrameTimer;

pub fn crate_info() -> &'static str {
    concat!("rollway-scene v", env!("CARGO_PKG_VERSION"))
}
