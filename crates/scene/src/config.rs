//! Scene configuration, loaded from YAML.
//!
//! Every field has a default matching the reference course, so an empty
//! document is a valid config:
//!
//! ```yaml
//! dt: 0.016666668
//! debug: true
//! box_length: 4.0
//! sphere:
//!   restitution: 0.65
//! track: assets/track.json
//! ```

use glam::Vec3;
use rollway_driver::KinematicDriver;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Dynamic sphere parameters shared by every sphere in the course.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SphereConfig {
    pub radius: f32,
    pub restitution: f32,
}

impl Default for SphereConfig {
    fn default() -> Self {
        Self {
            radius: 0.5,
            restitution: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ActorConfig {
    pub half_extents: Vec3,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            half_extents: Vec3::new(1.5, 0.25, 1.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SceneConfig {
    pub gravity: Vec3,
    /// Fixed frame step in seconds.
    pub dt: f32,
    /// Produce the physics debug overlay each frame.
    pub debug: bool,
    pub driver: KinematicDriver,
    pub actor: ActorConfig,
    /// Length of boxes that do not set their own.
    pub box_length: f32,
    pub sphere: SphereConfig,
    /// JSON geometry buffer for the track. The built-in trough is used when
    /// unset.
    pub track: Option<PathBuf>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            dt: 1.0 / 60.0,
            debug: false,
            driver: KinematicDriver::default(),
            actor: ActorConfig::default(),
            box_length: 4.0,
            sphere: SphereConfig::default(),
            track: None,
        }
    }
}

impl SceneConfig {
    /// Parse and validate a YAML document. `origin` is only used in errors.
    pub fn from_yaml_str(source: &str, origin: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(source).map_err(|source| ConfigError::Parse {
            path: origin.as_ref().to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file. A relative `track` path is resolved against the
    /// file's directory.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_yaml_str(&data, path)?;
        if let (Some(track), Some(dir)) = (&config.track, path.parent()) {
            if track.is_relative() {
                config.track = Some(dir.join(track));
            }
        }
        tracing::debug!(path = %path.display(), "scene config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |field, reason: String| Err(ConfigError::Invalid { field, reason });
        if !self.gravity.is_finite() {
            return invalid("gravity", format!("{} is not finite", self.gravity));
        }
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return invalid("dt", format!("must be finite and > 0, got {}", self.dt));
        }
        if !(self.box_length.is_finite() && self.box_length > 0.0) {
            return invalid(
                "box_length",
                format!("must be finite and > 0, got {}", self.box_length),
            );
        }
        if !(self.sphere.radius.is_finite() && self.sphere.radius > 0.0) {
            return invalid(
                "sphere.radius",
                format!("must be finite and > 0, got {}", self.sphere.radius),
            );
        }
        if !(self.sphere.restitution.is_finite() && self.sphere.restitution >= 0.0) {
            return invalid(
                "sphere.restitution",
                format!("must be finite and >= 0, got {}", self.sphere.restitution),
            );
        }
        let he = self.actor.half_extents;
        if !he.is_finite() || he.min_element() <= 0.0 {
            return invalid("actor.half_extents", format!("must be positive, got {he}"));
        }
        if !self.driver.is_finite() {
            return invalid("driver", "wave parameters must be finite".into());
        }
        Ok(())
    }
}
