use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating geometry assets.
#[derive(Debug, thiserror::Error)]
pub enum AssetLoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse geometry buffer {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("geometry `{name}` is malformed: {reason}")]
    Malformed { name: String, reason: String },
}

/// Opaque vertex + triangle-index buffer.
///
/// On disk this is JSON:
/// `{"name": "track", "vertices": [[x, y, z], ...], "indices": [[a, b, c], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeometryBuffer {
    pub name: String,
    pub vertices: Vec<Vec3>,
    #[serde(default)]
    pub indices: Vec<[u32; 3]>,
}

impl GeometryBuffer {
    pub fn new(name: impl Into<String>, vertices: Vec<Vec3>, indices: Vec<[u32; 3]>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.vertices.first()?;
        Some(
            self.vertices
                .iter()
                .fold((first, first), |(lo, hi), v| (lo.min(*v), hi.max(*v))),
        )
    }

    /// Structural check: finite vertices, in-range indices, at least one
    /// triangle. Degenerate triangles are left to the physics layer.
    pub fn validate(&self) -> Result<(), AssetLoadError> {
        let malformed = |reason: String| AssetLoadError::Malformed {
            name: self.name.clone(),
            reason,
        };
        if self.vertices.is_empty() {
            return Err(malformed("no vertices".into()));
        }
        if let Some(i) = self.vertices.iter().position(|v| !v.is_finite()) {
            return Err(malformed(format!("vertex {i} is not finite")));
        }
        if self.indices.is_empty() {
            return Err(malformed("no triangles".into()));
        }
        let n = self.vertices.len() as u32;
        if let Some((t, tri)) = self
            .indices
            .iter()
            .enumerate()
            .find(|(_, tri)| tri.iter().any(|&i| i >= n))
        {
            return Err(malformed(format!(
                "triangle {t} {tri:?} indexes past {n} vertices"
            )));
        }
        Ok(())
    }

    /// Parse and validate a buffer from a JSON string.
    pub fn from_json_str(source: &str, origin: impl AsRef<Path>) -> Result<Self, AssetLoadError> {
        let buffer: Self = serde_json::from_str(source).map_err(|source| AssetLoadError::Parse {
            path: origin.as_ref().to_path_buf(),
            source,
        })?;
        buffer.validate()?;
        Ok(buffer)
    }

    /// Load and validate a buffer file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, AssetLoadError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| AssetLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let buffer = Self::from_json_str(&data, path)?;
        tracing::debug!(
            path = %path.display(),
            name = %buffer.name,
            vertices = buffer.vertices.len(),
            triangles = buffer.triangle_count(),
            "geometry buffer loaded"
        );
        Ok(buffer)
    }

    /// Write the buffer as JSON.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), AssetLoadError> {
        let path = path.as_ref();
        let io_err = |source| AssetLoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let file = std::fs::File::create(path).map_err(io_err)?;
        serde_json::to_writer(file, self).map_err(|source| AssetLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(())
    }
}
