use rollway_assets::AssetLoadError;
use rollway_kernel::PhysicsError;

use crate::config::ConfigError;

/// Errors surfaced by scene composition and the frame tick.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Asset(#[from] AssetLoadError),
    #[error(transparent)]
    Physics(#[from] PhysicsError),
}
