//! Asset layer: static geometry buffers and render materials.
//!
//! Assets are identified by content-addressed hashes. Render nodes refer to
//! geometry and materials by [`AssetId`], never by file path.
//!
//! # Sources
//! - JSON geometry buffers (`vertices` + triangle `indices`) loaded from disk
//!   for the track.
//! - Procedural meshes for the simple props (cylinder, box, sphere) and a
//!   built-in trough used when no track buffer is configured.

pub mod geometry;
pub mod procedural;
mod store;

pub use geometry::{AssetLoadError, GeometryBuffer};
pub use store::{Asset, AssetId, AssetStore, RenderMaterial};

pub fn crate_info() -> &'static str {
    concat!("rollway-assets v", env!("CARGO_PKG_VERSION"))
}
