use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt;

use crate::geometry::GeometryBuffer;

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Surface description consumed by renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderMaterial {
    pub name: String,
    pub base_color: [f32; 4],
    pub roughness: f32,
    /// 0 is opaque, 1 is fully transmissive glass.
    pub transmission: f32,
    pub thickness: f32,
}

impl Default for RenderMaterial {
    fn default() -> Self {
        Self {
            name: "standard".into(),
            base_color: [1.0, 1.0, 1.0, 1.0],
            roughness: 1.0,
            transmission: 0.0,
            thickness: 0.0,
        }
    }
}

impl RenderMaterial {
    pub fn white() -> Self {
        Self {
            name: "white".into(),
            ..Self::default()
        }
    }

    /// Light-blue transmissive surface used for the track.
    pub fn track_glass() -> Self {
        Self {
            name: "track_glass".into(),
            base_color: [0.678, 0.847, 0.902, 1.0],
            roughness: 0.5,
            transmission: 1.0,
            thickness: 0.1,
        }
    }
}

/// An asset entry in the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Asset {
    Geometry(GeometryBuffer),
    Material(RenderMaterial),
}

/// Content-addressed asset store.
///
/// Registering identical content twice yields the same ID and one entry.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: BTreeMap<AssetId, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a geometry buffer and return its asset ID.
    pub fn register_geometry(&mut self, geometry: GeometryBuffer) -> AssetId {
        let id = geometry_hash(&geometry);
        tracing::trace!(%id, name = %geometry.name, "geometry registered");
        self.assets.entry(id).or_insert(Asset::Geometry(geometry));
        id
    }

    /// Register a material and return its asset ID.
    pub fn register_material(&mut self, material: RenderMaterial) -> AssetId {
        let id = material_hash(&material);
        self.assets.entry(id).or_insert(Asset::Material(material));
        id
    }

    pub fn get(&self, id: AssetId) -> Option<&Asset> {
        self.assets.get(&id)
    }

    pub fn get_geometry(&self, id: AssetId) -> Option<&GeometryBuffer> {
        match self.assets.get(&id) {
            Some(Asset::Geometry(g)) => Some(g),
            _ => None,
        }
    }

    pub fn get_material(&self, id: AssetId) -> Option<&RenderMaterial> {
        match self.assets.get(&id) {
            Some(Asset::Material(m)) => Some(m),
            _ => None,
        }
    }

    /// Number of registered assets.
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

fn truncate(hasher: Sha256) -> AssetId {
    let result = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&result[..8]);
    AssetId(u64::from_le_bytes(bytes))
}

fn geometry_hash(geometry: &GeometryBuffer) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(b"geometry");
    hasher.update(geometry.name.as_bytes());
    for v in &geometry.vertices {
        for c in v.to_array() {
            hasher.update(c.to_le_bytes());
        }
    }
    for tri in &geometry.indices {
        for i in tri {
            hasher.update(i.to_le_bytes());
        }
    }
    truncate(hasher)
}

fn material_hash(material: &RenderMaterial) -> AssetId {
    let mut hasher = Sha256::new();
    hasher.update(b"material");
    hasher.update(material.name.as_bytes());
    for c in material.base_color {
        hasher.update(c.to_le_bytes());
    }
    for p in [material.roughness, material.transmission, material.thickness] {
        hasher.update(p.to_le_bytes());
    }
    truncate(hasher)
}
