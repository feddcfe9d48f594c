//! Read-only resources shared by every chunk.

use std::sync::Arc;

use crate::{
    config::WorldConfig,
    error::Result,
    rendering::texture_pack::{AtlasTexturePack, TexturePack},
    voxels::{block::catalog::BlockTypeCatalog, terrain::TerrainGenerator},
};

/// The block catalog, texture atlas lookup and height field.
///
/// Built once at startup and shared behind an `Arc`. Nothing in here is ever
/// mutated afterwards, so no locking is needed to read it from generation or
/// rebuild work on any thread.
pub struct WorldAssets {
    /// Static block properties
    pub catalog: BlockTypeCatalog,
    /// Atlas UV lookup for meshing
    pub texture_pack: Box<dyn TexturePack>,
    /// Terrain height field
    pub terrain: TerrainGenerator,
}

impl WorldAssets {
    /// Bundles the given resources.
    pub fn new(
        catalog: BlockTypeCatalog,
        texture_pack: Box<dyn TexturePack>,
        terrain: TerrainGenerator,
    ) -> Arc<Self> {
        Arc::new(WorldAssets {
            catalog,
            texture_pack,
            terrain,
        })
    }

    /// The built-in catalog, a 16x16 grid atlas and the height field of `config`.
    pub fn builtin(config: &WorldConfig) -> Result<Arc<Self>> {
        Ok(Self::new(
            BlockTypeCatalog::builtin()?,
            Box::new(AtlasTexturePack::default()),
            TerrainGenerator::from_config(config),
        ))
    }
}
