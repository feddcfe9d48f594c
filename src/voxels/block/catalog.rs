//! # Block Type Catalog
//!
//! Data-driven static properties for every [`BlockType`]: display name, per-face
//! texture ids, transparency and collidability.
//!
//! Catalogs are parsed from JSON files shaped like:
//!
//! ```json
//! { "blocks": [
//!     { "id": 1, "name": "Grass", "texture": 2, "texture_top": 3, "texture_bottom": 1 }
//! ] }
//! ```
//!
//! Texture resolution for a face, most specific first:
//! 1. the per-face key (`texture_top`, `texture_left`, ...)
//! 2. `texture_side`, for the four side faces
//! 3. `texture`
//!
//! A catalog is loaded once at startup and is read-only afterwards, so it is
//! shared between threads behind an `Arc` without any locking.

use std::{collections::HashMap, fs, path::Path};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::{block_side::BlockSide, block_type::BlockType, BlockTypeSize};
use crate::error::{Result, VoxelError};

/// Index of a texture inside the texture atlas.
pub type TextureId = u32;

const BUILTIN_BLOCKS: &str = include_str!("../../../resources/blocks.json");

/// One entry of a catalog file, as written on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockDefinitionFile {
    /// Numeric `BlockType` id
    pub id: BlockTypeSize,
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Texture used on every face unless overridden
    #[serde(default)]
    pub texture: Option<TextureId>,
    /// Texture used on the four side faces unless overridden
    #[serde(default)]
    pub texture_side: Option<TextureId>,
    /// Override for the top face
    #[serde(default)]
    pub texture_top: Option<TextureId>,
    /// Override for the bottom face
    #[serde(default)]
    pub texture_bottom: Option<TextureId>,
    /// Override for the left face
    #[serde(default)]
    pub texture_left: Option<TextureId>,
    /// Override for the right face
    #[serde(default)]
    pub texture_right: Option<TextureId>,
    /// Override for the front face
    #[serde(default)]
    pub texture_front: Option<TextureId>,
    /// Override for the back face
    #[serde(default)]
    pub texture_back: Option<TextureId>,
    /// Faces behind a transparent block stay visible
    #[serde(default)]
    pub transparent: bool,
    /// Whether the block stops physical bodies
    #[serde(default = "default_collidable")]
    pub collidable: bool,
}

fn default_collidable() -> bool {
    true
}

/// Top-level shape of a catalog file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlocksFile {
    /// Every block defined by the file
    pub blocks: Vec<BlockDefinitionFile>,
}

/// Resolved, immutable properties of a block type.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockDefinition {
    /// The type this entry describes
    pub block_type: BlockType,
    /// Display name
    pub name: String,
    /// Texture per face, indexed by `BlockSide as usize`
    pub textures: [TextureId; 6],
    /// Faces behind a transparent block stay visible
    pub transparent: bool,
    /// Whether the block stops physical bodies
    pub collidable: bool,
}

impl BlockDefinition {
    fn from_file(entry: BlockDefinitionFile) -> Result<Self> {
        let block_type = BlockType::from_id(entry.id)?;
        let base = entry.texture.unwrap_or(0);
        let side = entry.texture_side.unwrap_or(base);

        let mut textures = [base; 6];
        textures[BlockSide::FRONT as usize] = entry.texture_front.unwrap_or(side);
        textures[BlockSide::BACK as usize] = entry.texture_back.unwrap_or(side);
        textures[BlockSide::LEFT as usize] = entry.texture_left.unwrap_or(side);
        textures[BlockSide::RIGHT as usize] = entry.texture_right.unwrap_or(side);
        textures[BlockSide::TOP as usize] = entry.texture_top.unwrap_or(base);
        textures[BlockSide::BOTTOM as usize] = entry.texture_bottom.unwrap_or(base);

        Ok(BlockDefinition {
            block_type,
            name: entry.name.unwrap_or_else(|| "Unnamed Block".to_string()),
            textures,
            transparent: entry.transparent,
            collidable: entry.collidable,
        })
    }
}

/// Maps every block type to its static properties.
#[derive(Debug, Clone)]
pub struct BlockTypeCatalog {
    definitions: HashMap<BlockType, BlockDefinition>,
    /// Answer for types no file defined: an opaque, collidable, untextured block.
    fallback: BlockDefinition,
}

impl BlockTypeCatalog {
    fn empty() -> Self {
        BlockTypeCatalog {
            definitions: HashMap::new(),
            fallback: BlockDefinition {
                block_type: BlockType::STONE,
                name: "Unnamed Block".to_string(),
                textures: [0; 6],
                transparent: false,
                collidable: true,
            },
        }
    }

    /// The catalog compiled into the crate from `resources/blocks.json`.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_BLOCKS)
    }

    /// Parses a single catalog document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut catalog = Self::empty();
        catalog.register_json(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Reads and parses a single catalog file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let catalog = Self::from_json_str(&content)?;
        info!(
            "Loaded {} block types from {}",
            catalog.definitions.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Merges every `*.json` file below `dir` (recursively, in path order) into one catalog.
    ///
    /// Later files override earlier definitions of the same id.
    pub fn load_from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut files = Vec::new();
        collect_json_files(dir.as_ref(), &mut files)?;
        files.sort();

        let mut catalog = Self::empty();
        for file in &files {
            let content = fs::read_to_string(file)?;
            catalog.register_json(&content)?;
        }
        catalog.validate()?;

        info!(
            "Loaded {} block types from {} file(s) under {}",
            catalog.definitions.len(),
            files.len(),
            dir.as_ref().display()
        );
        Ok(catalog)
    }

    fn register_json(&mut self, json: &str) -> Result<()> {
        let file: BlocksFile = serde_json::from_str(json)?;
        for entry in file.blocks {
            let definition = BlockDefinition::from_file(entry)?;
            self.definitions.insert(definition.block_type, definition);
        }
        Ok(())
    }

    /// Terrain generation writes `GRASS` and `AIR`, edits write `AIR`.
    fn validate(&self) -> Result<()> {
        for required in [BlockType::AIR, BlockType::GRASS] {
            if !self.definitions.contains_key(&required) {
                return Err(VoxelError::MissingBlockType(required));
            }
        }
        Ok(())
    }

    /// Static properties of `block_type`.
    pub fn lookup(&self, block_type: BlockType) -> &BlockDefinition {
        match self.definitions.get(&block_type) {
            Some(definition) => definition,
            None => {
                warn!("No catalog entry for {:?}, using fallback", block_type);
                &self.fallback
            }
        }
    }

    /// Texture drawn on `side` of a `block_type` block.
    pub fn texture_id(&self, block_type: BlockType, side: BlockSide) -> TextureId {
        self.lookup(block_type).textures[side as usize]
    }

    /// Number of defined block types.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always `false` for a validated catalog.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

fn collect_json_files(dir: &Path, files: &mut Vec<std::path::PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_json_files(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_describes_air_and_grass() {
        let catalog = BlockTypeCatalog::builtin().unwrap();
        let air = catalog.lookup(BlockType::AIR);
        assert!(air.transparent);
        assert!(!air.collidable);

        let grass = catalog.lookup(BlockType::GRASS);
        assert_eq!(grass.name, "Grass");
        assert!(!grass.transparent);
        assert!(grass.collidable);
    }

    #[test]
    fn face_textures_resolve_most_specific_first() {
        let catalog = BlockTypeCatalog::from_json_str(
            r#"{ "blocks": [
                { "id": 0, "name": "Air", "transparent": true, "collidable": false },
                { "id": 1, "texture": 7, "texture_side": 8, "texture_top": 9, "texture_left": 10 }
            ] }"#,
        )
        .unwrap();

        assert_eq!(catalog.texture_id(BlockType::GRASS, BlockSide::TOP), 9);
        assert_eq!(catalog.texture_id(BlockType::GRASS, BlockSide::BOTTOM), 7);
        assert_eq!(catalog.texture_id(BlockType::GRASS, BlockSide::LEFT), 10);
        assert_eq!(catalog.texture_id(BlockType::GRASS, BlockSide::FRONT), 8);
        assert_eq!(catalog.lookup(BlockType::GRASS).name, "Unnamed Block");
    }

    #[test]
    fn missing_required_types_are_rejected() {
        let result = BlockTypeCatalog::from_json_str(r#"{ "blocks": [ { "id": 0 } ] }"#);
        assert!(matches!(result, Err(VoxelError::MissingBlockType(BlockType::GRASS))));
    }

    #[test]
    fn unknown_ids_and_bad_json_fail_to_load() {
        assert!(matches!(
            BlockTypeCatalog::from_json_str(r#"{ "blocks": [ { "id": 99 } ] }"#),
            Err(VoxelError::UnknownBlockId(99))
        ));
        assert!(matches!(
            BlockTypeCatalog::from_json_str("not json"),
            Err(VoxelError::Parse(_))
        ));
    }

    #[test]
    fn undefined_types_fall_back_to_an_opaque_block() {
        let catalog = BlockTypeCatalog::from_json_str(
            r#"{ "blocks": [ { "id": 0, "transparent": true }, { "id": 1 } ] }"#,
        )
        .unwrap();
        let wood = catalog.lookup(BlockType::WOOD);
        assert!(!wood.transparent);
        assert!(wood.collidable);
    }

    #[test]
    fn directory_files_merge_in_path_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("a_base.json"),
            r#"{ "blocks": [
                { "id": 0, "name": "Air", "transparent": true, "collidable": false },
                { "id": 1, "name": "Grass", "texture": 1 },
                { "id": 3, "name": "Stone", "texture": 3 }
            ] }"#,
        )
        .unwrap();
        fs::create_dir(dir.path().join("b_mods")).unwrap();
        fs::write(
            dir.path().join("b_mods").join("meadow.json"),
            r#"{ "blocks": [ { "id": 1, "name": "Meadow", "texture": 12 } ] }"#,
        )
        .unwrap();
        fs::write(dir.path().join("notes.txt"), "not a catalog").unwrap();

        let catalog = BlockTypeCatalog::load_from_directory(dir.path()).unwrap();

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.lookup(BlockType::GRASS).name, "Meadow");
        assert_eq!(catalog.texture_id(BlockType::GRASS, BlockSide::TOP), 12);
        assert_eq!(catalog.lookup(BlockType::STONE).name, "Stone");
    }

    #[test]
    fn directory_without_required_types_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("stone.json"), r#"{ "blocks": [ { "id": 3 } ] }"#).unwrap();

        assert!(matches!(
            BlockTypeCatalog::load_from_directory(dir.path()),
            Err(VoxelError::MissingBlockType(BlockType::AIR))
        ));
    }
}
