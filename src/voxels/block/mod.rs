//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block faces and directions, the block type
//! catalog, and the per-cell `Block` value stored in chunks.

use block_side::BlockSide;
use block_type::BlockType;
use catalog::{BlockDefinition, BlockTypeCatalog, TextureId};

pub mod block_side;
pub mod block_type;
pub mod catalog;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight structure that stores only the block's type id. Every
/// other property (transparency, collision, textures) is looked up from the
/// [`BlockTypeCatalog`] by that id, so changing a block's type in place changes
/// all of its properties at once.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute ensures a consistent memory layout, and the type is
/// `Pod` so a chunk's cells can be viewed as plain bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    block_type: BlockTypeSize,
}

impl Block {
    /// Creates a new block of the specified type.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type.id(),
        }
    }

    /// The block's type.
    ///
    /// Cells are only ever written through `Block::new`/`set_block_type`, so the
    /// stored id always names a valid variant; an unknown id reads as `AIR`.
    pub fn block_type(&self) -> BlockType {
        BlockType::from_id(self.block_type).unwrap_or(BlockType::AIR)
    }

    /// Changes the block's type in place.
    pub fn set_block_type(&mut self, block_type: BlockType) {
        self.block_type = block_type.id();
    }

    /// Returns `true` for air.
    pub fn is_air(&self) -> bool {
        self.block_type() == BlockType::AIR
    }

    /// Catalog entry for this block's type.
    pub fn definition<'a>(&self, catalog: &'a BlockTypeCatalog) -> &'a BlockDefinition {
        catalog.lookup(self.block_type())
    }

    /// Whether faces behind this block stay visible.
    pub fn is_transparent(&self, catalog: &BlockTypeCatalog) -> bool {
        self.definition(catalog).transparent
    }

    /// Whether this block stops physical bodies.
    pub fn is_collidable(&self, catalog: &BlockTypeCatalog) -> bool {
        self.definition(catalog).collidable
    }

    /// The atlas texture drawn on the given face.
    pub fn texture_id(&self, catalog: &BlockTypeCatalog, side: BlockSide) -> TextureId {
        catalog.texture_id(self.block_type(), side)
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::new(BlockType::AIR)
    }
}
