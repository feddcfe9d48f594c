//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world.
//! Static properties of each type (textures, transparency, collision) are not
//! hard-coded here; they come from the data-driven [`BlockTypeCatalog`].
//!
//! [`BlockTypeCatalog`]: super::catalog::BlockTypeCatalog

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

use super::BlockTypeSize;
use crate::error::{Result, VoxelError};

/// Enumerates all possible block types in the voxel world.
///
/// The `FromPrimitive` derive allows conversion from the numeric ids used in
/// block catalog files.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, Serialize, Deserialize)]
pub enum BlockType {
    /// Empty space. Terrain generation fills everything above the surface with it.
    AIR = 0,

    /// The surface block produced by terrain generation.
    GRASS = 1,

    /// A basic dirt block.
    DIRT = 2,

    /// Stone.
    STONE = 3,

    /// Water. Transparent, and not collidable in the default catalog.
    WATER = 4,

    /// Glass. Transparent but collidable.
    GLASS = 5,

    /// A wooden block with a bark texture on the sides.
    WOOD = 6,
}

impl BlockType {
    /// Converts a compact `BlockTypeSize` into a `BlockType`.
    ///
    /// # Errors
    /// `VoxelError::UnknownBlockId` if no variant carries that value.
    pub fn from_id(btype: BlockTypeSize) -> Result<Self> {
        num::FromPrimitive::from_u8(btype).ok_or(VoxelError::UnknownBlockId(btype))
    }

    /// The compact id stored in chunk cells.
    pub fn id(self) -> BlockTypeSize {
        self as BlockTypeSize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_the_compact_form() {
        for block_type in [BlockType::AIR, BlockType::GRASS, BlockType::WOOD] {
            assert_eq!(BlockType::from_id(block_type.id()).ok(), Some(block_type));
        }
    }

    #[test]
    fn unknown_ids_are_rejected() {
        assert!(matches!(BlockType::from_id(42), Err(VoxelError::UnknownBlockId(42))));
    }
}
