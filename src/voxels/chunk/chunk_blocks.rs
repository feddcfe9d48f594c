//! # Chunk Block Storage
//!
//! The dense cell array behind every chunk, and the terrain generator that fills it.
//!
//! Cells are stored in row-major order (x, then y, then z), one `Block` per cell,
//! so any cell is reachable in O(1) once its local coordinate has passed the
//! bounds predicate.

use cgmath::Point3;

use crate::{
    error::{Result, VoxelError},
    voxels::{
        block::{block_type::BlockType, Block},
        coordinate::{
            is_inside_chunk, Coordinate, BLOCKS_PER_CHUNK, BLOCKS_PER_X_DIMENSION,
            BLOCKS_PER_Y_DIMENSION, BLOCKS_PER_Z_DIMENSION,
        },
        terrain::TerrainGenerator,
    },
};

/// Number of cells in one x-y plane of a chunk.
const PLANE_SIZE: i32 = BLOCKS_PER_X_DIMENSION * BLOCKS_PER_Y_DIMENSION;

/// The cells of one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkBlocks {
    blocks: Vec<Block>,
}

impl ChunkBlocks {
    /// A chunk where every cell holds `block_type`.
    pub fn filled(block_type: BlockType) -> Self {
        ChunkBlocks {
            blocks: vec![Block::new(block_type); BLOCKS_PER_CHUNK],
        }
    }

    /// Generates the terrain of the chunk whose origin is `origin`.
    ///
    /// Every `(x, z)` column samples the height field at its global position. Walking
    /// the column upwards, the remaining height budget starts at the column height
    /// minus the chunk's global `y` and shrinks by one block per layer; a cell is
    /// `GRASS` while the budget is still positive and `AIR` afterwards.
    ///
    /// The result depends only on `origin` and the height field, so chunks generated
    /// separately still meet seamlessly.
    pub fn generate(origin: Coordinate, terrain: &TerrainGenerator) -> Self {
        let mut chunk_blocks = Self::filled(BlockType::AIR);

        for x in 0..BLOCKS_PER_X_DIMENSION {
            for z in 0..BLOCKS_PER_Z_DIMENSION {
                let mut height_of_column =
                    terrain.column_height(origin.x + x, origin.z + z) - origin.y as f64;

                for y in 0..BLOCKS_PER_Y_DIMENSION {
                    if height_of_column > 0.0 {
                        chunk_blocks.blocks[Self::index(x, y, z)] = Block::new(BlockType::GRASS);
                    }
                    height_of_column -= 1.0;
                }
            }
        }

        chunk_blocks
    }

    /// Linear index of an in-bounds cell.
    fn index(x: i32, y: i32, z: i32) -> usize {
        (x + BLOCKS_PER_X_DIMENSION * y + PLANE_SIZE * z) as usize
    }

    fn coordinate_of(index: usize) -> Coordinate {
        let index = index as i32;
        Point3::new(
            index % BLOCKS_PER_X_DIMENSION,
            (index / BLOCKS_PER_X_DIMENSION) % BLOCKS_PER_Y_DIMENSION,
            index / PLANE_SIZE,
        )
    }

    /// The block at `local`, or `None` when `local` lies outside the chunk.
    pub fn try_get(&self, local: Coordinate) -> Option<Block> {
        is_inside_chunk(local).then(|| self.blocks[Self::index(local.x, local.y, local.z)])
    }

    /// The block at `local`.
    ///
    /// # Errors
    /// `VoxelError::OutOfBounds` when `local` lies outside the chunk.
    pub fn get(&self, local: Coordinate) -> Result<Block> {
        self.try_get(local)
            .ok_or(VoxelError::OutOfBounds { coordinate: local })
    }

    /// Mutable access to the block at `local`.
    ///
    /// # Errors
    /// `VoxelError::OutOfBounds` when `local` lies outside the chunk.
    pub fn get_mut(&mut self, local: Coordinate) -> Result<&mut Block> {
        if !is_inside_chunk(local) {
            return Err(VoxelError::OutOfBounds { coordinate: local });
        }
        Ok(&mut self.blocks[Self::index(local.x, local.y, local.z)])
    }

    /// Every cell with its local coordinate, in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Coordinate, Block)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (Self::coordinate_of(index), *block))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoiseSettings;

    #[test]
    fn storage_order_matches_coordinates() {
        let mut chunk_blocks = ChunkBlocks::filled(BlockType::AIR);
        let target = Point3::new(3, 7, 11);
        chunk_blocks.get_mut(target).unwrap().set_block_type(BlockType::STONE);

        let (found, _) = chunk_blocks
            .iter()
            .find(|(_, block)| block.block_type() == BlockType::STONE)
            .unwrap();
        assert_eq!(found, target);
    }

    #[test]
    fn out_of_bounds_access_is_reported_not_clamped() {
        let mut chunk_blocks = ChunkBlocks::filled(BlockType::AIR);
        let outside = Point3::new(16, 0, 0);
        assert!(matches!(
            chunk_blocks.get(outside),
            Err(VoxelError::OutOfBounds { coordinate }) if coordinate == outside
        ));
        assert!(chunk_blocks.get_mut(Point3::new(0, -1, 0)).is_err());
        assert_eq!(chunk_blocks.try_get(Point3::new(0, 0, 16)), None);
    }

    #[test]
    fn columns_are_solid_up_to_their_height() {
        let terrain = TerrainGenerator::new(NoiseSettings::default(), 48.0);
        let origin = Point3::new(32, 16, -16);
        let chunk_blocks = ChunkBlocks::generate(origin, &terrain);

        for (local, block) in chunk_blocks.iter() {
            let height = terrain.column_height(origin.x + local.x, origin.z + local.z);
            let expected_solid = height - (origin.y + local.y) as f64 > 0.0;
            assert_eq!(!block.is_air(), expected_solid, "{local:?}");
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let origin = Point3::new(-48, 0, 80);
        let first = ChunkBlocks::generate(
            origin,
            &TerrainGenerator::new(NoiseSettings::default(), 48.0),
        );
        // Unrelated generation in between must not influence the result.
        let _ = ChunkBlocks::generate(
            Point3::new(0, 0, 0),
            &TerrainGenerator::new(NoiseSettings::default(), 48.0),
        );
        let second = ChunkBlocks::generate(
            origin,
            &TerrainGenerator::new(NoiseSettings::default(), 48.0),
        );
        assert_eq!(first, second);
    }
}
