//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the six axis-aligned
//! directions used to step from one block (or chunk) to its neighbour.

use cgmath::Vector3;
use num_derive::FromPrimitive;

use crate::error::{Result, VoxelError};

/// Represents the six possible faces of a voxel block.
///
/// Each variant is assigned a unique integer value so faces can index per-face
/// tables (textures, mesh statistics).
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The direction a face points towards, i.e. where its neighbouring block lives.
    pub fn direction(self) -> Direction {
        match self {
            BlockSide::FRONT => Direction::InFront,
            BlockSide::BACK => Direction::Behind,
            BlockSide::BOTTOM => Direction::Below,
            BlockSide::TOP => Direction::Above,
            BlockSide::LEFT => Direction::ToTheLeft,
            BlockSide::RIGHT => Direction::ToTheRight,
        }
    }
}

impl TryFrom<u8> for BlockSide {
    type Error = VoxelError;

    fn try_from(value: u8) -> Result<Self> {
        num::FromPrimitive::from_u8(value)
            .ok_or_else(|| VoxelError::InvalidArgument(format!("unsupported block side {value}")))
    }
}

/// An axis-aligned step to a neighbouring block or chunk.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, FromPrimitive)]
pub enum Direction {
    /// +Y
    Above = 0,
    /// -Y
    Below = 1,
    /// -X
    ToTheLeft = 2,
    /// +X
    ToTheRight = 3,
    /// +Z
    InFront = 4,
    /// -Z
    Behind = 5,
}

impl Direction {
    /// All six directions.
    pub fn all() -> [Direction; 6] {
        [
            Direction::Above,
            Direction::Below,
            Direction::ToTheLeft,
            Direction::ToTheRight,
            Direction::InFront,
            Direction::Behind,
        ]
    }

    /// Unit offset of one step in this direction.
    pub fn offset(self) -> Vector3<i32> {
        match self {
            Direction::Above => Vector3::new(0, 1, 0),
            Direction::Below => Vector3::new(0, -1, 0),
            Direction::ToTheLeft => Vector3::new(-1, 0, 0),
            Direction::ToTheRight => Vector3::new(1, 0, 0),
            Direction::InFront => Vector3::new(0, 0, 1),
            Direction::Behind => Vector3::new(0, 0, -1),
        }
    }

    /// The direction pointing back the way this one came.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::Above => Direction::Below,
            Direction::Below => Direction::Above,
            Direction::ToTheLeft => Direction::ToTheRight,
            Direction::ToTheRight => Direction::ToTheLeft,
            Direction::InFront => Direction::Behind,
            Direction::Behind => Direction::InFront,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = VoxelError;

    fn try_from(value: u8) -> Result<Self> {
        num::FromPrimitive::from_u8(value)
            .ok_or_else(|| VoxelError::InvalidArgument(format!("unsupported direction {value}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_side_has_a_distinct_direction() {
        let directions: std::collections::HashSet<Direction> =
            BlockSide::all().iter().map(|side| side.direction()).collect();
        assert_eq!(directions.len(), 6);
    }

    #[test]
    fn opposite_offsets_cancel() {
        for direction in Direction::all() {
            assert_eq!(direction.offset() + direction.opposite().offset(), Vector3::new(0, 0, 0));
        }
    }

    #[test]
    fn raw_values_out_of_range_are_invalid_arguments() {
        assert_eq!(BlockSide::try_from(3).ok(), Some(BlockSide::TOP));
        assert!(matches!(BlockSide::try_from(6), Err(VoxelError::InvalidArgument(_))));
        assert!(matches!(Direction::try_from(200), Err(VoxelError::InvalidArgument(_))));
    }
}
