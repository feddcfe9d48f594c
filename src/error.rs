//! # Error Module
//!
//! The crate-wide error type.
//!
//! Only programming errors and loading failures are represented here. The two
//! expected outcomes of world queries are not errors:
//! - a coordinate whose chunk is not resident is reported as `None`
//! - a rejected block placement is reported as `false`

use thiserror::Error;

use crate::voxels::{block::block_type::BlockType, coordinate::Coordinate};

/// Errors raised by chunk storage, block catalogs and configuration loading.
#[derive(Debug, Error)]
pub enum VoxelError {
    /// A local coordinate fell outside `[0, DIM)` on some axis.
    ///
    /// This signals broken coordinate arithmetic upstream and must never be
    /// clamped or wrapped.
    #[error(
        "local coordinate ({}, {}, {}) is outside the chunk",
        coordinate.x,
        coordinate.y,
        coordinate.z
    )]
    OutOfBounds {
        /// The offending local coordinate
        coordinate: Coordinate,
    },

    /// An enum value (face, direction, setting) that this crate does not support.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A block catalog referenced a numeric block id with no matching `BlockType`.
    #[error("unknown block id {0}")]
    UnknownBlockId(u8),

    /// A block catalog is missing a type the world cannot work without.
    #[error("block catalog does not define {0:?}")]
    MissingBlockType(BlockType),

    /// Reading a catalog or configuration file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// A catalog or configuration file was not valid JSON for its schema.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
