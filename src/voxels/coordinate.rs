//! # Coordinate Module
//!
//! Integer block coordinates and the conversions between the three spaces the
//! world uses:
//!
//! * **global block coordinates** - absolute block positions
//! * **local block coordinates** - relative to a chunk origin, `[0, DIM)` per axis
//! * **world units** - the floating point space renderers and physics work in
//!
//! A chunk is identified by its *chunk key*: its origin divided by the chunk
//! dimensions. Division always rounds towards negative infinity so that
//! global block `-1` lands in chunk `-1`, not chunk `0`.

use cgmath::{Point3, Vector3};

/// An integer 3-vector in block units.
pub type Coordinate = Point3<i32>;

/// A chunk's identity: its origin quantized to the chunk grid.
pub type ChunkKey = Point3<i32>;

/// Chunk width in blocks.
pub const BLOCKS_PER_X_DIMENSION: i32 = 16;
/// Chunk height in blocks.
pub const BLOCKS_PER_Y_DIMENSION: i32 = 16;
/// Chunk depth in blocks.
pub const BLOCKS_PER_Z_DIMENSION: i32 = 16;
/// Number of cells stored by one chunk.
pub const BLOCKS_PER_CHUNK: usize =
    (BLOCKS_PER_X_DIMENSION * BLOCKS_PER_Y_DIMENSION * BLOCKS_PER_Z_DIMENSION) as usize;

/// Edge length of one block in world units.
pub const BLOCK_SIZE: f32 = 1.0;

/// Converts a global block coordinate to the world-space position of the block's
/// minimum corner.
pub fn block_to_world(coordinate: Coordinate) -> Point3<f32> {
    Point3::new(
        coordinate.x as f32 * BLOCK_SIZE,
        coordinate.y as f32 * BLOCK_SIZE,
        coordinate.z as f32 * BLOCK_SIZE,
    )
}

/// Returns the global block coordinate of the cell containing a world-space point.
pub fn world_to_block(position: Point3<f32>) -> Coordinate {
    Point3::new(
        (position.x / BLOCK_SIZE).floor() as i32,
        (position.y / BLOCK_SIZE).floor() as i32,
        (position.z / BLOCK_SIZE).floor() as i32,
    )
}

/// Returns the key of the chunk owning a global block coordinate.
pub fn chunk_key_of(global: Coordinate) -> ChunkKey {
    Point3::new(
        global.x.div_euclid(BLOCKS_PER_X_DIMENSION),
        global.y.div_euclid(BLOCKS_PER_Y_DIMENSION),
        global.z.div_euclid(BLOCKS_PER_Z_DIMENSION),
    )
}

/// Returns the global block coordinate of a chunk's origin.
pub fn chunk_origin(key: ChunkKey) -> Coordinate {
    Point3::new(
        key.x * BLOCKS_PER_X_DIMENSION,
        key.y * BLOCKS_PER_Y_DIMENSION,
        key.z * BLOCKS_PER_Z_DIMENSION,
    )
}

/// Converts a local coordinate into a global one for the chunk at `origin`.
pub fn local_to_global(origin: Coordinate, local: Coordinate) -> Coordinate {
    origin + Vector3::new(local.x, local.y, local.z)
}

/// Converts a global coordinate into one local to the chunk at `origin`.
///
/// The result is only inside the chunk when the chunk actually owns `global`.
pub fn global_to_local(origin: Coordinate, global: Coordinate) -> Coordinate {
    Point3::new(global.x - origin.x, global.y - origin.y, global.z - origin.z)
}

/// Bounds predicate for local coordinates.
pub fn is_inside_chunk(local: Coordinate) -> bool {
    (0..BLOCKS_PER_X_DIMENSION).contains(&local.x)
        && (0..BLOCKS_PER_Y_DIMENSION).contains(&local.y)
        && (0..BLOCKS_PER_Z_DIMENSION).contains(&local.z)
}

/// Chebyshev distance between two chunk keys, in chunks.
pub fn chunk_distance(a: ChunkKey, b: ChunkKey) -> i32 {
    (a.x - b.x)
        .abs()
        .max((a.y - b.y).abs())
        .max((a.z - b.z).abs())
}

/// Total order on chunk keys (x, then y, then z) used wherever iteration order
/// must be reproducible.
pub fn key_order(key: &ChunkKey) -> (i32, i32, i32) {
    (key.x, key.y, key.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_global_round_trip() {
        for origin in [Point3::new(0, 0, 0), Point3::new(-16, 32, -48)] {
            for local in [
                Point3::new(0, 0, 0),
                Point3::new(15, 15, 15),
                Point3::new(3, 9, 14),
            ] {
                let global = local_to_global(origin, local);
                assert_eq!(global_to_local(origin, global), local);
            }
        }
    }

    #[test]
    fn negative_coordinates_floor_into_lower_chunk() {
        assert_eq!(chunk_key_of(Point3::new(-1, 0, 15)), Point3::new(-1, 0, 0));
        assert_eq!(chunk_key_of(Point3::new(-16, -17, 16)), Point3::new(-1, -2, 1));
        assert_eq!(chunk_origin(Point3::new(-1, 2, 0)), Point3::new(-16, 32, 0));
    }

    #[test]
    fn world_positions_floor_to_cells() {
        assert_eq!(world_to_block(Point3::new(-0.5, 0.0, 2.99)), Point3::new(-1, 0, 2));
        assert_eq!(block_to_world(Point3::new(2, -3, 0)), Point3::new(2.0, -3.0, 0.0));
    }

    #[test]
    fn bounds_predicate_rejects_every_face_of_the_cube() {
        assert!(is_inside_chunk(Point3::new(0, 15, 7)));
        assert!(!is_inside_chunk(Point3::new(16, 0, 0)));
        assert!(!is_inside_chunk(Point3::new(0, -1, 0)));
        assert!(!is_inside_chunk(Point3::new(0, 0, 16)));
    }
}
