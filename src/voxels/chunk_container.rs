//! # Chunk Container Module
//!
//! This module provides the `ChunkContainer`, the spatial index of every loaded chunk.
//!
//! ## Responsibilities
//!
//! - Mapping chunk-grid coordinates to shared chunk handles
//! - Resolving global block coordinates to a `(chunk, local coordinate)` pair
//! - World-level queries spanning several chunks (AABB collision, block enumeration)
//! - Coordinated edits: changing one cell and scheduling every mesh that depends on it
//!
//! ## Thread Safety
//!
//! The index sits behind a single `RwLock`. Every method takes the lock only long
//! enough to look up or clone handles, and never calls into a chunk while holding it,
//! so a chunk may freely query the container from inside its own rebuild.
//!
//! Chunks are handed out as `Arc<Chunk>`: a handle obtained before an eviction keeps
//! its chunk alive, but a later lookup of the same coordinate reports it as absent.

use std::{
    collections::{hash_map::Entry, HashMap},
    ops::ControlFlow,
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use cgmath::Point3;
use log::{debug, warn};

use crate::voxels::{
    aabb::Aabb,
    block::{block_side::Direction, block_type::BlockType, Block},
    chunk::Chunk,
    coordinate::{
        chunk_key_of, global_to_local, key_order, ChunkKey, Coordinate, BLOCKS_PER_X_DIMENSION,
        BLOCKS_PER_Y_DIMENSION, BLOCKS_PER_Z_DIMENSION,
    },
};

/// Shared ownership handle to a loaded chunk.
pub type ChunkHandle = Arc<Chunk>;

/// Block types a placement may overwrite when the caller has no preference.
pub const DEFAULT_OVERWRITE_WHITELIST: &[BlockType] = &[BlockType::AIR];

/// The spatial index of all currently loaded chunks.
///
/// Exactly one chunk exists per chunk-grid coordinate. Lookups through the
/// container are the only way to reach another chunk's blocks.
#[derive(Default)]
pub struct ChunkContainer {
    chunks: RwLock<HashMap<ChunkKey, ChunkHandle>>,
}

impl ChunkContainer {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    fn index(&self) -> RwLockReadGuard<'_, HashMap<ChunkKey, ChunkHandle>> {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn index_mut(&self) -> RwLockWriteGuard<'_, HashMap<ChunkKey, ChunkHandle>> {
        self.chunks.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inserts `chunk` under its own key.
    ///
    /// # Returns
    ///
    /// The new handle, or `None` if that coordinate is already occupied, in which
    /// case `chunk` is dropped and the resident chunk is left untouched.
    pub fn insert(&self, chunk: Chunk) -> Option<ChunkHandle> {
        match self.index_mut().entry(chunk.key()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => Some(slot.insert(Arc::new(chunk)).clone()),
        }
    }

    /// Removes the chunk at `key` from the index and returns it.
    pub fn remove(&self, key: ChunkKey) -> Option<ChunkHandle> {
        self.index_mut().remove(&key)
    }

    /// The chunk at chunk-grid coordinate `key`, if loaded.
    pub fn chunk_at(&self, key: ChunkKey) -> Option<ChunkHandle> {
        self.index().get(&key).cloned()
    }

    /// Identity lookup: the handle under which this very chunk is stored.
    ///
    /// Returns `None` once the chunk has been evicted, even if a newer chunk
    /// now occupies the same coordinate.
    pub fn find_chunk(&self, chunk: &Chunk) -> Option<ChunkHandle> {
        self.index()
            .get(&chunk.key())
            .filter(|handle| std::ptr::eq(handle.as_ref(), chunk))
            .cloned()
    }

    /// The face-adjacent neighbour of `chunk` in `direction`, if loaded.
    pub fn chunk_nearby(&self, chunk: &Chunk, direction: Direction) -> Option<ChunkHandle> {
        self.chunk_at(chunk.key() + direction.offset())
    }

    /// Whether a chunk is loaded at `key`.
    pub fn contains(&self, key: ChunkKey) -> bool {
        self.index().contains_key(&key)
    }

    /// Number of loaded chunks.
    pub fn len(&self) -> usize {
        self.index().len()
    }

    /// Returns `true` when no chunk is loaded.
    pub fn is_empty(&self) -> bool {
        self.index().is_empty()
    }

    /// Keys of all loaded chunks in ascending order.
    pub fn keys(&self) -> Vec<ChunkKey> {
        let mut keys: Vec<ChunkKey> = self.index().keys().copied().collect();
        keys.sort_by_key(key_order);
        keys
    }

    /// Handles of all loaded chunks in ascending key order.
    pub fn handles(&self) -> Vec<ChunkHandle> {
        let mut handles: Vec<ChunkHandle> = self.index().values().cloned().collect();
        handles.sort_by_key(|chunk| key_order(&chunk.key()));
        handles
    }

    /// The chunk owning global coordinate `global`, and `global` in its local space.
    pub fn resolve(&self, global: Coordinate) -> Option<(ChunkHandle, Coordinate)> {
        let chunk = self.chunk_at(chunk_key_of(global))?;
        let local = global_to_local(chunk.origin(), global);
        Some((chunk, local))
    }

    /// The block at `global`, or `None` if its chunk is not loaded.
    ///
    /// `None` means "not loaded", which is different from a loaded air block.
    pub fn world_block(&self, global: Coordinate) -> Option<Block> {
        let (chunk, local) = self.resolve(global)?;
        chunk.local_block(local).ok()
    }

    /// Loaded chunks whose keys lie in the inclusive box `first..=last`, in key order.
    ///
    /// Walks the key box when it is small and the index when the box spans more
    /// keys than there are loaded chunks.
    fn chunks_in_key_range(&self, first: ChunkKey, last: ChunkKey) -> Vec<ChunkHandle> {
        let span = |lo: i32, hi: i32| i64::from(hi) - i64::from(lo) + 1;
        let key_count = span(first.x, last.x)
            .saturating_mul(span(first.y, last.y))
            .saturating_mul(span(first.z, last.z));

        if key_count > self.len() as i64 {
            let within = |key: ChunkKey| {
                (first.x..=last.x).contains(&key.x)
                    && (first.y..=last.y).contains(&key.y)
                    && (first.z..=last.z).contains(&key.z)
            };
            return self
                .handles()
                .into_iter()
                .filter(|chunk| within(chunk.key()))
                .collect();
        }

        let mut chunks = Vec::new();
        for key_x in first.x..=last.x {
            for key_y in first.y..=last.y {
                for key_z in first.z..=last.z {
                    chunks.extend(self.chunk_at(Point3::new(key_x, key_y, key_z)));
                }
            }
        }
        chunks
    }

    /// Visits every loaded block cell whose volume overlaps `aabb`, chunk by chunk.
    ///
    /// Each chunk's read guard is held for the duration of that chunk's scan only.
    fn scan_touched_blocks<F>(&self, aabb: &Aabb, mut visit: F) -> ControlFlow<()>
    where
        F: FnMut(&Chunk, Coordinate, Block) -> ControlFlow<()>,
    {
        let Some((first, last)) = aabb.block_range() else {
            return ControlFlow::Continue(());
        };

        for chunk in self.chunks_in_key_range(chunk_key_of(first), chunk_key_of(last)) {
            let origin = chunk.origin();
            // Clamp in global space first; `last - origin` may not fit in an i32.
            let lo = Point3::new(
                first.x.max(origin.x),
                first.y.max(origin.y),
                first.z.max(origin.z),
            );
            let hi = Point3::new(
                last.x.min(origin.x + (BLOCKS_PER_X_DIMENSION - 1)),
                last.y.min(origin.y + (BLOCKS_PER_Y_DIMENSION - 1)),
                last.z.min(origin.z + (BLOCKS_PER_Z_DIMENSION - 1)),
            );
            let blocks = chunk.read_blocks();

            for x in lo.x..=hi.x {
                for y in lo.y..=hi.y {
                    for z in lo.z..=hi.z {
                        let global = Point3::new(x, y, z);
                        if let Some(block) = blocks.try_get(global_to_local(origin, global)) {
                            visit(chunk.as_ref(), global, block)?;
                        }
                    }
                }
            }
        }

        ControlFlow::Continue(())
    }

    /// Whether `aabb` overlaps the volume of any collidable loaded block.
    ///
    /// Blocks in chunks that are not loaded never collide.
    pub fn does_it_collide(&self, aabb: &Aabb) -> bool {
        self.scan_touched_blocks(aabb, |chunk, _, block| {
            if block.is_collidable(&chunk.assets().catalog) {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .is_break()
    }

    /// Every non-air loaded block whose volume overlaps `aabb`, with its global coordinate.
    pub fn non_air_blocks_it_touches(&self, aabb: &Aabb) -> Vec<(Coordinate, Block)> {
        let mut touched = Vec::new();
        let _ = self.scan_touched_blocks(aabb, |_, global, block| {
            if !block.is_air() {
                touched.push((global, block));
            }
            ControlFlow::Continue(())
        });
        touched
    }

    /// Places a `block_type` block at `global` if the current block there is one
    /// of `overwrite_whitelist` (see [`DEFAULT_OVERWRITE_WHITELIST`]).
    ///
    /// On success the owning chunk is scheduled for a fast rebuild and every loaded
    /// chunk sharing an edge with the edited cell for a slow one.
    ///
    /// # Returns
    ///
    /// `true` if the block was placed. `false` leaves the world unchanged: either the
    /// chunk is not loaded or the current block may not be overwritten.
    pub fn try_to_place_block(
        &self,
        block_type: BlockType,
        global: Coordinate,
        overwrite_whitelist: &[BlockType],
    ) -> bool {
        let Some((chunk, local)) = self.resolve(global) else {
            debug!("Cannot place a block at {:?}: chunk not loaded", global);
            return false;
        };

        let placed = chunk
            .try_replace_local_block(local, block_type, overwrite_whitelist)
            .unwrap_or_else(|error| {
                warn!("Placing a block at {:?} failed: {}", global, error);
                false
            });

        if placed {
            chunk.rebuild_fast();
            self.rebuild_chunks_sharing_edge(&chunk, local);
        }
        placed
    }

    /// Turns the block at `global` into air.
    ///
    /// # Returns
    ///
    /// `false` if the owning chunk is not loaded, which is logged and otherwise ignored.
    pub fn remove_world_block(&self, global: Coordinate) -> bool {
        let Some((chunk, local)) = self.resolve(global) else {
            debug!("Cannot remove the block at {:?}: chunk not loaded", global);
            return false;
        };

        if let Err(error) = chunk.remove_local_block(local) {
            warn!("Removing the block at {:?} failed: {}", global, error);
            return false;
        }

        self.rebuild_chunks_sharing_edge(&chunk, local);
        true
    }

    /// Requests a slow rebuild of each loaded chunk bordering the cell at `local`.
    ///
    /// Only face-adjacent chunks are considered. Diagonal neighbours never see a
    /// cell of this chunk during their visibility test.
    fn rebuild_chunks_sharing_edge(&self, chunk: &Chunk, local: Coordinate) {
        for direction in Chunk::directions_touching_other_chunks(local) {
            if let Some(neighbor) = self.chunk_nearby(chunk, direction) {
                neighbor.rebuild_slow();
            }
        }
    }
}
