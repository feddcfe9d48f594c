//! # Chunk Module
//!
//! This module provides the `Chunk` struct: a 16x16x16 grid of blocks, the terrain
//! that fills it, and the mesh derived from it.
//!
//! ## Face visibility
//!
//! A face is meshed iff the block beyond it is transparent or does not exist.
//! Neighbours inside the chunk are read from the chunk's own cells. Neighbours
//! across the chunk boundary are resolved through the parent container; a chunk
//! without a container, or a neighbour chunk that is not loaded, counts as open air.
//!
//! ## Locking
//!
//! | guard          | protects                     | held during                        |
//! |----------------|------------------------------|------------------------------------|
//! | `blocks`       | the cell array               | single reads/writes, snapshots     |
//! | `mesh_builder` | the quad accumulator         | a whole rebuild of this chunk      |
//! | `model`        | the mesh handed to renderers | mesh replacement and `draw`        |
//!
//! A rebuild never holds its own `blocks` guard while reading a neighbour's: it
//! meshes from a snapshot of its own cells and takes each neighbour's guard only
//! for the single boundary cell it needs. Two chunks rebuilding against each
//! other therefore cannot deadlock.
//!
//! The price is that cross-chunk visibility is eventually consistent rather than
//! atomic. A neighbour edited in the middle of this chunk's rebuild can leave one
//! boundary face drawn or missing until the next rebuild of either side, which the
//! edit itself schedules.

use std::sync::{Arc, Mutex, PoisonError, RwLock, RwLockReadGuard, Weak};

use log::trace;

use crate::{
    core::MtResource,
    error::{Result, VoxelError},
    rendering::meshing::{ChunkRenderer, Mesh, MeshBuilder},
    voxels::{
        assets::WorldAssets,
        block::{
            block_side::{BlockSide, Direction},
            block_type::BlockType,
            Block,
        },
        chunk_container::ChunkContainer,
        chunk_manager::RebuildScheduler,
        coordinate::{
            chunk_origin, global_to_local, is_inside_chunk, local_to_global, ChunkKey, Coordinate,
            BLOCKS_PER_X_DIMENSION, BLOCKS_PER_Y_DIMENSION, BLOCKS_PER_Z_DIMENSION,
        },
    },
};

mod chunk_blocks;

pub use chunk_blocks::ChunkBlocks;

/// Non-owning links from a chunk to the structures that own and schedule it.
///
/// Both links are weak: destroying the container or the manager never leaves a
/// chunk with a dangling reference, it just degrades the chunk to standalone
/// behaviour (open-air boundaries, synchronous rebuilds).
#[derive(Clone, Default)]
pub struct ChunkParent {
    container: Option<Weak<ChunkContainer>>,
    scheduler: Option<Weak<RebuildScheduler>>,
}

impl ChunkParent {
    /// A chunk with no container and no manager.
    pub fn none() -> Self {
        Self::default()
    }

    /// A chunk living in `container` whose rebuilds run synchronously.
    pub fn container(container: &Arc<ChunkContainer>) -> Self {
        ChunkParent {
            container: Some(Arc::downgrade(container)),
            scheduler: None,
        }
    }

    /// A chunk living in `container` whose rebuilds are scheduled by `scheduler`.
    pub fn managed(container: &Arc<ChunkContainer>, scheduler: &Arc<RebuildScheduler>) -> Self {
        ChunkParent {
            container: Some(Arc::downgrade(container)),
            scheduler: Some(Arc::downgrade(scheduler)),
        }
    }

    fn container_ref(&self) -> Option<Arc<ChunkContainer>> {
        self.container.as_ref().and_then(Weak::upgrade)
    }

    fn scheduler_ref(&self) -> Option<Arc<RebuildScheduler>> {
        self.scheduler.as_ref().and_then(Weak::upgrade)
    }
}

/// Represents a 16x16x16 collection of voxel blocks in the world.
///
/// Chunks are the unit of generation, meshing and streaming. A chunk is
/// normally owned by a [`ChunkContainer`] through a shared handle, so rebuild
/// work holding a handle keeps the chunk alive even after it has been evicted.
pub struct Chunk {
    /// Chunk-grid coordinate of this chunk.
    key: ChunkKey,
    /// Global block coordinate of local `(0, 0, 0)`.
    origin: Coordinate,
    assets: Arc<WorldAssets>,
    blocks: MtResource<ChunkBlocks>,
    mesh_builder: Mutex<MeshBuilder>,
    model: RwLock<Option<Mesh>>,
    parent: ChunkParent,
}

impl Chunk {
    /// Creates a chunk at `key` and generates its terrain.
    ///
    /// No mesh is built: an attached chunk should be meshed once it has been
    /// inserted into its container, so its boundary faces can see its neighbours.
    pub fn new(key: ChunkKey, assets: Arc<WorldAssets>, parent: ChunkParent) -> Self {
        let blocks = ChunkBlocks::generate(chunk_origin(key), &assets.terrain);
        Self::with_blocks(key, blocks, assets, parent)
    }

    /// Creates a chunk at `key` from existing cells.
    pub fn with_blocks(
        key: ChunkKey,
        blocks: ChunkBlocks,
        assets: Arc<WorldAssets>,
        parent: ChunkParent,
    ) -> Self {
        let origin = chunk_origin(key);
        Chunk {
            key,
            origin,
            assets,
            blocks: MtResource::new(blocks),
            mesh_builder: Mutex::new(MeshBuilder::new(origin)),
            model: RwLock::new(None),
            parent,
        }
    }

    /// Creates a chunk that belongs to no container, generates its terrain and
    /// builds its mesh right away. Useful for previews and tests.
    pub fn standalone(key: ChunkKey, assets: Arc<WorldAssets>) -> Self {
        let chunk = Self::new(key, assets, ChunkParent::none());
        chunk.rebuild_mesh();
        chunk
    }

    /// Chunk-grid coordinate of this chunk.
    pub fn key(&self) -> ChunkKey {
        self.key
    }

    /// Global block coordinate of this chunk's local origin.
    pub fn origin(&self) -> Coordinate {
        self.origin
    }

    /// Shared resources this chunk was built with.
    pub fn assets(&self) -> &Arc<WorldAssets> {
        &self.assets
    }

    /// Returns `true` while the chunk's container is alive.
    pub fn belongs_to_any_chunk_container(&self) -> bool {
        self.parent.container_ref().is_some()
    }

    /// Bounds predicate for local coordinates.
    pub fn are_local_coordinates_inside(local: Coordinate) -> bool {
        is_inside_chunk(local)
    }

    /// Returns `true` if `local` lies on any of the chunk's six faces.
    pub fn is_local_coordinate_on_edge(local: Coordinate) -> bool {
        !Self::directions_touching_other_chunks(local).is_empty()
    }

    /// Directions in which the block at `local` borders another chunk.
    ///
    /// An inner block yields nothing, a face block one direction, an edge block two
    /// and a corner block three.
    pub fn directions_touching_other_chunks(local: Coordinate) -> Vec<Direction> {
        let mut directions = Vec::new();

        if local.x == BLOCKS_PER_X_DIMENSION - 1 {
            directions.push(Direction::ToTheRight);
        }
        if local.x == 0 {
            directions.push(Direction::ToTheLeft);
        }
        if local.y == BLOCKS_PER_Y_DIMENSION - 1 {
            directions.push(Direction::Above);
        }
        if local.y == 0 {
            directions.push(Direction::Below);
        }
        if local.z == BLOCKS_PER_Z_DIMENSION - 1 {
            directions.push(Direction::InFront);
        }
        if local.z == 0 {
            directions.push(Direction::Behind);
        }

        directions
    }

    /// Converts a local coordinate of this chunk into a global one.
    pub fn local_to_global_coordinates(&self, local: Coordinate) -> Coordinate {
        local_to_global(self.origin, local)
    }

    /// Converts a global coordinate into one local to this chunk.
    pub fn global_to_local_coordinates(&self, global: Coordinate) -> Coordinate {
        global_to_local(self.origin, global)
    }

    /// The position one step from `local` in `direction`. May leave the chunk.
    pub fn local_nearby_block_position(local: Coordinate, direction: Direction) -> Coordinate {
        local + direction.offset()
    }

    /// The block at `local`.
    ///
    /// # Errors
    /// `VoxelError::OutOfBounds` when `local` lies outside the chunk.
    pub fn local_block(&self, local: Coordinate) -> Result<Block> {
        self.blocks.get().get(local)
    }

    /// Read guard over the chunk's cells. Keep it short-lived: edits of this chunk
    /// block until it is dropped.
    pub fn read_blocks(&self) -> RwLockReadGuard<'_, ChunkBlocks> {
        self.blocks.get()
    }

    /// A consistent copy of the chunk's cells.
    pub fn blocks_snapshot(&self) -> ChunkBlocks {
        self.blocks.snapshot()
    }

    /// Sets the block at `local` and requests a fast rebuild of this chunk.
    ///
    /// Neighbouring chunks are not notified; use the container's edit operations for
    /// edits that must keep chunk boundaries consistent.
    pub fn set_local_block(&self, local: Coordinate, block_type: BlockType) -> Result<()> {
        self.blocks.get_mut().get_mut(local)?.set_block_type(block_type);
        self.rebuild_fast();
        Ok(())
    }

    /// Turns the block at `local` into air and requests a fast rebuild of this chunk.
    pub fn remove_local_block(&self, local: Coordinate) -> Result<()> {
        self.set_local_block(local, BlockType::AIR)
    }

    /// Replaces the block at `local` with `block_type` iff its current type is in
    /// `overwrite_whitelist`. The check and the write happen under one guard.
    ///
    /// Returns whether the cell changed. Schedules nothing.
    pub(crate) fn try_replace_local_block(
        &self,
        local: Coordinate,
        block_type: BlockType,
        overwrite_whitelist: &[BlockType],
    ) -> Result<bool> {
        let mut blocks = self.blocks.get_mut();
        let block = blocks.get_mut(local)?;
        if !overwrite_whitelist.contains(&block.block_type()) {
            return Ok(false);
        }
        block.set_block_type(block_type);
        Ok(true)
    }

    /// Whether `face` of the block at `local` must be meshed.
    ///
    /// # Errors
    /// `VoxelError::OutOfBounds` when `local` lies outside the chunk.
    pub fn is_face_visible(&self, face: BlockSide, local: Coordinate) -> Result<bool> {
        if !is_inside_chunk(local) {
            return Err(VoxelError::OutOfBounds { coordinate: local });
        }
        let neighbor_position = Self::local_nearby_block_position(local, face.direction());
        let own_neighbor = self.blocks.get().try_get(neighbor_position);

        let neighbor = match own_neighbor {
            Some(block) => Some(block),
            None => self.parent.container_ref().and_then(|container| {
                container.world_block(self.local_to_global_coordinates(neighbor_position))
            }),
        };
        Ok(neighbor.map_or(true, |block| block.is_transparent(&self.assets.catalog)))
    }

    /// Visibility test against a snapshot of this chunk's cells.
    fn face_visible_in(
        &self,
        own_blocks: &ChunkBlocks,
        container: Option<&ChunkContainer>,
        face: BlockSide,
        local: Coordinate,
    ) -> bool {
        let neighbor_position = Self::local_nearby_block_position(local, face.direction());

        if let Some(neighbor) = own_blocks.try_get(neighbor_position) {
            return neighbor.is_transparent(&self.assets.catalog);
        }

        container
            .and_then(|container| {
                container.world_block(self.local_to_global_coordinates(neighbor_position))
            })
            .map_or(true, |neighbor| neighbor.is_transparent(&self.assets.catalog))
    }

    /// Adds a quad for every visible face of every non-air block in `own_blocks`.
    fn prepare_mesh(
        &self,
        builder: &mut MeshBuilder,
        own_blocks: &ChunkBlocks,
        container: Option<&ChunkContainer>,
    ) {
        for (local, block) in own_blocks.iter() {
            if block.is_air() {
                continue;
            }

            for face in BlockSide::all() {
                if self.face_visible_in(own_blocks, container, face, local) {
                    let texture_id = block.texture_id(&self.assets.catalog, face);
                    let uv = self.assets.texture_pack.normalized_coordinates(texture_id);
                    builder.add_quad(face, uv, local);
                }
            }
        }
    }

    /// Regenerates this chunk's mesh from scratch, right now, on the calling thread.
    ///
    /// Cost is linear in the number of blocks in the chunk.
    pub fn rebuild_mesh(&self) {
        let mut builder = self
            .mesh_builder
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        builder.reset_mesh();
        let own_blocks = self.blocks_snapshot();
        let container = self.parent.container_ref();
        self.prepare_mesh(&mut builder, &own_blocks, container.as_deref());

        let mesh = builder.mesh();
        *self.model.write().unwrap_or_else(PoisonError::into_inner) = Some(mesh);
    }

    /// Requests a rebuild that completes before the next frame is drawn.
    ///
    /// Attached chunks hand the request to their manager's scheduler; a chunk
    /// without a manager rebuilds immediately.
    pub fn rebuild_fast(&self) {
        self.delegate_rebuild(|scheduler, key| scheduler.rebuild_fast(key));
    }

    /// Requests a rebuild that may be deferred across frames.
    ///
    /// Attached chunks hand the request to their manager's scheduler; a chunk
    /// without a manager rebuilds immediately.
    pub fn rebuild_slow(&self) {
        self.delegate_rebuild(|scheduler, key| scheduler.rebuild_slow(key));
    }

    fn delegate_rebuild(&self, enqueue: impl FnOnce(&RebuildScheduler, ChunkKey) -> bool) {
        let Some(scheduler) = self.parent.scheduler_ref() else {
            self.rebuild_mesh();
            return;
        };

        let Some(container) = self.parent.container_ref() else {
            self.rebuild_mesh();
            return;
        };

        match container.find_chunk(self) {
            Some(this_chunk) => {
                enqueue(&scheduler, this_chunk.key());
            }
            None => trace!(
                "Chunk {:?} is no longer in its container, dropping rebuild request",
                self.key
            ),
        }
    }

    /// Requests a slow rebuild of each of the six face-adjacent chunks that is loaded.
    pub fn rebuild_chunks_around(&self) {
        let Some(container) = self.parent.container_ref() else {
            return;
        };

        for direction in Direction::all() {
            if let Some(chunk) = container.chunk_nearby(self, direction) {
                chunk.rebuild_slow();
            }
        }
    }

    /// Returns `true` once a mesh has been built.
    pub fn has_mesh(&self) -> bool {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// A copy of the current mesh, if one has been built. May be stale between an
    /// edit and the rebuild it scheduled.
    pub fn mesh(&self) -> Option<Mesh> {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Hands the current mesh to `renderer`. Does nothing before the first build.
    ///
    /// Holds the mesh guard for the duration of the call, so a concurrent rebuild
    /// of this chunk waits before swapping the mesh.
    pub fn draw<R: ChunkRenderer + ?Sized>(&self, renderer: &mut R) {
        let model = self.model.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(mesh) = model.as_ref() {
            renderer.draw_mesh(self.origin, mesh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use cgmath::Point3;

    fn assets() -> Arc<WorldAssets> {
        WorldAssets::builtin(&WorldConfig::default()).unwrap()
    }

    fn chunk_filled_with(block_type: BlockType) -> Chunk {
        Chunk::with_blocks(
            Point3::new(0, 0, 0),
            ChunkBlocks::filled(block_type),
            assets(),
            ChunkParent::none(),
        )
    }

    #[test]
    fn edge_directions_cover_faces_edges_and_corners() {
        let inner = Chunk::directions_touching_other_chunks(Point3::new(5, 5, 5));
        assert!(inner.is_empty());

        let face = Chunk::directions_touching_other_chunks(Point3::new(15, 5, 5));
        assert_eq!(face, vec![Direction::ToTheRight]);

        let corner = Chunk::directions_touching_other_chunks(Point3::new(0, 15, 0));
        assert_eq!(corner, vec![Direction::ToTheLeft, Direction::Above, Direction::Behind]);
        assert!(Chunk::is_local_coordinate_on_edge(Point3::new(0, 15, 0)));
    }

    #[test]
    fn single_block_in_standalone_chunk_shows_six_faces() {
        let chunk = chunk_filled_with(BlockType::AIR);
        chunk.set_local_block(Point3::new(4, 4, 4), BlockType::STONE).unwrap();

        let mesh = chunk.mesh().unwrap();
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn solid_standalone_chunk_only_meshes_its_outer_shell() {
        let chunk = chunk_filled_with(BlockType::STONE);
        chunk.rebuild_mesh();

        let mesh = chunk.mesh().unwrap();
        let per_face = (BLOCKS_PER_X_DIMENSION * BLOCKS_PER_Y_DIMENSION) as usize;
        assert_eq!(mesh.quad_count(), 6 * per_face);
        assert!(!chunk.is_face_visible(BlockSide::TOP, Point3::new(3, 3, 3)).unwrap());
        assert!(chunk.is_face_visible(BlockSide::TOP, Point3::new(3, 15, 3)).unwrap());
    }

    #[test]
    fn transparent_neighbours_keep_faces_visible() {
        let chunk = chunk_filled_with(BlockType::STONE);
        chunk.set_local_block(Point3::new(3, 4, 3), BlockType::GLASS).unwrap();

        assert!(chunk.is_face_visible(BlockSide::TOP, Point3::new(3, 3, 3)).unwrap());
        assert!(!chunk.is_face_visible(BlockSide::BOTTOM, Point3::new(3, 3, 3)).unwrap());
    }

    #[test]
    fn out_of_range_coordinates_fail_loudly() {
        let chunk = chunk_filled_with(BlockType::AIR);
        assert!(matches!(
            chunk.local_block(Point3::new(0, 16, 0)),
            Err(VoxelError::OutOfBounds { .. })
        ));
        assert!(chunk.remove_local_block(Point3::new(-1, 0, 0)).is_err());
        assert!(chunk.is_face_visible(BlockSide::LEFT, Point3::new(0, 0, 99)).is_err());
    }

    #[test]
    fn whitelist_controls_replacement() {
        let chunk = chunk_filled_with(BlockType::AIR);
        let position = Point3::new(1, 1, 1);

        let air_only = &[BlockType::AIR];

        assert!(chunk.try_replace_local_block(position, BlockType::DIRT, air_only).unwrap());
        assert!(!chunk.try_replace_local_block(position, BlockType::STONE, air_only).unwrap());
        assert_eq!(chunk.local_block(position).unwrap().block_type(), BlockType::DIRT);
    }

    #[test]
    fn draw_hands_over_the_current_mesh() {
        struct Recorder(Vec<(Coordinate, usize)>);
        impl ChunkRenderer for Recorder {
            fn draw_mesh(&mut self, origin: Coordinate, mesh: &Mesh) {
                self.0.push((origin, mesh.quad_count()));
            }
        }

        let chunk = Chunk::with_blocks(
            Point3::new(1, 0, 0),
            ChunkBlocks::filled(BlockType::AIR),
            assets(),
            ChunkParent::none(),
        );
        let mut recorder = Recorder(Vec::new());
        chunk.draw(&mut recorder);
        assert!(recorder.0.is_empty());

        chunk.set_local_block(Point3::new(0, 0, 0), BlockType::DIRT).unwrap();
        chunk.draw(&mut recorder);
        assert_eq!(recorder.0, vec![(Point3::new(16, 0, 0), 6)]);
    }

    #[test]
    fn standalone_chunks_are_meshed_on_creation() {
        let chunk = Chunk::standalone(Point3::new(0, 0, 0), assets());
        assert!(chunk.has_mesh());
        assert!(!chunk.belongs_to_any_chunk_container());
    }
}
