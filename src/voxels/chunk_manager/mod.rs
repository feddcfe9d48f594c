//! # Chunk Manager Module
//!
//! This module provides the `ChunkManager`, which decides which chunks exist and when
//! their meshes are rebuilt.
//!
//! ## Streaming
//!
//! Every chunk whose chunk-grid coordinate lies within `render_distance` of the
//! observer's chunk (Chebyshev distance, so a cube around the observer) must be
//! loaded. Chunks further away than `clear_distance` are evicted. The gap between
//! the two radii keeps chunks from thrashing when the observer walks back and forth
//! across a chunk boundary.
//!
//! New chunks of one update are generated and meshed in parallel with `rayon`, then
//! inserted in ascending chunk-grid order, so a fixed observer position always
//! produces the same world.
//!
//! ## Rebuild scheduling
//!
//! - Fast rebuilds are edits the player must see now. All of them run before
//!   `update` returns.
//! - Slow rebuilds are cascades onto neighbouring chunks. At most
//!   `slow_rebuilds_per_update` run per update.
//!
//! Requests for chunks that were evicted before their turn are dropped silently.

use std::{collections::HashSet, sync::Arc};

use cgmath::Point3;
use log::{debug, trace};
use rayon::prelude::*;
use web_time::Instant;

use crate::{
    config::WorldConfig,
    error::Result,
    rendering::meshing::ChunkRenderer,
    voxels::{
        assets::WorldAssets,
        block::block_side::Direction,
        chunk::{Chunk, ChunkParent},
        chunk_container::{ChunkContainer, ChunkHandle},
        coordinate::{chunk_distance, chunk_key_of, key_order, world_to_block, ChunkKey},
    },
};

mod rebuild_scheduler;

pub use rebuild_scheduler::RebuildScheduler;

/// What one [`ChunkManager::update`] did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct WorldTickReport {
    /// Chunks generated and inserted
    pub created: usize,
    /// Chunks evicted
    pub evicted: usize,
    /// Chunks rebuilt from the fast set
    pub fast_rebuilt: usize,
    /// Chunks rebuilt from the slow set
    pub slow_rebuilt: usize,
}

/// Owns the loaded chunks, streams them around an observer and runs their rebuilds.
pub struct ChunkManager {
    config: WorldConfig,
    assets: Arc<WorldAssets>,
    chunks: Arc<ChunkContainer>,
    scheduler: Arc<RebuildScheduler>,
}

impl ChunkManager {
    /// Creates a manager with no chunks loaded.
    ///
    /// # Errors
    ///
    /// `VoxelError::InvalidArgument` if `config` does not validate.
    pub fn new(config: WorldConfig, assets: Arc<WorldAssets>) -> Result<Self> {
        config.validate()?;
        Ok(ChunkManager {
            config,
            assets,
            chunks: Arc::new(ChunkContainer::new()),
            scheduler: Arc::new(RebuildScheduler::new()),
        })
    }

    /// Creates a manager using the built-in block catalog and a grid texture atlas.
    pub fn with_builtin_assets(config: WorldConfig) -> Result<Self> {
        let assets = WorldAssets::builtin(&config)?;
        Self::new(config, assets)
    }

    /// The configuration this manager was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// The loaded chunks. Physics and player code edit the world through this.
    pub fn chunks(&self) -> &Arc<ChunkContainer> {
        &self.chunks
    }

    /// Chunk keys waiting for a fast rebuild, oldest first.
    pub fn pending_fast(&self) -> Vec<ChunkKey> {
        self.scheduler.pending_fast()
    }

    /// Chunk keys waiting for a slow rebuild, oldest first.
    pub fn pending_slow(&self) -> Vec<ChunkKey> {
        self.scheduler.pending_slow()
    }

    /// Returns `true` while any fast or slow rebuild is waiting.
    pub fn has_pending_rebuilds(&self) -> bool {
        !self.scheduler.is_idle()
    }

    /// Schedules a fast rebuild of `chunk` if it is still loaded.
    pub fn rebuild_fast(&self, chunk: &ChunkHandle) -> bool {
        self.chunks.find_chunk(chunk).is_some() && self.scheduler.rebuild_fast(chunk.key())
    }

    /// Schedules a slow rebuild of `chunk` if it is still loaded.
    pub fn rebuild_slow(&self, chunk: &ChunkHandle) -> bool {
        self.chunks.find_chunk(chunk).is_some() && self.scheduler.rebuild_slow(chunk.key())
    }

    /// Chunk key of the chunk containing world-space `position`.
    fn observer_chunk(position: Point3<f32>) -> ChunkKey {
        chunk_key_of(world_to_block(position))
    }

    /// Loads every missing chunk within `render_distance` of `observer`.
    ///
    /// Each new chunk is generated and meshed before this returns. Loaded chunks
    /// bordering a new one are scheduled for a slow rebuild, since their boundary
    /// faces may now be hidden.
    ///
    /// # Returns
    ///
    /// The number of chunks created.
    pub fn generate_chunks_around(&self, observer: Point3<f32>) -> usize {
        let center = Self::observer_chunk(observer);
        let radius = self.config.render_distance;

        let mut missing = Vec::new();
        for x in -radius..=radius {
            for y in -radius..=radius {
                for z in -radius..=radius {
                    let key = Point3::new(center.x + x, center.y + y, center.z + z);
                    if !self.chunks.contains(key) {
                        missing.push(key);
                    }
                }
            }
        }

        if missing.is_empty() {
            return 0;
        }
        missing.sort_by_key(key_order);

        let generated: Vec<Chunk> = missing
            .par_iter()
            .map(|&key| {
                Chunk::new(
                    key,
                    self.assets.clone(),
                    ChunkParent::managed(&self.chunks, &self.scheduler),
                )
            })
            .collect();

        let created: Vec<ChunkHandle> = generated
            .into_iter()
            .filter_map(|chunk| self.chunks.insert(chunk))
            .collect();

        created.par_iter().for_each(|chunk| chunk.rebuild_mesh());

        let new_keys: HashSet<ChunkKey> = created.iter().map(|chunk| chunk.key()).collect();
        for chunk in &created {
            for direction in Direction::all() {
                let neighbor = chunk.key() + direction.offset();
                if !new_keys.contains(&neighbor) && self.chunks.contains(neighbor) {
                    self.scheduler.rebuild_slow(neighbor);
                }
            }
        }

        debug!("Generated {} chunks around {:?}", created.len(), center);
        created.len()
    }

    /// Evicts every chunk further than `clear_distance` from `observer`.
    ///
    /// Pending rebuilds of evicted chunks are dropped. Loaded chunks bordering an
    /// evicted one are scheduled for a slow rebuild, since their boundary faces
    /// towards it now face open air.
    ///
    /// # Returns
    ///
    /// The number of chunks evicted.
    pub fn clear_far_away_chunks(&self, observer: Point3<f32>) -> usize {
        let center = Self::observer_chunk(observer);

        let far_away: Vec<ChunkKey> = self
            .chunks
            .keys()
            .into_iter()
            .filter(|key| chunk_distance(*key, center) > self.config.clear_distance)
            .collect();

        for key in &far_away {
            self.chunks.remove(*key);
            self.scheduler.forget(*key);
        }

        for key in &far_away {
            for direction in Direction::all() {
                let neighbor = *key + direction.offset();
                if self.chunks.contains(neighbor) {
                    self.scheduler.rebuild_slow(neighbor);
                }
            }
        }

        if !far_away.is_empty() {
            debug!("Evicted {} chunks far from {:?}", far_away.len(), center);
        }
        far_away.len()
    }

    fn rebuild_keys(&self, keys: Vec<ChunkKey>) -> usize {
        let chunks: Vec<ChunkHandle> = keys
            .into_iter()
            .filter_map(|key| {
                let chunk = self.chunks.chunk_at(key);
                if chunk.is_none() {
                    trace!("Dropping rebuild of unloaded chunk {:?}", key);
                }
                chunk
            })
            .collect();

        chunks.par_iter().for_each(|chunk| chunk.rebuild_mesh());
        chunks.len()
    }

    /// Runs every pending fast rebuild.
    ///
    /// # Returns
    ///
    /// The number of chunks rebuilt.
    pub fn rebuild_fast_chunks(&self) -> usize {
        let mut rebuilt = 0;
        loop {
            let keys = self.scheduler.take_fast();
            if keys.is_empty() {
                return rebuilt;
            }
            rebuilt += self.rebuild_keys(keys);
        }
    }

    /// Runs at most `slow_rebuilds_per_update` pending slow rebuilds, oldest first.
    ///
    /// # Returns
    ///
    /// The number of chunks rebuilt.
    pub fn rebuild_slow_chunks(&self) -> usize {
        let keys = self.scheduler.take_slow(self.config.slow_rebuilds_per_update);
        self.rebuild_keys(keys)
    }

    /// One simulation tick: stream chunks around `observer`, then run every fast
    /// rebuild and a bounded batch of slow ones.
    ///
    /// When this returns, every edit made before the call is visible in the meshes.
    pub fn update(&self, observer: Point3<f32>) -> WorldTickReport {
        let start = Instant::now();

        let report = WorldTickReport {
            created: self.generate_chunks_around(observer),
            evicted: self.clear_far_away_chunks(observer),
            fast_rebuilt: self.rebuild_fast_chunks(),
            slow_rebuilt: self.rebuild_slow_chunks(),
        };

        debug!("World update took {:?}: {:?}", start.elapsed(), report);
        report
    }

    /// Hands every loaded chunk's mesh to `renderer`, in ascending key order.
    pub fn draw<R: ChunkRenderer + ?Sized>(&self, renderer: &mut R) {
        for chunk in self.chunks.handles() {
            chunk.draw(renderer);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::VoxelError,
        rendering::meshing::Mesh,
        voxels::coordinate::{Coordinate, BLOCKS_PER_X_DIMENSION},
    };

    fn small_world() -> ChunkManager {
        let config = WorldConfig {
            render_distance: 1,
            clear_distance: 2,
            ..WorldConfig::default()
        };
        ChunkManager::with_builtin_assets(config).unwrap()
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let config = WorldConfig {
            render_distance: 4,
            clear_distance: 2,
            ..WorldConfig::default()
        };
        assert!(matches!(
            ChunkManager::with_builtin_assets(config),
            Err(VoxelError::InvalidArgument(_))
        ));
    }

    #[test]
    fn first_update_loads_and_meshes_a_cube() {
        let manager = small_world();
        let report = manager.update(Point3::new(8.0, 8.0, 8.0));

        assert_eq!(report.created, 27);
        assert_eq!(report.evicted, 0);
        assert_eq!(manager.chunks().len(), 27);
        assert!(manager.chunks().handles().iter().all(|chunk| chunk.has_mesh()));
        assert!(!manager.has_pending_rebuilds());
    }

    #[test]
    fn moving_one_chunk_schedules_the_old_border() {
        let manager = small_world();
        manager.update(Point3::new(8.0, 8.0, 8.0));

        let step = BLOCKS_PER_X_DIMENSION as f32;
        let report = manager.update(Point3::new(8.0 + step, 8.0, 8.0));

        assert_eq!(report.created, 9);
        assert_eq!(report.evicted, 0);
        assert_eq!(report.slow_rebuilt, manager.config().slow_rebuilds_per_update);
        assert_eq!(manager.pending_slow().len(), 9 - report.slow_rebuilt);
        assert!(manager.pending_slow().iter().all(|key| key.x == 1));
    }

    #[test]
    fn far_chunks_are_evicted_with_their_pending_work() {
        let manager = small_world();
        manager.update(Point3::new(8.0, 8.0, 8.0));
        let origin_chunk = manager.chunks().chunk_at(Point3::new(-1, 0, 0)).unwrap();
        manager.scheduler.rebuild_slow(origin_chunk.key());

        let report = manager.update(Point3::new(8.0 + 3.0 * 16.0, 8.0, 8.0));

        assert_eq!(report.evicted, 18);
        assert!(!manager.chunks().contains(Point3::new(-1, 0, 0)));
        assert!(!manager.pending_slow().contains(&Point3::new(-1, 0, 0)));
        assert!(!manager.rebuild_fast(&origin_chunk));
    }

    #[test]
    fn eviction_schedules_the_surviving_border() {
        let manager = small_world();
        manager.update(Point3::new(8.0, 8.0, 8.0));

        let evicted = manager.clear_far_away_chunks(Point3::new(8.0 + 3.0 * 16.0, 8.0, 8.0));

        assert_eq!(evicted, 18);
        let mut slow = manager.pending_slow();
        slow.sort_by_key(key_order);
        let border: Vec<ChunkKey> = (-1..=1)
            .flat_map(|y| (-1..=1).map(move |z| Point3::new(1, y, z)))
            .collect();
        assert_eq!(slow, border);
    }

    #[test]
    fn draw_visits_every_meshed_chunk_in_order() {
        struct Origins(Vec<Coordinate>);
        impl ChunkRenderer for Origins {
            fn draw_mesh(&mut self, origin: Coordinate, _mesh: &Mesh) {
                self.0.push(origin);
            }
        }

        let manager = small_world();
        manager.update(Point3::new(0.5, 0.5, 0.5));

        let mut renderer = Origins(Vec::new());
        manager.draw(&mut renderer);

        assert_eq!(renderer.0.len(), 27);
        assert_eq!(renderer.0[0], Point3::new(-16, -16, -16));
        assert_eq!(renderer.0[26], Point3::new(16, 16, 16));
    }
}
