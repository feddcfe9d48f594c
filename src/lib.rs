#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunks
//!
//! The chunk subsystem of a voxel world: block storage in fixed-size chunks,
//! procedural terrain, cross-chunk face culling, mesh building, and the streaming
//! policy that loads and evicts chunks as an observer moves.
//!
//! ## Key Modules
//!
//! * `core` - Shared concurrency primitives
//! * `config` - World configuration loaded from JSON
//! * `error` - The crate error type
//! * `rendering` - Vertex format, texture atlas lookup and mesh construction
//! * `voxels` - Blocks, chunks, the chunk container and the chunk manager
//!
//! ## Architecture
//!
//! The `ChunkManager` owns a `ChunkContainer` of shared chunk handles. Chunks keep
//! weak links back to the container and to the manager's rebuild scheduler, so an
//! evicted chunk never dangles and a standalone chunk simply sees open air past
//! its borders.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_chunks::{config::WorldConfig, voxels::chunk_manager::ChunkManager};
//!
//! let config = WorldConfig { render_distance: 1, clear_distance: 2, ..WorldConfig::default() };
//! let manager = ChunkManager::with_builtin_assets(config).unwrap();
//! let report = manager.update(Point3::new(0.0, 20.0, 0.0));
//! assert_eq!(report.created, 27);
//! ```
//!
//! ## Performance Considerations
//!
//! * Terrain generation and initial meshing of a tick's new chunks run on `rayon`
//! * Neighbour rebuilds triggered by streaming are amortized over several ticks
//! * Locks are per chunk, and the chunk index lock is never held across chunk work

use std::path::Path;

use cgmath::{Point3, Vector3};
use log::info;

use crate::{
    config::WorldConfig,
    error::Result,
    rendering::meshing::{ChunkRenderer, Mesh},
    voxels::{
        block::block_type::BlockType,
        chunk_container::{ChunkContainer, DEFAULT_OVERWRITE_WHITELIST},
        chunk_manager::ChunkManager,
        coordinate::{world_to_block, Coordinate},
    },
};

pub mod config;
pub mod core;
pub mod error;
pub mod rendering;
pub mod voxels;

/// Number of ticks the demo observer walks for.
const DEMO_TICKS: usize = 24;

/// World units the demo observer moves per tick.
const DEMO_STEP: f32 = 6.0;

/// Counts what a frame would draw.
#[derive(Default)]
struct FrameStats {
    chunks: usize,
    quads: usize,
    upload_bytes: usize,
}

impl ChunkRenderer for FrameStats {
    fn draw_mesh(&mut self, _origin: Coordinate, mesh: &Mesh) {
        self.chunks += 1;
        self.quads += mesh.quad_count();
        self.upload_bytes += mesh.vertex_bytes().len() + mesh.index_bytes().len();
    }
}

/// Initializes logging the same way for every entry point.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG");
    let _ = log_builder.try_init();
}

/// Global coordinate of the highest loaded non-air block in the column at `(x, z)`.
fn surface_at(
    chunks: &ChunkContainer,
    x: i32,
    z: i32,
    top: i32,
    bottom: i32,
) -> Option<Coordinate> {
    (bottom..=top)
        .rev()
        .map(|y| Point3::new(x, y, z))
        .find(|&position| chunks.world_block(position).is_some_and(|block| !block.is_air()))
}

/// Runs the headless demo: an observer walks across the world while blocks are
/// placed and dug in front of it, and every tick is logged.
///
/// # Arguments
///
/// * `config_path` - Optional JSON world configuration; defaults are used without one
///
/// # Errors
///
/// Configuration and catalog loading errors.
pub fn run(config_path: Option<&Path>) -> Result<()> {
    init_logging();
    info!("Logger initialized");

    let config = match config_path {
        Some(path) => WorldConfig::load_from_file(path)?,
        None => WorldConfig::default(),
    };
    let manager = ChunkManager::with_builtin_assets(config)?;

    let start = Point3::new(0.0, (config.max_height / 2.0) as f32, 0.0);
    let heading = Vector3::new(1.0, 0.0, 0.5);
    let top = config.max_height.ceil() as i32;

    for tick in 0..DEMO_TICKS {
        let observer = start + heading * (tick as f32 * DEMO_STEP);
        let ahead = world_to_block(observer + heading * 4.0);

        if let Some(surface) = surface_at(manager.chunks(), ahead.x, ahead.z, top, -top) {
            let above = surface + Vector3::unit_y();
            if tick % 2 == 0 {
                let placed = manager.chunks().try_to_place_block(
                    BlockType::STONE,
                    above,
                    DEFAULT_OVERWRITE_WHITELIST,
                );
                info!("Placing stone at {:?}: {}", above, placed);
            } else {
                let removed = manager.chunks().remove_world_block(surface);
                info!("Digging at {:?}: {}", surface, removed);
            }
        }

        let report = manager.update(observer);

        let mut frame = FrameStats::default();
        manager.draw(&mut frame);
        info!(
            "Tick {}: {:?}, drawing {} quads ({} bytes) in {} chunks, {} slow rebuilds pending",
            tick,
            report,
            frame.quads,
            frame.upload_bytes,
            frame.chunks,
            manager.pending_slow().len()
        );
    }

    Ok(())
}
