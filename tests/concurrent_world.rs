use std::thread;

use cgmath::Point3;
use voxel_chunks::{
    config::WorldConfig,
    voxels::{
        block::block_type::BlockType, chunk_container::DEFAULT_OVERWRITE_WHITELIST,
        chunk_manager::ChunkManager,
    },
};

fn observer_in_chunk(x: i32) -> Point3<f32> {
    Point3::new(x as f32 * 16.0 + 8.0, 8.0, 8.0)
}

fn settle(manager: &ChunkManager, observer: Point3<f32>) {
    manager.update(observer);
    while manager.has_pending_rebuilds() {
        manager.update(observer);
    }
}

fn assert_meshes_are_current(manager: &ChunkManager) {
    for chunk in manager.chunks().handles() {
        let settled = chunk.mesh();
        chunk.rebuild_mesh();
        assert_eq!(settled, chunk.mesh(), "chunk {:?}", chunk.key());
    }
}

/// Cells on both sides of the x = 0 and x = 16 chunk borders.
fn boundary_cells() -> Vec<Point3<i32>> {
    let mut cells = Vec::new();
    for x in [-1, 0, 15, 16] {
        for y in [0, 5, 15] {
            for z in [0, 7, 15] {
                cells.push(Point3::new(x, y, z));
            }
        }
    }
    cells
}

#[test]
fn racing_edits_updates_and_streaming_settle_consistently() {
    let config = WorldConfig {
        render_distance: 1,
        clear_distance: 2,
        ..WorldConfig::default()
    };
    let manager = ChunkManager::with_builtin_assets(config).unwrap();
    settle(&manager, observer_in_chunk(0));
    let cells = boundary_cells();
    let anything = &[BlockType::AIR, BlockType::GRASS, BlockType::DIRT, BlockType::STONE];

    thread::scope(|scope| {
        scope.spawn(|| {
            for round in 0..8 {
                for (index, &cell) in cells.iter().enumerate() {
                    if (round + index) % 2 == 0 {
                        manager.chunks().remove_world_block(cell);
                    } else {
                        manager.chunks().try_to_place_block(BlockType::STONE, cell, anything);
                    }
                }
            }
        });

        scope.spawn(|| {
            for _ in 0..16 {
                manager.update(observer_in_chunk(0));
            }
        });

        scope.spawn(|| {
            for step in 0..8 {
                let observer = observer_in_chunk(if step % 2 == 0 { 3 } else { 0 });
                manager.clear_far_away_chunks(observer);
                manager.generate_chunks_around(observer);
            }
        });
    });

    settle(&manager, observer_in_chunk(0));
    assert!(manager.chunks().len() >= 27);
    assert_meshes_are_current(&manager);
}

#[test]
fn edits_of_one_chunk_from_many_threads_are_not_lost() {
    let config = WorldConfig {
        render_distance: 1,
        clear_distance: 2,
        ..WorldConfig::default()
    };
    let manager = ChunkManager::with_builtin_assets(config).unwrap();
    settle(&manager, observer_in_chunk(0));
    let chunks = manager.chunks();

    // Every thread owns one x = 15 column, so each edit lands on the shared border.
    thread::scope(|scope| {
        for z in 0..4 {
            scope.spawn(move || {
                for y in 0..16 {
                    chunks.remove_world_block(Point3::new(15, y, z));
                    assert!(chunks.try_to_place_block(
                        BlockType::GLASS,
                        Point3::new(15, y, z),
                        DEFAULT_OVERWRITE_WHITELIST
                    ));
                }
            });
        }
        scope.spawn(|| {
            for _ in 0..8 {
                manager.update(observer_in_chunk(0));
            }
        });
    });

    for z in 0..4 {
        for y in 0..16 {
            let block = chunks.world_block(Point3::new(15, y, z)).unwrap();
            assert_eq!(block.block_type(), BlockType::GLASS);
        }
    }
    settle(&manager, observer_in_chunk(0));
    assert_meshes_are_current(&manager);
}

#[test]
fn rebuild_of_an_evicted_chunk_finishes_without_touching_the_world() {
    let config = WorldConfig {
        render_distance: 1,
        clear_distance: 2,
        ..WorldConfig::default()
    };
    let manager = ChunkManager::with_builtin_assets(config).unwrap();
    settle(&manager, observer_in_chunk(0));
    let doomed = manager.chunks().chunk_at(Point3::new(-1, 0, 0)).unwrap();

    thread::scope(|scope| {
        scope.spawn(|| {
            for _ in 0..16 {
                doomed.rebuild_mesh();
            }
        });
        scope.spawn(|| manager.clear_far_away_chunks(observer_in_chunk(3)));
    });

    assert!(doomed.has_mesh());
    assert!(!manager.chunks().contains(doomed.key()));
    assert!(!manager.rebuild_fast(&doomed));
    settle(&manager, observer_in_chunk(3));
    assert_meshes_are_current(&manager);
}
