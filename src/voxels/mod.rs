//! # Voxels Module
//!
//! The voxel world: blocks, chunks, the container indexing them and the manager
//! streaming them around an observer.
//!
//! ## Key Components
//! - `block`: block types, faces and the block catalog
//! - `chunk`: a 16x16x16 grid of blocks with its terrain and mesh
//! - `chunk_container`: the spatial index of loaded chunks and world-level queries
//! - `chunk_manager`: chunk streaming and fast/slow rebuild scheduling
//! - `terrain`: the shared height field chunks are generated from
//!
//! ## Coordinate Spaces
//!
//! Global block coordinates address a cell anywhere in the world. Local block
//! coordinates address a cell inside one chunk, `0..16` on every axis. Chunk keys
//! address chunks on the chunk grid. See [`coordinate`] for the conversions.

pub mod aabb;
pub mod assets;
pub mod block;
pub mod chunk;
pub mod chunk_container;
pub mod chunk_manager;
pub mod coordinate;
pub mod terrain;
