//! Mesh generation for chunk rendering.
//!
//! This module converts visible block faces into GPU-friendly vertex and index
//! lists. It does not decide *which* faces are visible; chunks do that, and feed
//! the survivors into a [`MeshBuilder`] one quad at a time.
//!
//! # Architecture
//! - [`Face`]: the four corners of one block face, wound outward
//! - [`MeshBuilder`]: the per-chunk quad accumulator
//! - [`Mesh`]: the immutable snapshot a renderer draws
//! - [`ChunkRenderer`]: the renderer seam

mod face;
mod mesh;
mod mesh_builder;

pub use face::Face;
pub use mesh::*;
pub use mesh_builder::MeshBuilder;
