//! # Rendering Module
//!
//! The CPU side of chunk rendering: the vertex format, texture atlas lookup and
//! mesh construction. Everything GPU-facing (pipelines, shaders, uploads) lives in
//! the renderer that implements [`meshing::ChunkRenderer`].

pub mod meshing;
pub mod texture_pack;
mod vertex;

pub use vertex::Vertex;
