//! Vertex data structures for chunk meshes.
//!
//! This module defines the vertex format produced by the mesh builder and consumed
//! by whatever renderer draws chunk meshes.

use cgmath::Point3;

use crate::voxels::block::block_side::BlockSide;

/// A vertex of a chunk mesh.
///
/// Represents a single point in world space with its atlas texture coordinate and
/// the face it belongs to. The layout is plain old data so a vertex buffer can be
/// uploaded with `bytemuck::cast_slice`.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Texture Coordinates: [f32; 2] (8 bytes)
/// - Face: u32 (4 bytes), a `BlockSide` discriminant the shader can turn into a normal
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Normalized atlas UV
    pub tex_coords: [f32; 2],
    /// `BlockSide` of the quad this vertex belongs to
    pub face: u32,
}

impl Vertex {
    /// Creates a new vertex.
    pub fn new(position: Point3<f32>, tex_coords: [f32; 2], face: BlockSide) -> Self {
        Vertex {
            position: [position.x, position.y, position.z],
            tex_coords,
            face: face as u32,
        }
    }
}
