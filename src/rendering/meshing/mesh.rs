//! Mesh data handed from chunks to renderers.

use crate::{rendering::Vertex, voxels::coordinate::Coordinate};

/// Number of vertices emitted per quad.
pub const VERTICES_PER_QUAD: usize = 4;
/// Number of indices emitted per quad (two triangles).
pub const INDICES_PER_QUAD: usize = 6;

/// An immutable snapshot of a chunk's geometry.
///
/// Vertices are in world space, so meshes of different chunks can be drawn
/// without a per-chunk transform.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data, four per quad
    pub vertices: Vec<Vertex>,
    /// Triangle list indices into `vertices`, six per quad
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Number of quads in the mesh.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    /// Returns `true` when the mesh has no geometry at all.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The vertex buffer as raw bytes, ready for upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// The index buffer as raw bytes, ready for upload.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// The renderer-side consumer of chunk meshes.
///
/// Called once per chunk per frame with the chunk's current mesh snapshot. The
/// mesh is borrowed under the chunk's mesh guard, so implementations must not
/// call back into the chunk.
pub trait ChunkRenderer {
    /// Draws one chunk's mesh. `origin` is the chunk origin in global block coordinates.
    fn draw_mesh(&mut self, origin: Coordinate, mesh: &Mesh);
}
