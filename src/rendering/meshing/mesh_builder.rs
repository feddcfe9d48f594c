//! Quad accumulator used while (re)building a chunk mesh.

use cgmath::Vector3;

use super::{
    face::Face,
    mesh::{Mesh, VERTICES_PER_QUAD},
};
use crate::{
    rendering::{texture_pack::TextureRect, Vertex},
    voxels::{
        block::block_side::BlockSide,
        coordinate::{block_to_world, Coordinate},
    },
};

/// Accumulates visible quads for one chunk.
///
/// A builder belongs to exactly one chunk and knows that chunk's origin, so
/// quads are added in local coordinates and stored in world space. It is not
/// reentrant; the owning chunk serializes its use.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_chunks::rendering::{meshing::MeshBuilder, texture_pack::TextureRect};
/// use voxel_chunks::voxels::block::block_side::BlockSide;
///
/// let mut builder = MeshBuilder::new(Point3::new(16, 0, 0));
/// let uv = TextureRect { left: 0.0, top: 0.0, width: 0.5, height: 0.5 };
/// builder.add_quad(BlockSide::TOP, uv, Point3::new(0, 0, 0));
/// assert_eq!(builder.mesh().quad_count(), 1);
/// ```
#[derive(Debug)]
pub struct MeshBuilder {
    origin: Coordinate,
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl MeshBuilder {
    /// Creates an empty builder for the chunk whose origin is `origin`.
    pub fn new(origin: Coordinate) -> Self {
        MeshBuilder {
            origin,
            vertices: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Appends one quad covering `face` of the block at `local_position`.
    pub fn add_quad(
        &mut self,
        face: BlockSide,
        texture_uv: TextureRect,
        local_position: Coordinate,
    ) {
        let offset = Vector3::new(local_position.x, local_position.y, local_position.z);
        let global = self.origin + offset;
        let quad = Face::new(global, face);

        let uvs = [
            [texture_uv.left, texture_uv.bottom()],
            [texture_uv.right(), texture_uv.bottom()],
            [texture_uv.right(), texture_uv.top],
            [texture_uv.left, texture_uv.top],
        ];

        let first = self.vertices.len() as u32;
        for (corner, uv) in quad.corners().into_iter().zip(uvs) {
            self.vertices.push(Vertex::new(block_to_world(corner), uv, face));
        }
        self.indices
            .extend_from_slice(&[first, first + 1, first + 2, first, first + 2, first + 3]);
    }

    /// Drops all accumulated geometry.
    pub fn reset_mesh(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    /// Snapshot of the accumulated geometry.
    pub fn mesh(&self) -> Mesh {
        Mesh {
            vertices: self.vertices.clone(),
            indices: self.indices.clone(),
        }
    }

    /// Number of quads added since the last reset.
    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }
}
