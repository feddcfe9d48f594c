//! Texture atlas lookup.
//!
//! Meshing only needs to know where in the atlas a texture lives; loading and
//! binding the atlas image belongs to the renderer. `TexturePack` is that
//! narrow seam, and `AtlasTexturePack` is the grid-atlas implementation used by
//! default.

use crate::voxels::block::catalog::TextureId;

/// A rectangle of the texture atlas in normalized `[0, 1]` coordinates.
///
/// `top` is the smaller `v` of the two edges (image rows grow downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRect {
    /// Left edge (`u`)
    pub left: f32,
    /// Top edge (`v`)
    pub top: f32,
    /// Width in `u`
    pub width: f32,
    /// Height in `v`
    pub height: f32,
}

impl TextureRect {
    /// `u` of the right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// `v` of the bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// Maps texture ids to atlas rectangles. Read-only after startup.
pub trait TexturePack: Send + Sync {
    /// Atlas rectangle of `texture_id`.
    fn normalized_coordinates(&self, texture_id: TextureId) -> TextureRect;
}

/// An atlas made of equally sized tiles laid out row by row.
///
/// Texture `n` sits at column `n % columns`, row `n / columns`. Ids past the last
/// tile wrap around rather than sampling outside the image.
#[derive(Debug, Clone, Copy)]
pub struct AtlasTexturePack {
    columns: u32,
    rows: u32,
}

impl AtlasTexturePack {
    /// Creates an atlas of `columns` x `rows` tiles. Zero is treated as one.
    pub fn new(columns: u32, rows: u32) -> Self {
        AtlasTexturePack {
            columns: columns.max(1),
            rows: rows.max(1),
        }
    }
}

impl Default for AtlasTexturePack {
    fn default() -> Self {
        AtlasTexturePack::new(16, 16)
    }
}

impl TexturePack for AtlasTexturePack {
    fn normalized_coordinates(&self, texture_id: TextureId) -> TextureRect {
        let tile = texture_id % (self.columns * self.rows);
        let width = 1.0 / self.columns as f32;
        let height = 1.0 / self.rows as f32;

        TextureRect {
            left: (tile % self.columns) as f32 * width,
            top: (tile / self.columns) as f32 * height,
            width,
            height,
        }
    }
}
