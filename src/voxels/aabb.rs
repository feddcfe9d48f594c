//! Axis-aligned bounding boxes in world units, and the block cells they touch.

use cgmath::{Point3, Vector3};

use crate::voxels::coordinate::{block_to_world, Coordinate, BLOCK_SIZE};

/// An axis-aligned box given by its minimum and maximum corners, in world units.
///
/// Overlap is strict on every axis: two boxes that only share a face do not
/// intersect. A box standing on the ground therefore does not collide with it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Corner with the smallest coordinates
    pub min: Point3<f32>,
    /// Corner with the largest coordinates
    pub max: Point3<f32>,
}

impl Aabb {
    /// A box spanning `min..max`. Corners are reordered per axis if needed.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Aabb {
            min: Point3::new(min.x.min(max.x), min.y.min(max.y), min.z.min(max.z)),
            max: Point3::new(min.x.max(max.x), min.y.max(max.y), min.z.max(max.z)),
        }
    }

    /// A box of `size` centred on `center`.
    pub fn from_center_size(center: Point3<f32>, size: Vector3<f32>) -> Self {
        let half = size * 0.5;
        Self::new(center - half, center + half)
    }

    /// A box of `size` whose bottom face is centred on `bottom_center`, the way
    /// a standing character's collision box is positioned.
    pub fn from_bottom_center(bottom_center: Point3<f32>, size: Vector3<f32>) -> Self {
        let min = Point3::new(
            bottom_center.x - size.x * 0.5,
            bottom_center.y,
            bottom_center.z - size.z * 0.5,
        );
        Self::new(min, min + size)
    }

    /// The volume of the block cell at `coordinate`.
    pub fn of_block(coordinate: Coordinate) -> Self {
        let min = block_to_world(coordinate);
        Self::new(min, min + Vector3::new(BLOCK_SIZE, BLOCK_SIZE, BLOCK_SIZE))
    }

    /// Strict overlap test.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
            && self.min.z < other.max.z
            && other.min.z < self.max.z
    }

    /// Whether the box overlaps the volume of the block cell at `coordinate`.
    pub fn intersects_block(&self, coordinate: Coordinate) -> bool {
        self.intersects(&Self::of_block(coordinate))
    }

    /// Inclusive range of global block coordinates whose cells overlap the box,
    /// or `None` for a box with no volume.
    pub fn block_range(&self) -> Option<(Coordinate, Coordinate)> {
        let lo = |value: f32| (value / BLOCK_SIZE).floor() as i32;
        let hi = |value: f32| ((value / BLOCK_SIZE).ceil() as i32).saturating_sub(1);

        let first = Point3::new(lo(self.min.x), lo(self.min.y), lo(self.min.z));
        let last = Point3::new(hi(self.max.x), hi(self.max.y), hi(self.max.z));

        (first.x <= last.x && first.y <= last.y && first.z <= last.z).then_some((first, last))
    }
}
