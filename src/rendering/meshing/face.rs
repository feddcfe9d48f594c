use cgmath::{Point3, Vector3};

use crate::voxels::block::block_side::BlockSide;

/// Represents a single quad face of a voxel.
///
/// A face is defined by four corner points (lower-left, lower-right, upper-right,
/// upper-left) as seen from outside the block, so the corners wind
/// counter-clockwise around the face normal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    /// Lower-left corner in block units
    pub ll: Point3<i32>,
    /// Lower-right corner in block units
    pub lr: Point3<i32>,
    /// Upper-right corner in block units
    pub ur: Point3<i32>,
    /// Upper-left corner in block units
    pub ul: Point3<i32>,
    /// Which side of the block this face represents
    pub block_side: BlockSide,
}

impl Face {
    /// Creates the face on `block_side` of the unit cube whose minimum corner is `pos`.
    pub fn new(pos: Point3<i32>, block_side: BlockSide) -> Self {
        let corner = |x: i32, y: i32, z: i32| pos + Vector3::new(x, y, z);

        match block_side {
            BlockSide::FRONT => Face {
                ll: corner(0, 0, 1),
                lr: corner(1, 0, 1),
                ur: corner(1, 1, 1),
                ul: corner(0, 1, 1),
                block_side,
            },

            BlockSide::BACK => Face {
                ll: corner(1, 0, 0),
                lr: corner(0, 0, 0),
                ur: corner(0, 1, 0),
                ul: corner(1, 1, 0),
                block_side,
            },

            BlockSide::RIGHT => Face {
                ll: corner(1, 0, 1),
                lr: corner(1, 0, 0),
                ur: corner(1, 1, 0),
                ul: corner(1, 1, 1),
                block_side,
            },

            BlockSide::LEFT => Face {
                ll: corner(0, 0, 0),
                lr: corner(0, 0, 1),
                ur: corner(0, 1, 1),
                ul: corner(0, 1, 0),
                block_side,
            },

            BlockSide::TOP => Face {
                ll: corner(0, 1, 1),
                lr: corner(1, 1, 1),
                ur: corner(1, 1, 0),
                ul: corner(0, 1, 0),
                block_side,
            },

            BlockSide::BOTTOM => Face {
                ll: corner(0, 0, 0),
                lr: corner(1, 0, 0),
                ur: corner(1, 0, 1),
                ul: corner(0, 0, 1),
                block_side,
            },
        }
    }

    /// Corners in emission order: lower-left, lower-right, upper-right, upper-left.
    pub fn corners(&self) -> [Point3<i32>; 4] {
        [self.ll, self.lr, self.ur, self.ul]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{EuclideanSpace, InnerSpace};

    #[test]
    fn corners_wind_counter_clockwise_around_the_outward_normal() {
        for side in BlockSide::all() {
            let face = Face::new(Point3::new(0, 0, 0), side);
            let e1 = (face.lr - face.ll).cast::<f32>().unwrap();
            let e2 = (face.ur - face.ll).cast::<f32>().unwrap();
            let normal = e1.cross(e2).normalize();
            let expected = side.direction().offset().cast::<f32>().unwrap();
            assert_eq!(normal, expected, "{side:?}");
        }
    }

    #[test]
    fn faces_are_translated_by_the_block_position() {
        let origin = Face::new(Point3::origin(), BlockSide::TOP);
        let moved = Face::new(Point3::new(3, -2, 5), BlockSide::TOP);
        assert_eq!(moved.ll - origin.ll, Vector3::new(3, -2, 5));
    }
}
