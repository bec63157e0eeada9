//! Voxel collision shapes
//!
//! A [`VoxelShape`] is the collidable geometry of one world cell or one
//! entity: a small set of axis-aligned boxes. Block shapes are authored in
//! cell-local coordinates (`[0,1]³` for a full block) and moved into world
//! space when gathered. The boxes are shared behind an `Arc` so gathered
//! shapes can be cached and replayed without copying geometry.

use std::sync::Arc;

use super::volume::BoundingVolume;
use crate::foundation::math::{Axis, BlockPos, Vec3};

/// Collidable geometry made of axis-aligned boxes
#[derive(Debug, Clone, PartialEq)]
pub struct VoxelShape {
    boxes: Arc<[BoundingVolume]>,
}

impl Default for VoxelShape {
    fn default() -> Self {
        Self::empty()
    }
}

impl VoxelShape {
    /// Shape with no geometry
    pub fn empty() -> Self {
        Self::from_boxes(Vec::new())
    }

    /// Full unit cube
    pub fn block() -> Self {
        Self::from_box(BoundingVolume::unit())
    }

    /// Cell-local box given in sixteenths of a block (the usual authoring grid)
    pub fn sixteenths(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self::from_box(BoundingVolume::from_bounds(
            min_x / 16.0,
            min_y / 16.0,
            min_z / 16.0,
            max_x / 16.0,
            max_y / 16.0,
            max_z / 16.0,
        ))
    }

    /// Shape made of a single box
    pub fn from_box(volume: BoundingVolume) -> Self {
        Self::from_boxes(vec![volume])
    }

    /// Shape made of several boxes
    pub fn from_boxes(boxes: Vec<BoundingVolume>) -> Self {
        Self { boxes: boxes.into() }
    }

    /// Boxes making up this shape
    pub fn boxes(&self) -> &[BoundingVolume] {
        &self.boxes
    }

    /// Whether the shape has no geometry
    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    /// Translate every box by `offset`
    pub fn moved(&self, offset: &Vec3) -> Self {
        Self::from_boxes(self.boxes.iter().map(|b| b.moved(offset)).collect())
    }

    /// Move a cell-local shape into world space at `pos`
    pub fn at(&self, pos: BlockPos) -> Self {
        self.moved(&Vec3::new(f64::from(pos.x), f64::from(pos.y), f64::from(pos.z)))
    }

    /// Smallest box enclosing the whole shape
    pub fn bounds(&self) -> Option<BoundingVolume> {
        let (first, rest) = self.boxes.split_first()?;
        Some(rest.iter().fold(*first, |acc, b| BoundingVolume {
            min: acc.min.inf(&b.min),
            max: acc.max.sup(&b.max),
        }))
    }

    /// Whether a cell-local shape pokes out of its cell (fences, walls)
    pub fn exceeds_unit_cell(&self) -> bool {
        self.boxes.iter().any(|b| {
            Axis::ALL
                .iter()
                .any(|&a| b.min(a) < 0.0 || b.max(a) > 1.0)
        })
    }

    /// Whether any box strictly overlaps `volume`
    pub fn intersects(&self, volume: &BoundingVolume) -> bool {
        self.boxes.iter().any(|b| b.intersects(volume))
    }

    /// Largest offset with the same sign as `offset` (and no larger
    /// magnitude) that `volume` can travel along `axis` without entering
    /// any box of this shape.
    ///
    /// Boxes only block when they overlap `volume` by more than `epsilon` on
    /// the two other axes and lie ahead of it in the direction of travel.
    /// Boxes the volume already penetrates are ignored so an entity that is
    /// stuck inside geometry can still move out.
    pub fn collide(&self, axis: Axis, volume: &BoundingVolume, offset: f64, epsilon: f64) -> f64 {
        if offset.abs() < epsilon {
            return 0.0;
        }
        let (a, b) = axis.others();
        let mut allowed = offset;
        for shape_box in self.boxes.iter() {
            if !volume.overlaps_on(shape_box, a, epsilon) || !volume.overlaps_on(shape_box, b, epsilon) {
                continue;
            }
            if allowed > 0.0 && volume.max(axis) <= shape_box.min(axis) + epsilon {
                let gap = (shape_box.min(axis) - volume.max(axis)).max(0.0);
                if gap < allowed {
                    allowed = gap;
                }
            } else if allowed < 0.0 && volume.min(axis) >= shape_box.max(axis) - epsilon {
                let gap = (shape_box.max(axis) - volume.min(axis)).min(0.0);
                if gap > allowed {
                    allowed = gap;
                }
            }
        }
        if allowed.abs() < epsilon {
            0.0
        } else {
            allowed
        }
    }
}
