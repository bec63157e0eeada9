//! Axis-aligned bounding volumes
//!
//! A [`BoundingVolume`] is the box an entity occupies. It is an immutable
//! value: every operation returns a new box. Faces that merely touch do not
//! count as overlap, which is what lets an entity rest exactly on a floor.

use crate::foundation::math::{Axis, Vec3};

/// Axis-aligned box with `min <= max` on every axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl BoundingVolume {
    /// Create a box from two opposite corners (in any order)
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Create a box from its six scalars
    pub fn from_bounds(min_x: f64, min_y: f64, min_z: f64, max_x: f64, max_y: f64, max_z: f64) -> Self {
        Self::new(Vec3::new(min_x, min_y, min_z), Vec3::new(max_x, max_y, max_z))
    }

    /// Box of an entity standing with its feet centred on `position`
    pub fn of_size(position: &Vec3, width: f64, height: f64) -> Self {
        let half = width * 0.5;
        Self::new(
            Vec3::new(position.x - half, position.y, position.z - half),
            Vec3::new(position.x + half, position.y + height, position.z + half),
        )
    }

    /// The unit cube `[0,1]³`
    pub fn unit() -> Self {
        Self::from_bounds(0.0, 0.0, 0.0, 1.0, 1.0, 1.0)
    }

    /// Lower bound on `axis`
    pub fn min(&self, axis: Axis) -> f64 {
        self.min[axis.index()]
    }

    /// Upper bound on `axis`
    pub fn max(&self, axis: Axis) -> f64 {
        self.max[axis.index()]
    }

    /// Extent along `axis`
    pub fn size(&self, axis: Axis) -> f64 {
        self.max(axis) - self.min(axis)
    }

    /// Centre point
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Whether the box has no extent along `axis`
    pub fn is_degenerate(&self, axis: Axis) -> bool {
        !(self.size(axis) > 0.0)
    }

    /// Translate by `offset`
    pub fn moved(&self, offset: &Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grow toward `offset`: negative components extend the minimum corner,
    /// positive ones the maximum corner. The result covers the swept region.
    pub fn expand_towards(&self, offset: &Vec3) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for axis in Axis::ALL {
            let i = axis.index();
            if offset[i] < 0.0 {
                min[i] += offset[i];
            } else {
                max[i] += offset[i];
            }
        }
        Self { min, max }
    }

    /// Grow every face outward by `amount` (negative shrinks)
    pub fn inflate(&self, amount: f64) -> Self {
        let mut min = self.min;
        let mut max = self.max;
        for axis in Axis::ALL {
            let i = axis.index();
            let lo = min[i] - amount;
            let hi = max[i] + amount;
            if lo > hi {
                // Over-shrunk: collapse to the centre instead of inverting.
                let mid = (min[i] + max[i]) * 0.5;
                min[i] = mid;
                max[i] = mid;
            } else {
                min[i] = lo;
                max[i] = hi;
            }
        }
        Self { min, max }
    }

    /// Shrink every face inward by `amount`
    pub fn deflate(&self, amount: f64) -> Self {
        self.inflate(-amount)
    }

    /// Strict overlap test (touching faces do not intersect)
    pub fn intersects(&self, other: &BoundingVolume) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
            && self.min.z < other.max.z
            && self.max.z > other.min.z
    }

    /// Overlap on `axis` by more than `epsilon`
    pub fn overlaps_on(&self, other: &BoundingVolume, axis: Axis, epsilon: f64) -> bool {
        self.min(axis) + epsilon < other.max(axis) && self.max(axis) - epsilon > other.min(axis)
    }

    /// Whether `other` lies entirely inside this box
    pub fn contains(&self, other: &BoundingVolume) -> bool {
        Axis::ALL
            .iter()
            .all(|&a| self.min(a) <= other.min(a) && self.max(a) >= other.max(a))
    }
}
