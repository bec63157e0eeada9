//! World border
//!
//! The border is a square in the X/Z plane. Everything outside it is solid
//! for movement purposes, so its collision shape is the four slabs that
//! surround the square.

use crate::foundation::math::Vec3;
use crate::physics::collision::{BoundingVolume, VoxelShape};

/// Reach of the slabs beyond the border in every direction
const FAR: f64 = 1.0e9;

/// Square horizontal world boundary
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBorder {
    /// Centre X coordinate
    pub center_x: f64,
    /// Centre Z coordinate
    pub center_z: f64,
    /// Edge length of the square
    pub size: f64,
}

impl Default for WorldBorder {
    fn default() -> Self {
        Self::new(0.0, 0.0, 59_999_968.0)
    }
}

impl WorldBorder {
    /// Create a border centred on `(center_x, center_z)`
    pub fn new(center_x: f64, center_z: f64, size: f64) -> Self {
        Self {
            center_x,
            center_z,
            size,
        }
    }

    /// Western edge
    pub fn min_x(&self) -> f64 {
        self.center_x - self.size * 0.5
    }

    /// Eastern edge
    pub fn max_x(&self) -> f64 {
        self.center_x + self.size * 0.5
    }

    /// Northern edge
    pub fn min_z(&self) -> f64 {
        self.center_z - self.size * 0.5
    }

    /// Southern edge
    pub fn max_z(&self) -> f64 {
        self.center_z + self.size * 0.5
    }

    /// Whether `(x, z)` lies inside the border grown by `margin`
    pub fn is_within_bounds(&self, x: f64, z: f64, margin: f64) -> bool {
        x >= self.min_x() - margin
            && x < self.max_x() + margin
            && z >= self.min_z() - margin
            && z < self.max_z() + margin
    }

    /// Distance from `(x, z)` to the nearest edge (negative outside)
    pub fn distance_to_border(&self, x: f64, z: f64) -> f64 {
        let west = x - self.min_x();
        let east = self.max_x() - x;
        let north = z - self.min_z();
        let south = self.max_z() - z;
        west.min(east).min(north).min(south)
    }

    /// Whether an entity at `position` sweeping `volume` is near enough to the
    /// border for its shape to matter
    pub fn is_inside_close_to_border(&self, position: &Vec3, volume: &BoundingVolume) -> bool {
        let margin = (volume.max.x - volume.min.x)
            .abs()
            .max((volume.max.z - volume.min.z).abs())
            .max(1.0);
        self.distance_to_border(position.x, position.z) < margin * 2.0
            && self.is_within_bounds(position.x, position.z, margin)
    }

    /// Solid region outside the border
    pub fn collision_shape(&self) -> VoxelShape {
        let (min_x, max_x, min_z, max_z) = (self.min_x(), self.max_x(), self.min_z(), self.max_z());
        VoxelShape::from_boxes(vec![
            BoundingVolume::from_bounds(min_x - FAR, -FAR, min_z - FAR, min_x, FAR, max_z + FAR),
            BoundingVolume::from_bounds(max_x, -FAR, min_z - FAR, max_x + FAR, FAR, max_z + FAR),
            BoundingVolume::from_bounds(min_x, -FAR, min_z - FAR, max_x, FAR, min_z),
            BoundingVolume::from_bounds(min_x, -FAR, max_z, max_x, FAR, max_z + FAR),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Axis;
    use approx::assert_relative_eq;

    #[test]
    fn far_from_border_is_not_close() {
        let border = WorldBorder::new(0.0, 0.0, 100.0);
        let position = Vec3::new(0.0, 64.0, 0.0);
        let volume = BoundingVolume::of_size(&position, 0.6, 1.8);
        assert!(!border.is_inside_close_to_border(&position, &volume));
    }

    #[test]
    fn near_edge_is_close() {
        let border = WorldBorder::new(0.0, 0.0, 100.0);
        let position = Vec3::new(49.0, 64.0, 0.0);
        let volume = BoundingVolume::of_size(&position, 0.6, 1.8);
        assert!(border.is_inside_close_to_border(&position, &volume));
        assert_relative_eq!(border.distance_to_border(49.0, 0.0), 1.0);
    }

    #[test]
    fn shape_stops_at_edge() {
        let border = WorldBorder::new(0.0, 0.0, 100.0);
        let volume = BoundingVolume::of_size(&Vec3::new(49.0, 64.0, 0.0), 0.6, 1.8);
        let allowed = border.collision_shape().collide(Axis::X, &volume, 5.0, 1.0e-7);
        assert_relative_eq!(allowed, 0.7, epsilon = 1.0e-9);
        assert!(!border.collision_shape().intersects(&volume));
    }
}
