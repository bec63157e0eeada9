//! Collision shape gathering for movement sweeps
//!
//! [`ShapeQuery`] is the single place the movement pipeline reads the world.
//! It combines three collaborators:
//! - the terrain ([`BlockGetter`]) for block collision shapes,
//! - the world border for the solid region outside it,
//! - the [`EntityRegistry`] for solid entities such as boats.
//!
//! Every query is a pure read. Cells in unloaded chunks contribute nothing;
//! callers make sure they only move through loaded regions.

use crate::entity::{EntityId, EntityRegistry};
use crate::foundation::math::{floor_to_i32, Axis, BlockPos, Vec3};
use crate::physics::collision::{BoundingVolume, VoxelShape};
use crate::spatial::shape_stream::ShapeStream;
use crate::world::{BlockGetter, WorldBorder};

/// Read-only view of everything an entity can collide with
#[derive(Clone, Copy)]
pub struct ShapeQuery<'a> {
    terrain: &'a dyn BlockGetter,
    border: &'a WorldBorder,
    entities: &'a EntityRegistry,
    epsilon: f64,
}

impl<'a> ShapeQuery<'a> {
    /// Create a query over the given collaborators
    pub fn new(
        terrain: &'a dyn BlockGetter,
        border: &'a WorldBorder,
        entities: &'a EntityRegistry,
        epsilon: f64,
    ) -> Self {
        Self {
            terrain,
            border,
            entities,
            epsilon,
        }
    }

    /// Terrain collaborator
    pub fn terrain(&self) -> &'a dyn BlockGetter {
        self.terrain
    }

    /// Collision epsilon
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Block shapes overlapping `volume`, gathered lazily cell by cell.
    ///
    /// Cells one beyond the covered range are visited too, but only blocks
    /// whose shape reaches outside their own cell (fences) can contribute
    /// from there. Cells on two or three edges of that outer ring are skipped.
    pub fn block_shapes(&self, volume: &BoundingVolume) -> impl Iterator<Item = VoxelShape> + 'a {
        let terrain = self.terrain;
        let epsilon = self.epsilon;
        let volume = *volume;
        let lo = Vec3::new(
            f64::from(floor_to_i32(volume.min.x - epsilon) - 1),
            f64::from(floor_to_i32(volume.min.y - epsilon) - 1),
            f64::from(floor_to_i32(volume.min.z - epsilon) - 1),
        );
        let hi = Vec3::new(
            f64::from(floor_to_i32(volume.max.x + epsilon) + 1),
            f64::from(floor_to_i32(volume.max.y + epsilon) + 1),
            f64::from(floor_to_i32(volume.max.z + epsilon) + 1),
        );
        let (x0, y0, z0) = (floor_to_i32(lo.x), floor_to_i32(lo.y), floor_to_i32(lo.z));
        let (x1, y1, z1) = (floor_to_i32(hi.x), floor_to_i32(hi.y), floor_to_i32(hi.z));

        (x0..=x1)
            .flat_map(move |x| (y0..=y1).flat_map(move |y| (z0..=z1).map(move |z| BlockPos::new(x, y, z))))
            .filter_map(move |pos| {
                let edges = u8::from(pos.x == x0 || pos.x == x1)
                    + u8::from(pos.y == y0 || pos.y == y1)
                    + u8::from(pos.z == z0 || pos.z == z1);
                if edges >= 2 {
                    return None;
                }
                let state = terrain.block_state(pos)?;
                if edges == 1 && !state.has_large_collision_shape() {
                    return None;
                }
                let shape = state.shape();
                if shape.is_empty() {
                    return None;
                }
                let placed = shape.at(pos);
                placed.intersects(&volume).then_some(placed)
            })
    }

    /// Block shapes in the slab `volume` sweeps when moving `offset` along `axis`
    pub fn block_shapes_along(
        &self,
        axis: Axis,
        volume: &BoundingVolume,
        offset: f64,
    ) -> impl Iterator<Item = VoxelShape> + 'a {
        self.block_shapes(&volume.expand_towards(&axis.vector(offset)))
    }

    /// Shapes of solid entities overlapping `volume` that `mover` collides with
    pub fn entity_shapes(&self, mover: EntityId, volume: &BoundingVolume) -> Vec<VoxelShape> {
        self.entities
            .entity_shapes(volume, self.entities.collidable_with(mover))
    }

    /// Border shape, when an entity at `position` sweeping `volume` is near it
    pub fn border_shape(&self, position: &Vec3, volume: &BoundingVolume) -> Option<VoxelShape> {
        self.border
            .is_inside_close_to_border(position, volume)
            .then(|| self.border.collision_shape())
    }

    /// Entity and border shapes for a sweep of `volume`; blocks are gathered
    /// separately by the sweep so it can pick its query region per path
    pub fn non_block_shapes(&self, mover: EntityId, position: &Vec3, volume: &BoundingVolume) -> Vec<VoxelShape> {
        let mut shapes = self.entity_shapes(mover, volume);
        if let Some(border) = self.border_shape(position, volume) {
            shapes.push(border);
        }
        shapes
    }

    /// Every candidate shape for moving `volume` by `displacement`: the
    /// border (when close), blocks in the swept region, then solid entities.
    /// Blocks are gathered lazily as the stream is walked.
    pub fn collect(&self, mover: EntityId, volume: &BoundingVolume, displacement: &Vec3) -> ShapeStream<'a> {
        let swept = volume.expand_towards(displacement);
        let position = Vec3::new(volume.center().x, volume.min.y, volume.center().z);
        let border = self.border_shape(&position, &swept);
        let entities = self.entity_shapes(mover, &swept);
        ShapeStream::lazy(border)
            .chain(self.block_shapes(&swept))
            .chain(entities)
    }

    /// Whether `volume` is free of blocks, border and solid entities
    pub fn no_collision(&self, mover: EntityId, volume: &BoundingVolume) -> bool {
        let mut stream = self.collect(mover, volume, &Vec3::zeros());
        let mut index = 0;
        while let Some(shape) = stream.get(index) {
            if shape.intersects(volume) {
                return false;
            }
            index += 1;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EntityMovementState, EntityRecord};
    use crate::world::{BlockState, VoxelTerrain};

    fn flat_terrain() -> VoxelTerrain {
        let mut terrain = VoxelTerrain::new();
        terrain.load_area(BlockPos::new(-16, -16, -16), BlockPos::new(31, 31, 31));
        terrain.fill(BlockPos::new(-4, -1, -4), BlockPos::new(4, -1, 4), &BlockState::stone());
        terrain
    }

    #[test]
    fn block_shapes_cover_swept_region_only() {
        let terrain = flat_terrain();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let query = ShapeQuery::new(&terrain, &border, &registry, 1.0e-7);

        let standing = BoundingVolume::of_size(&Vec3::new(0.5, 0.0, 0.5), 0.6, 1.8);
        // Resting on the floor: the floor only touches, nothing overlaps.
        assert_eq!(query.block_shapes(&standing).count(), 0);
        // Falling into the floor overlaps exactly one cell.
        let falling = standing.expand_towards(&Vec3::new(0.0, -0.5, 0.0));
        assert_eq!(query.block_shapes(&falling).count(), 1);
    }

    #[test]
    fn tall_shapes_reach_in_from_outer_ring() {
        let mut terrain = flat_terrain();
        terrain.set_block(BlockPos::new(0, 0, 0), BlockState::fence_post());
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let query = ShapeQuery::new(&terrain, &border, &registry, 1.0e-7);

        // Box hovering above the fence: the fence cell lies in the outer ring
        // but its post reaches up to y = 1.5.
        let above = BoundingVolume::from_bounds(0.3, 1.2, 0.3, 0.7, 2.0, 0.7);
        assert_eq!(query.block_shapes(&above).count(), 1);
    }

    #[test]
    fn unloaded_cells_contribute_nothing() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let query = ShapeQuery::new(&terrain, &border, &registry, 1.0e-7);
        assert_eq!(query.block_shapes(&BoundingVolume::unit()).count(), 0);
    }

    #[test]
    fn collect_includes_border_blocks_and_entities() {
        let mut terrain = VoxelTerrain::new();
        terrain.load_area(BlockPos::new(-16, -16, -16), BlockPos::new(15, 15, 15));
        terrain.set_block(BlockPos::new(4, -1, 0), BlockState::stone());
        let border = WorldBorder::new(0.0, 0.0, 10.0);
        let mut registry = EntityRegistry::new();
        let mover = registry.spawn(EntityRecord::new(EntityMovementState::new(
            Vec3::new(4.5, 0.0, 0.5),
            0.6,
            1.8,
        )));
        registry.spawn(
            EntityRecord::new(EntityMovementState::new(Vec3::new(4.5, -0.5, 1.5), 1.0, 1.0)).solid(),
        );
        let query = ShapeQuery::new(&terrain, &border, &registry, 1.0e-7);

        let volume = registry.movement(mover).map(EntityMovementState::bounding_volume).unwrap();
        let mut stream = query.collect(mover, &volume, &Vec3::new(0.0, -1.0, 1.0));
        assert_eq!(stream.materialize().len(), 3);
        assert!(!query.no_collision(mover, &volume.moved(&Vec3::new(0.0, -0.5, 0.0))));
        assert!(query.no_collision(mover, &volume.moved(&Vec3::new(0.0, 0.5, -2.0))));
    }
}
