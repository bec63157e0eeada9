//! # Axis Sweep Resolver
//!
//! Reduces a requested displacement to the largest displacement the entity
//! box can travel without entering any collision shape. Axes are resolved one
//! at a time and the box is shifted by each resolved component before the
//! next axis is considered, so corners and ledges resolve the way a player
//! expects.
//!
//! ## Axis Order
//!
//! Vertical motion is resolved first so gravity settles an entity onto a
//! surface before it slides. Of the two horizontal axes the one with the
//! smaller magnitude goes next, which lets entities slide along walls.
//!
//! ## Paths
//!
//! - **Legacy**: at most one non-zero component. Block shapes are queried
//!   per axis over the slab that axis sweeps, after the cheaper entity and
//!   border shapes had their say.
//! - **General**: everything else. Block shapes of the full swept region are
//!   gathered once into a [`ShapeStream`] and replayed for every axis.
//!
//! Both paths produce the same result; the legacy path only avoids gathering
//! cells a single-axis move never reaches.

use std::ops::ControlFlow;

use crate::core::SweepConfig;
use crate::foundation::logging::{trace, warn};
use crate::foundation::math::{Axis, Vec3};
use crate::physics::collision::{BoundingVolume, VoxelShape};
use crate::spatial::{ShapeQuery, ShapeStream};

/// Which gathering strategy a sweep uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPath {
    /// Per-axis slab queries for single-axis moves
    Legacy,
    /// One swept-volume query replayed for every axis
    General,
}

impl SweepPath {
    /// Path for displacement `d`; `unify` forces the general path
    pub fn for_displacement(d: &Vec3, unify: bool) -> Self {
        let zeros = d.iter().filter(|c| **c == 0.0).count();
        if zeros >= 2 && !unify {
            Self::Legacy
        } else {
            Self::General
        }
    }
}

/// Order in which the three axes of a displacement are resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisOrder([Axis; 3]);

impl AxisOrder {
    /// Y, then the horizontal axis with the smaller magnitude, then the other
    pub fn for_displacement(d: &Vec3) -> Self {
        if d.x.abs() < d.z.abs() {
            Self([Axis::Y, Axis::X, Axis::Z])
        } else {
            Self([Axis::Y, Axis::Z, Axis::X])
        }
    }

    /// Axes in resolution order
    pub fn axes(&self) -> [Axis; 3] {
        self.0
    }
}

/// Reduce `offset` along `axis` against every shape, stopping once it hits zero
pub fn collide_along<'s>(
    axis: Axis,
    volume: &BoundingVolume,
    shapes: impl IntoIterator<Item = &'s VoxelShape>,
    offset: f64,
    epsilon: f64,
) -> f64 {
    let reduced = shapes.into_iter().try_fold(offset, |allowed, shape| {
        step(shape.collide(axis, volume, allowed, epsilon))
    });
    settle(reduced)
}

/// Owned-shape variant of [`collide_along`] for lazily gathered block shapes
fn collide_along_owned(
    axis: Axis,
    volume: &BoundingVolume,
    shapes: impl Iterator<Item = VoxelShape>,
    offset: f64,
    epsilon: f64,
) -> f64 {
    let mut shapes = shapes;
    let reduced = shapes.try_fold(offset, |allowed, shape| {
        step(shape.collide(axis, volume, allowed, epsilon))
    });
    settle(reduced)
}

fn step(allowed: f64) -> ControlFlow<f64, f64> {
    if allowed == 0.0 {
        ControlFlow::Break(0.0)
    } else {
        ControlFlow::Continue(allowed)
    }
}

fn settle(flow: ControlFlow<f64, f64>) -> f64 {
    match flow {
        ControlFlow::Continue(v) | ControlFlow::Break(v) => v,
    }
}

/// Resolves displacements against the shapes a [`ShapeQuery`] provides
#[derive(Clone, Copy)]
pub struct SweepResolver<'a> {
    query: ShapeQuery<'a>,
    config: SweepConfig,
}

impl<'a> SweepResolver<'a> {
    /// Create a resolver over `query`
    pub fn new(query: ShapeQuery<'a>, config: SweepConfig) -> Self {
        Self { query, config }
    }

    /// Shape source of this resolver
    pub fn query(&self) -> &ShapeQuery<'a> {
        &self.query
    }

    /// Path a sweep of `d` takes under the current configuration
    pub fn path_for(&self, d: &Vec3) -> SweepPath {
        SweepPath::for_displacement(d, self.config.unify_paths)
    }

    /// Resolve `d` for `volume` against blocks plus the already gathered
    /// non-block shapes in `extra`
    pub fn resolve(&self, volume: &BoundingVolume, d: &Vec3, extra: &[VoxelShape]) -> Vec3 {
        self.resolve_with_path(self.path_for(d), volume, d, extra)
    }

    /// Resolve `d` through an explicit path
    pub fn resolve_with_path(
        &self,
        path: SweepPath,
        volume: &BoundingVolume,
        d: &Vec3,
        extra: &[VoxelShape],
    ) -> Vec3 {
        if d.norm_squared() == 0.0 {
            return *d;
        }
        let resolved = match path {
            SweepPath::Legacy => self.resolve_legacy(volume, d, extra),
            SweepPath::General => {
                let mut stream = ShapeStream::from_vec(extra.to_vec())
                    .chain(self.query.block_shapes(&volume.expand_towards(d)));
                self.collide_with_shapes(volume, d, &mut stream)
            }
        };
        trace!("sweep {:?} requested {:?} resolved {:?}", path, d, resolved);
        resolved
    }

    /// Ordered sweep of `d` against a replayable shape stream
    pub fn collide_with_shapes(&self, volume: &BoundingVolume, d: &Vec3, shapes: &mut ShapeStream<'_>) -> Vec3 {
        let epsilon = self.config.epsilon;
        let mut current = *volume;
        let mut resolved = Vec3::zeros();
        for axis in AxisOrder::for_displacement(d).axes() {
            let Some(offset) = requested_on(axis, &current, d) else {
                continue;
            };
            let allowed = shapes.fold_until(offset, |allowed, shape| {
                step(shape.collide(axis, &current, allowed, epsilon))
            });
            resolved[axis.index()] = allowed;
            current = current.moved(&axis.vector(allowed));
        }
        resolved
    }

    fn resolve_legacy(&self, volume: &BoundingVolume, d: &Vec3, extra: &[VoxelShape]) -> Vec3 {
        let epsilon = self.config.epsilon;
        let mut current = *volume;
        let mut resolved = Vec3::zeros();
        for axis in AxisOrder::for_displacement(d).axes() {
            let Some(offset) = requested_on(axis, &current, d) else {
                continue;
            };
            let mut allowed = collide_along(axis, &current, extra, offset, epsilon);
            if allowed != 0.0 {
                let blocks = self.query.block_shapes_along(axis, &current, allowed);
                allowed = collide_along_owned(axis, &current, blocks, allowed, epsilon);
            }
            resolved[axis.index()] = allowed;
            current = current.moved(&axis.vector(allowed));
        }
        resolved
    }
}

/// Requested offset on `axis`, or `None` when there is nothing to resolve
fn requested_on(axis: Axis, volume: &BoundingVolume, d: &Vec3) -> Option<f64> {
    let offset = d[axis.index()];
    if offset == 0.0 {
        return None;
    }
    if volume.is_degenerate(axis) {
        warn!(
            "bounding volume {:?} has no extent on {:?}; dropping offset {}",
            volume, axis, offset
        );
        return None;
    }
    Some(offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityRegistry;
    use crate::foundation::math::BlockPos;
    use crate::world::{BlockState, VoxelTerrain, WorldBorder};
    use approx::assert_relative_eq;

    fn terrain_with(blocks: &[(BlockPos, BlockState)]) -> VoxelTerrain {
        let mut terrain = VoxelTerrain::new();
        terrain.load_area(BlockPos::new(-16, -16, -16), BlockPos::new(15, 15, 15));
        for (pos, state) in blocks {
            terrain.set_block(*pos, state.clone());
        }
        terrain
    }

    #[test]
    fn axis_order_resolves_shorter_horizontal_first() {
        assert_eq!(
            AxisOrder::for_displacement(&Vec3::new(0.1, 0.0, 0.5)).axes(),
            [Axis::Y, Axis::X, Axis::Z]
        );
        assert_eq!(
            AxisOrder::for_displacement(&Vec3::new(0.5, 0.0, 0.1)).axes(),
            [Axis::Y, Axis::Z, Axis::X]
        );
    }

    #[test]
    fn path_selection_counts_zero_components() {
        assert_eq!(SweepPath::for_displacement(&Vec3::new(0.0, -1.0, 0.0), false), SweepPath::Legacy);
        assert_eq!(SweepPath::for_displacement(&Vec3::new(0.2, -1.0, 0.0), false), SweepPath::General);
        assert_eq!(SweepPath::for_displacement(&Vec3::new(0.0, -1.0, 0.0), true), SweepPath::General);
    }

    #[test]
    fn empty_world_leaves_displacement_untouched() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let d = Vec3::new(0.3, -0.2, 0.7);
        assert_eq!(resolver.resolve(&BoundingVolume::unit(), &d, &[]), d);
    }

    #[test]
    fn sub_epsilon_offset_survives_without_shapes() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let d = Vec3::new(5.0e-8, 0.0, 0.0);
        for path in [SweepPath::Legacy, SweepPath::General] {
            assert_eq!(resolver.resolve_with_path(path, &BoundingVolume::unit(), &d, &[]), d);
        }
    }

    #[test]
    fn sub_epsilon_offset_snaps_against_a_shape() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let wall = VoxelShape::from_box(BoundingVolume::from_bounds(2.0, 0.0, 0.0, 3.0, 1.0, 1.0));
        let resolved = resolver.resolve(
            &BoundingVolume::unit(),
            &Vec3::new(5.0e-8, 0.0, 0.0),
            std::slice::from_ref(&wall),
        );
        assert_eq!(resolved, Vec3::zeros());
    }

    #[test]
    fn sliding_along_wall_keeps_parallel_component() {
        let terrain = terrain_with(&[(BlockPos::new(1, 0, 0), BlockState::stone())]);
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let volume = BoundingVolume::from_bounds(0.2, 0.0, 0.2, 0.8, 0.9, 0.8);
        let resolved = resolver.resolve(&volume, &Vec3::new(0.5, 0.0, -0.3), &[]);
        assert_relative_eq!(resolved.x, 0.2, epsilon = 1.0e-9);
        assert_relative_eq!(resolved.z, -0.3);
    }

    #[test]
    fn extra_shapes_block_like_blocks() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let boat = VoxelShape::from_box(BoundingVolume::from_bounds(-1.0, -0.5, -1.0, 2.0, 0.0, 2.0));
        for path in [SweepPath::Legacy, SweepPath::General] {
            let resolved = resolver.resolve_with_path(
                path,
                &BoundingVolume::unit(),
                &Vec3::new(0.0, -1.0, 0.0),
                std::slice::from_ref(&boat),
            );
            assert_eq!(resolved, Vec3::zeros());
        }
    }

    #[test]
    fn degenerate_axis_drops_offset() {
        let terrain = VoxelTerrain::new();
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let resolver = SweepResolver::new(
            ShapeQuery::new(&terrain, &border, &registry, 1.0e-7),
            SweepConfig::default(),
        );
        let flat = BoundingVolume::from_bounds(0.0, 0.0, 0.0, 1.0, 0.0, 1.0);
        let resolved = resolver.resolve(&flat, &Vec3::new(0.0, 0.5, 0.0), &[]);
        assert_eq!(resolved, Vec3::zeros());
    }
}
