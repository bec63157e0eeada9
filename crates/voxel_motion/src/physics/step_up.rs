//! Automatic stepping onto low obstacles
//!
//! When a grounded entity walks into something no taller than its step
//! height, the plain sweep stops it dead. The step-up resolver tries again
//! from a raised position and keeps that result only when it makes more
//! horizontal progress, then lowers the entity back onto whatever it stepped
//! on.

use crate::foundation::logging::debug;
use crate::foundation::math::{horizontal_distance_sqr, Vec3};
use crate::physics::collision::{BoundingVolume, VoxelShape};
use crate::physics::sweep::SweepResolver;

/// Result of a sweep that may have used the step-up fallback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    /// Displacement the entity actually takes
    pub resolved: Vec3,
    /// The stepped candidate beat the plain sweep
    pub stepped: bool,
}

/// Step-up fallback layered over a [`SweepResolver`]
pub struct StepUpResolver<'r, 'a> {
    sweep: &'r SweepResolver<'a>,
}

impl<'r, 'a> StepUpResolver<'r, 'a> {
    /// Wrap `sweep`
    pub fn new(sweep: &'r SweepResolver<'a>) -> Self {
        Self { sweep }
    }

    /// Whether a move that resolved to `baseline` should try stepping up.
    ///
    /// The entity must have a step height, stand on the ground (or have just
    /// landed during this move) and be blocked horizontally.
    pub fn is_eligible(step_height: f64, on_ground: bool, requested: &Vec3, baseline: &Vec3) -> bool {
        let landed = requested.y != baseline.y && requested.y < 0.0;
        let blocked_horizontally = requested.x != baseline.x || requested.z != baseline.z;
        step_height > 0.0 && (on_ground || landed) && blocked_horizontally
    }

    /// Sweep `requested`, falling back to a stepped move when eligible
    pub fn resolve(
        &self,
        volume: &BoundingVolume,
        requested: &Vec3,
        step_height: f64,
        on_ground: bool,
        extra: &[VoxelShape],
    ) -> StepOutcome {
        let baseline = self.sweep.resolve(volume, requested, extra);
        if !Self::is_eligible(step_height, on_ground, requested, &baseline) {
            return StepOutcome {
                resolved: baseline,
                stepped: false,
            };
        }

        let horizontal = Vec3::new(requested.x, 0.0, requested.z);
        let mut candidate = self
            .sweep
            .resolve(volume, &Vec3::new(requested.x, step_height, requested.z), extra);

        let rise = self.sweep.resolve(
            &volume.expand_towards(&horizontal),
            &Vec3::new(0.0, step_height, 0.0),
            extra,
        );
        if rise.y < step_height {
            let across = self.sweep.resolve(&volume.moved(&rise), &horizontal, extra) + rise;
            if horizontal_distance_sqr(&across) > horizontal_distance_sqr(&candidate) {
                candidate = across;
            }
        }

        if horizontal_distance_sqr(&candidate) > horizontal_distance_sqr(&baseline) {
            let settle = self.sweep.resolve(
                &volume.moved(&candidate),
                &Vec3::new(0.0, requested.y - candidate.y, 0.0),
                extra,
            );
            let resolved = candidate + settle;
            debug!(
                "stepped up: requested {:?} baseline {:?} resolved {:?}",
                requested, baseline, resolved
            );
            StepOutcome {
                resolved,
                stepped: true,
            }
        } else {
            StepOutcome {
                resolved: baseline,
                stepped: false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SweepConfig;
    use crate::entity::EntityRegistry;
    use crate::foundation::math::BlockPos;
    use crate::spatial::ShapeQuery;
    use crate::world::{BlockState, VoxelTerrain, WorldBorder};
    use approx::assert_relative_eq;

    fn terrain_with(blocks: &[(BlockPos, BlockState)]) -> VoxelTerrain {
        let mut terrain = VoxelTerrain::new();
        terrain.load_area(BlockPos::new(-16, -16, -16), BlockPos::new(15, 15, 15));
        terrain.fill(BlockPos::new(-2, -1, -2), BlockPos::new(3, -1, 2), &BlockState::stone());
        for (pos, state) in blocks {
            terrain.set_block(*pos, state.clone());
        }
        terrain
    }

    #[test]
    fn steps_onto_half_block() {
        let terrain = terrain_with(&[(BlockPos::new(1, 0, 0), BlockState::bottom_slab())]);
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let sweep = SweepResolver::new(ShapeQuery::new(&terrain, &border, &registry, 1.0e-7), SweepConfig::default());
        let outcome = StepUpResolver::new(&sweep).resolve(
            &BoundingVolume::unit(),
            &Vec3::new(0.3, 0.0, 0.0),
            0.6,
            true,
            &[],
        );
        assert!(outcome.stepped);
        assert_relative_eq!(outcome.resolved, Vec3::new(0.3, 0.5, 0.0), epsilon = 1.0e-9);
    }

    #[test]
    fn full_block_is_too_tall() {
        let terrain = terrain_with(&[(BlockPos::new(1, 0, 0), BlockState::stone())]);
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let sweep = SweepResolver::new(ShapeQuery::new(&terrain, &border, &registry, 1.0e-7), SweepConfig::default());
        let outcome = StepUpResolver::new(&sweep).resolve(
            &BoundingVolume::unit(),
            &Vec3::new(0.3, 0.0, 0.0),
            0.6,
            true,
            &[],
        );
        assert!(!outcome.stepped);
        assert_eq!(outcome.resolved, Vec3::zeros());
    }

    #[test]
    fn airborne_entities_do_not_step() {
        let requested = Vec3::new(0.3, 0.0, 0.0);
        let baseline = Vec3::zeros();
        assert!(!StepUpResolver::is_eligible(0.6, false, &requested, &baseline));
        assert!(StepUpResolver::is_eligible(0.6, true, &requested, &baseline));
        assert!(!StepUpResolver::is_eligible(0.0, true, &requested, &baseline));
        // Landing during the move counts as grounded.
        let falling = Vec3::new(0.3, -0.5, 0.0);
        assert!(StepUpResolver::is_eligible(0.6, false, &falling, &Vec3::new(0.0, -0.1, 0.0)));
    }

    #[test]
    fn low_ceiling_blocks_step() {
        let terrain = terrain_with(&[
            (BlockPos::new(1, 0, 0), BlockState::bottom_slab()),
            (BlockPos::new(0, 1, 0), BlockState::stone()),
            (BlockPos::new(1, 1, 0), BlockState::stone()),
        ]);
        let border = WorldBorder::default();
        let registry = EntityRegistry::new();
        let sweep = SweepResolver::new(ShapeQuery::new(&terrain, &border, &registry, 1.0e-7), SweepConfig::default());
        let outcome = StepUpResolver::new(&sweep).resolve(
            &BoundingVolume::unit(),
            &Vec3::new(0.3, 0.0, 0.0),
            0.6,
            true,
            &[],
        );
        assert!(!outcome.stepped);
        assert_relative_eq!(outcome.resolved.x, 0.0);
    }
}
