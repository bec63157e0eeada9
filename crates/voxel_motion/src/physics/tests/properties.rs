//! Seeded randomized checks of the sweep invariants
//!
//! Worlds, boxes and displacements all sit on power-of-two grids so every
//! coordinate the resolvers produce is exact and contact means touching
//! faces, never a rounding sliver.

use super::{cube_at, Harness};
use crate::entity::{EntityId, EntityMovementState};
use crate::foundation::math::{Axis, BlockPos, Vec3};
use crate::physics::collision::BoundingVolume;
use crate::physics::movement::MoverType;
use crate::physics::piston::PistonClamp;
use crate::physics::step_up::StepUpResolver;
use crate::physics::sweep::{SweepPath, SweepResolver};
use crate::world::{BlockState, WorldBorder};
use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const SEEDS: u64 = 24;
const SAMPLES_PER_WORLD: usize = 40;
const STEP_HEIGHT: f64 = 0.625;

fn random_block(rng: &mut StdRng) -> BlockState {
    match rng.gen_range(0..4) {
        0 => BlockState::stone(),
        1 => BlockState::bottom_slab(),
        2 => BlockState::fence_post(),
        _ => BlockState::soul_sand(),
    }
}

fn random_world(seed: u64) -> (Harness, StdRng) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut harness = Harness::new();
    for _ in 0..60 {
        let pos = BlockPos::new(rng.gen_range(-4..4), rng.gen_range(-3..3), rng.gen_range(-4..4));
        let block = random_block(&mut rng);
        harness.terrain.set_block(pos, block);
    }
    (harness, rng)
}

/// Multiple of 1/16 in `[lo, hi)`
fn sixteenth(rng: &mut StdRng, lo: i32, hi: i32) -> f64 {
    f64::from(rng.gen_range(lo * 16..hi * 16)) / 16.0
}

/// Displacement in multiples of 1/32 within +-1.5 per axis, with some axes
/// zeroed so both sweep paths get exercised
fn random_displacement(rng: &mut StdRng) -> Vec3 {
    let component = |rng: &mut StdRng| {
        if rng.gen_bool(0.3) {
            0.0
        } else {
            f64::from(rng.gen_range(-48..=48)) / 32.0
        }
    };
    Vec3::new(component(rng), component(rng), component(rng))
}

fn random_entity(rng: &mut StdRng) -> EntityMovementState {
    let width = [0.5, 0.75, 1.0][rng.gen_range(0..3)];
    let height = [0.5, 1.0, 1.75][rng.gen_range(0..3)];
    let position = Vec3::new(sixteenth(rng, -3, 3), sixteenth(rng, -2, 2), sixteenth(rng, -3, 3));
    EntityMovementState::new(position, width, height)
}

/// Spawn a random entity whose box starts clear of every block
fn spawn_clear(harness: &mut Harness, rng: &mut StdRng) -> Option<EntityId> {
    let state = random_entity(rng);
    if harness.query().block_shapes(&state.bounding_volume()).next().is_some() {
        return None;
    }
    Some(harness.spawn(state))
}

fn is_clear(harness: &Harness, volume: &BoundingVolume) -> bool {
    harness.query().block_shapes(volume).next().is_none()
}

fn for_each_sample(mut check: impl FnMut(&Harness, EntityId, Vec3)) {
    for seed in 0..SEEDS {
        let (mut harness, mut rng) = random_world(seed);
        for _ in 0..SAMPLES_PER_WORLD {
            let Some(id) = spawn_clear(&mut harness, &mut rng) else {
                continue;
            };
            let d = random_displacement(&mut rng);
            check(&harness, id, d);
        }
    }
}

#[test]
fn test_sweep_never_penetrates() {
    for_each_sample(|harness, id, d| {
        let sweep = SweepResolver::new(harness.query(), harness.system.config().sweep);
        let volume = harness.state(id).bounding_volume();
        let resolved = sweep.resolve(&volume, &d, &[]);
        assert!(
            is_clear(harness, &volume.moved(&resolved)),
            "{volume:?} moved {resolved:?} (requested {d:?}) overlaps a block"
        );
    });
}

#[test]
fn test_sweep_only_shortens_each_axis() {
    for_each_sample(|harness, id, d| {
        let sweep = SweepResolver::new(harness.query(), harness.system.config().sweep);
        let resolved = sweep.resolve(&harness.state(id).bounding_volume(), &d, &[]);
        for axis in Axis::ALL {
            let (want, got) = (d[axis.index()], resolved[axis.index()]);
            assert!(got.abs() <= want.abs(), "{axis:?}: {got} exceeds {want}");
            assert!(got == 0.0 || got.signum() == want.signum(), "{axis:?}: {got} flipped sign of {want}");
        }
    });
}

#[test]
fn test_zero_displacement_resolves_to_zero() {
    for_each_sample(|harness, id, _| {
        let sweep = SweepResolver::new(harness.query(), harness.system.config().sweep);
        let volume = harness.state(id).bounding_volume();
        assert_eq!(sweep.resolve(&volume, &Vec3::zeros(), &[]), Vec3::zeros());
    });
}

#[test]
fn test_legacy_and_general_paths_agree() {
    for_each_sample(|harness, id, d| {
        let sweep = SweepResolver::new(harness.query(), harness.system.config().sweep);
        let volume = harness.state(id).bounding_volume();
        let legacy = sweep.resolve_with_path(SweepPath::Legacy, &volume, &d, &[]);
        let general = sweep.resolve_with_path(SweepPath::General, &volume, &d, &[]);
        assert_relative_eq!(legacy, general, epsilon = 1.0e-9);
    });
}

#[test]
fn test_step_up_never_loses_horizontal_progress() {
    for_each_sample(|harness, id, d| {
        let sweep = SweepResolver::new(harness.query(), harness.system.config().sweep);
        let step_up = StepUpResolver::new(&sweep);
        let volume = harness.state(id).bounding_volume();
        let baseline = sweep.resolve(&volume, &d, &[]);
        let outcome = step_up.resolve(&volume, &d, STEP_HEIGHT, true, &[]);

        let progress = |v: &Vec3| v.x * v.x + v.z * v.z;
        assert!(progress(&outcome.resolved) >= progress(&baseline));
        assert!(is_clear(harness, &volume.moved(&outcome.resolved)));
        if !outcome.stepped {
            assert_eq!(outcome.resolved, baseline);
        }
    });
}

#[test]
fn test_orchestrated_moves_never_penetrate() {
    for seed in 0..SEEDS {
        let (mut harness, mut rng) = random_world(seed);
        let Some(id) = (0..SAMPLES_PER_WORLD).find_map(|_| spawn_clear(&mut harness, &mut rng)) else {
            continue;
        };
        harness.state_mut(id).step_height = STEP_HEIGHT;
        for _ in 0..SAMPLES_PER_WORLD {
            if harness.state(id).position.abs().max() > 16.0 {
                break;
            }
            let d = random_displacement(&mut rng);
            let outcome = harness.move_entity(id, MoverType::SelfPropelled, d).unwrap();
            let volume = harness.state(id).bounding_volume();
            assert!(
                is_clear(&harness, &volume),
                "seed {seed}: {volume:?} after {outcome:?} overlaps a block"
            );
        }
    }
}

#[test]
fn test_piston_budget_stays_within_limit() {
    let config = crate::core::PistonConfig::default();
    let mut rng = StdRng::seed_from_u64(7);
    let mut clamp = PistonClamp::default();
    for tick in 0..50 {
        let mut pushed = [0.0; 3];
        for _ in 0..rng.gen_range(1..8) {
            let d = random_displacement(&mut rng);
            let granted = clamp.limit(tick, &d, &config);
            assert!(granted.iter().filter(|c| **c != 0.0).count() <= 1);
            for axis in Axis::ALL {
                pushed[axis.index()] += granted[axis.index()];
            }
        }
        for axis in Axis::ALL {
            assert!(clamp.granted(axis).abs() <= config.limit);
            assert!(pushed[axis.index()].abs() <= config.limit + 1.0e-4);
        }
        assert_eq!(clamp.tick(), Some(tick));
    }
}

#[test]
fn test_border_keeps_entities_inside() {
    let mut rng = StdRng::seed_from_u64(11);
    let mut harness = Harness::new();
    harness.border = WorldBorder::new(0.0, 0.0, 8.0);
    let id = harness.spawn(cube_at(-0.5, 0.0, -0.5));
    for _ in 0..400 {
        let d = Vec3::new(1.0, 0.0, 1.0).component_mul(&random_displacement(&mut rng));
        harness.move_entity(id, MoverType::SelfPropelled, d).unwrap();
        let volume = harness.state(id).bounding_volume();
        assert!(volume.min.x >= -4.0 && volume.max.x <= 4.0, "{volume:?} left the border on x");
        assert!(volume.min.z >= -4.0 && volume.max.z <= 4.0, "{volume:?} left the border on z");
    }
}
