//! Headless movement demo
//!
//! Builds a small test course (a stone floor, a slab step, a water pool and a
//! ladder against a wall), drops a handful of walkers onto it and runs the
//! movement pipeline for a few hundred ticks, logging what happens.
//!
//! Usage: `motion_demo [config.toml|config.ron] [ticks]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use voxel_motion::prelude::*;

const DEFAULT_TICKS: u64 = 200;
const WALKERS: usize = 4;

#[derive(Error, Debug)]
enum DemoError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("movement: {0}")]
    Motion(#[from] MotionError),

    #[error("invalid tick count {0:?}")]
    Ticks(String),
}

/// Floor, step, pool and climbing wall inside one loaded area
fn build_course() -> VoxelTerrain {
    let mut terrain = VoxelTerrain::new();
    terrain.load_area(BlockPos::new(-32, -16, -32), BlockPos::new(31, 31, 31));
    terrain.fill(BlockPos::new(-12, -1, -12), BlockPos::new(12, -1, 12), &BlockState::stone());

    // Low step along x = 3
    terrain.fill(BlockPos::new(3, 0, -2), BlockPos::new(3, 0, 2), &BlockState::bottom_slab());

    // Still pool with a current flowing east
    terrain.fill(BlockPos::new(-8, -2, -8), BlockPos::new(-5, -2, -5), &BlockState::stone());
    terrain.fill(
        BlockPos::new(-8, -1, -8),
        BlockPos::new(-5, -1, -5),
        &BlockState::fluid_block(FluidState::still(FluidKind::Water, 1.0)),
    );
    terrain.fill(
        BlockPos::new(-8, 0, -8),
        BlockPos::new(-5, 0, -5),
        &BlockState::fluid_block(FluidState::flowing(FluidKind::Water, 0.5, Vec3::new(1.0, 0.0, 0.0))),
    );

    // Ladder against a three-high wall
    terrain.fill(BlockPos::new(8, 0, 6), BlockPos::new(8, 2, 6), &BlockState::stone());
    terrain.fill(BlockPos::new(7, 0, 6), BlockPos::new(7, 2, 6), &BlockState::ladder());
    terrain
}

fn spawn_walkers(registry: &mut EntityRegistry, config: &MotionConfig, rng: &mut StdRng) -> Vec<EntityId> {
    (0..WALKERS)
        .map(|_| {
            let position = Vec3::new(rng.gen_range(-6.0..6.0), rng.gen_range(1.0..3.0), rng.gen_range(-6.0..6.0));
            let state = EntityMovementState::with_defaults(position, &config.entity);
            registry.spawn(EntityRecord::new(state))
        })
        .collect()
}

/// Walkers pick a new heading now and then and fall under gravity
fn steer(state: &mut EntityMovementState, rng: &mut StdRng) {
    if rng.gen_bool(0.1) {
        state.velocity.x = rng.gen_range(-0.2..0.2);
        state.velocity.z = rng.gen_range(-0.2..0.2);
    }
    state.velocity.y = (state.velocity.y - 0.08) * 0.98;
}

fn run() -> Result<(), DemoError> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            MotionConfig::load_from_file(&path)?
        }
        None => MotionConfig::default(),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u64>().map_err(|_| DemoError::Ticks(raw))?,
        None => DEFAULT_TICKS,
    };

    let terrain = build_course();
    let border = WorldBorder::new(0.0, 0.0, 24.0);
    let mut registry = EntityRegistry::new();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let walkers = spawn_walkers(&mut registry, &config, &mut rng);
    let system = MovementSystem::try_new(config)?;
    let mut clock = TickClock::new();
    let mut log = EventLog::new();

    log::info!("Running {} walkers for {} ticks", walkers.len(), ticks);
    for _ in 0..ticks {
        let ctx = MotionContext::new(&terrain, &border, clock.current());
        for &id in &walkers {
            if let Some(record) = registry.get_mut(id) {
                steer(&mut record.movement, &mut rng);
            }
            let outcome = system.tick_entity(&ctx, &mut registry, id, &mut log)?;
            if outcome.stepped {
                log::debug!("tick {}: {:?} stepped up by {:.3}", ctx.tick, id, outcome.resolved.y);
            }
        }
        for event in log.drain() {
            match event {
                MovementEvent::GroundedLanding { entity, impact, .. } if impact.fall_distance > 0.0 => {
                    log::info!("tick {}: {:?} landed after falling {:.2}", ctx.tick, entity, impact.fall_distance);
                }
                MovementEvent::StepSound { entity, block_below, .. } => {
                    log::debug!("tick {}: {:?} footstep on {}", ctx.tick, entity, block_below.name());
                }
                MovementEvent::Extinguished { entity } => {
                    log::info!("tick {}: {:?} extinguished", ctx.tick, entity);
                }
                _ => {}
            }
        }
        clock.advance();
    }

    for &id in &walkers {
        if let Some(state) = registry.movement(id) {
            log::info!(
                "{:?} ended at ({:.2}, {:.2}, {:.2}), walked {:.2}, on ground: {}",
                id,
                state.position.x,
                state.position.y,
                state.position.z,
                state.walk_distance,
                state.on_ground
            );
        }
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("Starting voxel motion demo");
    match run() {
        Ok(()) => log::info!("Demo finished successfully"),
        Err(e) => {
            log::error!("Demo failed: {}", e);
            std::process::exit(1);
        }
    }
}
