//! # Voxel Motion
//!
//! Per-tick movement resolution for entities in a voxel world.
//!
//! ## Features
//!
//! - **Axis Sweeps**: Displacements are clipped axis by axis against block,
//!   entity and world border shapes
//! - **Step-Up**: Grounded walkers climb onto obstacles up to their step height
//! - **Forced Movement**: Piston pushes share a per-tick budget
//! - **Fluids**: Water and lava currents push submerged entities
//! - **Side Effects**: Landings, footsteps and entered blocks are reported to
//!   a [`events::MovementListener`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use voxel_motion::prelude::*;
//!
//! fn main() -> Result<(), MotionError> {
//!     let mut terrain = VoxelTerrain::new();
//!     terrain.load_area(BlockPos::new(-16, -16, -16), BlockPos::new(15, 15, 15));
//!     terrain.fill(BlockPos::new(-4, -1, -4), BlockPos::new(4, -1, 4), &BlockState::stone());
//!
//!     let mut registry = EntityRegistry::new();
//!     let id = registry.spawn(EntityRecord::new(
//!         EntityMovementState::new(Vec3::new(0.5, 2.0, 0.5), 0.6, 1.8).with_velocity(Vec3::new(0.0, -0.5, 0.0)),
//!     ));
//!
//!     let border = WorldBorder::default();
//!     let system = MovementSystem::new(MotionConfig::default());
//!     let mut clock = TickClock::new();
//!     let mut log = EventLog::new();
//!     for _ in 0..10 {
//!         let ctx = MotionContext::new(&terrain, &border, clock.current());
//!         system.tick_entity(&ctx, &mut registry, id, &mut log)?;
//!         clock.advance();
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core modules
pub mod core;
pub mod config;
pub mod foundation;

// World and entities
pub mod entity;
pub mod world;

// Movement pipeline
pub mod events;
pub mod physics;
pub mod spatial;

/// Common imports for crate users
pub mod prelude {
    pub use crate::{
        core::{Config, ConfigError, MotionConfig, MotionError},
        entity::{CollisionFlags, EntityId, EntityMovementState, EntityRecord, EntityRegistry},
        events::{EventLog, MovementEvent, MovementEventType, MovementListener, NoopListener},
        foundation::{
            math::{Axis, BlockPos, Vec3},
            time::TickClock,
        },
        physics::{
            BoundingVolume, MotionContext, MoveOutcome, MoverType, MovementSystem, SweepResolver, VoxelShape,
        },
        spatial::{ShapeQuery, ShapeStream},
        world::{BlockGetter, BlockProperties, BlockState, FluidKind, FluidState, VoxelTerrain, WorldBorder},
    };
}
