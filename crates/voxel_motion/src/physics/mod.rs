//! Physics module for voxel movement resolution
//!
//! Provides the collision geometry and every stage of the per-tick movement
//! pipeline, from the piston budget through the axis sweep to the
//! orchestrator that commits a move.

pub mod climb;
pub mod collision;
pub mod fluid;
pub mod movement;
pub mod piston;
pub mod step_up;
pub mod sweep;

#[cfg(test)]
mod tests;

pub use climb::Climbing;
pub use collision::{BoundingVolume, VoxelShape};
pub use fluid::{FluidPush, FluidSample};
pub use movement::{MotionContext, MoveOutcome, MoverType, MovementSystem};
pub use piston::PistonClamp;
pub use step_up::{StepOutcome, StepUpResolver};
pub use sweep::{collide_along, AxisOrder, SweepPath, SweepResolver};
