//! Entity movement state and the registry that owns it

pub mod registry;
pub mod state;

pub use registry::{EntityId, EntityRecord, EntityRegistry};
pub use state::{CollisionFlags, EntityMovementState, FluidContact};
