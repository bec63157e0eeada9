//! Movement pipeline errors
//!
//! Only precondition violations are errors. Degenerate geometry and empty
//! shape sets are ordinary inputs and never surface here.

use crate::entity::EntityId;
use crate::foundation::math::Vec3;
use crate::physics::collision::BoundingVolume;

/// Errors reported by the movement orchestrator
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MotionError {
    /// The requested displacement contained NaN or infinity
    #[error("non-finite displacement {displacement:?} requested for entity {entity:?}")]
    NonFiniteDisplacement {
        /// The mover
        entity: EntityId,
        /// The offending request
        displacement: Vec3,
    },

    /// The entity id is not (or no longer) registered
    #[error("unknown entity {0:?}")]
    UnknownEntity(EntityId),

    /// The swept region touches cells whose chunk is not loaded
    #[error("movement of entity {entity:?} sweeps unloaded region {region:?}")]
    UnloadedRegion {
        /// The mover
        entity: EntityId,
        /// The swept volume that could not be serviced
        region: BoundingVolume,
    },
}
