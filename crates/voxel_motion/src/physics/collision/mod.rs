//! Collision geometry
//!
//! # Module Organization
//!
//! - [`volume`] - Axis-aligned bounding volumes (entity boxes, query regions)
//! - [`shape`] - Voxel collision shapes and the per-axis collide operation
//!
//! # Key Types
//!
//! - [`BoundingVolume`] - Immutable box an entity occupies
//! - [`VoxelShape`] - Collidable geometry of a cell or entity

pub mod volume;
pub mod shape;

// Re-export commonly used types
pub use volume::BoundingVolume;
pub use shape::VoxelShape;
