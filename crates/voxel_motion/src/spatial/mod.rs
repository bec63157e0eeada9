//! Spatial queries over the voxel world
//!
//! Gathers the collision shapes near a moving entity and caches them so a
//! sweep can replay them axis after axis.

pub mod shape_query;
pub mod shape_stream;

pub use shape_query::ShapeQuery;
pub use shape_stream::ShapeStream;
