//! # World Module
//!
//! Read-side view of the world consulted by movement resolution: block
//! states and fluids, the terrain lookup trait with a chunked in-memory
//! implementation, and the world border.

pub mod block;
pub mod border;
pub mod terrain;

pub use block::{BlockProperties, BlockState, FluidKind, FluidState};
pub use border::WorldBorder;
pub use terrain::{chunk_pos_of, BlockGetter, Chunk, ChunkPos, VoxelTerrain, CHUNK_SIZE};
