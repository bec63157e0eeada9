//! # Terrain
//!
//! The movement pipeline reads blocks through the [`BlockGetter`] trait and
//! never owns terrain itself. [`VoxelTerrain`] is a chunked in-memory
//! implementation used by tests and the demo.
//!
//! ## Architecture
//!
//! Terrain is stored as a sparse map of 16x16x16 chunks. A chunk that was
//! never loaded is distinct from a loaded chunk full of air: movement into
//! an unloaded region is a caller error, while air simply has no collision.

use std::collections::HashMap;

use super::block::BlockState;
use crate::foundation::math::{floor_to_i32, BlockPos, Point3};
use crate::physics::collision::BoundingVolume;

/// Edge length of a chunk in cells
pub const CHUNK_SIZE: i32 = 16;

const CHUNK_VOLUME: usize = (CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE) as usize;

/// Chunk coordinates (cell coordinates divided by [`CHUNK_SIZE`])
pub type ChunkPos = Point3<i32>;

/// Read access to block states, implemented by the terrain collaborator
pub trait BlockGetter {
    /// Block at `pos`; `None` for air and for cells in unloaded chunks
    fn block_state(&self, pos: BlockPos) -> Option<BlockState>;

    /// Whether every cell touched by `area` belongs to a loaded chunk
    fn is_area_loaded(&self, _area: &BoundingVolume) -> bool {
        true
    }
}

/// Chunk containing a cell
pub fn chunk_pos_of(pos: BlockPos) -> ChunkPos {
    ChunkPos::new(
        pos.x.div_euclid(CHUNK_SIZE),
        pos.y.div_euclid(CHUNK_SIZE),
        pos.z.div_euclid(CHUNK_SIZE),
    )
}

/// A 16x16x16 block of cells
#[derive(Debug, Clone)]
pub struct Chunk {
    blocks: Vec<Option<BlockState>>,
}

impl Default for Chunk {
    fn default() -> Self {
        Self::empty()
    }
}

impl Chunk {
    /// A chunk full of air
    pub fn empty() -> Self {
        Self {
            blocks: vec![None; CHUNK_VOLUME],
        }
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(pos: BlockPos) -> usize {
        let x = pos.x.rem_euclid(CHUNK_SIZE);
        let y = pos.y.rem_euclid(CHUNK_SIZE);
        let z = pos.z.rem_euclid(CHUNK_SIZE);
        ((y * CHUNK_SIZE + z) * CHUNK_SIZE + x) as usize
    }

    /// Block at a world position inside this chunk
    pub fn get(&self, pos: BlockPos) -> Option<&BlockState> {
        self.blocks[Self::index(pos)].as_ref()
    }

    /// Replace the block at a world position inside this chunk
    pub fn set(&mut self, pos: BlockPos, state: Option<BlockState>) -> Option<BlockState> {
        std::mem::replace(&mut self.blocks[Self::index(pos)], state)
    }

    /// Number of non-air cells
    pub fn solid_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_some()).count()
    }
}

/// Sparse chunked voxel terrain
#[derive(Debug, Clone, Default)]
pub struct VoxelTerrain {
    chunks: HashMap<ChunkPos, Chunk>,
}

impl VoxelTerrain {
    /// Create terrain with no chunks loaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an empty chunk if it is not loaded yet
    pub fn load_chunk(&mut self, chunk: ChunkPos) -> &mut Chunk {
        self.chunks.entry(chunk).or_default()
    }

    /// Drop a chunk and everything in it
    pub fn unload_chunk(&mut self, chunk: ChunkPos) -> bool {
        self.chunks.remove(&chunk).is_some()
    }

    /// Load every chunk covering the cells between two corners (inclusive)
    pub fn load_area(&mut self, from: BlockPos, to: BlockPos) {
        let lo = chunk_pos_of(from.inf(&to));
        let hi = chunk_pos_of(from.sup(&to));
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    self.load_chunk(ChunkPos::new(x, y, z));
                }
            }
        }
    }

    /// Whether the chunk is loaded
    pub fn is_chunk_loaded(&self, chunk: ChunkPos) -> bool {
        self.chunks.contains_key(&chunk)
    }

    /// Number of loaded chunks
    pub fn loaded_chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Place a block, loading its chunk on demand; returns the previous block
    pub fn set_block(&mut self, pos: BlockPos, state: BlockState) -> Option<BlockState> {
        self.load_chunk(chunk_pos_of(pos)).set(pos, Some(state))
    }

    /// Turn a cell back into air
    pub fn remove_block(&mut self, pos: BlockPos) -> Option<BlockState> {
        self.chunks
            .get_mut(&chunk_pos_of(pos))
            .and_then(|chunk| chunk.set(pos, None))
    }

    /// Fill the cells between two corners (inclusive) with `state`
    pub fn fill(&mut self, from: BlockPos, to: BlockPos, state: &BlockState) {
        let lo = from.inf(&to);
        let hi = from.sup(&to);
        for x in lo.x..=hi.x {
            for y in lo.y..=hi.y {
                for z in lo.z..=hi.z {
                    self.set_block(BlockPos::new(x, y, z), state.clone());
                }
            }
        }
    }
}

impl BlockGetter for VoxelTerrain {
    fn block_state(&self, pos: BlockPos) -> Option<BlockState> {
        self.chunks
            .get(&chunk_pos_of(pos))
            .and_then(|chunk| chunk.get(pos))
            .cloned()
    }

    fn is_area_loaded(&self, area: &BoundingVolume) -> bool {
        let lo = chunk_pos_of(BlockPos::new(
            floor_to_i32(area.min.x),
            floor_to_i32(area.min.y),
            floor_to_i32(area.min.z),
        ));
        let hi = chunk_pos_of(BlockPos::new(
            floor_to_i32(area.max.x),
            floor_to_i32(area.max.y),
            floor_to_i32(area.max.z),
        ));
        (lo.x..=hi.x).all(|x| {
            (lo.y..=hi.y).all(|y| (lo.z..=hi.z).all(|z| self.is_chunk_loaded(ChunkPos::new(x, y, z))))
        })
    }
}
