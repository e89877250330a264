//! # World Module
//!
//! This module provides the `VoxelWorld` struct which owns the loaded chunks
//! and answers world-space block and solidity queries.
//!
//! ## Architecture
//!
//! The world is a sparse map from chunk coordinate to chunk. It never stores
//! block data itself: every query resolves the owning chunk and delegates.
//! Coordinates that fall in no loaded chunk read as air, so the physics treats
//! unloaded space as empty rather than failing.
//!
//! ## Coordinates
//!
//! World cell `(x, y, z)` belongs to chunk `(x.div_euclid(16), ...)` at local
//! cell `(x.rem_euclid(16), ...)`. Floor division matters: truncating
//! division would send `x = -1` to chunk 0 instead of chunk -1.
//!
//! ## Performance Considerations
//!
//! - Chunk lookup is O(1) using a hash map
//! - Collision tests query many cells per tick and rely on that lookup

use std::collections::HashMap;
use std::sync::Arc;

use cgmath::Point3;
use log::info;

use super::block::{BlockId, BlockRegistry, AIR};
use super::chunk::{VoxelChunk, CHUNK_DIMENSION};
use crate::error::{Result, VoxelError};

/// Represents a voxel world composed of multiple chunks.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use voxel_sandbox::engine_state::voxels::{block::BlockRegistry, world::VoxelWorld};
///
/// let mut world = VoxelWorld::new(Arc::new(BlockRegistry::with_defaults()));
/// world.create_chunk(cgmath::Point3::new(0, 0, 0)).unwrap();
/// world.set_block(8, 0, 8, 1);
/// assert!(world.is_solid(8, 0, 8));
/// assert!(!world.is_solid(-1, 0, 0));
/// ```
pub struct VoxelWorld {
    chunks: HashMap<Point3<i32>, VoxelChunk>,
    registry: Arc<BlockRegistry>,
}

/// Floors a continuous position to the cell containing it.
pub fn cell_containing(point: Point3<f32>) -> Point3<i32> {
    Point3::new(
        point.x.floor() as i32,
        point.y.floor() as i32,
        point.z.floor() as i32,
    )
}

impl VoxelWorld {
    /// Creates a new, empty world resolving blocks with `registry`.
    pub fn new(registry: Arc<BlockRegistry>) -> Self {
        VoxelWorld {
            chunks: HashMap::new(),
            registry,
        }
    }

    /// The registry shared by every chunk of this world.
    pub fn registry(&self) -> &Arc<BlockRegistry> {
        &self.registry
    }

    /// Adds a chunk at its own [`VoxelChunk::position`].
    ///
    /// # Errors
    /// `DuplicateChunk` if a chunk already occupies that coordinate. The
    /// existing chunk is kept.
    pub fn add_chunk(&mut self, chunk: VoxelChunk) -> Result<()> {
        let position = chunk.position;
        if self.chunks.contains_key(&position) {
            return Err(VoxelError::DuplicateChunk(position));
        }
        self.chunks.insert(position, chunk);
        Ok(())
    }

    /// Adds an empty chunk at `position` and returns it.
    ///
    /// # Errors
    /// `DuplicateChunk` if the coordinate is occupied.
    pub fn create_chunk(&mut self, position: Point3<i32>) -> Result<&mut VoxelChunk> {
        self.add_chunk(VoxelChunk::empty(position, self.registry.clone()))?;
        self.get_chunk_mut(position)
            .ok_or(VoxelError::DuplicateChunk(position))
    }

    /// Chunk coordinate owning a world cell, using floor division.
    pub fn chunk_coord_for(x: i32, y: i32, z: i32) -> Point3<i32> {
        Point3::new(
            x.div_euclid(CHUNK_DIMENSION),
            y.div_euclid(CHUNK_DIMENSION),
            z.div_euclid(CHUNK_DIMENSION),
        )
    }

    /// Chunk coordinate owning a continuous world position.
    pub fn chunk_coord_for_point(point: Point3<f32>) -> Point3<i32> {
        let cell = cell_containing(point);
        Self::chunk_coord_for(cell.x, cell.y, cell.z)
    }

    /// The chunk at a chunk coordinate.
    pub fn get_chunk(&self, position: Point3<i32>) -> Option<&VoxelChunk> {
        self.chunks.get(&position)
    }

    /// The chunk at a chunk coordinate, mutably.
    pub fn get_chunk_mut(&mut self, position: Point3<i32>) -> Option<&mut VoxelChunk> {
        self.chunks.get_mut(&position)
    }

    /// The chunk owning a world cell.
    pub fn get_chunk_at(&self, x: i32, y: i32, z: i32) -> Option<&VoxelChunk> {
        self.get_chunk(Self::chunk_coord_for(x, y, z))
    }

    /// The chunk owning a world cell, mutably.
    pub fn get_chunk_at_mut(&mut self, x: i32, y: i32, z: i32) -> Option<&mut VoxelChunk> {
        self.get_chunk_mut(Self::chunk_coord_for(x, y, z))
    }

    /// Block id at a world cell; air when no chunk owns it.
    pub fn get_block(&self, x: i32, y: i32, z: i32) -> BlockId {
        let Some(chunk) = self.get_chunk_at(x, y, z) else {
            return AIR;
        };
        let local = VoxelChunk::local_of(Point3::new(x, y, z));
        chunk.get_block(local.x, local.y, local.z)
    }

    /// Whether a world cell blocks movement; false when no chunk owns it.
    pub fn is_solid(&self, x: i32, y: i32, z: i32) -> bool {
        let Some(chunk) = self.get_chunk_at(x, y, z) else {
            return false;
        };
        let local = VoxelChunk::local_of(Point3::new(x, y, z));
        chunk.is_solid(local.x, local.y, local.z)
    }

    /// Writes a block through the owning chunk.
    ///
    /// # Returns
    /// The coordinate of the chunk written, or `None` if no chunk owns the
    /// cell (nothing is written).
    pub fn set_block(&mut self, x: i32, y: i32, z: i32, block: BlockId) -> Option<Point3<i32>> {
        let chunk = self.get_chunk_at_mut(x, y, z)?;
        let local = VoxelChunk::local_of(Point3::new(x, y, z));
        chunk.set_block(local.x, local.y, local.z, block);
        Some(chunk.position)
    }

    /// Writes `block` into every loaded cell of the inclusive box
    /// `min..=max`, returning how many cells were written.
    pub fn fill_box(&mut self, min: Point3<i32>, max: Point3<i32>, block: BlockId) -> usize {
        let mut written = 0;
        for z in min.z..=max.z {
            for y in min.y..=max.y {
                for x in min.x..=max.x {
                    if self.set_block(x, y, z, block).is_some() {
                        written += 1;
                    }
                }
            }
        }
        written
    }

    /// Builds a stepped pyramid centred on `(center_x, center_z)`.
    ///
    /// Layer `i` (counting up from `base_y`) is a square of half-size
    /// `levels - i`, so the top layer is 3x3.
    pub fn build_pyramid(
        &mut self,
        center_x: i32,
        base_y: i32,
        center_z: i32,
        levels: i32,
        block: BlockId,
    ) -> usize {
        let mut written = 0;
        for layer in 0..levels {
            let half = levels - layer;
            written += self.fill_box(
                Point3::new(center_x - half, base_y + layer, center_z - half),
                Point3::new(center_x + half, base_y + layer, center_z + half),
                block,
            );
        }
        info!("Built pyramid of {} levels ({} blocks)", levels, written);
        written
    }

    /// Number of loaded chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterates over the loaded chunks in no particular order.
    pub fn chunks(&self) -> impl Iterator<Item = &VoxelChunk> {
        self.chunks.values()
    }
}
