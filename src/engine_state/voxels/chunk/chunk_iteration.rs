//! # Chunk Iteration Module
//!
//! An iterator over the non-air cells of a chunk, in storage order.

use cgmath::Point3;

use crate::engine_state::voxels::block::{BlockId, AIR};

use super::VoxelChunk;

/// An iterator over all non-air cells in a chunk.
///
/// Yields `(local cell, block id)` pairs, skipping air.
pub struct ChunkBlockIterator<'a> {
    blocks: &'a [BlockId],
    offset: usize,
}

impl<'a> ChunkBlockIterator<'a> {
    pub(super) fn new(blocks: &'a [BlockId]) -> Self {
        ChunkBlockIterator { blocks, offset: 0 }
    }
}

impl Iterator for ChunkBlockIterator<'_> {
    type Item = (Point3<i32>, BlockId);

    fn next(&mut self) -> Option<Self::Item> {
        while self.offset < self.blocks.len() {
            let index = self.offset;
            self.offset += 1;
            let block = self.blocks[index];
            if block != AIR {
                return Some((VoxelChunk::local_from_index(index), block));
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.blocks.len() - self.offset))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine_state::voxels::block::BlockRegistry;

    #[test]
    fn yields_only_non_air_cells() {
        let registry = Arc::new(BlockRegistry::with_defaults());
        let mut chunk = VoxelChunk::empty(Point3::new(0, 0, 0), registry);
        chunk.set_block(3, 0, 0, 1);
        chunk.set_block(0, 15, 2, 2);

        let cells: Vec<_> = chunk.iter_blocks().collect();
        assert_eq!(
            cells,
            vec![(Point3::new(3, 0, 0), 1), (Point3::new(0, 15, 2), 2)]
        );
    }
}
