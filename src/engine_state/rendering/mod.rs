//! # Visual Instances
//!
//! Bookkeeping between the logical grid and the host's per-block visuals.
//!
//! Each non-air cell of a chunk has at most one live [`InstanceHandle`].
//! Rebuilding a chunk releases every handle it owns before requesting new
//! ones, so rebuilding twice leaves exactly one visual per block. Single-cell
//! edits go through [`VisualInstances::add_instance`] and
//! [`VisualInstances::release_instance`] without touching the rest of the
//! chunk.

use std::collections::HashMap;

use cgmath::Point3;
use log::debug;

use super::host::{InstanceHandle, VisualHost};
use super::voxels::block::BlockId;
use super::voxels::chunk::VoxelChunk;
use super::voxels::world::VoxelWorld;

/// Live visual handles grouped by chunk position.
#[derive(Debug, Default)]
pub struct VisualInstances {
    chunks: HashMap<Point3<i32>, HashMap<Point3<i32>, InstanceHandle>>,
}

impl VisualInstances {
    /// No instances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Releases every handle of `chunk`, then requests one per non-air cell.
    ///
    /// Returns the number of instances requested.
    pub fn rebuild_chunk<H: VisualHost + ?Sized>(
        &mut self,
        chunk: &VoxelChunk,
        host: &mut H,
    ) -> usize {
        self.release_chunk(chunk.position, host);

        let instances: HashMap<_, _> = chunk
            .iter_blocks()
            .map(|(local, block)| {
                let cell = chunk.to_world(local);
                (cell, host.request_visual_instance(cell, block))
            })
            .collect();
        let count = instances.len();
        debug!(
            "Rebuilt visuals for chunk ({}, {}, {}): {} instances",
            chunk.position.x, chunk.position.y, chunk.position.z, count
        );
        self.chunks.insert(chunk.position, instances);
        count
    }

    /// Rebuilds every chunk in `world`.
    pub fn rebuild_world<H: VisualHost + ?Sized>(
        &mut self,
        world: &VoxelWorld,
        host: &mut H,
    ) -> usize {
        world
            .chunks()
            .map(|chunk| self.rebuild_chunk(chunk, host))
            .sum()
    }

    /// Releases every handle owned by the chunk at `position`.
    pub fn release_chunk<H: VisualHost + ?Sized>(&mut self, position: Point3<i32>, host: &mut H) {
        if let Some(instances) = self.chunks.remove(&position) {
            for handle in instances.into_values() {
                host.release_visual_instance(handle);
            }
        }
    }

    /// Shows `block` at world cell `cell`, replacing any visual already there.
    pub fn add_instance<H: VisualHost + ?Sized>(
        &mut self,
        cell: Point3<i32>,
        block: BlockId,
        host: &mut H,
    ) -> InstanceHandle {
        self.release_instance(cell, host);
        let handle = host.request_visual_instance(cell, block);
        self.chunks
            .entry(VoxelWorld::chunk_coord_for(cell.x, cell.y, cell.z))
            .or_default()
            .insert(cell, handle);
        handle
    }

    /// Releases the visual at world cell `cell`, if there is one.
    pub fn release_instance<H: VisualHost + ?Sized>(
        &mut self,
        cell: Point3<i32>,
        host: &mut H,
    ) -> bool {
        let chunk = VoxelWorld::chunk_coord_for(cell.x, cell.y, cell.z);
        match self.chunks.get_mut(&chunk).and_then(|cells| cells.remove(&cell)) {
            Some(handle) => {
                host.release_visual_instance(handle);
                true
            }
            None => false,
        }
    }

    /// The live handle at world cell `cell`.
    pub fn instance_at(&self, cell: Point3<i32>) -> Option<InstanceHandle> {
        let chunk = VoxelWorld::chunk_coord_for(cell.x, cell.y, cell.z);
        self.chunks.get(&chunk)?.get(&cell).copied()
    }

    /// Number of live handles.
    pub fn len(&self) -> usize {
        self.chunks.values().map(HashMap::len).sum()
    }

    /// Whether no block is shown.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
