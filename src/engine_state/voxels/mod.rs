//! # Voxel World Model
//!
//! This module contains the logical voxel grid: block types, chunk storage,
//! the world that indexes chunks, and ray traversal over the grid.
//!
//! ## Architecture
//!
//! * **Block**: Block definitions and the registry mapping symbolic ids to the
//!   numeric ids stored in chunks
//! * **Chunk**: Fixed-size 16³ arrays of numeric ids with a solidity mask
//! * **World**: Sparse hashed collection of chunks with world-space queries
//! * **Raycast**: First-solid-cell traversal for aiming
//!
//! Nothing in here knows about rendering. Visual instances are tracked by
//! [`crate::engine_state::rendering`] on top of the host hooks.
//!
//! ## Data Flow
//!
//! 1. World receives requests for block access or modification
//! 2. World delegates to the owning chunk (or answers "air" if none)
//! 3. The chunk updates its id array and solidity mask together

pub mod block;
pub mod chunk;
pub mod raycast;
pub mod world;
