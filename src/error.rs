//! # Errors
//!
//! The error taxonomy of the voxel core. Only programming errors and world
//! invariant violations are represented here. Out-of-bounds chunk writes are
//! silent no-ops and rejected placements are reported through
//! [`PlacementOutcome`](crate::engine_state::placement::PlacementOutcome), so
//! neither appears in this enum.

use cgmath::Point3;

/// Errors raised by the block registry, the world and configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum VoxelError {
    /// A symbolic block id was looked up but never registered.
    #[error("block '{0}' is not registered")]
    UnknownBlock(String),

    /// A definition was rejected at registration time.
    #[error("invalid block definition '{id}': {reason}")]
    DuplicateOrInvalidDefinition {
        /// The offending symbolic id (may be empty)
        id: String,
        /// Human readable reason
        reason: &'static str,
    },

    /// Every numeric id is already assigned.
    #[error("block registry is full ({0} definitions)")]
    RegistryFull(usize),

    /// A chunk already occupies the requested chunk coordinate.
    #[error("a chunk already exists at ({}, {}, {})", .0.x, .0.y, .0.z)]
    DuplicateChunk(Point3<i32>),

    /// The sandbox configuration could not be parsed.
    #[error("invalid sandbox configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration file could not be read.
    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, VoxelError>;
