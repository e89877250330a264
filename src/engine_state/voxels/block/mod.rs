//! # Block Module
//!
//! Block ids, definitions and the registry that links them.

pub mod block_side;
pub mod defaults;
pub mod definition;
pub mod registry;

pub use block_side::BlockSide;
pub use definition::{BlockDefinition, BlockTextures, FaceTextures};
pub use registry::BlockRegistry;

/// The integer type stored per cell in chunk storage.
pub type BlockId = u8;

/// Numeric id of the empty block. Never solid.
pub const AIR: BlockId = 0;

/// Symbolic id registered for [`AIR`].
pub const AIR_SYMBOL: &str = "air";
