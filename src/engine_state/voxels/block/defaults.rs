//! # Built-in Blocks
//!
//! The block set every sandbox starts with. The map is ordered: iteration
//! order is registration order, which is what assigns numeric ids, so `air`
//! must stay first.

use super::definition::{BlockDefinition, BlockTextures};

/// Compile-time description of a built-in block.
pub struct BuiltinBlock {
    /// Whether the block stops movement
    pub solid: bool,
    /// Whether the block is see-through
    pub transparent: bool,
    /// Flat colour, if any
    pub color: Option<[f32; 3]>,
    /// Texture used on every face, empty for colour-only blocks
    pub texture: &'static str,
}

/// The built-in block set, keyed by symbolic id.
pub static BUILTIN_BLOCKS: phf::OrderedMap<&'static str, BuiltinBlock> = phf::phf_ordered_map! {
    "air" => BuiltinBlock { solid: false, transparent: true, color: None, texture: "" },
    "base" => BuiltinBlock { solid: true, transparent: false, color: Some([0.5, 0.5, 0.5]), texture: "" },
    "base2" => BuiltinBlock { solid: true, transparent: false, color: Some([1.0, 0.0, 0.0]), texture: "" },
    "stone" => BuiltinBlock { solid: true, transparent: false, color: None, texture: "/textures/Brick.png" },
};

/// The block placed when the caller does not choose one.
pub const DEFAULT_PLACEMENT_BLOCK: &str = "stone";

impl BuiltinBlock {
    /// Builds the owned definition registered for this entry.
    pub fn to_definition(&self, id: &str) -> BlockDefinition {
        BlockDefinition {
            id: id.to_owned(),
            name: None,
            solid: self.solid,
            transparent: self.transparent,
            color: self.color,
            textures: BlockTextures::Uniform(self.texture.to_owned()),
        }
    }
}

/// Definitions of every built-in block, in registration order.
pub fn builtin_definitions() -> impl Iterator<Item = BlockDefinition> {
    BUILTIN_BLOCKS
        .entries()
        .map(|(id, block)| block.to_definition(id))
}
