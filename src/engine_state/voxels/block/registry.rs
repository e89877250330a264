//! # Block Registry Module
//!
//! Maps symbolic block ids to the dense numeric ids stored in chunks, and
//! numeric ids back to their definitions.
//!
//! ## Indices
//!
//! The registry keeps two indices that must agree:
//! - `by_symbol`: symbolic id → numeric id
//! - `definitions`: numeric id (vector index) → definition
//!
//! Every mutation goes through [`BlockRegistry::register`] or
//! [`BlockRegistry::update`], which touch both in the same call, so a symbolic
//! id resolves to a numeric id if and only if that numeric id resolves back to
//! a definition with the same symbolic id.

use std::collections::HashMap;

use log::debug;

use super::{defaults, definition::BlockDefinition, BlockId, AIR, AIR_SYMBOL};
use crate::error::{Result, VoxelError};

/// Number of distinct numeric ids a [`BlockId`] can address.
pub const MAX_BLOCK_TYPES: usize = BlockId::MAX as usize + 1;

/// Catalog of block definitions.
///
/// Numeric ids are assigned sequentially in registration order and never
/// change afterwards. Id 0 is always `air`, registered by [`BlockRegistry::new`].
///
/// # Examples
///
/// ```
/// use voxel_sandbox::engine_state::voxels::block::{BlockDefinition, BlockRegistry};
///
/// let mut registry = BlockRegistry::new();
/// let dirt = registry.register(BlockDefinition::new("dirt")).unwrap();
/// assert_eq!(dirt, 1);
/// assert_eq!(registry.resolve_numeric_id("dirt").unwrap(), dirt);
/// ```
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    by_symbol: HashMap<String, BlockId>,
    definitions: Vec<BlockDefinition>,
}

impl Default for BlockRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry {
    /// Creates a registry containing only `air` at id 0.
    pub fn new() -> Self {
        let air = BlockDefinition::new(AIR_SYMBOL).with_solid(false);
        let mut by_symbol = HashMap::new();
        by_symbol.insert(air.id.clone(), AIR);
        Self {
            by_symbol,
            definitions: vec![air],
        }
    }

    /// Creates a registry with the built-in block set.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for definition in defaults::builtin_definitions() {
            if definition.id == AIR_SYMBOL {
                continue;
            }
            // The built-in table has unique, non-empty ids and fits in a BlockId.
            if let Err(err) = registry.register(definition) {
                log::error!("Built-in block rejected: {err}");
            }
        }
        registry
    }

    /// Creates a registry from `air` followed by the given definitions.
    ///
    /// A definition for `air` is accepted as long as it stays non-solid and
    /// replaces the implicit one.
    pub fn from_definitions(definitions: impl IntoIterator<Item = BlockDefinition>) -> Result<Self> {
        let mut registry = Self::new();
        for definition in definitions {
            if definition.id == AIR_SYMBOL {
                registry.update(definition)?;
            } else {
                registry.register(definition)?;
            }
        }
        Ok(registry)
    }

    /// Registers a new block type and returns its numeric id.
    ///
    /// # Errors
    /// - `DuplicateOrInvalidDefinition` if the id is empty, already registered,
    ///   or is `air` marked solid
    /// - `RegistryFull` once every numeric id is taken
    pub fn register(&mut self, definition: BlockDefinition) -> Result<BlockId> {
        let definition = Self::validate(definition)?;
        if self.by_symbol.contains_key(&definition.id) {
            return Err(VoxelError::DuplicateOrInvalidDefinition {
                id: definition.id,
                reason: "symbolic id is already registered",
            });
        }
        let numeric_id = BlockId::try_from(self.definitions.len())
            .map_err(|_| VoxelError::RegistryFull(self.definitions.len()))?;

        debug!("Registered block '{}' as {}", definition.id, numeric_id);
        self.by_symbol.insert(definition.id.clone(), numeric_id);
        self.definitions.push(definition);
        Ok(numeric_id)
    }

    /// Replaces the definition of an already registered block, keeping its
    /// numeric id.
    ///
    /// # Errors
    /// `UnknownBlock` if the symbolic id was never registered, or any
    /// validation error from [`BlockRegistry::register`].
    pub fn update(&mut self, definition: BlockDefinition) -> Result<BlockId> {
        let definition = Self::validate(definition)?;
        let numeric_id = self.resolve_numeric_id(&definition.id)?;
        self.definitions[numeric_id as usize] = definition;
        Ok(numeric_id)
    }

    /// Checks the definition and applies texture normalization.
    fn validate(mut definition: BlockDefinition) -> Result<BlockDefinition> {
        if definition.id.is_empty() {
            return Err(VoxelError::DuplicateOrInvalidDefinition {
                id: definition.id,
                reason: "symbolic id is empty",
            });
        }
        if definition.id == AIR_SYMBOL && definition.solid {
            return Err(VoxelError::DuplicateOrInvalidDefinition {
                id: definition.id,
                reason: "air can never be solid",
            });
        }
        definition.textures = definition.textures.normalized();
        Ok(definition)
    }

    /// Looks up a definition by numeric id.
    pub fn resolve_by_numeric_id(&self, numeric_id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(numeric_id as usize)
    }

    /// Looks up the numeric id of a symbolic id.
    ///
    /// # Errors
    /// `UnknownBlock` if the id was never registered.
    pub fn resolve_numeric_id(&self, symbolic_id: &str) -> Result<BlockId> {
        self.by_symbol
            .get(symbolic_id)
            .copied()
            .ok_or_else(|| VoxelError::UnknownBlock(symbolic_id.to_owned()))
    }

    /// Looks up a definition by symbolic id.
    pub fn get(&self, symbolic_id: &str) -> Option<&BlockDefinition> {
        self.by_symbol
            .get(symbolic_id)
            .and_then(|&numeric_id| self.resolve_by_numeric_id(numeric_id))
    }

    /// Whether a numeric id denotes a solid block.
    ///
    /// Air and ids without a definition are never solid.
    pub fn is_solid_id(&self, numeric_id: BlockId) -> bool {
        numeric_id != AIR
            && self
                .resolve_by_numeric_id(numeric_id)
                .is_some_and(|definition| definition.solid)
    }

    /// Number of registered definitions, `air` included.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Always false: `air` is registered from construction.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates `(numeric id, definition)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (index as BlockId, definition))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{BlockSide, BlockTextures, FaceTextures};

    #[test]
    fn numeric_ids_round_trip() {
        let registry = BlockRegistry::with_defaults();
        assert_eq!(registry.len(), defaults::BUILTIN_BLOCKS.len());
        for (numeric_id, definition) in registry.iter() {
            assert_eq!(registry.resolve_numeric_id(&definition.id).unwrap(), numeric_id);
        }
        assert_eq!(registry.resolve_numeric_id("base").unwrap(), 1);
        assert_eq!(registry.resolve_numeric_id("stone").unwrap(), 3);
    }

    #[test]
    fn air_is_reserved_and_never_solid() {
        let mut registry = BlockRegistry::new();
        assert_eq!(registry.resolve_numeric_id("air").unwrap(), AIR);
        assert!(!registry.is_solid_id(AIR));
        assert!(registry
            .update(BlockDefinition::new("air").with_solid(true))
            .is_err());
        assert!(!registry.is_solid_id(AIR));
    }

    #[test]
    fn rejects_empty_and_duplicate_ids() {
        let mut registry = BlockRegistry::new();
        assert!(matches!(
            registry.register(BlockDefinition::new("")),
            Err(VoxelError::DuplicateOrInvalidDefinition { .. })
        ));
        registry.register(BlockDefinition::new("dirt")).unwrap();
        assert!(matches!(
            registry.register(BlockDefinition::new("dirt")),
            Err(VoxelError::DuplicateOrInvalidDefinition { .. })
        ));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn update_keeps_numeric_id() {
        let mut registry = BlockRegistry::new();
        let glass = registry.register(BlockDefinition::new("glass")).unwrap();
        assert!(registry.is_solid_id(glass));
        let updated = registry
            .update(BlockDefinition::new("glass").with_solid(false))
            .unwrap();
        assert_eq!(updated, glass);
        assert!(!registry.is_solid_id(glass));
        assert!(matches!(
            registry.update(BlockDefinition::new("missing")),
            Err(VoxelError::UnknownBlock(_))
        ));
    }

    #[test]
    fn unknown_symbols_and_ids() {
        let registry = BlockRegistry::new();
        assert!(matches!(
            registry.resolve_numeric_id("diamond"),
            Err(VoxelError::UnknownBlock(name)) if name == "diamond"
        ));
        assert!(registry.resolve_by_numeric_id(42).is_none());
        assert!(!registry.is_solid_id(42));
    }

    #[test]
    fn registration_normalizes_textures_once() {
        let mut registry = BlockRegistry::new();
        let faces = FaceTextures {
            side: Some("log_side.png".into()),
            top: Some("log_top.png".into()),
            ..Default::default()
        };
        registry
            .register(BlockDefinition::new("log").with_textures(BlockTextures::Faces(faces)))
            .unwrap();
        let stored = registry.get("log").unwrap();
        assert_eq!(stored.textures.for_side(BlockSide::LEFT), Some("log_side.png"));
        assert_eq!(stored.textures.for_side(BlockSide::TOP), Some("log_top.png"));
        match &stored.textures {
            BlockTextures::Faces(faces) => assert!(faces.side.is_none()),
            other => panic!("unexpected textures {other:?}"),
        }
    }

    #[test]
    fn registry_fills_up() {
        let mut registry = BlockRegistry::new();
        for n in 1..MAX_BLOCK_TYPES {
            registry.register(BlockDefinition::new(format!("b{n}"))).unwrap();
        }
        assert!(matches!(
            registry.register(BlockDefinition::new("overflow")),
            Err(VoxelError::RegistryFull(MAX_BLOCK_TYPES))
        ));
    }
}
