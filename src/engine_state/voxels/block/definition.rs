//! # Block Definition Module
//!
//! The serializable description of one block type: its symbolic id, whether
//! it blocks movement, and how the renderer should colour or texture it.

use serde::{Deserialize, Serialize};

use super::block_side::BlockSide;

/// Per-face texture references.
///
/// `side` is an input shorthand for the four vertical faces. It is expanded by
/// [`FaceTextures::normalized`] when the definition is registered and is never
/// present on a stored definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceTextures {
    /// Texture for the `+Y` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<String>,
    /// Texture for the `-Y` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<String>,
    /// Texture for the `-X` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<String>,
    /// Texture for the `+X` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<String>,
    /// Texture for the `+Z` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub front: Option<String>,
    /// Texture for the `-Z` face
    #[serde(skip_serializing_if = "Option::is_none")]
    pub back: Option<String>,
    /// Shorthand for left, right, front and back
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<String>,
}

impl FaceTextures {
    fn face_mut(&mut self, side: BlockSide) -> &mut Option<String> {
        match side {
            BlockSide::FRONT => &mut self.front,
            BlockSide::BACK => &mut self.back,
            BlockSide::BOTTOM => &mut self.bottom,
            BlockSide::TOP => &mut self.top,
            BlockSide::LEFT => &mut self.left,
            BlockSide::RIGHT => &mut self.right,
        }
    }

    /// Texture reference for one face, if any.
    pub fn face(&self, side: BlockSide) -> Option<&str> {
        match side {
            BlockSide::FRONT => self.front.as_deref(),
            BlockSide::BACK => self.back.as_deref(),
            BlockSide::BOTTOM => self.bottom.as_deref(),
            BlockSide::TOP => self.top.as_deref(),
            BlockSide::LEFT => self.left.as_deref(),
            BlockSide::RIGHT => self.right.as_deref(),
        }
    }

    /// Expands the `side` shorthand into the four vertical faces.
    ///
    /// Faces that were given explicitly keep their texture. An empty `side`
    /// value is dropped without expanding.
    pub fn normalized(mut self) -> Self {
        if let Some(side_texture) = self.side.take().filter(|t| !t.is_empty()) {
            for side in BlockSide::horizontal() {
                let face = self.face_mut(side);
                if face.as_deref().map_or(true, str::is_empty) {
                    *face = Some(side_texture.clone());
                }
            }
        }
        self
    }
}

/// How a block is textured: one reference for every face, or per face.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BlockTextures {
    /// The same texture on all six faces. Empty means "colour only".
    Uniform(String),
    /// Individual faces
    Faces(FaceTextures),
}

impl Default for BlockTextures {
    fn default() -> Self {
        BlockTextures::Uniform(String::new())
    }
}

impl BlockTextures {
    /// Resolves the texture reference of one face.
    pub fn for_side(&self, side: BlockSide) -> Option<&str> {
        match self {
            BlockTextures::Uniform(texture) if texture.is_empty() => None,
            BlockTextures::Uniform(texture) => Some(texture),
            BlockTextures::Faces(faces) => faces.face(side),
        }
    }

    pub(crate) fn normalized(self) -> Self {
        match self {
            BlockTextures::Faces(faces) => BlockTextures::Faces(faces.normalized()),
            uniform => uniform,
        }
    }
}

fn default_solid() -> bool {
    true
}

/// The physical and visual properties of one block type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Symbolic id, unique within a registry
    pub id: String,
    /// Optional display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Whether the block stops the character. Defaults to `true`.
    #[serde(default = "default_solid", alias = "collider")]
    pub solid: bool,
    /// Whether the renderer should treat the block as see-through
    #[serde(default)]
    pub transparent: bool,
    /// Flat RGB colour in `0.0..=1.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    /// Texture references
    #[serde(default)]
    pub textures: BlockTextures,
}

impl BlockDefinition {
    /// A solid, untextured block with the given symbolic id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            solid: true,
            transparent: false,
            color: None,
            textures: BlockTextures::default(),
        }
    }

    /// Sets whether the block stops movement.
    pub fn with_solid(mut self, solid: bool) -> Self {
        self.solid = solid;
        self
    }

    /// Sets the texture references.
    pub fn with_textures(mut self, textures: BlockTextures) -> Self {
        self.textures = textures;
        self
    }
}
