//! # Configuration
//!
//! Tunable constants of the sandbox, deserializable from JSON. Every field has
//! a default so a config file only needs to name what it changes:
//!
//! ```json
//! { "physics": { "jump_height": 2.0 }, "placement": { "max_range": 8.0 } }
//! ```
//!
//! Speeds are in blocks per second, accelerations in blocks per second².

use serde::{Deserialize, Serialize};

use crate::engine_state::voxels::block::{BlockDefinition, BlockRegistry};
use crate::error::Result;

/// Walking speed (blocks/s)
pub const WALK_SPEED: f32 = 3.0;
/// Sprinting speed (blocks/s)
pub const SPRINT_SPEED: f32 = 6.0;
/// Crouched speed (blocks/s)
pub const CROUCH_SPEED: f32 = 1.5;
/// Vertical acceleration (blocks/s²), negative is down
pub const GRAVITY: f32 = -20.0;
/// Height of a standing jump's apex above the take-off point
pub const JUMP_HEIGHT: f32 = 1.25;
/// Most negative vertical velocity (blocks/s)
pub const TERMINAL_VELOCITY: f32 = -50.0;
/// Collision half-extents (x, y, z) around the torso reference point
pub const HALF_EXTENTS: [f32; 3] = [0.35, 1.35, 0.3];
/// Height above the feet below which cells never block horizontal movement
pub const FOOT_CLEARANCE: f32 = 0.05;
/// How far below the feet the ground test looks for support
pub const GROUND_PROBE: f32 = 0.05;
/// Largest time step integrated in one tick (seconds)
pub const MAX_TICK_SECONDS: f32 = 0.05;
/// Maximum distance from the camera to a placed block's centre
pub const MAX_PLACEMENT_RANGE: f32 = 6.0;
/// Fraction of the body height below which a placed block may overlap it
pub const TORSO_FRACTION: f32 = 0.4;
/// How far the aim ray looks for a block to build against
pub const PICK_DISTANCE: f32 = 64.0;

/// Which cells the ground test inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroundSampling {
    /// The single column under the character's centre
    #[default]
    Center,
    /// Every column under the character's footprint, which keeps the
    /// character standing while its centre hangs over an edge
    Footprint,
}

/// Character movement and collision constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Walking speed (blocks/s)
    pub walk_speed: f32,
    /// Sprinting speed (blocks/s)
    pub sprint_speed: f32,
    /// Crouched speed (blocks/s)
    pub crouch_speed: f32,
    /// Vertical acceleration (blocks/s²)
    pub gravity: f32,
    /// Jump apex height (blocks)
    pub jump_height: f32,
    /// Most negative vertical velocity (blocks/s)
    pub terminal_velocity: f32,
    /// Collision half-extents around the torso reference point
    pub half_extents: [f32; 3],
    /// Floor exclusion above the feet for horizontal tests
    pub foot_clearance: f32,
    /// Ground test reach below the feet
    pub ground_probe: f32,
    /// Longest integrated step (seconds)
    pub max_tick_seconds: f32,
    /// Keep a crouched, grounded character from walking off edges
    pub crouch_edge_hold: bool,
    /// Ground test sampling pattern
    pub ground_sampling: GroundSampling,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            walk_speed: WALK_SPEED,
            sprint_speed: SPRINT_SPEED,
            crouch_speed: CROUCH_SPEED,
            gravity: GRAVITY,
            jump_height: JUMP_HEIGHT,
            terminal_velocity: TERMINAL_VELOCITY,
            half_extents: HALF_EXTENTS,
            foot_clearance: FOOT_CLEARANCE,
            ground_probe: GROUND_PROBE,
            max_tick_seconds: MAX_TICK_SECONDS,
            crouch_edge_hold: true,
            ground_sampling: GroundSampling::Center,
        }
    }
}

impl PhysicsConfig {
    /// Initial upward velocity that reaches `jump_height` under `gravity`.
    pub fn jump_velocity(&self) -> f32 {
        (2.0 * self.gravity.abs() * self.jump_height).sqrt()
    }
}

/// Block placement constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Maximum camera-to-cell-centre distance
    pub max_range: f32,
    /// Body height fraction where the protected upper body starts
    pub torso_fraction: f32,
    /// Aim ray length; hits beyond `max_range` are rejected, not skipped
    pub pick_distance: f32,
    /// Symbolic id placed when none is given
    pub default_block: String,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            max_range: MAX_PLACEMENT_RANGE,
            torso_fraction: TORSO_FRACTION,
            pick_distance: PICK_DISTANCE,
            default_block: crate::engine_state::voxels::block::defaults::DEFAULT_PLACEMENT_BLOCK
                .to_owned(),
        }
    }
}

/// Top-level sandbox configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// Character physics
    pub physics: PhysicsConfig,
    /// Block placement
    pub placement: PlacementConfig,
    /// Block set; the built-in set when empty
    pub blocks: Vec<BlockDefinition>,
}

impl SandboxConfig {
    /// Parses a configuration from JSON.
    ///
    /// # Errors
    /// `Config` if the JSON is malformed or a field has the wrong type.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    /// `Io` if the file cannot be read, `Config` if it does not parse.
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builds the block registry described by this configuration.
    ///
    /// # Errors
    /// Registration errors for invalid or duplicate definitions.
    pub fn build_registry(&self) -> Result<BlockRegistry> {
        if self.blocks.is_empty() {
            Ok(BlockRegistry::with_defaults())
        } else {
            BlockRegistry::from_definitions(self.blocks.iter().cloned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VoxelError;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SandboxConfig::from_json_str(
            r#"{ "physics": { "jump_height": 2.0, "ground_sampling": "footprint" } }"#,
        )
        .unwrap();
        assert_eq!(config.physics.jump_height, 2.0);
        assert_eq!(config.physics.ground_sampling, GroundSampling::Footprint);
        assert_eq!(config.physics.walk_speed, WALK_SPEED);
        assert_eq!(config.placement, PlacementConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            SandboxConfig::from_json_str("{ \"physics\": 3 }"),
            Err(VoxelError::Config(_))
        ));
    }

    #[test]
    fn custom_block_sets() {
        let config = SandboxConfig::from_json_str(
            r#"{ "blocks": [
                { "id": "air", "collider": false },
                { "id": "dirt", "color": [0.4, 0.3, 0.2] },
                { "id": "leaves", "collider": false, "transparent": true }
            ] }"#,
        )
        .unwrap();
        let registry = config.build_registry().unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.resolve_numeric_id("dirt").unwrap(), 1);
        assert!(!registry.is_solid_id(2));
    }

    #[test]
    fn jump_velocity_matches_height() {
        let physics = PhysicsConfig::default();
        let v = physics.jump_velocity();
        assert!((v * v / (2.0 * physics.gravity.abs()) - physics.jump_height).abs() < 1e-5);
    }
}
