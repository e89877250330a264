//! # Engine State Module
//!
//! The simulation core: the voxel world, the character moving through it and
//! the block placer editing it, driven once per tick by a host.
//!
//! ## Key Components
//!
//! * `Simulation` - Owns the world and the character and drives each tick
//! * `camera_state` - The camera basis movement and aiming are expressed in
//! * `character` - Kinematic character physics against the grid
//! * `host` - Traits the embedding host implements for visuals, input and animation
//! * `placement` - Aim-ray targeting and validated block edits
//! * `rendering` - Tracks the host's per-block visual instances
//! * `voxels` - Block registry, chunks, world and raycasting
//!
//! ## Tick Order
//!
//! 1. Sample intent and camera basis from the host
//! 2. Run character physics against a read guard of the world
//! 3. Notify the host when the locomotion label changes
//!
//! Placement and removal run between ticks and take a write guard.

use std::sync::Arc;

use cgmath::Point3;
use log::{debug, info};
use web_time::Duration;

use crate::config::SandboxConfig;
use crate::core::MtResource;
use crate::error::Result;

pub mod camera_state;
pub mod character;
pub mod host;
pub mod placement;
pub mod rendering;
pub mod voxels;

use camera_state::CameraBasis;
use character::{CharacterPhysics, CharacterState, LocomotionState};
use host::{AnimationHost, InputHost, VisualHost};
use placement::{BlockPlacer, PlacementIntent, PlacementOutcome};
use rendering::VisualInstances;
use voxels::block::{BlockRegistry, AIR};
use voxels::chunk::VoxelChunk;
use voxels::world::VoxelWorld;

/// Analog stick deflection below which an axis counts as released
const AXIS_DEAD_ZONE: f32 = 0.2;

/// Player movement intent for one tick
///
/// Directional flags are relative to the camera. Opposite flags cancel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PlayerIntent {
    /// Move along the camera's forward axis
    pub forward: bool,
    /// Move against the camera's forward axis
    pub backward: bool,
    /// Move against the camera's right axis
    pub left: bool,
    /// Move along the camera's right axis
    pub right: bool,
    /// Sprint speed
    pub sprint: bool,
    /// Crouch speed, edge hold
    pub crouch: bool,
    /// Jump when grounded
    pub jump: bool,
}

impl PlayerIntent {
    /// Builds an intent from analog axes, `move_z` forward and `move_x` right.
    pub fn from_axes(move_x: f32, move_z: f32, sprint: bool, crouch: bool, jump: bool) -> Self {
        Self {
            forward: move_z > AXIS_DEAD_ZONE,
            backward: move_z < -AXIS_DEAD_ZONE,
            left: move_x < -AXIS_DEAD_ZONE,
            right: move_x > AXIS_DEAD_ZONE,
            sprint,
            crouch,
            jump,
        }
    }

    /// Net `(right, forward)` axes, each in `{-1, 0, 1}`.
    pub fn axes(&self) -> (f32, f32) {
        let axis = |positive: bool, negative: bool| positive as i8 - negative as i8;
        (
            axis(self.right, self.left) as f32,
            axis(self.forward, self.backward) as f32,
        )
    }
}

/// Everything the simulation needs from its embedding.
pub trait Host: VisualHost + InputHost + AnimationHost {}

impl<T: VisualHost + InputHost + AnimationHost> Host for T {}

/// The simulation core.
///
/// # Example
///
/// ```ignore
/// let mut simulation = Simulation::new(&SandboxConfig::default(), host, spawn)?;
/// simulation.create_chunk(Point3::new(0, 0, 0))?;
/// simulation.rebuild_all_visuals();
///
/// loop {
///     simulation.tick(frame_time);
/// }
/// ```
pub struct Simulation<H: Host> {
    /// The voxel world, shared with any reader on another thread
    world: MtResource<VoxelWorld>,
    physics: CharacterPhysics,
    character: CharacterState,
    placer: BlockPlacer,
    visuals: VisualInstances,
    host: H,
    /// Last label sent to the host, `None` before the first tick
    last_locomotion: Option<LocomotionState>,
}

impl<H: Host> Simulation<H> {
    /// Creates a simulation with an empty world built from `config`.
    ///
    /// # Errors
    /// Registration errors from the configured block set.
    pub fn new(config: &SandboxConfig, host: H, spawn: Point3<f32>) -> Result<Self> {
        let registry = Arc::new(config.build_registry()?);
        info!("Registered {} block types", registry.len());
        Ok(Self::with_world(config, VoxelWorld::new(registry), host, spawn))
    }

    /// Creates a simulation around an existing world.
    pub fn with_world(config: &SandboxConfig, world: VoxelWorld, host: H, spawn: Point3<f32>) -> Self {
        let physics = CharacterPhysics::new(config.physics.clone());
        let placer = BlockPlacer::new(config.placement.clone(), physics.half_extents());
        Self {
            world: MtResource::new(world),
            physics,
            character: CharacterState::new(spawn),
            placer,
            visuals: VisualInstances::new(),
            host,
            last_locomotion: None,
        }
    }

    /// A handle to the world.
    pub fn world(&self) -> MtResource<VoxelWorld> {
        self.world.clone()
    }

    /// The block registry the world resolves ids with.
    pub fn registry(&self) -> Arc<BlockRegistry> {
        self.world.get().registry().clone()
    }

    /// The simulated character.
    pub fn character(&self) -> &CharacterState {
        &self.character
    }

    /// The embedding host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The embedding host, for feeding it input.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn visuals(&self) -> &VisualInstances {
        &self.visuals
    }

    /// Adds a chunk and shows its blocks.
    ///
    /// # Errors
    /// `DuplicateChunk` if a chunk already exists at its position.
    pub fn add_chunk(&mut self, chunk: VoxelChunk) -> Result<()> {
        let position = chunk.position;
        let mut world = self.world.get_mut();
        world.add_chunk(chunk)?;
        if let Some(chunk) = world.get_chunk(position) {
            self.visuals.rebuild_chunk(chunk, &mut self.host);
        }
        Ok(())
    }

    /// Adds an empty chunk at chunk coordinate `position`.
    ///
    /// # Errors
    /// `DuplicateChunk` if a chunk already exists there.
    pub fn create_chunk(&mut self, position: Point3<i32>) -> Result<()> {
        self.world.get_mut().create_chunk(position)?;
        Ok(())
    }

    /// Rebuilds the visuals of every chunk, returning the instance count.
    pub fn rebuild_all_visuals(&mut self) -> usize {
        let world = self.world.get();
        self.visuals.rebuild_world(&world, &mut self.host)
    }

    /// Writes a block by symbolic id and updates its visual.
    ///
    /// Returns `false` if no chunk owns the cell.
    ///
    /// # Errors
    /// `UnknownBlock` if `block` is not registered.
    pub fn set_block(&mut self, cell: Point3<i32>, block: &str) -> Result<bool> {
        let mut world = self.world.get_mut();
        let numeric_id = world.registry().resolve_numeric_id(block)?;
        if world.set_block(cell.x, cell.y, cell.z, numeric_id).is_none() {
            return Ok(false);
        }
        if numeric_id == AIR {
            self.visuals.release_instance(cell, &mut self.host);
        } else {
            self.visuals.add_instance(cell, numeric_id, &mut self.host);
        }
        Ok(true)
    }

    /// Advances the simulation by `dt` and returns the locomotion label.
    pub fn tick(&mut self, dt: Duration) -> LocomotionState {
        let intent = self.host.sample_intent();
        let camera = self.host.sample_camera_basis();
        {
            let world = self.world.get();
            self.physics
                .tick(&mut self.character, &world, &intent, &camera, dt);
        }

        let locomotion = self.character.locomotion;
        if self.last_locomotion != Some(locomotion) {
            debug!("Locomotion changed to {}", locomotion);
            self.host.notify_locomotion_state(locomotion);
            self.last_locomotion = Some(locomotion);
        }
        locomotion
    }

    /// The aim ray of the host's current camera.
    fn aim(&mut self) -> PlacementIntent {
        let camera: CameraBasis = self.host.sample_camera_basis();
        camera.placement_intent()
    }

    /// Places `block` (or the configured default) where the camera aims.
    ///
    /// # Errors
    /// `UnknownBlock` if the block is not registered.
    pub fn place_block(&mut self, block: Option<&str>) -> Result<PlacementOutcome> {
        let intent = self.aim();
        self.place_block_with(&intent, block)
    }

    /// Places `block` (or the configured default) along an explicit aim ray.
    ///
    /// # Errors
    /// `UnknownBlock` if the block is not registered.
    pub fn place_block_with(
        &mut self,
        intent: &PlacementIntent,
        block: Option<&str>,
    ) -> Result<PlacementOutcome> {
        let block = block.unwrap_or(&self.placer.config().default_block).to_owned();
        let outcome = {
            let mut world = self.world.get_mut();
            self.placer
                .place(&mut world, &self.character, intent, &block)?
        };
        if let PlacementOutcome::Placed { cell, block } = outcome {
            self.visuals.add_instance(cell, block, &mut self.host);
        }
        Ok(outcome)
    }

    /// Removes the block the camera aims at.
    pub fn remove_block(&mut self) -> PlacementOutcome {
        let intent = self.aim();
        self.remove_block_with(&intent)
    }

    /// Removes the block hit by an explicit aim ray.
    pub fn remove_block_with(&mut self, intent: &PlacementIntent) -> PlacementOutcome {
        let outcome = self.placer.remove(&mut self.world.get_mut(), intent);
        if let PlacementOutcome::Removed { cell, .. } = outcome {
            self.visuals.release_instance(cell, &mut self.host);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_flags_cancel() {
        let intent = PlayerIntent {
            forward: true,
            backward: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(intent.axes(), (1.0, 0.0));
    }

    #[test]
    fn analog_axes_respect_the_dead_zone() {
        let intent = PlayerIntent::from_axes(0.1, -0.9, true, false, false);
        assert!(!intent.left && !intent.right);
        assert!(intent.backward && !intent.forward);
        assert!(intent.sprint);
        assert_eq!(intent.axes(), (0.0, -1.0));
    }
}
