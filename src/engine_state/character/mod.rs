//! # Character Physics
//!
//! Kinematic character controller against the voxel grid.
//!
//! The character is an axis-aligned box around a torso reference point
//! ([`CharacterState::position`]). Each tick runs, in order:
//!
//! 1. Horizontal intent from the camera basis and the input flags
//! 2. Horizontal collision: a move into a solid cell is rejected whole
//! 3. Jump start, gravity and the ceiling test
//! 4. Vertical integration
//! 5. The ground test, which snaps the feet onto the top of a solid cell
//! 6. Facing and locomotion labels
//!
//! The ground test sweeps from the feet at the start of the tick down to their
//! new height, so a fall of any length stops on the first floor it crosses.
//! It never reaches more than `ground_probe` above the starting feet, which
//! keeps a body beside a ledge from being lifted onto it.

use std::fmt;

use cgmath::{InnerSpace, Point3, Rad, Vector3, Zero};
use web_time::Duration;

use super::camera_state::CameraBasis;
use super::voxels::world::VoxelWorld;
use super::PlayerIntent;
use crate::config::{GroundSampling, PhysicsConfig};

pub mod collision;

use collision::{cell_range, Aabb};

/// Animation-facing label for what the character is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocomotionState {
    /// Standing still on the ground
    #[default]
    Idle,
    /// Moving at walking speed
    Walk,
    /// Moving at sprinting speed
    Sprint,
    /// Crouch held, moving or not
    Crouch,
    /// In the air
    Jump,
}

impl LocomotionState {
    /// The label handed to animation hosts.
    pub fn label(self) -> &'static str {
        match self {
            LocomotionState::Idle => "Idle",
            LocomotionState::Walk => "Walk",
            LocomotionState::Sprint => "Sprint",
            LocomotionState::Crouch => "Crouch",
            LocomotionState::Jump => "Jump",
        }
    }
}

impl fmt::Display for LocomotionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Vertical motion phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    /// Supported by a solid cell
    Grounded,
    /// Airborne, moving up
    Rising,
    /// Airborne, moving down or at rest in the air
    Falling,
}

/// Mutable per-character simulation state.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterState {
    /// Torso reference point; the feet are `half_extents.y` below it
    pub position: Point3<f32>,
    /// Vertical velocity (blocks/s)
    pub vertical_velocity: f32,
    /// Resting on a solid cell
    pub grounded: bool,
    /// A jump started and the character has not landed since
    pub jumping: bool,
    /// Crouch was held on the last tick
    pub crouching: bool,
    /// Yaw the character faces, `atan2(x, z)` of the last move direction
    pub facing: Rad<f32>,
    /// Label derived on the last tick
    pub locomotion: LocomotionState,
    /// Whether the last tick moved horizontally
    pub moving: bool,
}

impl CharacterState {
    /// A character standing still at `position`, not yet known to be grounded.
    pub fn new(position: Point3<f32>) -> Self {
        Self {
            position,
            vertical_velocity: 0.0,
            grounded: false,
            jumping: false,
            crouching: false,
            facing: Rad(0.0),
            locomotion: LocomotionState::Idle,
            moving: false,
        }
    }

    /// The vertical phase of the character.
    pub fn motion(&self) -> MotionState {
        if self.grounded {
            MotionState::Grounded
        } else if self.vertical_velocity > 0.0 {
            MotionState::Rising
        } else {
            MotionState::Falling
        }
    }
}

/// Applies [`PhysicsConfig`] to a [`CharacterState`] each tick.
#[derive(Debug, Clone, Default)]
pub struct CharacterPhysics {
    config: PhysicsConfig,
}

impl CharacterPhysics {
    /// Physics driven by `config`.
    pub fn new(config: PhysicsConfig) -> Self {
        Self { config }
    }

    /// The constants this physics runs with.
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Half-extents of the collision box.
    pub fn half_extents(&self) -> Vector3<f32> {
        Vector3::from(self.config.half_extents)
    }

    /// Collision box of a character whose reference point is at `position`.
    pub fn body_at(&self, position: Point3<f32>) -> Aabb {
        Aabb::centered(position, self.half_extents())
    }

    /// Unit horizontal direction requested by `intent` in the camera's frame,
    /// or zero when the inputs cancel or there is no horizontal camera axis.
    pub fn desired_direction(intent: &PlayerIntent, camera: &CameraBasis) -> Vector3<f32> {
        let (forward, right) = camera.horizontal();
        let (axis_x, axis_z) = intent.axes();
        let direction = forward * axis_z + right * axis_x;
        if direction.magnitude2() <= 1e-8 {
            Vector3::zero()
        } else {
            direction.normalize()
        }
    }

    /// Horizontal speed for the intent: crouch over sprint over walk.
    pub fn speed_for(&self, intent: &PlayerIntent) -> f32 {
        if intent.crouch {
            self.config.crouch_speed
        } else if intent.sprint {
            self.config.sprint_speed
        } else {
            self.config.walk_speed
        }
    }

    /// Top surface height of the highest solid cell supporting a character
    /// resting at `position`, or `None` when nothing is within reach of the feet.
    pub fn support_height(&self, world: &VoxelWorld, position: Point3<f32>) -> Option<f32> {
        self.swept_support(world, position, position.y)
    }

    /// Highest supporting top crossed while the reference point moved down
    /// from `from_y` to `position.y`.
    ///
    /// Tops between `ground_probe` below the new feet and `ground_probe` above
    /// the starting feet count.
    fn swept_support(
        &self,
        world: &VoxelWorld,
        position: Point3<f32>,
        from_y: f32,
    ) -> Option<f32> {
        let half_height = self.config.half_extents[1];
        let probe = self.config.ground_probe;
        let feet = position.y - half_height;
        let start_feet = from_y.max(position.y) - half_height;
        let lowest = (feet - probe).floor() as i32;
        let highest = (start_feet + probe).floor() as i32 - 1;

        let (x_range, z_range) = match self.config.ground_sampling {
            GroundSampling::Center => {
                let x = position.x.floor() as i32;
                let z = position.z.floor() as i32;
                ((x, x), (z, z))
            }
            GroundSampling::Footprint => {
                let body = self.body_at(position);
                (
                    cell_range(body.min.x, body.max.x),
                    cell_range(body.min.z, body.max.z),
                )
            }
        };

        (lowest..=highest).rev().find_map(|y| {
            let supported = (x_range.0..=x_range.1)
                .any(|x| (z_range.0..=z_range.1).any(|z| world.is_solid(x, y, z)));
            supported.then_some((y + 1) as f32)
        })
    }

    /// Whether a horizontal move to `candidate` is allowed.
    fn can_move_to(
        &self,
        world: &VoxelWorld,
        state: &CharacterState,
        candidate: Point3<f32>,
        crouching: bool,
    ) -> bool {
        let clearance = Vector3::new(0.0, self.config.foot_clearance, 0.0);
        let mut current = self.body_at(state.position);
        let mut moved = self.body_at(candidate);
        current.min += clearance;
        moved.min += clearance;

        if moved.enters_solid(&current, world) {
            return false;
        }
        if crouching && state.grounded && self.config.crouch_edge_hold {
            return self.support_height(world, candidate).is_some();
        }
        true
    }

    /// Whether the cells the head would rise into this tick are solid.
    fn ceiling_blocks(&self, world: &VoxelWorld, position: Point3<f32>, rise: f32) -> bool {
        let body = self.body_at(position);
        let head = (body.max.y + rise).floor() as i32;
        let (x0, x1) = cell_range(body.min.x, body.max.x);
        let (z0, z1) = cell_range(body.min.z, body.max.z);
        (x0..=x1).any(|x| (z0..=z1).any(|z| world.is_solid(x, head, z)))
    }

    /// Advances `state` by one tick of length `dt`.
    pub fn tick(
        &self,
        state: &mut CharacterState,
        world: &VoxelWorld,
        intent: &PlayerIntent,
        camera: &CameraBasis,
        dt: Duration,
    ) {
        let dt = dt.as_secs_f32().min(self.config.max_tick_seconds);
        let half_height = self.config.half_extents[1];

        state.crouching = intent.crouch;
        let direction = Self::desired_direction(intent, camera);
        let moving = direction != Vector3::zero();
        if moving {
            let delta = direction * self.speed_for(intent) * dt;
            let candidate = Point3::new(
                state.position.x + delta.x,
                state.position.y,
                state.position.z + delta.z,
            );
            if self.can_move_to(world, state, candidate, intent.crouch) {
                state.position = candidate;
            }
            state.facing = Rad(direction.x.atan2(direction.z));
        }
        state.moving = moving;

        if intent.jump && state.grounded && !state.jumping {
            state.vertical_velocity = self.config.jump_velocity();
            state.jumping = true;
            state.grounded = false;
        }

        let start_y = state.position.y;
        let held_on_ground = state.crouching && state.grounded;
        if !held_on_ground {
            state.vertical_velocity = (state.vertical_velocity + self.config.gravity * dt)
                .max(self.config.terminal_velocity);

            if state.vertical_velocity > 0.0
                && self.ceiling_blocks(world, state.position, state.vertical_velocity * dt)
            {
                state.vertical_velocity = 0.0;
            }

            state.position.y += state.vertical_velocity * dt;
        }

        match self.swept_support(world, state.position, start_y) {
            Some(top) if state.vertical_velocity <= 0.0 => {
                state.position.y = top + half_height;
                state.vertical_velocity = 0.0;
                state.grounded = true;
                state.jumping = false;
            }
            _ => state.grounded = false,
        }

        state.locomotion = if state.crouching {
            LocomotionState::Crouch
        } else if !state.grounded {
            LocomotionState::Jump
        } else if moving && intent.sprint {
            LocomotionState::Sprint
        } else if moving {
            LocomotionState::Walk
        } else {
            LocomotionState::Idle
        };
    }
}
