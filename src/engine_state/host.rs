//! # Host Interfaces
//!
//! The core never renders, reads devices or plays animations itself. A host
//! (a game engine, a browser front end, a test harness) implements these
//! traits and hands itself to the [`Simulation`](super::Simulation).

use cgmath::Point3;

use super::camera_state::CameraBasis;
use super::character::LocomotionState;
use super::voxels::block::BlockId;
use super::PlayerIntent;

/// Opaque id of a visual instance created by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceHandle(pub u64);

/// Creates and destroys the per-block visuals.
pub trait VisualHost {
    /// Shows a block of type `block` at world cell `cell`.
    fn request_visual_instance(&mut self, cell: Point3<i32>, block: BlockId) -> InstanceHandle;

    /// Removes a visual previously returned by `request_visual_instance`.
    fn release_visual_instance(&mut self, handle: InstanceHandle);
}

/// Samples player input once per tick.
pub trait InputHost {
    /// Movement flags for this tick.
    fn sample_intent(&mut self) -> PlayerIntent;

    /// Where the camera is and how it is oriented this tick.
    fn sample_camera_basis(&mut self) -> CameraBasis;
}

/// Receives locomotion labels for animation blending.
pub trait AnimationHost {
    /// Called when the label changes, and on the first tick.
    fn notify_locomotion_state(&mut self, state: LocomotionState);
}
