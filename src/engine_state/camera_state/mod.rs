//! # Camera State
//!
//! The camera as the core sees it: a position, a look direction and the
//! horizontal forward/right basis that movement intent is expressed in.
//!
//! Camera rigs (first/third person, orbiting, smoothing) belong to the host.
//! The host reports its current camera as a [`CameraBasis`] each tick. The
//! [`Camera`] here is a plain yaw/pitch camera for hosts that have nothing
//! better, and for tests.

use cgmath::{InnerSpace, Point3, Rad, Vector3, Zero};
use std::f32::consts::FRAC_PI_2;

use super::placement::PlacementIntent;

/// Safe limit for pitch to prevent gimbal lock
const SAFE_FRAC_PI_2: f32 = FRAC_PI_2 - 0.0001;

/// The camera frame sampled from the host once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraBasis {
    /// Camera forward; only its horizontal part drives movement
    pub forward: Vector3<f32>,
    /// Camera right; only its horizontal part drives movement
    pub right: Vector3<f32>,
    /// Camera position in world space
    pub position: Point3<f32>,
    /// Full 3D look direction, used as the aim ray
    pub look: Vector3<f32>,
}

/// Projects a vector onto the XZ plane and normalizes it, or returns zero when
/// nothing horizontal is left.
pub fn flatten(v: Vector3<f32>) -> Vector3<f32> {
    let flat = Vector3::new(v.x, 0.0, v.z);
    if flat.magnitude2() <= 1e-8 {
        Vector3::zero()
    } else {
        flat.normalize()
    }
}

impl CameraBasis {
    /// Horizontal unit forward and right vectors.
    pub fn horizontal(&self) -> (Vector3<f32>, Vector3<f32>) {
        (flatten(self.forward), flatten(self.right))
    }

    /// The aim ray from the camera through the view centre.
    pub fn placement_intent(&self) -> PlacementIntent {
        PlacementIntent {
            origin: self.position,
            direction: self.look,
        }
    }
}

/// A first-person yaw/pitch camera.
///
/// Yaw 0 looks along `+X`; positive yaw turns towards `+Z`. Pitch is clamped
/// just short of straight up and straight down.
#[derive(Debug, Clone, Copy)]
pub struct Camera {
    /// The camera's position in world space
    pub position: Point3<f32>,
    /// Horizontal rotation (around Y axis) in radians
    pub yaw: Rad<f32>,
    /// Vertical rotation (around X axis) in radians
    pub pitch: Rad<f32>,
}

impl Camera {
    /// Creates a new camera with the specified position and orientation.
    ///
    /// # Example
    /// ```rust
    /// use cgmath::{Deg, Point3};
    /// use voxel_sandbox::engine_state::camera_state::Camera;
    ///
    /// let camera = Camera::new(Point3::new(0.0, 2.0, 0.0), Deg(90.0), Deg(0.0));
    /// let basis = camera.basis();
    /// assert!(basis.forward.z > 0.99);
    /// ```
    pub fn new<V: Into<Point3<f32>>, Y: Into<Rad<f32>>, P: Into<Rad<f32>>>(
        position: V,
        yaw: Y,
        pitch: P,
    ) -> Self {
        let mut camera = Self {
            position: position.into(),
            yaw: yaw.into(),
            pitch: pitch.into(),
        };
        camera.clamp_pitch();
        camera
    }

    fn clamp_pitch(&mut self) {
        if self.pitch < -Rad(SAFE_FRAC_PI_2) {
            self.pitch = -Rad(SAFE_FRAC_PI_2);
        } else if self.pitch > Rad(SAFE_FRAC_PI_2) {
            self.pitch = Rad(SAFE_FRAC_PI_2);
        }
    }

    /// Turns the camera by the given yaw and pitch deltas.
    pub fn rotate(&mut self, delta_yaw: Rad<f32>, delta_pitch: Rad<f32>) {
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.clamp_pitch();
    }

    /// Normalized 3D look direction.
    pub fn look_direction(&self) -> Vector3<f32> {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.0.sin_cos();
        Vector3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin).normalize()
    }

    /// The camera frame handed to the physics and the placer.
    pub fn basis(&self) -> CameraBasis {
        let (yaw_sin, yaw_cos) = self.yaw.0.sin_cos();
        CameraBasis {
            forward: Vector3::new(yaw_cos, 0.0, yaw_sin),
            right: Vector3::new(-yaw_sin, 0.0, yaw_cos),
            position: self.position,
            look: self.look_direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Deg;

    #[test]
    fn right_is_forward_cross_up() {
        let basis = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(37.0), Deg(-20.0)).basis();
        let expected = basis.forward.cross(Vector3::unit_y());
        assert!((basis.right - expected).magnitude() < 1e-5);
    }

    #[test]
    fn looking_straight_down_has_no_horizontal_forward() {
        let basis = CameraBasis {
            forward: Vector3::new(0.0, -1.0, 0.0),
            right: Vector3::new(1.0, 0.0, 0.0),
            position: Point3::new(0.0, 0.0, 0.0),
            look: Vector3::new(0.0, -1.0, 0.0),
        };
        let (forward, right) = basis.horizontal();
        assert_eq!(forward, Vector3::zero());
        assert_eq!(right, Vector3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut camera = Camera::new(Point3::new(0.0, 0.0, 0.0), Deg(0.0), Deg(0.0));
        camera.rotate(Rad(0.0), Rad(10.0));
        assert!(camera.pitch.0 < FRAC_PI_2);
        assert!(camera.look_direction().y > 0.99);
    }
}
