//! # Raycast Module
//!
//! Grid traversal of a ray through the voxel world (Amanatides & Woo). Used by
//! the block placer to find the block under the crosshair and the face the ray
//! entered it through.

use cgmath::{InnerSpace, Point3, Vector3};

use super::block::BlockSide;
use super::world::{cell_containing, VoxelWorld};

/// The first solid cell along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// The solid cell that was hit
    pub cell: Point3<i32>,
    /// The face of `cell` the ray entered through, `None` when the ray
    /// started inside the cell
    pub face: Option<BlockSide>,
    /// Distance along the (normalized) ray to the entry point
    pub distance: f32,
}

impl RayHit {
    /// The cell just outside the hit face, where a new block would go.
    pub fn adjacent_cell(&self) -> Option<Point3<i32>> {
        self.face.map(|face| self.cell + face.normal())
    }
}

/// Walks the grid from `origin` along `direction` and returns the first solid
/// cell within `max_distance`.
///
/// Returns `None` for a zero direction.
pub fn raycast(
    world: &VoxelWorld,
    origin: Point3<f32>,
    direction: Vector3<f32>,
    max_distance: f32,
) -> Option<RayHit> {
    if direction.magnitude2() <= f32::EPSILON {
        return None;
    }
    let direction = direction.normalize();

    let mut cell = cell_containing(origin);
    let mut step = [0i32; 3];
    let mut t_max = [f32::INFINITY; 3];
    let mut t_delta = [f32::INFINITY; 3];

    for axis in 0..3 {
        let d = direction[axis];
        if d > 0.0 {
            step[axis] = 1;
            t_delta[axis] = 1.0 / d;
            t_max[axis] = ((cell[axis] + 1) as f32 - origin[axis]) / d;
        } else if d < 0.0 {
            step[axis] = -1;
            t_delta[axis] = -1.0 / d;
            t_max[axis] = (origin[axis] - cell[axis] as f32) / -d;
        }
    }

    let mut face = None;
    let mut distance = 0.0;
    while distance <= max_distance {
        if world.is_solid(cell.x, cell.y, cell.z) {
            return Some(RayHit {
                cell,
                face,
                distance,
            });
        }

        let axis = if t_max[0] < t_max[1] {
            if t_max[0] < t_max[2] {
                0
            } else {
                2
            }
        } else if t_max[1] < t_max[2] {
            1
        } else {
            2
        };

        distance = t_max[axis];
        cell[axis] += step[axis];
        t_max[axis] += t_delta[axis];
        face = Some(BlockSide::entered_through(axis, step[axis]));
    }
    None
}
