//! Axis-aligned boxes against the voxel grid.

use cgmath::{Point3, Vector3};

use crate::engine_state::voxels::world::VoxelWorld;

const COLLISION_EPS: f32 = 1e-4;
/// Overlap growth below this is rounding, not movement.
const DEEPEN_EPS: f32 = 1e-5;

/// An axis-aligned box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Point3<f32>,
    /// Maximum corner
    pub max: Point3<f32>,
}

/// Inclusive range of cells covered by the interval `min..max` on one axis.
///
/// A box that merely touches a cell boundary does not cover the cell beyond it.
pub fn cell_range(min: f32, max: f32) -> (i32, i32) {
    let min_i = min.floor() as i32;
    let max_i = (max - COLLISION_EPS).floor() as i32;
    if min_i <= max_i {
        (min_i, max_i)
    } else {
        (max_i, min_i)
    }
}

impl Aabb {
    /// A box from its two corners.
    pub fn new(min: Point3<f32>, max: Point3<f32>) -> Self {
        Self { min, max }
    }

    /// A box of the given half-extents around `center`.
    pub fn centered(center: Point3<f32>, half: Vector3<f32>) -> Self {
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// The unit box of a grid cell.
    pub fn of_cell(cell: Point3<i32>) -> Self {
        let min = Point3::new(cell.x as f32, cell.y as f32, cell.z as f32);
        Self {
            min,
            max: min + Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Strict overlap: boxes that only share a face do not intersect.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
            && self.max.z > other.min.z
            && self.min.z < other.max.z
    }

    /// Whether `cell` is one of the cells this box covers.
    pub fn covers_cell(&self, cell: Point3<i32>) -> bool {
        let (x0, x1) = cell_range(self.min.x, self.max.x);
        let (y0, y1) = cell_range(self.min.y, self.max.y);
        let (z0, z1) = cell_range(self.min.z, self.max.z);
        (x0..=x1).contains(&cell.x) && (y0..=y1).contains(&cell.y) && (z0..=z1).contains(&cell.z)
    }

    /// Every cell this box covers.
    pub fn cells(&self) -> impl Iterator<Item = Point3<i32>> {
        let (x0, x1) = cell_range(self.min.x, self.max.x);
        let (y0, y1) = cell_range(self.min.y, self.max.y);
        let (z0, z1) = cell_range(self.min.z, self.max.z);
        (z0..=z1).flat_map(move |z| {
            (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| Point3::new(x, y, z)))
        })
    }

    /// Length of the overlap with `other` along each axis, zero when apart.
    pub fn overlap(&self, other: &Aabb) -> Vector3<f32> {
        let axis = |min: f32, max: f32, other_min: f32, other_max: f32| {
            (max.min(other_max) - min.max(other_min)).max(0.0)
        };
        Vector3::new(
            axis(self.min.x, self.max.x, other.min.x, other.max.x),
            axis(self.min.y, self.max.y, other.min.y, other.max.y),
            axis(self.min.z, self.max.z, other.min.z, other.max.z),
        )
    }

    /// Whether any solid cell is covered by this box.
    pub fn overlaps_solid(&self, world: &VoxelWorld) -> bool {
        self.cells().any(|c| world.is_solid(c.x, c.y, c.z))
    }

    /// Whether moving from `current` to this box pushes into a solid cell.
    ///
    /// A solid cell `current` already covers only blocks when the move
    /// deepens the overlap along some axis, so a body embedded beside a ledge
    /// can back out of it but not walk through it.
    pub fn enters_solid(&self, current: &Aabb, world: &VoxelWorld) -> bool {
        self.cells().any(|c| {
            if !world.is_solid(c.x, c.y, c.z) {
                return false;
            }
            if !current.covers_cell(c) {
                return true;
            }
            let cell = Aabb::of_cell(c);
            let before = current.overlap(&cell);
            let after = self.overlap(&cell);
            after.x > before.x + DEEPEN_EPS
                || after.y > before.y + DEEPEN_EPS
                || after.z > before.z + DEEPEN_EPS
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::engine_state::voxels::block::BlockRegistry;

    #[test]
    fn touching_boundaries_do_not_cover_the_next_cell() {
        assert_eq!(cell_range(1.0, 2.0), (1, 1));
        assert_eq!(cell_range(0.65, 1.35), (0, 1));
        assert_eq!(cell_range(-0.5, 0.5), (-1, 0));
    }

    #[test]
    fn overlapped_cells_only_block_deeper_moves() {
        let mut world = VoxelWorld::new(Arc::new(BlockRegistry::with_defaults()));
        world.create_chunk(Point3::new(0, 0, 0)).unwrap();
        world.set_block(2, 0, 0, 1);
        world.set_block(4, 0, 0, 1);

        let half = Vector3::new(0.3, 0.3, 0.3);
        let current = Aabb::centered(Point3::new(2.9, 0.5, 0.5), half);
        let candidate = Aabb::centered(Point3::new(3.1, 0.5, 0.5), half);
        assert!(current.overlaps_solid(&world));
        assert!(!candidate.enters_solid(&current, &world));

        let deeper = Aabb::centered(Point3::new(2.8, 0.5, 0.5), half);
        assert!(deeper.enters_solid(&current, &world));

        let sideways = Aabb::centered(Point3::new(2.9, 0.5, 0.6), half);
        assert!(!sideways.enters_solid(&current, &world));

        let into_wall = Aabb::centered(Point3::new(3.8, 0.5, 0.5), half);
        assert!(into_wall.enters_solid(&current, &world));
    }
}
