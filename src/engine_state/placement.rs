//! # Block Placement
//!
//! Turns an aim ray into a target cell, validates it and commits the write.
//!
//! Rejections are ordinary player feedback: they are logged and returned as
//! [`PlacementOutcome::Rejected`], never as errors. Only an unknown block id
//! is an error.

use std::fmt;

use cgmath::{InnerSpace, MetricSpace, Point3, Vector3};
use log::{debug, warn};

use super::character::collision::Aabb;
use super::character::CharacterState;
use super::voxels::block::{BlockId, AIR};
use super::voxels::raycast::raycast;
use super::voxels::world::VoxelWorld;
use crate::config::PlacementConfig;
use crate::error::Result;

/// An aim ray, usually from the camera through the view centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementIntent {
    /// Ray start, usually the camera position
    pub origin: Point3<f32>,
    /// Ray direction, need not be normalized
    pub direction: Vector3<f32>,
}

/// Why a placement or removal did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementRejection {
    /// No block under the crosshair and nothing to stand next to
    NoTarget,
    /// The target cell's centre is farther than the configured range
    OutOfRange,
    /// The block would intersect the character's upper body
    OverlapsCharacter,
    /// The target cell lies in a chunk that does not exist
    ChunkNotLoaded,
    /// The target cell already holds a block
    Occupied,
}

impl fmt::Display for PlacementRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reason = match self {
            PlacementRejection::NoTarget => "no target cell",
            PlacementRejection::OutOfRange => "target out of range",
            PlacementRejection::OverlapsCharacter => "block would intersect the character",
            PlacementRejection::ChunkNotLoaded => "no chunk at target",
            PlacementRejection::Occupied => "target cell is occupied",
        };
        f.write_str(reason)
    }
}

/// Result of a placement or removal attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    /// `block` was written into the empty `cell`
    Placed {
        /// Cell that was filled
        cell: Point3<i32>,
        /// Block written
        block: BlockId,
    },
    /// `block` was cleared from `cell`
    Removed {
        /// Cell that was cleared
        cell: Point3<i32>,
        /// Block that was there
        block: BlockId,
    },
    /// Nothing changed
    Rejected(PlacementRejection),
}

impl PlacementOutcome {
    /// The cell whose contents changed, if any.
    pub fn changed_cell(&self) -> Option<Point3<i32>> {
        match *self {
            PlacementOutcome::Placed { cell, .. } | PlacementOutcome::Removed { cell, .. } => {
                Some(cell)
            }
            PlacementOutcome::Rejected(_) => None,
        }
    }
}

fn cell_center(cell: Point3<i32>) -> Point3<f32> {
    Point3::new(
        cell.x as f32 + 0.5,
        cell.y as f32 + 0.5,
        cell.z as f32 + 0.5,
    )
}

fn rejected(reason: PlacementRejection, cell: Option<Point3<i32>>) -> PlacementOutcome {
    match cell {
        Some(cell) => warn!(
            "Block edit at ({}, {}, {}) rejected: {}",
            cell.x, cell.y, cell.z, reason
        ),
        None => warn!("Block edit rejected: {}", reason),
    }
    PlacementOutcome::Rejected(reason)
}

/// Validates and commits block placements and removals.
#[derive(Debug, Clone)]
pub struct BlockPlacer {
    config: PlacementConfig,
    half_extents: Vector3<f32>,
}

impl BlockPlacer {
    /// A placer protecting a character with the given collision half-extents.
    pub fn new(config: PlacementConfig, half_extents: Vector3<f32>) -> Self {
        Self {
            config,
            half_extents,
        }
    }

    /// Range and overlap limits in use.
    pub fn config(&self) -> &PlacementConfig {
        &self.config
    }

    /// The cell under a grounded character's feet.
    fn standing_cell(&self, character: &CharacterState) -> Option<Point3<i32>> {
        if !character.grounded {
            return None;
        }
        let feet = character.position.y - self.half_extents.y;
        Some(Point3::new(
            character.position.x.floor() as i32,
            (feet - 0.5).floor() as i32,
            character.position.z.floor() as i32,
        ))
    }

    /// The cell a block would go into for this aim.
    ///
    /// If the ray hits a block, the empty cell across the face it entered.
    /// Otherwise the cell next to the one the character stands on, along the
    /// dominant axis of the aim (up when the aim is mostly vertical).
    pub fn compute_target_cell(
        &self,
        world: &VoxelWorld,
        character: &CharacterState,
        intent: &PlacementIntent,
    ) -> Option<Point3<i32>> {
        if let Some(hit) = raycast(
            world,
            intent.origin,
            intent.direction,
            self.config.pick_distance,
        ) {
            return hit.adjacent_cell();
        }

        let standing = self.standing_cell(character)?;
        if intent.direction.magnitude2() <= f32::EPSILON {
            return None;
        }
        let aim = intent.direction.normalize();
        let (ax, ay, az) = (aim.x.abs(), aim.y.abs(), aim.z.abs());
        let step = if ax >= ay && ax >= az {
            Vector3::new(aim.x.signum() as i32, 0, 0)
        } else if az >= ay {
            Vector3::new(0, 0, aim.z.signum() as i32)
        } else {
            Vector3::new(0, 1, 0)
        };
        Some(standing + step)
    }

    /// Whether a block in `cell` would intersect the body above the torso
    /// threshold. Touching faces count as intersecting horizontally.
    pub fn overlaps_upper_body(&self, character: &CharacterState, cell: Point3<i32>) -> bool {
        let body = Aabb::centered(character.position, self.half_extents);
        let block = Aabb::of_cell(cell);
        let torso_min_y = body.min.y + (body.max.y - body.min.y) * self.config.torso_fraction;

        block.max.x >= body.min.x
            && block.min.x <= body.max.x
            && block.max.z >= body.min.z
            && block.min.z <= body.max.z
            && block.max.y >= torso_min_y
            && block.min.y < body.max.y
    }

    /// Validates `cell` and writes `block` into it.
    ///
    /// # Errors
    /// `UnknownBlock` if `block` is not registered.
    pub fn place_at(
        &self,
        world: &mut VoxelWorld,
        character: &CharacterState,
        origin: Point3<f32>,
        cell: Point3<i32>,
        block: &str,
    ) -> Result<PlacementOutcome> {
        let numeric_id = world.registry().resolve_numeric_id(block)?;

        if origin.distance(cell_center(cell)) > self.config.max_range {
            return Ok(rejected(PlacementRejection::OutOfRange, Some(cell)));
        }
        if self.overlaps_upper_body(character, cell) {
            return Ok(rejected(PlacementRejection::OverlapsCharacter, Some(cell)));
        }
        if world.get_chunk_at(cell.x, cell.y, cell.z).is_none() {
            return Ok(rejected(PlacementRejection::ChunkNotLoaded, Some(cell)));
        }
        if world.get_block(cell.x, cell.y, cell.z) != AIR {
            return Ok(rejected(PlacementRejection::Occupied, Some(cell)));
        }

        world.set_block(cell.x, cell.y, cell.z, numeric_id);
        debug!(
            "Placed {} ({}) at ({}, {}, {})",
            block, numeric_id, cell.x, cell.y, cell.z
        );
        Ok(PlacementOutcome::Placed {
            cell,
            block: numeric_id,
        })
    }

    /// Places `block` where the aim points.
    ///
    /// # Errors
    /// `UnknownBlock` if `block` is not registered.
    pub fn place(
        &self,
        world: &mut VoxelWorld,
        character: &CharacterState,
        intent: &PlacementIntent,
        block: &str,
    ) -> Result<PlacementOutcome> {
        match self.compute_target_cell(world, character, intent) {
            Some(cell) => self.place_at(world, character, intent.origin, cell, block),
            None => {
                world.registry().resolve_numeric_id(block)?;
                Ok(rejected(PlacementRejection::NoTarget, None))
            }
        }
    }

    /// Clears the block under the crosshair if it is within range.
    pub fn remove(&self, world: &mut VoxelWorld, intent: &PlacementIntent) -> PlacementOutcome {
        let Some(hit) = raycast(
            world,
            intent.origin,
            intent.direction,
            self.config.pick_distance,
        ) else {
            return rejected(PlacementRejection::NoTarget, None);
        };

        let cell = hit.cell;
        if intent.origin.distance(cell_center(cell)) > self.config.max_range {
            return rejected(PlacementRejection::OutOfRange, Some(cell));
        }

        let block = world.get_block(cell.x, cell.y, cell.z);
        world.set_block(cell.x, cell.y, cell.z, AIR);
        debug!("Removed {} at ({}, {}, {})", block, cell.x, cell.y, cell.z);
        PlacementOutcome::Removed { cell, block }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::HALF_EXTENTS;
    use crate::engine_state::voxels::block::BlockRegistry;
    use crate::error::VoxelError;

    fn setup() -> (VoxelWorld, CharacterState, BlockPlacer) {
        let mut world = VoxelWorld::new(Arc::new(BlockRegistry::with_defaults()));
        world.create_chunk(Point3::new(0, 0, 0)).unwrap();
        world.fill_box(Point3::new(0, 0, 0), Point3::new(15, 0, 15), 1);

        let mut character = CharacterState::new(Point3::new(4.5, 1.0 + HALF_EXTENTS[1], 4.5));
        character.grounded = true;
        let placer = BlockPlacer::new(PlacementConfig::default(), Vector3::from(HALF_EXTENTS));
        (world, character, placer)
    }

    fn eye(character: &CharacterState) -> Point3<f32> {
        character.position + Vector3::new(0.0, 1.0, 0.0)
    }

    #[test]
    fn builds_on_the_face_under_the_crosshair() {
        let (mut world, character, placer) = setup();
        let stone = world.registry().resolve_numeric_id("stone").unwrap();
        let intent = PlacementIntent {
            origin: eye(&character),
            direction: Vector3::new(0.0, -1.0, 1.0),
        };

        let outcome = placer.place(&mut world, &character, &intent, "stone").unwrap();
        let PlacementOutcome::Placed { cell, block } = outcome else {
            panic!("expected a placement, got {outcome:?}");
        };
        assert_eq!(block, stone);
        assert_eq!(cell.y, 1);
        assert_eq!(world.get_block(cell.x, cell.y, cell.z), stone);
        assert!(world.is_solid(cell.x, cell.y, cell.z));
    }

    #[test]
    fn far_targets_leave_the_world_unchanged() {
        let (mut world, character, placer) = setup();
        world.set_block(14, 1, 4, 1);
        let before: Vec<_> = world.chunks().flat_map(|c| c.iter_blocks()).collect();
        let intent = PlacementIntent {
            origin: Point3::new(4.5, 1.5, 4.5),
            direction: Vector3::new(1.0, 0.0, 0.0),
        };

        let outcome = placer.place(&mut world, &character, &intent, "stone").unwrap();
        assert_eq!(
            outcome,
            PlacementOutcome::Rejected(PlacementRejection::OutOfRange)
        );
        let after: Vec<_> = world.chunks().flat_map(|c| c.iter_blocks()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn refuses_to_bury_the_upper_body() {
        let (mut world, character, placer) = setup();
        let head_cell = Point3::new(4, 2, 4);
        let outcome = placer
            .place_at(&mut world, &character, eye(&character), head_cell, "stone")
            .unwrap();
        assert_eq!(
            outcome,
            PlacementOutcome::Rejected(PlacementRejection::OverlapsCharacter)
        );
        assert_eq!(world.get_block(4, 2, 4), AIR);

        assert!(!placer.overlaps_upper_body(&character, Point3::new(4, 4, 4)));
        assert!(!placer.overlaps_upper_body(&character, Point3::new(6, 2, 4)));
    }

    #[test]
    fn rejects_unloaded_and_occupied_cells() {
        let (mut world, character, placer) = setup();
        let origin = eye(&character);
        assert_eq!(
            placer
                .place_at(&mut world, &character, origin, Point3::new(4, 1, -1), "stone")
                .unwrap(),
            PlacementOutcome::Rejected(PlacementRejection::ChunkNotLoaded)
        );
        assert_eq!(
            placer
                .place_at(&mut world, &character, origin, Point3::new(6, 0, 4), "stone")
                .unwrap(),
            PlacementOutcome::Rejected(PlacementRejection::Occupied)
        );
    }

    #[test]
    fn unknown_blocks_are_errors() {
        let (mut world, character, placer) = setup();
        let intent = PlacementIntent {
            origin: eye(&character),
            direction: Vector3::new(0.0, -1.0, 1.0),
        };
        assert!(matches!(
            placer.place(&mut world, &character, &intent, "obsidian"),
            Err(VoxelError::UnknownBlock(_))
        ));
    }

    #[test]
    fn falls_back_to_the_standing_cell() {
        let (mut world, character, placer) = setup();
        world.fill_box(Point3::new(0, 0, 0), Point3::new(15, 0, 15), AIR);
        world.set_block(4, 0, 4, 1);
        let intent = PlacementIntent {
            origin: eye(&character),
            direction: Vector3::new(0.2, 0.3, -1.0),
        };
        assert_eq!(
            placer.compute_target_cell(&world, &character, &intent),
            Some(Point3::new(4, 0, 3))
        );

        let up = PlacementIntent {
            origin: Point3::new(4.5, 20.0, 4.5),
            direction: Vector3::new(0.1, 1.0, 0.0),
        };
        assert_eq!(
            placer.compute_target_cell(&world, &character, &up),
            Some(Point3::new(4, 1, 4))
        );

        let mut airborne = character.clone();
        airborne.grounded = false;
        assert_eq!(placer.compute_target_cell(&world, &airborne, &up), None);
    }

    #[test]
    fn removes_the_block_under_the_crosshair() {
        let (mut world, character, placer) = setup();
        let intent = PlacementIntent {
            origin: eye(&character),
            direction: Vector3::new(0.0, -1.0, 1.0),
        };
        let outcome = placer.remove(&mut world, &intent);
        let cell = outcome.changed_cell().unwrap();
        assert_eq!(world.get_block(cell.x, cell.y, cell.z), AIR);
        assert!(matches!(outcome, PlacementOutcome::Removed { block: 1, .. }));
    }
}
