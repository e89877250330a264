/// Scenario tests driving the simulation through a recording host
use std::collections::HashMap;

use cgmath::{Point3, Vector3};
use web_time::Duration;

use voxel_sandbox::engine_state::camera_state::CameraBasis;
use voxel_sandbox::engine_state::character::LocomotionState;
use voxel_sandbox::engine_state::host::{AnimationHost, InputHost, InstanceHandle, VisualHost};
use voxel_sandbox::engine_state::placement::{PlacementIntent, PlacementOutcome, PlacementRejection};
use voxel_sandbox::engine_state::voxels::block::{BlockId, AIR};
use voxel_sandbox::engine_state::voxels::chunk::VoxelChunk;
use voxel_sandbox::*;

const TICK: Duration = Duration::from_micros(16_667);

struct RecordingHost {
    intent: PlayerIntent,
    camera: CameraBasis,
    next_handle: u64,
    instances: HashMap<InstanceHandle, (Point3<i32>, BlockId)>,
    labels: Vec<LocomotionState>,
}

impl RecordingHost {
    fn new() -> Self {
        Self {
            intent: PlayerIntent::default(),
            camera: CameraBasis {
                forward: Vector3::new(0.0, 0.0, 1.0),
                right: Vector3::new(-1.0, 0.0, 0.0),
                position: Point3::new(8.5, 3.35, 8.5),
                look: Vector3::new(0.0, 0.0, 1.0),
            },
            next_handle: 0,
            instances: HashMap::new(),
            labels: Vec::new(),
        }
    }

    fn instance_count_at(&self, cell: Point3<i32>) -> usize {
        self.instances.values().filter(|(c, _)| *c == cell).count()
    }
}

impl VisualHost for RecordingHost {
    fn request_visual_instance(&mut self, cell: Point3<i32>, block: BlockId) -> InstanceHandle {
        self.next_handle += 1;
        let handle = InstanceHandle(self.next_handle);
        self.instances.insert(handle, (cell, block));
        handle
    }

    fn release_visual_instance(&mut self, handle: InstanceHandle) {
        assert!(self.instances.remove(&handle).is_some());
    }
}

impl InputHost for RecordingHost {
    fn sample_intent(&mut self) -> PlayerIntent {
        self.intent
    }

    fn sample_camera_basis(&mut self) -> CameraBasis {
        self.camera
    }
}

impl AnimationHost for RecordingHost {
    fn notify_locomotion_state(&mut self, state: LocomotionState) {
        self.labels.push(state);
    }
}

fn half_height() -> f32 {
    SandboxConfig::default().physics.half_extents[1]
}

/// One chunk with a stone floor at y = 0.
fn floor_simulation(spawn: Point3<f32>) -> Simulation<RecordingHost> {
    let mut simulation =
        Simulation::new(&SandboxConfig::default(), RecordingHost::new(), spawn).unwrap();
    simulation.create_chunk(Point3::new(0, 0, 0)).unwrap();
    {
        let world = simulation.world();
        let mut world = world.get_mut();
        let stone = world.registry().resolve_numeric_id("stone").unwrap();
        world.fill_box(Point3::new(0, 0, 0), Point3::new(15, 0, 15), stone);
    }
    simulation.rebuild_all_visuals();
    simulation
}

#[test]
fn lands_on_a_single_block() {
    // Feet just above the block top.
    let spawn = Point3::new(8.5, 1.0 + half_height() + 0.01, 8.5);
    let mut simulation =
        Simulation::new(&SandboxConfig::default(), RecordingHost::new(), spawn).unwrap();
    simulation.create_chunk(Point3::new(0, 0, 0)).unwrap();
    simulation.set_block(Point3::new(8, 0, 8), "base").unwrap();

    simulation.tick(TICK);

    let character = simulation.character();
    assert!(character.grounded);
    assert_eq!(character.position.y, 1.0 + half_height());
    assert_eq!(character.vertical_velocity, 0.0);
}

#[test]
fn falls_through_unloaded_space() {
    let mut simulation = Simulation::new(
        &SandboxConfig::default(),
        RecordingHost::new(),
        Point3::new(40.5, 10.0, 40.5),
    )
    .unwrap();
    for _ in 0..30 {
        simulation.tick(TICK);
    }
    assert!(!simulation.character().grounded);
    assert!(simulation.character().position.y < 10.0);
    assert!(simulation.character().vertical_velocity < 0.0);
}

#[test]
fn locomotion_is_reported_on_change_only() {
    let mut simulation = floor_simulation(Point3::new(8.5, 1.0 + half_height(), 8.5));

    for _ in 0..5 {
        simulation.tick(TICK);
    }
    simulation.host_mut().intent = PlayerIntent {
        forward: true,
        ..Default::default()
    };
    for _ in 0..5 {
        simulation.tick(TICK);
    }
    simulation.host_mut().intent.sprint = true;
    for _ in 0..5 {
        simulation.tick(TICK);
    }
    simulation.host_mut().intent = PlayerIntent {
        crouch: true,
        ..Default::default()
    };
    for _ in 0..5 {
        simulation.tick(TICK);
    }

    assert_eq!(
        simulation.host().labels,
        vec![
            LocomotionState::Idle,
            LocomotionState::Walk,
            LocomotionState::Sprint,
            LocomotionState::Crouch,
        ]
    );
}

#[test]
fn placed_blocks_get_one_visual_and_block_movement() {
    let mut simulation = floor_simulation(Point3::new(8.5, 1.0 + half_height(), 8.5));
    simulation.tick(TICK);
    let floor_visuals = simulation.host().instances.len();
    assert_eq!(floor_visuals, 256);

    let eye = Point3::new(8.5, 3.35, 8.5);
    let intent = PlacementIntent {
        origin: eye,
        direction: Vector3::new(0.0, -1.0, 1.2),
    };
    let outcome = simulation.place_block_with(&intent, None).unwrap();
    let PlacementOutcome::Placed { cell, block } = outcome else {
        panic!("expected a placement, got {outcome:?}");
    };
    assert_eq!(cell.y, 1);
    assert_eq!(simulation.world().get().get_block(cell.x, cell.y, cell.z), block);
    assert_eq!(simulation.host().instances.len(), floor_visuals + 1);
    assert_eq!(simulation.host().instance_count_at(cell), 1);

    simulation.host_mut().intent = PlayerIntent {
        forward: true,
        ..Default::default()
    };
    for _ in 0..120 {
        simulation.tick(TICK);
    }
    let front = simulation.character().position.z + 0.3;
    assert!(front <= cell.z as f32 + 1e-4);
}

#[test]
fn out_of_range_placement_changes_nothing() {
    let mut simulation = floor_simulation(Point3::new(2.5, 1.0 + half_height(), 2.5));
    simulation.tick(TICK);
    let before = simulation.host().instances.len();

    let intent = PlacementIntent {
        origin: Point3::new(2.5, 3.35, 2.5),
        direction: Vector3::new(1.0, -0.2, 1.0),
    };
    let outcome = simulation.place_block_with(&intent, Some("stone")).unwrap();
    assert_eq!(
        outcome,
        PlacementOutcome::Rejected(PlacementRejection::OutOfRange)
    );
    assert_eq!(simulation.host().instances.len(), before);
    assert_eq!(simulation.world().get().get_chunk(Point3::new(0, 0, 0)).unwrap().non_air_count(), 256);
}

#[test]
fn unknown_blocks_propagate() {
    let mut simulation = floor_simulation(Point3::new(8.5, 1.0 + half_height(), 8.5));
    assert!(matches!(
        simulation.set_block(Point3::new(1, 1, 1), "unobtainium"),
        Err(VoxelError::UnknownBlock(_))
    ));
    assert!(matches!(
        simulation.place_block(Some("unobtainium")),
        Err(VoxelError::UnknownBlock(_))
    ));
}

#[test]
fn removing_releases_the_visual() {
    let mut simulation = floor_simulation(Point3::new(8.5, 1.0 + half_height(), 8.5));
    let outcome = simulation.remove_block_with(&PlacementIntent {
        origin: Point3::new(8.5, 3.35, 8.5),
        direction: Vector3::new(0.0, -1.0, 1.0),
    });
    let cell = outcome.changed_cell().unwrap();
    assert_eq!(simulation.world().get().get_block(cell.x, cell.y, cell.z), AIR);
    assert_eq!(simulation.host().instance_count_at(cell), 0);
    assert_eq!(simulation.host().instances.len(), 255);
}

#[test]
fn duplicate_chunks_are_rejected() {
    let mut simulation = floor_simulation(Point3::new(8.5, 2.35, 8.5));
    assert!(matches!(
        simulation.create_chunk(Point3::new(0, 0, 0)),
        Err(VoxelError::DuplicateChunk(_))
    ));
    assert_eq!(simulation.world().get().chunk_count(), 1);
}

#[test]
fn added_chunks_show_their_blocks() {
    let mut simulation = floor_simulation(Point3::new(8.5, 1.0 + half_height(), 8.5));
    let before = simulation.host().instances.len();
    let registry = simulation.registry();
    let stone = registry.resolve_numeric_id("stone").unwrap();

    let position = Point3::new(1, 0, 0);
    simulation
        .add_chunk(VoxelChunk::filled_layer(position, registry.clone(), 0, stone))
        .unwrap();
    assert_eq!(simulation.host().instances.len(), before + 256);
    assert_eq!(simulation.host().instance_count_at(Point3::new(16, 0, 0)), 1);
    assert_eq!(simulation.host().instance_count_at(Point3::new(31, 0, 15)), 1);
    assert_eq!(simulation.world().get().chunk_count(), 2);

    assert!(matches!(
        simulation.add_chunk(VoxelChunk::filled_layer(position, registry, 0, stone)),
        Err(VoxelError::DuplicateChunk(_))
    ));
    assert_eq!(simulation.host().instances.len(), before + 256);
}
