//! # Voxel Sandbox Headless Demo
//!
//! Builds the stepped pyramid world, drops a character onto it, walks and
//! jumps with scripted input and places a block, logging as it goes.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=debug cargo run --release -- [config.json]
//! ```

use cgmath::{Deg, Point3};
use log::info;
use web_time::Duration;

use voxel_sandbox::config::SandboxConfig;
use voxel_sandbox::engine_state::camera_state::{Camera, CameraBasis};
use voxel_sandbox::engine_state::character::LocomotionState;
use voxel_sandbox::engine_state::host::{AnimationHost, InputHost, InstanceHandle, VisualHost};
use voxel_sandbox::engine_state::voxels::block::BlockId;
use voxel_sandbox::{PlayerIntent, Simulation};

const TICK: Duration = Duration::from_micros(16_667);
const PYRAMID_LEVELS: i32 = 4;

/// A host with no window: counts visuals, replays a fixed input script.
struct ScriptedHost {
    camera: Camera,
    intent: PlayerIntent,
    next_handle: u64,
    live_instances: usize,
}

impl VisualHost for ScriptedHost {
    fn request_visual_instance(&mut self, _cell: Point3<i32>, _block: BlockId) -> InstanceHandle {
        self.next_handle += 1;
        self.live_instances += 1;
        InstanceHandle(self.next_handle)
    }

    fn release_visual_instance(&mut self, _handle: InstanceHandle) {
        self.live_instances -= 1;
    }
}

impl InputHost for ScriptedHost {
    fn sample_intent(&mut self) -> PlayerIntent {
        self.intent
    }

    fn sample_camera_basis(&mut self) -> CameraBasis {
        self.camera.basis()
    }
}

impl AnimationHost for ScriptedHost {
    fn notify_locomotion_state(&mut self, state: LocomotionState) {
        info!("Animation: {}", state);
    }
}

fn run_for<H: voxel_sandbox::engine_state::Host>(
    simulation: &mut Simulation<H>,
    ticks: usize,
) -> LocomotionState {
    let mut state = LocomotionState::Idle;
    for _ in 0..ticks {
        state = simulation.tick(TICK);
    }
    state
}

fn main() -> voxel_sandbox::Result<()> {
    voxel_sandbox::init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => SandboxConfig::from_json_file(path)?,
        None => SandboxConfig::default(),
    };

    let spawn = Point3::new(0.5, PYRAMID_LEVELS as f32 + 3.0, 0.5);
    let host = ScriptedHost {
        camera: Camera::new(spawn, Deg(90.0), Deg(-30.0)),
        intent: PlayerIntent::default(),
        next_handle: 0,
        live_instances: 0,
    };
    let mut simulation = Simulation::new(&config, host, spawn)?;

    for x in -1..=0 {
        for z in -1..=0 {
            simulation.create_chunk(Point3::new(x, 0, z))?;
        }
    }
    {
        let world = simulation.world();
        let mut world = world.get_mut();
        let base = world.registry().resolve_numeric_id("base")?;
        world.build_pyramid(0, 0, 0, PYRAMID_LEVELS, base);
    }
    let shown = simulation.rebuild_all_visuals();
    info!("Showing {} blocks", shown);

    run_for(&mut simulation, 60);
    info!("Landed at {:?}", simulation.character().position);

    simulation.host_mut().intent = PlayerIntent {
        forward: true,
        ..Default::default()
    };
    run_for(&mut simulation, 30);

    simulation.host_mut().intent = PlayerIntent {
        forward: true,
        sprint: true,
        jump: true,
        ..Default::default()
    };
    run_for(&mut simulation, 40);

    simulation.host_mut().intent = PlayerIntent::default();
    run_for(&mut simulation, 60);
    info!("Resting at {:?}", simulation.character().position);

    let eye = simulation.character().position + cgmath::Vector3::new(0.0, 1.0, 0.0);
    simulation.host_mut().camera.position = eye;
    let outcome = simulation.place_block(None)?;
    info!("Placement: {:?}", outcome);
    info!(
        "{} visual instances live",
        simulation.host().live_instances
    );

    Ok(())
}
