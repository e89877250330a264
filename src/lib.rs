#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Sandbox
//!
//! The simulation core of a block-building sandbox: a chunked voxel world, a
//! character that walks, sprints, crouches and jumps through it, and block
//! placement from an aim ray.
//!
//! Rendering, input devices and animation stay outside. A host implements the
//! traits in [`engine_state::host`] and drives a [`Simulation`] once per frame.
//!
//! ## Key Modules
//!
//! * `config` - Tunable physics and placement constants, loadable from JSON
//! * `core` - Shared-resource wrapper used for the world
//! * `engine_state` - World model, character physics, placement and visual bookkeeping
//! * `error` - The crate's error type
//!
//! ## Usage
//!
//! ```ignore
//! voxel_sandbox::init_logging();
//!
//! let mut simulation = Simulation::new(&SandboxConfig::default(), host, spawn)?;
//! simulation.create_chunk(Point3::new(0, 0, 0))?;
//! simulation.rebuild_all_visuals();
//! simulation.tick(Duration::from_millis(16));
//! ```
//!
//! For web applications, `start()` is exported to JavaScript and sets up
//! console logging.

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

pub mod config;
pub mod core;
pub mod engine_state;
pub mod error;

pub use config::SandboxConfig;
pub use engine_state::{PlayerIntent, Simulation};
pub use error::{Result, VoxelError};

/// Installs the platform logger.
///
/// Natively the level comes from `RUST_LOG` and output goes to stdout. In
/// the browser logs go to the console at `info` and panics are reported there.
pub fn init_logging() {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                log::warn!("Logger was already initialized");
            }
        } else {
            let mut log_builder = env_logger::Builder::new();
            if log_builder
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init()
                .is_err()
            {
                log::warn!("Logger was already initialized");
            }
        }
    }
    log::info!("Logger initialized");
}

/// Browser entry point; installs logging.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn start() {
    init_logging();
}
