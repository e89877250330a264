//! # Core Module
//!
//! Shared-ownership primitives used by the simulation.
//!
//! ## Key Components
//! - `MtResource`: reference-counted value behind a read-write lock, used to
//!   share the voxel world between the physics (readers) and the block placer
//!   (the single writer)

pub mod mt_resource;

pub use mt_resource::MtResource;
