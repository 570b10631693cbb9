//! Real-time side-on brawler simulation.
//!
//! The crate is the simulation core only: `compute::tick` advances an
//! immutable `GameState` by one frame.  Rendering and device input live in
//! the binary.

pub mod body;
pub mod compute;
pub mod config;
pub mod enemy;
pub mod entities;
pub mod events;
pub mod geometry;
pub mod input;
pub mod particles;
pub mod player;
pub mod projectiles;
pub mod snapshot;
pub mod spawn;
