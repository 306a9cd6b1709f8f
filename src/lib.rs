//! Grid raycaster in the style of early first-person engines.
//!
//! * [`world`] holds the immutable [`world::Scene`] (map grid + textures).
//! * [`sim`] owns the mutable player pose and input flags.
//! * [`engine`] casts one ray per column and drives the fixed-tick loop.
//! * [`renderer`] turns rays into pixels; [`renderer::Surface`] is what the
//!   host window shows.

pub mod assets;
pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;

pub use config::{ConfigError, EngineConfig};
