//! Procedural cave generation library
//!
//! Re-exports modules for use by binaries and tools.

pub mod border;
pub mod cave;
pub mod cell;
pub mod config;
pub mod error;
pub mod export;
pub mod generation;
pub mod passage;
pub mod regions;
pub mod rooms;
pub mod seeds;
pub mod tilemap;

pub use cave::{CaveGenerator, CaveMap, CaveStats, MeshBuilder, MESH_WALL_THRESHOLD};
pub use cell::Cell;
pub use config::{CaveConfig, CavePreset};
pub use error::{CaveError, Result};
pub use seeds::CaveSeed;
pub use tilemap::{Coord, Tilemap};
