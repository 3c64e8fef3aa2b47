//! levelgen-core: procedural level layout generation
//!
//! Splits a rectangular region into a BSP tree, places one room per leaf,
//! connects sibling subtrees with corridors and doors, picks a starting room
//! and labels every room with its distance from the start.
//!
//! The crate performs no I/O. Each phase is a plain function over explicit
//! data, driven by a [`GenRng`] seeded once per run, so the same
//! configuration always yields the same dungeon.

pub mod config;
pub mod dungeon;
pub mod error;

mod consts;
mod rng;

pub use config::{DungeonConfig, StartCriteria};
pub use consts::*;
pub use dungeon::{
    DungeonGenerator, DungeonResult, Generation, ValidationReport, validate,
};
pub use error::{ConfigError, GenerationError};
pub use rng::GenRng;
