//! Generation constants
//!
//! Tuning values shared by the generation phases. Configuration-level
//! defaults live on [`crate::DungeonConfig`] and [`crate::StartCriteria`].

/// Default recursion cap for the partition tree
pub const DEFAULT_MAX_DEPTH: u32 = 6;

/// Largest accepted recursion cap; bounds the tree at 2^12 leaves
pub const MAX_TREE_DEPTH: u32 = 12;

/// Cells between a leaf edge and its room floor: one gutter cell plus the wall
pub const ROOM_MARGIN: i32 = 2;

/// Largest accepted region size on either axis
pub const MAX_REGION_SIZE: u32 = 4096;

/// Split jitter is at most `axis_length / SPLIT_JITTER_DIVISOR` cells
pub const SPLIT_JITTER_DIVISOR: i32 = 8;

/// Default probability of an extra loop corridor per internal node
pub const DEFAULT_LOOP_CHANCE: f64 = 0.15;

/// Alternative room pairs tried before a loop corridor is abandoned
pub const MAX_LOOP_ATTEMPTS: usize = 3;

/// Default bound for regenerate-on-failure
pub const DEFAULT_MAX_ATTEMPTS: u32 = 8;

/// Odd constant used to derive per-attempt seeds
pub const ATTEMPT_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Maximum score removed from a room sitting exactly on a region corner
pub const CORNER_PENALTY: f64 = 1.0;

/// Score added for the best-connected room
pub const CONNECTION_WEIGHT: f64 = 0.5;
