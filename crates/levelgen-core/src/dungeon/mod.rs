//! Dungeon layout generation
//!
//! Phases, in pipeline order:
//! - [`partition`]: BSP tree over the region
//! - [`placement`]: one room per leaf
//! - [`corridor`]: corridors and doors between sibling subtrees
//! - [`start`]: starting room selection
//! - [`progression`]: distance labels, entrance, lock states
//! - [`validation`]: independent checks and scores

pub mod corridor;
pub mod door;
pub mod generation;
pub mod map;
pub mod partition;
pub mod placement;
pub mod progression;
pub mod rect;
pub mod result;
pub mod room;
pub mod start;
pub mod validation;

pub use corridor::{ConnectivityTracker, Connections, Corridor, CorridorId, CorridorKind, connect_rooms};
pub use door::{Door, DoorId, DoorOrientation, DoorState, WallSide};
pub use generation::{DungeonGenerator, Generation, attempt_seed};
pub use map::{Tile, TileMap};
pub use partition::{PartitionNode, PartitionTree, Split, SplitAxis, partition};
pub use placement::place_rooms;
pub use progression::{Progression, label_progression};
pub use rect::{Point, Rect};
pub use result::DungeonResult;
pub use room::{Room, RoomId, RoomType};
pub use start::{Relaxation, StartSelection, score_room, select_starting_room};
pub use validation::{ValidationReport, validate};
