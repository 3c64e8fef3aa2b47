//! Room types and structures
//!
//! A room is the rectangular floor area assigned to one partition leaf.
//! Its walls are the ring of cells directly around the floor; doors sit on
//! that ring.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumCount, EnumIter};

use super::door::DoorId;
use super::rect::{Point, Rect};

/// Stable room identifier, equal to the room's index in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoomId(pub usize);

impl std::fmt::Display for RoomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Room type tag
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumCount,
    EnumIter,
)]
pub enum RoomType {
    Small,
    #[default]
    Medium,
    Large,
    Treasure,
    Guard,
    Laboratory,
    Boss,
    Starting,
}

impl RoomType {
    /// Types drawn from the configured chances rather than from room size
    pub const SPECIAL: [RoomType; 4] = [
        RoomType::Treasure,
        RoomType::Guard,
        RoomType::Laboratory,
        RoomType::Boss,
    ];

    /// Check if this type comes from a configured chance
    pub fn is_special(self) -> bool {
        matches!(
            self,
            RoomType::Treasure | RoomType::Guard | RoomType::Laboratory | RoomType::Boss
        )
    }

    /// Check if doors into this room start locked
    pub fn is_gated(self) -> bool {
        matches!(self, RoomType::Boss | RoomType::Treasure)
    }

    /// Check if this is one of the size-derived types
    pub fn is_sized(self) -> bool {
        matches!(self, RoomType::Small | RoomType::Medium | RoomType::Large)
    }

    /// Map symbol used by the debug renderer for the room's centre
    pub const fn symbol(self) -> char {
        match self {
            RoomType::Small | RoomType::Medium | RoomType::Large => '.',
            RoomType::Treasure => '$',
            RoomType::Guard => 'G',
            RoomType::Laboratory => '!',
            RoomType::Boss => 'B',
            RoomType::Starting => '<',
        }
    }
}

/// A placed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    /// Floor cells, walls excluded
    pub bounds: Rect,
    pub center: Point,
    pub room_type: RoomType,
    /// Hops from the starting room; `None` until labelled or if unreachable
    pub distance_from_start: Option<u32>,
    pub is_starting_room: bool,
    /// Doors set into this room's walls, in ascending id order
    pub doors: Vec<DoorId>,
}

impl Room {
    /// Create a new unlabelled room
    pub fn new(id: RoomId, bounds: Rect, room_type: RoomType) -> Self {
        Self {
            id,
            bounds,
            center: bounds.center(),
            room_type,
            distance_from_start: None,
            is_starting_room: false,
            doors: Vec::new(),
        }
    }

    /// Floor area in cells
    pub fn area(&self) -> i64 {
        self.bounds.area()
    }

    /// Bounds including the wall ring
    pub fn wall_bounds(&self) -> Rect {
        self.bounds.expanded(1)
    }

    /// Number of doors leading out of this room
    pub fn connection_count(&self) -> usize {
        self.doors.len()
    }

    /// Check if this room overlaps with another (with buffer)
    pub fn overlaps(&self, other: &Room, buffer: i32) -> bool {
        self.bounds.expanded(buffer).intersects(&other.bounds.expanded(buffer))
    }

    /// Check if point is on the floor
    pub fn contains(&self, p: Point) -> bool {
        self.bounds.contains_point(p)
    }
}
