//! Doors between rooms

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use super::corridor::CorridorId;
use super::rect::{Point, Rect};
use super::room::RoomId;

/// Stable door identifier, equal to the door's index in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DoorId(pub usize);

impl std::fmt::Display for DoorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "door#{}", self.0)
    }
}

/// Orientation of the wall a door is set into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum DoorOrientation {
    /// In a top or bottom wall; walked through vertically
    Horizontal,
    /// In a left or right wall; walked through horizontally
    Vertical,
}

/// Which wall of its room a door occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum WallSide {
    North,
    South,
    West,
    East,
}

impl WallSide {
    pub const fn orientation(self) -> DoorOrientation {
        match self {
            WallSide::North | WallSide::South => DoorOrientation::Horizontal,
            WallSide::West | WallSide::East => DoorOrientation::Vertical,
        }
    }

    /// Unit step leaving the room through this wall
    pub const fn outward(self) -> (i32, i32) {
        match self {
            WallSide::North => (0, -1),
            WallSide::South => (0, 1),
            WallSide::West => (-1, 0),
            WallSide::East => (1, 0),
        }
    }

    /// Same wall with the axes swapped
    pub const fn transposed(self) -> WallSide {
        match self {
            WallSide::North => WallSide::West,
            WallSide::South => WallSide::East,
            WallSide::West => WallSide::North,
            WallSide::East => WallSide::South,
        }
    }

    /// Cells between `p` and the region edge in this direction
    pub fn distance_to_edge(self, p: Point, region: &Rect) -> i32 {
        match self {
            WallSide::North => p.y - region.ly,
            WallSide::South => region.hy - p.y,
            WallSide::West => p.x - region.lx,
            WallSide::East => region.hx - p.x,
        }
    }
}

bitflags! {
    /// Door state flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct DoorState: u8 {
        const OPEN = 0x01;
        const CLOSED = 0x02;
        const LOCKED = 0x04;
    }
}

impl Default for DoorState {
    fn default() -> Self {
        DoorState::OPEN
    }
}

impl DoorState {
    pub fn is_locked(self) -> bool {
        self.contains(DoorState::LOCKED)
    }
}

// Serialized as the raw bits
impl Serialize for DoorState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DoorState {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(DoorState::from_bits_truncate(bits))
    }
}

/// A door in a room wall, joining that room to the room at the far end of
/// its corridor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Door {
    pub id: DoorId,
    /// Wall cell occupied by the door
    pub position: Point,
    pub orientation: DoorOrientation,
    pub side: WallSide,
    /// Rooms joined; the first is the room whose wall holds the door
    pub rooms: [RoomId; 2],
    pub corridor: CorridorId,
    pub is_entrance: bool,
    pub state: DoorState,
}

impl Door {
    pub fn new(
        id: DoorId,
        position: Point,
        side: WallSide,
        rooms: [RoomId; 2],
        corridor: CorridorId,
    ) -> Self {
        Self {
            id,
            position,
            orientation: side.orientation(),
            side,
            rooms,
            corridor,
            is_entrance: false,
            state: DoorState::OPEN,
        }
    }

    /// Room whose wall holds the door
    pub fn owner(&self) -> RoomId {
        self.rooms[0]
    }

    /// Room reached through the door's corridor
    pub fn leads_to(&self) -> RoomId {
        self.rooms[1]
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_orientation() {
        assert_eq!(WallSide::North.orientation(), DoorOrientation::Horizontal);
        assert_eq!(WallSide::South.orientation(), DoorOrientation::Horizontal);
        assert_eq!(WallSide::West.orientation(), DoorOrientation::Vertical);
        assert_eq!(WallSide::East.orientation(), DoorOrientation::Vertical);
        assert_eq!(WallSide::East.transposed(), WallSide::South);
        assert_eq!(WallSide::North.transposed().transposed(), WallSide::North);
    }

    #[test]
    fn test_distance_to_edge() {
        let region = Rect::new(0, 0, 79, 39);
        let p = Point::new(10, 5);
        assert_eq!(WallSide::North.distance_to_edge(p, &region), 5);
        assert_eq!(WallSide::South.distance_to_edge(p, &region), 34);
        assert_eq!(WallSide::West.distance_to_edge(p, &region), 10);
        assert_eq!(WallSide::East.distance_to_edge(p, &region), 69);
    }

    #[test]
    fn test_door_rooms() {
        let door = Door::new(
            DoorId(0),
            Point::new(4, 4),
            WallSide::East,
            [RoomId(2), RoomId(5)],
            CorridorId(0),
        );
        assert_eq!(door.orientation, DoorOrientation::Vertical);
        assert_eq!(door.owner(), RoomId(2));
        assert_eq!(door.leads_to(), RoomId(5));
        assert_eq!(door.state, DoorState::OPEN);
    }

    #[test]
    fn test_door_state_serde() {
        let state = DoorState::CLOSED | DoorState::LOCKED;
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, "6");
        let back: DoorState = serde_json::from_str(&json).unwrap();
        assert!(back.is_locked());
    }
}
