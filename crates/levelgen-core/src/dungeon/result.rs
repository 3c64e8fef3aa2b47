//! Finished dungeon handed to consumers

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::corridor::Corridor;
use super::door::{Door, DoorId};
use super::rect::{Point, Rect};
use super::room::{Room, RoomId, RoomType};

/// Output of one generation run
///
/// Read-only once built: consumers get slices and references, never
/// mutable access. Rooms and doors are stored in id order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DungeonResult {
    width: u32,
    height: u32,
    seed: u64,
    rooms: Vec<Room>,
    doors: Vec<Door>,
    corridors: Vec<Corridor>,
    starting_room: Option<RoomId>,
    rooms_by_type: BTreeMap<RoomType, Vec<RoomId>>,
}

impl DungeonResult {
    pub fn new(
        width: u32,
        height: u32,
        seed: u64,
        rooms: Vec<Room>,
        doors: Vec<Door>,
        corridors: Vec<Corridor>,
        starting_room: Option<RoomId>,
    ) -> Self {
        let mut rooms_by_type: BTreeMap<RoomType, Vec<RoomId>> = BTreeMap::new();
        for room in &rooms {
            rooms_by_type.entry(room.room_type).or_default().push(room.id);
        }

        Self {
            width,
            height,
            seed,
            rooms,
            doors,
            corridors,
            starting_room,
            rooms_by_type,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Seed of the run that produced this dungeon
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// The whole region as a rectangle
    pub fn region(&self) -> Rect {
        Rect::from_size(0, 0, self.width as i32, self.height as i32)
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    pub fn corridors(&self) -> &[Corridor] {
        &self.corridors
    }

    /// Every corridor cell, in corridor order
    pub fn corridor_cells(&self) -> impl Iterator<Item = Point> + '_ {
        self.corridors.iter().flat_map(|c| c.cells.iter().copied())
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0).filter(|r| r.id == id)
    }

    pub fn door(&self, id: DoorId) -> Option<&Door> {
        self.doors.get(id.0).filter(|d| d.id == id)
    }

    pub fn starting_room(&self) -> Option<&Room> {
        self.starting_room.and_then(|id| self.room(id))
    }

    pub fn starting_room_id(&self) -> Option<RoomId> {
        self.starting_room
    }

    /// The door marked as entrance, if any
    pub fn entrance_door(&self) -> Option<&Door> {
        self.doors.iter().find(|d| d.is_entrance)
    }

    /// Rooms of one type, in id order
    pub fn rooms_of_type(&self, room_type: RoomType) -> &[RoomId] {
        self.rooms_by_type
            .get(&room_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rooms_by_type(&self) -> &BTreeMap<RoomType, Vec<RoomId>> {
        &self.rooms_by_type
    }

    /// Doors set into a room's walls
    pub fn doors_of(&self, room: RoomId) -> impl Iterator<Item = &Door> + '_ {
        self.doors.iter().filter(move |d| d.owner() == room)
    }
}
