//! Distance labelling, entrance choice and initial lock states

use std::collections::VecDeque;

use tracing::debug;

use crate::config::StartCriteria;

use super::corridor::Corridor;
use super::door::{Door, DoorId, DoorState};
use super::rect::Rect;
use super::room::{Room, RoomId};

/// Summary of a labelling pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub entrance: Option<DoorId>,
    pub reachable: usize,
    pub max_distance: u32,
    pub locked_doors: usize,
}

/// Room adjacency induced by the doors, indexed by room id
pub fn adjacency(room_count: usize, doors: &[Door]) -> Vec<Vec<RoomId>> {
    let mut adj = vec![Vec::new(); room_count];
    for door in doors {
        let [a, b] = door.rooms;
        if a.0 < room_count && b.0 < room_count {
            adj[a.0].push(b);
            adj[b.0].push(a);
        }
    }
    for neighbours in &mut adj {
        neighbours.sort_unstable();
        neighbours.dedup();
    }
    adj
}

/// Breadth-first hop counts from `start`; `None` for unreached rooms
pub fn bfs_distances(adj: &[Vec<RoomId>], start: RoomId) -> Vec<Option<u32>> {
    let mut dist = vec![None; adj.len()];
    if start.0 >= adj.len() {
        return dist;
    }

    let mut queue = VecDeque::new();
    dist[start.0] = Some(0);
    queue.push_back(start);
    while let Some(room) = queue.pop_front() {
        let next = dist[room.0].map_or(0, |d| d + 1);
        for &n in &adj[room.0] {
            if dist[n.0].is_none() {
                dist[n.0] = Some(next);
                queue.push_back(n);
            }
        }
    }
    dist
}

fn choose_entrance(
    rooms: &[Room],
    doors: &[Door],
    corridors: &[Corridor],
    start: RoomId,
    criteria: &StartCriteria,
    region: &Rect,
) -> Option<DoorId> {
    let candidates = doors.iter().filter(|d| d.owner() == start);

    if criteria.create_exterior_entrance {
        candidates
            .min_by_key(|d| (d.side.distance_to_edge(d.position, region), d.id))
            .map(|d| d.id)
    } else {
        candidates
            .min_by_key(|d| {
                let neighbour = rooms
                    .get(d.leads_to().0)
                    .and_then(|r| r.distance_from_start)
                    .unwrap_or(u32::MAX);
                let length = corridors.get(d.corridor.0).map_or(usize::MAX, Corridor::len);
                (neighbour, length, d.id)
            })
            .map(|d| d.id)
    }
}

/// Label each room with its distance from `start`, mark the entrance door
/// and set the initial door states
///
/// Rooms are indexed by id. Unreachable rooms keep `None`.
pub fn label_progression(
    rooms: &mut [Room],
    doors: &mut [Door],
    corridors: &[Corridor],
    start: RoomId,
    criteria: &StartCriteria,
    region: &Rect,
) -> Progression {
    let adj = adjacency(rooms.len(), doors);
    let dist = bfs_distances(&adj, start);
    for (room, d) in rooms.iter_mut().zip(&dist) {
        room.distance_from_start = *d;
    }

    let entrance = choose_entrance(rooms, doors, corridors, start, criteria, region);

    let mut locked_doors = 0;
    for door in doors.iter_mut() {
        door.is_entrance = Some(door.id) == entrance;
        door.state = DoorState::OPEN;
        if door.is_entrance {
            continue;
        }

        let Some(owner) = rooms.get(door.owner().0) else {
            continue;
        };
        let neighbour = rooms.get(door.leads_to().0).and_then(|r| r.distance_from_start);
        if let (Some(own), Some(theirs)) = (owner.distance_from_start, neighbour)
            && owner.room_type.is_gated()
            && theirs < own
        {
            door.state = DoorState::CLOSED | DoorState::LOCKED;
            locked_doors += 1;
        }
    }

    let reachable = dist.iter().filter(|d| d.is_some()).count();
    let max_distance = dist.iter().flatten().copied().max().unwrap_or(0);
    debug!(
        %start,
        reachable,
        max_distance,
        locked_doors,
        entrance = ?entrance,
        "labelled progression"
    );

    Progression {
        entrance,
        reachable,
        max_distance,
        locked_doors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::corridor::{CorridorId, CorridorKind};
    use crate::dungeon::door::WallSide;
    use crate::dungeon::rect::Point;
    use crate::dungeon::room::RoomType;

    /// Three rooms in a row: 0 - 1 - 2, with the first room at the left edge
    fn chain() -> (Vec<Room>, Vec<Door>, Vec<Corridor>) {
        let rooms = vec![
            Room::new(RoomId(0), Rect::new(2, 2, 7, 7), RoomType::Starting),
            Room::new(RoomId(1), Rect::new(12, 2, 17, 7), RoomType::Medium),
            Room::new(RoomId(2), Rect::new(22, 2, 27, 7), RoomType::Boss),
        ];
        let mut doors = Vec::new();
        let mut corridors = Vec::new();
        for (i, (a, b)) in [(0, 1), (1, 2)].into_iter().enumerate() {
            let cid = CorridorId(i);
            let left = Point::new(rooms[a].bounds.hx + 1, 4);
            let right = Point::new(rooms[b].bounds.lx - 1, 4);
            let da = DoorId(doors.len());
            doors.push(Door::new(da, left, WallSide::East, [RoomId(a), RoomId(b)], cid));
            let db = DoorId(doors.len());
            doors.push(Door::new(db, right, WallSide::West, [RoomId(b), RoomId(a)], cid));
            corridors.push(Corridor {
                id: cid,
                rooms: [RoomId(a), RoomId(b)],
                doors: [da, db],
                cells: (left.x + 1..right.x).map(|x| Point::new(x, 4)).collect(),
                kind: CorridorKind::Spanning,
            });
        }
        (rooms, doors, corridors)
    }

    #[test]
    fn test_bfs_distances() {
        let (_, doors, _) = chain();
        let adj = adjacency(4, &doors);
        let dist = bfs_distances(&adj, RoomId(0));
        assert_eq!(dist, vec![Some(0), Some(1), Some(2), None]);

        let dist = bfs_distances(&adj, RoomId(1));
        assert_eq!(dist, vec![Some(1), Some(0), Some(1), None]);

        // Start outside the graph reaches nothing
        assert_eq!(bfs_distances(&adj, RoomId(9)), vec![None; 4]);
    }

    #[test]
    fn test_labels_and_entrance() {
        let (mut rooms, mut doors, corridors) = chain();
        let region = Rect::from_size(0, 0, 40, 12);
        let progression = label_progression(
            &mut rooms,
            &mut doors,
            &corridors,
            RoomId(0),
            &StartCriteria::default(),
            &region,
        );

        assert_eq!(progression.reachable, 3);
        assert_eq!(progression.max_distance, 2);
        let distances: Vec<_> = rooms.iter().map(|r| r.distance_from_start).collect();
        assert_eq!(distances, vec![Some(0), Some(1), Some(2)]);

        // Room 0 has one door, so it is the entrance either way
        assert_eq!(progression.entrance, Some(DoorId(0)));
        assert_eq!(doors.iter().filter(|d| d.is_entrance).count(), 1);
    }

    #[test]
    fn test_gated_room_locks_inbound_door() {
        let (mut rooms, mut doors, corridors) = chain();
        let region = Rect::from_size(0, 0, 40, 12);
        let progression = label_progression(
            &mut rooms,
            &mut doors,
            &corridors,
            RoomId(0),
            &StartCriteria::default(),
            &region,
        );

        // Door 3 sits on the boss room's wall facing room 1
        assert_eq!(progression.locked_doors, 1);
        assert!(doors[3].state.is_locked());
        assert!(doors[3].state.contains(DoorState::CLOSED));
        assert!(!doors[2].state.is_locked());
        assert_eq!(doors[0].state, DoorState::OPEN);
    }

    #[test]
    fn test_exterior_entrance_faces_nearest_edge() {
        let (mut rooms, mut doors, corridors) = chain();
        let region = Rect::from_size(0, 0, 40, 12);
        // Middle room as start: west door is 11 cells from the edge, east door 21
        label_progression(
            &mut rooms,
            &mut doors,
            &corridors,
            RoomId(1),
            &StartCriteria::default(),
            &region,
        );
        let entrance: Vec<_> = doors.iter().filter(|d| d.is_entrance).collect();
        assert_eq!(entrance.len(), 1);
        assert_eq!(entrance[0].id, DoorId(1));
        assert_eq!(entrance[0].side, WallSide::West);
    }

    #[test]
    fn test_interior_entrance_prefers_closer_neighbour() {
        let (mut rooms, mut doors, mut corridors) = chain();
        // Make the corridor towards room 0 longer so the length tie-break decides
        corridors[0].cells.push(Point::new(0, 0));
        let criteria = StartCriteria {
            create_exterior_entrance: false,
            ..StartCriteria::default()
        };
        let region = Rect::from_size(0, 0, 40, 12);
        let progression =
            label_progression(&mut rooms, &mut doors, &corridors, RoomId(1), &criteria, &region);
        // Both neighbours are one hop away; the shorter corridor wins
        assert_eq!(progression.entrance, Some(DoorId(2)));
    }

    #[test]
    fn test_single_room_has_no_entrance() {
        let mut rooms = vec![Room::new(RoomId(0), Rect::new(2, 2, 5, 5), RoomType::Starting)];
        let mut doors = Vec::new();
        let progression = label_progression(
            &mut rooms,
            &mut doors,
            &[],
            RoomId(0),
            &StartCriteria::default(),
            &Rect::from_size(0, 0, 10, 10),
        );
        assert_eq!(progression.entrance, None);
        assert_eq!(progression.reachable, 1);
        assert_eq!(rooms[0].distance_from_start, Some(0));
    }
}
