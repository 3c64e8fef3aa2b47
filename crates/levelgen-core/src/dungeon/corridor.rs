//! Corridor generation between partition siblings
//!
//! The partition tree is walked bottom-up. Every internal node joins one
//! room of its first subtree to one room of its second subtree, so by
//! induction the corridors of the root's subtree span every room and the
//! room graph is connected without any repair pass. Extra loop corridors
//! are optional and only added where a clean path exists.
//!
//! Path planning works in a canonical frame where the split line is
//! vertical and the first room lies to its left; horizontal splits are
//! transposed in and out of that frame.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DungeonConfig;
use crate::consts::MAX_LOOP_ATTEMPTS;
use crate::rng::GenRng;

use super::door::{Door, DoorId, WallSide};
use super::partition::{PartitionTree, Split, SplitAxis};
use super::rect::{Point, Rect};
use super::room::{Room, RoomId};

/// Stable corridor identifier, equal to the corridor's index in the result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CorridorId(pub usize);

/// Why a corridor exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CorridorKind {
    /// Joins the two subtrees of a partition node; required for connectivity
    Spanning,
    /// Extra route between rooms that are already connected
    Loop,
}

/// Cells linking two doors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corridor {
    pub id: CorridorId,
    pub rooms: [RoomId; 2],
    pub doors: [DoorId; 2],
    /// Centerline from the first door to the second, then any widening cells
    pub cells: Vec<Point>,
    pub kind: CorridorKind,
}

impl Corridor {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Output of [`connect_rooms`]
#[derive(Debug, Clone, Default)]
pub struct Connections {
    pub doors: Vec<Door>,
    pub corridors: Vec<Corridor>,
    pub loops_added: usize,
    pub loops_abandoned: usize,
}

/// Tracks room connectivity with a union-find forest
///
/// Union by size keeps every tree shallow; `merge` also halves the paths it
/// walks.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    parent: Vec<usize>,
    /// Component size, valid at roots only
    size: Vec<usize>,
    components: usize,
}

impl ConnectivityTracker {
    /// Create a new tracker for the given number of rooms
    pub fn new(num_rooms: usize) -> Self {
        Self {
            parent: (0..num_rooms).collect(),
            size: vec![1; num_rooms],
            components: num_rooms,
        }
    }

    fn root(&self, mut i: usize) -> usize {
        while self.parent[i] != i {
            i = self.parent[i];
        }
        i
    }

    fn root_halving(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    /// Check if two rooms are connected (in same component)
    pub fn are_connected(&self, a: RoomId, b: RoomId) -> bool {
        let n = self.parent.len();
        a.0 < n && b.0 < n && self.root(a.0) == self.root(b.0)
    }

    /// Merge the components of two connected rooms
    pub fn merge(&mut self, a: RoomId, b: RoomId) {
        let n = self.parent.len();
        if a.0 >= n || b.0 >= n {
            return;
        }

        let (ra, rb) = (self.root_halving(a.0), self.root_halving(b.0));
        if ra == rb {
            return;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] { (ra, rb) } else { (rb, ra) };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.components -= 1;
    }

    /// Number of rooms in the same component as `room`
    pub fn component_size(&self, room: RoomId) -> usize {
        if room.0 >= self.parent.len() {
            return 0;
        }
        self.size[self.root(room.0)]
    }

    /// Number of distinct components
    pub fn component_count(&self) -> usize {
        self.components
    }

    /// Check if all rooms are connected
    pub fn all_connected(&self) -> bool {
        self.component_count() <= 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PathShape {
    /// Facing walls joined along a shared row
    Straight,
    /// Leave the first room towards the split, turn into the second room's
    /// top or bottom wall
    BendIntoSecond,
    /// Leave the first room through its top or bottom wall, turn into the
    /// second room's wall facing the split
    BendOutOfFirst,
    /// Two bends through the free gutter column beside the split line
    Gutter,
}

const SPANNING_SHAPES: [PathShape; 4] = [
    PathShape::Straight,
    PathShape::BendIntoSecond,
    PathShape::BendOutOfFirst,
    PathShape::Gutter,
];

const LOOP_SHAPES: [PathShape; 3] = [
    PathShape::Straight,
    PathShape::BendIntoSecond,
    PathShape::BendOutOfFirst,
];

/// A planned corridor: two door cells and the centerline between them
#[derive(Debug, Clone, PartialEq, Eq)]
struct PathPlan {
    door_a: (Point, WallSide),
    door_b: (Point, WallSide),
    cells: Vec<Point>,
}

impl PathPlan {
    fn transposed(self) -> Self {
        Self {
            door_a: (self.door_a.0.transposed(), self.door_a.1.transposed()),
            door_b: (self.door_b.0.transposed(), self.door_b.1.transposed()),
            cells: self.cells.into_iter().map(Point::transposed).collect(),
        }
    }

    /// Door, centerline, door
    fn points(&self) -> impl Iterator<Item = Point> + '_ {
        std::iter::once(self.door_a.0)
            .chain(self.cells.iter().copied())
            .chain(std::iter::once(self.door_b.0))
    }
}

/// Axis-aligned cells through every waypoint, both ends included
fn polyline(waypoints: &[Point]) -> Vec<Point> {
    let mut cells = Vec::new();
    let Some(&first) = waypoints.first() else {
        return cells;
    };
    cells.push(first);
    let mut cur = first;
    for &next in &waypoints[1..] {
        while cur.x != next.x {
            cur.x += (next.x - cur.x).signum();
            cells.push(cur);
        }
        while cur.y != next.y {
            cur.y += (next.y - cur.y).signum();
            cells.push(cur);
        }
    }
    cells
}

/// Pick a value from the first non-empty inclusive range, choosing between
/// two candidates at random when both are usable
fn pick_band(
    first: (i32, i32),
    second: (i32, i32),
    rng: &mut GenRng,
) -> Option<(bool, i32)> {
    let first_ok = first.0 <= first.1;
    let second_ok = second.0 <= second.1;
    let use_first = match (first_ok, second_ok) {
        (false, false) => return None,
        (true, false) => true,
        (false, true) => false,
        (true, true) => rng.coin_flip(),
    };
    let (lo, hi) = if use_first { first } else { second };
    Some((use_first, rng.range_inclusive(lo, hi)))
}

/// Plan a path in the canonical frame: `a` lies left of `gutter`, `b` right
fn plan_path(shape: PathShape, a: &Rect, b: &Rect, gutter: i32, rng: &mut GenRng) -> Option<PathPlan> {
    if a.hx + 1 >= b.lx - 1 {
        return None;
    }

    match shape {
        PathShape::Straight => {
            let lo = a.ly.max(b.ly);
            let hi = a.hy.min(b.hy);
            if lo > hi {
                return None;
            }
            let y = rng.range_inclusive(lo, hi);
            let cells = if a.hx + 2 <= b.lx - 2 {
                polyline(&[Point::new(a.hx + 2, y), Point::new(b.lx - 2, y)])
            } else {
                Vec::new()
            };
            Some(PathPlan {
                door_a: (Point::new(a.hx + 1, y), WallSide::East),
                door_b: (Point::new(b.lx - 1, y), WallSide::West),
                cells,
            })
        }
        PathShape::BendIntoSecond => {
            let above = (a.ly, a.hy.min(b.ly - 2));
            let below = (a.ly.max(b.hy + 2), a.hy);
            let (enter_north, ya) = pick_band(above, below, rng)?;
            let xb = rng.range_inclusive(b.lx, b.hx);
            let (door, side, last) = if enter_north {
                (Point::new(xb, b.ly - 1), WallSide::North, Point::new(xb, b.ly - 2))
            } else {
                (Point::new(xb, b.hy + 1), WallSide::South, Point::new(xb, b.hy + 2))
            };
            Some(PathPlan {
                door_a: (Point::new(a.hx + 1, ya), WallSide::East),
                door_b: (door, side),
                cells: polyline(&[Point::new(a.hx + 2, ya), Point::new(xb, ya), last]),
            })
        }
        PathShape::BendOutOfFirst => {
            let above = (b.ly, b.hy.min(a.ly - 2));
            let below = (b.ly.max(a.hy + 2), b.hy);
            let (exit_north, yb) = pick_band(above, below, rng)?;
            let xa = rng.range_inclusive(a.lx, a.hx);
            let (door, side, first) = if exit_north {
                (Point::new(xa, a.ly - 1), WallSide::North, Point::new(xa, a.ly - 2))
            } else {
                (Point::new(xa, a.hy + 1), WallSide::South, Point::new(xa, a.hy + 2))
            };
            Some(PathPlan {
                door_a: (door, side),
                door_b: (Point::new(b.lx - 1, yb), WallSide::West),
                cells: polyline(&[first, Point::new(xa, yb), Point::new(b.lx - 2, yb)]),
            })
        }
        PathShape::Gutter => {
            if gutter <= a.hx + 1 || gutter >= b.lx - 1 {
                return None;
            }
            let ya = rng.range_inclusive(a.ly, a.hy);
            let yb = rng.range_inclusive(b.ly, b.hy);
            Some(PathPlan {
                door_a: (Point::new(a.hx + 1, ya), WallSide::East),
                door_b: (Point::new(b.lx - 1, yb), WallSide::West),
                cells: polyline(&[
                    Point::new(a.hx + 2, ya),
                    Point::new(gutter, ya),
                    Point::new(gutter, yb),
                    Point::new(b.lx - 2, yb),
                ]),
            })
        }
    }
}

/// Room pairs across a split, nearest first
///
/// Callers pass only rooms whose leaves border the split line.
fn candidate_pairs(first: &[RoomId], second: &[RoomId], rooms: &[Room]) -> Vec<(RoomId, RoomId)> {
    let mut pairs: Vec<_> = first
        .iter()
        .flat_map(|&a| second.iter().map(move |&b| (a, b)))
        .collect();
    pairs.sort_by_key(|&(a, b)| (rooms[a.0].bounds.gap(&rooms[b.0].bounds), a, b));
    pairs
}

struct ConnectionBuilder<'a> {
    rooms: &'a [Room],
    region: Rect,
    corridor_width: i32,
    doors: Vec<Door>,
    corridors: Vec<Corridor>,
    door_cells: BTreeSet<Point>,
    joined: BTreeSet<(RoomId, RoomId)>,
    tracker: ConnectivityTracker,
}

impl<'a> ConnectionBuilder<'a> {
    fn new(rooms: &'a [Room], region: Rect, config: &DungeonConfig) -> Self {
        Self {
            rooms,
            region,
            corridor_width: config.corridor_width as i32,
            doors: Vec::new(),
            corridors: Vec::new(),
            door_cells: BTreeSet::new(),
            joined: BTreeSet::new(),
            tracker: ConnectivityTracker::new(rooms.len()),
        }
    }

    fn plan(
        &self,
        shape: PathShape,
        split: &Split,
        a: RoomId,
        b: RoomId,
        rng: &mut GenRng,
    ) -> Option<PathPlan> {
        let ra = self.rooms[a.0].bounds;
        let rb = self.rooms[b.0].bounds;
        let gutter = split.at - 1;
        match split.axis {
            SplitAxis::Vertical => plan_path(shape, &ra, &rb, gutter, rng),
            SplitAxis::Horizontal => {
                plan_path(shape, &ra.transposed(), &rb.transposed(), gutter, rng)
                    .map(PathPlan::transposed)
            }
        }
    }

    /// No centerline cell inside any room's walls and no reused door cell
    fn is_clean(&self, plan: &PathPlan, a: RoomId, b: RoomId) -> bool {
        if self.door_cells.contains(&plan.door_a.0) || self.door_cells.contains(&plan.door_b.0) {
            return false;
        }
        let cells_clear = plan.cells.iter().all(|&c| {
            self.region.contains_point(c)
                && !self.rooms.iter().any(|r| r.wall_bounds().contains_point(c))
        });
        let doors_clear = [plan.door_a.0, plan.door_b.0].iter().all(|&d| {
            !self
                .rooms
                .iter()
                .any(|r| r.id != a && r.id != b && r.wall_bounds().contains_point(d))
        });
        cells_clear && doors_clear
    }

    fn add_spanning(&mut self, split: &Split, first: &[RoomId], second: &[RoomId], rng: &mut GenRng) {
        let pairs = candidate_pairs(first, second, self.rooms);
        let Some(&(near_a, near_b)) = pairs.first() else {
            return;
        };

        for &(a, b) in &pairs {
            for shape in SPANNING_SHAPES {
                if let Some(plan) = self.plan(shape, split, a, b, rng)
                    && self.is_clean(&plan, a, b)
                {
                    self.commit(plan, a, b, CorridorKind::Spanning);
                    return;
                }
            }
        }

        // Every pair is obstructed; both leaves border the split, so the
        // gutter path stays inside them
        match self.plan(PathShape::Gutter, split, near_a, near_b, rng) {
            Some(plan) => self.commit(plan, near_a, near_b, CorridorKind::Spanning),
            None => debug!(a = %near_a, b = %near_b, "gutter path unavailable"),
        }
    }

    /// Returns false when every attempted pair was obstructed
    fn add_loop(&mut self, split: &Split, first: &[RoomId], second: &[RoomId], rng: &mut GenRng) -> bool {
        let pairs: Vec<_> = candidate_pairs(first, second, self.rooms)
            .into_iter()
            .filter(|&(a, b)| !self.joined.contains(&ordered(a, b)))
            .take(MAX_LOOP_ATTEMPTS)
            .collect();

        for (a, b) in pairs {
            let shared = self.rooms[a.0]
                .wall_bounds()
                .union(&self.rooms[b.0].wall_bounds());
            for shape in LOOP_SHAPES {
                if let Some(plan) = self.plan(shape, split, a, b, rng)
                    && self.is_clean(&plan, a, b)
                    && plan.cells.iter().all(|&c| shared.contains_point(c))
                {
                    self.commit(plan, a, b, CorridorKind::Loop);
                    return true;
                }
            }
        }
        false
    }

    fn commit(&mut self, plan: PathPlan, a: RoomId, b: RoomId, kind: CorridorKind) {
        let corridor_id = CorridorId(self.corridors.len());
        let door_a = DoorId(self.doors.len());
        let door_b = DoorId(self.doors.len() + 1);
        let cells = self.widen(&plan);

        self.doors.push(Door::new(door_a, plan.door_a.0, plan.door_a.1, [a, b], corridor_id));
        self.doors.push(Door::new(door_b, plan.door_b.0, plan.door_b.1, [b, a], corridor_id));
        self.door_cells.insert(plan.door_a.0);
        self.door_cells.insert(plan.door_b.0);
        self.corridors.push(Corridor {
            id: corridor_id,
            rooms: [a, b],
            doors: [door_a, door_b],
            cells,
            kind,
        });
        self.joined.insert(ordered(a, b));
        self.tracker.merge(a, b);
    }

    /// Centerline plus perpendicular widening, clipped to the region and
    /// kept out of room walls
    fn widen(&self, plan: &PathPlan) -> Vec<Point> {
        let mut cells = plan.cells.clone();
        if self.corridor_width <= 1 {
            return cells;
        }

        let path: Vec<Point> = plan.points().collect();
        let mut seen: BTreeSet<Point> = path.iter().copied().collect();
        for i in 1..path.len() - 1 {
            let (prev, cell) = (path[i - 1], path[i]);
            let horizontal = prev.y == cell.y;
            for k in 1..self.corridor_width {
                let extra = if horizontal {
                    Point::new(cell.x, cell.y + k)
                } else {
                    Point::new(cell.x + k, cell.y)
                };
                if self.region.contains_point(extra)
                    && !self.rooms.iter().any(|r| r.wall_bounds().contains_point(extra))
                    && seen.insert(extra)
                {
                    cells.push(extra);
                }
            }
        }
        cells
    }
}

fn ordered(a: RoomId, b: RoomId) -> (RoomId, RoomId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Carve corridors and doors so every room is reachable from every other
///
/// Door ids are recorded on the rooms whose walls hold them.
pub fn connect_rooms(
    tree: &PartitionTree,
    rooms: &mut [Room],
    region: Rect,
    config: &DungeonConfig,
    rng: &mut GenRng,
) -> Connections {
    let mut builder = ConnectionBuilder::new(rooms, region, config);
    let mut loops_added = 0;
    let mut loops_abandoned = 0;

    for idx in tree.internal_post_order() {
        let Some(split) = tree.node(idx).split else {
            continue;
        };
        let first = tree.rooms_bordering(split.first, &split);
        let second = tree.rooms_bordering(split.second, &split);

        builder.add_spanning(&split, &first, &second, rng);

        if rng.chance(config.loop_chance) {
            if builder.add_loop(&split, &first, &second, rng) {
                loops_added += 1;
            } else {
                loops_abandoned += 1;
                debug!(node = idx, "no clean path for loop corridor");
            }
        }
    }

    debug_assert!(builder.tracker.all_connected());
    debug!(
        doors = builder.doors.len(),
        corridors = builder.corridors.len(),
        loops_added,
        loops_abandoned,
        "connected rooms"
    );

    let ConnectionBuilder {
        doors, corridors, ..
    } = builder;
    for door in &doors {
        rooms[door.owner().0].doors.push(door.id);
    }

    Connections {
        doors,
        corridors,
        loops_added,
        loops_abandoned,
    }
}
