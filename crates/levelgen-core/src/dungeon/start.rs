//! Starting room selection
//!
//! Rooms are filtered by area and connection count, then scored by how
//! close they sit to the region edge, how far they keep from the corners
//! and how many doors they have. When no room passes the filters they are
//! relaxed one at a time, connections first.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::StartCriteria;
use crate::consts::{CONNECTION_WEIGHT, CORNER_PENALTY};
use crate::error::GenerationError;

use super::room::{Room, RoomId, RoomType};

/// A hard filter dropped because no room satisfied it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Relaxation {
    MinConnections { required: u32 },
    MinArea { required: f64 },
}

impl fmt::Display for Relaxation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relaxation::MinConnections { required } => write!(
                f,
                "no room has at least {required} connections; connection filter relaxed"
            ),
            Relaxation::MinArea { required } => write!(
                f,
                "no room has an area of at least {required}; area filter relaxed"
            ),
        }
    }
}

/// Outcome of [`select_starting_room`]
#[derive(Debug, Clone, PartialEq)]
pub struct StartSelection {
    pub room: RoomId,
    pub score: f64,
    pub relaxations: Vec<Relaxation>,
}

impl StartSelection {
    /// Relaxations as report warnings
    pub fn warnings(&self) -> Vec<String> {
        self.relaxations.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, Copy)]
struct Filters {
    min_area: f64,
    min_connections: u32,
}

impl Filters {
    fn accepts(&self, room: &Room) -> bool {
        room.area() as f64 >= self.min_area
            && room.connection_count() as u64 >= u64::from(self.min_connections)
    }
}

/// Score a room as a starting point; higher is better
///
/// `max_connections` is the largest door count over all rooms and
/// normalises the connection bonus.
pub fn score_room(
    room: &Room,
    criteria: &StartCriteria,
    width: u32,
    height: u32,
    max_connections: usize,
) -> f64 {
    let w = width as i32;
    let h = height as i32;
    let b = &room.bounds;

    let edge = if criteria.prefer_map_edge {
        let nearest = b.lx.min(b.ly).min(w - 1 - b.hx).min(h - 1 - b.hy).max(0);
        let half = (f64::from(w.min(h)) / 2.0).max(1.0);
        (1.0 - f64::from(nearest) / half).clamp(0.0, 1.0) * criteria.edge_preference_strength
    } else {
        0.0
    };

    let corner = if criteria.corner_avoidance_radius > 0.0 {
        let (cx, cy) = (f64::from(room.center.x), f64::from(room.center.y));
        let (right, bottom) = (f64::from(w - 1), f64::from(h - 1));
        let d = [(0.0, 0.0), (right, 0.0), (0.0, bottom), (right, bottom)]
            .iter()
            .map(|&(x, y): &(f64, f64)| (cx - x).hypot(cy - y))
            .fold(f64::INFINITY, f64::min);
        if d < criteria.corner_avoidance_radius {
            CORNER_PENALTY * (1.0 - d / criteria.corner_avoidance_radius)
        } else {
            0.0
        }
    } else {
        0.0
    };

    let connections = if max_connections > 0 {
        CONNECTION_WEIGHT * room.connection_count() as f64 / max_connections as f64
    } else {
        0.0
    };

    edge - corner + connections
}

fn best_candidate(
    rooms: &[Room],
    criteria: &StartCriteria,
    filters: &Filters,
    width: u32,
    height: u32,
    max_connections: usize,
) -> Option<(RoomId, f64)> {
    let mut best: Option<(RoomId, f64)> = None;
    for room in rooms.iter().filter(|r| filters.accepts(r)) {
        let score = score_room(room, criteria, width, height, max_connections);
        best = match best {
            Some((id, s)) if s > score || (s == score && id < room.id) => Some((id, s)),
            _ => Some((room.id, score)),
        };
    }
    best
}

/// Pick the starting room and flag it
///
/// The chosen room becomes [`RoomType::Starting`]; every other room has its
/// starting flag cleared. Fails only when `rooms` is empty.
pub fn select_starting_room(
    rooms: &mut [Room],
    criteria: &StartCriteria,
    width: u32,
    height: u32,
) -> Result<StartSelection, GenerationError> {
    if rooms.is_empty() {
        return Err(GenerationError::NoCandidate);
    }

    let max_connections = rooms.iter().map(Room::connection_count).max().unwrap_or(0);
    let mut filters = Filters {
        min_area: criteria.min_room_area,
        min_connections: criteria.min_connections,
    };
    let mut relaxations = Vec::new();

    let (room, score) = loop {
        if let Some(best) = best_candidate(rooms, criteria, &filters, width, height, max_connections) {
            break best;
        }

        let relaxation = if filters.min_connections > 0 {
            let required = filters.min_connections;
            filters.min_connections = 0;
            Relaxation::MinConnections { required }
        } else if filters.min_area > 0.0 {
            let required = filters.min_area;
            filters.min_area = 0.0;
            Relaxation::MinArea { required }
        } else {
            return Err(GenerationError::NoCandidate);
        };
        warn!(%relaxation, "relaxing start room filter");
        relaxations.push(relaxation);
    };

    for r in rooms.iter_mut() {
        r.is_starting_room = r.id == room;
        if r.is_starting_room {
            r.room_type = RoomType::Starting;
        }
    }
    debug!(%room, score, relaxed = relaxations.len(), "selected starting room");

    Ok(StartSelection {
        room,
        score,
        relaxations,
    })
}
