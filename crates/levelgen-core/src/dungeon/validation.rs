//! Independent checks over a finished dungeon
//!
//! Nothing here trusts the generator: connectivity is re-derived from the
//! doors with a [`ConnectivityTracker`], distances with a fresh BFS. The
//! validator never fails; problems are reported as error strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum::EnumCount;
use tracing::debug;

use super::corridor::ConnectivityTracker;
use super::progression::{adjacency, bfs_distances};
use super::result::DungeonResult;
use super::room::{RoomId, RoomType};

/// Outcome of [`validate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Reachable rooms over total rooms; 1.0 iff fully connected
    pub completability_score: f64,
    /// Evenness of room types and distance labels in [0, 1]
    pub balance_score: f64,
    pub reachable_rooms: usize,
    pub total_rooms: usize,
}

impl ValidationReport {
    fn degenerate(errors: Vec<String>, total_rooms: usize) -> Self {
        Self {
            is_valid: false,
            errors,
            warnings: Vec::new(),
            completability_score: 0.0,
            balance_score: 0.0,
            reachable_rooms: 0,
            total_rooms,
        }
    }
}

/// Shannon entropy of `counts` normalised by the entropy of `buckets`
/// equally filled buckets
pub fn normalized_entropy(counts: &[usize], buckets: usize) -> f64 {
    if buckets <= 1 {
        return 1.0;
    }
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }

    let total = total as f64;
    let entropy: f64 = counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.ln()
        })
        .sum();
    (entropy / (buckets as f64).ln()).clamp(0.0, 1.0)
}

/// Mean of room type evenness and distance label evenness
pub fn balance_score(dungeon: &DungeonResult) -> f64 {
    let rooms = dungeon.rooms();

    let mut types: BTreeMap<RoomType, usize> = BTreeMap::new();
    for room in rooms {
        *types.entry(room.room_type).or_default() += 1;
    }
    let type_counts: Vec<usize> = types.into_values().collect();
    let type_evenness = normalized_entropy(&type_counts, RoomType::COUNT.min(rooms.len()));

    let mut distances: BTreeMap<u32, usize> = BTreeMap::new();
    for d in rooms.iter().filter_map(|r| r.distance_from_start) {
        *distances.entry(d).or_default() += 1;
    }
    let labelled: usize = distances.values().sum();
    let span = distances.keys().next_back().map_or(0, |&max| max as usize + 1);
    let distance_counts: Vec<usize> = distances.into_values().collect();
    let distance_evenness = normalized_entropy(&distance_counts, span.min(labelled));

    (type_evenness + distance_evenness) / 2.0
}

fn list(ids: &[RoomId]) -> String {
    ids.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Check a dungeon's structural invariants and score it
pub fn validate(dungeon: &DungeonResult) -> ValidationReport {
    let rooms = dungeon.rooms();
    let doors = dungeon.doors();
    let total = rooms.len();

    let mut degenerate = Vec::new();
    if dungeon.width() == 0 || dungeon.height() == 0 {
        degenerate.push(format!(
            "region has zero size ({}x{})",
            dungeon.width(),
            dungeon.height()
        ));
    }
    if total == 0 {
        degenerate.push("dungeon has no rooms".to_string());
    }
    if !degenerate.is_empty() {
        debug!(errors = degenerate.len(), "degenerate dungeon");
        return ValidationReport::degenerate(degenerate, total);
    }

    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for (i, room) in rooms.iter().enumerate() {
        if room.id.0 != i {
            errors.push(format!("room at index {i} has id {}", room.id));
        }
    }

    // Starting room
    let flagged: Vec<RoomId> = rooms
        .iter()
        .filter(|r| r.is_starting_room)
        .map(|r| r.id)
        .collect();
    let start = dungeon.starting_room();
    match start {
        None => errors.push("no starting room".to_string()),
        Some(room) => {
            if !room.is_starting_room {
                errors.push(format!("{} is the starting room but is not flagged", room.id));
            }
            if room.distance_from_start != Some(0) {
                errors.push(format!(
                    "starting {} has distance {:?}, expected 0",
                    room.id, room.distance_from_start
                ));
            }
        }
    }
    if flagged.len() > 1 {
        errors.push(format!("{} rooms flagged as start: {}", flagged.len(), list(&flagged)));
    }

    // Overlap
    for (i, a) in rooms.iter().enumerate() {
        for b in &rooms[i + 1..] {
            if a.bounds.intersects(&b.bounds) {
                errors.push(format!("{} overlaps {}", a.id, b.id));
            }
        }
    }

    // Connectivity
    let mut tracker = ConnectivityTracker::new(total);
    for door in doors {
        match door.rooms.iter().find(|r| r.0 >= total) {
            Some(missing) => errors.push(format!("{} references missing {missing}", door.id)),
            None => tracker.merge(door.rooms[0], door.rooms[1]),
        }
    }
    let origin = start.map_or(RoomId(0), |r| r.id);
    let unreached: Vec<RoomId> = rooms
        .iter()
        .map(|r| r.id)
        .filter(|&id| !tracker.are_connected(origin, id))
        .collect();
    let reachable = total - unreached.len();
    if !unreached.is_empty() {
        errors.push(format!(
            "{} of {total} rooms unreachable from {origin}: {}",
            unreached.len(),
            list(&unreached)
        ));
    }

    // Distance labels
    if start.is_some() {
        let expected = bfs_distances(&adjacency(total, doors), origin);
        for (room, want) in rooms.iter().zip(expected) {
            if room.distance_from_start != want {
                errors.push(format!(
                    "{} labelled {:?} from start, shortest path is {:?}",
                    room.id, room.distance_from_start, want
                ));
            }
        }
    }

    // Entrance
    let entrances: Vec<_> = doors.iter().filter(|d| d.is_entrance).collect();
    match (entrances.as_slice(), start) {
        ([], Some(room)) if dungeon.doors_of(room.id).next().is_none() => {
            warnings.push(format!("{} has no doors, so there is no entrance", room.id));
        }
        ([], _) => errors.push("no entrance door".to_string()),
        ([door], Some(room)) if !dungeon.doors_of(room.id).any(|d| d.id == door.id) => {
            errors.push(format!(
                "entrance {} is in the wall of {}, not the starting {}",
                door.id,
                door.owner(),
                room.id
            ));
        }
        ([_], _) => {}
        (many, _) => errors.push(format!("{} doors marked as entrance", many.len())),
    }

    // Type index
    let mut by_type: BTreeMap<RoomType, Vec<RoomId>> = BTreeMap::new();
    for room in rooms {
        by_type.entry(room.room_type).or_default().push(room.id);
    }
    if &by_type != dungeon.rooms_by_type() {
        warnings.push("rooms-by-type index does not match room types".to_string());
    }

    let report = ValidationReport {
        is_valid: errors.is_empty(),
        errors,
        warnings,
        completability_score: reachable as f64 / total as f64,
        balance_score: balance_score(dungeon),
        reachable_rooms: reachable,
        total_rooms: total,
    };
    debug!(
        valid = report.is_valid,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        completability = report.completability_score,
        balance = report.balance_score,
        "validated dungeon"
    );
    report
}
