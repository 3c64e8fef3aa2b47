//! Room placement inside partition leaves
//!
//! One room per leaf. The floor keeps [`ROOM_MARGIN`] cells away from the
//! leaf edge so that walls of neighbouring rooms never touch and a free
//! gutter runs along every split line.

use tracing::debug;

use crate::config::DungeonConfig;
use crate::consts::ROOM_MARGIN;
use crate::rng::GenRng;

use super::partition::PartitionTree;
use super::rect::Rect;
use super::room::{Room, RoomId, RoomType};

/// Place a room in every leaf, recording it on the leaf
///
/// Room ids follow leaf order (left/top subtree first).
pub fn place_rooms(tree: &mut PartitionTree, config: &DungeonConfig, rng: &mut GenRng) -> Vec<Room> {
    let leaves = tree.leaves();
    let mut rooms = Vec::with_capacity(leaves.len());

    for leaf in leaves {
        let id = RoomId(rooms.len());
        let bounds = room_bounds(tree.node(leaf).rect, config, rng);
        let room_type = pick_room_type(&bounds, config, rng);
        tree.node_mut(leaf).room = Some(id);
        rooms.push(Room::new(id, bounds, room_type));
    }

    debug!(rooms = rooms.len(), "placed rooms");
    rooms
}

/// Pick floor bounds inside `leaf`
///
/// Leaves too small for the full margin fall back to a thinner margin and
/// finally to the leaf itself, so placement never fails.
pub fn room_bounds(leaf: Rect, config: &DungeonConfig, rng: &mut GenRng) -> Rect {
    let avail = [ROOM_MARGIN, 1]
        .into_iter()
        .map(|margin| leaf.expanded(-margin))
        .find(|r| r.is_valid())
        .unwrap_or(leaf);

    let min = config.min_room_size as i32;
    let max = config.max_room_size as i32;
    let width = pick_extent(avail.width(), min, max, rng);
    let height = pick_extent(avail.height(), min, max, rng);

    let x = rng.range_inclusive(avail.lx, avail.hx - width + 1);
    let y = rng.range_inclusive(avail.ly, avail.hy - height + 1);
    Rect::from_size(x, y, width, height)
}

fn pick_extent(available: i32, min: i32, max: i32, rng: &mut GenRng) -> i32 {
    if available <= min {
        available
    } else {
        rng.range_inclusive(min, max.min(available))
    }
}

/// Weighted draw between the special types and the size-derived remainder
pub fn pick_room_type(bounds: &Rect, config: &DungeonConfig, rng: &mut GenRng) -> RoomType {
    let roll = rng.unit_f64();
    let chances = [
        config.treasure_room_chance,
        config.guard_room_chance,
        config.laboratory_chance,
        config.boss_room_chance,
    ];

    let mut cumulative = 0.0;
    for (room_type, chance) in RoomType::SPECIAL.into_iter().zip(chances) {
        cumulative += chance;
        if roll < cumulative {
            return room_type;
        }
    }
    size_type(bounds, config)
}

/// Small, Medium or Large by where the room's mean side falls in the
/// configured size range
pub fn size_type(bounds: &Rect, config: &DungeonConfig) -> RoomType {
    let min = config.min_room_size as f64;
    let max = config.max_room_size as f64;
    let side = (bounds.area() as f64).sqrt();
    let t = if max > min { (side - min) / (max - min) } else { 0.5 };

    if t < 1.0 / 3.0 {
        RoomType::Small
    } else if t < 2.0 / 3.0 {
        RoomType::Medium
    } else {
        RoomType::Large
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::partition::partition;

    fn generate_rooms(config: &DungeonConfig, seed: u64) -> (PartitionTree, Vec<Room>) {
        let mut rng = GenRng::new(seed);
        let region = Rect::from_size(0, 0, config.width as i32, config.height as i32);
        let mut tree = partition(region, config, &mut rng);
        let rooms = place_rooms(&mut tree, config, &mut rng);
        (tree, rooms)
    }

    #[test]
    fn test_one_room_per_leaf() {
        let config = DungeonConfig::default();
        let (tree, rooms) = generate_rooms(&config, 42);

        let leaves = tree.leaves();
        assert_eq!(rooms.len(), leaves.len());
        for (i, leaf) in leaves.iter().enumerate() {
            let node = tree.node(*leaf);
            assert_eq!(node.room, Some(RoomId(i)));
            assert!(node.rect.expanded(-ROOM_MARGIN).contains(&rooms[i].bounds));
        }
    }

    #[test]
    fn test_room_sizes_within_range() {
        let config = DungeonConfig::default();
        let (_, rooms) = generate_rooms(&config, 11);
        for room in &rooms {
            let (w, h) = (room.bounds.width(), room.bounds.height());
            assert!((6..=15).contains(&w), "width {w} out of range");
            assert!((6..=15).contains(&h), "height {h} out of range");
        }
    }

    #[test]
    fn test_rooms_do_not_overlap() {
        let config = DungeonConfig::with_size(120, 90);
        let (_, rooms) = generate_rooms(&config, 3);
        for (i, a) in rooms.iter().enumerate() {
            for b in &rooms[i + 1..] {
                assert!(!a.overlaps(b, 1), "{:?} and {:?} overlap", a.bounds, b.bounds);
            }
        }
    }

    #[test]
    fn test_tiny_leaf_clamps_to_bounds() {
        let config = DungeonConfig {
            min_room_size: 6,
            max_room_size: 10,
            ..DungeonConfig::with_size(4, 3)
        };
        let mut rng = GenRng::new(1);
        let leaf = Rect::from_size(0, 0, 4, 3);
        let bounds = room_bounds(leaf, &config, &mut rng);
        assert!(leaf.contains(&bounds));
        assert_eq!(bounds, Rect::new(1, 1, 2, 1));

        let sliver = Rect::from_size(0, 0, 1, 1);
        assert_eq!(room_bounds(sliver, &config, &mut rng), sliver);
    }

    #[test]
    fn test_room_type_weights() {
        let bounds = Rect::from_size(0, 0, 6, 6);
        let all_boss = DungeonConfig {
            treasure_room_chance: 0.0,
            guard_room_chance: 0.0,
            laboratory_chance: 0.0,
            boss_room_chance: 1.0,
            ..DungeonConfig::default()
        };
        let no_special = DungeonConfig {
            treasure_room_chance: 0.0,
            guard_room_chance: 0.0,
            laboratory_chance: 0.0,
            boss_room_chance: 0.0,
            ..DungeonConfig::default()
        };
        let mut rng = GenRng::new(8);
        for _ in 0..50 {
            assert_eq!(pick_room_type(&bounds, &all_boss, &mut rng), RoomType::Boss);
            assert!(pick_room_type(&bounds, &no_special, &mut rng).is_sized());
        }
    }

    #[test]
    fn test_size_type_thresholds() {
        let config = DungeonConfig::default();
        assert_eq!(size_type(&Rect::from_size(0, 0, 6, 6), &config), RoomType::Small);
        assert_eq!(size_type(&Rect::from_size(0, 0, 10, 10), &config), RoomType::Medium);
        assert_eq!(size_type(&Rect::from_size(0, 0, 15, 15), &config), RoomType::Large);
    }
}
