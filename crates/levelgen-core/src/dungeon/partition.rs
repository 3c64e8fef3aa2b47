//! Binary space partitioning of the level region
//!
//! The tree is stored as an arena: nodes refer to their children by index
//! and every node has exactly one parent, so there is no sharing and no
//! cycle. The tree lives only for the duration of one generation run.

use crate::config::DungeonConfig;
use crate::consts::{ROOM_MARGIN, SPLIT_JITTER_DIVISOR};
use crate::rng::GenRng;

use super::rect::Rect;
use super::room::RoomId;

/// Orientation of the line separating two children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Vertical cut: children sit left and right of each other
    Vertical,
    /// Horizontal cut: children sit above and below each other
    Horizontal,
}

/// How an internal node was divided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split {
    pub axis: SplitAxis,
    /// First column (vertical) or row (horizontal) of the second child
    pub at: i32,
    /// Left or top child
    pub first: usize,
    /// Right or bottom child
    pub second: usize,
}

/// One node of the partition tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionNode {
    pub rect: Rect,
    pub depth: u32,
    pub split: Option<Split>,
    /// Room assigned to this leaf by the room placer
    pub room: Option<RoomId>,
}

impl PartitionNode {
    pub fn is_leaf(&self) -> bool {
        self.split.is_none()
    }
}

/// Arena-backed BSP tree; index 0 is the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub const ROOT: usize = 0;

    fn new(region: Rect) -> Self {
        Self {
            nodes: vec![PartitionNode {
                rect: region,
                depth: 0,
                split: None,
                room: None,
            }],
        }
    }

    pub fn node(&self, idx: usize) -> &PartitionNode {
        &self.nodes[idx]
    }

    pub fn node_mut(&mut self, idx: usize) -> &mut PartitionNode {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Leaf indices, left/top subtree first
    pub fn leaves(&self) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack = vec![Self::ROOT];
        while let Some(idx) = stack.pop() {
            match self.nodes[idx].split {
                Some(split) => {
                    stack.push(split.second);
                    stack.push(split.first);
                }
                None => out.push(idx),
            }
        }
        out
    }

    /// Internal node indices with every child listed before its parent
    pub fn internal_post_order(&self) -> Vec<usize> {
        let mut out = Vec::new();
        self.collect_post_order(Self::ROOT, &mut out);
        out
    }

    fn collect_post_order(&self, idx: usize, out: &mut Vec<usize>) {
        if let Some(split) = self.nodes[idx].split {
            self.collect_post_order(split.first, out);
            self.collect_post_order(split.second, out);
            out.push(idx);
        }
    }

    /// Rooms assigned to the leaves below `idx`
    pub fn rooms_under(&self, idx: usize) -> Vec<RoomId> {
        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            match node.split {
                Some(split) => {
                    stack.push(split.second);
                    stack.push(split.first);
                }
                None => out.extend(node.room),
            }
        }
        out
    }

    /// Rooms below `idx` whose leaves border the line of `split`
    ///
    /// `idx` must be one of the split's children.
    pub fn rooms_bordering(&self, idx: usize, split: &Split) -> Vec<RoomId> {
        let touches = |rect: &Rect| match split.axis {
            SplitAxis::Vertical => rect.hx == split.at - 1 || rect.lx == split.at,
            SplitAxis::Horizontal => rect.hy == split.at - 1 || rect.ly == split.at,
        };

        let mut out = Vec::new();
        let mut stack = vec![idx];
        while let Some(i) = stack.pop() {
            let node = &self.nodes[i];
            if !touches(&node.rect) {
                continue;
            }
            match node.split {
                Some(inner) => {
                    stack.push(inner.second);
                    stack.push(inner.first);
                }
                None => out.extend(node.room),
            }
        }
        out
    }

    /// Deepest level reached
    pub fn max_depth(&self) -> u32 {
        self.nodes.iter().map(|n| n.depth).max().unwrap_or(0)
    }
}

/// Smallest leaf extent on either axis: twice the minimum room size, and
/// never less than a minimum-size room plus its margin
pub fn min_leaf_size(config: &DungeonConfig) -> i32 {
    let min_room = config.min_room_size as i32;
    (2 * min_room).max(min_room + 2 * ROOM_MARGIN)
}

/// Recursively split `region` until leaves reach the minimum size or the
/// depth cap.
///
/// The leaves always tessellate `region` exactly.
pub fn partition(region: Rect, config: &DungeonConfig, rng: &mut GenRng) -> PartitionTree {
    let mut tree = PartitionTree::new(region);
    split_node(&mut tree, PartitionTree::ROOT, config, rng);
    tree
}

fn split_node(tree: &mut PartitionTree, idx: usize, config: &DungeonConfig, rng: &mut GenRng) {
    let rect = tree.nodes[idx].rect;
    let depth = tree.nodes[idx].depth;
    if depth >= config.max_depth {
        return;
    }

    // Too small on either axis ends the recursion
    let leaf_min = min_leaf_size(config);
    if rect.width() < 2 * leaf_min || rect.height() < 2 * leaf_min {
        return;
    }

    let axis = if rng.coin_flip() {
        SplitAxis::Vertical
    } else {
        SplitAxis::Horizontal
    };

    let (lo, len) = match axis {
        SplitAxis::Vertical => (rect.lx, rect.width()),
        SplitAxis::Horizontal => (rect.ly, rect.height()),
    };
    let jitter = len / SPLIT_JITTER_DIVISOR;
    let first_len = (len / 2 + rng.range_inclusive(-jitter, jitter)).clamp(leaf_min, len - leaf_min);
    let at = lo + first_len;

    let (first_rect, second_rect) = match axis {
        SplitAxis::Vertical => (
            Rect::new(rect.lx, rect.ly, at - 1, rect.hy),
            Rect::new(at, rect.ly, rect.hx, rect.hy),
        ),
        SplitAxis::Horizontal => (
            Rect::new(rect.lx, rect.ly, rect.hx, at - 1),
            Rect::new(rect.lx, at, rect.hx, rect.hy),
        ),
    };

    let first = tree.nodes.len();
    let second = first + 1;
    for child in [first_rect, second_rect] {
        tree.nodes.push(PartitionNode {
            rect: child,
            depth: depth + 1,
            split: None,
            room: None,
        });
    }
    tree.nodes[idx].split = Some(Split {
        axis,
        at,
        first,
        second,
    });

    split_node(tree, first, config, rng);
    split_node(tree, second, config, rng);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn region(config: &DungeonConfig) -> Rect {
        Rect::from_size(0, 0, config.width as i32, config.height as i32)
    }

    #[test]
    fn test_leaves_tessellate_region() {
        let config = DungeonConfig::default();
        let mut rng = GenRng::new(42);
        let tree = partition(region(&config), &config, &mut rng);
        let leaves = tree.leaves();

        assert!(leaves.len() > 1);
        let total: i64 = leaves.iter().map(|&i| tree.node(i).rect.area()).sum();
        assert_eq!(total, region(&config).area());

        for (n, &a) in leaves.iter().enumerate() {
            assert!(region(&config).contains(&tree.node(a).rect));
            for &b in &leaves[n + 1..] {
                assert!(!tree.node(a).rect.intersects(&tree.node(b).rect));
            }
        }
    }

    #[test]
    fn test_leaves_at_least_twice_min_room() {
        let config = DungeonConfig::with_size(80, 80).with_seed(42);
        let mut rng = GenRng::new(config.seed);
        let tree = partition(region(&config), &config, &mut rng);
        let bound = 2 * config.min_room_size as i32;

        assert!(tree.leaves().len() > 1);
        for idx in tree.leaves() {
            let rect = tree.node(idx).rect;
            assert!(rect.width() >= bound, "leaf {}x{}", rect.width(), rect.height());
            assert!(rect.height() >= bound, "leaf {}x{}", rect.width(), rect.height());
        }
    }

    #[test]
    fn test_min_leaf_keeps_room_margin() {
        let small = DungeonConfig {
            min_room_size: 2,
            ..DungeonConfig::default()
        };
        assert_eq!(min_leaf_size(&small), 2 + 2 * ROOM_MARGIN);
        assert_eq!(min_leaf_size(&DungeonConfig::default()), 12);
    }

    #[test]
    fn test_leaf_minimum_and_depth_cap() {
        let config = DungeonConfig {
            max_depth: 3,
            ..DungeonConfig::with_size(200, 120)
        };
        let mut rng = GenRng::new(7);
        let tree = partition(region(&config), &config, &mut rng);

        assert!(tree.max_depth() <= 3);
        assert!(tree.leaves().len() <= 8);
        let leaf_min = min_leaf_size(&config);
        for idx in tree.leaves() {
            let rect = tree.node(idx).rect;
            assert!(rect.width() >= leaf_min, "leaf {rect:?} too narrow");
            assert!(rect.height() >= leaf_min, "leaf {rect:?} too short");
        }
    }

    #[test]
    fn test_small_region_is_single_leaf() {
        let config = DungeonConfig {
            min_room_size: 6,
            ..DungeonConfig::with_size(10, 10)
        };
        let mut rng = GenRng::new(42);
        let tree = partition(region(&config), &config, &mut rng);

        assert_eq!(tree.len(), 1);
        assert_eq!(tree.leaves(), vec![PartitionTree::ROOT]);
        assert!(tree.internal_post_order().is_empty());
    }

    #[test]
    fn test_narrow_region_not_split() {
        // Long enough for many rooms, too short on the other axis
        let config = DungeonConfig::with_size(120, 20);
        let mut rng = GenRng::new(1);
        let tree = partition(region(&config), &config, &mut rng);
        assert_eq!(tree.leaves(), vec![PartitionTree::ROOT]);
    }

    #[test]
    fn test_sliver_region_not_split() {
        let config = DungeonConfig {
            min_room_size: 2,
            ..DungeonConfig::with_size(4, 100)
        };
        let mut rng = GenRng::new(1);
        let tree = partition(region(&config), &config, &mut rng);
        assert_eq!(tree.leaves().len(), 1);
    }

    #[test]
    fn test_rooms_bordering_split_line() {
        let config = DungeonConfig::with_size(160, 160);
        let mut rng = GenRng::new(3);
        let mut tree = partition(region(&config), &config, &mut rng);
        let leaves = tree.leaves();
        for (n, &leaf) in leaves.iter().enumerate() {
            tree.node_mut(leaf).room = Some(RoomId(n));
        }

        let split = tree.node(PartitionTree::ROOT).split.unwrap();
        for child in [split.first, split.second] {
            let bordering = tree.rooms_bordering(child, &split);
            let all = tree.rooms_under(child);
            assert!(!bordering.is_empty());
            assert!(bordering.len() <= all.len());

            for (n, &leaf) in leaves.iter().enumerate() {
                let rect = tree.node(leaf).rect;
                let on_line = match split.axis {
                    SplitAxis::Vertical => rect.hx == split.at - 1 || rect.lx == split.at,
                    SplitAxis::Horizontal => rect.hy == split.at - 1 || rect.ly == split.at,
                };
                let below = all.contains(&RoomId(n));
                assert_eq!(bordering.contains(&RoomId(n)), below && on_line);
            }
        }
    }

    #[test]
    fn test_post_order_children_first() {
        let config = DungeonConfig::default();
        let mut rng = GenRng::new(5);
        let tree = partition(region(&config), &config, &mut rng);
        let order = tree.internal_post_order();

        assert_eq!(order.last(), Some(&PartitionTree::ROOT));
        for (pos, &idx) in order.iter().enumerate() {
            let split = tree.node(idx).split.unwrap();
            for child in [split.first, split.second] {
                if !tree.node(child).is_leaf() {
                    let child_pos = order.iter().position(|&i| i == child).unwrap();
                    assert!(child_pos < pos);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_tree() {
        let config = DungeonConfig::default();
        let a = partition(region(&config), &config, &mut GenRng::new(99));
        let b = partition(region(&config), &config, &mut GenRng::new(99));
        assert_eq!(a, b);
    }
}
