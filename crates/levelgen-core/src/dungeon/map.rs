//! Tile rasterisation of a dungeon for inspection

use super::door::DoorState;
use super::rect::Point;
use super::result::DungeonResult;
use super::room::RoomType;

/// One map cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Stone,
    Floor,
    /// Top or bottom wall
    HWall,
    /// Left or right wall
    VWall,
    Corridor,
    Door(DoorState),
    Entrance,
    /// Centre of a room whose type is worth showing
    RoomMark(RoomType),
}

impl Tile {
    /// Check if this is a wall type
    pub const fn is_wall(&self) -> bool {
        matches!(self, Tile::HWall | Tile::VWall)
    }

    /// Check if this is passable (can walk through)
    pub fn is_passable(&self) -> bool {
        match self {
            Tile::Floor | Tile::Corridor | Tile::Entrance | Tile::RoomMark(_) => true,
            Tile::Door(state) => !state.contains(DoorState::CLOSED),
            Tile::Stone | Tile::HWall | Tile::VWall => false,
        }
    }

    /// Get the display character for this tile
    pub fn symbol(&self) -> char {
        match self {
            Tile::Stone => ' ',
            Tile::Floor => '.',
            Tile::HWall => '-',
            Tile::VWall => '|',
            Tile::Corridor => '#',
            Tile::Door(state) if state.contains(DoorState::CLOSED) => '+',
            Tile::Door(_) => '\'',
            Tile::Entrance => '*',
            Tile::RoomMark(room_type) => room_type.symbol(),
        }
    }
}

/// Row-major grid of tiles covering the dungeon region
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMap {
    width: usize,
    height: usize,
    tiles: Vec<Tile>,
}

impl TileMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            tiles: vec![Tile::Stone; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, p: Point) -> Option<usize> {
        let x = usize::try_from(p.x).ok()?;
        let y = usize::try_from(p.y).ok()?;
        (x < self.width && y < self.height).then_some(y * self.width + x)
    }

    pub fn get(&self, p: Point) -> Option<Tile> {
        self.index(p).map(|i| self.tiles[i])
    }

    /// Set a tile; points outside the map are ignored
    pub fn set(&mut self, p: Point, tile: Tile) {
        if let Some(i) = self.index(p) {
            self.tiles[i] = tile;
        }
    }

    /// Number of tiles matching `pred`
    pub fn count(&self, pred: impl Fn(&Tile) -> bool) -> usize {
        self.tiles.iter().filter(|t| pred(t)).count()
    }

    /// Rasterise corridors, then room walls and floors, then doors and marks
    pub fn from_dungeon(dungeon: &DungeonResult) -> Self {
        let mut map = Self::new(dungeon.width() as usize, dungeon.height() as usize);

        for cell in dungeon.corridor_cells() {
            map.set(cell, Tile::Corridor);
        }

        for room in dungeon.rooms() {
            let walls = room.wall_bounds();
            for y in walls.ly..=walls.hy {
                for x in walls.lx..=walls.hx {
                    let p = Point::new(x, y);
                    let tile = if room.contains(p) {
                        Tile::Floor
                    } else if y == walls.ly || y == walls.hy {
                        Tile::HWall
                    } else {
                        Tile::VWall
                    };
                    map.set(p, tile);
                }
            }
            if !room.room_type.is_sized() {
                map.set(room.center, Tile::RoomMark(room.room_type));
            }
        }

        for door in dungeon.doors() {
            let tile = if door.is_entrance {
                Tile::Entrance
            } else {
                Tile::Door(door.state)
            };
            map.set(door.position, tile);
        }

        map
    }

    /// ASCII picture, one line per row
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for row in self.tiles.chunks(self.width.max(1)) {
            out.extend(row.iter().map(Tile::symbol));
            out.push('\n');
        }
        out
    }
}
