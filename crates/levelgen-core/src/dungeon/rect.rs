//! Integer rectangles and grid points
//!
//! Rectangles are inclusive on all four sides, so a one-cell rectangle has
//! `lx == hx` and `ly == hy`.

use serde::{Deserialize, Serialize};

/// A grid cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Swap the axes
    pub const fn transposed(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    pub fn manhattan(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }
}

/// Axis-aligned rectangle with inclusive bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect {
    /// Left x coordinate
    pub lx: i32,
    /// Top y coordinate
    pub ly: i32,
    /// Right x coordinate
    pub hx: i32,
    /// Bottom y coordinate
    pub hy: i32,
}

impl Rect {
    /// Create a new rectangle from its corners
    pub const fn new(lx: i32, ly: i32, hx: i32, hy: i32) -> Self {
        Self { lx, ly, hx, hy }
    }

    /// Rectangle of the given size with its top-left corner at `(x, y)`
    pub const fn from_size(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            lx: x,
            ly: y,
            hx: x + width - 1,
            hy: y + height - 1,
        }
    }

    /// Get the width of the rectangle
    pub fn width(&self) -> i32 {
        (self.hx - self.lx + 1).max(0)
    }

    /// Get the height of the rectangle
    pub fn height(&self) -> i32 {
        (self.hy - self.ly + 1).max(0)
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    /// Check if the rectangle is valid (has positive area)
    pub fn is_valid(&self) -> bool {
        self.hx >= self.lx && self.hy >= self.ly
    }

    /// Center cell, rounded towards the top-left
    pub fn center(&self) -> Point {
        Point::new(self.lx + (self.width() - 1) / 2, self.ly + (self.height() - 1) / 2)
    }

    /// Check if this rectangle contains another
    pub fn contains(&self, other: &Rect) -> bool {
        self.lx <= other.lx && self.hx >= other.hx && self.ly <= other.ly && self.hy >= other.hy
    }

    /// Check if a cell lies inside the rectangle
    pub fn contains_point(&self, p: Point) -> bool {
        p.x >= self.lx && p.x <= self.hx && p.y >= self.ly && p.y <= self.hy
    }

    /// Check if this rectangle intersects another
    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.hx < other.lx || self.lx > other.hx || self.hy < other.ly || self.ly > other.hy)
    }

    /// Smallest rectangle covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect {
            lx: self.lx.min(other.lx),
            ly: self.ly.min(other.ly),
            hx: self.hx.max(other.hx),
            hy: self.hy.max(other.hy),
        }
    }

    /// Grow (or shrink, for negative `by`) on all four sides
    pub fn expanded(&self, by: i32) -> Rect {
        Rect {
            lx: self.lx - by,
            ly: self.ly - by,
            hx: self.hx + by,
            hy: self.hy + by,
        }
    }

    /// Swap the axes
    pub fn transposed(&self) -> Rect {
        Rect {
            lx: self.ly,
            ly: self.lx,
            hx: self.hy,
            hy: self.hx,
        }
    }

    /// Manhattan gap between two rectangles, 0 when they touch or overlap
    pub fn gap(&self, other: &Rect) -> i32 {
        let dx = (other.lx - self.hx).max(self.lx - other.hx).max(0);
        let dy = (other.ly - self.hy).max(self.ly - other.hy).max(0);
        dx + dy
    }
}
