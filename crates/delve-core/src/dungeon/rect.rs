//! Rectangles for sections and rooms

use serde::{Deserialize, Serialize};

use super::grid::Coord;

/// An axis-aligned rectangle in tile units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: usize,
    pub top: usize,
    pub width: usize,
    pub height: usize,
}

impl Rect {
    pub const fn new(left: usize, top: usize, width: usize, height: usize) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Last column inside the rectangle
    pub const fn right(&self) -> usize {
        self.left + self.width.saturating_sub(1)
    }

    /// Last row inside the rectangle
    pub const fn bottom(&self) -> usize {
        self.top + self.height.saturating_sub(1)
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a coordinate lies inside
    pub const fn contains(&self, c: Coord) -> bool {
        !self.is_empty()
            && c.x >= self.left
            && c.x <= self.right()
            && c.y >= self.top
            && c.y <= self.bottom()
    }

    /// Centre tile, rounded towards the origin
    pub const fn center(&self) -> Coord {
        Coord::new(
            self.left + self.width.saturating_sub(1) / 2,
            self.top + self.height.saturating_sub(1) / 2,
        )
    }

    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let Rect {
            left,
            top,
            width,
            height,
        } = *self;
        (top..top + height).flat_map(move |y| (left..left + width).map(move |x| Coord::new(x, y)))
    }
}
