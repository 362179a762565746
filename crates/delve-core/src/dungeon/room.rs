//! Rooms and their exits
//!
//! A room occupies its whole rectangle:
//! - a `WallTop` border ring,
//! - a row of `Wall` (the wall face) directly under the top border,
//! - `Floor` everywhere else inside.
//!
//! Exits sit on the border next to interior floor. A top exit also opens
//! the wall face below it so the corridor reaches the floor.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use super::grid::{Coord, TileGrid};
use super::rect::Rect;
use super::tile::TileType;

/// Smallest room side that still leaves a floor tile under the wall face
pub const MIN_ROOM_DIMENSION: usize = 4;

/// Side of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// A perimeter tile where a corridor attaches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exit {
    pub coord: Coord,
    pub side: Side,
}

impl Exit {
    pub const fn new(coord: Coord, side: Side) -> Self {
        Self { coord, side }
    }

    /// Within one tile of `other` on the same side
    pub fn crowds(&self, other: &Exit) -> bool {
        self.side == other.side
            && self.coord.x.abs_diff(other.coord.x) <= 1
            && self.coord.y.abs_diff(other.coord.y) <= 1
    }
}

/// A placed room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub rect: Rect,
    pub exits: Vec<Exit>,
}

impl Room {
    pub fn new(rect: Rect) -> Self {
        Self {
            rect,
            exits: Vec::new(),
        }
    }

    /// The floor area
    pub fn interior(&self) -> Rect {
        let r = self.rect;
        Rect::new(
            r.left + 1,
            r.top + 2,
            r.width.saturating_sub(2),
            r.height.saturating_sub(3),
        )
    }

    /// Draw the room into the grid
    pub fn paint(&self, grid: &mut TileGrid) {
        let r = self.rect;
        for c in r.coords() {
            let border = c.x == r.left || c.x == r.right() || c.y == r.top || c.y == r.bottom();
            let tile = if border {
                TileType::WallTop
            } else if c.y == r.top + 1 {
                TileType::Wall
            } else {
                TileType::Floor
            };
            grid.set(c, tile);
        }
    }

    /// Every border tile on `side` that may hold an exit, ignoring existing exits
    pub fn side_tiles(&self, side: Side) -> Vec<Coord> {
        let r = self.rect;
        let inner_cols = r.left + 1..r.right();
        let floor_rows = r.top + 2..r.bottom();
        match side {
            Side::Top if r.top > 0 => inner_cols.map(|x| Coord::new(x, r.top)).collect(),
            Side::Top => Vec::new(),
            Side::Bottom => inner_cols.map(|x| Coord::new(x, r.bottom())).collect(),
            Side::Left if r.left > 0 => floor_rows.map(|y| Coord::new(r.left, y)).collect(),
            Side::Left => Vec::new(),
            Side::Right => floor_rows.map(|y| Coord::new(r.right(), y)).collect(),
        }
    }

    /// Exit positions not crowding an existing exit
    pub fn exit_candidates(&self) -> Vec<Exit> {
        Side::iter()
            .flat_map(|side| {
                self.side_tiles(side)
                    .into_iter()
                    .map(move |coord| Exit::new(coord, side))
            })
            .filter(|candidate| !self.exits.iter().any(|e| e.crowds(candidate)))
            .collect()
    }

    /// The tile just outside an exit, where its corridor arrives from
    pub fn approach(exit: &Exit) -> Option<Coord> {
        let Coord { x, y } = exit.coord;
        match exit.side {
            Side::Top => y.checked_sub(1).map(|y| Coord::new(x, y)),
            Side::Bottom => Some(Coord::new(x, y + 1)),
            Side::Left => x.checked_sub(1).map(|x| Coord::new(x, y)),
            Side::Right => Some(Coord::new(x + 1, y)),
        }
    }

    /// The wall-face tile a top exit opens, if any
    pub fn doorway(exit: &Exit) -> Option<Coord> {
        match exit.side {
            Side::Top => Some(Coord::new(exit.coord.x, exit.coord.y + 1)),
            _ => None,
        }
    }

    pub fn add_exit(&mut self, exit: Exit) {
        self.exits.push(exit);
    }

    pub fn center(&self) -> Coord {
        self.rect.center()
    }
}
