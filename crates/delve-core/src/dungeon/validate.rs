//! Structural checks on a finished tile grid
//!
//! Rules:
//! - no floor in the first two rows (space for wall tops),
//! - every wall face has floor directly above it or a wall top / empty
//!   tile two rows above it,
//! - every walkable tile is reachable from every other.

use std::collections::VecDeque;

use hashbrown::HashSet;

use super::grid::{Coord, TileGrid};
use super::tile::{TileMask, TileType};
use super::walls::takes_hall_wall;

/// Rows at the top that must stay free of floor
pub const RESERVED_ROWS: usize = 2;

/// Wall support rule for the tile at `wall`, reading tiles through `tile_at`
fn supports_wall(wall: Coord, tile_at: impl Fn(Coord) -> TileType) -> bool {
    let above = wall.up(1).map_or(TileType::None, &tile_at);
    let two_above = wall.up(2).map_or(TileType::None, &tile_at);
    above.is_floor() || matches!(two_above, TileType::WallTop | TileType::None)
}

/// Check the positional invariants. Connectivity is checked separately.
pub fn is_valid(grid: &TileGrid) -> bool {
    let floor_free = (0..RESERVED_ROWS.min(grid.height()))
        .all(|y| grid.row(y).iter().all(|t| !t.is_floor()));

    floor_free
        && grid
            .find(TileMask::WALL | TileMask::WALL_HALL)
            .all(|c| supports_wall(c, |at| grid.get_or_none(at)))
}

/// Every walkable tile reachable from the first one by 4-directional moves
pub fn is_connected(grid: &TileGrid) -> bool {
    let walkable: Vec<Coord> = grid.find(TileMask::WALKABLE).collect();
    let Some(&start) = walkable.first() else {
        return true;
    };
    reachable_from(grid, start).len() == walkable.len()
}

/// Walkable tiles reachable from `start` (flood fill)
pub fn reachable_from(grid: &TileGrid, start: Coord) -> HashSet<Coord> {
    let mut seen = HashSet::new();
    if !grid.get_or_none(start).is_walkable() {
        return seen;
    }

    let mut queue = VecDeque::from([start]);
    seen.insert(start);
    while let Some(c) = queue.pop_front() {
        for n in c.neighbors() {
            if grid.get_or_none(n).is_walkable() && seen.insert(n) {
                queue.push_back(n);
            }
        }
    }
    seen
}

/// Tile at `at` once `carved` is corridor and the wall finisher has run,
/// as far as the column below `at` decides it
fn projected(grid: &TileGrid, carved: [Coord; 2], at: Coord) -> TileType {
    let current = |c: Coord| {
        if carved.contains(&c) {
            TileType::FloorHall
        } else {
            grid.get_or_none(c)
        }
    };
    let tile = current(at);
    if takes_hall_wall(tile, current(Coord::new(at.x, at.y + 1))) {
        TileType::WallHall
    } else {
        tile
    }
}

fn wall_ok(grid: &TileGrid, carved: [Coord; 2], wall: Option<Coord>) -> bool {
    let Some(wall) = wall else {
        return true;
    };
    !projected(grid, carved, wall).is_wall()
        || supports_wall(wall, |at| projected(grid, carved, at))
}

/// Whether a corridor stepping from `from` into `to` keeps the wall that
/// may appear above `to` supported.
///
/// Both tiles count as corridor, so a step straight down never fails here.
pub fn step_keeps_wall_above(grid: &TileGrid, from: Coord, to: Coord) -> bool {
    wall_ok(grid, [from, to], to.up(1))
}

/// Whether the wall two rows under `to` stays supported after the step.
///
/// A failure here can still be repaired by carving the tile directly under
/// `to` next.
pub fn step_keeps_wall_below(grid: &TileGrid, from: Coord, to: Coord) -> bool {
    wall_ok(grid, [from, to], Some(Coord::new(to.x, to.y + 2)))
}
