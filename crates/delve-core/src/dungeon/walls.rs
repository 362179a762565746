//! Wall decoration pass
//!
//! Puts a `WallHall` face above every corridor tile whose upper neighbour
//! is empty space or a room wall face.

use super::grid::{Coord, TileGrid};
use super::tile::TileType;

/// Whether the finisher turns `above` into a corridor wall when `below` is a corridor
pub(crate) const fn takes_hall_wall(above: TileType, below: TileType) -> bool {
    matches!(below, TileType::FloorHall) && matches!(above, TileType::None | TileType::Wall)
}

/// Add corridor walls across the whole grid. Running it twice changes nothing.
pub fn add_walls(grid: &mut TileGrid) {
    let targets: Vec<Coord> = grid
        .coords()
        .filter_map(|c| {
            let above = c.up(1)?;
            takes_hall_wall(grid.get_or_none(above), grid.get_or_none(c)).then_some(above)
        })
        .collect();

    for c in targets {
        grid.set(c, TileType::WallHall);
    }
}
