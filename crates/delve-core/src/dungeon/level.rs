//! The finished level handed to the game

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::config::FogOfWar;

use super::grid::{Coord, TileGrid};
use super::tile::TileMask;

/// A generated level
///
/// `tile_set_id` and `fog_of_war` are carried through from the parameters
/// without being interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub width: usize,
    pub height: usize,
    pub level_number: u32,
    pub tiles: TileGrid,
    /// Where the player starts
    pub start: Coord,
    pub stairs_down: Coord,
    /// Set only when up stairs are enabled; always equal to `start`
    pub stairs_up: Option<Coord>,
    pub tile_set_id: String,
    pub fog_of_war: FogOfWar,
    /// Seed of the random source the level was generated with
    pub seed: u64,
}

impl LevelTemplate {
    /// Tiles in `allowed` that are not in `occupied`, in row-major order
    pub fn unoccupied_locations(&self, allowed: TileMask, occupied: &[Coord]) -> Vec<Coord> {
        unoccupied_locations(&self.tiles, allowed, occupied)
    }
}

/// Coordinates of `grid` whose tile is in `allowed` and that are not in
/// `occupied`, in row-major order
pub fn unoccupied_locations(grid: &TileGrid, allowed: TileMask, occupied: &[Coord]) -> Vec<Coord> {
    let occupied: HashSet<Coord> = occupied.iter().copied().collect();
    grid.find(allowed).filter(|c| !occupied.contains(c)).collect()
}
