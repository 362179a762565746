//! Level generation
//!
//! Each attempt splits a fresh canvas, connects the rooms, adds corridor
//! walls and validates the result. Failed attempts are dropped whole and
//! retried with the next draws from the same random source, so a seed still
//! determines the outcome. Stairs and the start position go onto the first
//! accepted grid.

use tracing::{debug, info, warn};

use crate::config::GenerationParams;
use crate::error::GenerationError;
use crate::rng::LevelRng;

use super::corridor::{self, Connection};
use super::grid::{Coord, TileGrid};
use super::level::{LevelTemplate, unoccupied_locations};
use super::section::{self, Section};
use super::tile::{TileMask, TileType};
use super::validate::{is_connected, is_valid};
use super::walls::add_walls;

/// Everything one attempt builds before stairs are placed
#[derive(Debug, Clone)]
pub struct Layout {
    pub section: Section,
    pub grid: TileGrid,
    pub connections: Vec<Connection>,
}

/// Run one attempt: split, connect and add walls. Does not validate.
pub fn build_layout(
    width: usize,
    height: usize,
    params: &GenerationParams,
    rng: &mut LevelRng,
) -> Result<Layout, GenerationError> {
    let mut section = section::split(width, height, &params.room_limits(), rng)?;
    let mut grid = section.tiles();

    let connector = corridor::connector(params.strategy, params.connector_settings());
    let connections = connector.connect(&mut section, &mut grid, rng)?;
    add_walls(&mut grid);

    debug!(
        strategy = connector.name(),
        rooms = section.rooms().len(),
        depth = section.depth(),
        corridors = connections.len(),
        "built layout"
    );
    Ok(Layout {
        section,
        grid,
        connections,
    })
}

/// Generate a level, retrying until an attempt passes validation.
///
/// Returns [`GenerationError::AttemptsExhausted`] when `params.max_attempts`
/// attempts all fail; no other error escapes.
pub fn generate(
    width: usize,
    height: usize,
    level_number: u32,
    params: &GenerationParams,
    rng: &mut LevelRng,
) -> Result<LevelTemplate, GenerationError> {
    for attempt in 1..=params.max_attempts {
        let layout = match build_layout(width, height, params, rng) {
            Ok(layout) => layout,
            Err(err) if err.is_transient() => {
                warn!(attempt, %err, "generation attempt failed");
                continue;
            }
            Err(err) => return Err(err),
        };

        if !is_valid(&layout.grid) {
            warn!(
                attempt,
                "generation attempt rejected: unsupported wall or floor in reserved rows"
            );
            continue;
        }
        if !is_connected(&layout.grid) {
            warn!(attempt, "generation attempt rejected: disconnected floor");
            continue;
        }

        let rooms = layout.section.rooms().len();
        let corridors = layout.connections.len();
        let Some(template) =
            place_features(layout.grid, width, height, level_number, params, rng)
        else {
            warn!(attempt, "generation attempt rejected: no room for stairs and start");
            continue;
        };
        if !is_valid(&template.tiles) {
            warn!(attempt, "generation attempt rejected: stairs left a wall unsupported");
            continue;
        }

        info!(
            attempt,
            width,
            height,
            level_number,
            rooms,
            corridors,
            seed = rng.seed(),
            "generated level"
        );
        return Ok(template);
    }

    Err(GenerationError::AttemptsExhausted {
        attempts: params.max_attempts,
        width,
        height,
    })
}

/// Whether a tile can take up stairs: stairs do not hold up a wall below them
fn holds_no_wall(tiles: &TileGrid, c: Coord) -> bool {
    !tiles.get_or_none(Coord::new(c.x, c.y + 1)).is_wall()
}

/// Place the down stairs on room floor and the start on any other floor tile.
/// With up stairs enabled, the start avoids tiles that support a wall.
fn place_features(
    mut tiles: TileGrid,
    width: usize,
    height: usize,
    level_number: u32,
    params: &GenerationParams,
    rng: &mut LevelRng,
) -> Option<LevelTemplate> {
    let stairs_down = *rng.choose(&unoccupied_locations(&tiles, TileMask::FLOOR, &[]))?;
    let mut starts = unoccupied_locations(&tiles, TileMask::FLOORS, &[stairs_down]);
    if params.enable_stairs_up {
        starts.retain(|&c| holds_no_wall(&tiles, c));
    }
    let start = *rng.choose(&starts)?;

    tiles.set(stairs_down, TileType::StairsDown);
    let stairs_up = params.enable_stairs_up.then_some(start);
    if let Some(up) = stairs_up {
        tiles.set(up, TileType::StairsUp);
    }

    Some(LevelTemplate {
        width,
        height,
        level_number,
        tiles,
        start,
        stairs_down,
        stairs_up,
        tile_set_id: params.tile_set_id.clone(),
        fog_of_war: params.fog_of_war,
        seed: rng.seed(),
    })
}
