//! Dungeon generation
//!
//! Section splitting, room connection, wall finishing, validation and the
//! retry loop that ties them together.

mod corridor;
mod generation;
mod grid;
mod level;
mod pathfind;
mod rect;
mod room;
mod section;
mod tile;
mod validate;
mod walls;

pub use corridor::{
    connector, Connection, ConnectivityTracker, ConnectorSettings, GreedyConnector, RoomConnector,
    SpanningTreeConnector,
};
pub use generation::{build_layout, generate, Layout};
pub use grid::{Coord, TileGrid};
pub use level::{unoccupied_locations, LevelTemplate};
pub use pathfind::{uniform_cost, Heuristic, Pathfinder};
pub use rect::Rect;
pub use room::{Exit, Room, Side, MIN_ROOM_DIMENSION};
pub use section::{split, RoomLimits, Section, SectionKind, SplitDirection};
pub use tile::{TileMask, TileType};
pub use validate::{
    is_connected, is_valid, reachable_from, step_keeps_wall_above, step_keeps_wall_below,
    RESERVED_ROWS,
};
pub use walls::add_walls;
