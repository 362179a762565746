//! delve-core: procedural dungeon level generation
//!
//! Splits a canvas into rooms, joins them with corridors, decorates the
//! corridors with walls and validates the result, retrying until a level
//! passes. Pure and deterministic for a given seed; no I/O.
//!
//! ```
//! use delve_core::{generate, GenerationParams, LevelRng, TileType};
//!
//! let mut rng = LevelRng::new(42);
//! let level = generate(30, 20, 1, &GenerationParams::default(), &mut rng).unwrap();
//! assert_eq!(level.tiles.count(TileType::StairsDown), 1);
//! ```

pub mod config;
pub mod dungeon;
mod error;
mod rng;

pub use config::{FogOfWar, GenerationParams, StrategyKind};
pub use dungeon::{generate, Coord, LevelTemplate, TileGrid, TileMask, TileType};
pub use error::GenerationError;
pub use rng::LevelRng;
