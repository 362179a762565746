//! Generation parameters
//!
//! Every field has a default, so a partial JSON document is a valid
//! configuration.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::dungeon::{ConnectorSettings, Heuristic, RoomLimits};

/// Which room connector builds the corridors
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StrategyKind {
    /// Join random connected/unconnected room pairs until all are connected
    #[default]
    Greedy,
    /// Join a minimum spanning tree over room centres first
    SpanningTree,
}

/// Fog-of-war settings, passed through to the level template untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogOfWar {
    pub enabled: bool,
    /// Sight radius in tiles
    pub radius: u32,
}

impl Default for FogOfWar {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 6,
        }
    }
}

/// Parameters for one call to [`crate::dungeon::generate`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParams {
    // Room sizing
    pub min_room_dimension: usize,
    pub max_room_dimension: usize,
    pub min_room_padding: usize,

    pub enable_stairs_up: bool,
    /// Attempts before giving up
    pub max_attempts: usize,

    // Corridors
    pub strategy: StrategyKind,
    pub extra_connections: usize,
    pub heuristic: Heuristic,
    pub corridor_cost: f64,
    pub corridor_reuse_cost: f64,

    // Passed through to the template
    pub tile_set_id: String,
    pub fog_of_war: FogOfWar,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            min_room_dimension: 4,
            max_room_dimension: 7,
            min_room_padding: 2,

            enable_stairs_up: false,
            max_attempts: 100,

            strategy: StrategyKind::Greedy,
            extra_connections: 2,
            heuristic: Heuristic::Manhattan,
            corridor_cost: 1.0,
            corridor_reuse_cost: 0.5,

            tile_set_id: "default".to_string(),
            fog_of_war: FogOfWar::default(),
        }
    }
}

impl GenerationParams {
    /// Params with the given room sizing and defaults elsewhere
    pub fn with_rooms(
        min_room_dimension: usize,
        max_room_dimension: usize,
        min_room_padding: usize,
    ) -> Self {
        Self {
            min_room_dimension,
            max_room_dimension,
            min_room_padding,
            ..Self::default()
        }
    }

    pub fn room_limits(&self) -> RoomLimits {
        RoomLimits::new(
            self.min_room_dimension,
            self.max_room_dimension,
            self.min_room_padding,
        )
    }

    pub fn connector_settings(&self) -> ConnectorSettings {
        ConnectorSettings {
            heuristic: self.heuristic,
            corridor_cost: self.corridor_cost,
            corridor_reuse_cost: self.corridor_reuse_cost,
            extra_connections: self.extra_connections,
        }
    }
}
