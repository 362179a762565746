//! Tile types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Tile/terrain type
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TileType {
    /// Empty, unused space
    #[default]
    None = 0,
    /// Room floor
    Floor = 1,
    /// Corridor floor
    FloorHall = 2,
    /// Room wall face
    Wall = 3,
    /// Wall face above a corridor
    WallHall = 4,
    /// Top of a wall, drawn above a wall face
    WallTop = 5,
    StairsDown = 6,
    StairsUp = 7,
}

impl TileType {
    /// Room or corridor floor
    pub const fn is_floor(&self) -> bool {
        matches!(self, TileType::Floor | TileType::FloorHall)
    }

    /// Wall face (room or corridor)
    pub const fn is_wall(&self) -> bool {
        matches!(self, TileType::Wall | TileType::WallHall)
    }

    /// Can be stood on
    pub const fn is_walkable(&self) -> bool {
        matches!(
            self,
            TileType::Floor | TileType::FloorHall | TileType::StairsDown | TileType::StairsUp
        )
    }

    /// The single-tile mask for this type
    pub const fn mask(&self) -> TileMask {
        match self {
            TileType::None => TileMask::NONE,
            TileType::Floor => TileMask::FLOOR,
            TileType::FloorHall => TileMask::FLOOR_HALL,
            TileType::Wall => TileMask::WALL,
            TileType::WallHall => TileMask::WALL_HALL,
            TileType::WallTop => TileMask::WALL_TOP,
            TileType::StairsDown => TileMask::STAIRS_DOWN,
            TileType::StairsUp => TileMask::STAIRS_UP,
        }
    }

    /// Get the display character for this tile type
    pub const fn symbol(&self) -> char {
        match self {
            TileType::None => ' ',
            TileType::Floor => '.',
            TileType::FloorHall => '#',
            TileType::Wall => '=',
            TileType::WallHall => '~',
            TileType::WallTop => '-',
            TileType::StairsDown => '>',
            TileType::StairsUp => '<',
        }
    }
}

bitflags! {
    /// A set of tile types
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TileMask: u8 {
        const NONE = 1 << 0;
        const FLOOR = 1 << 1;
        const FLOOR_HALL = 1 << 2;
        const WALL = 1 << 3;
        const WALL_HALL = 1 << 4;
        const WALL_TOP = 1 << 5;
        const STAIRS_DOWN = 1 << 6;
        const STAIRS_UP = 1 << 7;

        const FLOORS = Self::FLOOR.bits() | Self::FLOOR_HALL.bits();
        const WALKABLE = Self::FLOORS.bits() | Self::STAIRS_DOWN.bits() | Self::STAIRS_UP.bits();
    }
}

impl TileMask {
    /// Check if a tile type is in this set
    pub const fn has(&self, tile: TileType) -> bool {
        self.contains(tile.mask())
    }
}

impl From<TileType> for TileMask {
    fn from(tile: TileType) -> Self {
        tile.mask()
    }
}

impl Serialize for TileMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for TileMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(TileMask::from_bits_truncate(bits))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_type_has_its_own_mask_bit() {
        let mut seen = TileMask::empty();
        for tile in TileType::iter() {
            assert!(!seen.intersects(tile.mask()), "{tile} shares a bit");
            seen |= tile.mask();
        }
        assert_eq!(seen, TileMask::all());
    }

    #[test]
    fn test_mask_membership() {
        assert!(TileMask::FLOORS.has(TileType::Floor));
        assert!(TileMask::FLOORS.has(TileType::FloorHall));
        assert!(!TileMask::FLOORS.has(TileType::StairsDown));
        assert!(TileMask::WALKABLE.has(TileType::StairsUp));
        assert!(!TileMask::WALKABLE.has(TileType::WallTop));
    }

    #[test]
    fn test_classification() {
        for tile in TileType::iter() {
            assert_eq!(tile.is_floor(), TileMask::FLOORS.has(tile));
            assert_eq!(tile.is_walkable(), TileMask::WALKABLE.has(tile));
        }
        assert!(TileType::Wall.is_wall());
        assert!(TileType::WallHall.is_wall());
        assert!(!TileType::WallTop.is_wall());
    }

    #[test]
    fn test_symbols_are_distinct() {
        let symbols: Vec<char> = TileType::iter().map(|t| t.symbol()).collect();
        for (i, a) in symbols.iter().enumerate() {
            assert!(!symbols[i + 1..].contains(a));
        }
    }
}
