//! Dense tile grid and coordinates

use core::fmt;

use serde::{Deserialize, Serialize};

use super::tile::{TileMask, TileType};

/// A tile coordinate, `x` grows right and `y` grows down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: usize,
    pub y: usize,
}

impl Coord {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Straight-line distance
    pub fn distance(&self, other: Coord) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// The 4-directional neighbours that do not underflow
    pub fn neighbors(&self) -> impl Iterator<Item = Coord> + use<> {
        let Coord { x, y } = *self;
        [
            y.checked_sub(1).map(|y| Coord::new(x, y)),
            Some(Coord::new(x + 1, y)),
            Some(Coord::new(x, y + 1)),
            x.checked_sub(1).map(|x| Coord::new(x, y)),
        ]
        .into_iter()
        .flatten()
    }

    /// The tile `n` rows above, if any
    pub fn up(&self, n: usize) -> Option<Coord> {
        self.y.checked_sub(n).map(|y| Coord::new(self.x, y))
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Row-major grid of tiles, fixed size for one generation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileType>,
}

impl TileGrid {
    /// Create a grid filled with one tile type
    pub fn new(width: usize, height: usize, fill: TileType) -> Self {
        Self {
            width,
            height,
            tiles: vec![fill; width * height],
        }
    }

    /// Build a grid from rows; every row must have the same length.
    pub fn from_rows(rows: &[Vec<TileType>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if rows.iter().any(|row| row.len() != width) {
            return None;
        }
        Some(Self {
            width,
            height,
            tiles: rows.concat(),
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, c: Coord) -> bool {
        c.x < self.width && c.y < self.height
    }

    /// Tile at `c`, or `None` outside the grid
    pub fn get(&self, c: Coord) -> Option<TileType> {
        if self.in_bounds(c) {
            Some(self.tiles[c.y * self.width + c.x])
        } else {
            None
        }
    }

    /// Tile at `c`; out-of-bounds reads as empty space
    pub fn get_or_none(&self, c: Coord) -> TileType {
        self.get(c).unwrap_or(TileType::None)
    }

    /// Set the tile at `c`. Writes outside the grid are ignored.
    pub fn set(&mut self, c: Coord, tile: TileType) {
        if self.in_bounds(c) {
            self.tiles[c.y * self.width + c.x] = tile;
        }
    }

    /// All coordinates in row-major order
    pub fn coords(&self) -> impl Iterator<Item = Coord> + use<> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| Coord::new(x, y)))
    }

    /// Coordinates whose tile is in `mask`
    pub fn find(&self, mask: TileMask) -> impl Iterator<Item = Coord> + '_ {
        self.coords().filter(move |&c| mask.has(self.get_or_none(c)))
    }

    /// Number of tiles of the given type
    pub fn count(&self, tile: TileType) -> usize {
        self.tiles.iter().filter(|&&t| t == tile).count()
    }

    /// One row of tiles
    pub fn row(&self, y: usize) -> &[TileType] {
        &self.tiles[y * self.width..(y + 1) * self.width]
    }
}

impl fmt::Display for TileGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..self.height {
            let line: String = self.row(y).iter().map(TileType::symbol).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
impl TileGrid {
    /// Parse rows of tile symbols; unknown characters read as empty space.
    pub(crate) fn from_ascii(rows: &[&str]) -> Self {
        use strum::IntoEnumIterator;

        let rows: Vec<Vec<TileType>> = rows
            .iter()
            .map(|row| {
                row.chars()
                    .map(|ch| {
                        TileType::iter()
                            .find(|t| t.symbol() == ch)
                            .unwrap_or(TileType::None)
                    })
                    .collect()
            })
            .collect();
        Self::from_rows(&rows).expect("rows of equal length")
    }
}
