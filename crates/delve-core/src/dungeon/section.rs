//! Recursive section splitting (binary space partition)
//!
//! The canvas is halved until no half could hold a padded room, then each
//! leaf places one room at a random size and position inside its padding.
//! Room rectangles are stored in canvas coordinates, so the second half of
//! every split is already offset by the split coordinate.

use serde::{Deserialize, Serialize};
use strum::Display;
use tracing::trace;

use crate::error::GenerationError;
use crate::rng::LevelRng;

use super::grid::TileGrid;
use super::rect::Rect;
use super::room::{MIN_ROOM_DIMENSION, Room};
use super::tile::TileType;

/// Room size constraints for the splitter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomLimits {
    pub min_room_dimension: usize,
    pub max_room_dimension: usize,
    pub min_room_padding: usize,
}

impl RoomLimits {
    pub const fn new(
        min_room_dimension: usize,
        max_room_dimension: usize,
        min_room_padding: usize,
    ) -> Self {
        Self {
            min_room_dimension,
            max_room_dimension,
            min_room_padding,
        }
    }

    /// Smallest section that can hold a padded room
    pub const fn min_section_dimension(&self) -> usize {
        self.min_room_dimension + 2 * self.min_room_padding
    }

    fn check(&self) -> Result<(), GenerationError> {
        if self.min_room_dimension < MIN_ROOM_DIMENSION {
            return Err(GenerationError::InvalidParameters(format!(
                "min_room_dimension {} is below {}",
                self.min_room_dimension, MIN_ROOM_DIMENSION
            )));
        }
        if self.max_room_dimension < self.min_room_dimension {
            return Err(GenerationError::InvalidParameters(format!(
                "max_room_dimension {} is below min_room_dimension {}",
                self.max_room_dimension, self.min_room_dimension
            )));
        }
        Ok(())
    }
}

/// Split direction
///
/// A horizontal split places the halves side by side, a vertical split
/// stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum SplitDirection {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectionKind {
    Split {
        direction: SplitDirection,
        children: Box<(Section, Section)>,
    },
    Leaf(Room),
}

/// A node of the partition tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub bounds: Rect,
    pub kind: SectionKind,
}

/// Partition a `width` x `height` canvas and place one room per leaf
pub fn split(
    width: usize,
    height: usize,
    limits: &RoomLimits,
    rng: &mut LevelRng,
) -> Result<Section, GenerationError> {
    limits.check()?;
    split_region(Rect::new(0, 0, width, height), limits, rng)
}

fn split_region(
    bounds: Rect,
    limits: &RoomLimits,
    rng: &mut LevelRng,
) -> Result<Section, GenerationError> {
    let min_section = limits.min_section_dimension();

    let mut directions = Vec::with_capacity(2);
    if bounds.width >= 2 * min_section {
        directions.push(SplitDirection::Horizontal);
    }
    if bounds.height >= 2 * min_section {
        directions.push(SplitDirection::Vertical);
    }

    let Some(&direction) = rng.choose(&directions) else {
        return place_room(bounds, limits, rng).map(|room| Section {
            bounds,
            kind: SectionKind::Leaf(room),
        });
    };

    let (first, second) = match direction {
        SplitDirection::Horizontal => {
            let at = rng.between(min_section, bounds.width - min_section);
            (
                Rect::new(bounds.left, bounds.top, at, bounds.height),
                Rect::new(bounds.left + at, bounds.top, bounds.width - at, bounds.height),
            )
        }
        SplitDirection::Vertical => {
            let at = rng.between(min_section, bounds.height - min_section);
            (
                Rect::new(bounds.left, bounds.top, bounds.width, at),
                Rect::new(bounds.left, bounds.top + at, bounds.width, bounds.height - at),
            )
        }
    };
    trace!(?bounds, %direction, "split section");

    let children = (
        split_region(first, limits, rng)?,
        split_region(second, limits, rng)?,
    );
    Ok(Section {
        bounds,
        kind: SectionKind::Split {
            direction,
            children: Box::new(children),
        },
    })
}

fn place_room(
    bounds: Rect,
    limits: &RoomLimits,
    rng: &mut LevelRng,
) -> Result<Room, GenerationError> {
    let pad = limits.min_room_padding;
    let too_small = || GenerationError::RoomDoesNotFit {
        width: bounds.width,
        height: bounds.height,
        min_room_dimension: limits.min_room_dimension,
        min_room_padding: pad,
    };

    let avail_w = bounds
        .width
        .checked_sub(2 * pad)
        .filter(|&w| w >= limits.min_room_dimension)
        .ok_or_else(too_small)?;
    let avail_h = bounds
        .height
        .checked_sub(2 * pad)
        .filter(|&h| h >= limits.min_room_dimension)
        .ok_or_else(too_small)?;

    let width = rng.between(limits.min_room_dimension, avail_w.min(limits.max_room_dimension));
    let height = rng.between(limits.min_room_dimension, avail_h.min(limits.max_room_dimension));
    let left = rng.between(bounds.left + pad, bounds.left + bounds.width - pad - width);
    let top = rng.between(bounds.top + pad, bounds.top + bounds.height - pad - height);

    Ok(Room::new(Rect::new(left, top, width, height)))
}

impl Section {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, SectionKind::Leaf(_))
    }

    pub fn children(&self) -> Option<(&Section, &Section)> {
        match &self.kind {
            SectionKind::Split { children, .. } => Some((&children.0, &children.1)),
            SectionKind::Leaf(_) => None,
        }
    }

    /// This section and every section below it, depth first
    pub fn descendants(&self) -> Vec<&Section> {
        let mut out = vec![self];
        if let Some((a, b)) = self.children() {
            out.extend(a.descendants());
            out.extend(b.descendants());
        }
        out
    }

    pub fn leaves(&self) -> Vec<&Section> {
        self.descendants().into_iter().filter(|s| s.is_leaf()).collect()
    }

    /// Height of the tree; a lone leaf has depth 1
    pub fn depth(&self) -> usize {
        match self.children() {
            Some((a, b)) => 1 + a.depth().max(b.depth()),
            None => 1,
        }
    }

    pub fn rooms(&self) -> Vec<&Room> {
        self.descendants()
            .into_iter()
            .filter_map(|s| match &s.kind {
                SectionKind::Leaf(room) => Some(room),
                SectionKind::Split { .. } => None,
            })
            .collect()
    }

    pub fn rooms_mut(&mut self) -> Vec<&mut Room> {
        let mut out = Vec::new();
        self.collect_rooms_mut(&mut out);
        out
    }

    fn collect_rooms_mut<'a>(&'a mut self, out: &mut Vec<&'a mut Room>) {
        match &mut self.kind {
            SectionKind::Leaf(room) => out.push(room),
            SectionKind::Split { children, .. } => {
                let (a, b) = &mut **children;
                a.collect_rooms_mut(out);
                b.collect_rooms_mut(out);
            }
        }
    }

    /// Tiles of this section: rooms painted on empty space
    pub fn tiles(&self) -> TileGrid {
        let mut grid = TileGrid::new(self.bounds.width, self.bounds.height, TileType::None);
        for room in self.rooms() {
            let local = Room::new(Rect::new(
                room.rect.left - self.bounds.left,
                room.rect.top - self.bounds.top,
                room.rect.width,
                room.rect.height,
            ));
            local.paint(&mut grid);
        }
        grid
    }
}
