//! Best-first grid search used to carve corridors
//!
//! A* over 4-directional moves inside a bounding rectangle. Passability and
//! step cost are supplied by the caller; the heuristic is selectable. Nodes
//! with equal `f` are popped in random order so identical inputs still give
//! varied corridors.

use core::cmp::Ordering;
use std::collections::BinaryHeap;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::rng::LevelRng;

use super::grid::Coord;
use super::rect::Rect;

/// Distance estimate to the goal
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
pub enum Heuristic {
    #[default]
    Manhattan,
    Euclidean,
    Chebyshev,
}

impl Heuristic {
    pub fn estimate(&self, from: Coord, to: Coord) -> f64 {
        let dx = from.x.abs_diff(to.x) as f64;
        let dy = from.y.abs_diff(to.y) as f64;
        match self {
            Heuristic::Manhattan => dx + dy,
            Heuristic::Euclidean => (dx * dx + dy * dy).sqrt(),
            Heuristic::Chebyshev => dx.max(dy),
        }
    }
}

/// Cost of every step is 1
pub fn uniform_cost(_from: Coord, _to: Coord) -> f64 {
    1.0
}

#[derive(Debug, Clone, Copy)]
struct ScoredNode {
    coord: Coord,
    f_score: f64,
    tie: u32,
}

impl PartialEq for ScoredNode {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredNode {}

// BinaryHeap is a max-heap, so the ordering is reversed for min-heap behavior
impl Ord for ScoredNode {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.tie.cmp(&self.tie))
    }
}

impl PartialOrd for ScoredNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Grid search restricted to `bounds` and the `passable` predicate
pub struct Pathfinder<P, C> {
    bounds: Rect,
    passable: P,
    cost: C,
    heuristic: Heuristic,
}

impl<P, C> Pathfinder<P, C>
where
    P: Fn(Coord) -> bool,
    C: Fn(Coord, Coord) -> f64,
{
    pub fn new(bounds: Rect, passable: P, cost: C, heuristic: Heuristic) -> Self {
        Self {
            bounds,
            passable,
            cost,
            heuristic,
        }
    }

    fn open(&self, c: Coord) -> bool {
        self.bounds.contains(c) && (self.passable)(c)
    }

    /// Path from `start` to `goal` inclusive, or empty if the goal cannot be reached.
    ///
    /// `start` need not be passable itself; `goal` must be.
    pub fn find_path(&self, start: Coord, goal: Coord, rng: &mut LevelRng) -> Vec<Coord> {
        if !self.bounds.contains(start) || !self.open(goal) {
            return Vec::new();
        }

        let mut open_set = BinaryHeap::new();
        let mut closed: HashSet<Coord> = HashSet::new();
        let mut came_from: HashMap<Coord, Coord> = HashMap::new();
        let mut g_score: HashMap<Coord, f64> = HashMap::new();

        g_score.insert(start, 0.0);
        open_set.push(ScoredNode {
            coord: start,
            f_score: self.heuristic.estimate(start, goal),
            tie: rng.tie_break(),
        });

        while let Some(current) = open_set.pop() {
            if current.coord == goal {
                return reconstruct_path(&came_from, goal);
            }
            if !closed.insert(current.coord) {
                continue;
            }

            let current_g = g_score.get(&current.coord).copied().unwrap_or(f64::INFINITY);
            for neighbor in current.coord.neighbors() {
                if closed.contains(&neighbor) || !self.open(neighbor) {
                    continue;
                }

                let tentative_g = current_g + (self.cost)(current.coord, neighbor);
                let neighbor_g = g_score.get(&neighbor).copied().unwrap_or(f64::INFINITY);
                if tentative_g < neighbor_g {
                    came_from.insert(neighbor, current.coord);
                    g_score.insert(neighbor, tentative_g);
                    open_set.push(ScoredNode {
                        coord: neighbor,
                        f_score: tentative_g + self.heuristic.estimate(neighbor, goal),
                        tie: rng.tie_break(),
                    });
                }
            }
        }

        Vec::new()
    }
}

/// Walk parent links back from the goal, returning start..=goal
fn reconstruct_path(came_from: &HashMap<Coord, Coord>, mut current: Coord) -> Vec<Coord> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
