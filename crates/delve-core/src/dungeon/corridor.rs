//! Room connection
//!
//! Rooms are joined in two passes. The spanning pass grows a connected set
//! from the first room until every room belongs to it; the redundancy pass
//! then adds a few extra joins between rooms that are already connected so
//! the level has loops.
//!
//! A join tries every pair of free exits of the two rooms, nearest pair
//! first, and carves the first corridor the pathfinder finds.

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::config::StrategyKind;
use crate::error::GenerationError;
use crate::rng::LevelRng;

use super::grid::{Coord, TileGrid};
use super::pathfind::{Heuristic, Pathfinder};
use super::rect::Rect;
use super::room::{Exit, Room};
use super::section::Section;
use super::tile::TileType;
use super::validate::{self, RESERVED_ROWS};

/// A carved corridor between two rooms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    /// Indices into `Section::rooms()`
    pub rooms: (usize, usize),
    pub from: Exit,
    pub to: Exit,
    /// Tiles from `from` to `to`, both exits included
    pub path: Vec<Coord>,
}

/// Corridor search settings shared by every connector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorSettings {
    pub heuristic: Heuristic,
    /// Cost of carving a fresh corridor tile
    pub corridor_cost: f64,
    /// Cost of walking an existing corridor tile
    pub corridor_reuse_cost: f64,
    /// Redundant joins attempted after the rooms are connected
    pub extra_connections: usize,
}

impl Default for ConnectorSettings {
    fn default() -> Self {
        Self {
            heuristic: Heuristic::Manhattan,
            corridor_cost: 1.0,
            corridor_reuse_cost: 0.5,
            extra_connections: 2,
        }
    }
}

/// Track which rooms are connected (equivalence classes)
///
/// Every room starts in its own class and `merge` folds one class into
/// another after a join. The spanning pass reads `class_size` to report how
/// many rooms it reached when it stalls.
#[derive(Debug, Clone)]
pub struct ConnectivityTracker {
    /// Each room's class; rooms in the same class are connected
    classes: Vec<usize>,
}

impl ConnectivityTracker {
    pub fn new(num_rooms: usize) -> Self {
        Self {
            classes: (0..num_rooms).collect(),
        }
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        if a >= self.classes.len() || b >= self.classes.len() {
            return false;
        }
        self.classes[a] == self.classes[b]
    }

    /// Move every room of `b`'s class into `a`'s class
    pub fn merge(&mut self, a: usize, b: usize) {
        if a >= self.classes.len() || b >= self.classes.len() {
            return;
        }

        let old_class = self.classes[b];
        let new_class = self.classes[a];
        for class in &mut self.classes {
            if *class == old_class {
                *class = new_class;
            }
        }
    }

    pub fn all_connected(&self) -> bool {
        match self.classes.first() {
            Some(&first) => self.classes.iter().all(|&c| c == first),
            None => true,
        }
    }

    /// Number of rooms connected to `room`, itself included
    pub fn class_size(&self, room: usize) -> usize {
        (0..self.classes.len())
            .filter(|&r| self.are_connected(room, r))
            .count()
    }
}

/// A strategy for joining the rooms of a section tree
pub trait RoomConnector {
    fn name(&self) -> &'static str;

    /// Carve corridors into `grid` until every room is reachable.
    ///
    /// Adds the exits it uses to the rooms of `section`.
    fn connect(
        &self,
        section: &mut Section,
        grid: &mut TileGrid,
        rng: &mut LevelRng,
    ) -> Result<Vec<Connection>, GenerationError>;
}

/// Build the connector for a strategy
pub fn connector(kind: StrategyKind, settings: ConnectorSettings) -> Box<dyn RoomConnector> {
    match kind {
        StrategyKind::Greedy => Box::new(GreedyConnector::new(settings)),
        StrategyKind::SpanningTree => Box::new(SpanningTreeConnector::new(settings)),
    }
}

/// Grow the connected set one random room pair at a time
#[derive(Debug, Clone, Default)]
pub struct GreedyConnector {
    settings: ConnectorSettings,
}

impl GreedyConnector {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self { settings }
    }
}

impl RoomConnector for GreedyConnector {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn connect(
        &self,
        section: &mut Section,
        grid: &mut TileGrid,
        rng: &mut LevelRng,
    ) -> Result<Vec<Connection>, GenerationError> {
        let mut joiner = Joiner::new(section, grid, self.settings);
        joiner.spanning_pass(rng)?;
        joiner.redundancy_pass(rng);
        Ok(joiner.connections)
    }
}

/// Join the edges of a minimum spanning tree over room centres, shortest
/// edge first, then fall back to the greedy pass for anything left over
#[derive(Debug, Clone, Default)]
pub struct SpanningTreeConnector {
    settings: ConnectorSettings,
}

impl SpanningTreeConnector {
    pub fn new(settings: ConnectorSettings) -> Self {
        Self { settings }
    }
}

impl RoomConnector for SpanningTreeConnector {
    fn name(&self) -> &'static str {
        "spanning-tree"
    }

    fn connect(
        &self,
        section: &mut Section,
        grid: &mut TileGrid,
        rng: &mut LevelRng,
    ) -> Result<Vec<Connection>, GenerationError> {
        let centers: Vec<Coord> = section.rooms().iter().map(|r| r.center()).collect();
        let mut edges = minimum_spanning_tree(&centers);
        edges.sort_by(|&(a, b), &(c, d)| {
            centers[a]
                .distance(centers[b])
                .total_cmp(&centers[c].distance(centers[d]))
        });

        let mut joiner = Joiner::new(section, grid, self.settings);
        for (a, b) in edges {
            if !joiner.join(a, b, rng) {
                debug!(a, b, "spanning tree edge could not be joined");
            }
        }
        joiner.spanning_pass(rng)?;
        joiner.redundancy_pass(rng);
        Ok(joiner.connections)
    }
}

/// Prim's algorithm over the complete graph of `points` (Euclidean weights).
/// Returns `(parent, child)` edges.
fn minimum_spanning_tree(points: &[Coord]) -> Vec<(usize, usize)> {
    let n = points.len();
    let mut edges = Vec::with_capacity(n.saturating_sub(1));
    if n == 0 {
        return edges;
    }

    let mut in_tree = vec![false; n];
    let mut best: Vec<(f64, usize)> = points.iter().map(|p| (p.distance(points[0]), 0)).collect();
    in_tree[0] = true;

    for _ in 1..n {
        let Some(next) = (0..n)
            .filter(|&i| !in_tree[i])
            .min_by(|&i, &j| best[i].0.total_cmp(&best[j].0))
        else {
            break;
        };
        in_tree[next] = true;
        edges.push((best[next].1, next));

        for i in 0..n {
            let d = points[i].distance(points[next]);
            if !in_tree[i] && d < best[i].0 {
                best[i] = (d, next);
            }
        }
    }
    edges
}

fn pair_key(a: usize, b: usize) -> (usize, usize) {
    (a.min(b), a.max(b))
}

/// Join state for one connect call
struct Joiner<'a> {
    grid: &'a mut TileGrid,
    rooms: Vec<&'a mut Room>,
    /// Every tile covered by a room rectangle
    room_tiles: HashSet<Coord>,
    settings: ConnectorSettings,
    connections: Vec<Connection>,
    joined: HashSet<(usize, usize)>,
}

impl<'a> Joiner<'a> {
    fn new(section: &'a mut Section, grid: &'a mut TileGrid, settings: ConnectorSettings) -> Self {
        let rooms = section.rooms_mut();
        let room_tiles = rooms.iter().flat_map(|r| r.rect.coords()).collect();
        Self {
            grid,
            rooms,
            room_tiles,
            settings,
            connections: Vec::new(),
            joined: HashSet::new(),
        }
    }

    /// Connect every room to the first one
    fn spanning_pass(&mut self, rng: &mut LevelRng) -> Result<(), GenerationError> {
        let n = self.rooms.len();
        let mut tracker = ConnectivityTracker::new(n);
        for &(a, b) in &self.joined {
            tracker.merge(a, b);
        }

        let mut attempted: HashSet<(usize, usize)> = HashSet::new();
        while !tracker.all_connected() {
            let mut candidates: Vec<(usize, usize)> = (0..n)
                .flat_map(|a| (0..n).map(move |b| (a, b)))
                .filter(|&(a, b)| tracker.are_connected(0, a) && !tracker.are_connected(0, b))
                .filter(|pair| !attempted.contains(pair))
                .collect();
            rng.shuffle(&mut candidates);

            let mut progressed = false;
            for (a, b) in candidates {
                attempted.insert((a, b));
                if self.join(a, b, rng) {
                    tracker.merge(a, b);
                    progressed = true;
                    break;
                }
            }

            if !progressed {
                let connected = tracker.class_size(0);
                debug!(connected, unconnected = n - connected, "spanning pass stalled");
                return Err(GenerationError::ConnectionFailed {
                    connected,
                    unconnected: n - connected,
                });
            }
        }
        Ok(())
    }

    /// Best-effort extra joins between rooms that are not yet directly joined
    fn redundancy_pass(&mut self, rng: &mut LevelRng) {
        let n = self.rooms.len();
        let mut pairs: Vec<(usize, usize)> = (0..n)
            .flat_map(|a| (a + 1..n).map(move |b| (a, b)))
            .filter(|pair| !self.joined.contains(pair))
            .collect();
        rng.shuffle(&mut pairs);

        for (a, b) in pairs.into_iter().take(self.settings.extra_connections) {
            if !self.join(a, b, rng) {
                debug!(a, b, "redundant join failed");
            }
        }
    }

    /// Try every free exit pair of rooms `a` and `b`, nearest first
    fn join(&mut self, a: usize, b: usize, rng: &mut LevelRng) -> bool {
        let from_exits = self.rooms[a].exit_candidates();
        let to_exits = self.rooms[b].exit_candidates();
        let mut pairs: Vec<(Exit, Exit)> = from_exits
            .iter()
            .flat_map(|&from| to_exits.iter().map(move |&to| (from, to)))
            .collect();
        pairs.sort_by(|p, q| {
            p.0.coord
                .distance(p.1.coord)
                .total_cmp(&q.0.coord.distance(q.1.coord))
        });

        for (from, to) in pairs {
            let path = self.find_path(from, to, rng);
            if !path.is_empty() {
                self.commit(a, b, from, to, path);
                return true;
            }
        }
        false
    }

    fn find_path(&self, from: Exit, to: Exit, rng: &mut LevelRng) -> Vec<Coord> {
        let grid = &*self.grid;
        let room_tiles = &self.room_tiles;
        let settings = self.settings;

        let passable = |c: Coord| {
            c == from.coord
                || c == to.coord
                || (c.y >= RESERVED_ROWS
                    && !room_tiles.contains(&c)
                    && matches!(grid.get(c), Some(TileType::None | TileType::FloorHall)))
        };
        // Steps that would strand a wall face cost infinity
        let cost = |step_from: Coord, step_to: Coord| {
            let below = Coord::new(step_to.x, step_to.y + 1);
            let allowed = validate::step_keeps_wall_above(grid, step_from, step_to)
                && (validate::step_keeps_wall_below(grid, step_from, step_to) || passable(below));
            if !allowed {
                f64::INFINITY
            } else if grid.get(step_to) == Some(TileType::FloorHall) {
                settings.corridor_reuse_cost
            } else {
                settings.corridor_cost
            }
        };

        let bounds = Rect::new(0, 0, grid.width(), grid.height());
        Pathfinder::new(bounds, &passable, cost, settings.heuristic)
            .find_path(from.coord, to.coord, rng)
    }

    fn commit(&mut self, a: usize, b: usize, from: Exit, to: Exit, path: Vec<Coord>) {
        for &c in &path {
            self.grid.set(c, TileType::FloorHall);
        }
        for exit in [from, to] {
            if let Some(doorway) = Room::doorway(&exit) {
                self.grid.set(doorway, TileType::FloorHall);
            }
        }
        self.rooms[a].add_exit(from);
        self.rooms[b].add_exit(to);
        self.joined.insert(pair_key(a, b));
        trace!(a, b, from = %from.coord, to = %to.coord, len = path.len(), "joined rooms");

        self.connections.push(Connection {
            rooms: (a, b),
            from,
            to,
            path,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::room::Side;
    use crate::dungeon::section::{self, RoomLimits, SectionKind, SplitDirection};
    use crate::dungeon::validate::{is_connected, is_valid};
    use crate::dungeon::walls::add_walls;

    fn leaf(bounds: Rect, room: Rect) -> Section {
        Section {
            bounds,
            kind: SectionKind::Leaf(Room::new(room)),
        }
    }

    fn pair(direction: SplitDirection, bounds: Rect, first: Section, second: Section) -> Section {
        Section {
            bounds,
            kind: SectionKind::Split {
                direction,
                children: Box::new((first, second)),
            },
        }
    }

    fn side_by_side() -> Section {
        pair(
            SplitDirection::Horizontal,
            Rect::new(0, 0, 24, 12),
            leaf(Rect::new(0, 0, 12, 12), Rect::new(2, 3, 6, 6)),
            leaf(Rect::new(12, 0, 12, 12), Rect::new(14, 3, 6, 6)),
        )
    }

    fn stacked() -> Section {
        pair(
            SplitDirection::Vertical,
            Rect::new(0, 0, 14, 20),
            leaf(Rect::new(0, 0, 14, 10), Rect::new(4, 2, 6, 5)),
            leaf(Rect::new(0, 10, 14, 10), Rect::new(4, 12, 6, 5)),
        )
    }

    fn no_extras() -> ConnectorSettings {
        ConnectorSettings {
            extra_connections: 0,
            ..ConnectorSettings::default()
        }
    }

    #[test]
    fn test_connectivity_tracker() {
        let mut tracker = ConnectivityTracker::new(5);

        assert!(!tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(1, 2));

        tracker.merge(0, 1);
        assert!(tracker.are_connected(0, 1));
        assert!(!tracker.are_connected(0, 2));

        // merging 1 and 2 also connects 0 and 2
        tracker.merge(1, 2);
        assert!(tracker.are_connected(0, 2));
        assert_eq!(tracker.class_size(0), 3);
        assert!(!tracker.all_connected());

        tracker.merge(2, 3);
        tracker.merge(3, 4);
        assert!(tracker.all_connected());
        assert!(!tracker.are_connected(0, 9));
    }

    #[test]
    fn test_side_by_side_rooms_join_straight_across() {
        let mut section = side_by_side();
        let mut grid = section.tiles();
        let mut rng = LevelRng::new(1);

        let connections = GreedyConnector::default()
            .connect(&mut section, &mut grid, &mut rng)
            .unwrap();
        assert_eq!(connections.len(), 1);

        let joined = &connections[0];
        assert_eq!(joined.rooms, (0, 1));
        assert_eq!(joined.from.side, Side::Right);
        assert_eq!(joined.to.side, Side::Left);
        assert_eq!(joined.path.len(), 8);
        assert!(joined.path.iter().all(|c| c.y == joined.from.coord.y));
        assert!(
            joined
                .path
                .iter()
                .all(|&c| grid.get(c) == Some(TileType::FloorHall))
        );

        let rooms = section.rooms();
        assert_eq!(rooms[0].exits, vec![joined.from]);
        assert_eq!(rooms[1].exits, vec![joined.to]);

        add_walls(&mut grid);
        assert!(is_valid(&grid));
        assert!(is_connected(&grid));
    }

    #[test]
    fn test_top_exit_opens_wall_face() {
        let mut section = stacked();
        let mut grid = section.tiles();
        let mut rng = LevelRng::new(2);

        let connections = GreedyConnector::default()
            .connect(&mut section, &mut grid, &mut rng)
            .unwrap();
        assert_eq!(connections.len(), 1);

        let joined = &connections[0];
        assert_eq!(joined.from, Exit::new(Coord::new(5, 6), Side::Bottom));
        assert_eq!(joined.to, Exit::new(Coord::new(5, 12), Side::Top));
        assert_eq!(joined.path.len(), 7);
        assert_eq!(grid.get(Coord::new(5, 13)), Some(TileType::FloorHall));
        assert_eq!(grid.get(Coord::new(6, 13)), Some(TileType::Wall));

        add_walls(&mut grid);
        assert!(is_valid(&grid));
        assert!(is_connected(&grid));
    }

    #[test]
    fn test_blocked_rooms_fail_to_connect() {
        let mut section = side_by_side();
        // nothing outside the rooms is open ground
        let mut grid = TileGrid::new(24, 12, TileType::WallTop);
        for room in section.rooms() {
            room.paint(&mut grid);
        }
        let mut rng = LevelRng::new(3);

        let err = GreedyConnector::default()
            .connect(&mut section, &mut grid, &mut rng)
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::ConnectionFailed {
                connected: 1,
                unconnected: 1,
            }
        );
        assert!(section.rooms().iter().all(|r| r.exits.is_empty()));
    }

    #[test]
    fn test_single_room_needs_no_corridor() {
        let mut section = leaf(Rect::new(0, 0, 10, 10), Rect::new(2, 2, 5, 5));
        let mut grid = section.tiles();
        let mut rng = LevelRng::new(4);

        for kind in [StrategyKind::Greedy, StrategyKind::SpanningTree] {
            let connections = connector(kind, ConnectorSettings::default())
                .connect(&mut section, &mut grid, &mut rng)
                .unwrap();
            assert!(connections.is_empty());
        }
        assert_eq!(grid.count(TileType::FloorHall), 0);
    }

    #[test]
    fn test_spanning_pass_makes_exactly_one_join_per_room() {
        let limits = RoomLimits::new(4, 7, 2);
        let mut successes = 0;
        for seed in 0..10 {
            let mut rng = LevelRng::new(seed);
            let mut section = section::split(60, 40, &limits, &mut rng).unwrap();
            let mut grid = section.tiles();
            let rooms = section.rooms().len();

            let connector = GreedyConnector::new(no_extras());
            let Ok(connections) = connector.connect(&mut section, &mut grid, &mut rng) else {
                continue;
            };
            successes += 1;
            assert_eq!(connections.len(), rooms - 1);

            add_walls(&mut grid);
            assert!(is_connected(&grid));
        }
        assert!(successes > 0);
    }

    #[test]
    fn test_exits_never_crowd_each_other() {
        let limits = RoomLimits::new(4, 7, 2);
        for seed in 0..10 {
            let mut rng = LevelRng::new(seed);
            let mut section = section::split(60, 40, &limits, &mut rng).unwrap();
            let mut grid = section.tiles();
            let settings = ConnectorSettings {
                extra_connections: 6,
                ..ConnectorSettings::default()
            };
            if SpanningTreeConnector::new(settings)
                .connect(&mut section, &mut grid, &mut rng)
                .is_err()
            {
                continue;
            }

            for room in section.rooms() {
                for (i, a) in room.exits.iter().enumerate() {
                    for b in &room.exits[i + 1..] {
                        assert!(!a.crowds(b), "{:?} crowds {:?}", a, b);
                    }
                }
            }
        }
    }

    #[test]
    fn test_spanning_tree_connector_connects_everything() {
        let limits = RoomLimits::new(4, 7, 2);
        let mut successes = 0;
        for seed in 0..10 {
            let mut rng = LevelRng::new(seed);
            let mut section = section::split(60, 40, &limits, &mut rng).unwrap();
            let mut grid = section.tiles();
            let rooms = section.rooms().len();

            let connector = connector(StrategyKind::SpanningTree, ConnectorSettings::default());
            assert_eq!(connector.name(), "spanning-tree");
            let Ok(connections) = connector.connect(&mut section, &mut grid, &mut rng) else {
                continue;
            };
            successes += 1;
            assert!(connections.len() >= rooms - 1);

            add_walls(&mut grid);
            assert!(is_connected(&grid));
        }
        assert!(successes > 0);
    }

    #[test]
    fn test_minimum_spanning_tree() {
        let points = [Coord::new(0, 0), Coord::new(10, 0), Coord::new(1, 0), Coord::new(10, 3)];
        let edges: HashSet<(usize, usize)> = minimum_spanning_tree(&points)
            .into_iter()
            .map(|(a, b)| pair_key(a, b))
            .collect();
        let expected: HashSet<(usize, usize)> = [(0, 2), (1, 2), (1, 3)].into_iter().collect();
        assert_eq!(edges, expected);

        assert!(minimum_spanning_tree(&[]).is_empty());
        assert!(minimum_spanning_tree(&[Coord::new(3, 3)]).is_empty());
    }
}
