use delve_core::dungeon::{
    add_walls, build_layout, is_connected, is_valid, reachable_from, Coord, TileMask, TileType,
};
use delve_core::{
    generate, GenerationError, GenerationParams, LevelRng, LevelTemplate, StrategyKind,
};
use proptest::prelude::*;

fn assert_level_invariants(level: &LevelTemplate) {
    let tiles = &level.tiles;
    assert_eq!(tiles.width(), level.width);
    assert_eq!(tiles.height(), level.height);

    assert_eq!(tiles.count(TileType::StairsDown), 1);

    for y in 0..2 {
        assert!(tiles.row(y).iter().all(|t| !t.is_floor()), "floor in row {}", y);
    }
    assert!(is_valid(tiles));

    let walkable = tiles.find(TileMask::WALKABLE).count();
    assert_eq!(reachable_from(tiles, level.start).len(), walkable);

    if let Some(up) = level.stairs_up {
        assert_eq!(up, level.start);
        assert_eq!(tiles.get(up), Some(TileType::StairsUp));
        assert_eq!(tiles.count(TileType::StairsUp), 1);
    }
}

#[test]
fn test_scenario_small_level() {
    let params = GenerationParams::with_rooms(4, 7, 2);
    let mut rng = LevelRng::new(1);
    let level = generate(30, 20, 1, &params, &mut rng).unwrap();

    assert_level_invariants(&level);
    assert!(level.tiles.count(TileType::Floor) > 0);
    assert_eq!(level.level_number, 1);
}

#[test]
fn test_scenario_room_cannot_fit() {
    let params = GenerationParams::with_rooms(4, 7, 3);
    let mut rng = LevelRng::new(1);

    let err = generate(5, 5, 1, &params, &mut rng).unwrap_err();
    assert_eq!(
        err,
        GenerationError::AttemptsExhausted {
            attempts: 100,
            width: 5,
            height: 5,
        }
    );
    assert!(!err.is_transient());
}

#[test]
fn test_same_seed_same_level() {
    let params = GenerationParams::default();
    let a = generate(50, 30, 3, &params, &mut LevelRng::new(77)).unwrap();
    let b = generate(50, 30, 3, &params, &mut LevelRng::new(77)).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.tiles.to_string(), b.tiles.to_string());
}

#[test]
fn test_spanning_tree_strategy() {
    let params = GenerationParams {
        strategy: StrategyKind::SpanningTree,
        extra_connections: 4,
        ..GenerationParams::default()
    };
    let mut rng = LevelRng::new(12);
    let level = generate(64, 40, 4, &params, &mut rng).unwrap();
    assert_level_invariants(&level);
}

#[test]
fn test_large_level_has_many_rooms() {
    let params = GenerationParams::default();
    let mut rng = LevelRng::new(3);
    let mut built = None;
    for _ in 0..20 {
        if let Ok(layout) = build_layout(80, 50, &params, &mut rng) {
            built = Some(layout);
            break;
        }
    }
    let Some(layout) = built else {
        panic!("no layout in 20 attempts");
    };

    let rooms = layout.section.rooms();
    assert!(rooms.len() >= 4);
    assert!(layout.connections.len() >= rooms.len() - 1);
    for connection in &layout.connections {
        assert_eq!(connection.path.first(), Some(&connection.from.coord));
        assert_eq!(connection.path.last(), Some(&connection.to.coord));
    }

    // the finisher has already run
    let mut again = layout.grid.clone();
    add_walls(&mut again);
    assert_eq!(again, layout.grid);
}

#[test]
fn test_unoccupied_locations_skip_claimed_tiles() {
    let params = GenerationParams::default();
    let mut rng = LevelRng::new(8);
    let level = generate(40, 25, 1, &params, &mut rng).unwrap();

    let all = level.unoccupied_locations(TileMask::FLOORS, &[]);
    let claimed: Vec<Coord> = all.iter().copied().take(3).collect();
    let rest = level.unoccupied_locations(TileMask::FLOORS, &claimed);

    assert_eq!(rest.len(), all.len() - claimed.len());
    assert!(rest.iter().all(|c| !claimed.contains(c)));
    assert!(!all.contains(&level.stairs_down));
    assert_eq!(
        level.unoccupied_locations(TileMask::STAIRS_DOWN, &[]),
        vec![level.stairs_down]
    );
}

#[test]
fn test_level_serializes_to_json() {
    let params = GenerationParams {
        enable_stairs_up: true,
        tile_set_id: "crypt".to_string(),
        ..GenerationParams::default()
    };
    let mut rng = LevelRng::new(21);
    let level = generate(30, 20, 2, &params, &mut rng).unwrap();

    let json = serde_json::to_value(&level).unwrap();
    assert_eq!(json["tile_set_id"], "crypt");
    assert_eq!(json["level_number"], 2);
    assert_eq!(json["fog_of_war"]["radius"], 6);
    assert!(json["stairs_up"].is_object());
    assert_level_invariants(&level);

    let restored: LevelTemplate = serde_json::from_value(json).unwrap();
    assert_eq!(restored, level);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn prop_generated_levels_hold_invariants(seed in any::<u64>()) {
        let params = GenerationParams::default();
        let mut rng = LevelRng::new(seed);
        let level = generate(30, 20, 1, &params, &mut rng).unwrap();

        prop_assert_eq!(level.tiles.count(TileType::StairsDown), 1);
        prop_assert!(is_valid(&level.tiles));
        prop_assert!(is_connected(&level.tiles));
        prop_assert!(level.tiles.row(0).iter().chain(level.tiles.row(1)).all(|t| !t.is_floor()));
        prop_assert_eq!(
            reachable_from(&level.tiles, level.start).len(),
            level.tiles.find(TileMask::WALKABLE).count()
        );
    }

    #[test]
    fn prop_levels_with_up_stairs_hold_invariants(
        seed in any::<u64>(),
        spanning in any::<bool>(),
    ) {
        let strategy = if spanning {
            StrategyKind::SpanningTree
        } else {
            StrategyKind::Greedy
        };
        let params = GenerationParams {
            enable_stairs_up: true,
            strategy,
            ..GenerationParams::default()
        };
        let mut rng = LevelRng::new(seed);
        let level = generate(40, 30, 1, &params, &mut rng).unwrap();

        prop_assert_eq!(level.stairs_up, Some(level.start));
        assert_level_invariants(&level);
    }
}
