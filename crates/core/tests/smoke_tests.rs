use std::collections::BTreeSet;

use castlegen_core::mapgen::connectivity::{flood_fill, unreachable_rooms, whole_map_reachability};
use castlegen_core::mapgen::grid::manhattan;
use castlegen_core::{
    CellContent, GeneratedLevel, GeneratorConfig, MapGenError, Pos, RoomId, generate_level,
};

/// The level for the first seed from `seed` onward that does not run out of a
/// retry budget.
fn run(seed: u64) -> GeneratedLevel {
    (seed..seed + 64)
        .find_map(|candidate| match generate_level(GeneratorConfig::with_seed(candidate)) {
            Ok(level) => Some(level),
            Err(MapGenError::RetryBudgetExhausted { .. }) => None,
            Err(error) => panic!("seed {candidate} failed: {error}"),
        })
        .unwrap_or_else(|| panic!("no seed from {seed} produced a level"))
}

#[test]
fn test_smoke_every_room_reachable_after_repair() {
    for seed in [1_u64, 42, 2_024, 99_999] {
        let level = run(seed);
        assert!(
            unreachable_rooms(&level.map).is_empty(),
            "seed {seed} left rooms cut off from the origin"
        );
    }
}

#[test]
fn test_smoke_origin_walk_covers_castle_and_boss() {
    let level = run(42);
    let castle = level.report.castle.expect("castle summary missing");
    let reached = whole_map_reachability(&level.map);
    assert!(reached.contains(&castle.boss), "boss at {:?} unreachable", castle.boss);
    assert!(reached.contains(&Pos::ORIGIN));
}

#[test]
fn test_smoke_item_quota_and_spacing() {
    for seed in [3_u64, 42, 500] {
        let level = run(seed);
        let items = &level.report.items;
        assert_eq!(items.len(), 31);

        let distinct: BTreeSet<Pos> = items.iter().map(|item| item.pos).collect();
        assert_eq!(distinct.len(), 31);
        for (index, first) in items.iter().enumerate() {
            for second in &items[index + 1..] {
                assert!(manhattan(first.pos, second.pos) >= 9, "seed {seed}: items too close");
            }
        }

        let gems = items.iter().filter(|item| item.content == CellContent::Gem).count();
        let shrines = items.iter().filter(|item| item.content == CellContent::Shrine).count();
        assert_eq!((gems, shrines), (20, 5));
        for unique in CellContent::UNIQUE_ITEMS {
            assert_eq!(items.iter().filter(|item| item.content == unique).count(), 1);
        }
    }
}

#[test]
fn test_smoke_doors_and_walls_are_adjacent_in_bounds_pairs() {
    let level = run(8);
    let map = &level.map;
    for edge in map.doors().iter().chain(map.forced_walls()) {
        let (a, b) = edge.cells();
        assert!(map.in_bounds(a) && map.in_bounds(b), "edge {edge:?} leaves the map");
        assert_eq!(manhattan(a, b), 1, "edge {edge:?} is not between neighbours");
    }
}

#[test]
fn test_smoke_vault_dead_ends_stay_inside_their_rooms() {
    for seed in 0..12_u64 {
        let level = run(seed);
        let map = &level.map;
        for edge in map.forced_walls() {
            let (a, b) = edge.cells();
            assert_eq!(map.room_at(a), map.room_at(b), "seed {seed}: wall {edge:?} spans rooms");
            assert!(map.room_at(a).is_some_and(RoomId::is_assigned));
        }
        for vault in &level.report.vaults {
            assert_eq!(map.content_at(vault.center), Some(CellContent::Item));
            let inside = flood_fill(map, vault.center, &[], true);
            assert!(inside.contains(&Pos::ORIGIN), "seed {seed}: vault centre sealed");
        }
    }
}

#[test]
fn test_smoke_rooms_follow_room_counter() {
    let level = run(31);
    let highest = level.map.room_ids().iter().map(|room| room.0).max().unwrap_or(0);
    assert!(highest <= level.map.room_count());
    assert!(level.map.room_count() > 10, "expected castle and buildings to split into rooms");
}
