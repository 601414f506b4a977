//! Flood fill, component splitting, and whole-map room reachability.

use std::collections::{BTreeSet, VecDeque};

use crate::types::{Pos, RoomId, TerrainKind};

use super::grid::neighbors;
use super::model::TerrainMap;

/// Cells reachable from `start` over 4-neighbours.
///
/// A neighbour is entered when it is on the map and its terrain is not in
/// `blocking`. With `respect_walls` the step must also cross an open boundary:
/// no forced wall, and either a shared room id or a door.
pub fn flood_fill(
    map: &TerrainMap,
    start: Pos,
    blocking: &[TerrainKind],
    respect_walls: bool,
) -> BTreeSet<Pos> {
    let mut visited = BTreeSet::new();
    if !map.in_bounds(start) {
        return visited;
    }

    let mut queue = VecDeque::from([start]);
    visited.insert(start);
    while let Some(current) = queue.pop_front() {
        for next in neighbors(current) {
            let Some(terrain) = map.terrain_at(next) else {
                continue;
            };
            if blocking.contains(&terrain) || visited.contains(&next) {
                continue;
            }
            if respect_walls && !map.is_open_boundary(current, next) {
                continue;
            }
            visited.insert(next);
            queue.push_back(next);
        }
    }

    visited
}

/// Maximal 4-connected subsets of `cells`, ignoring terrain, doors and walls.
/// Components come out ordered by their smallest cell.
pub fn split_into_connected_components(cells: &BTreeSet<Pos>) -> Vec<BTreeSet<Pos>> {
    let mut unclaimed = cells.clone();
    let mut components = Vec::new();

    while let Some(seed) = unclaimed.pop_first() {
        let mut component = BTreeSet::from([seed]);
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            for next in neighbors(current) {
                if unclaimed.remove(&next) {
                    component.insert(next);
                    stack.push(next);
                }
            }
        }
        components.push(component);
    }

    components
}

/// Land masses separated by any of the `splitting` terrain kinds.
pub fn split_map_by_terrain(map: &TerrainMap, splitting: &[TerrainKind]) -> Vec<BTreeSet<Pos>> {
    let land: BTreeSet<Pos> = map
        .positions()
        .filter(|&pos| map.terrain_at(pos).is_some_and(|terrain| !splitting.contains(&terrain)))
        .collect();
    split_into_connected_components(&land)
}

/// Walk from the origin through doors only, ignoring terrain.
pub fn whole_map_reachability(map: &TerrainMap) -> BTreeSet<Pos> {
    flood_fill(map, Pos::ORIGIN, &[], true)
}

/// Assigned room ids that the origin walk never enters.
pub fn unreachable_rooms(map: &TerrainMap) -> BTreeSet<RoomId> {
    let reached = whole_map_reachability(map);
    let reached_rooms: BTreeSet<RoomId> =
        reached.iter().filter_map(|&pos| map.room_at(pos)).collect();
    map.positions()
        .filter_map(|pos| map.room_at(pos))
        .filter(|room| room.is_assigned() && !reached_rooms.contains(room))
        .collect()
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::mapgen::grid::manhattan;

    fn rect(min_x: i32, min_y: i32, max_x: i32, max_y: i32) -> BTreeSet<Pos> {
        (min_y..=max_y).flat_map(|y| (min_x..=max_x).map(move |x| Pos { y, x })).collect()
    }

    #[test]
    fn flood_fill_from_outside_the_map_is_empty() {
        let map = TerrainMap::new(5, 5);
        assert!(flood_fill(&map, Pos::new(-1, 0), &[], false).is_empty());
    }

    #[test]
    fn water_blocks_terrain_flood() {
        let mut map = TerrainMap::new(7, 5);
        for y in 0..5 {
            map.set_terrain(Pos::new(3, y), TerrainKind::Water);
        }
        let left = flood_fill(&map, Pos::ORIGIN, &[TerrainKind::Water], false);
        assert_eq!(left.len(), 15);
        assert!(left.iter().all(|pos| pos.x < 3));
        assert_eq!(split_map_by_terrain(&map, &[TerrainKind::Water]).len(), 2);
    }

    #[test]
    fn walls_and_doors_gate_room_entry() {
        let mut map = TerrainMap::new(6, 6);
        let room = map.add_room(&rect(2, 2, 3, 3));
        assert!(!whole_map_reachability(&map).contains(&Pos::new(2, 2)));
        assert_eq!(unreachable_rooms(&map), BTreeSet::from([room]));

        map.add_door(Pos::new(1, 2), Pos::new(2, 2));
        assert!(whole_map_reachability(&map).contains(&Pos::new(3, 3)));
        assert!(unreachable_rooms(&map).is_empty());

        map.add_forced_wall(Pos::new(1, 2), Pos::new(2, 2));
        assert_eq!(unreachable_rooms(&map), BTreeSet::from([room]));
    }

    #[test]
    fn forced_wall_splits_a_shared_room() {
        let mut map = TerrainMap::new(3, 1);
        map.add_room(&rect(0, 0, 2, 0));
        map.add_forced_wall(Pos::new(1, 0), Pos::new(2, 0));
        let reached = flood_fill(&map, Pos::ORIGIN, &[], true);
        assert_eq!(reached, rect(0, 0, 1, 0));
    }

    #[test]
    fn components_ignore_diagonal_contact() {
        let cells = BTreeSet::from([Pos::new(0, 0), Pos::new(1, 1), Pos::new(1, 0)]);
        assert_eq!(split_into_connected_components(&cells).len(), 1);
        let diagonal = BTreeSet::from([Pos::new(0, 0), Pos::new(1, 1)]);
        assert_eq!(split_into_connected_components(&diagonal).len(), 2);
    }

    proptest! {
        #[test]
        fn flood_fill_stays_on_the_map(
            seed_cells in proptest::collection::vec((0_i32..12, 0_i32..9), 0..40),
            start_x in -2_i32..14,
            start_y in -2_i32..11,
        ) {
            let mut map = TerrainMap::new(12, 9);
            for (x, y) in seed_cells {
                map.set_terrain(Pos::new(x, y), TerrainKind::Water);
            }
            let start = Pos::new(start_x, start_y);
            let visited = flood_fill(&map, start, &[TerrainKind::Water], false);
            prop_assert_eq!(visited.is_empty(), !map.in_bounds(start));
            for pos in &visited {
                prop_assert!(map.in_bounds(*pos));
                prop_assert!(*pos == start || !map.is_terrain(*pos, TerrainKind::Water));
            }
        }

        #[test]
        fn components_partition_their_input(
            raw in proptest::collection::btree_set((0_i32..10, 0_i32..10), 0..60),
        ) {
            let cells: BTreeSet<Pos> = raw.into_iter().map(|(x, y)| Pos::new(x, y)).collect();
            let components = split_into_connected_components(&cells);
            let total: usize = components.iter().map(BTreeSet::len).sum();
            prop_assert_eq!(total, cells.len());
            for (index, component) in components.iter().enumerate() {
                prop_assert_eq!(split_into_connected_components(component).len(), 1);
                for other in &components[index + 1..] {
                    for a in component {
                        prop_assert!(other.iter().all(|b| manhattan(*a, *b) > 1));
                    }
                }
            }
        }
    }
}
