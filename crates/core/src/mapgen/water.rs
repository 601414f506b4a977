//! Rivers, lake islands, and the road bridges that span them.

use std::collections::BTreeSet;

use log::debug;

use crate::error::{MapGenError, Stage};
use crate::types::{Pos, TerrainKind};

use super::connectivity::split_map_by_terrain;
use super::grid::{manhattan, neighbors};
use super::model::TerrainMap;
use super::paths::{PathStyle, draw_path};
use super::rng::GenRng;

const MAIN_RIVER: PathStyle<'static> = PathStyle {
    paint: TerrainKind::Water,
    meander: 0.5,
    widen_rounds: 2,
    widen_chance: 0.15,
    skip: &[],
};

const TRIBUTARY: PathStyle<'static> = PathStyle { widen_chance: 0.08, ..MAIN_RIVER };

const BRIDGE: PathStyle<'static> = PathStyle {
    paint: TerrainKind::Road,
    meander: 0.0,
    widen_rounds: 0,
    widen_chance: 0.0,
    skip: &[],
};

const MIN_ISLAND_SHORE_DISTANCE: u32 = 3;
const MAX_BRIDGE_SPAN: u32 = 5;
const MIN_BRIDGE_SEPARATION: u32 = 20;

/// Paints the main river and its tributary, then breaks up large water bodies.
pub(super) fn generate_rivers(map: &mut TerrainMap, rng: &mut GenRng) {
    let main_course = [
        Pos::new(map.random_x_value(rng, 0.2, 0.3), map.height() as i32 - 1),
        Pos::new(map.random_x_value(rng, 0.3, 0.4), map.random_y_value(rng, 0.5, 0.7)),
        Pos::new(map.random_x_value(rng, 0.5, 0.7), map.random_y_value(rng, 0.2, 0.3)),
        Pos::new(map.width() as i32 - 1, map.random_y_value(rng, 0.1, 0.3)),
    ];
    let tributary = [
        Pos::new(0, map.random_y_value(rng, 0.7, 0.9)),
        Pos::new(map.random_x_value(rng, 0.1, 0.2), map.random_y_value(rng, 0.4, 0.5)),
        main_course[2],
    ];

    let mut painted = 0;
    for leg in main_course.windows(2) {
        painted += draw_path(map, rng, leg[0], leg[1], &MAIN_RIVER);
    }
    for leg in tributary.windows(2) {
        painted += draw_path(map, rng, leg[0], leg[1], &TRIBUTARY);
    }
    debug!("rivers painted {painted} cells");

    carve_lake_islands(map, rng);
}

/// Every fully-watered 3x3 block seeds an island of cells well away from any shore.
pub(super) fn carve_lake_islands(map: &mut TerrainMap, rng: &mut GenRng) {
    for y in 0..map.height() as i32 {
        for x in 0..map.width() as i32 {
            let seed = Pos { y, x };
            let block_is_water = (y - 2..=y).all(|block_y| {
                (x - 2..=x).all(|block_x| {
                    map.is_terrain(Pos::new(block_x, block_y), TerrainKind::Water)
                })
            });
            if !block_is_water {
                continue;
            }

            let mut island = BTreeSet::from([seed]);
            let mut stack = vec![seed];
            while let Some(current) = stack.pop() {
                for next in neighbors(current) {
                    if !map.in_bounds(next) || island.contains(&next) {
                        continue;
                    }
                    let far_from_shore = map
                        .nearest_distance_to(next, TerrainKind::Grass)
                        .is_none_or(|distance| distance >= MIN_ISLAND_SHORE_DISTANCE);
                    if far_from_shore && rng.chance(0.8) {
                        island.insert(next);
                        stack.push(next);
                    }
                }
            }

            debug!("lake island of {} cells at ({x}, {y})", island.len());
            for pos in island {
                map.set_terrain(pos, TerrainKind::Grass);
            }
        }
    }
}

/// Lays one to three short road bridges between distinct land masses. Running
/// out of attempts before every drawn bridge is placed is fatal.
pub(super) fn generate_bridges(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    max_attempts: usize,
) -> Result<Vec<(Pos, Pos)>, MapGenError> {
    let islands: Vec<BTreeSet<Pos>> = split_map_by_terrain(map, &[TerrainKind::Water])
        .into_iter()
        .filter(|island| rng.unit() * 20.0 <= island.len() as f64)
        .collect();
    let wanted = rng.range_usize(1, 3);
    let mut bridges: Vec<(Pos, Pos)> = Vec::with_capacity(wanted);

    let mut attempts = 0;
    while bridges.len() < wanted {
        attempts += 1;
        if attempts > max_attempts {
            debug!("placed {} of {wanted} bridges before giving up", bridges.len());
            return Err(MapGenError::RetryBudgetExhausted {
                stage: Stage::BridgePlacement,
                attempts: max_attempts,
            });
        }

        let start_index = rng.below(islands.len());
        let end_index = rng.below(islands.len());
        if start_index == end_index {
            continue;
        }
        let Some((span, start, end)) = closest_pair(&islands[start_index], &islands[end_index])
        else {
            continue;
        };
        if span <= 1 || span > MAX_BRIDGE_SPAN {
            continue;
        }
        let crowded = bridges.iter().flat_map(|&(a, b)| [a, b]).any(|anchor| {
            manhattan(start, anchor) < MIN_BRIDGE_SEPARATION
                || manhattan(end, anchor) < MIN_BRIDGE_SEPARATION
        });
        if crowded {
            continue;
        }

        debug!("bridge from {start:?} to {end:?}");
        draw_path(map, rng, start, end, &BRIDGE);
        bridges.push((start, end));
    }

    Ok(bridges)
}

/// The globally closest cell pair between two groups, first found on ties.
fn closest_pair(first: &BTreeSet<Pos>, second: &BTreeSet<Pos>) -> Option<(u32, Pos, Pos)> {
    let mut best: Option<(u32, Pos, Pos)> = None;
    for &a in first {
        for &b in second {
            let distance = manhattan(a, b);
            if best.is_none_or(|(best_distance, _, _)| distance < best_distance) {
                best = Some((distance, a, b));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split_by_channel(width: usize, height: usize, channel_x: &[i32]) -> TerrainMap {
        let mut map = TerrainMap::new(width, height);
        for &x in channel_x {
            for y in 0..height as i32 {
                map.set_terrain(Pos::new(x, y), TerrainKind::Water);
            }
        }
        map
    }

    #[test]
    fn rivers_reach_the_map_edges() {
        let mut map = TerrainMap::new(50, 50);
        let mut rng = GenRng::new(42);
        generate_rivers(&mut map, &mut rng);
        assert!(map.count_terrain(TerrainKind::Water) > 100);
        let touches_right = (0..50).any(|y| map.is_terrain(Pos::new(49, y), TerrainKind::Water));
        let touches_left = (0..50).any(|y| map.is_terrain(Pos::new(0, y), TerrainKind::Water));
        assert!(touches_right && touches_left);
    }

    #[test]
    fn lake_interior_becomes_an_island() {
        let mut map = TerrainMap::new(20, 20);
        for pos in map.positions().collect::<Vec<_>>() {
            if (3..17).contains(&pos.x) && (3..17).contains(&pos.y) {
                map.set_terrain(pos, TerrainKind::Water);
            }
        }
        let water_before = map.count_terrain(TerrainKind::Water);
        let mut rng = GenRng::new(5);
        carve_lake_islands(&mut map, &mut rng);
        assert!(map.count_terrain(TerrainKind::Water) < water_before);
        for x in 3..17 {
            assert!(map.is_terrain(Pos::new(x, 3), TerrainKind::Water), "shore row {x} dried up");
        }
    }

    #[test]
    fn closest_pair_prefers_smallest_distance() {
        let left = BTreeSet::from([Pos::new(0, 0), Pos::new(2, 5)]);
        let right = BTreeSet::from([Pos::new(9, 0), Pos::new(5, 5)]);
        assert_eq!(closest_pair(&left, &right), Some((3, Pos::new(2, 5), Pos::new(5, 5))));
        assert_eq!(closest_pair(&left, &BTreeSet::new()), None);
    }

    #[test]
    fn bridge_spans_a_narrow_channel() {
        let mut built = 0;
        for seed in 0..40 {
            let mut map = split_by_channel(30, 30, &[14, 15, 16]);
            let mut rng = GenRng::new(seed);
            // Both shores share one closest pair, so a second bridge never fits.
            let Ok(bridges) = generate_bridges(&mut map, &mut rng, 100) else {
                continue;
            };
            assert_eq!(bridges.len(), 1, "seed {seed}");
            let (start, end) = bridges[0];
            let span = manhattan(start, end);
            assert!(span > 1 && span <= MAX_BRIDGE_SPAN);
            assert!(map.count_terrain(TerrainKind::Road) >= 5);
            assert!(split_map_by_terrain(&map, &[TerrainKind::Water]).len() == 1);
            built += 1;
        }
        assert!(built > 0);
    }

    #[test]
    fn crowded_second_bridge_is_fatal() {
        let mut failures = 0;
        for seed in 0..40 {
            let mut map = split_by_channel(30, 30, &[10, 13]);
            let mut rng = GenRng::new(seed);
            match generate_bridges(&mut map, &mut rng, 100) {
                Ok(bridges) => assert_eq!(bridges.len(), 1, "seed {seed}"),
                Err(err) => {
                    assert_eq!(err, MapGenError::RetryBudgetExhausted {
                        stage: Stage::BridgePlacement,
                        attempts: 100,
                    });
                    failures += 1;
                }
            }
        }
        assert!(failures > 0, "every seed asked for a single bridge");
    }

    #[test]
    fn unbridgeable_map_exhausts_the_budget() {
        let mut map = split_by_channel(30, 30, &[10, 11, 12, 13, 14, 15, 16, 17]);
        let mut rng = GenRng::new(3);
        assert_eq!(
            generate_bridges(&mut map, &mut rng, 100),
            Err(MapGenError::RetryBudgetExhausted { stage: Stage::BridgePlacement, attempts: 100 })
        );
    }
}
