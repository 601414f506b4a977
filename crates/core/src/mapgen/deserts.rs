//! Desert growth by probabilistic diffusion over grass.

use std::collections::BTreeSet;

use log::debug;

use crate::types::{Pos, TerrainKind};

use super::grid::{cells_in_range, manhattan, neighbors};
use super::model::TerrainMap;
use super::rng::GenRng;

const SPREAD_CHANCE: f64 = 0.8;
const MIN_SMALL_DESERT_ORIGIN_DISTANCE: u32 = 10;

pub(super) fn generate_deserts(map: &mut TerrainMap, rng: &mut GenRng) {
    // Edge bands that stay clear of the (0, 0) and (w, h) corners.
    let anchors = [
        Pos::new(map.random_x_value(rng, 0.0, 0.1), map.random_y_value(rng, 0.5, 1.0)),
        Pos::new(map.random_x_value(rng, 0.9, 1.0), map.random_y_value(rng, 0.0, 0.5)),
        Pos::new(map.random_x_value(rng, 0.5, 1.0), map.random_y_value(rng, 0.0, 0.1)),
        Pos::new(map.random_x_value(rng, 0.0, 0.5), map.random_y_value(rng, 0.9, 1.0)),
    ];
    let center = anchors[rng.below(anchors.len())];
    let size = rng.range_usize(13, 15);
    let subcenters = rng.range_usize(1, 3);
    grow_desert(map, rng, center, size, subcenters);

    for _ in 0..rng.range_usize(1, 3) {
        let mut center = map.random_cell(rng);
        while manhattan(center, Pos::ORIGIN) < MIN_SMALL_DESERT_ORIGIN_DISTANCE {
            center = map.random_cell(rng);
        }
        let size = rng.range_usize(7, 9);
        let subcenters = rng.range_usize(0, 1);
        grow_desert(map, rng, center, size, subcenters);
    }
}

/// Grows one desert for `size` rounds from `center`, plus `subcenters` half-size
/// offshoots seeded on the ring of radius `size - 1`.
pub(super) fn grow_desert(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    center: Pos,
    size: usize,
    subcenters: usize,
) {
    let mut marked = BTreeSet::from([center]);
    for _ in 0..size {
        spread_round(map, rng, &mut marked, false);
    }

    for _ in 0..subcenters {
        let ring = cells_in_range(center, size.saturating_sub(1) as u32, true);
        let Some(&subcenter) = rng.choose(&ring) else {
            continue;
        };
        let mut sub_marked = BTreeSet::from([subcenter]);
        for _ in 0..size / 2 {
            spread_round(map, rng, &mut sub_marked, true);
        }
        marked.extend(sub_marked);
    }

    let mut converted = 0;
    for pos in marked {
        if map.is_terrain(pos, TerrainKind::Grass) {
            map.set_terrain(pos, TerrainKind::Desert);
            converted += 1;
        }
    }
    debug!("desert at {center:?} grew over {converted} cells");
}

/// Admits each unmarked grass neighbour of `marked` with the spread chance.
/// Offshoots convert their cells as soon as they are admitted.
fn spread_round(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    marked: &mut BTreeSet<Pos>,
    convert_immediately: bool,
) {
    let frontier: BTreeSet<Pos> = marked
        .iter()
        .flat_map(|&pos| neighbors(pos))
        .filter(|next| !marked.contains(next) && map.is_terrain(*next, TerrainKind::Grass))
        .collect();
    for next in frontier {
        if rng.chance(SPREAD_CHANCE) {
            if convert_immediately {
                map.set_terrain(next, TerrainKind::Desert);
            }
            marked.insert(next);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn desert_covers_only_former_grass() {
        let mut map = TerrainMap::new(40, 40);
        for y in 0..40 {
            map.set_terrain(Pos::new(20, y), TerrainKind::Water);
        }
        let mut rng = GenRng::new(8);
        grow_desert(&mut map, &mut rng, Pos::new(10, 20), 8, 0);
        assert_eq!(map.count_terrain(TerrainKind::Water), 40);
        let desert = map.count_terrain(TerrainKind::Desert);
        assert!(desert > 40, "desert too small: {desert}");
        assert!(
            map.positions()
                .filter(|pos| pos.x > 20)
                .all(|pos| !map.is_terrain(pos, TerrainKind::Desert))
        );
    }

    #[test]
    fn desert_growth_is_bounded_by_round_count() {
        let mut map = TerrainMap::new(60, 60);
        let mut rng = GenRng::new(21);
        let center = Pos::new(30, 30);
        grow_desert(&mut map, &mut rng, center, 6, 0);
        for pos in map.positions() {
            if map.is_terrain(pos, TerrainKind::Desert) {
                assert!(manhattan(pos, center) <= 6);
            }
        }
    }

    #[test]
    fn full_pipeline_deserts_appear() {
        let mut map = TerrainMap::new(50, 50);
        let mut rng = GenRng::new(42);
        generate_deserts(&mut map, &mut rng);
        assert!(map.count_terrain(TerrainKind::Desert) > 100);
    }
}
