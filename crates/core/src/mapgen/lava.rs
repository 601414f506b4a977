//! Lava flows and scattered eruptions in the far quadrant (x >= w/2, y >= h/2).

use log::{debug, warn};

use crate::types::{Pos, TerrainKind};

use super::grid::neighbors;
use super::model::TerrainMap;
use super::paths::{PathStyle, draw_path};
use super::rng::GenRng;

const LAVA_FLOW: PathStyle<'static> = PathStyle {
    paint: TerrainKind::Lava,
    meander: 0.2,
    widen_rounds: 1,
    widen_chance: 0.15,
    skip: &[TerrainKind::Water, TerrainKind::Lava, TerrainKind::Building],
};

const FLOW_REACH: u32 = 10;
const IGNITION_CHANCE: f64 = 0.02;
const SPREAD_CHANCE: f64 = 0.2;
const CARRY_CHANCE: f64 = 0.5;
const MAX_LAVA_ROUNDS: usize = 200;

/// Alternates flows and scatter passes until 3-4% of the map has turned to lava.
/// Returns the number of cells painted or ignited.
pub(super) fn generate_lava(map: &mut TerrainMap, rng: &mut GenRng) -> usize {
    let target = (map.area() as f64 * (0.03 + rng.unit() * 0.01)) as usize;
    let mut produced = 0;

    for _ in 0..MAX_LAVA_ROUNDS {
        if produced >= target {
            debug!("lava covers {produced} cells (target {target})");
            return produced;
        }
        let start = random_far_quadrant_cell(map, rng);
        let reachable = map.valid_cells_in_range(start, FLOW_REACH, false);
        let end = rng.choose(&reachable).copied().unwrap_or(start);
        produced += draw_path(map, rng, start, end, &LAVA_FLOW);
        produced += scatter_lava(map, rng);
    }

    warn!("lava stopped at {produced} of {target} cells");
    produced
}

fn random_far_quadrant_cell(map: &TerrainMap, rng: &mut GenRng) -> Pos {
    let half_width = map.width() / 2;
    let half_height = map.height() / 2;
    let x = half_width + rng.below(map.width() - half_width);
    let y = half_height + rng.below(map.height() - half_height);
    Pos { y: y as i32, x: x as i32 }
}

/// Ignites grass and desert cells, lets each ignition creep into adjacent grass,
/// and sometimes carries one cell further along the same line.
pub(super) fn scatter_lava(map: &mut TerrainMap, rng: &mut GenRng) -> usize {
    let mut ignited = 0;
    for y in (map.height() / 2) as i32..map.height() as i32 {
        for x in (map.width() / 2) as i32..map.width() as i32 {
            let origin = Pos { y, x };
            let flammable = map.is_terrain(origin, TerrainKind::Grass)
                || map.is_terrain(origin, TerrainKind::Desert);
            if !flammable || !rng.chance(IGNITION_CHANCE) {
                continue;
            }
            map.set_terrain(origin, TerrainKind::Lava);
            ignited += 1;

            for next in neighbors(origin) {
                if !map.is_terrain(next, TerrainKind::Grass) || !rng.chance(SPREAD_CHANCE) {
                    continue;
                }
                map.set_terrain(next, TerrainKind::Lava);
                ignited += 1;

                let beyond = next.offset(next.x - origin.x, next.y - origin.y);
                if map.is_terrain(beyond, TerrainKind::Grass) && rng.chance(CARRY_CHANCE) {
                    map.set_terrain(beyond, TerrainKind::Lava);
                    ignited += 1;
                }
            }
        }
    }
    ignited
}
