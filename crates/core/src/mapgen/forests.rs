//! Radial forest clusters and the sparse tree scatter that finishes the terrain.

use log::{debug, warn};

use crate::types::{Pos, TerrainKind};

use super::grid::{cells_in_range, manhattan};
use super::model::TerrainMap;
use super::rng::GenRng;

const CENTER_ATTEMPTS: usize = 1000;
const SUB_CLUSTER_CHANCE: f64 = 0.5;
const SUB_CLUSTER_DENSITY: f64 = 0.5;
const SCATTER_CHANCE: f64 = 0.01;

pub(super) fn generate_forests(map: &mut TerrainMap, rng: &mut GenRng) {
    for _ in 0..rng.range_usize(3, 5) {
        let Some(center) = pick_grass_center(map, rng) else {
            warn!("no grass left for a forest center");
            continue;
        };
        let base_size = rng.range_usize(3, 6) as u32;
        grow_forest(map, rng, center, base_size);
    }
}

fn pick_grass_center(map: &TerrainMap, rng: &mut GenRng) -> Option<Pos> {
    (0..CENTER_ATTEMPTS).find_map(|_| {
        let candidate =
            Pos::new(map.random_x_value(rng, 0.1, 0.9), map.random_y_value(rng, 0.1, 0.9));
        map.is_terrain(candidate, TerrainKind::Grass).then_some(candidate)
    })
}

/// Density falls off linearly to zero at twice `base_size`; sub-clusters keep
/// spawning on the `base_size` ring while the coin lands heads.
pub(super) fn grow_forest(map: &mut TerrainMap, rng: &mut GenRng, center: Pos, base_size: u32) {
    let radius = base_size * 2;
    let mut planted = 0;
    for cell in map.valid_cells_in_range(center, radius, false) {
        let density = 1.0 - f64::from(manhattan(cell, center)) / f64::from(radius);
        if map.is_terrain(cell, TerrainKind::Grass) && rng.chance(density) {
            map.set_terrain(cell, TerrainKind::Tree);
            planted += 1;
        }
    }

    while rng.chance(SUB_CLUSTER_CHANCE) {
        let ring = cells_in_range(center, base_size, true);
        let Some(&subcenter) = rng.choose(&ring) else {
            break;
        };
        for cell in map.valid_cells_in_range(subcenter, base_size, false) {
            if map.is_terrain(cell, TerrainKind::Grass) && rng.chance(SUB_CLUSTER_DENSITY) {
                map.set_terrain(cell, TerrainKind::Tree);
                planted += 1;
            }
        }
    }
    debug!("forest at {center:?} planted {planted} trees");
}

pub(super) fn scatter_trees(map: &mut TerrainMap, rng: &mut GenRng) {
    for pos in map.positions() {
        if map.is_terrain(pos, TerrainKind::Grass) && rng.chance(SCATTER_CHANCE) {
            map.set_terrain(pos, TerrainKind::Tree);
        }
    }
}
