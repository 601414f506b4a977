//! Vault registry and the desert pyramid: four concentric rooms with sealed
//! dead ends and a reward at the centre.

use log::debug;

use crate::types::{CellContent, Pos, TerrainKind};

use super::grid::neighbors;
use super::model::{TerrainMap, VaultPlacement};
use super::rng::GenRng;

/// A named vault with its selection probability and site/placement hooks.
#[derive(Clone, Copy, Debug)]
pub struct VaultDescriptor {
    pub name: &'static str,
    pub probability: f64,
    pub locate: fn(&TerrainMap, &mut GenRng) -> Option<Pos>,
    pub place: fn(&mut TerrainMap, &mut GenRng, Pos),
}

pub const DESERT_PYRAMID: VaultDescriptor = VaultDescriptor {
    name: "Desert Pyramid",
    probability: 1.0,
    locate: find_desert_pyramid_site,
    place: place_desert_pyramid,
};

pub const DEFAULT_VAULTS: &[VaultDescriptor] = &[DESERT_PYRAMID];

const PYRAMID_SITE: i32 = 9;
const PYRAMID_RINGS: i32 = 4;
const GEM_CHANCE: f64 = 0.1;
const SHRINE_CHANCE: f64 = 0.1;
const OGRE_CHANCE: f64 = 0.5;

/// Rolls each descriptor in order and places the ones that find a site.
pub(super) fn apply_vaults(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    registry: &[VaultDescriptor],
) -> Vec<VaultPlacement> {
    let mut placed = Vec::new();
    for vault in registry {
        if !rng.chance(vault.probability) {
            continue;
        }
        let Some(center) = (vault.locate)(map, rng) else {
            debug!("no site for {}", vault.name);
            continue;
        };
        debug!("placing {} at {center:?}", vault.name);
        (vault.place)(map, rng, center);
        placed.push(VaultPlacement { name: vault.name.to_string(), center });
    }
    placed
}

/// Centre of a random 9x9 square that is entirely desert.
pub fn find_desert_pyramid_site(map: &TerrainMap, rng: &mut GenRng) -> Option<Pos> {
    let last_x = map.width() as i32 - PYRAMID_SITE;
    let last_y = map.height() as i32 - PYRAMID_SITE;
    let mut sites = Vec::new();
    for min_x in 0..=last_x {
        for min_y in 0..=last_y {
            let all_desert = (0..PYRAMID_SITE).all(|dy| {
                (0..PYRAMID_SITE)
                    .all(|dx| map.is_terrain(Pos::new(min_x + dx, min_y + dy), TerrainKind::Desert))
            });
            if all_desert {
                sites.push(Pos::new(min_x + PYRAMID_SITE / 2, min_y + PYRAMID_SITE / 2));
            }
        }
    }
    rng.choose(&sites).copied()
}

/// Square ring of Chebyshev radius `radius` around `center`.
fn square_ring(center: Pos, radius: i32) -> Vec<Pos> {
    (-radius..=radius)
        .flat_map(|dx| (-radius..=radius).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| dx.abs().max(dy.abs()) == radius)
        .map(|(dx, dy)| center.offset(dx, dy))
        .collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Heading {
    Up,
    Down,
    Left,
    Right,
}

impl Heading {
    const ALL: [Heading; 4] = [Heading::Up, Heading::Down, Heading::Left, Heading::Right];

    fn step(self, from: Pos, distance: i32) -> Pos {
        match self {
            Heading::Up => from.offset(0, distance),
            Heading::Down => from.offset(0, -distance),
            Heading::Left => from.offset(-distance, 0),
            Heading::Right => from.offset(distance, 0),
        }
    }
}

pub fn place_desert_pyramid(map: &mut TerrainMap, rng: &mut GenRng, center: Pos) {
    let rings: Vec<Vec<Pos>> =
        (0..PYRAMID_RINGS).map(|radius| square_ring(center, radius)).collect();
    for ring in &rings {
        map.add_room(ring);
    }

    // Ring k opens onto ring k + 1; the outermost opens onto the desert.
    let mut previous: Option<Heading> = None;
    for radius in 0..PYRAMID_RINGS {
        let choices: Vec<Heading> =
            Heading::ALL.into_iter().filter(|&heading| Some(heading) != previous).collect();
        let Some(&heading) = rng.choose(&choices) else {
            continue;
        };
        map.add_door(heading.step(center, radius), heading.step(center, radius + 1));
        previous = Some(heading);
    }

    let mut dead_ends = Vec::new();
    for ring in &rings[1..] {
        let Some(&wall_a) = rng.choose(ring) else {
            continue;
        };
        let partners: Vec<Pos> =
            neighbors(wall_a).into_iter().filter(|next| ring.contains(next)).collect();
        let Some(&wall_b) = rng.choose(&partners) else {
            continue;
        };
        map.add_forced_wall(wall_a, wall_b);
        dead_ends.extend([wall_a, wall_b]);
    }

    let hazard = if rng.chance(0.5) { TerrainKind::Lava } else { TerrainKind::Water };
    let mut shrine_placed = false;
    for cell in dead_ends {
        if rng.chance(GEM_CHANCE) {
            map.set_content(cell, CellContent::Gem);
        } else if rng.chance(SHRINE_CHANCE) && !shrine_placed {
            map.set_content(cell, CellContent::Shrine);
            shrine_placed = true;
        } else if rng.chance(OGRE_CHANCE) {
            map.set_content(cell, CellContent::Ogre);
        } else {
            map.set_terrain(cell, hazard);
        }
    }

    map.set_content(center, CellContent::Item);
}
