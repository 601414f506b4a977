//! Freestanding buildings with bitten corners and a few exterior doors.

use std::collections::BTreeSet;

use log::{debug, warn};

use crate::error::{MapGenError, Stage};
use crate::types::{Pos, TerrainKind};

use super::model::TerrainMap;
use super::rng::GenRng;
use super::rooms::split_room;

const MAX_SIDE: i32 = 8;
const BITE_CHANCE_PER_CELL: f64 = 0.17;
const CORNERS: [(bool, bool); 4] = [(false, true), (false, false), (true, false), (true, true)];
const MAX_DOOR_DRAWS: usize = 64;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];
}

/// Places buildings until they cover 5-10% of the map. Returns how many were built.
pub(super) fn generate_buildings(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    max_attempts: usize,
) -> Result<usize, MapGenError> {
    let desired = (map.area() / 20) as f64 * (1.0 + rng.unit());
    let mut covered = 0;
    let mut built = 0;
    while (covered as f64) < desired {
        covered += generate_building(map, rng, max_attempts)?;
        built += 1;
    }
    debug!("{built} buildings cover {covered} cells");
    Ok(built)
}

/// Builds one building and returns its cell count.
fn generate_building(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    max_attempts: usize,
) -> Result<usize, MapGenError> {
    let (origin, width, height) = find_spot(map, rng, max_attempts)?;
    let mut cells: BTreeSet<Pos> = (origin.y..origin.y + height)
        .flat_map(|y| (origin.x..origin.x + width).map(move |x| Pos::new(x, y)))
        .collect();

    let min_dim = width.min(height);
    let mut bites = 0;
    if rng.chance(f64::from(min_dim - 1) * BITE_CHANCE_PER_CELL) {
        bites = if min_dim == 2 { 1 } else { rng.range_usize(1, 4) };
        for corner in rng.sample_indices(CORNERS.len(), bites) {
            let limit = if bites == 1 { min_dim / 2 } else { (min_dim - 1) / 2 };
            let size = rng.range_inclusive(1, limit);
            let bite = corner_bite(origin, width, height, CORNERS[corner], size);
            cells.retain(|pos| !bite.contains(pos));
        }
    }

    map.add_room(&cells);
    for pos in &cells {
        map.set_terrain(*pos, TerrainKind::Building);
    }
    split_room(map, rng, &cells)?;
    add_exterior_doors(map, rng, &cells, bites);
    Ok(cells.len())
}

/// Draws a footprint size and origin per attempt until the footprint is free of
/// buildings and water.
fn find_spot(
    map: &TerrainMap,
    rng: &mut GenRng,
    max_attempts: usize,
) -> Result<(Pos, i32, i32), MapGenError> {
    for _ in 0..max_attempts {
        let width = rng.range_inclusive(1, MAX_SIDE);
        let height = rng.range_inclusive(1, MAX_SIDE);
        let x = rng.below(map.width().saturating_sub(width as usize)) as i32;
        let y = rng.below(map.height().saturating_sub(height as usize)) as i32;
        let free = (y..y + height).all(|cell_y| {
            (x..x + width).all(|cell_x| {
                let terrain = map.terrain_at(Pos::new(cell_x, cell_y));
                !matches!(terrain, Some(TerrainKind::Building | TerrainKind::Water))
            })
        });
        if free {
            return Ok((Pos::new(x, y), width, height));
        }
    }
    Err(MapGenError::RetryBudgetExhausted {
        stage: Stage::BuildingPlacement,
        attempts: max_attempts,
    })
}

/// The `size`-square taken out of one footprint corner; `true` picks the max side.
fn corner_bite(
    origin: Pos,
    width: i32,
    height: i32,
    (max_x, max_y): (bool, bool),
    size: i32,
) -> BTreeSet<Pos> {
    let x0 = if max_x { origin.x + width - size } else { origin.x };
    let y0 = if max_y { origin.y + height - size } else { origin.y };
    (y0..y0 + size).flat_map(|y| (x0..x0 + size).map(move |x| Pos::new(x, y))).collect()
}

fn exterior_door_target(rng: &mut GenRng, bites: usize) -> usize {
    let table: &[usize] = match bites {
        0 => &[1, 1, 1, 1, 2, 2, 3],
        1 | 2 => &[1, 2],
        _ => &[1, 2, 3, 4],
    };
    rng.choose(table).copied().unwrap_or(1)
}

/// Opens doors on distinct sides until the target count is met or the draws run out.
fn add_exterior_doors(map: &mut TerrainMap, rng: &mut GenRng, cells: &BTreeSet<Pos>, bites: usize) {
    let target = exterior_door_target(rng, bites);
    let mut sides = Side::ALL.to_vec();
    let mut made = 0;

    for _ in 0..MAX_DOOR_DRAWS {
        if made >= target {
            return;
        }
        let Some(&side) = rng.choose(&sides) else {
            break;
        };
        let Some((inside, outside)) = door_on_side(rng, cells, side) else {
            continue;
        };
        if map.in_bounds(outside) && !map.is_terrain(outside, TerrainKind::Water) {
            map.add_door(inside, outside);
            made += 1;
            sides.retain(|&used| used != side);
        }
    }
    if made < target {
        warn!("building opened {made} of {target} exterior doors");
    }
}

fn door_on_side(rng: &mut GenRng, cells: &BTreeSet<Pos>, side: Side) -> Option<(Pos, Pos)> {
    let extreme = match side {
        Side::Top => cells.iter().map(|pos| pos.y).max(),
        Side::Bottom => cells.iter().map(|pos| pos.y).min(),
        Side::Left => cells.iter().map(|pos| pos.x).min(),
        Side::Right => cells.iter().map(|pos| pos.x).max(),
    }?;
    let edge: Vec<Pos> = cells
        .iter()
        .copied()
        .filter(|pos| match side {
            Side::Top | Side::Bottom => pos.y == extreme,
            Side::Left | Side::Right => pos.x == extreme,
        })
        .collect();
    let &inside = rng.choose(&edge)?;
    let outside = match side {
        Side::Top => inside.offset(0, 1),
        Side::Bottom => inside.offset(0, -1),
        Side::Left => inside.offset(-1, 0),
        Side::Right => inside.offset(1, 0),
    };
    Some((inside, outside))
}
