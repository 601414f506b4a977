//! Biased random-walk painter shared by rivers, bridges and lava flows.

use std::collections::BTreeSet;

use crate::types::{Pos, TerrainKind};

use super::grid::neighbors;
use super::model::TerrainMap;
use super::rng::GenRng;

#[derive(Clone, Copy, Debug)]
pub struct PathStyle<'a> {
    pub paint: TerrainKind,
    /// Chance that each direction joins the step candidates on its own.
    pub meander: f64,
    pub widen_rounds: usize,
    pub widen_chance: f64,
    /// Cells currently holding one of these kinds are left untouched.
    pub skip: &'a [TerrainKind],
}

/// Walks from `start` to `end`, widens the trail, and paints it.
/// Returns how many cells were actually repainted.
pub fn draw_path(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    start: Pos,
    end: Pos,
    style: &PathStyle<'_>,
) -> usize {
    let mut selected = walk(map, rng, start, end, style.meander);
    for _ in 0..style.widen_rounds {
        widen_once(map, rng, &mut selected, style.widen_chance);
    }
    let cells: BTreeSet<Pos> = selected.into_iter().collect();
    paint(map, &cells, style.paint, style.skip)
}

/// The raw step sequence, including repeated points when no move is possible.
pub(crate) fn walk(
    map: &TerrainMap,
    rng: &mut GenRng,
    start: Pos,
    end: Pos,
    meander: f64,
) -> Vec<Pos> {
    let mut trail = vec![start];
    let mut current = start;
    if !map.in_bounds(start) || !map.in_bounds(end) {
        return trail;
    }
    while current != end {
        // A direction that closes the gap and also wins the meander roll is listed twice.
        let wanted = [current.x < end.x, current.x > end.x, current.y < end.y, current.y > end.y];
        let mut options = Vec::with_capacity(8);
        for (next, needed) in neighbors(current).into_iter().zip(wanted) {
            if needed {
                options.push(next);
            }
            if rng.chance(meander) {
                options.push(next);
            }
        }
        options.retain(|&next| map.in_bounds(next));
        if let Some(&next) = rng.choose(&options) {
            current = next;
        }
        trail.push(current);
    }
    trail
}

/// One widen round: every on-map neighbour of every selected entry joins with
/// probability `chance`. Repeated entries roll once each, and the selection only
/// ever grows.
pub(crate) fn widen_once(
    map: &TerrainMap,
    rng: &mut GenRng,
    selected: &mut Vec<Pos>,
    chance: f64,
) {
    let shore: Vec<Pos> = selected
        .iter()
        .flat_map(|&pos| neighbors(pos))
        .filter(|&next| map.in_bounds(next))
        .collect();
    for next in shore {
        if rng.chance(chance) {
            selected.push(next);
        }
    }
}

fn paint(
    map: &mut TerrainMap,
    cells: &BTreeSet<Pos>,
    kind: TerrainKind,
    skip: &[TerrainKind],
) -> usize {
    let mut painted = 0;
    for &pos in cells {
        let Some(current) = map.terrain_at(pos) else {
            continue;
        };
        if skip.contains(&current) {
            continue;
        }
        map.set_terrain(pos, kind);
        painted += 1;
    }
    painted
}
