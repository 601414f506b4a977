//! Recursive room subdivision, the door helper it shares with repair, and the
//! repair pass that links rooms the origin walk cannot reach.

use std::collections::BTreeSet;

use log::debug;

use crate::error::MapGenError;
use crate::types::{Pos, RoomId};

use super::connectivity::{split_into_connected_components, whole_map_reachability};
use super::grid::neighbors;
use super::model::TerrainMap;
use super::rng::GenRng;

const MAX_UNSPLIT_SIZE: f64 = 30.0;
const ORGANIC_FILL_SHARE: f64 = 0.6;
const ORGANIC_ADMIT_CHANCE: f64 = 0.5;

/// Rooms smaller than `2 + roll_a * roll_b * 30` cells are left whole.
pub(crate) fn should_stop_splitting(len: usize, roll_a: f64, roll_b: f64) -> bool {
    2.0 + roll_a * roll_b * MAX_UNSPLIT_SIZE > len as f64
}

/// Subdivides the room occupying `cells` until every fragment passes the stop roll.
///
/// `cells` must already carry one room id. Fragments split off the new side get
/// fresh ids and a door back into the remainder.
pub(super) fn split_room(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    cells: &BTreeSet<Pos>,
) -> Result<(), MapGenError> {
    let Some(room) = cells.first().and_then(|&pos| map.room_at(pos)) else {
        return Ok(());
    };
    split_recursive(map, rng, cells, room)
}

fn split_recursive(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    cells: &BTreeSet<Pos>,
    room: RoomId,
) -> Result<(), MapGenError> {
    let (roll_a, roll_b) = (rng.unit(), rng.unit());
    if should_stop_splitting(cells.len(), roll_a, roll_b) {
        return Ok(());
    }

    let new_side = match rng.below(3) {
        0 => axis_split(rng, cells, |pos| pos.y),
        1 => axis_split(rng, cells, |pos| pos.x),
        _ => organic_fill(rng, cells),
    };
    if new_side.is_empty() || new_side.len() == cells.len() {
        return Ok(());
    }
    let old_side: BTreeSet<Pos> = cells.difference(&new_side).copied().collect();

    let mut fragments = Vec::new();
    for component in split_into_connected_components(&new_side) {
        let id = map.add_room(&component);
        add_connecting_door(map, rng, &component, &old_side, id)?;
        fragments.push((component, id));
    }
    for (index, component) in split_into_connected_components(&old_side).into_iter().enumerate() {
        let id = if index == 0 { room } else { map.add_room(&component) };
        fragments.push((component, id));
    }

    if let Some(&anchor) = old_side.first() {
        link_stranded_fragments(map, rng, cells, anchor, &fragments)?;
    }

    for (component, id) in &fragments {
        split_recursive(map, rng, component, *id)?;
    }
    Ok(())
}

/// Fragments the new-side doors left cut off from `anchor` get a door into the
/// part of `cells` that is linked to it.
fn link_stranded_fragments(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    cells: &BTreeSet<Pos>,
    anchor: Pos,
    fragments: &[(BTreeSet<Pos>, RoomId)],
) -> Result<(), MapGenError> {
    loop {
        let linked = linked_cells(map, cells, anchor);
        let stranded: Vec<&(BTreeSet<Pos>, RoomId)> = fragments
            .iter()
            .filter(|(component, _)| component.first().is_some_and(|pos| !linked.contains(pos)))
            .collect();
        let Some(&(first_component, first_room)) = stranded.first() else {
            return Ok(());
        };

        let mut opened = false;
        for (component, id) in stranded.iter().copied() {
            opened |= add_connecting_door(map, rng, component, &linked, *id).is_ok();
        }
        if !opened {
            return Err(MapGenError::NoDoorPlacement {
                room: *first_room,
                cells: first_component.len(),
            });
        }
    }
}

/// Cells of `cells` reachable from `start` across open boundaries.
fn linked_cells(map: &TerrainMap, cells: &BTreeSet<Pos>, start: Pos) -> BTreeSet<Pos> {
    let mut linked = BTreeSet::from([start]);
    let mut stack = vec![start];
    while let Some(current) = stack.pop() {
        for next in neighbors(current) {
            if cells.contains(&next)
                && !linked.contains(&next)
                && map.is_open_boundary(current, next)
            {
                linked.insert(next);
                stack.push(next);
            }
        }
    }
    linked
}

/// Cells on or below a pivot drawn from `[min, max)` along one axis.
fn axis_split(
    rng: &mut GenRng,
    cells: &BTreeSet<Pos>,
    axis: impl Fn(Pos) -> i32,
) -> BTreeSet<Pos> {
    let (Some(min), Some(max)) =
        (cells.iter().map(|&pos| axis(pos)).min(), cells.iter().map(|&pos| axis(pos)).max())
    else {
        return BTreeSet::new();
    };
    if min == max {
        return BTreeSet::new();
    }
    let pivot = rng.range_inclusive(min, max - 1);
    cells.iter().copied().filter(|&pos| axis(pos) <= pivot).collect()
}

/// Grows a blob from one random cell until it holds `floor(len * u * 0.6) + 1` cells
/// or runs out of frontier.
fn organic_fill(rng: &mut GenRng, cells: &BTreeSet<Pos>) -> BTreeSet<Pos> {
    let target = (cells.len() as f64 * rng.unit() * ORGANIC_FILL_SHARE) as usize + 1;
    let pool: Vec<Pos> = cells.iter().copied().collect();
    let Some(&start) = rng.choose(&pool) else {
        return BTreeSet::new();
    };

    let mut blob = BTreeSet::from([start]);
    while blob.len() < target {
        let frontier: BTreeSet<Pos> = blob
            .iter()
            .flat_map(|&pos| neighbors(pos))
            .filter(|next| cells.contains(next) && !blob.contains(next))
            .collect();
        if frontier.is_empty() {
            break;
        }
        for next in frontier {
            if blob.len() >= target {
                break;
            }
            if rng.chance(ORGANIC_ADMIT_CHANCE) {
                blob.insert(next);
            }
        }
    }
    blob
}

/// Opens one door from `cells` into `target`, or into any on-map cell outside
/// `cells` when `target` is empty. Returns the door's endpoints.
pub(super) fn add_connecting_door(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    cells: &BTreeSet<Pos>,
    target: &BTreeSet<Pos>,
    room: RoomId,
) -> Result<(Pos, Pos), MapGenError> {
    let candidates: Vec<(Pos, Pos)> = cells
        .iter()
        .flat_map(|&inside| neighbors(inside).map(|outside| (inside, outside)))
        .filter(|&(inside, outside)| {
            let joins_target = if target.is_empty() {
                map.in_bounds(outside) && !cells.contains(&outside)
            } else {
                target.contains(&outside)
            };
            joins_target && !map.is_forced_wall(inside, outside)
        })
        .collect();

    let Some(&(inside, outside)) = rng.choose(&candidates) else {
        return Err(MapGenError::NoDoorPlacement { room, cells: cells.len() });
    };
    map.add_door(inside, outside);
    Ok((inside, outside))
}

/// Adds doors until every assigned room id is reachable from the origin.
/// Returns the number of doors added.
pub(super) fn repair_unreachable_rooms(
    map: &mut TerrainMap,
    rng: &mut GenRng,
) -> Result<usize, MapGenError> {
    let mut added = 0;
    loop {
        let reached = whole_map_reachability(map);
        let reached_rooms: BTreeSet<RoomId> =
            reached.iter().filter_map(|&pos| map.room_at(pos)).collect();
        let unreached: BTreeSet<RoomId> = map
            .room_ids()
            .iter()
            .copied()
            .filter(|room| room.is_assigned() && !reached_rooms.contains(room))
            .collect();
        if unreached.is_empty() {
            break;
        }

        let doors_before = map.doors().len();
        for room in unreached {
            let cells = map.room_cells(room);
            let linked = add_connecting_door(map, rng, &cells, &reached, room);
            if linked.is_err() {
                add_connecting_door(map, rng, &cells, &BTreeSet::new(), room)?;
            }
        }
        let opened = map.doors().len() - doors_before;
        if opened == 0 {
            break;
        }
        added += opened;
    }
    debug!("repair opened {added} doors");
    Ok(added)
}
