//! Castle footprint: crenellated outline, gate, boss chamber, and the hall that
//! the room splitter subdivides.

use std::collections::BTreeSet;

use log::debug;

use crate::error::MapGenError;
use crate::types::{CellContent, Pos, TerrainKind};

use super::model::{CastleSummary, GateWall, TerrainMap};
use super::rng::GenRng;
use super::rooms::split_room;

const BOSS_CHAMBER_SIZE: i32 = 5;

/// Castle cells in wall-relative coordinates: `along` runs parallel to the gate
/// wall and `across` grows away from it.
#[derive(Clone, Copy, Debug)]
struct Frame {
    gate: GateWall,
}

impl Frame {
    fn pos(self, along: i32, across: i32) -> Pos {
        match self.gate {
            GateWall::Bottom => Pos::new(along, across),
            GateWall::Left => Pos::new(across, along),
        }
    }

    fn along(self, pos: Pos) -> i32 {
        match self.gate {
            GateWall::Bottom => pos.x,
            GateWall::Left => pos.y,
        }
    }

    fn across(self, pos: Pos) -> i32 {
        match self.gate {
            GateWall::Bottom => pos.y,
            GateWall::Left => pos.x,
        }
    }

    /// Smallest and largest `across` of the footprint in one `along` line.
    fn span(self, footprint: &BTreeSet<Pos>, along: i32) -> Option<(i32, i32)> {
        let line = footprint.iter().filter(|&&pos| self.along(pos) == along);
        let (min, max) = line.fold((i32::MAX, i32::MIN), |(min, max), &pos| {
            (min.min(self.across(pos)), max.max(self.across(pos)))
        });
        (min <= max).then_some((min, max))
    }
}

pub(super) fn generate_castle(
    map: &mut TerrainMap,
    rng: &mut GenRng,
) -> Result<CastleSummary, MapGenError> {
    let height = map.random_y_value(rng, 0.28, 0.33);
    let width = map.random_x_value(rng, 0.28, 0.33);
    let min = Pos::new(map.random_x_value(rng, 0.6, 0.65), map.random_y_value(rng, 0.6, 0.65));
    let max = min.offset(width - 1, height - 1);

    let mut footprint = rectangle(min, max);
    let depth = crenellate(rng, &mut footprint, min, max);
    debug!("castle {width}x{height} at {min:?} with indent depth {depth}");

    let frame = Frame { gate: if rng.chance(0.5) { GateWall::Bottom } else { GateWall::Left } };
    let (along_start, extent) = (frame.along(min), frame.along(max) - frame.along(min) + 1);
    let gate_len = if extent % 2 == 0 { 2 } else { 3 };
    let gate_start = along_start + (extent - gate_len) / 2;
    let axis = along_start + extent / 2;

    for pos in &footprint {
        map.set_terrain(*pos, TerrainKind::Building);
    }

    let chamber = boss_chamber(frame, &footprint, axis);
    let hall_cells: BTreeSet<Pos> = footprint.difference(&chamber).copied().collect();
    let hall = map.add_room(&hall_cells);
    let boss_chamber = map.add_room(&chamber);
    let boss = decorate_chamber(map, frame, &chamber, axis);

    let mut previous_gate: Option<Pos> = None;
    for along in gate_start..gate_start + gate_len {
        let Some((near, _)) = frame.span(&footprint, along) else {
            continue;
        };
        let gate_cell = frame.pos(along, near);
        map.add_door(gate_cell, frame.pos(along, near - 1));
        if let Some(previous) = previous_gate {
            map.add_door(previous, gate_cell);
        }
        previous_gate = Some(gate_cell);
    }
    debug!("castle gate on the {:?} wall, boss at {boss:?}", frame.gate);

    split_room(map, rng, &hall_cells)?;
    Ok(CastleSummary { min, max, gate: frame.gate, hall, boss_chamber, boss })
}

fn rectangle(min: Pos, max: Pos) -> BTreeSet<Pos> {
    (min.y..=max.y).flat_map(|y| (min.x..=max.x).map(move |x| Pos::new(x, y))).collect()
}

/// Cuts the middle of every wall back by the indent depth, leaving corner towers.
/// The towers never reach into the boss chamber's lines. Returns the depth used.
fn crenellate(rng: &mut GenRng, footprint: &mut BTreeSet<Pos>, min: Pos, max: Pos) -> i32 {
    let min_side = (max.x - min.x + 1).min(max.y - min.y + 1);
    let max_offset = (min_side / 3).min((min_side - BOSS_CHAMBER_SIZE) / 2);
    let depth = rng.range_inclusive(1, 2.min(max_offset - 1));
    let offset = rng.range_inclusive(depth + 1, max_offset);

    footprint.retain(|pos| {
        let in_x_middle = pos.x >= min.x + offset && pos.x <= max.x - offset;
        let in_y_middle = pos.y >= min.y + offset && pos.y <= max.y - offset;
        let near_x_wall = pos.x < min.x + depth || pos.x > max.x - depth;
        let near_y_wall = pos.y < min.y + depth || pos.y > max.y - depth;
        !((in_y_middle && near_x_wall) || (in_x_middle && near_y_wall))
    });
    depth
}

/// The 5x5 square against the far wall, centred on the gate axis.
fn boss_chamber(frame: Frame, footprint: &BTreeSet<Pos>, axis: i32) -> BTreeSet<Pos> {
    let Some((near, far)) = frame.span(footprint, axis) else {
        return BTreeSet::new();
    };
    let reach = BOSS_CHAMBER_SIZE.min(far - near);
    let half = BOSS_CHAMBER_SIZE / 2;
    (far - reach + 1..=far)
        .flat_map(|across| (axis - half..=axis + half).map(move |along| frame.pos(along, across)))
        .filter(|pos| footprint.contains(pos))
        .collect()
}

/// Seals in the chamber's corners, the boss in its middle, and the single door
/// toward the gate. Returns the boss cell.
fn decorate_chamber(
    map: &mut TerrainMap,
    frame: Frame,
    chamber: &BTreeSet<Pos>,
    axis: i32,
) -> Pos {
    let (Some(near), Some(far)) = (
        chamber.iter().map(|&pos| frame.across(pos)).min(),
        chamber.iter().map(|&pos| frame.across(pos)).max(),
    ) else {
        return frame.pos(axis, 0);
    };
    let half = BOSS_CHAMBER_SIZE / 2;
    for corner in [
        frame.pos(axis - half, near),
        frame.pos(axis + half, near),
        frame.pos(axis - half, far),
        frame.pos(axis + half, far),
    ] {
        if chamber.contains(&corner) {
            map.set_content(corner, CellContent::Seal);
        }
    }

    let boss = frame.pos(axis, (near + far + 1) / 2);
    map.set_content(boss, CellContent::Boss);
    map.add_door(frame.pos(axis, near), frame.pos(axis, near - 1));
    boss
}
