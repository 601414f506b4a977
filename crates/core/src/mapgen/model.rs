//! The shared level substrate and the public records produced alongside it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{CellContent, Edge, Pos, RoomId, TerrainKind};

use super::grid::{cells_in_range, in_bounds, manhattan, random_axis_value};
use super::rng::GenRng;

/// Terrain, room-id and content grids plus the door and forced-wall sets.
///
/// Every accessor tolerates out-of-bounds coordinates: reads return `None`
/// and writes are dropped.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainMap {
    width: usize,
    height: usize,
    terrain: Vec<TerrainKind>,
    rooms: Vec<RoomId>,
    contents: Vec<CellContent>,
    doors: BTreeSet<Edge>,
    forced_walls: BTreeSet<Edge>,
    next_room: u32,
}

impl TerrainMap {
    pub fn new(width: usize, height: usize) -> Self {
        let area = width * height;
        Self {
            width,
            height,
            terrain: vec![TerrainKind::Grass; area],
            rooms: vec![RoomId::UNASSIGNED; area],
            contents: vec![CellContent::Empty; area],
            doors: BTreeSet::new(),
            forced_walls: BTreeSet::new(),
            next_room: 1,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        in_bounds(self.width, self.height, pos)
    }

    fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    /// Every cell in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<> {
        let (width, height) = (self.width as i32, self.height as i32);
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y, x }))
    }

    pub fn terrain(&self) -> &[TerrainKind] {
        &self.terrain
    }

    pub fn room_ids(&self) -> &[RoomId] {
        &self.rooms
    }

    pub fn contents(&self) -> &[CellContent] {
        &self.contents
    }

    pub fn doors(&self) -> &BTreeSet<Edge> {
        &self.doors
    }

    pub fn forced_walls(&self) -> &BTreeSet<Edge> {
        &self.forced_walls
    }

    pub fn terrain_at(&self, pos: Pos) -> Option<TerrainKind> {
        self.index(pos).map(|index| self.terrain[index])
    }

    pub fn set_terrain(&mut self, pos: Pos, kind: TerrainKind) {
        if let Some(index) = self.index(pos) {
            self.terrain[index] = kind;
        }
    }

    pub fn is_terrain(&self, pos: Pos, kind: TerrainKind) -> bool {
        self.terrain_at(pos) == Some(kind)
    }

    pub fn room_at(&self, pos: Pos) -> Option<RoomId> {
        self.index(pos).map(|index| self.rooms[index])
    }

    pub fn content_at(&self, pos: Pos) -> Option<CellContent> {
        self.index(pos).map(|index| self.contents[index])
    }

    pub fn set_content(&mut self, pos: Pos, content: CellContent) {
        if let Some(index) = self.index(pos) {
            self.contents[index] = content;
        }
    }

    /// Registers `cells` under a fresh room id. Ids are never handed out twice.
    pub fn add_room<'a>(&mut self, cells: impl IntoIterator<Item = &'a Pos>) -> RoomId {
        let room = RoomId(self.next_room);
        self.next_room += 1;
        self.assign_room(cells, room);
        room
    }

    pub fn assign_room<'a>(&mut self, cells: impl IntoIterator<Item = &'a Pos>, room: RoomId) {
        for &pos in cells {
            if let Some(index) = self.index(pos) {
                self.rooms[index] = room;
            }
        }
    }

    pub fn room_cells(&self, room: RoomId) -> BTreeSet<Pos> {
        self.positions().filter(|&pos| self.room_at(pos) == Some(room)).collect()
    }

    pub fn room_count(&self) -> u32 {
        self.next_room - 1
    }

    fn edge(&self, a: Pos, b: Pos) -> Option<Edge> {
        if !self.in_bounds(a) || !self.in_bounds(b) {
            return None;
        }
        Edge::between(a, b)
    }

    /// Opens the boundary between two adjacent in-bounds cells. Refused for
    /// boundaries already sealed by a forced wall.
    pub fn add_door(&mut self, a: Pos, b: Pos) -> bool {
        let Some(edge) = self.edge(a, b) else {
            return false;
        };
        if self.forced_walls.contains(&edge) {
            return false;
        }
        self.doors.insert(edge);
        true
    }

    /// Seals the boundary between two adjacent in-bounds cells, replacing any door.
    pub fn add_forced_wall(&mut self, a: Pos, b: Pos) -> bool {
        let Some(edge) = self.edge(a, b) else {
            return false;
        };
        self.doors.remove(&edge);
        self.forced_walls.insert(edge);
        true
    }

    pub fn is_door(&self, a: Pos, b: Pos) -> bool {
        Edge::between(a, b).is_some_and(|edge| self.doors.contains(&edge))
    }

    pub fn is_forced_wall(&self, a: Pos, b: Pos) -> bool {
        Edge::between(a, b).is_some_and(|edge| self.forced_walls.contains(&edge))
    }

    /// Whether a walker may step from `a` to `b` under room and wall rules.
    pub fn is_open_boundary(&self, a: Pos, b: Pos) -> bool {
        if self.is_forced_wall(a, b) {
            return false;
        }
        match (self.room_at(a), self.room_at(b)) {
            (Some(room_a), Some(room_b)) => room_a == room_b || self.is_door(a, b),
            _ => false,
        }
    }

    pub fn valid_cells_in_range(&self, center: Pos, distance: u32, exact: bool) -> Vec<Pos> {
        cells_in_range(center, distance, exact)
            .into_iter()
            .filter(|&pos| self.in_bounds(pos))
            .collect()
    }

    pub fn random_x_value(&self, rng: &mut GenRng, min_pct: f64, max_pct: f64) -> i32 {
        random_axis_value(rng, self.width, min_pct, max_pct)
    }

    pub fn random_y_value(&self, rng: &mut GenRng, min_pct: f64, max_pct: f64) -> i32 {
        random_axis_value(rng, self.height, min_pct, max_pct)
    }

    pub fn random_cell(&self, rng: &mut GenRng) -> Pos {
        let x = rng.below(self.width) as i32;
        let y = rng.below(self.height) as i32;
        Pos { y, x }
    }

    /// Distance from `pos` to the closest cell of `kind`, `None` if the map has none.
    pub fn nearest_distance_to(&self, pos: Pos, kind: TerrainKind) -> Option<u32> {
        self.positions()
            .filter(|&cell| self.is_terrain(cell, kind))
            .map(|cell| manhattan(pos, cell))
            .min()
    }

    pub fn count_terrain(&self, kind: TerrainKind) -> usize {
        self.terrain.iter().filter(|&&cell| cell == kind).count()
    }

    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.area() * 6 + 64);
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        bytes.extend(self.terrain.iter().map(|kind| kind.code()));
        for room in &self.rooms {
            bytes.extend(room.0.to_le_bytes());
        }
        bytes.extend(self.contents.iter().map(|content| content.code()));
        for set in [&self.doors, &self.forced_walls] {
            bytes.extend((set.len() as u32).to_le_bytes());
            for edge in set {
                let (a, b) = edge.cells();
                for pos in [a, b] {
                    bytes.extend(pos.y.to_le_bytes());
                    bytes.extend(pos.x.to_le_bytes());
                }
            }
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GateWall {
    /// The wall at the castle's smallest y.
    Bottom,
    /// The wall at the castle's smallest x.
    Left,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastleSummary {
    pub min: Pos,
    pub max: Pos,
    pub gate: GateWall,
    pub hall: RoomId,
    pub boss_chamber: RoomId,
    pub boss: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultPlacement {
    pub name: String,
    pub center: Pos,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemPlacement {
    pub content: CellContent,
    pub pos: Pos,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub bridges: Vec<(Pos, Pos)>,
    pub castle: Option<CastleSummary>,
    pub buildings: usize,
    pub vaults: Vec<VaultPlacement>,
    pub repair_doors: usize,
    pub lava_cells: usize,
    pub items: Vec<ItemPlacement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedLevel {
    pub map: TerrainMap,
    pub report: GenerationReport,
}
