//! Fixed stage order that turns one seeded stream into a finished level.

use log::debug;

use crate::config::GeneratorConfig;
use crate::error::MapGenError;

use super::super::buildings::generate_buildings;
use super::super::castle::generate_castle;
use super::super::deserts::generate_deserts;
use super::super::forests::{generate_forests, scatter_trees};
use super::super::lava::generate_lava;
use super::super::model::{GeneratedLevel, GenerationReport, TerrainMap};
use super::super::rng::GenRng;
use super::super::rooms::repair_unreachable_rooms;
use super::super::spawns::{PlacementContext, place_objectives};
use super::super::vaults::{VaultDescriptor, apply_vaults};
use super::super::water::{generate_bridges, generate_rivers};

pub(super) fn generate_level(
    config: &GeneratorConfig,
    vaults: &[VaultDescriptor],
) -> Result<GeneratedLevel, MapGenError> {
    let mut map = TerrainMap::new(config.width, config.height);
    let mut rng = GenRng::new(config.seed);
    let mut report = GenerationReport::default();

    generate_rivers(&mut map, &mut rng);
    generate_deserts(&mut map, &mut rng);
    report.bridges = generate_bridges(&mut map, &mut rng, config.bridge_attempts)?;
    debug!("terrain pass done with {} bridges", report.bridges.len());

    report.castle = Some(generate_castle(&mut map, &mut rng)?);
    report.buildings = generate_buildings(&mut map, &mut rng, config.building_attempts)?;
    if config.vaults_enabled {
        report.vaults = apply_vaults(&mut map, &mut rng, vaults);
    }
    report.repair_doors = repair_unreachable_rooms(&mut map, &mut rng)?;
    debug!("structures done: {} rooms, {} doors", map.room_count(), map.doors().len());

    report.lava_cells = generate_lava(&mut map, &mut rng);
    generate_forests(&mut map, &mut rng);
    scatter_trees(&mut map, &mut rng);

    let placement = PlacementContext {
        max_attempts: config.item_attempts,
        min_spacing: config.min_item_spacing(),
    };
    report.items = place_objectives(&mut map, &mut rng, &placement)?;

    Ok(GeneratedLevel { map, report })
}
