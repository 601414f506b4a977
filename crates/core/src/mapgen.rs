//! Procedural level generation split into one submodule per stage.

pub mod connectivity;
pub mod grid;
pub mod model;
pub mod paths;
pub mod rng;
pub mod vaults;

mod buildings;
mod castle;
mod deserts;
mod forests;
mod generator;
mod lava;
mod rooms;
mod spawns;
mod water;

use crate::config::GeneratorConfig;
use crate::error::MapGenError;

pub use generator::LevelGenerator;
pub use model::{
    CastleSummary, GateWall, GeneratedLevel, GenerationReport, ItemPlacement, TerrainMap,
    VaultPlacement,
};
pub use rng::GenRng;
pub use vaults::{DEFAULT_VAULTS, DESERT_PYRAMID, VaultDescriptor};

pub fn generate_level(config: GeneratorConfig) -> Result<GeneratedLevel, MapGenError> {
    LevelGenerator::new(config).generate()
}

#[cfg(test)]
mod tests {
    use super::{GeneratorConfig, LevelGenerator};

    #[test]
    fn generate_level_matches_level_generator_output() {
        let config = GeneratorConfig::with_seed(123);

        let from_helper = super::generate_level(config.clone());
        let from_generator = LevelGenerator::new(config).generate();

        assert_eq!(from_helper, from_generator);
    }
}
