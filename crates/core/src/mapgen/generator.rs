//! Level generation entry point that validates config and runs the stage pipeline.

mod pipeline;

use log::info;

use crate::config::GeneratorConfig;
use crate::error::MapGenError;

use super::model::GeneratedLevel;
use super::vaults::{DEFAULT_VAULTS, VaultDescriptor};

pub struct LevelGenerator {
    config: GeneratorConfig,
    vaults: Vec<VaultDescriptor>,
}

impl LevelGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config, vaults: DEFAULT_VAULTS.to_vec() }
    }

    /// Replaces the vault registry; descriptors are rolled in order.
    pub fn with_vaults(mut self, vaults: Vec<VaultDescriptor>) -> Self {
        self.vaults = vaults;
        self
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn generate(&self) -> Result<GeneratedLevel, MapGenError> {
        self.config.validate()?;
        info!(
            "generating {}x{} level from seed {}",
            self.config.width, self.config.height, self.config.seed
        );
        let level = pipeline::generate_level(&self.config, &self.vaults)?;
        info!(
            "level ready: {} rooms, {} doors, fingerprint {:016x}",
            level.map.room_count(),
            level.map.doors().len(),
            level.map.fingerprint()
        );
        Ok(level)
    }
}
