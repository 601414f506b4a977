//! Generation parameters, deserializable from a config file.

use serde::{Deserialize, Serialize};

use crate::error::MapGenError;

/// Smallest width or height the pipeline accepts: at 28% of 33 cells the castle
/// is 10 wide, enough for the 5x5 boss chamber between its corner towers.
pub const MIN_DIMENSION: usize = 33;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    pub seed: u64,
    /// Samples the objective placer may draw before failing.
    pub item_attempts: usize,
    /// Island-pair draws the bridge builder may make.
    pub bridge_attempts: usize,
    /// Footprint draws the building placer may make.
    pub building_attempts: usize,
    pub vaults_enabled: bool,
    /// Minimum objective spacing is `(width + height) / item_spacing_divisor`.
    pub item_spacing_divisor: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 50,
            height: 50,
            seed: 42,
            item_attempts: 1000,
            bridge_attempts: 100,
            building_attempts: 10_000,
            vaults_enabled: true,
            item_spacing_divisor: 11,
        }
    }
}

impl GeneratorConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self { seed, ..Self::default() }
    }

    pub fn validate(&self) -> Result<(), MapGenError> {
        if self.width < MIN_DIMENSION || self.height < MIN_DIMENSION {
            return Err(MapGenError::InvalidDimensions {
                width: self.width,
                height: self.height,
                min: MIN_DIMENSION,
            });
        }
        Ok(())
    }

    pub fn min_item_spacing(&self) -> u32 {
        ((self.width + self.height) / self.item_spacing_divisor.max(1)) as u32
    }
}
