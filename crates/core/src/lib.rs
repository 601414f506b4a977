pub mod config;
pub mod error;
pub mod mapgen;
pub mod types;

pub use config::{GeneratorConfig, MIN_DIMENSION};
pub use error::{MapGenError, Stage};
pub use mapgen::{GeneratedLevel, GenerationReport, LevelGenerator, TerrainMap, generate_level};
pub use types::*;
