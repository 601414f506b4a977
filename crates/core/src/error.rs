use std::fmt;

use crate::types::RoomId;

/// Bounded-retry stages that abort generation when their budget runs out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    BridgePlacement,
    BuildingPlacement,
    ItemPlacement,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::BridgePlacement => "bridge placement",
            Stage::BuildingPlacement => "building placement",
            Stage::ItemPlacement => "item placement",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MapGenError {
    #[error("map size {width}x{height} is below the {min}x{min} minimum")]
    InvalidDimensions { width: usize, height: usize, min: usize },
    #[error("{stage} gave up after {attempts} attempts")]
    RetryBudgetExhausted { stage: Stage, attempts: usize },
    #[error("no door position borders room {} ({cells} cells)", room.0)]
    NoDoorPlacement { room: RoomId, cells: usize },
}
