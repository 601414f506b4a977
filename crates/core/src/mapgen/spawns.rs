//! Spaced-out placement of gems, shrines and the unique items.

use std::iter::repeat_n;

use log::debug;

use crate::error::{MapGenError, Stage};
use crate::types::{CellContent, Pos};

use super::grid::manhattan;
use super::model::{ItemPlacement, TerrainMap};
use super::rng::GenRng;

pub(super) const GEM_COUNT: usize = 20;
pub(super) const SHRINE_COUNT: usize = 5;
pub(super) const OBJECTIVE_COUNT: usize =
    GEM_COUNT + SHRINE_COUNT + CellContent::UNIQUE_ITEMS.len();

pub(super) struct PlacementContext {
    pub(super) max_attempts: usize,
    pub(super) min_spacing: u32,
}

/// Puts a shrine at the origin, then samples cells until every objective has a
/// clear, empty spot at least `min_spacing` from the others.
pub(super) fn place_objectives(
    map: &mut TerrainMap,
    rng: &mut GenRng,
    context: &PlacementContext,
) -> Result<Vec<ItemPlacement>, MapGenError> {
    map.set_content(Pos::ORIGIN, CellContent::Shrine);

    let mut accepted: Vec<Pos> = Vec::with_capacity(OBJECTIVE_COUNT);
    let mut attempts = 0;
    while accepted.len() < OBJECTIVE_COUNT {
        if attempts >= context.max_attempts {
            return Err(MapGenError::RetryBudgetExhausted {
                stage: Stage::ItemPlacement,
                attempts: context.max_attempts,
            });
        }
        attempts += 1;

        let candidate = map.random_cell(rng);
        let clear = map.terrain_at(candidate).is_some_and(|terrain| terrain.is_clear());
        let empty = map.content_at(candidate) == Some(CellContent::Empty);
        let spaced = accepted.iter().all(|&other| {
            other != candidate && manhattan(candidate, other) >= context.min_spacing
        });
        if clear && empty && spaced {
            accepted.push(candidate);
        }
    }
    debug!("objectives placed after {attempts} samples");

    rng.shuffle(&mut accepted);
    let contents = repeat_n(CellContent::Gem, GEM_COUNT)
        .chain(repeat_n(CellContent::Shrine, SHRINE_COUNT))
        .chain(CellContent::UNIQUE_ITEMS);
    let placements: Vec<ItemPlacement> = accepted
        .into_iter()
        .zip(contents)
        .map(|(pos, content)| ItemPlacement { content, pos })
        .collect();
    for placement in &placements {
        map.set_content(placement.pos, placement.content);
    }
    Ok(placements)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use proptest::prelude::*;

    use super::*;
    use crate::types::TerrainKind;

    fn context(min_spacing: u32) -> PlacementContext {
        PlacementContext { max_attempts: 1000, min_spacing }
    }

    #[test]
    fn objectives_fill_the_quota_in_assignment_order() {
        let mut map = TerrainMap::new(50, 50);
        let mut rng = GenRng::new(42);
        let placements = place_objectives(&mut map, &mut rng, &context(9)).unwrap();
        assert_eq!(placements.len(), OBJECTIVE_COUNT);
        assert_eq!(map.content_at(Pos::ORIGIN), Some(CellContent::Shrine));

        let kinds: Vec<CellContent> =
            placements.iter().map(|placement| placement.content).collect();
        assert!(kinds[..GEM_COUNT].iter().all(|&kind| kind == CellContent::Gem));
        assert!(kinds[GEM_COUNT..GEM_COUNT + SHRINE_COUNT]
            .iter()
            .all(|&kind| kind == CellContent::Shrine));
        assert_eq!(&kinds[GEM_COUNT + SHRINE_COUNT..], &CellContent::UNIQUE_ITEMS);
        for placement in &placements {
            assert_eq!(map.content_at(placement.pos), Some(placement.content));
        }
    }

    #[test]
    fn objectives_avoid_blocked_and_occupied_cells() {
        let mut map = TerrainMap::new(50, 50);
        for pos in map.positions().collect::<Vec<_>>() {
            if pos.y < 10 {
                map.set_terrain(pos, TerrainKind::Water);
            } else if pos.y < 15 {
                map.set_content(pos, CellContent::Ogre);
            }
        }
        let mut rng = GenRng::new(3);
        let placements = place_objectives(&mut map, &mut rng, &context(5)).unwrap();
        assert!(placements.iter().all(|placement| placement.pos.y >= 15));
    }

    #[test]
    fn crowded_map_exhausts_the_budget() {
        let mut map = TerrainMap::new(20, 20);
        let mut rng = GenRng::new(5);
        assert_eq!(
            place_objectives(&mut map, &mut rng, &context(30)),
            Err(MapGenError::RetryBudgetExhausted { stage: Stage::ItemPlacement, attempts: 1000 })
        );
    }

    #[test]
    fn zero_spacing_still_uses_distinct_cells() {
        let mut map = TerrainMap::new(6, 6);
        let mut rng = GenRng::new(8);
        let placements = place_objectives(&mut map, &mut rng, &context(0)).unwrap();
        let cells: BTreeSet<Pos> = placements.iter().map(|placement| placement.pos).collect();
        assert_eq!(cells.len(), OBJECTIVE_COUNT);
        assert!(!cells.contains(&Pos::ORIGIN));
    }

    proptest! {
        #[test]
        fn accepted_objectives_respect_spacing(seed in any::<u64>()) {
            let mut map = TerrainMap::new(50, 50);
            let mut rng = GenRng::new(seed);
            let placements = place_objectives(&mut map, &mut rng, &context(9)).unwrap();
            prop_assert_eq!(placements.len(), OBJECTIVE_COUNT);
            for (index, first) in placements.iter().enumerate() {
                for second in &placements[index + 1..] {
                    prop_assert!(manhattan(first.pos, second.pos) >= 9);
                }
            }
        }
    }
}
