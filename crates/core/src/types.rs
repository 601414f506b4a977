use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

impl Pos {
    pub const ORIGIN: Pos = Pos { y: 0, x: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { y, x }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { y: self.y + dy, x: self.x + dx }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Grass,
    Tree,
    Water,
    Building,
    Desert,
    Lava,
    Road,
}

impl TerrainKind {
    pub const ALL: [TerrainKind; 7] = [
        TerrainKind::Grass,
        TerrainKind::Tree,
        TerrainKind::Water,
        TerrainKind::Building,
        TerrainKind::Desert,
        TerrainKind::Lava,
        TerrainKind::Road,
    ];

    /// Walkable without any equipment.
    pub const fn is_clear(self) -> bool {
        matches!(
            self,
            TerrainKind::Grass | TerrainKind::Desert | TerrainKind::Building | TerrainKind::Road
        )
    }

    pub const fn label(self) -> &'static str {
        match self {
            TerrainKind::Grass => "Grass",
            TerrainKind::Tree => "Tree",
            TerrainKind::Water => "Water",
            TerrainKind::Building => "Building",
            TerrainKind::Desert => "Desert",
            TerrainKind::Lava => "Lava",
            TerrainKind::Road => "Road",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            TerrainKind::Grass => "#92D050",
            TerrainKind::Tree => "#548235",
            TerrainKind::Water => "#00B0F0",
            TerrainKind::Building => "#999999",
            TerrainKind::Desert => "#FFD966",
            TerrainKind::Lava => "#FF0000",
            TerrainKind::Road => "#C2B280",
        }
    }

    pub const fn glyph(self) -> char {
        match self {
            TerrainKind::Grass => '.',
            TerrainKind::Tree => 'T',
            TerrainKind::Water => '~',
            TerrainKind::Building => '#',
            TerrainKind::Desert => ':',
            TerrainKind::Lava => '^',
            TerrainKind::Road => '=',
        }
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            TerrainKind::Grass => 0,
            TerrainKind::Tree => 1,
            TerrainKind::Water => 2,
            TerrainKind::Building => 3,
            TerrainKind::Desert => 4,
            TerrainKind::Lava => 5,
            TerrainKind::Road => 6,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CellContent {
    #[default]
    Empty,
    Shrine,
    Seal,
    Ogre,
    Boss,
    Dragon,
    Gem,
    DesertCloak,
    WaterBoots,
    FireShield,
    Bow,
    Blessing,
    Axe,
    /// Reward whose identity is decided after generation.
    Item,
}

impl CellContent {
    /// Unique named items handed out by the objective placer, in assignment order.
    pub const UNIQUE_ITEMS: [CellContent; 6] = [
        CellContent::DesertCloak,
        CellContent::WaterBoots,
        CellContent::FireShield,
        CellContent::Bow,
        CellContent::Blessing,
        CellContent::Axe,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            CellContent::Empty => "Empty",
            CellContent::Shrine => "Shrine",
            CellContent::Seal => "Seal",
            CellContent::Ogre => "Ogre",
            CellContent::Boss => "Boss",
            CellContent::Dragon => "Dragon",
            CellContent::Gem => "Gem",
            CellContent::DesertCloak => "Cloak",
            CellContent::WaterBoots => "Boots",
            CellContent::FireShield => "Shield",
            CellContent::Bow => "Bow",
            CellContent::Blessing => "Blessing",
            CellContent::Axe => "Axe",
            CellContent::Item => "Item",
        }
    }

    pub const fn symbol(self) -> &'static str {
        match self {
            CellContent::Empty => "",
            CellContent::Shrine | CellContent::Seal => "\u{26e4}",
            CellContent::Ogre => "\u{1f479}",
            CellContent::Boss => "\u{2620}",
            CellContent::Dragon => "\u{3de}",
            CellContent::Gem => "\u{25c6}",
            CellContent::DesertCloak
            | CellContent::WaterBoots
            | CellContent::FireShield
            | CellContent::Bow
            | CellContent::Blessing
            | CellContent::Axe => "\u{2605}",
            CellContent::Item => "?",
        }
    }

    pub const fn color(self) -> Option<&'static str> {
        match self {
            CellContent::Empty => None,
            CellContent::Shrine => Some("#00B0F0"),
            CellContent::Seal => Some("#FF0000"),
            CellContent::Ogre | CellContent::Boss => Some("#C00000"),
            CellContent::Dragon => Some("#548235"),
            CellContent::Gem => Some("#FFFFFF"),
            CellContent::DesertCloak => Some("#CCFF00"),
            CellContent::WaterBoots => Some("#00F0F0"),
            CellContent::FireShield => Some("#FF0000"),
            CellContent::Bow => Some("#00FF00"),
            CellContent::Blessing => Some("#0000FF"),
            CellContent::Axe => Some("#FF8000"),
            CellContent::Item => Some("#FF00FF"),
        }
    }

    /// Single-character marker for plain-text previews.
    pub const fn glyph(self) -> Option<char> {
        match self {
            CellContent::Empty => None,
            CellContent::Shrine => Some('S'),
            CellContent::Seal => Some('s'),
            CellContent::Ogre => Some('o'),
            CellContent::Boss => Some('B'),
            CellContent::Dragon => Some('D'),
            CellContent::Gem => Some('*'),
            CellContent::DesertCloak
            | CellContent::WaterBoots
            | CellContent::FireShield
            | CellContent::Bow
            | CellContent::Blessing
            | CellContent::Axe => Some('!'),
            CellContent::Item => Some('?'),
        }
    }

    pub(crate) const fn code(self) -> u8 {
        match self {
            CellContent::Empty => 0,
            CellContent::Shrine => 1,
            CellContent::Seal => 2,
            CellContent::Ogre => 3,
            CellContent::Boss => 4,
            CellContent::Dragon => 5,
            CellContent::Gem => 6,
            CellContent::DesertCloak => 7,
            CellContent::WaterBoots => 8,
            CellContent::FireShield => 9,
            CellContent::Bow => 10,
            CellContent::Blessing => 11,
            CellContent::Axe => 12,
            CellContent::Item => 13,
        }
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RoomId(pub u32);

impl RoomId {
    pub const UNASSIGNED: RoomId = RoomId(0);

    pub const fn is_assigned(self) -> bool {
        self.0 != 0
    }
}

/// Boundary between two 4-adjacent cells, stored with its endpoints sorted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    a: Pos,
    b: Pos,
}

impl Edge {
    /// Returns `None` unless the two cells are exactly one step apart.
    pub fn between(first: Pos, second: Pos) -> Option<Self> {
        if first.x.abs_diff(second.x) + first.y.abs_diff(second.y) != 1 {
            return None;
        }
        let (a, b) = if first <= second { (first, second) } else { (second, first) };
        Some(Self { a, b })
    }

    pub const fn cells(self) -> (Pos, Pos) {
        (self.a, self.b)
    }

    pub fn touches(self, pos: Pos) -> bool {
        self.a == pos || self.b == pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_is_order_independent() {
        let left = Pos::new(3, 4);
        let right = Pos::new(4, 4);
        assert_eq!(Edge::between(left, right), Edge::between(right, left));
    }

    #[test]
    fn edge_rejects_non_adjacent_pairs() {
        let origin = Pos::ORIGIN;
        assert!(Edge::between(origin, origin).is_none());
        assert!(Edge::between(origin, Pos::new(1, 1)).is_none());
        assert!(Edge::between(origin, Pos::new(2, 0)).is_none());
        assert!(Edge::between(origin, Pos::new(0, -1)).is_some());
    }

    #[test]
    fn clear_terrain_matches_walkable_set() {
        let clear: Vec<_> = TerrainKind::ALL.into_iter().filter(|kind| kind.is_clear()).collect();
        assert_eq!(
            clear,
            vec![TerrainKind::Grass, TerrainKind::Building, TerrainKind::Desert, TerrainKind::Road]
        );
    }
}
