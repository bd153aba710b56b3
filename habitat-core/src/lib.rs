//! Habitat game logic: place animal tokens on a grid of typed tiles to score points.
//!
//! # Rules
//!
//! ```text
//! Grid:      SIZE x SIZE tiles (SIZE = 8), each PLAIN, TREE or WATER.
//! Animals:   BEAR and FOX live on ground (PLAIN/TREE), FISH lives on WATER.
//! Placement: an empty tile + a selected animal with inventory left.
//! Score:     rule.points + sum of neighbour weights in a Chebyshev window
//!            (|dx| <= radius, |dy| <= radius, centre excluded), floored at 0.
//!            Empty neighbours weigh by tile type, occupied ones by animal.
//! Turns:     while score >= limit: turn += 1, every inventory += 1,
//!            limit += 8 * turn.
//! Game over: no animal with inventory left has a legal empty tile.
//! ```
//!
//! # Tile Codes (map wire format)
//!
//! ```text
//! 0 = PLAIN, 1 = TREE, 2 = WATER; SIZE*SIZE codes, row-major.
//! ```
//!
//! The crate performs no I/O of its own. Map loading and saving go through the
//! [`map::MapStore`] trait, and presentation layers observe the engine through
//! [`engine::GameObserver`] or the read-only accessors on [`engine::GameState`].

pub mod config;
pub mod engine;
pub mod grid;
pub mod history;
pub mod map;
pub mod names;
pub mod rules;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

use std::fmt;
use std::ops::Index;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::{ConfigError, GameConfig};
pub use engine::{EngineError, GameEngine, GameObserver, GameState, PlaceOutcome, Snapshot};
pub use grid::{Grid, GridError, Tile};
pub use history::{CommandHistory, HistoryError, PlaceCommand};
pub use map::{MapError, MapRecord, MapStore, MapStoreError, MemoryMapStore};
pub use rules::{Contributions, ScoreRule};
pub use session::Session;

/// Terrain of a tile. Fixed when the grid is created.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum TileType {
    Plain = 0,
    Tree = 1,
    Water = 2,
}

impl TileType {
    pub const ALL: [TileType; 3] = [TileType::Plain, TileType::Tree, TileType::Water];

    /// Wire code of this tile type.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Convert a wire code (0, 1, 2) to a TileType.
    #[inline]
    pub fn from_code(code: u8) -> Option<TileType> {
        match code {
            0 => Some(TileType::Plain),
            1 => Some(TileType::Tree),
            2 => Some(TileType::Water),
            _ => None,
        }
    }

    #[inline]
    pub fn is_water(self) -> bool {
        self == TileType::Water
    }

    /// Pick a tile type uniformly at random.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> TileType {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TileType::Plain => "plain",
            TileType::Tree => "tree",
            TileType::Water => "water",
        })
    }
}

/// An animal token the player can place.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Animal {
    Bear,
    Fish,
    Fox,
}

impl Animal {
    pub const ALL: [Animal; 3] = [Animal::Bear, Animal::Fish, Animal::Fox];

    /// Dense index (0, 1, 2) used by per-animal tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Animal::Bear => 0,
            Animal::Fish => 1,
            Animal::Fox => 2,
        }
    }

    /// Terrain compatibility: fish only on water, bears and foxes never on water.
    #[inline]
    pub fn can_live_on(self, tile_type: TileType) -> bool {
        match self {
            Animal::Bear | Animal::Fox => !tile_type.is_water(),
            Animal::Fish => tile_type.is_water(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Animal::Bear => "bear",
            Animal::Fish => "fish",
            Animal::Fox => "fox",
        }
    }
}

impl fmt::Display for Animal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when parsing an animal name fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown animal: {0:?}")]
pub struct UnknownAnimal(pub String);

impl FromStr for Animal {
    type Err = UnknownAnimal;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bear" | "b" => Ok(Animal::Bear),
            "fish" | "f" => Ok(Animal::Fish),
            "fox" | "x" => Ok(Animal::Fox),
            _ => Err(UnknownAnimal(s.to_string())),
        }
    }
}

/// Tile coordinates, `x` is the column and `y` the row.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub x: usize,
    pub y: usize,
}

impl Pos {
    #[inline]
    pub const fn new(x: usize, y: usize) -> Pos {
        Pos { x, y }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Remaining placeable tokens per animal.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Inventory {
    pub bear: u32,
    pub fish: u32,
    pub fox: u32,
}

impl Inventory {
    #[inline]
    pub const fn new(bear: u32, fish: u32, fox: u32) -> Inventory {
        Inventory { bear, fish, fox }
    }

    #[inline]
    pub fn count(&self, animal: Animal) -> u32 {
        match animal {
            Animal::Bear => self.bear,
            Animal::Fish => self.fish,
            Animal::Fox => self.fox,
        }
    }

    fn slot(&mut self, animal: Animal) -> &mut u32 {
        match animal {
            Animal::Bear => &mut self.bear,
            Animal::Fish => &mut self.fish,
            Animal::Fox => &mut self.fox,
        }
    }

    /// Grant `n` more tokens of every animal.
    pub fn grant_all(&mut self, n: u32) {
        for animal in Animal::ALL {
            *self.slot(animal) += n;
        }
    }

    /// Remove one token. Returns false (and leaves the count at 0) when none are left.
    pub fn take(&mut self, animal: Animal) -> bool {
        let slot = self.slot(animal);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn is_empty(&self) -> bool {
        self.bear == 0 && self.fish == 0 && self.fox == 0
    }

    pub fn total(&self) -> u32 {
        self.bear + self.fish + self.fox
    }

    pub fn iter(&self) -> impl Iterator<Item = (Animal, u32)> + '_ {
        Animal::ALL.into_iter().map(move |a| (a, self.count(a)))
    }
}

impl Index<Animal> for Inventory {
    type Output = u32;

    fn index(&self, animal: Animal) -> &u32 {
        match animal {
            Animal::Bear => &self.bear,
            Animal::Fish => &self.fish,
            Animal::Fox => &self.fox,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_type_codes_roundtrip() {
        for tile_type in TileType::ALL {
            assert_eq!(TileType::from_code(tile_type.code()), Some(tile_type));
        }
        assert_eq!(TileType::from_code(3), None);
        assert_eq!(TileType::Plain.code(), 0);
        assert_eq!(TileType::Tree.code(), 1);
        assert_eq!(TileType::Water.code(), 2);
    }

    #[test]
    fn test_animal_terrain() {
        assert!(Animal::Bear.can_live_on(TileType::Plain));
        assert!(Animal::Bear.can_live_on(TileType::Tree));
        assert!(!Animal::Bear.can_live_on(TileType::Water));

        assert!(Animal::Fox.can_live_on(TileType::Plain));
        assert!(Animal::Fox.can_live_on(TileType::Tree));
        assert!(!Animal::Fox.can_live_on(TileType::Water));

        assert!(!Animal::Fish.can_live_on(TileType::Plain));
        assert!(!Animal::Fish.can_live_on(TileType::Tree));
        assert!(Animal::Fish.can_live_on(TileType::Water));
    }

    #[test]
    fn test_animal_from_str() {
        assert_eq!("bear".parse::<Animal>(), Ok(Animal::Bear));
        assert_eq!(" FISH ".parse::<Animal>(), Ok(Animal::Fish));
        assert_eq!("x".parse::<Animal>(), Ok(Animal::Fox));
        assert!("wolf".parse::<Animal>().is_err());
    }

    #[test]
    fn test_animal_index_matches_all() {
        for (i, animal) in Animal::ALL.into_iter().enumerate() {
            assert_eq!(animal.index(), i);
        }
    }

    #[test]
    fn test_inventory_take_and_grant() {
        let mut inventory = Inventory::new(1, 0, 0);
        assert!(inventory.take(Animal::Bear));
        assert_eq!(inventory[Animal::Bear], 0);
        assert!(!inventory.take(Animal::Bear));
        assert_eq!(inventory[Animal::Bear], 0);
        assert!(inventory.is_empty());

        inventory.grant_all(1);
        assert_eq!(inventory, Inventory::new(1, 1, 1));
        assert_eq!(inventory.total(), 3);
    }
}
