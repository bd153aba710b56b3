//! Map wire format and the map-storage contract.
//!
//! On the wire a map is its name plus `SIZE * SIZE` tile codes in row-major order:
//!
//! ```json
//! { "name": "Map-Grid", "tiles": [2, 0, 2, 0, ...] }
//! ```
//!
//! Storage itself belongs to whoever implements [`MapStore`]; this crate ships an
//! in-memory store seeded with the built-in maps.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::grid::Grid;
use crate::TileType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("map must have exactly {expected} tiles, got {actual}")]
    WrongTileCount { expected: usize, actual: usize },
    #[error("tile {index} has invalid code {code} (expected 0, 1 or 2)")]
    InvalidTileCode { index: usize, code: u8 },
    #[error("map name is required")]
    EmptyName,
}

#[derive(Debug, Error)]
pub enum MapStoreError {
    #[error("map not found: {0}")]
    NotFound(String),
    #[error("map already exists: {0}")]
    AlreadyExists(String),
    #[error(transparent)]
    Invalid(#[from] MapError),
    #[error("failed to decode map records: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("map storage unavailable: {0}")]
    Transport(String),
}

/// A named grid as exchanged with map storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapRecord {
    pub name: String,
    pub tiles: Vec<u8>,
}

impl MapRecord {
    /// Check name, tile count and tile codes without building a grid.
    pub fn validate(&self, size: usize) -> Result<(), MapError> {
        if self.name.trim().is_empty() {
            return Err(MapError::EmptyName);
        }
        let expected = size * size;
        if self.tiles.len() != expected {
            return Err(MapError::WrongTileCount {
                expected,
                actual: self.tiles.len(),
            });
        }
        if let Some((index, &code)) = self
            .tiles
            .iter()
            .enumerate()
            .find(|&(_, &code)| TileType::from_code(code).is_none())
        {
            return Err(MapError::InvalidTileCode { index, code });
        }
        Ok(())
    }

    /// Decode into a `size` x `size` grid. Rejects the record outright rather
    /// than building a partial grid.
    pub fn to_grid(&self, size: usize) -> Result<Grid, MapError> {
        let expected = size * size;
        if self.tiles.len() != expected {
            return Err(MapError::WrongTileCount {
                expected,
                actual: self.tiles.len(),
            });
        }
        let types = self
            .tiles
            .iter()
            .enumerate()
            .map(|(index, &code)| {
                TileType::from_code(code).ok_or(MapError::InvalidTileCode { index, code })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Grid::create(self.name.clone(), size, |pos| {
            types[pos.y * size + pos.x]
        }))
    }
}

impl From<&Grid> for MapRecord {
    fn from(grid: &Grid) -> Self {
        MapRecord {
            name: grid.name().to_string(),
            tiles: grid.tile_codes(),
        }
    }
}

/// Map storage collaborator.
pub trait MapStore {
    fn list_map_names(&self) -> Result<Vec<String>, MapStoreError>;

    fn load_map(&self, name: &str) -> Result<Grid, MapStoreError>;

    fn save_map(&mut self, grid: &Grid) -> Result<(), MapStoreError>;
}

/// Map storage kept in memory, in insertion order.
#[derive(Debug, Clone)]
pub struct MemoryMapStore {
    size: usize,
    records: Vec<MapRecord>,
}

impl MemoryMapStore {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            records: Vec::new(),
        }
    }

    /// Store holding the three built-in 8x8 maps.
    pub fn with_builtin_maps() -> Self {
        Self {
            size: BUILTIN_MAP_SIZE,
            records: builtin_maps(),
        }
    }

    /// Store seeded from records, each validated against `size`.
    pub fn from_records(size: usize, records: Vec<MapRecord>) -> Result<Self, MapStoreError> {
        let mut store = Self::new(size);
        for record in records {
            store.insert(record)?;
        }
        Ok(store)
    }

    /// Store seeded from a JSON array of map records.
    pub fn from_json(size: usize, json: &str) -> Result<Self, MapStoreError> {
        let records: Vec<MapRecord> = serde_json::from_str(json)?;
        Self::from_records(size, records)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn records(&self) -> &[MapRecord] {
        &self.records
    }

    fn insert(&mut self, record: MapRecord) -> Result<(), MapStoreError> {
        if let Err(err) = record.validate(self.size) {
            warn!(name = %record.name, %err, "rejected map");
            return Err(err.into());
        }
        if self.records.iter().any(|r| r.name == record.name) {
            warn!(name = %record.name, "rejected duplicate map name");
            return Err(MapStoreError::AlreadyExists(record.name));
        }
        debug!(name = %record.name, "stored map");
        self.records.push(record);
        Ok(())
    }
}

impl MapStore for MemoryMapStore {
    fn list_map_names(&self) -> Result<Vec<String>, MapStoreError> {
        Ok(self.records.iter().map(|r| r.name.clone()).collect())
    }

    fn load_map(&self, name: &str) -> Result<Grid, MapStoreError> {
        let record = self
            .records
            .iter()
            .find(|r| r.name == name)
            .ok_or_else(|| MapStoreError::NotFound(name.to_string()))?;
        Ok(record.to_grid(self.size)?)
    }

    fn save_map(&mut self, grid: &Grid) -> Result<(), MapStoreError> {
        if grid.size() != self.size {
            return Err(MapError::WrongTileCount {
                expected: self.size * self.size,
                actual: grid.size() * grid.size(),
            }
            .into());
        }
        self.insert(MapRecord::from(grid))
    }
}

// ============================================================================
// BUILT-IN MAPS
// ============================================================================

const BUILTIN_MAP_SIZE: usize = 8;

#[rustfmt::skip]
const MAP_CHILL: [u8; 64] = [
    2, 2, 2, 0, 0, 0, 1, 1,
    2, 2, 2, 2, 2, 0, 1, 1,
    1, 1, 2, 2, 2, 2, 2, 1,
    1, 1, 0, 2, 2, 2, 2, 2,
    1, 0, 0, 0, 0, 0, 2, 2,
    0, 0, 1, 1, 0, 0, 0, 0,
    0, 1, 1, 1, 1, 1, 0, 0,
    1, 1, 1, 1, 1, 1, 1, 0,
];

const MAP_FOREST: [u8; 64] = [1; 64];

#[rustfmt::skip]
const MAP_GRID: [u8; 64] = [
    2, 0, 2, 0, 2, 0, 2, 0,
    0, 1, 0, 1, 0, 1, 0, 1,
    2, 0, 2, 0, 2, 0, 2, 0,
    0, 1, 0, 1, 0, 1, 0, 1,
    2, 0, 2, 0, 2, 0, 2, 0,
    0, 1, 0, 1, 0, 1, 0, 1,
    2, 0, 2, 0, 2, 0, 2, 0,
    0, 1, 0, 1, 0, 1, 0, 1,
];

/// The maps every fresh map store starts with.
pub fn builtin_maps() -> Vec<MapRecord> {
    [
        ("Map-Chill", &MAP_CHILL),
        ("Map-Forest", &MAP_FOREST),
        ("Map-Grid", &MAP_GRID),
    ]
    .into_iter()
    .map(|(name, tiles)| MapRecord {
        name: name.to_string(),
        tiles: tiles.to_vec(),
    })
    .collect()
}
