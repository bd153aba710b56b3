//! Map storage backed by a JSON file of map records.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use habitat_core::{Grid, MapStore, MapStoreError, MemoryMapStore};
use tracing::info;

fn transport(path: &Path, err: io::Error) -> MapStoreError {
    MapStoreError::Transport(format!("{}: {err}", path.display()))
}

/// Keeps the records in memory and rewrites the whole file on every save.
#[derive(Debug)]
pub struct FileMapStore {
    path: PathBuf,
    maps: MemoryMapStore,
}

impl FileMapStore {
    /// Open `path`; a missing file is an empty store that is created on first save.
    pub fn open(path: impl Into<PathBuf>, size: usize) -> Result<Self, MapStoreError> {
        let path = path.into();
        let maps = match fs::read_to_string(&path) {
            Ok(json) => MemoryMapStore::from_json(size, &json)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => MemoryMapStore::new(size),
            Err(err) => return Err(transport(&path, err)),
        };
        Ok(Self { path, maps })
    }
}

impl MapStore for FileMapStore {
    fn list_map_names(&self) -> Result<Vec<String>, MapStoreError> {
        self.maps.list_map_names()
    }

    fn load_map(&self, name: &str) -> Result<Grid, MapStoreError> {
        self.maps.load_map(name)
    }

    fn save_map(&mut self, grid: &Grid) -> Result<(), MapStoreError> {
        let mut updated = self.maps.clone();
        updated.save_map(grid)?;
        let json = serde_json::to_string_pretty(updated.records())?;
        fs::write(&self.path, json).map_err(|err| transport(&self.path, err))?;
        info!(name = grid.name(), path = %self.path.display(), "saved map");
        self.maps = updated;
        Ok(())
    }
}
