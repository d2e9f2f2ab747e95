use crate::domain::model::ItemId;
use crate::domain::ports::FavoritesStorage;
use crate::utils::error::{Result, VillaError};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Favorites kept as a JSON array in a local file, e.g. `[3, 1, 7]`.
#[derive(Debug, Clone)]
pub struct JsonFileFavoritesStorage {
    path: PathBuf,
}

impl JsonFileFavoritesStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, e: impl std::fmt::Display) -> VillaError {
        VillaError::PersistenceUnavailable {
            message: format!("{}: {}", self.path.display(), e),
        }
    }
}

impl FavoritesStorage for JsonFileFavoritesStorage {
    fn load(&self) -> Result<Vec<ItemId>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = fs::read(&self.path).map_err(|e| self.unavailable(e))?;
        serde_json::from_slice(&data).map_err(|e| self.unavailable(e))
    }

    fn save(&self, ids: &[ItemId]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.unavailable(e))?;
        }

        let data = serde_json::to_vec(ids)?;
        fs::write(&self.path, data).map_err(|e| self.unavailable(e))
    }
}

/// Favorites that only live as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryFavoritesStorage {
    ids: Arc<Mutex<Vec<ItemId>>>,
}

impl MemoryFavoritesStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ids(ids: Vec<ItemId>) -> Self {
        Self {
            ids: Arc::new(Mutex::new(ids)),
        }
    }
}

impl FavoritesStorage for MemoryFavoritesStorage {
    fn load(&self) -> Result<Vec<ItemId>> {
        Ok(self.ids.lock().map(|ids| ids.clone()).unwrap_or_default())
    }

    fn save(&self, ids: &[ItemId]) -> Result<()> {
        if let Ok(mut stored) = self.ids.lock() {
            *stored = ids.to_vec();
        }
        Ok(())
    }
}
