use crate::domain::model::ItemId;
use crate::domain::ports::FavoritesStorage;

/// The visitor's favorites list.
///
/// Loaded once from storage and written back after every toggle. If storage
/// fails at any point the store keeps working in memory for the rest of the
/// session and stops touching storage.
pub struct FavoritesStore<S: FavoritesStorage> {
    ids: Vec<ItemId>,
    storage: S,
    persistent: bool,
}

impl<S: FavoritesStorage> FavoritesStore<S> {
    pub fn load(storage: S) -> Self {
        let (ids, persistent) = match storage.load() {
            Ok(stored) => (dedup(stored), true),
            Err(e) => {
                tracing::warn!(
                    "Favorites storage unreadable, starting with an empty list: {}",
                    e
                );
                (Vec::new(), false)
            }
        };

        tracing::debug!("Loaded {} favorites (persistent: {})", ids.len(), persistent);
        Self {
            ids,
            storage,
            persistent,
        }
    }

    pub fn is_favorite(&self, id: ItemId) -> bool {
        self.ids.contains(&id)
    }

    /// Flip membership of `id` and persist. Returns the new membership.
    pub fn toggle(&mut self, id: ItemId) -> bool {
        let now_favorite = match self.ids.iter().position(|existing| *existing == id) {
            Some(index) => {
                self.ids.remove(index);
                false
            }
            None => {
                self.ids.push(id);
                true
            }
        };

        tracing::debug!("Villa #{} favorite: {}", id, now_favorite);
        self.persist();
        now_favorite
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }

    pub fn list(&self) -> Vec<ItemId> {
        self.ids.clone()
    }

    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn persist(&mut self) {
        if !self.persistent {
            return;
        }
        if let Err(e) = self.storage.save(&self.ids) {
            tracing::warn!(
                "Could not save favorites, keeping them in memory for this session: {}",
                e
            );
            self.persistent = false;
        }
    }
}

impl<S: FavoritesStorage + std::fmt::Debug> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("ids", &self.ids)
            .field("storage", &self.storage)
            .field("persistent", &self.persistent)
            .finish()
    }
}

fn dedup(stored: Vec<ItemId>) -> Vec<ItemId> {
    let mut ids = Vec::with_capacity(stored.len());
    for id in stored {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
