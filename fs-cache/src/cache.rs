use std::path::Path;

use serde::{Deserialize, Serialize};

use data_error::Result;
use fs_storage::{BaseStorage, FileStorage};

use crate::{GameCache, ProfileCache};

const LABEL: &str = "cache";

/// The persisted cache document
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheDocument {
    pub games: GameCache,
    pub profiles: ProfileCache,
}

/// Game and profile caches backed by a single JSON document.
///
/// The document is only ever read and written as a whole. Nothing guards
/// against two processes using the same file at once.
pub struct Cache {
    document: CacheDocument,
    storage: FileStorage<CacheDocument>,
}

impl Cache {
    /// Load the cache from `path` and drop everything that expired.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cache = Self::load(path)?;
        let profiles = cache.document.profiles.purge_expired();
        let games = cache.document.games.purge_expired();
        log::debug!(
            "{}: purged {} expired profiles and {} expired games",
            LABEL,
            profiles,
            games
        );
        Ok(cache)
    }

    /// Load the cache from `path`, creating an empty document if the file
    /// does not exist yet. A document that cannot be decoded is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let mut storage: FileStorage<CacheDocument> =
            FileStorage::new(LABEL, path);
        let document = storage.read_fs()?;
        log::info!(
            "{}: loaded {} games and {} profiles",
            LABEL,
            document.games.len(),
            document.profiles.len()
        );
        Ok(Self { document, storage })
    }

    /// Rewrite the whole document
    pub fn save(&mut self) -> Result<()> {
        if let Ok(true) = self.storage.needs_syncing() {
            log::warn!(
                "{}: {} was changed by someone else, overwriting it",
                LABEL,
                self.storage.path().display()
            );
        }
        log::debug!(
            "{}: saving {} games and {} profiles",
            LABEL,
            self.document.games.len(),
            self.document.profiles.len()
        );
        self.storage.write_fs(&self.document)
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    pub fn games(&self) -> &GameCache {
        &self.document.games
    }

    pub fn games_mut(&mut self) -> &mut GameCache {
        &mut self.document.games
    }

    pub fn profiles(&self) -> &ProfileCache {
        &self.document.profiles
    }

    pub fn profiles_mut(&mut self) -> &mut ProfileCache {
        &mut self.document.profiles
    }

    pub fn document(&self) -> &CacheDocument {
        &self.document
    }
}
