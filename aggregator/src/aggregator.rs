use std::collections::{BTreeMap, BTreeSet};

use data_error::{Result, ShelfError};
use data_game::GameId;
use fs_cache::{Cache, Selection};

use crate::matcher;
use crate::{AggregatorConfig, Client, ProfileResolver};

pub(crate) const LOG_PREFIX: &str = "aggregator";

/// Registry of clients sharing one cache.
///
/// `B` is the backend providing the external collaborators. Each group of
/// operations only requires the collaborator it talks to.
pub struct Aggregator<B> {
    pub(crate) clients: BTreeMap<String, Client>,
    pub(crate) cache: Cache,
    pub(crate) backend: B,
    pub(crate) config: AggregatorConfig,
}

impl<B> Aggregator<B> {
    /// Open the cache at the configured location and start with no clients
    pub fn new(config: AggregatorConfig, backend: B) -> Result<Self> {
        let cache = Cache::open(&config.cache_path)?;
        Ok(Self::with_cache(config, cache, backend))
    }

    pub fn with_cache(
        config: AggregatorConfig,
        cache: Cache,
        backend: B,
    ) -> Self {
        Self {
            clients: BTreeMap::new(),
            cache,
            backend,
            config,
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    pub fn clients(&self) -> impl Iterator<Item = &Client> {
        self.clients.values()
    }

    pub fn client(&self, id: &str) -> Option<&Client> {
        self.clients.get(id)
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut Cache {
        &mut self.cache
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Select cached games across all clients.
    ///
    /// With `common` only games owned by every client are considered,
    /// otherwise games owned by any client. The resulting id set restricts
    /// [`fs_cache::GameCache::select`]; an empty set selects nothing.
    pub fn select(
        &self,
        tags: &[String],
        common: bool,
        match_all: bool,
        include_invalid: bool,
    ) -> Selection {
        let sets: Vec<BTreeSet<GameId>> =
            self.clients.values().map(Client::owned_ids).collect();
        for (client, set) in self.clients.keys().zip(&sets) {
            log::debug!(
                "{}: client {} owns {} games",
                LOG_PREFIX,
                client,
                set.len()
            );
        }

        let wanted = if common {
            matcher::common(&sets)
        } else {
            matcher::all(&sets)
        };

        if wanted.is_empty() {
            log::warn!(
                "{}: no {} games across {} clients",
                LOG_PREFIX,
                if common { "common" } else { "owned" },
                sets.len()
            );
            return Selection::default();
        }

        let wanted: Vec<GameId> = wanted.into_iter().collect();
        self.cache
            .games()
            .select(tags, &wanted, match_all, include_invalid)
    }

    /// Union of every client's owned games
    pub(crate) fn owned_ids(&self) -> BTreeSet<GameId> {
        self.clients
            .values()
            .flat_map(|client| client.profile().owned_ids())
            .collect()
    }
}

impl<B: ProfileResolver> Aggregator<B> {
    /// Register a client for `id`.
    ///
    /// A fresh cached profile is reused as is. Otherwise the profile is
    /// resolved through the backend and added to the profile cache.
    pub fn add_client(&mut self, id: &str) -> Result<&Client> {
        if self.clients.contains_key(id) {
            return Err(ShelfError::DuplicateClient(id.to_owned()));
        }

        let client = match self.cache.profiles_mut().find(id) {
            Some(profile) => {
                log::debug!(
                    "{}: reusing cached profile {}",
                    LOG_PREFIX,
                    profile.steam_id
                );
                Client::new(id, profile.clone())
            }
            None => {
                log::debug!("{}: resolving profile {}", LOG_PREFIX, id);
                let profile = self.backend.resolve(id)?;
                self.cache.profiles_mut().add(profile.clone());
                Client::new(id, profile)
            }
        };

        log::info!(
            "{}: new client {} ({}, {} games)",
            LOG_PREFIX,
            id,
            client.profile().steam_id,
            client.profile().games.len()
        );
        let client: &Client =
            self.clients.entry(id.to_owned()).or_insert(client);
        Ok(client)
    }
}
