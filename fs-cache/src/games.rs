use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use data_game::{GameId, GameRecord};

use crate::max_game_age;

const LOG_PREFIX: &str = "cache/games";

/// Store details keyed by game id.
///
/// A record is normally stored under its own id. When the store answers a
/// request for one id with a record carrying another, the same record is
/// kept under both keys so the requested id is never fetched again.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameCache {
    games: BTreeMap<GameId, GameRecord>,
}

/// Result of [`GameCache::select`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    /// Matching records, each canonical game reported once
    pub games: Vec<GameRecord>,
    /// Requested ids that are not in the cache at all
    pub missing: Vec<GameId>,
    /// Requested ids that were hidden only because they are invalid
    pub skipped_invalid: Vec<GameId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Lower-cased tags across all selected games, sorted
    pub fn all_tags(&self) -> Vec<String> {
        let tags: BTreeSet<String> = self
            .games
            .iter()
            .filter_map(|game| game.tags.as_ref())
            .flatten()
            .map(|tag| tag.to_lowercase())
            .collect();
        tags.into_iter().collect()
    }
}

impl GameCache {
    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn contains(&self, id: GameId) -> bool {
        self.games.contains_key(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameId, &GameRecord)> {
        self.games.iter().map(|(id, game)| (*id, game))
    }

    /// Insert the record under `id`, replacing any previous one
    pub fn add(&mut self, id: GameId, game: GameRecord) {
        self.games.insert(id, game);
    }

    pub fn get(&self, id: GameId) -> Option<&GameRecord> {
        self.games.get(&id)
    }

    pub fn get_mut(&mut self, id: GameId) -> Option<&mut GameRecord> {
        self.games.get_mut(&id)
    }

    /// Select games matching the given criteria.
    ///
    /// A non-empty `ids` restricts the candidates to those keys. With no
    /// `tags` every remaining candidate matches, otherwise tags are
    /// compared case-insensitively and `match_all` decides between OR and
    /// AND semantics. Invalid records only match if `include_invalid` is
    /// set. Requested ids which are unknown or hidden as invalid are
    /// reported in the returned [`Selection`] and logged.
    pub fn select(
        &self,
        tags: &[String],
        ids: &[GameId],
        match_all: bool,
        include_invalid: bool,
    ) -> Selection {
        log::debug!(
            "{}: selecting games (tags: {:?}, ids: {}, and: {}, invalid: {})",
            LOG_PREFIX,
            tags,
            ids.len(),
            match_all,
            include_invalid
        );

        let wanted: BTreeSet<GameId> = ids.iter().copied().collect();
        let mut selection = Selection::default();

        let candidates: Vec<(GameId, &GameRecord)> = if wanted.is_empty() {
            self.iter().collect()
        } else {
            wanted
                .iter()
                .filter_map(|id| match self.games.get(id) {
                    Some(game) => Some((*id, game)),
                    None => {
                        selection.missing.push(*id);
                        None
                    }
                })
                .collect()
        };

        let mut seen = BTreeSet::new();
        for (id, game) in candidates {
            if game.invalid && !include_invalid {
                if !wanted.is_empty() {
                    selection.skipped_invalid.push(id);
                }
                continue;
            }

            if !matches_tags(game, tags, match_all) {
                continue;
            }

            if seen.insert(game.app_id) {
                selection.games.push(game.clone());
            }
        }

        if !selection.missing.is_empty() {
            log::error!(
                "{}: games not found in cache during select: {:?}",
                LOG_PREFIX,
                selection.missing
            );
        }
        if !selection.skipped_invalid.is_empty() {
            log::debug!(
                "{}: skipped invalid games: {:?}",
                LOG_PREFIX,
                selection.skipped_invalid
            );
        }

        selection
    }

    /// Remove the game stored under `id`.
    /// Returns true if the game was found.
    pub fn delete(&mut self, id: GameId) -> bool {
        let found = self.games.remove(&id).is_some();
        if found {
            log::debug!("{}: deleted game {}", LOG_PREFIX, id);
        } else {
            log::debug!("{}: game {} not found", LOG_PREFIX, id);
        }
        found
    }

    /// Remove the first game whose name matches `name` exactly.
    /// Returns true if a game was found.
    pub fn delete_by_name(&mut self, name: &str) -> bool {
        let id = self
            .games
            .iter()
            .find(|(_, game)| game.name == name)
            .map(|(id, _)| *id);

        match id {
            Some(id) => self.delete(id),
            None => false,
        }
    }

    /// Remove every invalid game, returning how many were removed
    pub fn purge_invalid(&mut self) -> usize {
        self.purge("invalid", |game| game.invalid)
    }

    /// Remove every game without tags, returning how many were removed
    pub fn purge_missing_tags(&mut self) -> usize {
        self.purge("missing tags", GameRecord::missing_tags)
    }

    /// Remove every game older than the freshness window
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let max_age = max_game_age();
        self.purge("expired", |game| game.is_expired(max_age, now))
    }

    /// Union of tags across all games, case preserved
    pub fn all_tags(&self) -> BTreeSet<String> {
        self.games
            .values()
            .filter_map(|game| game.tags.as_ref())
            .flatten()
            .cloned()
            .collect()
    }

    /// Keys of games whose tags were never fetched
    pub fn untagged(&self) -> Vec<GameId> {
        self.games
            .iter()
            .filter(|(_, game)| game.tags.is_none())
            .map(|(id, _)| *id)
            .collect()
    }

    fn purge(
        &mut self,
        reason: &str,
        mut predicate: impl FnMut(&GameRecord) -> bool,
    ) -> usize {
        let before = self.games.len();
        self.games.retain(|_, game| !predicate(game));
        let purged = before - self.games.len();
        log::debug!("{}: purged {} {} games", LOG_PREFIX, purged, reason);
        purged
    }
}

fn matches_tags(game: &GameRecord, tags: &[String], match_all: bool) -> bool {
    if tags.is_empty() {
        return true;
    }
    if match_all {
        tags.iter().all(|tag| game.has_tag(tag))
    } else {
        tags.iter().any(|tag| game.has_tag(tag))
    }
}
