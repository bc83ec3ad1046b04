use std::collections::{BTreeMap, BTreeSet};
use std::thread;

use data_error::{Result, ShelfError};
use data_game::{GameId, GameRecord};

use crate::aggregator::LOG_PREFIX;
use crate::{Aggregator, DetailOutcome, DetailService, TagService};

impl<B: DetailService> Aggregator<B> {
    /// Fetch store details for every owned game that is not cached yet.
    ///
    /// Games are requested in batches of the configured size and the cache
    /// is saved after every batch, so an aborted run can be resumed by
    /// calling this again. Invalid cached games are not fetched again.
    /// Returns the number of records stored.
    pub fn update_game_cache(&mut self) -> Result<usize> {
        let mut wanted: BTreeSet<GameId> = self
            .owned_ids()
            .into_iter()
            .filter(|id| !self.cache.games().contains(*id))
            .collect();
        log::debug!("{}: {} games to fetch", LOG_PREFIX, wanted.len());

        let batch_size = self.config.batch_size.max(1);
        let mut stored = 0;
        let mut first = true;
        while !wanted.is_empty() {
            if !first {
                thread::sleep(self.config.batch_delay);
            }
            first = false;

            let batch: Vec<GameId> =
                wanted.iter().take(batch_size).copied().collect();
            log::debug!("{}: fetching games {:?}", LOG_PREFIX, batch);
            let mut response = self.backend.fetch_details(&batch)?;

            for requested in batch {
                let outcome = response.remove(&requested).ok_or_else(|| {
                    ShelfError::ContractViolation(format!(
                        "game {} is missing from the detail response",
                        requested
                    ))
                })?;
                stored += self.store_outcome(requested, outcome, &mut wanted);
            }

            self.cache.save()?;
        }

        self.cache.save()?;
        Ok(stored)
    }

    fn store_outcome(
        &mut self,
        requested: GameId,
        outcome: DetailOutcome,
        wanted: &mut BTreeSet<GameId>,
    ) -> usize {
        let record = match outcome {
            DetailOutcome::Found(record) => record,
            DetailOutcome::Unavailable => {
                log::warn!(
                    "{}: store has no details for game {}",
                    LOG_PREFIX,
                    requested
                );
                let name = match self.cache.profiles().find_game(requested) {
                    Some(name) => name.to_owned(),
                    None => {
                        log::error!(
                            "{}: could not backfill game {} from profiles",
                            LOG_PREFIX,
                            requested
                        );
                        String::new()
                    }
                };
                GameRecord::invalid(requested, name)
            }
        };

        let received = record.app_id;
        let mut stored = 1;
        if received != requested {
            log::warn!(
                "{}: requested game {} but received {}",
                LOG_PREFIX,
                requested,
                received
            );
            self.cache.games_mut().add(requested, record.clone());
            wanted.remove(&requested);
            stored += 1;
        }

        self.cache.games_mut().add(received, record);
        wanted.remove(&received);
        stored
    }
}

impl<B: TagService> Aggregator<B> {
    /// Fetch tags for every cached game that has none yet.
    ///
    /// Failures are logged and leave the game untagged for a later run.
    /// The cache is saved after every successful fetch. Returns the number
    /// of records that received tags.
    pub fn update_game_tags(&mut self) -> Result<usize> {
        // Records stored under a mismatched id share tags with the
        // canonical one, so each canonical id is fetched once.
        let mut pending: BTreeMap<GameId, Vec<GameId>> = BTreeMap::new();
        for key in self.cache.games().untagged() {
            if let Some(game) = self.cache.games().get(key) {
                pending.entry(game.app_id).or_default().push(key);
            }
        }
        log::debug!("{}: {} games to tag", LOG_PREFIX, pending.len());

        let mut updated = 0;
        let mut first = true;
        for (app_id, keys) in pending {
            if !first {
                thread::sleep(self.config.tag_delay);
            }
            first = false;

            let tags = match self.backend.fetch_tags(app_id) {
                Ok(tags) => tags,
                Err(err) => {
                    log::error!(
                        "{}: failed fetching tags for game {}: {}",
                        LOG_PREFIX,
                        app_id,
                        err
                    );
                    continue;
                }
            };
            log::debug!(
                "{}: retrieved tags for game {}: {:?}",
                LOG_PREFIX,
                app_id,
                tags
            );

            for key in keys {
                if let Some(game) = self.cache.games_mut().get_mut(key) {
                    game.tags = Some(tags.clone());
                    updated += 1;
                }
            }
            self.cache.save()?;
        }

        Ok(updated)
    }
}
