use std::collections::HashMap;

use data_error::Result;
use data_game::{GameId, GameRecord, Profile};

/// Turns a caller-supplied identifier into a profile.
pub trait ProfileResolver {
    /// Resolve a numeric id or vanity name into a profile, including the
    /// games it currently owns.
    fn resolve(&self, id: &str) -> Result<Profile>;
}

/// Answer of the detail service for a single requested game
#[derive(Clone, Debug, PartialEq)]
pub enum DetailOutcome {
    /// The store described the game. The record's own id may differ from
    /// the requested one.
    Found(GameRecord),
    /// The store reported the request as unsuccessful
    Unavailable,
}

/// Bulk store details.
pub trait DetailService {
    /// Fetch details for `ids` in one request.
    ///
    /// Every requested id must be present in the returned map; a missing
    /// entry is a contract violation.
    fn fetch_details(
        &self,
        ids: &[GameId],
    ) -> Result<HashMap<GameId, DetailOutcome>>;
}

/// Free-text tags of a single game.
pub trait TagService {
    fn fetch_tags(&self, id: GameId) -> Result<Vec<String>>;
}
