use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient::{member_since, null_as_default};
use crate::{is_older_than, GameId, ProfileId};

/// A community profile and the games it owns.
///
/// Profiles are unique by `steam_id64`. The vanity name (`custom_url`) is
/// only a lookup alias and may be empty.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    /// Display name
    #[serde(rename = "steamID")]
    pub steam_id: String,
    #[serde(rename = "steamID64")]
    pub steam_id64: ProfileId,
    #[serde(rename = "customURL")]
    pub custom_url: String,
    #[serde(rename = "stateMessage")]
    pub state_message: String,
    #[serde(rename = "privacyState")]
    pub privacy_state: String,
    #[serde(rename = "visibilityState")]
    pub visibility_state: i32,
    #[serde(rename = "vacBanned")]
    pub vac_banned: bool,
    #[serde(rename = "tradeBanState")]
    pub trade_ban_state: String,
    #[serde(rename = "isLimitedAccount")]
    pub is_limited_account: bool,
    pub location: String,
    #[serde(rename = "memberSince", deserialize_with = "member_since")]
    pub member_since: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub games: BTreeMap<GameId, OwnedGame>,
    #[serde(alias = "Updated")]
    pub updated: DateTime<Utc>,
}

/// Lightweight ownership info as listed on a profile
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OwnedGame {
    pub name: String,
    #[serde(rename = "appID")]
    pub app_id: GameId,
    pub hours_last_two_weeks: Option<String>,
    #[serde(rename = "playtime_total")]
    pub hours_on_record: Option<String>,
}

impl Profile {
    /// Return true if the profile was updated more than `max_age` ago
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        is_older_than(self.updated, max_age, now)
    }

    /// Match a caller-supplied identifier against the numeric identity,
    /// falling back to a case-insensitive vanity name comparison.
    pub fn matches(&self, id: &str) -> bool {
        self.matches_id(id)
            || (!self.custom_url.is_empty()
                && self.custom_url.to_lowercase() == id.to_lowercase())
    }

    /// Like [`Profile::matches`], but the vanity name must match exactly
    pub fn matches_exact(&self, id: &str) -> bool {
        self.matches_id(id)
            || (!self.custom_url.is_empty() && self.custom_url == id)
    }

    fn matches_id(&self, id: &str) -> bool {
        id.trim()
            .parse::<ProfileId>()
            .map_or(false, |parsed| parsed == self.steam_id64)
    }

    pub fn owned(&self, app_id: GameId) -> Option<&OwnedGame> {
        self.games.get(&app_id)
    }

    pub fn owned_ids(&self) -> impl Iterator<Item = GameId> + '_ {
        self.games.keys().copied()
    }
}
