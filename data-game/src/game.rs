use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::lenient::{null_as_default, required_age};
use crate::{is_older_than, GameId};

/// Store details of a single game.
///
/// A record is created by the first detail fetch, successful or not.
/// Failed fetches produce an `invalid` record that only carries a
/// best-effort name. Tags stay `None` until an enrichment pass fills them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameRecord {
    #[serde(rename = "_is_invalid")]
    pub invalid: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    #[serde(rename = "steam_appid")]
    pub app_id: GameId,
    #[serde(deserialize_with = "required_age")]
    pub required_age: u32,
    pub detailed_description: String,
    pub short_description: String,
    pub supported_languages: String,
    pub website: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub developers: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub publishers: Vec<String>,
    #[serde(rename = "price_overview")]
    pub price: Option<Price>,
    pub platforms: Platforms,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<Category>,
    pub tags: Option<Vec<String>>,
    #[serde(alias = "Updated")]
    pub updated: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Price {
    pub currency: String,
    pub initial: i64,
    #[serde(rename = "final")]
    pub final_price: i64,
    pub discount_percent: i64,
    pub initial_formatted: String,
    pub final_formatted: String,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(default)]
pub struct Platforms {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: i64,
    pub description: String,
}

impl GameRecord {
    /// Create a record for a game the store refused to describe.
    ///
    /// `name` is whatever could be recovered from cached profiles and may
    /// be empty.
    pub fn invalid(app_id: GameId, name: impl Into<String>) -> Self {
        Self {
            invalid: true,
            name: name.into(),
            app_id,
            updated: Utc::now(),
            ..Default::default()
        }
    }

    /// Return true if the record was updated more than `max_age` ago
    pub fn is_expired(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        is_older_than(self.updated, max_age, now)
    }

    /// Case-insensitive tag membership. Records without tags match nothing.
    pub fn has_tag(&self, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        self.tags.as_ref().map_or(false, |tags| {
            tags.iter()
                .any(|tag| tag.to_lowercase() == wanted)
        })
    }

    /// Return true if tags were never fetched or came back empty
    pub fn missing_tags(&self) -> bool {
        self.tags
            .as_ref()
            .map_or(true, |tags| tags.is_empty())
    }

    /// Descriptions of all categories, in store order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|c| c.description.as_str())
            .collect()
    }
}
