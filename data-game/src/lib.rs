//! # Data Game
//!
//! `data-game` holds the records shared by the cache and the aggregator:
//! store details of a single game ([`GameRecord`]) and a community profile
//! together with the games it owns ([`Profile`]).
//!
//! Both types serialize to the layout of the persisted cache document and
//! also read the older spellings of it (`Updated`, string ages, `null`
//! lists, textual join dates).

mod game;
mod lenient;
mod profile;

pub use game::{Category, GameRecord, Platforms, Price};
pub use lenient::{parse_member_since, MEMBER_SINCE_FORMAT};
pub use profile::{OwnedGame, Profile};

use chrono::{DateTime, Duration, Utc};

/// Numeric identifier of a game in the store
pub type GameId = u32;

/// 64-bit numeric identity of a community profile
pub type ProfileId = u64;

/// Return true if `updated` lies further than `max_age` in the past of `now`
pub fn is_older_than(
    updated: DateTime<Utc>,
    max_age: Duration,
    now: DateTime<Utc>,
) -> bool {
    now.signed_duration_since(updated) > max_age
}
