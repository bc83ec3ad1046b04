//! # FS Cache
//!
//! Local caches for store details ([`GameCache`]) and community profiles
//! ([`ProfileCache`]), persisted together as one JSON document by
//! [`Cache`]. Entries expire after a fixed freshness window and are purged
//! when the cache is opened.

mod cache;
mod games;
mod profiles;

pub use cache::{Cache, CacheDocument};
pub use games::{GameCache, Selection};
pub use profiles::ProfileCache;

use chrono::Duration;

/// Days after which a cached game is purged
pub const MAX_GAME_AGE_DAYS: i64 = 30;

/// Hours after which a cached profile is purged
pub const MAX_PROFILE_AGE_HOURS: i64 = 12;

pub fn max_game_age() -> Duration {
    Duration::days(MAX_GAME_AGE_DAYS)
}

pub fn max_profile_age() -> Duration {
    Duration::hours(MAX_PROFILE_AGE_HOURS)
}
