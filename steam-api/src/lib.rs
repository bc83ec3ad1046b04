//! # Steam API
//!
//! HTTP implementations of the collaborators used by [`aggregator`]:
//! profile resolution through the community XML pages, bulk game details
//! through the store JSON endpoint, and game tags scraped from the store
//! page of a single game.
//!
//! [`SteamStore`] owns its own runtime and exposes the synchronous traits
//! [`aggregator::ProfileResolver`], [`aggregator::DetailService`] and
//! [`aggregator::TagService`]. The decoding functions are public so they
//! can be used on payloads obtained elsewhere.

mod config;
mod details;
mod profile;
mod store;
mod tags;

pub use config::{
    SteamStoreConfig, COMMUNITY_URL, REQUEST_TIMEOUT, STORE_URL, USER_AGENT,
};
pub use details::parse_details;
pub use profile::{parse_games, parse_profile};
pub use store::SteamStore;
pub use tags::{app_page, parse_tags};
