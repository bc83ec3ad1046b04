//! # Aggregator
//!
//! Combines the game libraries of several community profiles.
//!
//! An [`Aggregator`] keeps one [`Client`] per registered identifier and a
//! [`fs_cache::Cache`]. It answers set queries across the clients (games
//! owned by anyone, or by everyone) and keeps the game cache in sync with
//! the store through the [`DetailService`] and [`TagService`]
//! collaborators.
//!
//! ## Examples
//! ```no_run
//! use aggregator::{Aggregator, AggregatorConfig};
//! # fn run<B>(backend: B) -> data_error::Result<()>
//! # where B: aggregator::ProfileResolver + aggregator::DetailService {
//! let config = AggregatorConfig::new("cache.json").with_batch_size(5);
//! let mut aggregator = Aggregator::new(config, backend)?;
//! aggregator.add_client("76561197960287930")?;
//! aggregator.add_client("gabelogannewell")?;
//! aggregator.update_game_cache()?;
//!
//! let common = aggregator.select(&["Action".to_owned()], true, false, false);
//! for game in common.games {
//!     println!("{}: {}", game.app_id, game.name);
//! }
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod client;
mod config;
pub mod matcher;
mod services;
mod update;

#[cfg(test)]
mod tests;

pub use crate::aggregator::Aggregator;
pub use client::Client;
pub use config::{
    AggregatorConfig, BATCH_DELAY, DEFAULT_BATCH_SIZE, TAG_DELAY,
};
pub use services::{DetailOutcome, DetailService, ProfileResolver, TagService};
