use std::path::PathBuf;
use std::time::Duration;

use fs_storage::CACHE_FILE;

/// Number of games requested from the store at once
pub const DEFAULT_BATCH_SIZE: usize = 1;

/// Pause between two detail requests
pub const BATCH_DELAY: Duration = Duration::from_millis(600);

/// Pause between two tag requests
pub const TAG_DELAY: Duration = Duration::from_secs(1);

/// Settings of an [`crate::Aggregator`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// Location of the persisted cache document
    pub cache_path: PathBuf,
    /// Games per detail request; this is not a concurrency level
    pub batch_size: usize,
    pub batch_delay: Duration,
    pub tag_delay: Duration,
}

impl AggregatorConfig {
    pub fn new(cache_path: impl Into<PathBuf>) -> Self {
        Self {
            cache_path: cache_path.into(),
            ..Default::default()
        }
    }

    /// Set the batch size, clamped to at least one game
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn with_delays(mut self, batch: Duration, tag: Duration) -> Self {
        self.batch_delay = batch;
        self.tag_delay = tag;
        self
    }
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            cache_path: PathBuf::from(CACHE_FILE),
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: BATCH_DELAY,
            tag_delay: TAG_DELAY,
        }
    }
}
