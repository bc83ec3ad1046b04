use std::time::Duration;

use url::Url;

use data_error::Result;

pub const COMMUNITY_URL: &str = "https://steamcommunity.com";
pub const STORE_URL: &str = "https://store.steampowered.com";

/// Limit for a single request, connection included
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

pub const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:102.0) Gecko/20100101 Firefox/102.0";

/// Connection settings of a [`crate::SteamStore`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SteamStoreConfig {
    /// Base of the community site, without trailing slash
    pub community_url: String,
    /// Base of the store, without trailing slash
    pub store_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl SteamStoreConfig {
    /// Point both endpoints somewhere else, e.g. a local mirror
    pub fn with_urls(mut self, community: &str, store: &str) -> Result<Self> {
        self.community_url = base_url(community)?;
        self.store_url = base_url(store)?;
        Ok(self)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for SteamStoreConfig {
    fn default() -> Self {
        Self {
            community_url: COMMUNITY_URL.to_owned(),
            store_url: STORE_URL.to_owned(),
            timeout: REQUEST_TIMEOUT,
            user_agent: USER_AGENT.to_owned(),
        }
    }
}

fn base_url(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    Ok(parsed.as_str().trim_end_matches('/').to_owned())
}
