use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, COOKIE, USER_AGENT};
use tokio::runtime::Runtime;
use url::Url;

use aggregator::{DetailOutcome, DetailService, ProfileResolver, TagService};
use data_error::{Result, ShelfError};
use data_game::{GameId, Profile, ProfileId};

use crate::config::SteamStoreConfig;
use crate::details::parse_details;
use crate::profile::{parse_games, parse_profile};
use crate::tags::{app_page, parse_tags};

const LOG_PREFIX: &str = "steam/store";

/// Cookies passing the age gate of mature store pages
const AGE_GATE: &str =
    "birthtime=156729601; lastagecheckage=1-0-1987; wants_mature_content=1";

/// Blocking client for the community site and the store.
///
/// Every request runs on a runtime owned by the store, so the value must
/// not be used from within another async context.
pub struct SteamStore {
    config: SteamStoreConfig,
    client: reqwest::Client,
    runtime: Runtime,
}

impl SteamStore {
    pub fn new(config: SteamStoreConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent).map_err(|err| {
                ShelfError::Parse(format!("invalid user agent: {}", err))
            })?,
        );
        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        let runtime = Runtime::new()?;

        Ok(Self {
            config,
            client,
            runtime,
        })
    }

    pub fn config(&self) -> &SteamStoreConfig {
        &self.config
    }

    /// Resolve `id` into a profile including its games.
    ///
    /// Numeric identifiers are looked up as 64-bit ids, anything else as a
    /// vanity name.
    pub async fn profile(&self, id: &str) -> Result<Profile> {
        let trimmed = id.trim();
        let kind = if trimmed.parse::<ProfileId>().is_ok() {
            "profiles"
        } else {
            "id"
        };
        let url = self.community_url(&[kind, trimmed], &[("xml", "1")])?;
        let body = self.get(url, None).await?;
        let mut profile = parse_profile(id, &body)?;

        let steam_id64 = profile.steam_id64.to_string();
        let url = self.community_url(
            &["profiles", steam_id64.as_str(), "games"],
            &[("tab", "all"), ("xml", "1")],
        )?;
        let body = self.get(url, None).await?;
        profile.games = parse_games(id, &body)?;

        Ok(profile)
    }

    /// Request details of all `ids` at once
    pub async fn details(
        &self,
        ids: &[GameId],
    ) -> Result<HashMap<GameId, DetailOutcome>> {
        let joined: Vec<String> = ids.iter().map(ToString::to_string).collect();
        let mut url = Url::parse(&format!(
            "{}/api/appdetails/",
            self.config.store_url
        ))?;
        // The store expects the ids separated by plain commas
        url.set_query(Some(&format!("appids={}", joined.join(","))));

        let body = self.get(url, None).await?;
        parse_details(&body)
    }

    pub async fn tags(&self, id: GameId) -> Result<Vec<String>> {
        let page = app_page(&self.config.store_url, id);
        let url = Url::parse(&page)?;
        let body = self.get(url, Some(AGE_GATE)).await?;
        parse_tags(&body, &page)
    }

    async fn get(&self, url: Url, cookies: Option<&str>) -> Result<String> {
        log::debug!("{}: GET {}", LOG_PREFIX, url);
        let mut request = self.client.get(url);
        if let Some(cookies) = cookies {
            request = request.header(COOKIE, cookies);
        }

        let response = request.send().await?;
        log::debug!("{}: got response {}", LOG_PREFIX, response.status());
        Ok(response.error_for_status()?.text().await?)
    }

    fn community_url(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> Result<Url> {
        let mut url = Url::parse(&self.config.community_url)?;
        url.path_segments_mut()
            .map_err(|_| {
                ShelfError::Parse("community url cannot be a base".to_owned())
            })?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut().extend_pairs(query);
        Ok(url)
    }
}

impl ProfileResolver for SteamStore {
    fn resolve(&self, id: &str) -> Result<Profile> {
        self.runtime.block_on(self.profile(id))
    }
}

impl DetailService for SteamStore {
    fn fetch_details(
        &self,
        ids: &[GameId],
    ) -> Result<HashMap<GameId, DetailOutcome>> {
        self.runtime.block_on(self.details(ids))
    }
}

impl TagService for SteamStore {
    fn fetch_tags(&self, id: GameId) -> Result<Vec<String>> {
        self.runtime.block_on(self.tags(id))
    }
}
