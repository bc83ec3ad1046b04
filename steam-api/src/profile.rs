use std::collections::BTreeMap;

use chrono::Utc;
use serde::Deserialize;

use data_error::{Result, ShelfError};
use data_game::{parse_member_since, GameId, OwnedGame, Profile, ProfileId};

const LOG_PREFIX: &str = "steam/profile";

// Flags and numbers are kept as text: the community pages are not
// consistent about empty elements.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlProfile {
    error: Option<String>,
    #[serde(rename = "steamID")]
    steam_id: String,
    #[serde(rename = "steamID64")]
    steam_id64: String,
    #[serde(rename = "customURL")]
    custom_url: String,
    #[serde(rename = "stateMessage")]
    state_message: String,
    #[serde(rename = "privacyState")]
    privacy_state: String,
    #[serde(rename = "visibilityState")]
    visibility_state: String,
    #[serde(rename = "vacBanned")]
    vac_banned: String,
    #[serde(rename = "tradeBanState")]
    trade_ban_state: String,
    #[serde(rename = "isLimitedAccount")]
    is_limited_account: String,
    #[serde(rename = "memberSince")]
    member_since: String,
    location: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlGamesList {
    error: Option<String>,
    games: XmlGames,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlGames {
    game: Vec<XmlGame>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct XmlGame {
    #[serde(rename = "appID")]
    app_id: GameId,
    name: String,
    #[serde(rename = "hoursLast2Weeks")]
    hours_last_two_weeks: Option<String>,
    #[serde(rename = "hoursOnRecord")]
    hours_on_record: Option<String>,
}

/// Decode a community profile page (`?xml=1`) requested for `id`.
///
/// The returned profile owns no games yet and is stamped with the
/// current time.
pub fn parse_profile(id: &str, xml: &str) -> Result<Profile> {
    let raw: XmlProfile = quick_xml::de::from_str(xml).map_err(|err| {
        ShelfError::Parse(format!("profile {} is not valid XML: {}", id, err))
    })?;
    check_error(id, raw.error.as_deref())?;

    let steam_id64 = raw
        .steam_id64
        .trim()
        .parse::<ProfileId>()
        .unwrap_or_default();
    if steam_id64 == 0 {
        return Err(ShelfError::Resolution(
            id.to_owned(),
            "the response carries no profile".to_owned(),
        ));
    }

    let member_since = parse_member_since(&raw.member_since);
    if member_since.is_none() && !raw.member_since.trim().is_empty() {
        log::warn!(
            "{}: could not parse member date {:?} of {}",
            LOG_PREFIX,
            raw.member_since,
            steam_id64
        );
    }

    let profile = Profile {
        steam_id: raw.steam_id,
        steam_id64,
        custom_url: raw.custom_url,
        state_message: raw.state_message,
        privacy_state: raw.privacy_state,
        visibility_state: raw.visibility_state.trim().parse().unwrap_or(0),
        vac_banned: flag(&raw.vac_banned),
        trade_ban_state: raw.trade_ban_state,
        is_limited_account: flag(&raw.is_limited_account),
        location: raw.location,
        member_since,
        games: BTreeMap::new(),
        updated: Utc::now(),
    };
    log::debug!(
        "{}: decoded profile {} ({})",
        LOG_PREFIX,
        profile.steam_id,
        profile.steam_id64
    );
    Ok(profile)
}

/// Decode the game list of a profile (`games?tab=all&xml=1`).
///
/// A private profile answers with an error document, which fails the
/// resolution of `id`.
pub fn parse_games(
    id: &str,
    xml: &str,
) -> Result<BTreeMap<GameId, OwnedGame>> {
    let raw: XmlGamesList = quick_xml::de::from_str(xml).map_err(|err| {
        ShelfError::Parse(format!("games of {} are invalid XML: {}", id, err))
    })?;
    check_error(id, raw.error.as_deref())?;

    let games: BTreeMap<GameId, OwnedGame> = raw
        .games
        .game
        .into_iter()
        .map(|game| {
            let owned = OwnedGame {
                name: game.name,
                app_id: game.app_id,
                hours_last_two_weeks: game.hours_last_two_weeks,
                hours_on_record: game.hours_on_record,
            };
            (owned.app_id, owned)
        })
        .collect();
    log::debug!("{}: {} owns {} games", LOG_PREFIX, id, games.len());
    Ok(games)
}

fn check_error(id: &str, error: Option<&str>) -> Result<()> {
    match error.map(str::trim) {
        Some(message) if !message.is_empty() => Err(ShelfError::Resolution(
            id.to_owned(),
            message.to_owned(),
        )),
        _ => Ok(()),
    }
}

fn flag(text: &str) -> bool {
    matches!(text.trim(), "1" | "true")
}
