use std::collections::HashMap;

use chrono::Utc;
use serde::Deserialize;
use serde_json::{Map, Value};

use aggregator::DetailOutcome;
use data_error::{Result, ShelfError};
use data_game::{GameId, GameRecord};

const LOG_PREFIX: &str = "steam/details";

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Value>,
}

/// Decode an `appdetails` response into one outcome per answered id.
///
/// The store answers `null` instead of an object when it is rate limiting
/// or cannot serve the requested batch size; that is an error. Ids the
/// store did not answer for are simply absent from the map.
pub fn parse_details(body: &str) -> Result<HashMap<GameId, DetailOutcome>> {
    if body.trim() == "null" {
        return Err(ShelfError::Rejected(
            "rate limit exceeded or unsupported batch size".to_owned(),
        ));
    }

    let entries: HashMap<String, Entry> = serde_json::from_str(body)?;
    let mut outcomes = HashMap::with_capacity(entries.len());
    for (key, entry) in entries {
        let requested: GameId = key.trim().parse()?;
        let outcome = match entry.data {
            Some(Value::Object(data)) if entry.success => {
                DetailOutcome::Found(decode_game(requested, data)?)
            }
            _ if entry.success => {
                log::warn!(
                    "{}: successful answer without data for game {}",
                    LOG_PREFIX,
                    requested
                );
                DetailOutcome::Unavailable
            }
            _ => DetailOutcome::Unavailable,
        };
        outcomes.insert(requested, outcome);
    }
    Ok(outcomes)
}

fn decode_game(
    requested: GameId,
    mut data: Map<String, Value>,
) -> Result<GameRecord> {
    let required_age = data
        .remove("required_age")
        .map_or(0, |age| required_age(requested, &age));

    // Absent and null fields both take their default
    let nulls: Vec<String> = data
        .iter()
        .filter(|(_, value)| value.is_null())
        .map(|(key, _)| key.clone())
        .collect();
    for key in nulls {
        data.remove(&key);
    }

    let mut game: GameRecord = serde_json::from_value(Value::Object(data))?;
    if game.app_id == 0 {
        game.app_id = requested;
    }
    game.required_age = required_age;
    game.invalid = false;
    game.tags = None;
    game.updated = Utc::now();
    Ok(game)
}

/// The store reports ages both as numbers and as strings
fn required_age(id: GameId, age: &Value) -> u32 {
    let parsed = match age {
        Value::Number(number) => {
            number.as_u64().and_then(|n| u32::try_from(n).ok())
        }
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        log::debug!(
            "{}: could not convert required age {} of game {}",
            LOG_PREFIX,
            age,
            id
        );
        0
    })
}
