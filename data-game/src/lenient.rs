//! Field decoders that accept every shape older cache files carry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Layout of a profile's join date, e.g. "March 14, 2011"
pub const MEMBER_SINCE_FORMAT: &str = "%B %d, %Y";

/// Parse a join date as printed on community profiles
pub fn parse_member_since(text: &str) -> Option<DateTime<Utc>> {
    NaiveDate::parse_from_str(text.trim(), MEMBER_SINCE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Age {
    Number(u64),
    Text(String),
    Other(IgnoredAny),
}

/// Ages come as numbers or as numeric strings. Anything else is 0.
pub(crate) fn required_age<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let age = match Age::deserialize(deserializer)? {
        Age::Number(n) => u32::try_from(n).ok(),
        Age::Text(text) => text.trim().parse().ok(),
        Age::Other(_) => None,
    };
    Ok(age.unwrap_or(0))
}

/// `null` decodes to the default value
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// RFC 3339 timestamps, or the raw date text of a community profile.
/// Unreadable or empty text decodes to `None`.
pub(crate) fn member_since<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = Option::<String>::deserialize(deserializer)?;
    Ok(text.and_then(|text| {
        DateTime::parse_from_rfc3339(text.trim())
            .map(|date| date.with_timezone(&Utc))
            .ok()
            .or_else(|| parse_member_since(&text))
    }))
}
