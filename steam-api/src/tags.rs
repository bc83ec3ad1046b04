use scraper::{Html, Selector};

use data_error::{Result, ShelfError};
use data_game::GameId;

const LOG_PREFIX: &str = "steam/tags";

/// Address of the store page of `id` below `store_url`
pub fn app_page(store_url: &str, id: GameId) -> String {
    format!("{}/app/{}", store_url.trim_end_matches('/'), id)
}

/// Extract the user tags of a store page.
///
/// `page` is the address the page was requested from. The store answers
/// unknown or age-gated games with some other page, so the document must
/// carry a `<meta content>` pointing back at `page`; anything else is an
/// error. A valid page without tags yields an empty list.
pub fn parse_tags(html: &str, page: &str) -> Result<Vec<String>> {
    let document = Html::parse_document(html);

    let meta = selector("meta[content]")?;
    let valid = document.select(&meta).any(|element| {
        element
            .value()
            .attr("content")
            .map_or(false, |content| points_at(content, page))
    });
    if !valid {
        log::debug!("{}: validity check failed for {}", LOG_PREFIX, page);
        return Err(ShelfError::Rejected(format!(
            "{} did not return the requested store page",
            page
        )));
    }

    let tag = selector("a.app_tag")?;
    let tags: Vec<String> = document
        .select(&tag)
        .map(|element| element.text().collect::<String>().trim().to_owned())
        .filter(|text| !text.is_empty())
        .collect();
    if tags.is_empty() {
        log::warn!("{}: did not find any tags on {}", LOG_PREFIX, page);
    }
    Ok(tags)
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|err| {
        ShelfError::Parse(format!("invalid selector {}: {:?}", css, err))
    })
}

// `.../app/10` must not accept the page of app 100
fn points_at(content: &str, page: &str) -> bool {
    content
        .strip_prefix(page)
        .map_or(false, |rest| !rest.starts_with(|c: char| c.is_ascii_digit()))
}
