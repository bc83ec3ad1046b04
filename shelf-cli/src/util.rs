use std::path::PathBuf;

use data_game::{GameRecord, Profile};
use fs_storage::CACHE_FILE;

use crate::AppError;

/// Width of the name column of `games`
pub const GAMES_NAME_WIDTH: usize = 40;

/// Width of the name column of `cache games print`
pub const PRINT_NAME_WIDTH: usize = 32;

pub fn default_cache_file() -> Result<PathBuf, AppError> {
    dirs::cache_dir()
        .map(|dir| dir.join(CACHE_FILE))
        .ok_or(AppError::CacheDirNotFound)
}

/// One line per game: id, name and categories. With `mark_invalid` the
/// name of an invalid record gets an ` (INVALID)` suffix.
pub fn format_game(
    game: &GameRecord,
    name_width: usize,
    mark_invalid: bool,
) -> String {
    let name = if mark_invalid && game.invalid {
        format!("{} (INVALID)", game.name)
    } else {
        game.name.clone()
    };
    format!(
        "{:<8}: {:<width$} : {}",
        game.app_id,
        name,
        game.category_names().join(", "),
        width = name_width
    )
}

pub fn format_profile(profile: &Profile) -> String {
    let vanity = if profile.custom_url.is_empty() {
        String::new()
    } else {
        format!(" ({})", profile.custom_url)
    };
    format!(
        "{:<20}: {}{} : {} games, updated {}",
        profile.steam_id64,
        profile.steam_id,
        vanity,
        profile.games.len(),
        profile.updated.format("%Y-%m-%d %H:%M")
    )
}
