use clap::Subcommand;
use data_game::GameId;
use fs_cache::Cache;

use crate::util::{format_game, PRINT_NAME_WIDTH};
use crate::AppError;

/// Available commands for the `cache games` subcommand
#[derive(Subcommand, Debug)]
pub enum GamesCache {
    #[command(about = "Remove games the store could not describe")]
    PurgeInvalid,
    #[command(about = "Remove games without tags")]
    PurgeMissingTags,
    #[command(about = "Show cache statistics")]
    Info,
    Print(Print),
    Delete(Delete),
}

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "print", about = "Print cached games")]
pub struct Print {
    #[clap(long, short, help = "Only print games with this tag")]
    tag: Vec<String>,
    #[clap(long, help = "Only print the game stored under this id")]
    appid: Vec<GameId>,
    #[clap(long, action, help = "Require every given tag instead of any")]
    and: bool,
    #[clap(long, action, help = "Include invalid games")]
    invalid: bool,
}

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "delete", about = "Delete games from the cache")]
pub struct Delete {
    #[clap(long, help = "Delete the game stored under this id")]
    appid: Vec<GameId>,
    #[clap(long, help = "Delete the game with exactly this name")]
    name: Vec<String>,
}

impl GamesCache {
    /// Apply the command to `cache`, saving it if anything may have
    /// changed, and return the lines to print
    pub fn run(&self, cache: &mut Cache) -> Result<Vec<String>, AppError> {
        let output = match self {
            GamesCache::PurgeInvalid => {
                let purged = cache.games_mut().purge_invalid();
                cache.save()?;
                vec![format!("Purged {} invalid games from cache", purged)]
            }
            GamesCache::PurgeMissingTags => {
                let purged = cache.games_mut().purge_missing_tags();
                cache.save()?;
                vec![format!(
                    "Purged {} games with missing tags from cache",
                    purged
                )]
            }
            GamesCache::Info => vec![
                "=== Game Cache Information ===".to_owned(),
                format!("Total games: {}", cache.games().len()),
                format!("Unique tags: {}", cache.games().all_tags().len()),
            ],
            GamesCache::Print(print) => print.run(cache),
            GamesCache::Delete(delete) => delete.run(cache)?,
        };
        Ok(output)
    }
}

impl Print {
    fn run(&self, cache: &Cache) -> Vec<String> {
        cache
            .games()
            .select(&self.tag, &self.appid, self.and, self.invalid)
            .games
            .iter()
            .map(|game| format_game(game, PRINT_NAME_WIDTH, false))
            .collect()
    }
}

impl Delete {
    fn run(&self, cache: &mut Cache) -> Result<Vec<String>, AppError> {
        let mut removed = 0;
        for id in &self.appid {
            if cache.games_mut().delete(*id) {
                removed += 1;
            } else {
                eprintln!("Failed to remove game {}", id);
            }
        }
        for name in &self.name {
            if cache.games_mut().delete_by_name(name) {
                removed += 1;
            } else {
                eprintln!("Failed to remove game {:?}", name);
            }
        }
        cache.save()?;

        Ok(vec![format!(
            "Removed {} games from cache (requested {})",
            removed,
            self.appid.len() + self.name.len()
        )])
    }
}
