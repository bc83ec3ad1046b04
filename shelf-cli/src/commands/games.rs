use aggregator::{Aggregator, AggregatorConfig};
use fs_cache::Selection;
use steam_api::{SteamStore, SteamStoreConfig};

use crate::util::{format_game, GAMES_NAME_WIDTH};
use crate::AppError;

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "games", about = "List the games owned by the given profiles")]
pub struct Games {
    #[clap(required = true, help = "64-bit ids or vanity names of the profiles")]
    ids: Vec<String>,
    #[clap(long, action, help = "Do not fetch details of uncached games")]
    no_auto_cache: bool,
    #[clap(long, action, help = "Fetch tags of cached games that have none")]
    fetch_tags: bool,
    #[clap(long, short, help = "Only list games with this tag")]
    tag: Vec<String>,
    #[clap(long, short, action, help = "Only list games everyone owns")]
    common: bool,
    #[clap(long, action, help = "Require every given tag instead of any")]
    and: bool,
    #[clap(long, action, help = "Include games the store cannot describe")]
    invalid: bool,
    #[clap(long, action, help = "Print the tags of the selection instead")]
    tags_only: bool,
}

impl Games {
    pub fn run(&self, config: AggregatorConfig) -> Result<(), AppError> {
        let store = SteamStore::new(SteamStoreConfig::default())?;
        let mut aggregator = Aggregator::new(config, store)?;

        for id in &self.ids {
            if let Err(err) = aggregator.add_client(id) {
                eprintln!("Could not add client {}: {}", id, err);
            }
        }
        if aggregator.clients().next().is_none() {
            return Err(AppError::NoClients);
        }

        if !self.no_auto_cache {
            if let Err(err) = aggregator.update_game_cache() {
                eprintln!("Could not update game cache: {}", err);
            }
        }

        if self.fetch_tags {
            if let Err(err) = aggregator.update_game_tags() {
                eprintln!("Could not fetch game tags: {}", err);
            }
        }

        // Profiles resolved above must survive a run without updates
        aggregator.cache_mut().save()?;

        let selection =
            aggregator.select(&self.tag, self.common, self.and, self.invalid);
        log::debug!("Selected {} games", selection.len());
        for line in self.render(&selection) {
            println!("{}", line);
        }

        Ok(())
    }

    fn render(&self, selection: &Selection) -> Vec<String> {
        if self.tags_only {
            selection.all_tags()
        } else {
            selection
                .games
                .iter()
                .map(|game| format_game(game, GAMES_NAME_WIDTH, true))
                .collect()
        }
    }
}
