use aggregator::AggregatorConfig;
use clap::Subcommand;

use crate::AppError;

mod games;
mod profiles;

/// Available commands for the `cache` subcommand
#[derive(Subcommand, Debug)]
pub enum Cache {
    #[command(about = "Manage cached games")]
    Games {
        #[clap(subcommand)]
        subcommand: games::GamesCache,
    },
    #[command(about = "Manage cached profiles")]
    Profiles {
        #[clap(subcommand)]
        subcommand: profiles::ProfilesCache,
    },
}

impl Cache {
    pub fn run(&self, config: &AggregatorConfig) -> Result<(), AppError> {
        let mut cache = fs_cache::Cache::open(&config.cache_path)?;
        let output = match self {
            Cache::Games { subcommand } => subcommand.run(&mut cache)?,
            Cache::Profiles { subcommand } => subcommand.run(&mut cache)?,
        };
        for line in output {
            println!("{}", line);
        }
        Ok(())
    }
}
