use std::path::PathBuf;

use aggregator::{AggregatorConfig, DEFAULT_BATCH_SIZE};
use clap::Parser;

use crate::commands::Commands;
use crate::util::default_cache_file;
use crate::AppError;

#[derive(Parser, Debug)]
#[clap(name = "shelf")]
#[clap(about = "Compare the game libraries of community profiles", long_about = None)]
pub struct Cli {
    #[clap(
        long,
        global = true,
        value_parser,
        help = "Location of the cache document"
    )]
    pub cache_file: Option<PathBuf>,

    #[clap(
        long,
        global = true,
        default_value_t = DEFAULT_BATCH_SIZE,
        help = "Number of games requested from the store at once"
    )]
    pub cache_parallel: usize,

    #[clap(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn config(&self) -> Result<AggregatorConfig, AppError> {
        let path = match &self.cache_file {
            Some(path) => path.clone(),
            None => default_cache_file()?,
        };
        Ok(AggregatorConfig::new(path).with_batch_size(self.cache_parallel))
    }

    pub fn run(&self) -> Result<(), AppError> {
        let config = self.config()?;
        match &self.command {
            Commands::Games(games) => games.run(config),
            Commands::Cache { subcommand } => subcommand.run(&config),
        }
    }
}
