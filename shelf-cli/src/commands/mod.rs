use clap::Subcommand;

pub mod cache;
mod games;

#[derive(Debug, Subcommand)]
pub enum Commands {
    Games(games::Games),
    #[command(about = "Inspect and maintain the cache")]
    Cache {
        #[clap(subcommand)]
        subcommand: cache::Cache,
    },
}
