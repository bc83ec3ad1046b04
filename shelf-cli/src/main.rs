use clap::Parser;

mod cli;
mod commands;
mod error;
mod util;

use cli::Cli;
pub use error::AppError;

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(err) = cli.run() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}
