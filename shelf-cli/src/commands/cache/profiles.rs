use clap::Subcommand;
use fs_cache::Cache;

use crate::util::format_profile;
use crate::AppError;

/// Available commands for the `cache profiles` subcommand
#[derive(Subcommand, Debug)]
pub enum ProfilesCache {
    Remove(Remove),
    #[command(about = "List cached profiles")]
    List,
}

#[derive(Clone, Debug, clap::Args)]
#[clap(name = "remove", about = "Remove profiles from the cache")]
pub struct Remove {
    #[clap(
        required = true,
        help = "64-bit ids or exact vanity names of the profiles"
    )]
    ids: Vec<String>,
}

impl ProfilesCache {
    pub fn run(&self, cache: &mut Cache) -> Result<Vec<String>, AppError> {
        match self {
            ProfilesCache::Remove(remove) => remove.run(cache),
            ProfilesCache::List => {
                Ok(cache.profiles().iter().map(format_profile).collect())
            }
        }
    }
}

impl Remove {
    fn run(&self, cache: &mut Cache) -> Result<Vec<String>, AppError> {
        let mut removed = 0;
        for id in &self.ids {
            if cache.profiles_mut().remove(id) {
                removed += 1;
            } else {
                eprintln!("Failed to remove profile {}", id);
            }
        }
        cache.save()?;

        Ok(vec![format!(
            "Removed {} profiles from cache (requested {})",
            removed,
            self.ids.len()
        )])
    }
}
