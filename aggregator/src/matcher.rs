//! Set algebra over per-client ownership sets.

use std::collections::{BTreeSet, HashMap};

use data_game::GameId;

/// Games present in at least one of the sets
pub fn all<'a, I>(sets: I) -> BTreeSet<GameId>
where
    I: IntoIterator<Item = &'a BTreeSet<GameId>>,
{
    sets.into_iter().flatten().copied().collect()
}

/// Games present in every one of the sets.
///
/// Counts in how many sets each id appears and keeps the ids seen in all
/// of them. No sets means no common games.
pub fn common<'a, I>(sets: I) -> BTreeSet<GameId>
where
    I: IntoIterator<Item = &'a BTreeSet<GameId>>,
{
    let mut counts: HashMap<GameId, usize> = HashMap::new();
    let mut total = 0;
    for set in sets {
        total += 1;
        for id in set {
            *counts.entry(*id).or_default() += 1;
        }
    }

    counts
        .into_iter()
        .filter(|(_, count)| *count == total)
        .map(|(id, _)| id)
        .collect()
}
