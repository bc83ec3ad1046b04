use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use data_game::{GameId, Profile};

use crate::max_profile_age;

const LOG_PREFIX: &str = "cache/profiles";

/// Ordered collection of cached profiles.
///
/// Insertion deduplicates by numeric identity, so duplicates can only come
/// from a hand-edited or otherwise anomalous cache document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileCache {
    profiles: Vec<Profile>,
}

impl ProfileCache {
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.iter()
    }

    /// Add the profile to the cache.
    ///
    /// Expired profiles are rejected. Every entry sharing the numeric
    /// identity is replaced; the profile is appended if there was none.
    /// Returns true if the profile was stored.
    pub fn add(&mut self, profile: Profile) -> bool {
        self.add_at(profile, Utc::now())
    }

    pub fn add_at(&mut self, profile: Profile, now: DateTime<Utc>) -> bool {
        if profile.is_expired(max_profile_age(), now) {
            log::warn!(
                "{}: attempted to add an expired profile {} ({}), updated {}",
                LOG_PREFIX,
                profile.steam_id,
                profile.steam_id64,
                profile.updated
            );
            return false;
        }

        let mut updated = false;
        for existing in self
            .profiles
            .iter_mut()
            .filter(|p| p.steam_id64 == profile.steam_id64)
        {
            *existing = profile.clone();
            updated = true;
        }

        if !updated {
            self.profiles.push(profile);
        }
        true
    }

    /// Find a fresh profile by numeric id or vanity name.
    ///
    /// Expired profiles are purged before searching. The vanity name is
    /// compared case-insensitively.
    pub fn find(&mut self, id: &str) -> Option<&Profile> {
        log::debug!("{}: searching for profile {}", LOG_PREFIX, id);
        self.purge_expired();
        self.profiles.iter().find(|p| p.matches(id))
    }

    /// Name of a game as listed by the first cached profile owning it.
    ///
    /// Used to backfill games the store no longer describes.
    pub fn find_game(&self, app_id: GameId) -> Option<&str> {
        self.profiles
            .iter()
            .find_map(|p| p.owned(app_id))
            .map(|game| game.name.as_str())
    }

    /// Remove every profile matching `id` by numeric id or exact vanity
    /// name. Returns true if at least one profile was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let mut removed = false;
        // TODO: drop the loop once duplicate identities are shown to be
        // impossible in stored documents; `add` already deduplicates.
        while let Some(index) =
            self.profiles.iter().position(|p| p.matches_exact(id))
        {
            let profile = self.profiles.remove(index);
            log::info!(
                "{}: removed profile {} ({})",
                LOG_PREFIX,
                profile.steam_id,
                profile.steam_id64
            );
            removed = true;
        }
        removed
    }

    /// Remove every profile older than the freshness window
    pub fn purge_expired(&mut self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn purge_expired_at(&mut self, now: DateTime<Utc>) -> usize {
        let max_age = max_profile_age();
        let before = self.profiles.len();
        self.profiles.retain(|p| {
            let expired = p.is_expired(max_age, now);
            if expired {
                log::debug!("{}: purging profile {}", LOG_PREFIX, p.steam_id);
            }
            !expired
        });
        before - self.profiles.len()
    }
}

impl From<Vec<Profile>> for ProfileCache {
    fn from(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use data_game::OwnedGame;

    fn profile(id: u64, vanity: &str, owned: &[(GameId, &str)]) -> Profile {
        Profile {
            steam_id: format!("user{}", id),
            steam_id64: id,
            custom_url: vanity.to_owned(),
            games: owned
                .iter()
                .map(|(app_id, name)| {
                    (
                        *app_id,
                        OwnedGame {
                            name: name.to_string(),
                            app_id: *app_id,
                            ..Default::default()
                        },
                    )
                })
                .collect(),
            updated: Utc::now(),
            ..Default::default()
        }
    }

    #[test]
    fn add_rejects_expired_profile() {
        let mut cache = ProfileCache::default();
        let mut stale = profile(1, "stale", &[]);
        stale.updated = Utc::now() - Duration::hours(13);
        assert!(!cache.add(stale));
        assert!(cache.is_empty());
    }

    #[test]
    fn add_replaces_by_numeric_identity() {
        let mut cache = ProfileCache::default();
        cache.add(profile(1, "old-name", &[(10, "Ten")]));
        cache.add(profile(2, "other", &[]));
        cache.add(profile(1, "new-name", &[(20, "Twenty")]));

        assert_eq!(cache.len(), 2);
        let found = cache.find("1").unwrap();
        assert_eq!(found.custom_url, "new-name");
        assert!(found.owned(10).is_none());
        assert!(found.owned(20).is_some());
    }

    #[test]
    fn add_replaces_every_duplicate() {
        let mut cache = ProfileCache::from(vec![
            profile(1, "a", &[]),
            profile(2, "b", &[]),
            profile(1, "c", &[]),
        ]);
        cache.add(profile(1, "d", &[]));
        let vanities: Vec<_> =
            cache.iter().map(|p| p.custom_url.as_str()).collect();
        assert_eq!(vanities, vec!["d", "b", "d"]);
    }

    #[test]
    fn find_by_id_or_vanity() {
        let mut cache = ProfileCache::default();
        cache.add(profile(76561197960287930, "GabeLoganNewell", &[]));

        assert!(cache.find("76561197960287930").is_some());
        assert!(cache.find("gabelogannewell").is_some());
        assert!(cache.find("someone-else").is_none());
    }

    #[test]
    fn find_purges_expired_profiles() {
        let mut stale = profile(1, "stale", &[]);
        stale.updated = Utc::now() - Duration::hours(13);
        let mut cache = ProfileCache::from(vec![stale, profile(2, "b", &[])]);

        assert!(cache.find("stale").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn find_game_scans_all_profiles() {
        let mut cache = ProfileCache::default();
        cache.add(profile(1, "a", &[(10, "Ten")]));
        cache.add(profile(2, "b", &[(42, "Foo")]));

        assert_eq!(cache.find_game(42), Some("Foo"));
        assert_eq!(cache.find_game(43), None);
    }

    #[test]
    fn remove_deletes_all_instances() {
        let mut cache = ProfileCache::from(vec![
            profile(1, "a", &[]),
            profile(2, "b", &[]),
            profile(1, "a", &[]),
        ]);

        assert!(cache.remove("1"));
        assert_eq!(cache.len(), 1);
        assert!(!cache.remove("1"));
    }

    #[test]
    fn remove_requires_exact_vanity() {
        let mut cache = ProfileCache::default();
        cache.add(profile(1, "Alice", &[]));

        assert!(!cache.remove("alice"));
        assert!(cache.remove("Alice"));
        assert!(cache.is_empty());
    }

    #[test]
    fn purge_expired_removes_only_stale_profiles() {
        let now = Utc::now();
        let mut old = profile(1, "old", &[]);
        old.updated = now - Duration::hours(12) - Duration::minutes(1);
        let mut recent = profile(2, "recent", &[]);
        recent.updated = now - Duration::hours(11);
        let mut cache = ProfileCache::from(vec![old, recent.clone()]);

        assert_eq!(cache.purge_expired_at(now), 1);
        assert_eq!(cache.iter().collect::<Vec<_>>(), vec![&recent]);
    }
}
