use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use chrono::Utc;
use tempdir::TempDir;

use data_error::{Result, ShelfError};
use data_game::{GameId, GameRecord, OwnedGame, Profile};
use fs_cache::Cache;

use crate::{
    Aggregator, AggregatorConfig, DetailOutcome, DetailService,
    ProfileResolver, TagService,
};

/// How the fake store answers a detail request for one game
#[derive(Clone)]
enum Answer {
    Found(GameRecord),
    Unavailable,
    Omitted,
}

#[derive(Default)]
struct FakeStore {
    profiles: HashMap<String, Profile>,
    answers: HashMap<GameId, Answer>,
    tags: HashMap<GameId, Vec<String>>,
    /// Zero-based index of the detail request that fails in transport
    failing_request: Option<usize>,
    resolved: RefCell<Vec<String>>,
    requested: RefCell<Vec<Vec<GameId>>>,
    tagged: RefCell<Vec<GameId>>,
    detail_requests: Cell<usize>,
}

impl ProfileResolver for FakeStore {
    fn resolve(&self, id: &str) -> Result<Profile> {
        self.resolved.borrow_mut().push(id.to_owned());
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| {
                ShelfError::Resolution(id.to_owned(), "no such profile".into())
            })
    }
}

impl DetailService for FakeStore {
    fn fetch_details(
        &self,
        ids: &[GameId],
    ) -> Result<HashMap<GameId, DetailOutcome>> {
        let request = self.detail_requests.get();
        self.detail_requests.set(request + 1);
        self.requested.borrow_mut().push(ids.to_vec());
        if self.failing_request == Some(request) {
            return Err(ShelfError::Rejected("connection reset".into()));
        }

        let mut response = HashMap::new();
        for id in ids {
            match self.answers.get(id).cloned() {
                Some(Answer::Found(record)) => {
                    response.insert(*id, DetailOutcome::Found(record));
                }
                Some(Answer::Unavailable) => {
                    response.insert(*id, DetailOutcome::Unavailable);
                }
                Some(Answer::Omitted) => {}
                None => {
                    response.insert(*id, DetailOutcome::Found(game(*id)));
                }
            }
        }
        Ok(response)
    }
}

impl TagService for FakeStore {
    fn fetch_tags(&self, id: GameId) -> Result<Vec<String>> {
        self.tagged.borrow_mut().push(id);
        self.tags.get(&id).cloned().ok_or_else(|| {
            ShelfError::Rejected(format!("no store page for {}", id))
        })
    }
}

fn game(id: GameId) -> GameRecord {
    GameRecord {
        kind: "game".to_owned(),
        name: format!("Game {}", id),
        app_id: id,
        updated: Utc::now(),
        ..Default::default()
    }
}

fn profile(id: u64, vanity: &str, owned: &[(GameId, &str)]) -> Profile {
    Profile {
        steam_id: vanity.to_owned(),
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

fn owning(id: u64, vanity: &str, owned: &[GameId]) -> Profile {
    let names: Vec<String> =
        owned.iter().map(|app_id| format!("Owned {}", app_id)).collect();
    let named: Vec<(GameId, &str)> = owned
        .iter()
        .copied()
        .zip(names.iter().map(String::as_str))
        .collect();
    profile(id, vanity, &named)
}

fn config(path: PathBuf) -> AggregatorConfig {
    AggregatorConfig::new(path)
        .with_delays(Duration::ZERO, Duration::ZERO)
}

fn open_aggregator(
    dir: &TempDir,
    store: FakeStore,
    batch_size: usize,
) -> Aggregator<FakeStore> {
    let config =
        config(dir.path().join("cache.json")).with_batch_size(batch_size);
    Aggregator::new(config, store).unwrap()
}

fn two_clients() -> FakeStore {
    let mut store = FakeStore::default();
    store
        .profiles
        .insert("alice".to_owned(), owning(1, "alice", &[1, 2, 3]));
    store
        .profiles
        .insert("bob".to_owned(), owning(2, "bob", &[2, 3, 4]));
    store
}

fn selected_ids(
    aggregator: &Aggregator<FakeStore>,
    common: bool,
) -> Vec<GameId> {
    let mut ids: Vec<GameId> = aggregator
        .select(&[], common, false, false)
        .games
        .iter()
        .map(|game| game.app_id)
        .collect();
    ids.sort();
    ids
}

// client registration

#[test]
fn add_client_resolves_and_caches_profile() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 1);

    let client = aggregator.add_client("alice").unwrap();
    assert_eq!(client.id(), "alice");
    assert_eq!(client.profile().steam_id64, 1);

    assert_eq!(*aggregator.backend().resolved.borrow(), vec!["alice"]);
    assert_eq!(aggregator.cache().profiles().len(), 1);
}

#[test]
fn add_client_reuses_fresh_cached_profile() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut first = open_aggregator(&dir, two_clients(), 1);
    first.add_client("alice").unwrap();
    first.cache_mut().save().unwrap();

    let mut second = open_aggregator(&dir, FakeStore::default(), 1);
    second.add_client("1").unwrap();
    second.add_client("ALICE").unwrap();

    assert!(second.backend().resolved.borrow().is_empty());
    assert_eq!(second.clients().count(), 2);
    assert_eq!(second.client("ALICE").unwrap().profile().steam_id64, 1);
}

#[test]
fn add_client_twice_fails_without_changes() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 1);
    aggregator.add_client("alice").unwrap();

    let err = aggregator.add_client("alice").unwrap_err();
    assert!(matches!(err, ShelfError::DuplicateClient(id) if id == "alice"));
    assert_eq!(aggregator.clients().count(), 1);
    assert_eq!(aggregator.backend().resolved.borrow().len(), 1);
    assert_eq!(aggregator.cache().profiles().len(), 1);
}

#[test]
fn add_client_propagates_resolution_error() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 1);

    assert!(matches!(
        aggregator.add_client("mallory"),
        Err(ShelfError::Resolution(_, _))
    ));
    assert!(aggregator.client("mallory").is_none());
    aggregator.add_client("bob").unwrap();
    assert_eq!(aggregator.clients().count(), 1);
}

// selection

#[test]
fn select_common_and_all() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 1);
    aggregator.add_client("alice").unwrap();
    aggregator.add_client("bob").unwrap();
    for id in 1..=5 {
        aggregator.cache_mut().games_mut().add(id, game(id));
    }

    assert_eq!(selected_ids(&aggregator, true), vec![2, 3]);
    assert_eq!(selected_ids(&aggregator, false), vec![1, 2, 3, 4]);
}

#[test]
fn select_without_common_games_is_empty() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store.profiles.insert("a".to_owned(), owning(1, "a", &[1]));
    store.profiles.insert("b".to_owned(), owning(2, "b", &[2]));
    let mut aggregator = open_aggregator(&dir, store, 1);
    aggregator.add_client("a").unwrap();
    aggregator.add_client("b").unwrap();
    aggregator.cache_mut().games_mut().add(1, game(1));
    aggregator.cache_mut().games_mut().add(2, game(2));

    assert!(selected_ids(&aggregator, true).is_empty());
    assert_eq!(selected_ids(&aggregator, false), vec![1, 2]);
}

#[test]
fn select_filters_tags_across_clients() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 1);
    aggregator.add_client("alice").unwrap();
    aggregator.add_client("bob").unwrap();
    for id in 1..=4 {
        let mut record = game(id);
        record.tags = Some(if id % 2 == 0 {
            vec!["Action".to_owned(), "Indie".to_owned()]
        } else {
            vec!["Indie".to_owned()]
        });
        aggregator.cache_mut().games_mut().add(id, record);
    }

    let action =
        aggregator.select(&["action".to_owned()], false, false, false);
    let mut ids: Vec<_> = action.games.iter().map(|g| g.app_id).collect();
    ids.sort();
    assert_eq!(ids, vec![2, 4]);

    let both = aggregator.select(
        &["ACTION".to_owned(), "indie".to_owned()],
        true,
        true,
        false,
    );
    let ids: Vec<_> = both.games.iter().map(|g| g.app_id).collect();
    assert_eq!(ids, vec![2]);
}

// game cache reconciliation

#[test]
fn update_game_cache_fetches_uncached_games_in_batches() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut aggregator = open_aggregator(&dir, two_clients(), 2);
    aggregator.add_client("alice").unwrap();
    aggregator.add_client("bob").unwrap();
    aggregator
        .cache_mut()
        .games_mut()
        .add(3, GameRecord::invalid(3, "Cached"));

    assert_eq!(aggregator.update_game_cache().unwrap(), 3);
    assert_eq!(
        *aggregator.backend().requested.borrow(),
        vec![vec![1, 2], vec![4]]
    );
    assert!(aggregator.cache().games().get(3).unwrap().invalid);

    let reloaded = Cache::load(&dir.path().join("cache.json")).unwrap();
    assert_eq!(reloaded.games().len(), 4);
}

#[test]
fn update_game_cache_backfills_unavailable_game() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store
        .profiles
        .insert("alice".to_owned(), profile(1, "alice", &[(42, "Foo")]));
    store.answers.insert(42, Answer::Unavailable);
    let mut aggregator = open_aggregator(&dir, store, 1);
    aggregator.add_client("alice").unwrap();

    aggregator.update_game_cache().unwrap();

    let record = aggregator.cache().games().get(42).unwrap();
    assert!(record.invalid);
    assert_eq!(record.app_id, 42);
    assert_eq!(record.name, "Foo");
}

#[test]
fn update_game_cache_stores_mismatched_id_under_both_keys() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store
        .profiles
        .insert("alice".to_owned(), owning(1, "alice", &[10, 20]));
    store.answers.insert(10, Answer::Found(game(20)));
    let mut aggregator = open_aggregator(&dir, store, 1);
    aggregator.add_client("alice").unwrap();

    assert_eq!(aggregator.update_game_cache().unwrap(), 2);

    let games = aggregator.cache().games();
    assert_eq!(games.get(10), games.get(20));
    assert_eq!(games.get(10).unwrap().app_id, 20);
    assert_eq!(*aggregator.backend().requested.borrow(), vec![vec![10]]);

    // nothing is pending any more
    aggregator.update_game_cache().unwrap();
    assert_eq!(aggregator.backend().requested.borrow().len(), 1);
}

#[test]
fn update_game_cache_rejects_incomplete_response() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store
        .profiles
        .insert("alice".to_owned(), owning(1, "alice", &[7]));
    store.answers.insert(7, Answer::Omitted);
    let mut aggregator = open_aggregator(&dir, store, 1);
    aggregator.add_client("alice").unwrap();

    assert!(matches!(
        aggregator.update_game_cache(),
        Err(ShelfError::ContractViolation(_))
    ));
    assert!(!aggregator.cache().games().contains(7));
}

#[test]
fn update_game_cache_keeps_saved_batches_after_failure() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = two_clients();
    store.failing_request = Some(1);
    let mut aggregator = open_aggregator(&dir, store, 1);
    aggregator.add_client("alice").unwrap();

    assert!(aggregator.update_game_cache().is_err());
    assert_eq!(aggregator.backend().requested.borrow().len(), 2);

    let reloaded = Cache::load(&dir.path().join("cache.json")).unwrap();
    assert!(reloaded.games().contains(1));
    assert!(!reloaded.games().contains(2));
    assert_eq!(reloaded.profiles().len(), 1);

    // a second run resumes where the first one stopped
    let mut resumed = open_aggregator(&dir, two_clients(), 1);
    resumed.add_client("alice").unwrap();
    assert_eq!(resumed.update_game_cache().unwrap(), 2);
    assert_eq!(*resumed.backend().requested.borrow(), vec![vec![2], vec![3]]);
}

// tag enrichment

#[test]
fn update_game_tags_skips_failures() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store.tags.insert(1, vec!["Action".to_owned()]);
    store.tags.insert(3, vec![]);
    let mut aggregator = open_aggregator(&dir, store, 1);
    for id in 1..=3 {
        aggregator.cache_mut().games_mut().add(id, game(id));
    }
    let mut tagged = game(4);
    tagged.tags = Some(vec!["Indie".to_owned()]);
    aggregator.cache_mut().games_mut().add(4, tagged);

    assert_eq!(aggregator.update_game_tags().unwrap(), 2);
    assert_eq!(*aggregator.backend().tagged.borrow(), vec![1, 2, 3]);

    let reloaded = Cache::load(&dir.path().join("cache.json")).unwrap();
    let games = reloaded.games();
    assert_eq!(games.get(1).unwrap().tags, Some(vec!["Action".to_owned()]));
    assert_eq!(games.get(2).unwrap().tags, None);
    assert_eq!(games.get(3).unwrap().tags, Some(vec![]));
    assert_eq!(games.untagged(), vec![2]);
}

#[test]
fn update_game_tags_fetches_mismatched_game_once() {
    let dir = TempDir::new("aggregator").unwrap();
    let mut store = FakeStore::default();
    store.tags.insert(20, vec!["RPG".to_owned()]);
    let mut aggregator = open_aggregator(&dir, store, 1);
    let record = game(20);
    aggregator.cache_mut().games_mut().add(10, record.clone());
    aggregator.cache_mut().games_mut().add(20, record);

    assert_eq!(aggregator.update_game_tags().unwrap(), 2);
    assert_eq!(*aggregator.backend().tagged.borrow(), vec![20]);
    let games = aggregator.cache().games();
    assert_eq!(games.get(20).unwrap().tags, Some(vec!["RPG".to_owned()]));
    assert_eq!(games.get(10), games.get(20));
}
