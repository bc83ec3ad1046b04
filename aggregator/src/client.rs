use std::collections::BTreeSet;

use data_game::{GameId, Profile};

/// A registered identifier and the profile it resolved to
#[derive(Clone, Debug, PartialEq)]
pub struct Client {
    id: String,
    profile: Profile,
}

impl Client {
    pub fn new(id: impl Into<String>, profile: Profile) -> Self {
        Self {
            id: id.into(),
            profile,
        }
    }

    /// The identifier the client was registered with
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn owned_ids(&self) -> BTreeSet<GameId> {
        self.profile.owned_ids().collect()
    }
}
