pub mod json_store;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::Coordinate;

pub use json_store::JsonFileGroupStore;
pub use store::{create_group, join_group, GroupStore, InMemoryGroupStore, StoreError};

/// Members of a group and their last reported position. A member that has
/// not reported yet maps to `None`.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Group {
    #[serde(default)]
    pub members: BTreeMap<String, Option<Coordinate>>,
}

impl Group {
    pub fn with_member(user: &str) -> Self {
        let mut group = Group::default();
        group.add_member(user);
        group
    }

    /// Registers `user` without a position. An existing position is kept.
    pub fn add_member(&mut self, user: &str) {
        self.members.entry(user.to_string()).or_insert(None);
    }

    pub fn set_location(&mut self, user: &str, coord: Coordinate) {
        self.members.insert(user.to_string(), Some(coord));
    }

    /// Positions of members that have reported one.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.members.values().filter_map(|c| *c).collect()
    }
}
