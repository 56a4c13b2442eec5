use std::collections::HashMap;

use log::info;
use parking_lot::Mutex;
use thiserror::Error;

use crate::group::Group;
use crate::Coordinate;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown group {0:?}")]
    UnknownGroup(String),
    #[error("group {0:?} already exists")]
    GroupExists(String),
}

/// Keyed storage of groups. Writes are last-write-wins.
pub trait GroupStore {
    fn get(&self, group: &str) -> Result<Option<Group>, StoreError>;

    fn put(&self, group: &str, value: Group) -> Result<(), StoreError>;

    /// Records `user`'s position in an existing group and returns the
    /// updated group. Users not yet in the group are added.
    fn update_member_location(
        &self,
        group: &str,
        user: &str,
        coord: Coordinate,
    ) -> Result<Group, StoreError> {
        let mut value = self
            .get(group)?
            .ok_or_else(|| StoreError::UnknownGroup(group.to_string()))?;
        value.set_location(user, coord);
        self.put(group, value.clone())?;
        Ok(value)
    }
}

/// Creates `group` with `user` as its first member.
pub fn create_group<S: GroupStore + ?Sized>(
    store: &S,
    group: &str,
    user: &str,
) -> Result<Group, StoreError> {
    if store.get(group)?.is_some() {
        return Err(StoreError::GroupExists(group.to_string()));
    }
    let value = Group::with_member(user);
    store.put(group, value.clone())?;
    info!("created group {group:?} for {user:?}");
    Ok(value)
}

/// Adds `user` to an existing `group`.
pub fn join_group<S: GroupStore + ?Sized>(
    store: &S,
    group: &str,
    user: &str,
) -> Result<Group, StoreError> {
    let mut value = store
        .get(group)?
        .ok_or_else(|| StoreError::UnknownGroup(group.to_string()))?;
    value.add_member(user);
    store.put(group, value.clone())?;
    info!("{user:?} joined group {group:?}");
    Ok(value)
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct InMemoryGroupStore {
    groups: Mutex<HashMap<String, Group>>,
}

impl InMemoryGroupStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GroupStore for InMemoryGroupStore {
    fn get(&self, group: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.lock().get(group).cloned())
    }

    fn put(&self, group: &str, value: Group) -> Result<(), StoreError> {
        self.groups.lock().insert(group.to_string(), value);
        Ok(())
    }

    fn update_member_location(
        &self,
        group: &str,
        user: &str,
        coord: Coordinate,
    ) -> Result<Group, StoreError> {
        let mut groups = self.groups.lock();
        let value = groups
            .get_mut(group)
            .ok_or_else(|| StoreError::UnknownGroup(group.to_string()))?;
        value.set_location(user, coord);
        Ok(value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_then_join() {
        let store = InMemoryGroupStore::new();
        create_group(&store, "study", "ana").expect("create");
        let group = join_group(&store, "study", "ben").expect("join");
        assert_eq!(group.members.len(), 2);
        assert!(group.members.values().all(Option::is_none));
    }

    #[test]
    fn create_twice_fails() {
        let store = InMemoryGroupStore::new();
        create_group(&store, "study", "ana").unwrap();
        assert!(matches!(
            create_group(&store, "study", "ben"),
            Err(StoreError::GroupExists(_))
        ));
    }

    #[test]
    fn join_unknown_fails() {
        let store = InMemoryGroupStore::new();
        assert!(matches!(
            join_group(&store, "nope", "ana"),
            Err(StoreError::UnknownGroup(_))
        ));
    }

    #[test]
    fn update_location_adds_and_overwrites() {
        let store = InMemoryGroupStore::new();
        create_group(&store, "study", "ana").unwrap();
        store
            .update_member_location("study", "ana", Coordinate::new(1.0, 1.0))
            .unwrap();
        let group = store
            .update_member_location("study", "ben", Coordinate::new(2.0, 2.0))
            .unwrap();
        assert_eq!(group.coordinates().len(), 2);
        let group = store
            .update_member_location("study", "ana", Coordinate::new(3.0, 3.0))
            .unwrap();
        assert_eq!(group.members["ana"], Some(Coordinate::new(3.0, 3.0)));
        assert_eq!(store.get("study").unwrap(), Some(group));
    }

    #[test]
    fn update_location_in_unknown_group_fails() {
        let store = InMemoryGroupStore::new();
        assert!(matches!(
            store.update_member_location("nope", "ana", Coordinate::new(0.0, 0.0)),
            Err(StoreError::UnknownGroup(_))
        ));
    }
}
