use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::warn;
use parking_lot::Mutex;

use crate::group::store::{GroupStore, StoreError};
use crate::group::Group;
use crate::Coordinate;

type GroupMap = BTreeMap<String, Group>;

/// Groups kept in a single JSON object file, `{ "<group>": { "members": ... } }`.
///
/// A missing file is created empty. An empty or corrupted file reads as no
/// groups. Each operation re-reads the file; read-modify-write cycles from
/// this handle are serialized.
#[derive(Debug)]
pub struct JsonFileGroupStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileGroupStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        JsonFileGroupStore {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<GroupMap, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                self.save(&GroupMap::new())?;
                return Ok(GroupMap::new());
            }
            Err(err) => return Err(err.into()),
        };
        match serde_json::from_slice(&bytes) {
            Ok(groups) => Ok(groups),
            Err(err) => {
                if !bytes.iter().all(u8::is_ascii_whitespace) {
                    warn!(
                        "group store {} is unreadable, treating as empty: {err}",
                        self.path.display()
                    );
                }
                Ok(GroupMap::new())
            }
        }
    }

    fn save(&self, groups: &GroupMap) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(groups)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl GroupStore for JsonFileGroupStore {
    fn get(&self, group: &str) -> Result<Option<Group>, StoreError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.remove(group))
    }

    fn put(&self, group: &str, value: Group) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut groups = self.load()?;
        groups.insert(group.to_string(), value);
        self.save(&groups)
    }

    fn update_member_location(
        &self,
        group: &str,
        user: &str,
        coord: Coordinate,
    ) -> Result<Group, StoreError> {
        let _guard = self.lock.lock();
        let mut groups = self.load()?;
        let value = groups
            .get_mut(group)
            .ok_or_else(|| StoreError::UnknownGroup(group.to_string()))?;
        value.set_location(user, coord);
        let updated = value.clone();
        self.save(&groups)?;
        Ok(updated)
    }
}
