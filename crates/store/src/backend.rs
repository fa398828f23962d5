use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, RwLock};

use crate::error::StoreError;
use crate::page::PageHighlightSet;

/// The persistence collaborator: an ordered keyed collection of page
/// highlight sets.
///
/// The resolver never touches storage; whatever orchestrates capture and
/// restore is handed one of these, which keeps the core testable without a
/// real browser storage backend.
pub trait AnchorStore: Send + Sync {
    /// Retrieve the set stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<PageHighlightSet>, StoreError>;
    /// Insert or replace the set stored under `key`.
    fn set(&self, key: &str, set: &PageHighlightSet) -> Result<(), StoreError>;
    /// Remove the set stored under `key`. Removing a missing key is a no-op.
    fn delete(&self, key: &str) -> Result<(), StoreError>;
    /// All stored keys starting with `prefix`, sorted.
    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}

/// Configuration for selecting and building a storage backend.
#[derive(Clone, Debug, Default)]
pub enum BackendConfig {
    /// Keep everything in memory. For tests and ephemeral embedders.
    #[default]
    InMemory,
    /// Persist to a single JSON file at `path`.
    JsonFile { path: PathBuf },
}

impl BackendConfig {
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    pub fn json_file(path: impl Into<PathBuf>) -> Self {
        BackendConfig::JsonFile { path: path.into() }
    }

    /// Builds the configured backend.
    pub fn build(self) -> Box<dyn AnchorStore> {
        match self {
            BackendConfig::InMemory => Box::new(InMemoryStore::new()),
            BackendConfig::JsonFile { path } => Box::new(JsonFileStore::new(path)),
        }
    }
}

/// `RwLock<BTreeMap>` store. The BTreeMap keeps `list_keys` sorted for free.
#[derive(Default)]
pub struct InMemoryStore {
    pages: RwLock<BTreeMap<String, PageHighlightSet>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AnchorStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<PageHighlightSet>, StoreError> {
        let pages = self.pages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(pages.get(key).cloned())
    }

    fn set(&self, key: &str, set: &PageHighlightSet) -> Result<(), StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        pages.insert(key.to_string(), set.clone());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut pages = self.pages.write().map_err(|_| StoreError::Poisoned)?;
        pages.remove(key);
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let pages = self.pages.read().map_err(|_| StoreError::Poisoned)?;
        Ok(pages
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

/// Single-file JSON store: the whole keyed map is read, modified, and
/// rewritten per operation. Fine at highlight-collection scale; the mutex
/// serializes writers within this process.
pub struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_map(&self) -> Result<BTreeMap<String, PageHighlightSet>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn write_map(&self, map: &BTreeMap<String, PageHighlightSet>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let bytes = serde_json::to_vec_pretty(map)?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl AnchorStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<PageHighlightSet>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn set(&self, key: &str, set: &PageHighlightSet) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.read_map()?;
        map.insert(key.to_string(), set.clone());
        self.write_map(&map)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let mut map = self.read_map()?;
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read_map()?
            .into_keys()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::HighlightDescriptor;
    use pretty_assertions::assert_eq;

    fn sample_set(key: &str) -> PageHighlightSet {
        let mut set = PageHighlightSet::new(key);
        set.add(HighlightDescriptor::new("#a", "text", 0, 4, "", ""))
            .expect("fresh id");
        set
    }

    fn exercise_contract(store: &dyn AnchorStore) {
        assert_eq!(store.get("https://a/1").unwrap(), None);

        let one = sample_set("https://a/1");
        let two = sample_set("https://a/2");
        store.set("https://a/1", &one).unwrap();
        store.set("https://a/2", &two).unwrap();
        store.set("https://b/1", &sample_set("https://b/1")).unwrap();

        assert_eq!(store.get("https://a/1").unwrap(), Some(one));
        assert_eq!(
            store.list_keys("https://a/").unwrap(),
            vec!["https://a/1".to_string(), "https://a/2".to_string()]
        );
        assert_eq!(store.list_keys("").unwrap().len(), 3);

        store.delete("https://a/1").unwrap();
        assert_eq!(store.get("https://a/1").unwrap(), None);
        // deleting again is a no-op
        store.delete("https://a/1").unwrap();
    }

    #[test]
    fn in_memory_store_contract() {
        exercise_contract(&InMemoryStore::new());
    }

    #[test]
    fn json_file_store_contract() {
        let dir = tempfile::tempdir().unwrap();
        exercise_contract(&JsonFileStore::new(dir.path().join("highlights.json")));
    }

    #[test]
    fn json_file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/dir/highlights.json");
        let set = sample_set("k");
        JsonFileStore::new(&path).set("k", &set).unwrap();

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.get("k").unwrap(), Some(set));
    }

    #[test]
    fn backend_config_builds_both_backends() {
        let dir = tempfile::tempdir().unwrap();
        for config in [
            BackendConfig::in_memory(),
            BackendConfig::json_file(dir.path().join("h.json")),
        ] {
            let store = config.build();
            store.set("k", &sample_set("k")).unwrap();
            assert!(store.get("k").unwrap().is_some());
        }
    }
}
