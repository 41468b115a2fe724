//! File registry abstraction.
//!
//! Replaces a process-global id→path map with an injected trait, so the
//! core pipeline stays pure-functional on meshes and a caller can supply
//! a persistent store without touching the pipeline.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use uuid::Uuid;

/// A registry mapping opaque file ids to on-disk paths.
pub trait FileStore: Send + Sync {
    /// Look up the path for `id`.
    fn get(&self, id: Uuid) -> Option<PathBuf>;
    /// Register a new id for `path`, returning the assigned id.
    fn put(&self, path: PathBuf) -> Uuid;
    /// Remove an entry from the registry.
    fn delete(&self, id: Uuid);
}

/// A single-process, non-persistent file store backed by a mutex-guarded map.
#[derive(Default)]
pub struct InMemoryFileStore {
    entries: Mutex<HashMap<Uuid, PathBuf>>,
}

impl InMemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl FileStore for InMemoryFileStore {
    fn get(&self, id: Uuid) -> Option<PathBuf> {
        self.entries.lock().unwrap().get(&id).cloned()
    }

    fn put(&self, path: PathBuf) -> Uuid {
        let id = Uuid::new_v4();
        self.entries.lock().unwrap().insert(id, path);
        id
    }

    fn delete(&self, id: Uuid) {
        self.entries.lock().unwrap().remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_then_get_roundtrips() {
        let store = InMemoryFileStore::new();
        let id = store.put(PathBuf::from("/tmp/part.stl"));
        assert_eq!(store.get(id), Some(PathBuf::from("/tmp/part.stl")));
    }

    #[test]
    fn test_delete_removes_entry() {
        let store = InMemoryFileStore::new();
        let id = store.put(PathBuf::from("/tmp/part.stl"));
        store.delete(id);
        assert_eq!(store.get(id), None);
    }
}
