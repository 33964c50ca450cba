use std::collections::HashMap;
use std::sync::RwLock;

use mdag_types::Digest;
use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. All values are held in memory behind a
/// `RwLock` for safe concurrent access. Values are cloned on read/write.
pub struct InMemoryBlobStore {
    blobs: RwLock<HashMap<Digest, Vec<u8>>>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
        }
    }

    /// Number of values currently stored.
    pub fn len(&self) -> usize {
        self.blobs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blobs.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored values.
    pub fn total_bytes(&self) -> u64 {
        self.blobs
            .read()
            .expect("lock poisoned")
            .values()
            .map(|v| v.len() as u64)
            .sum()
    }

    /// Remove all values from the store.
    pub fn clear(&self) {
        self.blobs.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all keys in the store.
    pub fn all_keys(&self) -> Vec<Digest> {
        let map = self.blobs.read().expect("lock poisoned");
        let mut keys: Vec<Digest> = map.keys().copied().collect();
        keys.sort();
        keys
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        let mut map = self.blobs.write().expect("lock poisoned");
        match map.get(key) {
            Some(existing) if existing.as_slice() != value => {
                // First write wins; a differing value under the same digest
                // means the caller's hashing scheme collided.
                warn!(
                    key = %key.short_hex(),
                    existing_len = existing.len(),
                    new_len = value.len(),
                    "ignoring put of different value under existing key"
                );
            }
            Some(_) => {}
            None => {
                map.insert(*key, value.to_vec());
            }
        }
        Ok(())
    }

    fn get(&self, key: &Digest) -> StoreResult<Vec<u8>> {
        let map = self.blobs.read().expect("lock poisoned");
        map.get(key).cloned().ok_or(StoreError::NotFound(*key))
    }

    fn contains(&self, key: &Digest) -> StoreResult<bool> {
        let map = self.blobs.read().expect("lock poisoned");
        Ok(map.contains_key(key))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlobStore")
            .field("blob_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdag_crypto::{HashAlgorithm, HashProvider};

    fn key(content: &[u8]) -> Digest {
        HashAlgorithm::Sha256.digest(content)
    }

    fn put_content(store: &InMemoryBlobStore, content: &[u8]) -> Digest {
        let k = key(content);
        store.put(&k, content).unwrap();
        k
    }

    // -----------------------------------------------------------------------
    // Core put/get
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryBlobStore::new();
        let k = put_content(&store, b"hello world");
        assert_eq!(store.get(&k).unwrap(), b"hello world");
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryBlobStore::new();
        let k = key(b"missing");
        let err = store.get(&k).unwrap_err();
        assert!(err.is_not_found());
        assert!(matches!(err, StoreError::NotFound(d) if d == k));
    }

    #[test]
    fn different_content_is_stored_separately() {
        let store = InMemoryBlobStore::new();
        let k1 = put_content(&store, b"aaa");
        let k2 = put_content(&store, b"bbb");
        assert_ne!(k1, k2);
        assert_eq!(store.len(), 2);
    }

    // -----------------------------------------------------------------------
    // Idempotency
    // -----------------------------------------------------------------------

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryBlobStore::new();
        let k = put_content(&store, b"idempotent");
        store.put(&k, b"idempotent").unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(&k).unwrap(), b"idempotent");
    }

    #[test]
    fn first_write_wins_on_conflict() {
        let store = InMemoryBlobStore::new();
        let k = key(b"original");
        store.put(&k, b"original").unwrap();
        store.put(&k, b"impostor").unwrap();
        assert_eq!(store.get(&k).unwrap(), b"original");
    }

    // -----------------------------------------------------------------------
    // Contains
    // -----------------------------------------------------------------------

    #[test]
    fn contains_reports_presence() {
        let store = InMemoryBlobStore::new();
        let k = put_content(&store, b"present");
        assert!(store.contains(&k).unwrap());
        assert!(!store.contains(&key(b"absent")).unwrap());
    }

    // -----------------------------------------------------------------------
    // Utility methods
    // -----------------------------------------------------------------------

    #[test]
    fn len_and_is_empty() {
        let store = InMemoryBlobStore::new();
        assert!(store.is_empty());
        put_content(&store, b"a");
        assert!(!store.is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn total_bytes() {
        let store = InMemoryBlobStore::new();
        put_content(&store, b"12345");
        put_content(&store, b"123456789");
        assert_eq!(store.total_bytes(), 14);
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryBlobStore::new();
        put_content(&store, b"a");
        put_content(&store, b"b");
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn all_keys_is_sorted() {
        let store = InMemoryBlobStore::new();
        let k1 = put_content(&store, b"aaa");
        let k2 = put_content(&store, b"bbb");
        let k3 = put_content(&store, b"ccc");

        let keys = store.all_keys();
        assert_eq!(keys.len(), 3);
        for w in keys.windows(2) {
            assert!(w[0] <= w[1]);
        }
        assert!(keys.contains(&k1) && keys.contains(&k2) && keys.contains(&k3));
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryBlobStore::new());
        let k = put_content(&store, b"shared data");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    assert_eq!(store.get(&k).unwrap(), b"shared data");
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlobStore::new();
        put_content(&store, b"x");
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryBlobStore"));
        assert!(debug.contains("blob_count"));
    }
}
