use mdag_types::Digest;

use crate::error::StoreResult;

/// Digest-keyed blob store.
///
/// All implementations must satisfy these invariants:
/// - Keys are opaque fixed-length digests; values are opaque bytes.
/// - `put` of a key that already holds the same value succeeds without
///   changing anything. Content-addressed callers rely on this for dedup.
/// - Every call blocks until it completes or fails.
/// - All backend errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Store `value` under `key`.
    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()>;

    /// Fetch the value stored under `key`.
    ///
    /// Returns `Err(StoreError::NotFound)` if nothing is stored there.
    fn get(&self, key: &Digest) -> StoreResult<Vec<u8>>;

    /// Check whether a value is stored under `key`.
    ///
    /// Default implementation calls `get()` and discards the value.
    /// Backends may override to avoid the copy.
    fn contains(&self, key: &Digest) -> StoreResult<bool> {
        match self.get(key) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
