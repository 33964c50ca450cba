//! Store doubles for exercising failure paths.

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use mdag_store::{BlobStore, InMemoryBlobStore, StoreError, StoreResult};
use mdag_types::Digest;

/// Wraps an in-memory store and injects backend failures.
pub(crate) struct FailingStore {
    inner: InMemoryBlobStore,
    puts_allowed: usize,
    puts_done: AtomicUsize,
    unreadable: HashSet<Digest>,
}

impl FailingStore {
    /// Accept `n` puts, then reject every further put.
    pub(crate) fn failing_puts_after(n: usize) -> Self {
        Self {
            inner: InMemoryBlobStore::new(),
            puts_allowed: n,
            puts_done: AtomicUsize::new(0),
            unreadable: HashSet::new(),
        }
    }

    /// Serve reads from `inner`, except that `key` fails with a backend error.
    pub(crate) fn unreadable(inner: InMemoryBlobStore, key: Digest) -> Self {
        Self {
            inner,
            puts_allowed: usize::MAX,
            puts_done: AtomicUsize::new(0),
            unreadable: HashSet::from([key]),
        }
    }

    pub(crate) fn inner(&self) -> &InMemoryBlobStore {
        &self.inner
    }

    pub(crate) fn into_inner(self) -> InMemoryBlobStore {
        self.inner
    }
}

impl BlobStore for FailingStore {
    fn put(&self, key: &Digest, value: &[u8]) -> StoreResult<()> {
        if self.puts_done.fetch_add(1, Ordering::SeqCst) >= self.puts_allowed {
            return Err(StoreError::WriteFailed {
                key: *key,
                reason: "injected failure".into(),
            });
        }
        self.inner.put(key, value)
    }

    fn get(&self, key: &Digest) -> StoreResult<Vec<u8>> {
        if self.unreadable.contains(key) {
            return Err(StoreError::ReadFailed {
                key: *key,
                reason: "injected failure".into(),
            });
        }
        self.inner.get(key)
    }
}
