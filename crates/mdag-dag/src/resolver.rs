//! Name-based lookup under a stored tree.
//!
//! Resolution is one level at a time: the stored link names are the
//! authoritative mapping from a path segment to a digest. Multi-segment
//! paths are a loop of single-level lookups.

use tracing::debug;

use mdag_store::BlobStore;
use mdag_types::Digest;

use crate::error::DagResult;
use crate::object::{Link, Object};

/// Resolves names under stored tree objects.
pub struct Resolver<'a, S: BlobStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: BlobStore + ?Sized> Resolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// The links of the tree stored under `root`, in stored order.
    ///
    /// Fails if `root` is missing or its value is not a tree object.
    pub fn list(&self, root: &Digest) -> DagResult<Vec<Link>> {
        let bytes = self.store.get(root)?;
        Object::decode_tree(root, &bytes)
    }

    /// The first link under `root` named exactly `name`.
    pub fn lookup(&self, root: &Digest, name: &str) -> DagResult<Option<Link>> {
        let link = self.list(root)?.into_iter().find(|l| l.name == name);
        if link.is_none() {
            debug!(root = %root.short_hex(), name, "no such entry");
        }
        Ok(link)
    }

    /// The stored bytes of the child named `name` under `root`.
    ///
    /// The child's value is returned verbatim: for a subdirectory or a
    /// chunked file that is its encoded tree object. `Ok(None)` means no
    /// link has that name.
    pub fn resolve(&self, root: &Digest, name: &str) -> DagResult<Option<Vec<u8>>> {
        match self.lookup(root, name)? {
            Some(link) => {
                let bytes = self.store.get(&link.hash)?;
                debug!(
                    root = %root.short_hex(),
                    name,
                    child = %link.hash.short_hex(),
                    len = bytes.len(),
                    "resolved entry"
                );
                Ok(Some(bytes))
            }
            None => Ok(None),
        }
    }

    /// Digest reached by following `path` from `root`.
    ///
    /// Segments are separated by `/`; empty segments are skipped, so an
    /// empty path yields `root` itself.
    pub fn resolve_digest(&self, root: &Digest, path: &str) -> DagResult<Option<Digest>> {
        let mut current = *root;
        for segment in path.split('/').filter(|s| !s.is_empty()) {
            match self.lookup(&current, segment)? {
                Some(link) => current = link.hash,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Stored bytes reached by following `path` from `root`.
    pub fn resolve_path(&self, root: &Digest, path: &str) -> DagResult<Option<Vec<u8>>> {
        match self.resolve_digest(root, path)? {
            Some(digest) => Ok(Some(self.store.get(&digest)?)),
            None => Ok(None),
        }
    }
}
