//! Tamper-evidence checks over a stored DAG.
//!
//! [`Verifier::verify`] walks everything reachable from a root and
//! recomputes each digest from the stored value:
//!
//! - a chunk index must hash (links in order) to its key, and each chunk
//!   must hash to its link;
//! - a directory must hash (links sorted) to its key, and each named link's
//!   `size` must match the child's stored length;
//! - any other value must hash to its key as raw content.
//!
//! Problems below the root are collected as [`Violation`]s instead of
//! aborting, so one report lists every damaged object. Backend read
//! failures still abort.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, warn};

use mdag_crypto::{HashAlgorithm, HashProvider};
use mdag_store::BlobStore;
use mdag_types::Digest;

use crate::builder::directory_digest;
use crate::config::DagConfig;
use crate::error::{DagError, DagResult};
use crate::object::Object;
use crate::reader::is_chunk_index;

/// A problem found while verifying.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Violation {
    /// A linked object is not in the store.
    Missing { path: String, digest: Digest },
    /// The stored value does not hash to its key.
    DigestMismatch { path: String, digest: Digest },
    /// A link's recorded size differs from the child's stored length.
    SizeMismatch {
        path: String,
        digest: Digest,
        recorded: u64,
        actual: u64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path, digest } => write!(f, "{path}: missing object {digest}"),
            Self::DigestMismatch { path, digest } => {
                write!(f, "{path}: stored value does not hash to {digest}")
            }
            Self::SizeMismatch {
                path,
                recorded,
                actual,
                ..
            } => write!(f, "{path}: link records {recorded} bytes, stored {actual}"),
        }
    }
}

/// Outcome of verifying one root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyReport {
    pub root: Digest,
    /// Distinct raw values checked (small files and chunks).
    pub blobs: u64,
    /// Distinct directories checked.
    pub directories: u64,
    /// Distinct chunk indexes checked.
    pub chunk_indexes: u64,
    pub violations: Vec<Violation>,
}

impl VerifyReport {
    /// Returns `true` if nothing was wrong.
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Recomputes digests across a stored DAG.
pub struct Verifier<'a, S: BlobStore + ?Sized, P: HashProvider = HashAlgorithm> {
    store: &'a S,
    provider: P,
}

impl<'a, S: BlobStore + ?Sized> Verifier<'a, S, HashAlgorithm> {
    pub fn new(store: &'a S, config: &DagConfig) -> Self {
        Self::with_provider(store, config.hash)
    }
}

struct Walk {
    seen: HashSet<Digest>,
    report: VerifyReport,
}

impl<'a, S: BlobStore + ?Sized, P: HashProvider> Verifier<'a, S, P> {
    pub fn with_provider(store: &'a S, provider: P) -> Self {
        Self { store, provider }
    }

    /// Verify everything reachable from `root`.
    ///
    /// A missing root is an error; anything missing below it is a violation.
    pub fn verify(&self, root: &Digest) -> DagResult<VerifyReport> {
        let bytes = self.store.get(root)?;
        let mut walk = Walk {
            seen: HashSet::new(),
            report: VerifyReport {
                root: *root,
                blobs: 0,
                directories: 0,
                chunk_indexes: 0,
                violations: Vec::new(),
            },
        };
        walk.seen.insert(*root);
        self.check(root, &bytes, "", &mut walk)?;

        if walk.report.is_valid() {
            debug!(root = %root.short_hex(), objects = walk.seen.len(), "verified");
        } else {
            warn!(
                root = %root.short_hex(),
                violations = walk.report.violations.len(),
                "verification found damaged objects"
            );
        }
        Ok(walk.report)
    }

    fn check(&self, digest: &Digest, bytes: &[u8], path: &str, walk: &mut Walk) -> DagResult<()> {
        if let Some(chunks) = is_chunk_index(&self.provider, digest, bytes) {
            walk.report.chunk_indexes += 1;
            for (i, link) in chunks.iter().enumerate() {
                let chunk_path = format!("{path}#{i}");
                if let Some(chunk) = self.fetch_child(&link.hash, &chunk_path, walk)? {
                    walk.report.blobs += 1;
                    if self.provider.digest(&chunk) != link.hash {
                        walk.report.violations.push(Violation::DigestMismatch {
                            path: chunk_path,
                            digest: link.hash,
                        });
                    }
                }
            }
            return Ok(());
        }

        if let Ok(Object::Tree(links)) = Object::decode(digest, bytes) {
            if directory_digest(self.provider.new_hasher(), &links) == *digest {
                walk.report.directories += 1;
                for link in &links {
                    let child_path = format!("{path}/{}", link.name);
                    let first_visit = walk.seen.insert(link.hash);
                    let Some(child) = self.fetch(&link.hash, &child_path, walk)? else {
                        continue;
                    };
                    if child.len() as u64 != link.size {
                        walk.report.violations.push(Violation::SizeMismatch {
                            path: child_path.clone(),
                            digest: link.hash,
                            recorded: link.size,
                            actual: child.len() as u64,
                        });
                    }
                    if first_visit {
                        self.check(&link.hash, &child, &child_path, walk)?;
                    }
                }
                return Ok(());
            }
        }

        walk.report.blobs += 1;
        if self.provider.digest(bytes) != *digest {
            walk.report.violations.push(Violation::DigestMismatch {
                path: display_path(path),
                digest: *digest,
            });
        }
        Ok(())
    }

    /// Fetch a child not yet visited. Missing children become violations.
    fn fetch_child(
        &self,
        digest: &Digest,
        path: &str,
        walk: &mut Walk,
    ) -> DagResult<Option<Vec<u8>>> {
        if !walk.seen.insert(*digest) {
            return Ok(None);
        }
        self.fetch(digest, path, walk)
    }

    /// Fetch a child. A missing child becomes a violation.
    fn fetch(&self, digest: &Digest, path: &str, walk: &mut Walk) -> DagResult<Option<Vec<u8>>> {
        match self.store.get(digest) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.is_not_found() => {
                walk.report.violations.push(Violation::Missing {
                    path: path.to_string(),
                    digest: *digest,
                });
                Ok(None)
            }
            Err(e) => Err(DagError::Store(e)),
        }
    }
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::DagBuilder;
    use crate::node::MemoryNode;
    use crate::object::Link;
    use crate::testing::FailingStore;
    use mdag_store::{InMemoryBlobStore, StoreError};

    const SMALL: usize = 8;

    fn sample() -> MemoryNode {
        MemoryNode::dir()
            .with_child("a.txt", "hello")
            .with_child("big.bin", "0123456789")
            .with_child("sub", MemoryNode::dir().with_child("b.txt", "world"))
            .into()
    }

    fn build(store: &InMemoryBlobStore) -> Digest {
        DagBuilder::with_provider(store, HashAlgorithm::Sha256, SMALL)
            .unwrap()
            .add(&sample())
            .unwrap()
    }

    fn verifier(store: &InMemoryBlobStore) -> Verifier<'_, InMemoryBlobStore> {
        Verifier::new(store, &DagConfig::default())
    }

    /// Copy every entry of `store` except `skip`, replacing `tamper` values.
    fn copy_with(
        store: &InMemoryBlobStore,
        skip: Option<Digest>,
        tamper: Option<(Digest, &[u8])>,
    ) -> InMemoryBlobStore {
        let copy = InMemoryBlobStore::new();
        for key in store.all_keys() {
            if Some(key) == skip {
                continue;
            }
            match tamper {
                Some((k, value)) if k == key => copy.put(&key, value).unwrap(),
                _ => copy.put(&key, &store.get(&key).unwrap()).unwrap(),
            }
        }
        copy
    }

    #[test]
    fn intact_tree_verifies() {
        let store = InMemoryBlobStore::new();
        let root = build(&store);
        let report = verifier(&store).verify(&root).unwrap();
        assert!(report.is_valid(), "{:?}", report.violations);
        assert_eq!(report.directories, 2);
        assert_eq!(report.chunk_indexes, 1);
        // hello, world, and two chunks of big.bin.
        assert_eq!(report.blobs, 4);
    }

    #[test]
    fn single_file_root_verifies() {
        let store = InMemoryBlobStore::new();
        let root = DagBuilder::new(&store, &DagConfig::default())
            .unwrap()
            .add(&MemoryNode::file("lonely"))
            .unwrap();
        let report = verifier(&store).verify(&root).unwrap();
        assert!(report.is_valid());
        assert_eq!(report.blobs, 1);
    }

    #[test]
    fn tampered_file_is_detected() {
        let store = InMemoryBlobStore::new();
        let root = build(&store);
        let hello = HashAlgorithm::Sha256.digest(b"hello");
        let tampered = copy_with(&store, None, Some((hello, &b"HELLO"[..])));

        let report = verifier(&tampered).verify(&root).unwrap();
        assert_eq!(
            report.violations,
            vec![Violation::DigestMismatch {
                path: "/a.txt".into(),
                digest: hello
            }]
        );
    }

    #[test]
    fn tampered_chunk_is_detected() {
        let store = InMemoryBlobStore::new();
        let root = build(&store);
        let chunk = HashAlgorithm::Sha256.digest(b"01234567");
        let tampered = copy_with(&store, None, Some((chunk, &b"XXXXXXXX"[..])));

        let report = verifier(&tampered).verify(&root).unwrap();
        assert_eq!(
            report.violations,
            vec![Violation::DigestMismatch {
                path: "/big.bin#0".into(),
                digest: chunk
            }]
        );
    }

    #[test]
    fn missing_child_is_reported() {
        let store = InMemoryBlobStore::new();
        let root = build(&store);
        let world = HashAlgorithm::Sha256.digest(b"world");
        let partial = copy_with(&store, Some(world), None);

        let report = verifier(&partial).verify(&root).unwrap();
        assert!(!report.is_valid());
        assert_eq!(
            report.violations,
            vec![Violation::Missing {
                path: "/sub/b.txt".into(),
                digest: world
            }]
        );
        assert!(report.violations[0].to_string().contains("missing object"));
    }

    #[test]
    fn wrong_link_size_is_reported() {
        let store = InMemoryBlobStore::new();
        let hello = HashAlgorithm::Sha256.digest(b"hello");
        store.put(&hello, b"hello").unwrap();
        let links = vec![Link::named("a.txt", hello, 99)];
        let root = directory_digest(HashAlgorithm::Sha256.new_hasher(), &links);
        store.put(&root, &Object::Tree(links).encode().unwrap()).unwrap();

        let report = verifier(&store).verify(&root).unwrap();
        assert!(matches!(
            report.violations.as_slice(),
            [Violation::SizeMismatch { recorded: 99, actual: 5, .. }]
        ));
    }

    #[test]
    fn wrong_size_on_repeated_child_is_reported() {
        let store = InMemoryBlobStore::new();
        let hello = HashAlgorithm::Sha256.digest(b"hello");
        store.put(&hello, b"hello").unwrap();
        let links = vec![Link::named("a.txt", hello, 5), Link::named("b.txt", hello, 42)];
        let root = directory_digest(HashAlgorithm::Sha256.new_hasher(), &links);
        store.put(&root, &Object::Tree(links).encode().unwrap()).unwrap();

        let report = verifier(&store).verify(&root).unwrap();
        assert_eq!(report.blobs, 1);
        assert!(matches!(
            report.violations.as_slice(),
            [Violation::SizeMismatch { path, recorded: 42, actual: 5, .. }] if path == "/b.txt"
        ));
    }

    #[test]
    fn tampered_root_is_detected() {
        let store = InMemoryBlobStore::new();
        let root = build(&store);
        let other = InMemoryBlobStore::new();
        let stray = DagBuilder::new(&other, &DagConfig::default())
            .unwrap()
            .add(&MemoryNode::dir().with_child("x", "y"))
            .unwrap();
        let stray_bytes = other.get(&stray).unwrap();
        let replaced = copy_with(&store, None, Some((root, stray_bytes.as_slice())));

        let report = verifier(&replaced).verify(&root).unwrap();
        assert_eq!(
            report.violations,
            vec![Violation::DigestMismatch {
                path: "/".into(),
                digest: root
            }]
        );
    }

    #[test]
    fn missing_root_is_an_error() {
        let store = InMemoryBlobStore::new();
        let err = verifier(&store).verify(&Digest::from_hash([4; 32])).unwrap_err();
        assert!(matches!(err, DagError::Store(StoreError::NotFound(_))));
    }

    #[test]
    fn backend_failure_aborts() {
        let inner = InMemoryBlobStore::new();
        let root = build(&inner);
        let world = HashAlgorithm::Sha256.digest(b"world");
        let store = FailingStore::unreadable(inner, world);
        let err = Verifier::new(&store, &DagConfig::default()).verify(&root).unwrap_err();
        assert!(matches!(err, DagError::Store(StoreError::ReadFailed { .. })));
    }
}
