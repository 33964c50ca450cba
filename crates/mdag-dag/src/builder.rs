//! Recursive construction of the Merkle DAG.
//!
//! [`DagBuilder::add`] turns a [`TreeNode`] into stored objects and returns
//! the root digest:
//!
//! - a small file is one blob keyed by the hash of its bytes;
//! - a large file is a run of chunk blobs plus a chunk index keyed by the
//!   hash of the chunk digests in order;
//! - a directory is a tree of named links keyed by the hash of its child
//!   digests in ascending byte order, so enumeration order never changes
//!   the result.
//!
//! Every hashing task gets its own accumulator from the [`HashProvider`].
//! The first failed store write or encode aborts the whole call; whatever
//! was written before stays in the store and is reused on retry.

use tracing::{debug, info};

use mdag_crypto::{DigestHasher, HashAlgorithm, HashProvider};
use mdag_store::BlobStore;
use mdag_types::Digest;

use crate::chunker;
use crate::config::DagConfig;
use crate::error::{DagError, DagResult};
use crate::node::{NodeView, TreeNode};
use crate::object::{Link, Object};

/// Builds DAGs into a blob store.
pub struct DagBuilder<'a, S: BlobStore + ?Sized, P: HashProvider = HashAlgorithm> {
    store: &'a S,
    provider: P,
    chunk_size: usize,
}

/// Counters for one `add` call.
#[derive(Clone, Copy, Debug, Default)]
struct AddStats {
    blobs: usize,
    trees: usize,
    bytes: u64,
}

impl<'a, S: BlobStore + ?Sized> DagBuilder<'a, S, HashAlgorithm> {
    /// Create a builder from configuration.
    pub fn new(store: &'a S, config: &DagConfig) -> DagResult<Self> {
        Self::with_provider(store, config.hash, config.chunk_size)
    }
}

impl<'a, S: BlobStore + ?Sized, P: HashProvider> DagBuilder<'a, S, P> {
    /// Create a builder with a custom hash provider.
    pub fn with_provider(store: &'a S, provider: P, chunk_size: usize) -> DagResult<Self> {
        if chunk_size == 0 {
            return Err(DagError::InvalidConfig("chunk_size must be greater than zero".into()));
        }
        Ok(Self {
            store,
            provider,
            chunk_size,
        })
    }

    /// Add `node` (recursively) and return its digest.
    pub fn add(&self, node: &dyn TreeNode) -> DagResult<Digest> {
        self.add_with_hasher(node, self.provider.new_hasher())
    }

    /// Add `node` using `hasher` for the root digest.
    ///
    /// Anything already fed into `hasher` becomes a prefix of the root's
    /// hash input. Children always get fresh accumulators.
    pub fn add_with_hasher(&self, node: &dyn TreeNode, hasher: P::Hasher) -> DagResult<Digest> {
        let mut stats = AddStats::default();
        let (digest, _) = self.add_node(node, hasher, &mut stats)?;
        info!(
            root = %digest.short_hex(),
            blobs = stats.blobs,
            trees = stats.trees,
            bytes = stats.bytes,
            "added tree"
        );
        Ok(digest)
    }

    /// Returns the node's digest and the byte length of its stored value.
    fn add_node(
        &self,
        node: &dyn TreeNode,
        mut hasher: P::Hasher,
        stats: &mut AddStats,
    ) -> DagResult<(Digest, u64)> {
        match node.view() {
            NodeView::File(content) => {
                if chunker::needs_chunking(content.len(), self.chunk_size) {
                    return self.add_chunked(&content, hasher, stats);
                }
                hasher.update(&content);
                let digest = hasher.finalize();
                self.put_blob(&digest, &content, stats)?;
                Ok((digest, content.len() as u64))
            }
            NodeView::Directory(children) => {
                let mut links = Vec::new();
                for (name, child) in children {
                    let (child_digest, size) =
                        self.add_node(child, self.provider.new_hasher(), stats)?;
                    links.push(Link::named(name, child_digest, size));
                }
                let digest = directory_digest(hasher, &links);
                let stored = self.put_tree(&digest, Object::Tree(links), stats)?;
                Ok((digest, stored))
            }
            NodeView::Unsupported { kind } => Err(DagError::UnsupportedNode { kind }),
        }
    }

    fn add_chunked(
        &self,
        content: &[u8],
        hasher: P::Hasher,
        stats: &mut AddStats,
    ) -> DagResult<(Digest, u64)> {
        let mut links = Vec::with_capacity(chunker::chunk_count(content.len(), self.chunk_size));
        for chunk in chunker::chunks(content, self.chunk_size) {
            let chunk_digest = self.provider.digest(chunk);
            self.put_blob(&chunk_digest, chunk, stats)?;
            links.push(Link::chunk(chunk_digest));
        }
        let digest = chunk_index_digest(hasher, &links);
        debug!(
            file = %digest.short_hex(),
            len = content.len(),
            chunks = links.len(),
            "chunked file"
        );
        let stored = self.put_tree(&digest, Object::Tree(links), stats)?;
        Ok((digest, stored))
    }

    fn put_blob(&self, digest: &Digest, bytes: &[u8], stats: &mut AddStats) -> DagResult<()> {
        self.store.put(digest, bytes)?;
        stats.blobs += 1;
        stats.bytes += bytes.len() as u64;
        debug!(digest = %digest.short_hex(), len = bytes.len(), "stored blob");
        Ok(())
    }

    fn put_tree(&self, digest: &Digest, object: Object, stats: &mut AddStats) -> DagResult<u64> {
        let links = object.links().len();
        let bytes = object.encode()?;
        self.store.put(digest, &bytes)?;
        stats.trees += 1;
        stats.bytes += bytes.len() as u64;
        debug!(digest = %digest.short_hex(), links, len = bytes.len(), "stored tree");
        Ok(bytes.len() as u64)
    }
}

/// Digest of a chunk index: the chunk digests fed in chunk order.
pub fn chunk_index_digest<H: DigestHasher>(mut hasher: H, links: &[Link]) -> Digest {
    for link in links {
        hasher.update(link.hash.as_bytes());
    }
    hasher.finalize()
}

/// Digest of a directory: the child digests fed in ascending byte order.
pub fn directory_digest<H: DigestHasher>(mut hasher: H, links: &[Link]) -> Digest {
    let mut sorted: Vec<&Digest> = links.iter().map(|l| &l.hash).collect();
    sorted.sort();
    for digest in sorted {
        hasher.update(digest.as_bytes());
    }
    hasher.finalize()
}
