//! Whole-file reads, reassembling chunked files.
//!
//! A stored value is a chunk index only if it decodes to two or more
//! anonymous links whose in-order digest reproduces the key it was read
//! from. Anything else is file content, even if it happens to parse as an
//! object envelope.

use tracing::debug;

use mdag_crypto::{HashAlgorithm, HashProvider};
use mdag_store::BlobStore;
use mdag_types::Digest;

use crate::builder::chunk_index_digest;
use crate::config::DagConfig;
use crate::error::DagResult;
use crate::object::{Link, Object};
use crate::resolver::Resolver;

/// Reads file content back out of a DAG.
pub struct FileReader<'a, S: BlobStore + ?Sized, P: HashProvider = HashAlgorithm> {
    store: &'a S,
    provider: P,
}

impl<'a, S: BlobStore + ?Sized> FileReader<'a, S, HashAlgorithm> {
    pub fn new(store: &'a S, config: &DagConfig) -> Self {
        Self::with_provider(store, config.hash)
    }
}

impl<'a, S: BlobStore + ?Sized, P: HashProvider> FileReader<'a, S, P> {
    pub fn with_provider(store: &'a S, provider: P) -> Self {
        Self { store, provider }
    }

    /// Full content of the file stored under `digest`.
    pub fn read(&self, digest: &Digest) -> DagResult<Vec<u8>> {
        let bytes = self.store.get(digest)?;
        let Some(chunks) = self.chunk_links(digest, &bytes) else {
            return Ok(bytes);
        };
        let mut content = Vec::new();
        for link in &chunks {
            content.extend_from_slice(&self.store.get(&link.hash)?);
        }
        debug!(
            file = %digest.short_hex(),
            chunks = chunks.len(),
            len = content.len(),
            "reassembled file"
        );
        Ok(content)
    }

    /// Full content of the file at `path` under `root`.
    pub fn read_path(&self, root: &Digest, path: &str) -> DagResult<Option<Vec<u8>>> {
        match Resolver::new(self.store).resolve_digest(root, path)? {
            Some(digest) => self.read(&digest).map(Some),
            None => Ok(None),
        }
    }

    /// The chunk links of `bytes` if it is the chunk index for `digest`.
    pub(crate) fn chunk_links(&self, digest: &Digest, bytes: &[u8]) -> Option<Vec<Link>> {
        is_chunk_index(&self.provider, digest, bytes)
    }
}

pub(crate) fn is_chunk_index<P: HashProvider>(
    provider: &P,
    digest: &Digest,
    bytes: &[u8],
) -> Option<Vec<Link>> {
    let Ok(Object::Tree(links)) = Object::decode(digest, bytes) else {
        return None;
    };
    let anonymous = links.len() >= 2 && links.iter().all(|l| l.name.is_empty());
    (anonymous && chunk_index_digest(provider.new_hasher(), &links) == *digest).then_some(links)
}
