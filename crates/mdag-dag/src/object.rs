//! The persisted data model: [`Link`] and [`Object`].
//!
//! Blob-shape objects are stored as their raw bytes. Tree-shape objects are
//! stored as a self-describing JSON record:
//!
//! ```text
//! {"links":[{"name":"a.txt","hash":[44,242,...],"size":5}, ...]}
//! ```
//!
//! Empty fields are omitted. Digests are written as their raw byte values,
//! never as hex or base64 text.
//!
//! A tree with no links is stored as zero bytes. An empty directory and an
//! empty file share the key `H("")`, so both must store the same value.

use serde::{Deserialize, Serialize};

use mdag_types::Digest;

use crate::error::{DagError, DagResult};

/// A reference from a parent object to a child.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    /// Entry name. Empty for anonymous chunk links.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Digest of the child.
    pub hash: Digest,
    /// Byte length of the child's stored value. Unset (0) for chunk links.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: u64,
}

fn is_zero(v: &u64) -> bool {
    *v == 0
}

impl Link {
    /// A named directory entry.
    pub fn named(name: impl Into<String>, hash: Digest, size: u64) -> Self {
        Self {
            name: name.into(),
            hash,
            size,
        }
    }

    /// An anonymous link to one chunk of a large file.
    pub fn chunk(hash: Digest) -> Self {
        Self {
            name: String::new(),
            hash,
            size: 0,
        }
    }
}

/// The unit persisted in the blob store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Object {
    /// Raw file bytes (a whole small file, or one chunk).
    Blob(Vec<u8>),
    /// Ordered child references (a directory, or a chunk index).
    Tree(Vec<Link>),
}

/// Wire form of an object envelope. Both fields are optional on the wire.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ObjectRecord {
    #[serde(default)]
    links: Vec<Link>,
    #[serde(default)]
    data: Vec<u8>,
}

impl Object {
    /// Encode for storage.
    ///
    /// Blobs are stored verbatim. Trees are stored as a JSON record, except
    /// the empty tree, which is stored as zero bytes.
    pub fn encode(&self) -> DagResult<Vec<u8>> {
        match self {
            Self::Blob(data) => Ok(data.clone()),
            Self::Tree(links) if links.is_empty() => Ok(Vec::new()),
            Self::Tree(links) => encode_links(links),
        }
    }

    /// Decode a stored envelope read from under `id`.
    ///
    /// Raw blob values carry no envelope and are generally not decodable;
    /// callers that may hold a blob should treat a decode error as such.
    /// An empty value decodes as the empty tree.
    pub fn decode(id: &Digest, bytes: &[u8]) -> DagResult<Self> {
        if bytes.is_empty() {
            return Ok(Self::Tree(Vec::new()));
        }
        let record: ObjectRecord =
            serde_json::from_slice(bytes).map_err(|e| DagError::Decode {
                id: *id,
                reason: e.to_string(),
            })?;
        match (record.links.is_empty(), record.data.is_empty()) {
            (false, false) => Err(DagError::Decode {
                id: *id,
                reason: "object carries both links and data".into(),
            }),
            (true, false) => Ok(Self::Blob(record.data)),
            _ => Ok(Self::Tree(record.links)),
        }
    }

    /// Decode a stored envelope that must be tree-shaped.
    pub fn decode_tree(id: &Digest, bytes: &[u8]) -> DagResult<Vec<Link>> {
        match Self::decode(id, bytes)? {
            Self::Tree(links) => Ok(links),
            Self::Blob(_) => Err(DagError::Decode {
                id: *id,
                reason: "expected tree object, found blob".into(),
            }),
        }
    }

    /// The links of a tree object; empty for a blob.
    pub fn links(&self) -> &[Link] {
        match self {
            Self::Blob(_) => &[],
            Self::Tree(links) => links,
        }
    }
}

fn encode_links(links: &[Link]) -> DagResult<Vec<u8>> {
    #[derive(Serialize)]
    struct TreeRecordRef<'a> {
        links: &'a [Link],
    }
    serde_json::to_vec(&TreeRecordRef { links })
        .map_err(|e| DagError::Serialization(e.to_string()))
}
