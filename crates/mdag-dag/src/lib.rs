//! Content-addressed Merkle DAG over a blob store.
//!
//! Converts a tree of files and directories into immutable objects keyed by
//! their digest, and resolves names back to stored bytes.
//!
//! # Operations
//!
//! - [`DagBuilder::add`] -- store a tree, return its root digest
//! - [`Resolver::resolve`] -- stored bytes of one named child under a tree
//! - [`FileReader::read`] -- full content of a file, reassembling chunks
//! - [`Verifier::verify`] -- recompute every digest reachable from a root
//!
//! # Digests
//!
//! | object      | digest input                              |
//! |-------------|-------------------------------------------|
//! | small file  | file bytes                                |
//! | chunk       | chunk bytes                               |
//! | large file  | chunk digests, in chunk order             |
//! | directory   | child digests, ascending byte order       |
//!
//! Directory digests cover child contents only. Two directories holding
//! the same contents under different names share a digest, and the store
//! keeps whichever tree object was written first.

pub mod builder;
pub mod chunker;
pub mod config;
pub mod error;
pub mod node;
pub mod object;
pub mod reader;
pub mod resolver;
pub mod verify;

#[cfg(test)]
mod testing;

pub use builder::{chunk_index_digest, directory_digest, DagBuilder};
pub use chunker::MAX_BLOB_SIZE;
pub use config::DagConfig;
pub use error::{DagError, DagResult};
pub use node::{MemoryDirectory, MemoryNode, NodeView, TreeNode};
pub use object::{Link, Object};
pub use reader::FileReader;
pub use resolver::Resolver;
pub use verify::{Verifier, VerifyReport, Violation};
