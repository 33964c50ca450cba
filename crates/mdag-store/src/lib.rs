//! Digest-keyed blob storage for the Merkle DAG.
//!
//! A blob store is a pure key/value map from [`Digest`] to opaque bytes.
//! The DAG builder decides what the bytes mean; the store never interprets
//! them.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. Values are immutable once written (content-addressing guarantees this).
//! 2. A repeated `put` of an identical key/value pair is a no-op success.
//! 3. Concurrent reads are always safe.
//! 4. All backend errors are propagated, never silently ignored.
//!
//! [`Digest`]: mdag_types::Digest

pub mod error;
pub mod memory;
pub mod traits;

// Re-export primary types at crate root for ergonomic imports.
pub use error::{StoreError, StoreResult};
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
