//! Error types for DAG construction and resolution.

use mdag_store::StoreError;
use mdag_types::Digest;

/// Errors that can occur during DAG operations.
///
/// Every variant is fatal to the call that produced it. A lookup that simply
/// finds no matching name is not an error; resolvers report it as `None`.
#[derive(Debug, thiserror::Error)]
pub enum DagError {
    /// The blob store failed a read or write.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// An object could not be encoded for storage.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The bytes stored under a digest are not a valid tree object.
    #[error("cannot decode object {id}: {reason}")]
    Decode {
        /// The digest whose stored bytes failed to decode.
        id: Digest,
        /// What went wrong.
        reason: String,
    },

    /// A tree node reported a variant other than file or directory.
    #[error("unsupported node variant: {kind}")]
    UnsupportedNode {
        /// The producer's name for the variant (e.g. `"symlink"`).
        kind: String,
    },

    /// The configuration is not usable.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for DAG results.
pub type DagResult<T> = Result<T, DagError>;
