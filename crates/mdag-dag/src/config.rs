use serde::{Deserialize, Serialize};

use mdag_crypto::HashAlgorithm;

use crate::chunker::MAX_BLOB_SIZE;
use crate::error::{DagError, DagResult};

/// Configuration for building and reading a DAG.
///
/// Builders and readers of the same DAG must agree on `hash`; digests
/// produced under one algorithm mean nothing under another.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DagConfig {
    /// Files larger than this are split into chunks of exactly this size
    /// (the last chunk holds the remainder).
    pub chunk_size: usize,
    /// Hash function used for every digest.
    pub hash: HashAlgorithm,
}

impl Default for DagConfig {
    fn default() -> Self {
        Self {
            chunk_size: MAX_BLOB_SIZE,
            hash: HashAlgorithm::Sha256,
        }
    }
}

impl DagConfig {
    /// Default configuration with a different hash function.
    pub fn with_hash(hash: HashAlgorithm) -> Self {
        Self {
            hash,
            ..Default::default()
        }
    }

    /// Reject configurations no builder can run with.
    pub fn validate(&self) -> DagResult<()> {
        if self.chunk_size == 0 {
            return Err(DagError::InvalidConfig("chunk_size must be greater than zero".into()));
        }
        Ok(())
    }
}
