use mdag_types::Digest;

/// Errors from blob store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No value is stored under the requested key.
    #[error("blob not found: {0}")]
    NotFound(Digest),

    /// The backend rejected a `put`.
    #[error("write of {key} failed: {reason}")]
    WriteFailed { key: Digest, reason: String },

    /// The backend failed a `get` for a reason other than absence.
    #[error("read of {key} failed: {reason}")]
    ReadFailed { key: Digest, reason: String },
}

impl StoreError {
    /// Returns `true` for the not-found case.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
