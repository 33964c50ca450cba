//! Foundation types for the Merkle DAG.
//!
//! Every other `mdag-*` crate depends on `mdag-types`. It deliberately knows
//! nothing about hash algorithms: a [`Digest`] is just the 256-bit output of
//! whichever function the caller configured.
//!
//! # Key Types
//!
//! - [`Digest`]: content-derived identifier, the sole key space of a blob store
//! - [`TypeError`]: parse failures for digests

pub mod digest;
pub mod error;

pub use digest::{Digest, DIGEST_LEN};
pub use error::TypeError;
