//! Hash function providers for the Merkle DAG.
//!
//! The DAG builder never hashes through a shared global. It asks a
//! [`HashProvider`] for a fresh [`DigestHasher`] per logical hashing task
//! (one per file, one per chunk, one per directory) and owns it for the
//! duration of that task.
//!
//! All crypto operations wrap established libraries; there is no custom cryptography.

pub mod hasher;

pub use hasher::{AlgorithmHasher, DigestHasher, HashAlgorithm, HashProvider};
