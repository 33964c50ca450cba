use serde::{Deserialize, Serialize};
use sha2::Digest as Sha2Digest;

use mdag_types::Digest;

/// Incremental hash accumulator.
///
/// Bytes are fed with [`update`](Self::update) any number of times;
/// [`finalize`](Self::finalize) reads the digest without consuming or
/// mutating the accumulator, so reading it twice yields the same value.
pub trait DigestHasher {
    /// Feed more bytes into the accumulator.
    fn update(&mut self, data: &[u8]);

    /// Read the digest of everything fed so far.
    fn finalize(&self) -> Digest;
}

/// Supplies fresh accumulators on demand.
///
/// Every call to [`new_hasher`](Self::new_hasher) must return an accumulator
/// with empty state. Reusing one accumulator across sibling computations is
/// a correctness bug; callers own what they are given.
pub trait HashProvider {
    type Hasher: DigestHasher;

    /// Create a fresh accumulator.
    fn new_hasher(&self) -> Self::Hasher;

    /// One-shot hash of a byte slice.
    fn digest(&self, data: &[u8]) -> Digest {
        let mut hasher = self.new_hasher();
        hasher.update(data);
        hasher.finalize()
    }
}

impl DigestHasher for sha2::Sha256 {
    fn update(&mut self, data: &[u8]) {
        Sha2Digest::update(self, data);
    }

    fn finalize(&self) -> Digest {
        let out = Sha2Digest::finalize(self.clone());
        let mut hash = [0u8; 32];
        hash.copy_from_slice(&out);
        Digest::from_hash(hash)
    }
}

impl DigestHasher for blake3::Hasher {
    fn update(&mut self, data: &[u8]) {
        blake3::Hasher::update(self, data);
    }

    fn finalize(&self) -> Digest {
        Digest::from_hash(*blake3::Hasher::finalize(self).as_bytes())
    }
}

/// The built-in hash functions, selectable from configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    /// SHA-256.
    #[default]
    Sha256,
    /// BLAKE3 with its default 256-bit output.
    Blake3,
}

impl HashAlgorithm {
    /// Canonical lowercase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }
}

impl std::fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Accumulator for a [`HashAlgorithm`] chosen at runtime.
#[derive(Clone)]
pub enum AlgorithmHasher {
    Sha256(sha2::Sha256),
    Blake3(Box<blake3::Hasher>),
}

impl DigestHasher for AlgorithmHasher {
    fn update(&mut self, data: &[u8]) {
        match self {
            Self::Sha256(h) => DigestHasher::update(h, data),
            Self::Blake3(h) => DigestHasher::update(&mut **h, data),
        }
    }

    fn finalize(&self) -> Digest {
        match self {
            Self::Sha256(h) => DigestHasher::finalize(h),
            Self::Blake3(h) => DigestHasher::finalize(&**h),
        }
    }
}

impl HashProvider for HashAlgorithm {
    type Hasher = AlgorithmHasher;

    fn new_hasher(&self) -> AlgorithmHasher {
        match self {
            Self::Sha256 => AlgorithmHasher::Sha256(sha2::Sha256::new()),
            Self::Blake3 => AlgorithmHasher::Blake3(Box::new(blake3::Hasher::new())),
        }
    }
}
