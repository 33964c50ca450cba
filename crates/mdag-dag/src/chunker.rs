//! Fixed-size chunking of large file content.

/// Largest file stored as a single blob, and the size of every chunk but
/// the last when a file is split (256 KiB).
pub const MAX_BLOB_SIZE: usize = 256 * 1024;

/// Returns `true` if content of `len` bytes must be split.
///
/// Content of exactly `chunk_size` bytes is stored whole.
pub fn needs_chunking(len: usize, chunk_size: usize) -> bool {
    len > chunk_size
}

/// Split `data` into consecutive `chunk_size` slices.
///
/// Every chunk is exactly `chunk_size` bytes except the last, which holds
/// the remainder (between 1 and `chunk_size` bytes). Empty input yields no
/// chunks.
///
/// # Panics
///
/// Panics if `chunk_size` is zero. Configurations are validated before
/// any builder runs.
pub fn chunks(data: &[u8], chunk_size: usize) -> std::slice::Chunks<'_, u8> {
    data.chunks(chunk_size)
}

/// Number of chunks `chunks` would yield for `len` bytes.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}
