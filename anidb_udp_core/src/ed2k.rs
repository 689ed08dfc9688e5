//! ED2K content hashing
//!
//! Data is split into 9 728 000-byte chunks, each chunk is MD4-hashed and the
//! digest of the concatenated chunk digests is the file hash. Data shorter
//! than one chunk, or exactly one chunk long, hashes to the plain MD4 digest.
//! When the size is an exact multiple of the chunk size (two chunks or more),
//! the digest of an empty chunk is appended before the final hash.

use md4::{Digest, Md4};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// ED2K chunk size in bytes
pub const CHUNK_SIZE: usize = 9_728_000;

const READ_BUFFER_SIZE: usize = 64 * 1024;

/// Streaming ED2K hasher
#[derive(Default)]
pub struct Ed2kHasher {
    current: Md4,
    current_len: usize,
    chunk_hashes: Vec<u8>,
    total: u64,
}

impl Ed2kHasher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed more data
    pub fn update(&mut self, data: &[u8]) {
        let mut remaining = data;

        while !remaining.is_empty() {
            let to_copy = remaining.len().min(CHUNK_SIZE - self.current_len);
            self.current.update(&remaining[..to_copy]);
            self.current_len += to_copy;
            remaining = &remaining[to_copy..];

            if self.current_len == CHUNK_SIZE {
                self.finish_chunk();
            }
        }

        self.total += data.len() as u64;
    }

    fn finish_chunk(&mut self) {
        let digest = std::mem::take(&mut self.current).finalize();
        self.chunk_hashes.extend_from_slice(&digest);
        self.current_len = 0;
    }

    /// Bytes fed so far
    pub fn len(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Finish and return the lowercase hex digest
    pub fn finalize(mut self) -> String {
        if self.chunk_hashes.is_empty() {
            // Shorter than one chunk
            return format!("{:x}", self.current.finalize());
        }

        if self.total == CHUNK_SIZE as u64 {
            return hex(&self.chunk_hashes);
        }

        // Either the partial last chunk or, on an exact multiple, an empty one
        self.finish_chunk();

        format!("{:x}", Md4::digest(&self.chunk_hashes))
    }
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Hash an in-memory buffer
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Ed2kHasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Hash a file, returning its size and digest
pub fn hash_file(path: impl AsRef<Path>) -> io::Result<(u64, String)> {
    let mut file = File::open(path.as_ref())?;
    let mut hasher = Ed2kHasher::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];

    loop {
        let read = file.read(&mut buffer)?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok((hasher.len(), hasher.finalize()))
}
