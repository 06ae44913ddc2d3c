//! Content digests for generated chunks.
//!
//! Digests let worldtests assert that two generation runs produced the same
//! voxels without holding both chunks in memory.

use blake3::Hasher;
use std::fmt;

/// 32-byte blake3 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkDigest(pub [u8; 32]);

impl ChunkDigest {
    /// Lowercase hex form.
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ChunkDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Incremental digest over chunk sections and biome bytes.
///
/// Absent sections hash differently from sections that happen to hold only
/// air, so allocation behaviour is covered too.
pub struct ChunkHasher {
    hasher: Hasher,
}

impl ChunkHasher {
    /// Start a digest for the chunk at `(x, z)`.
    pub fn new(x: i32, z: i32) -> Self {
        let mut hasher = Hasher::new();
        hasher.update(&x.to_le_bytes());
        hasher.update(&z.to_le_bytes());
        Self { hasher }
    }

    /// Feed one section slot, bottom to top.
    pub fn section(&mut self, blocks: Option<&[u16]>) -> &mut Self {
        match blocks {
            None => {
                self.hasher.update(&[0]);
            }
            Some(blocks) => {
                self.hasher.update(&[1]);
                for id in blocks {
                    self.hasher.update(&id.to_le_bytes());
                }
            }
        }
        self
    }

    /// Feed the per-column biome ids.
    pub fn biomes(&mut self, ids: impl IntoIterator<Item = u8>) -> &mut Self {
        let bytes: Vec<u8> = ids.into_iter().collect();
        self.hasher.update(&(bytes.len() as u32).to_le_bytes());
        self.hasher.update(&bytes);
        self
    }

    /// Finish the digest.
    pub fn finish(&self) -> ChunkDigest {
        ChunkDigest(*self.hasher.finalize().as_bytes())
    }
}

/// Order-sensitive digest over many chunk digests.
#[derive(Default)]
pub struct RegionDigest {
    hasher: Hasher,
    chunks: usize,
}

impl RegionDigest {
    /// Empty region digest.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one chunk digest.
    pub fn push(&mut self, digest: &ChunkDigest) {
        self.hasher.update(&digest.0);
        self.chunks += 1;
    }

    /// Number of chunks fed so far.
    pub fn len(&self) -> usize {
        self.chunks
    }

    /// Whether no chunk has been fed.
    pub fn is_empty(&self) -> bool {
        self.chunks == 0
    }

    /// Finish the digest.
    pub fn finish(&self) -> ChunkDigest {
        ChunkDigest(*self.hasher.finalize().as_bytes())
    }
}
