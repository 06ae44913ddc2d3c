#![warn(missing_docs)]
//! Deterministic testing surfaces: chunk digests and worldtest metrics.

mod digest;
mod metrics;

use anyhow::Result;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

pub use digest::*;
pub use metrics::*;

/// One line of a generation trace captured by worldtests.
#[derive(Debug, Serialize)]
pub struct ChunkRecord<'a> {
    /// Chunk coordinates [x, z].
    pub chunk: [i32; 2],
    /// Human-readable phase label.
    pub phase: &'a str,
    /// Content digest (hex string) for deterministic comparisons.
    pub digest: String,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append a record to the log.
    pub fn write(&mut self, record: &ChunkRecord<'_>) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
