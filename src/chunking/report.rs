//! Per-variable chunk size estimates.

use serde::Serialize;

use crate::dataset::DataType;

/// Estimated memory of one chunk of a single variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkEstimate {
    pub variable: String,
    pub dtype: DataType,
    pub bytes_per_element: u64,
    pub chunk_bytes: u64,
    /// `chunk_bytes` is strictly greater than the threshold
    pub exceeds: bool,
}

/// Result of a chunk size check over a whole dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChunkSizeReport {
    pub threshold_bytes: u64,
    pub elements_per_chunk: u64,
    /// One entry per data variable, in dataset order
    pub estimates: Vec<ChunkEstimate>,
}

impl ChunkSizeReport {
    pub fn oversized(&self) -> impl Iterator<Item = &ChunkEstimate> {
        self.estimates.iter().filter(|e| e.exceeds)
    }

    pub fn is_within_limit(&self) -> bool {
        !self.estimates.iter().any(|e| e.exceeds)
    }

    pub fn estimate(&self, variable: &str) -> Option<&ChunkEstimate> {
        self.estimates.iter().find(|e| e.variable == variable)
    }

    /// Largest per-variable chunk, if the dataset has any variables.
    pub fn largest(&self) -> Option<&ChunkEstimate> {
        self.estimates.iter().max_by_key(|e| e.chunk_bytes)
    }
}
