//! Chunk plans: dimension name -> chunk length.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ChunkGuardError, Result, ResultExt as _};

/// Requested chunk length per dimension.
///
/// Iterates in dimension-name order. Lengths are taken as given; zero is
/// accepted and simply yields an empty chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkPlan {
    chunks: BTreeMap<String, u64>,
}

impl ChunkPlan {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_chunk(mut self, dimension: impl Into<String>, length: u64) -> Self {
        self.chunks.insert(dimension.into(), length);
        self
    }

    pub fn get(&self, dimension: &str) -> Option<u64> {
        self.chunks.get(dimension).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.chunks.iter().map(|(dim, len)| (dim.as_str(), *len))
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.chunks.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Product of all chunk lengths, saturating at `u64::MAX`.
    ///
    /// An empty plan describes a single element.
    pub fn element_count(&self) -> u64 {
        self.chunks
            .values()
            .fold(1u64, |acc, &len| acc.saturating_mul(len))
    }

    /// Load a plan from a JSON object file, e.g. `{"x": 1024, "y": 1024}`
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read chunk plan {}", path.display()))?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ChunkGuardError::InvalidChunkPlan(e.to_string()))
    }
}

/// Parses `dim=len` pairs separated by commas, e.g. `x=1024,y=1024,time=24`.
impl FromStr for ChunkPlan {
    type Err = ChunkGuardError;

    fn from_str(s: &str) -> Result<Self> {
        let mut chunks = BTreeMap::new();

        for pair in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (dim, len) = pair.split_once('=').ok_or_else(|| {
                ChunkGuardError::InvalidChunkPlan(format!("expected 'dim=length', got '{pair}'"))
            })?;
            let dim = dim.trim();
            if dim.is_empty() {
                return Err(ChunkGuardError::InvalidChunkPlan(format!(
                    "missing dimension name in '{pair}'"
                )));
            }
            let len: u64 = len.trim().parse().map_err(|_| {
                ChunkGuardError::InvalidChunkPlan(format!(
                    "chunk length for '{dim}' must be a non-negative integer, got '{}'",
                    len.trim()
                ))
            })?;
            if chunks.insert(dim.to_owned(), len).is_some() {
                return Err(ChunkGuardError::InvalidChunkPlan(format!(
                    "dimension '{dim}' given more than once"
                )));
            }
        }

        Ok(Self { chunks })
    }
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (dim, len)) in self.iter().enumerate() {
            if idx > 0 {
                f.write_str(",")?;
            }
            write!(f, "{dim}={len}")?;
        }
        Ok(())
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for ChunkPlan {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        Self {
            chunks: iter.into_iter().map(|(dim, len)| (dim.into(), len)).collect(),
        }
    }
}
