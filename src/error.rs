//! Error handling for chunkguard.
//!
//! The chunk size check itself has exactly one failure mode: a chunk plan
//! that names a dimension the dataset does not have. Everything else here
//! covers loading inputs (descriptors, plans, settings) for the CLI.
//!
//! ```
//! use chunkguard::error::ChunkGuardError;
//!
//! fn describe(err: &ChunkGuardError) -> String {
//!     match err {
//!         ChunkGuardError::MissingDimension { dimension } => {
//!             format!("fix the chunk plan: no dimension named {dimension}")
//!         }
//!         other => other.to_string(),
//!     }
//! }
//! ```

use std::fmt;

/// Main error type for chunkguard operations.
#[derive(Debug)]
pub enum ChunkGuardError {
    /// A chunk plan key does not name a dimension of the dataset
    MissingDimension { dimension: String },

    /// A dtype spelling could not be parsed
    InvalidDataType(String),

    /// A chunk plan could not be parsed
    InvalidChunkPlan(String),

    /// A dataset descriptor is malformed or inconsistent
    InvalidDescriptor(String),

    /// I/O errors (reading descriptors, plans, settings)
    Io(std::io::Error),

    /// Configuration errors (JSON settings)
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for ChunkGuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingDimension { dimension } => {
                write!(f, "Dimension '{dimension}' not found in the dataset")
            }
            Self::InvalidDataType(msg) => write!(f, "Invalid data type: {msg}"),
            Self::InvalidChunkPlan(msg) => write!(f, "Invalid chunk plan: {msg}"),
            Self::InvalidDescriptor(msg) => write!(f, "Invalid dataset descriptor: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ChunkGuardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChunkGuardError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ChunkGuardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<anyhow::Error> for ChunkGuardError {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}

/// Result type alias for chunkguard operations.
pub type Result<T> = std::result::Result<T, ChunkGuardError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<ChunkGuardError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: ChunkGuardError = e.into();
            ChunkGuardError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: ChunkGuardError = e.into();
            ChunkGuardError::Other(format!("{}: {}", f(), err))
        })
    }
}
