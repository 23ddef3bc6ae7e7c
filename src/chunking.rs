//! Chunk size guard.
//!
//! Estimates how many bytes one chunk of every data variable would occupy
//! under a [`ChunkPlan`] and warns when a chunk is larger than the configured
//! threshold (1 GiB unless overridden). The guard never blocks: oversized
//! chunks only produce `WARN` records. The one hard failure is a plan naming
//! a dimension the dataset does not have.
//!
//! # Example
//!
//! ```
//! use chunkguard::chunking::{ChunkPlan, check_chunk_size};
//! use chunkguard::dataset::{DataType, Dataset, Variable};
//!
//! let ds = Dataset::new()
//!     .with_dimension("time", 8760)
//!     .with_dimension("x", 1024)
//!     .with_variable(Variable::new("t2m", DataType::F32, ["time", "x"]));
//!
//! let plan: ChunkPlan = "time=24,x=1024".parse()?;
//! let ds = check_chunk_size(&ds, &plan)?;
//! assert_eq!(ds.data_vars.len(), 1);
//! # Ok::<(), chunkguard::error::ChunkGuardError>(())
//! ```

pub mod checker;
pub mod plan;
pub mod report;

pub use checker::{CHUNK_MAX_SIZE_WARNING, ChunkSizeChecker, check_chunk_size, validate_plan};
pub use plan::ChunkPlan;
pub use report::{ChunkEstimate, ChunkSizeReport};
