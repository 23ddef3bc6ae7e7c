//! # chunkguard
//!
//! A diagnostic guard for chunked array workloads. Before writing or
//! processing a labeled multi-dimensional dataset chunk by chunk, it estimates
//! how much memory one chunk of every data variable would take and logs a
//! warning for each variable whose chunk exceeds a threshold (1 GiB by
//! default).
//!
//! ## Quick Start
//!
//! ```
//! use chunkguard::chunking::{ChunkPlan, ChunkSizeChecker};
//! use chunkguard::dataset::Dataset;
//!
//! let ds = Dataset::from_json(r#"{
//!     "dimensions": { "time": 8760, "y": 721, "x": 1440 },
//!     "data_vars": [{ "name": "t2m", "dtype": "float32", "dims": ["time", "y", "x"] }]
//! }"#)?;
//! let plan: ChunkPlan = "time=8760,y=721,x=1440".parse()?;
//!
//! let report = ChunkSizeChecker::default().check(&ds, &plan)?;
//! assert!(!report.is_within_limit());
//! # Ok::<(), chunkguard::error::ChunkGuardError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`chunking`]: chunk plans, the size check and its report
//! - [`dataset`]: the [`dataset::DatasetView`] contract, dtypes, JSON descriptors
//! - [`config`]: persisted settings and threshold overrides
//! - [`error`]: error types and handling utilities
//! - [`logging`]: tracing subscriber setup for the binary
//! - [`utils`]: formatting helpers
//!
//! ## Bring your own dataset
//!
//! Anything that can list its data variables with their dtypes and look up
//! dimension sizes by name can be checked by implementing
//! [`dataset::DatasetView`].

#![warn(clippy::all, rust_2018_idioms)]

pub mod chunking;
pub mod config;
pub mod dataset;
pub mod error;
pub mod logging;
pub mod utils;
