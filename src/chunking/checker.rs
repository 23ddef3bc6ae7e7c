//! Per-chunk memory estimation and the oversize warning.
//!
//! Every data variable gets the same element count: the product of all
//! lengths in the plan. The dimension sizes of the dataset are only used to
//! confirm that each planned dimension exists. A chunk length larger than its
//! dimension is not clamped, and a variable that lacks some planned dimension
//! still gets the full product.

use tracing::{debug, warn};

use super::plan::ChunkPlan;
use super::report::{ChunkEstimate, ChunkSizeReport};
use crate::dataset::DatasetView;
use crate::error::{ChunkGuardError, Result};
use crate::utils::fmt_bytes;

/// Default warning threshold for a single chunk: 1 GiB.
pub const CHUNK_MAX_SIZE_WARNING: u64 = 1 << 30;

/// Warns about chunk plans whose chunks would exceed `max_chunk_bytes`.
///
/// ```
/// use chunkguard::chunking::{ChunkPlan, ChunkSizeChecker};
/// use chunkguard::dataset::{DataType, Dataset, Variable};
///
/// let ds = Dataset::new()
///     .with_dimension("x", 4096)
///     .with_variable(Variable::new("t2m", DataType::F32, ["x"]));
/// let plan = ChunkPlan::new().with_chunk("x", 4096);
///
/// let report = ChunkSizeChecker::new(8 * 1024).check(&ds, &plan)?;
/// assert!(report.estimate("t2m").is_some_and(|e| e.exceeds));
/// # Ok::<(), chunkguard::error::ChunkGuardError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSizeChecker {
    max_chunk_bytes: u64,
}

impl Default for ChunkSizeChecker {
    fn default() -> Self {
        Self::new(CHUNK_MAX_SIZE_WARNING)
    }
}

impl ChunkSizeChecker {
    pub const fn new(max_chunk_bytes: u64) -> Self {
        Self { max_chunk_bytes }
    }

    pub const fn max_chunk_bytes(&self) -> u64 {
        self.max_chunk_bytes
    }

    /// Estimate chunk sizes without logging.
    ///
    /// # Errors
    ///
    /// [`ChunkGuardError::MissingDimension`] if the dataset has data variables
    /// and any planned dimension is not one of the dataset's dimensions.
    pub fn estimate<D: DatasetView>(
        &self,
        dataset: &D,
        plan: &ChunkPlan,
    ) -> Result<ChunkSizeReport> {
        if dataset.has_data_vars() {
            validate_plan(dataset, plan)?;
        }

        let elements_per_chunk = plan.element_count();
        let estimates = dataset
            .data_vars()
            .map(|(name, dtype)| {
                let bytes_per_element = dtype.byte_width();
                let chunk_bytes = elements_per_chunk.saturating_mul(bytes_per_element);
                ChunkEstimate {
                    variable: name.to_owned(),
                    dtype,
                    bytes_per_element,
                    chunk_bytes,
                    exceeds: chunk_bytes > self.max_chunk_bytes,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            variables = estimates.len(),
            elements_per_chunk,
            plan = %plan,
            "Estimated chunk sizes"
        );

        Ok(ChunkSizeReport {
            threshold_bytes: self.max_chunk_bytes,
            elements_per_chunk,
            estimates,
        })
    }

    /// Estimate chunk sizes and log one warning per variable whose chunk is
    /// larger than the threshold.
    ///
    /// Oversized chunks never fail the call.
    ///
    /// # Errors
    ///
    /// Same as [`Self::estimate`].
    pub fn check<D: DatasetView>(
        &self,
        dataset: &D,
        plan: &ChunkPlan,
    ) -> Result<ChunkSizeReport> {
        let report = self.estimate(dataset, plan)?;

        for estimate in report.oversized() {
            warn!(
                variable = %estimate.variable,
                chunk_bytes = estimate.chunk_bytes,
                threshold_bytes = self.max_chunk_bytes,
                "The chunk size for '{}' ({}) exceeds {} bytes ({})",
                estimate.variable,
                fmt_bytes(estimate.chunk_bytes),
                self.max_chunk_bytes,
                fmt_bytes(self.max_chunk_bytes),
            );
        }

        Ok(report)
    }
}

/// Confirm every planned dimension exists in the dataset.
///
/// # Errors
///
/// [`ChunkGuardError::MissingDimension`] naming the first missing dimension
/// in plan order.
pub fn validate_plan<D: DatasetView>(dataset: &D, plan: &ChunkPlan) -> Result<()> {
    match plan.dimensions().find(|dim| dataset.dimension_size(dim).is_none()) {
        Some(dim) => Err(ChunkGuardError::MissingDimension {
            dimension: dim.to_owned(),
        }),
        None => Ok(()),
    }
}

/// Check `plan` against `dataset` with the default 1 GiB threshold and hand
/// the dataset back for chaining.
///
/// # Errors
///
/// [`ChunkGuardError::MissingDimension`], see [`ChunkSizeChecker::estimate`].
pub fn check_chunk_size<'d, D: DatasetView>(dataset: &'d D, plan: &ChunkPlan) -> Result<&'d D> {
    ChunkSizeChecker::default().check(dataset, plan)?;
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{DataType, Dataset, Variable};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber that records WARN and above.
    fn with_captured_warnings<T>(f: impl FnOnce() -> T) -> (T, Vec<String>) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .without_time()
            .with_max_level(tracing::Level::WARN)
            .finish();

        let out = tracing::subscriber::with_default(subscriber, f);
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (out, text.lines().map(str::to_owned).collect())
    }

    fn cube(dtype: DataType) -> Dataset {
        Dataset::new()
            .with_dimension("x", 2048)
            .with_dimension("y", 2048)
            .with_dimension("z", 256)
            .with_variable(Variable::new("field", dtype, ["x", "y", "z"]))
    }

    fn gib_plan() -> ChunkPlan {
        ChunkPlan::new()
            .with_chunk("x", 1024)
            .with_chunk("y", 1024)
            .with_chunk("z", 128)
    }

    #[test]
    fn test_exactly_at_threshold_does_not_warn() {
        let ds = cube(DataType::F64);
        let (report, lines) =
            with_captured_warnings(|| ChunkSizeChecker::default().check(&ds, &gib_plan()));
        let report = report.unwrap();

        assert_eq!(report.elements_per_chunk, 134_217_728);
        assert_eq!(
            report.estimate("field").unwrap().chunk_bytes,
            CHUNK_MAX_SIZE_WARNING
        );
        assert!(report.is_within_limit());
        assert!(lines.is_empty(), "unexpected warnings: {lines:?}");
    }

    #[test]
    fn test_one_past_threshold_warns_once() {
        let ds = cube(DataType::F64);
        for dim in ["x", "y", "z"] {
            let plan = gib_plan().with_chunk(dim, gib_plan().get(dim).unwrap() + 1);
            let (report, lines) =
                with_captured_warnings(|| ChunkSizeChecker::default().check(&ds, &plan));

            assert_eq!(report.unwrap().oversized().count(), 1);
            assert_eq!(lines.len(), 1, "expected one warning for {dim}: {lines:?}");
            assert!(lines[0].contains("WARN"));
            assert!(lines[0].contains("'field'"));
            assert!(lines[0].contains("1073741824"));
        }
    }

    #[test]
    fn test_missing_dimension_fails() {
        let ds = Dataset::new()
            .with_dimension("x", 10)
            .with_dimension("y", 10)
            .with_variable(Variable::new("a", DataType::I8, ["x", "y"]))
            .with_variable(Variable::new("b", DataType::Complex128, ["x", "y"]));
        let plan = ChunkPlan::new().with_chunk("x", 5).with_chunk("z", 5);

        let err = ChunkSizeChecker::default().check(&ds, &plan).unwrap_err();
        match err {
            ChunkGuardError::MissingDimension { dimension } => assert_eq!(dimension, "z"),
            other => panic!("expected MissingDimension, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_dimension_logs_nothing() {
        let ds = cube(DataType::F64);
        let plan = ChunkPlan::new().with_chunk("x", 1 << 20).with_chunk("level", 10);
        let (result, lines) =
            with_captured_warnings(|| ChunkSizeChecker::default().check(&ds, &plan));
        assert!(result.is_err());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_variables_are_independent() {
        let ds = Dataset::new()
            .with_dimension("x", 2000)
            .with_variable(Variable::new("single", DataType::F32, ["x"]))
            .with_variable(Variable::new("double", DataType::F64, ["x"]));
        let plan = ChunkPlan::new().with_chunk("x", 2000);

        let (report, lines) =
            with_captured_warnings(|| ChunkSizeChecker::default().check(&ds, &plan));
        let report = report.unwrap();

        assert_eq!(report.estimate("single").unwrap().chunk_bytes, 8000);
        assert_eq!(report.estimate("double").unwrap().chunk_bytes, 16000);
        assert!(lines.is_empty());
    }

    #[test]
    fn test_only_wide_variable_warns() {
        let ds = Dataset::new()
            .with_dimension("x", 100)
            .with_variable(Variable::new("narrow", DataType::U8, ["x"]))
            .with_variable(Variable::new("wide", DataType::F64, ["x"]));
        let plan = ChunkPlan::new().with_chunk("x", 100);

        let (report, lines) =
            with_captured_warnings(|| ChunkSizeChecker::new(400).check(&ds, &plan));
        let oversized: Vec<&str> = report
            .as_ref()
            .unwrap()
            .oversized()
            .map(|e| e.variable.as_str())
            .collect();

        assert_eq!(oversized, ["wide"]);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("'wide'"));
    }

    #[test]
    fn test_empty_plan_counts_one_element() {
        let ds = cube(DataType::Complex128);
        let report = ChunkSizeChecker::default()
            .check(&ds, &ChunkPlan::new())
            .unwrap();
        assert_eq!(report.elements_per_chunk, 1);
        assert_eq!(report.estimate("field").unwrap().chunk_bytes, 16);
    }

    #[test]
    fn test_empty_dataset_ignores_plan() {
        let ds = Dataset::new().with_dimension("x", 10);
        let plan = ChunkPlan::new().with_chunk("nope", 1 << 40);
        let (report, lines) =
            with_captured_warnings(|| ChunkSizeChecker::default().check(&ds, &plan));
        assert!(report.unwrap().estimates.is_empty());
        assert!(lines.is_empty());
    }

    #[test]
    fn test_chunk_length_is_not_clamped_to_dimension() {
        let ds = Dataset::new()
            .with_dimension("x", 10)
            .with_variable(Variable::new("a", DataType::F32, ["x"]));
        let plan = ChunkPlan::new().with_chunk("x", 1000);
        let report = ChunkSizeChecker::default().estimate(&ds, &plan).unwrap();
        assert_eq!(report.estimate("a").unwrap().chunk_bytes, 4000);
    }

    #[test]
    fn test_full_plan_applies_to_variables_without_those_dims() {
        let ds = Dataset::new()
            .with_dimension("time", 100)
            .with_dimension("x", 100)
            .with_variable(Variable::new("series", DataType::F64, ["time"]))
            .with_variable(Variable::new("static", DataType::F64, ["x"]));
        let plan = ChunkPlan::new().with_chunk("time", 10).with_chunk("x", 10);

        let report = ChunkSizeChecker::default().estimate(&ds, &plan).unwrap();
        assert_eq!(report.estimate("series").unwrap().chunk_bytes, 800);
        assert_eq!(report.estimate("static").unwrap().chunk_bytes, 800);
    }

    #[test]
    fn test_overflow_saturates_and_warns() {
        let ds = cube(DataType::F64);
        let plan = ChunkPlan::new()
            .with_chunk("x", u64::MAX / 2)
            .with_chunk("y", 4);
        let report = ChunkSizeChecker::default().estimate(&ds, &plan).unwrap();
        let field = report.estimate("field").unwrap();
        assert_eq!(field.chunk_bytes, u64::MAX);
        assert!(field.exceeds);
    }

    #[test]
    fn test_repeated_checks_are_identical() {
        let ds = cube(DataType::F32);
        let before = ds.clone();
        let plan = gib_plan().with_chunk("z", 1024);
        let plan_before = plan.clone();
        let checker = ChunkSizeChecker::default();

        let (first, first_lines) = with_captured_warnings(|| checker.check(&ds, &plan));
        let (second, second_lines) = with_captured_warnings(|| checker.check(&ds, &plan));

        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(first_lines.len(), 1);
        assert_eq!(first_lines, second_lines);
        assert_eq!(ds, before);
        assert_eq!(plan, plan_before);
    }

    #[test]
    fn test_check_chunk_size_passes_dataset_through() {
        let ds = cube(DataType::I16);
        let same = check_chunk_size(&ds, &gib_plan()).unwrap();
        assert!(std::ptr::eq(same, &ds));
    }
}
