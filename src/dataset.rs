//! Dataset metadata as seen by the chunk size check.
//!
//! The check never touches array values. It needs three things from a
//! dataset, captured by [`DatasetView`]:
//!
//! - the data variables, in the dataset's own order
//! - each variable's element [`DataType`] (for its byte width)
//! - a lookup from dimension name to size, where "not found" is distinct
//!   from a size of zero
//!
//! [`Dataset`] is the owned implementation used by the CLI and tests; it can
//! be loaded from a JSON descriptor.

pub mod descriptor;
pub mod dtype;

pub use descriptor::{Dataset, Variable};
pub use dtype::DataType;

/// Read-only view of a labeled array dataset.
pub trait DatasetView {
    /// Data variables as `(name, dtype)` pairs in the dataset's natural order.
    fn data_vars(&self) -> impl Iterator<Item = (&str, DataType)>;

    /// Size of the named dimension, or `None` if the dataset has no such dimension.
    fn dimension_size(&self, name: &str) -> Option<u64>;

    fn has_data_vars(&self) -> bool {
        self.data_vars().next().is_some()
    }
}
