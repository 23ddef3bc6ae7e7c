//! Owned dataset descriptor, loadable from JSON.
//!
//! A descriptor carries only what the chunk check needs: dimension sizes and,
//! per data variable, its dtype and dimension names. No array values.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{DataType, DatasetView};
use crate::error::{ChunkGuardError, Result, ResultExt as _};

/// A named data variable of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub dtype: DataType,
    /// Dimension names in axis order
    #[serde(default)]
    pub dims: Vec<String>,
}

impl Variable {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        dtype: DataType,
        dims: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            dtype,
            dims: dims.into_iter().map(Into::into).collect(),
        }
    }
}

/// Dimension sizes plus an ordered list of data variables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Dimension name -> length
    #[serde(default)]
    pub dimensions: BTreeMap<String, u64>,
    /// Data variables in declaration order
    #[serde(default)]
    pub data_vars: Vec<Variable>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a dimension, replacing any previous size.
    #[must_use]
    pub fn with_dimension(mut self, name: impl Into<String>, size: u64) -> Self {
        self.dimensions.insert(name.into(), size);
        self
    }

    /// Append a data variable.
    #[must_use]
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.data_vars.push(variable);
        self
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.data_vars.iter().find(|v| v.name == name)
    }

    /// Load and validate a descriptor from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read dataset descriptor {}", path.display()))?;
        Self::from_json(&content)
    }

    /// Parse and validate a descriptor from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Self = serde_json::from_str(json)
            .map_err(|e| ChunkGuardError::InvalidDescriptor(e.to_string()))?;
        dataset.validate()?;
        Ok(dataset)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check that variable names are unique and every variable dimension is declared.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for var in &self.data_vars {
            if !seen.insert(var.name.as_str()) {
                return Err(ChunkGuardError::InvalidDescriptor(format!(
                    "duplicate variable '{}'",
                    var.name
                )));
            }
            if let Some(dim) = var.dims.iter().find(|d| !self.dimensions.contains_key(*d)) {
                return Err(ChunkGuardError::InvalidDescriptor(format!(
                    "variable '{}' uses undeclared dimension '{dim}'",
                    var.name
                )));
            }
        }
        Ok(())
    }
}

impl DatasetView for Dataset {
    fn data_vars(&self) -> impl Iterator<Item = (&str, DataType)> {
        self.data_vars.iter().map(|v| (v.name.as_str(), v.dtype))
    }

    fn dimension_size(&self, name: &str) -> Option<u64> {
        self.dimensions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR: &str = r#"{
        "dimensions": { "time": 24, "y": 10, "x": 20 },
        "data_vars": [
            { "name": "t2m", "dtype": "float32", "dims": ["time", "y", "x"] },
            { "name": "land_mask", "dtype": "|b1", "dims": ["y", "x"] },
            { "name": "orography", "dtype": "<f8", "dims": ["y", "x"] }
        ]
    }"#;

    #[test]
    fn test_from_json_keeps_variable_order() {
        let ds = Dataset::from_json(DESCRIPTOR).unwrap();
        let names: Vec<&str> = ds.data_vars().map(|(name, _)| name).collect();
        assert_eq!(names, ["t2m", "land_mask", "orography"]);
        assert_eq!(ds.variable("orography").unwrap().dtype, DataType::F64);
    }

    #[test]
    fn test_dimension_size_lookup() {
        let ds = Dataset::from_json(DESCRIPTOR).unwrap();
        assert_eq!(ds.dimension_size("time"), Some(24));
        assert_eq!(ds.dimension_size("level"), None);
    }

    #[test]
    fn test_zero_sized_dimension_is_still_found() {
        let ds = Dataset::new().with_dimension("x", 0);
        assert_eq!(ds.dimension_size("x"), Some(0));
    }

    #[test]
    fn test_undeclared_variable_dimension_rejected() {
        let json = r#"{
            "dimensions": { "x": 4 },
            "data_vars": [{ "name": "a", "dtype": "int32", "dims": ["x", "y"] }]
        }"#;
        let err = Dataset::from_json(json).unwrap_err();
        assert!(matches!(err, ChunkGuardError::InvalidDescriptor(_)));
        assert!(err.to_string().contains("'y'"));
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let ds = Dataset::new()
            .with_dimension("x", 4)
            .with_variable(Variable::new("a", DataType::I32, ["x"]))
            .with_variable(Variable::new("a", DataType::F32, ["x"]));
        assert!(ds.validate().is_err());
    }

    #[test]
    fn test_unknown_dtype_rejected() {
        let json = r#"{ "dimensions": {}, "data_vars": [{ "name": "a", "dtype": "object" }] }"#;
        assert!(Dataset::from_json(json).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let ds = Dataset::from_json(DESCRIPTOR).unwrap();
        let back = Dataset::from_json(&ds.to_json().unwrap()).unwrap();
        assert_eq!(ds, back);
    }
}
