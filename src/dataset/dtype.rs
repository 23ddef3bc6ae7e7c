//! Element data types and their storage widths.
//!
//! Widths follow numpy item sizes, so a descriptor written from an xarray
//! dataset (`str(var.dtype)`) parses to the same byte width numpy reports.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChunkGuardError;

/// Storage type of array elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DataType {
    Bool,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F16,
    F32,
    F64,
    Complex64,
    Complex128,
    /// `datetime64` at any unit; always 8 bytes.
    DateTime64,
    /// `timedelta64` at any unit; always 8 bytes.
    TimeDelta64,
    /// Fixed-width byte string (`S<n>`), `n` bytes per element.
    Bytes(u32),
    /// Fixed-width unicode string (`U<n>`), UCS-4 so `4 * n` bytes per element.
    Unicode(u32),
}

impl DataType {
    /// Number of bytes one element occupies in memory.
    pub const fn byte_width(self) -> u64 {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 | Self::F16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64
            | Self::U64
            | Self::F64
            | Self::Complex64
            | Self::DateTime64
            | Self::TimeDelta64 => 8,
            Self::Complex128 => 16,
            Self::Bytes(n) => n as u64,
            Self::Unicode(n) => 4 * n as u64,
        }
    }

    /// Canonical numpy name, e.g. `float32` or `<U5`.
    pub fn name(self) -> String {
        match self {
            Self::Bool => "bool".to_owned(),
            Self::I8 => "int8".to_owned(),
            Self::I16 => "int16".to_owned(),
            Self::I32 => "int32".to_owned(),
            Self::I64 => "int64".to_owned(),
            Self::U8 => "uint8".to_owned(),
            Self::U16 => "uint16".to_owned(),
            Self::U32 => "uint32".to_owned(),
            Self::U64 => "uint64".to_owned(),
            Self::F16 => "float16".to_owned(),
            Self::F32 => "float32".to_owned(),
            Self::F64 => "float64".to_owned(),
            Self::Complex64 => "complex64".to_owned(),
            Self::Complex128 => "complex128".to_owned(),
            Self::DateTime64 => "datetime64".to_owned(),
            Self::TimeDelta64 => "timedelta64".to_owned(),
            Self::Bytes(n) => format!("|S{n}"),
            Self::Unicode(n) => format!("<U{n}"),
        }
    }

    fn from_kind_code(kind: char, width: u32) -> Option<Self> {
        let dtype = match (kind, width) {
            ('b', 1) | ('?', _) => Self::Bool,
            ('i', 1) => Self::I8,
            ('i', 2) => Self::I16,
            ('i', 4) => Self::I32,
            ('i', 8) => Self::I64,
            ('u', 1) => Self::U8,
            ('u', 2) => Self::U16,
            ('u', 4) => Self::U32,
            ('u', 8) => Self::U64,
            ('f', 2) => Self::F16,
            ('f', 4) => Self::F32,
            ('f', 8) => Self::F64,
            ('c', 8) => Self::Complex64,
            ('c', 16) => Self::Complex128,
            ('M', 8) => Self::DateTime64,
            ('m', 8) => Self::TimeDelta64,
            ('S' | 'a', n) => Self::Bytes(n),
            ('U', n) => Self::Unicode(n),
            _ => return None,
        };
        Some(dtype)
    }
}

/// Strips a trailing datetime unit such as `[ns]`.
fn strip_unit(s: &str) -> &str {
    match s.find('[') {
        Some(idx) if s.ends_with(']') => s.get(..idx).unwrap_or(s),
        _ => s,
    }
}

impl FromStr for DataType {
    type Err = ChunkGuardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.trim_start_matches(['<', '>', '=', '|']);
        let body = strip_unit(body);

        let named = match body {
            "bool" => Some(Self::Bool),
            "int8" => Some(Self::I8),
            "int16" => Some(Self::I16),
            "int32" => Some(Self::I32),
            "int64" => Some(Self::I64),
            "uint8" => Some(Self::U8),
            "uint16" => Some(Self::U16),
            "uint32" => Some(Self::U32),
            "uint64" => Some(Self::U64),
            "float16" | "half" => Some(Self::F16),
            "float32" | "single" => Some(Self::F32),
            "float64" | "double" => Some(Self::F64),
            "complex64" => Some(Self::Complex64),
            "complex128" => Some(Self::Complex128),
            "datetime64" | "M8" => Some(Self::DateTime64),
            "timedelta64" | "m8" => Some(Self::TimeDelta64),
            _ => None,
        };
        if let Some(dtype) = named {
            return Ok(dtype);
        }

        let mut chars = body.chars();
        let parsed = chars.next().and_then(|kind| {
            let width = chars.as_str();
            if width.is_empty() && kind == '?' {
                return Some(Self::Bool);
            }
            width
                .parse::<u32>()
                .ok()
                .and_then(|w| Self::from_kind_code(kind, w))
        });

        parsed.ok_or_else(|| {
            ChunkGuardError::InvalidDataType(format!("unrecognised dtype '{trimmed}'"))
        })
    }
}

impl TryFrom<String> for DataType {
    type Error = ChunkGuardError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DataType> for String {
    fn from(dtype: DataType) -> Self {
        dtype.name()
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
