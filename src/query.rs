//! Query results and their on-disk payload formats
//!
//! List results are stored as the toolchain's own JSON bytes and decoded with
//! serde. Size results are stored as `"<size> <funcs>\n"`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the toolchain cannot measure; sized as a constant instead
pub const UNMEASURED_IDENTIFIER: &str = "unsafe";

/// Size reported for [`UNMEASURED_IDENTIFIER`]
pub const UNMEASURED_SIZE: SizeResult = SizeResult {
    size: 1,
    num_funcs: 0,
};

/// Kind of cached query, used as the entry file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Package metadata from the list query
    List,
    /// Built artifact size and function count
    Build,
}

impl EntryKind {
    /// File extension for entries of this kind
    pub fn extension(&self) -> &'static str {
        match self {
            Self::List => "list",
            Self::Build => "build",
        }
    }

    /// All kinds, in lookup order
    pub fn all() -> &'static [Self] {
        &[Self::List, Self::Build]
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Package metadata reported by the list query
///
/// Only a handful of the fields the toolchain reports are kept; unknown keys
/// are ignored and absent keys take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ListResult {
    /// Part of the standard distribution
    pub standard: bool,

    /// Canonical import path
    pub import_path: String,

    /// Root of the tree containing the package
    pub root: String,

    /// Direct imports, in the order the toolchain reported them
    pub imports: Vec<String>,
}

impl ListResult {
    /// Decode the toolchain's JSON payload
    pub fn decode(payload: &[u8]) -> Result<Self, String> {
        serde_json::from_slice(payload).map_err(|e| format!("unmarshal: {}", e))
    }
}

/// Approximate size metrics for a built package
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeResult {
    /// Size of the built artifact in bytes
    pub size: u64,

    /// Estimated number of functions in the artifact
    pub num_funcs: u64,
}

impl SizeResult {
    /// Encode as the on-disk payload
    pub fn encode(&self) -> Vec<u8> {
        format!("{} {}\n", self.size, self.num_funcs).into_bytes()
    }

    /// Decode an on-disk payload holding exactly two unsigned integers
    pub fn decode(payload: &[u8]) -> Result<Self, String> {
        let text = std::str::from_utf8(payload).map_err(|e| format!("not UTF-8: {}", e))?;
        let fields: Vec<&str> = text.split_whitespace().collect();

        let [size, num_funcs] = fields.as_slice() else {
            return Err(format!(
                "expected two integers, found {} field(s) in {:?}",
                fields.len(),
                text
            ));
        };

        let parse = |field: &str| {
            field
                .parse::<u64>()
                .map_err(|e| format!("interpreting {:?}: {}", field, e))
        };

        Ok(Self {
            size: parse(*size)?,
            num_funcs: parse(*num_funcs)?,
        })
    }
}
