//! Load options.
//!
//! Options can be built in code or read from a TOML file. Unspecified keys
//! take their defaults:
//!
//! ```toml
//! # fill | reject
//! short_rows = "fill"
//! detect_generator_type = true
//! max_cost_coefficients = 64
//! ```

use std::fs;
use std::path::Path;

use pglib_core::{CaseError, CaseResult};
use serde::{Deserialize, Serialize};

/// What to do with a row that has fewer fields than its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortRowPolicy {
    /// Pad the missing trailing fields with nulls and record a warning.
    #[default]
    Fill,
    /// Fail the load with a misaligned-table error.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadOptions {
    pub short_rows: ShortRowPolicy,

    /// Look for an undeclared trailing generator type field. When off, the
    /// generator table is read as if no row carried one.
    pub detect_generator_type: bool,

    /// Largest coefficient count `n` accepted from the cost table. Larger
    /// values fail as a malformed header instead of sizing the dataset.
    pub max_cost_coefficients: usize,
}

/// Default for [`LoadOptions::max_cost_coefficients`].
pub const DEFAULT_MAX_COST_COEFFICIENTS: usize = 64;

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            short_rows: ShortRowPolicy::Fill,
            detect_generator_type: true,
            max_cost_coefficients: DEFAULT_MAX_COST_COEFFICIENTS,
        }
    }
}

impl LoadOptions {
    /// Options that fail on any row narrower than its header.
    pub fn strict() -> Self {
        Self {
            short_rows: ShortRowPolicy::Reject,
            ..Self::default()
        }
    }

    pub fn from_toml_str(text: &str) -> CaseResult<Self> {
        toml::from_str(text).map_err(|e| CaseError::Config(e.to_string()))
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> CaseResult<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| CaseError::io(path, e))?;
        Self::from_toml_str(&text)
    }
}
