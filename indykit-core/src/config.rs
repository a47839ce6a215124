//! Boundary configuration.
//!
//! Uses JSON, like the configuration strings the native library itself
//! accepts. Every field is optional; an empty object reproduces the
//! published code table and disables the default call timeout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::code_table::{CodeTable, ParameterRange, PUBLISHED_PARAMETER_RANGES};
use crate::error::ErrorKind;

/// Errors raised while loading or applying a [`BoundaryConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Path of the file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The configuration is not valid JSON for [`BoundaryConfig`].
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
    /// A parameter range is empty, starts at or below zero, or its indices
    /// overflow.
    #[error("invalid parameter range {range}")]
    InvalidRange {
        /// The offending range.
        range: ParameterRange,
    },
    /// Two parameter ranges share at least one code.
    #[error("parameter ranges {first} and {second} overlap")]
    OverlappingRanges {
        /// The range starting first.
        first: ParameterRange,
        /// The range overlapping it.
        second: ParameterRange,
    },
    /// An override names a kind that does not exist.
    #[error("unknown error kind '{name}' for code {code}")]
    UnknownKind {
        /// Code being overridden.
        code: i32,
        /// The unrecognised kind name.
        name: String,
    },
    /// The success code cannot be remapped.
    #[error("status code 0 always means success and cannot be overridden")]
    SuccessOverride,
}

/// Configuration of the boundary layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BoundaryConfig {
    /// Default caller-side timeout in milliseconds. `None` waits forever.
    pub call_timeout_ms: Option<u64>,
    /// Parameter runs replacing the published ones when present.
    pub parameter_ranges: Option<Vec<ParameterRange>>,
    /// Code → kind name overrides, applied last.
    pub overrides: BTreeMap<i32, String>,
}

impl BoundaryConfig {
    /// Parses a JSON configuration string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the string is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if it is not a valid configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The default caller-side timeout, if configured.
    #[must_use]
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_ms.map(Duration::from_millis)
    }

    /// Builds the code table described by this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a range is malformed or overlaps another, if an
    /// override names an unknown kind, or if an override targets code `0`.
    pub fn code_table(&self) -> Result<CodeTable, ConfigError> {
        let ranges = self
            .parameter_ranges
            .as_deref()
            .unwrap_or(&PUBLISHED_PARAMETER_RANGES[..]);
        let mut table = CodeTable::with_parameter_ranges(ranges)?;
        for (&code, name) in &self.overrides {
            let kind = ErrorKind::from_str(name).map_err(|_| ConfigError::UnknownKind {
                code,
                name: name.clone(),
            })?;
            table.set_override(code, kind)?;
        }
        Ok(table)
    }
}
