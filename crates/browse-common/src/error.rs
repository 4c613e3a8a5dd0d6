//! Error types for browse-grid planning.

use std::fmt;
use thiserror::Error;

/// Result type alias using BrowseError.
pub type BrowseResult<T> = Result<T, BrowseError>;

/// Grid axis named in dimension errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Primary error type for grid resolution and tiling.
#[derive(Debug, Error)]
pub enum BrowseError {
    // === Request Errors ===
    #[error(
        "Inconsistent {axis} dimension: extent range {range} / scale size {scale_size} \
         gives {derived} cells, but {requested} were requested"
    )]
    InconsistentDimension {
        axis: Axis,
        range: f64,
        scale_size: f64,
        derived: i64,
        requested: u32,
    },

    #[error("Invalid input CRS: {0}")]
    UnsupportedCrs(String),

    #[error("Invalid CRS definition: {0}")]
    InvalidCrs(String),

    // === Configuration Errors ===
    #[error("Invalid tiling configuration: {0}")]
    InvalidConfig(String),
}

impl BrowseError {
    /// Create an UnsupportedCrs error.
    pub fn unsupported_crs(crs: impl fmt::Display) -> Self {
        Self::UnsupportedCrs(crs.to_string())
    }

    /// Create an InvalidCrs error.
    pub fn invalid_crs(msg: impl Into<String>) -> Self {
        Self::InvalidCrs(msg.into())
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
