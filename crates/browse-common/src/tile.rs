//! Tile matrix addressing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a tile in the output tile matrix (row 0 is the top row).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileLocator {
    pub row: u32,
    pub col: u32,
}

impl TileLocator {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Locator of an untiled output.
    pub fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Filename suffix used when staging tiles, e.g. `r00c02`.
    pub fn suffix(&self) -> String {
        format!("r{:02}c{:02}", self.row, self.col)
    }
}

impl fmt::Display for TileLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row {} col {}", self.row, self.col)
    }
}
