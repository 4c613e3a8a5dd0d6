//! Scale extent (ground bounding box) type.

use serde::{Deserialize, Serialize};

/// The ground-coordinate box an output grid must cover.
///
/// For geographic CRSes coordinates are in degrees, for projected CRSes in
/// the projection's linear unit (meters for every built-in definition).
///
/// Extents guessed from an antimeridian-crossing area of use keep
/// `xmin > xmax`; nothing here normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtent {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl ScaleExtent {
    /// Create a new extent from corner coordinates.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// The whole globe in degrees.
    pub fn global() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Extent range along x (`xmax - xmin`).
    pub fn x_range(&self) -> f64 {
        self.xmax - self.xmin
    }

    /// Extent range along y (`ymax - ymin`).
    pub fn y_range(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// True when both ranges are strictly positive.
    pub fn is_well_ordered(&self) -> bool {
        self.xmax > self.xmin && self.ymax > self.ymin
    }

    /// Top-left corner `(xmin, ymax)`, the grid origin.
    pub fn top_left(&self) -> (f64, f64) {
        (self.xmin, self.ymax)
    }
}
