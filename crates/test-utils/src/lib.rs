//! Shared test utilities for the browse-grid workspace.
//!
//! This crate provides:
//! - Source-grid fixtures (NSIDC sea-ice grids, EASE-2, global lat/lon)
//! - Temporary input files
//! - Approximate floating-point assertions for resolutions and extents
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! ```ignore
//! use test_utils::{assert_approx_eq, NP_SEAICE_25KM};
//! ```

pub mod files;
pub mod fixtures;

pub use files::*;
pub use fixtures::*;

/// Approximate floating-point equality.
///
/// ```ignore
/// use test_utils::assert_approx_eq;
///
/// assert_approx_eq!(512.0000001_f64, 512.0_f64, 1e-6); // passes
/// assert_approx_eq!(500.0, 512.0, 1e-6);               // fails
/// ```
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr, $epsilon:expr) => {{
        let left: f64 = $left as f64;
        let right: f64 = $right as f64;
        let epsilon: f64 = $epsilon as f64;
        let diff = (left - right).abs();
        if diff > epsilon {
            panic!(
                "assertion failed: `(left ≈ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` > epsilon `{:?}`",
                left, right, diff, epsilon
            );
        }
    }};
}

/// Approximate equality of an extent given as `(xmin, ymin, xmax, ymax)`
/// against any value with `xmin`/`ymin`/`xmax`/`ymax` fields.
///
/// ```ignore
/// use test_utils::assert_extent_approx_eq;
///
/// assert_extent_approx_eq!(grid.extent(), (-180.0, -90.0, 180.0, 90.0), 1e-9);
/// ```
#[macro_export]
macro_rules! assert_extent_approx_eq {
    ($extent:expr, $expected:expr, $epsilon:expr) => {{
        let extent = $extent;
        let (xmin, ymin, xmax, ymax): (f64, f64, f64, f64) = $expected;
        $crate::assert_approx_eq!(extent.xmin, xmin, $epsilon);
        $crate::assert_approx_eq!(extent.ymin, ymin, $epsilon);
        $crate::assert_approx_eq!(extent.xmax, xmax, $epsilon);
        $crate::assert_approx_eq!(extent.ymax, ymax, $epsilon);
    }};
}

#[cfg(test)]
mod tests {
    struct Extent {
        xmin: f64,
        ymin: f64,
        xmax: f64,
        ymax: f64,
    }

    #[test]
    fn test_assert_approx_eq_passes() {
        assert_approx_eq!(512.0000001, 512.0, 1e-6);
        assert_approx_eq!(0.0, 0.0, 0.0001);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_assert_approx_eq_fails() {
        assert_approx_eq!(500.0, 512.0, 1e-6);
    }

    #[test]
    fn test_assert_extent_approx_eq_passes() {
        let extent = Extent {
            xmin: -180.0,
            ymin: -90.0000001,
            xmax: 180.0,
            ymax: 90.0,
        };
        assert_extent_approx_eq!(extent, (-180.0, -90.0, 180.0, 90.0), 1e-6);
    }
}
