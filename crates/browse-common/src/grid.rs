//! Output grid definition: dimensions, CRS and geotransform.

use crate::{Crs, ScaleExtent};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

/// Affine mapping from pixel `(col, row)` to ground `(x, y)`.
///
/// Coefficients follow the rasterio convention:
///
/// ```text
/// x = a * col + b * row + c
/// y = d * col + e * row + f
/// ```
///
/// For north-up grids `b = d = 0`, `a` is the pixel width and `e` the
/// (negative) pixel height.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Affine {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn translation(x: f64, y: f64) -> Self {
        Self::new(1.0, 0.0, x, 0.0, 1.0, y)
    }

    pub fn scale(sx: f64, sy: f64) -> Self {
        Self::new(sx, 0.0, 0.0, 0.0, sy, 0.0)
    }

    /// North-up transform with origin at `(left, top)`.
    pub fn north_up(left: f64, top: f64, x_resolution: f64, y_resolution: f64) -> Self {
        Self::new(x_resolution, 0.0, left, 0.0, -y_resolution.abs(), top)
    }

    /// Pixel width along x.
    pub fn x_resolution(&self) -> f64 {
        self.a
    }

    /// Pixel height along y, as a positive number.
    pub fn y_resolution(&self) -> f64 {
        self.e.abs()
    }

    /// Ground coordinates of a pixel corner.
    pub fn apply(&self, col: f64, row: f64) -> (f64, f64) {
        (
            self.a * col + self.b * row + self.c,
            self.d * col + self.e * row + self.f,
        )
    }

    /// Coefficients in GDAL `GetGeoTransform` order `[c, a, b, f, d, e]`.
    pub fn to_gdal(&self) -> [f64; 6] {
        [self.c, self.a, self.b, self.f, self.d, self.e]
    }
}

impl Mul for Affine {
    type Output = Affine;

    /// Composition: `(self * rhs)` applies `rhs` first.
    fn mul(self, rhs: Affine) -> Affine {
        Affine::new(
            self.a * rhs.a + self.b * rhs.d,
            self.a * rhs.b + self.b * rhs.e,
            self.a * rhs.c + self.b * rhs.f + self.c,
            self.d * rhs.a + self.e * rhs.d,
            self.d * rhs.b + self.e * rhs.e,
            self.d * rhs.c + self.e * rhs.f + self.f,
        )
    }
}

/// Pixel dimensions of a grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// A complete output grid, or one tile of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    pub width: u32,
    pub height: u32,
    pub crs: Crs,
    pub transform: Affine,
}

/// A grid restricted to one tile; same CRS and resolution as its parent.
pub type TileSpec = GridSpec;

impl GridSpec {
    pub fn new(width: u32, height: u32, crs: Crs, transform: Affine) -> Self {
        Self {
            width,
            height,
            crs,
            transform,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    pub fn cell_count(&self) -> u64 {
        self.dimensions().cell_count()
    }

    pub fn x_resolution(&self) -> f64 {
        self.transform.x_resolution()
    }

    pub fn y_resolution(&self) -> f64 {
        self.transform.y_resolution()
    }

    /// Ground extent covered by the grid.
    pub fn extent(&self) -> ScaleExtent {
        let (left, top) = self.transform.apply(0.0, 0.0);
        let (right, bottom) = self
            .transform
            .apply(f64::from(self.width), f64::from(self.height));
        ScaleExtent::new(left.min(right), bottom.min(top), left.max(right), bottom.max(top))
    }
}

/// Build the grid covering `extent` at `dimensions`.
///
/// The origin is the extent's top-left corner and each axis resolution is
/// `range / dimension`, with the y term stored negative.
pub fn grid_from_extent(crs: Crs, extent: &ScaleExtent, dimensions: Dimensions) -> GridSpec {
    let x_resolution = extent.x_range() / f64::from(dimensions.width);
    let y_resolution = extent.y_range() / f64::from(dimensions.height);

    let (left, top) = extent.top_left();
    let transform = Affine::translation(left, top) * Affine::scale(x_resolution, -y_resolution);

    GridSpec::new(dimensions.width, dimensions.height, crs, transform)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_times_scale() {
        let t = Affine::translation(-3850000.0, 5850000.0) * Affine::scale(25000.0, -25000.0);
        assert_eq!(t, Affine::new(25000.0, 0.0, -3850000.0, 0.0, -25000.0, 5850000.0));
        assert_eq!(t, Affine::north_up(-3850000.0, 5850000.0, 25000.0, 25000.0));
    }

    #[test]
    fn test_gdal_order() {
        let t = Affine::new(0.05, 0.0, -180.0, 0.0, -0.05, 90.0);
        assert_eq!(t.to_gdal(), [-180.0, 0.05, 0.0, 90.0, 0.0, -0.05]);
    }

    #[test]
    fn test_grid_from_extent() {
        let crs = Crs::from_epsg(3413).unwrap();
        let extent = ScaleExtent::new(-3850000.0, -5350000.0, 3750000.0, 5850000.0);
        let grid = grid_from_extent(crs, &extent, Dimensions::new(304, 448));

        assert_eq!(grid.width, 304);
        assert_eq!(grid.height, 448);
        assert_eq!(
            grid.transform,
            Affine::new(25000.0, 0.0, -3850000.0, 0.0, -25000.0, 5850000.0)
        );
        assert_eq!(grid.extent(), extent);
    }
}
