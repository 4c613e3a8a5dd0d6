//! Common test fixtures for browse-grid tests.
//!
//! Real-world source grids that show up as browse-image inputs, described
//! with plain numbers so any crate in the workspace can use them without a
//! dependency cycle.

/// A source raster grid described by its bounds and resolution.
#[derive(Debug, Clone, Copy)]
pub struct SourceGrid {
    pub epsg: u32,
    pub width: u32,
    pub height: u32,
    pub left: f64,
    pub bottom: f64,
    pub right: f64,
    pub top: f64,
    pub xres: f64,
    pub yres: f64,
}

impl SourceGrid {
    /// EPSG code as an authority string.
    pub fn crs_string(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }

    /// North-up transform in rasterio order `(a, b, c, d, e, f)`.
    pub fn transform(&self) -> [f64; 6] {
        [self.xres, 0.0, self.left, 0.0, -self.yres, self.top]
    }

    /// Transform whose resolution is derived from the bounds, the way
    /// `rasterio.transform.from_bounds` builds it.
    pub fn transform_from_bounds(&self, width: u32, height: u32) -> [f64; 6] {
        [
            (self.right - self.left) / f64::from(width),
            0.0,
            self.left,
            0.0,
            -(self.top - self.bottom) / f64::from(height),
            self.top,
        ]
    }

    /// Bounds as `(xmin, ymin, xmax, ymax)`.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (self.left, self.bottom, self.right, self.top)
    }
}

/// NSIDC EASE-Grid 2.0 global 36km grid.
pub const EASE2_36KM: SourceGrid = SourceGrid {
    epsg: 6933,
    width: 964,
    height: 406,
    left: -17367530.44,
    bottom: -7314540.49,
    right: 17367529.639999997,
    top: 7314540.83,
    xres: 36032.22,
    yres: 36032.22,
};

/// NSIDC north polar stereographic 25km sea-ice grid.
pub const NP_SEAICE_25KM: SourceGrid = SourceGrid {
    epsg: 3413,
    width: 304,
    height: 448,
    left: -3850000.0,
    bottom: -5350000.0,
    right: 3750000.0,
    top: 5850000.0,
    xres: 25000.0,
    yres: 25000.0,
};

/// South polar stereographic 25km sea-ice grid.
pub const SP_SEAICE_25KM: SourceGrid = SourceGrid {
    epsg: 3031,
    width: 316,
    height: 332,
    left: -3950000.0,
    bottom: -3950000.0,
    right: 3950000.0,
    top: 4350000.0,
    xres: 25000.0,
    yres: 25000.0,
};

/// Global one-degree geographic grid.
pub const GLOBAL_ONE_DEGREE: SourceGrid = SourceGrid {
    epsg: 4326,
    width: 360,
    height: 180,
    left: -180.0,
    bottom: -90.0,
    right: 180.0,
    top: 90.0,
    xres: 1.0,
    yres: 1.0,
};

/// Common extents as `(xmin, ymin, xmax, ymax)`.
pub mod extent {
    /// ICD extent shared by both polar stereographic CRSes.
    pub const POLAR_ICD: (f64, f64, f64, f64) = (-4194304.0, -4194304.0, 4194304.0, 4194304.0);

    /// Whole globe in degrees.
    pub const GLOBAL: (f64, f64, f64, f64) = (-180.0, -90.0, 180.0, 90.0);

    /// EASE-2 north hemisphere.
    pub const EASE2_NORTH: (f64, f64, f64, f64) = (-9000000.0, -9000000.0, 9000000.0, 9000000.0);

    /// EASE-2 global grid latitude band in degrees.
    pub const MID_LATITUDE: (f64, f64, f64, f64) = (-180.0, -86.0, 180.0, 86.0);
}

/// Common CRS identifiers.
pub mod crs {
    pub const EPSG_4326: &str = "EPSG:4326";
    pub const EPSG_3413: &str = "EPSG:3413";
    pub const EPSG_3031: &str = "EPSG:3031";
    pub const EPSG_6931: &str = "EPSG:6931";

    /// NSIDC north polar stereographic as proj4.
    pub const PROJ4_3413: &str =
        "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs";
}
