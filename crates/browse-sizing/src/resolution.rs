//! Standard output resolutions and nearest-resolution matching.
//!
//! Browse imagery is published on a fixed ladder of resolutions per CRS
//! family. Pixel sizes are powers of two: meters for the polar
//! stereographic grids, fractions of 360° for the global geographic grid.
//! Each entry's width is the number of cells that pixel size gives across
//! the family's ICD extent.

use crate::request::InputRasterMetadata;
use browse_common::{Crs, PreferredCrs};
use serde::{Deserialize, Serialize};

/// Ground meters per degree.
///
/// Chosen so that the global table's "2km" entry (0.017578125°) is exactly
/// 2000 m, which keeps the degree and meter ladders aligned.
pub const METERS_PER_DEGREE: f64 = 1_024_000.0 / 9.0;

/// One standard resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResolutionEntry {
    /// Pixel size in the family's ground unit.
    pub pixel_size: f64,
    /// Grid width implied by `pixel_size` over the ICD extent.
    pub width: u32,
}

impl ResolutionEntry {
    const fn new(pixel_size: f64, width: u32) -> Self {
        Self { pixel_size, width }
    }
}

/// Global geographic resolutions in degrees, finest first (15.625m to 2km).
static GLOBAL_RESOLUTIONS: [ResolutionEntry; 8] = [
    ResolutionEntry::new(0.0001373291015625, 2621440),
    ResolutionEntry::new(0.000274658203125, 1310720),
    ResolutionEntry::new(0.00054931640625, 655360),
    ResolutionEntry::new(0.0010986328125, 327680),
    ResolutionEntry::new(0.002197265625, 163840),
    ResolutionEntry::new(0.00439453125, 81920),
    ResolutionEntry::new(0.0087890625, 40960),
    ResolutionEntry::new(0.017578125, 20480),
];

/// North polar stereographic resolutions in meters, finest first.
static NORTH_POLAR_RESOLUTIONS: [ResolutionEntry; 8] = [
    ResolutionEntry::new(16.0, 524288),
    ResolutionEntry::new(32.0, 262144),
    ResolutionEntry::new(64.0, 131072),
    ResolutionEntry::new(128.0, 65536),
    ResolutionEntry::new(256.0, 32768),
    ResolutionEntry::new(512.0, 16384),
    ResolutionEntry::new(1024.0, 8192),
    ResolutionEntry::new(2048.0, 4096),
];

/// South polar stereographic resolutions in meters, finest first.
static SOUTH_POLAR_RESOLUTIONS: [ResolutionEntry; 8] = [
    ResolutionEntry::new(16.0, 524288),
    ResolutionEntry::new(32.0, 262144),
    ResolutionEntry::new(64.0, 131072),
    ResolutionEntry::new(128.0, 65536),
    ResolutionEntry::new(256.0, 32768),
    ResolutionEntry::new(512.0, 16384),
    ResolutionEntry::new(1024.0, 8192),
    ResolutionEntry::new(2048.0, 4096),
];

/// CRS families that each own a resolution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResolutionFamily {
    Global,
    NorthPolar,
    SouthPolar,
}

impl ResolutionFamily {
    /// Family whose table applies to grids in `crs`.
    ///
    /// Preferred CRSes map onto their own family. Other geographic CRSes use
    /// the global table; other projected CRSes use the north polar (meter)
    /// table.
    pub fn for_crs(crs: &Crs) -> Self {
        match PreferredCrs::matching(crs) {
            Some(preferred) => preferred.into(),
            None if crs.is_projected() => ResolutionFamily::NorthPolar,
            None => ResolutionFamily::Global,
        }
    }

    pub fn table(&self) -> ResolutionTable {
        let entries: &'static [ResolutionEntry] = match self {
            ResolutionFamily::Global => &GLOBAL_RESOLUTIONS,
            ResolutionFamily::NorthPolar => &NORTH_POLAR_RESOLUTIONS,
            ResolutionFamily::SouthPolar => &SOUTH_POLAR_RESOLUTIONS,
        };
        ResolutionTable { entries }
    }
}

impl From<PreferredCrs> for ResolutionFamily {
    fn from(preferred: PreferredCrs) -> Self {
        match preferred {
            PreferredCrs::Global => ResolutionFamily::Global,
            PreferredCrs::North => ResolutionFamily::NorthPolar,
            PreferredCrs::South => ResolutionFamily::SouthPolar,
        }
    }
}

/// A non-empty resolution table ordered finest to coarsest.
#[derive(Debug, Clone, Copy)]
pub struct ResolutionTable {
    entries: &'static [ResolutionEntry],
}

impl ResolutionTable {
    pub fn entries(&self) -> &'static [ResolutionEntry] {
        self.entries
    }

    pub fn finest(&self) -> ResolutionEntry {
        self.entries[0]
    }

    pub fn coarsest(&self) -> ResolutionEntry {
        self.entries[self.entries.len() - 1]
    }

    pub fn find_closest(&self, candidates: &[f64]) -> ResolutionEntry {
        find_closest_resolution(candidates, self)
    }
}

/// The table entry nearest to any of `candidates`.
///
/// Each candidate is compared against every entry and the entry with the
/// smallest absolute difference to any candidate wins. On an exact tie the
/// earlier (finer) entry is kept. Candidates beyond the coarsest entry land
/// on the coarsest entry; with no candidates the coarsest entry is returned.
pub fn find_closest_resolution(candidates: &[f64], table: &ResolutionTable) -> ResolutionEntry {
    let mut best = table.coarsest();
    let mut best_difference = f64::INFINITY;

    for entry in table.entries() {
        let difference = candidates
            .iter()
            .map(|candidate| (candidate - entry.pixel_size).abs())
            .fold(f64::INFINITY, f64::min);

        if difference < best_difference {
            best = *entry;
            best_difference = difference;
        }
    }

    best
}

/// The input raster's `(x, y)` resolution expressed in `target` units.
///
/// Meters become degrees by dividing by [`METERS_PER_DEGREE`] and degrees
/// become meters by multiplying; matching unit systems pass through.
pub fn resolution_in_target_crs_units(input: &InputRasterMetadata, target: &Crs) -> (f64, f64) {
    let (x_res, y_res) = input.native_resolution();

    match (input.crs.is_projected(), target.is_projected()) {
        (true, false) => (x_res / METERS_PER_DEGREE, y_res / METERS_PER_DEGREE),
        (false, true) => (x_res * METERS_PER_DEGREE, y_res * METERS_PER_DEGREE),
        _ => (x_res, y_res),
    }
}

/// Nearest whole cell count for `range / resolution`, rounding exact halves
/// to even.
pub fn cells_for_range(range: f64, resolution: f64) -> i64 {
    (range / resolution).round_ties_even() as i64
}
