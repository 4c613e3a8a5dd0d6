//! Coordinate Reference System definitions and the preferred output set.
//!
//! CRS values come from three places: authority codes (`EPSG:3413`), raw
//! proj4 strings (`+proj=stere ...`) and WKT text carrying an EPSG
//! identifier. Authority codes resolve against a small built-in registry
//! that carries areas of use, then against the full EPSG table from
//! `crs-definitions`. proj4 strings are validated with `proj4rs` and mapped
//! back onto a registry entry when their parameters match one.

use crate::{BrowseError, BrowseResult, ScaleExtent};
use proj4rs::Proj;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geodetic definition used to project areas of use, which are always
/// published in WGS84 degrees.
const WGS84_LONLAT: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Extra samples between the corners of each edge when projecting an area
/// of use. Each edge is split into `DENSIFY_POINTS + 1` equal segments.
const DENSIFY_POINTS: usize = 21;

/// Whether a CRS measures ground positions in degrees or a linear unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrsKind {
    /// Longitude/latitude in degrees
    Geographic,
    /// Easting/northing in meters
    Projected,
}

/// Published area of use for a CRS, in WGS84 degrees.
///
/// `west > east` means the area crosses the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AreaOfUse {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl AreaOfUse {
    pub const fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// The area verbatim as an extent, antimeridian crossing included.
    pub fn as_extent(&self) -> ScaleExtent {
        ScaleExtent::new(self.west, self.south, self.east, self.north)
    }
}

struct RegistryEntry {
    epsg: u32,
    proj4: &'static str,
    kind: CrsKind,
    area_of_use: Option<AreaOfUse>,
}

const WGS84: RegistryEntry = RegistryEntry {
    epsg: 4326,
    proj4: "+proj=longlat +datum=WGS84 +no_defs",
    kind: CrsKind::Geographic,
    area_of_use: Some(AreaOfUse::new(-180.0, -90.0, 180.0, 90.0)),
};

const NAD83: RegistryEntry = RegistryEntry {
    epsg: 4269,
    proj4: "+proj=longlat +datum=NAD83 +no_defs",
    kind: CrsKind::Geographic,
    area_of_use: Some(AreaOfUse::new(167.65, 14.92, -40.73, 86.45)),
};

const ZANDERIJ: RegistryEntry = RegistryEntry {
    epsg: 4311,
    proj4: "+proj=longlat +ellps=intl +towgs84=-265,120,-358,0,0,0,0 +no_defs",
    kind: CrsKind::Geographic,
    area_of_use: Some(AreaOfUse::new(-58.08, 1.83, -52.66, 9.35)),
};

const NSIDC_NORTH: RegistryEntry = RegistryEntry {
    epsg: 3413,
    proj4: "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, 30.0, 180.0, 90.0)),
};

const ANTARCTIC_STEREO: RegistryEntry = RegistryEntry {
    epsg: 3031,
    proj4: "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, -90.0, 180.0, -60.0)),
};

const WEB_MERCATOR: RegistryEntry = RegistryEntry {
    epsg: 3857,
    proj4: "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, -85.06, 180.0, 85.06)),
};

const LAEA_CANADA: RegistryEntry = RegistryEntry {
    epsg: 3573,
    proj4: "+proj=laea +lat_0=90 +lon_0=-100 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, 45.0, 180.0, 90.0)),
};

const EASE2_NORTH: RegistryEntry = RegistryEntry {
    epsg: 6931,
    proj4: "+proj=laea +lat_0=90 +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, 0.0, 180.0, 90.0)),
};

const EASE2_SOUTH: RegistryEntry = RegistryEntry {
    epsg: 6932,
    proj4: "+proj=laea +lat_0=-90 +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, -90.0, 180.0, 0.0)),
};

const EASE2_GLOBAL: RegistryEntry = RegistryEntry {
    epsg: 6933,
    proj4: "+proj=cea +lat_ts=30 +lon_0=0 +x_0=0 +y_0=0 +datum=WGS84 +units=m +no_defs",
    kind: CrsKind::Projected,
    area_of_use: Some(AreaOfUse::new(-180.0, -86.0, 180.0, 86.0)),
};

/// Built-in EPSG definitions.
static REGISTRY: &[RegistryEntry] = &[
    WGS84,
    NAD83,
    ZANDERIJ,
    NSIDC_NORTH,
    ANTARCTIC_STEREO,
    WEB_MERCATOR,
    LAEA_CANADA,
    EASE2_NORTH,
    EASE2_SOUTH,
    EASE2_GLOBAL,
];

/// A resolved coordinate reference system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Crs {
    epsg: Option<u32>,
    proj4: String,
    kind: CrsKind,
    area_of_use: Option<AreaOfUse>,
}

impl Crs {
    /// Look up an EPSG code.
    ///
    /// Registry entries keep their area of use. Other codes come from the
    /// EPSG table and have none.
    pub fn from_epsg(code: u32) -> BrowseResult<Self> {
        if let Some(entry) = REGISTRY.iter().find(|entry| entry.epsg == code) {
            return Ok(Self::from_entry(entry));
        }

        let def = u16::try_from(code)
            .ok()
            .and_then(crs_definitions::from_code)
            .filter(|def| !def.proj4.trim().is_empty())
            .ok_or_else(|| BrowseError::invalid_crs(format!("EPSG:{code} is not a known definition")))?;

        tracing::debug!(epsg = code, proj4 = def.proj4, "EPSG code resolved from definition table");
        Ok(Self {
            epsg: Some(code),
            proj4: def.proj4.trim().to_string(),
            kind: proj4_kind(def.proj4),
            area_of_use: None,
        })
    }

    /// Build a CRS from a proj4 definition string.
    ///
    /// Definitions equivalent to a registry entry resolve to that entry, so
    /// they keep their authority code and area of use.
    pub fn from_proj4(definition: &str) -> BrowseResult<Self> {
        let normalized = normalize_proj4(definition);
        if let Some(entry) = REGISTRY
            .iter()
            .find(|entry| normalize_proj4(entry.proj4) == normalized)
        {
            return Ok(Self::from_entry(entry));
        }

        let proj = Proj::from_proj_string(definition.trim())
            .map_err(|e| BrowseError::invalid_crs(format!("{definition}: {e:?}")))?;

        let kind = if proj.is_latlong() {
            CrsKind::Geographic
        } else {
            CrsKind::Projected
        };

        Ok(Self {
            epsg: None,
            proj4: definition.trim().to_string(),
            kind,
            area_of_use: None,
        })
    }

    /// Build a CRS from WKT (version 1 or 2) by its top-level EPSG identifier.
    pub fn from_wkt(wkt: &str) -> BrowseResult<Self> {
        let code = wkt_epsg_code(wkt).ok_or_else(|| {
            BrowseError::invalid_crs("WKT definition does not carry an EPSG identifier")
        })?;
        Self::from_epsg(code)
    }

    /// Parse any supported user representation.
    ///
    /// Accepts `EPSG:4326` (any case), bare proj4 strings and WKT.
    pub fn from_user_string(s: &str) -> BrowseResult<Self> {
        let trimmed = s.trim();
        let upper = trimmed.to_uppercase();

        if let Some(code) = upper.strip_prefix("EPSG:") {
            let code: u32 = code
                .trim()
                .parse()
                .map_err(|_| BrowseError::invalid_crs(trimmed))?;
            return Self::from_epsg(code);
        }

        if trimmed.starts_with('+') {
            return Self::from_proj4(trimmed);
        }

        if trimmed.contains('[') {
            return Self::from_wkt(trimmed);
        }

        Err(BrowseError::invalid_crs(trimmed))
    }

    fn from_entry(entry: &RegistryEntry) -> Self {
        Self {
            epsg: Some(entry.epsg),
            proj4: entry.proj4.to_string(),
            kind: entry.kind,
            area_of_use: entry.area_of_use,
        }
    }

    /// EPSG code, when the CRS came from (or matched) the registry.
    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    /// proj4 definition string.
    pub fn proj4(&self) -> &str {
        &self.proj4
    }

    pub fn kind(&self) -> CrsKind {
        self.kind
    }

    pub fn is_projected(&self) -> bool {
        self.kind == CrsKind::Projected
    }

    pub fn is_geographic(&self) -> bool {
        self.kind == CrsKind::Geographic
    }

    pub fn area_of_use(&self) -> Option<AreaOfUse> {
        self.area_of_use
    }

    /// Project the area of use into this CRS's own units.
    ///
    /// Each edge of the area is densified and the bounds of the projected
    /// samples are returned. Samples that fail to project are skipped;
    /// `None` means no area of use or nothing projected.
    pub fn projected_area_of_use(&self) -> Option<ScaleExtent> {
        let area = self.area_of_use?;

        let source = Proj::from_proj_string(WGS84_LONLAT).ok()?;
        let target = match Proj::from_proj_string(&self.proj4) {
            Ok(proj) => proj,
            Err(e) => {
                tracing::warn!(crs = %self, error = ?e, "Cannot build projection for area of use");
                return None;
            }
        };

        // Walk eastward so an antimeridian-crossing area stays contiguous.
        let east = if area.east < area.west {
            area.east + 360.0
        } else {
            area.east
        };

        let mut bounds: Option<ScaleExtent> = None;
        for (lon, lat) in densified_ring(area.west, area.south, east, area.north) {
            let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
            if proj4rs::transform::transform(&source, &target, &mut point).is_err() {
                continue;
            }
            let (x, y) = (point.0, point.1);
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => ScaleExtent::new(x, y, x, y),
                Some(b) => ScaleExtent::new(b.xmin.min(x), b.ymin.min(y), b.xmax.max(x), b.ymax.max(y)),
            });
        }

        if bounds.is_none() {
            tracing::warn!(crs = %self, "No area-of-use sample could be projected");
        }
        bounds
    }
}

impl PartialEq for Crs {
    fn eq(&self, other: &Self) -> bool {
        match (self.epsg, other.epsg) {
            (Some(a), Some(b)) => a == b,
            _ => normalize_proj4(&self.proj4) == normalize_proj4(&other.proj4),
        }
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.epsg {
            Some(code) => write!(f, "EPSG:{}", code),
            None => write!(f, "{}", self.proj4),
        }
    }
}

impl FromStr for Crs {
    type Err = BrowseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_user_string(s)
    }
}

impl TryFrom<String> for Crs {
    type Error = BrowseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_user_string(&value)
    }
}

impl From<Crs> for String {
    fn from(crs: Crs) -> Self {
        crs.to_string()
    }
}

/// The fixed set of output CRSes with ICD-mandated extents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferredCrs {
    /// Global geographic, EPSG:4326
    Global,
    /// North polar stereographic, EPSG:3413
    North,
    /// South polar stereographic, EPSG:3031
    South,
}

impl PreferredCrs {
    pub const ALL: [PreferredCrs; 3] = [PreferredCrs::Global, PreferredCrs::North, PreferredCrs::South];

    pub fn epsg(&self) -> u32 {
        match self {
            PreferredCrs::Global => WGS84.epsg,
            PreferredCrs::North => NSIDC_NORTH.epsg,
            PreferredCrs::South => ANTARCTIC_STEREO.epsg,
        }
    }

    /// The registry definition for this CRS.
    pub fn crs(&self) -> Crs {
        let entry = match self {
            PreferredCrs::Global => &WGS84,
            PreferredCrs::North => &NSIDC_NORTH,
            PreferredCrs::South => &ANTARCTIC_STEREO,
        };
        Crs::from_entry(entry)
    }

    /// Which preferred CRS, if any, `crs` is equivalent to.
    pub fn matching(crs: &Crs) -> Option<Self> {
        Self::ALL.into_iter().find(|preferred| preferred.crs() == *crs)
    }

    /// The ICD-defined scale extent.
    pub fn icd_extent(&self) -> ScaleExtent {
        match self {
            PreferredCrs::Global => ScaleExtent::global(),
            PreferredCrs::North | PreferredCrs::South => {
                ScaleExtent::new(-4194304.0, -4194304.0, 4194304.0, 4194304.0)
            }
        }
    }
}

/// ICD-defined extent for a preferred CRS; any other CRS is an error.
pub fn icd_defined_extent_from_crs(crs: &Crs) -> BrowseResult<ScaleExtent> {
    PreferredCrs::matching(crs)
        .map(|preferred| preferred.icd_extent())
        .ok_or_else(|| BrowseError::unsupported_crs(crs))
}

/// Canonical token form of a proj4 string for equality checks.
fn normalize_proj4(definition: &str) -> Vec<String> {
    let mut tokens: Vec<String> = definition
        .split_whitespace()
        .map(str::to_lowercase)
        .filter(|t| !matches!(t.as_str(), "+no_defs" | "+type=crs" | "+wktext"))
        .collect();
    tokens.sort();
    tokens
}

/// Geographic or projected, read from the `+proj=` token.
fn proj4_kind(definition: &str) -> CrsKind {
    let geographic = definition.split_whitespace().any(|token| {
        matches!(
            token.to_lowercase().as_str(),
            "+proj=longlat" | "+proj=latlong" | "+proj=lonlat" | "+proj=latlon"
        )
    });
    if geographic {
        CrsKind::Geographic
    } else {
        CrsKind::Projected
    }
}

/// The EPSG code of the outermost object in a WKT string.
///
/// The top-level identifier is the last one in the text for both WKT1
/// (`AUTHORITY["EPSG","3413"]`) and WKT2 (`ID["EPSG",3413]`).
fn wkt_epsg_code(wkt: &str) -> Option<u32> {
    let upper = wkt.to_uppercase();
    let start = ["AUTHORITY[\"EPSG\",", "ID[\"EPSG\","]
        .iter()
        .filter_map(|marker| upper.rfind(marker).map(|pos| pos + marker.len()))
        .max()?;

    let digits: String = upper[start..]
        .chars()
        .skip_while(|c| *c == '"' || c.is_whitespace())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Points walking the boundary of a lon/lat box counter-clockwise from the
/// south-west corner, each edge split into `DENSIFY_POINTS + 1` segments.
fn densified_ring(west: f64, south: f64, east: f64, north: f64) -> Vec<(f64, f64)> {
    let segments = DENSIFY_POINTS + 1;
    let mut points = Vec::with_capacity(segments * 4);
    for i in 0..segments {
        let t = i as f64 / segments as f64;
        let lon = (east - west) * t;
        let lat = (north - south) * t;
        points.push((west + lon, south));
        points.push((east, south + lat));
        points.push((east - lon, north));
        points.push((west, north - lat));
    }
    points
}
