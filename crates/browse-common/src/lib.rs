//! Common types shared by the browse-image grid planner.

pub mod bbox;
pub mod crs;
pub mod error;
pub mod grid;
pub mod tile;

pub use bbox::ScaleExtent;
pub use crs::{icd_defined_extent_from_crs, AreaOfUse, Crs, CrsKind, PreferredCrs};
pub use error::{Axis, BrowseError, BrowseResult};
pub use grid::{grid_from_extent, Affine, Dimensions, GridSpec, TileSpec};
pub use tile::TileLocator;
