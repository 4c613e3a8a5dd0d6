//! Output grid sizing for browse imagery.
//!
//! Turns a partially specified output request and the metadata of the
//! source raster into a complete output grid, then splits grids that are
//! too fine to render in one pass into tiles.
//!
//! # Architecture
//!
//! ```text
//! OutputGridRequest + InputRasterMetadata
//!      │
//!      ▼
//! resolve_grid()
//!      │
//!      ├─► CRS:        request ─► input raster
//!      │
//!      ├─► Extent:     request ─► ICD standard ─► area of use ─► globe
//!      │
//!      └─► Dimensions: request ─► scale sizes ─► best guess
//!                                                   │
//!                                                   └─► ResolutionTable::find_closest
//!      │
//!      ▼
//! GridSpec
//!      │
//!      ▼
//! partition()
//!      │
//!      ├─► Coarse grid: one tile, locator (0, 0)
//!      │
//!      └─► Fine grid: row-major tiles + TileLocators
//! ```
//!
//! # Example
//!
//! ```ignore
//! use browse_sizing::{partition, resolve_grid, TilingConfig};
//!
//! let grid = resolve_grid(&request, &input)?;
//! let tiled = partition(&grid, &TilingConfig::from_env());
//!
//! for (tile, locator) in tiled.iter() {
//!     // render `tile`, stage as `<name>.{locator.suffix()}.png`
//! }
//! ```

pub mod config;
pub mod request;
pub mod resolution;
pub mod resolver;
pub mod tiler;

// Re-export commonly used types at crate root
pub use config::TilingConfig;
pub use request::{
    AxisRange, InputRasterMetadata, OutputGridRequest, ScaleExtentRequest, ScaleSizeRequest,
    SrsDefinition,
};
pub use resolution::{
    cells_for_range, find_closest_resolution, resolution_in_target_crs_units, ResolutionEntry,
    ResolutionFamily, ResolutionTable, METERS_PER_DEGREE,
};
pub use resolver::{
    best_guess_scale_extent, best_guess_target_dimensions, choose_scale_extent,
    choose_target_crs, choose_target_dimensions, resolve_grid, resolve_grid_with_sources,
    CrsSource, DimensionSource, ExtentSource, GridResolution, Resolved,
};
pub use tiler::{
    compute_cells_per_tile, compute_tile_boundaries, compute_tile_dimensions,
    create_tiled_output_parameters, needs_tiling, partition, TiledOutput,
};
