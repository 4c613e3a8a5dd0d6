//! The plan handed to the rendering and staging steps.

use browse_common::{Affine, BrowseResult, GridSpec, ScaleExtent, TileLocator};
use browse_sizing::{
    needs_tiling, partition, resolve_grid_with_sources, CrsSource, DimensionSource, ExtentSource,
    InputRasterMetadata, OutputGridRequest, TilingConfig,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One tile to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTile {
    pub locator: TileLocator,
    /// Filename suffix for the staged tile.
    pub suffix: String,
    pub width: u32,
    pub height: u32,
    pub transform: Affine,
    /// `transform` in GDAL order.
    pub geotransform: [f64; 6],
}

/// Resolved grid and its tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowsePlan {
    pub grid: GridSpec,
    pub geotransform: [f64; 6],
    pub scale_extent: ScaleExtent,
    pub crs_source: CrsSource,
    pub extent_source: ExtentSource,
    pub dimension_source: DimensionSource,
    /// Whether the grid is fine enough to tile, even when it fits in one tile.
    pub tiled: bool,
    pub tiles: Vec<PlannedTile>,
}

/// Resolve the output grid for `request` over `input` and tile it.
pub fn build_plan(
    request: &OutputGridRequest,
    input: &InputRasterMetadata,
    config: &TilingConfig,
) -> BrowseResult<BrowsePlan> {
    let resolution = resolve_grid_with_sources(request, input)?;
    let needs_tiles = needs_tiling(&resolution.grid, config);
    let tiled = partition(&resolution.grid, config);

    let tiles: Vec<PlannedTile> = tiled
        .iter()
        .map(|(tile, locator)| PlannedTile {
            locator: *locator,
            suffix: locator.suffix(),
            width: tile.width,
            height: tile.height,
            transform: tile.transform,
            geotransform: tile.transform.to_gdal(),
        })
        .collect();

    info!(
        crs = %resolution.grid.crs,
        width = resolution.grid.width,
        height = resolution.grid.height,
        tiles = tiles.len(),
        "Built browse plan"
    );

    Ok(BrowsePlan {
        geotransform: resolution.grid.transform.to_gdal(),
        grid: resolution.grid,
        scale_extent: resolution.scale_extent,
        crs_source: resolution.crs_source,
        extent_source: resolution.extent_source,
        dimension_source: resolution.dimension_source,
        tiled: needs_tiles,
        tiles,
    })
}
