//! Output grid resolution.
//!
//! Each grid parameter is taken from the first source that can supply it:
//!
//! ```text
//! CRS:        request ─► input raster
//! Extent:     request ─► ICD standard (preferred CRS) ─► area of use ─► globe
//! Dimensions: request width+height ─► request scale sizes ─► best guess
//! ```

use browse_common::{
    grid_from_extent, BrowseResult, Crs, Dimensions, GridSpec, PreferredCrs, ScaleExtent,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::request::{InputRasterMetadata, OutputGridRequest};
use crate::resolution::{
    cells_for_range, resolution_in_target_crs_units, ResolutionFamily, ResolutionTable,
};

/// Where the target CRS came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrsSource {
    Requested,
    Input,
}

/// Where the scale extent came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtentSource {
    Requested,
    IcdStandard(PreferredCrs),
    AreaOfUse,
    Global,
}

/// Where the output dimensions came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionSource {
    Requested,
    ScaleSize,
    BestGuess,
}

/// A resolved value tagged with the source that supplied it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolved<T, S> {
    pub value: T,
    pub source: S,
}

impl<T, S> Resolved<T, S> {
    fn new(value: T, source: S) -> Self {
        Self { value, source }
    }
}

/// The resolved grid plus the source of each of its parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridResolution {
    pub grid: GridSpec,
    pub scale_extent: ScaleExtent,
    pub crs_source: CrsSource,
    pub extent_source: ExtentSource,
    pub dimension_source: DimensionSource,
}

/// Resolve the complete output grid for `request` over `input`.
pub fn resolve_grid(
    request: &OutputGridRequest,
    input: &InputRasterMetadata,
) -> BrowseResult<GridSpec> {
    resolve_grid_with_sources(request, input).map(|resolution| resolution.grid)
}

/// Like [`resolve_grid`], also reporting which source won each decision.
pub fn resolve_grid_with_sources(
    request: &OutputGridRequest,
    input: &InputRasterMetadata,
) -> BrowseResult<GridResolution> {
    request.validate()?;

    let crs = choose_target_crs(request, input)?;
    let extent = choose_scale_extent(request, &crs.value);
    let dimensions = choose_target_dimensions(request, input, &extent.value, &crs.value);

    let grid = grid_from_extent(crs.value, &extent.value, dimensions.value);

    debug!(
        crs = %grid.crs,
        width = grid.width,
        height = grid.height,
        x_resolution = grid.x_resolution(),
        y_resolution = grid.y_resolution(),
        "Resolved output grid"
    );

    Ok(GridResolution {
        grid,
        scale_extent: extent.value,
        crs_source: crs.source,
        extent_source: extent.source,
        dimension_source: dimensions.source,
    })
}

/// The request's CRS when it has one, otherwise the input raster's.
pub fn choose_target_crs(
    request: &OutputGridRequest,
    input: &InputRasterMetadata,
) -> BrowseResult<Resolved<Crs, CrsSource>> {
    let resolved = match request.target_crs()? {
        Some(crs) => Resolved::new(crs, CrsSource::Requested),
        None => Resolved::new(input.crs.clone(), CrsSource::Input),
    };

    debug!(crs = %resolved.value, source = ?resolved.source, "Chose target CRS");
    Ok(resolved)
}

/// The request's extent, else the ICD extent of a preferred CRS, else a
/// best guess from the CRS itself.
pub fn choose_scale_extent(
    request: &OutputGridRequest,
    crs: &Crs,
) -> Resolved<ScaleExtent, ExtentSource> {
    let resolved = request
        .scale_extent()
        .map(|extent| Resolved::new(extent, ExtentSource::Requested))
        .or_else(|| {
            PreferredCrs::matching(crs).map(|preferred| {
                Resolved::new(preferred.icd_extent(), ExtentSource::IcdStandard(preferred))
            })
        })
        .unwrap_or_else(|| best_guess_scale_extent(crs));

    debug!(extent = ?resolved.value, source = ?resolved.source, "Chose scale extent");
    resolved
}

/// Extent derived from the CRS's area of use.
///
/// Projected CRSes get the area of use projected into their own units.
/// Geographic CRSes get the area of use verbatim, so an area crossing the
/// antimeridian keeps `xmin > xmax`. Without a usable area of use the
/// whole globe in degrees is returned.
pub fn best_guess_scale_extent(crs: &Crs) -> Resolved<ScaleExtent, ExtentSource> {
    let from_area = if crs.is_projected() {
        crs.projected_area_of_use()
    } else {
        crs.area_of_use().map(|area| area.as_extent())
    };

    match from_area {
        Some(extent) => {
            if extent.xmin > extent.xmax {
                warn!(crs = %crs, ?extent, "Area of use crosses the antimeridian");
            }
            Resolved::new(extent, ExtentSource::AreaOfUse)
        }
        None => Resolved::new(ScaleExtent::global(), ExtentSource::Global),
    }
}

/// Requested width and height, else dimensions implied by the requested
/// scale sizes, else a best guess from the input resolution.
///
/// Width and height are only used as a pair, as are the two scale sizes.
pub fn choose_target_dimensions(
    request: &OutputGridRequest,
    input: &InputRasterMetadata,
    extent: &ScaleExtent,
    crs: &Crs,
) -> Resolved<Dimensions, DimensionSource> {
    let resolved = request
        .dimensions()
        .map(|dimensions| Resolved::new(dimensions, DimensionSource::Requested))
        .or_else(|| {
            request.scale_sizes().map(|(x_size, y_size)| {
                Resolved::new(
                    dimensions_for_resolution(extent, x_size, y_size),
                    DimensionSource::ScaleSize,
                )
            })
        })
        .unwrap_or_else(|| {
            Resolved::new(
                best_guess_target_dimensions(input, extent, crs),
                DimensionSource::BestGuess,
            )
        });

    debug!(
        width = resolved.value.width,
        height = resolved.value.height,
        source = ?resolved.source,
        "Chose target dimensions"
    );
    resolved
}

/// Dimensions from the input's native resolution, snapped per axis to the
/// target CRS family's resolution table.
///
/// An axis coarser than the table's coarsest entry keeps its native
/// resolution.
pub fn best_guess_target_dimensions(
    input: &InputRasterMetadata,
    extent: &ScaleExtent,
    crs: &Crs,
) -> Dimensions {
    let (x_res, y_res) = resolution_in_target_crs_units(input, crs);
    let table = ResolutionFamily::for_crs(crs).table();

    let x_res = snap_resolution(x_res, &table);
    let y_res = snap_resolution(y_res, &table);

    debug!(x_res, y_res, "Best-guess output resolution");
    dimensions_for_resolution(extent, x_res, y_res)
}

fn snap_resolution(resolution: f64, table: &ResolutionTable) -> f64 {
    if resolution > table.coarsest().pixel_size {
        resolution
    } else {
        table.find_closest(&[resolution]).pixel_size
    }
}

/// Cell counts covering `extent` at the given per-axis resolution, at
/// least one cell per axis.
fn dimensions_for_resolution(extent: &ScaleExtent, x_res: f64, y_res: f64) -> Dimensions {
    Dimensions::new(
        clamp_cells(cells_for_range(extent.x_range().abs(), x_res)),
        clamp_cells(cells_for_range(extent.y_range().abs(), y_res)),
    )
}

fn clamp_cells(cells: i64) -> u32 {
    u32::try_from(cells.max(1)).unwrap_or(u32::MAX)
}
