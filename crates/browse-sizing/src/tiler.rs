//! Partitioning of high-resolution output grids into tiles.

use browse_common::{Affine, Crs, GridSpec, TileLocator, TileSpec};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TilingConfig;

/// Tiles of an output grid with their parallel locators, in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TiledOutput {
    pub tiles: Vec<TileSpec>,
    pub locators: Vec<TileLocator>,
}

impl TiledOutput {
    /// The whole grid as the only tile.
    pub fn single(grid: GridSpec) -> Self {
        Self {
            tiles: vec![grid],
            locators: vec![TileLocator::origin()],
        }
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TileSpec, &TileLocator)> {
        self.tiles.iter().zip(&self.locators)
    }

    /// Number of tile rows and columns.
    pub fn matrix_shape(&self) -> (u32, u32) {
        self.locators
            .iter()
            .fold((0, 0), |(rows, cols), locator| {
                (rows.max(locator.row + 1), cols.max(locator.col + 1))
            })
    }
}

/// Split `grid` into tiles when its resolution calls for it.
pub fn partition(grid: &GridSpec, config: &TilingConfig) -> TiledOutput {
    if !needs_tiling(grid, config) {
        debug!(width = grid.width, height = grid.height, "Grid does not need tiling");
        return TiledOutput::single(grid.clone());
    }

    create_tiled_output_parameters(grid, config)
}

/// True when either pixel dimension is finer than the tiling threshold for
/// the grid's CRS kind.
pub fn needs_tiling(grid: &GridSpec, config: &TilingConfig) -> bool {
    let threshold = if grid.crs.is_projected() {
        config.min_projected_resolution
    } else {
        config.min_geographic_resolution
    };

    grid.transform.a.abs() < threshold || grid.transform.e.abs() < threshold
}

/// Cells along one tile edge for a grid of `resolution` in `crs`.
pub fn compute_cells_per_tile(resolution: f64, crs: &Crs, config: &TilingConfig) -> usize {
    if let Some(cells) = config.cells_per_tile_override {
        return cells;
    }

    let footprint = if crs.is_projected() {
        config.projected_tile_footprint
    } else {
        config.geographic_tile_footprint
    };

    let cells = (footprint / resolution.abs()).round_ties_even();
    (cells as usize).max(1)
}

/// Tile start offsets along one axis, ending with `total`.
///
/// ```
/// use browse_sizing::compute_tile_boundaries;
///
/// assert_eq!(compute_tile_boundaries(10, 43), vec![0, 10, 20, 30, 40, 43]);
/// assert_eq!(compute_tile_boundaries(10, 40), vec![0, 10, 20, 30, 40]);
/// ```
pub fn compute_tile_boundaries(cells_per_tile: usize, total: usize) -> Vec<usize> {
    let mut boundaries: Vec<usize> = (0..total).step_by(cells_per_tile.max(1)).collect();
    boundaries.push(total);
    boundaries
}

/// Size of each tile from its start offset; the last entry is always `0`.
pub fn compute_tile_dimensions(origins: &[usize]) -> Vec<usize> {
    let mut dimensions: Vec<usize> = origins.windows(2).map(|pair| pair[1] - pair[0]).collect();
    dimensions.push(0);
    dimensions
}

/// Cut `grid` into square tiles sized from its x resolution.
pub fn create_tiled_output_parameters(grid: &GridSpec, config: &TilingConfig) -> TiledOutput {
    let cells_per_tile = compute_cells_per_tile(grid.x_resolution(), &grid.crs, config);

    let col_origins = compute_tile_boundaries(cells_per_tile, grid.width as usize);
    let row_origins = compute_tile_boundaries(cells_per_tile, grid.height as usize);
    let col_widths = compute_tile_dimensions(&col_origins);
    let row_heights = compute_tile_dimensions(&row_origins);

    let columns: Vec<(usize, usize)> = col_origins
        .iter()
        .copied()
        .zip(col_widths.iter().copied())
        .filter(|(_, width)| *width > 0)
        .collect();
    let rows: Vec<(usize, usize)> = row_origins
        .iter()
        .copied()
        .zip(row_heights.iter().copied())
        .filter(|(_, height)| *height > 0)
        .collect();

    let mut tiles = Vec::with_capacity(rows.len() * columns.len());
    let mut locators = Vec::with_capacity(rows.len() * columns.len());

    for (row, &(row_origin, height)) in rows.iter().enumerate() {
        for (col, &(col_origin, width)) in columns.iter().enumerate() {
            let transform = grid.transform * Affine::translation(col_origin as f64, row_origin as f64);
            tiles.push(TileSpec::new(
                width as u32,
                height as u32,
                grid.crs.clone(),
                transform,
            ));
            locators.push(TileLocator::new(row as u32, col as u32));
        }
    }

    info!(
        width = grid.width,
        height = grid.height,
        cells_per_tile,
        rows = rows.len(),
        columns = columns.len(),
        "Partitioned output grid into tiles"
    );

    TiledOutput { tiles, locators }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(epsg: u32, size: u32, resolution: f64) -> GridSpec {
        GridSpec::new(
            size,
            size,
            Crs::from_epsg(epsg).unwrap(),
            Affine::new(resolution, 0.0, -3850000.0, 0.0, resolution, 5850000.0),
        )
    }

    #[test]
    fn test_needs_tiling() {
        let config = TilingConfig::default();

        assert!(needs_tiling(&grid(3413, 400, 400.0), &config));
        assert!(!needs_tiling(&grid(3413, 400, 600.0), &config));

        let fine = GridSpec::new(
            360000,
            180000,
            Crs::from_epsg(4326).unwrap(),
            Affine::new(0.001, 0.0, -180.0, 0.0, -0.001, 180.0),
        );
        assert!(needs_tiling(&fine, &config));

        let coarse = GridSpec::new(
            3600,
            1800,
            Crs::from_epsg(4326).unwrap(),
            Affine::new(0.1, 0.0, -180.0, 0.0, -0.1, 180.0),
        );
        assert!(!needs_tiling(&coarse, &config));
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let config = TilingConfig::default();
        assert!(!needs_tiling(&grid(3413, 400, 500.0), &config));
    }

    #[test]
    fn test_compute_cells_per_tile() {
        let config = TilingConfig::default();
        let projected = Crs::from_epsg(3413).unwrap();
        let geographic = Crs::from_epsg(4326).unwrap();

        assert_eq!(compute_cells_per_tile(500.0, &projected, &config), 2000);
        assert_eq!(compute_cells_per_tile(0.009, &geographic, &config), 1111);

        let config = config.with_cells_per_tile(2800);
        assert_eq!(compute_cells_per_tile(500.0, &projected, &config), 2800);
    }

    #[test]
    fn test_compute_tile_boundaries_exact() {
        assert_eq!(compute_tile_boundaries(10, 40), vec![0, 10, 20, 30, 40]);
    }

    #[test]
    fn test_compute_tile_boundaries_with_leftovers() {
        assert_eq!(compute_tile_boundaries(10, 43), vec![0, 10, 20, 30, 40, 43]);
    }

    #[test]
    fn test_compute_tile_dimensions_uniform() {
        assert_eq!(
            compute_tile_dimensions(&[0, 10, 20, 30, 40, 43]),
            vec![10, 10, 10, 10, 3, 0]
        );
    }

    #[test]
    fn test_compute_tile_dimensions_nonuniform() {
        assert_eq!(
            compute_tile_dimensions(&[0, 20, 35, 40, 43]),
            vec![20, 15, 5, 3, 0]
        );
    }

    #[test]
    fn test_boundary_properties() {
        for total in 1..60 {
            for step in 1..15 {
                let boundaries = compute_tile_boundaries(step, total);
                assert_eq!(boundaries[0], 0);
                assert_eq!(*boundaries.last().unwrap(), total);

                let dimensions = compute_tile_dimensions(&boundaries);
                let body = &dimensions[..dimensions.len() - 1];
                assert_eq!(body.iter().sum::<usize>(), total);
                assert!(body.iter().all(|&d| d > 0 && d <= step));
                assert!(body[..body.len() - 1].iter().all(|&d| d == step));
            }
        }
    }

    #[test]
    fn test_matrix_shape() {
        let output = TiledOutput {
            tiles: Vec::new(),
            locators: vec![
                TileLocator::new(0, 0),
                TileLocator::new(0, 1),
                TileLocator::new(1, 0),
                TileLocator::new(1, 1),
            ],
        };
        assert_eq!(output.matrix_shape(), (2, 2));
    }
}
