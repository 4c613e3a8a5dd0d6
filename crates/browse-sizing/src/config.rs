//! Configuration for output tiling.

use crate::resolution::METERS_PER_DEGREE;
use browse_common::{BrowseError, BrowseResult};
use serde::{Deserialize, Serialize};

/// Thresholds and tile footprints used by the tiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Projected grids finer than this (meters) are tiled.
    pub min_projected_resolution: f64,

    /// Geographic grids finer than this (degrees) are tiled.
    pub min_geographic_resolution: f64,

    /// Ground width of one tile for projected grids, in meters.
    pub projected_tile_footprint: f64,

    /// Ground width of one tile for geographic grids, in degrees.
    pub geographic_tile_footprint: f64,

    /// Fixed cells per tile edge, bypassing the footprint calculation.
    pub cells_per_tile_override: Option<usize>,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            min_projected_resolution: 500.0,
            min_geographic_resolution: 500.0 / METERS_PER_DEGREE,
            projected_tile_footprint: 1_000_000.0,
            geographic_tile_footprint: 10.0,
            cells_per_tile_override: None,
        }
    }
}

impl TilingConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply any `BROWSE_*` environment variables on top of `self`.
    ///
    /// Unparseable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(val) = env_f64("BROWSE_MIN_PROJECTED_RESOLUTION") {
            self.min_projected_resolution = val;
        }

        if let Some(val) = env_f64("BROWSE_MIN_GEOGRAPHIC_RESOLUTION") {
            self.min_geographic_resolution = val;
        }

        if let Some(val) = env_f64("BROWSE_PROJECTED_TILE_FOOTPRINT") {
            self.projected_tile_footprint = val;
        }

        if let Some(val) = env_f64("BROWSE_GEOGRAPHIC_TILE_FOOTPRINT") {
            self.geographic_tile_footprint = val;
        }

        if let Ok(val) = std::env::var("BROWSE_CELLS_PER_TILE") {
            if let Ok(cells) = val.parse() {
                self.cells_per_tile_override = Some(cells);
            }
        }

        self
    }

    pub fn with_cells_per_tile(mut self, cells: usize) -> Self {
        self.cells_per_tile_override = Some(cells);
        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> BrowseResult<()> {
        let positive = [
            ("min_projected_resolution", self.min_projected_resolution),
            ("min_geographic_resolution", self.min_geographic_resolution),
            ("projected_tile_footprint", self.projected_tile_footprint),
            ("geographic_tile_footprint", self.geographic_tile_footprint),
        ];

        for (name, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(BrowseError::invalid_config(format!(
                    "{} must be > 0, got {}",
                    name, value
                )));
            }
        }

        if self.cells_per_tile_override == Some(0) {
            return Err(BrowseError::invalid_config(
                "cells_per_tile_override must be > 0",
            ));
        }

        Ok(())
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok().and_then(|val| val.parse().ok())
}
