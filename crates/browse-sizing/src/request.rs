//! Output grid request and input raster metadata.
//!
//! The request mirrors the `format` block of an incoming browse-image job:
//! every field is optional and nested fields are explicit `Option`s, so a
//! partially filled request is represented exactly as it arrived.

use browse_common::{Affine, Axis, BrowseError, BrowseResult, Crs, Dimensions, ScaleExtent};
use serde::{Deserialize, Serialize};

use crate::resolution::cells_for_range;

/// Spatial reference block of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SrsDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub epsg: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proj4: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkt: Option<String>,
}

/// Range along one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleExtentRequest {
    #[serde(default)]
    pub x: Option<AxisRange>,
    #[serde(default)]
    pub y: Option<AxisRange>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScaleSizeRequest {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
}

/// A possibly partial description of the desired output grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputGridRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crs: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srs: Option<SrsDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_extent: Option<ScaleExtentRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_size: Option<ScaleSizeRequest>,
}

impl OutputGridRequest {
    pub fn with_crs(mut self, crs: impl Into<String>) -> Self {
        self.crs = Some(crs.into());
        self
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_scale_extent(mut self, extent: ScaleExtent) -> Self {
        self.scale_extent = Some(ScaleExtentRequest {
            x: Some(AxisRange {
                min: Some(extent.xmin),
                max: Some(extent.xmax),
            }),
            y: Some(AxisRange {
                min: Some(extent.ymin),
                max: Some(extent.ymax),
            }),
        });
        self
    }

    pub fn with_scale_size(mut self, x: f64, y: f64) -> Self {
        self.scale_size = Some(ScaleSizeRequest {
            x: Some(x),
            y: Some(y),
        });
        self
    }

    /// The raw CRS text: `crs` first, then `srs.epsg`, `srs.proj4`, `srs.wkt`.
    pub fn crs_definition(&self) -> Option<&str> {
        self.crs.as_deref().or_else(|| {
            self.srs.as_ref().and_then(|srs| {
                srs.epsg
                    .as_deref()
                    .or(srs.proj4.as_deref())
                    .or(srs.wkt.as_deref())
            })
        })
    }

    /// True when any CRS text is present, parseable or not.
    pub fn has_crs(&self) -> bool {
        self.crs_definition().is_some()
    }

    /// The requested CRS, if one was given.
    pub fn target_crs(&self) -> BrowseResult<Option<Crs>> {
        self.crs_definition().map(Crs::from_user_string).transpose()
    }

    /// Width and height, only when both are present and non-zero.
    pub fn dimensions(&self) -> Option<Dimensions> {
        match (self.width?, self.height?) {
            (0, _) | (_, 0) => None,
            (width, height) => Some(Dimensions::new(width, height)),
        }
    }

    pub fn has_dimensions(&self) -> bool {
        self.dimensions().is_some()
    }

    /// `(x, y)` scale sizes, only when both are present, finite and positive.
    pub fn scale_sizes(&self) -> Option<(f64, f64)> {
        let sizes = self.scale_size.as_ref()?;
        let (x, y) = (sizes.x?, sizes.y?);
        let usable = |size: f64| size.is_finite() && size > 0.0;
        (usable(x) && usable(y)).then_some((x, y))
    }

    pub fn has_scale_sizes(&self) -> bool {
        self.scale_sizes().is_some()
    }

    /// The full extent, only when all four bounds are present.
    pub fn scale_extent(&self) -> Option<ScaleExtent> {
        let extent = self.scale_extent.as_ref()?;
        let x = extent.x.as_ref()?;
        let y = extent.y.as_ref()?;
        Some(ScaleExtent::new(x.min?, y.min?, x.max?, y.max?))
    }

    pub fn has_scale_extents(&self) -> bool {
        self.scale_extent().is_some()
    }

    /// Whether extent range, scale size and dimension agree along `axis`.
    ///
    /// Returns `true` when any of the three is missing for that axis, since
    /// there is nothing to contradict.
    pub fn has_consistent_dimension(&self, axis: Axis) -> bool {
        self.dimension_mismatch(axis).is_none()
    }

    /// Reject a request whose dimensions, scale sizes and scale extent are
    /// all given but disagree on either axis.
    pub fn validate(&self) -> BrowseResult<()> {
        if !(self.has_dimensions() && self.has_scale_sizes() && self.has_scale_extents()) {
            return Ok(());
        }

        for axis in [Axis::X, Axis::Y] {
            if let Some(err) = self.dimension_mismatch(axis) {
                return Err(err);
            }
        }

        Ok(())
    }

    fn dimension_mismatch(&self, axis: Axis) -> Option<BrowseError> {
        let extent = self.scale_extent.as_ref()?;
        let sizes = self.scale_size.as_ref()?;
        let (range, scale_size, requested) = match axis {
            Axis::X => (extent.x?, sizes.x?, self.width?),
            Axis::Y => (extent.y?, sizes.y?, self.height?),
        };
        let range = range.max? - range.min?;

        let derived = cells_for_range(range, scale_size);
        if derived == i64::from(requested) {
            return None;
        }

        Some(BrowseError::InconsistentDimension {
            axis,
            range,
            scale_size,
            derived,
            requested,
        })
    }
}

/// What the raster reader reports about the downloaded source granule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRasterMetadata {
    pub width: u32,
    pub height: u32,
    pub crs: Crs,
    pub transform: Affine,
}

impl InputRasterMetadata {
    pub fn new(width: u32, height: u32, crs: Crs, transform: Affine) -> Self {
        Self {
            width,
            height,
            crs,
            transform,
        }
    }

    /// Native `(x, y)` pixel size, both positive.
    pub fn native_resolution(&self) -> (f64, f64) {
        (self.transform.a.abs(), self.transform.e.abs())
    }
}
