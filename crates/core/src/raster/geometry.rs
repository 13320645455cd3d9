//! Grid geometry without data

use crate::crs::{self, CrsTransform, CRS};
use crate::error::{Error, Result};
use crate::raster::GeoTransform;
use serde::{Deserialize, Serialize};

/// Shape, georeferencing and spatial reference of a raster grid.
///
/// This is what a caller passes when asking for output "on this grid":
/// two rasters with matching geometries can be combined cell by cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterGeometry {
    pub rows: usize,
    pub cols: usize,
    pub transform: GeoTransform,
    pub crs: Option<CRS>,
}

impl RasterGeometry {
    pub fn new(rows: usize, cols: usize, transform: GeoTransform, crs: Option<CRS>) -> Self {
        Self {
            rows,
            cols,
            transform,
            crs,
        }
    }

    /// Build a north-up grid covering `bounds` (min_x, min_y, max_x, max_y)
    /// with square cells of `cell_size`.
    ///
    /// Rows and columns are rounded up so the grid always covers the bounds.
    pub fn from_bounds(
        bounds: (f64, f64, f64, f64),
        cell_size: f64,
        crs: Option<CRS>,
    ) -> Result<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(Error::InvalidParameter {
                name: "cell_size",
                value: cell_size.to_string(),
                reason: "must be a positive finite distance".into(),
            });
        }

        let (min_x, min_y, max_x, max_y) = bounds;
        let cols = cells_spanning(max_x - min_x, cell_size);
        let rows = cells_spanning(max_y - min_y, cell_size);

        Ok(Self {
            rows,
            cols,
            transform: GeoTransform::new(min_x, max_y, cell_size, -cell_size),
            crs,
        })
    }

    /// Same extent and CRS, resampled to square cells of `cell_size`
    pub fn with_cell_size(&self, cell_size: f64) -> Result<Self> {
        Self::from_bounds(self.bounds(), cell_size, self.crs.clone())
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Cell size in the units of `crs`, measured on the centre cell.
    ///
    /// `None` when the grid cannot be transformed into `crs`.
    pub fn cell_size_in(&self, crs: Option<&CRS>) -> Option<f64> {
        let (Some(from), Some(to)) = (self.crs.as_ref(), crs) else {
            return Some(self.cell_size());
        };
        if from.is_equivalent(to) {
            return Some(self.cell_size());
        }
        let transform = CrsTransform::new(from, to)?;
        let (col, row) = (self.cols / 2, self.rows / 2);
        let (x0, y0) = self.transform.pixel_to_geo_corner(col, row);
        let (x1, y1) = self.transform.pixel_to_geo_corner(col + 1, row + 1);
        let (x0, y0) = transform.apply(x0, y0);
        let (x1, y1) = transform.apply(x1, y1);
        let size = ((x1 - x0) * (y1 - y0)).abs().sqrt();
        (size.is_finite() && size > 0.0).then_some(size)
    }

    /// Map bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols, self.rows)
    }

    /// Whether data on `other` can be used cell-for-cell on this grid
    pub fn matches(&self, other: &RasterGeometry) -> bool {
        self.shape() == other.shape()
            && self.transform.approx_eq(&other.transform)
            && crs::compatible(self.crs.as_ref(), other.crs.as_ref())
    }
}

/// Number of whole cells needed to cover `extent`, tolerating float noise
fn cells_spanning(extent: f64, cell_size: f64) -> usize {
    let n = extent / cell_size;
    let rounded = n.round();
    if (n - rounded).abs() < 1e-6 {
        rounded.max(0.0) as usize
    } else {
        n.ceil().max(0.0) as usize
    }
}
