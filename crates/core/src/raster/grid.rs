//! Main Raster type

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, RasterElement, RasterGeometry};
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use std::convert::Infallible;

/// A georeferenced 2D raster grid.
///
/// `Raster<T>` stores values of type `T` in a 2D grid with associated
/// geographic metadata (transform, CRS and no-data value).
///
/// # Example
///
/// ```ignore
/// use pmjpl_core::Raster;
///
/// // 100x100 land-cover raster, all grasslands
/// let mut igbp: Raster<u8> = Raster::filled(100, 100, 10);
/// igbp.set(10, 20, 1)?;
/// assert_eq!(igbp.get(10, 20)?, 1);
/// ```
#[derive(Debug, Clone)]
pub struct Raster<T: RasterElement> {
    /// Raster data stored in row-major order (row, col)
    data: Array2<T>,
    /// Affine transformation
    transform: GeoTransform,
    /// Coordinate reference system
    crs: Option<CRS>,
    /// No-data value
    nodata: Option<T>,
}

impl<T: RasterElement> Raster<T> {
    /// Create a new raster filled with zeros
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::from_array(Array2::zeros((rows, cols)))
    }

    /// Create a new raster filled with a specific value
    pub fn filled(rows: usize, cols: usize, value: T) -> Self {
        Self::from_array(Array2::from_elem((rows, cols), value))
    }

    /// Create a raster covering `geometry` with every cell set to `value`
    pub fn from_geometry(geometry: &RasterGeometry, value: T) -> Self {
        Self {
            data: Array2::from_elem(geometry.shape(), value),
            transform: geometry.transform,
            crs: geometry.crs.clone(),
            nodata: None,
        }
    }

    /// Create a raster from row-major data
    pub fn from_vec(data: Vec<T>, rows: usize, cols: usize) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }

        let array = Array2::from_shape_vec((rows, cols), data)
            .map_err(|e| Error::Other(e.to_string()))?;

        Ok(Self::from_array(array))
    }

    /// Create a raster from an ndarray
    pub fn from_array(data: Array2<T>) -> Self {
        Self {
            data,
            transform: GeoTransform::default(),
            crs: None,
            nodata: None,
        }
    }

    /// Builder-style setter for the geotransform
    pub fn with_transform(mut self, transform: GeoTransform) -> Self {
        self.transform = transform;
        self
    }

    /// Builder-style setter for the CRS
    pub fn with_crs(mut self, crs: CRS) -> Self {
        self.crs = Some(crs);
        self
    }

    /// Builder-style setter for the no-data value
    pub fn with_nodata(mut self, nodata: T) -> Self {
        self.nodata = Some(nodata);
        self
    }

    // Dimensions

    pub fn rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn cols(&self) -> usize {
        self.data.ncols()
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.data.dim()
    }

    /// Total number of cells
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Geometry (shape, transform, CRS) of this raster
    pub fn geometry(&self) -> RasterGeometry {
        RasterGeometry::new(self.rows(), self.cols(), self.transform, self.crs.clone())
    }

    // Data access

    /// Get value at (row, col)
    pub fn get(&self, row: usize, col: usize) -> Result<T> {
        self.data
            .get((row, col))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            })
    }

    /// Set value at (row, col)
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<()> {
        let (rows, cols) = self.shape();
        match self.data.get_mut((row, col)) {
            Some(cell) => {
                *cell = value;
                Ok(())
            }
            None => Err(Error::IndexOutOfBounds {
                row,
                col,
                rows,
                cols,
            }),
        }
    }

    /// Value at (row, col), `None` when the cell is no-data
    pub fn value_at(&self, row: usize, col: usize) -> Option<T> {
        let v = self.data[(row, col)];
        if v.is_nodata(self.nodata) {
            None
        } else {
            Some(v)
        }
    }

    pub fn view(&self) -> ArrayView2<'_, T> {
        self.data.view()
    }

    pub fn data(&self) -> &Array2<T> {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut Array2<T> {
        &mut self.data
    }

    pub fn into_array(self) -> Array2<T> {
        self.data
    }

    // Metadata

    pub fn transform(&self) -> &GeoTransform {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: GeoTransform) {
        self.transform = transform;
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.crs.as_ref()
    }

    pub fn set_crs(&mut self, crs: Option<CRS>) {
        self.crs = crs;
    }

    pub fn nodata(&self) -> Option<T> {
        self.nodata
    }

    pub fn set_nodata(&mut self, nodata: Option<T>) {
        self.nodata = nodata;
    }

    /// Cell size (assumes square cells)
    pub fn cell_size(&self) -> f64 {
        self.transform.cell_size()
    }

    /// Geographic bounds (min_x, min_y, max_x, max_y)
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.transform.bounds(self.cols(), self.rows())
    }

    /// Check if a value is no-data
    pub fn is_nodata(&self, value: T) -> bool {
        value.is_nodata(self.nodata)
    }

    // Element-wise transforms

    /// Apply `f` to every cell, keeping geometry.
    ///
    /// No-data cells are passed to `f` as `None`. Rows are processed in
    /// parallel; the result does not depend on scheduling.
    pub fn map<U, F>(&self, f: F) -> Raster<U>
    where
        U: RasterElement,
        F: Fn(Option<T>) -> U + Sync + Send,
    {
        self.try_map(|v| Ok::<U, Infallible>(f(v)))
            .unwrap_or_else(|never| match never {})
    }

    /// Fallible version of [`Raster::map`]; the first error aborts the map.
    pub fn try_map<U, E, F>(&self, f: F) -> std::result::Result<Raster<U>, E>
    where
        U: RasterElement,
        E: Send,
        F: Fn(Option<T>) -> std::result::Result<U, E> + Sync + Send,
    {
        let (rows, cols) = self.shape();
        let nodata = self.nodata;
        let data = &self.data;

        let row_data: Vec<Vec<U>> = (0..rows)
            .into_par_iter()
            .map(|row| {
                (0..cols)
                    .map(|col| {
                        let v = data[(row, col)];
                        f(if v.is_nodata(nodata) { None } else { Some(v) })
                    })
                    .collect::<std::result::Result<Vec<U>, E>>()
            })
            .collect::<std::result::Result<Vec<_>, E>>()?;

        let flat: Vec<U> = row_data.into_iter().flatten().collect();
        let mut output = self.with_data(Array2::from_shape_fn((rows, cols), |(r, c)| {
            flat[r * cols + c]
        }));
        output.nodata = if U::is_float() {
            Some(U::default_nodata())
        } else {
            None
        };
        Ok(output)
    }

    /// Same geometry as `self`, new data (no-data unset)
    fn with_data<U: RasterElement>(&self, data: Array2<U>) -> Raster<U> {
        Raster {
            data,
            transform: self.transform,
            crs: self.crs.clone(),
            nodata: None,
        }
    }

    // Statistics

    /// Basic statistics (min, max, mean, count of valid cells)
    pub fn statistics(&self) -> RasterStatistics<T> {
        let mut min: Option<T> = None;
        let mut max: Option<T> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        for &value in self.data.iter() {
            if self.is_nodata(value) {
                continue;
            }

            if min.map_or(true, |m| value < m) {
                min = Some(value);
            }
            if max.map_or(true, |m| value > m) {
                max = Some(value);
            }

            if let Some(v) = value.to_f64() {
                sum += v;
                count += 1;
            }
        }

        RasterStatistics {
            min,
            max,
            mean: (count > 0).then(|| sum / count as f64),
            valid_count: count,
            nodata_count: self.len() - count,
        }
    }
}

/// Basic statistics for a raster
#[derive(Debug, Clone)]
pub struct RasterStatistics<T> {
    pub min: Option<T>,
    pub max: Option<T>,
    pub mean: Option<f64>,
    pub valid_count: usize,
    pub nodata_count: usize,
}
