//! Scalar, array or raster values behind one element-wise interface

use crate::error::{Error, Result};
use crate::raster::{Raster, RasterElement, RasterGeometry};
use ndarray::{Array1, ArrayD};
use std::convert::Infallible;

/// A value that is either a single number, a plain n-dimensional array (for
/// point tables) or a georeferenced raster.
///
/// Functions that accept "a scalar or a field" take a `Field<T>` and
/// express their per-element rule once through [`Field::map`] or
/// [`Field::try_map`]; the variant is carried through to the output.
#[derive(Debug, Clone)]
pub enum Field<T: RasterElement> {
    Scalar(T),
    Array(ArrayD<T>),
    Raster(Raster<T>),
}

impl<T: RasterElement> Field<T> {
    /// Geometry of a raster field, `None` for scalars and plain arrays
    pub fn geometry(&self) -> Option<RasterGeometry> {
        match self {
            Field::Raster(r) => Some(r.geometry()),
            _ => None,
        }
    }

    /// Number of elements (1 for a scalar)
    pub fn len(&self) -> usize {
        match self {
            Field::Scalar(_) => 1,
            Field::Array(a) => a.len(),
            Field::Raster(r) => r.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shape of the field; a scalar has an empty shape
    pub fn shape(&self) -> Vec<usize> {
        match self {
            Field::Scalar(_) => Vec::new(),
            Field::Array(a) => a.shape().to_vec(),
            Field::Raster(r) => vec![r.rows(), r.cols()],
        }
    }

    pub fn as_scalar(&self) -> Option<T> {
        match self {
            Field::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_raster(&self) -> Option<&Raster<T>> {
        match self {
            Field::Raster(r) => Some(r),
            _ => None,
        }
    }

    pub fn into_raster(self) -> Option<Raster<T>> {
        match self {
            Field::Raster(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayD<T>> {
        match self {
            Field::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Element-wise map preserving the variant, shape and geometry.
    ///
    /// Raster no-data cells are passed as `None`; scalars and array elements
    /// are always `Some`.
    pub fn map<U, F>(&self, f: F) -> Field<U>
    where
        U: RasterElement,
        F: Fn(Option<T>) -> U + Sync + Send,
    {
        self.try_map(|v| Ok::<U, Infallible>(f(v)))
            .unwrap_or_else(|never| match never {})
    }

    /// Fallible element-wise map
    pub fn try_map<U, E, F>(&self, f: F) -> std::result::Result<Field<U>, E>
    where
        U: RasterElement,
        E: Send,
        F: Fn(Option<T>) -> std::result::Result<U, E> + Sync + Send,
    {
        Ok(match self {
            Field::Scalar(v) => Field::Scalar(f(Some(*v))?),
            Field::Array(a) => {
                let mut out = ArrayD::<U>::zeros(a.raw_dim());
                for (o, &v) in out.iter_mut().zip(a.iter()) {
                    *o = f(Some(v))?;
                }
                Field::Array(out)
            }
            Field::Raster(r) => Field::Raster(r.try_map(f)?),
        })
    }

    /// Place a 2-D plain array on `geometry`, turning it into a raster.
    ///
    /// Fails with [`Error::GeometryMismatch`] if the array is not 2-D with
    /// the geometry's shape. Scalars are broadcast; rasters must already
    /// match the geometry.
    pub fn on_geometry(self, geometry: &RasterGeometry) -> Result<Raster<T>> {
        match self {
            Field::Scalar(v) => Ok(Raster::from_geometry(geometry, v)),
            Field::Array(a) => {
                if a.shape() != &[geometry.rows, geometry.cols][..] {
                    return Err(Error::GeometryMismatch(format!(
                        "array of shape {:?} cannot be placed on a {}x{} grid",
                        a.shape(),
                        geometry.rows,
                        geometry.cols
                    )));
                }
                let grid = a
                    .into_dimensionality::<ndarray::Ix2>()
                    .map_err(|e| Error::GeometryMismatch(e.to_string()))?;
                let mut raster = Raster::from_array(grid);
                raster.set_transform(geometry.transform);
                raster.set_crs(geometry.crs.clone());
                Ok(raster)
            }
            Field::Raster(r) => {
                if !r.geometry().matches(geometry) {
                    return Err(Error::GeometryMismatch(
                        "raster geometry differs from the requested geometry".into(),
                    ));
                }
                Ok(r)
            }
        }
    }
}

impl<T: RasterElement> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Scalar(value)
    }
}

impl<T: RasterElement> From<Raster<T>> for Field<T> {
    fn from(raster: Raster<T>) -> Self {
        Field::Raster(raster)
    }
}

impl<T: RasterElement> From<ArrayD<T>> for Field<T> {
    fn from(array: ArrayD<T>) -> Self {
        Field::Array(array)
    }
}

impl<T: RasterElement> From<Vec<T>> for Field<T> {
    fn from(values: Vec<T>) -> Self {
        Field::Array(Array1::from(values).into_dyn())
    }
}
