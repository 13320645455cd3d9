//! # PM-JPL Core
//!
//! Georeferenced raster types and the geometry operations that the PM-JPL
//! surface parameter algorithms are built on.
//!
//! This crate provides:
//! - `Raster<T>`: Generic raster grid type
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `RasterGeometry`: Grid shape, transform and CRS without data
//! - `Field<T>`: Scalar, plain array or raster input/output values
//! - `CRS`: Coordinate Reference System identity
//! - `CrsTransform`: WGS84 ↔ UTM point transforms
//! - Categorical and continuous resampling between geometries
//! - Native GeoTIFF I/O

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::{CrsTransform, CRS};
pub use error::{Error, Result};
pub use raster::{
    resample_categorical, resample_continuous, Field, GeoTransform, Raster, RasterElement,
    RasterGeometry,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::{CrsTransform, CRS};
    pub use crate::error::{Error, Result};
    pub use crate::raster::{
        resample_categorical, resample_continuous, Field, GeoTransform, Raster, RasterElement,
        RasterGeometry,
    };
}
