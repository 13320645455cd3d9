//! Raster data structures, geometry and resampling

mod element;
mod field;
mod geometry;
mod geotransform;
mod grid;
mod resample;

pub use element::RasterElement;
pub use field::Field;
pub use geometry::RasterGeometry;
pub use geotransform::GeoTransform;
pub use grid::{Raster, RasterStatistics};
pub use resample::{resample_categorical, resample_continuous};
