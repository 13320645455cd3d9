//! Raster I/O
//!
//! GeoTIFF is the only supported format. Reading and writing go through the
//! pure-Rust `tiff` crate, so no GDAL installation is required.

mod geotiff;

pub use geotiff::{
    read_geotiff, read_geotiff_from_buffer, write_geotiff, write_geotiff_to_buffer,
    GeoTiffOptions, SampleType,
};
