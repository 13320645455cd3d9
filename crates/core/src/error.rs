//! Error types for PM-JPL

use thiserror::Error;

/// Main error type for PM-JPL operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Index out of bounds: ({row}, {col}) in raster of size ({rows}, {cols})")]
    IndexOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("CRS mismatch: {0} vs {1}")]
    CrsMismatch(String, String),

    #[error("Unsupported data type: {0}")]
    UnsupportedDataType(String),

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// Requested parameter variable is not part of the land-cover table
    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    /// A field cannot be placed on (or resampled to) the requested geometry
    #[error("Geometry mismatch: {0}")]
    GeometryMismatch(String),

    /// Classification value that cannot be read as an integer class code
    #[error("Invalid classification code: {0}")]
    InvalidClassification(String),

    #[error("TIFF error: {0}")]
    Tiff(String),

    #[error("{0}")]
    Other(String),
}

impl From<tiff::TiffError> for Error {
    fn from(e: tiff::TiffError) -> Self {
        Error::Tiff(e.to_string())
    }
}

/// Result type alias for PM-JPL operations
pub type Result<T> = std::result::Result<T, Error>;
