//! NDVI-based vegetation structure
//!
//! - Fractional vegetation cover (Carlson and Ripley scaling)
//! - Leaf area index through fIPAR and Beer's law

mod conversion;

pub use conversion::{
    fractional_vegetation_cover, fvc_from_ndvi, lai_value, leaf_area_index, LaiParams, KPAR,
    NDVI_SOIL, NDVI_VEGETATION,
};

/// Former name of [`leaf_area_index`]; the same function
pub use conversion::leaf_area_index as lai_from_ndvi;
