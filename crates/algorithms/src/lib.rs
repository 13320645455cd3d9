//! # PM-JPL Algorithms
//!
//! Surface parameters for the PM-JPL evapotranspiration model.
//!
//! ## Available Algorithm Categories
//!
//! - **parameters**: IGBP parameter table, classification to parameter
//!   field resolution, one named accessor per variable
//! - **vegetation**: NDVI to fractional vegetation cover and leaf area index

pub mod parameters;
pub mod vegetation;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::parameters::{
        BiomeParameters, LandCoverClass, NoDataPolicy, ParameterResolver, ParameterTable,
        ResolveParams, Variable,
    };
    pub use crate::vegetation::{
        fractional_vegetation_cover, lai_from_ndvi, leaf_area_index, LaiParams,
    };
    pub use pmjpl_core::prelude::*;
}
