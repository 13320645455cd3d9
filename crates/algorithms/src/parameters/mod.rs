//! Land-cover conditioned surface parameters
//!
//! - [`LandCoverClass`]: IGBP classes and their integer codes
//! - [`Variable`]: the physiological variables tabulated per class
//! - [`ParameterTable`]: the class to parameter-row table
//! - [`ParameterResolver`]: classification field to parameter field, with
//!   resampling onto a target geometry and one named method per variable

mod accessors;
mod landcover;
mod resolve;
mod table;
mod variable;

pub use landcover::LandCoverClass;
pub use resolve::{NoDataPolicy, ParameterResolver, ResolveParams};
pub use table::{BiomeParameters, ParameterTable};
pub use variable::Variable;
