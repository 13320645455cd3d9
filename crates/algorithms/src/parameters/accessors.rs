//! One named resolver method per variable

use crate::parameters::{ParameterResolver, ResolveParams, Variable};
use pmjpl_core::{Field, RasterElement, Result};

macro_rules! named_accessors {
    ($($(#[$doc:meta])* $name:ident => $variable:ident;)*) => {
        impl ParameterResolver {
            $(
                $(#[$doc])*
                pub fn $name<T: RasterElement>(
                    &self,
                    classification: &Field<T>,
                    params: &ResolveParams,
                ) -> Result<Field<f64>> {
                    self.resolve(Variable::$variable, classification, params)
                }
            )*
        }

        /// Variables reachable through a named method
        #[cfg(test)]
        const NAMED: &[Variable] = &[$(Variable::$variable),*];
    };
}

named_accessors! {
    /// Minimum boundary-layer resistance (s m⁻¹)
    minimum_boundary_layer_resistance => RblMin;
    /// Maximum boundary-layer resistance (s m⁻¹)
    maximum_boundary_layer_resistance => RblMax;
    /// Vapor pressure deficit at which stomata are fully open (Pa)
    vpd_open => VpdOpen;
    /// Vapor pressure deficit at which stomata are fully closed (Pa)
    vpd_closed => VpdClosed;
    /// Mean potential stomatal conductance per unit leaf area (m s⁻¹)
    mean_potential_stomatal_conductance => Cl;
    /// Leaf conductance to sensible heat per unit LAI (m s⁻¹)
    leaf_conductance_to_sensible_heat => GlSh;
    /// Leaf conductance to evaporated water per unit LAI (m s⁻¹)
    leaf_conductance_to_evaporated_water => GlEWv;
    /// Minimum temperature at which stomata are fully open (°C)
    tmin_open => TminOpen;
    /// Minimum temperature at which stomata are fully closed (°C)
    tmin_closed => TminClosed;
}
