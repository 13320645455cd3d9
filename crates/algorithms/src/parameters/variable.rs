//! Physiological variables tabulated per land-cover class

use pmjpl_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parameter of the PM-JPL canopy conductance and boundary-layer model
/// that varies by land-cover class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Variable {
    /// Minimum temperature at which stomata are fully open (°C)
    TminOpen,
    /// Minimum temperature at which stomata are fully closed (°C)
    TminClosed,
    /// Vapor pressure deficit at which stomata are fully open (Pa)
    VpdOpen,
    /// Vapor pressure deficit at which stomata are fully closed (Pa)
    VpdClosed,
    /// Leaf conductance to sensible heat per unit LAI (m s⁻¹)
    GlSh,
    /// Leaf conductance to evaporated water per unit LAI (m s⁻¹)
    GlEWv,
    /// Mean potential stomatal conductance per unit leaf area (m s⁻¹)
    Cl,
    /// Minimum boundary-layer resistance (s m⁻¹)
    RblMin,
    /// Maximum boundary-layer resistance (s m⁻¹)
    RblMax,
}

impl Variable {
    pub const ALL: [Variable; 9] = [
        Variable::TminOpen,
        Variable::TminClosed,
        Variable::VpdOpen,
        Variable::VpdClosed,
        Variable::GlSh,
        Variable::GlEWv,
        Variable::Cl,
        Variable::RblMin,
        Variable::RblMax,
    ];

    /// Canonical variable name
    pub fn name(self) -> &'static str {
        match self {
            Variable::TminOpen => "tmin_open",
            Variable::TminClosed => "tmin_closed",
            Variable::VpdOpen => "vpd_open",
            Variable::VpdClosed => "vpd_closed",
            Variable::GlSh => "gl_sh",
            Variable::GlEWv => "gl_e_wv",
            Variable::Cl => "cl",
            Variable::RblMin => "rbl_min",
            Variable::RblMax => "rbl_max",
        }
    }

    pub fn units(self) -> &'static str {
        match self {
            Variable::TminOpen | Variable::TminClosed => "°C",
            Variable::VpdOpen | Variable::VpdClosed => "Pa",
            Variable::GlSh | Variable::GlEWv | Variable::Cl => "m s-1",
            Variable::RblMin | Variable::RblMax => "s m-1",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variable {
    type Err = Error;

    /// Accepts canonical names case-insensitively, so the tabular column
    /// spellings (`RBL_min`, `VPD_open`, `CL`, `Tmin_closed`) parse too.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tmin_open" => Ok(Variable::TminOpen),
            "tmin_closed" | "tmin_close" => Ok(Variable::TminClosed),
            "vpd_open" => Ok(Variable::VpdOpen),
            "vpd_closed" | "vpd_close" => Ok(Variable::VpdClosed),
            "gl_sh" => Ok(Variable::GlSh),
            "gl_e_wv" => Ok(Variable::GlEWv),
            "cl" => Ok(Variable::Cl),
            "rbl_min" => Ok(Variable::RblMin),
            "rbl_max" => Ok(Variable::RblMax),
            _ => Err(Error::UnknownVariable(s.to_string())),
        }
    }
}
