//! IGBP land-cover parameter table
//!
//! Values follow the MOD16 biome property lookup table. Both leaf
//! conductances share one column in that table, so `gl_sh` and `gl_e_wv`
//! are equal for every class.

use crate::parameters::{LandCoverClass, Variable};
use pmjpl_core::Result;
use serde::{Deserialize, Serialize};

/// One row of the parameter table
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BiomeParameters {
    pub tmin_open: f64,
    pub tmin_closed: f64,
    pub vpd_open: f64,
    pub vpd_closed: f64,
    pub gl_sh: f64,
    pub gl_e_wv: f64,
    pub cl: f64,
    pub rbl_min: f64,
    pub rbl_max: f64,
}

impl BiomeParameters {
    #[allow(clippy::too_many_arguments)]
    const fn new(
        tmin_open: f64,
        tmin_closed: f64,
        vpd_open: f64,
        vpd_closed: f64,
        gl: f64,
        cl: f64,
        rbl_min: f64,
        rbl_max: f64,
    ) -> Self {
        Self {
            tmin_open,
            tmin_closed,
            vpd_open,
            vpd_closed,
            gl_sh: gl,
            gl_e_wv: gl,
            cl,
            rbl_min,
            rbl_max,
        }
    }

    pub fn get(&self, variable: Variable) -> f64 {
        match variable {
            Variable::TminOpen => self.tmin_open,
            Variable::TminClosed => self.tmin_closed,
            Variable::VpdOpen => self.vpd_open,
            Variable::VpdClosed => self.vpd_closed,
            Variable::GlSh => self.gl_sh,
            Variable::GlEWv => self.gl_e_wv,
            Variable::Cl => self.cl,
            Variable::RblMin => self.rbl_min,
            Variable::RblMax => self.rbl_max,
        }
    }

    /// All variables of this row in [`Variable::ALL`] order
    pub fn values(&self) -> [(Variable, f64); 9] {
        Variable::ALL.map(|v| (v, self.get(v)))
    }
}

const FOREST_ENF: BiomeParameters = BiomeParameters::new(8.31, -8.0, 650.0, 3000.0, 0.04, 0.0024, 65.0, 95.0);
const FOREST_EBF: BiomeParameters = BiomeParameters::new(9.09, -8.0, 1000.0, 4000.0, 0.01, 0.0024, 70.0, 100.0);
const FOREST_DNF: BiomeParameters = BiomeParameters::new(10.44, -8.0, 650.0, 3500.0, 0.04, 0.0024, 65.0, 95.0);
const FOREST_DBF: BiomeParameters = BiomeParameters::new(9.94, -6.0, 650.0, 2900.0, 0.01, 0.0024, 65.0, 100.0);
const FOREST_MIXED: BiomeParameters = BiomeParameters::new(9.50, -7.0, 650.0, 2900.0, 0.04, 0.0024, 65.0, 95.0);
const SHRUB_CLOSED: BiomeParameters = BiomeParameters::new(8.61, -8.0, 650.0, 4300.0, 0.04, 0.0055, 20.0, 55.0);
const SHRUB_OPEN: BiomeParameters = BiomeParameters::new(8.80, -8.0, 650.0, 4400.0, 0.04, 0.0055, 20.0, 55.0);
const SAVANNA_WOODY: BiomeParameters = BiomeParameters::new(11.39, -8.0, 650.0, 3500.0, 0.08, 0.0055, 25.0, 45.0);
const SAVANNA: BiomeParameters = BiomeParameters::new(11.39, -8.0, 650.0, 3600.0, 0.08, 0.0055, 25.0, 45.0);
const GRASS: BiomeParameters = BiomeParameters::new(12.02, -8.0, 650.0, 4200.0, 0.02, 0.0055, 20.0, 50.0);
const CROP: BiomeParameters = BiomeParameters::new(12.02, -8.0, 650.0, 4500.0, 0.02, 0.0055, 20.0, 50.0);

/// Rows indexed by IGBP code. Non-vegetated and unclassified surfaces
/// reuse the nearest vegetated biome so every code yields a finite value.
const IGBP_ROWS: [BiomeParameters; LandCoverClass::COUNT] = [
    GRASS,         // 0 unclassified
    FOREST_ENF,    // 1
    FOREST_EBF,    // 2
    FOREST_DNF,    // 3
    FOREST_DBF,    // 4
    FOREST_MIXED,  // 5
    SHRUB_CLOSED,  // 6
    SHRUB_OPEN,    // 7
    SAVANNA_WOODY, // 8
    SAVANNA,       // 9
    GRASS,         // 10
    GRASS,         // 11 wetlands
    CROP,          // 12
    CROP,          // 13 urban
    CROP,          // 14
    SHRUB_OPEN,    // 15 snow and ice
    SHRUB_OPEN,    // 16 barren
    GRASS,         // 17 water
];

/// Immutable lookup from land-cover class to parameter row.
///
/// Built once and shared (typically behind an `Arc`) by every resolver.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterTable {
    rows: [BiomeParameters; LandCoverClass::COUNT],
}

impl ParameterTable {
    /// The IGBP biome property table
    pub fn igbp() -> Self {
        Self { rows: IGBP_ROWS }
    }

    /// Custom table, one row per class in [`LandCoverClass::ALL`] order
    pub fn from_rows(rows: [BiomeParameters; LandCoverClass::COUNT]) -> Self {
        Self { rows }
    }

    pub fn row(&self, class: LandCoverClass) -> &BiomeParameters {
        &self.rows[class.index()]
    }

    /// Row used for unclassified and unknown codes
    pub fn fallback(&self) -> &BiomeParameters {
        self.row(LandCoverClass::Unclassified)
    }

    /// Value of `variable` for an integer class code.
    ///
    /// Codes outside the IGBP range resolve to the fallback row.
    pub fn lookup(&self, code: i64, variable: Variable) -> f64 {
        self.row(LandCoverClass::from_code(code)).get(variable)
    }

    /// Like [`ParameterTable::lookup`] with the variable given by name
    pub fn lookup_by_name(&self, code: i64, name: &str) -> Result<f64> {
        Ok(self.lookup(code, name.parse()?))
    }

    pub fn values(&self, class: LandCoverClass) -> [(Variable, f64); 9] {
        self.row(class).values()
    }

    /// Smallest and largest value of `variable` over all rows
    pub fn range(&self, variable: Variable) -> (f64, f64) {
        self.rows
            .iter()
            .map(|row| row.get(variable))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            })
    }
}

impl Default for ParameterTable {
    fn default() -> Self {
        Self::igbp()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pmjpl_core::Error;

    #[test]
    fn test_every_value_is_finite() {
        let table = ParameterTable::igbp();
        for class in LandCoverClass::ALL {
            for (variable, value) in table.values(class) {
                assert!(value.is_finite(), "{} {} = {}", class, variable, value);
            }
        }
    }

    #[test]
    fn test_physical_ordering_per_row() {
        let table = ParameterTable::igbp();
        for class in LandCoverClass::ALL {
            let row = table.row(class);
            assert!(row.rbl_min <= row.rbl_max, "{}", class);
            assert!(row.vpd_open <= row.vpd_closed, "{}", class);
            assert!(row.tmin_closed <= row.tmin_open, "{}", class);
            assert!(row.cl > 0.0 && row.gl_sh > 0.0 && row.gl_e_wv > 0.0);
        }
    }

    #[test]
    fn test_known_values() {
        let table = ParameterTable::igbp();
        assert_relative_eq!(table.lookup(1, Variable::TminOpen), 8.31);
        assert_relative_eq!(table.lookup(2, Variable::VpdOpen), 1000.0);
        assert_relative_eq!(table.lookup(4, Variable::TminClosed), -6.0);
        assert_relative_eq!(table.lookup(9, Variable::GlSh), 0.08);
        assert_relative_eq!(table.lookup(12, Variable::VpdClosed), 4500.0);
        assert_relative_eq!(table.lookup(6, Variable::Cl), 0.0055);
        assert_relative_eq!(table.lookup(3, Variable::Cl), 0.0024);
        assert_relative_eq!(table.lookup(2, Variable::RblMax), 100.0);
    }

    #[test]
    fn test_unknown_codes_use_fallback() {
        let table = ParameterTable::igbp();
        let fallback = table.fallback().get(Variable::RblMin);
        for code in [0, 18, 254, 255, -3] {
            assert_eq!(table.lookup(code, Variable::RblMin), fallback);
        }
    }

    #[test]
    fn test_lookup_by_name() {
        let table = ParameterTable::igbp();
        assert_relative_eq!(table.lookup_by_name(1, "RBL_min").unwrap(), 65.0);
        assert!(matches!(
            table.lookup_by_name(1, "nope"),
            Err(Error::UnknownVariable(_))
        ));
    }

    #[test]
    fn test_range() {
        let (lo, hi) = ParameterTable::igbp().range(Variable::RblMax);
        assert_relative_eq!(lo, 45.0);
        assert_relative_eq!(hi, 100.0);
    }
}
