//! NDVI to fractional vegetation cover and leaf area index
//!
//! Both conversions are per element, so they accept any [`Field`]: a
//! scalar NDVI, a table column, or a raster. Raster no-data cells come out
//! as NaN and the output raster declares NaN as its no-data value.

use pmjpl_core::Field;

/// NDVI of bare soil
pub const NDVI_SOIL: f64 = 0.04;
/// NDVI of full vegetation cover
pub const NDVI_VEGETATION: f64 = 0.52;
/// Canopy extinction coefficient for PAR
pub const KPAR: f64 = 0.5;
/// fIPAR is NDVI less this offset
const FIPAR_NDVI_OFFSET: f64 = 0.05;

/// Bounds applied in [`leaf_area_index`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaiParams {
    pub min_fipar: f64,
    pub max_fipar: f64,
    pub min_lai: f64,
    pub max_lai: f64,
}

impl Default for LaiParams {
    fn default() -> Self {
        Self {
            min_fipar: 0.0,
            max_fipar: 1.0,
            min_lai: 0.0,
            max_lai: 10.0,
        }
    }
}

/// Fractional vegetation cover, linear in NDVI between soil and full
/// canopy and clipped to [0, 1].
pub fn fractional_vegetation_cover(ndvi: &Field<f64>) -> Field<f64> {
    ndvi.map(|v| v.map_or(f64::NAN, fvc_from_ndvi))
}

pub fn fvc_from_ndvi(ndvi: f64) -> f64 {
    clip((ndvi - NDVI_SOIL) / (NDVI_VEGETATION - NDVI_SOIL), 0.0, 1.0)
}

/// Leaf area index from NDVI.
///
/// fIPAR = NDVI - 0.05 is clipped to the fIPAR bounds; zero fIPAR gives
/// NaN. LAI = -ln(1 - fIPAR) / KPAR, clipped to the LAI bounds.
pub fn leaf_area_index(ndvi: &Field<f64>, params: &LaiParams) -> Field<f64> {
    ndvi.map(|v| v.map_or(f64::NAN, |v| lai_value(v, params)))
}

pub fn lai_value(ndvi: f64, params: &LaiParams) -> f64 {
    let fipar = clip(ndvi - FIPAR_NDVI_OFFSET, params.min_fipar, params.max_fipar);
    if fipar == 0.0 {
        return f64::NAN;
    }
    clip(-(1.0 - fipar).ln() / KPAR, params.min_lai, params.max_lai)
}

/// Clamp without the `lo <= hi` assertion of `f64::clamp`; NaN passes through
fn clip(value: f64, lo: f64, hi: f64) -> f64 {
    if value < lo {
        lo
    } else if value > hi {
        hi
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pmjpl_core::{GeoTransform, Raster};

    #[test]
    fn test_fvc_reference_points() {
        assert_relative_eq!(fvc_from_ndvi(0.04), 0.0);
        assert_relative_eq!(fvc_from_ndvi(0.52), 1.0);
        assert_relative_eq!(fvc_from_ndvi(0.28), 0.5, epsilon = 1e-12);
        assert_relative_eq!(fvc_from_ndvi(-1.0), 0.0);
        assert_relative_eq!(fvc_from_ndvi(1.0), 1.0);
        assert!(fvc_from_ndvi(f64::NAN).is_nan());
    }

    #[test]
    fn test_lai_reference_points() {
        let params = LaiParams::default();
        assert!(lai_value(0.05, &params).is_nan());
        assert!(lai_value(-0.3, &params).is_nan());
        assert_relative_eq!(lai_value(1.0, &params), -(0.05f64).ln() / 0.5, epsilon = 1e-12);
        assert_relative_eq!(lai_value(1.0, &params), 5.991, epsilon = 1e-3);

        let small = lai_value(0.05 + 1e-6, &params);
        assert!(small.is_finite() && small > 0.0);
    }

    #[test]
    fn test_lai_saturates_at_max() {
        let params = LaiParams::default();
        assert_relative_eq!(lai_value(1.2, &params), 10.0);

        let tight = LaiParams {
            max_lai: 3.0,
            ..Default::default()
        };
        assert_relative_eq!(lai_value(1.0, &tight), 3.0);
    }

    #[test]
    fn test_nan_passes_through() {
        assert!(lai_value(f64::NAN, &LaiParams::default()).is_nan());
        assert!(clip(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn test_alias_is_identical() {
        let ndvi: Field<f64> = vec![-0.2, 0.05, 0.051, 0.3, 0.7, 1.0, f64::NAN].into();
        let params = LaiParams::default();
        let a = leaf_area_index(&ndvi, &params);
        let b = crate::vegetation::lai_from_ndvi(&ndvi, &params);
        for (x, y) in a.as_array().unwrap().iter().zip(b.as_array().unwrap()) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[test]
    fn test_raster_nodata_becomes_nan() {
        let ndvi = Raster::from_vec(vec![0.28, -9999.0, 0.52, 0.04], 2, 2)
            .unwrap()
            .with_transform(GeoTransform::new(0.0, 60.0, 30.0, -30.0))
            .with_nodata(-9999.0);

        let fvc = fractional_vegetation_cover(&ndvi.clone().into());
        let fvc = fvc.as_raster().unwrap();
        assert_eq!(fvc.geometry(), ndvi.geometry());
        assert!(fvc.nodata().unwrap().is_nan());
        assert_relative_eq!(fvc.get(0, 0).unwrap(), 0.5, epsilon = 1e-12);
        assert!(fvc.get(0, 1).unwrap().is_nan());
        assert_relative_eq!(fvc.get(1, 0).unwrap(), 1.0);
        assert_relative_eq!(fvc.get(1, 1).unwrap(), 0.0);
    }

    #[test]
    fn test_scalar_field() {
        let fvc = fractional_vegetation_cover(&Field::Scalar(0.28));
        assert_relative_eq!(fvc.as_scalar().unwrap(), 0.5, epsilon = 1e-12);
    }
}
