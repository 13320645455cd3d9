//! Raster element trait for generic cell values

use num_traits::{NumCast, Zero};
use std::fmt::{Debug, Display};

/// Trait for types that can be stored in a raster cell.
///
/// Classification rasters are usually stored as small unsigned integers while
/// parameter and vegetation-index rasters are floating point; both go through
/// this trait so that the same geometry and resampling code serves them.
pub trait RasterElement:
    Copy + Debug + Display + PartialOrd + PartialEq + NumCast + Zero + Send + Sync + 'static
{
    /// Default no-data value for this type
    fn default_nodata() -> Self;

    /// Check if this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Convert self to f64
    fn to_f64(self) -> Option<f64> {
        NumCast::from(self)
    }

    /// Convert from f64, `None` if the value is not representable
    fn from_f64(value: f64) -> Option<Self> {
        NumCast::from(value)
    }

    /// Interpret the value as an integer class code.
    ///
    /// Returns `None` for non-finite or fractional values. Whole numbers
    /// beyond the `i64` range saturate, so they still read as (unknown)
    /// class codes.
    fn to_class_code(self) -> Option<i64> {
        let v = self.to_f64()?;
        if !v.is_finite() || v.fract() != 0.0 {
            None
        } else if let Some(code) = <i64 as NumCast>::from(self) {
            Some(code)
        } else if v > 0.0 {
            Some(i64::MAX)
        } else {
            Some(i64::MIN)
        }
    }
}

macro_rules! impl_raster_element_int {
    ($($t:ty),*) => {
        $(
            impl RasterElement for $t {
                fn default_nodata() -> Self {
                    <$t>::MAX
                }

                fn is_nodata(&self, nodata: Option<Self>) -> bool {
                    nodata == Some(*self)
                }

                fn is_float() -> bool {
                    false
                }
            }
        )*
    };
}

macro_rules! impl_raster_element_float {
    ($($t:ty),*) => {
        $(
            impl RasterElement for $t {
                fn default_nodata() -> Self {
                    <$t>::NAN
                }

                fn is_nodata(&self, nodata: Option<Self>) -> bool {
                    if self.is_nan() {
                        return true;
                    }
                    match nodata {
                        Some(nd) => (self - nd).abs() < <$t>::EPSILON * 100.0,
                        None => false,
                    }
                }

                fn is_float() -> bool {
                    true
                }
            }
        )*
    };
}

impl_raster_element_int!(i8, i16, i32, i64, u8, u16, u32, u64);
impl_raster_element_float!(f32, f64);
