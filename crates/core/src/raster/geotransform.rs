//! Affine geotransformation for rasters

use serde::{Deserialize, Serialize};

/// Affine transformation coefficients for georeferencing rasters.
///
/// Converts between pixel coordinates (col, row) and map coordinates (x, y):
/// ```text
/// x = origin_x + col * pixel_width + row * row_rotation
/// y = origin_y + col * col_rotation + row * pixel_height
/// ```
///
/// For north-up images, `row_rotation` and `col_rotation` are 0 and
/// `pixel_height` is negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoTransform {
    /// X coordinate of the upper-left corner
    pub origin_x: f64,
    /// Y coordinate of the upper-left corner
    pub origin_y: f64,
    /// Pixel width (cell size in X direction)
    pub pixel_width: f64,
    /// Pixel height (cell size in Y direction, usually negative)
    pub pixel_height: f64,
    /// Rotation about X axis (usually 0)
    pub row_rotation: f64,
    /// Rotation about Y axis (usually 0)
    pub col_rotation: f64,
}

/// Relative tolerance used when comparing transforms of two grids.
const TRANSFORM_TOLERANCE: f64 = 1e-9;

impl GeoTransform {
    /// Create a new GeoTransform with no rotation (north-up image)
    pub fn new(origin_x: f64, origin_y: f64, pixel_width: f64, pixel_height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            pixel_width,
            pixel_height,
            row_rotation: 0.0,
            col_rotation: 0.0,
        }
    }

    /// Create from GDAL-style array [origin_x, pixel_width, row_rotation, origin_y, col_rotation, pixel_height]
    pub fn from_gdal(coeffs: [f64; 6]) -> Self {
        Self {
            origin_x: coeffs[0],
            pixel_width: coeffs[1],
            row_rotation: coeffs[2],
            origin_y: coeffs[3],
            col_rotation: coeffs[4],
            pixel_height: coeffs[5],
        }
    }

    /// Convert to GDAL-style array
    pub fn to_gdal(&self) -> [f64; 6] {
        [
            self.origin_x,
            self.pixel_width,
            self.row_rotation,
            self.origin_y,
            self.col_rotation,
            self.pixel_height,
        ]
    }

    /// Map coordinates of the pixel center
    pub fn pixel_to_geo(&self, col: usize, row: usize) -> (f64, f64) {
        self.fractional_to_geo(col as f64 + 0.5, row as f64 + 0.5)
    }

    /// Map coordinates of the pixel's top-left corner
    pub fn pixel_to_geo_corner(&self, col: usize, row: usize) -> (f64, f64) {
        self.fractional_to_geo(col as f64, row as f64)
    }

    fn fractional_to_geo(&self, col: f64, row: f64) -> (f64, f64) {
        let x = self.origin_x + col * self.pixel_width + row * self.row_rotation;
        let y = self.origin_y + col * self.col_rotation + row * self.pixel_height;
        (x, y)
    }

    /// Convert map coordinates to fractional pixel coordinates (col, row).
    ///
    /// Use `.floor()` to get integer indices. Degenerate transforms yield NaN.
    pub fn geo_to_pixel(&self, x: f64, y: f64) -> (f64, f64) {
        let det = self.pixel_width * self.pixel_height - self.row_rotation * self.col_rotation;

        if det.abs() < 1e-12 {
            return (f64::NAN, f64::NAN);
        }

        let dx = x - self.origin_x;
        let dy = y - self.origin_y;

        let col = (self.pixel_height * dx - self.row_rotation * dy) / det;
        let row = (-self.col_rotation * dx + self.pixel_width * dy) / det;

        (col, row)
    }

    /// Cell size (assumes square pixels and no rotation)
    pub fn cell_size(&self) -> f64 {
        self.pixel_width.abs()
    }

    /// Check if this is a north-up image (no rotation)
    pub fn is_north_up(&self) -> bool {
        self.row_rotation.abs() < 1e-10
            && self.col_rotation.abs() < 1e-10
            && self.pixel_height < 0.0
    }

    /// Same origin, square cells of the given size (north-up)
    pub fn with_cell_size(&self, cell_size: f64) -> Self {
        Self::new(self.origin_x, self.origin_y, cell_size, -cell_size)
    }

    /// Bounding box (min_x, min_y, max_x, max_y) for a grid of `width` x `height` cells
    pub fn bounds(&self, width: usize, height: usize) -> (f64, f64, f64, f64) {
        let corners = [
            self.pixel_to_geo_corner(0, 0),
            self.pixel_to_geo_corner(width, 0),
            self.pixel_to_geo_corner(0, height),
            self.pixel_to_geo_corner(width, height),
        ];

        corners.iter().fold(
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN),
            |(min_x, min_y, max_x, max_y), &(x, y)| {
                (min_x.min(x), min_y.min(y), max_x.max(x), max_y.max(y))
            },
        )
    }

    /// Whether two transforms describe the same grid lattice.
    ///
    /// Comparison is relative to the cell size so that values read back from
    /// files with float rounding still match.
    pub fn approx_eq(&self, other: &GeoTransform) -> bool {
        let scale = self.cell_size().max(other.cell_size()).max(1e-12);
        let close = |a: f64, b: f64| (a - b).abs() <= TRANSFORM_TOLERANCE * scale.max(a.abs());

        self.to_gdal()
            .iter()
            .zip(other.to_gdal().iter())
            .all(|(&a, &b)| close(a, b))
    }
}

impl Default for GeoTransform {
    fn default() -> Self {
        Self::new(0.0, 0.0, 1.0, -1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_pixel_center_to_pixel() {
        let gt = GeoTransform::new(500_000.0, 4_200_000.0, 70.0, -70.0);

        let (x, y) = gt.pixel_to_geo(3, 7);
        assert_relative_eq!(x, 500_245.0, epsilon = 1e-9);
        assert_relative_eq!(y, 4_199_475.0, epsilon = 1e-9);

        let (col, row) = gt.geo_to_pixel(x, y);
        assert_relative_eq!(col, 3.5, epsilon = 1e-9);
        assert_relative_eq!(row, 7.5, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds() {
        let gt = GeoTransform::new(0.0, 100.0, 10.0, -10.0);
        let (min_x, min_y, max_x, max_y) = gt.bounds(5, 4);

        assert_relative_eq!(min_x, 0.0);
        assert_relative_eq!(min_y, 60.0);
        assert_relative_eq!(max_x, 50.0);
        assert_relative_eq!(max_y, 100.0);
    }

    #[test]
    fn test_degenerate_transform() {
        let gt = GeoTransform::new(0.0, 0.0, 0.0, 0.0);
        let (col, row) = gt.geo_to_pixel(1.0, 1.0);
        assert!(col.is_nan() && row.is_nan());
    }

    #[test]
    fn test_approx_eq_tolerates_rounding() {
        let a = GeoTransform::new(399_960.0, 4_000_020.0, 30.0, -30.0);
        let b = GeoTransform::new(399_960.000_000_1, 4_000_020.0, 30.0, -30.0);
        let c = GeoTransform::new(399_990.0, 4_000_020.0, 30.0, -30.0);
        assert!(a.approx_eq(&b));
        assert!(!a.approx_eq(&c));
    }

    #[test]
    fn test_with_cell_size() {
        let gt = GeoTransform::new(10.0, 20.0, 30.0, -30.0).with_cell_size(500.0);
        assert_eq!(gt, GeoTransform::new(10.0, 20.0, 500.0, -500.0));
        assert!(gt.is_north_up());
    }
}
