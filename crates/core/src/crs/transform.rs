//! WGS84 ↔ UTM point transforms (Snyder 1987, USGS Prof. Paper 1395).
//!
//! Covers EPSG:4326 and EPSG 326xx / 327xx, the frames land-cover products
//! and satellite grids are usually delivered in. Pure Rust, no libproj.

use crate::crs::CRS;

const A: f64 = 6_378_137.0; // semi-major axis (m)
const F: f64 = 1.0 / 298.257_223_563;
const E2: f64 = 2.0 * F - F * F;
const E_PRIME2: f64 = E2 / (1.0 - E2);
const K0: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;
const FALSE_NORTHING_SOUTH: f64 = 10_000_000.0;

/// Parse an EPSG code into UTM zone info: `Some((zone, is_north))`.
///
/// - EPSG 326xx → zone xx, northern hemisphere
/// - EPSG 327xx → zone xx, southern hemisphere
pub fn parse_utm_epsg(epsg: u32) -> Option<(u32, bool)> {
    if (32601..=32660).contains(&epsg) {
        Some((epsg - 32600, true))
    } else if (32701..=32760).contains(&epsg) {
        Some((epsg - 32700, false))
    } else {
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Frame {
    Geographic,
    Utm { zone: u32, north: bool },
}

impl Frame {
    fn of(crs: &CRS) -> Option<Self> {
        let epsg = crs.epsg()?;
        if epsg == 4326 {
            return Some(Frame::Geographic);
        }
        parse_utm_epsg(epsg).map(|(zone, north)| Frame::Utm { zone, north })
    }
}

/// Point transform between two supported CRSs.
///
/// UTM to UTM goes through geographic coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrsTransform {
    from: Frame,
    to: Frame,
}

impl CrsTransform {
    /// Transform from `from` to `to`, `None` if either CRS is unsupported
    pub fn new(from: &CRS, to: &CRS) -> Option<Self> {
        Some(Self {
            from: Frame::of(from)?,
            to: Frame::of(to)?,
        })
    }

    /// Map a point. Geographic coordinates are (longitude, latitude) in
    /// degrees, UTM coordinates (easting, northing) in metres.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        if self.from == self.to {
            return (x, y);
        }
        let (lon, lat) = match self.from {
            Frame::Geographic => (x, y),
            Frame::Utm { zone, north } => utm_to_wgs84(x, y, zone, north),
        };
        match self.to {
            Frame::Geographic => (lon, lat),
            Frame::Utm { zone, north } => wgs84_to_utm(lon, lat, zone, north),
        }
    }
}

fn central_meridian(zone: u32) -> f64 {
    ((zone as f64 - 1.0) * 6.0 - 180.0 + 3.0).to_radians()
}

/// WGS84 (longitude, latitude) in degrees to UTM (easting, northing) in
/// metres. Snyder eqs. 8-9 and 8-10.
fn wgs84_to_utm(lon_deg: f64, lat_deg: f64, zone: u32, north: bool) -> (f64, f64) {
    let lat = lat_deg.to_radians();
    let lon = lon_deg.to_radians();

    let sin_lat = lat.sin();
    let cos_lat = lat.cos();
    let tan_lat = lat.tan();

    let n = A / (1.0 - E2 * sin_lat * sin_lat).sqrt();
    let t = tan_lat * tan_lat;
    let c = E_PRIME2 * cos_lat * cos_lat;
    let a = cos_lat * (lon - central_meridian(zone));
    let m = meridional_arc(lat);

    let a2 = a * a;
    let a4 = a2 * a2;
    let a6 = a4 * a2;

    let easting = K0
        * n
        * (a + (1.0 - t + c) * a2 * a / 6.0
            + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * E_PRIME2) * a4 * a / 120.0)
        + FALSE_EASTING;

    let northing = K0
        * (m + n
            * tan_lat
            * (a2 / 2.0
                + (5.0 - t + 9.0 * c + 4.0 * c * c) * a4 / 24.0
                + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * E_PRIME2) * a6 / 720.0));

    if north {
        (easting, northing)
    } else {
        (easting, northing + FALSE_NORTHING_SOUTH)
    }
}

/// UTM (easting, northing) in metres to WGS84 (longitude, latitude) in
/// degrees. Snyder eqs. 8-17 to 8-25.
fn utm_to_wgs84(easting: f64, northing: f64, zone: u32, north: bool) -> (f64, f64) {
    let x = easting - FALSE_EASTING;
    let y = if north {
        northing
    } else {
        northing - FALSE_NORTHING_SOUTH
    };

    let e4 = E2 * E2;
    let e6 = e4 * E2;
    let mu = y / K0 / (A * (1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));

    let root = (1.0 - E2).sqrt();
    let e1 = (1.0 - root) / (1.0 + root);
    let e1_2 = e1 * e1;
    let e1_3 = e1_2 * e1;
    let e1_4 = e1_3 * e1;

    // footpoint latitude
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1_3 / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1_2 / 16.0 - 55.0 * e1_4 / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1_3 / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1_4 / 512.0) * (8.0 * mu).sin();

    let sin_phi = phi1.sin();
    let cos_phi = phi1.cos();
    let tan_phi = phi1.tan();

    let c1 = E_PRIME2 * cos_phi * cos_phi;
    let t1 = tan_phi * tan_phi;
    let w = 1.0 - E2 * sin_phi * sin_phi;
    let n1 = A / w.sqrt();
    let r1 = A * (1.0 - E2) / (w * w.sqrt());
    let d = x / (n1 * K0);

    let d2 = d * d;
    let d4 = d2 * d2;
    let d6 = d4 * d2;

    let lat = phi1
        - (n1 * tan_phi / r1)
            * (d2 / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * E_PRIME2) * d4 / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                    - 252.0 * E_PRIME2
                    - 3.0 * c1 * c1)
                    * d6
                    / 720.0);

    let lon = central_meridian(zone)
        + (d - (1.0 + 2.0 * t1 + c1) * d2 * d / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * E_PRIME2 + 24.0 * t1 * t1)
                * d4
                * d
                / 120.0)
            / cos_phi;

    (lon.to_degrees(), lat.to_degrees())
}

/// Meridional arc from the equator to `lat` (radians). Snyder eq. 3-21.
fn meridional_arc(lat: f64) -> f64 {
    let e4 = E2 * E2;
    let e6 = e4 * E2;

    A * ((1.0 - E2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat
        - (3.0 * E2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat).sin()
        + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat).sin()
        - (35.0 * e6 / 3072.0) * (6.0 * lat).sin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_parse_utm_epsg() {
        assert_eq!(parse_utm_epsg(32611), Some((11, true)));
        assert_eq!(parse_utm_epsg(32760), Some((60, false)));
        assert_eq!(parse_utm_epsg(32600), None);
        assert_eq!(parse_utm_epsg(32661), None);
        assert_eq!(parse_utm_epsg(3857), None);
    }

    #[test]
    fn test_supported_pairs() {
        assert!(CrsTransform::new(&CRS::wgs84(), &CRS::utm(11, true)).is_some());
        assert!(CrsTransform::new(&CRS::utm(21, false), &CRS::utm(22, false)).is_some());
        assert!(CrsTransform::new(&CRS::from_epsg(3857), &CRS::wgs84()).is_none());
        assert!(CrsTransform::new(&CRS::wgs84(), &CRS::from_wkt("PROJCS[...]")).is_none());
    }

    // Reference values from PROJ: Madrid in UTM 30N, Buenos Aires in UTM 21S
    #[test]
    fn test_forward_reference_points() {
        let t = CrsTransform::new(&CRS::wgs84(), &CRS::utm(30, true)).unwrap();
        let (e, n) = t.apply(-3.7037, 40.4168);
        assert_abs_diff_eq!(e, 440_298.94, epsilon = 1.0);
        assert_abs_diff_eq!(n, 4_474_257.31, epsilon = 1.0);

        let t = CrsTransform::new(&CRS::wgs84(), &CRS::utm(21, false)).unwrap();
        let (e, n) = t.apply(-58.3816, -34.6037);
        assert_abs_diff_eq!(e, 373_317.50, epsilon = 1.0);
        assert_abs_diff_eq!(n, 6_170_036.17, epsilon = 1.0);
    }

    #[test]
    fn test_inverse_reference_points() {
        let t = CrsTransform::new(&CRS::utm(30, true), &CRS::wgs84()).unwrap();
        let (lon, lat) = t.apply(440_298.94, 4_474_257.31);
        assert_abs_diff_eq!(lon, -3.7037, epsilon = 1e-5);
        assert_abs_diff_eq!(lat, 40.4168, epsilon = 1e-5);

        // the central meridian maps to itself
        let t = CrsTransform::new(&CRS::utm(11, true), &CRS::wgs84()).unwrap();
        let (lon, _) = t.apply(500_000.0, 4_000_000.0);
        assert_abs_diff_eq!(lon, -117.0, epsilon = 1e-9);
    }

    #[test]
    fn test_round_trip() {
        let forward = CrsTransform::new(&CRS::wgs84(), &CRS::utm(11, true)).unwrap();
        let back = CrsTransform::new(&CRS::utm(11, true), &CRS::wgs84()).unwrap();
        for (lon, lat) in [(-117.0, 36.14), (-119.5, 10.0), (-114.2, 60.0)] {
            let (e, n) = forward.apply(lon, lat);
            let (lon2, lat2) = back.apply(e, n);
            assert_abs_diff_eq!(lon2, lon, epsilon = 1e-7);
            assert_abs_diff_eq!(lat2, lat, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_utm_to_utm_goes_through_geographic() {
        let t = CrsTransform::new(&CRS::utm(11, true), &CRS::utm(12, true)).unwrap();
        let (e, n) = t.apply(500_000.0, 4_000_000.0);
        let geo = CrsTransform::new(&CRS::utm(12, true), &CRS::wgs84()).unwrap();
        let (lon, lat) = geo.apply(e, n);
        assert_abs_diff_eq!(lon, -117.0, epsilon = 1e-5);
        assert_abs_diff_eq!(lat, 36.144_718, epsilon = 1e-5);

        let same = CrsTransform::new(&CRS::utm(11, true), &CRS::from_epsg(32611)).unwrap();
        assert_eq!(same.apply(1.0, 2.0), (1.0, 2.0));
    }
}
