//! Resampling rasters onto another geometry
//!
//! Two families are provided:
//! - **categorical**: area-majority of class codes, never blends values, so
//!   the output only ever contains codes that exist in the input
//! - **continuous**: area-weighted mean of overlapping cells
//!
//! Both work on north-up grids. Target cells are mapped into the source CRS
//! when the two differ and [`CrsTransform`] supports the pair; any other CRS
//! difference is reported as [`Error::CrsMismatch`].

use crate::crs::CrsTransform;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement, RasterGeometry};
use rayon::prelude::*;
use tracing::debug;

/// Overlaps below this fraction of a source cell are float noise from
/// aligned cell edges.
const MIN_OVERLAP: f64 = 1e-9;

/// Resample a class-code raster by area majority.
///
/// Every target cell takes the code covering the largest share of its
/// footprint. Ties go to the smaller code. Cells with no valid source
/// coverage are set to the source no-data value (or the type default).
pub fn resample_categorical<T: RasterElement>(
    source: &Raster<T>,
    target: &RasterGeometry,
) -> Result<Raster<T>> {
    let to_source = check_resample(source, target)?;
    debug!(
        "categorical resample {}x{} @ {} -> {}x{} @ {}",
        source.rows(),
        source.cols(),
        source.cell_size(),
        target.rows,
        target.cols,
        target.cell_size()
    );

    let nodata = source.nodata().unwrap_or_else(T::default_nodata);

    let data: Vec<T> = (0..target.rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut cells = Vec::new();
            let mut votes: Vec<(T, f64)> = Vec::new();
            let mut row_data = vec![nodata; target.cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                footprint(source, &target.transform, to_source.as_ref(), row, col, &mut cells);
                votes.clear();

                for &(sr, sc, w) in &cells {
                    let Some(code) = source.value_at(sr, sc) else {
                        continue;
                    };
                    match votes.iter_mut().find(|(c, _)| *c == code) {
                        Some((_, total)) => *total += w,
                        None => votes.push((code, w)),
                    }
                }

                if let Some(code) = majority(&votes) {
                    *out = code;
                }
            }
            row_data
        })
        .collect();

    let mut output = Raster::from_vec(data, target.rows, target.cols)?
        .with_transform(target.transform)
        .with_nodata(nodata);
    output.set_crs(target.crs.clone());
    Ok(output)
}

/// Resample a continuous raster by area-weighted mean.
///
/// No-data and NaN source cells are excluded from the weights; target cells
/// with no valid coverage are NaN. The output never leaves the value range of
/// the source cells it overlaps.
pub fn resample_continuous(source: &Raster<f64>, target: &RasterGeometry) -> Result<Raster<f64>> {
    let to_source = check_resample(source, target)?;
    debug!(
        "continuous resample {}x{} @ {} -> {}x{} @ {}",
        source.rows(),
        source.cols(),
        source.cell_size(),
        target.rows,
        target.cols,
        target.cell_size()
    );

    let data: Vec<f64> = (0..target.rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut cells = Vec::new();
            let mut row_data = vec![f64::NAN; target.cols];

            for (col, out) in row_data.iter_mut().enumerate() {
                footprint(source, &target.transform, to_source.as_ref(), row, col, &mut cells);

                let (sum, weight) = cells
                    .iter()
                    .filter_map(|&(sr, sc, w)| source.value_at(sr, sc).map(|v| (v, w)))
                    .fold((0.0, 0.0), |(s, tw), (v, w)| (s + v * w, tw + w));

                if weight > 0.0 {
                    *out = sum / weight;
                }
            }
            row_data
        })
        .collect();

    let mut output = Raster::from_vec(data, target.rows, target.cols)?
        .with_transform(target.transform)
        .with_nodata(f64::NAN);
    output.set_crs(target.crs.clone());
    Ok(output)
}

/// Validate a resample and return the transform from target to source
/// coordinates, `None` when both grids share a frame.
fn check_resample<T: RasterElement>(
    source: &Raster<T>,
    target: &RasterGeometry,
) -> Result<Option<CrsTransform>> {
    let to_source = match (target.crs.as_ref(), source.crs()) {
        (Some(from), Some(to)) if !from.is_equivalent(to) => {
            let transform = CrsTransform::new(from, to)
                .ok_or_else(|| Error::CrsMismatch(to.identifier(), from.identifier()))?;
            Some(transform)
        }
        _ => None,
    };
    for (name, gt) in [("source", source.transform()), ("target", &target.transform)] {
        if !gt.is_north_up() {
            return Err(Error::InvalidParameter {
                name: "transform",
                value: format!("{:?}", gt.to_gdal()),
                reason: format!("{} grid must be north-up without rotation", name),
            });
        }
    }
    Ok(to_source)
}

/// Collect the source cells overlapped by target cell (row, col) together
/// with the overlapped area in units of source cells.
///
/// Across CRSs the footprint is the source-pixel envelope of the four
/// transformed cell corners.
fn footprint<T: RasterElement>(
    source: &Raster<T>,
    target: &GeoTransform,
    to_source: Option<&CrsTransform>,
    row: usize,
    col: usize,
    out: &mut Vec<(usize, usize, f64)>,
) {
    out.clear();

    let gt = source.transform();
    let (mut col_min, mut col_max) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut row_min, mut row_max) = (f64::INFINITY, f64::NEG_INFINITY);
    for (c, r) in [(col, row), (col + 1, row), (col, row + 1), (col + 1, row + 1)] {
        let (x, y) = target.pixel_to_geo_corner(c, r);
        let (x, y) = match to_source {
            Some(t) => t.apply(x, y),
            None => (x, y),
        };
        let (sc, sr) = gt.geo_to_pixel(x, y);
        if !(sc.is_finite() && sr.is_finite()) {
            return;
        }
        col_min = col_min.min(sc);
        col_max = col_max.max(sc);
        row_min = row_min.min(sr);
        row_max = row_max.max(sr);
    }

    let (rows, cols) = (source.rows() as f64, source.cols() as f64);
    let col_min = col_min.max(0.0);
    let col_max = col_max.min(cols);
    let row_min = row_min.max(0.0);
    let row_max = row_max.min(rows);

    if !(col_min < col_max && row_min < row_max) {
        return;
    }

    for sr in (row_min.floor() as usize)..(row_max.ceil() as usize) {
        let wr = row_max.min(sr as f64 + 1.0) - row_min.max(sr as f64);
        if wr <= MIN_OVERLAP {
            continue;
        }
        for sc in (col_min.floor() as usize)..(col_max.ceil() as usize) {
            let wc = col_max.min(sc as f64 + 1.0) - col_min.max(sc as f64);
            if wc > MIN_OVERLAP {
                out.push((sr, sc, wr * wc));
            }
        }
    }
}

/// Code with the largest accumulated weight; ties resolve to the smaller code
fn majority<T: RasterElement>(votes: &[(T, f64)]) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for &(code, weight) in votes {
        best = match best {
            None => Some((code, weight)),
            Some((b, bw)) => {
                let tie = (weight - bw).abs() <= MIN_OVERLAP * bw.max(1.0);
                if (tie && code < b) || (!tie && weight > bw) {
                    Some((code, weight))
                } else {
                    Some((b, bw))
                }
            }
        };
    }
    best.map(|(code, _)| code)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CRS;
    use approx::assert_relative_eq;

    fn grid<T: RasterElement>(values: Vec<T>, rows: usize, cols: usize, cell: f64) -> Raster<T> {
        Raster::from_vec(values, rows, cols)
            .unwrap()
            .with_transform(GeoTransform::new(0.0, rows as f64 * cell, cell, -cell))
            .with_crs(CRS::utm(11, true))
    }

    fn geometry(rows: usize, cols: usize, cell: f64) -> RasterGeometry {
        RasterGeometry::new(
            rows,
            cols,
            GeoTransform::new(0.0, rows as f64 * cell, cell, -cell),
            Some(CRS::utm(11, true)),
        )
    }

    #[test]
    fn test_categorical_downsample_majority() {
        // 4x4 at 10 m -> 2x2 at 20 m
        #[rustfmt::skip]
        let igbp = grid(vec![
            1u8, 1, 10, 10,
            1,   2, 10, 12,
            7,   7, 12, 12,
            7,   9, 12, 10,
        ], 4, 4, 10.0);

        let out = resample_categorical(&igbp, &geometry(2, 2, 20.0)).unwrap();

        assert_eq!(out.shape(), (2, 2));
        assert_eq!(out.get(0, 0).unwrap(), 1);
        assert_eq!(out.get(0, 1).unwrap(), 10);
        assert_eq!(out.get(1, 0).unwrap(), 7);
        assert_eq!(out.get(1, 1).unwrap(), 12);
    }

    #[test]
    fn test_categorical_tie_goes_to_smaller_code() {
        let igbp = grid(vec![12u8, 4, 4, 12], 2, 2, 10.0);
        let out = resample_categorical(&igbp, &geometry(1, 1, 20.0)).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 4);
    }

    #[test]
    fn test_categorical_upsample_is_nearest() {
        let igbp = grid(vec![1u8, 10, 7, 12], 2, 2, 20.0);
        let out = resample_categorical(&igbp, &geometry(4, 4, 10.0)).unwrap();

        assert_eq!(out.get(0, 0).unwrap(), 1);
        assert_eq!(out.get(1, 1).unwrap(), 1);
        assert_eq!(out.get(0, 3).unwrap(), 10);
        assert_eq!(out.get(3, 0).unwrap(), 7);
        assert_eq!(out.get(2, 2).unwrap(), 12);
    }

    #[test]
    fn test_categorical_ignores_nodata() {
        let igbp = grid(vec![255u8, 255, 255, 9], 2, 2, 10.0).with_nodata(255);
        let out = resample_categorical(&igbp, &geometry(1, 1, 20.0)).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 9);

        let empty = grid(vec![255u8; 4], 2, 2, 10.0).with_nodata(255);
        let out = resample_categorical(&empty, &geometry(1, 1, 20.0)).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 255);
        assert_eq!(out.nodata(), Some(255));
    }

    #[test]
    fn test_continuous_downsample_is_area_mean() {
        let values = grid(vec![20.0, 20.0, 65.0, 65.0], 2, 2, 10.0);
        let out = resample_continuous(&values, &geometry(1, 1, 20.0)).unwrap();
        assert_relative_eq!(out.get(0, 0).unwrap(), 42.5, epsilon = 1e-12);
    }

    #[test]
    fn test_continuous_partial_overlap_weights() {
        // 3 source cells of 10 m, one target cell of 15 m over the first 1.5
        let values = grid(vec![10.0, 40.0, 99.0], 1, 3, 10.0);
        let target = RasterGeometry::new(
            1,
            1,
            GeoTransform::new(0.0, 10.0, 15.0, -10.0),
            Some(CRS::utm(11, true)),
        );
        let out = resample_continuous(&values, &target).unwrap();
        // (10 * 1.0 + 40 * 0.5) / 1.5
        assert_relative_eq!(out.get(0, 0).unwrap(), 20.0, epsilon = 1e-9);
    }

    #[test]
    fn test_continuous_outside_source_is_nan() {
        let values = grid(vec![1.0; 4], 2, 2, 10.0);
        let far = RasterGeometry::new(
            1,
            1,
            GeoTransform::new(1000.0, 1000.0, 10.0, -10.0),
            Some(CRS::utm(11, true)),
        );
        let out = resample_continuous(&values, &far).unwrap();
        assert!(out.get(0, 0).unwrap().is_nan());
    }

    /// 10x10 WGS84 grid at 0.01 degrees over lon -117.05..-116.95 and
    /// lat 36.10..36.20: class 10 west of -117.01, class 1 elsewhere.
    fn geographic_igbp() -> Raster<u8> {
        let mut r = Raster::filled(10, 10, 1u8)
            .with_transform(GeoTransform::new(-117.05, 36.2, 0.01, -0.01))
            .with_crs(CRS::wgs84())
            .with_nodata(255);
        for row in 0..10 {
            for col in 0..4 {
                r.set(row, col, 10).unwrap();
            }
        }
        r
    }

    fn utm_target(origin_x: f64) -> RasterGeometry {
        RasterGeometry::new(
            2,
            2,
            GeoTransform::new(origin_x, 4_000_000.0, 500.0, -500.0),
            Some(CRS::utm(11, true)),
        )
    }

    #[test]
    fn test_geographic_source_onto_utm_target() {
        let igbp = geographic_igbp();

        // easting 500000 is the zone 11 central meridian, lon -117
        let east = utm_target(500_000.0);
        let out = resample_categorical(&igbp, &east).unwrap();
        assert_eq!(out.geometry(), east);
        assert!(out.data().iter().all(|&c| c == 1));

        // eastings 496000..497000 lie near lon -117.04
        let west = utm_target(496_000.0);
        let out = resample_categorical(&igbp, &west).unwrap();
        assert!(out.data().iter().all(|&c| c == 10));

        let values = grid(vec![40.0; 4], 2, 2, 0.05)
            .with_transform(GeoTransform::new(-117.05, 36.2, 0.05, -0.05))
            .with_crs(CRS::wgs84());
        let out = resample_continuous(&values, &east).unwrap();
        assert_eq!(out.crs(), Some(&CRS::utm(11, true)));
        assert!(out.data().iter().all(|&v| (v - 40.0).abs() < 1e-12));
    }

    #[test]
    fn test_utm_source_onto_geographic_target() {
        // classes 1 west and 12 east of easting 501000
        #[rustfmt::skip]
        let igbp = grid(vec![
            1u8, 1, 12, 12,
            1,   1, 12, 12,
            1,   1, 12, 12,
            1,   1, 12, 12,
        ], 4, 4, 500.0)
            .with_transform(GeoTransform::new(500_000.0, 4_000_000.0, 500.0, -500.0));

        // lon -116.997..-116.990 is about easting 500270..500900,
        // lon -116.990..-116.983 about 500900..501530
        let target = RasterGeometry::new(
            1,
            2,
            GeoTransform::new(-116.997, 36.143, 0.007, -0.007),
            Some(CRS::wgs84()),
        );
        let out = resample_categorical(&igbp, &target).unwrap();
        assert_eq!(out.get(0, 0).unwrap(), 1);
        assert_eq!(out.get(0, 1).unwrap(), 12);
    }

    #[test]
    fn test_crs_mismatch_is_rejected() {
        let values = grid(vec![1.0; 4], 2, 2, 10.0);
        let mut target = geometry(1, 1, 20.0);
        target.crs = Some(CRS::from_epsg(3857));
        assert!(matches!(
            resample_continuous(&values, &target),
            Err(Error::CrsMismatch(_, _))
        ));

        target.crs = Some(CRS::from_wkt("PROJCS[\"local\"]"));
        assert!(matches!(
            resample_continuous(&values, &target),
            Err(Error::CrsMismatch(_, _))
        ));
    }

    #[test]
    fn test_rotated_grid_is_rejected() {
        let values = grid(vec![1.0; 4], 2, 2, 10.0);
        let mut target = geometry(1, 1, 20.0);
        target.transform.row_rotation = 0.5;
        assert!(matches!(
            resample_continuous(&values, &target),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
