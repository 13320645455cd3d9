//! Native GeoTIFF reading/writing
//!
//! Supports single-band, strip or tile organised images with the georeferencing
//! that PM-JPL inputs and outputs need: pixel scale + tiepoint (or a model
//! transformation matrix), an EPSG code in the GeoKey directory and the GDAL
//! no-data tag.

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{GeoTransform, Raster, RasterElement};
use num_traits::{NumCast, Zero};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{self, ColorType};
use tiff::encoder::{TiffEncoder, TiffValue};
use tiff::tags::Tag;
use tracing::debug;

const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;
const MODEL_TRANSFORMATION: u16 = 34264;
const GEO_KEY_DIRECTORY: u16 = 34735;
const GDAL_NODATA: u16 = 42113;

const GT_MODEL_TYPE_KEY: u16 = 1024;
const GT_RASTER_TYPE_KEY: u16 = 1025;
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
const PROJECTED_CS_TYPE_KEY: u16 = 3072;

/// Sample type written to the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SampleType {
    UInt8,
    UInt16,
    Int32,
    #[default]
    Float32,
    Float64,
}

/// Options for writing GeoTIFF files
#[derive(Debug, Clone, Default)]
pub struct GeoTiffOptions {
    pub sample_type: SampleType,
}

/// Read the first band of a GeoTIFF file into a Raster
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file)
}

/// Read a GeoTIFF from an in-memory buffer
pub fn read_geotiff_from_buffer<T: RasterElement>(data: &[u8]) -> Result<Raster<T>> {
    decode_geotiff(Cursor::new(data))
}

fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?;
    let (width, height) = decoder.dimensions()?;
    let (rows, cols) = (height as usize, width as usize);

    // `None` marks samples the element type cannot represent
    macro_rules! cast_all {
        ($buf:expr) => {
            $buf.into_iter().map(num_traits::cast).collect()
        };
    }

    let samples: Vec<Option<T>> = match decoder.read_image()? {
        DecodingResult::U8(buf) => cast_all!(buf),
        DecodingResult::U16(buf) => cast_all!(buf),
        DecodingResult::U32(buf) => cast_all!(buf),
        DecodingResult::U64(buf) => cast_all!(buf),
        DecodingResult::I8(buf) => cast_all!(buf),
        DecodingResult::I16(buf) => cast_all!(buf),
        DecodingResult::I32(buf) => cast_all!(buf),
        DecodingResult::I64(buf) => cast_all!(buf),
        DecodingResult::F32(buf) => cast_all!(buf),
        DecodingResult::F64(buf) => cast_all!(buf),
        #[allow(unreachable_patterns)]
        _ => {
            return Err(Error::UnsupportedDataType(
                "unsupported TIFF sample format".into(),
            ))
        }
    };

    // Multi-band images come back interleaved; only single-band is supported
    if samples.len() != rows * cols {
        return Err(Error::UnsupportedDataType(format!(
            "expected a single band of {}x{} samples, got {}",
            cols,
            rows,
            samples.len()
        )));
    }

    // Unrepresentable samples become no-data, declared even when the file
    // carries no no-data tag
    let file_nodata: Option<T> = read_nodata(&mut decoder);
    let fill = file_nodata.unwrap_or_else(T::default_nodata);
    let failed = samples.iter().filter(|v| v.is_none()).count();
    let nodata = if failed > 0 { Some(fill) } else { file_nodata };
    if failed > 0 {
        debug!(failed, fill = %fill, "samples not representable in the requested type");
    }
    let data: Vec<T> = samples.into_iter().map(|v| v.unwrap_or(fill)).collect();

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_transform(&mut decoder) {
        raster.set_transform(transform);
    }
    raster.set_crs(read_crs(&mut decoder));
    raster.set_nodata(nodata);

    debug!(rows, cols, crs = ?raster.crs(), "decoded GeoTIFF");
    Ok(raster)
}

fn read_transform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE)).ok();
    let tiepoint = decoder.get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TIEPOINT)).ok();

    if let (Some(scale), Some(tie)) = (scale, tiepoint) {
        if scale.len() >= 2 && tie.len() >= 6 {
            // tiepoint: [I, J, K, X, Y, Z]
            let origin_x = tie[3] - tie[0] * scale[0];
            let origin_y = tie[4] + tie[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    // 4x4 row-major model transformation matrix
    let m = decoder
        .get_tag_f64_vec(Tag::from_u16_exhaustive(MODEL_TRANSFORMATION))
        .ok()?;
    (m.len() >= 8).then(|| GeoTransform::from_gdal([m[3], m[0], m[1], m[7], m[4], m[5]]))
}

fn read_crs<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<CRS> {
    let keys = decoder.get_tag_u16_vec(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY)).ok()?;
    // Header: version, revision, minor revision, key count
    let count = *keys.get(3)? as usize;

    keys.get(4..4 + 4 * count)?
        .chunks_exact(4)
        .find(|k| {
            (k[0] == PROJECTED_CS_TYPE_KEY || k[0] == GEOGRAPHIC_TYPE_KEY)
                && k[1] == 0
                && k[3] != 0
                && k[3] != 32767
        })
        .map(|k| CRS::from_epsg(k[3] as u32))
}

fn read_nodata<T: RasterElement, R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<T> {
    let text = decoder
        .get_tag_ascii_string(Tag::from_u16_exhaustive(GDAL_NODATA))
        .ok()?;
    let value: f64 = text.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse().ok()?;
    T::from_f64(value)
}

/// Write a Raster to a GeoTIFF file
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    encode_geotiff(raster, &mut writer, options.unwrap_or_default())?;
    writer.flush()?;
    Ok(())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T: RasterElement>(
    raster: &Raster<T>,
    options: Option<GeoTiffOptions>,
) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), options.unwrap_or_default())?;
    Ok(buf)
}

fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    match options.sample_type {
        SampleType::UInt8 => encode_as::<colortype::Gray8, _, _>(&mut encoder, raster),
        SampleType::UInt16 => encode_as::<colortype::Gray16, _, _>(&mut encoder, raster),
        SampleType::Int32 => encode_as::<colortype::GrayI32, _, _>(&mut encoder, raster),
        SampleType::Float32 => encode_as::<colortype::Gray32Float, _, _>(&mut encoder, raster),
        SampleType::Float64 => encode_as::<colortype::Gray64Float, _, _>(&mut encoder, raster),
    }
}

fn encode_as<C, T, W>(encoder: &mut TiffEncoder<W>, raster: &Raster<T>) -> Result<()>
where
    C: ColorType,
    C::Inner: NumCast + Zero + Copy,
    [C::Inner]: TiffValue,
    T: RasterElement,
    W: Write + Seek,
{
    let (rows, cols) = raster.shape();
    // NaN survives into float samples; integer samples fall back to zero
    let fill: C::Inner = num_traits::cast(f64::NAN).unwrap_or_else(C::Inner::zero);
    let data: Vec<C::Inner> = raster
        .data()
        .iter()
        .map(|&v| num_traits::cast(v).unwrap_or(fill))
        .collect();

    let mut image = encoder.new_image::<C>(cols as u32, rows as u32)?;
    let gt = raster.transform();

    let scale = [gt.pixel_width, gt.pixel_height.abs(), 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_PIXEL_SCALE), &scale[..])?;

    let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(MODEL_TIEPOINT), &tiepoint[..])?;

    let geokeys = geo_keys(raster.crs());
    image
        .encoder()
        .write_tag(Tag::from_u16_exhaustive(GEO_KEY_DIRECTORY), geokeys.as_slice())?;

    if let Some(nodata) = raster.nodata().and_then(|v| v.to_f64()) {
        let text = if nodata.is_nan() {
            "nan".to_string()
        } else {
            nodata.to_string()
        };
        image
            .encoder()
            .write_tag(Tag::from_u16_exhaustive(GDAL_NODATA), text.as_str())?;
    }

    image.write_data(&data)?;
    Ok(())
}

/// GeoKey directory with the model type and, when known, the EPSG code
fn geo_keys(crs: Option<&CRS>) -> Vec<u16> {
    let geographic = crs.is_some_and(|c| c.is_geographic());
    let mut keys = vec![
        GT_MODEL_TYPE_KEY, 0, 1, if geographic { 2 } else { 1 },
        GT_RASTER_TYPE_KEY, 0, 1, 1, // RasterPixelIsArea
    ];

    if let Some(code) = crs.and_then(|c| c.epsg()).and_then(|c| u16::try_from(c).ok()) {
        let key = if geographic {
            GEOGRAPHIC_TYPE_KEY
        } else {
            PROJECTED_CS_TYPE_KEY
        };
        keys.extend_from_slice(&[key, 0, 1, code]);
    }

    let mut directory = vec![1, 1, 0, (keys.len() / 4) as u16];
    directory.extend(keys);
    directory
}
