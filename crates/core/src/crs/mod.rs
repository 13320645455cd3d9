//! Coordinate Reference System identity and point transforms
//!
//! Grids are compared by identity. Between WGS84 geographic and WGS84 UTM
//! zones, [`CrsTransform`] maps points so that resampling can cross them.

mod transform;

pub use transform::{parse_utm_epsg, CrsTransform};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Coordinate Reference System representation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CRS {
    /// EPSG code if known
    epsg: Option<u32>,
    /// WKT representation
    wkt: Option<String>,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: Some(code),
            wkt: None,
        }
    }

    /// Create a CRS from a WKT string
    pub fn from_wkt(wkt: impl Into<String>) -> Self {
        Self {
            epsg: None,
            wkt: Some(wkt.into()),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// UTM zone on the WGS84 datum (EPSG 326xx north, 327xx south)
    pub fn utm(zone: u32, north: bool) -> Self {
        let base = if north { 32600 } else { 32700 };
        Self::from_epsg(base + zone)
    }

    pub fn epsg(&self) -> Option<u32> {
        self.epsg
    }

    pub fn wkt(&self) -> Option<&str> {
        self.wkt.as_deref()
    }

    /// UTM zone and hemisphere for EPSG 326xx / 327xx
    pub fn utm_zone(&self) -> Option<(u32, bool)> {
        self.epsg.and_then(parse_utm_epsg)
    }

    /// Whether the CRS is geographic (degrees) rather than projected.
    ///
    /// Only EPSG:4326 is recognised; WKT-only definitions are assumed projected.
    pub fn is_geographic(&self) -> bool {
        self.epsg == Some(4326)
    }

    /// Check if two CRS describe the same spatial reference
    pub fn is_equivalent(&self, other: &CRS) -> bool {
        if let (Some(a), Some(b)) = (self.epsg, other.epsg) {
            return a == b;
        }
        if let (Some(a), Some(b)) = (&self.wkt, &other.wkt) {
            return a.trim() == b.trim();
        }
        false
    }

    /// Short identifier (`EPSG:xxxx` or truncated WKT)
    pub fn identifier(&self) -> String {
        if let Some(code) = self.epsg {
            return format!("EPSG:{}", code);
        }
        if let Some(wkt) = &self.wkt {
            let end = wkt
                .char_indices()
                .nth(50)
                .map(|(i, _)| i)
                .unwrap_or(wkt.len());
            return format!("WKT:{}", &wkt[..end]);
        }
        "Unknown".to_string()
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

/// Check two optional CRS for compatibility.
///
/// A missing CRS on either side is treated as compatible (ungeoreferenced
/// grids are assumed to share the caller's frame).
pub fn compatible(a: Option<&CRS>, b: Option<&CRS>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_equivalent(b),
        _ => true,
    }
}
