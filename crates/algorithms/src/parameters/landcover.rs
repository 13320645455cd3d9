//! IGBP land-cover classes

use serde::{Deserialize, Serialize};
use std::fmt;

/// International Geosphere-Biosphere Programme land-cover class.
///
/// Discriminants are the IGBP integer codes. Any code outside 1..=17
/// (including the MODIS fill values 0, 254 and 255) maps to
/// [`LandCoverClass::Unclassified`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum LandCoverClass {
    Unclassified = 0,
    EvergreenNeedleleafForest = 1,
    EvergreenBroadleafForest = 2,
    DeciduousNeedleleafForest = 3,
    DeciduousBroadleafForest = 4,
    MixedForest = 5,
    ClosedShrublands = 6,
    OpenShrublands = 7,
    WoodySavannas = 8,
    Savannas = 9,
    Grasslands = 10,
    PermanentWetlands = 11,
    Croplands = 12,
    UrbanAndBuiltUp = 13,
    CroplandNaturalMosaic = 14,
    SnowAndIce = 15,
    Barren = 16,
    WaterBodies = 17,
}

impl LandCoverClass {
    /// Number of table rows (17 IGBP classes plus unclassified)
    pub const COUNT: usize = 18;

    pub const ALL: [LandCoverClass; Self::COUNT] = [
        LandCoverClass::Unclassified,
        LandCoverClass::EvergreenNeedleleafForest,
        LandCoverClass::EvergreenBroadleafForest,
        LandCoverClass::DeciduousNeedleleafForest,
        LandCoverClass::DeciduousBroadleafForest,
        LandCoverClass::MixedForest,
        LandCoverClass::ClosedShrublands,
        LandCoverClass::OpenShrublands,
        LandCoverClass::WoodySavannas,
        LandCoverClass::Savannas,
        LandCoverClass::Grasslands,
        LandCoverClass::PermanentWetlands,
        LandCoverClass::Croplands,
        LandCoverClass::UrbanAndBuiltUp,
        LandCoverClass::CroplandNaturalMosaic,
        LandCoverClass::SnowAndIce,
        LandCoverClass::Barren,
        LandCoverClass::WaterBodies,
    ];

    /// Class for an integer code; unknown codes are `Unclassified`
    pub fn from_code(code: i64) -> Self {
        usize::try_from(code)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .unwrap_or(LandCoverClass::Unclassified)
    }

    /// IGBP integer code (0 for unclassified)
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Table row index
    pub(crate) fn index(self) -> usize {
        self as usize
    }

    /// Short IGBP abbreviation as used in flux-tower metadata
    pub fn abbreviation(self) -> &'static str {
        match self {
            LandCoverClass::Unclassified => "UNC",
            LandCoverClass::EvergreenNeedleleafForest => "ENF",
            LandCoverClass::EvergreenBroadleafForest => "EBF",
            LandCoverClass::DeciduousNeedleleafForest => "DNF",
            LandCoverClass::DeciduousBroadleafForest => "DBF",
            LandCoverClass::MixedForest => "MF",
            LandCoverClass::ClosedShrublands => "CSH",
            LandCoverClass::OpenShrublands => "OSH",
            LandCoverClass::WoodySavannas => "WSA",
            LandCoverClass::Savannas => "SAV",
            LandCoverClass::Grasslands => "GRA",
            LandCoverClass::PermanentWetlands => "WET",
            LandCoverClass::Croplands => "CRO",
            LandCoverClass::UrbanAndBuiltUp => "URB",
            LandCoverClass::CroplandNaturalMosaic => "CVM",
            LandCoverClass::SnowAndIce => "SNO",
            LandCoverClass::Barren => "BSV",
            LandCoverClass::WaterBodies => "WAT",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LandCoverClass::Unclassified => "Unclassified",
            LandCoverClass::EvergreenNeedleleafForest => "Evergreen Needleleaf Forest",
            LandCoverClass::EvergreenBroadleafForest => "Evergreen Broadleaf Forest",
            LandCoverClass::DeciduousNeedleleafForest => "Deciduous Needleleaf Forest",
            LandCoverClass::DeciduousBroadleafForest => "Deciduous Broadleaf Forest",
            LandCoverClass::MixedForest => "Mixed Forest",
            LandCoverClass::ClosedShrublands => "Closed Shrublands",
            LandCoverClass::OpenShrublands => "Open Shrublands",
            LandCoverClass::WoodySavannas => "Woody Savannas",
            LandCoverClass::Savannas => "Savannas",
            LandCoverClass::Grasslands => "Grasslands",
            LandCoverClass::PermanentWetlands => "Permanent Wetlands",
            LandCoverClass::Croplands => "Croplands",
            LandCoverClass::UrbanAndBuiltUp => "Urban and Built-up",
            LandCoverClass::CroplandNaturalMosaic => "Cropland/Natural Vegetation Mosaic",
            LandCoverClass::SnowAndIce => "Snow and Ice",
            LandCoverClass::Barren => "Barren",
            LandCoverClass::WaterBodies => "Water Bodies",
        }
    }
}

impl fmt::Display for LandCoverClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}
