//! Shared types and enums used across LANDSCENE.
//! Includes the `NamingScheme` tag, sensor and sensor-family enums,
//! Collection-1 processing levels and categories, and the band
//! token/value types flowing through the selection pipeline.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::scene::SceneError;

/// The two mutually incompatible Landsat product-naming generations.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum NamingScheme {
    PreCollection,
    Collection1,
}

impl fmt::Display for NamingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NamingScheme::PreCollection => write!(f, "Pre-Collection"),
            NamingScheme::Collection1 => write!(f, "Collection 1"),
        }
    }
}

/// Instrument encoded in the second character of a scene identifier.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum Sensor {
    OliTirs,
    Oli,
    Tirs,
    Etm,
    Tm,
    Mss,
}

impl Sensor {
    /// Decode a sensor letter for the given naming scheme. The two
    /// schemes use overlapping but distinct letter sets.
    pub fn from_code(scheme: NamingScheme, code: char) -> Option<Self> {
        match scheme {
            NamingScheme::Collection1 => match code {
                'C' => Some(Sensor::OliTirs),
                'O' => Some(Sensor::Oli),
                'T' => Some(Sensor::Tirs),
                'E' => Some(Sensor::Etm),
                'S' => Some(Sensor::Mss),
                _ => None,
            },
            NamingScheme::PreCollection => match code {
                'C' => Some(Sensor::OliTirs),
                'E' => Some(Sensor::Etm),
                'M' => Some(Sensor::Tm),
                'S' => Some(Sensor::Mss),
                _ => None,
            },
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Sensor::OliTirs => "OLI/TIRS",
            Sensor::Oli => "OLI",
            Sensor::Tirs => "TIRS",
            Sensor::Etm => "ETM+",
            Sensor::Tm => "TM",
            Sensor::Mss => "MSS",
        }
    }
}

impl fmt::Display for Sensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Sensor generation selecting which band-set table applies. MSS is
/// split by satellite because Landsat 1-3 and 4-5 number the same
/// channels differently.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum SensorFamily {
    OliTirs,
    Etm,
    Tm,
    MssEarly,
    MssLate,
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFamily::OliTirs => write!(f, "OLI/TIRS"),
            SensorFamily::Etm => write!(f, "ETM+"),
            SensorFamily::Tm => write!(f, "TM"),
            SensorFamily::MssEarly => write!(f, "MSS (Landsat 1-3)"),
            SensorFamily::MssLate => write!(f, "MSS (Landsat 4-5)"),
        }
    }
}

/// Collection-1 processing correction level.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CorrectionLevel {
    L1Tp,
    L1Gt,
    L1Gs,
}

impl CorrectionLevel {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L1TP" => Some(CorrectionLevel::L1Tp),
            "L1GT" => Some(CorrectionLevel::L1Gt),
            "L1GS" => Some(CorrectionLevel::L1Gs),
            _ => None,
        }
    }
}

impl fmt::Display for CorrectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrectionLevel::L1Tp => write!(f, "L1TP"),
            CorrectionLevel::L1Gt => write!(f, "L1GT"),
            CorrectionLevel::L1Gs => write!(f, "L1GS"),
        }
    }
}

/// Collection-1 collection category (tier).
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum CollectionCategory {
    RealTime,
    Tier1,
    Tier2,
}

impl CollectionCategory {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "RT" => Some(CollectionCategory::RealTime),
            "T1" => Some(CollectionCategory::Tier1),
            "T2" => Some(CollectionCategory::Tier2),
            _ => None,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CollectionCategory::RealTime => "Real-Time",
            CollectionCategory::Tier1 => "Tier 1",
            CollectionCategory::Tier2 => "Tier 2",
        }
    }
}

impl fmt::Display for CollectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionCategory::RealTime => write!(f, "RT"),
            CollectionCategory::Tier1 => write!(f, "T1"),
            CollectionCategory::Tier2 => write!(f, "T2"),
        }
    }
}

/// One requested band: a spectral channel number or the
/// quality-assessment layer.
///
/// The `Ord` derive sorts numeric bands ascending with `Qa` after every
/// number, matching the order bands are reported in.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum BandToken {
    Number(u8),
    Qa,
}

impl fmt::Display for BandToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandToken::Number(n) => write!(f, "{}", n),
            BandToken::Qa => write!(f, "QA"),
        }
    }
}

impl FromStr for BandToken {
    type Err = SceneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("QA") {
            return Ok(BandToken::Qa);
        }
        match s.parse::<u8>() {
            Ok(n) if (1..=11).contains(&n) => Ok(BandToken::Number(n)),
            _ => Err(SceneError::InvalidBandToken {
                token: s.to_string(),
            }),
        }
    }
}

/// Band identity extracted from a matched filename: an integer for
/// numeric bands, the literal name for alpha layers such as `BQA`.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub enum BandValue {
    Number(u8),
    Label(String),
}

impl fmt::Display for BandValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BandValue::Number(n) => write!(f, "{}", n),
            BandValue::Label(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_token_parses_numbers_and_qa() {
        assert_eq!("2".parse::<BandToken>().unwrap(), BandToken::Number(2));
        assert_eq!("11".parse::<BandToken>().unwrap(), BandToken::Number(11));
        assert_eq!("QA".parse::<BandToken>().unwrap(), BandToken::Qa);
        assert_eq!("qa".parse::<BandToken>().unwrap(), BandToken::Qa);
    }

    #[test]
    fn band_token_rejects_out_of_range() {
        assert!("0".parse::<BandToken>().is_err());
        assert!("12".parse::<BandToken>().is_err());
        assert!("B2".parse::<BandToken>().is_err());
    }

    #[test]
    fn band_tokens_order_numeric_before_qa() {
        let mut tokens = vec![BandToken::Qa, BandToken::Number(10), BandToken::Number(2)];
        tokens.sort();
        assert_eq!(
            tokens,
            vec![BandToken::Number(2), BandToken::Number(10), BandToken::Qa]
        );
    }

    #[test]
    fn sensor_codes_depend_on_scheme() {
        assert_eq!(
            Sensor::from_code(NamingScheme::Collection1, 'T'),
            Some(Sensor::Tirs)
        );
        assert_eq!(
            Sensor::from_code(NamingScheme::PreCollection, 'M'),
            Some(Sensor::Tm)
        );
        assert_eq!(Sensor::from_code(NamingScheme::Collection1, 'M'), None);
    }
}
