//! Scene classification and structured identifier parsing.
//!
//! A scene base name is classified against the two naming-scheme
//! templates (Collection 1 first, then Pre-Collection) and parsed into
//! a tagged [`SceneIdentifier`] in a single step. Ambiguous or
//! non-matching names are hard failures; downstream band matching never
//! runs without a successful classification.
use std::fmt;

use chrono::NaiveDate;
use regex::Captures;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::identifiers::{satellite_name, scene_regex};
use crate::types::{
    BandToken, CollectionCategory, CorrectionLevel, NamingScheme, Sensor, SensorFamily,
};

/// Errors raised while classifying scenes and selecting bands.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error(
        "unrecognized Landsat scene identifier '{identifier}': matches neither the \
         Collection 1 nor the Pre-Collection naming scheme"
    )]
    UnrecognizedIdentifier { identifier: String },

    #[error(
        "scene identifier '{identifier}' matches both naming schemes; \
         the identifier grammar is ambiguous"
    )]
    AmbiguousIdentifier { identifier: String },

    #[error("invalid {field} in scene identifier '{identifier}'")]
    InvalidField {
        identifier: String,
        field: &'static str,
    },

    #[error("unknown band set '{set}' for sensor family {family}")]
    UnknownBandSet { set: String, family: SensorFamily },

    #[error("invalid band token '{token}': expected a band number 1-11 or 'QA'")]
    InvalidBandToken { token: String },

    #[error(
        "filename '{filename}' matches the templates of both band {first} and band {second}; \
         the band-file grammar is ambiguous"
    )]
    AmbiguousMatch {
        filename: String,
        first: BandToken,
        second: BandToken,
    },

    #[error(
        "detected a metadata file with the .TIF extension: '{filename}'; \
         rename the extension to .txt and retry"
    )]
    MisnamedMetadataFile { filename: String },

    #[error("cannot derive a band number from filename token '{name}'")]
    UnexpectedBandName { name: String },

    #[error("band template compilation failed: {0}")]
    Template(#[from] regex::Error),
}

/// Structured Landsat scene identifier, tagged by naming scheme.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub enum SceneIdentifier {
    Collection1 {
        sensor: Sensor,
        satellite: u8,
        level: CorrectionLevel,
        path: u16,
        row: u16,
        acquired: NaiveDate,
        processed: NaiveDate,
        collection: u8,
        category: CollectionCategory,
    },
    PreCollection {
        sensor: Sensor,
        satellite: u8,
        path: u16,
        row: u16,
        year: u16,
        julian_day: u16,
        ground_station: String,
    },
}

/// Determine which naming scheme a scene base name uses.
///
/// Collection 1 is tried before Pre-Collection; the order is fixed. If
/// both templates match the same string the grammar itself is at fault
/// and the error says so rather than silently picking one.
pub fn classify(base_name: &str) -> Result<NamingScheme, SceneError> {
    let collection1 = scene_regex(NamingScheme::Collection1).is_match(base_name);
    let precollection = scene_regex(NamingScheme::PreCollection).is_match(base_name);
    match (collection1, precollection) {
        (true, true) => Err(SceneError::AmbiguousIdentifier {
            identifier: base_name.to_string(),
        }),
        (true, false) => Ok(NamingScheme::Collection1),
        (false, true) => Ok(NamingScheme::PreCollection),
        (false, false) => Err(SceneError::UnrecognizedIdentifier {
            identifier: base_name.to_string(),
        }),
    }
}

fn group<'c>(captures: &'c Captures<'_>, name: &str) -> &'c str {
    captures.name(name).map(|m| m.as_str()).unwrap_or_default()
}

fn numeric_group<T: std::str::FromStr>(
    captures: &Captures<'_>,
    name: &str,
    identifier: &str,
    field: &'static str,
) -> Result<T, SceneError> {
    group(captures, name)
        .parse()
        .map_err(|_| SceneError::InvalidField {
            identifier: identifier.to_string(),
            field,
        })
}

impl SceneIdentifier {
    /// Classify and parse a scene base name in one step.
    pub fn parse(base_name: &str) -> Result<Self, SceneError> {
        match classify(base_name)? {
            NamingScheme::Collection1 => Self::parse_collection1(base_name),
            NamingScheme::PreCollection => Self::parse_precollection(base_name),
        }
    }

    fn parse_collection1(identifier: &str) -> Result<Self, SceneError> {
        let captures = scene_regex(NamingScheme::Collection1)
            .captures(identifier)
            .ok_or_else(|| SceneError::UnrecognizedIdentifier {
                identifier: identifier.to_string(),
            })?;

        let sensor_code = group(&captures, "sensor").chars().next().unwrap_or(' ');
        let sensor = Sensor::from_code(NamingScheme::Collection1, sensor_code).ok_or_else(|| {
            SceneError::InvalidField {
                identifier: identifier.to_string(),
                field: "sensor",
            }
        })?;
        let level = CorrectionLevel::from_code(group(&captures, "level")).ok_or_else(|| {
            SceneError::InvalidField {
                identifier: identifier.to_string(),
                field: "processing correction level",
            }
        })?;
        let category = CollectionCategory::from_code(group(&captures, "category")).ok_or_else(
            || SceneError::InvalidField {
                identifier: identifier.to_string(),
                field: "collection category",
            },
        )?;

        let acquired = date_from_groups(
            &captures,
            ("acquisition_year", "acquisition_month", "acquisition_day"),
            identifier,
            "acquisition date",
        )?;
        let processed = date_from_groups(
            &captures,
            ("processing_year", "processing_month", "processing_day"),
            identifier,
            "processing date",
        )?;

        Ok(SceneIdentifier::Collection1 {
            sensor,
            satellite: numeric_group(&captures, "satellite", identifier, "satellite")?,
            level,
            path: numeric_group(&captures, "path", identifier, "WRS path")?,
            row: numeric_group(&captures, "row", identifier, "WRS row")?,
            acquired,
            processed,
            collection: numeric_group(&captures, "collection", identifier, "collection number")?,
            category,
        })
    }

    fn parse_precollection(identifier: &str) -> Result<Self, SceneError> {
        let captures = scene_regex(NamingScheme::PreCollection)
            .captures(identifier)
            .ok_or_else(|| SceneError::UnrecognizedIdentifier {
                identifier: identifier.to_string(),
            })?;

        let sensor_code = group(&captures, "sensor").chars().next().unwrap_or(' ');
        let sensor = Sensor::from_code(NamingScheme::PreCollection, sensor_code).ok_or_else(
            || SceneError::InvalidField {
                identifier: identifier.to_string(),
                field: "sensor",
            },
        )?;

        Ok(SceneIdentifier::PreCollection {
            sensor,
            satellite: numeric_group(&captures, "satellite", identifier, "satellite")?,
            path: numeric_group(&captures, "path", identifier, "WRS path")?,
            row: numeric_group(&captures, "row", identifier, "WRS row")?,
            year: numeric_group(&captures, "acquisition_year", identifier, "acquisition year")?,
            julian_day: numeric_group(&captures, "julian_day", identifier, "julian day")?,
            ground_station: group(&captures, "ground_station").to_string(),
        })
    }

    pub fn scheme(&self) -> NamingScheme {
        match self {
            SceneIdentifier::Collection1 { .. } => NamingScheme::Collection1,
            SceneIdentifier::PreCollection { .. } => NamingScheme::PreCollection,
        }
    }

    pub fn satellite(&self) -> u8 {
        match self {
            SceneIdentifier::Collection1 { satellite, .. } => *satellite,
            SceneIdentifier::PreCollection { satellite, .. } => *satellite,
        }
    }

    /// Sensor generation selecting the applicable band-set table.
    pub fn family(&self) -> SensorFamily {
        let sensor = match self {
            SceneIdentifier::Collection1 { sensor, .. } => *sensor,
            SceneIdentifier::PreCollection { sensor, .. } => *sensor,
        };
        match sensor {
            Sensor::OliTirs | Sensor::Oli | Sensor::Tirs => SensorFamily::OliTirs,
            Sensor::Etm => SensorFamily::Etm,
            Sensor::Tm => SensorFamily::Tm,
            Sensor::Mss => {
                if self.satellite() <= 3 {
                    SensorFamily::MssEarly
                } else {
                    SensorFamily::MssLate
                }
            }
        }
    }

    /// Calendar acquisition date. For Pre-Collection identifiers the
    /// Julian day is resolved against the acquisition year; a day
    /// number the year does not contain yields `None`.
    pub fn acquisition_date(&self) -> Option<NaiveDate> {
        match self {
            SceneIdentifier::Collection1 { acquired, .. } => Some(*acquired),
            SceneIdentifier::PreCollection {
                year, julian_day, ..
            } => NaiveDate::from_yo_opt(i32::from(*year), u32::from(*julian_day)),
        }
    }
}

fn date_from_groups(
    captures: &Captures<'_>,
    (year, month, day): (&str, &str, &str),
    identifier: &str,
    field: &'static str,
) -> Result<NaiveDate, SceneError> {
    let year: i32 = numeric_group(captures, year, identifier, field)?;
    let month: u32 = numeric_group(captures, month, identifier, field)?;
    let day: u32 = numeric_group(captures, day, identifier, field)?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| SceneError::InvalidField {
        identifier: identifier.to_string(),
        field,
    })
}

impl fmt::Display for SceneIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let satellite = satellite_name(self.satellite()).unwrap_or("Landsat");
        match self {
            SceneIdentifier::Collection1 {
                sensor,
                level,
                path,
                row,
                acquired,
                category,
                ..
            } => write!(
                f,
                "{satellite} {sensor} {level}, path {path:03} row {row:03}, \
                 acquired {acquired} (Collection 1, {})",
                category.description()
            ),
            SceneIdentifier::PreCollection {
                sensor,
                path,
                row,
                year,
                julian_day,
                ground_station,
                ..
            } => write!(
                f,
                "{satellite} {sensor}, path {path:03} row {row:03}, \
                 acquired {year} day {julian_day}, ground station {ground_station} \
                 (Pre-Collection)"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION_1_ID: &str = "LC08_L1TP_034032_20200101_20200110_01_T1";
    const PRECOLLECTION_ID: &str = "LC81840332014146LGN00";
    const PRECOLLECTION_ETM_ID: &str = "LE71610432005160ASN00";

    #[test]
    fn classify_recognizes_both_schemes() {
        assert_eq!(classify(COLLECTION_1_ID).unwrap(), NamingScheme::Collection1);
        assert_eq!(
            classify(PRECOLLECTION_ID).unwrap(),
            NamingScheme::PreCollection
        );
        assert_eq!(
            classify(PRECOLLECTION_ETM_ID).unwrap(),
            NamingScheme::PreCollection
        );
    }

    #[test]
    fn classify_fails_loudly_on_unknown_identifiers() {
        let err = classify("S1A_IW_GRDH_20200101").unwrap_err();
        assert!(matches!(err, SceneError::UnrecognizedIdentifier { .. }));
        assert!(err.to_string().contains("S1A_IW_GRDH_20200101"));
    }

    #[test]
    fn parse_collection1_extracts_all_fields() {
        let identifier = SceneIdentifier::parse(COLLECTION_1_ID).unwrap();
        match &identifier {
            SceneIdentifier::Collection1 {
                sensor,
                satellite,
                level,
                path,
                row,
                acquired,
                processed,
                collection,
                category,
            } => {
                assert_eq!(*sensor, Sensor::OliTirs);
                assert_eq!(*satellite, 8);
                assert_eq!(*level, CorrectionLevel::L1Tp);
                assert_eq!(*path, 34);
                assert_eq!(*row, 32);
                assert_eq!(*acquired, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
                assert_eq!(*processed, NaiveDate::from_ymd_opt(2020, 1, 10).unwrap());
                assert_eq!(*collection, 1);
                assert_eq!(*category, CollectionCategory::Tier1);
            }
            other => panic!("expected Collection1, got {other:?}"),
        }
        assert_eq!(identifier.family(), SensorFamily::OliTirs);
        assert_eq!(
            identifier.acquisition_date(),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
    }

    #[test]
    fn parse_precollection_extracts_all_fields() {
        let identifier = SceneIdentifier::parse(PRECOLLECTION_ID).unwrap();
        match &identifier {
            SceneIdentifier::PreCollection {
                sensor,
                satellite,
                path,
                row,
                year,
                julian_day,
                ground_station,
            } => {
                assert_eq!(*sensor, Sensor::OliTirs);
                assert_eq!(*satellite, 8);
                assert_eq!(*path, 184);
                assert_eq!(*row, 33);
                assert_eq!(*year, 2014);
                assert_eq!(*julian_day, 146);
                assert_eq!(ground_station, "LGN00");
            }
            other => panic!("expected PreCollection, got {other:?}"),
        }
        // Day 146 of 2014 is May 26th.
        assert_eq!(
            identifier.acquisition_date(),
            NaiveDate::from_ymd_opt(2014, 5, 26)
        );
    }

    #[test]
    fn parse_precollection_etm_scene() {
        let identifier = SceneIdentifier::parse(PRECOLLECTION_ETM_ID).unwrap();
        assert_eq!(identifier.scheme(), NamingScheme::PreCollection);
        assert_eq!(identifier.family(), SensorFamily::Etm);
        assert_eq!(identifier.satellite(), 7);
    }

    #[test]
    fn mss_family_splits_by_satellite() {
        let early = SceneIdentifier::parse("LS11840332014146LGN00").unwrap();
        assert_eq!(early.family(), SensorFamily::MssEarly);
        let late = SceneIdentifier::parse("LS51840332014146LGN00").unwrap();
        assert_eq!(late.family(), SensorFamily::MssLate);
    }

    #[test]
    fn display_names_the_scene() {
        let identifier = SceneIdentifier::parse(COLLECTION_1_ID).unwrap();
        let rendered = identifier.to_string();
        assert!(rendered.contains("Landsat 8"));
        assert!(rendered.contains("OLI/TIRS"));
        assert!(rendered.contains("path 034 row 032"));
        assert!(rendered.contains("Collection 1"));
    }
}
