//! Landsat identifier grammar: regular-expression fragments, lookup
//! tables, and the composed scene and band-file templates for the
//! Pre-Collection and Collection-1 naming schemes.
//!
//! Everything here is pure data. Templates are composed by plain string
//! concatenation; the band-file templates carry a `{band}` placeholder
//! substituted per query at match time. Compiled scene regexes are
//! cached in `Lazy` statics and anchored at the start of the input —
//! templates end in the fixed GeoTIFF extension, so a start-anchored
//! match is effectively a full match.
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::{BandToken, NamingScheme};

/// Every Landsat identifier starts with this prefix.
pub const LANDSAT_PREFIX: &str = "L";
pub const DELIMITER: char = '_';
pub const GEOTIFF_EXTENSION: &str = ".TIF";
/// Metadata sidecar files end in `MTL.txt`; the bare marker also shows
/// up in misnamed `*MTL.TIF` files.
pub const METADATA_MARKER: &str = "MTL";
/// Quality-assessment layer marker in filenames and band names.
pub const QA_MARKER: &str = "QA";
/// Markers identifying image-quality filenames (quality assessment and
/// the ETM+ dual-gain thermal `VCID` variants).
pub const IMAGE_QUALITY_MARKERS: [&str; 2] = [QA_MARKER, "VCID"];
/// Leading letter of band tokens inside filenames (`B2`, `B10`, `BQA`).
pub const BAND_PREFIX: char = 'B';
/// Placeholder substituted with a concrete band token at match time.
pub const BAND_PLACEHOLDER: &str = "{band}";

const SENSOR_COLLECTION1_RE: &str = "(?P<sensor>[COTES])";
const SENSOR_PRECOLLECTION_RE: &str = "(?P<sensor>[CEMS])";
const SATELLITE_COLLECTION1_RE: &str = "(?P<satellite>0[14578])";
const SATELLITE_PRECOLLECTION_RE: &str = "(?P<satellite>[14578])";
const PROCESSING_CORRECTION_LEVEL_RE: &str = "(?P<level>L1(?:TP|GT|GS))";
const WRS_PATH_ROW_RE: &str = "(?P<path>[012][0-9][0-9])(?P<row>[01][0-9][0-9]|2[0-4][0-3])";
const ACQUISITION_DATE_RE: &str = "(?P<acquisition_year>(?:19|20)\\d\\d)(?P<acquisition_month>0[1-9]|1[012])(?P<acquisition_day>0[1-9]|[12][0-9]|3[01])";
const ACQUISITION_YEAR_RE: &str = "(?P<acquisition_year>(?:19|20)\\d\\d)";
const JULIAN_DAY_RE: &str = "(?P<julian_day>[0-2][0-9][0-9]|3[0-6][0-6])";
const GROUND_STATION_RE: &str = "(?P<ground_station>[A-Z][A-Z][A-Z][0-9][0-9])";
const PROCESSING_DATE_RE: &str = "(?P<processing_year>(?:19|20)\\d\\d)(?P<processing_month>0[1-9]|1[012])(?P<processing_day>0[1-9]|[12][0-9]|3[01])";
const COLLECTION_NUMBER_RE: &str = "(?P<collection>0[12])";
const COLLECTION_CATEGORY_RE: &str = "(?P<category>RT|T[12])";

/// Unanchored scene-identifier pattern for one naming scheme.
fn scene_pattern(scheme: NamingScheme) -> String {
    match scheme {
        NamingScheme::Collection1 => format!(
            "{LANDSAT_PREFIX}{SENSOR_COLLECTION1_RE}{SATELLITE_COLLECTION1_RE}\
             {DELIMITER}{PROCESSING_CORRECTION_LEVEL_RE}\
             {DELIMITER}{WRS_PATH_ROW_RE}\
             {DELIMITER}{ACQUISITION_DATE_RE}\
             {DELIMITER}{PROCESSING_DATE_RE}\
             {DELIMITER}{COLLECTION_NUMBER_RE}\
             {DELIMITER}{COLLECTION_CATEGORY_RE}"
        ),
        NamingScheme::PreCollection => format!(
            "{LANDSAT_PREFIX}{SENSOR_PRECOLLECTION_RE}{SATELLITE_PRECOLLECTION_RE}\
             {WRS_PATH_ROW_RE}{ACQUISITION_YEAR_RE}{JULIAN_DAY_RE}{GROUND_STATION_RE}"
        ),
    }
}

static COLLECTION_1_SCENE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", scene_pattern(NamingScheme::Collection1)))
        .expect("Collection 1 scene template must compile")
});

static PRECOLLECTION_SCENE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("^{}", scene_pattern(NamingScheme::PreCollection)))
        .expect("Pre-Collection scene template must compile")
});

/// Compiled, start-anchored scene regex for one naming scheme.
pub fn scene_regex(scheme: NamingScheme) -> &'static Regex {
    match scheme {
        NamingScheme::Collection1 => &COLLECTION_1_SCENE,
        NamingScheme::PreCollection => &PRECOLLECTION_SCENE,
    }
}

/// Band-file template for one naming scheme, with the `{band}`
/// placeholder still open. Anchored at the start; the literal GeoTIFF
/// extension terminates the pattern.
pub fn band_file_template(scheme: NamingScheme) -> String {
    format!(
        "^{}{}{}{}\\{}",
        scene_pattern(scheme),
        DELIMITER,
        BAND_PREFIX,
        BAND_PLACEHOLDER,
        GEOTIFF_EXTENSION
    )
}

/// Substitute a concrete token into the band-file template. Pure and
/// deterministic: the same token always yields the same pattern.
pub fn band_file_pattern(scheme: NamingScheme, token: &BandToken) -> String {
    band_file_template(scheme).replace(BAND_PLACEHOLDER, &token.to_string())
}

/// Human-readable satellite name for the digits in an identifier.
pub fn satellite_name(number: u8) -> Option<&'static str> {
    match number {
        1 => Some("Landsat 1"),
        4 => Some("Landsat 4"),
        5 => Some("Landsat 5"),
        7 => Some("Landsat 7"),
        8 => Some("Landsat 8"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLLECTION_1_ID: &str = "LC08_L1TP_034032_20200101_20200110_01_T1";
    const PRECOLLECTION_ID: &str = "LC81840332014146LGN00";

    #[test]
    fn scene_templates_compile() {
        // Force both Lazy statics; a malformed fragment would panic here.
        assert!(scene_regex(NamingScheme::Collection1).as_str().starts_with('^'));
        assert!(scene_regex(NamingScheme::PreCollection).as_str().starts_with('^'));
    }

    #[test]
    fn collection_1_identifier_matches_only_its_template() {
        assert!(scene_regex(NamingScheme::Collection1).is_match(COLLECTION_1_ID));
        assert!(!scene_regex(NamingScheme::PreCollection).is_match(COLLECTION_1_ID));
    }

    #[test]
    fn precollection_identifier_matches_only_its_template() {
        assert!(scene_regex(NamingScheme::PreCollection).is_match(PRECOLLECTION_ID));
        assert!(!scene_regex(NamingScheme::Collection1).is_match(PRECOLLECTION_ID));
    }

    #[test]
    fn band_file_pattern_substitutes_token() {
        let pattern = band_file_pattern(NamingScheme::Collection1, &BandToken::Number(10));
        assert!(pattern.ends_with("_B10\\.TIF"));
        assert!(!pattern.contains(BAND_PLACEHOLDER));

        let qa = band_file_pattern(NamingScheme::PreCollection, &BandToken::Qa);
        assert!(qa.ends_with("_BQA\\.TIF"));
    }

    #[test]
    fn band_file_pattern_matches_generated_filename() {
        let pattern = band_file_pattern(NamingScheme::Collection1, &BandToken::Number(2));
        let regex = Regex::new(&pattern).unwrap();
        assert!(regex.is_match("LC08_L1TP_034032_20200101_20200110_01_T1_B2.TIF"));
        // The escaped extension keeps B2 from bleeding into B2x names.
        assert!(!regex.is_match("LC08_L1TP_034032_20200101_20200110_01_T1_B20TIF"));
    }

    #[test]
    fn satellite_names_cover_the_grammar() {
        for number in [1u8, 4, 5, 7, 8] {
            assert!(satellite_name(number).is_some());
        }
        assert!(satellite_name(2).is_none());
    }
}
