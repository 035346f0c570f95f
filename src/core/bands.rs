//! Band-set resolution, filename matching, band name/number extraction,
//! and the deterministic ordering of matched band files.
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use regex::Regex;
use tracing::{info, warn};

use crate::core::identifiers::{
    BAND_PREFIX, GEOTIFF_EXTENSION, IMAGE_QUALITY_MARKERS, METADATA_MARKER, QA_MARKER,
    band_file_pattern,
};
use crate::core::scene::SceneError;
use crate::types::{BandToken, BandValue, NamingScheme, SensorFamily};

use crate::types::BandToken::{Number as B, Qa};

// Semantic band sets per sensor family. `all` is a fixed constant, not
// the union of the other sets: the panchromatic band belongs to no
// other subset.
const OLI_TIRS_SETS: &[(&str, &[BandToken])] = &[
    (
        "all",
        &[
            B(1),
            B(2),
            B(3),
            B(4),
            B(5),
            B(6),
            B(7),
            B(8),
            B(9),
            B(10),
            B(11),
            Qa,
        ],
    ),
    ("bqa", &[Qa]),
    (
        "oli",
        &[B(1), B(2), B(3), B(4), B(5), B(6), B(7), B(8), B(9)],
    ),
    ("tirs", &[B(10), B(11)]),
    ("coastal", &[B(1)]),
    ("visible", &[B(2), B(3), B(4)]),
    ("ndvi", &[B(4), B(5)]),
    ("infrared", &[B(5), B(6), B(7), B(9)]),
    ("panchromatic", &[B(8)]),
];

const ETM_SETS: &[(&str, &[BandToken])] = &[
    ("all", &[B(1), B(2), B(3), B(4), B(5), B(6), B(7), B(8)]),
    ("visible", &[B(1), B(2), B(3)]),
    ("ndvi", &[B(3), B(4)]),
    ("infrared", &[B(4), B(5), B(7)]),
    ("shortwave", &[B(5), B(7)]),
    ("tirs", &[B(6)]),
    ("panchromatic", &[B(8)]),
];

const TM_SETS: &[(&str, &[BandToken])] = &[
    ("all", &[B(1), B(2), B(3), B(4), B(5), B(6), B(7)]),
    ("visible", &[B(1), B(2), B(3)]),
    ("ndvi", &[B(3), B(4)]),
    ("infrared", &[B(4), B(5), B(7)]),
    ("tirs", &[B(6)]),
];

const MSS_EARLY_SETS: &[(&str, &[BandToken])] = &[
    ("all", &[B(4), B(5), B(6), B(7)]),
    ("visible", &[B(4), B(5)]),
    ("infrared", &[B(6), B(7)]),
];

const MSS_LATE_SETS: &[(&str, &[BandToken])] = &[
    ("all", &[B(1), B(2), B(3), B(4)]),
    ("visible", &[B(1), B(2)]),
    ("ndvi", &[B(2), B(3)]),
    ("infrared", &[B(3), B(4)]),
];

fn band_set_table(family: SensorFamily) -> &'static [(&'static str, &'static [BandToken])] {
    match family {
        SensorFamily::OliTirs => OLI_TIRS_SETS,
        SensorFamily::Etm => ETM_SETS,
        SensorFamily::Tm => TM_SETS,
        SensorFamily::MssEarly => MSS_EARLY_SETS,
        SensorFamily::MssLate => MSS_LATE_SETS,
    }
}

/// Expand semantic set names into a deduplicated token set for one
/// sensor family. An unknown name is a lookup failure, never silently
/// ignored; the set ordering is immaterial here because the filename
/// matcher imposes the final order.
pub fn resolve_band_sets(
    set_names: &[String],
    family: SensorFamily,
) -> Result<BTreeSet<BandToken>, SceneError> {
    let table = band_set_table(family);
    let mut tokens = BTreeSet::new();
    for set_name in set_names {
        let key = set_name.to_ascii_lowercase();
        let entry = table.iter().find(|(name, _)| *name == key).ok_or_else(|| {
            SceneError::UnknownBandSet {
                set: set_name.clone(),
                family,
            }
        })?;
        tokens.extend(entry.1.iter().copied());
    }
    Ok(tokens)
}

/// Match requested band tokens against a scene directory listing.
///
/// For each token the scheme's band-file template is instantiated and
/// compiled; every listing entry whose start matches is collected. A
/// token matching zero files only means the band is absent from the
/// scene; a single file claimed by two distinct tokens means the
/// grammar is defective and is an error. The result comes back in
/// deterministic band order (see [`sort_band_filenames`]).
pub fn match_band_filenames(
    tokens: &BTreeSet<BandToken>,
    listing: &[String],
    scheme: NamingScheme,
) -> Result<Vec<String>, SceneError> {
    let mut matched = Vec::new();
    let mut claims: HashMap<&str, BandToken> = HashMap::new();
    for token in tokens {
        let regex = Regex::new(&band_file_pattern(scheme, token))?;
        let mut hits = 0usize;
        for filename in listing {
            if !regex.is_match(filename) {
                continue;
            }
            if let Some(previous) = claims.insert(filename, *token) {
                if previous != *token {
                    return Err(SceneError::AmbiguousMatch {
                        filename: filename.clone(),
                        first: previous,
                        second: *token,
                    });
                }
            }
            matched.push(filename.clone());
            hits += 1;
        }
        if hits == 0 {
            info!("No file matched band {token}; the scene does not carry it");
        }
    }
    Ok(sort_band_filenames(matched))
}

/// Stable sort: numeric `_B<digits>` markers ascending, everything else
/// (e.g. a pure quality-assessment file) after every numeric band, ties
/// broken by plain lexicographic order of the full filename.
pub fn sort_band_filenames(mut filenames: Vec<String>) -> Vec<String> {
    filenames.sort_by(|a, b| band_rank(a).cmp(&band_rank(b)).then_with(|| a.cmp(b)));
    filenames
}

fn band_rank(filename: &str) -> (u8, u32) {
    match numeric_band_marker(filename) {
        Some(number) => (0, number),
        None => (1, 0),
    }
}

fn numeric_band_marker(filename: &str) -> Option<u32> {
    let after = filename.split_once("_B")?.1;
    let digits = after.split('.').next().unwrap_or(after);
    digits.parse().ok()
}

// Ordered band-number extraction rules. The precedence is load-bearing:
// historically accreted filename shapes make the 3-character branches
// overlap, and reordering them changes which branch fires.
struct BandRule {
    label: &'static str,
    applies: fn(absolute: &str, name: &str) -> bool,
    derive: fn(name: &str) -> Option<BandValue>,
}

fn is_quality_layer(absolute: &str, _name: &str) -> bool {
    absolute.contains(QA_MARKER)
}

fn derive_quality(name: &str) -> Option<BandValue> {
    Some(BandValue::Label(name.to_string()))
}

fn is_two_digit_prefixed(_absolute: &str, name: &str) -> bool {
    name.len() == 3 && name.starts_with(BAND_PREFIX) && name.ends_with('0')
}

fn derive_two_digit(name: &str) -> Option<BandValue> {
    name.get(1..3)?.parse().ok().map(BandValue::Number)
}

fn is_trailing_zero(_absolute: &str, name: &str) -> bool {
    name.len() == 3 && name.ends_with('0')
}

fn derive_middle_digit(name: &str) -> Option<BandValue> {
    name.get(1..2)?.parse().ok().map(BandValue::Number)
}

fn is_three_chars_no_zero(_absolute: &str, name: &str) -> bool {
    name.len() == 3 && !name.ends_with('0')
}

fn always(_absolute: &str, _name: &str) -> bool {
    true
}

fn derive_trailing_digit(name: &str) -> Option<BandValue> {
    let digit = name.chars().last()?.to_digit(10)?;
    Some(BandValue::Number(digit as u8))
}

const BAND_RULES: &[BandRule] = &[
    BandRule {
        label: "quality-assessment layer",
        applies: is_quality_layer,
        derive: derive_quality,
    },
    BandRule {
        label: "two-digit multispectral band",
        applies: is_two_digit_prefixed,
        derive: derive_two_digit,
    },
    BandRule {
        label: "single-digit band with trailing zero",
        applies: is_trailing_zero,
        derive: derive_middle_digit,
    },
    BandRule {
        label: "two-digit band suffix",
        applies: is_three_chars_no_zero,
        derive: derive_two_digit,
    },
    BandRule {
        label: "single trailing digit",
        applies: always,
        derive: derive_trailing_digit,
    },
];

/// Derive the canonical band name and band value for one matched file.
///
/// Image-quality filenames (`QA`, `VCID`) take their name from the last
/// underscore-delimited token of the absolute path's stem; all other
/// files use the plain filename's stem. A metadata file wearing the
/// image extension is fatal for the scene. With `single_mapset` the
/// name is prefixed with the scene base name so that several scenes can
/// share one destination namespace without collisions.
pub fn extract_name_band(
    scene: &Path,
    filename: &str,
    single_mapset: bool,
) -> Result<(String, BandValue), SceneError> {
    let absolute = scene.join(filename);
    let absolute = absolute.to_string_lossy();

    let name = if IMAGE_QUALITY_MARKERS
        .iter()
        .any(|marker| absolute.contains(marker))
    {
        last_stem_token(&absolute)
    } else {
        last_stem_token(filename)
    }
    .to_string();

    if absolute.contains(METADATA_MARKER) && filename.ends_with(GEOTIFF_EXTENSION) {
        return Err(SceneError::MisnamedMetadataFile {
            filename: filename.to_string(),
        });
    }

    let band = derive_band(&absolute, &name)?;

    let name = if single_mapset {
        let base = scene
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{base}_{name}")
    } else {
        name
    };

    Ok((name, band))
}

fn derive_band(absolute: &str, name: &str) -> Result<BandValue, SceneError> {
    // The three 3-character branches have overlapping raw shapes for
    // some historical names; surface that instead of deciding silently.
    let overlapping: Vec<&str> = BAND_RULES[1..4]
        .iter()
        .filter(|rule| (rule.applies)(absolute, name))
        .map(|rule| rule.label)
        .collect();
    if overlapping.len() > 1 {
        warn!(
            "band name '{name}' matches multiple extraction rules ({}); \
             applying the first",
            overlapping.join(", ")
        );
    }

    for rule in BAND_RULES {
        if (rule.applies)(absolute, name) {
            return (rule.derive)(name).ok_or_else(|| SceneError::UnexpectedBandName {
                name: name.to_string(),
            });
        }
    }
    Err(SceneError::UnexpectedBandName {
        name: name.to_string(),
    })
}

/// Last underscore-delimited token of a path-like string with its final
/// extension removed. Only an extension after the last path separator
/// counts, mirroring how stems are taken from full paths.
fn last_stem_token(path_like: &str) -> &str {
    let separator = path_like.rfind('/').map_or(0, |i| i + 1);
    let stem = match path_like.rfind('.') {
        Some(dot) if dot >= separator => &path_like[..dot],
        _ => path_like,
    };
    stem.rsplit('_').next().unwrap_or(stem)
}
