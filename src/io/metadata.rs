//! MTL metadata sidecar discovery and acquisition-timestamp parsing.
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Metadata sidecar files end in this suffix.
pub const METADATA_SIDECAR_SUFFIX: &str = "MTL.txt";
/// MTL keys carrying the acquisition date, by product generation.
pub const DATE_KEYS: [&str; 2] = ["DATE_ACQUIRED", "ACQUISITION_DATE"];
/// MTL keys carrying the scene center time, by product generation.
pub const TIME_KEYS: [&str; 2] = ["SCENE_CENTER_TIME", "SCENE_CENTER_SCAN_TIME"];
/// Timezone recorded when the MTL time ends in `Z`.
pub const ZERO_TIMEZONE: &str = "+0000";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("missing '*MTL.txt' metadata file in scene {scene}")]
    MissingSidecar { scene: String },

    #[error("found {count} '*MTL.txt' metadata files in scene {scene}, expected exactly one")]
    MultipleSidecars { scene: String, count: usize },

    #[error("malformed metadata line '{line}': expected 'KEY = value'")]
    MalformedLine { line: String },

    #[error("malformed timestamp '{value}': expected {expected}")]
    MalformedTimestamp {
        value: String,
        expected: &'static str,
    },

    #[error("no {field} found in metadata file {file}")]
    MissingField {
        field: &'static str,
        file: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Acquisition date and time of a scene, from its MTL sidecar or a
/// manual override.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct AcquisitionTimestamp {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub timezone: Option<String>,
}

impl AcquisitionTimestamp {
    /// Render the timestamp the way the temporal-registration tool
    /// expects it: zero-padded day, lower-case three-letter month, and
    /// never single-digit seconds (e.g. `01 jan 2020 17:48:52.737915`).
    pub fn grass_format(&self) -> String {
        let date = self.date.format("%d %b %Y").to_string().to_lowercase();
        let time = if self.time.nanosecond() == 0 {
            self.time.format("%H:%M:%S").to_string()
        } else {
            self.time.format("%H:%M:%S%.6f").to_string()
        };
        format!("{date} {time}")
    }
}

/// Locate the single `*MTL.txt` sidecar of a scene directory. Zero or
/// multiple candidates are fatal for the scene.
pub fn find_metadata_file(scene: &Path) -> Result<PathBuf, MetadataError> {
    let mut matches = Vec::new();
    for entry in fs::read_dir(scene)? {
        let entry = entry?;
        if entry
            .file_name()
            .to_string_lossy()
            .ends_with(METADATA_SIDECAR_SUFFIX)
        {
            matches.push(entry.path());
        }
    }
    match matches.len() {
        0 => Err(MetadataError::MissingSidecar {
            scene: scene.display().to_string(),
        }),
        1 => Ok(matches.remove(0)),
        count => Err(MetadataError::MultipleSidecars {
            scene: scene.display().to_string(),
            count,
        }),
    }
}

/// Read the acquisition timestamp out of a scene's MTL sidecar.
pub fn read_timestamp(scene: &Path) -> Result<AcquisitionTimestamp, MetadataError> {
    let metafile = find_metadata_file(scene)?;
    let contents = fs::read_to_string(&metafile)?;

    let mut date = None;
    let mut time = None;
    let mut timezone = None;

    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if DATE_KEYS.iter().any(|key| line.contains(key)) {
            let value = field_value(line)?;
            date = Some(parse_date(value)?);
        }
        if TIME_KEYS.iter().any(|key| line.contains(key)) {
            let mut value = field_value(line)?.to_string();
            if value.ends_with('Z') {
                timezone = Some(ZERO_TIMEZONE.to_string());
                value.pop();
            }
            time = Some(parse_time(&value)?);
        }
    }

    let date = date.ok_or_else(|| MetadataError::MissingField {
        field: "acquisition date",
        file: metafile.display().to_string(),
    })?;
    let time = time.ok_or_else(|| MetadataError::MissingField {
        field: "scene center time",
        file: metafile.display().to_string(),
    })?;

    Ok(AcquisitionTimestamp {
        date,
        time,
        timezone,
    })
}

/// Parse a manual timestamp override of the shape
/// `YYYY-MM-DD HH:MM:SS[.ffffff] [+ZZZZ]`.
pub fn parse_manual_timestamp(value: &str) -> Result<AcquisitionTimestamp, MetadataError> {
    let malformed = || MetadataError::MalformedTimestamp {
        value: value.to_string(),
        expected: "YYYY-MM-DD HH:MM:SS[.ffffff] [+ZZZZ]",
    };
    let mut parts = value.split_whitespace();
    let date = parse_date(parts.next().ok_or_else(malformed)?)?;
    let time = parse_time(parts.next().ok_or_else(malformed)?)?;
    let timezone = parts.next().map(str::to_string);
    if parts.next().is_some() {
        return Err(malformed());
    }
    Ok(AcquisitionTimestamp {
        date,
        time,
        timezone,
    })
}

fn field_value(line: &str) -> Result<&str, MetadataError> {
    let (_, value) = line
        .split_once('=')
        .ok_or_else(|| MetadataError::MalformedLine {
            line: line.to_string(),
        })?;
    Ok(value.trim().trim_matches('"'))
}

fn parse_date(value: &str) -> Result<NaiveDate, MetadataError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| MetadataError::MalformedTimestamp {
        value: value.to_string(),
        expected: "YYYY-MM-DD",
    })
}

fn parse_time(value: &str) -> Result<NaiveTime, MetadataError> {
    NaiveTime::parse_from_str(value, "%H:%M:%S%.f").map_err(|_| {
        MetadataError::MalformedTimestamp {
            value: value.to_string(),
            expected: "HH:MM:SS[.ffffff]",
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_scene(dir: &Path, mtl_name: &str, contents: &str) {
        let mut file = File::create(dir.join(mtl_name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    const MTL_CONTENTS: &str = "\
GROUP = L1_METADATA_FILE
    DATE_ACQUIRED = 2020-01-01
    SCENE_CENTER_TIME = \"17:48:52.7379150Z\"
END_GROUP = L1_METADATA_FILE
";

    #[test]
    fn reads_timestamp_from_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path(), "LC08_MTL.txt", MTL_CONTENTS);

        let timestamp = read_timestamp(dir.path()).unwrap();
        assert_eq!(timestamp.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(
            timestamp.time,
            NaiveTime::from_hms_micro_opt(17, 48, 52, 737_915).unwrap()
        );
        assert_eq!(timestamp.timezone.as_deref(), Some(ZERO_TIMEZONE));
    }

    #[test]
    fn missing_sidecar_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_metadata_file(dir.path()).unwrap_err();
        assert!(matches!(err, MetadataError::MissingSidecar { .. }));
    }

    #[test]
    fn multiple_sidecars_are_fatal() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(dir.path(), "a_MTL.txt", MTL_CONTENTS);
        write_scene(dir.path(), "b_MTL.txt", MTL_CONTENTS);
        let err = find_metadata_file(dir.path()).unwrap_err();
        assert!(matches!(err, MetadataError::MultipleSidecars { count: 2, .. }));
    }

    #[test]
    fn acquisition_date_key_variant_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        write_scene(
            dir.path(),
            "LT05_MTL.txt",
            "ACQUISITION_DATE = 2005-06-09\nSCENE_CENTER_SCAN_TIME = 07:43:41\n",
        );
        let timestamp = read_timestamp(dir.path()).unwrap();
        assert_eq!(timestamp.date, NaiveDate::from_ymd_opt(2005, 6, 9).unwrap());
        assert_eq!(timestamp.timezone, None);
    }

    #[test]
    fn grass_format_pads_and_lowercases() {
        let timestamp = AcquisitionTimestamp {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            time: NaiveTime::from_hms_opt(17, 48, 2).unwrap(),
            timezone: Some(ZERO_TIMEZONE.to_string()),
        };
        assert_eq!(timestamp.grass_format(), "01 jan 2020 17:48:02");

        let fractional = AcquisitionTimestamp {
            time: NaiveTime::from_hms_micro_opt(17, 48, 52, 737_915).unwrap(),
            ..timestamp
        };
        assert_eq!(fractional.grass_format(), "01 jan 2020 17:48:52.737915");
    }

    #[test]
    fn manual_timestamp_round_trips() {
        let timestamp = parse_manual_timestamp("2020-01-01 17:48:52.737915 +0000").unwrap();
        assert_eq!(timestamp.date, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(timestamp.timezone.as_deref(), Some("+0000"));

        assert!(parse_manual_timestamp("2020-01-01").is_err());
        assert!(parse_manual_timestamp("yesterday 12:00:00").is_err());
    }
}
