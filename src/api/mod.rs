//! High-level entry points: build a validated per-scene import plan,
//! then execute it against the external GIS collaborators. Planning is
//! pure; every fatal condition (classification, band-set lookup,
//! misnamed metadata, grammar ambiguity) surfaces before the first
//! externally visible import call.
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::bands::{extract_name_band, match_band_filenames, resolve_band_sets};
use crate::core::identifiers::{GEOTIFF_EXTENSION, METADATA_MARKER};
use crate::core::params::ImportOptions;
use crate::core::scene::{SceneError, SceneIdentifier};
use crate::error::Result;
use crate::io::gis::{
    DirectoryLister, ExistenceChecker, ImportRequest, RasterImporter, TimestampSetter,
};
use crate::io::metadata::{AcquisitionTimestamp, parse_manual_timestamp, read_timestamp};
use crate::types::{BandToken, BandValue};

/// One band scheduled for import.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PlannedBand {
    pub filename: String,
    /// Destination raster name (scene-prefixed in single-mapset mode).
    pub name: String,
    pub band: BandValue,
    pub title: String,
}

/// Fully validated import plan for one scene, in final band order.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ScenePlan {
    pub scene: PathBuf,
    pub base_name: String,
    pub identifier: SceneIdentifier,
    pub mapset: String,
    pub bands: Vec<PlannedBand>,
    pub timestamp: Option<AcquisitionTimestamp>,
}

/// Outcome of executing a plan against the collaborators.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: usize,
    pub stamped: usize,
}

/// Base name of a scene path with any container extension stripped.
fn scene_base_name(scene: &Path) -> String {
    let name = scene
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    for container in [".tar.gz", ".tgz", ".tar"] {
        if let Some(stripped) = name.strip_suffix(container) {
            return stripped.to_string();
        }
    }
    name
}

/// Classify, resolve, match, extract, and order everything needed to
/// import one scene. No import side effects happen here.
pub fn plan_scene(
    scene: &Path,
    lister: &dyn DirectoryLister,
    options: &ImportOptions,
) -> Result<ScenePlan> {
    let base_name = scene_base_name(scene);
    let identifier = SceneIdentifier::parse(&base_name)?;
    info!("Scene {base_name}: {identifier}");

    let mut tokens: BTreeSet<BandToken> = options.bands.iter().copied().collect();
    let mut sets = options.sets.clone();
    if tokens.is_empty() && sets.is_empty() {
        sets.push("all".to_string());
    }
    if !sets.is_empty() {
        tokens.extend(resolve_band_sets(&sets, identifier.family())?);
    }

    let listing = lister.list(scene)?;

    // A metadata file wearing the image extension poisons the whole
    // scene; refuse before any band is even matched.
    for filename in &listing {
        if filename.contains(METADATA_MARKER) && filename.ends_with(GEOTIFF_EXTENSION) {
            return Err(SceneError::MisnamedMetadataFile {
                filename: filename.clone(),
            }
            .into());
        }
    }

    let filenames = match_band_filenames(&tokens, &listing, identifier.scheme())?;

    let single_mapset = options.shared_mapset.is_some();
    let mapset = options
        .shared_mapset
        .clone()
        .unwrap_or_else(|| base_name.clone());

    let mut bands = Vec::with_capacity(filenames.len());
    for filename in &filenames {
        if !filename.ends_with(GEOTIFF_EXTENSION) {
            continue;
        }
        let (name, band) = extract_name_band(scene, filename, single_mapset)?;
        let title = format!("band {band}");
        bands.push(PlannedBand {
            filename: filename.clone(),
            name,
            band,
            title,
        });
    }

    let timestamp = if !options.timestamp_bands {
        None
    } else if let Some(manual) = &options.manual_timestamp {
        Some(parse_manual_timestamp(manual)?)
    } else {
        Some(read_timestamp(scene)?)
    };

    Ok(ScenePlan {
        scene: scene.to_path_buf(),
        base_name,
        identifier,
        mapset,
        bands,
        timestamp,
    })
}

/// Drive the collaborators through a validated plan, band by band in
/// plan order, applying the skip/overwrite policy from the options.
pub fn execute_plan<G>(plan: &ScenePlan, gis: &mut G, options: &ImportOptions) -> Result<ImportReport>
where
    G: RasterImporter + ExistenceChecker + TimestampSetter + ?Sized,
{
    let mut report = ImportReport::default();

    for planned in &plan.bands {
        let exists = gis.exists(&planned.name, &plan.mapset);
        if exists && options.skip_existing && !options.overwrite {
            if options.force_timestamp {
                if let Some(timestamp) = &plan.timestamp {
                    gis.set_timestamp(&planned.name, &timestamp.grass_format())?;
                    report.stamped += 1;
                }
            }
            info!("{}\t{}\t [ Exists, skipping ]", planned.band, planned.filename);
            report.skipped += 1;
            continue;
        }
        if exists && options.overwrite {
            info!(
                "{}\t{}\t [ Exists, overwriting ]",
                planned.band, planned.filename
            );
        }

        let source = plan.scene.join(&planned.filename);
        gis.import(&ImportRequest {
            source: &source,
            name: &planned.name,
            mapset: &plan.mapset,
            title: &planned.title,
            memory_mb: options.memory_mb,
            override_projection: options.override_projection,
        })?;
        report.imported += 1;

        if let Some(timestamp) = &plan.timestamp {
            gis.set_timestamp(&planned.name, &timestamp.grass_format())?;
            report.stamped += 1;
        }
    }

    info!(
        "Scene {} planned into {}: {} imported, {} skipped",
        plan.base_name, plan.mapset, report.imported, report.skipped
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticLister(Vec<String>);

    impl DirectoryLister for StaticLister {
        fn list(&self, _scene: &Path) -> std::io::Result<Vec<String>> {
            Ok(self.0.clone())
        }
    }

    const SCENE_C1: &str = "LC08_L1TP_034032_20200101_20200110_01_T1";

    fn options_without_timestamps() -> ImportOptions {
        ImportOptions {
            timestamp_bands: false,
            ..ImportOptions::default()
        }
    }

    #[test]
    fn scene_base_name_strips_container_extensions() {
        assert_eq!(
            scene_base_name(Path::new("/data/LC81840332014146LGN00.tar.gz")),
            "LC81840332014146LGN00"
        );
        assert_eq!(scene_base_name(Path::new(SCENE_C1)), SCENE_C1);
    }

    #[test]
    fn plan_resolves_visible_set_in_band_order() {
        let lister = StaticLister(vec![
            format!("{SCENE_C1}_B4.TIF"),
            format!("{SCENE_C1}_B2.TIF"),
            format!("{SCENE_C1}_B3.TIF"),
            format!("{SCENE_C1}_B10.TIF"),
        ]);
        let options = ImportOptions {
            sets: vec!["visible".to_string()],
            ..options_without_timestamps()
        };
        let plan = plan_scene(Path::new(SCENE_C1), &lister, &options).unwrap();
        assert_eq!(plan.mapset, SCENE_C1);
        let names: Vec<&str> = plan.bands.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["B2", "B3", "B4"]);
        assert_eq!(plan.bands[0].band, BandValue::Number(2));
        assert_eq!(plan.bands[0].title, "band 2");
    }

    #[test]
    fn plan_fails_before_import_on_misnamed_metadata() {
        let lister = StaticLister(vec![
            format!("{SCENE_C1}_B2.TIF"),
            format!("{SCENE_C1}_MTL.TIF"),
        ]);
        let err = plan_scene(Path::new(SCENE_C1), &lister, &options_without_timestamps())
            .unwrap_err();
        assert!(err.to_string().contains("MTL.TIF"));
    }

    #[test]
    fn plan_uses_manual_timestamp_when_given() {
        let lister = StaticLister(vec![format!("{SCENE_C1}_B2.TIF")]);
        let options = ImportOptions {
            bands: vec![BandToken::Number(2)],
            manual_timestamp: Some("2020-01-01 17:48:52".to_string()),
            ..ImportOptions::default()
        };
        let plan = plan_scene(Path::new(SCENE_C1), &lister, &options).unwrap();
        let timestamp = plan.timestamp.unwrap();
        assert_eq!(timestamp.grass_format(), "01 jan 2020 17:48:52");
    }

    #[test]
    fn execute_respects_skip_existing_policy() {
        use crate::io::gis::RecordingGis;

        let lister = StaticLister(vec![
            format!("{SCENE_C1}_B2.TIF"),
            format!("{SCENE_C1}_B3.TIF"),
        ]);
        let options = ImportOptions {
            sets: vec!["visible".to_string()],
            skip_existing: true,
            ..options_without_timestamps()
        };
        let plan = plan_scene(Path::new(SCENE_C1), &lister, &options).unwrap();

        let mut gis = RecordingGis::default();
        gis.existing.insert("B2".to_string());
        let report = execute_plan(&plan, &mut gis, &options).unwrap();
        assert_eq!(report.imported, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(gis.imported.len(), 1);
        assert_eq!(gis.imported[0].1, "B3");
    }

    #[test]
    fn shared_mapset_prefixes_names_and_retargets() {
        let lister = StaticLister(vec![format!("{SCENE_C1}_B2.TIF")]);
        let options = ImportOptions {
            bands: vec![BandToken::Number(2)],
            shared_mapset: Some("landsat".to_string()),
            ..options_without_timestamps()
        };
        let plan = plan_scene(Path::new(SCENE_C1), &lister, &options).unwrap();
        assert_eq!(plan.mapset, "landsat");
        assert_eq!(plan.bands[0].name, format!("{SCENE_C1}_B2"));
    }
}
