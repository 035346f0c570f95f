use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use landscene::io::gis::{FsDirectoryLister, LoggingGis};
use landscene::{ImportOptions, execute_plan, plan_scene};

use super::args::CliArgs;
use super::errors::AppError;

fn import_options(args: &CliArgs) -> Result<ImportOptions, AppError> {
    let mut bands = Vec::new();
    for token in &args.bands {
        bands.push(token.parse().map_err(|_| AppError::InvalidBand {
            token: token.clone(),
        })?);
    }
    Ok(ImportOptions {
        bands,
        sets: args.sets.clone(),
        shared_mapset: args.mapset.clone(),
        override_projection: args.override_projection,
        memory_mb: args.memory,
        skip_existing: args.skip_existing,
        overwrite: args.overwrite,
        force_timestamp: args.force_timestamp,
        timestamp_bands: !args.no_timestamp,
        manual_timestamp: args.timestamp.clone(),
    })
}

fn process_scene(
    scene: &Path,
    options: &ImportOptions,
    args: &CliArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let plan = plan_scene(scene, &FsDirectoryLister, options).map_err(AppError::Import)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    if args.list_timestamps {
        if let Some(timestamp) = &plan.timestamp {
            println!("{}|{}", plan.base_name, timestamp.grass_format());
        }
        return Ok(());
    }

    println!("Scene {}: {}", plan.base_name, plan.identifier);
    if let Some(timestamp) = &plan.timestamp {
        println!("Acquired {}", timestamp.grass_format());
    }
    println!("Target mapset @{}", plan.mapset);
    println!("Band\tFilename");
    for band in &plan.bands {
        println!("{}\t{}", band.band, band.filename);
    }

    if args.list_bands || args.dry_run {
        return Ok(());
    }

    let mut gis = LoggingGis;
    let report = execute_plan(&plan, &mut gis, options)?;
    info!(
        "Scene {} imported in {}: {} bands imported, {} skipped",
        plan.base_name, plan.mapset, report.imported, report.skipped
    );
    Ok(())
}

pub fn run(args: CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if args.log {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let options = import_options(&args)?;

    let mut scenes: Vec<PathBuf> = args.scene.clone();
    if let Some(pool) = &args.pool {
        for entry in fs::read_dir(pool).map_err(AppError::Io)? {
            let path = entry.map_err(AppError::Io)?.path();
            if path.is_dir() {
                scenes.push(path);
            } else {
                info!("Skipping non-directory: {:?}", path);
            }
        }
    }
    if scenes.is_empty() {
        return Err(AppError::MissingScene.into());
    }

    if scenes.len() == 1 {
        process_scene(&scenes[0], &options, &args)?;
        return Ok(());
    }

    let mut processed = 0usize;
    let mut errors = 0usize;
    for scene in &scenes {
        match process_scene(scene, &options, &args) {
            Ok(()) => processed += 1,
            Err(e) => {
                warn!("Error processing {:?}: {}", scene, e);
                errors += 1;
            }
        }
    }
    info!("Processed: {processed}");
    info!("Errors: {errors}");

    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use landscene::BandToken;

    #[test]
    fn options_mirror_the_arguments() {
        let args = CliArgs::parse_from([
            "landscene",
            "--scene",
            "LC08_L1TP_034032_20200101_20200110_01_T1",
            "--bands",
            "2,QA",
            "--mapset",
            "landsat",
            "--memory",
            "500",
            "--no-timestamp",
            "--skip-existing",
        ]);
        let options = import_options(&args).unwrap();
        assert_eq!(options.bands, vec![BandToken::Number(2), BandToken::Qa]);
        assert_eq!(options.shared_mapset.as_deref(), Some("landsat"));
        assert_eq!(options.memory_mb, 500);
        assert!(!options.timestamp_bands);
        assert!(options.skip_existing);
    }

    #[test]
    fn bad_band_tokens_are_rejected() {
        let args = CliArgs::parse_from(["landscene", "--bands", "B2"]);
        let err = import_options(&args).unwrap_err();
        assert!(matches!(err, AppError::InvalidBand { .. }));
    }
}
