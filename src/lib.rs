#![doc = r#"
LANDSCENE — a Landsat scene identifier parser and band-selection engine.

This crate recognizes the two historical Landsat product-naming schemes
(Pre-Collection and Collection 1), parses scene identifiers into typed
records, expands semantic band-set names (`visible`, `tirs`, `ndvi`, ...)
into concrete band numbers per sensor family, matches requested bands
against on-disk filenames with scheme-specific templates, and produces a
deterministically ordered import plan for an external GIS toolkit. It
powers the `landscene` CLI and can be embedded in your own applications.

The raster importer itself is an external collaborator: this crate only
plans, validates, and orders what to import, and drives implementations
of the narrow contracts in [`io::gis`].

Quick start: classify and parse a scene identifier
--------------------------------------------------
```rust
use landscene::{classify, NamingScheme, SceneIdentifier, SensorFamily};

fn main() -> landscene::Result<()> {
    let id = "LC08_L1TP_034032_20200101_20200110_01_T1";
    assert_eq!(classify(id)?, NamingScheme::Collection1);

    let scene = SceneIdentifier::parse(id)?;
    assert_eq!(scene.family(), SensorFamily::OliTirs);
    Ok(())
}
```

Plan a scene directory
----------------------
```rust,no_run
use std::path::Path;
use landscene::{plan_scene, execute_plan, ImportOptions};
use landscene::io::gis::{FsDirectoryLister, LoggingGis};

fn main() -> landscene::Result<()> {
    let options = ImportOptions {
        sets: vec!["visible".to_string()],
        ..ImportOptions::default()
    };

    let plan = plan_scene(
        Path::new("/data/LC08_L1TP_034032_20200101_20200110_01_T1"),
        &FsDirectoryLister,
        &options,
    )?;
    for band in &plan.bands {
        println!("{}\t{}", band.band, band.filename);
    }

    let mut gis = LoggingGis;
    execute_plan(&plan, &mut gis, &options)?;
    Ok(())
}
```

Error handling
--------------
All public functions return [`Result`]; match on [`Error`] to handle
specific cases. Classification failures, unknown band sets, and misnamed
metadata sidecars are fatal for the scene and surface before any import
side effect; a band merely absent from a scene is only omitted from the
plan.

Useful modules
--------------
- [`core`] — identifier grammar, classifier, band engine.
- [`api`] — plan/execute entry points.
- [`io`] — metadata sidecar parsing and GIS collaborator contracts.
- [`types`] — shared enums (`NamingScheme`, `BandToken`, ...).
- [`error`] — crate-level `Error` and `Result`.
"#]

// Core modules (public)
pub mod api;
pub mod core;
pub mod error;
pub mod io;
pub mod types;

// Curated public API surface
// Types
pub use crate::core::params::{ImportOptions, MEMORY_DEFAULT_MB};
pub use crate::core::scene::{SceneError, SceneIdentifier};
pub use error::{Error, Result};
pub use types::{
    BandToken, BandValue, CollectionCategory, CorrectionLevel, NamingScheme, Sensor, SensorFamily,
};

// Parsing and band selection
pub use crate::core::bands::{
    extract_name_band, match_band_filenames, resolve_band_sets, sort_band_filenames,
};
pub use crate::core::scene::classify;

// Metadata sidecar helpers
pub use io::metadata::{
    AcquisitionTimestamp, MetadataError, find_metadata_file, parse_manual_timestamp,
    read_timestamp,
};

// High-level API re-exports
pub use api::{ImportReport, PlannedBand, ScenePlan, execute_plan, plan_scene};
