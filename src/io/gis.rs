//! Contracts for the external GIS collaborators: directory listing,
//! raster import, existence checks, and timestamp registration.
//!
//! The crate plans imports; the toolkit that actually writes rasters
//! lives behind these traits. [`FsDirectoryLister`] is the one concrete
//! filesystem implementation shipped here; [`LoggingGis`] reports what
//! would happen (used by the CLI), and [`RecordingGis`] captures calls
//! for tests and embedders.
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

/// Errors reported back by a GIS collaborator implementation.
#[derive(Debug, Error)]
pub enum GisError {
    #[error("raster import failed for {name}: {reason}")]
    ImportFailed { name: String, reason: String },

    #[error("timestamp registration failed for {name}: {reason}")]
    TimestampFailed { name: String, reason: String },
}

/// One raster-import request, in the order the plan emits them.
#[derive(Debug, Clone)]
pub struct ImportRequest<'a> {
    pub source: &'a Path,
    pub name: &'a str,
    pub mapset: &'a str,
    pub title: &'a str,
    pub memory_mb: usize,
    pub override_projection: bool,
}

/// Supplies the flat listing of a scene directory: basenames only, no
/// recursion.
pub trait DirectoryLister {
    fn list(&self, scene: &Path) -> std::io::Result<Vec<String>>;
}

/// Imports one band file into the destination namespace.
pub trait RasterImporter {
    fn import(&mut self, request: &ImportRequest<'_>) -> Result<(), GisError>;
}

/// Reports whether a destination band name already exists; the
/// orchestrator applies the skip/overwrite policy on top.
pub trait ExistenceChecker {
    fn exists(&self, name: &str, mapset: &str) -> bool;
}

/// Attaches a date/time to an imported band.
pub trait TimestampSetter {
    fn set_timestamp(&mut self, name: &str, timestamp: &str) -> Result<(), GisError>;
}

/// Standard-library directory lister.
#[derive(Debug, Default)]
pub struct FsDirectoryLister;

impl DirectoryLister for FsDirectoryLister {
    fn list(&self, scene: &Path) -> std::io::Result<Vec<String>> {
        let mut entries = Vec::new();
        for entry in fs::read_dir(scene)? {
            entries.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(entries)
    }
}

/// Collaborator that only narrates what it is asked to do. The CLI uses
/// it so plans are visible without a GIS toolkit attached.
#[derive(Debug, Default)]
pub struct LoggingGis;

impl RasterImporter for LoggingGis {
    fn import(&mut self, request: &ImportRequest<'_>) -> Result<(), GisError> {
        info!(
            "import {:?} -> {} @{} ({}, memory {} MB{})",
            request.source,
            request.name,
            request.mapset,
            request.title,
            request.memory_mb,
            if request.override_projection {
                ", projection check overridden"
            } else {
                ""
            }
        );
        Ok(())
    }
}

impl ExistenceChecker for LoggingGis {
    fn exists(&self, _name: &str, _mapset: &str) -> bool {
        false
    }
}

impl TimestampSetter for LoggingGis {
    fn set_timestamp(&mut self, name: &str, timestamp: &str) -> Result<(), GisError> {
        info!("timestamp {name} <- {timestamp}");
        Ok(())
    }
}

/// Collaborator that records every call; the set of pre-existing band
/// names is under the caller's control.
#[derive(Debug, Default)]
pub struct RecordingGis {
    pub existing: BTreeSet<String>,
    pub imported: Vec<(PathBuf, String, String)>,
    pub stamped: Vec<(String, String)>,
}

impl RasterImporter for RecordingGis {
    fn import(&mut self, request: &ImportRequest<'_>) -> Result<(), GisError> {
        self.imported.push((
            request.source.to_path_buf(),
            request.name.to_string(),
            request.mapset.to_string(),
        ));
        Ok(())
    }
}

impl ExistenceChecker for RecordingGis {
    fn exists(&self, name: &str, _mapset: &str) -> bool {
        self.existing.contains(name)
    }
}

impl TimestampSetter for RecordingGis {
    fn set_timestamp(&mut self, name: &str, timestamp: &str) -> Result<(), GisError> {
        self.stamped.push((name.to_string(), timestamp.to_string()));
        Ok(())
    }
}
