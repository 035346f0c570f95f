use serde::{Deserialize, Serialize};

use crate::types::BandToken;

/// Default memory budget handed to the raster importer, in megabytes.
pub const MEMORY_DEFAULT_MB: usize = 300;

/// Import options threaded explicitly through the planning pipeline —
/// one immutable value per run instead of ambient process-wide flags.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Explicitly requested band tokens.
    pub bands: Vec<BandToken>,
    /// Semantic band-set names; when both `bands` and `sets` are empty
    /// the planner falls back to `all`.
    pub sets: Vec<String>,
    /// Import every scene into this one mapset instead of one mapset
    /// per scene; band names get the scene prefix to avoid collisions.
    pub shared_mapset: Option<String>,
    /// Pass the projection-override flag to the raster importer.
    pub override_projection: bool,
    /// Memory budget for the raster importer, in megabytes.
    pub memory_mb: usize,
    /// Leave bands alone when they already exist in the target mapset.
    pub skip_existing: bool,
    /// Re-import bands that already exist.
    pub overwrite: bool,
    /// Re-stamp skipped bands with the scene timestamp.
    pub force_timestamp: bool,
    /// Attach the acquisition timestamp to imported bands.
    pub timestamp_bands: bool,
    /// Manual timestamp string overriding the MTL sidecar.
    pub manual_timestamp: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            bands: Vec::new(),
            sets: Vec::new(),
            shared_mapset: None,
            override_projection: false,
            memory_mb: MEMORY_DEFAULT_MB,
            skip_existing: false,
            overwrite: false,
            force_timestamp: false,
            timestamp_bands: true,
            manual_timestamp: None,
        }
    }
}
