use clap::Parser;
use std::path::PathBuf;

use landscene::MEMORY_DEFAULT_MB;

#[derive(Parser)]
#[command(name = "landscene", version, about = "Landsat scene band selection and import planning")]
pub struct CliArgs {
    /// Landsat scene directory (repeat for multiple scenes)
    #[arg(short, long)]
    pub scene: Vec<PathBuf>,

    /// Directory containing multiple unpacked scenes as subdirectories
    #[arg(long)]
    pub pool: Option<PathBuf>,

    /// Band tokens to import (e.g. 2,3,4,QA)
    #[arg(short, long, value_delimiter = ',')]
    pub bands: Vec<String>,

    /// Semantic band sets (all, visible, infrared, tirs, oli, ndvi,
    /// shortwave, panchromatic, coastal, bqa); defaults to 'all' when
    /// neither --bands nor --sets is given
    #[arg(long, value_delimiter = ',')]
    pub sets: Vec<String>,

    /// Import every scene into this single mapset instead of one
    /// mapset per scene
    #[arg(long)]
    pub mapset: Option<String>,

    /// Override the projection check in the raster importer
    #[arg(short = 'o', long, default_value_t = false)]
    pub override_projection: bool,

    /// Memory budget passed to the raster importer, in MB
    #[arg(long, default_value_t = MEMORY_DEFAULT_MB)]
    pub memory: usize,

    /// Leave bands alone when they already exist in the target mapset
    #[arg(long, default_value_t = false)]
    pub skip_existing: bool,

    /// Re-import bands that already exist
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Re-stamp skipped bands with the scene timestamp
    #[arg(long, default_value_t = false)]
    pub force_timestamp: bool,

    /// Do not attach timestamps to imported bands
    #[arg(long, default_value_t = false)]
    pub no_timestamp: bool,

    /// Manual timestamp (YYYY-MM-DD HH:MM:SS[.ffffff] [+ZZZZ])
    /// overriding the MTL sidecar
    #[arg(long)]
    pub timestamp: Option<String>,

    /// List matched band filenames and exit without importing
    #[arg(long, default_value_t = false)]
    pub list_bands: bool,

    /// List scene timestamps and exit
    #[arg(long, default_value_t = false)]
    pub list_timestamps: bool,

    /// Plan only: report what would be imported
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Emit scene plans as JSON
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Enable logging
    #[arg(long, default_value_t = false)]
    pub log: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_comma_separated_bands_and_sets() {
        let args = CliArgs::parse_from([
            "landscene",
            "--scene",
            "LC08_L1TP_034032_20200101_20200110_01_T1",
            "--bands",
            "2,3,QA",
            "--sets",
            "tirs",
            "--dry-run",
        ]);
        assert_eq!(args.scene.len(), 1);
        assert_eq!(args.bands, vec!["2", "3", "QA"]);
        assert_eq!(args.sets, vec!["tirs"]);
        assert!(args.dry_run);
        assert_eq!(args.memory, MEMORY_DEFAULT_MB);
    }
}
