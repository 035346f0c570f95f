//! Core parsing and band-selection layer: the identifier grammar, the
//! scene classifier, band-set resolution, filename matching, band
//! extraction, and the deterministic result ordering.
pub mod bands;
pub mod identifiers;
pub mod params;
pub mod scene;

pub use bands::{
    extract_name_band, match_band_filenames, resolve_band_sets, sort_band_filenames,
};
pub use params::ImportOptions;
pub use scene::{SceneError, SceneIdentifier, classify};
