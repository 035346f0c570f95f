//! Crate-level error type and `Result` alias for stable, structured
//! error handling. Converts underlying I/O, scene-grammar, metadata,
//! and GIS-collaborator errors, and provides semantic variants for
//! argument validation.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("scene error: {0}")]
    Scene(#[from] crate::core::scene::SceneError),

    #[error("metadata error: {0}")]
    Metadata(#[from] crate::io::metadata::MetadataError),

    #[error("GIS collaborator error: {0}")]
    Gis(#[from] crate::io::gis::GisError),
}
