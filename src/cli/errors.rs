use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("No scenes to process: provide --scene or --pool")]
    MissingScene,

    #[error("Invalid band token: {token}. Expected a band number 1-11 or 'QA'")]
    InvalidBand { token: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("import error: {0}")]
    Import(#[from] landscene::Error),
}
