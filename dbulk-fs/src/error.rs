use thiserror::Error;

/// Any filesystem error other than "not found" is fatal.
#[derive(Debug, Error)]
#[error("fatal filesystem error on {path}: {source}")]
pub struct FatalError {
    pub path: std::path::PathBuf,
    #[source]
    pub source: std::io::Error,
}
