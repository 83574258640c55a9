use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum VorschauError {
    #[error("Config file not found: {path} (run `vorschau init` to create one)")]
    ConfigNotFound { path: PathBuf },

    #[error("Invalid config: {message}")]
    ConfigInvalid { message: String },

    #[error("Cannot read package manifest {path}: {message}")]
    Manifest { path: PathBuf, message: String },

    #[error("Failed to patch {path}: {message}")]
    Patch { path: PathBuf, message: String },

    #[error("Restore failed: {0}")]
    Restore(String),

    #[error("Build failed: {0}")]
    Build(String),

    #[error("git error: {0}")]
    Git(String),

    #[error("Hosting API error: {0}")]
    Hosting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VorschauError>;
