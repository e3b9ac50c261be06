use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Failed to read {path}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed SPDX license table: {path} - {message}")]
    SpdxTableError { path: String, message: String },

    #[error("Malformed license manifest: {path} - {message}")]
    ManifestError { path: String, message: String },

    #[error("License classifier failed on {path}: {message}")]
    ClassifierError { path: String, message: String },

    #[error("Source-control query failed in {path}: {message}")]
    GitError { path: String, message: String },

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;
