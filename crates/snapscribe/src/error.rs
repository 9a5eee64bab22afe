use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapscribeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Upload rejected: {0}")]
    Upload(#[from] UploadError),

    #[error("Service error: {0}")]
    Service(#[from] ServiceError),

    #[error("Polling error: {0}")]
    Poll(#[from] PollError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },
}

/// Client-side batch validation failures. The `Display` text is what the
/// upload form shows to the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("No files selected")]
    EmptyBatch,

    #[error("Maximum of {max} files allowed")]
    TooManyFiles { max: usize },

    #[error("{name}: unsupported format")]
    UnsupportedFormat { name: String },

    #[error("{name}: file exceeds {limit}")]
    FileTooLarge { name: String, limit: String },
}

/// Hard failures of a job service. The mock services never produce these;
/// they exist so a real backend client can report transport problems.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Request rejected: {message}")]
    Rejected { message: String },
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Job {job_id} did not reach a terminal status after {polls} polls")]
    Exhausted { job_id: String, polls: usize },
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to flush export output: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SnapscribeError>;
