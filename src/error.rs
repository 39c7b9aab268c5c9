use std::path::PathBuf;
use thiserror::Error;

use crate::region::AttachmentError;
use crate::validation::ValidationReport;

/// The main error type for rectregion operations.
#[derive(Debug, Error)]
pub enum RegionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse session JSON from {path}: {source}")]
    SessionJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write session JSON to {path}: {source}")]
    SessionJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse session YAML from {path}: {source}")]
    SessionYamlParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to write session YAML to {path}: {source}")]
    SessionYamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Failed to serialize export records: {0}")]
    RecordWrite(#[source] serde_json::Error),

    #[error("Failed to serialize validation report: {0}")]
    ReportWrite(#[source] serde_json::Error),

    #[error("Failed to parse export records from {path}: {source}")]
    RecordParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid export record {index}: {message}")]
    InvalidRecord { index: usize, message: String },

    #[error("Invalid export record {index}: {source}")]
    InvalidAttachment {
        index: usize,
        #[source]
        source: AttachmentError,
    },

    #[error("Image '{image}' declares no labeling control tag; cannot resolve from_name for region {region}")]
    MissingControlTag { image: String, region: String },

    #[error("Invalid image size: natural {natural_width}x{natural_height}, display {display_width}x{display_height}")]
    InvalidImageSize {
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    },

    #[error("Image '{image}' has invalid stage size {width}x{height}; cannot normalize region geometry")]
    InvalidStageSize {
        image: String,
        width: f64,
        height: f64,
    },

    #[error("Region {0} not found")]
    RegionNotFound(String),

    #[error("Image #{0} not found in session")]
    ImageNotFound(usize),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
