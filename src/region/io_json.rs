//! Reading and writing session documents.
//!
//! A session document lists the images of one annotation together with
//! their regions. It is what the CLI operates on, and can be stored as
//! JSON or YAML.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::Session;
use crate::error::RegionError;

/// On-disk encoding of a session document.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionFormat {
    Json,
    Yaml,
}

impl SessionFormat {
    /// Parses a format name as given on the command line.
    pub fn parse(name: &str) -> Result<Self, RegionError> {
        match name {
            "json" => Ok(SessionFormat::Json),
            "yaml" | "yml" => Ok(SessionFormat::Yaml),
            other => Err(RegionError::UnsupportedFormat(format!(
                "'{}' (supported: json, yaml)",
                other
            ))),
        }
    }

    /// Picks the format from the file extension, defaulting to JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => SessionFormat::Yaml,
            _ => SessionFormat::Json,
        }
    }
}

/// Reads a session document from a file.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_session(path: &Path, format: SessionFormat) -> Result<Session, RegionError> {
    let file = File::open(path).map_err(RegionError::Io)?;
    let reader = BufReader::new(file);

    match format {
        SessionFormat::Json => {
            serde_json::from_reader(reader).map_err(|source| RegionError::SessionJsonParse {
                path: path.to_path_buf(),
                source,
            })
        }
        SessionFormat::Yaml => {
            serde_yaml::from_reader(reader).map_err(|source| RegionError::SessionYamlParse {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Writes a session document to a file.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_session(path: &Path, session: &Session, format: SessionFormat) -> Result<(), RegionError> {
    let file = File::create(path).map_err(RegionError::Io)?;
    let writer = BufWriter::new(file);

    match format {
        SessionFormat::Json => {
            serde_json::to_writer_pretty(writer, session).map_err(|source| {
                RegionError::SessionJsonWrite {
                    path: path.to_path_buf(),
                    source,
                }
            })
        }
        SessionFormat::Yaml => {
            serde_yaml::to_writer(writer, session).map_err(|source| RegionError::SessionYamlWrite {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

/// Parses a session document from a JSON string.
pub fn from_session_str(json: &str) -> Result<Session, RegionError> {
    serde_json::from_str(json).map_err(|source| RegionError::SessionJsonParse {
        path: Path::new("<string>").to_path_buf(),
        source,
    })
}

/// Parses a session document from JSON bytes.
pub fn from_session_slice(bytes: &[u8]) -> Result<Session, RegionError> {
    serde_json::from_slice(bytes).map_err(|source| RegionError::SessionJsonParse {
        path: Path::new("<bytes>").to_path_buf(),
        source,
    })
}

/// Serializes a session document to a pretty JSON string.
pub fn to_session_string(session: &Session) -> Result<String, RegionError> {
    serde_json::to_string_pretty(session).map_err(|source| RegionError::SessionJsonWrite {
        path: Path::new("<string>").to_path_buf(),
        source,
    })
}
