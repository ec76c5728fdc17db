//! Scene export
//!
//! Serializes the entity pool into versioned JSON or XML documents. Only the
//! logical content is written: id, kind tag, position, color and logic
//! state of every entity, ordered by id.

pub mod json;
pub mod xml;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

use crate::scene::Entity;

/// Version string written into every exported document
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Export errors
#[derive(Error, Debug)]
pub enum ExportError {
    /// The document could not be serialized
    #[error("Failed to serialize scene: {0}")]
    Serialize(String),

    /// Writing the file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Format name not recognized
    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),
}

/// Document format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// JSON document
    Json,
    /// XML document
    Xml,
}

impl ExportFormat {
    /// Conventional file extension
    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "xml" => Ok(Self::Xml),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Serialize `entities` in the given format
pub fn export(entities: &[Entity], format: ExportFormat) -> Result<String, ExportError> {
    match format {
        ExportFormat::Json => json::to_json(entities),
        ExportFormat::Xml => xml::to_xml(entities),
    }
}

/// Serialize `entities` and write them to `path`
pub fn save_to_file(entities: &[Entity], path: impl AsRef<Path>, format: ExportFormat) -> Result<(), ExportError> {
    let document = export(entities, format)?;
    std::fs::write(path, document)?;
    Ok(())
}

/// Entities ordered by id
fn sorted(entities: &[Entity]) -> Vec<&Entity> {
    let mut ordered: Vec<&Entity> = entities.iter().collect();
    ordered.sort_by(|a, b| a.id().cmp(b.id()));
    ordered
}
