//! Reading Swagger documents from disk.
//!
//! Files ending in `.yaml` or `.yml` are read as YAML, everything else as JSON.
//! YAML mappings may use integer keys (response status codes usually are), so
//! YAML is parsed into its own value type first and then converted, which turns
//! those keys into strings.

use crate::error::{Error, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::path::Path;

/// Text format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Yaml,
}

impl SourceFormat {
    /// Picks the format from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                SourceFormat::Yaml
            }
            _ => SourceFormat::Json,
        }
    }
}

/// Reads and parses the document at `path`.
pub fn load_document(path: &Path) -> Result<Value> {
    debug!("Loading document {}", path.display());
    let content = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&content, SourceFormat::from_path(path)).map_err(|err| Error::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Parses document text in the given format.
pub fn parse_document(content: &str, format: SourceFormat) -> Result<Value> {
    match format {
        SourceFormat::Json => Ok(serde_json::from_str(content)?),
        SourceFormat::Yaml => {
            let yaml: serde_yaml::Value = serde_yaml::from_str(content)?;
            Ok(serde_json::to_value(yaml)?)
        }
    }
}
