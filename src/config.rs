//! Configuration for schema analysis runs
//!
//! Loaded from an optional YAML file. Every field has a default, so an empty
//! file is a valid configuration. Command-line flags override file values.

use crate::decode::{DecoderConfig, DecoderFormat};
use crate::error::{Error, Result};
use crate::schema::DEFAULT_ID_FIELD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Schema analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    /// Identifier field listed first in property listings
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Stop after this many documents (sampling cap)
    #[serde(default)]
    pub max_documents: Option<u64>,

    /// Dot path to the document array inside a JSON envelope
    #[serde(default)]
    pub record_path: Option<String>,

    /// Input format
    #[serde(default)]
    pub format: DecoderFormat,
}

fn default_id_field() -> String {
    DEFAULT_ID_FIELD.to_string()
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            max_documents: None,
            record_path: None,
            format: DecoderFormat::default(),
        }
    }
}

impl SchemaConfig {
    /// Load a configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::Io(e)
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse a configuration from YAML text
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        // An empty document deserializes as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.id_field.is_empty() {
            return Err(Error::config("id_field cannot be empty"));
        }
        if self.max_documents == Some(0) {
            return Err(Error::config("max_documents must be greater than zero"));
        }
        if self.record_path.as_deref().is_some_and(str::is_empty) {
            return Err(Error::config("record_path cannot be empty"));
        }
        Ok(())
    }

    /// Decoder settings derived from this configuration
    pub fn decoder_config(&self) -> DecoderConfig {
        DecoderConfig {
            format: self.format,
            record_path: self.record_path.clone(),
        }
    }
}
