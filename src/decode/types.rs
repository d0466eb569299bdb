//! Decoder types and traits
//!
//! Defines the core decoder abstractions.

use super::decoders::{JsonDecoder, JsonlDecoder};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format of the input text
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum DecoderFormat {
    /// A JSON document or array of documents (default)
    #[default]
    Json,
    /// JSON Lines, one document per line
    Jsonl,
}

/// Configuration for decoding input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Input format
    pub format: DecoderFormat,
    /// Dot path to the document array inside a JSON envelope
    pub record_path: Option<String>,
}

impl DecoderConfig {
    /// Create a JSON decoder config
    pub fn json() -> Self {
        Self {
            format: DecoderFormat::Json,
            ..Default::default()
        }
    }

    /// Create a JSON decoder config with a record path
    pub fn json_with_path(path: impl Into<String>) -> Self {
        Self {
            format: DecoderFormat::Json,
            record_path: Some(path.into()),
        }
    }

    /// Create a JSONL decoder config
    pub fn jsonl() -> Self {
        Self {
            format: DecoderFormat::Jsonl,
            ..Default::default()
        }
    }

    /// Set the record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Build the decoder this config describes
    ///
    /// The record path only applies to JSON input.
    pub fn build(&self) -> Box<dyn RecordDecoder> {
        match (self.format, &self.record_path) {
            (DecoderFormat::Json, Some(path)) => Box::new(JsonDecoder::with_path(path)),
            (DecoderFormat::Json, None) => Box::new(JsonDecoder::new()),
            (DecoderFormat::Jsonl, _) => Box::new(JsonlDecoder::new()),
        }
    }
}

/// Trait for decoding input text into documents
pub trait RecordDecoder: Send + Sync {
    /// Decode the input into a list of documents
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Decode the input into a single JSON value (full input)
    fn decode_raw(&self, body: &str) -> Result<Value>;
}
