//! Decoder implementations
//!
//! Each decoder handles a specific input format.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;
use tracing::debug;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the document array
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// Split a parsed input into documents
    fn extract_records(&self, value: Value) -> Result<Vec<Value>> {
        let selected = match &self.record_path {
            Some(path) => extract_path(value, path)
                .ok_or_else(|| Error::decode(format!("record path '{path}' not found")))?,
            None => value,
        };

        match selected {
            Value::Array(documents) => Ok(documents),
            document => Ok(vec![document]),
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let records = self.extract_records(self.decode_raw(body)?)?;
        debug!(records = records.len(), "decoded JSON input");
        Ok(records)
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        serde_json::from_str(body).map_err(|e| Error::decode(format!("Failed to parse JSON: {e}")))
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one document per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::decode(format!("Failed to parse JSONL at line {}: {e}", line_num + 1))
            })?;

            records.push(value);
        }

        debug!(records = records.len(), "decoded JSONL input");
        Ok(records)
    }

    fn decode_raw(&self, body: &str) -> Result<Value> {
        // Return as array
        let records = self.decode(body)?;
        Ok(Value::Array(records))
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Follow a dot path such as `data.items` or `pages[-1].rows`
///
/// A leading `$.` is accepted and ignored. Bracketed indices select array
/// elements, negative indices count from the end.
fn extract_path(mut current: Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);

    for part in path.split('.').filter(|p| !p.is_empty()) {
        let (name, index) = match part.find('[') {
            Some(bracket) => {
                let index = part[bracket + 1..].strip_suffix(']')?.parse::<i64>().ok()?;
                (&part[..bracket], Some(index))
            }
            None => (part, None),
        };

        if !name.is_empty() {
            current = match current {
                Value::Object(mut map) => map.remove(name)?,
                _ => return None,
            };
        }

        if let Some(index) = index {
            let Value::Array(mut items) = current else {
                return None;
            };
            #[allow(clippy::cast_possible_wrap)]
            let position = if index < 0 {
                items.len() as i64 + index
            } else {
                index
            };
            let position = usize::try_from(position).ok()?;
            if position >= items.len() {
                return None;
            }
            current = items.swap_remove(position);
        }
    }

    Some(current)
}
