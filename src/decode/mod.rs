//! Document decoder module
//!
//! Supports: JSON, JSONL
//!
//! # Overview
//!
//! Turns raw input text into the documents fed to the schema merge. JSON
//! input may be a single document, an array of documents, or an array
//! embedded in an envelope and selected with a dot path.

mod decoders;
mod types;

pub use decoders::{JsonDecoder, JsonlDecoder};
pub use types::{DecoderConfig, DecoderFormat, RecordDecoder};
