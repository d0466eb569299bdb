// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]

//! # Solidafy DocSchema
//!
//! Schema inference for semi-structured document collections.
//!
//! Documents arrive one at a time as JSON values that may carry MongoDB
//! Extended JSON wrappers (`{"$oid": ...}`, `{"$date": ...}`, ...). Each one
//! is folded into a single aggregate [`Schema`] recording, for every field
//! path, which types were observed, how often, and value statistics per type.
//!
//! ## Features
//!
//! - **Type Classification**: 22 document types, including every Extended JSON wrapper
//! - **Breadth-first Merge**: arbitrarily deep documents without recursion
//! - **Per-type Statistics**: lengths, numeric and date bounds, boolean counts
//! - **Path Queries**: property listings and node lookup by field path
//!
//! ## Quick Start
//!
//! ```rust
//! use solidafy_docschema::{Schema, TypeTag};
//! use serde_json::json;
//!
//! let mut schema = Schema::new();
//! schema.merge(&json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "age": 36}));
//! schema.merge(&json!({"_id": {"$oid": "507f191e810c19729de860ea"}, "age": "n/a"}));
//!
//! let age = schema.property("age").unwrap();
//! assert_eq!(age.occurrence(), 2);
//! assert_eq!(age.types().tags(), vec![TypeTag::Double, TypeTag::String]);
//! assert_eq!(schema.property_names_at_path::<&str>(&[]), vec!["_id", "age"]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  CLI (docschema)      config (YAML)      decode (JSON/JSONL) │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │ documents
//! ┌──────────────────────────────┴───────────────────────────────┐
//! │                SchemaSession (per analysis key)              │
//! └──────────────────────────────┬───────────────────────────────┘
//!                                │
//! ┌────────────┬─────────────────┴──────┬────────────┬───────────┐
//! │  classify  │  schema::merge (queue) │   stats    │  query    │
//! ├────────────┼────────────────────────┼────────────┼───────────┤
//! │ TypeTag    │ Schema                 │ length     │ names     │
//! │ wrappers   │ PropertySchema         │ numeric    │ at path   │
//! │            │ TypeEntry              │ date, bool │           │
//! └────────────┴────────────────────────┴────────────┴───────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]
#![allow(missing_docs)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Document value classification
pub mod classify;

/// Per-type statistics
pub mod stats;

/// Aggregate schema, merge and path queries
pub mod schema;

/// Keyed schema accumulation
pub mod session;

/// Analysis configuration
pub mod config;

/// Input decoders (JSON, JSONL)
pub mod decode;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use classify::{classify, JsonType, TypeTag};
pub use config::SchemaConfig;
pub use error::{Error, Result};
pub use schema::{
    merge, property_names_at_path, schema_at_path, Properties, PropertySchema, Schema, TypeEntry,
    TypeStats,
};
pub use session::{ObserveOutcome, SchemaSession};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
