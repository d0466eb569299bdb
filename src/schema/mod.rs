//! Aggregate schema module
//!
//! Builds one schema tree from many semi-structured documents.
//!
//! # Features
//!
//! - **Breadth-first merge**: nested objects and arrays are folded from an
//!   explicit queue, so document depth never grows the call stack
//! - **Occurrence counting**: per field, per type tag and per document
//! - **Per-type statistics**: length, value, date and boolean bounds
//! - **Path queries**: property listing and lookup by dotted field path

mod merge;
mod query;
mod types;

pub use merge::merge;
pub use query::{
    property_names_at_path, property_names_at_path_with_id, schema_at_path, DEFAULT_ID_FIELD,
};
pub use types::{
    ArrayStats, ObjectStats, Properties, PropertySchema, Schema, TypeEntries, TypeEntry,
    TypeStats,
};

#[cfg(test)]
mod tests;
