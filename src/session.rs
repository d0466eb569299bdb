//! Keyed schema accumulation
//!
//! A [`SchemaSession`] owns one aggregate [`Schema`] for one analysis key
//! (typically the query text that produced the documents). Observing a
//! document under a different key discards the schema and starts over.

use crate::schema::Schema;
use serde_json::Value;
use tracing::{debug, info};

/// What happened when a document was observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObserveOutcome {
    /// First document for a fresh session
    Started,

    /// Merged into the schema of the current key
    Merged,

    /// Key changed: previous schema discarded, document merged into a new one
    Reset { previous: String },

    /// Document cap reached for this key, document ignored
    Capped,
}

/// Schema accumulator bound to an analysis key
#[derive(Debug, Clone, Default)]
pub struct SchemaSession {
    key: Option<String>,
    schema: Schema,
    /// Stop merging after this many documents per key
    max_documents: Option<u64>,
}

impl SchemaSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session that ignores documents past `max_documents` per key
    pub fn with_max_documents(max_documents: Option<u64>) -> Self {
        Self {
            max_documents,
            ..Self::default()
        }
    }

    /// Merge `document` under `key`
    ///
    /// The key is settled first (start or reset), then the cap is checked, so
    /// a cap of zero merges nothing under any key.
    pub fn observe(&mut self, key: &str, document: &Value) -> ObserveOutcome {
        let outcome = match self.key.as_deref() {
            None => {
                self.key = Some(key.to_string());
                ObserveOutcome::Started
            }
            Some(current) if current == key => ObserveOutcome::Merged,
            Some(_) => {
                let previous = self.key.replace(key.to_string()).unwrap_or_default();
                info!(
                    previous = %previous,
                    key,
                    discarded = self.schema.documents_inspected(),
                    "analysis key changed, resetting schema"
                );
                self.schema = Schema::new();
                ObserveOutcome::Reset { previous }
            }
        };

        if self.is_capped() {
            debug!(
                key,
                documents = self.schema.documents_inspected(),
                "document cap reached, skipping"
            );
            return ObserveOutcome::Capped;
        }

        self.schema.merge(document);
        outcome
    }

    /// Drop the key and the accumulated schema
    pub fn reset(&mut self) {
        self.key = None;
        self.schema = Schema::new();
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn documents_inspected(&self) -> u64 {
        self.schema.documents_inspected()
    }

    /// Whether the document cap for the current key has been reached
    pub fn is_capped(&self) -> bool {
        self.max_documents
            .is_some_and(|max| self.schema.documents_inspected() >= max)
    }

    /// Hand over the accumulated schema, leaving the session empty
    pub fn take(&mut self) -> Schema {
        self.key = None;
        std::mem::take(&mut self.schema)
    }
}
