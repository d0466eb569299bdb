//! Read-only navigation of an aggregate schema by field path
//!
//! Each path segment names a property; navigation descends through the
//! property's first object-typed entry. Both queries walk the tree from the
//! root on every call.

use super::types::{Properties, Schema};
use crate::error::{Error, Result};

/// Identifier field pinned first in property listings
pub const DEFAULT_ID_FIELD: &str = "_id";

/// Outcome of walking a path
struct Walk<'s> {
    node: &'s Properties,
    /// Segment with no property at all, if the walk hit one
    missing: Option<usize>,
}

fn walk<'s, S: AsRef<str>>(schema: &'s Schema, path: &[S]) -> Walk<'s> {
    let mut node = schema.properties();

    for (depth, segment) in path.iter().enumerate() {
        let Some(property) = node.get(segment.as_ref()) else {
            return Walk {
                node,
                missing: Some(depth),
            };
        };

        // Present but never an object: stay on the node reached so far
        match property.object_entry().and_then(|entry| entry.properties()) {
            Some(properties) => node = properties,
            None => break,
        }
    }

    Walk {
        node,
        missing: None,
    }
}

/// Property names of the node at `path`, identifier field first, the rest
/// in alphabetical order
///
/// Never fails: navigation stops at the deepest node that resolves.
pub fn property_names_at_path<S: AsRef<str>>(schema: &Schema, path: &[S]) -> Vec<String> {
    property_names_at_path_with_id(schema, path, DEFAULT_ID_FIELD)
}

/// [`property_names_at_path`] with a custom identifier field
pub fn property_names_at_path_with_id<S: AsRef<str>>(
    schema: &Schema,
    path: &[S],
    id_field: &str,
) -> Vec<String> {
    sorted_names(walk(schema, path).node, id_field)
}

/// Properties of the node at `path`
///
/// Fails with [`Error::PathNotFound`] when a segment has no corresponding
/// property. A segment whose property exists but was never object-typed
/// ends the walk at the node reached so far.
pub fn schema_at_path<'s, S: AsRef<str>>(
    schema: &'s Schema,
    path: &[S],
) -> Result<&'s Properties> {
    let walked = walk(schema, path);
    match walked.missing {
        Some(depth) => {
            let resolved = path[..depth]
                .iter()
                .map(|s| s.as_ref().to_string())
                .collect();
            Err(Error::path_not_found(path[depth].as_ref(), resolved))
        }
        None => Ok(walked.node),
    }
}

fn sorted_names(properties: &Properties, id_field: &str) -> Vec<String> {
    // BTreeMap keys are already in order
    let mut names: Vec<String> = properties
        .keys()
        .filter(|name| name.as_str() != id_field)
        .cloned()
        .collect();

    if properties.contains_key(id_field) {
        names.insert(0, id_field.to_string());
    }
    names
}

impl Schema {
    /// See [`property_names_at_path`]
    pub fn property_names_at_path<S: AsRef<str>>(&self, path: &[S]) -> Vec<String> {
        property_names_at_path(self, path)
    }

    /// See [`schema_at_path`]
    pub fn schema_at_path<S: AsRef<str>>(&self, path: &[S]) -> Result<&Properties> {
        schema_at_path(self, path)
    }
}
