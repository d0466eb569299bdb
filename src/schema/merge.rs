//! Breadth-first schema merge
//!
//! Folds one document into an aggregate [`Schema`]. Nested objects and
//! arrays are processed from an explicit FIFO queue, never by recursion, so
//! document depth does not grow the call stack.
//!
//! Queue items address their type entry by a path of [`Step`]s from the root
//! and re-resolve it when dequeued. Several items can target the same entry
//! (every object element of an array shares one `items` entry), so holding
//! the entries themselves in the queue is not an option.

use super::types::{Properties, Schema, TypeEntry, TypeStats};
use crate::classify::{classify, TypeTag};
use crate::error::Result;
use crate::stats::{self, CountStats};
use serde_json::{Map, Value};
use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// One hop from a node down to a type entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    /// Property `name` of the current object node, entry `tag`
    Field(String, TypeTag),
    /// Entry `tag` in the `items` of the current array entry
    Items(TypeTag),
}

/// Pending value whose children still need merging
#[derive(Debug)]
struct WorkItem<'a> {
    tag: TypeTag,
    path: Vec<Step>,
    value: &'a Value,
}

impl<'a> WorkItem<'a> {
    fn child(&self, step: Step, tag: TypeTag, value: &'a Value) -> Self {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(step);
        Self { tag, path, value }
    }
}

/// Merge one document into `schema`
///
/// Never fails. A document that is not an object is counted as inspected
/// but contributes no properties.
pub fn merge(schema: &mut Schema, document: &Value) {
    schema.record_document();

    let Value::Object(fields) = document else {
        debug!(
            documents = schema.documents_inspected(),
            "document is not an object, no fields recorded"
        );
        return;
    };

    let mut queue = VecDeque::new();
    record_fields(schema.properties_mut(), fields, &[], &mut queue);

    let mut processed = 0usize;
    while let Some(item) = queue.pop_front() {
        processed += 1;

        let Some(entry) = resolve(schema.properties_mut(), &item.path) else {
            warn!(
                depth = item.path.len(),
                tag = %item.tag,
                "unresolved merge path, skipping"
            );
            continue;
        };

        match item.tag {
            TypeTag::Object => merge_object(entry, &item, &mut queue),
            TypeTag::Array => merge_array(entry, &item, &mut queue),
            tag => {
                if entry.type_occurrence() == 1 {
                    stats::initialize(item.value, tag, entry);
                } else {
                    stats::aggregate(item.value, tag, entry);
                }
            }
        }
    }

    trace!(
        documents = schema.documents_inspected(),
        processed,
        "document merged"
    );
}

/// Find-or-create the property and type entry for every field, bump both
/// occurrence counters and queue the value
fn record_fields<'a>(
    properties: &mut Properties,
    fields: &'a Map<String, Value>,
    parent: &[Step],
    queue: &mut VecDeque<WorkItem<'a>>,
) {
    for (name, value) in fields {
        let tag = classify(value);

        let property = properties.entry(name.clone()).or_default();
        property.record_occurrence();
        property.types_mut().get_or_insert(tag).record_occurrence();

        let mut path = parent.to_vec();
        path.push(Step::Field(name.clone(), tag));
        queue.push_back(WorkItem { tag, path, value });
    }
}

fn merge_object<'a>(
    entry: &mut TypeEntry,
    item: &WorkItem<'a>,
    queue: &mut VecDeque<WorkItem<'a>>,
) {
    let (Value::Object(fields), TypeStats::Object(object)) = (item.value, entry.stats_mut())
    else {
        return;
    };

    CountStats::observe(&mut object.property_count, fields.len());
    record_fields(&mut object.properties, fields, &item.path, queue);
}

fn merge_array<'a>(
    entry: &mut TypeEntry,
    item: &WorkItem<'a>,
    queue: &mut VecDeque<WorkItem<'a>>,
) {
    let (Value::Array(elements), TypeStats::Array(array)) = (item.value, entry.stats_mut())
    else {
        return;
    };

    CountStats::observe(&mut array.length, elements.len());

    // Tags already seen in this array value only
    let mut seen = [false; TypeTag::COUNT];

    for element in elements {
        let tag = classify(element);
        let item_entry = array.items.get_or_insert(tag);
        item_entry.record_occurrence();

        if seen[tag.index()] {
            stats::aggregate(element, tag, item_entry);
        } else {
            seen[tag.index()] = true;
            stats::initialize(element, tag, item_entry);
        }

        if tag.is_container() {
            queue.push_back(item.child(Step::Items(tag), tag, element));
        }
    }
}

/// Walk `path` from the root properties down to its type entry
fn resolve<'s>(properties: &'s mut Properties, path: &[Step]) -> Option<&'s mut TypeEntry> {
    let (Step::Field(name, tag), rest) = path.split_first()? else {
        return None;
    };
    let mut entry = properties.get_mut(name)?.types_mut().get_mut(*tag)?;

    for step in rest {
        entry = match (step, entry.stats_mut()) {
            (Step::Field(name, tag), TypeStats::Object(object)) => {
                object.properties.get_mut(name)?.types_mut().get_mut(*tag)?
            }
            (Step::Items(tag), TypeStats::Array(array)) => array.items.get_mut(*tag)?,
            _ => return None,
        };
    }

    Some(entry)
}

impl Schema {
    /// Merge one document into this schema
    pub fn merge(&mut self, document: &Value) {
        merge(self, document);
    }

    /// Merge a batch of documents, in iteration order
    pub fn merge_all<'a, I>(&mut self, documents: I)
    where
        I: IntoIterator<Item = &'a Value>,
    {
        for document in documents {
            merge(self, document);
        }
    }

    /// Parse one JSON document and merge it
    pub fn merge_json_str(&mut self, json: &str) -> Result<()> {
        let document: Value = serde_json::from_str(json)?;
        merge(self, &document);
        Ok(())
    }
}
