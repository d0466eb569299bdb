//! Schema types
//!
//! The aggregate schema is a tree: a [`Schema`] maps field names to
//! [`PropertySchema`]s, each holding one [`TypeEntry`] per observed type tag.
//! Object entries nest another property map, array entries nest an `items`
//! list of type entries.

use crate::classify::{JsonType, TypeTag};
use crate::stats::{BooleanStats, CountStats, DateStats, LengthStats, NumericStats};
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::collections::BTreeMap;

/// Field name to property schema
pub type Properties = BTreeMap<String, PropertySchema>;

// ============================================================================
// Type Entries
// ============================================================================

/// Type-specific statistics carried by a [`TypeEntry`]
#[derive(Debug, Clone, PartialEq)]
pub enum TypeStats {
    /// No payload, or nothing measured yet
    None,
    Length(LengthStats),
    Numeric(NumericStats),
    Boolean(BooleanStats),
    Date(DateStats),
    Object(ObjectStats),
    Array(ArrayStats),
}

impl TypeStats {
    /// Initial payload for a freshly created entry
    fn for_tag(tag: TypeTag) -> Self {
        match tag {
            TypeTag::Object => TypeStats::Object(ObjectStats::default()),
            TypeTag::Array => TypeStats::Array(ArrayStats::default()),
            _ => TypeStats::None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, TypeStats::None)
    }

    fn serialize_into<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error> {
        match self {
            TypeStats::None => {}
            TypeStats::Length(s) => {
                map.serialize_entry("x-minLength", &s.min_length)?;
                map.serialize_entry("x-maxLength", &s.max_length)?;
            }
            TypeStats::Numeric(s) => {
                map.serialize_entry("x-minValue", &s.min_value)?;
                map.serialize_entry("x-maxValue", &s.max_value)?;
            }
            TypeStats::Boolean(s) => {
                map.serialize_entry("x-trueCount", &s.true_count)?;
                map.serialize_entry("x-falseCount", &s.false_count)?;
            }
            TypeStats::Date(s) => {
                map.serialize_entry("x-minDate", &s.min_date)?;
                map.serialize_entry("x-maxDate", &s.max_date)?;
            }
            TypeStats::Object(s) => {
                if let Some(count) = &s.property_count {
                    map.serialize_entry("x-minProperties", &count.min)?;
                    map.serialize_entry("x-maxProperties", &count.max)?;
                }
                map.serialize_entry("properties", &s.properties)?;
            }
            TypeStats::Array(s) => {
                if let Some(length) = &s.length {
                    map.serialize_entry("x-minItems", &length.min)?;
                    map.serialize_entry("x-maxItems", &length.max)?;
                }
                map.serialize_entry("items", &ItemsView(&s.items))?;
            }
        }
        Ok(())
    }
}

/// Nested schema of an object-typed entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectStats {
    pub properties: Properties,
    /// Bounds on the number of keys per object instance
    pub property_count: Option<CountStats>,
}

/// Element types of an array-typed entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArrayStats {
    /// One entry per element tag, across every array seen for the field
    pub items: TypeEntries,
    /// Bounds on the array length
    pub length: Option<CountStats>,
}

/// Schema record for one (field, type tag) combination
#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    tag: TypeTag,
    type_occurrence: u64,
    stats: TypeStats,
}

impl TypeEntry {
    /// Create an entry with zero occurrences
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            type_occurrence: 0,
            stats: TypeStats::for_tag(tag),
        }
    }

    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    pub fn json_type(&self) -> JsonType {
        self.tag.json_type()
    }

    /// Number of times this tag was seen for the field
    pub fn type_occurrence(&self) -> u64 {
        self.type_occurrence
    }

    pub fn stats(&self) -> &TypeStats {
        &self.stats
    }

    pub(crate) fn stats_mut(&mut self) -> &mut TypeStats {
        &mut self.stats
    }

    pub(crate) fn record_occurrence(&mut self) -> u64 {
        self.type_occurrence += 1;
        self.type_occurrence
    }

    /// Nested properties, for object entries
    pub fn properties(&self) -> Option<&Properties> {
        match &self.stats {
            TypeStats::Object(object) => Some(&object.properties),
            _ => None,
        }
    }

    /// Element type entries, for array entries
    pub fn items(&self) -> Option<&TypeEntries> {
        match &self.stats {
            TypeStats::Array(array) => Some(&array.items),
            _ => None,
        }
    }

    pub fn length_stats(&self) -> Option<&LengthStats> {
        match &self.stats {
            TypeStats::Length(s) => Some(s),
            _ => None,
        }
    }

    pub fn numeric_stats(&self) -> Option<&NumericStats> {
        match &self.stats {
            TypeStats::Numeric(s) => Some(s),
            _ => None,
        }
    }

    pub fn boolean_stats(&self) -> Option<&BooleanStats> {
        match &self.stats {
            TypeStats::Boolean(s) => Some(s),
            _ => None,
        }
    }

    pub fn date_stats(&self) -> Option<&DateStats> {
        match &self.stats {
            TypeStats::Date(s) => Some(s),
            _ => None,
        }
    }

    /// Property-count bounds, for object entries
    pub fn property_count(&self) -> Option<&CountStats> {
        match &self.stats {
            TypeStats::Object(object) => object.property_count.as_ref(),
            _ => None,
        }
    }

    /// Array-length bounds, for array entries
    pub fn array_length(&self) -> Option<&CountStats> {
        match &self.stats {
            TypeStats::Array(array) => array.length.as_ref(),
            _ => None,
        }
    }
}

impl Serialize for TypeEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", &self.json_type())?;
        map.serialize_entry("x-bsonType", &self.tag)?;
        map.serialize_entry("x-typeOccurrence", &self.type_occurrence)?;
        self.stats.serialize_into(&mut map)?;
        map.end()
    }
}

/// Type entries of one field, unique by tag, in first-seen order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeEntries {
    entries: Vec<TypeEntry>,
    /// Position in `entries` per tag index
    slots: [Option<usize>; TypeTag::COUNT],
}

impl TypeEntries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, tag: TypeTag) -> Option<&TypeEntry> {
        let i = self.slots[tag.index()]?;
        self.entries.get(i)
    }

    pub fn get_mut(&mut self, tag: TypeTag) -> Option<&mut TypeEntry> {
        let i = self.slots[tag.index()]?;
        self.entries.get_mut(i)
    }

    /// Find the entry for `tag`, creating it with zero occurrences if absent
    pub fn get_or_insert(&mut self, tag: TypeTag) -> &mut TypeEntry {
        let index = match self.slots[tag.index()] {
            Some(i) => i,
            None => {
                self.entries.push(TypeEntry::new(tag));
                let i = self.entries.len() - 1;
                self.slots[tag.index()] = Some(i);
                i
            }
        };
        &mut self.entries[index]
    }

    /// First entry whose coarse JSON type is `json_type`
    pub fn first_of_json_type(&self, json_type: JsonType) -> Option<&TypeEntry> {
        self.entries.iter().find(|e| e.json_type() == json_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeEntry> {
        self.entries.iter()
    }

    pub fn tags(&self) -> Vec<TypeTag> {
        self.entries.iter().map(TypeEntry::tag).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TypeEntries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(&self.entries)
    }
}

/// `items` renders as `{"anyOf": [...]}`
struct ItemsView<'a>(&'a TypeEntries);

impl Serialize for ItemsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("anyOf", self.0)?;
        map.end()
    }
}

// ============================================================================
// Property Schema
// ============================================================================

/// Schema record for one field name
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertySchema {
    /// Containing instances in which the field was present, any type
    #[serde(rename = "x-occurrence")]
    occurrence: u64,

    #[serde(rename = "anyOf")]
    types: TypeEntries,
}

impl PropertySchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occurrence(&self) -> u64 {
        self.occurrence
    }

    pub fn types(&self) -> &TypeEntries {
        &self.types
    }

    /// Entry for one tag
    pub fn entry(&self, tag: TypeTag) -> Option<&TypeEntry> {
        self.types.get(tag)
    }

    /// The entry navigation descends through
    ///
    /// The `object` entry when the field was ever a plain subdocument.
    /// Otherwise the first entry rendering as a JSON object (a DBRef, a key
    /// sentinel, a malformed wrapper), which has no nested properties.
    pub fn object_entry(&self) -> Option<&TypeEntry> {
        self.types
            .get(TypeTag::Object)
            .or_else(|| self.types.first_of_json_type(JsonType::Object))
    }

    pub(crate) fn types_mut(&mut self) -> &mut TypeEntries {
        &mut self.types
    }

    pub(crate) fn record_occurrence(&mut self) {
        self.occurrence += 1;
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Aggregate schema over every document merged so far
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Schema {
    #[serde(rename = "x-documentsInspected")]
    documents_inspected: u64,

    properties: Properties,
}

impl Schema {
    /// Create a new empty schema
    pub fn new() -> Self {
        Self::default()
    }

    pub fn documents_inspected(&self) -> u64 {
        self.documents_inspected
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Get a top-level property
    pub fn property(&self, name: &str) -> Option<&PropertySchema> {
        self.properties.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.documents_inspected == 0
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub(crate) fn record_document(&mut self) {
        self.documents_inspected += 1;
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Convert to pretty JSON string
    pub fn to_json_pretty(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
