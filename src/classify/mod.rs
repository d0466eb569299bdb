//! Type classification module
//!
//! Maps a single document value to exactly one [`TypeTag`].
//!
//! # Order of checks
//!
//! 1. `null` and `{"$undefined": true}` (distinct tags)
//! 2. primitive strings and booleans
//! 3. bare numbers, always `double`
//! 4. arrays
//! 5. Extended JSON wrapper objects, in a fixed priority order
//! 6. anything else is a generic `object`
//!
//! Classification never fails. Wrapper objects whose payload is malformed
//! classify as `_unknown_`.

mod types;
pub mod wrappers;

pub use types::{JsonType, TypeTag};

use serde_json::Value;
use wrappers::Shape;

/// Classify a document value
pub fn classify(value: &Value) -> TypeTag {
    match value {
        Value::Null => TypeTag::Null,
        Value::String(_) => TypeTag::String,
        Value::Bool(_) => TypeTag::Boolean,
        Value::Number(_) => TypeTag::Double,
        Value::Array(_) => TypeTag::Array,
        Value::Object(map) => match wrappers::undefined_shape(map) {
            Some(Shape::Valid) => TypeTag::Undefined,
            Some(Shape::Malformed) => TypeTag::Unknown,
            None => wrappers::wrapper_tag(map).unwrap_or(TypeTag::Object),
        },
    }
}
