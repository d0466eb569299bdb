//! Extended JSON wrapper shapes
//!
//! Drivers hand typed scalars across process boundaries as single-purpose
//! wrapper objects (`{"$oid": "..."}`, `{"$numberLong": "..."}`, ...). This
//! module recognises those shapes by exact key-set identity and reads their
//! payloads back out for the statistics aggregator.

use super::types::TypeTag;
use base64::Engine as _;
use chrono::DateTime;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

static OBJECT_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").unwrap());

static UUID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-fA-F]{8}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{4}-?[0-9a-fA-F]{12}$")
        .unwrap()
});

/// Byte length of a UUID binary payload
const UUID_LENGTH: usize = 16;

/// Outcome of testing an object against one wrapper shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Key set and payload both match
    Valid,
    /// Key set matches but the payload does not
    Malformed,
}

impl Shape {
    fn check(valid: bool) -> Self {
        if valid {
            Shape::Valid
        } else {
            Shape::Malformed
        }
    }
}

type ShapeCheck = fn(&Map<String, Value>) -> Option<Shape>;

/// Wrapper checks in priority order
///
/// The first check whose key set matches decides the tag.
const WRAPPER_CHECKS: &[(TypeTag, ShapeCheck)] = &[
    (TypeTag::ObjectId, object_id_shape),
    (TypeTag::Int32, int32_shape),
    (TypeTag::Double, double_shape),
    (TypeTag::Date, date_shape),
    (TypeTag::Timestamp, timestamp_shape),
    (TypeTag::Decimal128, decimal_shape),
    (TypeTag::Long, long_shape),
    (TypeTag::MinKey, min_key_shape),
    (TypeTag::MaxKey, max_key_shape),
    (TypeTag::Symbol, symbol_shape),
    (TypeTag::DbRef, db_ref_shape),
    (TypeTag::Binary, binary_shape),
    (TypeTag::RegExp, regexp_shape),
    (TypeTag::CodeWithScope, code_with_scope_shape),
    (TypeTag::Code, code_shape),
];

/// Classify an object by its wrapper shape
///
/// Returns `None` when no wrapper matches, i.e. the object is a plain
/// document. A matching shape with a malformed payload is `Unknown`.
pub fn wrapper_tag(map: &Map<String, Value>) -> Option<TypeTag> {
    WRAPPER_CHECKS
        .iter()
        .find_map(|(tag, check)| check(map).map(|shape| (*tag, shape)))
        .map(|(tag, shape)| match shape {
            Shape::Valid => tag,
            Shape::Malformed => TypeTag::Unknown,
        })
}

/// Shape of `{"$undefined": true}`
pub fn undefined_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$undefined").map(|v| Shape::check(v == &Value::Bool(true)))
}

// ============================================================================
// Key-set helpers
// ============================================================================

/// Payload of a one-key wrapper
fn single<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if map.len() == 1 {
        map.get(key)
    } else {
        None
    }
}

/// Exact key-set identity: every required key present, nothing outside
/// `required` and `optional`
fn has_keys(map: &Map<String, Value>, required: &[&str], optional: &[&str]) -> bool {
    required.iter().all(|k| map.contains_key(*k))
        && map
            .keys()
            .all(|k| required.contains(&k.as_str()) || optional.contains(&k.as_str()))
}

fn is_string(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(_)))
}

// ============================================================================
// Shape checks
// ============================================================================

fn object_id_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$oid")
        .map(|v| Shape::check(v.as_str().is_some_and(|s| OBJECT_ID_REGEX.is_match(s))))
}

fn int32_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$numberInt")
        .map(|v| Shape::check(v.as_str().is_some_and(|s| s.parse::<i32>().is_ok())))
}

fn double_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$numberDouble")
        .map(|v| Shape::check(v.as_str().is_some_and(|s| s.parse::<f64>().is_ok())))
}

fn date_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$date").map(|v| Shape::check(date_payload_millis(v).is_some()))
}

fn timestamp_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$timestamp").map(|v| {
        let valid = v.as_object().is_some_and(|ts| {
            has_keys(ts, &["t", "i"], &[])
                && ts.get("t").is_some_and(Value::is_u64)
                && ts.get("i").is_some_and(Value::is_u64)
        });
        Shape::check(valid)
    })
}

fn decimal_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$numberDecimal")
        .map(|v| Shape::check(v.as_str().is_some_and(|s| s.parse::<f64>().is_ok())))
}

fn long_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$numberLong")
        .map(|v| Shape::check(v.as_str().is_some_and(|s| s.parse::<i64>().is_ok())))
}

fn min_key_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$minKey").map(|v| Shape::check(v.as_u64() == Some(1)))
}

fn max_key_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$maxKey").map(|v| Shape::check(v.as_u64() == Some(1)))
}

fn symbol_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$symbol").map(|v| Shape::check(v.is_string()))
}

fn db_ref_shape(map: &Map<String, Value>) -> Option<Shape> {
    if has_keys(map, &["$ref", "$id"], &["$db"]) {
        let valid = is_string(map.get("$ref"))
            && map.get("$db").map_or(true, Value::is_string);
        return Some(Shape::check(valid));
    }

    single(map, "$dbPointer").map(|v| {
        let valid = v.as_object().is_some_and(|ptr| {
            has_keys(ptr, &["$ref", "$id"], &[]) && is_string(ptr.get("$ref"))
        });
        Shape::check(valid)
    })
}

fn binary_shape(map: &Map<String, Value>) -> Option<Shape> {
    if let Some(v) = single(map, "$uuid") {
        let valid = v.as_str().is_some_and(|s| UUID_REGEX.is_match(s));
        return Some(Shape::check(valid));
    }

    if has_keys(map, &["$binary", "$type"], &[]) {
        let valid = is_string(map.get("$type")) && binary_payload_length(map).is_some();
        return Some(Shape::check(valid));
    }

    single(map, "$binary").map(|v| {
        let valid = v.as_object().is_some_and(|bin| {
            has_keys(bin, &["base64", "subType"], &[]) && is_string(bin.get("subType"))
        }) && binary_payload_length(map).is_some();
        Shape::check(valid)
    })
}

fn regexp_shape(map: &Map<String, Value>) -> Option<Shape> {
    if let Some(v) = single(map, "$regularExpression") {
        let valid = v.as_object().is_some_and(|re| {
            has_keys(re, &["pattern", "options"], &[])
                && is_string(re.get("pattern"))
                && is_string(re.get("options"))
        });
        return Some(Shape::check(valid));
    }

    if has_keys(map, &["$regex"], &["$options"]) {
        let valid =
            is_string(map.get("$regex")) && map.get("$options").map_or(true, Value::is_string);
        return Some(Shape::check(valid));
    }

    None
}

fn code_with_scope_shape(map: &Map<String, Value>) -> Option<Shape> {
    if has_keys(map, &["$code", "$scope"], &[]) {
        let valid =
            is_string(map.get("$code")) && map.get("$scope").is_some_and(Value::is_object);
        Some(Shape::check(valid))
    } else {
        None
    }
}

fn code_shape(map: &Map<String, Value>) -> Option<Shape> {
    single(map, "$code").map(|v| Shape::check(v.is_string()))
}

// ============================================================================
// Payload readers
// ============================================================================

/// Numeric payload of a value already classified as a numeric tag
///
/// 64-bit integers and decimals are coerced to `f64`. Precision beyond
/// 2^53 (or beyond ~17 significant decimal digits) is lost.
pub fn numeric_value(value: &Value, tag: TypeTag) -> Option<f64> {
    let parsed = match (value, tag) {
        (Value::Number(n), _) => n.as_f64(),
        (Value::Object(map), TypeTag::Int32) => wrapped_str(map, "$numberInt")
            .and_then(|s| s.parse::<i32>().ok())
            .map(f64::from),
        (Value::Object(map), TypeTag::Double) => {
            wrapped_str(map, "$numberDouble").and_then(|s| s.parse::<f64>().ok())
        }
        (Value::Object(map), TypeTag::Long) => wrapped_str(map, "$numberLong")
            .and_then(|s| s.parse::<i64>().ok())
            .map(|n| n as f64),
        (Value::Object(map), TypeTag::Decimal128) => {
            wrapped_str(map, "$numberDecimal").and_then(|s| s.parse::<f64>().ok())
        }
        _ => None,
    };
    parsed.filter(|n| !n.is_nan())
}

/// Length measure of a string (characters) or binary (decoded bytes) value
pub fn length_value(value: &Value, tag: TypeTag) -> Option<usize> {
    match (value, tag) {
        (Value::String(s), TypeTag::String) => Some(s.chars().count()),
        (Value::Object(map), TypeTag::Binary) => {
            if map.contains_key("$uuid") {
                Some(UUID_LENGTH)
            } else {
                binary_payload_length(map)
            }
        }
        _ => None,
    }
}

/// Epoch milliseconds of a `$date` wrapper
pub fn date_millis(value: &Value) -> Option<i64> {
    value
        .as_object()
        .and_then(|map| map.get("$date"))
        .and_then(date_payload_millis)
}

/// `$date` accepts an ISO-8601 string (relaxed), a `$numberLong`
/// (canonical) or a bare integer (legacy)
fn date_payload_millis(payload: &Value) -> Option<i64> {
    match payload {
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.timestamp_millis()),
        Value::Number(n) => n.as_i64(),
        Value::Object(inner) => wrapped_str(inner, "$numberLong").and_then(|s| s.parse().ok()),
        _ => None,
    }
}

fn binary_payload_length(map: &Map<String, Value>) -> Option<usize> {
    let encoded = match map.get("$binary")? {
        Value::String(s) => s.as_str(),
        Value::Object(bin) => bin.get("base64")?.as_str()?,
        _ => return None,
    };
    base64::engine::general_purpose::STANDARD
        .decode(encoded)
        .ok()
        .map(|bytes| bytes.len())
}

fn wrapped_str<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    single(map, key).and_then(Value::as_str)
}
