//! Schema merge and query tests

use super::*;
use crate::classify::{JsonType, TypeTag};
use crate::error::Error;
use crate::stats::{CountStats, LengthStats};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn schema_of(documents: &[Value]) -> Schema {
    let mut schema = Schema::new();
    schema.merge_all(documents);
    schema
}

/// Serialized schema with every `anyOf` list sorted by tag, so schemas built
/// from different document orders compare equal
fn normalized(schema: &Schema) -> Value {
    fn normalize(value: &mut Value) {
        match value {
            Value::Object(map) => {
                for (key, child) in map.iter_mut() {
                    normalize(child);
                    if key == "anyOf" {
                        if let Value::Array(entries) = child {
                            entries.sort_by_key(|e| e["x-bsonType"].to_string());
                        }
                    }
                }
            }
            Value::Array(items) => items.iter_mut().for_each(normalize),
            _ => {}
        }
    }

    let mut value = schema.to_json().unwrap();
    normalize(&mut value);
    value
}

fn person() -> Value {
    json!({
        "_id": {"$oid": "507f1f77bcf86cd799439011"},
        "personalInfo": {
            "name": "Ada",
            "age": 36,
            "address": {
                "street": "12 St James's Square",
                "city": "London"
            }
        }
    })
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn test_consistent_field_counts_every_document() {
    let documents: Vec<Value> = (0..7).map(|i| json!({"name": format!("user{i}")})).collect();
    let schema = schema_of(&documents);

    assert_eq!(schema.documents_inspected(), 7);
    let name = schema.property("name").unwrap();
    assert_eq!(name.occurrence(), 7);
    assert_eq!(name.types().len(), 1);
    assert_eq!(name.entry(TypeTag::String).unwrap().type_occurrence(), 7);
}

#[test]
fn test_optional_field_counts_presence_only() {
    let schema = schema_of(&[
        json!({"a": 1, "b": 1}),
        json!({"a": 2}),
        json!({"a": 3, "b": 2}),
        json!({"a": 4}),
    ]);

    assert_eq!(schema.property("a").unwrap().occurrence(), 4);
    assert_eq!(schema.property("b").unwrap().occurrence(), 2);
}

#[test]
fn test_document_order_does_not_change_result() {
    let documents = vec![
        json!({"v": [1, "x", true], "o": {"k": 1}}),
        json!({"v": [7, {"n": null}], "o": "flat"}),
        json!({"v": "scalar", "o": {"k": "s", "j": 2}}),
        json!({"v": [[-3], 5]}),
    ];

    let forward = schema_of(&documents);
    let expected = normalized(&forward);

    let mut reversed = documents.clone();
    reversed.reverse();
    assert_eq!(normalized(&schema_of(&reversed)), expected);

    for shift in 1..documents.len() {
        let mut rotated = documents.clone();
        rotated.rotate_left(shift);
        assert_eq!(normalized(&schema_of(&rotated)), expected);
    }
}

#[test]
fn test_array_integer_bounds() {
    let schema = schema_of(&[json!({"nums": [3, 1, 5, 2, 4]})]);

    let nums = schema.property("nums").unwrap();
    let array = nums.entry(TypeTag::Array).unwrap();
    let items = array.items().unwrap();
    let double = items.get(TypeTag::Double).unwrap();

    assert_eq!(double.type_occurrence(), 5);
    let stats = double.numeric_stats().unwrap();
    assert_eq!(stats.min_value, 1.0);
    assert_eq!(stats.max_value, 5.0);
    assert_eq!(array.array_length(), Some(&CountStats { min: 5, max: 5 }));
}

#[test]
fn test_mixed_leaf_types() {
    let schema = schema_of(&[json!({"a": 1}), json!({"a": "x"}), json!({"a": true})]);

    let a = schema.property("a").unwrap();
    assert_eq!(a.occurrence(), 3);
    assert_eq!(
        a.types().tags(),
        vec![TypeTag::Double, TypeTag::String, TypeTag::Boolean]
    );
    assert!(a.types().iter().all(|e| e.type_occurrence() == 1));
    assert_eq!(
        a.types().iter().map(TypeEntry::json_type).collect::<Vec<_>>(),
        vec![JsonType::Number, JsonType::String, JsonType::Boolean]
    );
}

#[test]
fn test_heterogeneous_array_items() {
    let schema = schema_of(&[json!({"mixed": [42, "text", true, null, {"k": "v"}]})]);

    let items = schema
        .property("mixed")
        .and_then(|p| p.entry(TypeTag::Array))
        .and_then(TypeEntry::items)
        .unwrap();

    assert_eq!(
        items.tags(),
        vec![
            TypeTag::Double,
            TypeTag::String,
            TypeTag::Boolean,
            TypeTag::Null,
            TypeTag::Object
        ]
    );
    let object = items.get(TypeTag::Object).unwrap();
    assert_eq!(object.properties().unwrap()["k"].occurrence(), 1);
}

#[test]
fn test_statistics_union_across_arrays() {
    let schema = schema_of(&[
        json!({"a": [1, 5]}),
        json!({"a": [10, -2]}),
        json!({"a": [3]}),
    ]);

    let array = schema.property("a").unwrap().entry(TypeTag::Array).unwrap();
    let double = array.items().unwrap().get(TypeTag::Double).unwrap();

    assert_eq!(double.type_occurrence(), 5);
    let stats = double.numeric_stats().unwrap();
    assert_eq!(stats.min_value, -2.0);
    assert_eq!(stats.max_value, 10.0);
    assert_eq!(array.array_length(), Some(&CountStats { min: 1, max: 2 }));
}

#[test]
fn test_objects_inside_arrays_share_one_entry() {
    let schema = schema_of(&[json!({
        "tags": [{"k": "v"}, {"k": "wide", "z": 1}]
    })]);

    let object = schema
        .property("tags")
        .and_then(|p| p.entry(TypeTag::Array))
        .and_then(TypeEntry::items)
        .and_then(|items| items.get(TypeTag::Object))
        .unwrap();

    assert_eq!(object.type_occurrence(), 2);
    assert_eq!(object.property_count(), Some(&CountStats { min: 1, max: 2 }));

    let properties = object.properties().unwrap();
    assert_eq!(properties["k"].occurrence(), 2);
    assert_eq!(properties["z"].occurrence(), 1);
    assert_eq!(
        properties["k"].entry(TypeTag::String).unwrap().length_stats(),
        Some(&LengthStats {
            min_length: 1,
            max_length: 4
        })
    );
}

#[test]
fn test_nested_object_in_array_in_object() {
    let schema = schema_of(&[
        json!({"a": {"b": [{"c": [1, 2]}]}}),
        json!({"a": {"b": [{"c": [9]}, {"c": "none"}]}}),
    ]);

    let c = schema
        .schema_at_path(&["a"])
        .unwrap()
        .get("b")
        .and_then(|b| b.entry(TypeTag::Array))
        .and_then(TypeEntry::items)
        .and_then(|items| items.get(TypeTag::Object))
        .and_then(TypeEntry::properties)
        .and_then(|properties| properties.get("c"))
        .unwrap();

    assert_eq!(c.occurrence(), 3);
    let double = c
        .entry(TypeTag::Array)
        .and_then(TypeEntry::items)
        .and_then(|items| items.get(TypeTag::Double))
        .unwrap();
    assert_eq!(double.numeric_stats().unwrap().max_value, 9.0);
    assert_eq!(c.entry(TypeTag::String).unwrap().type_occurrence(), 1);
}

#[test]
fn test_deeply_nested_arrays() {
    const DEPTH: usize = 1_000;

    let mut value = json!(1);
    for _ in 0..DEPTH {
        value = Value::Array(vec![value]);
    }
    let mut schema = Schema::new();
    schema.merge(&json!({ "deep": value }));

    let mut entry = schema
        .property("deep")
        .and_then(|p| p.entry(TypeTag::Array))
        .unwrap();
    let mut levels = 1;
    while let Some(next) = entry.items().and_then(|items| items.get(TypeTag::Array)) {
        entry = next;
        levels += 1;
    }

    assert_eq!(levels, DEPTH);
    let leaf = entry.items().unwrap().get(TypeTag::Double).unwrap();
    assert_eq!(leaf.numeric_stats().unwrap().min_value, 1.0);
}

#[test]
fn test_non_object_document_counts_only() {
    let mut schema = Schema::new();
    schema.merge(&json!([1, 2, 3]));
    schema.merge(&json!("text"));

    assert_eq!(schema.documents_inspected(), 2);
    assert!(schema.properties().is_empty());
    assert!(!schema.is_empty());
}

#[test]
fn test_merge_json_str() {
    let mut schema = Schema::new();
    schema
        .merge_json_str(r#"{"when": {"$date": "2024-01-15T10:30:00Z"}}"#)
        .unwrap();
    assert!(schema.property("when").unwrap().entry(TypeTag::Date).is_some());

    let err = schema.merge_json_str("{not json").unwrap_err();
    assert!(matches!(err, Error::JsonParse(_)));
    assert_eq!(schema.documents_inspected(), 1);
}

#[test]
fn test_serialized_form() {
    let schema = schema_of(&[
        json!({"n": 3, "flag": true, "list": ["ab"]}),
        json!({"n": 7, "flag": false, "list": []}),
    ]);

    assert_eq!(
        schema.to_json().unwrap(),
        json!({
            "x-documentsInspected": 2,
            "properties": {
                "flag": {
                    "x-occurrence": 2,
                    "anyOf": [{
                        "type": "boolean",
                        "x-bsonType": "boolean",
                        "x-typeOccurrence": 2,
                        "x-trueCount": 1,
                        "x-falseCount": 1
                    }]
                },
                "list": {
                    "x-occurrence": 2,
                    "anyOf": [{
                        "type": "array",
                        "x-bsonType": "array",
                        "x-typeOccurrence": 2,
                        "x-minItems": 0,
                        "x-maxItems": 1,
                        "items": {
                            "anyOf": [{
                                "type": "string",
                                "x-bsonType": "string",
                                "x-typeOccurrence": 1,
                                "x-minLength": 2,
                                "x-maxLength": 2
                            }]
                        }
                    }]
                },
                "n": {
                    "x-occurrence": 2,
                    "anyOf": [{
                        "type": "number",
                        "x-bsonType": "double",
                        "x-typeOccurrence": 2,
                        "x-minValue": 3.0,
                        "x-maxValue": 7.0
                    }]
                }
            }
        })
    );
}

#[test]
fn test_wrapper_tags_in_schema() {
    let schema = schema_of(&[
        json!({"_id": {"$oid": "507f1f77bcf86cd799439011"}, "total": {"$numberLong": "42"}}),
        json!({"_id": {"$oid": "nope"}, "total": {"$numberDecimal": "1.5"}}),
    ]);

    assert_eq!(
        schema.property("_id").unwrap().types().tags(),
        vec![TypeTag::ObjectId, TypeTag::Unknown]
    );
    assert_eq!(
        schema.property("total").unwrap().types().tags(),
        vec![TypeTag::Long, TypeTag::Decimal128]
    );
}

// ============================================================================
// Query
// ============================================================================

#[test]
fn test_property_names_at_path() {
    let schema = schema_of(&[person()]);

    assert_eq!(
        schema.property_names_at_path::<&str>(&[]),
        vec!["_id", "personalInfo"]
    );
    assert_eq!(
        schema.property_names_at_path(&["personalInfo"]),
        vec!["address", "age", "name"]
    );
    assert_eq!(
        schema.property_names_at_path(&["personalInfo", "address"]),
        vec!["city", "street"]
    );
}

#[test]
fn test_property_names_pin_id_first() {
    let schema = schema_of(&[json!({"zeta": 1, "_id": 2, "alpha": 3, "Beta": 4})]);
    assert_eq!(
        property_names_at_path::<&str>(&schema, &[]),
        vec!["_id", "Beta", "alpha", "zeta"]
    );

    assert_eq!(
        property_names_at_path_with_id::<&str>(&schema, &[], "zeta"),
        vec!["zeta", "Beta", "_id", "alpha"]
    );
}

#[test]
fn test_property_names_stop_at_deepest_resolved_node() {
    let schema = schema_of(&[person()]);

    // Missing segment: names of the node reached so far
    assert_eq!(
        schema.property_names_at_path(&["personalInfo", "missing", "deeper"]),
        vec!["address", "age", "name"]
    );
    // Present but never an object
    assert_eq!(
        schema.property_names_at_path(&["personalInfo", "name"]),
        vec!["address", "age", "name"]
    );
}

#[test]
fn test_navigation_uses_first_object_entry() {
    let schema = schema_of(&[
        json!({"meta": "plain"}),
        json!({"meta": {"version": 2}}),
    ]);

    assert_eq!(schema.property_names_at_path(&["meta"]), vec!["version"]);
}

#[test]
fn test_navigation_prefers_subdocument_over_wrapper() {
    let schema = schema_of(&[
        json!({"ref": {"$ref": "users", "$id": 1}}),
        json!({"ref": {"$minKey": 1}}),
        json!({"ref": {"name": "x"}}),
    ]);

    let property = schema.property("ref").unwrap();
    assert_eq!(
        property.types().tags(),
        vec![TypeTag::DbRef, TypeTag::MinKey, TypeTag::Object]
    );
    assert_eq!(property.object_entry().unwrap().tag(), TypeTag::Object);
    assert_eq!(schema.property_names_at_path(&["ref"]), vec!["name"]);
    assert!(schema.schema_at_path(&["ref", "name"]).is_ok());
}

#[test]
fn test_navigation_stops_at_wrapper_only_field() {
    let schema = schema_of(&[json!({"_id": 1, "ref": {"$ref": "users", "$id": 1}})]);

    let entry = schema.property("ref").unwrap().object_entry().unwrap();
    assert_eq!(entry.tag(), TypeTag::DbRef);
    assert_eq!(
        schema.property_names_at_path(&["ref"]),
        vec!["_id", "ref"]
    );
}

#[test]
fn test_schema_at_path() {
    let schema = schema_of(&[person()]);

    let address = schema
        .schema_at_path(&["personalInfo".to_string(), "address".to_string()])
        .unwrap();
    assert!(address.contains_key("street"));

    let root = schema_at_path::<&str>(&schema, &[]).unwrap();
    assert_eq!(root.len(), 2);
}

#[test]
fn test_schema_at_path_missing_first_segment() {
    let schema = schema_of(&[person()]);

    let err = schema.schema_at_path(&["nope"]).unwrap_err();
    match err {
        Error::PathNotFound { segment, resolved } => {
            assert_eq!(segment, "nope");
            assert!(resolved.is_empty());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_schema_at_path_missing_nested_segment() {
    let schema = schema_of(&[person()]);

    let err = schema
        .schema_at_path(&["personalInfo", "address", "zip"])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "No property 'zip' at path 'personalInfo.address'"
    );
}

#[test]
fn test_schema_at_path_stops_at_non_object() {
    let schema = schema_of(&[person()]);

    let node = schema.schema_at_path(&["personalInfo", "age"]).unwrap();
    assert!(node.contains_key("address"));
}
