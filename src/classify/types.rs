//! Type tag vocabulary

use serde::{Deserialize, Serialize};

/// Coarse JSON-level type of a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    String,
    Number,
    Boolean,
    Object,
    Array,
    Null,
}

impl std::fmt::Display for JsonType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JsonType::String => write!(f, "string"),
            JsonType::Number => write!(f, "number"),
            JsonType::Boolean => write!(f, "boolean"),
            JsonType::Object => write!(f, "object"),
            JsonType::Array => write!(f, "array"),
            JsonType::Null => write!(f, "null"),
        }
    }
}

/// Semantic type assigned to a document value
///
/// The vocabulary is closed. Every value maps to exactly one tag, with
/// [`TypeTag::Unknown`] absorbing wrapper objects whose payload is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Null,
    Undefined,
    String,
    Boolean,
    Double,
    Int32,
    Long,
    Decimal128,
    Array,
    Object,
    ObjectId,
    Date,
    Timestamp,
    MinKey,
    MaxKey,
    Symbol,
    DbRef,
    Binary,
    RegExp,
    Code,
    CodeWithScope,
    #[serde(rename = "_unknown_")]
    Unknown,
}

impl TypeTag {
    /// Number of tags in the vocabulary
    pub const COUNT: usize = 22;

    /// Every tag, in declaration order
    pub const ALL: [TypeTag; Self::COUNT] = [
        TypeTag::Null,
        TypeTag::Undefined,
        TypeTag::String,
        TypeTag::Boolean,
        TypeTag::Double,
        TypeTag::Int32,
        TypeTag::Long,
        TypeTag::Decimal128,
        TypeTag::Array,
        TypeTag::Object,
        TypeTag::ObjectId,
        TypeTag::Date,
        TypeTag::Timestamp,
        TypeTag::MinKey,
        TypeTag::MaxKey,
        TypeTag::Symbol,
        TypeTag::DbRef,
        TypeTag::Binary,
        TypeTag::RegExp,
        TypeTag::Code,
        TypeTag::CodeWithScope,
        TypeTag::Unknown,
    ];

    /// Dense index of this tag, usable as a slot into a `[_; COUNT]` table
    pub fn index(self) -> usize {
        self as usize
    }

    /// Serialized name of the tag
    pub fn as_str(self) -> &'static str {
        match self {
            TypeTag::Null => "null",
            TypeTag::Undefined => "undefined",
            TypeTag::String => "string",
            TypeTag::Boolean => "boolean",
            TypeTag::Double => "double",
            TypeTag::Int32 => "int32",
            TypeTag::Long => "long",
            TypeTag::Decimal128 => "decimal128",
            TypeTag::Array => "array",
            TypeTag::Object => "object",
            TypeTag::ObjectId => "objectid",
            TypeTag::Date => "date",
            TypeTag::Timestamp => "timestamp",
            TypeTag::MinKey => "minkey",
            TypeTag::MaxKey => "maxkey",
            TypeTag::Symbol => "symbol",
            TypeTag::DbRef => "dbref",
            TypeTag::Binary => "binary",
            TypeTag::RegExp => "regexp",
            TypeTag::Code => "code",
            TypeTag::CodeWithScope => "codewithscope",
            TypeTag::Unknown => "_unknown_",
        }
    }

    /// Coarse JSON type this tag renders as
    pub fn json_type(self) -> JsonType {
        match self {
            TypeTag::Null | TypeTag::Undefined => JsonType::Null,
            TypeTag::String
            | TypeTag::Symbol
            | TypeTag::ObjectId
            | TypeTag::Date
            | TypeTag::Binary
            | TypeTag::RegExp
            | TypeTag::Code => JsonType::String,
            TypeTag::Double
            | TypeTag::Int32
            | TypeTag::Long
            | TypeTag::Decimal128
            | TypeTag::Timestamp => JsonType::Number,
            TypeTag::Boolean => JsonType::Boolean,
            TypeTag::Array => JsonType::Array,
            TypeTag::Object
            | TypeTag::DbRef
            | TypeTag::CodeWithScope
            | TypeTag::MinKey
            | TypeTag::MaxKey
            | TypeTag::Unknown => JsonType::Object,
        }
    }

    /// Tags whose statistics are numeric value bounds
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            TypeTag::Double | TypeTag::Int32 | TypeTag::Long | TypeTag::Decimal128
        )
    }

    /// Tags processed through the merge work queue
    pub fn is_container(self) -> bool {
        matches!(self, TypeTag::Object | TypeTag::Array)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
