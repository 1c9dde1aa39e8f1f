#![deny(missing_docs)]

//! # Type Mapping
//!
//! Converts declared field types into the OpenAPI type vocabulary.
//! Handles primitives, date/time formats, lists and union/intersection forms.

use crate::descriptor::TypeKind;
use serde_json::{json, Map, Value};
use std::fmt::Display;

/// Type names documented as `string` + `date-time`.
pub const DATE_TIME_TYPES: &[&str] = &[
    "DateTime",
    "NaiveDateTime",
    "OffsetDateTime",
    "PrimitiveDateTime",
    "SystemTime",
];

/// Every JSON type; a schema listing them all accepts any value.
pub const ANY_VALUE_TYPES: &[&str] = &[
    "string", "number", "integer", "boolean", "object", "array", "null",
];

/// Path prefix of component schema references.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// The inferred documentation type of a DTO field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// Type name, either a primitive or a referenced type.
    pub name: String,
    /// Optional format specifier (e.g., "date-time", "uuid").
    pub format: Option<String>,
    /// Whether the type is primitive (inlined) rather than referenced.
    pub is_builtin: bool,
    /// Element type for lists.
    pub items: Option<Box<FieldType>>,
}

impl FieldType {
    /// The name as it appears in a `type` keyword.
    ///
    /// Primitive names are translated (`i32` -> `integer`); references are kept verbatim.
    pub fn openapi_name(&self) -> String {
        if self.is_builtin {
            openapi_type_name(&self.name).to_string()
        } else {
            self.name.clone()
        }
    }

    /// True for list types.
    pub fn is_array(&self) -> bool {
        self.openapi_name() == "array"
    }

    /// Builds the JSON schema for this type.
    pub fn schema(&self) -> Value {
        if !self.is_builtin {
            return json!({ "$ref": format!("{}{}", SCHEMA_REF_PREFIX, self.name) });
        }

        let type_name = self.openapi_name();
        if type_name == "mixed" {
            return any_value_schema();
        }

        let mut schema = Map::new();
        schema.insert("type".to_string(), json!(type_name));
        if let Some(format) = &self.format {
            schema.insert("format".to_string(), json!(format));
        }
        if let Some(items) = &self.items {
            schema.insert("items".to_string(), items.schema());
        }
        Value::Object(schema)
    }
}

impl Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.format {
            Some(format) => write!(f, "{}({})", self.openapi_name(), format),
            None => write!(f, "{}", self.openapi_name()),
        }
    }
}

/// Trait for converting declared types to documentation types.
pub trait TypeMapper {
    /// Maps a declared type to its `FieldType`.
    fn map(&self, kind: &TypeKind) -> FieldType;
}

/// A standard implementation of `TypeMapper`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTypeMapper;

impl TypeMapper for DefaultTypeMapper {
    fn map(&self, kind: &TypeKind) -> FieldType {
        match kind {
            // Union and intersection forms are documented by their flattened name
            TypeKind::Union(_) | TypeKind::Intersection(_) => FieldType {
                name: flatten_name(kind),
                format: None,
                is_builtin: false,
                items: None,
            },
            TypeKind::Array(inner) => FieldType {
                name: "array".to_string(),
                format: None,
                is_builtin: true,
                items: Some(Box::new(self.map(inner))),
            },
            TypeKind::Named(named) => {
                if DATE_TIME_TYPES.contains(&named.name.as_str()) {
                    return formatted("string", "date-time");
                }
                match named.name.as_str() {
                    "NaiveDate" | "Date" => formatted("string", "date"),
                    "Uuid" => formatted("string", "uuid"),
                    other => FieldType {
                        name: other.to_string(),
                        format: None,
                        is_builtin: named.builtin,
                        items: None,
                    },
                }
            }
        }
    }
}

/// Schema accepting any JSON value, spelled out as a type list so typed
/// OpenAPI models can read it back.
pub fn any_value_schema() -> Value {
    json!({ "type": ANY_VALUE_TYPES })
}

/// Translates a primitive type name to the OpenAPI vocabulary.
pub fn openapi_type_name(name: &str) -> &str {
    match name {
        "String" | "str" | "&str" | "char" | "string" => "string",
        "bool" | "boolean" => "boolean",
        "i8" | "i16" | "i32" | "i64" | "i128" | "isize" | "u8" | "u16" | "u32" | "u64"
        | "u128" | "usize" | "int" | "integer" => "integer",
        "f32" | "f64" | "float" | "number" => "number",
        "Vec" | "VecDeque" | "HashSet" | "BTreeSet" | "array" => "array",
        other => other,
    }
}

fn flatten_name(kind: &TypeKind) -> String {
    match kind {
        TypeKind::Named(named) => named.name.clone(),
        TypeKind::Array(_) => "array".to_string(),
        TypeKind::Union(members) => join_members(members, "|"),
        TypeKind::Intersection(members) => join_members(members, "&"),
    }
}

fn join_members(members: &[TypeKind], sep: &str) -> String {
    members
        .iter()
        .map(flatten_name)
        .collect::<Vec<_>>()
        .join(sep)
}

fn formatted(name: &str, fmt: &str) -> FieldType {
    FieldType {
        name: name.to_string(),
        format: Some(fmt.to_string()),
        is_builtin: true,
        items: None,
    }
}
