#![deny(missing_docs)]

//! # Document Assembly
//!
//! Collects rendered operations under their paths and emits a complete OpenAPI
//! 3.1 document. Component schemas are generated for every referenced type; a
//! grouped reference (`UserView.list`) yields a variant holding only the fields
//! in those groups.

use crate::descriptor::{TypeDescriptor, TypeDescriptorProvider};
use crate::error::AppResult;
use crate::generator::OperationDoc;
use crate::render::{render_operation, schema_ref};
use crate::type_mapping::{
    any_value_schema, DefaultTypeMapper, FieldType, TypeMapper, SCHEMA_REF_PREFIX,
};
use indexmap::{IndexMap, IndexSet};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

/// OpenAPI version emitted by the assembler.
pub const OPENAPI_VERSION: &str = "3.1.0";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiInfo {
    /// API title.
    pub title: String,
    /// API version.
    pub version: String,
    /// Optional long description.
    pub description: Option<String>,
}

impl ApiInfo {
    /// Info with the required fields.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            version: version.into(),
            description: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Builds a whole OpenAPI document from operation docs.
#[derive(Debug, Clone)]
pub struct DocumentAssembler {
    info: ApiInfo,
    paths: IndexMap<String, Map<String, Value>>,
}

impl DocumentAssembler {
    /// An empty document.
    pub fn new(info: ApiInfo) -> Self {
        Self {
            info,
            paths: IndexMap::new(),
        }
    }

    /// Adds `doc` under `path`. A second operation with the same method on the
    /// same path replaces the first.
    ///
    /// Every `{name}` segment of `path` not declared by the operation is
    /// documented as a required string path parameter.
    pub fn add(&mut self, path: impl Into<String>, doc: &OperationDoc) -> &mut Self {
        let path = path.into();
        let mut operation = render_operation(doc);
        add_path_parameters(&path, &mut operation);
        let item = self.paths.entry(path.clone()).or_default();
        let key = doc.method.path_item_key();
        if item.insert(key.to_string(), operation).is_some() {
            warn!(path = %path, method = %doc.method, "operation replaced");
        }
        self
    }

    /// Number of documented operations.
    pub fn operation_count(&self) -> usize {
        self.paths.values().map(|item| item.len()).sum()
    }

    /// The document as JSON, with component schemas resolved through `provider`.
    pub fn to_json<P: TypeDescriptorProvider>(&self, provider: &P) -> Value {
        let mut paths = Map::new();
        for (path, item) in &self.paths {
            paths.insert(path.clone(), Value::Object(item.clone()));
        }
        let paths = Value::Object(paths);

        let mut pending = IndexSet::new();
        collect_refs(&paths, &mut pending);
        let schemas = build_components(pending, provider);

        let mut info = Map::new();
        info.insert("title".to_string(), json!(self.info.title));
        info.insert("version".to_string(), json!(self.info.version));
        if let Some(desc) = &self.info.description {
            info.insert("description".to_string(), json!(desc));
        }

        let mut doc = Map::new();
        doc.insert("openapi".to_string(), json!(OPENAPI_VERSION));
        doc.insert("info".to_string(), Value::Object(info));
        doc.insert("paths".to_string(), paths);
        doc.insert(
            "components".to_string(),
            json!({ "schemas": Value::Object(schemas) }),
        );
        Value::Object(doc)
    }

    /// The document as YAML.
    pub fn to_yaml<P: TypeDescriptorProvider>(&self, provider: &P) -> AppResult<String> {
        Ok(serde_yaml::to_string(&self.to_json(provider))?)
    }

    /// The document as typed `utoipa` OpenAPI model.
    pub fn to_openapi<P: TypeDescriptorProvider>(
        &self,
        provider: &P,
    ) -> AppResult<utoipa::openapi::OpenApi> {
        Ok(serde_json::from_value(self.to_json(provider))?)
    }
}

fn path_parameter_names(path: &str) -> IndexSet<&str> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix('{')?.strip_suffix('}'))
        .filter(|name| !name.is_empty())
        .collect()
}

fn add_path_parameters(path: &str, operation: &mut Value) {
    let Value::Object(op) = operation else {
        return;
    };
    let declared: Vec<String> = op
        .get("parameters")
        .and_then(Value::as_array)
        .map(|params| {
            params
                .iter()
                .filter(|param| param["in"] == "path")
                .filter_map(|param| param["name"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default();
    let missing: Vec<Value> = path_parameter_names(path)
        .into_iter()
        .filter(|name| !declared.iter().any(|d| d == name))
        .map(|name| {
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": { "type": "string" },
            })
        })
        .collect();
    if missing.is_empty() {
        return;
    }
    if let Value::Array(params) = op.entry("parameters").or_insert_with(|| json!([])) {
        params.extend(missing);
    }
}

fn collect_refs(value: &Value, out: &mut IndexSet<String>) {
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match (key.as_str(), val) {
                    ("$ref", Value::String(reference)) => {
                        if let Some(name) = reference.strip_prefix(SCHEMA_REF_PREFIX) {
                            out.insert(name.to_string());
                        }
                    }
                    _ => collect_refs(val, out),
                }
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_refs(item, out)),
        _ => {}
    }
}

fn build_components<P: TypeDescriptorProvider>(
    mut pending: IndexSet<String>,
    provider: &P,
) -> Map<String, Value> {
    let mut schemas = Map::new();
    let mut index = 0;
    // `pending` grows while nested references are discovered.
    while let Some(name) = pending.get_index(index).cloned() {
        index += 1;
        let mut parts = name.split('.');
        let type_name = parts.next().unwrap_or_default();
        let groups: Vec<String> = parts.map(str::to_string).collect();

        let Some(descriptor) = provider.describe_fields(type_name) else {
            warn!(component = %name, "referenced type has no descriptor, skipping");
            continue;
        };
        let schema = component_schema(descriptor, &groups);
        collect_refs(&schema, &mut pending);
        schemas.insert(name, schema);
    }
    debug!(count = schemas.len(), "generated component schemas");
    schemas
}

/// Object schema of `descriptor` restricted to `groups` (all fields when empty).
/// Nested type references inherit the groups.
pub fn component_schema(descriptor: &TypeDescriptor, groups: &[String]) -> Value {
    let mapper = DefaultTypeMapper;
    let mut properties = Map::new();
    let mut required = Vec::new();

    let fields = descriptor
        .fields
        .iter()
        .filter(|field| groups.is_empty() || field.in_any_group(groups));
    for field in fields {
        let mut schema = match &field.ty {
            Some(kind) => field_schema(&mapper.map(kind), groups),
            None => any_value_schema(),
        };
        if field.nullable {
            schema = nullable(schema);
        } else {
            required.push(json!(field.name));
        }
        if let (Some(desc), Value::Object(map)) = (&field.description, &mut schema) {
            map.insert("description".to_string(), json!(desc));
        }
        properties.insert(field.name.clone(), schema);
    }

    let mut obj = Map::new();
    obj.insert("type".to_string(), json!("object"));
    if let Some(desc) = &descriptor.description {
        obj.insert("description".to_string(), json!(desc));
    }
    obj.insert("properties".to_string(), Value::Object(properties));
    if !required.is_empty() {
        obj.insert("required".to_string(), Value::Array(required));
    }
    Value::Object(obj)
}

fn field_schema(field_type: &FieldType, groups: &[String]) -> Value {
    if !field_type.is_builtin {
        return schema_ref(&field_type.name, groups);
    }
    match &field_type.items {
        Some(items) => json!({ "type": "array", "items": field_schema(items, groups) }),
        None => field_type.schema(),
    }
}

fn nullable(schema: Value) -> Value {
    match schema {
        Value::Object(mut map) if !map.contains_key("$ref") => {
            // Untyped schemas already accept null.
            if let Some(Value::String(ty)) = map.get("type").cloned() {
                map.insert("type".to_string(), json!([ty, "null"]));
            }
            Value::Object(map)
        }
        other => json!({ "oneOf": [other, { "type": "null" }] }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{error_response, paginated_success_response};
    use crate::descriptor::{DescriptorRegistry, FieldDescriptor, TypeKind};
    use crate::envelope::ValidationError;
    use crate::generator::{DocumentationGenerator, OperationRequest};
    use crate::pagination::PaginationMeta;
    use pretty_assertions::assert_eq;

    fn registry() -> DescriptorRegistry {
        let mut registry = DescriptorRegistry::new()
            .with::<PaginationMeta>()
            .with::<ValidationError>();
        registry
            .insert(
                TypeDescriptor::new("UserView")
                    .field(
                        FieldDescriptor::new("id", TypeKind::builtin("i64")).in_groups(["list"]),
                    )
                    .field(
                        FieldDescriptor::new("email", TypeKind::builtin("String"))
                            .in_groups(["detail"]),
                    )
                    .field(
                        FieldDescriptor::new("address", TypeKind::reference("Address"))
                            .nullable()
                            .in_groups(["list"]),
                    ),
            )
            .insert(
                TypeDescriptor::new("Address")
                    .field(
                        FieldDescriptor::new("city", TypeKind::builtin("String"))
                            .in_groups(["list"]),
                    )
                    .field(FieldDescriptor::new("street", TypeKind::builtin("String"))),
            );
        registry
    }

    fn assembled(registry: &DescriptorRegistry) -> DocumentAssembler {
        let gen = DocumentationGenerator::new(registry);
        let list = gen
            .build_operation(
                &OperationRequest::new("GET", "listUsers", "List users")
                    .response(paginated_success_response("UserView").with_groups(["list"])),
            )
            .unwrap();
        let mut assembler = DocumentAssembler::new(ApiInfo::new("Users", "1.0.0"));
        assembler.add("/users", &list);
        assembler
    }

    #[test]
    fn test_grouped_components() {
        let registry = registry();
        let doc = assembled(&registry).to_json(&registry);
        let schemas = &doc["components"]["schemas"];

        assert_eq!(
            schemas["UserView.list"],
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer" },
                    "address": {
                        "oneOf": [
                            { "$ref": "#/components/schemas/Address.list" },
                            { "type": "null" }
                        ]
                    }
                },
                "required": ["id"]
            })
        );
        assert_eq!(
            schemas["Address.list"]["properties"],
            json!({ "city": { "type": "string" } })
        );
        assert!(schemas.get("PaginationMeta.api_success").is_some());
        assert!(schemas.get("PaginationMeta").is_none());
        assert!(schemas.get("ValidationError").is_some());
        assert!(schemas.get("UserView").is_none());
    }

    #[test]
    fn test_unknown_reference_skipped() {
        let registry = DescriptorRegistry::new().with::<ValidationError>();
        let gen = DocumentationGenerator::new(&registry);
        let op = gen
            .build_operation(
                &OperationRequest::new("GET", "ghost", "Ghost")
                    .response(error_response())
                    .response(crate::declaration::success_response("Ghost")),
            )
            .unwrap();
        let mut assembler = DocumentAssembler::new(ApiInfo::new("Ghosts", "0.1.0"));
        assembler.add("/ghost", &op);
        let doc = assembler.to_json(&registry);
        assert!(doc["components"]["schemas"].get("Ghost").is_none());
        assert_eq!(assembler.operation_count(), 1);
    }

    #[test]
    fn test_nullable_primitive() {
        assert_eq!(
            nullable(json!({"type": "string", "format": "uuid"})),
            json!({"type": ["string", "null"], "format": "uuid"})
        );
        assert_eq!(nullable(any_value_schema()), any_value_schema());
    }

    #[test]
    fn test_typed_export() {
        let registry = registry();
        let openapi = assembled(&registry).to_openapi(&registry).unwrap();
        assert_eq!(openapi.info.title, "Users");
        assert!(openapi.paths.paths.contains_key("/users"));
        let yaml = assembled(&registry).to_yaml(&registry).unwrap();
        assert!(yaml.contains("3.1.0"));
    }

    #[test]
    fn test_untyped_field_accepts_any_value() {
        let descriptor = TypeDescriptor::new("Loose").field(FieldDescriptor::untyped("value"));
        let schema = component_schema(&descriptor, &[]);
        assert_eq!(schema["properties"]["value"], any_value_schema());
        let typed: Result<utoipa::openapi::RefOr<utoipa::openapi::schema::Schema>, _> =
            serde_json::from_value(schema);
        assert!(typed.is_ok());
    }

    #[test]
    fn test_path_parameters_from_template() {
        let registry = registry();
        let gen = DocumentationGenerator::new(&registry);
        let delete = gen
            .build_operation(
                &OperationRequest::new("DELETE", "deleteComment", "Delete a comment")
                    .response(crate::declaration::no_content_response()),
            )
            .unwrap();
        let mut assembler = DocumentAssembler::new(ApiInfo::new("Users", "1.0.0"));
        assembler.add("/users/{id}/comments/{commentId}", &delete);
        let doc = assembler.to_json(&registry);

        assert_eq!(
            doc["paths"]["/users/{id}/comments/{commentId}"]["delete"]["parameters"],
            json!([
                { "name": "id", "in": "path", "required": true, "schema": { "type": "string" } },
                {
                    "name": "commentId",
                    "in": "path",
                    "required": true,
                    "schema": { "type": "string" }
                }
            ])
        );
        assert!(assembler.to_openapi(&registry).is_ok());
    }

    #[test]
    fn test_declared_path_parameter_kept() {
        let mut operation = json!({
            "parameters": [
                { "name": "id", "in": "path", "required": true, "schema": { "type": "integer" } },
                { "name": "id", "in": "query", "required": false, "schema": { "type": "string" } }
            ]
        });
        add_path_parameters("/users/{id}", &mut operation);
        assert_eq!(operation["parameters"].as_array().map(Vec::len), Some(2));
        assert_eq!(operation["parameters"][0]["schema"], json!({ "type": "integer" }));

        let mut operation = json!({ "responses": {} });
        add_path_parameters("/users", &mut operation);
        assert!(operation.get("parameters").is_none());
    }
}
