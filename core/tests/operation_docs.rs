use pretty_assertions::assert_eq;
use restdoc_core::{
    error_response, no_content_response, paginated_success_response,
    request_payload_error_responses, success_response, ApiInfo, AppError, DescribeType,
    DescriptorRegistry, DocumentAssembler, DocumentationGenerator, FieldDescriptor,
    GeneratorConfig, PaginationMeta, ParamLocation, ParameterDescriptor, TypeDescriptor, TypeKind,
    ValidationError,
};
use serde_json::json;

struct ArticleView;

impl DescribeType for ArticleView {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("ArticleView")
            .field(FieldDescriptor::new("id", TypeKind::builtin("Uuid")).in_groups(["list"]))
            .field(FieldDescriptor::new("title", TypeKind::builtin("String")).in_groups(["list"]))
            .field(FieldDescriptor::new("body", TypeKind::builtin("String")))
            .field(
                FieldDescriptor::new("publishedAt", TypeKind::builtin("DateTime"))
                    .nullable()
                    .in_groups(["list"]),
            )
    }
}

struct ArticleQuery;

impl DescribeType for ArticleQuery {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("ArticleQuery")
            .field(FieldDescriptor::new("page", TypeKind::builtin("u32")))
            .field(
                FieldDescriptor::new("tags", TypeKind::array_of(TypeKind::builtin("String")))
                    .with_parameter(
                        ParameterDescriptor::new()
                            .with_description("Only articles carrying every tag")
                            .explode(true),
                    ),
            )
    }
}

struct CreateArticle;

impl DescribeType for CreateArticle {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new("CreateArticle")
            .field(FieldDescriptor::new("title", TypeKind::builtin("String")))
            .field(FieldDescriptor::new("body", TypeKind::builtin("String")))
    }
}

fn registry() -> DescriptorRegistry {
    DescriptorRegistry::new()
        .with::<ArticleView>()
        .with::<ArticleQuery>()
        .with::<CreateArticle>()
        .with::<PaginationMeta>()
        .with::<ValidationError>()
}

#[test]
fn test_list_operation_document() {
    let registry = registry();
    let generator = DocumentationGenerator::new(&registry);

    let list = generator
        .build_operation(
            &restdoc_core::OperationRequest::new("get", "listArticles", "List articles")
                .query("ArticleQuery")
                .response(paginated_success_response("ArticleView").with_groups(["list"])),
        )
        .unwrap();

    let mut assembler = DocumentAssembler::new(ApiInfo::new("Articles", "1.0.0"));
    assembler.add("/articles", &list);
    let doc = assembler.to_json(&registry);

    let op = &doc["paths"]["/articles"]["get"];
    assert_eq!(
        op["parameters"],
        json!([
            {
                "name": "page",
                "in": "query",
                "required": false,
                "schema": { "type": "integer" }
            },
            {
                "name": "tags",
                "in": "query",
                "description": "Only articles carrying every tag",
                "required": false,
                "schema": { "type": "array", "items": { "type": "string" } },
                "explode": true
            }
        ])
    );
    assert_eq!(
        op["responses"]["400"]["description"],
        json!("Bad request"),
    );
    assert_eq!(
        op["responses"]["200"]["content"]["application/json"]["schema"]["properties"]["meta"],
        json!({ "$ref": "#/components/schemas/PaginationMeta.api_success" })
    );
    assert!(doc["components"]["schemas"]["PaginationMeta.api_success"]["properties"]
        ["hasMore"]
        .is_object());
    assert_eq!(
        doc["components"]["schemas"]["ArticleView.list"],
        json!({
            "type": "object",
            "properties": {
                "id": { "type": "string", "format": "uuid" },
                "title": { "type": "string" },
                "publishedAt": { "type": ["string", "null"], "format": "date-time" }
            },
            "required": ["id", "title"]
        })
    );
}

#[test]
fn test_create_operation_document() {
    let registry = registry();
    let generator = DocumentationGenerator::new(&registry);
    let create = generator
        .build_operation(
            &restdoc_core::OperationRequest::new("POST", "createArticle", "Create an article")
                .body("CreateArticle")
                .response(success_response("ArticleView").with_status(201))
                .response(request_payload_error_responses()),
        )
        .unwrap();

    let codes: Vec<u16> = create.responses.keys().copied().collect();
    assert_eq!(codes, vec![201, 422, 400, 415]);
    assert_eq!(create.responses[&400_u16].description, "Invalid payload");

    let rendered = restdoc_core::render_operation(&create);
    assert_eq!(
        rendered["requestBody"],
        json!({
            "description": "Payload for request",
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/CreateArticle" }
                }
            }
        })
    );
    assert_eq!(
        rendered["responses"]["422"]["content"]["application/json"]["schema"]["properties"]
            ["status"],
        json!({ "type": "string", "examples": ["ERROR"] })
    );
}

#[test]
fn test_declaration_errors() {
    let registry = registry();
    let generator = DocumentationGenerator::new(&registry);

    let err = generator
        .build_operation(
            &restdoc_core::OperationRequest::new("DELETE", "deleteArticle", "Delete")
                .query("ArticleQuery")
                .response(no_content_response()),
        )
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid declaration: query DTOs can be used only with GET, POST methods"
    );

    let err = generator
        .build_operation(&restdoc_core::OperationRequest::new(
            "OPTIONS", "options", "Options",
        ))
        .unwrap_err();
    assert!(matches!(err, AppError::UnsupportedMethod(_)));
}

#[test]
fn test_configured_defaults() {
    let registry = registry();
    let config = GeneratorConfig::from_yaml_str(
        r#"
default_responses:
  - status: 500
    description: Unexpected failure
    payload: ValidationError
    is_array: true
request_body_description: Article payload
"#,
    )
    .unwrap();
    let generator = DocumentationGenerator::new(&registry).with_config(config);
    let doc = generator
        .build_operation(
            &restdoc_core::OperationRequest::new("PUT", "replaceArticle", "Replace")
                .body("CreateArticle")
                .response(error_response()),
        )
        .unwrap();
    let codes: Vec<u16> = doc.responses.keys().copied().collect();
    assert_eq!(codes, vec![422, 500]);
    assert_eq!(
        doc.request_body.map(|b| b.description),
        Some("Article payload".to_string())
    );
}

#[test]
fn test_header_parameter_location() {
    let mut registry = registry();
    registry.insert(
        TypeDescriptor::new("TraceQuery").field(
            FieldDescriptor::new("traceId", TypeKind::builtin("String")).with_parameter(
                ParameterDescriptor::new()
                    .located(ParamLocation::Header)
                    .required(true),
            ),
        ),
    );
    let generator = DocumentationGenerator::new(&registry);
    let doc = generator
        .build_operation(
            &restdoc_core::OperationRequest::new("GET", "trace", "Trace").query("TraceQuery"),
        )
        .unwrap();
    assert_eq!(doc.parameters[0].location, ParamLocation::Header);
    assert_eq!(doc.parameters[0].required, Some(true));
}
