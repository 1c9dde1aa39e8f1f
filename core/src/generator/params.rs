#![deny(missing_docs)]

//! # Query Parameters
//!
//! Builds operation parameters from the fields of a query DTO.

use crate::descriptor::{FieldDescriptor, ParamLocation, ParamStyle, TypeDescriptor};
use crate::error::{AppError, AppResult};
use crate::type_mapping::TypeMapper;
use serde_json::Value;

/// One documented operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryParameter {
    /// Field name.
    pub name: String,
    /// Parameter location.
    pub location: ParamLocation,
    /// Description.
    pub description: Option<String>,
    /// Required flag, left to the document default when unset.
    pub required: Option<bool>,
    /// Deprecated flag.
    pub deprecated: Option<bool>,
    /// allowEmptyValue flag.
    pub allow_empty_value: Option<bool>,
    /// Value schema.
    pub schema: Value,
    /// Example value.
    pub example: Option<Value>,
    /// Serialization style.
    pub style: Option<ParamStyle>,
    /// explode flag.
    pub explode: Option<bool>,
    /// allowReserved flag.
    pub allow_reserved: Option<bool>,
}

/// Builds one parameter per field of `descriptor`.
pub fn parameters_from_type(
    descriptor: &TypeDescriptor,
    mapper: &dyn TypeMapper,
) -> AppResult<Vec<QueryParameter>> {
    descriptor
        .fields
        .iter()
        .map(|field| parameter_from_field(&descriptor.name, field, mapper))
        .collect()
}

fn parameter_from_field(
    type_name: &str,
    field: &FieldDescriptor,
    mapper: &dyn TypeMapper,
) -> AppResult<QueryParameter> {
    let kind = field.ty.as_ref().ok_or_else(|| AppError::MissingType {
        type_name: type_name.to_string(),
        field: field.name.clone(),
    })?;
    let field_type = mapper.map(kind);

    if field.parameters.len() > 1 {
        return Err(AppError::DuplicateDescriptor {
            type_name: type_name.to_string(),
            field: field.name.clone(),
        });
    }

    let Some(explicit) = field.parameters.first() else {
        if field_type.is_array() {
            return Err(AppError::MissingParameterDescriptor {
                type_name: type_name.to_string(),
                field: field.name.clone(),
            });
        }
        return Ok(QueryParameter {
            name: field.name.clone(),
            location: ParamLocation::Query,
            description: field.description.clone(),
            required: None,
            deprecated: None,
            allow_empty_value: None,
            schema: field_type.schema(),
            example: None,
            style: None,
            explode: None,
            allow_reserved: None,
        });
    };

    Ok(QueryParameter {
        name: field.name.clone(),
        location: explicit.location.unwrap_or_default(),
        description: explicit
            .description
            .clone()
            .or_else(|| field.description.clone()),
        required: explicit.required,
        deprecated: explicit.deprecated,
        allow_empty_value: explicit.allow_empty_value,
        schema: explicit
            .schema
            .clone()
            .unwrap_or_else(|| field_type.schema()),
        example: explicit.example.clone(),
        style: explicit.style,
        explode: explicit.explode,
        allow_reserved: explicit.allow_reserved,
    })
}
