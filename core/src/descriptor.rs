#![deny(missing_docs)]

//! # Type Descriptors
//!
//! Static metadata for DTOs. Types opt in by implementing [`DescribeType`] and are
//! looked up by name through a [`TypeDescriptorProvider`], which the documentation
//! generator queries instead of inspecting types at runtime.

use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// The declared type of a DTO field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    /// A single named type (e.g. `i32`, `String`, `UserView`).
    Named(NamedType),
    /// A homogeneous list of another type.
    Array(Box<TypeKind>),
    /// Value may be any one of the members.
    Union(Vec<TypeKind>),
    /// Value satisfies all of the members.
    Intersection(Vec<TypeKind>),
}

/// A named type and whether it belongs to the language's builtin vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Declared type name.
    pub name: String,
    /// True for primitives (`i32`, `bool`, `String`, ...), false for user types.
    pub builtin: bool,
}

impl TypeKind {
    /// A builtin/primitive type such as `i64` or `String`.
    pub fn builtin(name: impl Into<String>) -> Self {
        TypeKind::Named(NamedType {
            name: name.into(),
            builtin: true,
        })
    }

    /// A reference to another described type.
    pub fn reference(name: impl Into<String>) -> Self {
        TypeKind::Named(NamedType {
            name: name.into(),
            builtin: false,
        })
    }

    /// A list of `inner`.
    pub fn array_of(inner: TypeKind) -> Self {
        TypeKind::Array(Box::new(inner))
    }

    /// A union of the given members.
    pub fn union(members: impl IntoIterator<Item = TypeKind>) -> Self {
        TypeKind::Union(members.into_iter().collect())
    }

    /// An intersection of the given members.
    pub fn intersection(members: impl IntoIterator<Item = TypeKind>) -> Self {
        TypeKind::Intersection(members.into_iter().collect())
    }

    /// True when every component of the type is builtin.
    pub fn is_builtin(&self) -> bool {
        match self {
            TypeKind::Named(n) => n.builtin,
            TypeKind::Array(inner) => inner.is_builtin(),
            TypeKind::Union(members) | TypeKind::Intersection(members) => {
                members.iter().all(TypeKind::is_builtin)
            }
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Named(n) => write!(f, "{}", n.name),
            TypeKind::Array(inner) => write!(f, "Vec<{}>", inner),
            TypeKind::Union(members) => write_joined(f, members, "|"),
            TypeKind::Intersection(members) => write_joined(f, members, "&"),
        }
    }
}

fn write_joined(f: &mut fmt::Formatter<'_>, members: &[TypeKind], sep: &str) -> fmt::Result {
    for (idx, member) in members.iter().enumerate() {
        if idx > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", member)?;
    }
    Ok(())
}

/// Where a parameter is carried in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParamLocation {
    /// `?name=value`
    #[default]
    Query,
    /// `/items/{name}`
    Path,
    /// Request header.
    Header,
    /// Cookie value.
    Cookie,
}

impl ParamLocation {
    /// The OpenAPI `in` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Query => "query",
            ParamLocation::Path => "path",
            ParamLocation::Header => "header",
            ParamLocation::Cookie => "cookie",
        }
    }
}

/// Parameter serialization style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamStyle {
    /// `form`
    Form,
    /// `spaceDelimited`
    SpaceDelimited,
    /// `pipeDelimited`
    PipeDelimited,
    /// `deepObject`
    DeepObject,
    /// `simple`
    Simple,
    /// `label`
    Label,
    /// `matrix`
    Matrix,
}

impl ParamStyle {
    /// The OpenAPI `style` value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamStyle::Form => "form",
            ParamStyle::SpaceDelimited => "spaceDelimited",
            ParamStyle::PipeDelimited => "pipeDelimited",
            ParamStyle::DeepObject => "deepObject",
            ParamStyle::Simple => "simple",
            ParamStyle::Label => "label",
            ParamStyle::Matrix => "matrix",
        }
    }
}

/// Explicit parameter documentation attached to a query DTO field.
///
/// Unset attributes fall back to what the generator infers from the field.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParameterDescriptor {
    /// Parameter location, `query` when unset.
    pub location: Option<ParamLocation>,
    /// Human readable description.
    pub description: Option<String>,
    /// Whether the parameter must be present.
    pub required: Option<bool>,
    /// Whether the parameter is deprecated.
    pub deprecated: Option<bool>,
    /// Whether an empty value is accepted.
    pub allow_empty_value: Option<bool>,
    /// Raw schema replacing the inferred one.
    pub schema: Option<Value>,
    /// Example value.
    pub example: Option<Value>,
    /// Serialization style.
    pub style: Option<ParamStyle>,
    /// Whether arrays/objects generate separate parameters.
    pub explode: Option<bool>,
    /// Whether reserved characters are allowed unescaped.
    pub allow_reserved: Option<bool>,
}

impl ParameterDescriptor {
    /// Creates an empty descriptor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the location.
    pub fn located(mut self, location: ParamLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the required flag.
    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    /// Marks the parameter as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = Some(true);
        self
    }

    /// Sets the allowEmptyValue flag.
    pub fn allow_empty_value(mut self, allow: bool) -> Self {
        self.allow_empty_value = Some(allow);
        self
    }

    /// Sets an explicit schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    /// Sets an example value.
    pub fn with_example(mut self, example: Value) -> Self {
        self.example = Some(example);
        self
    }

    /// Sets the serialization style.
    pub fn with_style(mut self, style: ParamStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the explode flag.
    pub fn explode(mut self, explode: bool) -> Self {
        self.explode = Some(explode);
        self
    }

    /// Sets the allowReserved flag.
    pub fn allow_reserved(mut self, allow: bool) -> Self {
        self.allow_reserved = Some(allow);
        self
    }
}

/// One field of a described DTO.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Field name as it appears on the wire.
    pub name: String,
    /// Declared type, `None` when the type cannot be resolved.
    pub ty: Option<TypeKind>,
    /// Whether the field accepts null.
    pub nullable: bool,
    /// Serialization groups the field belongs to.
    pub groups: Vec<String>,
    /// Explicit parameter descriptors. More than one is a declaration error.
    pub parameters: Vec<ParameterDescriptor>,
    /// Field documentation.
    pub description: Option<String>,
}

impl FieldDescriptor {
    /// A field with a resolved type.
    pub fn new(name: impl Into<String>, ty: TypeKind) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            nullable: false,
            groups: Vec::new(),
            parameters: Vec::new(),
            description: None,
        }
    }

    /// A field whose type could not be determined.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            ty: None,
            ..Self::new(name, TypeKind::builtin("mixed"))
        }
    }

    /// Marks the field as nullable.
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// Adds serialization groups.
    pub fn in_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Attaches an explicit parameter descriptor.
    pub fn with_parameter(mut self, parameter: ParameterDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Sets the field description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// True when the field belongs to at least one of `groups`.
    pub fn in_any_group(&self, groups: &[String]) -> bool {
        self.groups.iter().any(|g| groups.contains(g))
    }
}

/// Static metadata for one DTO.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDescriptor {
    /// Type name used in schema references.
    pub name: String,
    /// Type documentation.
    pub description: Option<String>,
    /// Fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    /// Creates a descriptor with no fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Sets the type description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Adds a field. A field with the same name replaces the earlier one.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        if let Some(idx) = self.fields.iter().position(|f| f.name == field.name) {
            self.fields[idx] = field;
        } else {
            self.fields.push(field);
        }
        self
    }
}

/// Implemented by DTOs that can be documented.
pub trait DescribeType {
    /// Returns the static descriptor for `Self`.
    fn describe() -> TypeDescriptor;

    /// Registers the descriptors of types referenced by `Self`'s fields.
    fn register_nested(_registry: &mut DescriptorRegistry) {}
}

/// Resolves type references to descriptors.
pub trait TypeDescriptorProvider {
    /// Looks up the descriptor for `type_ref`.
    fn describe_fields(&self, type_ref: &str) -> Option<&TypeDescriptor>;

    /// True when `type_ref` resolves.
    fn contains(&self, type_ref: &str) -> bool {
        self.describe_fields(type_ref).is_some()
    }
}

/// Name-keyed store of type descriptors.
#[derive(Debug, Clone, Default)]
pub struct DescriptorRegistry {
    types: IndexMap<String, TypeDescriptor>,
}

impl DescriptorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `T`, replacing any descriptor with the same name. Types
    /// referenced by `T` are registered the first time `T` is.
    pub fn register<T: DescribeType>(&mut self) -> &mut Self {
        let descriptor = T::describe();
        if self
            .types
            .insert(descriptor.name.clone(), descriptor)
            .is_none()
        {
            T::register_nested(self);
        }
        self
    }

    /// Builder flavour of [`DescriptorRegistry::register`].
    pub fn with<T: DescribeType>(mut self) -> Self {
        self.register::<T>();
        self
    }

    /// Inserts a hand-written descriptor.
    pub fn insert(&mut self, descriptor: TypeDescriptor) -> &mut Self {
        self.types.insert(descriptor.name.clone(), descriptor);
        self
    }
}

impl TypeDescriptorProvider for DescriptorRegistry {
    fn describe_fields(&self, type_ref: &str) -> Option<&TypeDescriptor> {
        self.types.get(type_ref)
    }
}
