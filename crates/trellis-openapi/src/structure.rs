//! Request/response structures and their JSON Schema reflection.
//!
//! A [`Structure`] is what a route binds to a request body or a response.
//! Types describe themselves through [`ToSchema`]; the generator turns a
//! structure into an inline schema or a `$ref` into `components.schemas`
//! when the operation is registered.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use regex_lite::Regex;
use serde_json::{json, Value};

use crate::error::SpecError;

/// A type that can describe itself as a JSON Schema.
///
/// Types returning a name from [`ToSchema::schema_name`] are registered once
/// under `components.schemas` and referenced with `$ref`; unnamed types are
/// inlined.
///
/// ```
/// use serde_json::{json, Value};
/// use std::borrow::Cow;
/// use trellis_openapi::ToSchema;
///
/// struct Pet;
///
/// impl ToSchema for Pet {
///     fn schema_name() -> Option<Cow<'static, str>> {
///         Some("Pet".into())
///     }
///
///     fn schema() -> Value {
///         json!({
///             "type": "object",
///             "required": ["id", "name"],
///             "properties": {
///                 "id": i64::schema(),
///                 "name": String::schema(),
///             }
///         })
///     }
/// }
///
/// assert_eq!(Pet::schema()["properties"]["id"]["type"], "integer");
/// ```
pub trait ToSchema {
    fn schema_name() -> Option<Cow<'static, str>> {
        None
    }

    fn schema() -> Value;
}

macro_rules! primitive_schema {
    ($($ty:ty => $schema:expr),* $(,)?) => {
        $(
            impl ToSchema for $ty {
                fn schema() -> Value {
                    $schema
                }
            }
        )*
    };
}

primitive_schema! {
    bool => json!({ "type": "boolean" }),
    String => json!({ "type": "string" }),
    str => json!({ "type": "string" }),
    char => json!({ "type": "string", "minLength": 1, "maxLength": 1 }),
    i8 => json!({ "type": "integer", "format": "int32" }),
    i16 => json!({ "type": "integer", "format": "int32" }),
    i32 => json!({ "type": "integer", "format": "int32" }),
    i64 => json!({ "type": "integer", "format": "int64" }),
    u8 => json!({ "type": "integer", "format": "int32", "minimum": 0 }),
    u16 => json!({ "type": "integer", "format": "int32", "minimum": 0 }),
    u32 => json!({ "type": "integer", "format": "int64", "minimum": 0 }),
    u64 => json!({ "type": "integer", "format": "int64", "minimum": 0 }),
    usize => json!({ "type": "integer", "format": "int64", "minimum": 0 }),
    f32 => json!({ "type": "number", "format": "float" }),
    f64 => json!({ "type": "number", "format": "double" }),
    Value => json!({}),
}

impl<T: ToSchema> ToSchema for Vec<T> {
    fn schema() -> Value {
        json!({ "type": "array", "items": T::schema() })
    }
}

impl<T: ToSchema> ToSchema for Option<T> {
    fn schema_name() -> Option<Cow<'static, str>> {
        T::schema_name()
    }

    fn schema() -> Value {
        T::schema()
    }
}

impl<T: ToSchema> ToSchema for HashMap<String, T> {
    fn schema() -> Value {
        json!({ "type": "object", "additionalProperties": T::schema() })
    }
}

impl<T: ToSchema> ToSchema for BTreeMap<String, T> {
    fn schema() -> Value {
        json!({ "type": "object", "additionalProperties": T::schema() })
    }
}

/// A request or response body binding.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    name: Option<String>,
    /// `None` means the body is empty.
    schema: Option<Value>,
}

impl Structure {
    /// Bind a type implementing [`ToSchema`].
    pub fn of<T: ToSchema + ?Sized>() -> Self {
        Self {
            name: T::schema_name().map(Cow::into_owned),
            schema: Some(T::schema()),
        }
    }

    /// Bind a raw schema registered under `name`.
    pub fn named(name: impl Into<String>, schema: Value) -> Self {
        Self {
            name: Some(name.into()),
            schema: Some(schema),
        }
    }

    /// Bind a raw schema that is always inlined.
    pub fn inline(schema: Value) -> Self {
        Self {
            name: None,
            schema: Some(schema),
        }
    }

    /// No body.
    pub fn empty() -> Self {
        Self {
            name: None,
            schema: None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.schema.is_none()
    }

    /// Human-readable label used in error messages.
    pub fn label(&self) -> String {
        match (&self.name, &self.schema) {
            (Some(name), _) => format!("structure '{}'", name),
            (None, Some(_)) => "inline structure".to_string(),
            (None, None) => "empty structure".to_string(),
        }
    }
}

fn component_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("valid component name regex"))
}

/// Named schemas collected while registering operations.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Value>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Turn a structure into the schema placed in a media type.
    ///
    /// Returns `Ok(None)` for empty structures. Named structures are stored
    /// once and referenced through `$ref`.
    pub fn reflect(
        &mut self,
        structure: &Structure,
        location: &str,
    ) -> Result<Option<Value>, SpecError> {
        let Some(schema) = &structure.schema else {
            return Ok(None);
        };

        if !schema.is_object() {
            return Err(SpecError::Unreflectable {
                target: structure.label(),
                location: location.to_string(),
                reason: format!("schema must be a JSON object, got {}", json_kind(schema)),
            });
        }

        let Some(name) = &structure.name else {
            return Ok(Some(schema.clone()));
        };

        if !component_name_pattern().is_match(name) {
            return Err(SpecError::Unreflectable {
                target: structure.label(),
                location: location.to_string(),
                reason: "schema name must match [A-Za-z0-9._-]+".to_string(),
            });
        }

        match self.schemas.get(name) {
            Some(existing) if existing != schema => {
                return Err(SpecError::ConflictingSchema {
                    name: name.clone(),
                    location: location.to_string(),
                });
            }
            Some(_) => {}
            None => {
                self.schemas.insert(name.clone(), schema.clone());
            }
        }

        Ok(Some(json!({ "$ref": format!("#/components/schemas/{}", name) })))
    }

    pub fn schemas(&self) -> &BTreeMap<String, Value> {
        &self.schemas
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
