//! Object-shaped schemas.
//!
//! An [`ObjectSchema`] is an ordered mapping of field name to schema. It is
//! what a field mapping declared on a middleware is normalized into, and it
//! can be nested inside another object for structured bodies.
//!
//! Field schemas are awaited in declaration order and every issue is
//! collected, so a single failed request reports all offending fields.

use crate::field::value_type_name;
use crate::schema::{BoxFuture, Schema, SharedSchema};
use crate::{Issue, IssueCode, ObjectMode, ValidationError};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::sync::Arc;

/// An object schema with declared fields and a strictness mode.
///
/// # Example
///
/// ```
/// use kanon_core::{FieldSchema, ObjectMode, ObjectSchema, Schema};
/// use serde_json::json;
///
/// let strict = ObjectSchema::new(ObjectMode::Strict).field("name", FieldSchema::string());
/// let lax = ObjectSchema::new(ObjectMode::Lax).field("name", FieldSchema::string());
///
/// let input = json!({"name": "x", "extra": "y"});
/// assert!(tokio_test::block_on(strict.validate(input.clone())).is_err());
/// assert_eq!(tokio_test::block_on(lax.validate(input)).unwrap(), json!({"name": "x"}));
/// ```
#[derive(Clone)]
pub struct ObjectSchema {
    fields: IndexMap<String, SharedSchema>,
    mode: ObjectMode,
}

impl std::fmt::Debug for ObjectSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectSchema")
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("mode", &self.mode)
            .finish()
    }
}

impl ObjectSchema {
    /// Creates an object schema with no fields.
    #[must_use]
    pub fn new(mode: ObjectMode) -> Self {
        Self {
            fields: IndexMap::new(),
            mode,
        }
    }

    /// Creates an object schema from already shared field schemas.
    ///
    /// Later duplicates replace earlier ones; the middleware rejects
    /// duplicates before reaching this point.
    pub fn from_fields<I, K>(fields: I, mode: ObjectMode) -> Self
    where
        I: IntoIterator<Item = (K, SharedSchema)>,
        K: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            mode,
        }
    }

    /// Adds a field.
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, schema: impl Schema) -> Self {
        self.fields.insert(name.into(), Arc::new(schema));
        self
    }

    /// Returns the strictness mode.
    #[must_use]
    pub fn mode(&self) -> ObjectMode {
        self.mode
    }

    /// Returns the declared field names in order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    async fn check(&self, input: Value) -> Result<Value, ValidationError> {
        let mut input = match input {
            Value::Object(map) => map,
            other => {
                return Err(ValidationError::single(Issue::new(
                    IssueCode::InvalidType,
                    format!("Expected object, received {}", value_type_name(&other)),
                )));
            }
        };

        let mut issues = Vec::new();

        if self.mode == ObjectMode::Strict {
            let unknown: Vec<String> = input
                .keys()
                .filter(|key| !self.fields.contains_key(key.as_str()))
                .map(|key| format!("'{key}'"))
                .collect();
            if !unknown.is_empty() {
                issues.push(Issue::new(
                    IssueCode::UnrecognizedKeys,
                    format!("Unrecognized key(s) in object: {}", unknown.join(", ")),
                ));
            }
        }

        let mut output = Map::new();
        for (name, schema) in &self.fields {
            let value = match input.remove(name) {
                Some(value) => value,
                None => match schema.default_value() {
                    Some(default) => default,
                    None if schema.is_optional() => continue,
                    None => {
                        issues.push(Issue::at(
                            vec![name.clone()],
                            IssueCode::InvalidType,
                            "Required",
                        ));
                        continue;
                    }
                },
            };

            match schema.validate(value).await {
                Ok(value) => {
                    output.insert(name.clone(), value);
                }
                Err(err) => issues.extend(err.prefixed(name).issues),
            }
        }

        if issues.is_empty() {
            Ok(Value::Object(output))
        } else {
            Err(ValidationError::new(issues))
        }
    }
}

impl Schema for ObjectSchema {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        Box::pin(self.check(input))
    }

    fn kind(&self) -> &'static str {
        match self.mode {
            ObjectMode::Strict => "strict_object",
            ObjectMode::Lax => "lax_object",
        }
    }

    fn declaration_error(&self) -> Option<String> {
        self.fields.iter().find_map(|(name, schema)| {
            schema
                .declaration_error()
                .map(|reason| format!("field '{name}': {reason}"))
        })
    }
}
