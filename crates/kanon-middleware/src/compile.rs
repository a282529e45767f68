//! Schema normalization.
//!
//! Each segment declaration is turned into exactly one compiled schema when
//! the middleware is built. A declaration is either a schema used as-is or a
//! field mapping; the distinction is made by the caller through
//! [`SchemaDecl`], never by probing at runtime.

use crate::options::GlobalOptions;
use kanon_core::{
    AnySchema, ConfigurationError, MissingSchemaBehavior, ObjectMode, ObjectSchema, Schema,
    Segment, SharedSchema,
};
use std::collections::HashSet;
use std::sync::Arc;

/// A segment schema declaration.
#[derive(Clone)]
pub enum SchemaDecl {
    /// A compiled schema, used unchanged.
    Schema(SharedSchema),
    /// A mapping of field name to field schema, wrapped into an object schema
    /// whose strictness comes from the options at build time.
    Fields(Vec<(String, SharedSchema)>),
}

impl SchemaDecl {
    /// Declares a compiled schema.
    pub fn schema(schema: impl Schema) -> Self {
        Self::Schema(Arc::new(schema))
    }

    /// Declares a field mapping.
    pub fn fields<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, SharedSchema)>,
        K: Into<String>,
    {
        Self::Fields(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl std::fmt::Debug for SchemaDecl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Schema(schema) => f.debug_tuple("Schema").field(&schema.kind()).finish(),
            Self::Fields(fields) => f
                .debug_tuple("Fields")
                .field(&fields.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>())
                .finish(),
        }
    }
}

/// One compiled schema per segment.
#[derive(Clone)]
pub struct CompiledSegments {
    /// Schema for path parameters.
    pub params: SharedSchema,
    /// Schema for the query string.
    pub query: SharedSchema,
    /// Schema for the body.
    pub body: SharedSchema,
}

impl CompiledSegments {
    /// Compiles all three segment declarations against `options`.
    pub fn compile(
        params: Option<SchemaDecl>,
        query: Option<SchemaDecl>,
        body: Option<SchemaDecl>,
        options: &GlobalOptions,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            params: compile_segment(Segment::Params, params, options)?,
            query: compile_segment(Segment::Query, query, options)?,
            body: compile_segment(Segment::Body, body, options)?,
        })
    }

    /// Returns the compiled schema for `segment`.
    #[must_use]
    pub fn get(&self, segment: Segment) -> &SharedSchema {
        match segment {
            Segment::Params => &self.params,
            Segment::Query => &self.query,
            Segment::Body => &self.body,
        }
    }
}

impl std::fmt::Debug for CompiledSegments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompiledSegments")
            .field("params", &self.params.kind())
            .field("query", &self.query.kind())
            .field("body", &self.body.kind())
            .finish()
    }
}

/// Normalizes one segment declaration into a compiled schema.
///
/// # Errors
///
/// Returns [`ConfigurationError`] if a field mapping contains an empty or
/// repeated field name, or the schema reports a declaration error.
pub fn compile_segment(
    segment: Segment,
    decl: Option<SchemaDecl>,
    options: &GlobalOptions,
) -> Result<SharedSchema, ConfigurationError> {
    let schema: SharedSchema = match decl {
        Some(SchemaDecl::Schema(schema)) => schema,
        Some(SchemaDecl::Fields(fields)) => {
            let mut seen = HashSet::with_capacity(fields.len());
            for (name, _) in &fields {
                if name.is_empty() {
                    return Err(ConfigurationError::EmptyFieldName { segment });
                }
                if !seen.insert(name.as_str()) {
                    return Err(ConfigurationError::DuplicateField {
                        segment,
                        field: name.clone(),
                    });
                }
            }
            Arc::new(ObjectSchema::from_fields(fields, options.default_schema_object))
        }
        None => match options.missing_schema_behavior {
            MissingSchemaBehavior::Strict => Arc::new(ObjectSchema::new(ObjectMode::Strict)),
            MissingSchemaBehavior::Any => Arc::new(AnySchema),
        },
    };

    if let Some(reason) = schema.declaration_error() {
        return Err(ConfigurationError::MisdeclaredSchema { segment, reason });
    }

    tracing::debug!(segment = %segment, kind = schema.kind(), "segment schema compiled");
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kanon_core::{FieldSchema, IssueCode, SchemaExt};
    use serde_json::json;

    fn options(mode: ObjectMode, missing: MissingSchemaBehavior) -> GlobalOptions {
        GlobalOptions {
            handler: None,
            default_schema_object: mode,
            missing_schema_behavior: missing,
        }
    }

    #[tokio::test]
    async fn test_compiled_schema_is_used_unchanged() {
        let schema = FieldSchema::integer().coerce().shared();
        let compiled = compile_segment(
            Segment::Body,
            Some(SchemaDecl::Schema(Arc::clone(&schema))),
            &options(ObjectMode::Strict, MissingSchemaBehavior::Strict),
        )
        .unwrap();

        assert!(Arc::ptr_eq(&compiled, &schema));
        assert_eq!(compiled.validate(json!("42")).await.unwrap(), json!(42));
    }

    #[tokio::test]
    async fn test_field_mapping_lax_drops_extra_keys() {
        let decl = SchemaDecl::fields([("name", FieldSchema::string().shared())]);
        let compiled = compile_segment(
            Segment::Query,
            Some(decl),
            &options(ObjectMode::Lax, MissingSchemaBehavior::Strict),
        )
        .unwrap();

        assert_eq!(compiled.kind(), "lax_object");
        let output = compiled.validate(json!({"name": "x", "extra": "y"})).await.unwrap();
        assert_eq!(output, json!({"name": "x"}));
    }

    #[tokio::test]
    async fn test_field_mapping_strict_rejects_extra_keys() {
        let decl = SchemaDecl::fields([("name", FieldSchema::string().shared())]);
        let compiled = compile_segment(
            Segment::Query,
            Some(decl),
            &options(ObjectMode::Strict, MissingSchemaBehavior::Strict),
        )
        .unwrap();

        let err = compiled
            .validate(json!({"name": "x", "extra": "y"}))
            .await
            .unwrap_err();
        assert_eq!(err.issues[0].code, IssueCode::UnrecognizedKeys);
    }

    #[tokio::test]
    async fn test_missing_schema_strict_accepts_only_empty() {
        let compiled = compile_segment(
            Segment::Body,
            None,
            &options(ObjectMode::Lax, MissingSchemaBehavior::Strict),
        )
        .unwrap();

        assert_eq!(compiled.validate(json!({})).await.unwrap(), json!({}));
        assert!(compiled.validate(json!({"a": 1})).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_schema_any_passes_through() {
        let compiled = compile_segment(
            Segment::Body,
            None,
            &options(ObjectMode::Lax, MissingSchemaBehavior::Any),
        )
        .unwrap();

        assert_eq!(compiled.kind(), "any");
        assert_eq!(compiled.validate(json!({"a": 1})).await.unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_empty_field_name_is_rejected() {
        let decl = SchemaDecl::fields([("", FieldSchema::string().shared())]);
        let err = compile_segment(Segment::Params, Some(decl), &GlobalOptions::default())
            .unwrap_err();
        assert_eq!(err, ConfigurationError::EmptyFieldName { segment: Segment::Params });
    }

    #[test]
    fn test_duplicate_field_name_is_rejected() {
        let decl = SchemaDecl::fields([
            ("id", FieldSchema::integer().shared()),
            ("id", FieldSchema::string().shared()),
        ]);
        let err = compile_segment(Segment::Params, Some(decl), &GlobalOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::DuplicateField {
                segment: Segment::Params,
                field: "id".to_string(),
            }
        );
    }

    #[test]
    fn test_misdeclared_field_is_rejected() {
        let decl = SchemaDecl::fields([
            ("name", FieldSchema::string().shared()),
            ("age", FieldSchema::string().minimum(18).shared()),
        ]);
        let err = compile_segment(Segment::Query, Some(decl), &GlobalOptions::default())
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::MisdeclaredSchema {
                segment: Segment::Query,
                reason: "field 'age': `minimum` does not apply to string".to_string(),
            }
        );

        let decl = SchemaDecl::schema(FieldSchema::boolean().max_length(5));
        let err = compile_segment(Segment::Body, Some(decl), &GlobalOptions::default())
            .unwrap_err();
        assert_eq!(err.segment(), Segment::Body);
    }

    #[test]
    fn test_compile_all_segments() {
        let compiled = CompiledSegments::compile(
            Some(SchemaDecl::fields([("id", FieldSchema::integer().shared())])),
            None,
            Some(SchemaDecl::schema(FieldSchema::any())),
            &GlobalOptions::default(),
        )
        .unwrap();

        assert_eq!(compiled.get(Segment::Params).kind(), "lax_object");
        assert_eq!(compiled.get(Segment::Query).kind(), "strict_object");
        assert_eq!(compiled.get(Segment::Body).kind(), "any");
    }
}
