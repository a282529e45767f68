//! The compiled-schema capability.
//!
//! The middleware treats every schema opaquely through the [`Schema`] trait:
//! it hands the schema a JSON value and receives either the coerced output or
//! a [`ValidationError`]. Validation is asynchronous so that schemas can
//! perform refinements against external state (uniqueness checks, lookups).
//!
//! # Example
//!
//! ```
//! use kanon_core::{schema_fn, FieldSchema, Issue, Schema, SchemaExt, ValidationError};
//! use serde_json::{json, Value};
//!
//! // Reject usernames that are already taken.
//! let username = FieldSchema::string().min_length(3).refine(|value: Value| async move {
//!     if value == json!("admin") {
//!         Err("Username is taken".to_string())
//!     } else {
//!         Ok(())
//!     }
//! });
//!
//! assert!(tokio_test::block_on(username.validate(json!("ann"))).is_ok());
//! assert!(tokio_test::block_on(username.validate(json!("admin"))).is_err());
//!
//! // Any closure can act as a compiled schema.
//! let even = schema_fn(|value: Value| async move {
//!     match value.as_i64() {
//!         Some(n) if n % 2 == 0 => Ok(value),
//!         _ => Err(ValidationError::single(Issue::custom("expected an even number"))),
//!     }
//! });
//! assert!(tokio_test::block_on(even.validate(json!(4))).is_ok());
//! ```

use crate::{Issue, ValidationError};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// A boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A compiled schema shared between requests.
pub type SharedSchema = Arc<dyn Schema>;

/// A ready-to-evaluate validation rule set.
///
/// # Invariants
///
/// - Implementations hold no per-request mutable state; one instance is
///   shared by every request a middleware handles.
/// - `validate` returns the coerced output on success. The output may differ
///   from the input (coercion, defaults, stripped keys).
pub trait Schema: Send + Sync + 'static {
    /// Validates `input`, returning the coerced output or every issue found.
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>>;

    /// Whether an enclosing object may omit this field.
    fn is_optional(&self) -> bool {
        false
    }

    /// Value substituted when an enclosing object omits this field.
    fn default_value(&self) -> Option<Value> {
        None
    }

    /// Short name used in logs.
    fn kind(&self) -> &'static str {
        "custom"
    }

    /// Why this schema cannot be used, if it was declared wrongly.
    ///
    /// Checked once when a middleware is built.
    fn declaration_error(&self) -> Option<String> {
        None
    }
}

impl std::fmt::Debug for dyn Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Schema").field(&self.kind()).finish()
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        (**self).validate(input)
    }

    fn is_optional(&self) -> bool {
        (**self).is_optional()
    }

    fn default_value(&self) -> Option<Value> {
        (**self).default_value()
    }

    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn declaration_error(&self) -> Option<String> {
        (**self).declaration_error()
    }
}

/// Combinators available on every schema.
pub trait SchemaExt: Schema + Sized {
    /// Allows the enclosing object to omit this field.
    fn optional(self) -> Optional<Self> {
        Optional(self)
    }

    /// Substitutes `value` (validated through this schema) when the field is
    /// omitted.
    fn with_default(self, value: Value) -> WithDefault<Self> {
        WithDefault {
            inner: self,
            default: value,
        }
    }

    /// Runs an asynchronous check on the output of this schema.
    ///
    /// The check receives the coerced value; an `Err(message)` becomes a
    /// `custom` issue.
    fn refine<F, Fut>(self, check: F) -> Refined<Self, F>
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        Refined { inner: self, check }
    }

    /// Erases the concrete type.
    fn shared(self) -> SharedSchema {
        Arc::new(self)
    }
}

impl<S: Schema> SchemaExt for S {}

/// See [`SchemaExt::optional`].
#[derive(Debug, Clone)]
pub struct Optional<S>(S);

impl<S: Schema> Schema for Optional<S> {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        self.0.validate(input)
    }

    fn is_optional(&self) -> bool {
        true
    }

    fn kind(&self) -> &'static str {
        self.0.kind()
    }

    fn declaration_error(&self) -> Option<String> {
        self.0.declaration_error()
    }
}

/// See [`SchemaExt::with_default`].
#[derive(Debug, Clone)]
pub struct WithDefault<S> {
    inner: S,
    default: Value,
}

impl<S: Schema> Schema for WithDefault<S> {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        self.inner.validate(input)
    }

    fn default_value(&self) -> Option<Value> {
        Some(self.default.clone())
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn declaration_error(&self) -> Option<String> {
        self.inner.declaration_error()
    }
}

/// See [`SchemaExt::refine`].
pub struct Refined<S, F> {
    inner: S,
    check: F,
}

impl<S, F, Fut> Schema for Refined<S, F>
where
    S: Schema,
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), String>> + Send + 'static,
{
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        Box::pin(async move {
            let value = self.inner.validate(input).await?;
            (self.check)(value.clone())
                .await
                .map_err(|message| ValidationError::single(Issue::custom(message)))?;
            Ok(value)
        })
    }

    fn is_optional(&self) -> bool {
        self.inner.is_optional()
    }

    fn default_value(&self) -> Option<Value> {
        self.inner.default_value()
    }

    fn kind(&self) -> &'static str {
        self.inner.kind()
    }

    fn declaration_error(&self) -> Option<String> {
        self.inner.declaration_error()
    }
}

/// A schema backed by an async closure. Created by [`schema_fn`].
pub struct FnSchema<F> {
    func: F,
}

/// Adapts an async closure into a compiled schema.
pub fn schema_fn<F, Fut>(func: F) -> FnSchema<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ValidationError>> + Send + 'static,
{
    FnSchema { func }
}

impl<F, Fut> Schema for FnSchema<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, ValidationError>> + Send + 'static,
{
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        Box::pin((self.func)(input))
    }
}

/// Accepts any value and returns it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnySchema;

impl Schema for AnySchema {
    fn validate(&self, input: Value) -> BoxFuture<'_, Result<Value, ValidationError>> {
        Box::pin(async move { Ok(input) })
    }

    fn kind(&self) -> &'static str {
        "any"
    }
}
