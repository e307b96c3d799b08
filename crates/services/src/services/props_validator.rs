//! Validation boundary between raw page props and typed page renderers.
//!
//! [`wrap`] lifts a renderer over typed props into one over raw JSON. Invalid
//! props never reach the renderer: they are turned into a fallback rendering,
//! and the fallback gets a [`Retry`] handle that re-runs the same pure check.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use super::schema::{FieldErrors, PropsSchema, ROOT_PATH};

/// The single failure kind of the validator: field path to message
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("props failed validation: {}", summarize(.errors))]
pub struct SchemaValidationError {
    pub errors: FieldErrors,
}

impl SchemaValidationError {
    pub fn new(errors: FieldErrors) -> Self {
        Self { errors }
    }

    fn root(message: impl Into<String>) -> Self {
        Self {
            errors: BTreeMap::from([(ROOT_PATH.to_string(), message.into())]),
        }
    }

    pub fn message_for(&self, path: &str) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }
}

fn summarize(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(path, message)| format!("{path}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(SchemaValidationError),
}

impl<T> ValidationResult<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    pub fn into_result(self) -> Result<T, SchemaValidationError> {
        match self {
            ValidationResult::Valid(value) => Ok(value),
            ValidationResult::Invalid(err) => Err(err),
        }
    }
}

/// Check `raw` against `schema`, then decode it into `T`.
///
/// Schema failures are reported per field. When the schema passes but serde still
/// rejects the value, the serde message is reported at the root path.
pub fn validate<T: DeserializeOwned>(schema: &PropsSchema, raw: &Value) -> ValidationResult<T> {
    let errors = schema.check(raw);
    if !errors.is_empty() {
        return ValidationResult::Invalid(SchemaValidationError::new(errors));
    }

    match serde_json::from_value(whole_floats_as_integers(raw.clone())) {
        Ok(props) => ValidationResult::Valid(props),
        Err(e) => ValidationResult::Invalid(SchemaValidationError::root(e.to_string())),
    }
}

/// JSON Schema counts `1.0` as an integer; serde's integer types do not.
fn whole_floats_as_integers(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => match n.as_f64() {
            Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < MAX_SAFE_INTEGER => {
                if f < 0.0 {
                    Value::from(f as i64)
                } else {
                    Value::from(f as u64)
                }
            }
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(whole_floats_as_integers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, item)| (key, whole_floats_as_integers(item)))
                .collect(),
        ),
        other => other,
    }
}

const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

type RenderFn<T, O> = dyn Fn(T) -> O + Send + Sync;
type FallbackFn<T, O> = dyn Fn(&SchemaValidationError, Retry<'_, T, O>) -> O + Send + Sync;
type ErrorHook = dyn Fn(&SchemaValidationError, &Value) + Send + Sync;

/// A renderer over raw props produced by [`wrap`]
pub struct ValidatedRenderer<T, O> {
    schema: PropsSchema,
    render: Box<RenderFn<T, O>>,
    fallback: Box<FallbackFn<T, O>>,
    log_errors: bool,
    on_error: Option<Box<ErrorHook>>,
}

/// Lift `render` into a renderer that validates raw props first.
///
/// `fallback` is called exactly once per failed attempt, instead of `render`.
pub fn wrap<T, O, R, F>(schema: PropsSchema, render: R, fallback: F) -> ValidatedRenderer<T, O>
where
    T: DeserializeOwned + 'static,
    O: 'static,
    R: Fn(T) -> O + Send + Sync + 'static,
    F: Fn(&SchemaValidationError, Retry<'_, T, O>) -> O + Send + Sync + 'static,
{
    ValidatedRenderer {
        schema,
        render: Box::new(render),
        fallback: Box::new(fallback),
        log_errors: false,
        on_error: None,
    }
}

impl<T: DeserializeOwned, O> ValidatedRenderer<T, O> {
    /// Emit a `warn` event for every failed attempt
    pub fn log_errors(mut self, enabled: bool) -> Self {
        self.log_errors = enabled;
        self
    }

    /// Called with the error and the raw props before the fallback renders
    pub fn on_error<H>(mut self, hook: H) -> Self
    where
        H: Fn(&SchemaValidationError, &Value) + Send + Sync + 'static,
    {
        self.on_error = Some(Box::new(hook));
        self
    }

    pub fn validate(&self, raw: &Value) -> ValidationResult<T> {
        validate(&self.schema, raw)
    }

    pub fn render_unvalidated(&self, raw: &Value) -> O {
        match self.validate(raw) {
            ValidationResult::Valid(props) => (self.render)(props),
            ValidationResult::Invalid(err) => {
                if self.log_errors {
                    warn!(
                        error_count = err.errors.len(),
                        errors = %err,
                        "Page props failed validation, rendering fallback"
                    );
                }
                if let Some(hook) = &self.on_error {
                    hook(&err, raw);
                }
                (self.fallback)(&err, Retry { renderer: self, raw })
            }
        }
    }
}

/// Retry action handed to the fallback: re-runs validation on the same raw props
pub struct Retry<'a, T, O> {
    renderer: &'a ValidatedRenderer<T, O>,
    raw: &'a Value,
}

impl<T: DeserializeOwned, O> Retry<'_, T, O> {
    /// Validate again without rendering
    pub fn attempt(&self) -> ValidationResult<T> {
        self.renderer.validate(self.raw)
    }

    /// Render again; invalid props go through the fallback once more
    pub fn retry(self) -> O {
        self.renderer.render_unvalidated(self.raw)
    }
}

/// Object-safe view of a validated renderer, used to register pages by name
pub trait RenderPage<O>: Send + Sync {
    fn render_page(&self, raw: &Value) -> O;
}

impl<T: DeserializeOwned, O> RenderPage<O> for ValidatedRenderer<T, O> {
    fn render_page(&self, raw: &Value) -> O {
        self.render_unvalidated(raw)
    }
}
