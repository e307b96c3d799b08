//! JSON Schema for page props.
//!
//! A [`PropsSchema`] is normally derived from the typed props with `schemars`, so
//! the static type and the runtime check come from one definition. Checking
//! collects one message per field path; the first failure found for a path wins.
//! Paths are dot-joined (`events.0.title`) and the root is `$`. A missing required
//! field is reported at the field's own path, not at its parent object.

use std::{collections::BTreeMap, fmt, sync::Arc};

use jsonschema::{Validator, error::ValidationErrorKind};
use schemars::JsonSchema;
use serde_json::Value;
use thiserror::Error;

/// Path used for errors that concern the whole props object
pub const ROOT_PATH: &str = "$";

pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to serialize props schema: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("invalid props schema: {0}")]
    Invalid(String),
}

/// A compiled props schema, cheap to clone
#[derive(Clone)]
pub struct PropsSchema {
    schema: Arc<Value>,
    validator: Arc<Validator>,
}

impl PropsSchema {
    /// Derive the schema from the typed props `T`
    pub fn of<T: JsonSchema>() -> Result<Self, SchemaError> {
        let schema = serde_json::to_value(schemars::schema_for!(T))?;
        Self::from_value(schema)
    }

    /// Compile a hand-written JSON Schema document
    pub fn from_value(schema: Value) -> Result<Self, SchemaError> {
        let validator = jsonschema::options()
            .should_validate_formats(true)
            .build(&schema)
            .map_err(|e| SchemaError::Invalid(e.to_string()))?;

        Ok(Self {
            schema: Arc::new(schema),
            validator: Arc::new(validator),
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.schema
    }

    /// Check `value` against this schema and return every failing path
    pub fn check(&self, value: &Value) -> FieldErrors {
        let mut errors = FieldErrors::new();
        for error in self.validator.iter_errors(value) {
            let mut segments = pointer_segments(&error.instance_path.to_string());
            if let ValidationErrorKind::Required { property } = &error.kind {
                segments.push(match property {
                    Value::String(name) => name.clone(),
                    other => other.to_string(),
                });
            }
            errors
                .entry(render_path(&segments))
                .or_insert_with(|| error.to_string());
        }
        errors
    }
}

impl fmt::Debug for PropsSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropsSchema")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

/// Split a JSON pointer (`/events/0/title`) into unescaped segments
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Render a field path the way it appears in error maps
pub fn render_path(segments: &[String]) -> String {
    if segments.is_empty() {
        ROOT_PATH.to_string()
    } else {
        segments.join(".")
    }
}
