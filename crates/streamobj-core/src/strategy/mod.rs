//! Output strategies (C3, spec §3 "Output shape").
//!
//! Where the teacher's `OutputStrategy` is generic over a
//! `T: DeserializeOwned` target type and hands back typed values, this one
//! operates on [`serde_json::Value`] throughout: the schema is an opaque
//! [`SchemaDescriptor`] the engine never inspects, so there is no type `T`
//! for the engine itself to be generic over — only the caller's schema
//! library knows how to turn a `Value` into their type, and that happens
//! outside this crate.
//!
//! Only the `object`, `array`, and `no-schema` shapes exist here; the
//! teacher's fourth shape, `enum`, has no counterpart in this engine and
//! is not implemented.

use crate::error::EngineError;
use crate::json::{parse_partial_json, ParseState};
use crate::schema::{SchemaDescriptor, ValidationOutcome};
use serde_json::Value;

/// Which of the supported output shapes a strategy implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// A single JSON object.
    Object,
    /// A JSON array of homogeneous elements.
    Array,
    /// No schema at all — any JSON value is accepted.
    NoSchema,
}

/// Per-delta and per-finish JSON handling for one output shape.
///
/// Implementations are stateless: every method re-derives its answer from
/// the full accumulated text handed to it, matching [`parse_partial_json`]'s
/// own re-parse-every-time contract (spec §9).
pub trait OutputStrategy: Send + Sync {
    /// The shape this strategy implements.
    fn shape(&self) -> OutputShape;

    /// The JSON Schema to hand to the provider for structured-output
    /// modes, if any.
    fn json_schema(&self) -> Option<Value>;

    /// Best-effort partial value for `accumulated_text`, or `None` if
    /// nothing parseable has accumulated yet.
    fn validate_partial(&self, accumulated_text: &str) -> Option<Value>;

    /// Validates the complete accumulated text at finish time. An error
    /// here is what the orchestrator wraps as
    /// [`EngineError::no_object_generated`].
    fn validate_final(&self, accumulated_text: &str) -> Result<Value, EngineError>;
}

/// The `object` output shape: a single value validated against `schema`.
pub struct ObjectStrategy<S> {
    schema: S,
}

impl<S: SchemaDescriptor> ObjectStrategy<S> {
    /// Builds an object strategy validating against `schema`.
    pub fn new(schema: S) -> Self {
        ObjectStrategy { schema }
    }
}

impl<S: SchemaDescriptor> OutputStrategy for ObjectStrategy<S> {
    fn shape(&self) -> OutputShape {
        OutputShape::Object
    }

    fn json_schema(&self) -> Option<Value> {
        self.schema.json_schema()
    }

    fn validate_partial(&self, accumulated_text: &str) -> Option<Value> {
        parse_partial_json(Some(accumulated_text)).value
    }

    fn validate_final(&self, accumulated_text: &str) -> Result<Value, EngineError> {
        let parsed = parse_partial_json(Some(accumulated_text));
        let value = match parsed.value {
            Some(value) if !value.is_null() => value,
            _ => return Err(EngineError::TypeValidation("could not parse a JSON object from the response".into())),
        };
        match self.schema.validate(value) {
            ValidationOutcome::Success(value) => Ok(value),
            ValidationOutcome::Failure(message) => Err(EngineError::TypeValidation(message)),
        }
    }
}

/// The `array` output shape: a JSON array whose elements are each
/// validated individually against `element_schema`.
pub struct ArrayStrategy<S> {
    element_schema: S,
}

impl<S: SchemaDescriptor> ArrayStrategy<S> {
    /// Builds an array strategy validating each element against
    /// `element_schema`.
    pub fn new(element_schema: S) -> Self {
        ArrayStrategy { element_schema }
    }
}

impl<S: SchemaDescriptor> OutputStrategy for ArrayStrategy<S> {
    fn shape(&self) -> OutputShape {
        OutputShape::Array
    }

    fn json_schema(&self) -> Option<Value> {
        let mut schema = serde_json::Map::new();
        schema.insert("type".into(), Value::String("array".into()));
        if let Some(items) = self.element_schema.json_schema() {
            schema.insert("items".into(), items);
        }
        Some(Value::Object(schema))
    }

    fn validate_partial(&self, accumulated_text: &str) -> Option<Value> {
        let parsed = parse_partial_json(Some(accumulated_text));
        let Some(Value::Array(elements)) = parsed.value else {
            return None;
        };

        // An element is only reported once the element after it has
        // started — only then do we know the model is done writing it,
        // since a later delta could still extend it (spec §9 "element
        // stream" look-ahead rule). A fully successful parse means the
        // stream is complete, so every element is final.
        let complete = if parsed.state == ParseState::SuccessfulParse {
            elements
        } else {
            let keep = elements.len().saturating_sub(1);
            elements.into_iter().take(keep).collect()
        };
        Some(Value::Array(complete))
    }

    fn validate_final(&self, accumulated_text: &str) -> Result<Value, EngineError> {
        let parsed = parse_partial_json(Some(accumulated_text));
        let elements = match parsed.value {
            Some(Value::Array(elements)) if parsed.state != ParseState::FailedParse => elements,
            _ => return Err(EngineError::TypeValidation("could not parse a JSON array from the response".into())),
        };

        let mut validated = Vec::with_capacity(elements.len());
        for element in elements {
            match self.element_schema.validate(element) {
                ValidationOutcome::Success(value) => validated.push(value),
                ValidationOutcome::Failure(message) => return Err(EngineError::TypeValidation(message)),
            }
        }
        Ok(Value::Array(validated))
    }
}

/// The `no-schema` output shape: any JSON value, unvalidated.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchemaStrategy;

impl OutputStrategy for NoSchemaStrategy {
    fn shape(&self) -> OutputShape {
        OutputShape::NoSchema
    }

    fn json_schema(&self) -> Option<Value> {
        None
    }

    fn validate_partial(&self, accumulated_text: &str) -> Option<Value> {
        parse_partial_json(Some(accumulated_text)).value
    }

    fn validate_final(&self, accumulated_text: &str) -> Result<Value, EngineError> {
        parse_partial_json(Some(accumulated_text))
            .value
            .filter(|value| !value.is_null())
            .ok_or_else(|| EngineError::TypeValidation("could not parse a JSON value from the response".into()))
    }
}
