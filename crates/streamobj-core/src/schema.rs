//! The schema descriptor contract (spec §3 "Schema descriptor").
//!
//! The schema library itself — whatever turns a Rust type or a builder
//! into a JSON Schema and a validator — is out of scope (spec §1). This
//! module only defines the seam the engine calls through.

use serde_json::Value;

/// The outcome of validating a fully-formed value against a schema.
#[derive(Debug, Clone)]
pub enum ValidationOutcome {
    /// The value satisfies the schema. Carries the value back since a
    /// validator may coerce or normalize it (e.g. apply defaults).
    Success(Value),
    /// The value does not satisfy the schema, with a human-readable
    /// explanation of why.
    Failure(String),
}

/// An opaque schema the engine validates terminal values against.
///
/// The engine never inspects the shape of the schema itself — only its
/// `json_schema()` (to hand to the provider) and `validate()` (to check a
/// fully-assembled value at finish time).
pub trait SchemaDescriptor: Send + Sync {
    /// The JSON Schema (draft-07) describing valid values, if the output
    /// shape has one (`no-schema` output has none).
    fn json_schema(&self) -> Option<Value>;

    /// Validates a complete value. Never called on a partial/in-progress
    /// value — only at finalize time (spec §7 "TypeValidation").
    fn validate(&self, value: Value) -> ValidationOutcome;
}

/// A schema descriptor that accepts any value and has no JSON Schema to
/// advertise, used for the `no-schema` output shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSchema;

impl SchemaDescriptor for NoSchema {
    fn json_schema(&self) -> Option<Value> {
        None
    }

    fn validate(&self, value: Value) -> ValidationOutcome {
        ValidationOutcome::Success(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_schema_has_no_json_schema() {
        assert!(NoSchema.json_schema().is_none());
    }

    #[test]
    fn test_no_schema_accepts_anything() {
        match NoSchema.validate(serde_json::json!({"anything": true})) {
            ValidationOutcome::Success(_) => {}
            ValidationOutcome::Failure(_) => panic!("NoSchema must never fail validation"),
        }
    }
}
