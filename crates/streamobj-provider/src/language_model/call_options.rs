use super::prompt::Prompt;
use crate::shared::{SharedHeaders, SharedProviderMetadata};
use serde::{Deserialize, Serialize};

/// How the prompt field should be interpreted by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// `prompt` is a single free-form string.
    Prompt,
    /// `prompt` is an ordered sequence of role-tagged messages.
    Messages,
}

/// A synthetic function tool used to coerce `tool` mode output into JSON
/// matching a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectTool {
    /// The tool's name, as sent to the provider.
    pub name: String,
    /// A human-readable description of the tool.
    pub description: String,
    /// JSON Schema the tool's arguments must satisfy.
    pub parameters: serde_json::Value,
}

/// The decoding discipline the provider is asked to use for structured
/// output (spec §3 "Mode").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Mode {
    /// The provider emits JSON text as ordinary text-deltas.
    ObjectJson {
        /// Name to give the JSON schema, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        /// Description of the JSON schema, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        /// The JSON Schema the response must satisfy, if any (`no-schema`
        /// output omits this).
        #[serde(skip_serializing_if = "Option::is_none")]
        schema: Option<serde_json::Value>,
    },
    /// The provider emits the JSON as a single forced tool call's arguments.
    ObjectTool {
        /// The synthetic tool the model is forced to call.
        tool: ObjectTool,
    },
}

/// Options passed to a provider's `do_stream` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallOptions {
    /// The decoding mode requested of the provider.
    pub mode: Mode,
    /// The prompt to send to the model.
    pub prompt: Prompt,
    /// Whether `prompt` is a bare string or a message sequence.
    pub input_format: InputFormat,
    /// Sampling temperature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    /// Nucleus sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    /// Top-k sampling parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<u32>,
    /// Frequency penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f32>,
    /// Presence penalty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f32>,
    /// Sequences that stop generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_sequences: Option<Vec<String>>,
    /// Maximum number of tokens to generate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Random seed for deterministic generation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    /// Additional HTTP headers for the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headers: Option<SharedHeaders>,
    /// Provider-specific options, keyed by provider name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_metadata: Option<SharedProviderMetadata>,
}

impl CallOptions {
    /// Builds a minimal set of call options for the given mode and prompt.
    pub fn new(mode: Mode, prompt: Prompt, input_format: InputFormat) -> Self {
        Self {
            mode,
            prompt,
            input_format,
            temperature: None,
            top_p: None,
            top_k: None,
            frequency_penalty: None,
            presence_penalty: None,
            stop_sequences: None,
            max_tokens: None,
            seed: None,
            headers: None,
            provider_metadata: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_object_json_serialization() {
        let mode = Mode::ObjectJson {
            name: Some("Recipe".into()),
            description: None,
            schema: Some(serde_json::json!({"type": "object"})),
        };
        let json = serde_json::to_value(&mode).unwrap();
        assert_eq!(json["type"], "object-json");
        assert_eq!(json["name"], "Recipe");
    }

    #[test]
    fn test_mode_object_tool_serialization() {
        let mode = Mode::ObjectTool {
            tool: ObjectTool {
                name: "json".into(),
                description: "Respond with a JSON object.".into(),
                parameters: serde_json::json!({"type": "object"}),
            },
        };
        let json = serde_json::to_value(&mode).unwrap();
        assert_eq!(json["type"], "object-tool");
        assert_eq!(json["tool"]["name"], "json");
    }

    #[test]
    fn test_call_options_new() {
        let opts = CallOptions::new(
            Mode::ObjectJson {
                name: None,
                description: None,
                schema: None,
            },
            Prompt::Text("hi".into()),
            InputFormat::Prompt,
        );
        assert!(opts.temperature.is_none());
        assert_eq!(opts.input_format, InputFormat::Prompt);
    }
}
