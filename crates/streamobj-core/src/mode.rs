//! Wiring a requested output shape and decoding mode into provider
//! [`CallOptions`], and pulling the right text back out of each
//! [`Fragment`] the provider emits (C4, spec §3 "Mode").

use crate::error::EngineError;
use serde_json::Value;
use streamobj_provider::{CallOptions, Fragment, InputFormat, Message, Mode, ObjectTool, Prompt};

/// The decoding discipline the caller asked for.
///
/// Distinct from [`streamobj_provider::Mode`]: this is the caller's
/// *request*, before the schema and system-message details are filled in;
/// `streamobj_provider::Mode` is what actually goes out over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestedMode {
    /// The model emits JSON as ordinary text.
    Json,
    /// The model emits JSON as a single forced tool call's arguments.
    Tool,
}

/// Name and description given to the synthetic tool used in [`RequestedMode::Tool`].
#[derive(Debug, Clone)]
pub struct ToolModeNaming {
    /// Name of the synthetic tool (defaults to `"json"`).
    pub name: String,
    /// Description of the synthetic tool.
    pub description: String,
}

impl Default for ToolModeNaming {
    fn default() -> Self {
        ToolModeNaming {
            name: "json".into(),
            description: "Respond with the requested JSON.".into(),
        }
    }
}

/// Builds the provider-facing [`CallOptions`] for one call.
///
/// Returns [`EngineError::InvalidArgument`] for the one combination the
/// engine refuses outright: `no-schema` output has nothing to hand a
/// forced tool call as its arguments schema, so it cannot pair with
/// [`RequestedMode::Tool`].
#[allow(clippy::too_many_arguments)]
pub fn build_call_options(
    requested_mode: RequestedMode,
    schema: Option<Value>,
    schema_name: Option<String>,
    schema_description: Option<String>,
    tool_naming: &ToolModeNaming,
    supports_structured_outputs: bool,
    prompt: Prompt,
    input_format: InputFormat,
) -> Result<CallOptions, EngineError> {
    match requested_mode {
        RequestedMode::Json => {
            let prompt = if supports_structured_outputs {
                prompt
            } else {
                inject_json_mode_system_message(prompt, schema.as_ref())
            };
            Ok(CallOptions::new(
                Mode::ObjectJson {
                    name: schema_name,
                    description: schema_description,
                    schema,
                },
                prompt,
                input_format,
            ))
        }
        RequestedMode::Tool => {
            let schema = schema.ok_or_else(|| {
                EngineError::InvalidArgument(
                    "tool mode requires a JSON schema to give the synthetic tool; no-schema output cannot use tool mode".into(),
                )
            })?;
            Ok(CallOptions::new(
                Mode::ObjectTool {
                    tool: ObjectTool {
                        name: tool_naming.name.clone(),
                        description: tool_naming.description.clone(),
                        parameters: schema,
                    },
                },
                prompt,
                input_format,
            ))
        }
    }
}

/// Prepends a system message reminding the model to answer in JSON, for
/// providers that cannot enforce a JSON Schema natively.
///
/// Matches the two system-message variants the engine needs: one quoting
/// the schema verbatim when there is one, and a bare reminder when the
/// output shape is `no-schema`.
fn inject_json_mode_system_message(prompt: Prompt, schema: Option<&Value>) -> Prompt {
    let reminder = match schema {
        Some(schema) => format!(
            "JSON schema:\n{}\nYou MUST answer with a JSON object that matches the JSON schema above.",
            serde_json::to_string_pretty(schema).unwrap_or_default()
        ),
        None => "You MUST answer with JSON.".to_string(),
    };

    let mut messages = match prompt {
        Prompt::Text(text) => vec![Message::user(text)],
        Prompt::Messages(messages) => messages,
    };
    messages.insert(0, Message::system(reminder));
    Prompt::Messages(messages)
}

/// Pulls the slice of JSON text, if any, that `fragment` contributes
/// under `mode`.
///
/// Fragments irrelevant to the active mode (e.g. a `ToolCallDelta` while
/// running in [`RequestedMode::Json`]) contribute nothing and yield
/// `None` rather than an empty string, so callers can distinguish
/// "no text" from "empty text delta".
pub fn fragment_text_delta(fragment: &Fragment, mode: RequestedMode) -> Option<&str> {
    match (mode, fragment) {
        (RequestedMode::Json, Fragment::TextDelta { delta }) => Some(delta.as_str()),
        (RequestedMode::Tool, Fragment::ToolCallDelta { args_text_delta, .. }) => {
            Some(args_text_delta.as_str())
        }
        (RequestedMode::Tool, Fragment::ToolCall { args_text, .. }) => Some(args_text.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_mode_without_structured_output_support_injects_schema_reminder() {
        let options = build_call_options(
            RequestedMode::Json,
            Some(json!({"type": "object"})),
            None,
            None,
            &ToolModeNaming::default(),
            false,
            Prompt::from("describe a cat"),
            InputFormat::Prompt,
        )
        .unwrap();

        match options.prompt {
            Prompt::Messages(messages) => {
                assert!(matches!(&messages[0], Message::System { content } if content.contains("JSON schema")));
            }
            Prompt::Text(_) => panic!("expected injected system message to promote prompt to messages"),
        }
    }

    #[test]
    fn test_json_mode_with_structured_output_support_skips_injection() {
        let options = build_call_options(
            RequestedMode::Json,
            Some(json!({"type": "object"})),
            None,
            None,
            &ToolModeNaming::default(),
            true,
            Prompt::from("describe a cat"),
            InputFormat::Prompt,
        )
        .unwrap();

        assert!(matches!(options.prompt, Prompt::Text(_)));
    }

    #[test]
    fn test_no_schema_without_structured_output_support_uses_bare_reminder() {
        let options = build_call_options(
            RequestedMode::Json,
            None,
            None,
            None,
            &ToolModeNaming::default(),
            false,
            Prompt::from("describe a cat"),
            InputFormat::Prompt,
        )
        .unwrap();

        match options.prompt {
            Prompt::Messages(messages) => {
                assert!(matches!(&messages[0], Message::System { content } if content == "You MUST answer with JSON."));
            }
            Prompt::Text(_) => panic!("expected injected system message"),
        }
    }

    #[test]
    fn test_tool_mode_never_injects_a_system_message() {
        let options = build_call_options(
            RequestedMode::Tool,
            Some(json!({"type": "object"})),
            None,
            None,
            &ToolModeNaming::default(),
            false,
            Prompt::from("describe a cat"),
            InputFormat::Prompt,
        )
        .unwrap();

        assert!(matches!(options.prompt, Prompt::Text(_)));
    }

    #[test]
    fn test_no_schema_with_tool_mode_is_rejected() {
        let result = build_call_options(
            RequestedMode::Tool,
            None,
            None,
            None,
            &ToolModeNaming::default(),
            false,
            Prompt::from("describe a cat"),
            InputFormat::Prompt,
        );
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
    }

    #[test]
    fn test_fragment_text_delta_ignores_mismatched_mode() {
        let frag = Fragment::ToolCallDelta {
            tool_call_id: "1".into(),
            tool_name: "json".into(),
            args_text_delta: "{\"a\":1".into(),
        };
        assert_eq!(fragment_text_delta(&frag, RequestedMode::Json), None);
        assert_eq!(
            fragment_text_delta(&frag, RequestedMode::Tool),
            Some("{\"a\":1")
        );
    }
}
