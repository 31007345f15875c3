use super::finish_reason::FinishReason;
use super::usage::Usage;
use crate::shared::{CallWarning, SharedProviderMetadata};
use serde::{Deserialize, Serialize};

/// One event from the provider's streaming decoder (spec §3 "Fragment").
///
/// Ordering invariant upheld by every [`crate::LanguageModel`] implementation:
/// at most one [`Fragment::Finish`], which is terminal. [`Fragment::Error`]
/// may appear multiple times, but only `Finish` closes the stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Fragment {
    /// An incremental slice of plain-text output (`json` mode).
    TextDelta {
        /// The incremental text.
        delta: String,
    },
    /// An incremental slice of a tool call's argument JSON (`tool` mode).
    ToolCallDelta {
        /// Identifier of the tool call this delta belongs to.
        tool_call_id: String,
        /// Name of the tool being called.
        tool_name: String,
        /// The incremental slice of the arguments JSON text.
        args_text_delta: String,
    },
    /// A complete tool call (used by providers that do not stream tool
    /// call arguments incrementally).
    ToolCall {
        /// Identifier of the tool call.
        tool_call_id: String,
        /// Name of the tool being called.
        tool_name: String,
        /// The complete arguments JSON text.
        args_text: String,
    },
    /// A recoverable error surfaced mid-stream. Does not terminate the
    /// stream by itself.
    Error {
        /// A human-readable description of the error.
        error: String,
    },
    /// The terminal event. Exactly one is emitted, and it is always last.
    Finish {
        /// Why the provider stopped generating.
        finish_reason: FinishReason,
        /// Token usage for the call.
        usage: Usage,
        /// Provider-specific metadata, if any.
        #[serde(skip_serializing_if = "Option::is_none")]
        provider_metadata: Option<SharedProviderMetadata>,
    },
}

/// What the provider returned from `do_stream`, besides the fragment stream
/// itself.
#[derive(Debug, Clone, Default)]
pub struct RawCallInfo {
    /// The exact prompt payload sent to the provider, for debugging.
    pub raw_prompt: Option<serde_json::Value>,
    /// The exact settings payload sent to the provider, for debugging.
    pub raw_settings: Option<serde_json::Value>,
}

/// Response headers the provider returned, if it returned any.
#[derive(Debug, Clone, Default)]
pub struct RawResponseInfo {
    /// Response headers, if available.
    pub headers: Option<crate::shared::SharedHeaders>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_text_delta_serialization() {
        let frag = Fragment::TextDelta {
            delta: "Hello".into(),
        };
        let json = serde_json::to_value(&frag).unwrap();
        assert_eq!(json["type"], "text-delta");
        assert_eq!(json["delta"], "Hello");
    }

    #[test]
    fn test_fragment_finish_serialization() {
        let frag = Fragment::Finish {
            finish_reason: FinishReason::Stop,
            usage: Usage {
                prompt_tokens: 3,
                completion_tokens: 10,
                total_tokens: 13,
            },
            provider_metadata: None,
        };
        let json = serde_json::to_value(&frag).unwrap();
        assert_eq!(json["type"], "finish");
        assert_eq!(json["finishReason"], "stop");
    }
}
