//! The provider-facing contract the engine consumes (spec §6).
//!
//! Everything here describes what a provider must offer — a streaming
//! fragment sequence keyed off a requested decoding [`Mode`] — not how any
//! particular provider implements it. HTTP transport, retries, and model
//! families other than text/tool-call generation are out of scope.

/// Call options sent to a provider's `do_stream`.
pub mod call_options;
/// Reason a provider finished generating.
pub mod finish_reason;
/// The streaming fragment type and provider response envelope.
pub mod fragment;
/// Prompt and message types for language model input.
pub mod prompt;
/// The `LanguageModel` trait itself.
pub mod trait_def;
/// Token usage statistics.
pub mod usage;

pub use call_options::{CallOptions, InputFormat, Mode, ObjectTool};
pub use finish_reason::FinishReason;
pub use fragment::{Fragment, RawCallInfo, RawResponseInfo};
pub use prompt::{AssistantContentPart, Message, Prompt, ToolCallPart, ToolResultPart, UserContentPart};
pub use trait_def::{
    LanguageModel, ObjectGenerationMode, ProviderCapabilities, ProviderStreamError, StreamResponse,
};
pub use usage::Usage;
