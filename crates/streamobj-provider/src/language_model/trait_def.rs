use super::call_options::CallOptions;
use super::fragment::{Fragment, RawCallInfo, RawResponseInfo};
use crate::shared::CallWarning;
use async_trait::async_trait;
use std::pin::Pin;
use tokio_stream::Stream;

/// Error returned by a provider's `do_stream` call.
///
/// Opaque on purpose: the engine never inspects a provider's transport
/// errors, it only propagates them (spec §7 "Transport/Unknown").
#[derive(Debug, thiserror::Error)]
#[error("provider stream error: {0}")]
pub struct ProviderStreamError(pub Box<dyn std::error::Error + Send + Sync>);

impl ProviderStreamError {
    /// Wraps any boxed error as a provider stream error.
    pub fn new(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self(err.into())
    }
}

/// What a provider returns from `do_stream` (spec §6 "Provider contract").
pub struct StreamResponse {
    /// The ordered fragment stream.
    pub stream: Pin<Box<dyn Stream<Item = Fragment> + Send>>,
    /// The raw prompt/settings actually sent, for debugging and telemetry.
    pub raw_call: RawCallInfo,
    /// Response headers, if the provider exposes them before the body
    /// finishes streaming.
    pub raw_response: Option<RawResponseInfo>,
    /// Non-fatal warnings about unsupported settings or compatibility
    /// shims the provider applied.
    pub warnings: Vec<CallWarning>,
}

/// What the provider advertises about itself and the requested model
/// (spec §6 "The provider advertises...").
#[derive(Debug, Clone, Default)]
pub struct ProviderCapabilities {
    /// The provider's identifier (e.g. `"openai"`).
    pub provider: String,
    /// The specific model identifier.
    pub model_id: String,
    /// The mode used when the caller does not request one explicitly.
    pub default_object_generation_mode: Option<ObjectGenerationMode>,
    /// Whether the provider can natively enforce a JSON Schema on its
    /// text output, making a schema-reminder system message unnecessary.
    pub supports_structured_outputs: bool,
}

/// The provider-facing decoding discipline a model defaults to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectGenerationMode {
    /// Prefer JSON text-delta decoding.
    Json,
    /// Prefer forced tool-call decoding.
    Tool,
}

/// A language model capable of streaming fragments (spec §6).
///
/// The engine consumes only `do_stream` and `capabilities`; non-streaming
/// generation, embeddings, and every other model family the teacher crate
/// supports are out of scope for this engine (spec §1).
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Static capability/identity information about this model.
    fn capabilities(&self) -> ProviderCapabilities;

    /// Begins a streaming call, returning the fragment stream plus request
    /// metadata once the provider has accepted the call.
    async fn do_stream(&self, options: CallOptions) -> Result<StreamResponse, ProviderStreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language_model::{InputFormat, Mode, Prompt};

    struct DummyModel;

    #[async_trait]
    impl LanguageModel for DummyModel {
        fn capabilities(&self) -> ProviderCapabilities {
            ProviderCapabilities {
                provider: "test".into(),
                model_id: "dummy".into(),
                default_object_generation_mode: Some(ObjectGenerationMode::Json),
                supports_structured_outputs: false,
            }
        }

        async fn do_stream(
            &self,
            _options: CallOptions,
        ) -> Result<StreamResponse, ProviderStreamError> {
            unimplemented!("exercised via streamobj-core::testing::ScriptedModel instead")
        }
    }

    #[tokio::test]
    async fn test_trait_object_capabilities() {
        let model = DummyModel;
        let caps = model.capabilities();
        assert_eq!(caps.provider, "test");
        assert!(!caps.supports_structured_outputs);
        let _ = Prompt::from("ping");
        let _ = InputFormat::Prompt;
        let _ = Mode::ObjectJson {
            name: None,
            description: None,
            schema: None,
        };
    }
}
