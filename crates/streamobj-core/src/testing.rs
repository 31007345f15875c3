//! An in-memory scripted [`LanguageModel`] for exercising the engine
//! without a real provider.
//!
//! Grounded on the teacher's own `DummyModel` test fixture
//! (`streamobj-provider/src/language_model/trait_def.rs`), which stops
//! short of implementing `do_stream` and defers to this module by name.

use async_trait::async_trait;
use std::pin::Pin;
use streamobj_provider::{
    CallOptions, Fragment, LanguageModel, ObjectGenerationMode, ProviderCapabilities, ProviderStreamError,
    RawCallInfo, StreamResponse,
};
use tokio_stream::Stream;

/// A [`LanguageModel`] that replays a fixed script of [`Fragment`]s, or
/// fails outright, regardless of the [`CallOptions`] it is called with.
pub struct ScriptedModel {
    fragments: Vec<Fragment>,
    transport_failure: Option<String>,
    capabilities: ProviderCapabilities,
}

impl ScriptedModel {
    /// A model that streams `deltas` as `TextDelta` fragments (`json`
    /// mode), followed by a `Finish` fragment.
    pub fn text_deltas(
        deltas: Vec<impl Into<String>>,
        finish_reason: streamobj_provider::FinishReason,
        usage: streamobj_provider::Usage,
    ) -> Self {
        let mut fragments: Vec<Fragment> = deltas
            .into_iter()
            .map(|delta| Fragment::TextDelta { delta: delta.into() })
            .collect();
        fragments.push(Fragment::Finish {
            finish_reason,
            usage,
            provider_metadata: None,
        });
        ScriptedModel {
            fragments,
            transport_failure: None,
            capabilities: default_capabilities(),
        }
    }

    /// A model that streams `deltas` as `ToolCallDelta` fragments for a
    /// single tool call (`tool` mode), followed by a `Finish` fragment.
    pub fn tool_call_deltas(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        deltas: Vec<impl Into<String>>,
        finish_reason: streamobj_provider::FinishReason,
        usage: streamobj_provider::Usage,
    ) -> Self {
        let tool_call_id = tool_call_id.into();
        let tool_name = tool_name.into();
        let mut fragments: Vec<Fragment> = deltas
            .into_iter()
            .map(|delta| Fragment::ToolCallDelta {
                tool_call_id: tool_call_id.clone(),
                tool_name: tool_name.clone(),
                args_text_delta: delta.into(),
            })
            .collect();
        fragments.push(Fragment::Finish {
            finish_reason,
            usage,
            provider_metadata: None,
        });
        ScriptedModel {
            fragments,
            transport_failure: None,
            capabilities: default_capabilities(),
        }
    }

    /// A model whose `do_stream` call fails immediately, before any
    /// fragment is produced.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        ScriptedModel {
            fragments: Vec::new(),
            transport_failure: Some(message.into()),
            capabilities: default_capabilities(),
        }
    }

    /// Overrides the capabilities this model reports.
    pub fn with_capabilities(mut self, capabilities: ProviderCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

fn default_capabilities() -> ProviderCapabilities {
    ProviderCapabilities {
        provider: "scripted".into(),
        model_id: "scripted-model".into(),
        default_object_generation_mode: Some(ObjectGenerationMode::Json),
        supports_structured_outputs: false,
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn capabilities(&self) -> ProviderCapabilities {
        self.capabilities.clone()
    }

    async fn do_stream(&self, _options: CallOptions) -> Result<StreamResponse, ProviderStreamError> {
        if let Some(message) = &self.transport_failure {
            return Err(ProviderStreamError::new(std::io::Error::other(message.clone())));
        }

        let fragments = self.fragments.clone();
        let stream: Pin<Box<dyn Stream<Item = Fragment> + Send>> = Box::pin(tokio_stream::iter(fragments));
        Ok(StreamResponse {
            stream,
            raw_call: RawCallInfo::default(),
            raw_response: None,
            warnings: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamobj_provider::{FinishReason, InputFormat, Mode, Prompt, Usage};
    use tokio_stream::StreamExt;

    fn options() -> CallOptions {
        CallOptions::new(
            Mode::ObjectJson {
                name: None,
                description: None,
                schema: None,
            },
            Prompt::from("hi"),
            InputFormat::Prompt,
        )
    }

    #[tokio::test]
    async fn test_text_deltas_stream_ends_with_finish() {
        let model = ScriptedModel::text_deltas(vec!["a", "b"], FinishReason::Stop, Usage::default());
        let response = model.do_stream(options()).await.unwrap();
        let fragments: Vec<_> = response.stream.collect().await;
        assert_eq!(fragments.len(), 3);
        assert!(matches!(fragments.last(), Some(Fragment::Finish { .. })));
    }

    #[tokio::test]
    async fn test_transport_failure_fails_before_streaming() {
        let model = ScriptedModel::transport_failure("connection refused");
        assert!(model.do_stream(options()).await.is_err());
    }
}
