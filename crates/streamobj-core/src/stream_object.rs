//! The public entry point (spec §1/§4): `stream_object()` and its
//! result type.
//!
//! Grounded on the teacher's `StreamObjectBuilder`/`stream_object()`/
//! `StreamObjectResult` shape (`generate_object/stream_object.rs`): a
//! builder gathering the call's inputs, an `execute()` that validates
//! them and starts the call, and a result carrying both streams and
//! once-resolved values. Internals differ throughout — this crate drives
//! the call through the [`crate::orchestrator`] state machine instead of
//! a single `async_stream::stream!` block, and exposes four streams plus
//! four terminals instead of one stream and two oneshots, per this
//! engine's broader surface.

use crate::error::EngineError;
use crate::mode::{build_call_options, RequestedMode, ToolModeNaming};
use crate::multiplex::DEFAULT_BUFFER_DEPTH;
use crate::orchestrator::{self, Broadcasts, OnFinish, StreamEvent, Terminals};
use crate::strategy::OutputStrategy;
use crate::telemetry::{CallTelemetry, TelemetrySettings};
use crate::terminal::Terminal;
use bytes::Bytes;
use serde_json::Value;
use std::pin::Pin;
use std::sync::Arc;
use streamobj_provider::{
    FinishReason, InputFormat, LanguageModel, Prompt, SharedProviderMetadata, Usage,
};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::task::JoinHandle;
use tokio_stream::{Stream, StreamExt};

/// Gathers the inputs for one `stream_object` call.
pub struct StreamObjectBuilder {
    model: Option<Arc<dyn LanguageModel>>,
    prompt: Option<Prompt>,
    input_format: InputFormat,
    strategy: Option<Arc<dyn OutputStrategy>>,
    mode: RequestedMode,
    schema_name: Option<String>,
    schema_description: Option<String>,
    tool_naming: ToolModeNaming,
    telemetry: TelemetrySettings,
    on_finish: Option<OnFinish>,
    buffer_depth: usize,
}

impl StreamObjectBuilder {
    /// Starts a new, empty builder.
    pub fn new() -> Self {
        StreamObjectBuilder {
            model: None,
            prompt: None,
            input_format: InputFormat::Prompt,
            strategy: None,
            mode: RequestedMode::Json,
            schema_name: None,
            schema_description: None,
            tool_naming: ToolModeNaming::default(),
            telemetry: TelemetrySettings::default(),
            on_finish: None,
            buffer_depth: DEFAULT_BUFFER_DEPTH,
        }
    }

    /// Sets the language model to call.
    pub fn model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.model = Some(model);
        self
    }

    /// Sets the prompt from free-form text.
    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(Prompt::from(prompt.into()));
        self.input_format = InputFormat::Prompt;
        self
    }

    /// Sets the prompt from an ordered message sequence.
    pub fn messages(mut self, messages: Vec<streamobj_provider::Message>) -> Self {
        self.prompt = Some(Prompt::Messages(messages));
        self.input_format = InputFormat::Messages;
        self
    }

    /// Sets the output strategy (object/array/no-schema).
    pub fn output_strategy(mut self, strategy: Arc<dyn OutputStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Sets the requested decoding mode (defaults to `json`).
    pub fn mode(mut self, mode: RequestedMode) -> Self {
        self.mode = mode;
        self
    }

    /// Names the schema, surfaced to providers that support naming it.
    pub fn schema_name(mut self, name: impl Into<String>) -> Self {
        self.schema_name = Some(name.into());
        self
    }

    /// Describes the schema, surfaced to providers that support it.
    pub fn schema_description(mut self, description: impl Into<String>) -> Self {
        self.schema_description = Some(description.into());
        self
    }

    /// Overrides the synthetic tool's name/description for `tool` mode.
    pub fn tool_naming(mut self, naming: ToolModeNaming) -> Self {
        self.tool_naming = naming;
        self
    }

    /// Overrides telemetry settings (defaults to enabled, recording
    /// inputs and outputs).
    pub fn telemetry(mut self, settings: TelemetrySettings) -> Self {
        self.telemetry = settings;
        self
    }

    /// Registers a callback invoked exactly once when the call reaches
    /// Done or Failing, whether it succeeded or not.
    pub fn on_finish(mut self, callback: OnFinish) -> Self {
        self.on_finish = Some(callback);
        self
    }

    /// Overrides the per-consumer channel depth for the output streams.
    pub fn buffer_depth(mut self, depth: usize) -> Self {
        self.buffer_depth = depth;
        self
    }

    /// Validates the builder and starts the call.
    pub async fn execute(self) -> Result<StreamObjectResult, EngineError> {
        let model = self
            .model
            .ok_or_else(|| EngineError::InvalidArgument("a language model is required".into()))?;
        let prompt = self
            .prompt
            .ok_or_else(|| EngineError::InvalidArgument("a prompt is required".into()))?;
        let strategy = self
            .strategy
            .ok_or_else(|| EngineError::InvalidArgument("an output strategy is required".into()))?;

        let capabilities = model.capabilities();
        let schema = strategy.json_schema();

        let call_options = build_call_options(
            self.mode,
            schema,
            self.schema_name,
            self.schema_description,
            &self.tool_naming,
            capabilities.supports_structured_outputs,
            prompt,
            self.input_format,
        )?;

        let telemetry = CallTelemetry::start(
            &self.telemetry,
            &capabilities.provider,
            &capabilities.model_id,
            strategy.shape(),
            self.mode,
        );
        if let Some(telemetry) = telemetry.as_ref() {
            if let Ok(prompt_text) = serde_json::to_string(&call_options.prompt) {
                telemetry.record_input(&self.telemetry, &prompt_text);
            }
        }

        let orchestrator::Spawned {
            broadcasts,
            terminals,
            handle,
        } = orchestrator::spawn(
            model,
            call_options,
            self.mode,
            strategy,
            telemetry,
            self.on_finish,
            self.buffer_depth,
        );

        Ok(StreamObjectResult::new(broadcasts, terminals, handle).await)
    }
}

impl Default for StreamObjectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a new [`StreamObjectBuilder`].
pub fn stream_object() -> StreamObjectBuilder {
    StreamObjectBuilder::new()
}

/// The result of a `stream_object` call: four live streams plus four
/// terminal promises (spec §3 "Result surface").
pub struct StreamObjectResult {
    /// Deduplicated partial-object snapshots.
    pub partial_object_stream: Pin<Box<dyn Stream<Item = Value> + Send>>,
    /// Newly-completed array elements (empty for non-array shapes).
    pub element_stream: Pin<Box<dyn Stream<Item = Value> + Send>>,
    /// Raw text deltas.
    pub text_stream: Pin<Box<dyn Stream<Item = String> + Send>>,
    /// Every event, merged, in order.
    pub full_stream: Pin<Box<dyn Stream<Item = StreamEvent> + Send>>,
    /// Resolves to the final validated object, or the call's error.
    pub object: Terminal<Value>,
    /// Resolves to the call's token usage.
    pub usage: Terminal<Usage>,
    /// Resolves to why the provider finished generating.
    pub finish_reason: Terminal<FinishReason>,
    /// Resolves to provider-specific metadata from the finish fragment.
    pub provider_metadata: Terminal<Option<SharedProviderMetadata>>,
    /// The background task driving the call.
    pub handle: JoinHandle<()>,
}

impl StreamObjectResult {
    async fn new(broadcasts: Broadcasts, terminals: Terminals, handle: JoinHandle<()>) -> Self {
        StreamObjectResult {
            partial_object_stream: Box::pin(broadcasts.partial_object.subscribe().await),
            element_stream: Box::pin(broadcasts.element.subscribe().await),
            text_stream: Box::pin(broadcasts.text.subscribe().await),
            full_stream: Box::pin(broadcasts.full.subscribe().await),
            object: terminals.object,
            usage: terminals.usage,
            finish_reason: terminals.finish_reason,
            provider_metadata: terminals.provider_metadata,
            handle,
        }
    }

    /// Adapts `text_stream` into a byte stream suitable for an HTTP
    /// streaming response body.
    pub fn to_text_stream_response(self) -> Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>> {
        Box::pin(self.text_stream.map(|chunk| Ok(Bytes::from(chunk.into_bytes()))))
    }

    /// Writes every `text_stream` chunk to `writer` as it arrives.
    pub async fn pipe_text_stream_to_response<W: AsyncWrite + Unpin + Send>(
        mut self,
        mut writer: W,
    ) -> std::io::Result<()> {
        while let Some(chunk) = self.text_stream.next().await {
            writer.write_all(chunk.as_bytes()).await?;
        }
        writer.flush().await
    }
}
