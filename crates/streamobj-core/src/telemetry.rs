//! Telemetry for one `stream_object` call (C7, spec §7 "Telemetry").
//!
//! Built directly on `tracing` spans rather than a custom event bus: the
//! teacher emits its own diagnostics with bare `tracing::debug!` calls
//! (`ai-sdk-core/src/retry.rs`), so a span per call plus field recording
//! on it is the natural extension rather than introducing a parallel
//! collector. The `ai.*`/`gen_ai.*` attribute names follow the
//! OpenTelemetry GenAI semantic convention attribute scheme used
//! elsewhere in the example pack's telemetry modules, so a
//! `tracing-opentelemetry` subscriber downstream can map them without
//! renaming.

use crate::error::EngineError;
use crate::mode::RequestedMode;
use crate::strategy::OutputShape;
use std::time::Instant;
use streamobj_provider::{FinishReason, Usage};
use tracing::field::Empty;
use tracing::Span;

/// Per-call redaction and identification settings (spec §7
/// "recordInputs"/"recordOutputs").
#[derive(Debug, Clone)]
pub struct TelemetrySettings {
    /// Whether any telemetry is emitted for this call at all.
    pub enabled: bool,
    /// Whether the prompt text is attached to the span.
    pub record_inputs: bool,
    /// Whether the accumulated response text is attached to the span.
    pub record_outputs: bool,
    /// An optional caller-supplied identifier for this call site,
    /// attached as `ai.telemetry.functionId`.
    pub function_id: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        TelemetrySettings {
            enabled: true,
            record_inputs: true,
            record_outputs: true,
            function_id: None,
        }
    }
}

/// The span and timing state for one `stream_object` call.
///
/// `None` when telemetry is disabled for the call, so every call site
/// can unconditionally hold an `Option<CallTelemetry>` rather than branch
/// on `settings.enabled` itself.
pub struct CallTelemetry {
    span: Span,
    started_at: Instant,
    record_outputs: bool,
}

impl CallTelemetry {
    /// Starts a span for one call, or returns `None` if telemetry is
    /// disabled.
    pub fn start(
        settings: &TelemetrySettings,
        provider: &str,
        model_id: &str,
        output_shape: OutputShape,
        mode: RequestedMode,
    ) -> Option<Self> {
        if !settings.enabled {
            return None;
        }

        let span = tracing::info_span!(
            "ai.stream_object",
            "gen_ai.system" = provider,
            "gen_ai.request.model" = model_id,
            "ai.operationId" = "ai.stream_object",
            "ai.settings.output" = ?output_shape,
            "ai.settings.mode" = ?mode,
            "ai.telemetry.functionId" = settings.function_id.as_deref().unwrap_or_default(),
            "ai.prompt" = Empty,
            "ai.response.object" = Empty,
            "ai.response.finishReason" = Empty,
            "ai.response.msToFirstChunk" = Empty,
            "ai.response.msToFinish" = Empty,
            "ai.usage.promptTokens" = Empty,
            "ai.usage.completionTokens" = Empty,
        );

        Some(CallTelemetry {
            span,
            started_at: Instant::now(),
            record_outputs: settings.record_outputs,
        })
    }

    /// Attaches the prompt text, if input recording is enabled.
    pub fn record_input(&self, settings: &TelemetrySettings, prompt_text: &str) {
        if settings.record_inputs {
            self.span.record("ai.prompt", prompt_text);
        }
    }

    /// Records the time from call start to the first fragment received
    /// from the provider (spec §7 "first-chunk timing").
    pub fn record_first_chunk(&self) {
        self.span
            .record("ai.response.msToFirstChunk", self.started_at.elapsed().as_millis() as u64);
    }

    /// Closes the span for a successful finish.
    pub fn finish_ok(self, text: &str, usage: Usage, finish_reason: FinishReason) {
        let _enter = self.span.enter();
        if self.record_outputs {
            self.span.record("ai.response.object", text);
        }
        self.span.record("ai.response.finishReason", format!("{finish_reason:?}"));
        self.span.record("ai.usage.promptTokens", usage.prompt_tokens);
        self.span.record("ai.usage.completionTokens", usage.completion_tokens);
        self.span
            .record("ai.response.msToFinish", self.started_at.elapsed().as_millis() as u64);
        tracing::debug!(parent: &self.span, "stream_object finished");
    }

    /// Closes the span for a failed call.
    pub fn finish_err(self, error: &EngineError) {
        let _enter = self.span.enter();
        self.span
            .record("ai.response.msToFinish", self.started_at.elapsed().as_millis() as u64);
        tracing::warn!(parent: &self.span, error = %error, "stream_object failed");
    }
}
