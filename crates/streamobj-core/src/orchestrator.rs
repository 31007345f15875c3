//! The call lifecycle state machine (C6, spec §2 "Init → Streaming →
//! Finishing/Failing → Done").
//!
//! Drives fragments from the provider through [`crate::json::parse_partial_json`]
//! and an [`OutputStrategy`], publishing derived events to four
//! [`Multiplexer`]s and resolving the call's [`Terminal`] promises exactly
//! once apiece.

use crate::error::EngineError;
use crate::json::is_deep_equal;
use crate::mode::{fragment_text_delta, RequestedMode};
use crate::multiplex::Multiplexer;
use crate::strategy::{OutputShape, OutputStrategy};
use crate::telemetry::CallTelemetry;
use crate::terminal::Terminal;
use serde_json::Value;
use std::sync::Arc;
use streamobj_provider::{CallOptions, Fragment, FinishReason, LanguageModel, SharedProviderMetadata, Usage};
use tokio::task::JoinHandle;
use tokio_stream::StreamExt;

/// One event on the merged `full_stream` (spec §3 "fullStream").
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A raw text delta, as emitted on `text_stream`.
    TextDelta {
        /// The incremental text.
        delta: String,
    },
    /// A new partial object snapshot, as emitted on `partial_object_stream`.
    ObjectPartial {
        /// The repaired partial value.
        object: Value,
    },
    /// A newly-completed array element, as emitted on `element_stream`.
    Element {
        /// The element's position in the array.
        index: usize,
        /// The element's value.
        element: Value,
    },
    /// A recoverable error surfaced mid-stream (spec §7 "ProviderError").
    Error {
        /// The error that occurred.
        error: EngineError,
    },
    /// The terminal event, always last.
    Finish {
        /// Why the provider stopped generating.
        finish_reason: FinishReason,
        /// Token usage for the call.
        usage: Usage,
        /// Provider-specific metadata, if any.
        provider_metadata: Option<SharedProviderMetadata>,
    },
}

/// The four multiplexed output streams, kept as shared handles so any
/// number of independent consumers can subscribe (spec §3 "four output
/// streams").
#[derive(Clone)]
pub struct Broadcasts {
    /// Deduplicated partial-object snapshots.
    pub partial_object: Arc<Multiplexer<Value>>,
    /// Newly-completed array elements (only ever populated for the
    /// `array` output shape).
    pub element: Arc<Multiplexer<Value>>,
    /// Raw text deltas.
    pub text: Arc<Multiplexer<String>>,
    /// Every event, merged.
    pub full: Arc<Multiplexer<StreamEvent>>,
}

impl Broadcasts {
    fn new(buffer_depth: usize) -> Self {
        Broadcasts {
            partial_object: Arc::new(Multiplexer::new(buffer_depth)),
            element: Arc::new(Multiplexer::new(buffer_depth)),
            text: Arc::new(Multiplexer::new(buffer_depth)),
            full: Arc::new(Multiplexer::new(buffer_depth)),
        }
    }
}

/// The call's four terminal promises (spec §2 "resolve terminal
/// promises", C8).
#[derive(Clone)]
pub struct Terminals {
    /// The final validated object.
    pub object: Terminal<Value>,
    /// Token usage for the call.
    pub usage: Terminal<Usage>,
    /// Why the provider finished generating.
    pub finish_reason: Terminal<FinishReason>,
    /// Provider-specific metadata from the finish fragment.
    pub provider_metadata: Terminal<Option<SharedProviderMetadata>>,
}

impl Terminals {
    fn new() -> Self {
        Terminals {
            object: Terminal::new(),
            usage: Terminal::new(),
            finish_reason: Terminal::new(),
            provider_metadata: Terminal::new(),
        }
    }

    async fn resolve_err(&self, error: EngineError) {
        self.object.resolve(Err(error.clone())).await;
        self.usage.resolve(Err(error.clone())).await;
        self.finish_reason.resolve(Err(error.clone())).await;
        self.provider_metadata.resolve(Err(error)).await;
    }
}

/// What a successful finish hands to the `onFinish` callback.
#[derive(Debug, Clone)]
pub struct FinishOutcome {
    /// The final validated object.
    pub object: Value,
    /// Token usage for the call.
    pub usage: Usage,
    /// Why the provider finished generating.
    pub finish_reason: FinishReason,
    /// Provider-specific metadata from the finish fragment.
    pub provider_metadata: Option<SharedProviderMetadata>,
}

/// Called exactly once when the call reaches Done or Failing, with the
/// outcome either way (spec §2 "onFinish always runs").
pub type OnFinish = Box<dyn FnOnce(Result<FinishOutcome, EngineError>) + Send>;

/// Everything [`spawn`] hands back to the public entry point.
pub struct Spawned {
    /// The four multiplexed output streams.
    pub broadcasts: Broadcasts,
    /// The four terminal promises.
    pub terminals: Terminals,
    /// The background task driving the call; awaiting it is optional,
    /// it only reports panics, not call failures (those resolve the
    /// terminals instead).
    pub handle: JoinHandle<()>,
}

/// Starts the call against `model` and returns its output streams,
/// terminal promises, and driving task.
pub fn spawn(
    model: Arc<dyn LanguageModel>,
    call_options: CallOptions,
    mode: RequestedMode,
    strategy: Arc<dyn OutputStrategy>,
    telemetry: Option<CallTelemetry>,
    on_finish: Option<OnFinish>,
    buffer_depth: usize,
) -> Spawned {
    let broadcasts = Broadcasts::new(buffer_depth);
    let terminals = Terminals::new();

    let handle = tokio::spawn(run(
        model,
        call_options,
        mode,
        strategy,
        telemetry,
        on_finish,
        broadcasts.clone(),
        terminals.clone(),
    ));

    Spawned {
        broadcasts,
        terminals,
        handle,
    }
}

async fn run(
    model: Arc<dyn LanguageModel>,
    call_options: CallOptions,
    mode: RequestedMode,
    strategy: Arc<dyn OutputStrategy>,
    telemetry: Option<CallTelemetry>,
    on_finish: Option<OnFinish>,
    broadcasts: Broadcasts,
    terminals: Terminals,
) {
    let response = match model.do_stream(call_options).await {
        Ok(response) => response,
        Err(err) => {
            let error = EngineError::Transport(err.to_string());
            broadcasts
                .full
                .publish(StreamEvent::Error { error: error.clone() })
                .await;
            terminals.resolve_err(error.clone()).await;
            if let Some(on_finish) = on_finish {
                on_finish(Err(error.clone()));
            }
            if let Some(telemetry) = telemetry {
                telemetry.finish_err(&error);
            }
            return;
        }
    };

    let mut stream = response.stream;
    let mut accumulated_text = String::new();
    let mut last_partial: Option<Value> = None;
    let mut published_elements = 0usize;
    let mut first_chunk_recorded = false;
    let mut saw_finish = false;

    while let Some(fragment) = stream.next().await {
        if !first_chunk_recorded {
            if let Some(telemetry) = telemetry.as_ref() {
                telemetry.record_first_chunk();
            }
            first_chunk_recorded = true;
        }

        match &fragment {
            Fragment::Finish {
                finish_reason,
                usage,
                provider_metadata,
            } => {
                saw_finish = true;
                finish(
                    &strategy,
                    &broadcasts,
                    &terminals,
                    telemetry,
                    on_finish,
                    &accumulated_text,
                    &mut last_partial,
                    &mut published_elements,
                    *finish_reason,
                    usage.clone(),
                    provider_metadata.clone(),
                )
                .await;
                return;
            }
            Fragment::Error { error } => {
                broadcasts
                    .full
                    .publish(StreamEvent::Error {
                        error: EngineError::ProviderError(error.clone()),
                    })
                    .await;
                continue;
            }
            _ => {}
        }

        let Some(delta) = fragment_text_delta(&fragment, mode) else {
            continue;
        };
        if delta.is_empty() {
            continue;
        }
        accumulated_text.push_str(delta);

        broadcasts.text.publish(delta.to_string()).await;
        broadcasts
            .full
            .publish(StreamEvent::TextDelta { delta: delta.to_string() })
            .await;

        if let Some(partial) = strategy.validate_partial(&accumulated_text) {
            let changed = match &last_partial {
                Some(previous) => !is_deep_equal(previous, &partial),
                None => true,
            };
            if changed {
                if strategy.shape() == OutputShape::Array {
                    if let Value::Array(elements) = &partial {
                        for element in elements.iter().skip(published_elements) {
                            broadcasts.element.publish(element.clone()).await;
                            broadcasts
                                .full
                                .publish(StreamEvent::Element {
                                    index: published_elements,
                                    element: element.clone(),
                                })
                                .await;
                            published_elements += 1;
                        }
                    }
                }
                broadcasts.partial_object.publish(partial.clone()).await;
                broadcasts
                    .full
                    .publish(StreamEvent::ObjectPartial { object: partial.clone() })
                    .await;
                last_partial = Some(partial);
            }
        }
    }

    if !saw_finish {
        let error = EngineError::Transport("provider stream ended without a finish event".into());
        broadcasts
            .full
            .publish(StreamEvent::Error { error: error.clone() })
            .await;
        terminals.resolve_err(error.clone()).await;
        if let Some(on_finish) = on_finish {
            on_finish(Err(error.clone()));
        }
        if let Some(telemetry) = telemetry {
            telemetry.finish_err(&error);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn finish(
    strategy: &Arc<dyn OutputStrategy>,
    broadcasts: &Broadcasts,
    terminals: &Terminals,
    telemetry: Option<CallTelemetry>,
    on_finish: Option<OnFinish>,
    accumulated_text: &str,
    last_partial: &mut Option<Value>,
    published_elements: &mut usize,
    finish_reason: FinishReason,
    usage: Usage,
    provider_metadata: Option<SharedProviderMetadata>,
) {
    match strategy.validate_final(accumulated_text) {
        Ok(value) => {
            if strategy.shape() == OutputShape::Array {
                if let Value::Array(elements) = &value {
                    for (index, element) in elements.iter().enumerate().skip(*published_elements) {
                        broadcasts.element.publish(element.clone()).await;
                        broadcasts
                            .full
                            .publish(StreamEvent::Element {
                                index,
                                element: element.clone(),
                            })
                            .await;
                    }
                    *published_elements = elements.len();
                }
            }

            let changed = match last_partial {
                Some(previous) => !is_deep_equal(previous, &value),
                None => true,
            };
            if changed {
                broadcasts.partial_object.publish(value.clone()).await;
                broadcasts
                    .full
                    .publish(StreamEvent::ObjectPartial { object: value.clone() })
                    .await;
            }

            broadcasts
                .full
                .publish(StreamEvent::Finish {
                    finish_reason,
                    usage,
                    provider_metadata: provider_metadata.clone(),
                })
                .await;

            terminals.object.resolve(Ok(value.clone())).await;
            terminals.usage.resolve(Ok(usage)).await;
            terminals.finish_reason.resolve(Ok(finish_reason)).await;
            terminals.provider_metadata.resolve(Ok(provider_metadata.clone())).await;

            if let Some(on_finish) = on_finish {
                on_finish(Ok(FinishOutcome {
                    object: value,
                    usage,
                    finish_reason,
                    provider_metadata,
                }));
            }
            if let Some(telemetry) = telemetry {
                telemetry.finish_ok(accumulated_text, usage, finish_reason);
            }
        }
        Err(cause) => {
            let error = EngineError::no_object_generated(cause, accumulated_text.to_string(), usage);
            broadcasts
                .full
                .publish(StreamEvent::Error { error: error.clone() })
                .await;
            terminals.resolve_err(error.clone()).await;
            if let Some(on_finish) = on_finish {
                on_finish(Err(error.clone()));
            }
            if let Some(telemetry) = telemetry {
                telemetry.finish_err(&error);
            }
        }
    }
}
