//! # streamobj-core
//!
//! A streaming structured-output engine: given a [`streamobj_provider::LanguageModel`]
//! and an output strategy, [`stream_object()`] drives the provider's
//! fragment stream through incremental JSON repair and schema validation,
//! publishing four independently-paced output streams and resolving four
//! terminal promises exactly once each.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use streamobj_core::{stream_object, schema::NoSchema, strategy::ObjectStrategy};
//!
//! # async fn run(model: Arc<dyn streamobj_provider::LanguageModel>) {
//! let mut result = stream_object()
//!     .model(model)
//!     .prompt("Generate a recipe for lasagna.")
//!     .output_strategy(Arc::new(ObjectStrategy::new(NoSchema)))
//!     .execute()
//!     .await
//!     .unwrap();
//!
//! let object = result.object.wait().await.unwrap();
//! # let _ = object;
//! # }
//! ```
//!
//! What the engine does NOT do: make HTTP calls, retry failed calls, or
//! know anything about a specific schema library's types — those are the
//! provider crate's and the caller's respective jobs.

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/// Errors the engine can raise.
pub mod error;
/// Partial-JSON parsing/repair and structural equality.
pub mod json;
/// Decoding-mode wiring: call option construction and fragment text
/// extraction.
pub mod mode;
/// Bounded fan-out from one upstream pump to many consumers.
pub mod multiplex;
/// The call lifecycle state machine.
pub mod orchestrator;
/// The opaque schema descriptor contract.
pub mod schema;
/// Per-output-shape JSON handling.
pub mod strategy;
/// The public `stream_object()` entry point and result type.
pub mod stream_object;
/// Telemetry span construction for one call.
pub mod telemetry;
/// Resolve-once awaitables used for terminal values.
pub mod terminal;

/// An in-memory scripted [`streamobj_provider::LanguageModel`] for tests.
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::EngineError;
pub use mode::{RequestedMode, ToolModeNaming};
pub use orchestrator::{Broadcasts, FinishOutcome, OnFinish, StreamEvent, Terminals};
pub use schema::{NoSchema, SchemaDescriptor, ValidationOutcome};
pub use stream_object::{stream_object, StreamObjectBuilder, StreamObjectResult};
pub use strategy::{ArrayStrategy, NoSchemaStrategy, ObjectStrategy, OutputShape, OutputStrategy};
pub use telemetry::{CallTelemetry, TelemetrySettings};
pub use terminal::Terminal;

pub use streamobj_provider::{FinishReason, SharedProviderMetadata, Usage};
