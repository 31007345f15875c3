//! # streamobj-provider
//!
//! The provider specification consumed by the `streamobj-core` streaming
//! structured-output engine: a fragment-oriented `LanguageModel` trait plus
//! the request/response types around it.
//!
//! This crate defines a contract, not an implementation — providers (HTTP
//! clients for OpenAI, Anthropic, etc.) live in their own crates and are out
//! of scope here, just as the schema library producing a JSON Schema and a
//! `validate()` function is out of scope for `streamobj-core`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use streamobj_provider::language_model::{CallOptions, InputFormat, LanguageModel, Mode, Prompt};
//!
//! async fn ask<M: LanguageModel>(model: &M) {
//!     let options = CallOptions::new(
//!         Mode::ObjectJson { name: None, description: None, schema: None },
//!         Prompt::from("Hello!"),
//!         InputFormat::Prompt,
//!     );
//!     let response = model.do_stream(options).await.unwrap();
//!     let _ = response.stream;
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

/// Language model interfaces and types for streaming fragment generation.
pub mod language_model;
/// Shared types used across provider requests and responses.
pub mod shared;

pub use language_model::{
    CallOptions, FinishReason, Fragment, InputFormat, LanguageModel, Message, Mode, Prompt,
    StreamResponse, Usage,
};
pub use shared::{CallWarning, SharedHeaders, SharedProviderMetadata, SharedProviderOptions};
