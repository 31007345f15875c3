use std::collections::HashMap;

/// HTTP headers as key-value pairs.
pub type SharedHeaders = HashMap<String, String>;

/// Additional provider-specific options (input), keyed by provider name.
pub type SharedProviderOptions = HashMap<String, serde_json::Map<String, serde_json::Value>>;

/// Additional provider-specific metadata (output), keyed by provider name.
///
/// Only the `finish` fragment's metadata is authoritative; metadata attached
/// to earlier fragments is not preserved across the stream (spec Open
/// Questions).
pub type SharedProviderMetadata = HashMap<String, serde_json::Map<String, serde_json::Value>>;

/// A warning surfaced by the provider or the engine about degraded behavior
/// that does not fail the call outright.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum CallWarning {
    /// A configuration setting is not supported by the model.
    UnsupportedSetting {
        /// The name of the unsupported setting.
        setting: String,
        /// Optional details about why the setting is not supported.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// A compatibility feature is in use that might lead to suboptimal results.
    Compatibility {
        /// The feature using compatibility mode.
        feature: String,
        /// Optional details about the compatibility issue.
        #[serde(skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
    /// Any other warning.
    Other {
        /// The warning message.
        message: String,
    },
}
