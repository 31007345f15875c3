use serde::{Deserialize, Serialize};

/// Token usage for a single language model call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Usage {
    /// Number of prompt (input) tokens consumed.
    pub prompt_tokens: u32,
    /// Number of completion (output) tokens generated.
    pub completion_tokens: u32,
    /// Total tokens as reported by the provider.
    ///
    /// May differ from `prompt_tokens + completion_tokens` (e.g. reasoning
    /// tokens folded in by some providers).
    pub total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_serialization() {
        let usage = Usage {
            prompt_tokens: 3,
            completion_tokens: 10,
            total_tokens: 13,
        };
        let json = serde_json::to_value(usage).unwrap();
        assert_eq!(json["promptTokens"], 3);
        assert_eq!(json["completionTokens"], 10);
        assert_eq!(json["totalTokens"], 13);
    }

    #[test]
    fn test_usage_default() {
        let usage = Usage::default();
        assert_eq!(usage.total_tokens, 0);
    }
}
