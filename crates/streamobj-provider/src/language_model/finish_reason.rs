use serde::{Deserialize, Serialize};

/// Reason why a language model finished generating a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FinishReason {
    /// The model generated a stop sequence or reached a natural end.
    Stop,
    /// The model reached the maximum number of tokens.
    Length,
    /// A content filter stopped the model.
    ContentFilter,
    /// The model requested one or more tool calls.
    ToolCalls,
    /// The model stopped because of an error.
    Error,
    /// The model stopped for any other reason.
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finish_reason_serialization() {
        assert_eq!(
            serde_json::to_string(&FinishReason::ToolCalls).unwrap(),
            r#""tool-calls""#
        );
        assert_eq!(
            serde_json::to_string(&FinishReason::ContentFilter).unwrap(),
            r#""content-filter""#
        );
    }

    #[test]
    fn test_finish_reason_deserialization() {
        let reason: FinishReason = serde_json::from_str(r#""tool-calls""#).unwrap();
        assert_eq!(reason, FinishReason::ToolCalls);
    }
}
