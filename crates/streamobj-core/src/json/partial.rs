//! Parsing potentially-incomplete JSON text, with repair as a fallback
//! (spec §4.1, C1).

use super::fix_json::fix_json;
use serde_json::Value;

/// The outcome of a single [`parse_partial_json`] attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    /// The caller passed no text at all (distinct from an empty string).
    UndefinedInput,
    /// `text` was valid, complete JSON.
    SuccessfulParse,
    /// `text` needed repair (closing containers, dropping trailing
    /// incomplete tokens) before it parsed.
    RepairedParse,
    /// `text` cannot plausibly be a prefix of any valid JSON.
    FailedParse,
}

/// Result of a [`parse_partial_json`] call.
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// The recovered value, if any.
    pub value: Option<Value>,
    /// Which of the three outcomes this attempt landed on.
    pub state: ParseState,
}

/// Parses `json_text` as JSON, repairing a truncated buffer if a direct
/// parse fails.
///
/// This is a pure, stateless function: every call re-parses the full
/// accumulated buffer. That is O(n²) across a whole stream, which is an
/// accepted tradeoff against the complexity of tracking parser state
/// incrementally (spec §9).
///
/// # Examples
///
/// ```
/// use streamobj_core::json::{parse_partial_json, ParseState};
///
/// let result = parse_partial_json(Some(r#"{"name":"Alice""#));
/// assert_eq!(result.state, ParseState::RepairedParse);
/// assert!(result.value.is_some());
/// ```
pub fn parse_partial_json(json_text: Option<&str>) -> ParseResult {
    let Some(text) = json_text else {
        return ParseResult {
            value: None,
            state: ParseState::UndefinedInput,
        };
    };

    if let Ok(value) = serde_json::from_str(text) {
        return ParseResult {
            value: Some(value),
            state: ParseState::SuccessfulParse,
        };
    }

    let repaired = fix_json(text);

    // Nothing survived repair (empty buffer, a lone `-`, a bare partial
    // literal with no enclosing container): still a repaired-parse per
    // spec §4.1, with `null` standing in for "no value yet".
    if repaired.trim().is_empty() {
        return ParseResult {
            value: Some(Value::Null),
            state: ParseState::RepairedParse,
        };
    }

    if let Ok(value) = serde_json::from_str(&repaired) {
        return ParseResult {
            value: Some(value),
            state: ParseState::RepairedParse,
        };
    }

    ParseResult {
        value: None,
        state: ParseState::FailedParse,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_undefined_input() {
        let result = parse_partial_json(None);
        assert_eq!(result.state, ParseState::UndefinedInput);
        assert!(result.value.is_none());
    }

    #[test]
    fn test_successful_parse() {
        let result = parse_partial_json(Some(r#"{"name":"Alice","age":30}"#));
        assert_eq!(result.state, ParseState::SuccessfulParse);
        match result.value {
            Some(Value::Object(obj)) => {
                assert_eq!(obj.get("name").and_then(|v| v.as_str()), Some("Alice"));
            }
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_repaired_parse() {
        let result = parse_partial_json(Some(r#"{"name":"Alice","age":30"#));
        assert_eq!(result.state, ParseState::RepairedParse);
        assert!(result.value.is_some());
    }

    #[test]
    fn test_repaired_array() {
        let result = parse_partial_json(Some(r#"[1,2,3"#));
        assert_eq!(result.state, ParseState::RepairedParse);
        match result.value {
            Some(Value::Array(arr)) => assert_eq!(arr.len(), 3),
            _ => panic!("expected array"),
        }
    }

    #[test]
    fn test_empty_text_is_repaired_parse_of_null() {
        let result = parse_partial_json(Some(""));
        assert_eq!(result.state, ParseState::RepairedParse);
        assert_eq!(result.value, Some(Value::Null));
    }

    #[test]
    fn test_in_progress_literal_alone_is_repaired_null() {
        let result = parse_partial_json(Some("tru"));
        assert_eq!(result.state, ParseState::RepairedParse);
        assert_eq!(result.value, Some(Value::Null));
    }

    #[test]
    fn test_failed_parse() {
        let result = parse_partial_json(Some("this is not json at all {["));
        assert_eq!(result.state, ParseState::FailedParse);
        assert!(result.value.is_none());
    }

    #[test]
    fn test_incomplete_literal_drops_field_rather_than_completing_it() {
        let result = parse_partial_json(Some(r#"{"done":tru"#));
        assert_eq!(result.state, ParseState::RepairedParse);
        match result.value {
            Some(Value::Object(obj)) => assert!(!obj.contains_key("done")),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_nested_structures() {
        let result = parse_partial_json(Some(r#"{"outer":{"inner":"value""#));
        assert_eq!(result.state, ParseState::RepairedParse);
        assert!(result.value.is_some());
    }

    #[test]
    fn test_incremental_growth_example_from_scenario_one() {
        let deltas = [r#"{ "#, r#""content": "#, r#""Hello, "#, "world", "!\"", " }"];
        let mut buffer = String::new();
        let mut snapshots = Vec::new();
        for delta in deltas {
            buffer.push_str(delta);
            let result = parse_partial_json(Some(&buffer));
            snapshots.push(result.value.unwrap_or(Value::Null));
        }
        assert_eq!(snapshots.last().unwrap()["content"], "Hello, world!");
    }
}
