//! Single-pass, stack-based repair of truncated JSON text (spec §4.1).
//!
//! Unlike a speculative repairer that completes partial literals or lets an
//! in-progress number stand as-is, this one treats a value as "not yet
//! present" until its token reaches a state the spec calls safe to
//! truncate at: a string can always be closed early, a number or a literal
//! cannot be trusted until it reaches a genuine stopping point. The
//! distinction matters for streaming: `"done":tru` should repair to `{}`,
//! not `{"done":true}` — the model may still be two characters away from
//! `false`.
//!
//! The algorithm tracks, per input byte, the last position it would be
//! valid to cut the string and close every open container. Characters that
//! only make sense as part of a longer token (an object key, a dangling
//! comma, a not-yet-complete number or literal) never move that cut point;
//! closing the remaining open containers at the end produces the repair.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Root,
    InsideString { is_key: bool },
    InsideStringEscape { is_key: bool },
    InsideLiteral { start: usize },
    InsideNumber { rollback: usize, last_was_digit: bool },
    InsideObjectStart,
    InsideObjectKey,
    InsideObjectBeforeValue,
    InsideObjectAfterValue,
    InsideObjectAfterComma,
    InsideArrayStart,
    InsideArrayAfterValue,
    InsideArrayAfterComma,
}

/// Repairs a possibly-truncated JSON string into the longest prefix that
/// can be closed into valid JSON.
///
/// # Examples
///
/// ```
/// use streamobj_core::json::fix_json;
///
/// assert_eq!(fix_json(r#"{"name":"Alice""#), r#"{"name":"Alice"}"#);
/// assert_eq!(fix_json(r#"[1,2,3"#), r#"[1,2,3]"#);
///
/// // An in-progress literal is dropped, not speculatively completed.
/// assert_eq!(fix_json(r#"{"done":tru"#), "{}");
/// ```
pub fn fix_json(input: &str) -> String {
    if input.is_empty() {
        return String::new();
    }

    let mut stack: Vec<State> = vec![State::Root];
    let mut valid_len: usize = 0;
    let char_indices: Vec<(usize, char)> = input.char_indices().collect();
    let mut i = 0;

    while i < char_indices.len() {
        let (byte_idx, ch) = char_indices[i];
        let state = *stack.last().unwrap_or(&State::Root);

        match (state, ch) {
            // Root
            (State::Root, '{') => {
                stack.push(State::InsideObjectStart);
                valid_len = byte_idx + ch.len_utf8();
            }
            (State::Root, '[') => {
                stack.push(State::InsideArrayStart);
                valid_len = byte_idx + ch.len_utf8();
            }
            (State::Root, '"') => {
                stack.push(State::InsideString { is_key: false });
                valid_len = byte_idx + ch.len_utf8();
            }
            (State::Root, c) if c.is_whitespace() => {
                valid_len = byte_idx + c.len_utf8();
            }
            (State::Root, c) if c.is_ascii_digit() => {
                stack.push(State::InsideNumber {
                    rollback: valid_len,
                    last_was_digit: true,
                });
                valid_len = byte_idx + c.len_utf8();
            }
            (State::Root, '-') => {
                stack.push(State::InsideNumber {
                    rollback: valid_len,
                    last_was_digit: false,
                });
            }
            (State::Root, 't') | (State::Root, 'f') | (State::Root, 'n') => {
                stack.push(State::InsideLiteral { start: byte_idx });
            }

            // Inside a string (key strings never advance the cut point)
            (State::InsideString { is_key }, '"') => {
                stack.pop();
                if !is_key {
                    valid_len = byte_idx + 1;
                }
            }
            (State::InsideString { is_key }, '\\') => {
                stack.push(State::InsideStringEscape { is_key });
                if !is_key {
                    valid_len = byte_idx + 1;
                }
            }
            (State::InsideString { is_key }, c) => {
                if !is_key {
                    valid_len = byte_idx + c.len_utf8();
                }
            }

            (State::InsideStringEscape { is_key }, c) => {
                stack.pop();
                if !is_key {
                    valid_len = byte_idx + c.len_utf8();
                }
            }

            // Inside a literal: only a full, exact match moves the cut point.
            (State::InsideLiteral { start }, _) => {
                let target: &str = match input.as_bytes()[start] {
                    b't' => "true",
                    b'f' => "false",
                    b'n' => "null",
                    _ => unreachable!("literal states only start on t/f/n"),
                };
                let matched = byte_idx - start;
                if matched < target.len() && ch as u32 == target.as_bytes()[matched] as u32 {
                    if matched + 1 == target.len() {
                        stack.pop();
                        valid_len = byte_idx + ch.len_utf8();
                    }
                } else {
                    stack.pop();
                    continue;
                }
            }

            // Inside a number: digits are safe stopping points, continuation
            // characters (`.`, `e`, `E`, `+`, `-`) are not.
            (State::InsideNumber { rollback, .. }, c) if c.is_ascii_digit() => {
                stack.pop();
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: true,
                });
                valid_len = byte_idx + c.len_utf8();
            }
            (State::InsideNumber { rollback, .. }, c)
                if matches!(c, '.' | 'e' | 'E' | '+' | '-') =>
            {
                stack.pop();
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: false,
                });
            }
            (State::InsideNumber { rollback, last_was_digit }, _) => {
                stack.pop();
                if !last_was_digit {
                    valid_len = rollback;
                }
                continue;
            }

            // Object start
            (State::InsideObjectStart, '"') => {
                stack.pop();
                stack.push(State::InsideObjectKey);
                stack.push(State::InsideString { is_key: true });
            }
            (State::InsideObjectStart, '}') => {
                stack.pop();
                valid_len = byte_idx + 1;
            }
            (State::InsideObjectStart, c) if c.is_whitespace() => {
                valid_len = byte_idx + c.len_utf8();
            }

            // Object key (awaiting colon) — never safe on its own.
            (State::InsideObjectKey, ':') => {
                stack.pop();
                stack.push(State::InsideObjectBeforeValue);
            }
            (State::InsideObjectKey, c) if c.is_whitespace() => {}

            // Object value not yet started — the pair becomes safe only
            // once the value itself reaches a safe point.
            (State::InsideObjectBeforeValue, '{') => {
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideObjectStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideObjectBeforeValue, '[') => {
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideArrayStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideObjectBeforeValue, '"') => {
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideString { is_key: false });
                valid_len = byte_idx + 1;
            }
            (State::InsideObjectBeforeValue, c) if c.is_ascii_digit() => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: true,
                });
                valid_len = byte_idx + c.len_utf8();
            }
            (State::InsideObjectBeforeValue, '-') => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: false,
                });
            }
            (State::InsideObjectBeforeValue, 't')
            | (State::InsideObjectBeforeValue, 'f')
            | (State::InsideObjectBeforeValue, 'n') => {
                stack.pop();
                stack.push(State::InsideObjectAfterValue);
                stack.push(State::InsideLiteral { start: byte_idx });
            }
            (State::InsideObjectBeforeValue, c) if c.is_whitespace() => {}

            // Object, value just completed.
            (State::InsideObjectAfterValue, ',') => {
                stack.pop();
                stack.push(State::InsideObjectAfterComma);
            }
            (State::InsideObjectAfterValue, '}') => {
                stack.pop();
                valid_len = byte_idx + 1;
            }
            (State::InsideObjectAfterValue, c) if c.is_whitespace() => {
                valid_len = byte_idx + c.len_utf8();
            }

            // Object, dangling comma until a new key starts.
            (State::InsideObjectAfterComma, '"') => {
                stack.pop();
                stack.push(State::InsideObjectKey);
                stack.push(State::InsideString { is_key: true });
            }
            (State::InsideObjectAfterComma, c) if c.is_whitespace() => {}

            // Array start
            (State::InsideArrayStart, '{') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideObjectStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayStart, '[') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideArrayStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayStart, '"') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideString { is_key: false });
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayStart, c) if c.is_ascii_digit() => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: true,
                });
                valid_len = byte_idx + c.len_utf8();
            }
            (State::InsideArrayStart, '-') => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: false,
                });
            }
            (State::InsideArrayStart, 't') | (State::InsideArrayStart, 'f') | (State::InsideArrayStart, 'n') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideLiteral { start: byte_idx });
            }
            (State::InsideArrayStart, ']') => {
                stack.pop();
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayStart, c) if c.is_whitespace() => {
                valid_len = byte_idx + c.len_utf8();
            }

            // Array, value just completed.
            (State::InsideArrayAfterValue, ',') => {
                stack.pop();
                stack.push(State::InsideArrayAfterComma);
            }
            (State::InsideArrayAfterValue, ']') => {
                stack.pop();
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayAfterValue, c) if c.is_whitespace() => {
                valid_len = byte_idx + c.len_utf8();
            }

            // Array, dangling comma until a new element starts.
            (State::InsideArrayAfterComma, '{') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideObjectStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayAfterComma, '[') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideArrayStart);
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayAfterComma, '"') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideString { is_key: false });
                valid_len = byte_idx + 1;
            }
            (State::InsideArrayAfterComma, c) if c.is_ascii_digit() => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: true,
                });
                valid_len = byte_idx + c.len_utf8();
            }
            (State::InsideArrayAfterComma, '-') => {
                let rollback = valid_len;
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideNumber {
                    rollback,
                    last_was_digit: false,
                });
            }
            (State::InsideArrayAfterComma, 't')
            | (State::InsideArrayAfterComma, 'f')
            | (State::InsideArrayAfterComma, 'n') => {
                stack.pop();
                stack.push(State::InsideArrayAfterValue);
                stack.push(State::InsideLiteral { start: byte_idx });
            }
            (State::InsideArrayAfterComma, c) if c.is_whitespace() => {}

            _ => {}
        }

        i += 1;
    }

    // A number still mid-continuation when the buffer ends (`123.`, `-`) is
    // dropped wholesale, same as if it had never started.
    if let Some(State::InsideNumber {
        rollback,
        last_was_digit: false,
    }) = stack.last()
    {
        valid_len = *rollback;
    }

    let mut result = input[..valid_len.min(input.len())].to_string();

    while let Some(state) = stack.pop() {
        match state {
            State::Root => break,
            State::InsideString { is_key } => {
                if !is_key {
                    result.push('"');
                }
            }
            State::InsideStringEscape { is_key } => {
                if !is_key {
                    result.pop();
                    result.push('"');
                }
            }
            State::InsideLiteral { .. } | State::InsideNumber { .. } => {
                // Already resolved via `valid_len` while scanning.
            }
            State::InsideObjectStart
            | State::InsideObjectKey
            | State::InsideObjectBeforeValue
            | State::InsideObjectAfterValue
            | State::InsideObjectAfterComma => {
                result.push('}');
            }
            State::InsideArrayStart | State::InsideArrayAfterValue | State::InsideArrayAfterComma => {
                result.push(']');
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_string() {
        assert_eq!(fix_json(r#"{"name":"Alice""#), r#"{"name":"Alice"}"#);
    }

    #[test]
    fn test_close_object() {
        assert_eq!(fix_json(r#"{"a":1"#), r#"{"a":1}"#);
        assert_eq!(fix_json(r#"{"a":1,"b":2"#), r#"{"a":1,"b":2}"#);
    }

    #[test]
    fn test_close_array() {
        assert_eq!(fix_json(r#"[1,2,3"#), r#"[1,2,3]"#);
        assert_eq!(fix_json(r#"["a","b""#), r#"["a","b"]"#);
    }

    #[test]
    fn test_incomplete_literal_is_dropped_not_completed() {
        assert_eq!(fix_json(r#"{"done":tru"#), "{}");
        assert_eq!(fix_json(r#"{"done":fals"#), "{}");
        assert_eq!(fix_json(r#"{"value":nul"#), "{}");
    }

    #[test]
    fn test_complete_literal_is_kept() {
        assert_eq!(fix_json(r#"{"done":true"#), r#"{"done":true}"#);
    }

    #[test]
    fn test_in_progress_number_is_dropped() {
        assert_eq!(fix_json(r#"{"value":123."#), "{}");
        assert_eq!(fix_json(r#"{"value":-"#), "{}");
        assert_eq!(fix_json(r#"[1,2,3."#), "[1,2]");
    }

    #[test]
    fn test_complete_number_is_kept() {
        assert_eq!(fix_json(r#"{"count":42"#), r#"{"count":42}"#);
        assert_eq!(fix_json(r#"{"value":3.14"#), r#"{"value":3.14}"#);
        assert_eq!(fix_json(r#"{"value":-123"#), r#"{"value":-123}"#);
    }

    #[test]
    fn test_dangling_comma_is_dropped() {
        assert_eq!(fix_json(r#"{"a":1,"#), r#"{"a":1}"#);
        assert_eq!(fix_json(r#"[1,2,"#), "[1,2]");
    }

    #[test]
    fn test_dangling_key_without_value_is_dropped() {
        assert_eq!(fix_json(r#"{"a":1,"b""#), r#"{"a":1}"#);
        assert_eq!(fix_json(r#"{"a":1,"b":"#), r#"{"a":1}"#);
    }

    #[test]
    fn test_unterminated_string_is_truncated_not_reopened() {
        assert_eq!(
            fix_json(r#"{"content":"Hello, worl"#),
            r#"{"content":"Hello, worl"}"#
        );
    }

    #[test]
    fn test_nested_structures() {
        assert_eq!(
            fix_json(r#"{"outer":{"inner":"value""#),
            r#"{"outer":{"inner":"value"}}"#
        );
        assert_eq!(
            fix_json(r#"{"array":[1,2,{"nested":"val""#),
            r#"{"array":[1,2,{"nested":"val"}]}"#
        );
    }

    #[test]
    fn test_already_valid() {
        let valid = r#"{"name":"Alice","age":30}"#;
        assert_eq!(fix_json(valid), valid);
    }

    #[test]
    fn test_empty_string() {
        assert_eq!(fix_json(""), "");
    }

    #[test]
    fn test_escaped_characters() {
        assert_eq!(
            fix_json(r#"{"text":"hello\"world""#),
            r#"{"text":"hello\"world"}"#
        );
    }

    #[test]
    fn test_dangling_backslash_is_trimmed() {
        assert_eq!(fix_json(r#"{"text":"hello\"#), r#"{"text":"hello"}"#);
    }
}
