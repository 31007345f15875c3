use serde::{Deserialize, Serialize};

/// A prompt is either free-form text or an ordered sequence of messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Prompt {
    /// A single free-form user prompt.
    Text(String),
    /// An ordered sequence of role-tagged messages.
    Messages(Vec<Message>),
}

impl Default for Prompt {
    fn default() -> Self {
        Prompt::Messages(Vec::new())
    }
}

impl From<String> for Prompt {
    fn from(text: String) -> Self {
        Prompt::Text(text)
    }
}

impl From<&str> for Prompt {
    fn from(text: &str) -> Self {
        Prompt::Text(text.to_string())
    }
}

impl From<Vec<Message>> for Prompt {
    fn from(messages: Vec<Message>) -> Self {
        Prompt::Messages(messages)
    }
}

/// A message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// System message providing instructions to the model.
    System {
        /// The system message content.
        content: String,
    },
    /// User message from the human.
    User {
        /// The user message content parts.
        content: Vec<UserContentPart>,
    },
    /// Assistant message from the model.
    Assistant {
        /// The assistant message content parts.
        content: Vec<AssistantContentPart>,
    },
    /// Tool message containing tool execution results.
    Tool {
        /// The tool result content parts.
        content: Vec<ToolResultPart>,
    },
}

impl Message {
    /// Builds a user message from plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Message::User {
            content: vec![UserContentPart::Text { text: text.into() }],
        }
    }

    /// Builds a system message.
    pub fn system(text: impl Into<String>) -> Self {
        Message::System {
            content: text.into(),
        }
    }
}

/// Content part in a user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum UserContentPart {
    /// Plain text content.
    Text {
        /// The text content.
        text: String,
    },
    /// Image content, referenced by URL.
    Image {
        /// The image URL.
        url: String,
    },
}

/// Content part in an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum AssistantContentPart {
    /// Plain text content.
    Text {
        /// The text content.
        text: String,
    },
    /// A complete tool call the assistant made.
    ToolCall(ToolCallPart),
    /// A tool result the assistant is relaying.
    ToolResult(ToolResultPart),
}

/// A complete tool call (arguments fully assembled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCallPart {
    /// Unique identifier for this tool call.
    pub tool_call_id: String,
    /// Name of the tool being invoked.
    pub tool_name: String,
    /// The tool call arguments, as JSON.
    pub args: serde_json::Value,
}

/// The result of executing a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResultPart {
    /// Identifier of the tool call this result answers.
    pub tool_call_id: String,
    /// Name of the tool that was invoked.
    pub tool_name: String,
    /// The tool result, as JSON.
    pub result: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_system() {
        let msg = Message::system("You are helpful");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "system");
        assert_eq!(json["content"], "You are helpful");
    }

    #[test]
    fn test_message_user_text() {
        let msg = Message::user("Hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"][0]["type"], "text");
    }

    #[test]
    fn test_prompt_from_str() {
        let prompt: Prompt = "hi".into();
        assert!(matches!(prompt, Prompt::Text(ref s) if s == "hi"));
    }
}
