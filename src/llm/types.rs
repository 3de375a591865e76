//! Rust types for the OpenAI chat-completions API.
//!
//! Only the fields the conversation loop reads or writes are modelled;
//! anything else in a response is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
    Function,
}

/// A single message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
    /// Name of the function that produced a `function` message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(content.into()),
            name: None,
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Result of a tool, attributed to the function that produced it.
    pub fn function(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Function,
            content: Some(content.into()),
            name: Some(name.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "function_type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// Function name plus its arguments, still JSON-encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

fn function_type() -> String {
    "function".to_string()
}

/// Tool declaration sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub function: FunctionSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub temperature: f32,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolSchema>,
}

/// Response of `POST /chat/completions`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub choices: Vec<Choice>,
}

/// One candidate answer.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    #[serde(default)]
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
}

/// Why the model stopped producing this candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    FunctionCall,
    #[serde(other)]
    Other,
}

impl Choice {
    /// Tool calls the model wants executed, if this candidate stopped to
    /// invoke tools. Candidates that finished for any other reason yield
    /// nothing even if they carry tool calls.
    pub fn requested_tool_calls(&self) -> &[ToolCall] {
        if self.finish_reason != Some(FinishReason::ToolCalls) {
            return &[];
        }
        self.message.tool_calls.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_skips_empty_tools_and_null_fields() {
        let req = ChatCompletionRequest {
            model: "gpt-3.5-turbo".into(),
            temperature: 0.2,
            messages: vec![ChatMessage::user("hello")],
            tools: vec![],
        };

        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["model"], "gpt-3.5-turbo");
        assert_eq!(json["messages"][0]["role"], "user");
        assert!(json.get("tools").is_none());
        assert!(json["messages"][0].get("tool_calls").is_none());
        assert!(json["messages"][0].get("name").is_none());
    }

    #[test]
    fn function_message_carries_name() {
        let json = serde_json::to_value(ChatMessage::function("getLanguageInfo", "{}")).unwrap();
        assert_eq!(json["role"], "function");
        assert_eq!(json["name"], "getLanguageInfo");
    }

    #[test]
    fn response_with_tool_calls_deserializes() {
        let json = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": {"name": "getLanguageInfo", "arguments": "{}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2}
        }"#;

        let resp: ChatCompletionResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.id.as_deref(), Some("chatcmpl-1"));
        assert_eq!(resp.choices.len(), 1);
        let calls = resp.choices[0].requested_tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "getLanguageInfo");
    }

    #[test]
    fn tool_calls_ignored_unless_finish_reason_requests_them() {
        let choice: Choice = serde_json::from_value(serde_json::json!({
            "message": {
                "role": "assistant",
                "content": "done",
                "tool_calls": [{"id": "c", "function": {"name": "x", "arguments": "{}"}}]
            },
            "finish_reason": "stop"
        }))
        .unwrap();
        assert!(choice.requested_tool_calls().is_empty());
    }

    #[test]
    fn unknown_finish_reason_is_tolerated() {
        let choice: Choice = serde_json::from_value(serde_json::json!({
            "message": {"role": "assistant", "content": "hi"},
            "finish_reason": "something_new"
        }))
        .unwrap();
        assert_eq!(choice.finish_reason, Some(FinishReason::Other));
    }
}
