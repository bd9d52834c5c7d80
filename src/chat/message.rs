//! Provider-agnostic message types for chat completion.
//!
//! These types decouple orchestration from any specific LLM SDK. Adapters in
//! [`super::providers`] translate them to and from vendor types.

use serde::{Deserialize, Serialize};

use super::tool::{ToolCall, ToolDefinition};
use crate::core::{ConversationTurn, Role};

/// Role of a chat message participant.
///
/// A superset of the conversation [`Role`] that adds tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System instructions.
    System,
    /// User input.
    User,
    /// Assistant response.
    Assistant,
    /// Tool result.
    Tool,
}

impl From<Role> for MessageRole {
    fn from(role: Role) -> Self {
        match role {
            Role::System => Self::System,
            Role::User => Self::User,
            Role::Assistant => Self::Assistant,
        }
    }
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender.
    pub role: MessageRole,
    /// Message content.
    pub content: String,
    /// Tool calls requested by the assistant (only for `MessageRole::Assistant`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Tool call ID this message responds to (only for `MessageRole::Tool`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&ConversationTurn> for ChatMessage {
    fn from(turn: &ConversationTurn) -> Self {
        Self {
            role: turn.role().into(),
            content: turn.content().to_string(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// Sampling settings shared by every call an orchestrator makes.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    /// Model or deployment identifier.
    pub model: String,
    /// Sampling temperature (0.0–2.0). `None` uses the service default.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
}

impl ChatSettings {
    /// Settings for `model` with service defaults for everything else.
    #[must_use]
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            temperature: None,
            max_tokens: None,
        }
    }
}

/// A chat completion request (provider-agnostic).
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier (deployment name on Azure).
    pub model: String,
    /// Ordered conversation messages.
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
    /// Maximum tokens to generate.
    pub max_tokens: Option<u32>,
    /// Tool definitions available to the model.
    pub tools: Vec<ToolDefinition>,
}

impl ChatRequest {
    /// Builds a request from a history and settings.
    #[must_use]
    pub fn new(messages: Vec<ChatMessage>, settings: &ChatSettings) -> Self {
        Self {
            model: settings.model.clone(),
            messages,
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            tools: Vec::new(),
        }
    }

    /// Attaches tool definitions.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }
}

/// Token usage statistics from a completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens consumed by the prompt.
    pub prompt_tokens: u32,
    /// Tokens generated in the completion.
    pub completion_tokens: u32,
    /// Total tokens used.
    pub total_tokens: u32,
}

/// A chat completion response (provider-agnostic).
#[derive(Debug, Clone, Default)]
pub struct ChatResponse {
    /// Generated text content.
    pub content: String,
    /// Token usage statistics.
    pub usage: TokenUsage,
    /// Tool calls requested by the model.
    pub tool_calls: Vec<ToolCall>,
    /// Finish reason from the model (e.g., `"stop"`, `"tool_calls"`).
    pub finish_reason: Option<String>,
}

impl ChatResponse {
    /// Final text response with no tool calls.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
            ..Self::default()
        }
    }

    /// Response requesting the given tool calls.
    #[must_use]
    pub fn tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            finish_reason: Some("tool_calls".to_string()),
            ..Self::default()
        }
    }

    /// Classifies the response into one of the two disjoint outcomes.
    #[must_use]
    pub fn into_outcome(self) -> ChatOutcome {
        if self.tool_calls.is_empty() {
            ChatOutcome::Final {
                content: self.content,
                usage: self.usage,
            }
        } else {
            ChatOutcome::ToolCalls {
                content: self.content,
                calls: self.tool_calls,
                usage: self.usage,
            }
        }
    }
}

/// Outcome of a tool-enabled completion.
///
/// The model either answered or asked for tools; never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatOutcome {
    /// The model produced its final answer.
    Final {
        /// Answer text.
        content: String,
        /// Token usage for the call.
        usage: TokenUsage,
    },
    /// The model requested one or more tool invocations.
    ToolCalls {
        /// Any text the model emitted alongside the calls.
        content: String,
        /// Requested calls, in the order the model listed them.
        calls: Vec<ToolCall>,
        /// Token usage for the call.
        usage: TokenUsage,
    },
}

/// Creates a system message.
#[must_use]
pub fn system_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: MessageRole::System,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// Creates a user message.
#[must_use]
pub fn user_message(content: &str) -> ChatMessage {
    ChatMessage {
        role: MessageRole::User,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: None,
    }
}

/// Creates an assistant message carrying tool calls.
#[must_use]
pub const fn assistant_tool_calls_message(content: String, tool_calls: Vec<ToolCall>) -> ChatMessage {
    ChatMessage {
        role: MessageRole::Assistant,
        content,
        tool_calls,
        tool_call_id: None,
    }
}

/// Creates a tool result message.
#[must_use]
pub fn tool_message(tool_call_id: &str, content: &str) -> ChatMessage {
    ChatMessage {
        role: MessageRole::Tool,
        content: content.to_string(),
        tool_calls: Vec::new(),
        tool_call_id: Some(tool_call_id.to_string()),
    }
}
