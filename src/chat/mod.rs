//! Chat-completion abstraction.
//!
//! Provider-agnostic messages and tool types, the [`ChatClient`] trait the
//! orchestrators depend on, and the `async-openai` backed implementation.

pub mod client;
pub mod message;
pub mod provider;
pub mod providers;
pub mod tool;

pub use client::create_chat_client;
pub use message::{
    ChatMessage, ChatOutcome, ChatRequest, ChatResponse, ChatSettings, MessageRole, TokenUsage,
};
pub use provider::ChatClient;
pub use providers::OpenAiChatClient;
pub use tool::{ToolCall, ToolDefinition, ToolResult};
