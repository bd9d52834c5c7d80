//! Pluggable chat-completion client trait.
//!
//! Implementations translate provider-agnostic [`ChatRequest`]/[`ChatResponse`]
//! into provider-specific SDK calls. Orchestration code only sees this trait.

use async_trait::async_trait;

use super::message::{ChatMessage, ChatOutcome, ChatRequest, ChatResponse, ChatSettings};
use super::tool::ToolDefinition;
use crate::error::RagError;

/// Trait for chat-completion backends.
///
/// Implementors provide [`ChatClient::chat`]; the `complete*` helpers build
/// the request and classify the response. Any transport or API failure is
/// reported as [`RagError::ChatServiceUnavailable`]. Retries, if any, belong
/// inside the implementation.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Client name (e.g., `"azure"`, `"openai"`).
    fn name(&self) -> &'static str;

    /// Executes a chat completion request.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ChatServiceUnavailable`] on API failures.
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, RagError>;

    /// Generates an assistant message for `history` without tools.
    async fn complete(
        &self,
        history: Vec<ChatMessage>,
        settings: &ChatSettings,
    ) -> Result<String, RagError> {
        let request = ChatRequest::new(history, settings);
        let response = self.chat(&request).await?;
        Ok(response.content)
    }

    /// Generates either a final message or tool-call requests.
    async fn complete_with_tools(
        &self,
        history: Vec<ChatMessage>,
        tools: Vec<ToolDefinition>,
        settings: &ChatSettings,
    ) -> Result<ChatOutcome, RagError> {
        let request = ChatRequest::new(history, settings).with_tools(tools);
        let response = self.chat(&request).await?;
        Ok(response.into_outcome())
    }
}
