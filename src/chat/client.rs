//! Chat client factory.
//!
//! Maps provider names to concrete [`ChatClient`] implementations.

use std::sync::Arc;

use crate::chat::provider::ChatClient;
use crate::chat::providers::OpenAiChatClient;
use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// Creates a [`ChatClient`] based on the configured provider name.
///
/// # Supported Providers
///
/// - `"azure"` (default): Azure `OpenAI` deployments via `async-openai`
/// - `"openai"`: `OpenAI`-compatible APIs via `async-openai`
///
/// # Errors
///
/// Returns [`RagError::UnsupportedProvider`] for unknown provider names, or
/// the constructor's error if the client cannot be built.
pub fn create_chat_client(config: &RagConfig) -> Result<Arc<dyn ChatClient>> {
    match config.chat_provider.as_str() {
        "azure" => Ok(Arc::new(OpenAiChatClient::azure(config)?)),
        "openai" => Ok(Arc::new(OpenAiChatClient::openai(config)?)),
        other => Err(RagError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}
