//! Request and response bodies.

use serde::{Deserialize, Serialize};

use crate::core::{Conversation, RequestResult};
use crate::error::Result;

/// One inbound chat message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    /// `user`, `assistant`, or `system` (case-insensitive).
    pub role: String,
    /// Message text.
    pub content: String,
}

/// Body of `POST /rag` and `POST /rag-agent`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiChatRequest {
    /// Conversation so far, oldest first.
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
}

impl ApiChatRequest {
    /// Converts the inbound messages into a conversation.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RagError::InvalidConversation`] for an unknown role.
    pub fn to_conversation(&self) -> Result<Conversation> {
        Conversation::from_inbound(
            self.messages
                .iter()
                .map(|m| (m.role.as_str(), m.content.as_str())),
        )
    }
}

/// Successful answer envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    /// Answer plus execution diagnostics.
    pub result: RequestResult,
}

/// Plain message payload for `GET /` and `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Message text.
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Error envelope: `{"error": {"kind", "message"}}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error details.
    pub error: ErrorBody,
}

/// Machine-readable kind plus human-readable message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Stable error kind (e.g. `agent_round_limit_exceeded`).
    pub kind: String,
    /// Description of the failure.
    pub message: String,
}
