//! Error types for the RAG orchestration core.
//!
//! A single [`RagError`] taxonomy is shared by the orchestrators, the
//! external-client adapters, configuration, and the HTTP layer. Variants are
//! struct-like so call sites carry the context that produced them.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = RagError> = std::result::Result<T, E>;

/// Errors raised while configuring or running a RAG request.
#[derive(Debug, Error)]
pub enum RagError {
    /// The request carried no user or assistant turns.
    #[error("conversation contains no turns")]
    EmptyConversation,

    /// The request is malformed (unknown role, misplaced system turn, no question).
    #[error("invalid conversation: {message}")]
    InvalidConversation {
        /// What is wrong with the conversation.
        message: String,
    },

    /// A prompt template could not be resolved.
    #[error("prompt '{name}' not found: {reason}")]
    PromptNotFound {
        /// Logical prompt name (e.g. `RAGSystemPrompt`).
        name: String,
        /// Why resolution failed.
        reason: String,
    },

    /// A required configuration value is absent.
    #[error("missing required configuration: {key}")]
    MissingConfig {
        /// Configuration key (environment variable name).
        key: &'static str,
    },

    /// A configuration value is present but unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig {
        /// Description of the invalid value.
        message: String,
    },

    /// The configured chat provider name is not recognised.
    #[error("unsupported chat provider: {name}")]
    UnsupportedProvider {
        /// Provider name as configured.
        name: String,
    },

    /// The retrieval backend (embeddings or vector index) failed.
    #[error("retrieval unavailable: {message}")]
    RetrievalUnavailable {
        /// Underlying failure.
        message: String,
    },

    /// The chat-completion service failed.
    #[error("chat service unavailable: {message}")]
    ChatServiceUnavailable {
        /// Underlying failure.
        message: String,
    },

    /// The agent kept requesting tools past its round budget.
    #[error("agent exceeded {max_rounds} model rounds without a final answer")]
    AgentRoundLimitExceeded {
        /// The configured round limit.
        max_rounds: usize,
    },

    /// A tool call could not be executed (bad arguments, unknown tool).
    #[error("tool '{name}' failed: {message}")]
    ToolExecution {
        /// Tool name requested by the model.
        name: String,
        /// Failure description.
        message: String,
    },

    /// The run was cancelled before it completed.
    #[error("request cancelled")]
    Cancelled,
}

impl RagError {
    /// Returns `true` for errors caused by the caller's input.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyConversation | Self::InvalidConversation { .. }
        )
    }

    /// Returns `true` for errors that must stop the service from starting.
    #[must_use]
    pub const fn is_startup_error(&self) -> bool {
        matches!(
            self,
            Self::PromptNotFound { .. }
                | Self::MissingConfig { .. }
                | Self::InvalidConfig { .. }
                | Self::UnsupportedProvider { .. }
        )
    }

    /// Stable machine-readable identifier for this error kind.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EmptyConversation => "empty_conversation",
            Self::InvalidConversation { .. } => "invalid_conversation",
            Self::PromptNotFound { .. } => "prompt_not_found",
            Self::MissingConfig { .. } => "missing_config",
            Self::InvalidConfig { .. } => "invalid_config",
            Self::UnsupportedProvider { .. } => "unsupported_provider",
            Self::RetrievalUnavailable { .. } => "retrieval_unavailable",
            Self::ChatServiceUnavailable { .. } => "chat_service_unavailable",
            Self::AgentRoundLimitExceeded { .. } => "agent_round_limit_exceeded",
            Self::ToolExecution { .. } => "tool_execution",
            Self::Cancelled => "cancelled",
        }
    }
}
