//! Tool-calling agent loop.
//!
//! The model sees the conversation and the `get_sources` tool and decides
//! when to retrieve. Each round is one model call; tool calls requested in a
//! round run concurrently and their results are written back in request
//! order before the next round.

use std::sync::Arc;

use futures_util::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::prompt::PromptSet;
use super::tool::ToolRegistry;
use super::until_cancelled;
use crate::chat::message::{assistant_tool_calls_message, system_message, tool_message};
use crate::chat::{ChatClient, ChatMessage, ChatOutcome, ChatSettings};
use crate::core::{Conversation, Diagnostics, RequestResult, StepKind};
use crate::error::{RagError, Result};

/// Agentic RAG orchestrator bounded by a model-round budget.
pub struct AgentOrchestrator {
    chat: Arc<dyn ChatClient>,
    tools: ToolRegistry,
    prompts: Arc<PromptSet>,
    settings: ChatSettings,
    max_rounds: usize,
}

impl AgentOrchestrator {
    /// Creates an agent over the given collaborators.
    #[must_use]
    pub fn new(
        chat: Arc<dyn ChatClient>,
        tools: ToolRegistry,
        prompts: Arc<PromptSet>,
        settings: ChatSettings,
        max_rounds: usize,
    ) -> Self {
        Self {
            chat,
            tools,
            prompts,
            settings,
            max_rounds,
        }
    }

    /// Runs the loop until the model answers.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyConversation`] or
    /// [`RagError::InvalidConversation`] before any external call,
    /// [`RagError::ChatServiceUnavailable`] if a model call fails, and
    /// [`RagError::AgentRoundLimitExceeded`] if the model is still asking
    /// for tools after `max_rounds` calls.
    pub async fn run(&self, conversation: &Conversation) -> Result<RequestResult> {
        self.run_with_cancel(conversation, &CancellationToken::new())
            .await
    }

    /// Like [`Self::run`], aborting with [`RagError::Cancelled`] once
    /// `cancel` fires.
    ///
    /// # Errors
    ///
    /// See [`Self::run`].
    pub async fn run_with_cancel(
        &self,
        conversation: &Conversation,
        cancel: &CancellationToken,
    ) -> Result<RequestResult> {
        // Same validation as the pipeline; the split itself is not needed here.
        conversation.split_last_question()?;

        let mut diagnostics = Diagnostics::new();
        let mut messages = vec![system_message(&self.prompts.agent)];
        messages.extend(conversation.dialogue().map(ChatMessage::from));
        let definitions = self.tools.definitions();

        info!(
            turns = messages.len() - 1,
            chat = self.chat.name(),
            max_rounds = self.max_rounds,
            "agent run started"
        );

        for round in 1..=self.max_rounds {
            let outcome = until_cancelled(
                cancel,
                self.chat
                    .complete_with_tools(messages.clone(), definitions.clone(), &self.settings),
            )
            .await?;

            match outcome {
                ChatOutcome::Final { content, usage } => {
                    debug!(round, total_tokens = usage.total_tokens, "agent produced final answer");
                    diagnostics.record(StepKind::Generation, content.as_str());
                    info!(rounds = round, steps = diagnostics.len(), "agent run finished");
                    return Ok(diagnostics.into_result(content));
                }
                ChatOutcome::ToolCalls {
                    content,
                    calls,
                    usage,
                } => {
                    debug!(
                        round,
                        calls = calls.len(),
                        total_tokens = usage.total_tokens,
                        "agent requested tools"
                    );

                    let results = until_cancelled(cancel, async {
                        Ok(join_all(calls.iter().map(|call| self.tools.execute(call))).await)
                    })
                    .await?;

                    for (call, result) in calls.iter().zip(&results) {
                        debug!(
                            tool = %call.name,
                            id = %call.id,
                            is_error = result.is_error,
                            "tool call complete"
                        );
                        diagnostics.record(
                            StepKind::ToolCall,
                            format!("{}({}) -> {}", call.name, call.arguments, result.summary),
                        );
                    }

                    messages.push(assistant_tool_calls_message(content, calls));
                    messages.extend(
                        results
                            .iter()
                            .map(|r| tool_message(&r.tool_call_id, &r.content)),
                    );
                }
            }
        }

        warn!(max_rounds = self.max_rounds, "agent round limit exceeded");
        Err(RagError::AgentRoundLimitExceeded {
            max_rounds: self.max_rounds,
        })
    }
}

impl std::fmt::Debug for AgentOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentOrchestrator")
            .field("chat", &self.chat.name())
            .field("tools", &self.tools)
            .field("settings", &self.settings)
            .field("max_rounds", &self.max_rounds)
            .finish_non_exhaustive()
    }
}
