//! Deterministic retrieve-then-generate flow.
//!
//! Every run goes through the same four steps in order: rewrite the
//! conversation into a search query, retrieve passages, assemble the grounded
//! prompt, generate the answer. Each step records one diagnostic. The first
//! failure aborts the run.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::assembler::build_grounded_turn;
use super::prompt::PromptSet;
use super::until_cancelled;
use crate::chat::message::{system_message, user_message};
use crate::chat::{ChatClient, ChatMessage, ChatSettings};
use crate::core::{Conversation, Diagnostics, RequestResult, StepKind};
use crate::error::Result;
use crate::retrieval::RetrievalClient;

/// Two-call RAG orchestrator.
///
/// Holds only shared handles and read-only settings; one instance serves
/// every request.
pub struct PipelineOrchestrator {
    chat: Arc<dyn ChatClient>,
    retrieval: Arc<dyn RetrievalClient>,
    prompts: Arc<PromptSet>,
    settings: ChatSettings,
    top_k: usize,
}

impl PipelineOrchestrator {
    /// Creates a pipeline over the given collaborators.
    #[must_use]
    pub fn new(
        chat: Arc<dyn ChatClient>,
        retrieval: Arc<dyn RetrievalClient>,
        prompts: Arc<PromptSet>,
        settings: ChatSettings,
        top_k: usize,
    ) -> Self {
        Self {
            chat,
            retrieval,
            prompts,
            settings,
            top_k,
        }
    }

    /// Answers the conversation's last user turn.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RagError::EmptyConversation`] or
    /// [`crate::RagError::InvalidConversation`] before any external call, and
    /// otherwise the error of the first failing step.
    pub async fn run(&self, conversation: &Conversation) -> Result<RequestResult> {
        self.run_with_cancel(conversation, &CancellationToken::new())
            .await
    }

    /// Like [`Self::run`], aborting with [`crate::RagError::Cancelled`] once
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
        let (question, earlier_turns) = conversation.split_last_question()?;
        let mut diagnostics = Diagnostics::new();
        info!(
            turns = earlier_turns.len() + 1,
            chat = self.chat.name(),
            retrieval = self.retrieval.name(),
            "pipeline run started"
        );

        // Rewrite
        let mut rewrite_history = vec![system_message(&self.prompts.search)];
        rewrite_history.extend(conversation.dialogue().map(ChatMessage::from));
        let rewritten = until_cancelled(
            cancel,
            self.chat.complete(rewrite_history, &self.settings),
        )
        .await?;
        let query = match rewritten.trim() {
            "" => question.trim().to_string(),
            q => q.to_string(),
        };
        debug!(query = %query, "rewrote conversation into search query");
        diagnostics.record(StepKind::Rewrite, query.as_str());

        // Retrieve
        let passages = until_cancelled(cancel, self.retrieval.search(&query, self.top_k)).await?;
        debug!(hits = passages.len(), "retrieved passages");
        diagnostics.record(
            StepKind::Retrieval,
            format!("{} sources found", passages.len()),
        );

        // Assemble
        let grounded = build_grounded_turn(&question, &passages);
        let mut history = vec![system_message(&self.prompts.system)];
        history.extend(earlier_turns.iter().map(ChatMessage::from));
        history.push(user_message(&grounded));
        diagnostics.record(StepKind::Assembly, grounded);

        // Generate
        let answer = until_cancelled(cancel, self.chat.complete(history, &self.settings)).await?;
        diagnostics.record(StepKind::Generation, answer.as_str());

        info!(steps = diagnostics.len(), "pipeline run finished");
        Ok(diagnostics.into_result(answer))
    }
}

impl std::fmt::Debug for PipelineOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineOrchestrator")
            .field("chat", &self.chat.name())
            .field("retrieval", &self.retrieval.name())
            .field("settings", &self.settings)
            .field("top_k", &self.top_k)
            .finish_non_exhaustive()
    }
}
