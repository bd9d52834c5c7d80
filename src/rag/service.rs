//! Wiring of clients, prompts, and orchestrators from configuration.

use std::sync::Arc;

use tracing::info;

use super::agent::AgentOrchestrator;
use super::pipeline::PipelineOrchestrator;
use super::prompt::PromptSet;
use super::tool::ToolRegistry;
use crate::chat::{ChatClient, ChatSettings, create_chat_client};
use crate::config::RagConfig;
use crate::error::Result;
use crate::retrieval::{RetrievalClient, create_retrieval_client};

/// Both orchestrators, built once and shared by every request.
#[derive(Debug, Clone)]
pub struct RagService {
    pipeline: Arc<PipelineOrchestrator>,
    agent: Arc<AgentOrchestrator>,
}

impl RagService {
    /// Builds the service from already constructed collaborators.
    #[must_use]
    pub fn new(
        chat: Arc<dyn ChatClient>,
        retrieval: Arc<dyn RetrievalClient>,
        prompts: PromptSet,
        settings: ChatSettings,
        top_k: usize,
        max_rounds: usize,
    ) -> Self {
        let prompts = Arc::new(prompts);
        let pipeline = PipelineOrchestrator::new(
            Arc::clone(&chat),
            Arc::clone(&retrieval),
            Arc::clone(&prompts),
            settings.clone(),
            top_k,
        );
        let agent = AgentOrchestrator::new(
            chat,
            ToolRegistry::with_retrieval(retrieval, top_k),
            prompts,
            settings,
            max_rounds,
        );
        Self {
            pipeline: Arc::new(pipeline),
            agent: Arc::new(agent),
        }
    }

    /// Creates the configured clients, resolves prompts, and builds both
    /// orchestrators.
    ///
    /// # Errors
    ///
    /// Returns any startup error: unsupported provider, missing prompt, or an
    /// HTTP client that cannot be built.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        let prompts = PromptSet::from_config(config)?;
        let chat = create_chat_client(config)?;
        let retrieval = create_retrieval_client(config)?;
        let settings = ChatSettings {
            model: config.chat_deployment.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        };

        info!(
            chat = chat.name(),
            retrieval = retrieval.name(),
            deployment = %config.chat_deployment,
            index = %config.search_index,
            prompts = config
                .prompt_dir
                .as_ref()
                .map_or_else(|| "built-in".to_string(), |d| d.display().to_string()),
            "RAG service ready"
        );

        Ok(Self::new(
            chat,
            retrieval,
            prompts,
            settings,
            config.top_k,
            config.max_rounds,
        ))
    }

    /// The deterministic pipeline.
    #[must_use]
    pub fn pipeline(&self) -> &PipelineOrchestrator {
        &self.pipeline
    }

    /// The tool-calling agent.
    #[must_use]
    pub fn agent(&self) -> &AgentOrchestrator {
        &self.agent
    }
}
