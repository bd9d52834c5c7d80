//! RAG orchestration.
//!
//! Two orchestrators share the same collaborators: [`PipelineOrchestrator`]
//! always rewrites, retrieves, and generates in a fixed order, while
//! [`AgentOrchestrator`] lets the model call retrieval as a tool. Both are
//! stateless and built once at startup.

pub mod agent;
pub mod assembler;
pub mod pipeline;
pub mod prompt;
pub mod service;
pub mod tool;

#[cfg(test)]
mod mock;

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::error::{RagError, Result};

pub use agent::AgentOrchestrator;
pub use assembler::{NO_SOURCES_BLOCK, build_grounded_turn, format_sources};
pub use pipeline::PipelineOrchestrator;
pub use prompt::{
    BuiltinPromptProvider, FilePromptProvider, PromptName, PromptProvider, PromptSet,
};
pub use service::RagService;
pub use tool::{RETRIEVAL_TOOL_NAME, RetrievalTool, ToolHandler, ToolOutput, ToolRegistry};

/// Races `fut` against `cancel`. A cancelled token wins ties.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(RagError::Cancelled),
        result = fut => result,
    }
}
