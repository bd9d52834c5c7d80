//! Tool registry for the agent loop.
//!
//! Tools are registered explicitly by name with a JSON schema and an async
//! handler. Failures never abort the loop: they come back to the model as
//! error tool results.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use super::assembler::format_sources;
use crate::chat::{ToolCall, ToolDefinition, ToolResult};
use crate::error::{RagError, Result};
use crate::retrieval::RetrievalClient;

/// Name of the retrieval tool exposed to the model.
pub const RETRIEVAL_TOOL_NAME: &str = "get_sources";

/// Maximum raw byte length of tool argument JSON from the model.
const MAX_TOOL_ARGS_LEN: usize = 100_000;

/// What a tool hands back to the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Text fed back to the model.
    pub content: String,
    /// Short description for diagnostics.
    pub summary: String,
}

/// A tool the agent can invoke.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool with JSON-encoded arguments.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ToolExecution`] for unusable arguments.
    async fn call(&self, arguments: &str) -> Result<ToolOutput>;
}

struct RegisteredTool {
    definition: ToolDefinition,
    handler: Arc<dyn ToolHandler>,
}

/// Name → tool lookup, built once at startup.
#[derive(Default)]
pub struct ToolRegistry {
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the retrieval tool.
    #[must_use]
    pub fn with_retrieval(retrieval: Arc<dyn RetrievalClient>, top_k: usize) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RetrievalTool::new(retrieval, top_k)));
        registry
    }

    /// Adds a tool, replacing any tool with the same name.
    pub fn register(&mut self, handler: Arc<dyn ToolHandler>) {
        let definition = handler.definition();
        self.tools.insert(
            definition.name.clone(),
            RegisteredTool {
                definition,
                handler,
            },
        );
    }

    /// Definitions of every registered tool, ordered by name.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition.clone()).collect()
    }

    /// Number of registered tools.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Returns `true` if no tools are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Dispatches a tool call, turning any failure into an error result.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let outcome = if call.arguments.len() > MAX_TOOL_ARGS_LEN {
            Err(RagError::ToolExecution {
                name: call.name.clone(),
                message: format!(
                    "tool arguments too large ({} bytes, max {MAX_TOOL_ARGS_LEN})",
                    call.arguments.len()
                ),
            })
        } else if let Some(tool) = self.tools.get(&call.name) {
            tool.handler.call(&call.arguments).await
        } else {
            Err(RagError::ToolExecution {
                name: call.name.clone(),
                message: "unknown tool".to_string(),
            })
        };

        match outcome {
            Ok(output) => ToolResult {
                tool_call_id: call.id.clone(),
                content: output.content,
                summary: output.summary,
                is_error: false,
            },
            Err(e) => {
                debug!(tool = %call.name, id = %call.id, error = %e, "tool call failed");
                ToolResult {
                    tool_call_id: call.id.clone(),
                    content: e.to_string(),
                    summary: format!("error: {e}"),
                    is_error: true,
                }
            }
        }
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Retrieval exposed as the `get_sources` tool.
///
/// A failing backend is reported to the model as "no sources found" so the
/// loop can still produce an answer.
pub struct RetrievalTool {
    retrieval: Arc<dyn RetrievalClient>,
    top_k: usize,
}

impl RetrievalTool {
    /// Creates the tool over a retrieval client.
    #[must_use]
    pub fn new(retrieval: Arc<dyn RetrievalClient>, top_k: usize) -> Self {
        Self { retrieval, top_k }
    }
}

#[derive(Deserialize)]
struct RetrievalArgs {
    #[serde(alias = "query_text")]
    query: String,
}

#[async_trait]
impl ToolHandler for RetrievalTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: RETRIEVAL_TOOL_NAME.to_string(),
            description: "Search the document index and return the passages most relevant \
                          to the query, each tagged with its source name."
                .to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Search query built from the user's question and the conversation"
                    }
                },
                "required": ["query"]
            }),
        }
    }

    async fn call(&self, arguments: &str) -> Result<ToolOutput> {
        let args: RetrievalArgs =
            serde_json::from_str(arguments).map_err(|e| RagError::ToolExecution {
                name: RETRIEVAL_TOOL_NAME.to_string(),
                message: format!("invalid arguments: {e}"),
            })?;
        let query = args.query.trim();
        if query.is_empty() {
            return Err(RagError::ToolExecution {
                name: RETRIEVAL_TOOL_NAME.to_string(),
                message: "query must not be empty".to_string(),
            });
        }

        match self.retrieval.search(query, self.top_k).await {
            Ok(passages) => Ok(ToolOutput {
                content: format_sources(&passages),
                summary: format!("{} sources found", passages.len()),
            }),
            Err(RagError::RetrievalUnavailable { message }) => {
                warn!(query, error = %message, "retrieval unavailable, returning no sources");
                Ok(ToolOutput {
                    content: format_sources(&[]),
                    summary: format!("retrieval unavailable ({message}); no sources"),
                })
            }
            Err(e) => Err(e),
        }
    }
}
