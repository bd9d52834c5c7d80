//! Retrieval client factory.

use std::sync::Arc;

use super::azure_search::AzureSearchRetriever;
use super::embedding::{Embedder, OpenAiEmbedder};
use super::provider::RetrievalClient;
use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// Creates the query embedder matching the configured chat provider.
///
/// # Errors
///
/// Returns [`RagError::UnsupportedProvider`] for unknown provider names.
pub fn create_embedder(config: &RagConfig) -> Result<Arc<dyn Embedder>> {
    match config.chat_provider.as_str() {
        "azure" => Ok(Arc::new(OpenAiEmbedder::azure(config)?)),
        "openai" => Ok(Arc::new(OpenAiEmbedder::openai(config)?)),
        other => Err(RagError::UnsupportedProvider {
            name: other.to_string(),
        }),
    }
}

/// Creates the Azure AI Search backed [`RetrievalClient`].
///
/// # Errors
///
/// Propagates embedder and HTTP client construction failures.
pub fn create_retrieval_client(config: &RagConfig) -> Result<Arc<dyn RetrievalClient>> {
    let embedder = create_embedder(config)?;
    Ok(Arc::new(AzureSearchRetriever::new(config, embedder)?))
}
