//! Query embedding via the `OpenAI` / Azure `OpenAI` embeddings endpoint.

use async_openai::Client;
use async_openai::config::{AzureConfig, Config, OpenAIConfig};
use async_openai::types::CreateEmbeddingRequestArgs;
use async_trait::async_trait;
use tracing::debug;

use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// Turns query text into a dense vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embeds a single query.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RetrievalUnavailable`] if the embedding service fails.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Embedder backed by `async-openai`.
pub struct OpenAiEmbedder<C: Config> {
    client: Client<C>,
    model: String,
    dimensions: Option<u32>,
}

impl OpenAiEmbedder<OpenAIConfig> {
    /// Creates an embedder for the `OpenAI` API.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn openai(config: &RagConfig) -> Result<Self> {
        let mut openai_config = OpenAIConfig::new().with_api_key(&config.api_key);
        if let Some(ref base_url) = config.endpoint {
            openai_config = openai_config.with_api_base(base_url);
        }
        Ok(Self {
            client: Client::with_config(openai_config).with_http_client(config.http_client()?),
            model: config.embedding_deployment.clone(),
            dimensions: config.embedding_dimensions,
        })
    }
}

impl OpenAiEmbedder<AzureConfig> {
    /// Creates an embedder for an Azure `OpenAI` embedding deployment.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::MissingConfig`] without an endpoint, or
    /// [`RagError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn azure(config: &RagConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or(RagError::MissingConfig {
            key: "AZURE_OPENAI_ENDPOINT",
        })?;
        let azure_config = AzureConfig::new()
            .with_api_base(endpoint)
            .with_api_key(&config.api_key)
            .with_deployment_id(&config.embedding_deployment)
            .with_api_version(&config.api_version);
        Ok(Self {
            client: Client::with_config(azure_config).with_http_client(config.http_client()?),
            model: config.embedding_deployment.clone(),
            dimensions: config.embedding_dimensions,
        })
    }
}

impl<C: Config> std::fmt::Debug for OpenAiEmbedder<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiEmbedder")
            .field("model", &self.model)
            .field("dimensions", &self.dimensions)
            .finish_non_exhaustive()
    }
}

fn unavailable(e: impl std::fmt::Display) -> RagError {
    RagError::RetrievalUnavailable {
        message: format!("embedding failed: {e}"),
    }
}

#[async_trait]
impl<C> Embedder for OpenAiEmbedder<C>
where
    C: Config + Send + Sync + 'static,
{
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut request = CreateEmbeddingRequestArgs::default()
            .model(self.model.as_str())
            .input(text)
            .build()
            .map_err(unavailable)?;
        request.dimensions = self.dimensions;

        let response = self
            .client
            .embeddings()
            .create(request)
            .await
            .map_err(unavailable)?;

        let vector = response
            .data
            .into_iter()
            .next()
            .map(|e| e.embedding)
            .ok_or_else(|| unavailable("service returned no embedding"))?;
        debug!(model = %self.model, dimensions = vector.len(), "embedded query");
        Ok(vector)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn builder() -> crate::config::RagConfigBuilder {
        RagConfig::builder()
            .api_key("test-key")
            .chat_deployment("gpt-4o")
            .embedding_deployment("text-embedding-3-large")
            .search_endpoint("https://example.search.windows.net")
            .search_index("manuals")
            .search_api_key("search-key")
    }

    #[test]
    fn test_azure_requires_endpoint() {
        let config = builder()
            .chat_provider("openai")
            .build()
            .unwrap_or_else(|e| panic!("{e}"));
        let err = OpenAiEmbedder::azure(&config).err();
        assert!(matches!(
            err,
            Some(RagError::MissingConfig {
                key: "AZURE_OPENAI_ENDPOINT"
            })
        ));
    }

    #[test]
    fn test_embedder_carries_dimensions() {
        let config = builder()
            .endpoint("https://example.openai.azure.com")
            .embedding_dimensions(1536)
            .build()
            .unwrap_or_else(|e| panic!("{e}"));
        let embedder = OpenAiEmbedder::azure(&config).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(embedder.dimensions, Some(1536));
        assert_eq!(embedder.model, "text-embedding-3-large");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_retrieval_unavailable() {
        let config = builder()
            .chat_provider("openai")
            .endpoint("http://127.0.0.1:9/v1")
            .build()
            .unwrap_or_else(|e| panic!("{e}"));
        let embedder = OpenAiEmbedder::openai(&config).unwrap_or_else(|e| panic!("{e}"));
        let err = embedder.embed("oil filter").await.err();
        assert!(matches!(err, Some(RagError::RetrievalUnavailable { .. })));
    }
}
