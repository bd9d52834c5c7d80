//! Azure AI Search vector-query retriever.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use super::embedding::Embedder;
use super::provider::RetrievalClient;
use crate::config::RagConfig;
use crate::core::RetrievedPassage;
use crate::error::{RagError, Result};

/// Source name used when a hit carries no title.
const UNKNOWN_SOURCE: &str = "Unknown Source";
/// Passage text used when a hit carries no content.
const NO_CONTENT: &str = "No Content";

/// Retriever that embeds the query and runs a k-NN vector query against an
/// Azure AI Search index.
pub struct AzureSearchRetriever {
    http: reqwest::Client,
    embedder: Arc<dyn Embedder>,
    endpoint: String,
    index: String,
    api_key: String,
    api_version: String,
    vector_field: String,
    title_field: String,
    content_field: String,
    nearest_neighbors: usize,
}

impl AzureSearchRetriever {
    /// Creates a retriever from configuration and a query embedder.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::InvalidConfig`] if the HTTP client cannot be built.
    pub fn new(config: &RagConfig, embedder: Arc<dyn Embedder>) -> Result<Self> {
        Ok(Self {
            http: config.http_client()?,
            embedder,
            endpoint: config.search_endpoint.trim_end_matches('/').to_string(),
            index: config.search_index.clone(),
            api_key: config.search_api_key.clone(),
            api_version: config.search_api_version.clone(),
            vector_field: config.vector_field.clone(),
            title_field: config.title_field.clone(),
            content_field: config.content_field.clone(),
            nearest_neighbors: config.nearest_neighbors,
        })
    }

    fn search_url(&self) -> String {
        format!(
            "{}/indexes/{}/docs/search?api-version={}",
            self.endpoint, self.index, self.api_version
        )
    }

    fn build_request(&self, vector: Vec<f32>, top_k: usize) -> SearchRequest {
        SearchRequest {
            select: format!("{},{}", self.title_field, self.content_field),
            top: top_k,
            vector_queries: vec![VectorQuery {
                kind: "vector",
                vector,
                k: self.nearest_neighbors,
                fields: self.vector_field.clone(),
            }],
        }
    }

    /// Maps result documents to passages, keeping the service's ranking order.
    fn to_passages(&self, response: SearchResponse) -> Vec<RetrievedPassage> {
        response
            .value
            .iter()
            .map(|doc| {
                RetrievedPassage::new(
                    text_field(doc, &self.title_field).unwrap_or(UNKNOWN_SOURCE),
                    text_field(doc, &self.content_field).unwrap_or(NO_CONTENT),
                )
            })
            .collect()
    }
}

fn text_field<'a>(doc: &'a Map<String, Value>, field: &str) -> Option<&'a str> {
    doc.get(field).and_then(Value::as_str)
}

impl std::fmt::Debug for AzureSearchRetriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSearchRetriever")
            .field("endpoint", &self.endpoint)
            .field("index", &self.index)
            .field("nearest_neighbors", &self.nearest_neighbors)
            .finish_non_exhaustive()
    }
}

fn unavailable(message: String) -> RagError {
    RagError::RetrievalUnavailable { message }
}

#[async_trait]
impl RetrievalClient for AzureSearchRetriever {
    fn name(&self) -> &'static str {
        "azure-search"
    }

    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>> {
        let vector = self.embedder.embed(query).await?;
        let request = self.build_request(vector, top_k);

        let response = self
            .http
            .post(self.search_url())
            .header("api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| unavailable(format!("search request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(unavailable(format!(
                "search request failed: HTTP {status} - {body}"
            )));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| unavailable(format!("failed to parse search response: {e}")))?;

        let passages = self.to_passages(result);
        debug!(index = %self.index, hits = passages.len(), "vector search complete");
        Ok(passages)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchRequest {
    select: String,
    top: usize,
    vector_queries: Vec<VectorQuery>,
}

#[derive(Debug, Serialize)]
struct VectorQuery {
    kind: &'static str,
    vector: Vec<f32>,
    k: usize,
    fields: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    value: Vec<Map<String, Value>>,
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedEmbedder {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(RagError::RetrievalUnavailable {
                    message: "embedding failed: quota".to_string(),
                });
            }
            Ok(vec![0.1, 0.2, 0.3])
        }
    }

    fn retriever(endpoint: &str, fail: bool) -> (AzureSearchRetriever, Arc<FixedEmbedder>) {
        let config = RagConfig::builder()
            .api_key("key")
            .endpoint("https://example.openai.azure.com")
            .chat_deployment("gpt-4o")
            .embedding_deployment("emb")
            .search_endpoint(endpoint)
            .search_index("manuals")
            .search_api_key("search-key")
            .build()
            .unwrap_or_else(|e| panic!("config: {e}"));
        let embedder = Arc::new(FixedEmbedder {
            calls: AtomicUsize::new(0),
            fail,
        });
        let retriever = AzureSearchRetriever::new(&config, embedder.clone())
            .unwrap_or_else(|e| panic!("retriever: {e}"));
        (retriever, embedder)
    }

    #[test]
    fn test_search_url_trims_trailing_slash() {
        let (r, _) = retriever("https://example.search.windows.net/", false);
        assert_eq!(
            r.search_url(),
            "https://example.search.windows.net/indexes/manuals/docs/search?api-version=2024-07-01"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let (r, _) = retriever("https://example.search.windows.net", false);
        let body = serde_json::to_value(r.build_request(vec![0.5, 0.25], 10))
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(
            body,
            json!({
                "select": "title,chunk",
                "top": 10,
                "vectorQueries": [{
                    "kind": "vector",
                    "vector": [0.5, 0.25],
                    "k": 5,
                    "fields": "text_vector"
                }]
            })
        );
    }

    #[test]
    fn test_response_mapping_keeps_order_and_fills_gaps() {
        let (r, _) = retriever("https://example.search.windows.net", false);
        let response: SearchResponse = serde_json::from_value(json!({
            "value": [
                {"@search.score": 0.9, "title": "Manual p.12", "chunk": "Filter part PN-12345"},
                {"@search.score": 0.8, "chunk": "untitled text"},
                {"@search.score": 0.7, "title": "Appendix", "chunk": null}
            ]
        }))
        .unwrap_or_else(|e| panic!("{e}"));

        let passages = r.to_passages(response);
        assert_eq!(
            passages,
            vec![
                RetrievedPassage::new("Manual p.12", "Filter part PN-12345"),
                RetrievedPassage::new("Unknown Source", "untitled text"),
                RetrievedPassage::new("Appendix", "No Content"),
            ]
        );
    }

    #[tokio::test]
    async fn test_embedding_failure_is_retrieval_unavailable() {
        let (r, embedder) = retriever("http://127.0.0.1:9", true);
        let result = r.search("oil filter", 10).await;
        assert!(matches!(result, Err(RagError::RetrievalUnavailable { .. })));
        assert_eq!(embedder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unreachable_service_is_retrieval_unavailable() {
        let (r, _) = retriever("http://127.0.0.1:9", false);
        let result = r.search("oil filter", 10).await;
        assert!(matches!(result, Err(RagError::RetrievalUnavailable { .. })));
    }
}
