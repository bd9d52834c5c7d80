//! Retrieval client trait.

use async_trait::async_trait;

use crate::core::RetrievedPassage;
use crate::error::RagError;

/// Trait for passage retrieval backends.
///
/// Given a text query, returns up to `top_k` passages ordered by relevance,
/// most similar first. An empty result is not an error. Any transport or
/// backend failure is reported as [`RagError::RetrievalUnavailable`].
#[async_trait]
pub trait RetrievalClient: Send + Sync {
    /// Backend name (e.g., `"azure-search"`).
    fn name(&self) -> &'static str;

    /// Searches for passages relevant to `query`.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RetrievalUnavailable`] if the backend cannot be reached
    /// or answers with something other than a result list.
    async fn search(&self, query: &str, top_k: usize) -> Result<Vec<RetrievedPassage>, RagError>;
}
